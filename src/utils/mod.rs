//! Shared helpers: code generation and URL validation.

pub mod code_generator;
pub mod url_validator;
