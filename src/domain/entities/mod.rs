//! Core business entities.

pub mod link;

pub use link::Link;
