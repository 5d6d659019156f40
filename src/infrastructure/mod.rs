//! Infrastructure layer: persistence and external side effects.

pub mod browser;
pub mod persistence;
