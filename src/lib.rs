// Public API for integration tests and potential library usage

pub mod api;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod error;
pub mod media;
pub mod protocol;
pub mod random;
pub mod state;
pub mod sweeper;
pub mod templates;
pub mod types;
