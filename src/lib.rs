// Core modules
pub mod account;
pub mod config;
pub mod cycle;
pub mod error;
pub mod exchange;
pub mod execution;
pub mod indicators;
pub mod market;
pub mod models;
pub mod oracle;
pub mod scheduler;

// Re-export commonly used types
pub use config::{Config, Instructions};
pub use error::{Result, TraderError};
pub use models::*;
