pub mod config;
pub mod error;
pub mod geo;
pub mod ranking;
pub mod types;

pub use config::Config;
pub use error::{CivicError, Result};
pub use types::*;
