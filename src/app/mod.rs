//! Application wiring for the Herald binary
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `init`: Builds the bus, token services and authenticator

pub mod config;
mod init;
mod loader;

// Re-export public API
pub use init::App;
pub use loader::load_config;
