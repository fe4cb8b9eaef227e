// src/core/mod.rs
//! Configuration, file I/O and the HTTP client shared by the library and the CLI

pub mod config_manager;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::{AppConfig, ConfigManager};
pub use fs_ops::FsOps;
pub use service_client::ServiceClient;
