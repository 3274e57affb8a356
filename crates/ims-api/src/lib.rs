//! # ims-api: Presentation Contract for Smart-IMS
//!
//! Request/response DTOs, error codes and configuration for whatever hosts
//! the HTTP routes. Every command takes a shared [`Database`] handle.
//!
//! ## Example
//! ```rust,ignore
//! use ims_api::{commands, config, AppConfig};
//!
//! config::init_tracing();
//! let app = AppConfig::from_env()?;
//! let db = app.connect().await?;
//!
//! let stats = commands::dashboard_stats(&db).await?;
//! ```

pub mod commands;
pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use ims_db::Database;
