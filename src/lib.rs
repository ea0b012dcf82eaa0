//! # utopian-labs
//!
//! Utopian Labs 智能体运行 API 的 Rust 客户端：请求校验、响应解析与统一的错误映射。
//!
//! Rust client for the Utopian Labs agent run API: local request validation,
//! discriminated response parsing and a single error taxonomy for every failure.
//!
//! ## Overview
//!
//! A run is started with a request naming one of ten agents (five families, each with a
//! `-light` tier). The request is validated against the agent's family before anything is
//! sent; every problem found is reported at once, each with its field path. Responses are
//! parsed by `status` first and by the agent's family second.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use utopian_labs::UtopianLabs;
//!
//! #[tokio::main]
//! async fn main() -> utopian_labs::Result<()> {
//!     let client = UtopianLabs::new("your-api-key")?;
//!
//!     let created = client
//!         .agents()
//!         .runs()
//!         .create(&json!({
//!             "agent": "r1-qualification",
//!             "lead": { "company": { "website": "acme.com" } }
//!         }))
//!         .await?;
//!
//!     println!("started run {}", created.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | `UtopianLabs` facade, builder and endpoint groups |
//! | [`config`] | Immutable client configuration and environment lookup |
//! | [`types`] | Agent kinds, run requests and responses |
//! | [`validation`] | Path-tracking validator and field rules |
//! | [`transport`] | HTTP transport and the status-to-error adapter |
//! | [`error_code`] | The closed set of error kinds |

pub mod client;
pub mod config;
pub mod error_code;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::{AgentRuns, Agents, UtopianLabs, UtopianLabsBuilder};
pub use config::{ClientConfig, MeErrorPolicy};
pub use error_code::ErrorKind;
pub use types::{AgentKind, CreatedRun, GetRunRequest, MeResponse, RunRequest, RunResponse};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
