//! Error types for the Orchestrall client SDK.
//!
//! This crate provides the foundation error types used throughout the
//! Orchestrall workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use orchestrall_error::{OrchestrallResult, TransportError, TransportErrorKind};
//!
//! fn fetch_data() -> OrchestrallResult<String> {
//!     Err(TransportError::new(TransportErrorKind::HttpStatus(502)))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod event;
mod operation;
mod rpc;
mod transport;

pub use config::{ConfigError, ConfigErrorKind};
pub use error::{OrchestrallError, OrchestrallErrorKind, OrchestrallResult};
pub use event::{EventError, EventErrorKind};
pub use operation::OperationError;
pub use rpc::{ProtocolError, ProtocolErrorKind, RpcError};
pub use transport::{RetryableError, TransportError, TransportErrorKind};
