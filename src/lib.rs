//! # dnd-ui-toolkit
//!
//! Persistent, event-driven widgets for D&D character sheets written as
//! markdown documents.
//!
//! ## Usage
//!
//! ```bash
//! dnd-ui-toolkit [--vault DIR] keys|get|set|delete|clear|path
//! ```
//!
//! ## Modules
//!
//! - `app` - Logging setup and fatal error reporting for the binary
//! - `config` - Toolkit settings loaded from TOML and the environment
//! - `domains` - Block definitions and state types for each widget kind
//! - `error` - Unified error type with numeric codes
//! - `events` - Document-scoped publish/subscribe bus
//! - `reset` - Normalization of `reset_on` configuration
//! - `storage` - Key-value store over a single persisted JSON document
//! - `widgets` - Stateful widget handlers and the event button dispatcher
pub mod app;
pub mod config;
pub mod domains;
pub mod error;
pub mod events;
pub mod reset;
pub mod storage;
pub mod widgets;

pub use error::{Result, ToolkitError};
