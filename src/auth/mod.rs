//! Authentication module for managing the session token.
//!
//! This module provides:
//! - `Session`: the in-memory token and authenticated flag
//! - `Storage`: key-value persistence for the token (file, keyring or memory)
//!
//! The token is persisted under the key `token`.

pub mod session;
pub mod storage;

pub use session::Session;
pub use storage::{Storage, StorageBackend};
