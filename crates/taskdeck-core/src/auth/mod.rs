//! Authentication state for taskdeck clients.
//!
//! This module provides:
//! - `TokenStore`: durable storage for the server-issued credential pair
//! - `Session`/`SessionHandle`: per-process authentication state shared by
//!   the API client and the UI
//! - `CredentialStore`: optional remember-password via the OS keychain
//!
//! The token store is the authoritative copy of the credential pair; the
//! session is derived from it at startup.

pub mod credentials;
pub mod session;
pub mod token_store;

pub use credentials::CredentialStore;
pub use session::{Session, SessionHandle};
pub use token_store::TokenStore;
