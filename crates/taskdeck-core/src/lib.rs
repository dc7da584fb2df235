//! Core library for taskdeck.
//!
//! This crate contains everything a frontend needs to talk to the taskdeck
//! backend:
//!
//! - `auth`: durable token storage, the shared session, keychain credentials
//! - `api`: the authenticated REST client and its error taxonomy
//! - `models`: projects, tasks, users, subscription types
//! - `config`: on-disk configuration and API base address resolution
//! - `validate`: local form validation shared by login/register frontends

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod validate;

pub use api::{ApiClient, ApiError};
pub use auth::{Session, SessionHandle, TokenStore};
pub use config::Config;
