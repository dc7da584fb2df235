//! REST client module for the taskdeck backend.
//!
//! The backend speaks JSON over HTTP and authenticates requests with a
//! bearer token obtained from `/auth/login`. `ApiClient` reads that token
//! from the shared session on every request.

pub mod client;
pub mod error;

pub use client::{ApiClient, LoginResponse};
pub use error::ApiError;
