//! Authentication module for user accounts and bearer tokens.
//!
//! This module provides the public interface for login, registration and
//! logout, the token authentication middleware and the `Authenticator` that
//! ties the credential and token stores together.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
