//! # Storefront Shared Library
//!
//! This crate contains the types, persistence models, and authentication
//! primitives used by the storefront API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their queries (users, catalog, orders)
//! - `auth`: Password hashing, JWT issuance/validation, request authentication
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the storefront shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
