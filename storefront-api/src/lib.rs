//! # Storefront API Server Library
//!
//! HTTP layer for the storefront: registration and login, profile details,
//! catalog browsing and the cart/order workflow.
//!
//! ## Modules
//!
//! - `app`: Application state, router and bearer authentication layer
//! - `config`: Configuration from environment variables
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request body extractor
//! - `middleware`: Security headers
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
