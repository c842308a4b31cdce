//! # TaskDesk Shared Library
//!
//! This crate contains the types, storage access and authentication
//! primitives used by the TaskDesk API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: Storage seam (`Store` trait) with PostgreSQL and in-memory backends
//! - `db`: Connection pool and migrations
//! - `auth`: Password hashing, JWT tokens and the bearer-token guard

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the TaskDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
