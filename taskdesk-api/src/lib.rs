//! # TaskDesk API Server Library
//!
//! HTTP surface of the task tracker: account registration and login, and
//! per-account task CRUD behind a bearer-token guard.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
