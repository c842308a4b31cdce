//! # TaskDesk Client
//!
//! Client side of the task tracker: session state with a persisted token,
//! an HTTP client that attaches it, form validation and view guards. The
//! `taskdesk` binary is a command-line front end over these.
//!
//! ## Modules
//!
//! - `api`: HTTP client bound to a session
//! - `error`: Client error type and user-facing messages
//! - `forms`: Login and registration forms
//! - `routes`: Views and the login guard
//! - `session`: Token slot and its file storage

pub mod api;
pub mod error;
pub mod forms;
pub mod routes;
pub mod session;
