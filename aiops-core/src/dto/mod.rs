//! Data transfer objects
//!
//! Request/response shapes for the HTTP API, shared by the server and CLI.

pub mod ai;
pub mod host;
pub mod pipeline;
pub mod schedule;
pub mod script;
pub mod user;
pub mod webhook;
