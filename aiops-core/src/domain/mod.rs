//! Core domain types
//!
//! This module contains the core domain structures used across AIOps services.
//! These types represent the fundamental business entities and are shared
//! between the server (for persistence) and the engine (for execution).

pub mod host;
pub mod pipeline;
pub mod run;
pub mod schedule;
pub mod script;
pub mod settings;
pub mod user;
