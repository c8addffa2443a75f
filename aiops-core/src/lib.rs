//! AIOps Core
//!
//! Core types and abstractions for the AIOps Runner platform.
//!
//! This crate contains:
//! - Domain types: Core business entities (Host, Script, Pipeline, etc.)
//! - DTOs: Data transfer objects for API communication

pub mod domain;
pub mod dto;
