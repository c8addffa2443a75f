//! AIOps Execution Engine
//!
//! Validates stored pipeline graphs, computes their execution order, and
//! walks them step by step, dispatching each node to the SSH command runner,
//! the AI analysis client, or the notification dispatcher.
//!
//! Architecture:
//! - `graph`: validation and topological ordering (Kahn's algorithm)
//! - `context`: the mutable carry-forward state shared across one run
//! - `executor`: the per-node dispatcher and its adapter traits
//! - `ssh`, `ai`, `notify`: production adapter implementations

pub mod ai;
pub mod context;
pub mod error;
pub mod executor;
pub mod graph;
pub mod notify;
pub mod ssh;

pub use context::RunContext;
pub use executor::{Analyzer, CommandRunner, Notifier, PipelineExecutor};
