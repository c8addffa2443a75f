//! Run context
//!
//! The mutable carry-forward state shared across nodes within one run.
//! The most recent script step writes here; later action nodes (analysis,
//! notification) read from it. Scoped to one run and discarded after.

/// Typed carry-forward state for a single pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Content of the most recently executed script node
    pub last_script: String,
    /// Stdout captured from the most recent script step
    pub last_output: String,
    /// Stderr or connection error from the most recent script step
    pub last_error: String,
    /// Text returned by the most recent AI analysis step
    pub last_analysis: String,
}

impl RunContext {
    /// Records the outcome of a script step
    pub fn record_script(&mut self, script: &str, output: &str, error: &str) {
        self.last_script = script.to_string();
        self.last_output = output.to_string();
        self.last_error = error.to_string();
    }

    /// True once at least one script step has run
    pub fn has_script(&self) -> bool {
        !self.last_script.is_empty()
    }
}
