//! Dispatch configuration for a workflow.

/// Settings shared by every instance of a workflow.
///
/// # Example
///
/// ```rust
/// use typeflow::engine::WorkflowConfig;
///
/// let config = WorkflowConfig::default().max_epsilon_steps(64);
/// assert_eq!(config.epsilon_limit(), Some(64));
/// assert_eq!(WorkflowConfig::default().epsilon_limit(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkflowConfig {
    max_epsilon_steps: Option<usize>,
}

impl WorkflowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of epsilon transitions chained after one external
    /// input. Unbounded by default.
    pub fn max_epsilon_steps(mut self, steps: usize) -> Self {
        self.max_epsilon_steps = Some(steps);
        self
    }

    pub fn epsilon_limit(&self) -> Option<usize> {
        self.max_epsilon_steps
    }
}
