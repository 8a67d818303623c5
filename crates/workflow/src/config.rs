use brieflink_core::matching::DEFAULT_RECOMMENDATION_WINDOW;

/// Tunables for the workflow services.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// How many recent open briefs a manufacturer-side recommendation scans.
    pub recommendation_window: i64,
    /// Reject the remaining pending proposals on a brief once one is accepted.
    pub close_sibling_proposals: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            recommendation_window: DEFAULT_RECOMMENDATION_WINDOW,
            close_sibling_proposals: true,
        }
    }
}

impl WorkflowConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                            | Default |
    /// |------------------------------------|---------|
    /// | `WORKFLOW_RECOMMENDATION_WINDOW`   | `50`    |
    /// | `WORKFLOW_CLOSE_SIBLING_PROPOSALS` | `true`  |
    pub fn from_env() -> Self {
        let recommendation_window: i64 = std::env::var("WORKFLOW_RECOMMENDATION_WINDOW")
            .unwrap_or_else(|_| DEFAULT_RECOMMENDATION_WINDOW.to_string())
            .parse()
            .expect("WORKFLOW_RECOMMENDATION_WINDOW must be a valid i64");
        assert!(
            recommendation_window > 0,
            "WORKFLOW_RECOMMENDATION_WINDOW must be positive"
        );

        let close_sibling_proposals: bool = std::env::var("WORKFLOW_CLOSE_SIBLING_PROPOSALS")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("WORKFLOW_CLOSE_SIBLING_PROPOSALS must be true or false");

        Self {
            recommendation_window,
            close_sibling_proposals,
        }
    }
}
