//! Progress notification port
//!
//! Implementations live in the presentation layer (console progress bars);
//! use cases call these hooks as parallel model calls complete.

/// Which stage of the deliberation flow is reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Initial answers from the council
    Responses,
    /// Judges ranking the answers
    Rankings,
    /// Refinement round 2+
    Deliberation(u32),
}

impl Stage {
    pub fn label(&self) -> String {
        match self {
            Stage::Responses => "Collecting responses".to_string(),
            Stage::Rankings => "Collecting rankings".to_string(),
            Stage::Deliberation(round) => format!("Deliberation round {}", round),
        }
    }
}

/// Callback for progress updates during use case execution
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts, with the number of model calls it will make
    fn on_stage_start(&self, stage: Stage, total_tasks: usize);

    /// Called when one model call within a stage finishes
    fn on_task_complete(&self, stage: Stage, model: &str, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: Stage);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage, _total_tasks: usize) {}
    fn on_task_complete(&self, _stage: Stage, _model: &str, _success: bool) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_labels() {
        assert_eq!(Stage::Responses.label(), "Collecting responses");
        assert_eq!(Stage::Deliberation(3).label(), "Deliberation round 3");
    }
}
