use routine_core::{ApplyReport, RoutineState};

/// Render notifications. Front-ends subscribe and redraw what changed.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    UserMessage { content: String },
    /// Shown in place of the reply until it arrives.
    AssistantPending { placeholder: String },
    AssistantReplied { content: String, report: ApplyReport },
    /// Replaces the placeholder when the reply could not be fetched.
    AssistantFailed { notice: String },
    RoutineChanged { routine: RoutineState },
}
