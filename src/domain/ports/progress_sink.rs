use crate::domain::models::ProgressMessage;

/// Consumer-side renderer of the progress stream.
///
/// The orchestrator calls this from its single drain loop, so implementations
/// need no synchronization. Messages arrive interleaved across trials but in
/// order within one trial.
pub trait ProgressSink {
    fn on_message(&mut self, message: &ProgressMessage);

    /// Called once after the last sentinel has been observed.
    fn on_finished(&mut self) {}
}

/// Sink that discards every message (JSON mode, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_message(&mut self, _message: &ProgressMessage) {}
}
