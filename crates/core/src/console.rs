use async_trait::async_trait;

/// Why a console could not deliver a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadError {
    /// The input has no more lines.
    Exhausted,
    /// The human asked to stop.
    Interrupted,
}

/// The human side of a session.
///
/// Besides reading lines, a console is told about the visual structure of
/// the conversation and about text streamed from the completion service.
/// All the notification methods do nothing by default.
#[async_trait]
pub trait Console: Send {
    /// Shows `prompt` and waits for one line of input.
    ///
    /// The returned line has its line terminator removed and is otherwise
    /// untouched, so whitespace-only input is not empty.
    async fn read_line(&mut self, prompt: &str) -> Result<String, ReadError>;

    /// Called once after the system prompt has been recorded.
    fn separator(&mut self) {}

    /// Called after each user or assistant turn.
    fn turn_break(&mut self) {}

    /// Called right before the completion service is polled.
    fn completion_started(&mut self) {}

    /// Called for every piece of text streamed by the completion service.
    fn completion_delta(&mut self, _delta: &str) {}

    /// Called when polling has finished, whether it succeeded or not, and
    /// also when [`Session::run_until`] cuts polling short.
    ///
    /// [`Session::run_until`]: crate::Session::run_until
    fn completion_finished(&mut self) {}
}
