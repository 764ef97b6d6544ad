use thiserror::Error;

/// Errors raised by the hangman core and its front-ends.
///
/// A malformed guess is not an error: it comes back as
/// [`GuessOutcome::Invalid`](crate::session::GuessOutcome::Invalid).
#[derive(Debug, Error)]
pub enum HangmanError {
    #[error("word bank is empty, nothing to guess")]
    EmptyWordBank,

    #[error("the game is already over, start a new one to keep guessing")]
    SessionOver,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
