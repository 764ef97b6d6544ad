//! Game session: the hangman rules, independent of any front-end.
//!
//! A [`GameSession`] holds one round's secret phrase and the guesses made so
//! far. It is mutated only through [`GameSession::guess`]; starting over means
//! building a fresh session with [`start_new_session`].
//!
//! # State Machine
//! - `InProgress` → `Won` when every letter is uncovered or the whole phrase
//!   is guessed at once
//! - `InProgress` → `Lost` when the attempts run out
//! - `Won` and `Lost` are terminal

use crate::error::HangmanError;
use crate::wordbank::WordEntry;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::BTreeSet;

/// Wrong guesses allowed before the round is lost.
pub const MAX_ATTEMPTS: u8 = 6;

const PLACEHOLDER: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// Classified result of a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Letter was already guessed; nothing changed.
    Repeat(char),
    Hit(char),
    /// Letter is not in the phrase; one attempt spent.
    Miss(char),
    FullMatch,
    /// Whole-phrase guess was wrong; one attempt spent.
    FullMismatch,
    /// Neither a letter nor a phrase-length guess; nothing changed.
    Invalid,
}

impl GuessOutcome {
    /// Whether this outcome cost an attempt.
    #[must_use]
    pub fn is_wrong(self) -> bool {
        matches!(self, Self::Miss(_) | Self::FullMismatch)
    }
}

/// Draw a random entry from `wordbank` and start a round with it.
///
/// # Errors
///
/// Returns [`HangmanError::EmptyWordBank`] if there is nothing to draw.
pub fn start_new_session<R: Rng + ?Sized>(
    wordbank: &[WordEntry],
    rng: &mut R,
) -> Result<GameSession, HangmanError> {
    wordbank
        .choose(rng)
        .cloned()
        .map(GameSession::new)
        .ok_or(HangmanError::EmptyWordBank)
}

#[derive(Debug, Clone)]
pub struct GameSession {
    phrase: String,
    hint: String,
    attempts_remaining: u8,
    guessed_letters: BTreeSet<char>,
    phrase_guessed: bool,
    hint_revealed: bool,
}

impl GameSession {
    #[must_use]
    pub fn new(entry: WordEntry) -> Self {
        let (phrase, hint) = entry.into_parts();
        Self {
            phrase,
            hint,
            attempts_remaining: MAX_ATTEMPTS,
            guessed_letters: BTreeSet::new(),
            phrase_guessed: false,
            hint_revealed: false,
        }
    }

    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    #[must_use]
    pub fn attempts_remaining(&self) -> u8 {
        self.attempts_remaining
    }

    #[must_use]
    pub fn max_attempts(&self) -> u8 {
        MAX_ATTEMPTS
    }

    /// Guessed letters in alphabetical order.
    pub fn sorted_guessed_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.guessed_letters.iter().copied()
    }

    #[must_use]
    pub fn has_guessed(&self, letter: char) -> bool {
        self.guessed_letters.contains(&letter.to_ascii_uppercase())
    }

    /// Guessed letters that are not in the phrase, alphabetically.
    #[must_use]
    pub fn wrong_letters(&self) -> Vec<char> {
        self.guessed_letters
            .iter()
            .copied()
            .filter(|c| !self.phrase.contains(*c))
            .collect()
    }

    #[must_use]
    pub fn hint_revealed(&self) -> bool {
        self.hint_revealed
    }

    /// The hint is free: it costs no attempt and can be asked for repeatedly.
    pub fn reveal_hint(&mut self) -> &str {
        self.hint_revealed = true;
        &self.hint
    }

    /// One output character per phrase character: spaces and guessed letters
    /// show through, everything else becomes `_`.
    #[must_use]
    pub fn masked_phrase(&self) -> String {
        self.phrase
            .chars()
            .map(|c| {
                if c == ' ' || self.guessed_letters.contains(&c) {
                    c
                } else {
                    PLACEHOLDER
                }
            })
            .collect()
    }

    /// Masked phrase spaced out for display, e.g. `D _ D _`.
    ///
    /// After a correct whole-phrase guess the phrase is shown as is.
    #[must_use]
    pub fn display_phrase(&self) -> String {
        if self.phrase_guessed {
            return self.phrase.clone();
        }
        let masked: Vec<String> = self.masked_phrase().chars().map(String::from).collect();
        masked.join(" ")
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.phrase_guessed || self.all_letters_guessed() {
            GameStatus::Won
        } else if self.attempts_remaining == 0 {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status() != GameStatus::InProgress
    }

    /// Evaluate a raw guess.
    ///
    /// Input is trimmed and upper-cased, then classified as a single letter,
    /// a whole-phrase guess (same length as the phrase, letters and spaces
    /// only) or invalid. A one-letter phrase is always guessed letter-wise.
    ///
    /// # Errors
    ///
    /// Returns [`HangmanError::SessionOver`] once the round is won or lost.
    pub fn guess(&mut self, raw: &str) -> Result<GuessOutcome, HangmanError> {
        if self.is_over() {
            return Err(HangmanError::SessionOver);
        }

        let input = raw.trim().to_uppercase();
        let mut chars = input.chars();
        let outcome = match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_alphabetic() => self.guess_letter(letter),
            _ if self.is_phrase_attempt(&input) => self.guess_phrase(&input),
            _ => GuessOutcome::Invalid,
        };
        Ok(outcome)
    }

    fn guess_letter(&mut self, letter: char) -> GuessOutcome {
        if !self.guessed_letters.insert(letter) {
            GuessOutcome::Repeat(letter)
        } else if self.phrase.contains(letter) {
            GuessOutcome::Hit(letter)
        } else {
            self.spend_attempt();
            GuessOutcome::Miss(letter)
        }
    }

    fn guess_phrase(&mut self, input: &str) -> GuessOutcome {
        if input == self.phrase {
            self.phrase_guessed = true;
            GuessOutcome::FullMatch
        } else {
            self.spend_attempt();
            GuessOutcome::FullMismatch
        }
    }

    fn is_phrase_attempt(&self, input: &str) -> bool {
        input.chars().count() == self.phrase.chars().count()
            && input.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
            && input.chars().any(|c| c.is_ascii_alphabetic())
    }

    fn spend_attempt(&mut self) {
        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
    }

    fn all_letters_guessed(&self) -> bool {
        self.phrase
            .chars()
            .filter(char::is_ascii_alphabetic)
            .all(|c| self.guessed_letters.contains(&c))
    }
}
