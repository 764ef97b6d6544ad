use crate::error::HangmanError;
use crate::session::{GameSession, GameStatus, GuessOutcome, start_new_session};
use crate::wordbank::WordEntry;
use rand::Rng;
use std::fmt;

/// What the player asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Hint,
    NewGame,
    Exit,
}

/// Tally of finished rounds for this run of the program.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub won: u32,
    pub lost: u32,
    pub abandoned: u32,
}

impl GameSummary {
    #[must_use]
    pub fn games_played(&self) -> u32 {
        self.won + self.lost
    }
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Won {}, lost {}, abandoned {}",
            self.won, self.lost, self.abandoned
        )
    }
}

/// Trait for game interfaces (CLI, TUI, etc.)
///
/// The game loop owns the session; an interface only renders what it is
/// handed and reports back what the player did.
pub trait GameInterface {
    /// Render the current board: masked phrase, tries left, guessed letters.
    fn display_session(&mut self, session: &GameSession);

    /// Wait for the next player action.
    ///
    /// `None` means the input could not be used and the interface has
    /// already told the player; the loop simply asks again.
    fn read_action(&mut self) -> Option<UserAction>;

    fn display_outcome(&mut self, guess: &str, outcome: GuessOutcome);

    fn display_hint(&mut self, hint: &str);

    /// Announce a won or lost round. On a loss the phrase is revealed.
    fn display_game_over(&mut self, session: &GameSession);

    /// `true` to start another round, `false` to quit.
    fn ask_play_again(&mut self) -> bool;

    fn display_new_game_message(&mut self);

    fn display_exit_message(&mut self, summary: &GameSummary);

    /// Tell the player why the game cannot go on. Called before the loop
    /// returns the error.
    fn display_error(&mut self, err: &HangmanError);
}

/// Message shown when a round ends.
#[must_use]
pub fn game_over_message(session: &GameSession) -> String {
    match session.status() {
        GameStatus::Won => "Congratulations! You guessed the movie!".to_string(),
        GameStatus::Lost => format!("Game Over! The movie was {}", session.phrase()),
        GameStatus::InProgress => String::new(),
    }
}

/// Closing line printed once the full-screen view has been torn down.
#[must_use]
pub fn farewell_message(summary: &GameSummary) -> String {
    format!("Thanks for playing! {summary}.")
}

/// Message shown after a guess is evaluated.
#[must_use]
pub fn outcome_message(guess: &str, outcome: GuessOutcome) -> String {
    match outcome {
        GuessOutcome::Repeat(letter) => format!("You already guessed the letter {letter}"),
        GuessOutcome::Hit(letter) => format!("Good job! {letter} is in the movie title!"),
        GuessOutcome::Miss(letter) => format!("{letter} is not in the movie title."),
        GuessOutcome::FullMatch => "You guessed the whole title!".to_string(),
        GuessOutcome::FullMismatch => format!(
            "{} is not the correct movie title.",
            guess.trim().to_uppercase()
        ),
        GuessOutcome::Invalid => {
            "Please enter a single letter or the full movie title.".to_string()
        }
    }
}

fn begin_round<R: Rng + ?Sized>(
    wordbank: &[WordEntry],
    rng: &mut R,
) -> Result<GameSession, HangmanError> {
    let session = start_new_session(wordbank, rng)?;
    log::info!(
        "New round: {} characters, {} attempts",
        session.phrase().chars().count(),
        session.attempts_remaining()
    );
    Ok(session)
}

/// Play rounds until the player quits.
///
/// Any error is shown through [`GameInterface::display_error`] before it is
/// returned.
///
/// # Errors
///
/// Returns [`HangmanError::EmptyWordBank`] if `wordbank` has no entries.
pub fn game_loop<R, I>(
    wordbank: &[WordEntry],
    rng: &mut R,
    interface: &mut I,
) -> Result<GameSummary, HangmanError>
where
    R: Rng + ?Sized,
    I: GameInterface + ?Sized,
{
    play_rounds(wordbank, rng, interface).inspect_err(|err| {
        log::error!("Game loop stopped: {err}");
        interface.display_error(err);
    })
}

fn play_rounds<R, I>(
    wordbank: &[WordEntry],
    rng: &mut R,
    interface: &mut I,
) -> Result<GameSummary, HangmanError>
where
    R: Rng + ?Sized,
    I: GameInterface + ?Sized,
{
    let mut summary = GameSummary::default();
    let mut session = begin_round(wordbank, rng)?;
    interface.display_session(&session);

    loop {
        let Some(action) = interface.read_action() else {
            continue;
        };
        log::debug!("Action: {action:?}");

        match action {
            UserAction::Exit => break,
            UserAction::NewGame => {
                summary.abandoned += 1;
                log::info!("Round abandoned");
                session = begin_round(wordbank, rng)?;
                interface.display_new_game_message();
                interface.display_session(&session);
            }
            UserAction::Hint => {
                let hint = session.reveal_hint();
                interface.display_hint(hint);
            }
            UserAction::Guess(raw) => {
                let outcome = session.guess(&raw)?;
                log::debug!(
                    "Outcome {outcome:?}, {} attempts left",
                    session.attempts_remaining()
                );
                interface.display_outcome(&raw, outcome);
                interface.display_session(&session);

                if !session.is_over() {
                    continue;
                }

                match session.status() {
                    GameStatus::Won => summary.won += 1,
                    GameStatus::Lost => summary.lost += 1,
                    GameStatus::InProgress => {}
                }
                log::info!("Round finished: {:?}", session.status());
                interface.display_game_over(&session);

                if !interface.ask_play_again() {
                    break;
                }
                session = begin_round(wordbank, rng)?;
                interface.display_new_game_message();
                interface.display_session(&session);
            }
        }
    }

    log::info!("Exiting. {summary}");
    interface.display_exit_message(&summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    /// Interface that replays scripted actions and records what it was shown.
    #[derive(Default)]
    struct ScriptedInterface {
        actions: VecDeque<Option<UserAction>>,
        play_again: VecDeque<bool>,
        boards: Vec<String>,
        outcomes: Vec<GuessOutcome>,
        hints: Vec<String>,
        game_overs: Vec<String>,
        new_games: usize,
        exit_summary: Option<GameSummary>,
        errors: Vec<String>,
    }

    impl ScriptedInterface {
        fn new(actions: Vec<Option<UserAction>>, play_again: Vec<bool>) -> Self {
            Self {
                actions: actions.into(),
                play_again: play_again.into(),
                ..Self::default()
            }
        }
    }

    impl GameInterface for ScriptedInterface {
        fn display_session(&mut self, session: &GameSession) {
            self.boards.push(session.display_phrase());
        }

        fn read_action(&mut self) -> Option<UserAction> {
            self.actions.pop_front().unwrap_or(Some(UserAction::Exit))
        }

        fn display_outcome(&mut self, _guess: &str, outcome: GuessOutcome) {
            self.outcomes.push(outcome);
        }

        fn display_hint(&mut self, hint: &str) {
            self.hints.push(hint.to_string());
        }

        fn display_game_over(&mut self, session: &GameSession) {
            self.game_overs.push(game_over_message(session));
        }

        fn ask_play_again(&mut self) -> bool {
            self.play_again.pop_front().unwrap_or(false)
        }

        fn display_new_game_message(&mut self) {
            self.new_games += 1;
        }

        fn display_exit_message(&mut self, summary: &GameSummary) {
            self.exit_summary = Some(*summary);
        }

        fn display_error(&mut self, err: &HangmanError) {
            self.errors.push(err.to_string());
        }
    }

    fn guess(raw: &str) -> Option<UserAction> {
        Some(UserAction::Guess(raw.to_string()))
    }

    fn single_entry_bank() -> Vec<WordEntry> {
        vec![WordEntry::new("DDLJ", "Iconic train-station scene")]
    }

    #[test]
    fn test_game_loop_empty_wordbank() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ui = ScriptedInterface::new(vec![], vec![]);
        let result = game_loop(&[], &mut rng, &mut ui);
        assert!(matches!(result, Err(HangmanError::EmptyWordBank)));
        assert!(ui.boards.is_empty());
        assert_eq!(
            ui.errors,
            vec![HangmanError::EmptyWordBank.to_string()]
        );
        assert!(ui.exit_summary.is_none());
    }

    #[test]
    fn test_game_loop_immediate_exit() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ui = ScriptedInterface::new(vec![Some(UserAction::Exit)], vec![]);
        let summary = game_loop(&single_entry_bank(), &mut rng, &mut ui).unwrap();
        assert_eq!(summary, GameSummary::default());
        assert_eq!(ui.boards, vec!["_ _ _ _".to_string()]);
        assert_eq!(ui.exit_summary, Some(GameSummary::default()));
        assert!(ui.errors.is_empty());
    }

    #[test]
    fn test_game_loop_win_then_quit() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ui = ScriptedInterface::new(
            vec![guess("d"), guess("L"), guess("j")],
            vec![false],
        );
        let summary = game_loop(&single_entry_bank(), &mut rng, &mut ui).unwrap();
        assert_eq!(summary.won, 1);
        assert_eq!(
            ui.outcomes,
            vec![
                GuessOutcome::Hit('D'),
                GuessOutcome::Hit('L'),
                GuessOutcome::Hit('J')
            ]
        );
        assert_eq!(ui.boards.last().map(String::as_str), Some("D D L J"));
        assert_eq!(
            ui.game_overs,
            vec!["Congratulations! You guessed the movie!".to_string()]
        );
    }

    #[test]
    fn test_game_loop_loss_reveals_phrase() {
        let mut rng = StdRng::seed_from_u64(1);
        let actions = ["Z", "X", "Q", "W", "E", "R"].into_iter().map(guess).collect();
        let mut ui = ScriptedInterface::new(actions, vec![false]);
        let summary = game_loop(&single_entry_bank(), &mut rng, &mut ui).unwrap();
        assert_eq!(summary.lost, 1);
        assert_eq!(
            ui.game_overs,
            vec!["Game Over! The movie was DDLJ".to_string()]
        );
    }

    #[test]
    fn test_game_loop_play_again_starts_fresh_round() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ui = ScriptedInterface::new(
            vec![guess("DDLJ"), guess("D"), Some(UserAction::Exit)],
            vec![true],
        );
        let summary = game_loop(&single_entry_bank(), &mut rng, &mut ui).unwrap();
        assert_eq!(summary.won, 1);
        assert_eq!(ui.new_games, 1);
        // Second round starts with nothing guessed, so D is a hit not a repeat.
        assert_eq!(ui.outcomes[1], GuessOutcome::Hit('D'));
    }

    #[test]
    fn test_game_loop_hint_costs_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ui = ScriptedInterface::new(
            vec![Some(UserAction::Hint), Some(UserAction::Hint), guess("D")],
            vec![],
        );
        game_loop(&single_entry_bank(), &mut rng, &mut ui).unwrap();
        assert_eq!(ui.hints.len(), 2);
        assert_eq!(ui.hints[0], "Iconic train-station scene");
        assert_eq!(ui.outcomes, vec![GuessOutcome::Hit('D')]);
    }

    #[test]
    fn test_game_loop_new_game_counts_abandoned() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ui = ScriptedInterface::new(
            vec![guess("Z"), Some(UserAction::NewGame), Some(UserAction::Exit)],
            vec![],
        );
        let summary = game_loop(&single_entry_bank(), &mut rng, &mut ui).unwrap();
        assert_eq!(summary.abandoned, 1);
        assert_eq!(summary.games_played(), 0);
        assert_eq!(ui.new_games, 1);
        assert_eq!(ui.boards.last().map(String::as_str), Some("_ _ _ _"));
    }

    #[test]
    fn test_game_loop_skips_unusable_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ui = ScriptedInterface::new(vec![None, None, guess("?")], vec![]);
        game_loop(&single_entry_bank(), &mut rng, &mut ui).unwrap();
        assert_eq!(ui.outcomes, vec![GuessOutcome::Invalid]);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            outcome_message("a", GuessOutcome::Hit('A')),
            "Good job! A is in the movie title!"
        );
        assert_eq!(
            outcome_message("swades", GuessOutcome::FullMismatch),
            "SWADES is not the correct movie title."
        );
        assert_eq!(
            outcome_message("", GuessOutcome::Invalid),
            "Please enter a single letter or the full movie title."
        );
    }

    #[test]
    fn test_summary_display() {
        let summary = GameSummary {
            won: 2,
            lost: 1,
            abandoned: 3,
        };
        assert_eq!(summary.to_string(), "Won 2, lost 1, abandoned 3");
        assert_eq!(summary.games_played(), 3);
        assert_eq!(
            farewell_message(&summary),
            "Thanks for playing! Won 2, lost 1, abandoned 3."
        );
    }
}
