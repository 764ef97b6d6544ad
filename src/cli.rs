use crate::error::HangmanError;
use crate::game_state::{
    GameInterface, GameSummary, UserAction, game_over_message, outcome_message,
};
use crate::session::{GameSession, GuessOutcome};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

/// Movie Hangman CLI options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a word bank file with one `PHRASE|hint` entry per line
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<PathBuf>,

    /// Seed for picking titles, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the line-based console instead of the full-screen interface
    #[arg(long)]
    pub plain: bool,

    /// Where to write the log file
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Console commands start with this, so no movie title can be mistaken for one.
const COMMAND_PREFIX: char = ':';

/// Map one line of console input to an action.
///
/// Commands are matched case-insensitively; anything else is handed to the
/// session as a guess so it can classify it.
fn parse_action(line: &str) -> UserAction {
    let input = line.trim();
    if input == "?" {
        return UserAction::Hint;
    }
    let Some(command) = input.strip_prefix(COMMAND_PREFIX) else {
        return UserAction::Guess(input.to_string());
    };
    match command.trim().to_uppercase().as_str() {
        "EXIT" | "QUIT" => UserAction::Exit,
        "NEW" | "NEXT" => UserAction::NewGame,
        "HINT" => UserAction::Hint,
        // Unknown command: let the session reject it as an invalid guess
        _ => UserAction::Guess(input.to_string()),
    }
}

fn parse_yes_no(line: &str) -> Option<bool> {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// CLI implementation of the `GameInterface` trait
/// This struct wraps a `BufRead` reader and prints to stdout.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read one line, `None` at end of input or on a read error.
    fn read_line(&mut self) -> Option<String> {
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input),
            Err(e) => {
                log::warn!("Failed to read input: {e}");
                None
            }
        }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_session(&mut self, session: &GameSession) {
        println!();
        println!("Movie: {}", session.display_phrase());
        let guessed: Vec<String> = session.sorted_guessed_letters().map(String::from).collect();
        println!("Guessed letters: {}", guessed.join(" "));
        println!("Tries left: {}", session.attempts_remaining());
    }

    fn read_action(&mut self) -> Option<UserAction> {
        println!("\nEnter a letter or the full movie title (':hint' or '?', ':new', ':exit'):");
        match self.read_line() {
            Some(line) => Some(parse_action(&line)),
            None => Some(UserAction::Exit),
        }
    }

    fn display_outcome(&mut self, guess: &str, outcome: GuessOutcome) {
        println!("{}", outcome_message(guess, outcome));
    }

    fn display_hint(&mut self, hint: &str) {
        println!("Hint: {hint}");
    }

    fn display_game_over(&mut self, session: &GameSession) {
        println!("\n{}", game_over_message(session));
    }

    fn ask_play_again(&mut self) -> bool {
        loop {
            println!("Do you want to play again? (y/n)");
            let Some(line) = self.read_line() else {
                return false;
            };
            if let Some(answer) = parse_yes_no(&line) {
                return answer;
            }
            println!("Please answer y or n.");
        }
    }

    fn display_new_game_message(&mut self) {
        println!("\nA new game has started!");
    }

    fn display_exit_message(&mut self, summary: &GameSummary) {
        println!("Exiting. {summary}.");
    }

    fn display_error(&mut self, err: &HangmanError) {
        eprintln!("Error: {err}");
    }
}
