use movie_hangman::cli::{Cli, CliInterface, parse_cli};
use movie_hangman::game_state::farewell_message;
use movie_hangman::logging::{default_log_path, init_logging};
use movie_hangman::tui::TuiInterface;
use movie_hangman::wordbank::{
    EMBEDDED_WORDBANK, WordEntry, default_wordbank_path, load_wordbank_from_file,
    load_wordbank_from_str,
};
use movie_hangman::{GameSummary, HangmanError, game_loop};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::process::ExitCode;

fn load_wordbank(cli: &Cli) -> Result<Vec<WordEntry>, HangmanError> {
    if let Some(path) = &cli.wordbank_path {
        log::info!("Loading word bank from {}", path.display());
        return load_wordbank_from_file(path);
    }

    if let Some(path) = default_wordbank_path()
        && path.is_file()
    {
        log::info!("Loading user word bank from {}", path.display());
        return load_wordbank_from_file(&path);
    }

    Ok(load_wordbank_from_str(EMBEDDED_WORDBANK))
}

fn run(cli: &Cli, wordbank: &[WordEntry]) -> Result<GameSummary, HangmanError> {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    if cli.plain {
        println!("Bollywood Hangman - loaded {} movie titles.", wordbank.len());
        let mut interface = CliInterface::new(io::stdin().lock());
        return game_loop(wordbank, &mut rng, &mut interface);
    }

    // The terminal is restored when the interface drops at the end of this block.
    let mut interface = TuiInterface::new()?;
    game_loop(wordbank, &mut rng, &mut interface)
}

fn main() -> ExitCode {
    let cli = parse_cli();

    if let Some(path) = cli.log_file.clone().or_else(default_log_path)
        && let Err(e) = init_logging(&path)
    {
        eprintln!("Could not open log file '{}': {e}", path.display());
    }

    let wordbank = match load_wordbank(&cli) {
        Ok(wordbank) => wordbank,
        Err(e) => {
            log::error!("Could not load word bank: {e}");
            eprintln!("Error: could not load word bank: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Loaded {} titles", wordbank.len());

    match run(&cli, &wordbank) {
        Ok(summary) => {
            if !cli.plain {
                println!("{}", farewell_message(&summary));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Fatal: {e}");
            // The console already printed it; the full-screen view is gone by now.
            if !cli.plain {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}
