use crate::error::HangmanError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

const FIELD_SEPARATOR: char = '|';
const COMMENT_PREFIX: char = '#';

/// A secret phrase and the clue that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    phrase: String,
    hint: String,
}

impl WordEntry {
    /// Build an entry, upper-casing the phrase and trimming both fields.
    ///
    /// The phrase is not validated. Only ASCII letters can be guessed, so any
    /// other character stays masked for the whole round and the phrase can
    /// never be guessed whole. Use [`WordEntry::try_new`] for untrusted input.
    pub fn new(phrase: impl AsRef<str>, hint: impl AsRef<str>) -> Self {
        Self {
            phrase: phrase.as_ref().trim().to_uppercase(),
            hint: hint.as_ref().trim().to_string(),
        }
    }

    /// Like [`WordEntry::new`], but `None` unless the phrase is ASCII letters
    /// separated by single spaces and the hint is not blank.
    #[must_use]
    pub fn try_new(phrase: impl AsRef<str>, hint: impl AsRef<str>) -> Option<Self> {
        let entry = Self::new(phrase, hint);
        (is_valid_phrase(&entry.phrase) && !entry.hint.is_empty()).then_some(entry)
    }

    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub(crate) fn into_parts(self) -> (String, String) {
        (self.phrase, self.hint)
    }
}

fn is_valid_phrase(phrase: &str) -> bool {
    phrase.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
        && phrase.chars().any(|c| c.is_ascii_alphabetic())
        && !phrase.contains("  ")
}

/// Parse one `PHRASE|hint` line. Blank lines and comments yield `None`.
fn parse_line(line: &str) -> Option<WordEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return None;
    }

    let Some((phrase, hint)) = line.split_once(FIELD_SEPARATOR) else {
        log::warn!("Skipping word bank line without a hint: '{line}'");
        return None;
    };

    let entry = WordEntry::try_new(phrase, hint);
    if entry.is_none() {
        log::warn!("Skipping malformed word bank line: '{line}'");
    }
    entry
}

pub fn load_wordbank_from_str(data: &str) -> Vec<WordEntry> {
    data.lines().filter_map(parse_line).collect()
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<WordEntry>, HangmanError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();
    for line in reader.lines() {
        if let Some(entry) = parse_line(&line?) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// User word bank location, e.g. `~/.config/movie-hangman/wordbank.txt`.
#[must_use]
pub fn default_wordbank_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("movie-hangman").join("wordbank.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_wordbank_is_usable() {
        let entries = load_wordbank_from_str(EMBEDDED_WORDBANK);
        assert!(!entries.is_empty());
        let content_lines = EMBEDDED_WORDBANK
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with(COMMENT_PREFIX))
            .count();
        assert_eq!(entries.len(), content_lines);
        assert!(entries.iter().all(|e| is_valid_phrase(e.phrase())));
        assert!(entries.iter().all(|e| !e.hint().is_empty()));
    }

    #[test]
    fn test_load_wordbank_uppercases_and_trims() {
        let entries = load_wordbank_from_str("  ddlj |  Iconic train-station scene \n");
        assert_eq!(entries, vec![WordEntry::new("DDLJ", "Iconic train-station scene")]);
        assert_eq!(entries[0].phrase(), "DDLJ");
        assert_eq!(entries[0].hint(), "Iconic train-station scene");
    }

    #[test]
    fn test_load_wordbank_skips_comments_and_blanks() {
        let data = "# classics\n\nSHOLAY|Gabbar Singh\n   \nLAGAAN|Cricket against the Raj\n";
        let entries = load_wordbank_from_str(data);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].phrase(), "LAGAAN");
    }

    #[test]
    fn test_load_wordbank_skips_malformed_lines() {
        let data = "NOHINT\nRA.ONE|Superhero game\n|No phrase\nDON|\n3 IDIOTS|Engineering college\nKAL  HO|Double space\nPK|Alien on Earth\n";
        let entries = load_wordbank_from_str(data);
        assert_eq!(entries, vec![WordEntry::new("PK", "Alien on Earth")]);
    }

    #[test]
    fn test_try_new_validates_entries() {
        assert_eq!(
            WordEntry::try_new(" kal ho naa ho ", " Tomorrow "),
            Some(WordEntry::new("KAL HO NAA HO", "Tomorrow"))
        );
        assert_eq!(WordEntry::try_new("3 IDIOTS", "Engineering college"), None);
        assert_eq!(WordEntry::try_new("RA.ONE", "Superhero game"), None);
        assert_eq!(WordEntry::try_new("   ", "Nothing"), None);
        assert_eq!(WordEntry::try_new("DON", "  "), None);
        // The unchecked constructor keeps whatever it is given
        assert_eq!(WordEntry::new("3 IDIOTS", "Engineering college").phrase(), "3 IDIOTS");
    }

    #[test]
    fn test_load_wordbank_keeps_multi_word_titles() {
        let entries = load_wordbank_from_str("Kal Ho Naa Ho|Tomorrow may never come");
        assert_eq!(entries[0].phrase(), "KAL HO NAA HO");
    }

    #[test]
    fn test_load_wordbank_hint_may_contain_separator() {
        let entries = load_wordbank_from_str("DON|Catching him is hard|impossible");
        assert_eq!(entries[0].hint(), "Catching him is hard|impossible");
    }

    #[test]
    fn test_load_wordbank_from_file() {
        let path = std::env::temp_dir().join("movie_hangman_wordbank_unit.txt");
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "queen|A solo honeymoon").unwrap();
            writeln!(file, "bad line").unwrap();
            writeln!(file, "barfi|A mute charmer").unwrap();
        }
        let entries = load_wordbank_from_file(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].phrase(), "QUEEN");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_wordbank_from_missing_file() {
        let result = load_wordbank_from_file("/definitely/not/a/real/wordbank.txt");
        assert!(matches!(result, Err(HangmanError::Io(_))));
    }

    #[test]
    fn test_default_wordbank_path_shape() {
        if let Some(path) = default_wordbank_path() {
            assert!(path.ends_with("movie-hangman/wordbank.txt"));
        }
    }
}
