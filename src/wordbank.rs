use crate::error::{GameError, Result};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const EMBEDDED_EASY: &str = include_str!("resources/easy.txt");
pub const EMBEDDED_MEDIUM: &str = include_str!("resources/medium.txt");
pub const EMBEDDED_HARD: &str = include_str!("resources/hard.txt");

/// Word list tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" | "1" => Ok(Self::Easy),
            "medium" | "med" | "m" | "2" => Ok(Self::Medium),
            "hard" | "h" | "3" => Ok(Self::Hard),
            other => Err(GameError::InvalidDifficulty(other.to_string())),
        }
    }
}

/// A secret word: non-empty, lowercase ASCII letters only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word(String);

impl Word {
    /// Trims and lowercases `raw`, rejecting anything that is not purely alphabetic.
    pub fn parse(raw: &str) -> Result<Self> {
        let word = raw.trim().to_lowercase();
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GameError::InvalidWord(raw.to_string()));
        }
        Ok(Self(word))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, letter: char) -> bool {
        self.0.contains(letter)
    }

    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate words for each difficulty tier.
#[derive(Debug, Clone, Default)]
pub struct WordBank {
    tiers: [Vec<Word>; 3],
}

impl WordBank {
    /// The bank compiled into the binary.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            tiers: [
                load_wordbank_from_str(EMBEDDED_EASY),
                load_wordbank_from_str(EMBEDDED_MEDIUM),
                load_wordbank_from_str(EMBEDDED_HARD),
            ],
        }
    }

    /// Builds a bank from raw lists, dropping entries that are not valid words.
    #[must_use]
    pub fn from_lists(easy: &[&str], medium: &[&str], hard: &[&str]) -> Self {
        let normalize = |list: &[&str]| -> Vec<Word> {
            list.iter().filter_map(|raw| parse_entry(raw)).collect()
        };
        Self {
            tiers: [normalize(easy), normalize(medium), normalize(hard)],
        }
    }

    /// Parses a sectioned word file:
    ///
    /// ```text
    /// [easy]
    /// cat
    /// [hard]
    /// rhythm
    /// ```
    ///
    /// Blank lines and `#` comments are ignored. Lines outside a section or
    /// that are not purely alphabetic are skipped.
    pub fn from_sections_str(data: &str) -> Result<Self> {
        let mut bank = Self::default();
        let mut current: Option<Difficulty> = None;

        for (line_no, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = Some(name.parse()?);
                continue;
            }
            let Some(difficulty) = current else {
                log::warn!("Skipping '{line}' on line {}: no [difficulty] section", line_no + 1);
                continue;
            };
            if let Some(word) = parse_entry(line) {
                bank.tiers[difficulty.index()].push(word);
            }
        }

        Ok(bank)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_sections_str(&data)
    }

    /// Draws one word uniformly at random from the tier.
    pub fn pick<R: Rng + ?Sized>(&self, difficulty: Difficulty, rng: &mut R) -> Result<Word> {
        self.words(difficulty).choose(rng).cloned().ok_or_else(|| {
            GameError::InvalidDifficulty(format!("{difficulty} (no words configured)"))
        })
    }

    #[must_use]
    pub fn words(&self, difficulty: Difficulty) -> &[Word] {
        &self.tiers[difficulty.index()]
    }

    /// Total number of words across all tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loads one tier's list: one word per line, `#` comments allowed.
#[must_use]
pub fn load_wordbank_from_str(data: &str) -> Vec<Word> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_entry)
        .collect()
}

fn parse_entry(raw: &str) -> Option<Word> {
    match Word::parse(raw) {
        Ok(word) => Some(word),
        Err(e) => {
            log::warn!("Skipping word bank entry: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_word_parse_trims_and_lowercases() {
        let word = Word::parse(" Banana ").unwrap();
        assert_eq!(word.as_str(), "banana");
        assert_eq!(word.len(), 6);
    }

    #[test]
    fn test_word_parse_rejects_malformed() {
        assert!(Word::parse("").is_err());
        assert!(Word::parse("   ").is_err());
        assert!(Word::parse("ice cream").is_err());
        assert!(Word::parse("r2d2").is_err());
        assert!(Word::parse("café").is_err());
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("MED".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("3".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!(matches!(
            "expert".parse::<Difficulty>(),
            Err(GameError::InvalidDifficulty(_))
        ));
    }

    #[test]
    fn test_embedded_bank_has_every_tier() {
        let bank = WordBank::embedded();
        for difficulty in Difficulty::ALL {
            assert!(!bank.words(difficulty).is_empty(), "{difficulty} is empty");
        }
    }

    #[test]
    fn test_embedded_words_are_normalized() {
        let bank = WordBank::embedded();
        for difficulty in Difficulty::ALL {
            for word in bank.words(difficulty) {
                assert!(word.letters().all(|c| c.is_ascii_lowercase()), "{word}");
            }
        }
    }

    #[test]
    fn test_load_wordbank_from_str_normalizes() {
        let words = load_wordbank_from_str("apple\n banana\n# comment\n\nKIWI\nwater melon");
        let words: Vec<&str> = words.iter().map(Word::as_str).collect();
        assert_eq!(words, vec!["apple", "banana", "kiwi"]);
    }

    #[test]
    fn test_from_sections_str() {
        let data = "orphan\n[easy]\ncat\ndog\n\n[hard]\n# rare letters\nrhythm\n";
        let bank = WordBank::from_sections_str(data).unwrap();
        assert_eq!(bank.words(Difficulty::Easy).len(), 2);
        assert!(bank.words(Difficulty::Medium).is_empty());
        assert_eq!(bank.words(Difficulty::Hard)[0].as_str(), "rhythm");
        assert_eq!(bank.len(), 3);
    }

    #[test]
    fn test_from_sections_str_unknown_section() {
        let result = WordBank::from_sections_str("[impossible]\ncat\n");
        assert!(matches!(result, Err(GameError::InvalidDifficulty(_))));
    }

    #[test]
    fn test_pick_draws_from_requested_tier() {
        let bank = WordBank::from_lists(&["cat"], &["banana"], &["rhythm"]);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(bank.pick(Difficulty::Easy, &mut rng).unwrap().as_str(), "cat");
        assert_eq!(bank.pick(Difficulty::Medium, &mut rng).unwrap().as_str(), "banana");
        assert_eq!(bank.pick(Difficulty::Hard, &mut rng).unwrap().as_str(), "rhythm");
    }

    #[test]
    fn test_pick_covers_whole_list() {
        let bank = WordBank::from_lists(&["cat", "dog", "cow"], &[], &[]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(bank.pick(Difficulty::Easy, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_pick_empty_tier_fails() {
        let bank = WordBank::from_lists(&["cat"], &[], &[]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            bank.pick(Difficulty::Hard, &mut rng),
            Err(GameError::InvalidDifficulty(_))
        ));
    }
}
