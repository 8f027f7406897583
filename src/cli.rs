use crate::error::GameError;
use crate::game_state::{BodyPart, RoundStatus, Snapshot, TIME_BUDGET_SECS, parse_guess};
use crate::session::{GameInterface, UserAction};
use crate::wordbank::Difficulty;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

/// Hangman in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a word bank file with [easy], [medium] and [hard] sections
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<PathBuf>,

    /// Difficulty of the first word (easy, medium, hard)
    #[arg(short, long, default_value = "medium", value_parser = parse_difficulty)]
    pub difficulty: Difficulty,

    /// Seconds on the clock for each word
    #[arg(
        short,
        long = "time-limit",
        default_value_t = TIME_BUDGET_SECS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub time_limit: u32,

    /// Seed for reproducible word and hint choices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the line-based interface instead of the full-screen one (the clock is
    /// only checked after each line of input, so a timeout shows on the next entry)
    #[arg(long)]
    pub plain: bool,

    /// Where to write the log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    s.parse().map_err(|e: GameError| e.to_string())
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

pub fn parse_command(input: &str) -> Result<UserAction, GameError> {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "exit" | "quit" => Ok(UserAction::Exit),
        "hint" => Ok(UserAction::Hint),
        "reveal" => Ok(UserAction::Reveal),
        "next" => Ok(UserAction::Next),
        "restart" => Ok(UserAction::Restart),
        "easy" | "medium" | "hard" => input.parse().map(UserAction::Difficulty),
        _ => parse_guess(&input).map(UserAction::Guess),
    }
}

pub fn read_action<R: BufRead>(reader: &mut R) -> Option<UserAction> {
    println!("\nGuess a letter (or hint, reveal, next, restart, easy/medium/hard, exit):");
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) => return Some(UserAction::Exit),
        Ok(_) => {}
        Err(e) => {
            println!("Failed to read input: {e}");
            return Some(UserAction::Exit);
        }
    }

    match parse_command(&input) {
        Ok(action) => Some(action),
        Err(e) => {
            println!("{e}");
            None
        }
    }
}

#[must_use]
pub fn format_pattern(snapshot: &Snapshot) -> String {
    snapshot
        .pattern
        .iter()
        .map(|slot| slot.unwrap_or('_').to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn display_snapshot(snapshot: &Snapshot) {
    println!("Word:    {}", format_pattern(snapshot));
    let guessed: String = snapshot.guessed.iter().collect();
    println!("Guessed: {guessed}");
    println!(
        "Mistakes: {} (streak {}/{})  Score: {}  Time left: {}s",
        snapshot.mistakes, snapshot.streak, snapshot.max_mistakes, snapshot.score, snapshot.time_left
    );
    if snapshot.hint_available {
        println!("A hint is available.");
    }
    match snapshot.status {
        RoundStatus::InProgress => {}
        RoundStatus::Won => println!("You won! Type 'next' for another word."),
        RoundStatus::Lost => {
            let answer = snapshot.answer.as_deref().unwrap_or("?");
            println!("Round lost. The word was '{answer}'. Type 'next' or 'restart'.");
        }
    }
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// Line-based implementation of the GameInterface trait
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn read_action(&mut self) -> Option<UserAction> {
        read_action(&mut self.reader)
    }

    fn render(&mut self, snapshot: &Snapshot) {
        display_snapshot(snapshot);
    }

    fn draw_part(&mut self, part: BodyPart) {
        println!("The hangman gains a {}.", part.name());
    }

    fn guess_feedback(&mut self, letter: char, correct: bool) {
        if correct {
            println!("Yes, '{letter}' is in the word.");
        } else {
            println!("No '{letter}' in the word.");
        }
    }

    fn display_message(&mut self, message: &str) {
        println!("{message}");
    }

    fn display_error(&mut self, error: &GameError) {
        println!("{error}");
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["hangman"]).unwrap();
        assert_eq!(cli.wordbank_path, None);
        assert_eq!(cli.difficulty, Difficulty::Medium);
        assert_eq!(cli.time_limit, TIME_BUDGET_SECS);
        assert!(!cli.plain);
    }

    #[test]
    fn test_parse_cli_with_options() {
        let cli = Cli::try_parse_from([
            "hangman", "-i", "words.txt", "-d", "hard", "-t", "90", "--seed", "4", "--plain",
        ])
        .unwrap();
        assert_eq!(cli.wordbank_path, Some(PathBuf::from("words.txt")));
        assert_eq!(cli.difficulty, Difficulty::Hard);
        assert_eq!(cli.time_limit, 90);
        assert_eq!(cli.seed, Some(4));
        assert!(cli.plain);
    }

    #[test]
    fn test_parse_cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["hangman", "-d", "nightmare"]).is_err());
        assert!(Cli::try_parse_from(["hangman", "-t", "0"]).is_err());
    }

    #[test]
    fn test_plain_help_mentions_clock_check() {
        use clap::CommandFactory;
        let command = Cli::command();
        let plain = command
            .get_arguments()
            .find(|arg| arg.get_id() == "plain")
            .unwrap();
        let help = plain.get_help().unwrap().to_string();
        assert!(help.contains("only checked after each line of input"));
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("A").unwrap(), UserAction::Guess('a'));
        assert_eq!(parse_command(" hint ").unwrap(), UserAction::Hint);
        assert_eq!(parse_command("REVEAL").unwrap(), UserAction::Reveal);
        assert_eq!(parse_command("next").unwrap(), UserAction::Next);
        assert_eq!(parse_command("restart").unwrap(), UserAction::Restart);
        assert_eq!(parse_command("quit").unwrap(), UserAction::Exit);
        assert_eq!(
            parse_command("Hard").unwrap(),
            UserAction::Difficulty(Difficulty::Hard)
        );
    }

    #[test]
    fn test_parse_command_invalid() {
        assert!(matches!(parse_command("ab"), Err(GameError::InvalidInput(_))));
        assert!(matches!(parse_command("4"), Err(GameError::InvalidInput(_))));
        assert!(matches!(parse_command(""), Err(GameError::InvalidInput(_))));
    }

    #[test]
    fn test_read_action_valid_letter() {
        let mut reader = Cursor::new("e\n");
        assert_eq!(read_action(&mut reader), Some(UserAction::Guess('e')));
    }

    #[test]
    fn test_read_action_invalid() {
        let mut reader = Cursor::new("xyz\n");
        assert_eq!(read_action(&mut reader), None);
    }

    #[test]
    fn test_read_action_eof_exits() {
        let mut reader = Cursor::new("");
        assert_eq!(read_action(&mut reader), Some(UserAction::Exit));
    }

    #[test]
    fn test_format_pattern() {
        let snapshot = Snapshot {
            difficulty: Difficulty::Easy,
            word_length: 3,
            pattern: vec![Some('c'), None, Some('t')],
            guessed: vec!['c', 't'],
            mistakes: 0,
            streak: 0,
            max_mistakes: 6,
            score: 10,
            time_left: 60,
            status: RoundStatus::InProgress,
            hint_available: false,
            hint_used: false,
            revealed: false,
            answer: None,
        };
        assert_eq!(format_pattern(&snapshot), "c _ t");
    }
}
