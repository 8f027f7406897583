//! Round state machine.
//!
//! A [`GameState`] is a plain value. Every transition borrows the current
//! state and returns a [`Step`] holding the next state together with the
//! effects the presentation layer should react to. Nothing here touches the
//! terminal, the clock or the word bank.

use crate::error::{GameError, Result};
use crate::hint;
use crate::wordbank::{Difficulty, Word};
use rand::Rng;
use std::fmt;

pub const MAX_MISTAKES: u32 = 6;
pub const HINT_THRESHOLD: u32 = 3;
pub const CORRECT_REWARD: u32 = 5;
pub const TIME_BUDGET_SECS: u32 = 60;

/// Numeric rules of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Consecutive wrong guesses that lose the round.
    pub max_mistakes: u32,
    /// Total wrong guesses before a hint may be requested.
    pub hint_threshold: u32,
    /// Points for each correct, new letter.
    pub correct_reward: u32,
    /// Seconds on the clock at round start.
    pub time_budget: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_mistakes: MAX_MISTAKES,
            hint_threshold: HINT_THRESHOLD,
            correct_reward: CORRECT_REWARD,
            time_budget: TIME_BUDGET_SECS,
        }
    }
}

impl Rules {
    #[must_use]
    pub fn with_time_budget(mut self, secs: u32) -> Self {
        self.time_budget = secs;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    InProgress,
    Won,
    Lost,
}

impl RoundStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InProgress => "in progress",
            Self::Won => "won",
            Self::Lost => "lost",
        })
    }
}

/// Pieces of the hangman figure, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPart {
    Head,
    Body,
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
}

impl BodyPart {
    pub const ALL: [BodyPart; 6] = [
        BodyPart::Head,
        BodyPart::Body,
        BodyPart::RightArm,
        BodyPart::LeftArm,
        BodyPart::RightLeg,
        BodyPart::LeftLeg,
    ];

    /// The part drawn by the `mistakes`-th wrong guess (1-based). Mistakes
    /// past the sixth draw nothing.
    #[must_use]
    pub fn for_mistake(mistakes: u32) -> Option<BodyPart> {
        let index = usize::try_from(mistakes).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Parts already on the gallows after `mistakes` wrong guesses.
    #[must_use]
    pub fn drawn(mistakes: u32) -> &'static [BodyPart] {
        let count = usize::try_from(mistakes).unwrap_or(usize::MAX).min(Self::ALL.len());
        &Self::ALL[..count]
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
            Self::RightArm => "right arm",
            Self::LeftArm => "left arm",
            Self::RightLeg => "right leg",
            Self::LeftLeg => "left leg",
        }
    }
}

/// Something the presentation layer should react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Draw the next piece of the figure.
    DrawPart(BodyPart),
    /// A new letter was evaluated.
    GuessFeedback { letter: char, correct: bool },
    HintRevealed(char),
    AnswerRevealed,
    /// The round just reached a terminal status.
    RoundOver(RoundStatus),
}

/// Result of a transition.
#[derive(Debug, Clone)]
pub struct Step {
    pub state: GameState,
    pub effects: Vec<Effect>,
}

impl Step {
    fn unchanged(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }
}

/// Read-only projection of a round for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub difficulty: Difficulty,
    pub word_length: usize,
    /// One entry per position: the letter if revealed, `None` if still hidden.
    pub pattern: Vec<Option<char>>,
    pub guessed: Vec<char>,
    pub mistakes: u32,
    pub streak: u32,
    pub max_mistakes: u32,
    pub score: u32,
    pub time_left: u32,
    pub status: RoundStatus,
    pub hint_available: bool,
    pub hint_used: bool,
    pub revealed: bool,
    /// The secret word, only exposed once the round is over.
    pub answer: Option<String>,
}

impl Snapshot {
    /// The word with hidden letters as `_`.
    #[must_use]
    pub fn revealed_pattern(&self) -> String {
        self.pattern.iter().map(|slot| slot.unwrap_or('_')).collect()
    }

    #[must_use]
    pub fn drawn_parts(&self) -> &'static [BodyPart] {
        BodyPart::drawn(self.mistakes)
    }
}

/// Authoritative record of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    word: Word,
    difficulty: Difficulty,
    rules: Rules,
    guessed: Vec<char>,
    mistakes: u32,
    streak: u32,
    score: u32,
    time_left: u32,
    hint_used: bool,
    revealed: bool,
}

impl GameState {
    /// A new round with a zero score.
    #[must_use]
    pub fn fresh(word: Word, difficulty: Difficulty, rules: Rules) -> Self {
        Self {
            word,
            difficulty,
            rules,
            guessed: Vec::new(),
            mistakes: 0,
            streak: 0,
            score: 0,
            time_left: rules.time_budget,
            hint_used: false,
            revealed: false,
        }
    }

    /// A new round that keeps the running score.
    #[must_use]
    pub fn next_round(&self, word: Word, difficulty: Difficulty) -> Self {
        Self {
            score: self.score,
            ..Self::fresh(word, difficulty, self.rules)
        }
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        if self.revealed {
            RoundStatus::Lost
        } else if self.word.letters().all(|c| self.guessed.contains(&c)) {
            RoundStatus::Won
        } else if self.streak >= self.rules.max_mistakes || self.time_left == 0 {
            RoundStatus::Lost
        } else {
            RoundStatus::InProgress
        }
    }

    pub fn guess_letter(&self, input: char) -> Result<Step> {
        if self.status().is_terminal() {
            return Err(GameError::round_over("guess"));
        }
        if !input.is_ascii_alphabetic() {
            return Err(GameError::InvalidInput(input.to_string()));
        }
        let letter = input.to_ascii_lowercase();
        if self.guessed.contains(&letter) {
            return Ok(Step::unchanged(self));
        }

        let mut next = self.clone();
        let mut effects = Vec::new();
        next.guessed.push(letter);

        let correct = self.word.contains(letter);
        if correct {
            next.score += self.rules.correct_reward;
            next.streak = 0;
        } else {
            next.mistakes += 1;
            next.streak += 1;
            if let Some(part) = BodyPart::for_mistake(next.mistakes) {
                effects.push(Effect::DrawPart(part));
            }
        }
        effects.push(Effect::GuessFeedback { letter, correct });

        Ok(self.finish(next, effects))
    }

    /// Reveals one hidden letter. Does nothing until the hint threshold is
    /// reached, after the hint has been used, or if nothing is left to reveal.
    pub fn request_hint<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Step> {
        if self.status().is_terminal() {
            return Err(GameError::round_over("use a hint"));
        }
        if !hint::is_eligible(self) {
            return Ok(Step::unchanged(self));
        }
        let Some(letter) = hint::choose_hint(&self.word, &self.guessed, rng) else {
            return Ok(Step::unchanged(self));
        };

        let mut next = self.clone();
        next.guessed.push(letter);
        next.hint_used = true;

        Ok(self.finish(next, vec![Effect::HintRevealed(letter)]))
    }

    pub fn reveal_answer(&self) -> Step {
        if self.status().is_terminal() {
            return Step::unchanged(self);
        }

        let mut next = self.clone();
        for letter in self.word.letters() {
            if !next.guessed.contains(&letter) {
                next.guessed.push(letter);
            }
        }
        next.revealed = true;

        self.finish(next, vec![Effect::AnswerRevealed])
    }

    /// One second of the round clock.
    pub fn tick(&self) -> Step {
        if self.status().is_terminal() || self.time_left == 0 {
            return Step::unchanged(self);
        }
        let mut next = self.clone();
        next.time_left -= 1;
        self.finish(next, Vec::new())
    }

    fn finish(&self, next: GameState, mut effects: Vec<Effect>) -> Step {
        let status = next.status();
        if status.is_terminal() && !self.status().is_terminal() {
            effects.push(Effect::RoundOver(status));
        }
        Step {
            state: next,
            effects,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let status = self.status();
        Snapshot {
            difficulty: self.difficulty,
            word_length: self.word.len(),
            pattern: self
                .word
                .letters()
                .map(|c| self.guessed.contains(&c).then_some(c))
                .collect(),
            guessed: self.guessed.clone(),
            mistakes: self.mistakes,
            streak: self.streak,
            max_mistakes: self.rules.max_mistakes,
            score: self.score,
            time_left: self.time_left,
            status,
            hint_available: hint::is_eligible(self),
            hint_used: self.hint_used,
            revealed: self.revealed,
            answer: status.is_terminal().then(|| self.word.to_string()),
        }
    }

    #[must_use]
    pub fn word(&self) -> &Word {
        &self.word
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub fn guessed(&self) -> &[char] {
        &self.guessed
    }

    #[must_use]
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub fn hint_used(&self) -> bool {
        self.hint_used
    }

    #[must_use]
    pub fn revealed(&self) -> bool {
        self.revealed
    }
}

/// Parses a typed guess into a single letter.
pub fn parse_guess(input: &str) -> Result<char> {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_lowercase()),
        _ => Err(GameError::InvalidInput(trimmed.to_string())),
    }
}
