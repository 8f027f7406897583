use crate::controller::{RoundController, Update};
use crate::error::{GameError, Result};
use crate::game_state::{BodyPart, Effect, Snapshot};
use crate::wordbank::Difficulty;
use rand::Rng;

/// Something the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Guess(char),
    Difficulty(Difficulty),
    Hint,
    Reveal,
    Next,
    Restart,
    Exit,
}

/// Front end of a game session: renders snapshots and collects input.
///
/// Implementations hold no game logic; everything they show comes from the
/// [`Snapshot`] and effects handed to them.
pub trait GameInterface {
    /// Returns the next action, or `None` if there was none (or it was invalid).
    fn read_action(&mut self) -> Option<UserAction>;

    fn render(&mut self, snapshot: &Snapshot);

    fn draw_part(&mut self, _part: BodyPart) {}

    /// Called once per newly evaluated letter.
    fn guess_feedback(&mut self, _letter: char, _correct: bool) {}

    fn display_message(&mut self, message: &str);

    fn display_error(&mut self, error: &GameError);

    fn display_exit_message(&mut self);
}

/// Runs rounds until the player exits. Only fatal errors are returned.
pub fn game_loop<R: Rng, I: GameInterface>(
    controller: &mut RoundController<R>,
    interface: &mut I,
    difficulty: Difficulty,
) -> Result<()> {
    let update = controller.start(difficulty)?;
    interface.display_message(&format!(
        "New {difficulty} word: {} letters. Good luck!",
        update.snapshot.word_length
    ));
    present(interface, &update);

    loop {
        let action = interface.read_action();

        if let Some(update) = controller.pump_timer() {
            present(interface, &update);
        }

        let Some(action) = action else {
            continue;
        };
        let result = match action {
            UserAction::Exit => {
                interface.display_exit_message();
                log::info!("Player exited");
                return Ok(());
            }
            UserAction::Guess(letter) => controller.guess(letter),
            UserAction::Hint => controller.hint(),
            UserAction::Reveal => controller.reveal(),
            UserAction::Next => controller.next(),
            UserAction::Restart => controller.restart(),
            UserAction::Difficulty(difficulty) => controller.set_difficulty(difficulty),
        };

        match result {
            Ok(update) => {
                if action == UserAction::Hint && update.effects.is_empty() {
                    let threshold = controller.rules().hint_threshold;
                    interface.display_message(&hint_refusal(&update.snapshot, threshold));
                }
                present(interface, &update);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                log::debug!("Rejected {action:?}: {e}");
                interface.display_error(&e);
            }
        }
    }
}

fn present<I: GameInterface>(interface: &mut I, update: &Update) {
    for effect in &update.effects {
        match *effect {
            Effect::DrawPart(part) => interface.draw_part(part),
            Effect::GuessFeedback { letter, correct } => interface.guess_feedback(letter, correct),
            Effect::HintRevealed(letter) => {
                interface.display_message(&format!("Hint: the word contains '{letter}'"));
            }
            Effect::AnswerRevealed | Effect::RoundOver(_) => {}
        }
    }
    interface.render(&update.snapshot);
}

fn hint_refusal(snapshot: &Snapshot, threshold: u32) -> String {
    if snapshot.hint_used {
        "You already used your hint this round.".to_string()
    } else {
        format!("Hints unlock after {threshold} mistakes.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::{RoundStatus, Rules};
    use crate::timer::TickMode;
    use crate::wordbank::WordBank;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedInterface {
        actions: VecDeque<UserAction>,
        snapshots: Vec<Snapshot>,
        parts: Vec<BodyPart>,
        feedback: Vec<bool>,
        messages: Vec<String>,
        errors: Vec<String>,
        exited: bool,
    }

    impl ScriptedInterface {
        fn new(actions: &[UserAction]) -> Self {
            Self {
                actions: actions.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl GameInterface for ScriptedInterface {
        fn read_action(&mut self) -> Option<UserAction> {
            Some(self.actions.pop_front().unwrap_or(UserAction::Exit))
        }

        fn render(&mut self, snapshot: &Snapshot) {
            self.snapshots.push(snapshot.clone());
        }

        fn draw_part(&mut self, part: BodyPart) {
            self.parts.push(part);
        }

        fn guess_feedback(&mut self, _letter: char, correct: bool) {
            self.feedback.push(correct);
        }

        fn display_message(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }

        fn display_error(&mut self, error: &GameError) {
            self.errors.push(error.to_string());
        }

        fn display_exit_message(&mut self) {
            self.exited = true;
        }
    }

    fn run(actions: &[UserAction]) -> ScriptedInterface {
        run_with(Rules::default(), actions)
    }

    fn run_with(rules: Rules, actions: &[UserAction]) -> ScriptedInterface {
        let bank = WordBank::from_lists(&["cat"], &["banana"], &["rhythm"]);
        let mut controller = RoundController::seeded(bank, rules, TickMode::Manual, 3);
        let mut interface = ScriptedInterface::new(actions);
        game_loop(&mut controller, &mut interface, Difficulty::Easy).unwrap();
        interface
    }

    #[test]
    fn test_immediate_exit() {
        let ui = run(&[UserAction::Exit]);
        assert!(ui.exited);
        assert_eq!(ui.snapshots.len(), 1);
    }

    #[test]
    fn test_winning_game() {
        let ui = run(&[
            UserAction::Guess('c'),
            UserAction::Guess('x'),
            UserAction::Guess('a'),
            UserAction::Guess('t'),
        ]);
        assert_eq!(ui.feedback, vec![true, false, true, true]);
        assert_eq!(ui.parts, vec![BodyPart::Head]);
        assert_eq!(ui.snapshots.last().unwrap().status, RoundStatus::Won);
    }

    #[test]
    fn test_guess_after_win_reports_error() {
        let ui = run(&[
            UserAction::Guess('c'),
            UserAction::Guess('a'),
            UserAction::Guess('t'),
            UserAction::Guess('q'),
        ]);
        assert_eq!(ui.errors.len(), 1);
        assert!(ui.errors[0].contains("round is over"));
    }

    #[test]
    fn test_invalid_letter_reports_error() {
        let ui = run(&[UserAction::Guess('7')]);
        assert_eq!(ui.errors.len(), 1);
        assert!(ui.exited);
    }

    #[test]
    fn test_early_hint_explained() {
        let ui = run(&[UserAction::Hint]);
        assert!(ui.messages.iter().any(|m| m.contains("after 3 mistakes")));
    }

    #[test]
    fn test_early_hint_names_configured_threshold() {
        let rules = Rules {
            hint_threshold: 2,
            ..Rules::default()
        };
        let ui = run_with(rules, &[UserAction::Guess('x'), UserAction::Hint]);
        assert!(ui.messages.iter().any(|m| m == "Hints unlock after 2 mistakes."));
    }

    #[test]
    fn test_hint_announced() {
        let ui = run(&[
            UserAction::Guess('x'),
            UserAction::Guess('y'),
            UserAction::Guess('z'),
            UserAction::Hint,
        ]);
        assert!(ui.messages.iter().any(|m| m.starts_with("Hint:")));
        assert_eq!(ui.snapshots.last().unwrap().guessed.len(), 4);
    }

    #[test]
    fn test_difficulty_change_mid_game() {
        let ui = run(&[UserAction::Difficulty(Difficulty::Hard)]);
        assert_eq!(ui.snapshots.last().unwrap().word_length, 6);
    }

    #[test]
    fn test_reveal_then_next() {
        let ui = run(&[UserAction::Reveal, UserAction::Next]);
        let reveal = &ui.snapshots[1];
        assert!(reveal.revealed);
        assert_eq!(reveal.revealed_pattern(), "cat");
        let next = ui.snapshots.last().unwrap();
        assert_eq!(next.status, RoundStatus::InProgress);
        assert!(!next.revealed);
    }
}
