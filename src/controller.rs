//! Round orchestration.
//!
//! [`RoundController`] is the only thing the interfaces talk to. It owns the
//! active round (state, snapshot and timer), draws words from the bank and
//! hands back an [`Update`] after every operation.

use crate::error::{GameError, Result};
use crate::game_state::{Effect, GameState, Rules, Snapshot, Step};
use crate::timer::{RoundId, TickMode, Timer};
use crate::wordbank::{Difficulty, WordBank};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What an operation produced: the fresh snapshot and the effects to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub snapshot: Snapshot,
    pub effects: Vec<Effect>,
}

#[derive(Debug)]
struct Round {
    id: RoundId,
    state: GameState,
    snapshot: Snapshot,
    timer: Option<Timer>,
}

impl Round {
    fn apply(&mut self, step: Step) -> Update {
        self.state = step.state;
        self.snapshot = self.state.snapshot();

        if self.snapshot.status.is_terminal()
            && let Some(timer) = self.timer.as_mut()
            && timer.is_running()
        {
            timer.stop();
        }
        for effect in &step.effects {
            if let Effect::RoundOver(status) = effect {
                log::info!(
                    "Round {} {status}: word '{}', score {}, {} mistakes, {}s left",
                    self.id,
                    self.state.word(),
                    self.snapshot.score,
                    self.snapshot.mistakes,
                    self.snapshot.time_left
                );
            }
        }

        Update {
            snapshot: self.snapshot.clone(),
            effects: step.effects,
        }
    }
}

fn active<'a>(round: &'a mut Option<Round>, action: &'static str) -> Result<&'a mut Round> {
    round.as_mut().ok_or_else(|| GameError::not_started(action))
}

pub struct RoundController<R: Rng = StdRng> {
    bank: WordBank,
    rules: Rules,
    tick_mode: TickMode,
    rng: R,
    last_id: RoundId,
    round: Option<Round>,
}

impl RoundController<StdRng> {
    /// Controller seeded from the operating system.
    #[must_use]
    pub fn new(bank: WordBank, rules: Rules, tick_mode: TickMode) -> Self {
        Self::with_rng(bank, rules, tick_mode, StdRng::from_os_rng())
    }

    /// Controller with a reproducible word and hint sequence.
    #[must_use]
    pub fn seeded(bank: WordBank, rules: Rules, tick_mode: TickMode, seed: u64) -> Self {
        Self::with_rng(bank, rules, tick_mode, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RoundController<R> {
    pub fn with_rng(bank: WordBank, rules: Rules, tick_mode: TickMode, rng: R) -> Self {
        Self {
            bank,
            rules,
            tick_mode,
            rng,
            last_id: RoundId::default(),
            round: None,
        }
    }

    /// Starts a brand new round with a zero score.
    pub fn start(&mut self, difficulty: Difficulty) -> Result<Update> {
        let word = self.bank.pick(difficulty, &mut self.rng)?;
        self.install(GameState::fresh(word, difficulty, self.rules))
    }

    pub fn guess(&mut self, letter: char) -> Result<Update> {
        let round = active(&mut self.round, "guess")?;
        let step = round.state.guess_letter(letter)?;
        Ok(round.apply(step))
    }

    pub fn hint(&mut self) -> Result<Update> {
        let round = active(&mut self.round, "use a hint")?;
        let step = round.state.request_hint(&mut self.rng)?;
        if step.effects.is_empty() {
            log::debug!("Hint not available in round {}", round.id);
        }
        Ok(round.apply(step))
    }

    pub fn reveal(&mut self) -> Result<Update> {
        let round = active(&mut self.round, "reveal the answer")?;
        let step = round.state.reveal_answer();
        Ok(round.apply(step))
    }

    /// Moves on to a new word of the same difficulty. The score carries over;
    /// only [`restart`](Self::restart) clears it.
    pub fn next(&mut self) -> Result<Update> {
        let difficulty = active(&mut self.round, "skip to the next word")?
            .state
            .difficulty();
        self.advance(difficulty)
    }

    /// Starts over at the same difficulty with the score cleared.
    pub fn restart(&mut self) -> Result<Update> {
        let difficulty = active(&mut self.round, "restart")?.state.difficulty();
        self.start(difficulty)
    }

    /// Switches tier, drawing a new word. The score carries over like
    /// [`next`](Self::next). Starts the first round if none is running.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<Update> {
        if self.round.is_none() {
            return self.start(difficulty);
        }
        self.advance(difficulty)
    }

    /// Advances the round clock by one second.
    pub fn tick(&mut self) -> Result<Update> {
        let round = active(&mut self.round, "tick")?;
        let step = round.state.tick();
        Ok(round.apply(step))
    }

    /// Applies every tick the active timer has produced since the last call.
    /// Returns `None` when nothing changed.
    pub fn pump_timer(&mut self) -> Option<Update> {
        let round = self.round.as_mut()?;
        let ticks = round.timer.as_ref()?.drain();

        let mut applied: Option<Update> = None;
        for tick in ticks {
            if tick.round != round.id {
                log::warn!("Ignoring tick from round {} in round {}", tick.round, round.id);
                continue;
            }
            let step = round.state.tick();
            let update = round.apply(step);
            applied = Some(match applied {
                Some(mut previous) => {
                    previous.effects.extend(update.effects);
                    previous.snapshot = update.snapshot;
                    previous
                }
                None => update,
            });
        }
        applied
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.round.as_ref().map(|round| &round.snapshot)
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.round.as_ref().map(|round| round.state.difficulty())
    }

    #[must_use]
    pub fn round_id(&self) -> Option<RoundId> {
        self.round.as_ref().map(|round| round.id)
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.round
            .as_ref()
            .and_then(|round| round.timer.as_ref())
            .is_some_and(Timer::is_running)
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub fn bank(&self) -> &WordBank {
        &self.bank
    }

    fn advance(&mut self, difficulty: Difficulty) -> Result<Update> {
        let word = self.bank.pick(difficulty, &mut self.rng)?;
        let state = match &self.round {
            Some(round) => round.state.next_round(word, difficulty),
            None => GameState::fresh(word, difficulty, self.rules),
        };
        self.install(state)
    }

    /// Replaces the active round, stopping its timer before the new one starts.
    fn install(&mut self, state: GameState) -> Result<Update> {
        if let Some(mut previous) = self.round.take()
            && let Some(timer) = previous.timer.as_mut()
        {
            timer.stop();
        }

        let id = self.last_id.next();
        self.last_id = id;
        let status = state.status();
        let timer = match self.tick_mode {
            TickMode::Threaded(interval) if !status.is_terminal() => {
                Some(Timer::start(id, interval)?)
            }
            TickMode::Threaded(_) | TickMode::Manual => None,
        };

        log::info!(
            "Round {id} started: {} word of {} letters, score {}",
            state.difficulty(),
            state.word().len(),
            state.score()
        );
        let mut effects = Vec::new();
        if status.is_terminal() {
            log::info!("Round {id} {status} before any input");
            effects.push(Effect::RoundOver(status));
        }
        let snapshot = state.snapshot();
        self.round = Some(Round {
            id,
            state,
            snapshot: snapshot.clone(),
            timer,
        });

        Ok(Update { snapshot, effects })
    }
}
