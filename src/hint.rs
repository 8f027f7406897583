//! Hint selection.
//!
//! A hint becomes available once the player has made enough mistakes in total
//! (not in a row) and can be used once per round.

use crate::game_state::GameState;
use crate::wordbank::Word;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Whether `state` may request a hint right now.
#[must_use]
pub fn is_eligible(state: &GameState) -> bool {
    !state.status().is_terminal()
        && !state.hint_used()
        && state.mistakes() >= state.rules().hint_threshold
}

/// Distinct letters of `word` that are not in `guessed`, in alphabetical order.
#[must_use]
pub fn unrevealed_letters(word: &Word, guessed: &[char]) -> Vec<char> {
    let mut letters: Vec<char> = word.letters().filter(|c| !guessed.contains(c)).collect();
    letters.sort_unstable();
    letters.dedup();
    letters
}

/// Picks one unrevealed letter uniformly at random, or `None` if the word is
/// already fully shown.
pub fn choose_hint<R: Rng + ?Sized>(word: &Word, guessed: &[char], rng: &mut R) -> Option<char> {
    unrevealed_letters(word, guessed).choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn word(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    #[test]
    fn test_unrevealed_letters_dedups() {
        assert_eq!(unrevealed_letters(&word("banana"), &['b']), vec!['a', 'n']);
    }

    #[test]
    fn test_unrevealed_letters_all_guessed() {
        assert!(unrevealed_letters(&word("cat"), &['t', 'a', 'c']).is_empty());
    }

    #[test]
    fn test_choose_hint_only_unrevealed() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let letter = choose_hint(&word("apple"), &['a', 'p'], &mut rng).unwrap();
            assert!(letter == 'l' || letter == 'e');
        }
    }

    #[test]
    fn test_choose_hint_nothing_left() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(choose_hint(&word("kiwi"), &['k', 'i', 'w'], &mut rng), None);
    }
}
