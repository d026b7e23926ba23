//! Random fact selection
//!
//! Every call is independent: there is no memory of previously shown facts.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::Fact;

/// Picks one fact uniformly at random using `rng`
///
/// Returns `None` only for an empty slice.
pub fn select_with<'a, R: Rng + ?Sized>(facts: &'a [Fact], rng: &mut R) -> Option<&'a Fact> {
    facts.choose(rng)
}

/// Picks one fact uniformly at random using the thread-local generator
pub fn select(facts: &[Fact]) -> Option<&Fact> {
    select_with(facts, &mut rand::thread_rng())
}
