//! Greedy search for a locally simplest falsifying value.

use tracing::{debug, trace, warn};

use crate::simplifier::Simplifier;

/// Result of a shrink search
#[derive(Debug, Clone, PartialEq)]
pub struct ShrinkResult<T> {
    /// Simplest falsifying value reached
    pub minimal: T,
    /// Number of accepted simplification steps
    pub shrink_steps: usize,
    /// Number of candidates the property was evaluated on
    pub candidates_tried: usize,
    /// False if the search stopped at a step cap rather than a fixed point
    pub completed: bool,
}

/// Greedily descend from a falsifying `value` to a local fixed point of
/// `simplifier`
///
/// `property` is the property under test: it returns `false` for values that
/// falsify it. The search repeatedly replaces the current value with the first
/// candidate from `simplifier.simplify(current)` for which `property` returns
/// `false`, and stops when every candidate satisfies it. The returned value
/// falsifies `property` provided `value` did.
///
/// The search is unbounded: a simplifier that cycles makes it loop forever.
/// Use [`find_simplest_falsification_bounded`] to cap the number of steps.
pub fn find_simplest_falsification<T, S, P>(simplifier: &S, value: T, property: P) -> T
where
    S: Simplifier<T> + ?Sized,
    P: FnMut(&T) -> bool,
{
    find_simplest_falsification_bounded(simplifier, value, property, None).minimal
}

/// Same as [`find_simplest_falsification`], optionally capping accepted steps
pub fn find_simplest_falsification_bounded<T, S, P>(
    simplifier: &S,
    value: T,
    mut property: P,
    max_steps: Option<usize>,
) -> ShrinkResult<T>
where
    S: Simplifier<T> + ?Sized,
    P: FnMut(&T) -> bool,
{
    let mut current = value;
    let mut shrink_steps = 0;
    let mut candidates_tried = 0;

    loop {
        if let Some(max_steps) = max_steps
            && shrink_steps >= max_steps
        {
            warn!(max_steps, "shrink search stopped at step cap");
            return ShrinkResult {
                minimal: current,
                shrink_steps,
                candidates_tried,
                completed: false,
            };
        }

        let simpler = simplifier.simplify(&current).find(|candidate| {
            candidates_tried += 1;
            !property(candidate)
        });

        match simpler {
            Some(candidate) => {
                shrink_steps += 1;
                trace!(step = shrink_steps, candidates_tried, "accepted simpler value");
                current = candidate;
            }
            None => break,
        }
    }

    debug!(shrink_steps, candidates_tried, "shrink search reached fixed point");

    ShrinkResult {
        minimal: current,
        shrink_steps,
        candidates_tried,
        completed: true,
    }
}
