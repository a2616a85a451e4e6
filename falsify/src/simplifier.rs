//! Simplifiers: lazy sequences of simpler candidates for a value.
//!
//! A [`Simplifier`] maps a value to a finite, lazily evaluated sequence of
//! candidates that are "simpler" by some well-founded measure. The shrink
//! search in [`crate::shrink`] walks these sequences and takes the first
//! candidate for which the property fails, so the order of candidates
//! matters.
//!
//! `filter_candidates` and `boxed_simplifier` are named apart from
//! [`Generator::filter`] and [`Generator::boxed`] because the primitive types
//! implement both traits.
//!
//! ## Tuples
//!
//! A tuple of simplifiers is a simplifier of tuples. Candidates are
//! interleaved round-robin: the first candidate of every field (in field
//! order), then the second candidate of every field, and so on until a round
//! produces nothing. Each candidate differs from the input in exactly one
//! field.
//!
//! ```rust
//! use falsify::simplifier::{self, Simplifier, triple};
//!
//! let first = simplifier::from_fn(|_: &i32| vec![1, 2]);
//! let second = simplifier::from_fn(|_: &char| vec!['A', 'B']);
//! let third = simplifier::from_fn(|_: &f64| vec![3.14, 3.33]);
//!
//! let candidates: Vec<_> = triple(first, second, third)
//!     .simplify(&(10, 'Z', 42.0))
//!     .collect();
//!
//! assert_eq!(
//!     candidates,
//!     vec![
//!         (1, 'Z', 42.0),
//!         (10, 'A', 42.0),
//!         (10, 'Z', 3.14),
//!         (2, 'Z', 42.0),
//!         (10, 'B', 42.0),
//!         (10, 'Z', 3.33),
//!     ]
//! );
//! ```

use std::fmt;
use std::iter;

use rand::RngCore;

use crate::generator::Generator;
use crate::shrink;

/// Core simplifier trait
pub trait Simplifier<T> {
    /// Lazily produce simpler candidates for `value`
    ///
    /// The sequence must be finite, and calling this twice with equal values
    /// must yield element-wise equal sequences.
    fn simplify(&self, value: &T) -> Box<dyn Iterator<Item = T> + '_>;

    /// Drop candidates rejected by `predicate`
    fn filter_candidates<F>(self, predicate: F) -> FilterSimplifier<Self, F>
    where
        Self: Sized,
        F: Fn(&T) -> bool,
    {
        FilterSimplifier {
            simplifier: self,
            predicate,
        }
    }

    /// Greedily descend from `value`, which falsifies `property`, to a
    /// locally simplest value for which `property` still returns `false`
    ///
    /// See [`shrink::find_simplest_falsification`].
    fn find_simplest_falsification<P>(&self, value: T, property: P) -> T
    where
        Self: Sized,
        P: FnMut(&T) -> bool,
    {
        shrink::find_simplest_falsification(self, value, property)
    }

    /// Erase the concrete simplifier type
    fn boxed_simplifier(self) -> BoxedSimplifier<T>
    where
        Self: Sized + Send + Sync + 'static,
    {
        BoxedSimplifier::new(self)
    }
}

impl<T, S> Simplifier<T> for &S
where
    S: Simplifier<T> + ?Sized,
{
    fn simplify(&self, value: &T) -> Box<dyn Iterator<Item = T> + '_> {
        (**self).simplify(value)
    }
}

/// A type-erased simplifier
pub struct BoxedSimplifier<T> {
    inner: Box<dyn Simplifier<T> + Send + Sync>,
}

impl<T> BoxedSimplifier<T> {
    /// Box the given simplifier
    pub fn new<S: Simplifier<T> + Send + Sync + 'static>(simplifier: S) -> Self {
        Self {
            inner: Box::new(simplifier),
        }
    }
}

impl<T> Simplifier<T> for BoxedSimplifier<T> {
    fn simplify(&self, value: &T) -> Box<dyn Iterator<Item = T> + '_> {
        self.inner.simplify(value)
    }
}

impl<T> fmt::Debug for BoxedSimplifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedSimplifier")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Simplifier that never proposes anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DontSimplify;

impl<T: 'static> Simplifier<T> for DontSimplify {
    fn simplify(&self, _value: &T) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new(iter::empty())
    }
}

/// Create a simplifier that never proposes anything
pub fn dont_simplify() -> DontSimplify {
    DontSimplify
}

/// Simplifier backed by a closure
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<T, F, I> Simplifier<T> for FromFn<F>
where
    F: Fn(&T) -> I,
    I: IntoIterator<Item = T>,
    I::IntoIter: 'static,
{
    fn simplify(&self, value: &T) -> Box<dyn Iterator<Item = T> + '_> {
        Box::new((self.f)(value).into_iter())
    }
}

/// Create a simplifier from a closure returning any iterable of candidates
pub fn from_fn<T, F, I>(f: F) -> FromFn<F>
where
    F: Fn(&T) -> I,
    I: IntoIterator<Item = T>,
{
    FromFn { f }
}

/// Simplifier that drops candidates rejected by a predicate
#[derive(Clone)]
pub struct FilterSimplifier<S, F> {
    simplifier: S,
    predicate: F,
}

impl<T, S, F> Simplifier<T> for FilterSimplifier<S, F>
where
    T: 'static,
    S: Simplifier<T>,
    F: Fn(&T) -> bool,
{
    fn simplify(&self, value: &T) -> Box<dyn Iterator<Item = T> + '_> {
        let predicate = &self.predicate;
        Box::new(
            self.simplifier
                .simplify(value)
                .filter(move |candidate| predicate(candidate)),
        )
    }
}

/// Lazy round-robin interleaving of several candidate sequences
///
/// Each call to `next` pulls at most one element from each source per round,
/// visiting sources in order. Exhausted sources are dropped. Iteration ends
/// after the first round in which no source produced an element.
pub struct RoundRobin<'a, T> {
    sources: Vec<Option<Box<dyn Iterator<Item = T> + 'a>>>,
    position: usize,
    produced_this_round: bool,
}

impl<'a, T> RoundRobin<'a, T> {
    /// Interleave the given sources, first source first
    pub fn new(sources: Vec<Box<dyn Iterator<Item = T> + 'a>>) -> Self {
        Self {
            sources: sources.into_iter().map(Some).collect(),
            position: 0,
            produced_this_round: false,
        }
    }
}

impl<T> Iterator for RoundRobin<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            if self.position == self.sources.len() {
                if !self.produced_this_round {
                    return None;
                }
                self.position = 0;
                self.produced_this_round = false;
            }

            let index = self.position;
            self.position += 1;

            let Some(source) = self.sources[index].as_mut() else {
                continue;
            };
            match source.next() {
                Some(candidate) => {
                    self.produced_this_round = true;
                    return Some(candidate);
                }
                None => self.sources[index] = None,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = self
            .sources
            .iter()
            .flatten()
            .try_fold(0usize, |total, source| {
                source.size_hint().1.and_then(|n| total.checked_add(n))
            });
        (0, upper)
    }
}

macro_rules! impl_tuple_simplifier {
    ($(($simp:ident, $value:ident, $idx:tt)),+) => {
        impl<$($value, $simp),+> Simplifier<($($value,)+)> for ($($simp,)+)
        where
            $($value: Clone + 'static, $simp: Simplifier<$value>),+
        {
            fn simplify(
                &self,
                value: &($($value,)+),
            ) -> Box<dyn Iterator<Item = ($($value,)+)> + '_> {
                let mut sources: Vec<Box<dyn Iterator<Item = ($($value,)+)> + '_>> = Vec::new();
                $(
                    let original = value.clone();
                    sources.push(Box::new(self.$idx.simplify(&value.$idx).map(
                        move |field| {
                            let mut candidate = original.clone();
                            candidate.$idx = field;
                            candidate
                        },
                    )));
                )+
                Box::new(RoundRobin::new(sources))
            }
        }
    };
}

impl_tuple_simplifier!((S1, A, 0), (S2, B, 1));
impl_tuple_simplifier!((S1, A, 0), (S2, B, 1), (S3, C, 2));
impl_tuple_simplifier!((S1, A, 0), (S2, B, 1), (S3, C, 2), (S4, D, 3));
impl_tuple_simplifier!((S1, A, 0), (S2, B, 1), (S3, C, 2), (S4, D, 3), (S5, E, 4));
impl_tuple_simplifier!(
    (S1, A, 0),
    (S2, B, 1),
    (S3, C, 2),
    (S4, D, 3),
    (S5, E, 4),
    (S6, F, 5)
);

/// Combine two field simplifiers into a pair simplifier
pub fn pair<S1, S2>(first: S1, second: S2) -> (S1, S2) {
    (first, second)
}

/// Combine three field simplifiers into a triple simplifier
pub fn triple<S1, S2, S3>(first: S1, second: S2, third: S3) -> (S1, S2, S3) {
    (first, second, third)
}

/// Pair simplifier using the same simplifier for both fields
pub fn pair_of<S: Clone>(simplifier: S) -> (S, S) {
    (simplifier.clone(), simplifier)
}

/// Triple simplifier using the same simplifier for every field
pub fn triple_of<S: Clone>(simplifier: S) -> (S, S, S) {
    (simplifier.clone(), simplifier.clone(), simplifier)
}

/// A generator paired with a simplifier for the values it produces
#[derive(Debug, Clone)]
pub struct Fuzzer<G, S> {
    generator: G,
    simplifier: S,
}

impl<G, S> Fuzzer<G, S> {
    /// Pair a generator with a simplifier
    pub fn new(generator: G, simplifier: S) -> Self {
        Self {
            generator,
            simplifier,
        }
    }

    /// The underlying generator
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The underlying simplifier
    pub fn simplifier(&self) -> &S {
        &self.simplifier
    }
}

impl<T, G, S> Generator<T> for Fuzzer<G, S>
where
    G: Generator<T>,
{
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        self.generator.generate(rng)
    }
}

impl<T, G, S> Simplifier<T> for Fuzzer<G, S>
where
    S: Simplifier<T>,
{
    fn simplify(&self, value: &T) -> Box<dyn Iterator<Item = T> + '_> {
        self.simplifier.simplify(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halve_or_decrement() -> FromFn<impl Fn(&i32) -> Vec<i32> + Clone> {
        from_fn(|value: &i32| match *value {
            0 => vec![],
            1 => vec![0],
            v => vec![v / 2, v - 1],
        })
    }

    #[test]
    fn test_dont_simplify_is_empty() {
        assert_eq!(Simplifier::<i32>::simplify(&dont_simplify(), &5).count(), 0);
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_triple_interleaves_round_robin() {
        let first = from_fn(|it: &i32| {
            assert_eq!(*it, 10);
            vec![1, 2]
        });
        let second = from_fn(|it: &char| {
            assert_eq!(*it, 'Z');
            vec!['A', 'B']
        });
        let third = from_fn(|it: &f64| {
            assert_eq!(*it, 42.0);
            vec![3.14, 3.33]
        });

        let candidates: Vec<_> = triple(first, second, third)
            .simplify(&(10, 'Z', 42.0))
            .collect();

        assert_eq!(
            candidates,
            vec![
                (1, 'Z', 42.0),
                (10, 'A', 42.0),
                (10, 'Z', 3.14),
                (2, 'Z', 42.0),
                (10, 'B', 42.0),
                (10, 'Z', 3.33),
            ]
        );
    }

    #[test]
    fn test_triple_of_matches_explicit_triple() {
        let item = from_fn(|it: &i32| if *it > 0 { vec![it - 1] } else { vec![] });

        for a in 0..5 {
            for b in 0..5 {
                for c in 0..5 {
                    let value = (a, b, c);
                    let shared: Vec<_> = triple_of(item.clone()).simplify(&value).collect();
                    let explicit: Vec<_> = triple(&item, &item, &item).simplify(&value).collect();
                    assert_eq!(shared, explicit);
                }
            }
        }
    }

    #[test]
    fn test_triple_without_simplifications_is_empty() {
        let simplifier = triple(dont_simplify(), dont_simplify(), dont_simplify());
        assert_eq!(simplifier.simplify(&(1, 'a', 0.0)).count(), 0);
    }

    #[test]
    fn test_only_first_field_simplifies() {
        let first = from_fn(|it: &i32| {
            assert_eq!(*it, 10);
            vec![1, 2, 3]
        });
        let simplifier = triple(first, dont_simplify(), dont_simplify());

        let candidates: Vec<_> = simplifier.simplify(&(10, 'Z', 42.0)).collect();
        assert_eq!(
            candidates,
            vec![(1, 'Z', 42.0), (2, 'Z', 42.0), (3, 'Z', 42.0)]
        );
    }

    #[test]
    fn test_only_second_field_simplifies() {
        let second = from_fn(|it: &i32| {
            assert_eq!(*it, 10);
            vec![1, 2, 3]
        });
        let simplifier = triple(dont_simplify(), second, dont_simplify());

        let candidates: Vec<_> = simplifier.simplify(&('Z', 10, 42.0)).collect();
        assert_eq!(
            candidates,
            vec![('Z', 1, 42.0), ('Z', 2, 42.0), ('Z', 3, 42.0)]
        );
    }

    #[test]
    fn test_only_third_field_simplifies() {
        let third = from_fn(|it: &i32| {
            assert_eq!(*it, 10);
            vec![1, 2, 3]
        });
        let simplifier = triple(dont_simplify(), dont_simplify(), third);

        let candidates: Vec<_> = simplifier.simplify(&(42.0, 'Z', 10)).collect();
        assert_eq!(
            candidates,
            vec![(42.0, 'Z', 1), (42.0, 'Z', 2), (42.0, 'Z', 3)]
        );
    }

    #[test]
    fn test_richer_field_is_not_truncated() {
        let short = from_fn(|_: &i32| vec![0]);
        let long = from_fn(|_: &i32| vec![1, 2, 3, 4]);

        let candidates: Vec<_> = pair(short, long).simplify(&(9, 9)).collect();
        assert_eq!(candidates, vec![(0, 9), (9, 1), (9, 2), (9, 3), (9, 4)]);
    }

    #[test]
    fn test_tuple_simplifier_is_lazy() {
        let huge = from_fn(|start: &u64| (0..*start).rev());
        let ones = from_fn(|_: &u64| iter::repeat(1u64).take(1_000_000_000));

        let first_three: Vec<_> = pair(huge, ones)
            .simplify(&(1_000_000_000, 5))
            .take(3)
            .collect();

        assert_eq!(
            first_three,
            vec![(999_999_999, 5), (1_000_000_000, 1), (999_999_998, 5)]
        );
    }

    #[test]
    fn test_simplify_is_repeatable() {
        let simplifier = triple_of(halve_or_decrement());
        let value = (7, 3, 12);

        let first: Vec<_> = simplifier.simplify(&value).collect();
        let second: Vec<_> = simplifier.simplify(&value).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_bounded_by_field_candidates() {
        let simplifier = triple_of(halve_or_decrement());
        let value = (7, 1, 0);

        let total: usize = [7, 1, 0]
            .iter()
            .map(|v| halve_or_decrement().simplify(v).count())
            .sum();
        assert_eq!(simplifier.simplify(&value).count(), total);
    }

    #[test]
    fn test_round_robin_of_nothing() {
        let mut empty: RoundRobin<'_, i32> = RoundRobin::new(Vec::new());
        assert_eq!(empty.next(), None);
        assert_eq!(empty.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_round_robin_stays_exhausted() {
        let mut interleaved = RoundRobin::new(vec![
            Box::new(vec![1, 3].into_iter()) as Box<dyn Iterator<Item = i32>>,
            Box::new(vec![2].into_iter()),
        ]);

        assert_eq!(interleaved.size_hint(), (0, Some(3)));
        assert_eq!(interleaved.by_ref().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(interleaved.next(), None);
    }

    #[test]
    fn test_filter_drops_rejected_candidates() {
        let simplifier = halve_or_decrement().filter_candidates(|v| v % 2 == 1);
        let candidates: Vec<_> = simplifier.simplify(&10).collect();
        assert_eq!(candidates, vec![5, 9]);
    }

    #[test]
    fn test_greedy_search_through_triple() {
        let result = triple_of(halve_or_decrement())
            .find_simplest_falsification((101, 102, 103), |&(first, _, third)| {
                first < 12 || third < 42
            });

        assert_eq!(result, (12, 0, 42));
    }

    #[test]
    fn test_boxed_simplifier() {
        let simplifier = halve_or_decrement().boxed_simplifier();
        assert_eq!(simplifier.simplify(&4).collect::<Vec<_>>(), vec![2, 3]);
        assert!(format!("{:?}", simplifier).contains("BoxedSimplifier"));
    }

    #[test]
    fn test_fuzzer_delegates_both_ways() {
        use crate::generator::constant;
        use crate::rng::RandomSource;

        let fuzzer = constant(8).with_simplifier(halve_or_decrement());
        let mut source = RandomSource::from_seed(0);

        assert_eq!(fuzzer.generate(&mut source), 8);
        assert_eq!(fuzzer.simplify(&8).collect::<Vec<_>>(), vec![4, 7]);
    }
}
