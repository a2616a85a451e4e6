//! Core generator trait and combinators.
//!
//! A generator is a deterministic function from the state of a random source
//! to a value. Generators hold no state of their own; every call receives the
//! source, advances it, and returns a value, so the values drawn during a run
//! depend only on the seed.
//!
//! ## Combining generators
//!
//! Tuples of generators are generators of tuples. The fields are drawn in
//! declaration order, first field first, from the same source:
//!
//! ```rust
//! use falsify::generator::{Generator, constant};
//! use falsify::primitives::ints;
//! use falsify::rng::RandomSource;
//!
//! let pair = (ints(0, 9), constant('x'));
//! let mut source = RandomSource::from_seed(7);
//! let (digit, letter) = pair.generate(&mut source);
//! assert!((0..=9).contains(&digit));
//! assert_eq!(letter, 'x');
//! ```
//!
//! Reordering the fields changes which draws each field consumes, and so
//! changes the generated values. This ordering is part of the contract.

use std::fmt;
use std::marker::PhantomData;

use rand::RngCore;

use crate::simplifier::{Fuzzer, Simplifier};

/// Maximum number of draws a [`Filter`] makes before giving up
pub const MAX_FILTER_ATTEMPTS: usize = 1000;

/// Core generator trait for creating random test data
pub trait Generator<T> {
    /// Generate a value, consuming randomness from `rng`
    fn generate(&self, rng: &mut dyn RngCore) -> T;

    /// Map generated values through `f`
    fn map<U, F>(self, f: F) -> Map<Self, F, T>
    where
        Self: Sized,
        F: Fn(T) -> U,
    {
        Map {
            generator: self,
            mapper: f,
            _phantom: PhantomData,
        }
    }

    /// Keep only values accepted by `predicate`, redrawing otherwise
    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        Self: Sized,
        F: Fn(&T) -> bool,
    {
        Filter {
            generator: self,
            predicate,
        }
    }

    /// Combine with another generator into a pair, drawing `self` first
    fn zip<G>(self, other: G) -> (Self, G)
    where
        Self: Sized,
    {
        (self, other)
    }

    /// Attach a simplifier, producing a value that is both generator and simplifier
    fn with_simplifier<S>(self, simplifier: S) -> Fuzzer<Self, S>
    where
        Self: Sized,
        S: Simplifier<T>,
    {
        Fuzzer::new(self, simplifier)
    }

    /// Erase the concrete generator type
    fn boxed(self) -> BoxedGenerator<T>
    where
        Self: Sized + Send + Sync + 'static,
    {
        BoxedGenerator::new(self)
    }
}

impl<T, G> Generator<T> for &G
where
    G: Generator<T> + ?Sized,
{
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        (**self).generate(rng)
    }
}

/// A type-erased generator
pub struct BoxedGenerator<T> {
    inner: Box<dyn Generator<T> + Send + Sync>,
}

impl<T> BoxedGenerator<T> {
    /// Box the given generator
    pub fn new<G: Generator<T> + Send + Sync + 'static>(generator: G) -> Self {
        Self {
            inner: Box::new(generator),
        }
    }
}

impl<T> Generator<T> for BoxedGenerator<T> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        self.inner.generate(rng)
    }
}

impl<T> fmt::Debug for BoxedGenerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedGenerator")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// A generator that maps values from one type to another
#[derive(Clone)]
pub struct Map<G, F, T> {
    generator: G,
    mapper: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, U, G, F> Generator<U> for Map<G, F, T>
where
    G: Generator<T>,
    F: Fn(T) -> U,
{
    fn generate(&self, rng: &mut dyn RngCore) -> U {
        (self.mapper)(self.generator.generate(rng))
    }
}

/// A generator that redraws until a predicate accepts the value
#[derive(Clone)]
pub struct Filter<G, F> {
    generator: G,
    predicate: F,
}

impl<T, G, F> Generator<T> for Filter<G, F>
where
    G: Generator<T>,
    F: Fn(&T) -> bool,
{
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        for _ in 0..MAX_FILTER_ATTEMPTS {
            let value = self.generator.generate(rng);
            if (self.predicate)(&value) {
                return value;
            }
        }
        panic!(
            "Filter rejected {} consecutive values of {}",
            MAX_FILTER_ATTEMPTS,
            std::any::type_name::<T>()
        );
    }
}

/// A generator that ignores the source and always returns the same value
#[derive(Debug, Clone)]
pub struct Constant<T> {
    value: T,
}

impl<T: Clone> Generator<T> for Constant<T> {
    fn generate(&self, _rng: &mut dyn RngCore) -> T {
        self.value.clone()
    }
}

/// A generator backed by a closure over the random source
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<T, F> Generator<T> for FromFn<F>
where
    F: Fn(&mut dyn RngCore) -> T,
{
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        (self.f)(rng)
    }
}

/// Create a generator that always produces `value`
pub fn constant<T: Clone>(value: T) -> Constant<T> {
    Constant { value }
}

/// Create a generator from a closure
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: Fn(&mut dyn RngCore) -> T,
{
    FromFn { f }
}

macro_rules! impl_tuple_generator {
    ($(($gen:ident, $value:ident, $idx:tt)),+) => {
        impl<$($value, $gen),+> Generator<($($value,)+)> for ($($gen,)+)
        where
            $($gen: Generator<$value>),+
        {
            fn generate(&self, rng: &mut dyn RngCore) -> ($($value,)+) {
                // Tuple expressions evaluate left to right: first field first.
                ($(self.$idx.generate(rng),)+)
            }
        }
    };
}

impl_tuple_generator!((G1, A, 0), (G2, B, 1));
impl_tuple_generator!((G1, A, 0), (G2, B, 1), (G3, C, 2));
impl_tuple_generator!((G1, A, 0), (G2, B, 1), (G3, C, 2), (G4, D, 3));
impl_tuple_generator!((G1, A, 0), (G2, B, 1), (G3, C, 2), (G4, D, 3), (G5, E, 4));
impl_tuple_generator!(
    (G1, A, 0),
    (G2, B, 1),
    (G3, C, 2),
    (G4, D, 3),
    (G5, E, 4),
    (G6, F, 5)
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomSource;
    use rand::Rng;

    fn next_int() -> FromFn<impl Fn(&mut dyn RngCore) -> i32> {
        from_fn(|rng: &mut dyn RngCore| rng.r#gen::<i32>())
    }

    #[test]
    fn test_constant_ignores_source() {
        let generator = constant(42);
        let mut source = RandomSource::from_seed(1);

        for _ in 0..10 {
            assert_eq!(generator.generate(&mut source), 42);
        }
    }

    #[test]
    fn test_from_fn_is_deterministic() {
        let generator = next_int();
        let mut first = RandomSource::from_seed(5);
        let mut second = RandomSource::from_seed(5);

        let a: Vec<i32> = (0..20).map(|_| generator.generate(&mut first)).collect();
        let b: Vec<i32> = (0..20).map(|_| generator.generate(&mut second)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_map_applies_function() {
        let generator = constant(5).map(|x| x * 2);
        let mut source = RandomSource::from_seed(0);
        assert_eq!(generator.generate(&mut source), 10);
    }

    #[test]
    fn test_map_preserves_determinism() {
        let generator = next_int().map(|x| x.wrapping_mul(3));
        let mut first = RandomSource::from_seed(11);
        let mut second = RandomSource::from_seed(11);
        assert_eq!(generator.generate(&mut first), generator.generate(&mut second));
    }

    #[test]
    fn test_filter_only_yields_accepted_values() {
        let generator = next_int().filter(|x| x % 2 == 0);
        let mut source = RandomSource::from_seed(3);

        for _ in 0..50 {
            assert_eq!(generator.generate(&mut source) % 2, 0);
        }
    }

    #[test]
    #[should_panic(expected = "Filter rejected 1000 consecutive values")]
    fn test_filter_gives_up_eventually() {
        let generator = constant(1).filter(|x| *x > 1);
        let mut source = RandomSource::from_seed(3);
        generator.generate(&mut source);
    }

    #[test]
    fn test_tuple_draws_first_field_first() {
        let mut reference = RandomSource::from_seed(21);
        let first: i32 = reference.r#gen();
        let second: i32 = reference.r#gen();
        let third: i32 = reference.r#gen();

        let mut source = RandomSource::from_seed(21);
        let triple = (next_int(), next_int(), next_int()).generate(&mut source);
        assert_eq!(triple, (first, second, third));
    }

    #[test]
    fn test_field_order_changes_values() {
        let mut source = RandomSource::from_seed(8);
        let (a, _) = (next_int(), constant(0u8)).generate(&mut source);

        let mut source = RandomSource::from_seed(8);
        let (_, b, c) = (constant(0u8), next_int(), next_int()).generate(&mut source);

        // The constant consumes nothing, so the first random field matches.
        assert_eq!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn test_zip_builds_pair() {
        let generator = constant(1).zip(constant("one"));
        let mut source = RandomSource::from_seed(0);
        assert_eq!(generator.generate(&mut source), (1, "one"));
    }

    #[test]
    fn test_boxed_generator() {
        let generator = constant("test").boxed();
        let mut source = RandomSource::from_seed(0);
        assert_eq!(generator.generate(&mut source), "test");
        assert!(format!("{:?}", generator).contains("BoxedGenerator"));
    }

    #[test]
    fn test_reference_is_a_generator() {
        let generator = constant(9);
        let borrowed = &generator;
        let mut source = RandomSource::from_seed(0);
        assert_eq!(borrowed.generate(&mut source), 9);
    }
}
