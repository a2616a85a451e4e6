//! Generators and simplifiers for primitive types and basic collections.
//!
//! Most generators here also implement [`Simplifier`] for the values they
//! produce, keeping candidates inside the generator's domain.

use std::iter;

use num_traits::{Bounded, Float, PrimInt};
use rand::distributions::uniform::SampleUniform;
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::{Rng, RngCore};

use crate::generator::{BoxedGenerator, Generator};
use crate::simplifier::Simplifier;

/// Default upper bound on generated collection lengths
pub const DEFAULT_MAX_LEN: usize = 32;

/// Generator for boolean values
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolGenerator;

impl Generator<bool> for BoolGenerator {
    fn generate(&self, rng: &mut dyn RngCore) -> bool {
        rng.r#gen()
    }
}

impl Simplifier<bool> for BoolGenerator {
    fn simplify(&self, value: &bool) -> Box<dyn Iterator<Item = bool> + '_> {
        // true is simplified to false
        Box::new((*value).then_some(false).into_iter())
    }
}

/// Generator for integers in an inclusive range
#[derive(Debug, Clone, Copy)]
pub struct IntGenerator<T> {
    min: T,
    max: T,
}

impl<T> IntGenerator<T>
where
    T: PrimInt,
{
    /// Create a generator for `min..=max`
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn new(min: T, max: T) -> Self {
        assert!(min <= max, "IntGenerator requires min <= max");
        Self { min, max }
    }

    /// Create a generator for the full range of the type
    pub fn full_range() -> Self {
        Self::new(T::min_value(), T::max_value())
    }

    /// The value candidates move towards: zero, or the bound nearest to it
    fn target(&self) -> T {
        let zero = T::zero();
        if self.min > zero {
            self.min
        } else if self.max < zero {
            self.max
        } else {
            zero
        }
    }
}

impl<T> Generator<T> for IntGenerator<T>
where
    T: PrimInt + SampleUniform,
{
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        rng.gen_range(self.min..=self.max)
    }
}

impl<T> Simplifier<T> for IntGenerator<T>
where
    T: PrimInt + 'static,
{
    fn simplify(&self, value: &T) -> Box<dyn Iterator<Item = T> + '_> {
        let value = *value;
        if value < self.min || value > self.max {
            return Box::new(iter::empty());
        }
        Box::new(towards(value, self.target()).into_iter())
    }
}

/// Candidates moving `value` towards `target`: the target itself, the
/// midpoint, then a single step
fn towards<T: PrimInt>(value: T, target: T) -> Vec<T> {
    let mut candidates: Vec<T> = Vec::with_capacity(3);
    if value == target {
        return candidates;
    }

    let two = T::one() + T::one();
    // value and target never straddle zero unless target is zero, so the
    // difference cannot overflow
    let midpoint = target + (value - target) / two;
    let step = if value > target {
        value - T::one()
    } else {
        value + T::one()
    };

    for candidate in [target, midpoint, step] {
        if candidate != value && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// Create a generator for integers in `min..=max`
pub fn ints<T: PrimInt>(min: T, max: T) -> IntGenerator<T> {
    IntGenerator::new(min, max)
}

/// Simplifier moving integers towards zero
pub fn int_simplifier<T: PrimInt + Bounded>() -> IntGenerator<T> {
    IntGenerator::full_range()
}

/// Generator for floating point values in an inclusive range
#[derive(Debug, Clone, Copy)]
pub struct FloatGenerator<T> {
    min: T,
    max: T,
}

impl<T: Float> FloatGenerator<T> {
    /// Create a generator for `min..=max`
    ///
    /// # Panics
    ///
    /// Panics if either bound is not finite or `min > max`.
    pub fn new(min: T, max: T) -> Self {
        assert!(
            min.is_finite() && max.is_finite() && min <= max,
            "FloatGenerator requires finite bounds with min <= max"
        );
        Self { min, max }
    }

    fn target(&self) -> T {
        T::zero().max(self.min).min(self.max)
    }
}

impl<T> Generator<T> for FloatGenerator<T>
where
    T: Float + SampleUniform,
{
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        rng.gen_range(self.min..=self.max)
    }
}

impl<T> Simplifier<T> for FloatGenerator<T>
where
    T: Float + 'static,
{
    fn simplify(&self, value: &T) -> Box<dyn Iterator<Item = T> + '_> {
        let value = *value;
        let target = self.target();
        let mut candidates = Vec::with_capacity(2);

        if value.is_nan() || value != target {
            candidates.push(target);
        }
        let truncated = value.trunc();
        if value.is_finite()
            && truncated != value
            && truncated != target
            && truncated >= self.min
            && truncated <= self.max
        {
            candidates.push(truncated);
        }
        Box::new(candidates.into_iter())
    }
}

/// Create a generator for floats in `min..=max`
pub fn floats<T: Float>(min: T, max: T) -> FloatGenerator<T> {
    FloatGenerator::new(min, max)
}

/// Generator for printable ASCII characters
#[derive(Debug, Clone, Copy, Default)]
pub struct CharGenerator;

impl Generator<char> for CharGenerator {
    fn generate(&self, rng: &mut dyn RngCore) -> char {
        char::from(rng.gen_range(b' '..=b'~'))
    }
}

impl Simplifier<char> for CharGenerator {
    fn simplify(&self, value: &char) -> Box<dyn Iterator<Item = char> + '_> {
        // 'a' is the simplest character
        Box::new((*value != 'a').then_some('a').into_iter())
    }
}

/// Generator for strings of printable ASCII characters
#[derive(Debug, Clone, Copy)]
pub struct StringGenerator {
    max_len: usize,
}

impl StringGenerator {
    /// Create a generator for strings of at most `max_len` characters
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl Default for StringGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEN)
    }
}

impl Generator<String> for StringGenerator {
    fn generate(&self, rng: &mut dyn RngCore) -> String {
        let len = rng.gen_range(0..=self.max_len);
        (0..len).map(|_| CharGenerator.generate(rng)).collect()
    }
}

impl Simplifier<String> for StringGenerator {
    fn simplify(&self, value: &String) -> Box<dyn Iterator<Item = String> + '_> {
        let chars: Vec<char> = value.chars().collect();
        let len = chars.len();

        let empty = (len > 1).then(String::new);
        let removals = (0..len).map(move |index| {
            chars
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, c)| *c)
                .collect()
        });
        Box::new(empty.into_iter().chain(removals))
    }
}

/// Create a generator for strings of at most `max_len` characters
pub fn strings(max_len: usize) -> StringGenerator {
    StringGenerator::new(max_len)
}

/// Generator for vectors with elements drawn from an element generator
#[derive(Debug, Clone)]
pub struct VecGenerator<G> {
    element: G,
    min_len: usize,
    max_len: usize,
}

impl<G> VecGenerator<G> {
    /// Create a generator for vectors of `min_len..=max_len` elements
    ///
    /// # Panics
    ///
    /// Panics if `min_len > max_len`.
    pub fn new(element: G, min_len: usize, max_len: usize) -> Self {
        assert!(min_len <= max_len, "VecGenerator requires min_len <= max_len");
        Self {
            element,
            min_len,
            max_len,
        }
    }
}

impl<T, G> Generator<Vec<T>> for VecGenerator<G>
where
    G: Generator<T>,
{
    fn generate(&self, rng: &mut dyn RngCore) -> Vec<T> {
        let len = rng.gen_range(self.min_len..=self.max_len);
        (0..len).map(|_| self.element.generate(rng)).collect()
    }
}

impl<T, G> Simplifier<Vec<T>> for VecGenerator<G>
where
    T: Clone + 'static,
    G: Simplifier<T>,
{
    fn simplify(&self, value: &Vec<T>) -> Box<dyn Iterator<Item = Vec<T>> + '_> {
        let len = value.len();
        let min_len = self.min_len;

        // Shorter vectors first, then simpler elements.
        let empty = (min_len == 0 && len > 1).then(Vec::new);
        let without = value.clone();
        let removals = (0..len)
            .filter(move |_| len > min_len)
            .map(move |index| {
                let mut shorter = without.clone();
                shorter.remove(index);
                shorter
            });

        let base = value.clone();
        let element = &self.element;
        let items = (0..len).flat_map(move |index| {
            let replaced = base.clone();
            element.simplify(&base[index]).map(move |item| {
                let mut candidate = replaced.clone();
                candidate[index] = item;
                candidate
            })
        });

        Box::new(empty.into_iter().chain(removals).chain(items))
    }
}

/// Create a generator for vectors of at most `max_len` elements
pub fn vecs<G>(element: G, max_len: usize) -> VecGenerator<G> {
    VecGenerator::new(element, 0, max_len)
}

/// Generator that picks uniformly from a fixed set of values
#[derive(Debug, Clone)]
pub struct OneOfGenerator<T> {
    values: Vec<T>,
}

impl<T: Clone> OneOfGenerator<T> {
    /// Create a new one-of generator
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn new(values: Vec<T>) -> Self {
        if values.is_empty() {
            panic!("OneOfGenerator cannot be created with empty values");
        }
        Self { values }
    }
}

impl<T: Clone> Generator<T> for OneOfGenerator<T> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        let index = rng.gen_range(0..self.values.len());
        self.values[index].clone()
    }
}

impl<T: Clone + PartialEq + 'static> Simplifier<T> for OneOfGenerator<T> {
    fn simplify(&self, value: &T) -> Box<dyn Iterator<Item = T> + '_> {
        // Earlier values are simpler than later ones.
        let position = self
            .values
            .iter()
            .position(|candidate| candidate == value)
            .unwrap_or(0);
        Box::new(self.values[..position].iter().cloned())
    }
}

/// Create a generator that picks uniformly from `values`
pub fn one_of<T: Clone>(values: Vec<T>) -> OneOfGenerator<T> {
    OneOfGenerator::new(values)
}

/// Generator that delegates to one of several generators by weight
pub struct FrequencyGenerator<T> {
    choices: Vec<BoxedGenerator<T>>,
    weights: WeightedIndex<u32>,
}

impl<T> FrequencyGenerator<T> {
    /// Create a weighted choice between generators
    pub fn new(choices: Vec<(u32, BoxedGenerator<T>)>) -> Result<Self, WeightedError> {
        let weights = WeightedIndex::new(choices.iter().map(|(weight, _)| *weight))?;
        Ok(Self {
            choices: choices.into_iter().map(|(_, generator)| generator).collect(),
            weights,
        })
    }
}

impl<T> Generator<T> for FrequencyGenerator<T> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        let index = self.weights.sample(rng);
        self.choices[index].generate(rng)
    }
}

/// Create a weighted choice between generators
pub fn frequency<T>(
    choices: Vec<(u32, BoxedGenerator<T>)>,
) -> Result<FrequencyGenerator<T>, WeightedError> {
    FrequencyGenerator::new(choices)
}
