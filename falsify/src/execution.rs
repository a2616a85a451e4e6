//! Evaluation driver: draws values, evaluates the property, and shrinks and
//! reports the first falsification.

use std::fmt::Debug;

use tracing::debug;

use crate::config::CheckConfig;
use crate::error::{CheckError, CheckResult, CheckSuccess, Falsification, FalsificationReport};
use crate::generator::Generator;
use crate::property::{Property, PropertyOutcome, evaluate};
use crate::registry::GeneratorRegistry;
use crate::rng::RandomSource;
use crate::shrink::find_simplest_falsification_bounded;
use crate::simplifier::{DontSimplify, Simplifier};

type Render<T> = fn(&T) -> Vec<String>;

fn run<T, P>(
    generator: &dyn Generator<T>,
    simplifier: &dyn Simplifier<T>,
    config: &CheckConfig,
    property: &mut P,
    render: Render<T>,
) -> CheckResult<T>
where
    T: Clone,
    P: Property<T> + ?Sized,
{
    config.validate()?;

    let mut source = match config.seed {
        Some(seed) => RandomSource::from_seed(seed),
        None => RandomSource::from_entropy(),
    };
    let seed = source.seed();
    debug!(iterations = config.iterations, seed, "starting property check");

    for iteration in 1..=config.iterations {
        let input = generator.generate(&mut source);

        let cause = match evaluate(property, input.clone()) {
            Ok(()) => continue,
            Err(cause) => cause,
        };
        debug!(iteration, seed, %cause, "property falsified");

        let mut last_cause = cause;
        let shrunk = find_simplest_falsification_bounded(
            simplifier,
            input.clone(),
            |candidate: &T| {
                evaluate(property, candidate.clone())
                    .map_err(|cause| last_cause = cause)
                    .is_ok()
            },
            config.max_shrink_steps,
        );

        let report = FalsificationReport::new(
            iteration,
            config.iterations,
            seed,
            render(&shrunk.minimal),
        )
        .with_cause(last_cause);

        return Err(CheckError::Falsified(Box::new(Falsification {
            report,
            original: input,
            minimal: shrunk.minimal,
            shrink_steps: shrunk.shrink_steps,
        })));
    }

    debug!(iterations = config.iterations, seed, "property check passed");
    Ok(CheckSuccess {
        iterations: config.iterations,
        seed,
    })
}

fn render_one<T: Debug>(value: &T) -> Vec<String> {
    vec![format!("{:?}", value)]
}

fn render_pair<A: Debug, B: Debug>(value: &(A, B)) -> Vec<String> {
    vec![format!("{:?}", value.0), format!("{:?}", value.1)]
}

fn render_triple<A: Debug, B: Debug, C: Debug>(value: &(A, B, C)) -> Vec<String> {
    vec![
        format!("{:?}", value.0),
        format!("{:?}", value.1),
        format!("{:?}", value.2),
    ]
}

/// Builder for a property check
///
/// ```rust
/// use falsify::execution::ForAll;
/// use falsify::primitives::ints;
///
/// let error = ForAll::new(ints(0, 1000))
///     .simplifier(ints(0, 1000))
///     .seed(3)
///     .check(|x: i32| x < 100)
///     .unwrap_err();
///
/// let falsification = error.falsification().unwrap();
/// assert_eq!(falsification.minimal, 100);
/// assert!(error.to_string().ends_with("Argument 1: 100\nGeneration seed: 3"));
/// ```
#[derive(Debug, Clone)]
pub struct ForAll<G, S = DontSimplify> {
    generator: G,
    simplifier: S,
    config: CheckConfig,
}

impl<G> ForAll<G> {
    /// Start a check over values drawn from `generator`, with the default
    /// configuration and no simplification
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            simplifier: DontSimplify,
            config: CheckConfig::default(),
        }
    }
}

impl<G, S> ForAll<G, S> {
    /// Simplify falsifying values with `simplifier` before reporting them
    pub fn simplifier<S2>(self, simplifier: S2) -> ForAll<G, S2> {
        ForAll {
            generator: self.generator,
            simplifier,
            config: self.config,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: CheckConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of iterations
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    /// Set the generation seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Cap the number of accepted shrink steps
    pub fn max_shrink_steps(mut self, max_shrink_steps: usize) -> Self {
        self.config.max_shrink_steps = Some(max_shrink_steps);
        self
    }

    /// Check a single-argument property
    pub fn check<T, P>(self, mut property: P) -> CheckResult<T>
    where
        T: Clone + Debug,
        G: Generator<T>,
        S: Simplifier<T>,
        P: Property<T>,
    {
        run(
            &self.generator,
            &self.simplifier,
            &self.config,
            &mut property,
            render_one::<T>,
        )
    }

    /// Check a two-argument property over a generator of pairs
    pub fn check2<A, B, F, O>(self, mut property: F) -> CheckResult<(A, B)>
    where
        A: Clone + Debug,
        B: Clone + Debug,
        G: Generator<(A, B)>,
        S: Simplifier<(A, B)>,
        F: FnMut(A, B) -> O,
        O: PropertyOutcome,
    {
        let mut property = |(a, b): (A, B)| property(a, b);
        run(
            &self.generator,
            &self.simplifier,
            &self.config,
            &mut property,
            render_pair::<A, B>,
        )
    }

    /// Check a three-argument property over a generator of triples
    pub fn check3<A, B, C, F, O>(self, mut property: F) -> CheckResult<(A, B, C)>
    where
        A: Clone + Debug,
        B: Clone + Debug,
        C: Clone + Debug,
        G: Generator<(A, B, C)>,
        S: Simplifier<(A, B, C)>,
        F: FnMut(A, B, C) -> O,
        O: PropertyOutcome,
    {
        let mut property = |(a, b, c): (A, B, C)| property(a, b, c);
        run(
            &self.generator,
            &self.simplifier,
            &self.config,
            &mut property,
            render_triple::<A, B, C>,
        )
    }
}

/// Check `property` against values from `generator` with the default
/// configuration
pub fn check_for_all<T, G, P>(generator: G, property: P) -> CheckResult<T>
where
    T: Clone + Debug + 'static,
    G: Generator<T>,
    P: Property<T>,
{
    ForAll::new(generator).check(property)
}

/// Check `property` against values from `generator` with a custom
/// configuration
pub fn check_for_all_with_config<T, G, P>(
    generator: G,
    config: CheckConfig,
    property: P,
) -> CheckResult<T>
where
    T: Clone + Debug + 'static,
    G: Generator<T>,
    P: Property<T>,
{
    ForAll::new(generator).config(config).check(property)
}

/// Check `property`, simplifying any falsifying value with `simplifier`
pub fn check_for_all_simplified<T, G, S, P>(
    generator: G,
    simplifier: S,
    config: CheckConfig,
    property: P,
) -> CheckResult<T>
where
    T: Clone + Debug,
    G: Generator<T>,
    S: Simplifier<T>,
    P: Property<T>,
{
    ForAll::new(generator)
        .simplifier(simplifier)
        .config(config)
        .check(property)
}

/// Check a two-argument property; `first` is drawn before `second`
pub fn check_for_all2<A, B, G1, G2, F, O>(
    first: G1,
    second: G2,
    config: CheckConfig,
    property: F,
) -> CheckResult<(A, B)>
where
    A: Clone + Debug + 'static,
    B: Clone + Debug + 'static,
    G1: Generator<A>,
    G2: Generator<B>,
    F: FnMut(A, B) -> O,
    O: PropertyOutcome,
{
    ForAll::new((first, second)).config(config).check2(property)
}

/// Check a three-argument property; fields are drawn in argument order
pub fn check_for_all3<A, B, C, G1, G2, G3, F, O>(
    first: G1,
    second: G2,
    third: G3,
    config: CheckConfig,
    property: F,
) -> CheckResult<(A, B, C)>
where
    A: Clone + Debug + 'static,
    B: Clone + Debug + 'static,
    C: Clone + Debug + 'static,
    G1: Generator<A>,
    G2: Generator<B>,
    G3: Generator<C>,
    F: FnMut(A, B, C) -> O,
    O: PropertyOutcome,
{
    ForAll::new((first, second, third))
        .config(config)
        .check3(property)
}

/// Check `property` with the generator (and simplifier, if any) registered
/// for `T` in `registry`
///
/// Fails with [`CheckError::GenerationSetup`] before drawing anything if no
/// generator is registered for `T`.
pub fn check_for_all_registered<T, P>(
    registry: &GeneratorRegistry,
    config: CheckConfig,
    mut property: P,
) -> CheckResult<T>
where
    T: Clone + Debug + 'static,
    P: Property<T>,
{
    let generator = registry
        .get::<T>()
        .ok_or(CheckError::GenerationSetup {
            type_name: std::any::type_name::<T>(),
        })?;

    let fallback = DontSimplify;
    let simplifier: &dyn Simplifier<T> = match registry.simplifier::<T>() {
        Some(simplifier) => simplifier,
        None => &fallback,
    };

    run(generator, simplifier, &config, &mut property, render_one::<T>)
}
