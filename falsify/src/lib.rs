#![allow(clippy::result_large_err)]

//! # Falsify - Seeded Property Checking for Rust
//!
//! Falsify checks a property against pseudo-random inputs drawn from a seeded
//! source. The first input that falsifies the property is simplified by a
//! greedy search and reported together with the seed that reproduces it.
//!
//! ## Quick Start
//!
//! ```rust
//! use falsify::{CheckConfig, check_for_all_simplified, int_simplifier, ints};
//!
//! let config = CheckConfig::default().with_seed(42);
//! let result = check_for_all_simplified(ints(0, 10_000), int_simplifier(), config, |x: i32| {
//!     x < 1000
//! });
//!
//! let error = result.unwrap_err();
//! assert_eq!(error.falsification().unwrap().minimal, 1000);
//! assert!(error.to_string().starts_with("Property falsified after"));
//! assert!(error.to_string().ends_with("Argument 1: 1000\nGeneration seed: 42"));
//! ```
//!
//! ## Reproducing a failure
//!
//! Every report ends with `Generation seed: <seed>`. Passing that seed back
//! through [`CheckConfig::with_seed`], or the `FALSIFY_SEED` environment
//! variable with [`CheckConfig::from_env`], draws the same values again and
//! fails on the same iteration.
//!
//! ## Logging
//!
//! Runs and shrink searches emit [`tracing`] events. Nothing is printed
//! unless the application installs a subscriber.

// Public modules
pub mod config;
pub mod error;
pub mod execution;
pub mod generator;
pub mod primitives;
pub mod property;
pub mod registry;
pub mod rng;
pub mod shrink;
pub mod simplifier;

// Re-export the main public API
pub use config::{CheckConfig, ConfigError, DEFAULT_ITERATIONS};
pub use error::{CheckError, CheckResult, CheckSuccess, Falsification, FalsificationReport};
pub use execution::{
    ForAll, check_for_all, check_for_all_registered, check_for_all_simplified,
    check_for_all_with_config, check_for_all2, check_for_all3,
};
pub use generator::{BoxedGenerator, Generator, constant};
pub use primitives::{
    BoolGenerator, CharGenerator, FloatGenerator, FrequencyGenerator, IntGenerator,
    OneOfGenerator, StringGenerator, VecGenerator, floats, frequency, int_simplifier, ints,
    one_of, strings, vecs,
};
pub use property::{Property, PropertyOutcome};
pub use registry::GeneratorRegistry;
pub use rng::RandomSource;
pub use shrink::{ShrinkResult, find_simplest_falsification, find_simplest_falsification_bounded};
pub use simplifier::{
    BoxedSimplifier, DontSimplify, Fuzzer, RoundRobin, Simplifier, dont_simplify, pair, pair_of,
    triple, triple_of,
};
