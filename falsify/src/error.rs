//! Error types and falsification reports.

use std::fmt;

use crate::config::ConfigError;

/// Report describing a falsified property
///
/// The [`message`](Self::message) is the one stable, user-facing text of a
/// failed check. It always names the seed that reproduces the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FalsificationReport {
    /// 1-based index of the iteration that failed
    pub iterations_run: usize,
    /// Number of iterations the check was configured for
    pub iterations_requested: usize,
    /// Seed the random source was initialized with
    pub seed: u64,
    /// Rendered arguments, simplified when a simplifier was available
    pub arguments: Vec<String>,
    /// Formatted report text
    pub message: String,
    /// What the property reported when it last failed, if anything
    pub cause: Option<String>,
}

impl FalsificationReport {
    /// Build a report and format its message
    pub fn new(
        iterations_run: usize,
        iterations_requested: usize,
        seed: u64,
        arguments: Vec<String>,
    ) -> Self {
        let message = format_message(iterations_run, iterations_requested, seed, &arguments);
        Self {
            iterations_run,
            iterations_requested,
            seed,
            arguments,
            message,
            cause: None,
        }
    }

    /// Attach the failure cause reported by the property
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

fn format_message(
    iterations_run: usize,
    iterations_requested: usize,
    seed: u64,
    arguments: &[String],
) -> String {
    let mut lines = Vec::with_capacity(arguments.len() + 2);
    lines.push(format!(
        "Property falsified after {} tests (out of {})",
        iterations_run, iterations_requested
    ));
    for (index, argument) in arguments.iter().enumerate() {
        lines.push(format!("Argument {}: {}", index + 1, argument));
    }
    lines.push(format!("Generation seed: {}", seed));
    lines.join("\n")
}

impl fmt::Display for FalsificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FalsificationReport {}

/// Details of a falsified check, with the typed values involved
#[derive(Debug, Clone)]
pub struct Falsification<T> {
    /// The report surfaced to the user
    pub report: FalsificationReport,
    /// Value drawn on the failing iteration
    pub original: T,
    /// Value after simplification; equal to `original` without a simplifier
    pub minimal: T,
    /// Number of accepted simplification steps
    pub shrink_steps: usize,
}

/// Why a property check did not succeed
#[derive(Debug, Clone)]
pub enum CheckError<T> {
    /// The property failed for some generated value
    Falsified(Box<Falsification<T>>),
    /// No generator could be resolved for the requested type
    GenerationSetup { type_name: &'static str },
    /// The check configuration was invalid
    Config(ConfigError),
}

impl<T> CheckError<T> {
    /// The falsification report, if the property was falsified
    pub fn report(&self) -> Option<&FalsificationReport> {
        match self {
            CheckError::Falsified(falsification) => Some(&falsification.report),
            _ => None,
        }
    }

    /// The falsification details, if the property was falsified
    pub fn falsification(&self) -> Option<&Falsification<T>> {
        match self {
            CheckError::Falsified(falsification) => Some(falsification),
            _ => None,
        }
    }
}

impl<T> fmt::Display for CheckError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Falsified(falsification) => write!(f, "{}", falsification.report),
            CheckError::GenerationSetup { type_name } => {
                write!(f, "No generator available for type {}", type_name)
            }
            CheckError::Config(error) => write!(f, "Configuration error: {}", error),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for CheckError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Config(error) => Some(error),
            _ => None,
        }
    }
}

impl<T> From<ConfigError> for CheckError<T> {
    fn from(error: ConfigError) -> Self {
        CheckError::Config(error)
    }
}

/// Information about a check in which every iteration passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSuccess {
    /// Number of iterations run
    pub iterations: usize,
    /// Seed the random source was initialized with
    pub seed: u64,
}

/// Result of a property check
pub type CheckResult<T> = Result<CheckSuccess, CheckError<T>>;
