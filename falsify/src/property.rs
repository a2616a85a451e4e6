//! Property definitions and panic-safe evaluation.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Values a property body may return
///
/// `()` always passes, `false` fails, and `Err` fails with its message.
/// A panic inside the body (for example a failed `assert!`) also fails.
pub trait PropertyOutcome {
    /// Convert into pass (`Ok`) or failure with a description (`Err`)
    fn into_outcome(self) -> Result<(), String>;
}

impl PropertyOutcome for () {
    fn into_outcome(self) -> Result<(), String> {
        Ok(())
    }
}

impl PropertyOutcome for bool {
    fn into_outcome(self) -> Result<(), String> {
        if self {
            Ok(())
        } else {
            Err("Property returned false".to_string())
        }
    }
}

impl<T, E: fmt::Display> PropertyOutcome for Result<T, E> {
    fn into_outcome(self) -> Result<(), String> {
        self.map(|_| ()).map_err(|error| error.to_string())
    }
}

/// Property definition trait
///
/// Implemented for every `FnMut(T) -> O` where `O: PropertyOutcome`, so plain
/// closures can be checked directly. Properties may carry side effects such
/// as logging the values they see.
pub trait Property<T> {
    /// Test the property with the given input
    fn test(&mut self, input: T) -> Result<(), String>;
}

impl<T, F, O> Property<T> for F
where
    F: FnMut(T) -> O,
    O: PropertyOutcome,
{
    fn test(&mut self, input: T) -> Result<(), String> {
        self(input).into_outcome()
    }
}

/// Evaluate `property` on `input`, treating a panic as a failure
pub fn evaluate<T, P>(property: &mut P, input: T) -> Result<(), String>
where
    P: Property<T> + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| property.test(input))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Property panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_passes() {
        let mut property = |_: i32| ();
        assert_eq!(evaluate(&mut property, 1), Ok(()));
    }

    #[test]
    fn test_bool_outcome() {
        let mut property = |x: i32| x > 0;
        assert_eq!(evaluate(&mut property, 1), Ok(()));
        assert_eq!(
            evaluate(&mut property, -1),
            Err("Property returned false".to_string())
        );
    }

    #[test]
    fn test_result_outcome() {
        let mut property = |x: i32| -> Result<i32, String> {
            if x % 2 == 0 {
                Ok(x / 2)
            } else {
                Err(format!("{} is odd", x))
            }
        };
        assert_eq!(evaluate(&mut property, 4), Ok(()));
        assert_eq!(evaluate(&mut property, 3), Err("3 is odd".to_string()));
    }

    #[test]
    fn test_panic_is_failure() {
        let mut property = |x: i32| assert!(x < 10, "too big: {}", x);
        assert_eq!(evaluate(&mut property, 5), Ok(()));
        assert_eq!(evaluate(&mut property, 50), Err("too big: 50".to_string()));
    }

    #[test]
    fn test_static_str_panic_message() {
        let mut property = |_: ()| -> bool { panic!("boom") };
        assert_eq!(evaluate(&mut property, ()), Err("boom".to_string()));
    }

    #[test]
    fn test_stateful_property() {
        let mut seen = Vec::new();
        let mut property = |x: i32| seen.push(x);
        for i in 0..3 {
            evaluate(&mut property, i).unwrap();
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
