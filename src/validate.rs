//! Validator contract.
//!
//! A validator maps a candidate value to a [`ValidationOutcome`]: an empty message
//! means valid, anything else is shown beneath the input line. Numeric prompts call
//! their validator on every keystroke, so implementations must be cheap and free of
//! side effects.

use std::fmt;

/// Result of validating one candidate value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome(String);

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self(String::new())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    /// Error message to display, if the value was rejected.
    pub fn message(&self) -> Option<&str> {
        if self.0.is_empty() {
            None
        } else {
            Some(&self.0)
        }
    }
}

impl From<String> for ValidationOutcome {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for ValidationOutcome {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl<S: Into<ValidationOutcome>> From<Option<S>> for ValidationOutcome {
    fn from(message: Option<S>) -> Self {
        message.map_or_else(Self::valid, Into::into)
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.write_str(message),
            None => f.write_str("valid"),
        }
    }
}

/// Pure check of a candidate value.
pub trait Validator<T: ?Sized> {
    fn validate(&self, value: &T) -> ValidationOutcome;
}

impl<T, F, S> Validator<T> for F
where
    T: ?Sized,
    F: Fn(&T) -> S,
    S: Into<ValidationOutcome>,
{
    fn validate(&self, value: &T) -> ValidationOutcome {
        self(value).into()
    }
}

/// Boxed validator as stored by the prompt builders.
pub type BoxedValidator<'a, T> = Box<dyn Validator<T> + 'a>;

/// Run `validator` if present; a missing validator accepts everything.
pub(crate) fn run<T: ?Sized>(
    validator: Option<&BoxedValidator<'_, T>>,
    value: &T,
) -> ValidationOutcome {
    validator.map_or_else(ValidationOutcome::valid, |validator| {
        validator.validate(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_is_valid() {
        assert!(ValidationOutcome::from("").is_valid());
        assert!(ValidationOutcome::from(String::new()).is_valid());
        assert_eq!(ValidationOutcome::valid().message(), None);
    }

    #[test]
    fn non_empty_message_is_invalid() {
        let outcome = ValidationOutcome::from("must be >=18");
        assert!(!outcome.is_valid());
        assert_eq!(outcome.message(), Some("must be >=18"));
        assert_eq!(outcome.to_string(), "must be >=18");
    }

    #[test]
    fn option_maps_none_to_valid() {
        assert!(ValidationOutcome::from(None::<&str>).is_valid());
        assert!(!ValidationOutcome::from(Some("nope")).is_valid());
    }

    #[test]
    fn closures_are_validators() {
        let adult = |age: &u64| if *age < 18 { "must be >=18" } else { "" };
        assert!(!adult.validate(&12).is_valid());
        assert!(adult.validate(&121).is_valid());

        let non_empty = |text: &str| {
            if text.is_empty() {
                Some(format!("{} is empty", "value"))
            } else {
                None
            }
        };
        assert_eq!(non_empty.validate("").message(), Some("value is empty"));
        assert!(non_empty.validate("x").is_valid());
    }

    #[test]
    fn missing_validator_accepts() {
        assert!(run::<u64>(None, &0).is_valid());

        let boxed: BoxedValidator<'_, u64> =
            Box::new(|n: &u64| if *n == 0 { "zero" } else { "" });
        assert!(!run(Some(&boxed), &0).is_valid());
    }
}
