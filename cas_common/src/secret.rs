//! Redaction for sensitive configuration values.
//!
//! Client secrets and signing keys travel through config structs that get `Debug`-printed in
//! logs. Wrapping them in [`Secret`] makes leaking one a deliberate act (`reveal()`) instead of
//! an accident.
use std::{
    fmt,
    fmt::{Debug, Display},
};

const REDACTED: &str = "****";

/// Holds a sensitive value and prints [`REDACTED`] wherever it would otherwise be formatted.
/// Equality still compares the inner values, so secret comparison need not unwrap either side.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret<T>
where T: Clone + Default
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// The inner value. Never format or log the result.
    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl<T: Clone + Default> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone + Default> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
