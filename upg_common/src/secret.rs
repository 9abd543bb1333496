//! A wrapper that keeps credentials out of logs.
//!
//! The polygonscan API key travels from the environment through the configuration struct into the explorer client,
//! and both of those get formatted in log statements along the way. Wrapping the key in [`Secret`] makes the
//! redaction automatic: `Debug` and `Display` always print `****`, and the value only comes out through an explicit
//! [`Secret::reveal`] call at the point where the request is built.
use std::fmt::{self, Debug, Display};

#[derive(Clone, Default)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Hands out the wrapped value. Call this as late as possible, and never in a format string.
    pub fn reveal(&self) -> &T {
        &self.0
    }
}

impl<T> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}
