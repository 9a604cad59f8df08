//! Best-effort parse outcomes.

use serde::{Deserialize, Serialize};

/// A value recovered from scene text, tagged with whether it was actually read
/// or substituted with a default.
///
/// The codec never fails on a malformed color or an unclassifiable block; it
/// hands back a usable value either way. Callers that care can tell the two
/// apart, the editor itself simply calls [`Decoded::into_value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decoded<T> {
    /// The value was parsed from the input.
    Parsed(T),
    /// The input was missing or unparseable; this is the substituted default.
    Fallback(T),
}

impl<T> Decoded<T> {
    pub fn value(&self) -> &T {
        match self {
            Self::Parsed(v) | Self::Fallback(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Parsed(v) | Self::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Applies `f` to the inner value, keeping the parsed/fallback tag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        match self {
            Self::Parsed(v) => Decoded::Parsed(f(v)),
            Self::Fallback(v) => Decoded::Fallback(f(v)),
        }
    }

    /// Replaces a fallback with `default`, leaving parsed values untouched.
    pub fn or_fallback(self, default: T) -> Decoded<T> {
        match self {
            Self::Parsed(v) => Self::Parsed(v),
            Self::Fallback(_) => Self::Fallback(default),
        }
    }
}
