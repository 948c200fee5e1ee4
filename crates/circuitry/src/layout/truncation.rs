//! Pin name truncation for collapsed groups.
//!
//! Group pins are often named after the deeply nested pin they expose, which
//! makes collapsed groups very wide. Overlong names are shortened to
//! `prefix...suffix`.

use std::borrow::Cow;

use crate::layout::LayoutError;

/// Default maximum pin name length on a collapsed group.
pub const DEFAULT_MAX_PIN_NAME_LENGTH: usize = 25;

/// Smallest accepted maximum pin name length.
pub const MIN_MAX_PIN_NAME_LENGTH: usize = 5;

const ELLIPSIS: &str = "...";

/// Truncation rule for pin names, counted in characters.
///
/// # Examples
///
/// ```
/// # use circuitry::layout::PinNameTruncation;
/// let truncation = PinNameTruncation::new(9).unwrap();
/// assert_eq!(truncation.apply("clock"), "clock");
/// assert_eq!(truncation.apply("clock_enable"), "clo...ble");
/// assert!(PinNameTruncation::new(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinNameTruncation {
    max_length: usize,
    keep: usize,
}

impl PinNameTruncation {
    /// Creates a truncation rule.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PinNameLengthTooSmall`] if `max_length` is
    /// below [`MIN_MAX_PIN_NAME_LENGTH`].
    pub fn new(max_length: usize) -> Result<Self, LayoutError> {
        if max_length < MIN_MAX_PIN_NAME_LENGTH {
            return Err(LayoutError::PinNameLengthTooSmall {
                value: max_length,
                min: MIN_MAX_PIN_NAME_LENGTH,
            });
        }
        Ok(Self {
            max_length,
            keep: (max_length - ELLIPSIS.len()) / 2,
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns how many characters are kept on each side of the ellipsis.
    pub fn keep(&self) -> usize {
        self.keep
    }

    /// Returns `name` unchanged if it is shorter than the maximum, otherwise
    /// its first and last [`keep`](Self::keep) characters joined by `...`.
    pub fn apply<'a>(&self, name: &'a str) -> Cow<'a, str> {
        let length = name.chars().count();
        if length < self.max_length {
            return Cow::Borrowed(name);
        }

        let prefix: String = name.chars().take(self.keep).collect();
        let suffix: String = name.chars().skip(length - self.keep).collect();
        Cow::Owned(format!("{prefix}{ELLIPSIS}{suffix}"))
    }
}

impl Default for PinNameTruncation {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_PIN_NAME_LENGTH,
            keep: (DEFAULT_MAX_PIN_NAME_LENGTH - ELLIPSIS.len()) / 2,
        }
    }
}
