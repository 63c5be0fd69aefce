//! Registration password policy.
//!
//! A password is accepted when it is at least [`MIN_LENGTH`] characters
//! long, contains at least one ASCII letter, one ASCII digit, and one
//! symbol from [`SYMBOLS`], and contains nothing outside those three
//! classes. The symbol set is fixed; a password using any other character
//! is rejected outright rather than silently ignored.

/// Minimum accepted password length, in characters.
pub const MIN_LENGTH: usize = 8;

/// The full set of permitted symbol characters.
pub const SYMBOLS: &str = "@$!%*#?&";

/// Reasons a candidate password fails the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    /// Shorter than [`MIN_LENGTH`] characters.
    #[error("password must be at least 8 characters long")]
    TooShort,
    /// No ASCII letter present.
    #[error("password must contain at least one letter")]
    MissingLetter,
    /// No ASCII digit present.
    #[error("password must contain at least one digit")]
    MissingDigit,
    /// No symbol from [`SYMBOLS`] present.
    #[error("password must contain at least one of @$!%*#?&")]
    MissingSymbol,
    /// A character outside letters, digits, and [`SYMBOLS`].
    #[error("password may only contain letters, digits, and @$!%*#?&")]
    UnsupportedCharacter,
}

/// Check `password` against the policy.
///
/// Returns the first violation found, scanning the character classes
/// before the presence requirements so an out-of-alphabet password is
/// reported as such rather than as a missing class.
///
/// # Examples
///
/// ```rust
/// use credentials::policy::{validate, PolicyViolation};
///
/// assert_eq!(validate("Br3ad&Rice"), Ok(()));
/// assert_eq!(validate("short1!"), Err(PolicyViolation::TooShort));
/// assert_eq!(validate("lettersonly1"), Err(PolicyViolation::MissingSymbol));
/// ```
pub fn validate(password: &str) -> Result<(), PolicyViolation> {
    if password.chars().count() < MIN_LENGTH {
        return Err(PolicyViolation::TooShort);
    }

    let mut has_letter = false;
    let mut has_digit = false;
    let mut has_symbol = false;
    for ch in password.chars() {
        if ch.is_ascii_alphabetic() {
            has_letter = true;
        } else if ch.is_ascii_digit() {
            has_digit = true;
        } else if SYMBOLS.contains(ch) {
            has_symbol = true;
        } else {
            return Err(PolicyViolation::UnsupportedCharacter);
        }
    }

    if !has_letter {
        return Err(PolicyViolation::MissingLetter);
    }
    if !has_digit {
        return Err(PolicyViolation::MissingDigit);
    }
    if !has_symbol {
        return Err(PolicyViolation::MissingSymbol);
    }
    Ok(())
}
