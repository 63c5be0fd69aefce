//! Postal addresses.
//!
//! Accounts keep the five address fields separately, as collected from the
//! registration form. When a donation is submitted the fields are joined
//! into one `/`-delimited line, the layout pickup volunteers see on the
//! donation records.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by [`PostalAddressParts::validated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressValidationError {
    MissingPart { field: &'static str },
}

impl fmt::Display for AddressValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPart { field } => write!(f, "address {field} must not be empty"),
        }
    }
}

impl std::error::Error for AddressValidationError {}

fn trim_part(field: &'static str, value: String) -> Result<String, AddressValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AddressValidationError::MissingPart { field });
    }
    Ok(trimmed.to_owned())
}

/// The five address components an account carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct PostalAddressParts {
    #[schema(example = "21 Baker Street")]
    pub street: String,
    #[schema(example = "Coimbatore")]
    pub city: String,
    #[schema(example = "Coimbatore")]
    pub district: String,
    #[schema(example = "Tamil Nadu")]
    pub state: String,
    #[schema(example = "641001")]
    pub postal_code: String,
}

impl PostalAddressParts {
    /// Trim every part, rejecting blanks.
    pub fn validated(self) -> Result<Self, AddressValidationError> {
        Ok(Self {
            street: trim_part("street", self.street)?,
            city: trim_part("city", self.city)?,
            district: trim_part("district", self.district)?,
            state: trim_part("state", self.state)?,
            postal_code: trim_part("postal code", self.postal_code)?,
        })
    }
}

/// A postal address joined into a single display line.
///
/// ## Invariants
/// - Parts appear in street, city, district, state, postal code order with
///   `/` as the delimiter.
///
/// # Examples
/// ```
/// use backend::domain::accounts::{PostalAddress, PostalAddressParts};
///
/// let address = PostalAddress::compose(&PostalAddressParts {
///     street: "21 Baker Street".into(),
///     city: "Coimbatore".into(),
///     district: "Coimbatore".into(),
///     state: "Tamil Nadu".into(),
///     postal_code: "641001".into(),
/// });
/// assert_eq!(
///     address.display_line(),
///     "21 Baker Street/Coimbatore/Coimbatore/Tamil Nadu/641001",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PostalAddress(String);

impl PostalAddress {
    /// Join the parts into the display line.
    ///
    /// Parts are trimmed but not otherwise validated; registration rejects
    /// blank fields before an account ever reaches this point.
    pub fn compose(parts: &PostalAddressParts) -> Self {
        let line = [
            parts.street.trim(),
            parts.city.trim(),
            parts.district.trim(),
            parts.state.trim(),
            parts.postal_code.trim(),
        ]
        .join("/");
        Self(line)
    }

    /// Wrap a line previously composed and persisted.
    pub const fn from_stored(line: String) -> Self {
        Self(line)
    }

    /// The `/`-joined display line.
    pub fn display_line(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_line())
    }
}

impl From<PostalAddress> for String {
    fn from(value: PostalAddress) -> Self {
        value.0
    }
}
