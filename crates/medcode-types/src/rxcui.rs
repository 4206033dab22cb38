//! RxNorm concept identifiers.

use std::fmt;
use std::str::FromStr;

use crate::Ndc;

/// An RxNorm Concept Unique Identifier: a non-empty string of ASCII digits.
///
/// # Examples
///
/// ```
/// use medcode_types::Rxcui;
///
/// let rxcui: Rxcui = "617314".parse().unwrap();
/// assert_eq!(rxcui.as_str(), "617314");
/// assert!(Rxcui::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Rxcui(String);

impl Rxcui {
    /// Validates an RxCUI.
    pub fn parse(value: &str) -> Result<Self, RxcuiParseError> {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(RxcuiParseError {
                value: value.to_string(),
            })
        }
    }

    /// Returns the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Rxcui {
    type Err = RxcuiParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rxcui {
    type Error = RxcuiParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rxcui> for String {
    fn from(rxcui: Rxcui) -> Self {
        rxcui.0
    }
}

impl fmt::Display for Rxcui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An RxCUI that is empty or contains non-digit characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RxcuiParseError {
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for RxcuiParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RxCUI '{}' must be a non-empty string of digits", self.value)
    }
}

impl std::error::Error for RxcuiParseError {}

/// A drug given either as a package code or as an RxNorm concept.
///
/// Exactly one identifier is always present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrugIdentifier {
    /// National Drug Code, resolved to an RxCUI first.
    Ndc(Ndc),
    /// RxNorm concept used directly.
    Rxcui(Rxcui),
}

impl From<Ndc> for DrugIdentifier {
    fn from(ndc: Ndc) -> Self {
        Self::Ndc(ndc)
    }
}

impl From<Rxcui> for DrugIdentifier {
    fn from(rxcui: Rxcui) -> Self {
        Self::Rxcui(rxcui)
    }
}
