//! National Drug Code (NDC) type.

use std::fmt;
use std::str::FromStr;

/// A validated 11-digit National Drug Code.
///
/// Accepts either eleven ASCII digits or the hyphenated 5-4-2 form
/// (`12345-6789-01`), which is stored without hyphens.
///
/// # Examples
///
/// ```
/// use medcode_types::Ndc;
///
/// let ndc: Ndc = "00071-0155-23".parse().unwrap();
/// assert_eq!(ndc.as_str(), "00071015523");
/// assert!("0007101552".parse::<Ndc>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Ndc(String);

impl Ndc {
    /// Number of digits in a normalized NDC.
    pub const DIGITS: usize = 11;
    /// Length of the hyphenated 5-4-2 form.
    pub const HYPHENATED_LEN: usize = 13;

    /// Parses and normalizes an NDC. Surrounding whitespace is not
    /// stripped and makes the value invalid.
    pub fn parse(value: &str) -> Result<Self, NdcParseError> {
        match value.len() {
            Self::DIGITS if value.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(Self(value.to_string()))
            }
            Self::HYPHENATED_LEN => Self::parse_hyphenated(value),
            Self::DIGITS => Err(NdcParseError::NonDigit {
                value: value.to_string(),
            }),
            found => Err(NdcParseError::InvalidLength {
                value: value.to_string(),
                found,
            }),
        }
    }

    fn parse_hyphenated(value: &str) -> Result<Self, NdcParseError> {
        let segments: Vec<&str> = value.split('-').collect();
        let shape_ok = matches!(
            segments.as_slice(),
            [a, b, c] if a.len() == 5 && b.len() == 4 && c.len() == 2
        );
        if !shape_ok {
            return Err(NdcParseError::InvalidSegments {
                value: value.to_string(),
            });
        }

        let digits: String = segments.concat();
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NdcParseError::NonDigit {
                value: value.to_string(),
            });
        }
        Ok(Self(digits))
    }

    /// Returns the 11-digit form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ndc {
    type Err = NdcParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ndc {
    type Error = NdcParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ndc> for String {
    fn from(ndc: Ndc) -> Self {
        ndc.0
    }
}

impl fmt::Display for Ndc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors produced while validating an NDC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NdcParseError {
    /// Neither 11 digits nor the 13-character hyphenated form.
    InvalidLength {
        /// The rejected input.
        value: String,
        /// Its length.
        found: usize,
    },
    /// A character other than a digit (or a separating hyphen).
    NonDigit {
        /// The rejected input.
        value: String,
    },
    /// A 13-character value that is not laid out as 5-4-2.
    InvalidSegments {
        /// The rejected input.
        value: String,
    },
}

impl fmt::Display for NdcParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { value, found } => write!(
                f,
                "NDC '{value}' has {found} characters, expected 11 digits or 13 with hyphens"
            ),
            Self::NonDigit { value } => write!(f, "NDC '{value}' contains non-digit characters"),
            Self::InvalidSegments { value } => {
                write!(f, "NDC '{value}' is not in 5-4-2 hyphenated form")
            }
        }
    }
}

impl std::error::Error for NdcParseError {}
