//! ICD code versions and formatting helpers.

use std::fmt;

/// Version of the International Classification of Diseases a code belongs to.
///
/// # Examples
///
/// ```
/// use medcode_types::IcdVersion;
///
/// assert_eq!(IcdVersion::from_number(10), Ok(IcdVersion::Icd10));
/// assert!(IcdVersion::from_number(11).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IcdVersion {
    /// ICD-9-CM.
    Icd9,
    /// ICD-10-CM.
    Icd10,
}

impl IcdVersion {
    /// Prefix marking an unmapped ICD-9-CM code.
    pub const ICD9_PREFIX: &'static str = "ICD9CM:";
    /// Prefix marking an ICD-10-CM code.
    pub const ICD10_PREFIX: &'static str = "ICD10CM:";

    /// Creates a version from its number (9 or 10).
    pub fn from_number(number: u8) -> Result<Self, IcdVersionError> {
        match number {
            9 => Ok(Self::Icd9),
            10 => Ok(Self::Icd10),
            other => Err(IcdVersionError(other)),
        }
    }

    /// Returns the version number.
    pub fn number(self) -> u8 {
        match self {
            Self::Icd9 => 9,
            Self::Icd10 => 10,
        }
    }

    /// Returns the prefix used when a code of this version is reported as-is.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Icd9 => Self::ICD9_PREFIX,
            Self::Icd10 => Self::ICD10_PREFIX,
        }
    }

    /// Prepends this version's prefix to `code`.
    pub fn tag(self, code: &str) -> String {
        format!("{}{}", self.prefix(), code)
    }
}

impl fmt::Display for IcdVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ICD-{}", self.number())
    }
}

/// Error returned for an ICD version number other than 9 or 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcdVersionError(pub u8);

impl fmt::Display for IcdVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ICD version must be either 9 or 10, got {}", self.0)
    }
}

impl std::error::Error for IcdVersionError {}

/// Removes every `.` from a code (`250.00` becomes `25000`).
pub fn strip_dots(code: &str) -> String {
    code.chars().filter(|&c| c != '.').collect()
}

/// Formats an undotted ICD-10-CM code with a dot after the category.
///
/// Codes of three characters or fewer are returned unchanged, so a bare
/// category such as `I10` never gains a trailing dot.
///
/// ```
/// use medcode_types::format_icd10;
///
/// assert_eq!(format_icd10("E1165"), "E11.65");
/// assert_eq!(format_icd10("I10"), "I10");
/// ```
pub fn format_icd10(code: &str) -> String {
    match code.char_indices().nth(3) {
        Some((split, _)) => format!("{}.{}", &code[..split], &code[split..]),
        None => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_number() {
        assert_eq!(IcdVersion::from_number(9), Ok(IcdVersion::Icd9));
        assert_eq!(IcdVersion::from_number(10), Ok(IcdVersion::Icd10));
        assert_eq!(IcdVersion::from_number(0), Err(IcdVersionError(0)));
        assert_eq!(IcdVersion::from_number(11), Err(IcdVersionError(11)));
    }

    #[test]
    fn test_tag() {
        assert_eq!(IcdVersion::Icd9.tag("250.00"), "ICD9CM:250.00");
        assert_eq!(IcdVersion::Icd10.tag("E11.9"), "ICD10CM:E11.9");
    }

    #[test]
    fn test_strip_dots() {
        assert_eq!(strip_dots("250.00"), "25000");
        assert_eq!(strip_dots("V70.0"), "V700");
        assert_eq!(strip_dots("401"), "401");
    }

    #[test]
    fn test_format_icd10() {
        assert_eq!(format_icd10("E1165"), "E11.65");
        assert_eq!(format_icd10("Z0000"), "Z00.00");
        assert_eq!(format_icd10("I10"), "I10");
        assert_eq!(format_icd10(""), "");
    }
}
