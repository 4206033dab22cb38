//! Anatomical Therapeutic Chemical (ATC) classification.

use std::collections::BTreeSet;
use std::fmt;

/// Specificity level of an ATC code (1 to 4).
///
/// Each level keeps a fixed-length prefix of the full code:
///
/// | Level | Example | Length |
/// |-------|---------|--------|
/// | 1     | `A`     | 1      |
/// | 2     | `A10`   | 3      |
/// | 3     | `A10B`  | 4      |
/// | 4     | `A10BA` | 5      |
///
/// These are the lengths of the ATC hierarchy itself. Pipelines that slice
/// `level + 1` characters agree at levels 2 to 4 but keep two characters
/// at level 1 (`A1`), which is not a valid ATC group.
///
/// # Examples
///
/// ```
/// use medcode_types::AtcLevel;
///
/// let level = AtcLevel::new(2).unwrap();
/// assert_eq!(level.truncate("A10BA02"), "A10");
/// assert!(AtcLevel::new(5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct AtcLevel(u8);

impl AtcLevel {
    /// Anatomical main group.
    pub const ONE: Self = Self(1);
    /// Therapeutic subgroup.
    pub const TWO: Self = Self(2);
    /// Pharmacological subgroup.
    pub const THREE: Self = Self(3);
    /// Chemical subgroup.
    pub const FOUR: Self = Self(4);

    /// Creates a level, rejecting values outside 1..=4.
    pub fn new(level: u8) -> Result<Self, AtcLevelError> {
        if (1..=4).contains(&level) {
            Ok(Self(level))
        } else {
            Err(AtcLevelError(level))
        }
    }

    /// Returns the numeric level.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of leading characters kept at this level.
    pub fn prefix_len(self) -> usize {
        match self.0 {
            1 => 1,
            2 => 3,
            3 => 4,
            _ => 5,
        }
    }

    /// Truncates an ATC code to this level. Shorter codes are returned whole.
    pub fn truncate(self, code: &str) -> &str {
        match code.char_indices().nth(self.prefix_len()) {
            Some((end, _)) => &code[..end],
            None => code,
        }
    }
}

impl Default for AtcLevel {
    fn default() -> Self {
        Self::FOUR
    }
}

impl TryFrom<u8> for AtcLevel {
    type Error = AtcLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AtcLevel> for u8 {
    fn from(level: AtcLevel) -> Self {
        level.0
    }
}

impl fmt::Display for AtcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned for an ATC level outside 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtcLevelError(pub u8);

impl fmt::Display for AtcLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ATC level must be between 1 and 4, got {}", self.0)
    }
}

impl std::error::Error for AtcLevelError {}

/// Sorted, deduplicated ATC codes truncated to one level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtcClasses {
    /// Level every code was truncated to.
    pub level: AtcLevel,
    /// The codes, in ascending order.
    pub codes: Vec<String>,
}

impl AtcClasses {
    /// Truncates each class id to `level`, then sorts and deduplicates.
    pub fn from_class_ids<I, S>(class_ids: I, level: AtcLevel) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes: BTreeSet<String> = class_ids
            .into_iter()
            .map(|id| level.truncate(id.as_ref().trim()).to_string())
            .filter(|code| !code.is_empty())
            .collect();

        Self {
            level,
            codes: codes.into_iter().collect(),
        }
    }

    /// Returns true if no codes were found.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }
}

impl fmt::Display for AtcClasses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.codes.join(","))
    }
}
