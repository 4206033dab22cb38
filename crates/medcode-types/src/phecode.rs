//! Phecode lookup results.

use std::fmt;

use crate::IcdVersion;

/// Prefix prepended to a resolved phecode.
pub const PHECODE_PREFIX: &str = "phe_";

/// The mapping table that produced a phecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MappingSource {
    /// ICD-9 → phecode table exported from the `phemap` dataset.
    Icd9Phemap,
    /// ICD-9 → phecode map v1.2.
    Icd9PhecodeMap,
    /// ICD-9 converted to ICD-10-CM through the GEM, then the ICD-10 table.
    Icd9ViaIcd10,
    /// ICD-10-CM → phecode map v1.2 (beta).
    Icd10Table,
}

/// Outcome of resolving an ICD code to a phecode.
///
/// A miss is a regular value, not an error: it carries the original code
/// so callers can keep it in their data with its version prefix.
///
/// A miss renders as `ICD9CM:<code>` or `ICD10CM:<code>`, never with the
/// `phe_` prefix, so an unmapped code cannot be read as a phecode. Older
/// PheWAS pipelines wrote `phe_ICD9CM:<code>` / `phe_ICD10CM:<code>` for
/// some misses; consumers matching on those strings must drop the `phe_`.
///
/// # Examples
///
/// ```
/// use medcode_types::{IcdVersion, MappingSource, PhecodeResolution};
///
/// let hit = PhecodeResolution::Mapped {
///     phecode: "401.1".to_string(),
///     source: MappingSource::Icd9Phemap,
/// };
/// assert_eq!(hit.to_string(), "phe_401.1");
///
/// let miss = PhecodeResolution::unmapped("XYZ", IcdVersion::Icd10);
/// assert_eq!(miss.to_string(), "ICD10CM:XYZ");
/// assert!(!miss.is_mapped());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhecodeResolution {
    /// The code was found in one of the mapping tables.
    Mapped {
        /// The phecode, as written in the mapping table.
        phecode: String,
        /// The table that produced it.
        source: MappingSource,
    },
    /// No table mapped the code.
    Unmapped {
        /// The code exactly as it was given.
        code: String,
        /// Version of the given code.
        version: IcdVersion,
    },
}

impl PhecodeResolution {
    /// Creates an unmapped resolution for `code`.
    pub fn unmapped(code: impl Into<String>, version: IcdVersion) -> Self {
        Self::Unmapped {
            code: code.into(),
            version,
        }
    }

    /// Returns true if a phecode was found.
    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped { .. })
    }

    /// Returns the phecode, if any.
    pub fn phecode(&self) -> Option<&str> {
        match self {
            Self::Mapped { phecode, .. } => Some(phecode),
            Self::Unmapped { .. } => None,
        }
    }

    /// Returns the table that produced the phecode, if any.
    pub fn source(&self) -> Option<MappingSource> {
        match self {
            Self::Mapped { source, .. } => Some(*source),
            Self::Unmapped { .. } => None,
        }
    }
}

impl fmt::Display for PhecodeResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapped { phecode, .. } => write!(f, "{PHECODE_PREFIX}{phecode}"),
            Self::Unmapped { code, version } => write!(f, "{}{}", version.prefix(), code),
        }
    }
}
