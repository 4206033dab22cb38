//! Loader-specific types: errors, configuration, and discovered files.

use std::path::PathBuf;

use medcode_types::{IcdVersion, IcdVersionError, MappingSource};
use thiserror::Error;

/// Errors that can occur while loading mapping tables.
#[derive(Error, Debug)]
pub enum MappingError {
    /// I/O error reading a mapping file.
    #[error("IO error reading mapping file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing required column in a mapping file.
    #[error("Missing required column '{column}' in {table} table")]
    MissingColumn {
        /// The table being parsed.
        table: &'static str,
        /// The name of the missing column.
        column: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Required file missing from the mapping directory.
    #[error("Required mapping file not found: {file_type} in {directory}")]
    RequiredFileMissing {
        /// The tables that were missing.
        file_type: String,
        /// The directory that was searched.
        directory: String,
    },

    /// ICD version other than 9 or 10.
    #[error(transparent)]
    InvalidVersion(#[from] IcdVersionError),

    /// Generic parse error.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// What to do when a code appears more than once in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the first row seen.
    KeepFirst,
    /// Later rows overwrite earlier ones.
    KeepLast,
}

/// The phecode tables known to the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhecodeTable {
    /// `phemap`: ICD-9 → phecode (tried first for ICD-9 codes).
    Icd9Phemap,
    /// `phecode_map_v1_2_icd9`: ICD-9 → phecode (tried second).
    Icd9PhecodeMap,
    /// `Phecode_map_v1_2_icd10cm_beta`: ICD-10-CM → phecode.
    Icd10PhecodeMap,
}

impl PhecodeTable {
    /// Human-readable table name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Icd9Phemap => "phemap",
            Self::Icd9PhecodeMap => "phecode_map_v1_2_icd9",
            Self::Icd10PhecodeMap => "Phecode_map_v1_2_icd10cm_beta",
        }
    }

    /// Header of the ICD code column.
    pub fn code_column(self) -> &'static str {
        match self {
            Self::Icd9Phemap => "icd9",
            Self::Icd9PhecodeMap => "ICD9",
            Self::Icd10PhecodeMap => "ICD10CM",
        }
    }

    /// Header of the phecode column.
    pub fn phecode_column(self) -> &'static str {
        match self {
            Self::Icd9Phemap => "phecode",
            Self::Icd9PhecodeMap => "PheCode",
            Self::Icd10PhecodeMap => "PHECODE",
        }
    }

    /// How repeated codes are resolved.
    pub fn duplicate_policy(self) -> DuplicatePolicy {
        match self {
            Self::Icd9Phemap => DuplicatePolicy::KeepFirst,
            Self::Icd9PhecodeMap | Self::Icd10PhecodeMap => DuplicatePolicy::KeepLast,
        }
    }

    /// ICD version of the keys.
    pub fn version(self) -> IcdVersion {
        match self {
            Self::Icd9Phemap | Self::Icd9PhecodeMap => IcdVersion::Icd9,
            Self::Icd10PhecodeMap => IcdVersion::Icd10,
        }
    }

    /// Source reported for a direct hit in this table.
    pub fn source(self) -> MappingSource {
        match self {
            Self::Icd9Phemap => MappingSource::Icd9Phemap,
            Self::Icd9PhecodeMap => MappingSource::Icd9PhecodeMap,
            Self::Icd10PhecodeMap => MappingSource::Icd10Table,
        }
    }
}

/// Configuration for table parsing.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Trim surrounding whitespace from codes and phecodes.
    pub trim_values: bool,
    /// Skip rows whose code or phecode is empty.
    pub skip_empty_values: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            trim_values: true,
            skip_empty_values: true,
        }
    }
}

/// Discovered mapping files in a data directory.
#[derive(Debug, Clone, Default)]
pub struct MappingFiles {
    /// Path to the `phemap` ICD-9 table (CSV export).
    pub icd9_phemap: Option<PathBuf>,
    /// Path to the phecode map v1.2 ICD-9 table.
    pub icd9_phecode_map: Option<PathBuf>,
    /// Path to the phecode map v1.2 ICD-10-CM table.
    pub icd10_phecode_map: Option<PathBuf>,
    /// Path to the ICD-9 → ICD-10 General Equivalence Mapping.
    pub icd9_gem: Option<PathBuf>,
}

impl MappingFiles {
    /// Creates a new empty MappingFiles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the path for a phecode table, if discovered.
    pub fn table(&self, table: PhecodeTable) -> Option<&PathBuf> {
        match table {
            PhecodeTable::Icd9Phemap => self.icd9_phemap.as_ref(),
            PhecodeTable::Icd9PhecodeMap => self.icd9_phecode_map.as_ref(),
            PhecodeTable::Icd10PhecodeMap => self.icd10_phecode_map.as_ref(),
        }
    }

    /// Returns true if all three phecode tables are present.
    pub fn has_required_files(&self) -> bool {
        self.missing_files().is_empty()
    }

    /// Returns a list of missing required tables.
    pub fn missing_files(&self) -> Vec<&'static str> {
        [
            PhecodeTable::Icd9Phemap,
            PhecodeTable::Icd9PhecodeMap,
            PhecodeTable::Icd10PhecodeMap,
        ]
        .into_iter()
        .filter(|table| self.table(*table).is_none())
        .map(PhecodeTable::name)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_config_default() {
        let config = TableConfig::default();
        assert!(config.trim_values);
        assert!(config.skip_empty_values);
    }

    #[test]
    fn test_table_columns() {
        assert_eq!(PhecodeTable::Icd9Phemap.code_column(), "icd9");
        assert_eq!(PhecodeTable::Icd9PhecodeMap.phecode_column(), "PheCode");
        assert_eq!(PhecodeTable::Icd10PhecodeMap.code_column(), "ICD10CM");
        assert_eq!(PhecodeTable::Icd10PhecodeMap.version(), IcdVersion::Icd10);
    }

    #[test]
    fn test_duplicate_policies() {
        assert_eq!(
            PhecodeTable::Icd9Phemap.duplicate_policy(),
            DuplicatePolicy::KeepFirst
        );
        assert_eq!(
            PhecodeTable::Icd10PhecodeMap.duplicate_policy(),
            DuplicatePolicy::KeepLast
        );
    }

    #[test]
    fn test_mapping_files_missing() {
        let files = MappingFiles {
            icd9_phemap: Some(PathBuf::from("phemap.csv")),
            ..Default::default()
        };

        assert!(!files.has_required_files());
        let missing = files.missing_files();
        assert_eq!(missing.len(), 2);
        assert!(missing.contains(&"phecode_map_v1_2_icd9"));
        assert!(missing.contains(&"Phecode_map_v1_2_icd10cm_beta"));
    }
}
