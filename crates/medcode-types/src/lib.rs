//! # medcode-types
//!
//! Type definitions for the coding systems handled by medcode.
//!
//! This crate provides plain Rust types for diagnosis codes (ICD-9-CM and
//! ICD-10-CM), PheWAS phecodes, and drug identifiers (NDC, RxCUI and ATC
//! classes). Parsing and lookups live in `medcode-loader` and `medcode-rxnav`.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use medcode_types::{AtcLevel, IcdVersion, Ndc, PhecodeResolution};
//!
//! let version = IcdVersion::from_number(9).unwrap();
//! assert_eq!(version.prefix(), "ICD9CM:");
//!
//! let ndc: Ndc = "00071015523".parse().unwrap();
//! assert_eq!(ndc.as_str(), "00071015523");
//!
//! let level = AtcLevel::new(3).unwrap();
//! assert_eq!(level.truncate("A10BA02"), "A10B");
//!
//! let miss = PhecodeResolution::unmapped("250.00", version);
//! assert_eq!(miss.to_string(), "ICD9CM:250.00");
//! ```

#![warn(missing_docs)]

mod atc;
mod icd;
mod ndc;
mod phecode;
mod rxcui;

// Re-export all public types at crate root
pub use atc::{AtcClasses, AtcLevel, AtcLevelError};
pub use icd::{format_icd10, strip_dots, IcdVersion, IcdVersionError};
pub use ndc::{Ndc, NdcParseError};
pub use phecode::{MappingSource, PhecodeResolution, PHECODE_PREFIX};
pub use rxcui::{DrugIdentifier, Rxcui, RxcuiParseError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _version = IcdVersion::Icd10;
        let _source = MappingSource::Icd10Table;
        let _level = AtcLevel::FOUR;
        let _rxcui = Rxcui::parse("617314").unwrap();
        let _id = DrugIdentifier::Rxcui(Rxcui::parse("617314").unwrap());
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(PHECODE_PREFIX, "phe_");
        assert_eq!(IcdVersion::Icd9.prefix(), "ICD9CM:");
        assert_eq!(IcdVersion::Icd10.prefix(), "ICD10CM:");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let resolution = PhecodeResolution::Mapped {
            phecode: "250.2".to_string(),
            source: MappingSource::Icd9Phemap,
        };

        let json = serde_json::to_string(&resolution).unwrap();
        let parsed: PhecodeResolution = serde_json::from_str(&json).unwrap();
        assert_eq!(resolution, parsed);
    }
}
