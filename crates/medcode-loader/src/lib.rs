//! # medcode-loader
//!
//! Loads ICD → phecode mapping tables and resolves diagnosis codes to
//! PheWAS codes.
//!
//! ```ignore
//! use medcode_loader::{discover_mapping_files, IcdStandardizer};
//! use medcode_types::IcdVersion;
//!
//! let files = discover_mapping_files("data")?;
//! let standardizer = IcdStandardizer::load(&files)?;
//!
//! let resolution = standardizer.icd_to_phecode("250.00", IcdVersion::Icd9);
//! println!("{resolution}"); // phe_250.2
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): parses the GEM with rayon.

#![warn(missing_docs)]

pub mod discover;
pub mod gem;
pub mod parser;
pub mod standardize;
pub mod store;
pub mod types;

pub use discover::discover_mapping_files;
pub use gem::{GemEntry, GemFlags, GemTable};
pub use parser::{PhecodeParser, PhecodeRow};
pub use standardize::{truncate_icd, IcdStandardizer};
pub use store::PhecodeStore;
pub use types::{
    DuplicatePolicy, MappingError, MappingFiles, MappingResult, PhecodeTable, TableConfig,
};

// Re-export medcode-types for convenience
pub use medcode_types;
