//! Mapping file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{MappingError, MappingFiles, MappingResult};

/// Discovers the phecode tables and GEM in a data directory.
///
/// Looks in `path` itself, then in an `icd_code_to_phecode` subdirectory.
/// File names are matched case-insensitively:
///
/// - `phemap*.csv` → ICD-9 `phemap` table
/// - `phecode_map_v1_2_icd9*.csv` → ICD-9 phecode map
/// - `phecode_map_v1_2_icd10cm*.csv` → ICD-10-CM phecode map
/// - `*i9gem*.txt` → ICD-9 → ICD-10 GEM (optional)
pub fn discover_mapping_files<P: AsRef<Path>>(path: P) -> MappingResult<MappingFiles> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(MappingError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let data_dir = find_data_dir(path);
    let mut files = MappingFiles::new();

    for entry in fs::read_dir(&data_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().to_lowercase();
        classify(&filename, entry.path(), &mut files);
    }

    if !files.has_required_files() {
        let missing = files.missing_files();
        return Err(MappingError::RequiredFileMissing {
            file_type: missing.join(", "),
            directory: data_dir.display().to_string(),
        });
    }

    Ok(files)
}

fn classify(filename: &str, path: PathBuf, files: &mut MappingFiles) {
    if filename.ends_with(".csv") {
        if filename.starts_with("phemap") {
            files.icd9_phemap = Some(path);
        } else if filename.starts_with("phecode_map_v1_2_icd10cm") {
            files.icd10_phecode_map = Some(path);
        } else if filename.starts_with("phecode_map_v1_2_icd9") {
            files.icd9_phecode_map = Some(path);
        }
    } else if filename.ends_with(".txt") && filename.contains("i9gem") {
        files.icd9_gem = Some(path);
    }
}

fn find_data_dir(base: &Path) -> PathBuf {
    let nested = base.join("icd_code_to_phecode");
    if nested.is_dir() {
        nested
    } else {
        base.to_path_buf()
    }
}
