//! In-memory phecode mapping store.
//!
//! Holds the three phecode tables and the ICD-9 → ICD-10 GEM. Everything
//! is loaded once and only read afterwards.
//!
//! ```ignore
//! let files = discover_mapping_files("data")?;
//! let store = PhecodeStore::load(&files)?;
//!
//! assert_eq!(store.get(PhecodeTable::Icd10PhecodeMap, "E11.9"), Some("250.2"));
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::gem::GemTable;
use crate::parser::{PhecodeParser, PhecodeRow};
use crate::types::{DuplicatePolicy, MappingFiles, MappingResult, PhecodeTable, TableConfig};

/// In-memory store for phecode mapping tables.
#[derive(Default)]
pub struct PhecodeStore {
    /// `phemap` ICD-9 codes → phecode.
    icd9_phemap: HashMap<String, String>,
    /// Phecode map v1.2 ICD-9 codes → phecode.
    icd9_phecode_map: HashMap<String, String>,
    /// Phecode map v1.2 ICD-10-CM codes → phecode.
    icd10_phecode_map: HashMap<String, String>,
    /// ICD-9-CM → ICD-10-CM equivalences.
    gem: GemTable,
}

impl std::fmt::Debug for PhecodeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhecodeStore")
            .field("icd9_phemap", &self.icd9_phemap.len())
            .field("icd9_phecode_map", &self.icd9_phecode_map.len())
            .field("icd10_phecode_map", &self.icd10_phecode_map.len())
            .field("gem", &self.gem.len())
            .finish()
    }
}

impl PhecodeStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every discovered table with the default configuration.
    pub fn load(files: &MappingFiles) -> MappingResult<Self> {
        let mut store = Self::new();
        store.load_all(files, TableConfig::default())?;
        Ok(store)
    }

    /// Loads all tables from a discovered file set.
    ///
    /// A missing GEM is not an error; ICD-9 codes then only resolve
    /// through the two ICD-9 tables.
    pub fn load_all(&mut self, files: &MappingFiles, config: TableConfig) -> MappingResult<()> {
        for table in [
            PhecodeTable::Icd9Phemap,
            PhecodeTable::Icd9PhecodeMap,
            PhecodeTable::Icd10PhecodeMap,
        ] {
            if let Some(path) = files.table(table) {
                let count = self.load_table(path, table, config.clone())?;
                info!("Loaded {} rows into {} table", count, table.name());
            }
        }

        match files.icd9_gem {
            Some(ref gem_path) => {
                let count = self.load_gem(gem_path)?;
                info!("Loaded {} ICD-9 → ICD-10 equivalences", count);
            }
            None => debug!("No GEM file discovered; ICD-10 fallback disabled"),
        }

        Ok(())
    }

    /// Loads a phecode table from a CSV file. Returns the number of rows read.
    pub fn load_table<P: AsRef<Path>>(
        &mut self,
        path: P,
        table: PhecodeTable,
        config: TableConfig,
    ) -> MappingResult<usize> {
        let parser = PhecodeParser::from_path(path, table, config)?;
        self.extend_table(table, parser)
    }

    /// Loads a phecode table from any CSV reader.
    pub fn load_table_from_reader<R: Read>(
        &mut self,
        reader: R,
        table: PhecodeTable,
        config: TableConfig,
    ) -> MappingResult<usize> {
        let parser = PhecodeParser::from_reader(reader, table, config)?;
        self.extend_table(table, parser)
    }

    fn extend_table<I>(&mut self, table: PhecodeTable, rows: I) -> MappingResult<usize>
    where
        I: IntoIterator<Item = MappingResult<PhecodeRow>>,
    {
        let mut count = 0;
        for row in rows {
            let row = row?;
            self.insert(table, row.code, row.phecode);
            count += 1;
        }
        Ok(count)
    }

    /// Loads the ICD-9 → ICD-10 GEM. Returns the number of mapped ICD-9 codes.
    pub fn load_gem<P: AsRef<Path>>(&mut self, path: P) -> MappingResult<usize> {
        self.gem = GemTable::from_path(path)?;
        Ok(self.gem.len())
    }

    /// Replaces the GEM.
    pub fn set_gem(&mut self, gem: GemTable) {
        self.gem = gem;
    }

    /// Inserts one mapping, honoring the table's duplicate policy.
    pub fn insert(&mut self, table: PhecodeTable, code: String, phecode: String) {
        let map = self.table_mut(table);
        match table.duplicate_policy() {
            DuplicatePolicy::KeepFirst => {
                map.entry(code).or_insert(phecode);
            }
            DuplicatePolicy::KeepLast => {
                map.insert(code, phecode);
            }
        }
    }

    /// Inserts many mappings into one table (useful for testing).
    pub fn insert_many<I, K, V>(&mut self, table: PhecodeTable, rows: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (code, phecode) in rows {
            self.insert(table, code.into(), phecode.into());
        }
    }

    /// Looks up a code in one table.
    pub fn get(&self, table: PhecodeTable, code: &str) -> Option<&str> {
        self.table_ref(table).get(code).map(String::as_str)
    }

    /// Returns true if the table holds the code.
    pub fn contains(&self, table: PhecodeTable, code: &str) -> bool {
        self.table_ref(table).contains_key(code)
    }

    /// Returns the GEM.
    pub fn gem(&self) -> &GemTable {
        &self.gem
    }

    /// Number of codes in one table.
    pub fn table_len(&self, table: PhecodeTable) -> usize {
        self.table_ref(table).len()
    }

    /// Returns true if every table and the GEM are empty.
    pub fn is_empty(&self) -> bool {
        self.icd9_phemap.is_empty()
            && self.icd9_phecode_map.is_empty()
            && self.icd10_phecode_map.is_empty()
            && self.gem.is_empty()
    }

    fn table_ref(&self, table: PhecodeTable) -> &HashMap<String, String> {
        match table {
            PhecodeTable::Icd9Phemap => &self.icd9_phemap,
            PhecodeTable::Icd9PhecodeMap => &self.icd9_phecode_map,
            PhecodeTable::Icd10PhecodeMap => &self.icd10_phecode_map,
        }
    }

    fn table_mut(&mut self, table: PhecodeTable) -> &mut HashMap<String, String> {
        match table {
            PhecodeTable::Icd9Phemap => &mut self.icd9_phemap,
            PhecodeTable::Icd9PhecodeMap => &mut self.icd9_phecode_map,
            PhecodeTable::Icd10PhecodeMap => &mut self.icd10_phecode_map,
        }
    }
}
