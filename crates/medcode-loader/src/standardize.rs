//! ICD → phecode resolution with fallback.
//!
//! ICD-9 codes are tried against three sources in a fixed order:
//!
//! 1. the `phemap` ICD-9 table,
//! 2. the phecode map v1.2 ICD-9 table,
//! 3. the GEM (ICD-9 → ICD-10-CM) followed by the ICD-10-CM table.
//!
//! ICD-10-CM codes only go through the ICD-10-CM table. A code no source
//! maps comes back as [`PhecodeResolution::Unmapped`].

use medcode_types::{format_icd10, strip_dots, IcdVersion, MappingSource, PhecodeResolution};
use tracing::debug;

use crate::store::PhecodeStore;
use crate::types::{MappingFiles, MappingResult, PhecodeTable};

/// Resolves ICD codes to phecodes against a loaded [`PhecodeStore`].
#[derive(Debug)]
pub struct IcdStandardizer {
    store: PhecodeStore,
}

impl IcdStandardizer {
    /// Creates a standardizer over an already loaded store.
    pub fn new(store: PhecodeStore) -> Self {
        Self { store }
    }

    /// Loads all discovered tables and wraps them.
    pub fn load(files: &MappingFiles) -> MappingResult<Self> {
        Ok(Self::new(PhecodeStore::load(files)?))
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &PhecodeStore {
        &self.store
    }

    /// Resolves a prefix-free ICD code to a phecode.
    pub fn icd_to_phecode(&self, code: &str, version: IcdVersion) -> PhecodeResolution {
        match version {
            IcdVersion::Icd9 => self.icd9_to_phecode(code),
            IcdVersion::Icd10 => self
                .lookup(PhecodeTable::Icd10PhecodeMap, code)
                .unwrap_or_else(|| PhecodeResolution::unmapped(code, IcdVersion::Icd10)),
        }
    }

    /// String form of [`icd_to_phecode`](Self::icd_to_phecode).
    ///
    /// Returns `phe_<phecode>` on a hit, or the code behind its version
    /// prefix (`ICD9CM:` / `ICD10CM:`) on a miss.
    ///
    /// # Errors
    /// Fails if `version` is neither 9 nor 10.
    pub fn icd_codes_to_phewas_codes(&self, code: &str, version: u8) -> MappingResult<String> {
        let version = IcdVersion::from_number(version)?;
        Ok(self.icd_to_phecode(code, version).to_string())
    }

    /// Resolves every code in order.
    pub fn resolve_all<I, S>(&self, codes: I, version: IcdVersion) -> Vec<PhecodeResolution>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        codes
            .into_iter()
            .map(|code| self.icd_to_phecode(code.as_ref(), version))
            .collect()
    }

    /// Maps an ICD-9-CM code to its dotted ICD-10-CM equivalent through the GEM.
    ///
    /// Dots in the input are ignored.
    pub fn icd9_to_icd10_code(&self, icd9: &str) -> Option<String> {
        self.store.gem().get(&strip_dots(icd9)).map(format_icd10)
    }

    /// Converts an ICD-9-CM code to `ICD10CM:<code>`, or `ICD9CM:<icd9>` when
    /// the GEM has no equivalent.
    pub fn icd9_to_icd10(&self, icd9: &str) -> String {
        match self.icd9_to_icd10_code(icd9) {
            Some(icd10) => IcdVersion::Icd10.tag(&icd10),
            None => IcdVersion::Icd9.tag(icd9),
        }
    }

    /// Brings a diagnosis code to ICD-10-CM.
    ///
    /// ICD-10 input is returned unchanged; ICD-9 input behaves like
    /// [`icd9_to_icd10`](Self::icd9_to_icd10).
    pub fn standardize_to_icd10(&self, version: IcdVersion, dx: &str) -> String {
        match version {
            IcdVersion::Icd10 => dx.to_string(),
            IcdVersion::Icd9 => self.icd9_to_icd10(dx),
        }
    }

    fn icd9_to_phecode(&self, code: &str) -> PhecodeResolution {
        if let Some(hit) = self.lookup(PhecodeTable::Icd9Phemap, code) {
            return hit;
        }
        debug!("{} not in phemap, trying phecode map v1.2", code);

        if let Some(hit) = self.lookup(PhecodeTable::Icd9PhecodeMap, code) {
            return hit;
        }
        debug!("{} not in ICD-9 phecode maps, trying ICD-10 via GEM", code);

        let Some(icd10) = self.icd9_to_icd10_code(code) else {
            debug!("{} has no ICD-10-CM equivalent", code);
            return PhecodeResolution::unmapped(code, IcdVersion::Icd9);
        };

        match self.store.get(PhecodeTable::Icd10PhecodeMap, &icd10) {
            Some(phecode) => PhecodeResolution::Mapped {
                phecode: phecode.to_string(),
                source: MappingSource::Icd9ViaIcd10,
            },
            None => {
                debug!("{} mapped to {} but it has no phecode", code, icd10);
                PhecodeResolution::unmapped(code, IcdVersion::Icd9)
            }
        }
    }

    fn lookup(&self, table: PhecodeTable, code: &str) -> Option<PhecodeResolution> {
        self.store
            .get(table, code)
            .map(|phecode| PhecodeResolution::Mapped {
                phecode: phecode.to_string(),
                source: table.source(),
            })
    }
}

/// Returns the first `n` characters of a prefix-free ICD code, or the whole
/// code when `n` is `None` or longer than the code.
pub fn truncate_icd(code: &str, n: Option<usize>) -> &str {
    match n.and_then(|n| code.char_indices().nth(n)) {
        Some((end, _)) => &code[..end],
        None => code,
    }
}
