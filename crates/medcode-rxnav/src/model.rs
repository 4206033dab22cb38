//! RxNav response shapes.
//!
//! Only the fields the resolver reads are modeled. Every field defaults when
//! absent, so an empty `{}` body decodes into an empty response.

use medcode_types::Rxcui;
use serde::Deserialize;

/// Body of `ndcstatus.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NdcStatusResponse {
    /// Status block; missing when RxNav does not know the NDC.
    #[serde(default)]
    pub ndc_status: Option<NdcStatus>,
}

impl NdcStatusResponse {
    /// Returns the RxCUI of the **last** history entry with a non-empty
    /// `activeRxcui`. Entries that are not digit strings are skipped.
    pub fn latest_active_rxcui(&self) -> Option<Rxcui> {
        self.ndc_status
            .as_ref()?
            .ndc_history
            .iter()
            .filter_map(|entry| entry.active_rxcui.as_deref())
            .map(str::trim)
            .filter_map(|rxcui| Rxcui::parse(rxcui).ok())
            .last()
    }
}

/// Status of one NDC.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NdcStatus {
    /// Normalized 11-digit NDC.
    #[serde(default)]
    pub ndc11: Option<String>,
    /// `ACTIVE`, `OBSOLETE`, `ALIEN`, `UNKNOWN`, ...
    #[serde(default)]
    pub status: Option<String>,
    /// RxCUI assignments over time, oldest first.
    #[serde(default)]
    pub ndc_history: Vec<NdcHistoryEntry>,
}

/// One period of an NDC's RxCUI assignment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NdcHistoryEntry {
    /// Currently active RxCUI for the original concept (may be empty).
    #[serde(default)]
    pub active_rxcui: Option<String>,
    /// RxCUI the NDC was originally attached to.
    #[serde(default)]
    pub original_rxcui: Option<String>,
    /// Start of the period (YYYYMM).
    #[serde(default)]
    pub start_date: Option<String>,
    /// End of the period (YYYYMM).
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Body of `rxclass/class/byRxcui.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RxClassResponse {
    /// Class memberships; missing when nothing matched.
    #[serde(default)]
    pub rxclass_drug_info_list: Option<RxClassDrugInfoList>,
}

impl RxClassResponse {
    /// Returns true if the response holds no class memberships.
    pub fn is_empty(&self) -> bool {
        self.drug_infos().is_empty()
    }

    /// Returns the class memberships (empty when the list is absent).
    pub fn drug_infos(&self) -> &[RxClassDrugInfo] {
        self.rxclass_drug_info_list
            .as_ref()
            .map(|list| list.rxclass_drug_info.as_slice())
            .unwrap_or_default()
    }
}

/// Wrapper around the class membership array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RxClassDrugInfoList {
    /// Class memberships.
    #[serde(default)]
    pub rxclass_drug_info: Vec<RxClassDrugInfo>,
}

/// One drug → class membership.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RxClassDrugInfo {
    /// Drug concept the membership applies to.
    #[serde(default)]
    pub min_concept: MinConcept,
    /// The class.
    #[serde(default)]
    pub rxclass_min_concept_item: RxClassItem,
    /// Relationship name.
    #[serde(default)]
    pub rela: Option<String>,
    /// Relationship source (`ATC`, `ATCPROD`, ...).
    #[serde(default)]
    pub rela_source: Option<String>,
}

/// Drug concept inside a class membership.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinConcept {
    /// RxCUI of the drug.
    #[serde(default)]
    pub rxcui: String,
    /// Drug name.
    #[serde(default)]
    pub name: String,
    /// RxNorm term type.
    #[serde(default)]
    pub tty: String,
}

/// Class inside a class membership.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RxClassItem {
    /// Class identifier, an ATC code for ATC sources.
    #[serde(default)]
    pub class_id: String,
    /// Class name.
    #[serde(default)]
    pub class_name: String,
    /// Class type (`ATC1-4`, ...).
    #[serde(default)]
    pub class_type: String,
}
