//! NDC / RxCUI → ATC resolution.

use std::thread;
use std::time::Duration;

use medcode_types::{AtcClasses, AtcLevel, DrugIdentifier, Ndc, Rxcui};
use tracing::{debug, warn};

use crate::client::{RelaSource, RxNavApi, RxNavClient};
use crate::config::{RxNavConfig, DEFAULT_REQUEST_DELAY};
use crate::error::{RxNavError, RxNavResult};

/// Resolves drug codes to ATC classes through RxNav.
///
/// # Example
///
/// ```ignore
/// use medcode_rxnav::MedicationStandardizer;
///
/// let standardizer = MedicationStandardizer::connect()?;
/// let classes = standardizer.ndc_to_atc("00071015523", 4)?;
/// println!("{classes}"); // C10AA
/// ```
#[derive(Debug)]
pub struct MedicationStandardizer<A = RxNavClient> {
    api: A,
    request_delay: Duration,
}

impl MedicationStandardizer<RxNavClient> {
    /// Creates a standardizer talking to the public RxNav service.
    pub fn connect() -> RxNavResult<Self> {
        Self::from_config(RxNavConfig::default())
    }

    /// Creates a standardizer from a client configuration.
    pub fn from_config(config: RxNavConfig) -> RxNavResult<Self> {
        let request_delay = config.request_delay;
        let api = RxNavClient::with_config(config)?;
        Ok(Self::new(api).with_request_delay(request_delay))
    }
}

impl<A: RxNavApi> MedicationStandardizer<A> {
    /// Wraps an RxNav implementation with the default request delay.
    pub fn new(api: A) -> Self {
        Self {
            api,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }

    /// Sets the pause taken before each NDC resolution.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Returns the RxNav implementation.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Resolves an NDC to its currently active RxCUI.
    ///
    /// # Errors
    /// Fails on an invalid NDC, any RxNav failure, or when no history entry
    /// carries an active RxCUI.
    pub fn ndc_to_rxcui(&self, ndc: &str) -> RxNavResult<Rxcui> {
        let ndc = Ndc::parse(ndc)?;
        self.resolve_ndc(&ndc)
    }

    /// Resolves an RxCUI to its ATC classes truncated to `level`.
    ///
    /// Queries the `ATC` relationship source first. When that comes back
    /// empty, `ATCPROD` is queried and only classes asserted directly on
    /// `rxcui` are kept.
    pub fn rxcui_to_atc(&self, rxcui: &Rxcui, level: AtcLevel) -> RxNavResult<AtcClasses> {
        let primary = self.api.class_by_rxcui(rxcui, RelaSource::Atc)?;
        if !primary.is_empty() {
            let ids = primary
                .drug_infos()
                .iter()
                .map(|info| info.rxclass_min_concept_item.class_id.as_str());
            return Ok(AtcClasses::from_class_ids(ids, level));
        }

        debug!("No ATC classes for RxCUI {}, trying ATCPROD", rxcui);
        let product = self.api.class_by_rxcui(rxcui, RelaSource::AtcProd)?;
        let ids = product
            .drug_infos()
            .iter()
            .filter(|info| info.min_concept.rxcui == rxcui.as_str())
            .map(|info| info.rxclass_min_concept_item.class_id.as_str());
        Ok(AtcClasses::from_class_ids(ids, level))
    }

    /// Resolves an NDC to ATC classes.
    ///
    /// `level` is validated before the NDC, and both before any request.
    pub fn ndc_to_atc(&self, ndc: &str, level: u8) -> RxNavResult<AtcClasses> {
        let level = AtcLevel::new(level)?;
        let ndc = Ndc::parse(ndc)?;
        let rxcui = self.resolve_ndc(&ndc)?;
        self.rxcui_to_atc(&rxcui, level)
    }

    /// Resolves either kind of drug identifier to ATC classes.
    pub fn to_atc(&self, drug: &DrugIdentifier, level: AtcLevel) -> RxNavResult<AtcClasses> {
        match drug {
            DrugIdentifier::Ndc(ndc) => {
                let rxcui = self.resolve_ndc(ndc)?;
                self.rxcui_to_atc(&rxcui, level)
            }
            DrugIdentifier::Rxcui(rxcui) => self.rxcui_to_atc(rxcui, level),
        }
    }

    /// Like [`ndc_to_rxcui`](Self::ndc_to_rxcui), but a failed lookup is
    /// logged and returned as `None`.
    ///
    /// # Errors
    /// An invalid NDC is still an error.
    pub fn ndc_to_rxcui_lenient(&self, ndc: &str) -> RxNavResult<Option<Rxcui>> {
        let parsed = Ndc::parse(ndc)?;
        Ok(self
            .resolve_ndc(&parsed)
            .map_err(|e| warn!("Failed at getting RxCUI for NDC {}: {}", ndc, e))
            .ok())
    }

    /// Like [`ndc_to_atc`](Self::ndc_to_atc), but a failed lookup is logged
    /// and returned as `None`.
    ///
    /// # Errors
    /// An invalid level or NDC is still an error.
    pub fn ndc_to_atc_lenient(&self, ndc: &str, level: u8) -> RxNavResult<Option<AtcClasses>> {
        let level = AtcLevel::new(level)?;
        let drug = DrugIdentifier::Ndc(Ndc::parse(ndc)?);
        Ok(self
            .to_atc(&drug, level)
            .map_err(|e| warn!("Failed at getting ATC codes for NDC {}: {}", ndc, e))
            .ok())
    }

    fn resolve_ndc(&self, ndc: &Ndc) -> RxNavResult<Rxcui> {
        if !self.request_delay.is_zero() {
            thread::sleep(self.request_delay);
        }

        self.api
            .ndc_status(ndc)?
            .latest_active_rxcui()
            .ok_or_else(|| RxNavError::NoActiveRxcui {
                ndc: ndc.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::model::{NdcStatusResponse, RxClassResponse};

    const ATORVASTATIN_NDC: &str = r#"{"ndcStatus": {"ndcHistory": [
        {"activeRxcui": "617310", "originalRxcui": "617310"},
        {"activeRxcui": "617314", "originalRxcui": "617314"},
        {"activeRxcui": "", "originalRxcui": "1"}
    ]}}"#;

    const ATORVASTATIN_ATC: &str = r#"{"rxclassDrugInfoList": {"rxclassDrugInfo": [
        {"minConcept": {"rxcui": "83367"}, "rxclassMinConceptItem": {"classId": "C10AA"}},
        {"minConcept": {"rxcui": "83367"}, "rxclassMinConceptItem": {"classId": "C10BA"}},
        {"minConcept": {"rxcui": "83367"}, "rxclassMinConceptItem": {"classId": "C10AA"}}
    ]}}"#;

    const COMBO_ATCPROD: &str = r#"{"rxclassDrugInfoList": {"rxclassDrugInfo": [
        {"minConcept": {"rxcui": "999"}, "rxclassMinConceptItem": {"classId": "C09DA01"}},
        {"minConcept": {"rxcui": "123"}, "rxclassMinConceptItem": {"classId": "N02BE01"}}
    ]}}"#;

    /// Canned RxNav responses keyed by NDC / (RxCUI, source).
    #[derive(Default)]
    struct FakeRxNav {
        ndc: HashMap<String, &'static str>,
        classes: HashMap<(String, RelaSource), &'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeRxNav {
        fn not_found(url: String) -> RxNavError {
            RxNavError::Status { status: 404, url }
        }
    }

    impl RxNavApi for FakeRxNav {
        fn ndc_status(&self, ndc: &Ndc) -> RxNavResult<NdcStatusResponse> {
            self.calls.borrow_mut().push(format!("ndc:{ndc}"));
            let body = self
                .ndc
                .get(ndc.as_str())
                .ok_or_else(|| Self::not_found(format!("ndcstatus/{ndc}")))?;
            Ok(serde_json::from_str(body)?)
        }

        fn class_by_rxcui(
            &self,
            rxcui: &Rxcui,
            source: RelaSource,
        ) -> RxNavResult<RxClassResponse> {
            self.calls
                .borrow_mut()
                .push(format!("class:{}:{}", rxcui, source.as_str()));
            let body = self
                .classes
                .get(&(rxcui.to_string(), source))
                .copied()
                .unwrap_or("{}");
            Ok(serde_json::from_str(body)?)
        }
    }

    fn rxcui(value: &str) -> Rxcui {
        Rxcui::parse(value).unwrap()
    }

    fn standardizer() -> MedicationStandardizer<FakeRxNav> {
        let mut fake = FakeRxNav::default();
        fake.ndc.insert("00071015523".to_string(), ATORVASTATIN_NDC);
        fake.ndc
            .insert("11111111111".to_string(), r#"{"ndcStatus": {"ndcHistory": []}}"#);
        fake.ndc.insert(
            "22222222222".to_string(),
            r#"{"ndcStatus": {"ndcHistory": [{"activeRxcui": "123"}]}}"#,
        );
        fake.ndc.insert("33333333333".to_string(), "not json");
        fake.classes
            .insert(("617314".to_string(), RelaSource::Atc), ATORVASTATIN_ATC);
        fake.classes
            .insert(("123".to_string(), RelaSource::AtcProd), COMBO_ATCPROD);
        MedicationStandardizer::new(fake).with_request_delay(Duration::ZERO)
    }

    #[test]
    fn test_ndc_to_rxcui_uses_last_active_entry() {
        let rxcui = standardizer().ndc_to_rxcui("00071015523").unwrap();
        assert_eq!(rxcui.as_str(), "617314");
    }

    #[test]
    fn test_ndc_to_rxcui_accepts_hyphenated_ndc() {
        let s = standardizer();
        assert_eq!(s.ndc_to_rxcui("00071-0155-23").unwrap().as_str(), "617314");
    }

    #[test]
    fn test_ndc_without_active_rxcui() {
        assert!(matches!(
            standardizer().ndc_to_rxcui("11111111111"),
            Err(RxNavError::NoActiveRxcui { ndc }) if ndc == "11111111111"
        ));
    }

    #[test]
    fn test_invalid_ndc_makes_no_request() {
        let s = standardizer();
        assert!(matches!(
            s.ndc_to_atc("123", 4),
            Err(RxNavError::InvalidNdc(_))
        ));
        assert!(s.api().calls.borrow().is_empty());
    }

    #[test]
    fn test_invalid_level_checked_first() {
        let s = standardizer();
        assert!(matches!(
            s.ndc_to_atc("123", 5),
            Err(RxNavError::InvalidLevel(_))
        ));
        assert!(matches!(
            s.ndc_to_atc("00071015523", 0),
            Err(RxNavError::InvalidLevel(_))
        ));
        assert!(s.api().calls.borrow().is_empty());
    }

    #[test]
    fn test_ndc_to_atc_truncates_and_dedups() {
        let s = standardizer();

        let level4 = s.ndc_to_atc("00071015523", 4).unwrap();
        assert_eq!(level4.codes, vec!["C10AA", "C10BA"]);

        let level2 = s.ndc_to_atc("00071015523", 2).unwrap();
        assert_eq!(level2.codes, vec!["C10"]);
        assert_eq!(level2.level, AtcLevel::TWO);
    }

    #[test]
    fn test_atcprod_fallback_filters_on_rxcui() {
        let s = standardizer();
        let classes = s.ndc_to_atc("22222222222", 4).unwrap();
        assert_eq!(classes.codes, vec!["N02BE"]);

        let calls = s.api().calls.borrow();
        assert_eq!(
            *calls,
            vec!["ndc:22222222222", "class:123:ATC", "class:123:ATCPROD"]
        );
    }

    #[test]
    fn test_no_classes_anywhere_is_empty() {
        let s = standardizer();
        let classes = s.rxcui_to_atc(&rxcui("42"), AtcLevel::FOUR).unwrap();
        assert!(classes.is_empty());
    }

    #[test]
    fn test_primary_hit_skips_atcprod() {
        let s = standardizer();
        s.rxcui_to_atc(&rxcui("617314"), AtcLevel::THREE).unwrap();
        assert_eq!(*s.api().calls.borrow(), vec!["class:617314:ATC"]);
    }

    #[test]
    fn test_to_atc_with_either_identifier() {
        let s = standardizer();
        let by_ndc = s
            .to_atc(
                &DrugIdentifier::Ndc(Ndc::parse("00071015523").unwrap()),
                AtcLevel::ONE,
            )
            .unwrap();
        let by_rxcui = s
            .to_atc(&DrugIdentifier::Rxcui(rxcui("617314")), AtcLevel::ONE)
            .unwrap();
        assert_eq!(by_ndc, by_rxcui);
        assert_eq!(by_ndc.codes, vec!["C"]);
    }

    #[test]
    fn test_lenient_swallows_lookup_failures() {
        let s = standardizer();
        assert_eq!(s.ndc_to_atc_lenient("44444444444", 4).unwrap(), None);
        assert_eq!(s.ndc_to_atc_lenient("33333333333", 4).unwrap(), None);
        assert_eq!(s.ndc_to_rxcui_lenient("11111111111").unwrap(), None);
        assert_eq!(
            s.ndc_to_rxcui_lenient("00071015523").unwrap(),
            Some(rxcui("617314"))
        );
    }

    #[test]
    fn test_lenient_rejects_invalid_input() {
        let s = standardizer();
        assert!(matches!(
            s.ndc_to_atc_lenient("00071015523", 9),
            Err(RxNavError::InvalidLevel(_))
        ));
        assert!(matches!(
            s.ndc_to_atc_lenient("123", 4),
            Err(RxNavError::InvalidNdc(_))
        ));
        assert!(matches!(
            s.ndc_to_rxcui_lenient(" 00071015523"),
            Err(RxNavError::InvalidNdc(_))
        ));
        assert!(s.api().calls.borrow().is_empty());
    }

    #[test]
    fn test_repeated_calls_are_idempotent() {
        let s = standardizer();
        let first = s.ndc_to_atc("00071015523", 3).unwrap();
        let second = s.ndc_to_atc("00071015523", 3).unwrap();
        assert_eq!(first, second);
    }
}
