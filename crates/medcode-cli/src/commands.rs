//! Command implementations. Each writes one line per input code.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use medcode_loader::{discover_mapping_files, IcdStandardizer};
use medcode_rxnav::{MedicationStandardizer, RxNavApi, RxNavConfig};
use medcode_types::{AtcLevel, IcdVersion};
use tracing::info;

use crate::cli::RxNavArgs;

/// Printed when a drug lookup fails.
pub const NOT_AVAILABLE: &str = "NA";

pub fn load_standardizer(data_dir: &Path) -> Result<IcdStandardizer> {
    info!("Loading mapping tables from: {}", data_dir.display());
    let files = discover_mapping_files(data_dir)
        .with_context(|| format!("failed to discover mapping files in {}", data_dir.display()))?;
    let standardizer = IcdStandardizer::load(&files).context("failed to load mapping tables")?;
    info!("Loaded {:?}", standardizer.store());
    Ok(standardizer)
}

pub fn medication_standardizer(args: &RxNavArgs) -> Result<MedicationStandardizer> {
    let config = RxNavConfig {
        base_url: args.base_url.clone(),
        request_delay: Duration::from_millis(args.delay_ms),
        ..RxNavConfig::default()
    };
    MedicationStandardizer::from_config(config).context("failed to create RxNav client")
}

pub fn run_icd<W: Write>(
    standardizer: &IcdStandardizer,
    version: u8,
    codes: &[String],
    out: &mut W,
) -> Result<()> {
    let version = IcdVersion::from_number(version)?;
    for resolution in standardizer.resolve_all(codes, version) {
        writeln!(out, "{resolution}")?;
    }
    Ok(())
}

pub fn run_icd10<W: Write>(
    standardizer: &IcdStandardizer,
    codes: &[String],
    out: &mut W,
) -> Result<()> {
    for code in codes {
        writeln!(out, "{}", standardizer.standardize_to_icd10(IcdVersion::Icd9, code))?;
    }
    Ok(())
}

pub fn run_atc<A: RxNavApi, W: Write>(
    standardizer: &MedicationStandardizer<A>,
    level: u8,
    ndcs: &[String],
    out: &mut W,
) -> Result<()> {
    let level = AtcLevel::new(level)?;
    for ndc in ndcs {
        let classes = standardizer
            .ndc_to_atc_lenient(ndc, level.get())
            .with_context(|| format!("cannot look up NDC '{ndc}'"))?;
        match classes {
            Some(classes) => writeln!(out, "{ndc}\t{classes}")?,
            None => writeln!(out, "{ndc}\t{NOT_AVAILABLE}")?,
        }
    }
    Ok(())
}

pub fn run_rxcui<A: RxNavApi, W: Write>(
    standardizer: &MedicationStandardizer<A>,
    ndcs: &[String],
    out: &mut W,
) -> Result<()> {
    for ndc in ndcs {
        let rxcui = standardizer
            .ndc_to_rxcui_lenient(ndc)
            .with_context(|| format!("cannot look up NDC '{ndc}'"))?;
        match rxcui {
            Some(rxcui) => writeln!(out, "{ndc}\t{rxcui}")?,
            None => writeln!(out, "{ndc}\t{NOT_AVAILABLE}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use medcode_rxnav::model::{NdcStatusResponse, RxClassResponse};
    use medcode_rxnav::{RelaSource, RxNavError, RxNavResult};
    use medcode_types::{Ndc, Rxcui};

    use super::*;

    fn write_tables(dir: &Path) {
        fs::write(dir.join("phemap.csv"), "icd9,phecode\n250.00,250.2\n").unwrap();
        fs::write(
            dir.join("phecode_map_v1_2_icd9.csv"),
            "ICD9,PheCode\n401.1,401.1\n",
        )
        .unwrap();
        fs::write(
            dir.join("Phecode_map_v1_2_icd10cm_beta.csv"),
            "ICD10CM,PHECODE\nE10.9,250.1\n",
        )
        .unwrap();
        fs::write(dir.join("2018_I9gem.txt"), "25001 E109 10000\n").unwrap();
    }

    fn run_to_string<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_icd_command_output() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());
        let standardizer = load_standardizer(dir.path()).unwrap();

        let codes: Vec<String> = ["250.00", "401.1", "250.01", "999.9"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let output = run_to_string(|out| run_icd(&standardizer, 9, &codes, out));
        assert_eq!(output, "phe_250.2\nphe_401.1\nphe_250.1\nICD9CM:999.9\n");
    }

    #[test]
    fn test_icd_command_rejects_version() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());
        let standardizer = load_standardizer(dir.path()).unwrap();

        let mut out = Vec::new();
        assert!(run_icd(&standardizer, 8, &["250.00".to_string()], &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_icd10_command_output() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());
        let standardizer = load_standardizer(dir.path()).unwrap();

        let codes = vec!["250.01".to_string(), "V70.0".to_string()];
        let output = run_to_string(|out| run_icd10(&standardizer, &codes, out));
        assert_eq!(output, "ICD10CM:E10.9\nICD9CM:V70.0\n");
    }

    #[test]
    fn test_load_standardizer_missing_tables() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_standardizer(dir.path()).is_err());
    }

    /// Knows a single NDC mapped to RxCUI 617314 in class C10AA05.
    struct OneDrug;

    impl RxNavApi for OneDrug {
        fn ndc_status(&self, ndc: &Ndc) -> RxNavResult<NdcStatusResponse> {
            let body = if ndc.as_str() == "00071015523" {
                r#"{"ndcStatus": {"ndcHistory": [{"activeRxcui": "617314"}]}}"#
            } else {
                "{}"
            };
            decode(body)
        }

        fn class_by_rxcui(
            &self,
            rxcui: &Rxcui,
            source: RelaSource,
        ) -> RxNavResult<RxClassResponse> {
            if rxcui.as_str() == "617314" && source == RelaSource::Atc {
                decode(
                    r#"{"rxclassDrugInfoList": {"rxclassDrugInfo": [
                        {"minConcept": {"rxcui": "83367"}, "rxclassMinConceptItem": {"classId": "C10AA05"}}
                    ]}}"#,
                )
            } else {
                Err(RxNavError::Status {
                    status: 500,
                    url: "fake".to_string(),
                })
            }
        }
    }

    fn decode<T: serde::de::DeserializeOwned>(body: &str) -> RxNavResult<T> {
        Ok(serde_json::from_str(body)?)
    }

    /// Fails the test if any request is made.
    struct NoRequests;

    impl RxNavApi for NoRequests {
        fn ndc_status(&self, ndc: &Ndc) -> RxNavResult<NdcStatusResponse> {
            panic!("unexpected ndcstatus request for {ndc}")
        }

        fn class_by_rxcui(
            &self,
            rxcui: &Rxcui,
            _source: RelaSource,
        ) -> RxNavResult<RxClassResponse> {
            panic!("unexpected class request for {rxcui}")
        }
    }

    fn offline<A: RxNavApi>(api: A) -> MedicationStandardizer<A> {
        MedicationStandardizer::new(api).with_request_delay(Duration::ZERO)
    }

    #[test]
    fn test_atc_command_output() {
        let standardizer = offline(OneDrug);
        let ndcs = vec!["00071-0155-23".to_string(), "99999999999".to_string()];

        let output = run_to_string(|out| run_atc(&standardizer, 3, &ndcs, out));
        assert_eq!(output, "00071-0155-23\tC10A\n99999999999\tNA\n");
    }

    #[test]
    fn test_atc_command_rejects_level() {
        let standardizer = offline(NoRequests);
        let mut out = Vec::new();
        let result = run_atc(&standardizer, 9, &["00071015523".to_string()], &mut out);
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_atc_command_rejects_malformed_ndc() {
        let standardizer = offline(NoRequests);
        let mut out = Vec::new();
        assert!(run_atc(&standardizer, 4, &["123".to_string()], &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_rxcui_command_output() {
        let standardizer = offline(OneDrug);
        let ndcs = vec!["00071015523".to_string(), "99999999999".to_string()];

        let output = run_to_string(|out| run_rxcui(&standardizer, &ndcs, out));
        assert_eq!(output, "00071015523\t617314\n99999999999\tNA\n");
    }

    #[test]
    fn test_rxcui_command_rejects_malformed_ndc() {
        let standardizer = offline(NoRequests);
        let mut out = Vec::new();
        assert!(run_rxcui(&standardizer, &["0007A015523".to_string()], &mut out).is_err());
        assert!(out.is_empty());
    }
}
