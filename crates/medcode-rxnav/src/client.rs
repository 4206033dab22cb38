//! Blocking RxNav REST client.

use medcode_types::{Ndc, Rxcui};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::config::RxNavConfig;
use crate::error::{RxNavError, RxNavResult};
use crate::model::{NdcStatusResponse, RxClassResponse};

/// Relationship source for `class/byRxcui` queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelaSource {
    /// ATC classes asserted on ingredients.
    Atc,
    /// ATC classes asserted on products.
    AtcProd,
}

impl RelaSource {
    /// Value of the `relaSource` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Atc => "ATC",
            Self::AtcProd => "ATCPROD",
        }
    }
}

/// The RxNav calls the resolver depends on.
///
/// [`RxNavClient`] talks to the real service; tests substitute canned
/// responses.
pub trait RxNavApi {
    /// Fetches the status and RxCUI history of an NDC.
    fn ndc_status(&self, ndc: &Ndc) -> RxNavResult<NdcStatusResponse>;

    /// Fetches the classes an RxCUI belongs to under `source`.
    fn class_by_rxcui(&self, rxcui: &Rxcui, source: RelaSource) -> RxNavResult<RxClassResponse>;
}

/// RxNav client over blocking HTTP.
#[derive(Debug, Clone)]
pub struct RxNavClient {
    client: Client,
    config: RxNavConfig,
}

impl RxNavClient {
    /// Creates a client for the public RxNav endpoint.
    pub fn new() -> RxNavResult<Self> {
        Self::with_config(RxNavConfig::default())
    }

    /// Creates a client with explicit configuration.
    pub fn with_config(config: RxNavConfig) -> RxNavResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RxNavConfig {
        &self.config
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> RxNavResult<T> {
        let url = self.config.endpoint(path);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RxNavError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl RxNavApi for RxNavClient {
    fn ndc_status(&self, ndc: &Ndc) -> RxNavResult<NdcStatusResponse> {
        self.get_json("ndcstatus.json", &[("ndc", ndc.as_str())])
    }

    fn class_by_rxcui(&self, rxcui: &Rxcui, source: RelaSource) -> RxNavResult<RxClassResponse> {
        match source {
            RelaSource::Atc => self.get_json(
                "rxclass/class/byRxcui.json",
                &[("rxcui", rxcui.as_str()), ("relaSource", source.as_str())],
            ),
            RelaSource::AtcProd => self.get_json(
                "rxclass/class/byRxcui.json",
                &[
                    ("caller", "RxNav"),
                    ("rxcui", rxcui.as_str()),
                    ("relaSource", source.as_str()),
                ],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rela_source_values() {
        assert_eq!(RelaSource::Atc.as_str(), "ATC");
        assert_eq!(RelaSource::AtcProd.as_str(), "ATCPROD");
    }

    #[test]
    fn test_client_keeps_config() {
        let client = RxNavClient::with_config(RxNavConfig::without_delay()).unwrap();
        assert_eq!(client.config().base_url, "https://rxnav.nlm.nih.gov/REST");
    }
}
