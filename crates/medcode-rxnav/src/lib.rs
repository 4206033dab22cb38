//! # medcode-rxnav
//!
//! Resolves National Drug Codes and RxNorm concepts to ATC drug classes
//! using the public [RxNav](https://lhncbc.nlm.nih.gov/RxNav/) REST API.
//!
//! Two endpoints are used:
//!
//! - `ndcstatus.json` to find the active RxCUI of an NDC,
//! - `rxclass/class/byRxcui.json` to list its ATC classes, first with
//!   `relaSource=ATC` and then with `relaSource=ATCPROD` when the first
//!   query finds nothing.
//!
//! Requests are synchronous and are not retried.

#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod medication;
pub mod model;

pub use client::{RelaSource, RxNavApi, RxNavClient};
pub use config::{RxNavConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_DELAY};
pub use error::{RxNavError, RxNavResult};
pub use medication::MedicationStandardizer;

// Re-export medcode-types for convenience
pub use medcode_types;
