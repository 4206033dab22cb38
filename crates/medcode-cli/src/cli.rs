//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Environment variable holding the mapping-table directory.
pub const DATA_PATH_ENV: &str = "MEDCODE_DATA_PATH";

#[derive(Debug, Parser)]
#[command(
    name = "medcode",
    version,
    about = "Translate ICD codes to phecodes and NDC codes to ATC classes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve ICD-9 or ICD-10 codes to phecodes.
    Icd(IcdArgs),

    /// Convert ICD-9 codes to ICD-10-CM through the GEM.
    Icd10(Icd10Args),

    /// Resolve NDC codes to ATC classes through RxNav.
    Atc(AtcArgs),

    /// Resolve NDC codes to their active RxCUI through RxNav.
    Rxcui(RxcuiArgs),
}

#[derive(Debug, Args)]
pub struct DataArgs {
    /// Directory holding the phecode tables and the GEM.
    #[arg(long = "data-dir", value_name = "DIR", env = DATA_PATH_ENV)]
    pub data_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct IcdArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// ICD version of the codes (9 or 10).
    #[arg(long = "icd-version", value_name = "N")]
    pub icd_version: u8,

    /// Prefix-free ICD codes.
    #[arg(value_name = "CODE", required = true)]
    pub codes: Vec<String>,
}

#[derive(Debug, Args)]
pub struct Icd10Args {
    #[command(flatten)]
    pub data: DataArgs,

    /// Prefix-free ICD-9 codes.
    #[arg(value_name = "CODE", required = true)]
    pub codes: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RxNavArgs {
    /// Pause before each NDC lookup, in milliseconds.
    #[arg(long = "delay-ms", default_value_t = 150)]
    pub delay_ms: u64,

    /// RxNav REST base URL.
    #[arg(long = "base-url", default_value = medcode_rxnav::DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Debug, Args)]
pub struct AtcArgs {
    #[command(flatten)]
    pub rxnav: RxNavArgs,

    /// ATC level to truncate to (1-4).
    #[arg(long, default_value_t = 4)]
    pub level: u8,

    /// 11-digit (or 5-4-2 hyphenated) NDC codes.
    #[arg(value_name = "NDC", required = true)]
    pub ndcs: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RxcuiArgs {
    #[command(flatten)]
    pub rxnav: RxNavArgs,

    /// 11-digit (or 5-4-2 hyphenated) NDC codes.
    #[arg(value_name = "NDC", required = true)]
    pub ndcs: Vec<String>,
}
