//! ICD-9-CM → ICD-10-CM General Equivalence Mapping (GEM) parser.
//!
//! GEM files are whitespace-delimited with no header:
//!
//! ```text
//! 0010     A000     00000
//! 0019     A009     00000
//! 0020     A0100    10000
//! 01170    NoDx     11000
//! ```
//!
//! The flag field holds five digits: approximate, no map, combination,
//! scenario, and choice list.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::types::{MappingError, MappingResult};

/// Target used by the GEM for codes without an equivalent.
pub const NO_DIAGNOSIS: &str = "NoDx";

/// Decoded GEM flag digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GemFlags {
    /// The target is an approximate match.
    pub approximate: bool,
    /// The source has no equivalent target.
    pub no_map: bool,
    /// The target is part of a combination entry.
    pub combination: bool,
    /// Scenario number within a combination.
    pub scenario: u8,
    /// Choice list number within a scenario.
    pub choice_list: u8,
}

impl GemFlags {
    /// Parses the five-digit flag field.
    pub fn parse(value: &str) -> Option<Self> {
        let digits: Vec<u8> = value
            .bytes()
            .map(|b| b.is_ascii_digit().then(|| b - b'0'))
            .collect::<Option<_>>()?;

        match digits.as_slice() {
            [approximate, no_map, combination, scenario, choice_list] => Some(Self {
                approximate: *approximate == 1,
                no_map: *no_map == 1,
                combination: *combination == 1,
                scenario: *scenario,
                choice_list: *choice_list,
            }),
            _ => None,
        }
    }
}

/// One GEM row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemEntry {
    /// Undotted ICD-9-CM source code.
    pub source: String,
    /// Undotted ICD-10-CM target code.
    pub target: String,
    /// Row flags.
    pub flags: GemFlags,
}

impl GemEntry {
    /// Returns true if the row names a real ICD-10-CM target.
    pub fn is_usable(&self) -> bool {
        !self.flags.no_map && self.target != NO_DIAGNOSIS
    }
}

/// Parses a single GEM line. Returns `None` for blank lines.
pub fn parse_gem_line(line: &str, line_number: usize) -> Option<MappingResult<GemEntry>> {
    let mut fields = line.split_whitespace();
    let source = fields.next()?;

    let entry = match (fields.next(), fields.next()) {
        (Some(target), Some(flags)) => match GemFlags::parse(flags) {
            Some(flags) => Ok(GemEntry {
                source: source.to_string(),
                target: target.to_string(),
                flags,
            }),
            None => Err(MappingError::Parse {
                line: line_number,
                message: format!("invalid GEM flags '{flags}'"),
            }),
        },
        _ => Err(MappingError::Parse {
            line: line_number,
            message: format!("expected 3 fields in GEM row '{}'", line.trim()),
        }),
    };
    Some(entry)
}

/// ICD-9-CM → ICD-10-CM lookup built from a GEM file.
///
/// The first usable target listed for a source code wins.
#[derive(Debug, Clone, Default)]
pub struct GemTable {
    targets: HashMap<String, String>,
}

impl GemTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a GEM file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> MappingResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MappingError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::from_reader(File::open(path)?)
    }

    /// Loads a GEM from any reader.
    pub fn from_reader<R: Read>(reader: R) -> MappingResult<Self> {
        let lines = BufReader::new(reader)
            .lines()
            .collect::<Result<Vec<String>, _>>()?;

        let mut table = Self::new();
        table.extend(parse_lines(&lines)?);
        Ok(table)
    }

    /// Adds entries in file order, keeping the first usable target per source.
    pub fn extend<I: IntoIterator<Item = GemEntry>>(&mut self, entries: I) {
        for entry in entries {
            if entry.is_usable() {
                self.targets.entry(entry.source).or_insert(entry.target);
            }
        }
    }

    /// Looks up the ICD-10-CM target for an undotted ICD-9-CM code.
    pub fn get(&self, icd9: &str) -> Option<&str> {
        self.targets.get(icd9).map(String::as_str)
    }

    /// Number of mapped source codes.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if the table holds no mappings.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(feature = "parallel")]
fn parse_lines(lines: &[String]) -> MappingResult<Vec<GemEntry>> {
    lines
        .par_iter()
        .enumerate()
        .filter_map(|(i, line)| parse_gem_line(line, i + 1))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn parse_lines(lines: &[String]) -> MappingResult<Vec<GemEntry>> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| parse_gem_line(line, i + 1))
        .collect()
}
