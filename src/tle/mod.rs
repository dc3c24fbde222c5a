//! TLE (Two-Line Element) data management module
//!
//! Parsing and data structures for satellite orbital elements. Fetching from
//! external catalogs is owned by the surrounding data layer; this core only
//! receives refreshed element sets and keeps the last known good record per
//! body, so a failed upstream fetch can never make a satellite disappear.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::bodies::BodyId;

pub mod parser;

pub use parser::parse_tle_epoch_to_utc;

/// A two-line element record with its parsed epoch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TleRecord {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
    pub epoch_utc: DateTime<Utc>,
}

impl TleRecord {
    /// Parse a record from its two lines, failing fast on malformed input.
    /// A bad TLE is a data-catalog bug, surfaced at load time.
    pub fn parse(name: Option<String>, line1: &str, line2: &str) -> anyhow::Result<Self> {
        if !line1.starts_with("1 ") {
            return Err(anyhow!("TLE line 1 must start with '1 ': {:?}", line1));
        }
        if !line2.starts_with("2 ") {
            return Err(anyhow!("TLE line 2 must start with '2 ': {:?}", line2));
        }
        let epoch_utc = parse_tle_epoch_to_utc(line1)
            .ok_or_else(|| anyhow!("unparseable TLE epoch in line 1: {:?}", line1))?;
        Ok(Self {
            name,
            line1: line1.to_string(),
            line2: line2.to_string(),
            epoch_utc,
        })
    }
}

/// Last-known-good element sets, keyed by body id.
///
/// The excluded fetch layer refreshes this on its own cadence (hourly in
/// production). An update replaces a record; absence of an update leaves the
/// previous record in place, so consumers only ever see stale data, never
/// missing data.
#[derive(Default)]
pub struct TleStore {
    records: HashMap<BodyId, TleRecord>,
    updated_at: Option<DateTime<Utc>>,
}

impl TleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record for one body.
    pub fn update(&mut self, id: BodyId, record: TleRecord, now: DateTime<Utc>) {
        self.records.insert(id, record);
        self.updated_at = Some(now);
    }

    pub fn get(&self, id: &BodyId) -> Option<&TleRecord> {
        self.records.get(id)
    }

    /// When any record was last refreshed, if ever.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
