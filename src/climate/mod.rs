//! Climate Normals Store.
//!
//! Loads monthly climate normals for all continents and hemispheres from
//! JSON reference files once at process start, validates completeness
//! (7 continents × 12 months + 2 hemispheres × 12 months), and serves
//! read-only lookups for the lifetime of the process. A re-load requires
//! a full restart.

pub mod generator;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::types::{Continent, ForecastError, Hemisphere, RegionScope};

// ---------------------------------------------------------------------------
// Normals
// ---------------------------------------------------------------------------

/// Monthly temperature statistics [°C].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureNormal {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Long-run average weather statistics for one region scope and one
/// calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateNormal {
    pub temperature: TemperatureNormal,
    /// Monthly precipitation [mm].
    pub precipitation_avg: f64,
    /// Relative humidity [%].
    pub humidity_avg: f64,
    /// Wind speed [m/s].
    pub wind_avg: f64,
}

// ---------------------------------------------------------------------------
// Reference file schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NormalsFile {
    /// Months keyed "1" through "12".
    months: HashMap<String, ClimateNormal>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Process-wide, read-only table of monthly climate normals.
///
/// Constructed once at startup and shared via `Arc` across all request
/// handlers. Never mutated after construction, so no locking.
#[derive(Debug)]
pub struct ClimateStore {
    tables: HashMap<RegionScope, [ClimateNormal; 12]>,
}

impl ClimateStore {
    /// Load all continent and hemisphere normal tables from `dir`.
    ///
    /// Expects `dir/continents/<name>.json` for all seven continents and
    /// `dir/hemispheres/<name>.json` for both hemispheres. Any missing
    /// file, unparseable file, or missing month is a fatal
    /// `Configuration` error — the store refuses to finish
    /// initialization on incomplete data.
    pub fn load(dir: &Path) -> Result<Self, ForecastError> {
        let mut tables = HashMap::new();

        for continent in Continent::ALL {
            let path = dir.join("continents").join(format!("{continent}.json"));
            let table = Self::load_file(&path)?;
            tables.insert(RegionScope::Continent(*continent), table);
        }

        for hemisphere in Hemisphere::ALL {
            let path = dir.join("hemispheres").join(format!("{hemisphere}.json"));
            let table = Self::load_file(&path)?;
            tables.insert(RegionScope::Hemisphere(*hemisphere), table);
        }

        Self::from_tables(tables)
    }

    /// Build a store from in-memory tables, validating completeness.
    pub fn from_tables(
        tables: HashMap<RegionScope, [ClimateNormal; 12]>,
    ) -> Result<Self, ForecastError> {
        for continent in Continent::ALL {
            if !tables.contains_key(&RegionScope::Continent(*continent)) {
                return Err(ForecastError::Configuration(format!(
                    "missing climate normals for continent {continent}"
                )));
            }
        }
        for hemisphere in Hemisphere::ALL {
            if !tables.contains_key(&RegionScope::Hemisphere(*hemisphere)) {
                return Err(ForecastError::Configuration(format!(
                    "missing climate normals for hemisphere {hemisphere}"
                )));
            }
        }
        Ok(Self { tables })
    }

    fn load_file(path: &Path) -> Result<[ClimateNormal; 12], ForecastError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::Configuration(format!(
                "failed to read normals file {}: {e}",
                path.display()
            ))
        })?;
        let file: NormalsFile = serde_json::from_str(&contents).map_err(|e| {
            ForecastError::Configuration(format!(
                "failed to parse normals file {}: {e}",
                path.display()
            ))
        })?;

        let mut months = Vec::with_capacity(12);
        for month in 1u32..=12 {
            let normal = file.months.get(&month.to_string()).ok_or_else(|| {
                ForecastError::Configuration(format!(
                    "normals file {} is missing month {month}",
                    path.display()
                ))
            })?;
            months.push(*normal);
        }

        // Vec of exactly 12, checked above.
        Ok(months.try_into().expect("twelve months"))
    }

    /// Look up the normal for a scope and month (1–12).
    ///
    /// Infallible after construction: completeness is validated at load
    /// and month values come from calendar arithmetic.
    pub fn lookup(&self, scope: RegionScope, month: u32) -> &ClimateNormal {
        debug_assert!((1..=12).contains(&month));
        let table = self
            .tables
            .get(&scope)
            .expect("store completeness validated at load");
        &table[(month - 1) as usize]
    }

    /// Number of loaded (scope, month) entries.
    pub fn len(&self) -> usize {
        self.tables.len() * 12
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
