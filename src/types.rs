use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tabled::Tabled;

/// One CSV record as read from disk. All fields are optional strings so the
/// header set can be checked structurally and cell values parsed defensively.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Title")]
    #[allow(dead_code)]
    pub title: Option<String>,
    #[serde(rename = "Review")]
    #[allow(dead_code)]
    pub review: Option<String>,
    #[serde(rename = "Polarity")]
    pub polarity: Option<String>,
    #[serde(rename = "Town")]
    #[allow(dead_code)]
    pub town: Option<String>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Type")]
    pub establishment_type: Option<String>,
}

/// A row that survived validation: non-empty region, polarity in 1..=5.
/// The review text itself is not retained; no report reads it.
#[derive(Debug, Clone)]
pub struct ValidRow {
    pub region: String,
    pub establishment_type: String,
    pub polarity: u8,
}

/// Per-region accumulator: one count per polarity plus the region total.
/// Created on the first row seen for the region, lives for the session.
#[derive(Debug, Clone)]
pub struct RegionBucket {
    /// Raw dataset spelling that first produced this bucket.
    pub original_key: String,
    pub coordinates: (f64, f64),
    pub counts: [u64; 5],
    pub total: u64,
}

impl RegionBucket {
    pub fn count_at(&self, polarity: u8) -> u64 {
        self.counts[(polarity - 1) as usize]
    }
}

/// Output of the aggregation pass, reused across polarity selections.
#[derive(Debug, Clone)]
pub struct Aggregate {
    /// Keyed by display name.
    pub buckets: HashMap<String, RegionBucket>,
    /// Rows whose region had no coordinates; excluded from all geographic
    /// output but surfaced as a diagnostic.
    pub unmappable_rows: u64,
}

/// Read-only projection of one region at the selected polarity. Rebuilt in
/// full on every selection change; `all_polarities` does not depend on the
/// selection.
#[derive(Debug, Clone)]
pub struct ViewRow {
    pub canonical: String,
    pub original_key: String,
    pub coordinates: (f64, f64),
    pub count: u64,
    pub total: u64,
    pub percentage: f64,
    pub all_polarities: [u64; 5],
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub total_states: usize,
    pub total_reviews: u64,
    pub max_count: u64,
    pub unmappable_rows: u64,
}

/// Ranked-table row, previewed with `tabled` and exported to CSV. Counts are
/// pre-formatted strings so both surfaces show the same text.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct RankedRegionRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Estado")]
    #[tabled(rename = "Estado")]
    pub estado: String,
    /// Dataset spelling behind the display name, for cross-referencing.
    #[serde(rename = "Clave")]
    #[tabled(rename = "Clave")]
    pub clave: String,
    #[serde(rename = "Reseñas")]
    #[tabled(rename = "Reseñas")]
    pub resenas: String,
    #[serde(rename = "TotalEstado")]
    #[tabled(rename = "TotalEstado")]
    pub total_estado: String,
    #[serde(rename = "Porcentaje")]
    #[tabled(rename = "Porcentaje")]
    pub porcentaje: String,
}

/// Reviews at one polarity across the whole dataset.
#[derive(Debug, Clone, Serialize)]
pub struct PolarityCount {
    pub polarity: u8,
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

/// One line of the polarity distribution table.
#[derive(Debug, Clone, Tabled)]
pub struct PolarityCountRow {
    #[tabled(rename = "Polaridad")]
    pub polaridad: u8,
    #[tabled(rename = "Etiqueta")]
    pub etiqueta: String,
    #[tabled(rename = "Reseñas")]
    pub resenas: String,
    #[tabled(rename = "Porcentaje")]
    pub porcentaje: String,
}

#[derive(Debug, Serialize)]
pub struct RegionTotal {
    pub region: String,
    pub reviews: u64,
}

#[derive(Debug, Serialize)]
pub struct TypeTotal {
    pub establishment_type: String,
    pub reviews: u64,
}

/// Payload of `summary.json`.
#[derive(Debug, Serialize)]
pub struct SummaryExport {
    pub generated_at: String,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub dropped_rows: usize,
    pub unique_regions: usize,
    pub mapped_states: usize,
    pub establishment_types: usize,
    pub unmappable_rows: u64,
    pub polarity_distribution: Vec<PolarityCount>,
    pub top_regions: Vec<RegionTotal>,
    pub top_types: Vec<TypeTotal>,
}
