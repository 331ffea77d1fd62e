use crate::catalog;
use crate::loader::LoadReport;
use crate::types::{
    Aggregate, PolarityCount, PolarityCountRow, RankedRegionRow, RegionTotal, SummaryExport,
    TypeTotal, ValidRow, ViewRow,
};
use crate::util::{format_int, format_pct, round1};
use std::collections::{HashMap, HashSet};

/// Review counts per polarity across the whole dataset, always five entries.
pub fn polarity_distribution(rows: &[ValidRow]) -> Vec<PolarityCount> {
    let mut counts = [0u64; 5];
    for row in rows {
        counts[(row.polarity - 1) as usize] += 1;
    }
    let total = rows.len() as f64;
    (1..=5u8)
        .map(|polarity| {
            let count = counts[(polarity - 1) as usize];
            let percentage = if total > 0.0 {
                round1(count as f64 / total * 100.0)
            } else {
                0.0
            };
            PolarityCount {
                polarity,
                label: catalog::polarity_label(polarity).to_string(),
                count,
                percentage,
            }
        })
        .collect()
}

pub fn distribution_table(distribution: &[PolarityCount]) -> Vec<PolarityCountRow> {
    distribution
        .iter()
        .map(|entry| PolarityCountRow {
            polaridad: entry.polarity,
            etiqueta: entry.label.clone(),
            resenas: format_int(entry.count),
            porcentaje: format_pct(entry.percentage),
        })
        .collect()
}

/// Regions ranked by total reviews. Display names are used so dataset
/// spellings merge; regions without coordinates still appear here.
pub fn top_regions(rows: &[ValidRow], limit: usize) -> Vec<RegionTotal> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for row in rows {
        *counts.entry(catalog::display_name(&row.region)).or_insert(0) += 1;
    }
    let mut totals: Vec<RegionTotal> = counts
        .into_iter()
        .map(|(region, reviews)| RegionTotal {
            region: region.to_string(),
            reviews,
        })
        .collect();
    totals.sort_by(|a, b| b.reviews.cmp(&a.reviews).then_with(|| a.region.cmp(&b.region)));
    totals.truncate(limit);
    totals
}

/// Establishment types ranked by review count.
pub fn top_types(rows: &[ValidRow], limit: usize) -> Vec<TypeTotal> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for row in rows {
        *counts.entry(row.establishment_type.as_str()).or_insert(0) += 1;
    }
    let mut totals: Vec<TypeTotal> = counts
        .into_iter()
        .map(|(establishment_type, reviews)| TypeTotal {
            establishment_type: establishment_type.to_string(),
            reviews,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.reviews
            .cmp(&a.reviews)
            .then_with(|| a.establishment_type.cmp(&b.establishment_type))
    });
    totals.truncate(limit);
    totals
}

/// Number of distinct raw region keys in the dataset.
pub fn unique_regions(rows: &[ValidRow]) -> usize {
    let regions: HashSet<&str> = rows.iter().map(|r| r.region.as_str()).collect();
    regions.len()
}

/// Number of distinct establishment types.
pub fn unique_types(rows: &[ValidRow]) -> usize {
    let types: HashSet<&str> = rows.iter().map(|r| r.establishment_type.as_str()).collect();
    types.len()
}

/// Turn a ranked projection into table rows, rank starting at 1.
pub fn build_ranked_rows(view_rows: &[ViewRow]) -> Vec<RankedRegionRow> {
    view_rows
        .iter()
        .enumerate()
        .map(|(idx, row)| RankedRegionRow {
            rank: idx + 1,
            estado: row.canonical.clone(),
            clave: row.original_key.clone(),
            resenas: format_int(row.count),
            total_estado: format_int(row.total),
            porcentaje: format_pct(row.percentage),
        })
        .collect()
}

/// Assemble the `summary.json` payload.
pub fn build_summary_export(
    report: &LoadReport,
    rows: &[ValidRow],
    aggregate: &Aggregate,
) -> SummaryExport {
    SummaryExport {
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        total_rows: report.total_rows,
        valid_rows: report.valid_rows,
        dropped_rows: report.dropped_rows,
        unique_regions: unique_regions(rows),
        mapped_states: aggregate.buckets.len(),
        establishment_types: unique_types(rows),
        unmappable_rows: aggregate.unmappable_rows,
        polarity_distribution: polarity_distribution(rows),
        top_regions: top_regions(rows, 10),
        top_types: top_types(rows, 5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::project::project;

    fn row(region: &str, establishment_type: &str, polarity: u8) -> ValidRow {
        ValidRow {
            region: region.to_string(),
            establishment_type: establishment_type.to_string(),
            polarity,
        }
    }

    #[test]
    fn distribution_counts_every_polarity() {
        let rows = vec![
            row("Jalisco", "hotel", 1),
            row("Jalisco", "hotel", 3),
            row("Oaxaca", "restaurant", 3),
            row("Oaxaca", "restaurant", 5),
        ];
        let dist = polarity_distribution(&rows);
        assert_eq!(dist.len(), 5);
        let counts: Vec<u64> = dist.iter().map(|d| d.count).collect();
        assert_eq!(counts, [1, 0, 2, 0, 1]);
        assert_eq!(dist[2].percentage, 50.0);
        let total: u64 = counts.iter().sum();
        assert_eq!(total as usize, rows.len());
    }

    #[test]
    fn top_regions_merge_dataset_spellings() {
        let rows = vec![
            row("QuintanaRoo", "hotel", 3),
            row("QuintanaRoo", "hotel", 4),
            row("Jalisco", "hotel", 3),
            row("Atlantis", "hotel", 3),
        ];
        let top = top_regions(&rows, 10);
        assert_eq!(top[0].region, "Quintana Roo");
        assert_eq!(top[0].reviews, 2);
        // Regions without coordinates still count toward raw totals.
        assert!(top.iter().any(|t| t.region == "Atlantis"));
    }

    #[test]
    fn top_types_are_ranked_and_limited() {
        let rows = vec![
            row("Jalisco", "hotel", 3),
            row("Jalisco", "hotel", 3),
            row("Jalisco", "restaurant", 3),
            row("Jalisco", "attraction", 3),
        ];
        let top = top_types(&rows, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].establishment_type, "hotel");
        assert_eq!(top[0].reviews, 2);
    }

    #[test]
    fn ranked_rows_number_from_one() {
        let rows = vec![
            row("Jalisco", "hotel", 3),
            row("Jalisco", "hotel", 3),
            row("Oaxaca", "hotel", 3),
        ];
        let agg = aggregate(&rows);
        let (view_rows, _) = project(&agg, 3);
        let table = build_ranked_rows(&view_rows);
        assert_eq!(table[0].rank, 1);
        assert_eq!(table[0].estado, "Jalisco");
        assert_eq!(table[0].clave, "Jalisco");
        assert_eq!(table[0].resenas, "2");
        assert_eq!(table[0].porcentaje, "100.0");
        assert_eq!(table[1].rank, 2);
    }
}
