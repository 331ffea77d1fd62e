use crate::types::{Aggregate, SessionStats, ViewRow};
use crate::util::round1;

/// Derive the presentation dataset for one selected polarity.
///
/// Every bucket yields a row, including regions with no reviews at the
/// selected polarity. The projection is a full rebuild: nothing from a
/// previous selection is reused except the aggregate itself. Rows come back
/// ranked by count descending, display name ascending on ties, so iteration
/// order is deterministic for a fixed dataset.
pub fn project(aggregate: &Aggregate, polarity: u8) -> (Vec<ViewRow>, SessionStats) {
    let mut rows: Vec<ViewRow> = aggregate
        .buckets
        .iter()
        .map(|(canonical, bucket)| {
            let count = bucket.count_at(polarity);
            let percentage = if bucket.total > 0 {
                round1(count as f64 / bucket.total as f64 * 100.0)
            } else {
                0.0
            };
            ViewRow {
                canonical: canonical.clone(),
                original_key: bucket.original_key.clone(),
                coordinates: bucket.coordinates,
                count,
                total: bucket.total,
                percentage,
                all_polarities: bucket.counts,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.canonical.cmp(&b.canonical))
    });

    let total_reviews: u64 = rows.iter().map(|r| r.count).sum();
    let max_count = rows.iter().map(|r| r.count).max().unwrap_or(0);
    let stats = SessionStats {
        total_states: rows.len(),
        total_reviews,
        max_count,
        unmappable_rows: aggregate.unmappable_rows,
    };
    (rows, stats)
}
