use crate::catalog;
use crate::types::{Aggregate, RegionBucket, ValidRow};
use log::debug;
use std::collections::HashMap;

/// Group valid rows into per-region polarity buckets.
///
/// Regions are keyed by display name, so several dataset spellings can feed
/// one bucket. Rows whose region has no coordinates never allocate a bucket;
/// they are only counted in the `unmappable_rows` diagnostic. The result is
/// independent of input row order.
pub fn aggregate(rows: &[ValidRow]) -> Aggregate {
    let mut buckets: HashMap<String, RegionBucket> = HashMap::new();
    let mut unmappable_rows = 0u64;

    for row in rows {
        let (canonical, coordinates) = match catalog::canonicalize(&row.region) {
            Some(hit) => hit,
            None => {
                unmappable_rows += 1;
                continue;
            }
        };
        let bucket = buckets
            .entry(canonical.to_string())
            .or_insert_with(|| RegionBucket {
                original_key: row.region.clone(),
                coordinates,
                counts: [0; 5],
                total: 0,
            });
        bucket.counts[(row.polarity - 1) as usize] += 1;
        bucket.total += 1;
    }

    if unmappable_rows > 0 {
        debug!(
            "{} rows referenced regions without coordinates",
            unmappable_rows
        );
    }
    Aggregate {
        buckets,
        unmappable_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(region: &str, polarity: u8) -> ValidRow {
        ValidRow {
            region: region.to_string(),
            establishment_type: "hotel".to_string(),
            polarity,
        }
    }

    #[test]
    fn single_row_builds_one_bucket() {
        let agg = aggregate(&[row("Jalisco", 5)]);
        assert_eq!(agg.buckets.len(), 1);
        let bucket = &agg.buckets["Jalisco"];
        assert_eq!(bucket.counts, [0, 0, 0, 0, 1]);
        assert_eq!(bucket.total, 1);
        assert_eq!(bucket.count_at(5), 1);
        assert_eq!(agg.unmappable_rows, 0);
    }

    #[test]
    fn aliases_merge_into_the_display_name() {
        let agg = aggregate(&[row("QuintanaRoo", 4), row("QuintanaRoo", 2)]);
        let bucket = &agg.buckets["Quintana Roo"];
        assert_eq!(bucket.original_key, "QuintanaRoo");
        assert_eq!(bucket.total, 2);
        assert_eq!(bucket.counts, [0, 1, 0, 1, 0]);
    }

    #[test]
    fn unmappable_rows_never_allocate_buckets() {
        let agg = aggregate(&[row("Atlantis", 3), row("Jalisco", 3)]);
        assert_eq!(agg.buckets.len(), 1);
        assert!(!agg.buckets.contains_key("Atlantis"));
        assert_eq!(agg.unmappable_rows, 1);
    }

    #[test]
    fn result_is_order_independent() {
        let rows = vec![
            row("Jalisco", 1),
            row("Oaxaca", 5),
            row("Jalisco", 5),
            row("QuintanaRoo", 3),
            row("Oaxaca", 5),
        ];
        let forward = aggregate(&rows);
        let mut reversed = rows.clone();
        reversed.reverse();
        let backward = aggregate(&reversed);

        assert_eq!(forward.buckets.len(), backward.buckets.len());
        for (name, bucket) in &forward.buckets {
            let other = &backward.buckets[name];
            assert_eq!(bucket.counts, other.counts);
            assert_eq!(bucket.total, other.total);
        }
    }
}
