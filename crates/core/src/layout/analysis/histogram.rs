//! Histogram-mode spacing estimator.
//!
//! Inter-word and inter-line gaps on a page cluster tightly around the body
//! font's natural spacing, with a long tail from punctuation, superscripts
//! and neighbouring columns. The estimate is the mean of the fullest unit-width
//! bucket of the samples.

use rustc_hash::FxHashMap;

/// Mean of the most populous unit-width bucket of `samples`.
///
/// Buckets are keyed by `floor(value)`. When several buckets share the peak
/// count the one with the smallest key wins. Non-finite samples are ignored;
/// returns `None` when no finite sample remains.
pub fn histogram_mode<I>(samples: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    // key -> (count, sum)
    let mut buckets: FxHashMap<i64, (usize, f64)> = FxHashMap::default();
    for value in samples.into_iter().filter(|v| v.is_finite()) {
        let bucket = buckets.entry(value.floor() as i64).or_insert((0, 0.0));
        bucket.0 += 1;
        bucket.1 += value;
    }

    buckets
        .into_iter()
        .max_by(|(ka, (ca, _)), (kb, (cb, _))| ca.cmp(cb).then(kb.cmp(ka)))
        .map(|(_, (count, sum))| sum / count as f64)
}
