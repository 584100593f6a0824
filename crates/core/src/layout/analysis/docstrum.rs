//! Docstrum page segmentation.
//!
//! Bottom-up layout analysis that turns a page's words into text lines and
//! text blocks using only their geometry:
//!
//! 1. Estimate the page's within-line and between-line spacing from the
//!    nearest neighbours of every word.
//! 2. Cluster words into lines, bounded by the within-line spacing and an
//!    angle gate.
//! 3. Cluster lines into blocks, joining lines that overlap horizontally and
//!    sit within the between-line spacing of each other.
//! 4. Merge blocks whose boxes still intersect (typical of justified text).

use std::f64::consts::SQRT_2;

use rayon::ThreadPool;
use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::Result;
use crate::utils::{HasBBox, LineSegment, Point};

use super::super::params::{AngleBounds, DocstrumParams};
use super::super::types::{TextBlock, TextLine, Word};
use super::clustering::{ClusteringStrategy, cluster_nearest_neighbours, in_pool};
use super::histogram::histogram_mode;
use super::spatial::{
    Euclidean, OverlapMidpoint, SpatialIndex, WeightedEuclidean, angle, horizontal, vertical,
};

/// Neighbours examined per word or line.
const K_NEIGHBORS: usize = 2;

/// Squared-x weight when looking for the next word on the same line.
const WITHIN_LINE_X_WEIGHT: f64 = 0.5;

/// Squared-x weight when looking for the word on the next line.
const BETWEEN_LINE_X_WEIGHT: f64 = 50.0;

/// Characteristic spacing of a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingEstimate {
    /// Typical horizontal gap between adjacent words of a line.
    pub within_line: f64,
    /// Typical vertical gap between a line and the one below it.
    pub between_line: f64,
}

/// Segments `words` into text blocks.
///
/// Blank words are dropped. Every remaining word appears in exactly one line
/// of exactly one block. When no spacing can be estimated (for example a
/// single word) the result is one block holding one line with all words in
/// input order.
///
/// Fails only on invalid parameters or when the worker pool cannot be built.
pub fn get_blocks(words: &[Word], params: &DocstrumParams) -> Result<Vec<TextBlock>> {
    params.validate()?;

    let words: Vec<Word> = words.iter().filter(|w| !w.is_blank()).cloned().collect();
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let pool = params.parallelism.build_pool()?;
    let pool = pool.as_ref();

    let Some(spacing) = estimate_spacing(&words, params, pool) else {
        debug!(words = words.len(), "no spacing estimate, returning a single block");
        return Ok(TextLine::new(words)
            .and_then(|line| TextBlock::new(vec![line]))
            .into_iter()
            .collect());
    };

    let max_within_line = (3.0 * spacing.within_line).min(SQRT_2 * spacing.between_line);
    let max_between_line = params.between_line_multiplier * spacing.between_line;
    debug!(
        within_line = spacing.within_line,
        between_line = spacing.between_line,
        max_within_line,
        max_between_line,
        "estimated page spacing"
    );

    let lines = get_lines(words, max_within_line, params.within_line_bounds, pool);
    debug!(lines = lines.len(), "grouped words into lines");

    let blocks = get_structural_blocks(lines, max_between_line, pool);
    debug!(blocks = blocks.len(), "grouped lines into blocks");

    let merged = merge_intersecting_blocks(blocks, params.within_line_bounds, pool);
    debug!(blocks = merged.len(), "merged intersecting blocks");

    Ok(merged)
}

/// Estimates within-line and between-line spacing from nearest neighbours.
///
/// For every word, the two nearest bottom-left corners to its bottom-right
/// corner (x difference down-weighted) are within-line candidates, and the
/// two nearest top-left corners to its bottom-left corner (x difference
/// up-weighted) are between-line candidates. Candidates outside the angle
/// bounds are discarded and the rest are summarised by [`histogram_mode`].
///
/// Returns `None` when either set of samples is empty.
pub fn estimate_spacing(
    words: &[Word],
    params: &DocstrumParams,
    pool: Option<&ThreadPool>,
) -> Option<SpacingEstimate> {
    let by_bottom_left = SpatialIndex::build(words, |w| w.bbox.bottom_left());
    let by_top_left = SpatialIndex::build(words, |w| w.bbox.top_left());
    let within_metric = WeightedEuclidean::new(WITHIN_LINE_X_WEIGHT, 1.0);
    let between_metric = WeightedEuclidean::new(BETWEEN_LINE_X_WEIGHT, 1.0);

    type Samples = SmallVec<[f64; K_NEIGHBORS]>;
    let samples: Vec<(Samples, Samples)> = in_pool(pool, || {
        words
            .par_iter()
            .enumerate()
            .map(|(i, word)| {
                let bottom_right = word.bbox.bottom_right();
                let within = by_bottom_left
                    .nearest_neighbours(i, &bottom_right, K_NEIGHBORS, &within_metric)
                    .into_iter()
                    .map(|n| words[n.index].bbox.bottom_left())
                    .filter(|&bl| params.within_line_bounds.contains(angle(bottom_right, bl)))
                    .map(|bl| horizontal(bottom_right, bl).abs())
                    .collect();

                let bottom_left = word.bbox.bottom_left();
                let centroid = word.bbox.centroid();
                let between = by_top_left
                    .nearest_neighbours(i, &bottom_left, K_NEIGHBORS, &between_metric)
                    .into_iter()
                    .map(|n| &words[n.index].bbox)
                    .filter(|b| params.between_line_bounds.contains(angle(centroid, b.centroid())))
                    .map(|b| vertical(bottom_left, b.top_left()).abs())
                    .collect();

                (within, between)
            })
            .collect()
    });

    let within_line = histogram_mode(samples.iter().flat_map(|(w, _)| w.iter().copied()));
    let between_line = histogram_mode(samples.iter().flat_map(|(_, b)| b.iter().copied()));
    trace!(?within_line, ?between_line, samples = samples.len(), "spacing histograms");

    Some(SpacingEstimate {
        within_line: within_line?,
        between_line: between_line?,
    })
}

/// Joins a word's trailing bottom corner to the next word's leading one.
struct WordsToLines {
    max_distance: f64,
    within_line_bounds: AngleBounds,
}

impl ClusteringStrategy<Word> for WordsToLines {
    type Anchor = Point;
    type Metric = Euclidean;

    fn metric(&self) -> &Euclidean {
        &Euclidean
    }

    fn max_distance(&self, _pivot: &Word) -> f64 {
        self.max_distance
    }

    fn pivot_anchor(&self, item: &Word) -> Point {
        item.bbox.bottom_right()
    }

    fn candidate_anchor(&self, item: &Word) -> Point {
        item.bbox.bottom_left()
    }

    fn accept(&self, pivot: &Word, candidate: &Word) -> bool {
        self.within_line_bounds
            .contains(angle(pivot.bbox.bottom_right(), candidate.bbox.bottom_left()))
    }
}

/// Joins a line's bottom edge to the top edge of a horizontally overlapping line.
struct LinesToBlocks {
    max_distance: f64,
}

impl ClusteringStrategy<TextLine> for LinesToBlocks {
    type Anchor = LineSegment;
    type Metric = OverlapMidpoint;

    fn metric(&self) -> &OverlapMidpoint {
        &OverlapMidpoint
    }

    fn max_distance(&self, _pivot: &TextLine) -> f64 {
        self.max_distance
    }

    fn pivot_anchor(&self, item: &TextLine) -> LineSegment {
        let b = item.bbox();
        LineSegment::new(b.bottom_left(), b.bottom_right())
    }

    fn candidate_anchor(&self, item: &TextLine) -> LineSegment {
        let b = item.bbox();
        LineSegment::new(b.top_left(), b.top_right())
    }
}

/// Moves the items at each group's indices out of `items`.
fn take_groups<T>(items: Vec<T>, groups: Vec<Vec<usize>>) -> impl Iterator<Item = Vec<T>> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    groups
        .into_iter()
        .map(move |group| group.into_iter().filter_map(|i| slots[i].take()).collect())
}

/// Groups words into text lines ordered for reading.
///
/// `max_distance` bounds the gap between consecutive words; pass
/// `f64::INFINITY` to rely on the angle gate alone.
pub fn get_lines(
    words: Vec<Word>,
    max_distance: f64,
    within_line_bounds: AngleBounds,
    pool: Option<&ThreadPool>,
) -> Vec<TextLine> {
    let strategy = WordsToLines {
        max_distance,
        within_line_bounds,
    };
    let groups = cluster_nearest_neighbours(&words, K_NEIGHBORS, &strategy, pool);
    take_groups(words, groups)
        .filter_map(TextLine::in_reading_order)
        .collect()
}

/// Groups text lines into blocks.
pub fn get_structural_blocks(
    lines: Vec<TextLine>,
    max_distance: f64,
    pool: Option<&ThreadPool>,
) -> Vec<TextBlock> {
    let strategy = LinesToBlocks { max_distance };
    let groups = cluster_nearest_neighbours(&lines, K_NEIGHBORS, &strategy, pool);
    take_groups(lines, groups).filter_map(TextBlock::new).collect()
}

/// Rebuilds a block's lines from its words with no distance bound.
///
/// A non-empty block always rebuilds into at least one line; the original
/// block is returned unchanged otherwise.
fn rebuild_block(
    block: TextBlock,
    within_line_bounds: AngleBounds,
    pool: Option<&ThreadPool>,
    order_by_baseline: bool,
) -> TextBlock {
    let words: Vec<Word> = block.words().cloned().collect();
    let mut lines = get_lines(words, f64::INFINITY, within_line_bounds, pool);
    if order_by_baseline {
        lines.sort_by(|a, b| b.bbox().bottom.total_cmp(&a.bbox().bottom));
    }
    TextBlock::new(lines).unwrap_or(block)
}

/// Merges blocks until no two surviving blocks have intersecting boxes.
///
/// Each block's lines are rebuilt once from its words before it is compared.
/// A merged block has its lines rebuilt from the union of words and sorted by
/// descending baseline; blocks that never merge keep the line order the
/// rebuild discovered.
pub fn merge_intersecting_blocks(
    blocks: Vec<TextBlock>,
    within_line_bounds: AngleBounds,
    pool: Option<&ThreadPool>,
) -> Vec<TextBlock> {
    let mut slots: Vec<Option<TextBlock>> = blocks.into_iter().map(Some).collect();
    let mut rebuilt = vec![false; slots.len()];

    loop {
        let mut merged_any = false;

        for b in 0..slots.len() {
            let Some(mut block) = slots[b].take() else {
                continue;
            };
            if !rebuilt[b] {
                rebuilt[b] = true;
                block = rebuild_block(block, within_line_bounds, pool, false);
            }

            let mut c = 0;
            while c < slots.len() {
                let intersects = slots[c]
                    .as_ref()
                    .is_some_and(|other| block.bbox().intersects_with(&other.bbox()));
                let other = if intersects { slots[c].take() } else { None };
                let Some(other) = other else {
                    c += 1;
                    continue;
                };
                trace!(into = b, from = c, "merging intersecting blocks");

                block = rebuild_block(block.merged(other), within_line_bounds, pool, true);
                merged_any = true;
                // The box grew; rescan every surviving block.
                c = 0;
            }

            slots[b] = Some(block);
        }

        if !merged_any {
            break;
        }
    }

    slots.into_iter().flatten().collect()
}
