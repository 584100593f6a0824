//! Bounded nearest-neighbour clustering.
//!
//! Every eligible item (the pivot) looks up its k nearest candidates in a
//! spatial index and keeps the edges that are close enough and pass an
//! acceptance test. The connected components of the resulting graph are the
//! clusters. The same engine groups words into lines and lines into blocks;
//! what differs is the `ClusteringStrategy` passed in.

use rayon::ThreadPool;
use rayon::prelude::*;
use smallvec::SmallVec;

use super::spatial::{Anchor, Metric, SpatialIndex};

/// Geometry and filters for one clustering pass.
///
/// Implemented by small concrete types and passed by reference, so every
/// call is statically dispatched.
pub trait ClusteringStrategy<T>: Sync {
    /// Point (or segment) an item is located by.
    type Anchor: Anchor;
    /// Distance between a pivot anchor and a candidate anchor.
    type Metric: Metric<Self::Anchor> + Sync;

    fn metric(&self) -> &Self::Metric;

    /// Largest distance at which `pivot` may be joined to a candidate.
    fn max_distance(&self, pivot: &T) -> f64;

    /// Anchor used when `item` searches for neighbours.
    fn pivot_anchor(&self, item: &T) -> Self::Anchor;

    /// Anchor used when `item` is indexed as a candidate.
    fn candidate_anchor(&self, item: &T) -> Self::Anchor;

    /// Whether `item` searches for neighbours at all.
    fn is_pivot(&self, _item: &T) -> bool {
        true
    }

    /// Final check on a pivot/candidate pair that is already close enough.
    fn accept(&self, _pivot: &T, _candidate: &T) -> bool {
        true
    }
}

/// Runs `op` on `pool`, or on rayon's global pool when there is none.
pub(crate) fn in_pool<R, F>(pool: Option<&ThreadPool>, op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Groups `items` into connected components of accepted nearest-neighbour edges.
///
/// Each pivot considers its `k` nearest candidates; the edge is kept when the
/// distance is finite, within `strategy.max_distance(pivot)`, and
/// `strategy.accept` agrees. Edges are undirected.
///
/// Every item lands in exactly one group. Groups are ordered by their lowest
/// item index and list their members in ascending order, independent of how
/// the per-pivot searches were scheduled.
pub fn cluster_nearest_neighbours<T, S>(
    items: &[T],
    k: usize,
    strategy: &S,
    pool: Option<&ThreadPool>,
) -> Vec<Vec<usize>>
where
    T: Sync,
    S: ClusteringStrategy<T>,
{
    if items.is_empty() {
        return Vec::new();
    }

    let index = SpatialIndex::build(items, |item| strategy.candidate_anchor(item));
    let metric = strategy.metric();

    // One slot per pivot, so no synchronisation is needed while searching.
    let edges: Vec<SmallVec<[usize; 2]>> = in_pool(pool, || {
        items
            .par_iter()
            .enumerate()
            .map(|(i, pivot)| {
                if !strategy.is_pivot(pivot) {
                    return SmallVec::new();
                }
                let max_distance = strategy.max_distance(pivot);
                let anchor = strategy.pivot_anchor(pivot);
                index
                    .nearest_neighbours(i, &anchor, k, metric)
                    .into_iter()
                    .filter(|n| n.distance <= max_distance)
                    .filter(|n| strategy.accept(pivot, &items[n.index]))
                    .map(|n| n.index)
                    .collect()
            })
            .collect()
    });

    let mut components = DisjointSet::new(items.len());
    for (pivot, targets) in edges.iter().enumerate() {
        for &target in targets {
            components.union(pivot, target);
        }
    }
    components.groups()
}

/// Union-find over item indices with path compression and union by rank.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[i] != root {
            let next = self.parent[i];
            self.parent[i] = root;
            i = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
    }

    /// Components in order of their lowest member.
    fn groups(mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..n {
            let root = self.find(i);
            let slot = *slot_of_root[root].get_or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(i);
        }
        groups
    }
}
