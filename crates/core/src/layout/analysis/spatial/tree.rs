//! Spatial tree data structure.
//!
//! Binary space partition tree for k-nearest-neighbour queries. Nodes live
//! in a single arena and refer to each other by index; leaves refer to a
//! contiguous range of a shared permutation of item indices, so building
//! the tree allocates nothing per node.

use std::collections::BinaryHeap;

use crate::utils::BoundingBox;

use super::distance::Metric;
use super::types::{Anchor, CandidateEntry, Neighbor};

/// Leaf threshold for spatial tree nodes
const LEAF_THRESHOLD: usize = 8;

/// Node in the spatial binary tree.
///
/// Internal nodes have left/right children; leaf nodes own `start..end` of
/// the index permutation.
#[derive(Clone, Debug)]
pub struct SpatialNode {
    pub bounds: BoundingBox,
    pub start: usize,
    pub end: usize,
    pub left_child: Option<usize>,
    pub right_child: Option<usize>,
}

impl SpatialNode {
    /// Check if this is a leaf node
    pub const fn is_leaf(&self) -> bool {
        self.left_child.is_none()
    }

    /// Get element count in this subtree
    pub const fn element_count(&self) -> usize {
        self.end - self.start
    }
}

/// Immutable nearest-neighbour index over item anchors.
///
/// Built once, then queried concurrently from any number of threads.
#[derive(Clone, Debug)]
pub struct SpatialIndex<A> {
    anchors: Vec<A>,
    order: Vec<usize>,
    nodes: Vec<SpatialNode>,
    root: Option<usize>,
}

impl<A: Anchor> SpatialIndex<A> {
    /// Build an index over `items`, locating each one with `project`.
    ///
    /// Query results refer to items by their position in `items`.
    pub fn build<T>(items: &[T], project: impl Fn(&T) -> A) -> Self {
        Self::from_anchors(items.iter().map(project).collect())
    }

    /// Build an index directly from anchors.
    pub fn from_anchors(anchors: Vec<A>) -> Self {
        let mut order: Vec<usize> = (0..anchors.len()).collect();
        let mut nodes = Vec::with_capacity(2 * anchors.len().div_ceil(LEAF_THRESHOLD));
        let root =
            (!anchors.is_empty()).then(|| Self::build_range(&anchors, &mut order, 0, &mut nodes));
        Self {
            anchors,
            order,
            nodes,
            root,
        }
    }

    fn build_range(
        anchors: &[A],
        order: &mut [usize],
        offset: usize,
        nodes: &mut Vec<SpatialNode>,
    ) -> usize {
        let bounds = order[1..]
            .iter()
            .fold(anchors[order[0]].bounds(), |acc, &i| {
                acc.union(&anchors[i].bounds())
            });

        let node_idx = nodes.len();
        nodes.push(SpatialNode {
            bounds,
            start: offset,
            end: offset + order.len(),
            left_child: None,
            right_child: None,
        });

        if order.len() <= LEAF_THRESHOLD {
            return node_idx;
        }

        // Partition around the median centre along the longer axis
        let mid = order.len() / 2;
        if bounds.width() >= bounds.height() {
            order.select_nth_unstable_by(mid, |&a, &b| {
                let ca = anchors[a].bounds().centroid().x;
                let cb = anchors[b].bounds().centroid().x;
                ca.total_cmp(&cb).then(a.cmp(&b))
            });
        } else {
            order.select_nth_unstable_by(mid, |&a, &b| {
                let ca = anchors[a].bounds().centroid().y;
                let cb = anchors[b].bounds().centroid().y;
                ca.total_cmp(&cb).then(a.cmp(&b))
            });
        }

        let (left, right) = order.split_at_mut(mid);
        let left_idx = Self::build_range(anchors, left, offset, nodes);
        let right_idx = Self::build_range(anchors, right, offset + mid, nodes);

        nodes[node_idx].left_child = Some(left_idx);
        nodes[node_idx].right_child = Some(right_idx);
        node_idx
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn nodes(&self) -> &[SpatialNode] {
        &self.nodes
    }

    /// The `k` items nearest to `query`, excluding item `query_index`.
    ///
    /// Results are in ascending distance, ties broken by ascending index.
    /// Items at a non-finite distance are never returned.
    pub fn nearest_neighbours<M: Metric<A>>(
        &self,
        query_index: usize,
        query: &A,
        k: usize,
        metric: &M,
    ) -> Vec<Neighbor> {
        self.search(Some(query_index), query, k, metric)
    }

    /// The `k` items nearest to an arbitrary query anchor.
    pub fn nearest<M: Metric<A>>(&self, query: &A, k: usize, metric: &M) -> Vec<Neighbor> {
        self.search(None, query, k, metric)
    }

    fn search<M: Metric<A>>(
        &self,
        exclude: Option<usize>,
        query: &A,
        k: usize,
        metric: &M,
    ) -> Vec<Neighbor> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let mut best: BinaryHeap<CandidateEntry> = BinaryHeap::with_capacity(k + 1);
        let root_bound = metric.lower_bound(query, &self.nodes[root].bounds);
        let mut stack: Vec<(usize, f64)> = vec![(root, root_bound)];

        while let Some((node_idx, lower_bound)) = stack.pop() {
            if Self::prunable(lower_bound, &best, k) {
                continue;
            }
            let node = &self.nodes[node_idx];
            match (node.left_child, node.right_child) {
                (Some(l), Some(r)) => {
                    let lb_l = metric.lower_bound(query, &self.nodes[l].bounds);
                    let lb_r = metric.lower_bound(query, &self.nodes[r].bounds);
                    // Nearer child on top of the stack
                    if lb_l <= lb_r {
                        stack.push((r, lb_r));
                        stack.push((l, lb_l));
                    } else {
                        stack.push((l, lb_l));
                        stack.push((r, lb_r));
                    }
                }
                _ => {
                    for &i in &self.order[node.start..node.end] {
                        if exclude == Some(i) {
                            continue;
                        }
                        let d = metric.distance(query, &self.anchors[i]);
                        if !d.is_finite() {
                            continue;
                        }
                        let entry = CandidateEntry::new(d, i);
                        if best.len() < k {
                            best.push(entry);
                        } else if best.peek().is_some_and(|worst| entry < *worst) {
                            best.pop();
                            best.push(entry);
                        }
                    }
                }
            }
        }

        best.into_sorted_vec().into_iter().map(Neighbor::from).collect()
    }

    /// A node can be skipped when nothing in it can be joined or beat the
    /// current k-th best. NaN bounds never prune.
    fn prunable(lower_bound: f64, best: &BinaryHeap<CandidateEntry>, k: usize) -> bool {
        if lower_bound == f64::INFINITY {
            return true;
        }
        best.len() == k && best.peek().is_some_and(|worst| lower_bound > worst.dist.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::analysis::spatial::distance::{Euclidean, WeightedEuclidean};
    use crate::utils::Point;

    fn grid(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let x = ((i * 37) % 101) as f64 * 1.5;
                let y = ((i * 53) % 97) as f64 * 0.75;
                Point::new(x, y)
            })
            .collect()
    }

    fn brute_force<M: Metric<Point>>(
        points: &[Point],
        query_index: usize,
        k: usize,
        metric: &M,
    ) -> Vec<(usize, f64)> {
        let query = points[query_index];
        let mut all: Vec<(usize, f64)> = points
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != query_index)
            .map(|(i, p)| (i, metric.distance(&query, p)))
            .collect();
        all.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        all.truncate(k);
        all
    }

    #[test]
    fn empty_index_returns_nothing() {
        let index = SpatialIndex::<Point>::from_anchors(Vec::new());
        assert!(index.is_empty());
        assert!(index.nearest(&Point::new(0.0, 0.0), 3, &Euclidean).is_empty());
    }

    #[test]
    fn excludes_query_item() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(5.0, 0.0)];
        let index = SpatialIndex::from_anchors(points.clone());
        let result = index.nearest_neighbours(0, &points[0], 2, &Euclidean);
        let ids: Vec<usize> = result.iter().map(|n| n.index).collect();
        assert_eq!(ids, [1, 2]);
        assert_eq!(result[0].distance, 1.0);
    }

    #[test]
    fn fewer_items_than_k() {
        let points = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        let index = SpatialIndex::from_anchors(points.clone());
        let result = index.nearest_neighbours(0, &points[0], 5, &Euclidean);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].index, 1);
        assert!((result[0].distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn ties_resolve_to_lower_index() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(-1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        let index = SpatialIndex::from_anchors(points.clone());
        let ids: Vec<usize> = index
            .nearest_neighbours(0, &points[0], 2, &Euclidean)
            .iter()
            .map(|n| n.index)
            .collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn matches_brute_force() {
        let points = grid(300);
        let index = SpatialIndex::build(&points, |p| *p);
        assert!(index.nodes().len() > 1);
        let weighted = WeightedEuclidean::new(0.5, 1.0);
        for q in [0, 17, 150, 299] {
            for k in [1, 2, 7] {
                let got: Vec<(usize, f64)> = index
                    .nearest_neighbours(q, &points[q], k, &Euclidean)
                    .iter()
                    .map(|n| (n.index, n.distance))
                    .collect();
                assert_eq!(got, brute_force(&points, q, k, &Euclidean));

                let got: Vec<(usize, f64)> = index
                    .nearest_neighbours(q, &points[q], k, &weighted)
                    .iter()
                    .map(|n| (n.index, n.distance))
                    .collect();
                assert_eq!(got, brute_force(&points, q, k, &weighted));
            }
        }
    }

    #[test]
    fn query_anchor_may_differ_from_stored_anchor() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 0.0)];
        let index = SpatialIndex::from_anchors(points);
        let result = index.nearest_neighbours(0, &Point::new(19.0, 0.0), 1, &Euclidean);
        assert_eq!(result[0].index, 2);
    }

    #[test]
    fn leaves_partition_items() {
        let points = grid(100);
        let index = SpatialIndex::from_anchors(points);
        let total: usize = index
            .nodes()
            .iter()
            .filter(|n| n.is_leaf())
            .map(SpatialNode::element_count)
            .sum();
        assert_eq!(total, 100);
    }
}
