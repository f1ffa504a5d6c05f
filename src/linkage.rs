use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use ndarray::{Array2, ArrayView1};

use crate::disjoint_sets::DisjointSets;
use crate::ClusterError;

/// Final flat partition of the points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clustering {
    /// Cluster index per point, 0-based, numbered in discovery order.
    pub labels: Vec<usize>,
    /// Member count per cluster; sums to the number of points.
    pub sizes: Vec<usize>,
}

/// Two distinct points and the squared distance between them.
///
/// Ordered by ascending distance so a `BinaryHeap` pops the closest pair
/// first. Equal-distance pairs compare equal; which of them surfaces first
/// is left to the heap.
#[derive(Debug, Clone, Copy)]
struct PointPair {
    i: usize,
    j: usize,
    distance: f32,
}

impl Ord for PointPair {
    fn cmp(&self, other: &Self) -> Ordering {
        other.distance.total_cmp(&self.distance)
    }
}

impl PartialOrd for PointPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PointPair {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PointPair {}

/// Squared Euclidean distance between two attribute rows.
///
/// The square root is skipped on purpose: it does not change the relative
/// order of distances, and only the order drives merging.
fn squared_distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

/// Builds the min-queue of every i<j point pair with its squared distance.
fn all_pairs(data: &Array2<f32>) -> BinaryHeap<PointPair> {
    let n = data.nrows();
    let mut pairs = BinaryHeap::with_capacity(n * (n - 1) / 2);

    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push(PointPair {
                i,
                j,
                distance: squared_distance(data.row(i), data.row(j)),
            });
        }
    }

    pairs
}

/// Pops pairs in ascending distance order, merging until `target` sets remain.
///
/// A popped pair whose endpoints already share a component is discarded
/// without touching the count; that merge already happened transitively.
/// Returns the distances at which the successful merges occurred.
fn merge_until(
    pairs: &mut BinaryHeap<PointPair>,
    sets: &mut DisjointSets,
    target: usize,
) -> Result<Vec<f32>, ClusterError> {
    let mut merged_at = Vec::with_capacity(sets.set_count().saturating_sub(target));

    while sets.set_count() > target {
        let pair = pairs.pop().ok_or(ClusterError::PairQueueExhausted {
            remaining: sets.set_count(),
            target,
        })?;

        if sets.union(pair.i, pair.j) {
            merged_at.push(pair.distance);
        }
    }

    Ok(merged_at)
}

/// Numbers the surviving components in first-seen order and counts members.
fn report(sets: &mut DisjointSets) -> Clustering {
    let n = sets.len();
    let mut cluster_of_root: HashMap<usize, usize> = HashMap::new();
    let mut labels = Vec::with_capacity(n);
    let mut sizes: Vec<usize> = Vec::new();

    for point in 0..n {
        let root = sets.find(point);
        let next = cluster_of_root.len();
        let label = *cluster_of_root.entry(root).or_insert(next);
        if label == sizes.len() {
            sizes.push(0);
        }
        sizes[label] += 1;
        labels.push(label);
    }

    Clustering { labels, sizes }
}

/// Single-linkage agglomerative clustering down to exactly `k` clusters.
///
/// Points are the rows of `data`. Fails before any pair is generated when
/// the input is empty or `k` is outside `1..=nrows`.
pub fn single_linkage(data: &Array2<f32>, k: usize) -> Result<Clustering, ClusterError> {
    let n = data.nrows();

    if n == 0 {
        return Err(ClusterError::EmptyInput);
    }
    if k == 0 || k > n {
        return Err(ClusterError::InvalidClusterCount { k, n });
    }

    let mut pairs = all_pairs(data);
    let mut sets = DisjointSets::new(n);
    merge_until(&mut pairs, &mut sets, k)?;

    Ok(report(&mut sets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn two_far_pairs() -> Array2<f32> {
        array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]
    }

    #[test]
    fn two_obvious_pairs_split_at_k2() {
        let data = two_far_pairs();
        let clustering = single_linkage(&data, 2).unwrap();
        assert_eq!(clustering.sizes, vec![2, 2]);
        assert_eq!(clustering.labels[0], clustering.labels[1]);
        assert_eq!(clustering.labels[2], clustering.labels[3]);
        assert_ne!(clustering.labels[0], clustering.labels[2]);
    }

    #[test]
    fn k_equal_to_n_performs_no_merges() {
        let data = two_far_pairs();
        let clustering = single_linkage(&data, 4).unwrap();
        assert_eq!(clustering.sizes, vec![1, 1, 1, 1]);
        assert_eq!(clustering.labels, vec![0, 1, 2, 3]);
    }

    #[test]
    fn k_one_collapses_everything() {
        let data = two_far_pairs();
        let clustering = single_linkage(&data, 1).unwrap();
        assert_eq!(clustering.sizes, vec![4]);
        assert!(clustering.labels.iter().all(|&label| label == 0));
    }

    #[test]
    fn single_point_with_k_one() {
        let data = array![[1.5, 2.5, 3.5]];
        let clustering = single_linkage(&data, 1).unwrap();
        assert_eq!(clustering.sizes, vec![1]);
    }

    #[test]
    fn k_zero_is_rejected() {
        let data = two_far_pairs();
        let err = single_linkage(&data, 0).unwrap_err();
        assert!(matches!(
            err,
            ClusterError::InvalidClusterCount { k: 0, n: 4 }
        ));
    }

    #[test]
    fn k_above_n_is_rejected() {
        let data = two_far_pairs();
        let err = single_linkage(&data, 5).unwrap_err();
        assert!(matches!(
            err,
            ClusterError::InvalidClusterCount { k: 5, n: 4 }
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        let data = Array2::<f32>::zeros((0, 3));
        assert!(matches!(
            single_linkage(&data, 1).unwrap_err(),
            ClusterError::EmptyInput
        ));
    }

    #[test]
    fn squared_distance_is_symmetric() {
        let data = array![[1.0, -2.0, 0.5], [3.5, 4.0, -1.0]];
        let forward = squared_distance(data.row(0), data.row(1));
        let backward = squared_distance(data.row(1), data.row(0));
        assert_abs_diff_eq!(forward, backward);
        assert_abs_diff_eq!(forward, 44.5);
    }

    #[test]
    fn heap_pops_closest_pair_first() {
        let data = array![[0.0], [5.0], [5.5]];
        let mut pairs = all_pairs(&data);
        let closest = pairs.pop().unwrap();
        assert_eq!((closest.i, closest.j), (1, 2));
    }

    #[test]
    fn successful_merge_distances_never_decrease() {
        let data = array![
            [0.0, 0.0],
            [0.0, 2.0],
            [3.0, 0.0],
            [9.0, 9.0],
            [9.5, 9.0],
            [20.0, 0.0]
        ];
        let mut pairs = all_pairs(&data);
        let mut sets = DisjointSets::new(data.nrows());
        let merged_at = merge_until(&mut pairs, &mut sets, 1).unwrap();
        assert_eq!(sets.set_count(), 1);
        assert_eq!(merged_at.len(), data.nrows() - 1);
        assert!(merged_at.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn exhausted_queue_above_target_errors() {
        let mut pairs = BinaryHeap::new();
        let mut sets = DisjointSets::new(3);
        let err = merge_until(&mut pairs, &mut sets, 1).unwrap_err();
        assert!(matches!(
            err,
            ClusterError::PairQueueExhausted {
                remaining: 3,
                target: 1
            }
        ));
    }

    #[test]
    fn random_points_always_partition_cleanly() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 40;
        let flat: Vec<f32> = (0..n * 3).map(|_| rng.gen_range(-50.0f32..50.0)).collect();
        let data = Array2::from_shape_vec((n, 3), flat).unwrap();

        for k in [1, 2, 7, n] {
            let clustering = single_linkage(&data, k).unwrap();
            assert_eq!(clustering.sizes.len(), k);
            assert_eq!(clustering.sizes.iter().sum::<usize>(), n);
            assert_eq!(clustering.labels.len(), n);
            assert!(clustering.labels.iter().all(|&label| label < k));
            assert!(clustering.sizes.iter().all(|&size| size > 0));
        }
    }
}
