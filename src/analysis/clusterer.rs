//! Font size clustering into heading level thresholds.
//!
//! Sizes are grouped with an exact one-dimensional k-means: the optimal
//! partition of the sorted distinct sizes (weighted by how often each size
//! occurs) is found by dynamic programming, so the result does not depend on
//! the order fragments were read in.

use serde::Serialize;

/// Maximum number of size clusters, one per heading level.
const MAX_CLUSTERS: usize = 3;

/// Representative font sizes for each heading level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdSet {
    pub h1: f32,
    pub h2: f32,
    pub h3: f32,
}

impl ThresholdSet {
    /// Create a threshold set.
    pub fn new(h1: f32, h2: f32, h3: f32) -> Self {
        Self { h1, h2, h3 }
    }
}

/// Distinct size with its multiplicity.
#[derive(Debug, Clone, Copy)]
struct WeightedSize {
    value: f64,
    weight: f64,
}

/// Cluster the document's font sizes into level thresholds.
///
/// `fallback` is used when `sizes` holds no finite value.
pub fn cluster_font_sizes(sizes: &[f32], fallback: &[f32]) -> ThresholdSet {
    let mut distinct = distinct_sizes(sizes);
    if distinct.is_empty() {
        distinct = distinct_sizes(fallback);
    }

    match distinct.len() {
        0 => ThresholdSet::new(0.0, 0.0, 0.0),
        1 => {
            let size = distinct[0].value as f32;
            ThresholdSet::new(size, size, size)
        }
        n => {
            let k = n.min(MAX_CLUSTERS);
            let mut centroids = optimal_centroids(&distinct, k);
            centroids.sort_by(|a, b| b.total_cmp(a));

            let lowest = centroids[centroids.len() - 1];
            ThresholdSet::new(
                centroids[0],
                centroids.get(1).copied().unwrap_or(lowest),
                centroids.get(2).copied().unwrap_or(lowest),
            )
        }
    }
}

/// Sorted distinct finite sizes with their counts.
fn distinct_sizes(sizes: &[f32]) -> Vec<WeightedSize> {
    let mut sorted: Vec<f32> = sizes.iter().copied().filter(|s| s.is_finite()).collect();
    sorted.sort_by(f32::total_cmp);

    let mut distinct: Vec<WeightedSize> = Vec::new();
    for size in sorted {
        match distinct.last_mut() {
            Some(last) if last.value == size as f64 => last.weight += 1.0,
            _ => distinct.push(WeightedSize {
                value: size as f64,
                weight: 1.0,
            }),
        }
    }
    distinct
}

/// Prefix sums for O(1) within-cluster cost queries.
struct PrefixSums {
    weight: Vec<f64>,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl PrefixSums {
    fn new(values: &[WeightedSize]) -> Self {
        let mut weight = vec![0.0; values.len() + 1];
        let mut sum = vec![0.0; values.len() + 1];
        let mut sum_sq = vec![0.0; values.len() + 1];
        for (i, v) in values.iter().enumerate() {
            weight[i + 1] = weight[i] + v.weight;
            sum[i + 1] = sum[i] + v.weight * v.value;
            sum_sq[i + 1] = sum_sq[i] + v.weight * v.value * v.value;
        }
        Self {
            weight,
            sum,
            sum_sq,
        }
    }

    /// Weighted sum of squared deviations of `values[start..end]`.
    fn cost(&self, start: usize, end: usize) -> f64 {
        let w = self.weight[end] - self.weight[start];
        if w <= 0.0 {
            return 0.0;
        }
        let s = self.sum[end] - self.sum[start];
        let sq = self.sum_sq[end] - self.sum_sq[start];
        (sq - s * s / w).max(0.0)
    }

    /// Weighted mean of `values[start..end]`.
    fn mean(&self, start: usize, end: usize) -> f64 {
        (self.sum[end] - self.sum[start]) / (self.weight[end] - self.weight[start])
    }
}

/// Centroids of the optimal `k`-partition, in ascending order.
///
/// Requires `1 <= k <= values.len()`.
fn optimal_centroids(values: &[WeightedSize], k: usize) -> Vec<f32> {
    let n = values.len();
    let sums = PrefixSums::new(values);

    // cost[c][j]: best cost of splitting the first j values into c + 1 clusters.
    // split[c][j]: start index of the last cluster in that split.
    let mut cost = vec![vec![f64::INFINITY; n + 1]; k];
    let mut split = vec![vec![0usize; n + 1]; k];

    for j in 1..=n {
        cost[0][j] = sums.cost(0, j);
    }

    for c in 1..k {
        for j in (c + 1)..=n {
            for start in c..j {
                let candidate = cost[c - 1][start] + sums.cost(start, j);
                // Strict comparison keeps the earliest split on ties.
                if candidate < cost[c][j] {
                    cost[c][j] = candidate;
                    split[c][j] = start;
                }
            }
        }
    }

    let mut centroids = Vec::with_capacity(k);
    let mut end = n;
    for c in (0..k).rev() {
        let start = if c == 0 { 0 } else { split[c][end] };
        centroids.push(sums.mean(start, end) as f32);
        end = start;
    }
    centroids.reverse();
    centroids
}
