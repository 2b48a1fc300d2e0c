//! Density-based story clustering over cosine distance.
//!
//! Groups near-duplicate reports of the same story: every vector is
//! L2-normalized, two articles are neighbors when their cosine distance
//! (`1 − dot`) is at most `eps`, and clusters grow by chaining core points
//! (points with at least `min_samples` neighbors, themselves included).
//! Vectors that join no chain get the noise label [`NOISE_CLUSTER_ID`].

use std::collections::VecDeque;

use newsdesk_core::NOISE_CLUSTER_ID;

use crate::error::EnrichError;

/// Label for points not yet visited by the scan.
const UNCLASSIFIED: i32 = -2;

/// Clustering parameters.
///
/// `min_samples` counts the point itself: with the default of 2, a pair of
/// mutually-close articles already forms a story cluster.
#[derive(Debug, Clone, Copy)]
pub struct ClusterConfig {
    /// Maximum cosine distance for two articles to be neighbors.
    pub eps: f32,
    /// Minimum neighborhood size (self included) for a core point.
    pub min_samples: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            eps: 0.3,
            min_samples: 2,
        }
    }
}

impl ClusterConfig {
    #[must_use]
    pub fn from_app_config(config: &newsdesk_core::AppConfig) -> Self {
        Self {
            eps: config.cluster_eps,
            min_samples: config.cluster_min_samples,
        }
    }
}

/// Assign a cluster id to every embedding vector.
///
/// Returns one label per input vector, in input order: a non-negative cluster
/// id shared by all vectors judged to report the same story, or
/// [`NOISE_CLUSTER_ID`] for vectors that joined no group. Ids are assigned
/// `0, 1, 2…` in order of the first core point encountered, so re-running on
/// the same input yields the same partition.
///
/// Empty input yields an empty output.
///
/// # Errors
///
/// - [`EnrichError::InvalidConfig`] if `eps` is not a positive finite number
///   or `min_samples < 1`.
/// - [`EnrichError::InvalidInput`] if the vectors do not all share one
///   dimensionality.
pub fn cluster_embeddings(
    vectors: &[Vec<f32>],
    config: &ClusterConfig,
) -> Result<Vec<i32>, EnrichError> {
    if !(config.eps.is_finite() && config.eps > 0.0) {
        return Err(EnrichError::InvalidConfig(format!(
            "eps must be a positive finite number, got {}",
            config.eps
        )));
    }
    if config.min_samples < 1 {
        return Err(EnrichError::InvalidConfig(
            "min_samples must be at least 1".to_string(),
        ));
    }

    if vectors.is_empty() {
        return Ok(Vec::new());
    }

    let dim = vectors[0].len();
    for (i, v) in vectors.iter().enumerate() {
        if v.len() != dim {
            return Err(EnrichError::InvalidInput(format!(
                "vector {i} has dimension {}, expected {dim}",
                v.len()
            )));
        }
    }

    let units = normalize_all(vectors);
    let n = units.len();

    let mut labels = vec![UNCLASSIFIED; n];
    let mut next_cluster: i32 = 0;

    // Quadratic neighbor scan; enrichment batches are a few hundred articles.
    for point in 0..n {
        if labels[point] != UNCLASSIFIED {
            continue;
        }

        let neighbors = region_query(&units, point, config.eps);
        if neighbors.len() < config.min_samples {
            labels[point] = NOISE_CLUSTER_ID;
            continue;
        }

        labels[point] = next_cluster;
        let mut queue: VecDeque<usize> = neighbors.into_iter().filter(|&j| j != point).collect();

        while let Some(candidate) = queue.pop_front() {
            if labels[candidate] == NOISE_CLUSTER_ID {
                // Border point: density-reachable but not core.
                labels[candidate] = next_cluster;
                continue;
            }
            if labels[candidate] != UNCLASSIFIED {
                continue;
            }
            labels[candidate] = next_cluster;

            let candidate_neighbors = region_query(&units, candidate, config.eps);
            if candidate_neighbors.len() >= config.min_samples {
                queue.extend(candidate_neighbors);
            }
        }

        next_cluster += 1;
    }

    Ok(labels)
}

/// L2-normalize every vector. Zero-norm vectors stay as-is: their dot product
/// with everything is 0, so their cosine distance is 1 and they end up noise.
fn normalize_all(vectors: &[Vec<f32>]) -> Vec<Vec<f32>> {
    vectors
        .iter()
        .map(|v| {
            let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                v.iter().map(|x| x / norm).collect()
            } else {
                v.clone()
            }
        })
        .collect()
}

/// Indices (ascending, including `point` itself) within `eps` cosine distance.
fn region_query(units: &[Vec<f32>], point: usize, eps: f32) -> Vec<usize> {
    let origin = &units[point];
    units
        .iter()
        .enumerate()
        .filter(|(_, other)| cosine_distance(origin, other) <= eps)
        .map(|(j, _)| j)
        .collect()
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    1.0 - dot
}
