//! Corpus-size bands for the downstream density clusterer.

use serde::Serialize;

/// Hyperparameters handed to the topic-clustering service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ClusterParams {
    pub min_cluster_size: usize,
    pub min_samples: usize,
}

/// Lower bound of each band is inclusive: <1000, 1000..5000, >=5000.
pub fn select_params(corpus_size: usize) -> ClusterParams {
    let (min_cluster_size, min_samples) = match corpus_size {
        0..=999 => (5, 2),
        1000..=4999 => (8, 3),
        _ => (15, 5),
    };
    ClusterParams { min_cluster_size, min_samples }
}
