use std::collections::HashMap;

use miner_core::config::ClusteringConfig;

use super::similarity::candidate_edges;
use super::union_find::UnionFind;

/// Parameters for a single-linkage run.
#[derive(Debug, Clone)]
pub struct ClusterParams {
    /// Pairs at or below this similarity never become candidate edges.
    pub edge_prefilter: f32,
    /// Edges below this similarity are never unioned.
    pub merge_threshold: f32,
    /// Groups smaller than this are reported as noise.
    pub min_cluster_size: usize,
}

impl From<&ClusteringConfig> for ClusterParams {
    fn from(config: &ClusteringConfig) -> Self {
        Self {
            edge_prefilter: config.edge_prefilter,
            merge_threshold: config.merge_threshold,
            min_cluster_size: config.min_cluster_size,
        }
    }
}

/// A similarity-connected group of vectors meeting the minimum size.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Sequential id within the run.
    pub id: usize,
    /// Member indices into the input slice, ascending.
    pub members: Vec<usize>,
    /// Coordinate-wise mean of the member vectors.
    pub centroid: Vec<f32>,
}

/// Result of single-linkage clustering.
#[derive(Debug, Clone)]
pub struct ClusterResult {
    pub clusters: Vec<Cluster>,
    /// Indices not belonging to any surviving cluster, ascending.
    pub noise: Vec<usize>,
}

/// Single-linkage clustering via union-find over the similarity graph.
///
/// Candidate edges above the prefilter are sorted by similarity descending
/// and unioned until the first edge below the merge threshold, which stops
/// the scan. Groups below the minimum size become noise. Deterministic for
/// fixed inputs: union is idempotent and order-independent once every edge
/// above the threshold is processed, so sort ties cannot change the final
/// partition.
///
/// Pairwise similarity is O(n^2); the caller caps input size.
pub fn single_linkage(vectors: &[Vec<f32>], params: &ClusterParams) -> ClusterResult {
    let n = vectors.len();
    if n == 0 {
        return ClusterResult {
            clusters: Vec::new(),
            noise: Vec::new(),
        };
    }

    let mut edges = candidate_edges(vectors, params.edge_prefilter);
    edges.sort_unstable_by(|x, y| {
        y.similarity
            .total_cmp(&x.similarity)
            .then_with(|| (x.a, x.b).cmp(&(y.a, y.b)))
    });

    let mut uf = UnionFind::new(n);
    for edge in &edges {
        if edge.similarity < params.merge_threshold {
            break;
        }
        uf.union(edge.a, edge.b);
    }

    // Group members by root; iterating 0..n keeps members ascending.
    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..n {
        let root = uf.find(i);
        groups.entry(root).or_default().push(i);
    }

    let mut surviving: Vec<Vec<usize>> = Vec::new();
    let mut noise: Vec<usize> = Vec::new();
    for (_, members) in groups {
        if members.len() >= params.min_cluster_size {
            surviving.push(members);
        } else {
            noise.extend(members);
        }
    }

    // Deterministic ordering: clusters by their smallest member index.
    surviving.sort_unstable_by_key(|members| members[0]);
    noise.sort_unstable();

    let clusters = surviving
        .into_iter()
        .enumerate()
        .map(|(id, members)| {
            let centroid = centroid_of(vectors, &members);
            Cluster {
                id,
                members,
                centroid,
            }
        })
        .collect();

    ClusterResult { clusters, noise }
}

/// Coordinate-wise mean of the selected vectors.
fn centroid_of(vectors: &[Vec<f32>], members: &[usize]) -> Vec<f32> {
    let dim = vectors[members[0]].len();
    let mut centroid = vec![0.0f32; dim];
    for &m in members {
        for (c, v) in centroid.iter_mut().zip(&vectors[m]) {
            *c += v;
        }
    }
    let count = members.len() as f32;
    for c in centroid.iter_mut() {
        *c /= count;
    }
    centroid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(merge_threshold: f32, min_cluster_size: usize) -> ClusterParams {
        ClusterParams {
            edge_prefilter: 0.5,
            merge_threshold,
            min_cluster_size,
        }
    }

    fn membership(result: &ClusterResult, n: usize) -> Vec<Option<usize>> {
        let mut assignment = vec![None; n];
        for cluster in &result.clusters {
            for &m in &cluster.members {
                assignment[m] = Some(cluster.id);
            }
        }
        assignment
    }

    #[test]
    fn empty_input() {
        let result = single_linkage(&[], &params(0.65, 5));
        assert!(result.clusters.is_empty());
        assert!(result.noise.is_empty());
    }

    #[test]
    fn seven_near_duplicates_and_three_outliers() {
        let mut vectors: Vec<Vec<f32>> = (0..7).map(|_| vec![1.0, 0.0, 0.0]).collect();
        vectors.push(vec![0.0, 1.0, 0.0]);
        vectors.push(vec![0.0, 0.0, 1.0]);
        vectors.push(vec![-1.0, 0.0, 0.0]);

        let result = single_linkage(&vectors, &params(0.65, 5));

        assert_eq!(result.clusters.len(), 1);
        assert_eq!(result.clusters[0].members.len(), 7);
        assert_eq!(result.clusters[0].members, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(result.noise, vec![7, 8, 9]);
    }

    #[test]
    fn groups_below_minimum_size_are_noise() {
        // Two identical pairs, min size 3: everything is noise.
        let vectors = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ];

        let result = single_linkage(&vectors, &params(0.65, 3));

        assert!(result.clusters.is_empty());
        assert_eq!(result.noise, vec![0, 1, 2, 3]);
    }

    #[test]
    fn transitive_near_duplicates_join_one_cluster() {
        // 0 and 2 are only 0.5 similar (45 + 45 degrees apart), but both
        // are 0.866 similar to 1: single linkage connects all three.
        let vectors = vec![
            vec![1.0, 0.0],
            vec![0.866, 0.5],
            vec![0.5, 0.866],
        ];

        let result = single_linkage(&vectors, &params(0.8, 2));

        assert_eq!(result.clusters.len(), 1);
        assert_eq!(result.clusters[0].members, vec![0, 1, 2]);
    }

    #[test]
    fn centroid_is_member_mean() {
        let vectors = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 0.5],
        ];

        let result = single_linkage(&vectors, &params(0.65, 2));

        assert_eq!(result.clusters.len(), 1);
        let centroid = &result.clusters[0].centroid;
        assert!((centroid[0] - 1.0).abs() < 1e-6);
        assert!((centroid[1] - 0.5 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn rerun_is_deterministic() {
        let vectors: Vec<Vec<f32>> = (0..20)
            .map(|i| {
                let angle = (i % 4) as f32 * 0.2;
                vec![angle.cos(), angle.sin()]
            })
            .collect();

        let p = params(0.65, 2);
        let first = single_linkage(&vectors, &p);
        let second = single_linkage(&vectors, &p);

        assert_eq!(membership(&first, 20), membership(&second, 20));
        assert_eq!(first.noise, second.noise);
        for (a, b) in first.clusters.iter().zip(&second.clusters) {
            assert_eq!(a.centroid, b.centroid);
        }
    }

    #[test]
    fn lowering_threshold_only_grows_clusters() {
        // 0 and 1 are identical; 2 is ~0.707 similar to both; 3 is opposite.
        let vectors = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.7071, 0.7071],
            vec![-1.0, 0.0],
        ];

        let strict = single_linkage(&vectors, &params(0.8, 2));
        let loose = single_linkage(&vectors, &params(0.65, 2));

        let strict_assign = membership(&strict, 4);
        let loose_assign = membership(&loose, 4);

        // Every pair grouped under the strict threshold stays grouped
        // under the loose one.
        for i in 0..4 {
            for j in (i + 1)..4 {
                let together_strict = strict_assign[i].is_some()
                    && strict_assign[i] == strict_assign[j];
                if together_strict {
                    assert_eq!(
                        loose_assign[i], loose_assign[j],
                        "pair ({i},{j}) split by a lower threshold"
                    );
                }
            }
        }
    }
}
