//! Discovery path: turn unmatched support tickets into candidate intents.
//!
//! Pipeline flow: normalize ticket text → embed → single-linkage clustering
//! over the similarity graph → nearest-canonical match per centroid →
//! verdict tiering and quality flags → report assembly.

pub mod algorithms;
pub mod keywords;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod tiering;

pub use algorithms::single_linkage::{single_linkage, Cluster, ClusterParams, ClusterResult};
pub use algorithms::similarity::cosine_similarity;
pub use matcher::CanonicalMatcher;
pub use pipeline::run_discovery;
pub use report::{DiscoveryReport, RunMetadata};
pub use tiering::ClusterSummary;
