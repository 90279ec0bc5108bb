//! Resolution and enrichment of clusters and node groups
//!
//! This layer turns backing resources into the normalized aggregates the API
//! serves. Single-item resolvers fail loudly; list resolvers skip items that
//! fail validation or enrichment and hand the skip records back to the caller,
//! which decides what to report. Resolution is stateless and sequential, every
//! call re-reads the store.

pub mod cluster;
pub mod infrastructure;
pub mod node_group;

use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;

use crate::error::ClientError;

pub use cluster::{get_cluster, list_clusters};
pub use infrastructure::resolve_node_infrastructure;
pub use node_group::{get_node_group, list_node_groups};

/// Control plane descriptor of a cluster
#[derive(Clone, Debug, PartialEq)]
pub struct ControlPlane {
    /// Provider label derived from the control-plane kind
    pub provider: String,
}

/// Infrastructure descriptor of a cluster
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterInfrastructure {
    /// Provider label derived from the infrastructure kind
    pub provider: String,
}

/// Normalized view of a cluster
///
/// Built per request from the backing resource; never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    /// Cluster name
    pub name: String,
    /// Full API server URL
    pub api_endpoint: String,
    /// Control plane endpoint host
    pub endpoint_host: String,
    /// Control plane endpoint port
    pub endpoint_port: i32,
    /// Region label, empty when unset
    pub region: String,
    /// Environment label, empty when unset
    pub environment: String,
    /// Cluster group label, empty when unset
    pub cluster_group: String,
    /// Service network CIDR blocks
    pub service_cidrs: Vec<String>,
    /// Control plane descriptor
    pub control_plane: ControlPlane,
    /// Infrastructure descriptor
    pub infrastructure: ClusterInfrastructure,
}

/// Normalized view of a node group's machine infrastructure
#[derive(Clone, Debug, PartialEq)]
pub struct NodeInfrastructure {
    /// Provider label
    pub provider: String,
    /// Availability zones the group spans
    pub az: Vec<String>,
    /// Cloud machine type
    pub machine_type: String,
    /// Autoscaling lower bound
    pub min: Option<i32>,
    /// Autoscaling upper bound
    pub max: Option<i32>,
    /// Provider-specific spec, untyped because schemas differ per provider
    pub spec: Option<Value>,
}

/// Normalized view of a node group
#[derive(Clone, Debug, PartialEq)]
pub struct NodeGroup {
    /// Short name, without the cluster prefix
    pub name: String,
    /// Owning cluster name
    pub cluster: String,
    /// Kind of the infrastructure resource backing the group
    pub infrastructure_kind: String,
    /// Name of the infrastructure resource backing the group
    pub infrastructure_name: String,
    /// Desired replica count
    pub replicas: Option<i32>,
    /// Resolved machine infrastructure
    pub infrastructure: NodeInfrastructure,
}

/// A list item dropped during aggregation, with the error that disqualified it
#[derive(Debug)]
pub struct Skipped {
    /// Name of the dropped resource
    pub name: String,
    /// Why it was dropped
    pub error: ClientError,
}

/// Result of a list resolution
///
/// The caller owns the reporting of `skipped`; the resolvers never log.
#[derive(Debug)]
pub struct ListOutcome<T> {
    /// Items that resolved cleanly
    pub items: Vec<T>,
    /// Items that were dropped, in store order
    pub skipped: Vec<Skipped>,
}

/// Aggregate cause carrying every failure behind a list-level error
///
/// Keeps each underlying classified error reachable when probes against
/// several backing kinds (or several items) failed at once.
#[derive(Debug)]
pub(crate) struct FailureSet(pub(crate) Vec<ClientError>);

impl FailureSet {
    pub(crate) fn from_skipped(skipped: Vec<Skipped>) -> Self {
        Self(skipped.into_iter().map(|s| s.error).collect())
    }
}

impl fmt::Display for FailureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for failure in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure)?;
            first = false;
        }
        Ok(())
    }
}

impl StdError for FailureSet {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.first().map(|e| e as &(dyn StdError + 'static))
    }
}
