//! Naming conventions for cluster-scoped resources
//!
//! Every logical cluster owns one namespace, derived from its name, and node
//! group objects inside that namespace carry the cluster name as a prefix.
//! Callers of the API only ever see the short node group name.

/// Namespace prefix for cluster-owned resources
const NAMESPACE_PREFIX: &str = "kubernetes";

/// Namespace holding all resources of a cluster
///
/// Dots in cluster names (common for kops-style `cluster.example.com` names)
/// are not valid in namespace names and are replaced with dashes.
pub fn cluster_namespace(cluster_name: &str) -> String {
    format!("{}-{}", NAMESPACE_PREFIX, cluster_name.replace('.', "-"))
}

/// Full node group name as stored, with the cluster name prefix
pub fn node_group_full_name(cluster_name: &str, node_group_name: &str) -> String {
    format!("{}-{}", cluster_name, node_group_name)
}

/// Short node group name exposed by the API, without the cluster name prefix
pub fn node_group_short_name(cluster_name: &str, full_name: &str) -> String {
    full_name.replace(&format!("{}-", cluster_name), "")
}
