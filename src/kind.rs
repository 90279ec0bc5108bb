//! Supported-kind tables
//!
//! Control-plane, cluster-infrastructure and node-infrastructure references
//! carry free-form kind strings in the backing resources. These classifiers
//! parse them into closed enums at the boundary, so every dispatch downstream
//! is over a finite, auditable set and unknown kinds are rejected in exactly
//! one place. Pure lookups, no I/O.

use crate::error::ClientError;

/// Supported control-plane kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlPlaneKind {
    /// `KubeadmControlPlane`, the upstream Cluster API control plane
    Kubeadm,
    /// `KopsControlPlane`, managed by the kops operator
    Kops,
}

impl ControlPlaneKind {
    /// Provider label exposed on the public `ControlPlane` descriptor
    pub fn provider(&self) -> &'static str {
        match self {
            ControlPlaneKind::Kubeadm => "kubeadm",
            ControlPlaneKind::Kops => "kops",
        }
    }
}

/// Supported cluster-infrastructure kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterInfrastructureKind {
    /// `DockerCluster`, the Cluster API test infrastructure
    Docker,
    /// `KopsAWSCluster`
    KopsAws,
    /// `KopsControlPlane` doubles as the infrastructure reference on
    /// kops-managed clusters
    KopsControlPlane,
}

impl ClusterInfrastructureKind {
    /// Provider label exposed on the public `ClusterInfrastructure` descriptor
    pub fn provider(&self) -> &'static str {
        match self {
            ClusterInfrastructureKind::Docker => "docker",
            ClusterInfrastructureKind::KopsAws | ClusterInfrastructureKind::KopsControlPlane => {
                "kops"
            }
        }
    }
}

/// Supported node-infrastructure kinds
///
/// The Docker kinds are placeholders resolved to a static descriptor; the
/// Docker machine APIs break too often upstream to be worth fetching.
/// `KopsMachinePool` is the production kind and requires a secondary fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeInfrastructureKind {
    /// `DockerCluster` placeholder
    DockerCluster,
    /// `DockerMachineTemplate` placeholder
    DockerMachineTemplate,
    /// `KopsMachinePool`, backed by a real resource in the cluster namespace
    KopsMachinePool,
}

/// Classify a control-plane kind string
pub fn classify_control_plane(kind: &str) -> Result<ControlPlaneKind, ClientError> {
    match kind {
        "KubeadmControlPlane" => Ok(ControlPlaneKind::Kubeadm),
        "KopsControlPlane" => Ok(ControlPlaneKind::Kops),
        other => Err(unknown_kind(other)),
    }
}

/// Classify a cluster-infrastructure kind string
pub fn classify_cluster_infrastructure(
    kind: &str,
) -> Result<ClusterInfrastructureKind, ClientError> {
    match kind {
        "DockerCluster" => Ok(ClusterInfrastructureKind::Docker),
        "KopsAWSCluster" => Ok(ClusterInfrastructureKind::KopsAws),
        "KopsControlPlane" => Ok(ClusterInfrastructureKind::KopsControlPlane),
        other => Err(unknown_kind(other)),
    }
}

/// Classify a node-infrastructure kind string
pub fn classify_node_infrastructure(kind: &str) -> Result<NodeInfrastructureKind, ClientError> {
    match kind {
        "DockerCluster" => Ok(NodeInfrastructureKind::DockerCluster),
        "DockerMachineTemplate" => Ok(NodeInfrastructureKind::DockerMachineTemplate),
        "KopsMachinePool" => Ok(NodeInfrastructureKind::KopsMachinePool),
        other => Err(unknown_kind(other)),
    }
}

fn unknown_kind(kind: &str) -> ClientError {
    ClientError::kind_not_found(format!("the kind {} could not be found", kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    // =========================================================================
    // Control plane table
    // =========================================================================

    #[test]
    fn every_supported_control_plane_kind_maps_to_its_provider() {
        assert_eq!(
            classify_control_plane("KubeadmControlPlane")
                .unwrap()
                .provider(),
            "kubeadm"
        );
        assert_eq!(
            classify_control_plane("KopsControlPlane")
                .unwrap()
                .provider(),
            "kops"
        );
    }

    #[test]
    fn unsupported_control_plane_kind_is_rejected() {
        for kind in ["", "KopsMachinePool", "kubeadmcontrolplane", "AWSManagedControlPlane"] {
            let err = classify_control_plane(kind).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::KindNotFound);
            assert!(err.message().contains("could not be found"));
        }
    }

    // =========================================================================
    // Cluster infrastructure table
    // =========================================================================

    #[test]
    fn every_supported_cluster_infrastructure_kind_maps_to_its_provider() {
        assert_eq!(
            classify_cluster_infrastructure("DockerCluster")
                .unwrap()
                .provider(),
            "docker"
        );
        assert_eq!(
            classify_cluster_infrastructure("KopsAWSCluster")
                .unwrap()
                .provider(),
            "kops"
        );
        assert_eq!(
            classify_cluster_infrastructure("KopsControlPlane")
                .unwrap()
                .provider(),
            "kops"
        );
    }

    #[test]
    fn unsupported_cluster_infrastructure_kind_is_rejected() {
        let err = classify_cluster_infrastructure("AWSCluster").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KindNotFound);
        assert!(err.message().contains("AWSCluster"));
    }

    // =========================================================================
    // Node infrastructure table
    // =========================================================================

    #[test]
    fn node_infrastructure_table_is_closed() {
        assert_eq!(
            classify_node_infrastructure("DockerCluster").unwrap(),
            NodeInfrastructureKind::DockerCluster
        );
        assert_eq!(
            classify_node_infrastructure("DockerMachineTemplate").unwrap(),
            NodeInfrastructureKind::DockerMachineTemplate
        );
        assert_eq!(
            classify_node_infrastructure("KopsMachinePool").unwrap(),
            NodeInfrastructureKind::KopsMachinePool
        );
        assert_eq!(
            classify_node_infrastructure("KopsInstanceGroup")
                .unwrap_err()
                .kind(),
            ErrorKind::KindNotFound
        );
    }
}
