//! Node infrastructure resolution
//!
//! Dispatches on the classified infrastructure kind. The Docker kinds are
//! inert placeholders resolved without touching the store; KopsMachinePool is
//! the production kind and costs one extra fetch in the cluster namespace.
//! Adding a provider means adding a [`NodeInfrastructureKind`] variant and one
//! match arm here; callers never change.

use crate::capi::reader;
use crate::error::ClientError;
use crate::kind::{classify_node_infrastructure, NodeInfrastructureKind};
use crate::resolve::NodeInfrastructure;
use crate::store::ResourceStore;

fn docker_placeholder() -> NodeInfrastructure {
    NodeInfrastructure {
        provider: "docker".to_string(),
        az: vec!["local".to_string()],
        machine_type: "container".to_string(),
        min: None,
        max: None,
        spec: None,
    }
}

/// Resolve the machine infrastructure behind a node group
///
/// Errors keep their classification: an unsupported kind surfaces as
/// `KindNotFound`, a missing backing object as `ResourceNotFound`, and the
/// caller decides how to re-frame those for its own level.
pub async fn resolve_node_infrastructure<S: ResourceStore + ?Sized>(
    store: &S,
    cluster_name: &str,
    infrastructure_kind: &str,
    infrastructure_name: &str,
) -> Result<NodeInfrastructure, ClientError> {
    match classify_node_infrastructure(infrastructure_kind)? {
        NodeInfrastructureKind::DockerCluster | NodeInfrastructureKind::DockerMachineTemplate => {
            Ok(docker_placeholder())
        }
        NodeInfrastructureKind::KopsMachinePool => {
            let pool = reader::get_kops_machine_pool(store, cluster_name, infrastructure_name)
                .await
                .map_err(|e| {
                    ClientError::new(e.kind(), "could not retrieve the node group infrastructure")
                        .with_cause(e)
                })?;

            let group = pool.spec.kops_instance_group_spec;
            Ok(NodeInfrastructure {
                provider: "kops".to_string(),
                az: group.subnets,
                machine_type: group.machine_type,
                min: group.min_size,
                max: group.max_size,
                spec: Some(pool.raw_spec),
            })
        }
    }
}
