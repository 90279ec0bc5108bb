//! Node group resolution
//!
//! A node group is realized by exactly one of two backing kinds, probed in a
//! fixed order: MachinePool first, MachineDeployment second. The probe chain
//! short-circuits on the first kind that structurally matches, found-but-
//! invalid included; the second kind is only consulted when the first is
//! absent. The list aggregator follows the same contract per raw list rather
//! than per item, which makes deployment-style groups invisible whenever any
//! pool-style resources exist.

use crate::capi::reader;
use crate::capi::{validate_machine_template, ScalableResource};
use crate::error::{ClientError, ErrorKind};
use crate::naming::{node_group_full_name, node_group_short_name};
use crate::resolve::infrastructure::resolve_node_infrastructure;
use crate::resolve::{FailureSet, ListOutcome, NodeGroup, NodeInfrastructure, Skipped};
use crate::store::{ResourceKind, ResourceStore};

/// The backing kinds that can realize a node group, in probe order
const PROBE_ORDER: [BackingKind; 2] = [BackingKind::MachinePool, BackingKind::MachineDeployment];

/// One of the two mutually exclusive node group backing kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BackingKind {
    MachinePool,
    MachineDeployment,
}

impl BackingKind {
    fn resource_kind(&self) -> &'static ResourceKind {
        match self {
            BackingKind::MachinePool => &ResourceKind::MACHINE_POOL,
            BackingKind::MachineDeployment => &ResourceKind::MACHINE_DEPLOYMENT,
        }
    }

    fn kind_name(&self) -> &'static str {
        self.resource_kind().kind
    }
}

/// Node group configuration read off the winning backing resource, before
/// infrastructure enrichment
#[derive(Clone, Debug, PartialEq)]
struct NodeGroupConfig {
    name: String,
    cluster: String,
    infrastructure_kind: String,
    infrastructure_name: String,
    replicas: Option<i32>,
}

impl NodeGroupConfig {
    fn from_resource(name: String, fallback_cluster: &str, resource: &ScalableResource) -> Self {
        let cluster = if resource.spec.cluster_name.is_empty() {
            fallback_cluster.to_string()
        } else {
            resource.spec.cluster_name.clone()
        };
        let infrastructure_ref = resource
            .spec
            .template
            .spec
            .infrastructure_ref
            .clone()
            .unwrap_or_default();
        Self {
            name,
            cluster,
            infrastructure_kind: infrastructure_ref.kind,
            infrastructure_name: infrastructure_ref.name,
            replicas: resource.spec.replicas,
        }
    }

    fn into_node_group(self, infrastructure: NodeInfrastructure) -> NodeGroup {
        NodeGroup {
            name: self.name,
            cluster: self.cluster,
            infrastructure_kind: self.infrastructure_kind,
            infrastructure_name: self.infrastructure_name,
            replicas: self.replicas,
            infrastructure,
        }
    }
}

/// Resolve a single node group of a cluster by its short name
pub async fn get_node_group<S: ResourceStore + ?Sized>(
    store: &S,
    cluster_name: &str,
    name: &str,
) -> Result<NodeGroup, ClientError> {
    let config = node_group_config(store, cluster_name, name)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::ResourceNotFound => e,
            ErrorKind::InvalidConfiguration => ClientError::invalid_configuration(format!(
                "node group {} configuration is invalid",
                name
            ))
            .with_cause(e),
            _ => ClientError::unexpected(format!(
                "something went wrong while getting the node group {} config",
                name
            ))
            .with_cause(e),
        })?;

    let infrastructure = resolve_node_infrastructure(
        store,
        &config.cluster,
        &config.infrastructure_kind,
        &config.infrastructure_name,
    )
    .await
    .map_err(|e| match e.kind() {
        ErrorKind::ResourceNotFound => ClientError::invalid_resource(format!(
            "node group {} is invalid, the infrastructure resource {} was not found",
            name, config.infrastructure_name
        ))
        .with_cause(e),
        ErrorKind::KindNotFound => ClientError::invalid_configuration(format!(
            "node group {} is invalid, the infrastructure kind {} is not supported",
            name, config.infrastructure_kind
        ))
        .with_cause(e),
        _ => ClientError::unexpected(format!(
            "something went wrong while getting the node group {} infrastructure",
            name
        ))
        .with_cause(e),
    })?;

    Ok(config.into_node_group(infrastructure))
}

/// Probe the backing kinds in order for the named node group
///
/// First structural match wins: a backing object that exists but fails
/// template validation ends the probe, it does not fall through to the next
/// kind. Only a miss moves the probe along.
async fn node_group_config<S: ResourceStore + ?Sized>(
    store: &S,
    cluster_name: &str,
    name: &str,
) -> Result<NodeGroupConfig, ClientError> {
    let full_name = node_group_full_name(cluster_name, name);
    let mut misses = Vec::new();

    for backing in PROBE_ORDER {
        match reader::get_scalable(store, backing.resource_kind(), cluster_name, &full_name).await
        {
            Ok(resource) => {
                return Ok(NodeGroupConfig::from_resource(
                    name.to_string(),
                    cluster_name,
                    &resource,
                ))
            }
            Err(e) if e.kind() == ErrorKind::ResourceNotFound => misses.push(e),
            Err(e) if e.kind() == ErrorKind::InvalidConfiguration => return Err(e),
            Err(e) => {
                return Err(ClientError::unexpected(format!(
                    "failed getting the {} for node group {} in cluster {}",
                    backing.kind_name(),
                    name,
                    cluster_name
                ))
                .with_cause(e))
            }
        }
    }

    Err(ClientError::resource_not_found(format!(
        "could not find the node group {} in the cluster {}",
        name, cluster_name
    ))
    .with_cause(FailureSet(misses)))
}

/// Resolve every node group of a cluster
///
/// Items that fail template validation or infrastructure enrichment are
/// skipped and reported back; the call only fails when nothing survives.
pub async fn list_node_groups<S: ResourceStore + ?Sized>(
    store: &S,
    cluster_name: &str,
) -> Result<ListOutcome<NodeGroup>, ClientError> {
    let (configs, mut skipped) = node_group_list_configs(store, cluster_name)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::ResourceNotFound | ErrorKind::EmptyResponse => e,
            _ => ClientError::unexpected(format!(
                "something went wrong while getting the node group configurations for cluster {}",
                cluster_name
            ))
            .with_cause(e),
        })?;

    let mut items = Vec::new();
    for config in configs {
        match resolve_node_infrastructure(
            store,
            &config.cluster,
            &config.infrastructure_kind,
            &config.infrastructure_name,
        )
        .await
        {
            Ok(infrastructure) => items.push(config.into_node_group(infrastructure)),
            Err(error) => skipped.push(Skipped {
                name: config.name,
                error,
            }),
        }
    }

    if items.is_empty() {
        return Err(ClientError::empty_response(format!(
            "no valid node groups were found for cluster {}, some node groups reported infrastructure resource errors",
            cluster_name
        ))
        .with_cause(FailureSet::from_skipped(skipped)));
    }

    Ok(ListOutcome { items, skipped })
}

/// List the node group configurations of a cluster from the backing kinds
///
/// The first kind whose raw list is non-empty decides the outcome, even when
/// every item in it fails validation. List failures other than emptiness are
/// recorded and only surface when no kind produced items.
async fn node_group_list_configs<S: ResourceStore + ?Sized>(
    store: &S,
    cluster_name: &str,
) -> Result<(Vec<NodeGroupConfig>, Vec<Skipped>), ClientError> {
    let mut list_failures = Vec::new();

    for backing in PROBE_ORDER {
        let resources = match reader::list_scalable(store, backing.resource_kind(), cluster_name)
            .await
        {
            Ok(resources) => resources,
            Err(e) if e.kind() == ErrorKind::EmptyResponse => continue,
            Err(e) => {
                list_failures.push(
                    ClientError::unexpected(format!(
                        "error while listing the {}s of cluster {}",
                        backing.kind_name(),
                        cluster_name
                    ))
                    .with_cause(e),
                );
                continue;
            }
        };

        let mut configs = Vec::new();
        let mut skipped = Vec::new();
        for resource in resources {
            match validate_machine_template(&resource.spec.template) {
                Ok(()) => {
                    let short_name =
                        node_group_short_name(&resource.spec.cluster_name, &resource.name);
                    configs.push(NodeGroupConfig::from_resource(
                        short_name,
                        cluster_name,
                        &resource,
                    ));
                }
                Err(error) => skipped.push(Skipped {
                    name: resource.name.clone(),
                    error,
                }),
            }
        }

        if configs.is_empty() {
            return Err(ClientError::empty_response(format!(
                "no valid node groups were found in the cluster {}, some node groups have an invalid configuration",
                cluster_name
            ))
            .with_cause(FailureSet::from_skipped(skipped)));
        }
        return Ok((configs, skipped));
    }

    if !list_failures.is_empty() {
        return Err(ClientError::unexpected(format!(
            "error while listing the node group resources of cluster {}",
            cluster_name
        ))
        .with_cause(FailureSet(list_failures)));
    }

    Err(ClientError::empty_response(format!(
        "no node groups were found in the cluster {}",
        cluster_name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capi::fixtures::{
        kops_machine_pool, scalable, store_not_found, store_transport_error, to_dynamic,
    };
    use crate::store::MockResourceStore;
    use mockall::Sequence;
    use serde_json::Value;

    fn pool(name: &str, infra_kind: &str, infra_name: &str) -> Value {
        scalable("MachinePool", "prod-us", name, infra_kind, infra_name, Some(3))
    }

    fn deployment(name: &str, infra_kind: &str, infra_name: &str) -> Value {
        scalable(
            "MachineDeployment",
            "prod-us",
            name,
            infra_kind,
            infra_name,
            Some(2),
        )
    }

    // =========================================================================
    // Single node group: probe chain
    // =========================================================================

    /// A valid MachinePool wins outright; the MachineDeployment kind is
    /// never consulted
    #[tokio::test]
    async fn pool_style_wins_without_consulting_deployment_style() {
        let mut store = MockResourceStore::new();
        store
            .expect_get()
            .withf(|kind, namespace, name| {
                kind == &ResourceKind::MACHINE_POOL
                    && namespace == "kubernetes-prod-us"
                    && name == "prod-us-workers"
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(to_dynamic(pool(
                    "prod-us-workers",
                    "DockerMachineTemplate",
                    "prod-us-workers",
                )))
            });

        let group = get_node_group(&store, "prod-us", "workers").await.unwrap();
        assert_eq!(group.name, "workers");
        assert_eq!(group.cluster, "prod-us");
        assert_eq!(group.infrastructure_kind, "DockerMachineTemplate");
        assert_eq!(group.infrastructure_name, "prod-us-workers");
        assert_eq!(group.replicas, Some(3));
        assert_eq!(group.infrastructure.provider, "docker");
    }

    /// When the pool probe misses, the deployment probe runs with the same
    /// synthesized full name
    #[tokio::test]
    async fn deployment_style_is_probed_after_a_pool_miss() {
        let mut store = MockResourceStore::new();
        let mut order = Sequence::new();
        store
            .expect_get()
            .withf(|kind, _, name| {
                kind == &ResourceKind::MACHINE_POOL && name == "prod-us-workers"
            })
            .times(1)
            .in_sequence(&mut order)
            .returning(|_, _, _| {
                Err(store_not_found(
                    "MachinePool",
                    "kubernetes-prod-us",
                    "prod-us-workers",
                ))
            });
        store
            .expect_get()
            .withf(|kind, _, name| {
                kind == &ResourceKind::MACHINE_DEPLOYMENT && name == "prod-us-workers"
            })
            .times(1)
            .in_sequence(&mut order)
            .returning(|_, _, _| {
                Ok(to_dynamic(deployment(
                    "prod-us-workers",
                    "DockerMachineTemplate",
                    "prod-us-workers",
                )))
            });

        let group = get_node_group(&store, "prod-us", "workers").await.unwrap();
        assert_eq!(group.name, "workers");
        assert_eq!(group.replicas, Some(2));
    }

    /// Both probes missing yields not-found naming the group and the
    /// cluster, with both misses kept as causes
    #[tokio::test]
    async fn double_miss_is_resource_not_found_with_both_causes() {
        let mut store = MockResourceStore::new();
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::MACHINE_POOL)
            .times(1)
            .returning(|_, _, _| {
                Err(store_not_found(
                    "MachinePool",
                    "kubernetes-prod-us",
                    "prod-us-workers",
                ))
            });
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::MACHINE_DEPLOYMENT)
            .times(1)
            .returning(|_, _, _| {
                Err(store_not_found(
                    "MachineDeployment",
                    "kubernetes-prod-us",
                    "prod-us-workers",
                ))
            });

        let err = get_node_group(&store, "prod-us", "workers")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
        assert!(err.message().contains("workers"));
        assert!(err.message().contains("prod-us"));
        let causes = std::error::Error::source(&err)
            .expect("misses should be kept")
            .to_string();
        assert!(causes.contains("MachinePool"));
        assert!(causes.contains("MachineDeployment"));
    }

    /// A pool that exists with a broken template ends the probe; the
    /// deployment kind must not be consulted
    #[tokio::test]
    async fn invalid_pool_template_does_not_fall_through() {
        let mut store = MockResourceStore::new();
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::MACHINE_POOL)
            .times(1)
            .returning(|_, _, _| {
                Ok(to_dynamic(pool("prod-us-workers", "", "prod-us-workers")))
            });

        let err = get_node_group(&store, "prod-us", "workers")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        assert!(err.message().contains("workers"));
    }

    /// A transport failure during the pool probe does not fall through
    #[tokio::test]
    async fn transport_failure_does_not_fall_through() {
        let mut store = MockResourceStore::new();
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::MACHINE_POOL)
            .times(1)
            .returning(|_, _, _| Err(store_transport_error()));

        let err = get_node_group(&store, "prod-us", "workers")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedError);
    }

    // =========================================================================
    // Single node group: infrastructure re-classification
    // =========================================================================

    /// Missing infrastructure object: the group exists but points nowhere,
    /// which is an invalid resource, not a plain not-found
    #[tokio::test]
    async fn missing_infrastructure_is_reframed_as_invalid_resource() {
        let mut store = MockResourceStore::new();
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::MACHINE_POOL)
            .returning(|_, _, _| {
                Ok(to_dynamic(pool(
                    "prod-us-workers",
                    "KopsMachinePool",
                    "prod-us-workers",
                )))
            });
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::KOPS_MACHINE_POOL)
            .returning(|_, _, _| {
                Err(store_not_found(
                    "KopsMachinePool",
                    "kubernetes-prod-us",
                    "prod-us-workers",
                ))
            });

        let err = get_node_group(&store, "prod-us", "workers")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResource);
        assert!(err.message().contains("was not found"));
        let cause = err.classified_cause().unwrap();
        assert_eq!(cause.kind(), ErrorKind::ResourceNotFound);
    }

    /// An unsupported infrastructure kind on the template is a
    /// configuration problem
    #[tokio::test]
    async fn unsupported_infrastructure_kind_is_invalid_configuration() {
        let mut store = MockResourceStore::new();
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::MACHINE_POOL)
            .returning(|_, _, _| {
                Ok(to_dynamic(pool(
                    "prod-us-workers",
                    "AWSMachineTemplate",
                    "prod-us-workers",
                )))
            });

        let err = get_node_group(&store, "prod-us", "workers")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        assert!(err.message().contains("AWSMachineTemplate"));
        let cause = err.classified_cause().unwrap();
        assert_eq!(cause.kind(), ErrorKind::KindNotFound);
    }

    /// Enrichment happy path against the production kind
    #[tokio::test]
    async fn kops_backed_group_is_fully_enriched() {
        let mut store = MockResourceStore::new();
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::MACHINE_POOL)
            .returning(|_, _, _| {
                Ok(to_dynamic(pool(
                    "prod-us-workers",
                    "KopsMachinePool",
                    "prod-us-workers",
                )))
            });
        store
            .expect_get()
            .withf(|kind, _, name| {
                kind == &ResourceKind::KOPS_MACHINE_POOL && name == "prod-us-workers"
            })
            .returning(|_, _, _| {
                Ok(to_dynamic(kops_machine_pool(
                    "prod-us-workers",
                    "m5.xlarge",
                    &["us-east-1a", "us-east-1b"],
                    Some(2),
                    Some(12),
                )))
            });

        let group = get_node_group(&store, "prod-us", "workers").await.unwrap();
        assert_eq!(group.infrastructure.provider, "kops");
        assert_eq!(group.infrastructure.az, vec!["us-east-1a", "us-east-1b"]);
        assert_eq!(group.infrastructure.machine_type, "m5.xlarge");
        assert_eq!(group.infrastructure.min, Some(2));
        assert_eq!(group.infrastructure.max, Some(12));
    }

    /// Same backing state resolved twice yields structurally equal groups
    #[tokio::test]
    async fn resolution_is_idempotent() {
        let mut store = MockResourceStore::new();
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::MACHINE_POOL)
            .times(2)
            .returning(|_, _, _| {
                Ok(to_dynamic(pool(
                    "prod-us-workers",
                    "DockerMachineTemplate",
                    "prod-us-workers",
                )))
            });

        let first = get_node_group(&store, "prod-us", "workers").await.unwrap();
        let second = get_node_group(&store, "prod-us", "workers").await.unwrap();
        assert_eq!(first, second);
    }

    // =========================================================================
    // List aggregation
    // =========================================================================

    /// Two valid pools resolve to two groups; the deployment kind is never
    /// listed
    #[tokio::test]
    async fn pool_items_suppress_the_deployment_list() {
        let mut store = MockResourceStore::new();
        store
            .expect_list()
            .withf(|kind, namespace| {
                kind == &ResourceKind::MACHINE_POOL && namespace == "kubernetes-prod-us"
            })
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    to_dynamic(pool(
                        "prod-us-workers",
                        "DockerMachineTemplate",
                        "prod-us-workers",
                    )),
                    to_dynamic(pool(
                        "prod-us-ingest",
                        "DockerMachineTemplate",
                        "prod-us-ingest",
                    )),
                ])
            });

        let outcome = list_node_groups(&store, "prod-us").await.unwrap();
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[0].name, "workers");
        assert_eq!(outcome.items[1].name, "ingest");
        assert!(outcome.skipped.is_empty());
    }

    /// With no pools at all, deployment-style groups are served
    #[tokio::test]
    async fn deployment_items_are_served_when_no_pools_exist() {
        let mut store = MockResourceStore::new();
        store
            .expect_list()
            .withf(|kind, _| kind == &ResourceKind::MACHINE_POOL)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        store
            .expect_list()
            .withf(|kind, _| kind == &ResourceKind::MACHINE_DEPLOYMENT)
            .times(1)
            .returning(|_, _| {
                Ok(vec![to_dynamic(deployment(
                    "prod-us-batch",
                    "DockerMachineTemplate",
                    "prod-us-batch",
                ))])
            });

        let outcome = list_node_groups(&store, "prod-us").await.unwrap();
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].name, "batch");
        assert_eq!(outcome.items[0].replicas, Some(2));
    }

    /// The sole existing resource failing validation means an empty
    /// response, and the deployment list is still not consulted
    #[tokio::test]
    async fn all_invalid_pool_items_end_the_aggregation() {
        let mut store = MockResourceStore::new();
        store
            .expect_list()
            .withf(|kind, _| kind == &ResourceKind::MACHINE_POOL)
            .times(1)
            .returning(|_, _| {
                Ok(vec![to_dynamic(pool(
                    "prod-us-workers",
                    "",
                    "prod-us-workers",
                ))])
            });

        let err = list_node_groups(&store, "prod-us").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResponse);
        assert!(err.message().contains("invalid configuration"));
    }

    /// Invalid items are skipped, valid siblings still resolve
    #[tokio::test]
    async fn invalid_items_are_skipped_not_fatal() {
        let mut store = MockResourceStore::new();
        store
            .expect_list()
            .withf(|kind, _| kind == &ResourceKind::MACHINE_POOL)
            .returning(|_, _| {
                Ok(vec![
                    to_dynamic(pool("prod-us-workers", "", "prod-us-workers")),
                    to_dynamic(pool(
                        "prod-us-ingest",
                        "DockerMachineTemplate",
                        "prod-us-ingest",
                    )),
                ])
            });

        let outcome = list_node_groups(&store, "prod-us").await.unwrap();
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].name, "ingest");
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].name, "prod-us-workers");
        assert_eq!(
            outcome.skipped[0].error.kind(),
            ErrorKind::InvalidConfiguration
        );
    }

    /// An infrastructure failure on one item does not abort the loop
    #[tokio::test]
    async fn infrastructure_failures_skip_the_item_only() {
        let mut store = MockResourceStore::new();
        store
            .expect_list()
            .withf(|kind, _| kind == &ResourceKind::MACHINE_POOL)
            .returning(|_, _| {
                Ok(vec![
                    to_dynamic(pool(
                        "prod-us-workers",
                        "KopsMachinePool",
                        "prod-us-workers",
                    )),
                    to_dynamic(pool(
                        "prod-us-ingest",
                        "DockerMachineTemplate",
                        "prod-us-ingest",
                    )),
                ])
            });
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::KOPS_MACHINE_POOL)
            .returning(|_, _, _| {
                Err(store_not_found(
                    "KopsMachinePool",
                    "kubernetes-prod-us",
                    "prod-us-workers",
                ))
            });

        let outcome = list_node_groups(&store, "prod-us").await.unwrap();
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].name, "ingest");
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].name, "workers");
    }

    /// Every item failing enrichment means an empty response that names the
    /// infrastructure as the reason
    #[tokio::test]
    async fn all_enrichment_failures_become_empty_response() {
        let mut store = MockResourceStore::new();
        store
            .expect_list()
            .withf(|kind, _| kind == &ResourceKind::MACHINE_POOL)
            .returning(|_, _| {
                Ok(vec![to_dynamic(pool(
                    "prod-us-workers",
                    "KopsMachinePool",
                    "prod-us-workers",
                ))])
            });
        store
            .expect_get()
            .withf(|kind, _, _| kind == &ResourceKind::KOPS_MACHINE_POOL)
            .returning(|_, _, _| {
                Err(store_not_found(
                    "KopsMachinePool",
                    "kubernetes-prod-us",
                    "prod-us-workers",
                ))
            });

        let err = list_node_groups(&store, "prod-us").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResponse);
        assert!(err.message().contains("infrastructure resource errors"));
    }

    /// Both kinds empty means an empty response that reports plain absence
    #[tokio::test]
    async fn both_kinds_empty_is_a_plain_empty_response() {
        let mut store = MockResourceStore::new();
        store
            .expect_list()
            .times(2)
            .returning(|_, _| Ok(Vec::new()));

        let err = list_node_groups(&store, "prod-us").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResponse);
        assert!(err.message().contains("no node groups were found"));
        assert!(!err.message().contains("invalid"));
    }

    /// A failing pool list is recorded and the deployment list still serves
    #[tokio::test]
    async fn pool_list_failure_falls_back_to_deployments() {
        let mut store = MockResourceStore::new();
        store
            .expect_list()
            .withf(|kind, _| kind == &ResourceKind::MACHINE_POOL)
            .times(1)
            .returning(|_, _| Err(store_transport_error()));
        store
            .expect_list()
            .withf(|kind, _| kind == &ResourceKind::MACHINE_DEPLOYMENT)
            .times(1)
            .returning(|_, _| {
                Ok(vec![to_dynamic(deployment(
                    "prod-us-batch",
                    "DockerMachineTemplate",
                    "prod-us-batch",
                ))])
            });

        let outcome = list_node_groups(&store, "prod-us").await.unwrap();
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].name, "batch");
    }

    /// Both lists failing surfaces as unexpected, with the recorded
    /// failures as causes
    #[tokio::test]
    async fn both_list_failures_surface_as_unexpected() {
        let mut store = MockResourceStore::new();
        store
            .expect_list()
            .times(2)
            .returning(|_, _| Err(store_transport_error()));

        let err = list_node_groups(&store, "prod-us").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedError);
        assert!(std::error::Error::source(&err).is_some());
    }
}
