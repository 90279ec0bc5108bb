//! Cluster resolution
//!
//! Fetches the backing cluster object, validates the references a usable
//! cluster must carry, and projects it into the public [`Cluster`] aggregate.
//! Labels degrade to empty strings; missing references do not.

use crate::capi::reader;
use crate::capi::ClusterResource;
use crate::error::{ClientError, ErrorKind};
use crate::kind::{classify_cluster_infrastructure, classify_control_plane};
use crate::resolve::{Cluster, ClusterInfrastructure, ControlPlane, FailureSet, ListOutcome, Skipped};
use crate::store::ResourceStore;

/// Resolve a cluster by name
pub async fn get_cluster<S: ResourceStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<Cluster, ClientError> {
    let resource = reader::get_cluster(store, name)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::ResourceNotFound => {
                ClientError::resource_not_found(format!("could not find cluster {}", name))
                    .with_cause(e)
            }
            _ => ClientError::unexpected(format!("error getting cluster {}", name)).with_cause(e),
        })?;

    validate_cluster(&resource).map_err(|e| {
        ClientError::invalid_configuration(format!(
            "cluster {} has an invalid configuration",
            name
        ))
        .with_cause(e)
    })?;

    project_cluster(&resource)
}

/// Resolve every cluster, skipping the invalid ones
///
/// Skip records are returned to the caller; an entirely invalid set becomes
/// `EmptyResponse` with the individual failures as the cause.
pub async fn list_clusters<S: ResourceStore + ?Sized>(
    store: &S,
) -> Result<ListOutcome<Cluster>, ClientError> {
    let resources = reader::list_clusters(store)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::ResourceNotFound | ErrorKind::EmptyResponse => e,
            _ => ClientError::unexpected("something went wrong while listing clusters")
                .with_cause(e),
        })?;

    let mut items = Vec::new();
    let mut skipped = Vec::new();
    for resource in resources {
        match validate_cluster(&resource).and_then(|_| project_cluster(&resource)) {
            Ok(cluster) => items.push(cluster),
            Err(error) => skipped.push(Skipped {
                name: resource.name.clone(),
                error,
            }),
        }
    }

    if items.is_empty() {
        return Err(ClientError::empty_response(
            "no valid clusters were found, some clusters have an invalid configuration",
        )
        .with_cause(FailureSet::from_skipped(skipped)));
    }

    Ok(ListOutcome { items, skipped })
}

/// Check the references and endpoint a usable cluster must carry
fn validate_cluster(resource: &ClusterResource) -> Result<(), ClientError> {
    if resource.spec.infrastructure_ref.is_none() {
        return Err(ClientError::invalid_configuration(
            "cluster doesn't have an Infrastructure Reference",
        ));
    }

    if resource.spec.control_plane_ref.is_none() {
        return Err(ClientError::invalid_configuration(
            "cluster doesn't have a ControlPlane Reference",
        ));
    }

    if !resource.spec.control_plane_endpoint.is_valid() {
        return Err(ClientError::invalid_configuration(
            "cluster doesn't have a valid ControlPlane endpoint",
        ));
    }

    Ok(())
}

fn label(resource: &ClusterResource, key: &str) -> String {
    resource.labels.get(key).cloned().unwrap_or_default()
}

/// Project a validated backing resource into the public aggregate
///
/// An unsupported control-plane or infrastructure kind is a configuration
/// problem from the caller's perspective, so the classifier's `KindNotFound`
/// is re-framed as `InvalidConfiguration` with the original as the cause.
fn project_cluster(resource: &ClusterResource) -> Result<Cluster, ClientError> {
    let control_plane_ref = resource.spec.control_plane_ref.as_ref().ok_or_else(|| {
        ClientError::invalid_configuration("cluster doesn't have a ControlPlane Reference")
    })?;
    let infrastructure_ref = resource.spec.infrastructure_ref.as_ref().ok_or_else(|| {
        ClientError::invalid_configuration("cluster doesn't have an Infrastructure Reference")
    })?;

    let control_plane = classify_control_plane(&control_plane_ref.kind)
        .map(|kind| ControlPlane {
            provider: kind.provider().to_string(),
        })
        .map_err(|e| {
            ClientError::invalid_configuration(format!(
                "could not get the controlplane property of cluster {}",
                resource.name
            ))
            .with_cause(e)
        })?;

    let infrastructure = classify_cluster_infrastructure(&infrastructure_ref.kind)
        .map(|kind| ClusterInfrastructure {
            provider: kind.provider().to_string(),
        })
        .map_err(|e| {
            ClientError::invalid_configuration(format!(
                "could not get the infrastructure property of cluster {}",
                resource.name
            ))
            .with_cause(e)
        })?;

    let endpoint = &resource.spec.control_plane_endpoint;
    let service_cidrs = resource
        .spec
        .cluster_network
        .as_ref()
        .and_then(|network| network.services.as_ref())
        .map(|services| services.cidr_blocks.clone())
        .unwrap_or_default();

    Ok(Cluster {
        name: resource.name.clone(),
        api_endpoint: format!("https://{}:{}", endpoint.host, endpoint.port),
        endpoint_host: endpoint.host.clone(),
        endpoint_port: endpoint.port,
        region: label(resource, "region"),
        environment: label(resource, "environment"),
        cluster_group: label(resource, "clusterGroup"),
        service_cidrs,
        control_plane,
        infrastructure,
    })
}
