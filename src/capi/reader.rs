//! Typed readers over the resource store
//!
//! Each reader fetches untyped objects, decodes them into the projections in
//! [`crate::capi`], and classifies every failure before it leaves this module:
//! a store miss becomes `ResourceNotFound`, an empty list becomes
//! `EmptyResponse`, an undecodable object becomes `InvalidResource`, and a
//! transport failure becomes `UnexpectedError`. Nothing unclassified escapes.

use kube::api::DynamicObject;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::kops::{KopsMachinePool, KopsMachinePoolSpec};
use super::{validate_machine_template, ClusterResource, ClusterSpec, ScalableResource, ScalableSpec};
use crate::error::ClientError;
use crate::naming::cluster_namespace;
use crate::store::{ResourceKind, ResourceStore, StoreError};

fn object_name(obj: &DynamicObject) -> String {
    obj.metadata.name.clone().unwrap_or_default()
}

fn raw_spec(obj: &DynamicObject) -> Value {
    obj.data.get("spec").cloned().unwrap_or(Value::Null)
}

fn decode_spec<T: DeserializeOwned>(
    obj: &DynamicObject,
    kind: &ResourceKind,
) -> Result<T, ClientError> {
    serde_json::from_value(raw_spec(obj)).map_err(|e| {
        ClientError::invalid_resource(format!(
            "could not decode the {} spec of {}",
            kind.kind,
            object_name(obj)
        ))
        .with_cause(e)
    })
}

/// Fetch a cluster object by name
///
/// The namespace is derived from the cluster name; there is one cluster per
/// namespace by convention.
pub async fn get_cluster<S: ResourceStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<ClusterResource, ClientError> {
    let namespace = cluster_namespace(name);
    let obj = store
        .get(&ResourceKind::CLUSTER, &namespace, name)
        .await
        .map_err(|e| match e {
            StoreError::NotFound { .. } => ClientError::resource_not_found(format!(
                "the requested cluster {} was not found in namespace {}",
                name, namespace
            ))
            .with_cause(e),
            e => ClientError::unexpected("error getting the cluster from the kubernetes api")
                .with_cause(e),
        })?;

    let spec: ClusterSpec = decode_spec(&obj, &ResourceKind::CLUSTER)?;
    Ok(ClusterResource {
        name: object_name(&obj),
        labels: obj.metadata.labels.clone().unwrap_or_default(),
        spec,
    })
}

/// List every cluster object, across all namespaces
pub async fn list_clusters<S: ResourceStore + ?Sized>(
    store: &S,
) -> Result<Vec<ClusterResource>, ClientError> {
    let objects = store
        .list_all(&ResourceKind::CLUSTER)
        .await
        .map_err(|e| match e {
            StoreError::NotFound { .. } => {
                ClientError::resource_not_found("could not find any clusters").with_cause(e)
            }
            e => ClientError::unexpected("error listing clusters from the kubernetes api")
                .with_cause(e),
        })?;

    if objects.is_empty() {
        return Err(ClientError::resource_not_found("no clusters were found"));
    }

    objects
        .iter()
        .map(|obj| {
            let spec: ClusterSpec = decode_spec(obj, &ResourceKind::CLUSTER)?;
            Ok(ClusterResource {
                name: object_name(obj),
                labels: obj.metadata.labels.clone().unwrap_or_default(),
                spec,
            })
        })
        .collect()
}

/// Fetch one node group backing object of the given kind
///
/// Validates the machine template before returning: a backing object whose
/// template cannot be resolved to infrastructure is reported as
/// `InvalidConfiguration`, not returned.
pub async fn get_scalable<S: ResourceStore + ?Sized>(
    store: &S,
    kind: &ResourceKind,
    cluster_name: &str,
    name: &str,
) -> Result<ScalableResource, ClientError> {
    let namespace = cluster_namespace(cluster_name);
    let obj = store
        .get(kind, &namespace, name)
        .await
        .map_err(|e| match e {
            StoreError::NotFound { .. } => ClientError::resource_not_found(format!(
                "the requested {} {} was not found for the cluster {}",
                kind.kind, name, cluster_name
            ))
            .with_cause(e),
            e => ClientError::unexpected(format!(
                "error getting the {} from the kubernetes api",
                kind.kind
            ))
            .with_cause(e),
        })?;

    let spec: ScalableSpec = decode_spec(&obj, kind)?;
    let resource = ScalableResource {
        name: object_name(&obj),
        spec,
    };

    validate_machine_template(&resource.spec.template).map_err(|e| {
        ClientError::invalid_configuration(format!(
            "{} {} doesn't have a valid configuration",
            kind.kind, resource.name
        ))
        .with_cause(e)
    })?;

    Ok(resource)
}

/// List the node group backing objects of the given kind for a cluster
///
/// Items are decoded but not template-validated here; the list aggregator
/// owns the skip-invalid policy. An existing-but-empty list is reported as
/// `EmptyResponse` so the aggregator can tell it apart from a failure.
pub async fn list_scalable<S: ResourceStore + ?Sized>(
    store: &S,
    kind: &ResourceKind,
    cluster_name: &str,
) -> Result<Vec<ScalableResource>, ClientError> {
    let namespace = cluster_namespace(cluster_name);
    let objects = store.list(kind, &namespace).await.map_err(|e| match e {
        StoreError::NotFound { .. } => ClientError::resource_not_found(format!(
            "no {}s were found for the cluster {}",
            kind.kind, cluster_name
        ))
        .with_cause(e),
        e => ClientError::unexpected(format!(
            "error listing {}s from the kubernetes api",
            kind.kind
        ))
        .with_cause(e),
    })?;

    if objects.is_empty() {
        return Err(ClientError::empty_response(format!(
            "no {}s were found for the cluster {}",
            kind.kind, cluster_name
        )));
    }

    objects
        .iter()
        .map(|obj| {
            let spec: ScalableSpec = decode_spec(obj, kind)?;
            Ok(ScalableResource {
                name: object_name(obj),
                spec,
            })
        })
        .collect()
}

/// Fetch the KopsMachinePool backing a node group's infrastructure
pub async fn get_kops_machine_pool<S: ResourceStore + ?Sized>(
    store: &S,
    cluster_name: &str,
    name: &str,
) -> Result<KopsMachinePool, ClientError> {
    let namespace = cluster_namespace(cluster_name);
    let obj = store
        .get(&ResourceKind::KOPS_MACHINE_POOL, &namespace, name)
        .await
        .map_err(|e| match e {
            StoreError::NotFound { .. } => ClientError::resource_not_found(format!(
                "the requested KopsMachinePool {} was not found in namespace {}",
                name, namespace
            ))
            .with_cause(e),
            e => ClientError::unexpected(
                "error getting the KopsMachinePool from the kubernetes api",
            )
            .with_cause(e),
        })?;

    let raw = raw_spec(&obj);
    let spec: KopsMachinePoolSpec =
        decode_spec(&obj, &ResourceKind::KOPS_MACHINE_POOL)?;
    Ok(KopsMachinePool {
        name: object_name(&obj),
        spec,
        raw_spec: raw,
    })
}
