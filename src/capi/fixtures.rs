//! Shared test objects
//!
//! Builders return plain JSON values so individual tests can knock out or
//! overwrite fields before converting to the store's untyped object shape.

use kube::api::DynamicObject;
use serde_json::{json, Value};

use crate::store::StoreError;

/// Convert a JSON manifest into the store's untyped object shape
pub(crate) fn to_dynamic(value: Value) -> DynamicObject {
    serde_json::from_value(value).expect("fixture should deserialize into a dynamic object")
}

/// A fully valid cluster object
pub(crate) fn cluster(name: &str) -> Value {
    json!({
        "apiVersion": "cluster.x-k8s.io/v1beta1",
        "kind": "Cluster",
        "metadata": {
            "name": name,
            "namespace": format!("kubernetes-{}", name.replace('.', "-")),
            "labels": {
                "region": "us-east-1",
                "environment": "production",
                "clusterGroup": "games"
            }
        },
        "spec": {
            "controlPlaneEndpoint": {
                "host": format!("api.{}.example.com", name),
                "port": 443
            },
            "controlPlaneRef": {
                "kind": "KopsControlPlane",
                "name": name,
                "apiVersion": "controlplane.cluster.x-k8s.io/v1alpha1"
            },
            "infrastructureRef": {
                "kind": "KopsAWSCluster",
                "name": name,
                "apiVersion": "infrastructure.cluster.x-k8s.io/v1alpha1"
            },
            "clusterNetwork": {
                "services": {"cidrBlocks": ["10.96.0.0/12"]}
            }
        }
    })
}

/// A MachinePool or MachineDeployment object with a complete machine template
pub(crate) fn scalable(
    kind: &str,
    cluster_name: &str,
    full_name: &str,
    infra_kind: &str,
    infra_name: &str,
    replicas: Option<i32>,
) -> Value {
    json!({
        "apiVersion": "cluster.x-k8s.io/v1beta1",
        "kind": kind,
        "metadata": {
            "name": full_name,
            "namespace": format!("kubernetes-{}", cluster_name.replace('.', "-"))
        },
        "spec": {
            "clusterName": cluster_name,
            "replicas": replicas,
            "template": {
                "spec": {
                    "infrastructureRef": {
                        "kind": infra_kind,
                        "name": infra_name,
                        "apiVersion": "infrastructure.cluster.x-k8s.io/v1alpha1"
                    }
                }
            }
        }
    })
}

/// A KopsMachinePool object carrying an instance group spec
pub(crate) fn kops_machine_pool(
    name: &str,
    machine_type: &str,
    subnets: &[&str],
    min_size: Option<i32>,
    max_size: Option<i32>,
) -> Value {
    json!({
        "apiVersion": "infrastructure.cluster.x-k8s.io/v1alpha1",
        "kind": "KopsMachinePool",
        "metadata": {"name": name},
        "spec": {
            "kopsInstanceGroupSpec": {
                "machineType": machine_type,
                "subnets": subnets,
                "minSize": min_size,
                "maxSize": max_size
            }
        }
    })
}

/// The store's not-found signal
pub(crate) fn store_not_found(kind: &'static str, namespace: &str, name: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        namespace: namespace.to_string(),
        name: name.to_string(),
    }
}

/// An opaque transport failure from the store
pub(crate) fn store_transport_error() -> StoreError {
    StoreError::Api(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: "etcdserver: request timed out".to_string(),
        reason: "InternalError".to_string(),
        code: 500,
    }))
}
