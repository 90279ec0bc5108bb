//! Typed projections of the Cluster API resources we read
//!
//! The store hands back untyped objects; these structs capture just the
//! fields the resolvers consume. Unknown fields are ignored on purpose, the
//! upstream CRDs move faster than this API needs to.

pub mod kops;
pub mod reader;

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ClientError;

/// Reference to another object, as embedded in CAPI specs
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// Kind of the referenced object
    #[serde(default)]
    pub kind: String,
    /// Name of the referenced object
    #[serde(default)]
    pub name: String,
    /// API version of the referenced object
    #[serde(default)]
    pub api_version: String,
}

/// Control plane endpoint of a cluster
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneEndpoint {
    /// Endpoint host
    #[serde(default)]
    pub host: String,
    /// Endpoint port
    #[serde(default)]
    pub port: i32,
}

impl ControlPlaneEndpoint {
    /// An endpoint is usable when both coordinates are set
    pub fn is_valid(&self) -> bool {
        !self.host.is_empty() && self.port != 0
    }
}

/// Service network ranges of a cluster
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRanges {
    /// CIDR blocks assigned to the range
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
}

/// Cluster network configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetwork {
    /// Service network ranges
    #[serde(default)]
    pub services: Option<NetworkRanges>,
}

/// Spec of a CAPI cluster object
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Control plane endpoint, empty when the cluster is not provisioned yet
    #[serde(default)]
    pub control_plane_endpoint: ControlPlaneEndpoint,
    /// Reference to the control plane object
    #[serde(default)]
    pub control_plane_ref: Option<ObjectReference>,
    /// Reference to the cluster infrastructure object
    #[serde(default)]
    pub infrastructure_ref: Option<ObjectReference>,
    /// Network configuration
    #[serde(default)]
    pub cluster_network: Option<ClusterNetwork>,
}

/// A CAPI cluster object, reduced to the fields the resolvers use
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusterResource {
    /// Object name
    pub name: String,
    /// Object labels
    pub labels: BTreeMap<String, String>,
    /// Object spec
    pub spec: ClusterSpec,
}

/// Machine spec inside a node group template
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    /// Reference to the infrastructure object backing the machines
    #[serde(default)]
    pub infrastructure_ref: Option<ObjectReference>,
}

/// Machine template shared by both node group backing kinds
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineTemplate {
    /// Template spec
    #[serde(default)]
    pub spec: MachineSpec,
}

/// Spec shared by the scalable node group backing kinds
///
/// MachinePool and MachineDeployment differ in lifecycle semantics but expose
/// the same shape for everything this API reads.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScalableSpec {
    /// Name of the owning cluster
    #[serde(default)]
    pub cluster_name: String,
    /// Desired replica count
    #[serde(default)]
    pub replicas: Option<i32>,
    /// Machine template
    #[serde(default)]
    pub template: MachineTemplate,
}

/// A scalable node group backing object (MachinePool or MachineDeployment)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScalableResource {
    /// Object name, carries the cluster name prefix
    pub name: String,
    /// Object spec
    pub spec: ScalableSpec,
}

/// Validate that a machine template can be resolved to infrastructure
///
/// Both backing kinds must name a non-empty infrastructure kind, name and
/// apiVersion before any infrastructure resolution is attempted.
pub fn validate_machine_template(template: &MachineTemplate) -> Result<(), ClientError> {
    let infra_ref = template.spec.infrastructure_ref.as_ref().ok_or_else(|| {
        ClientError::invalid_configuration(
            "machine template doesn't have an infrastructure reference",
        )
    })?;

    if infra_ref.name.is_empty() {
        return Err(ClientError::invalid_configuration(
            "machine template infrastructure reference name is empty",
        ));
    }

    if infra_ref.kind.is_empty() {
        return Err(ClientError::invalid_configuration(
            "machine template infrastructure reference kind is empty",
        ));
    }

    if infra_ref.api_version.is_empty() {
        return Err(ClientError::invalid_configuration(
            "machine template infrastructure reference apiVersion is empty",
        ));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures;
