//! kops instance group projections
//!
//! The production node infrastructure kind is `KopsMachinePool`, a wrapper
//! the kops operator publishes around a kops instance group. Its spec is
//! projected into the normalized node infrastructure shape; the full spec is
//! carried along untyped because instance group schemas vary per provider.

use serde::Deserialize;
use serde_json::Value;

/// Instance group settings projected into node infrastructure
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KopsInstanceGroupSpec {
    /// Subnets the group spans, reported as availability zones
    #[serde(default)]
    pub subnets: Vec<String>,
    /// Cloud machine type of the group
    #[serde(default)]
    pub machine_type: String,
    /// Autoscaling lower bound
    #[serde(default)]
    pub min_size: Option<i32>,
    /// Autoscaling upper bound
    #[serde(default)]
    pub max_size: Option<i32>,
}

/// Spec of a KopsMachinePool object
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KopsMachinePoolSpec {
    /// Embedded kops instance group spec
    #[serde(default)]
    pub kops_instance_group_spec: KopsInstanceGroupSpec,
}

/// A KopsMachinePool object together with its raw spec payload
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KopsMachinePool {
    /// Object name
    pub name: String,
    /// Typed projection of the spec
    pub spec: KopsMachinePoolSpec,
    /// The spec exactly as stored, kept for the opaque payload
    pub raw_spec: Value,
}
