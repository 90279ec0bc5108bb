//! Resource store boundary
//!
//! All reads go through the [`ResourceStore`] trait: get or list untyped
//! objects by a static resource descriptor plus namespace coordinates. The
//! production implementation talks to the Kubernetes API with a dynamic
//! client; tests substitute a mock. The store distinguishes exactly two
//! failure modes the resolvers care about: the object is not there, or the
//! call itself failed.

use async_trait::async_trait;
use kube::api::{Api, DynamicObject, ListParams};
use kube::discovery::ApiResource;
use kube::Client;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// A resource type the store knows how to address
///
/// Static equivalent of a group/version/resource triple. The supported set is
/// the associated constants below; nothing else is ever fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceKind {
    /// API group
    pub group: &'static str,
    /// API version within the group
    pub version: &'static str,
    /// Object kind, as it appears in manifests
    pub kind: &'static str,
    /// Plural resource name used in request paths
    pub plural: &'static str,
}

impl ResourceKind {
    /// Cluster API cluster objects
    pub const CLUSTER: ResourceKind = ResourceKind {
        group: "cluster.x-k8s.io",
        version: "v1beta1",
        kind: "Cluster",
        plural: "clusters",
    };

    /// Pool-style node group backing objects
    pub const MACHINE_POOL: ResourceKind = ResourceKind {
        group: "cluster.x-k8s.io",
        version: "v1beta1",
        kind: "MachinePool",
        plural: "machinepools",
    };

    /// Deployment-style node group backing objects
    pub const MACHINE_DEPLOYMENT: ResourceKind = ResourceKind {
        group: "cluster.x-k8s.io",
        version: "v1beta1",
        kind: "MachineDeployment",
        plural: "machinedeployments",
    };

    /// kops instance group objects backing production node groups
    pub const KOPS_MACHINE_POOL: ResourceKind = ResourceKind {
        group: "infrastructure.cluster.x-k8s.io",
        version: "v1alpha1",
        kind: "KopsMachinePool",
        plural: "kopsmachinepools",
    };

    /// `group/version` string as used in `apiVersion` fields
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.to_string()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    fn to_api_resource(&self) -> ApiResource {
        ApiResource {
            group: self.group.to_string(),
            version: self.version.to_string(),
            api_version: self.api_version(),
            kind: self.kind.to_string(),
            plural: self.plural.to_string(),
        }
    }
}

/// Failures a store call can report
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed object (or, for lists, the namespace) does not exist
    #[error("{kind} {namespace}/{name} was not found")]
    NotFound {
        /// Kind of the missing object
        kind: &'static str,
        /// Namespace that was addressed
        namespace: String,
        /// Object name, empty for list calls
        name: String,
    },

    /// The call failed for any other reason
    #[error("kubernetes api error: {0}")]
    Api(#[source] kube::Error),
}

impl StoreError {
    /// True when this is the recoverable not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Read access to the namespace-partitioned resource store
///
/// Implementations are expected to be stateless between calls; the resolvers
/// re-fetch on every request by design.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch a single object by kind, namespace and name
    async fn get(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<DynamicObject, StoreError>;

    /// List all objects of a kind in a namespace
    async fn list(
        &self,
        kind: &ResourceKind,
        namespace: &str,
    ) -> Result<Vec<DynamicObject>, StoreError>;

    /// List all objects of a kind across every namespace
    ///
    /// Only the cluster listing uses this; clusters are the one resource
    /// addressed without knowing a namespace up front.
    async fn list_all(&self, kind: &ResourceKind) -> Result<Vec<DynamicObject>, StoreError>;
}

/// Production store backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    /// Create a store over an authenticated client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, kind: &ResourceKind, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &kind.to_api_resource())
    }
}

#[async_trait]
impl ResourceStore for KubeStore {
    async fn get(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<DynamicObject, StoreError> {
        match self.api(kind, namespace).get(name).await {
            Ok(obj) => Ok(obj),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Err(StoreError::NotFound {
                kind: kind.kind,
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(StoreError::Api(e)),
        }
    }

    async fn list(
        &self,
        kind: &ResourceKind,
        namespace: &str,
    ) -> Result<Vec<DynamicObject>, StoreError> {
        match self
            .api(kind, namespace)
            .list(&ListParams::default())
            .await
        {
            Ok(objects) => Ok(objects.items),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Err(StoreError::NotFound {
                kind: kind.kind,
                namespace: namespace.to_string(),
                name: String::new(),
            }),
            Err(e) => Err(StoreError::Api(e)),
        }
    }

    async fn list_all(&self, kind: &ResourceKind) -> Result<Vec<DynamicObject>, StoreError> {
        let api: Api<DynamicObject> =
            Api::all_with(self.client.clone(), &kind.to_api_resource());
        match api.list(&ListParams::default()).await {
            Ok(objects) => Ok(objects.items),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Err(StoreError::NotFound {
                kind: kind.kind,
                namespace: String::new(),
                name: String::new(),
            }),
            Err(e) => Err(StoreError::Api(e)),
        }
    }
}
