//! HTTP API surface
//!
//! Thin axum layer over the resolvers: routes, response DTOs and the error
//! envelope. Handlers own the reporting the resolvers deliberately avoid,
//! skip records from list resolution are logged here, and classification tags
//! are mapped to HTTP status codes here and nowhere else.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{ClientError, ErrorKind};
use crate::resolve::{self, Cluster, ListOutcome, NodeGroup, Skipped};
use crate::store::ResourceStore;

/// Health probe response
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    /// Always true while the process serves traffic
    pub healthy: bool,
}

/// Wire representation of a cluster
#[derive(Debug, Serialize)]
pub struct ClusterResponse {
    /// Cluster name
    pub name: String,
    /// API server URL
    pub apiserver: String,
    /// Label-derived metadata
    pub metadata: ClusterMetadata,
    /// Control plane provider label
    pub kubeprovider: String,
    /// Infrastructure provider label
    pub infrastructureprovider: String,
}

/// Label-derived cluster metadata
#[derive(Debug, Serialize)]
pub struct ClusterMetadata {
    /// Cluster group label
    #[serde(rename = "clusterGroup")]
    pub cluster_group: String,
    /// Region label
    pub region: String,
    /// Environment label
    pub environment: String,
    /// Service network CIDR blocks
    #[serde(rename = "CIDR")]
    pub cidr: Vec<String>,
}

impl From<&Cluster> for ClusterResponse {
    fn from(cluster: &Cluster) -> Self {
        Self {
            name: cluster.name.clone(),
            apiserver: cluster.api_endpoint.clone(),
            metadata: ClusterMetadata {
                cluster_group: cluster.cluster_group.clone(),
                region: cluster.region.clone(),
                environment: cluster.environment.clone(),
                cidr: cluster.service_cidrs.clone(),
            },
            kubeprovider: cluster.control_plane.provider.clone(),
            infrastructureprovider: cluster.infrastructure.provider.clone(),
        }
    }
}

/// Wire representation of a list of clusters
#[derive(Debug, Serialize)]
pub struct ClusterListResponse {
    /// Clusters that resolved cleanly
    pub items: Vec<ClusterResponse>,
}

/// Wire representation of a node group
#[derive(Debug, Serialize)]
pub struct NodeGroupResponse {
    /// Short node group name
    pub name: String,
    /// Node group metadata
    pub metadata: NodeGroupMetadata,
    /// Infrastructure provider label
    pub infrastructureprovider: String,
}

/// Node group metadata, mixing group and owning-cluster attributes
#[derive(Debug, Serialize)]
pub struct NodeGroupMetadata {
    /// Owning cluster name
    pub cluster: String,
    /// Desired replica count
    pub replicas: Option<i32>,
    /// Cloud machine type
    pub machinetype: String,
    /// Availability zones
    pub zones: Vec<String>,
    /// Environment label of the owning cluster
    pub environment: String,
    /// Region label of the owning cluster
    pub region: String,
    /// Autoscaling lower bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    /// Autoscaling upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

/// Wire representation of a list of node groups
#[derive(Debug, Serialize)]
pub struct NodeGroupListResponse {
    /// Node groups that resolved cleanly
    pub items: Vec<NodeGroupResponse>,
}

fn node_group_response(cluster: &Cluster, group: &NodeGroup) -> NodeGroupResponse {
    NodeGroupResponse {
        name: group.name.clone(),
        metadata: NodeGroupMetadata {
            cluster: group.cluster.clone(),
            replicas: group.replicas,
            machinetype: group.infrastructure.machine_type.clone(),
            zones: group.infrastructure.az.clone(),
            environment: cluster.environment.clone(),
            region: cluster.region.clone(),
            min: group.infrastructure.min,
            max: group.infrastructure.max,
        },
        infrastructureprovider: group.infrastructure.provider.clone(),
    }
}

/// Error envelope returned on every failed request
#[derive(Debug, Serialize)]
pub struct ClientErrorResponse {
    /// Human-readable summary
    pub errormessage: String,
    /// Classification tag of the underlying error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errortype: Option<String>,
    /// HTTP status code, mirrored into the body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub httpcode: Option<u16>,
}

/// A handler-level failure: the resolver error plus the summary to expose
#[derive(Debug)]
pub struct ApiError {
    message: String,
    error: ClientError,
}

impl ApiError {
    fn new(error: ClientError, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error,
        }
    }
}

/// Status code for a classification tag
///
/// Misconfigured backing resources are still a server-reported failure; the
/// caller cannot fix them, so they map to 500 rather than a 4xx.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ResourceNotFound | ErrorKind::EmptyResponse => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.error.kind());
        let body = ClientErrorResponse {
            errormessage: self.message,
            errortype: Some(self.error.kind().as_str().to_string()),
            httpcode: Some(status.as_u16()),
        };
        (status, Json(body)).into_response()
    }
}

fn cluster_api_error(error: ClientError) -> ApiError {
    match error.kind() {
        ErrorKind::ResourceNotFound => ApiError::new(error, "Cluster not found"),
        ErrorKind::EmptyResponse => ApiError::new(error, "No clusters were found"),
        ErrorKind::InvalidConfiguration => {
            ApiError::new(error, "Cluster configuration is invalid")
        }
        _ => ApiError::new(error, "Unhandled Error"),
    }
}

fn node_group_api_error(error: ClientError) -> ApiError {
    match error.kind() {
        ErrorKind::ResourceNotFound => ApiError::new(error, "Node group not found"),
        ErrorKind::EmptyResponse => ApiError::new(error, "No node groups were found"),
        ErrorKind::InvalidResource => ApiError::new(error, "Node group resource is invalid"),
        ErrorKind::InvalidConfiguration => {
            ApiError::new(error, "Node group configuration is invalid")
        }
        _ => ApiError::new(error, "Unhandled Error"),
    }
}

fn report_skipped(what: &str, skipped: &[Skipped]) {
    for skip in skipped {
        warn!(resource = %skip.name, error = %skip.error, "skipping invalid {}", what);
    }
}

async fn healthcheck_handler() -> Json<HealthCheck> {
    Json(HealthCheck { healthy: true })
}

async fn cluster_handler<S: ResourceStore>(
    State(store): State<Arc<S>>,
    Path(name): Path<String>,
) -> Result<Json<ClusterResponse>, ApiError> {
    let cluster = resolve::get_cluster(store.as_ref(), &name)
        .await
        .map_err(|e| {
            error!(cluster = %name, error = %e, "error getting cluster");
            cluster_api_error(e)
        })?;

    Ok(Json(ClusterResponse::from(&cluster)))
}

async fn cluster_list_handler<S: ResourceStore>(
    State(store): State<Arc<S>>,
) -> Result<Json<ClusterListResponse>, ApiError> {
    let ListOutcome { items, skipped } =
        resolve::list_clusters(store.as_ref()).await.map_err(|e| {
            error!(error = %e, "error listing clusters");
            cluster_api_error(e)
        })?;
    report_skipped("cluster", &skipped);

    Ok(Json(ClusterListResponse {
        items: items.iter().map(ClusterResponse::from).collect(),
    }))
}

async fn node_group_handler<S: ResourceStore>(
    State(store): State<Arc<S>>,
    Path((cluster_name, node_group_name)): Path<(String, String)>,
) -> Result<Json<NodeGroupResponse>, ApiError> {
    let cluster = resolve::get_cluster(store.as_ref(), &cluster_name)
        .await
        .map_err(|e| {
            error!(cluster = %cluster_name, error = %e, "error getting cluster");
            cluster_api_error(e)
        })?;

    let group = resolve::get_node_group(store.as_ref(), &cluster_name, &node_group_name)
        .await
        .map_err(|e| {
            error!(
                cluster = %cluster_name,
                node_group = %node_group_name,
                error = %e,
                "error getting node group"
            );
            node_group_api_error(e)
        })?;

    Ok(Json(node_group_response(&cluster, &group)))
}

async fn node_group_list_handler<S: ResourceStore>(
    State(store): State<Arc<S>>,
    Path(cluster_name): Path<String>,
) -> Result<Json<NodeGroupListResponse>, ApiError> {
    let cluster = resolve::get_cluster(store.as_ref(), &cluster_name)
        .await
        .map_err(|e| {
            error!(cluster = %cluster_name, error = %e, "error getting cluster");
            cluster_api_error(e)
        })?;

    let ListOutcome { items, skipped } =
        resolve::list_node_groups(store.as_ref(), &cluster_name)
            .await
            .map_err(|e| {
                error!(cluster = %cluster_name, error = %e, "error listing node groups");
                node_group_api_error(e)
            })?;
    report_skipped("node group", &skipped);

    Ok(Json(NodeGroupListResponse {
        items: items
            .iter()
            .map(|group| node_group_response(&cluster, group))
            .collect(),
    }))
}

/// Build the API router
///
/// Routes:
/// - `GET /healthcheck` - liveness probe
/// - `GET /v1/clusters` - list clusters
/// - `GET /v1/clusters/{name}` - get one cluster
/// - `GET /v1/clusters/{name}/nodegroups` - list node groups of a cluster
/// - `GET /v1/clusters/{name}/nodegroup/{nodeGroupName}` - get one node group
pub fn router<S: ResourceStore + 'static>(store: Arc<S>) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck_handler))
        .route("/v1/clusters", get(cluster_list_handler::<S>))
        .route("/v1/clusters/{name}", get(cluster_handler::<S>))
        .route(
            "/v1/clusters/{name}/nodegroups",
            get(node_group_list_handler::<S>),
        )
        .route(
            "/v1/clusters/{name}/nodegroup/{nodeGroupName}",
            get(node_group_handler::<S>),
        )
        .with_state(store)
}
