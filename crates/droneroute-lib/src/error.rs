use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{ElementKind, OrderId, VertexId};
use crate::routing::RouteAlgorithm;

/// Convenient result alias for the drone routing library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a configuration value fails validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when an algorithm name is not part of the supported set.
    #[error("unknown routing algorithm: {name}{}", format_known(.known))]
    UnknownAlgorithm {
        name: String,
        known: Vec<&'static str>,
    },

    /// Raised when no energy-feasible route connects the two vertices.
    #[error("no route found between {origin} and {destination} using {algorithm}")]
    RouteNotFound {
        origin: VertexId,
        destination: VertexId,
        algorithm: RouteAlgorithm,
    },

    /// Raised when the recharge insertion pass cannot find a station to divert to.
    #[error("no adjacent recharge station reachable from {at}")]
    RechargeUnavailable { at: VertexId },

    /// Raised when an algorithm is asked to run on a graph shape it cannot handle.
    #[error("{algorithm} cannot run on this graph: {reason}")]
    UnsupportedGraph {
        algorithm: RouteAlgorithm,
        reason: String,
    },

    /// Raised when a computed route fails the route policy.
    #[error("route rejected: {message}")]
    RouteValidation { message: String },

    /// Raised when the requested vertex count cannot hold every role.
    #[error("network needs at least {minimum} vertices, got {vertices}")]
    NetworkTooSmall { vertices: usize, minimum: usize },

    /// Raised when the requested edge count is outside what the vertex count allows.
    #[error("cannot build {requested} edges; allowed range is {minimum}..={maximum}")]
    EdgeTargetInfeasible {
        requested: usize,
        minimum: usize,
        maximum: usize,
    },

    /// Raised when the candidate edges within autonomy cannot span every vertex.
    #[error("spanning skeleton is disconnected: {components} components remain")]
    Disconnected { components: usize },

    /// Raised when warehouse/client pairs stay unreachable under the autonomy constraint.
    #[error("{infeasible} warehouse/client pairs have no energy-feasible path")]
    SegmentationInvalid { infeasible: usize },

    /// Raised when random edge growth gives up before the requested count.
    #[error("stopped at {reached} of {requested} edges after {draws} candidate draws")]
    EdgeTargetUnreachable {
        requested: usize,
        reached: usize,
        draws: usize,
    },

    /// Raised when every network construction attempt failed.
    #[error("network construction failed after {attempts} attempts: {last}")]
    NetworkBuildFailed { attempts: usize, last: Box<Error> },

    /// Raised when an operation references a vertex that is not in the graph.
    #[error("unknown vertex {vertex}")]
    UnknownVertex { vertex: VertexId },

    /// Raised when an operation references an order that does not exist.
    #[error("unknown order {id}")]
    UnknownOrder { id: OrderId },

    /// Raised when an order cannot move to the requested status.
    #[error("order {id} cannot be {action} while {status}")]
    InvalidOrderTransition {
        id: OrderId,
        action: &'static str,
        status: &'static str,
    },

    /// Raised when an edge weight is negative or not finite.
    #[error("invalid edge weight {weight} between {source_vertex} and {target_vertex}")]
    InvalidWeight {
        source_vertex: VertexId,
        target_vertex: VertexId,
        weight: f64,
    },

    /// Raised when an edge would connect a vertex to itself.
    #[error("self-loop on {vertex} is not allowed")]
    SelfLoop { vertex: VertexId },

    /// Raised when a second canonical instance would be created for a key.
    #[error("duplicate {kind} identity {id}")]
    DuplicateIdentity { kind: ElementKind, id: u32 },

    /// Raised when an operation needs an initialised run.
    #[error("no simulation run is active; call initialize first")]
    NoActiveRun,

    /// Raised when the run changed between planning and recording a route.
    #[error("run {expected} was replaced by run {current} while planning")]
    RunReplaced { expected: u64, current: u64 },

    /// Raised when a shared simulation lock was poisoned by a panicking writer.
    #[error("simulation state lock was poisoned")]
    LockPoisoned,

    /// Raised when a configuration file cannot be read.
    #[error("failed to read configuration from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_known(known: &[&'static str]) -> String {
    if known.is_empty() {
        String::new()
    } else {
        format!(". Expected one of: {}", known.join(", "))
    }
}

impl Error {
    /// Whether this error is the expected "no feasible route" outcome.
    pub fn is_route_not_found(&self) -> bool {
        matches!(
            self,
            Error::RouteNotFound { .. } | Error::RechargeUnavailable { .. }
        )
    }
}

/// Precondition failures raised while constructing an entity.
///
/// Factories record these in their audit trail and hand back `None`
/// instead of propagating them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    #[error("order origin {origin} is not a warehouse")]
    OriginNotWarehouse { origin: VertexId },

    #[error("order destination {destination} is not a client")]
    DestinationNotClient { destination: VertexId },

    #[error("vertex {vertex} is not part of the network")]
    UnknownVertex { vertex: VertexId },

    #[error("{kind} name must not be empty")]
    EmptyName { kind: ElementKind },

    #[error("route has no vertices")]
    EmptyRoute,

    #[error("route {end} should be {expected} but is {found}")]
    EndpointMismatch {
        end: &'static str,
        expected: VertexId,
        found: VertexId,
    },

    #[error("route weight {weight} exceeds the policy limit {limit}")]
    WeightExceedsPolicy { weight: f64, limit: f64 },

    #[error("route weight {weight} is not a finite non-negative number")]
    InvalidWeight { weight: f64 },
}
