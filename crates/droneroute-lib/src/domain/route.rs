//! Computed delivery routes and their canonical signature.

use std::fmt;

use serde::Serialize;

use crate::error::ConstructionError;
use crate::graph::EdgeId;
use crate::routing::RouteAlgorithm;

use super::element::VertexId;
use super::order::OrderId;

/// Numeric identifier of a stored route.
pub type RouteId = u64;

/// Canonical, order-preserving encoding of a vertex sequence (`W1->R2->C3`).
///
/// Used as the key of the frequency ranking tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RouteSignature(String);

impl RouteSignature {
    pub fn from_vertices(vertices: &[VertexId]) -> Self {
        let encoded = vertices
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("->");
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteSignature {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A route computed for an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: RouteId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderId>,
    pub origin: VertexId,
    pub destination: VertexId,
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
    pub total_weight: f64,
    pub algorithm: RouteAlgorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_micros: Option<u64>,
    pub recharge_stops: usize,
    pub signature: RouteSignature,
}

impl Route {
    /// Number of legs flown.
    pub fn hop_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Check the route against its declared endpoints and an optional weight ceiling.
    pub fn validate(&self, max_weight: Option<f64>) -> Result<(), ConstructionError> {
        let (Some(&first), Some(&last)) = (self.vertices.first(), self.vertices.last()) else {
            return Err(ConstructionError::EmptyRoute);
        };
        if first != self.origin {
            return Err(ConstructionError::EndpointMismatch {
                end: "origin",
                expected: self.origin,
                found: first,
            });
        }
        if last != self.destination {
            return Err(ConstructionError::EndpointMismatch {
                end: "destination",
                expected: self.destination,
                found: last,
            });
        }
        if !self.total_weight.is_finite() || self.total_weight < 0.0 {
            return Err(ConstructionError::InvalidWeight {
                weight: self.total_weight,
            });
        }
        if let Some(limit) = max_weight {
            if self.total_weight > limit {
                return Err(ConstructionError::WeightExceedsPolicy {
                    weight: self.total_weight,
                    limit,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(vertices: Vec<VertexId>, total_weight: f64) -> Route {
        Route {
            id: 1,
            order: None,
            origin: VertexId::warehouse(1),
            destination: VertexId::client(1),
            signature: RouteSignature::from_vertices(&vertices),
            vertices,
            edges: Vec::new(),
            total_weight,
            algorithm: RouteAlgorithm::Bfs,
            latency_micros: None,
            recharge_stops: 0,
        }
    }

    #[test]
    fn signature_preserves_order() {
        let forward = RouteSignature::from_vertices(&[
            VertexId::warehouse(1),
            VertexId::recharge_station(2),
            VertexId::client(3),
        ]);
        let reversed = RouteSignature::from_vertices(&[
            VertexId::client(3),
            VertexId::recharge_station(2),
            VertexId::warehouse(1),
        ]);
        assert_eq!(forward.as_str(), "W1->R2->C3");
        assert_ne!(forward, reversed);
    }

    #[test]
    fn validation_checks_endpoints_and_policy() {
        let ok = route(vec![VertexId::warehouse(1), VertexId::client(1)], 40.0);
        assert!(ok.validate(None).is_ok());
        assert!(matches!(
            ok.validate(Some(30.0)),
            Err(ConstructionError::WeightExceedsPolicy { .. })
        ));

        let wrong_end = route(vec![VertexId::warehouse(1), VertexId::client(2)], 10.0);
        assert!(matches!(
            wrong_end.validate(None),
            Err(ConstructionError::EndpointMismatch {
                end: "destination",
                ..
            })
        ));

        assert_eq!(
            route(Vec::new(), 0.0).validate(None),
            Err(ConstructionError::EmptyRoute)
        );
        assert_eq!(ok.hop_count(), 1);
    }
}
