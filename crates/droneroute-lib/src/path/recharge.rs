use tracing::debug;

use crate::domain::VertexId;
use crate::error::{Error, Result};
use crate::graph::{Graph, Neighbour};

use super::{EnergyBudget, ENERGY_EPSILON};

/// Make a vertex sequence flyable by adding recharge stops.
///
/// The sequence is flown leg by leg. When the next leg does not fit in the
/// remaining energy at `u`, the recharge stations adjacent to `u` are tried
/// nearest first: the drone either continues from the station straight to
/// the next vertex, or returns to `u` with a full battery and resumes.
/// Fails with [`Error::RechargeUnavailable`] when no station helps.
pub fn insert_recharge_stops(
    graph: &Graph,
    budget: &EnergyBudget,
    vertices: &[VertexId],
) -> Result<Vec<VertexId>> {
    let Some(&first) = vertices.first() else {
        return Ok(Vec::new());
    };

    let mut output = vec![first];
    let mut remaining = budget.autonomy;

    for pair in vertices.windows(2) {
        let (u, v) = (pair[0], pair[1]);
        let weight = leg_weight(graph, u, v)?;

        if let Some(energy) = budget.fly(remaining, weight, v) {
            output.push(v);
            remaining = energy;
            continue;
        }

        let (detour, energy) = recharge_detour(graph, budget, remaining, u, v, weight)
            .ok_or(Error::RechargeUnavailable { at: u })?;
        debug!(at = %u, next = %v, stops = ?detour, "inserted recharge stop");
        output.extend(detour);
        output.push(v);
        remaining = energy;
    }

    Ok(output)
}

fn leg_weight(graph: &Graph, u: VertexId, v: VertexId) -> Result<f64> {
    graph
        .edge_between(u, v)
        .map(|edge| edge.weight)
        .ok_or_else(|| Error::RouteValidation {
            message: format!("no edge between {u} and {v}"),
        })
}

/// Vertices to insert between `u` and `v`, and the energy left on reaching `v`.
fn recharge_detour(
    graph: &Graph,
    budget: &EnergyBudget,
    remaining: f64,
    u: VertexId,
    v: VertexId,
    weight: f64,
) -> Option<(Vec<VertexId>, f64)> {
    let mut stations: Vec<Neighbour> = graph
        .neighbours(u)
        .filter(|neighbour| budget.is_recharge(neighbour.vertex))
        .filter(|neighbour| neighbour.weight <= remaining + ENERGY_EPSILON)
        .collect();
    stations.sort_by(|a, b| a.weight.total_cmp(&b.weight));

    for station in stations {
        let r = station.vertex;
        if r == v {
            continue;
        }
        if let Some(onward) = graph.edge_between(r, v) {
            if let Some(energy) = budget.fly(budget.autonomy, onward.weight, v) {
                return Some((vec![r], energy));
            }
        }
        if let Some(back) = graph.edge_between(r, u) {
            let Some(at_u) = budget.fly(budget.autonomy, back.weight, u) else {
                continue;
            };
            if let Some(energy) = budget.fly(at_u, weight, v) {
                return Some((vec![r, u], energy));
            }
        }
    }
    None
}
