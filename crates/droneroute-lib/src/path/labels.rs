//! Pareto label bookkeeping for cost-minimising searches under an energy budget.
//!
//! A label is a partial path summarised by (cost so far, energy left). At a
//! given vertex, a label is useless if another label is no more expensive
//! and carries at least as much energy. Keeping only non-dominated labels
//! makes the cheapest *feasible* path discoverable even when the cheapest
//! raw path runs out of energy.

use std::collections::HashMap;

use crate::domain::VertexId;

use super::ENERGY_EPSILON;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Label {
    pub vertex: VertexId,
    pub cost: f64,
    pub energy: f64,
    pub parent: Option<usize>,
    pub alive: bool,
}

#[derive(Debug, Default)]
pub(crate) struct LabelArena {
    labels: Vec<Label>,
    frontier: HashMap<VertexId, Vec<usize>>,
}

impl LabelArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, index: usize) -> Label {
        self.labels[index]
    }

    /// Insert a label unless an existing one dominates it. Labels the new
    /// one dominates are retired. Returns the new label index.
    pub(crate) fn offer(
        &mut self,
        vertex: VertexId,
        cost: f64,
        energy: f64,
        parent: Option<usize>,
    ) -> Option<usize> {
        let labels = &mut self.labels;
        let frontier = self.frontier.entry(vertex).or_default();

        let dominated = frontier.iter().any(|&index| {
            let existing = labels[index];
            existing.cost <= cost + ENERGY_EPSILON && existing.energy + ENERGY_EPSILON >= energy
        });
        if dominated {
            return None;
        }

        frontier.retain(|&index| {
            let existing = &mut labels[index];
            let beaten =
                cost <= existing.cost + ENERGY_EPSILON && energy + ENERGY_EPSILON >= existing.energy;
            if beaten {
                existing.alive = false;
            }
            !beaten
        });

        let index = labels.len();
        labels.push(Label {
            vertex,
            cost,
            energy,
            parent,
            alive: true,
        });
        frontier.push(index);
        Some(index)
    }

    /// Live labels currently held at `vertex`, in creation order.
    pub(crate) fn at(&self, vertex: VertexId) -> Vec<usize> {
        self.frontier.get(&vertex).cloned().unwrap_or_default()
    }

    /// Vertex sequence leading to the label.
    pub(crate) fn trace(&self, mut index: usize) -> Vec<VertexId> {
        let mut path = Vec::new();
        loop {
            let label = self.labels[index];
            path.push(label.vertex);
            match label.parent {
                Some(parent) => index = parent,
                None => break,
            }
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominated_labels_are_rejected_and_retired() {
        let vertex = VertexId::client(1);
        let mut arena = LabelArena::new();

        let first = arena.offer(vertex, 10.0, 20.0, None).unwrap();
        assert!(arena.offer(vertex, 12.0, 15.0, None).is_none());

        // Costlier but with more energy: both survive.
        let second = arena.offer(vertex, 14.0, 40.0, None).unwrap();
        assert_eq!(arena.at(vertex), vec![first, second]);

        // Cheaper and fuller than both: replaces them.
        let third = arena.offer(vertex, 8.0, 45.0, None).unwrap();
        assert_eq!(arena.at(vertex), vec![third]);
        assert!(!arena.get(first).alive);
        assert!(!arena.get(second).alive);
    }
}
