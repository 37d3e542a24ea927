//! Structured audit events emitted by the simulation.
//!
//! Every state change at the orchestrator boundary becomes one
//! [`SimulationEvent`]. Events are mirrored to `tracing` and the most recent
//! ones are kept in a bounded [`EventLog`].

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{OrderId, Priority, RouteId, VertexId};
use crate::routing::RouteAlgorithm;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    RunStarted {
        vertices: usize,
        edges: usize,
        orders: usize,
        attempts: usize,
    },
    NetworkAttemptFailed {
        attempt: usize,
        reason: String,
    },
    RunFailed {
        attempts: usize,
        reason: String,
    },
    OrderCreated {
        order: OrderId,
        origin: VertexId,
        destination: VertexId,
        priority: Priority,
    },
    CreationRejected {
        entity: String,
        reason: String,
    },
    RouteComputed {
        order: OrderId,
        route: RouteId,
        algorithm: RouteAlgorithm,
        weight: f64,
        recharge_stops: usize,
        latency_micros: u64,
    },
    RouteFailed {
        order: OrderId,
        algorithm: RouteAlgorithm,
        reason: String,
    },
    OrderDelivered {
        order: OrderId,
    },
    Reset,
}

impl SimulationEvent {
    /// Short machine-friendly name.
    pub fn name(&self) -> &'static str {
        match self {
            SimulationEvent::RunStarted { .. } => "run_started",
            SimulationEvent::NetworkAttemptFailed { .. } => "network_attempt_failed",
            SimulationEvent::RunFailed { .. } => "run_failed",
            SimulationEvent::OrderCreated { .. } => "order_created",
            SimulationEvent::CreationRejected { .. } => "creation_rejected",
            SimulationEvent::RouteComputed { .. } => "route_computed",
            SimulationEvent::RouteFailed { .. } => "route_failed",
            SimulationEvent::OrderDelivered { .. } => "order_delivered",
            SimulationEvent::Reset => "reset",
        }
    }

    fn is_failure(&self) -> bool {
        matches!(
            self,
            SimulationEvent::NetworkAttemptFailed { .. }
                | SimulationEvent::RunFailed { .. }
                | SimulationEvent::CreationRejected { .. }
                | SimulationEvent::RouteFailed { .. }
        )
    }
}

/// An event stamped with its sequence number, time and run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub seq: u64,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<u64>,
    #[serde(flatten)]
    pub event: SimulationEvent,
}

/// Ring buffer of the most recent events.
#[derive(Debug, Clone)]
pub struct EventLog {
    capacity: usize,
    records: VecDeque<EventRecord>,
    next_seq: u64,
    dropped: u64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(1024)),
            next_seq: 1,
            dropped: 0,
        }
    }

    /// Record an event and mirror it to the tracing subscriber.
    pub fn emit(&mut self, run_id: Option<u64>, event: SimulationEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;

        if event.is_failure() {
            warn!(seq, run_id, event = event.name(), details = ?event, "simulation event");
        } else {
            info!(seq, run_id, event = event.name(), "simulation event");
        }

        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
            self.dropped += 1;
        }
        self.records.push_back(EventRecord {
            seq,
            at: Utc::now(),
            run_id,
            event,
        });
    }

    /// Retained events, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Events evicted to stay within capacity.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
