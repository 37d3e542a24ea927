//! Simulation configuration.
//!
//! Configuration is loaded from JSON (every field optional, defaults below)
//! and must pass [`SimulationConfig::validate`] before a run is started.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::GraphMode;
use crate::path::SearchLimits;

/// Top-level settings for a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Energy a drone can spend between two recharges.
    pub autonomy: f64,
    /// Seed for reproducible runs; entropy is used when absent.
    pub seed: Option<u64>,
    pub network: NetworkConfig,
    pub search: SearchLimits,
    /// Routes heavier than this are rejected.
    pub max_route_weight: Option<f64>,
    /// Network construction attempts before `initialize` gives up.
    pub max_build_attempts: usize,
    /// Number of audit events kept in memory.
    pub event_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            autonomy: 100.0,
            seed: None,
            network: NetworkConfig::default(),
            search: SearchLimits::default(),
            max_route_weight: None,
            max_build_attempts: 5,
            event_capacity: 256,
        }
    }
}

impl SimulationConfig {
    /// Read a JSON configuration file. The result is validated.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every setting.
    pub fn validate(&self) -> Result<()> {
        if !self.autonomy.is_finite() || self.autonomy <= 0.0 {
            return Err(invalid(format!(
                "autonomy must be finite and positive, got {}",
                self.autonomy
            )));
        }
        if let Some(limit) = self.max_route_weight {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(invalid(format!(
                    "max_route_weight must be finite and positive, got {limit}"
                )));
            }
        }
        if self.max_build_attempts == 0 {
            return Err(invalid("max_build_attempts must be at least 1"));
        }
        if self.search.max_iterations == 0 || self.search.max_path_length == 0 {
            return Err(invalid("search limits must be at least 1"));
        }
        if !self.search.revisit_tolerance.is_finite() || self.search.revisit_tolerance < 0.0 {
            return Err(invalid(format!(
                "revisit_tolerance must be finite and non-negative, got {}",
                self.search.revisit_tolerance
            )));
        }
        self.network.validate(self.autonomy)
    }
}

/// Settings for the random network constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub mode: GraphMode,
    pub min_edge_weight: f64,
    pub max_edge_weight: f64,
    /// Share of vertices that become warehouses.
    pub warehouse_ratio: f64,
    /// Share of vertices that become recharge stations.
    pub recharge_ratio: f64,
    pub max_vertices: usize,
    pub max_edges: usize,
    /// Random candidates drawn per requested edge before growth gives up.
    pub draws_per_edge: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mode: GraphMode::Undirected,
            min_edge_weight: 5.0,
            max_edge_weight: 60.0,
            warehouse_ratio: 0.2,
            recharge_ratio: 0.2,
            max_vertices: 400,
            max_edges: 4000,
            draws_per_edge: 50,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self, autonomy: f64) -> Result<()> {
        let weights_ok = self.min_edge_weight.is_finite()
            && self.max_edge_weight.is_finite()
            && self.min_edge_weight >= 0.0
            && self.min_edge_weight <= self.max_edge_weight;
        if !weights_ok {
            return Err(invalid(format!(
                "edge weights must satisfy 0 <= min <= max, got {}..{}",
                self.min_edge_weight, self.max_edge_weight
            )));
        }
        if self.min_edge_weight > autonomy {
            return Err(invalid(format!(
                "min_edge_weight {} exceeds autonomy {autonomy}; no edge could be flown",
                self.min_edge_weight
            )));
        }

        for (name, ratio) in [
            ("warehouse_ratio", self.warehouse_ratio),
            ("recharge_ratio", self.recharge_ratio),
        ] {
            if !(0.0..1.0).contains(&ratio) {
                return Err(invalid(format!("{name} must be in [0, 1), got {ratio}")));
            }
        }
        if self.warehouse_ratio + self.recharge_ratio >= 1.0 {
            return Err(invalid("warehouse_ratio + recharge_ratio must leave room for clients"));
        }

        if self.max_vertices < 3 || self.max_edges < 2 || self.draws_per_edge == 0 {
            return Err(invalid("network caps are too small to build a network"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfig {
        message: message.into(),
    }
}
