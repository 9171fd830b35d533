// Analysis configuration

use crate::topology::Topology;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_TOP_N: usize = 20;
pub const DEFAULT_STRICT_BOTTLENECK_OUT_DEGREE: usize = 10;
pub const DEFAULT_PATHWAY_BOTTLENECK_OUT_DEGREE: usize = 5;
pub const DEFAULT_MAX_PATHWAY_HOPS: usize = 10;
pub const DEFAULT_HUB_PERCENTILE: f64 = 95.0;
pub const DEFAULT_OVERLOAD_FACTOR: f64 = 5.0;
pub const DEFAULT_DARK_MATTER_DEPTH: u32 = 3;
pub const DEFAULT_MAX_CONCURRENT_TASKS: usize = 6;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// How many HITS update passes to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HitsMode {
    /// One authority pass followed by one hub pass.
    #[default]
    SinglePass,
    /// Repeat passes until neither vector moves more than `tolerance`.
    Converge { max_iterations: usize, tolerance: f64 },
}

impl HitsMode {
    /// `1` keeps the single pass; anything larger converges with that cap.
    pub fn from_iterations(iterations: usize) -> Self {
        if iterations <= 1 {
            HitsMode::SinglePass
        } else {
            HitsMode::Converge {
                max_iterations: iterations,
                tolerance: 1e-6,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Length of every "top N" ranking in the report.
    pub top_n: usize,
    /// Out-degree a single-inbound page must exceed to be an antipattern bottleneck.
    pub strict_bottleneck_out_degree: usize,
    /// Out-degree for the broader bottleneck heuristic in the pathway section.
    pub pathway_bottleneck_out_degree: usize,
    pub max_pathway_hops: usize,
    pub hub_percentile: f64,
    pub overload_factor: f64,
    pub dark_matter_depth: u32,
    pub hits: HitsMode,
    pub expected_topology: Option<Topology>,
    pub max_concurrent_tasks: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            strict_bottleneck_out_degree: DEFAULT_STRICT_BOTTLENECK_OUT_DEGREE,
            pathway_bottleneck_out_degree: DEFAULT_PATHWAY_BOTTLENECK_OUT_DEGREE,
            max_pathway_hops: DEFAULT_MAX_PATHWAY_HOPS,
            hub_percentile: DEFAULT_HUB_PERCENTILE,
            overload_factor: DEFAULT_OVERLOAD_FACTOR,
            dark_matter_depth: DEFAULT_DARK_MATTER_DEPTH,
            hits: HitsMode::default(),
            expected_topology: None,
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENT_TASKS,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_hits(mut self, hits: HitsMode) -> Self {
        self.hits = hits;
        self
    }

    pub fn with_expected_topology(mut self, topology: Topology) -> Self {
        self.expected_topology = Some(topology);
        self
    }

    pub fn with_max_concurrent_tasks(mut self, tasks: usize) -> Self {
        self.max_concurrent_tasks = tasks;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_tasks == 0 {
            return Err(ConfigError::Invalid {
                field: "max_concurrent_tasks",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.hub_percentile) {
            return Err(ConfigError::Invalid {
                field: "hub_percentile",
                reason: format!("{} is outside 0..=100", self.hub_percentile),
            });
        }
        if let HitsMode::Converge {
            max_iterations,
            tolerance,
        } = self.hits
            && (max_iterations == 0 || tolerance < 0.0)
        {
            return Err(ConfigError::Invalid {
                field: "hits",
                reason: "max_iterations must be positive and tolerance non-negative"
                    .to_string(),
            });
        }
        Ok(())
    }
}
