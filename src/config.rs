//! Pipeline configuration
//!
//! A YAML document naming the seeds of a study, the synthetic edges to inject
//! when merging, and the analysis and enrichment knobs. Every field has a
//! default, so an empty document is valid.

use crate::algo::AnalysisOptions;
use crate::enrich::EnrichmentConfig;
use crate::graph::EntityId;
use crate::merge::SyntheticEdge;
use crate::record::RecordFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A seed entity and the display label used for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub id: EntityId,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub seeds: Vec<Seed>,
    /// Nodes flagged in reports; defaults to the seed ids when empty
    pub main_nodes: Vec<EntityId>,
    pub synthetic_edges: Vec<SyntheticEdge>,
    pub top_degree: usize,
    pub top_betweenness: usize,
    pub top_predicates: usize,
    pub enrichment: EnrichmentConfig,
    pub filter: RecordFilter,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let options = AnalysisOptions::default();
        PipelineConfig {
            seeds: Vec::new(),
            main_nodes: Vec::new(),
            synthetic_edges: Vec::new(),
            top_degree: options.top_degree,
            top_betweenness: options.top_betweenness,
            top_predicates: options.top_predicates,
            enrichment: EnrichmentConfig::default(),
            filter: RecordFilter::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        if text.trim().is_empty() {
            return Ok(PipelineConfig::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        debug!(
            "Loaded {} ({} seeds, {} synthetic edges)",
            path.display(),
            config.seeds.len(),
            config.synthetic_edges.len()
        );
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn main_nodes(&self) -> Vec<EntityId> {
        if self.main_nodes.is_empty() {
            self.seeds.iter().map(|s| s.id.clone()).collect()
        } else {
            self.main_nodes.clone()
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            top_degree: self.top_degree,
            top_betweenness: self.top_betweenness,
            top_predicates: self.top_predicates,
            main_nodes: self.main_nodes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimension;

    const SAMPLE: &str = r#"
seeds:
  - id: Q2408955
    label: Qoyllur Rit'i
  - id: Q60643381
synthetic_edges:
  - source: Q2408955
    target: Q60643381
    property_id: P361
    property_label: parte de
    dimension: Relational
top_degree: 5
enrichment:
  max_nodes_per_query: 4
"#;

    #[test]
    fn test_parse_sample() {
        let config = PipelineConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.seeds.len(), 2);
        assert_eq!(config.seeds[1].label, "");
        assert_eq!(config.synthetic_edges[0].dimension, Some(Dimension::Relational));
        assert_eq!(config.enrichment.max_nodes_per_query, 4);
        // Unset nested fields keep their defaults
        assert_eq!(config.enrichment.centrality_threshold, 0.01);
        assert!(config.filter.relevant_types.contains("Q200538"));

        let options = config.analysis_options();
        assert_eq!(options.top_degree, 5);
        assert_eq!(options.top_betweenness, 10);
        assert_eq!(options.main_nodes, vec![EntityId::new("Q2408955"), EntityId::new("Q60643381")]);
    }

    #[test]
    fn test_empty_document() {
        let config = PipelineConfig::from_yaml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = PipelineConfig::from_yaml_str("seeds: 3").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PipelineConfig::load("/nonexistent/kgmerge.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = PipelineConfig::from_yaml_str(SAMPLE).unwrap();
        let text = config.to_yaml_string().unwrap();
        assert_eq!(PipelineConfig::from_yaml_str(&text).unwrap(), config);
    }
}
