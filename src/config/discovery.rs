use crate::error::EvoSearchError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning knobs for one discovery run.
///
/// `score_ascend_descend` carries one flag per objective, in declared order:
/// `true` means larger scores are better for that dimension, `false` means
/// smaller is better. Every score vector produced by the host must have
/// exactly this length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryOptions {
    pub generation_size: usize,
    pub max_iterations: usize,
    pub score_ascend_descend: Vec<bool>,
    pub min_best_count: usize,
    pub std_dev_multiplier: f64,
    pub seed: Option<u64>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            generation_size: 100,
            max_iterations: 1000,
            score_ascend_descend: vec![true],
            min_best_count: 3,
            std_dev_multiplier: 0.0,
            seed: None,
        }
    }
}

impl DiscoveryOptions {
    pub fn validate(&self) -> Result<(), EvoSearchError> {
        if self.generation_size == 0 {
            return Err(EvoSearchError::Configuration(
                "Generation size must be greater than zero".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(EvoSearchError::Configuration(
                "Max iterations must be greater than zero".to_string(),
            ));
        }
        if self.score_ascend_descend.is_empty() {
            return Err(EvoSearchError::Configuration(
                "At least one score dimension must be declared".to_string(),
            ));
        }
        if self.min_best_count == 0 {
            return Err(EvoSearchError::Configuration(
                "Min best count must be greater than zero".to_string(),
            ));
        }
        if self.std_dev_multiplier < 0.0 {
            return Err(EvoSearchError::Configuration(
                "Std dev multiplier must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EvoSearchError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EvoSearchError::Configuration(format!("Failed to read config: {}", e)))?;

        let options: DiscoveryOptions = toml::from_str(&contents)
            .map_err(|e| EvoSearchError::Configuration(format!("Failed to parse config: {}", e)))?;

        options.validate()?;
        Ok(options)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvoSearchError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| EvoSearchError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| EvoSearchError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
