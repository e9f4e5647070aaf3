use crate::error::Result;
use std::{fs::File, io, path::Path};

/// Tuning knobs for building a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Traces with at least this many instructions resolve their
    /// dependencies on the rayon thread pool.
    pub parallel_threshold: usize,
}

impl AnalyzerConfig {
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

    pub fn sequential() -> Self {
        AnalyzerConfig {
            parallel_threshold: usize::MAX,
        }
    }

    pub fn parallel() -> Self {
        AnalyzerConfig {
            parallel_threshold: 0,
        }
    }

    /// Reads a JSON config; missing fields keep their defaults.
    pub fn from_reader<R>(reader: R) -> Result<Self>
    where
        R: io::Read,
    {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    pub fn resolve_in_parallel(&self, instructions: usize) -> bool {
        instructions >= self.parallel_threshold
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
