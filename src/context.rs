//! Handle-style entry points over [`DepthGraph`].
//!
//! A [`ProgramContext`] is either ready (holding a built graph) or
//! uninitialized. Freeing a context drops its graph; every query on an
//! uninitialized or freed context fails with [`DflowError::InvalidContext`].
//! Instruction indices are signed here so that a negative index is reported
//! as out of range instead of being ruled out by the type.

use crate::config::AnalyzerConfig;
use crate::dependencies::{Cycles, DependencyPair, DepthGraph, Instruction, LatencyTable};
use crate::error::{DflowError, Result};
use std::convert::TryFrom;

/// Builds a ready context for `trace` with the default configuration.
pub fn analyze_prog(
    latencies: &LatencyTable,
    trace: &[Instruction],
    n: usize,
) -> Result<ProgramContext> {
    ProgramContext::analyze(latencies, trace, n, &AnalyzerConfig::default())
}

#[derive(Debug, Default)]
pub struct ProgramContext {
    graph: Option<DepthGraph>,
}

impl ProgramContext {
    pub fn analyze(
        latencies: &LatencyTable,
        trace: &[Instruction],
        n: usize,
        config: &AnalyzerConfig,
    ) -> Result<Self> {
        let graph = DepthGraph::build_with(latencies, trace, n, config)?;
        Ok(ProgramContext::from(graph))
    }

    pub fn is_ready(&self) -> bool {
        self.graph.is_some()
    }

    /// Releases the graph. Calling it again is a no-op.
    pub fn free(&mut self) {
        self.graph = None;
    }

    pub fn graph(&self) -> Result<&DepthGraph> {
        self.graph.as_ref().ok_or(DflowError::InvalidContext)
    }

    pub fn inst_depth(&self, inst: i64) -> Result<Cycles> {
        let graph = self.graph()?;
        graph.depth_of(checked_index(graph, inst)?)
    }

    pub fn inst_deps(&self, inst: i64) -> Result<DependencyPair> {
        let graph = self.graph()?;
        graph.dependencies_of(checked_index(graph, inst)?)
    }

    pub fn prog_depth(&self) -> Result<Cycles> {
        self.graph().map(DepthGraph::program_depth)
    }
}

impl From<DepthGraph> for ProgramContext {
    fn from(graph: DepthGraph) -> Self {
        ProgramContext { graph: Some(graph) }
    }
}

fn checked_index(graph: &DepthGraph, inst: i64) -> Result<usize> {
    usize::try_from(inst)
        .ok()
        .filter(|&index| index < graph.len())
        .ok_or(DflowError::IndexOutOfRange {
            index: inst,
            len: graph.len(),
        })
}
