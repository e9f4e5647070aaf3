use super::*;
use crate::config::AnalyzerConfig;
use crate::error::{DflowError, Result};
use rayon::prelude::*;

/// Resolved dependencies and timing of a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthEntry {
    pub deps: DependencyPair,
    pub latency: Cycles,
    /// Earliest cycle at which all inputs are ready
    pub depth: Cycles,
}

impl DepthEntry {
    /// Cycle at which the instruction's result becomes available.
    ///
    /// Entries of a built [`DepthGraph`] are checked to fit in [`Cycles`].
    pub fn completion(&self) -> Cycles {
        self.depth + self.latency
    }
}

/// Data-flow depth of every instruction in a trace.
///
/// Entries are stored densely in program order. Dependencies only ever point
/// to smaller indices, so the graph is acyclic and a single forward pass is
/// enough to compute all depths. The graph is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthGraph {
    entries: Vec<DepthEntry>,
}

impl DepthGraph {
    /// Builds the graph with the default [`AnalyzerConfig`].
    ///
    /// `n` must equal the trace length.
    pub fn build(latencies: &LatencyTable, trace: &[Instruction], n: usize) -> Result<Self> {
        Self::build_with(latencies, trace, n, &AnalyzerConfig::default())
    }

    pub fn build_with(
        latencies: &LatencyTable,
        trace: &[Instruction],
        n: usize,
        config: &AnalyzerConfig,
    ) -> Result<Self> {
        if n != trace.len() {
            return Err(DflowError::CountMismatch {
                expected: n,
                actual: trace.len(),
            });
        }

        let instruction_latencies = trace
            .iter()
            .enumerate()
            .map(|(index, inst)| {
                latencies
                    .get(inst.opcode)
                    .ok_or(DflowError::UnknownOpcode {
                        index,
                        opcode: inst.opcode,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        // Resolution of one instruction never looks at another's result
        let dependencies: Vec<DependencyPair> = if config.resolve_in_parallel(n) {
            (0..n).into_par_iter().map(|i| resolve(trace, i)).collect()
        } else {
            (0..n).map(|i| resolve(trace, i)).collect()
        };

        // Forward pass in program order: every producer is final before use
        let mut entries: Vec<DepthEntry> = Vec::with_capacity(n);
        for (index, (deps, latency)) in dependencies
            .into_iter()
            .zip(instruction_latencies)
            .enumerate()
        {
            let mut depth: Cycles = 0;
            for (_, dep) in deps.iter() {
                assert!(
                    dep < index,
                    "instruction {} depends on later instruction {}",
                    index,
                    dep
                );
                depth = depth.max(entries[dep].completion());
            }

            // Every later query adds depth and latency
            if depth.checked_add(latency).is_none() {
                return Err(DflowError::DepthOverflow { index });
            }

            entries.push(DepthEntry {
                deps,
                latency,
                depth,
            });
        }

        Ok(DepthGraph { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DepthEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Result<&DepthEntry> {
        self.entries
            .get(index)
            .ok_or(DflowError::IndexOutOfRange {
                index: index as i64,
                len: self.entries.len(),
            })
    }

    pub fn depth_of(&self, index: usize) -> Result<Cycles> {
        self.entry(index).map(|e| e.depth)
    }

    pub fn dependencies_of(&self, index: usize) -> Result<DependencyPair> {
        self.entry(index).map(|e| e.deps)
    }

    /// Length of the longest dependency chain, 0 for an empty program.
    pub fn program_depth(&self) -> Cycles {
        self.entries
            .iter()
            .map(DepthEntry::completion)
            .max()
            .unwrap_or(0)
    }

    /// Instructions of one longest dependency chain, in program order.
    ///
    /// The chain ends at the earliest instruction with maximal completion
    /// time and follows, at every step, a producer whose completion equals
    /// the consumer's depth (src1 first). The latencies along the chain add
    /// up to [`program_depth`](Self::program_depth).
    pub fn critical_path(&self) -> Vec<usize> {
        let mut last: Option<(usize, Cycles)> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            match last {
                Some((_, completion)) if completion >= entry.completion() => (),
                _ => last = Some((index, entry.completion())),
            }
        }

        let mut current = match last {
            Some((index, _)) => index,
            None => return Vec::new(),
        };

        let mut path = vec![current];
        loop {
            let entry = &self.entries[current];
            let producer = entry
                .deps
                .iter()
                .map(|(_, dep)| dep)
                .find(|&dep| self.entries[dep].completion() == entry.depth);

            match producer {
                Some(dep) => {
                    path.push(dep);
                    current = dep;
                }
                None => break,
            }
        }

        path.reverse();
        path
    }
}
