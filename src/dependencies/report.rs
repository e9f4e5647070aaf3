use super::*;

/// Per-instruction line of a [`DepthReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstReport {
    pub index: usize,
    pub latency: Cycles,
    pub depth: Cycles,
    pub src1_dep: Option<usize>,
    pub src2_dep: Option<usize>,
}

/// Serializable summary of an analyzed trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthReport {
    pub instructions: Vec<InstReport>,
    pub program_depth: Cycles,
    pub critical_path: Vec<usize>,
}

impl DepthReport {
    pub fn new(depths: &DepthGraph) -> Self {
        let instructions = depths
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| InstReport {
                index,
                latency: entry.latency,
                depth: entry.depth,
                src1_dep: entry.deps.src1,
                src2_dep: entry.deps.src2,
            })
            .collect();

        DepthReport {
            instructions,
            program_depth: depths.program_depth(),
            critical_path: depths.critical_path(),
        }
    }
}
