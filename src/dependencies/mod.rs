//! Read-after-write dependency analysis for linear instruction traces.
//!
//! Every instruction reads at most two source registers and writes one
//! destination register. [`resolve`] finds the most recent earlier writer of
//! each source, and [`DepthGraph`] turns those links into data-flow depths:
//! the earliest cycle at which an instruction's inputs are ready.

mod deps;
mod depth;
mod graph;
mod report;
mod trace_parser;

pub use self::deps::resolve;
pub use self::depth::{DepthEntry, DepthGraph};
pub use self::graph::{print_graph, to_graph, InstNode};
pub use self::report::{DepthReport, InstReport};
pub use self::trace_parser::{load_program, read_latencies, read_trace};

use std::iter::FromIterator;

pub type Opcode = u32;
pub type Register = u32;
pub type Cycles = u32;

/// One entry of the instruction trace.
///
/// An absent source operand is `None`, so no destination register can ever
/// be mistaken for "no operand".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub dst: Register,
    pub src1: Option<Register>,
    pub src2: Option<Register>,
}

impl Instruction {
    pub fn new(
        opcode: Opcode,
        dst: Register,
        src1: Option<Register>,
        src2: Option<Register>,
    ) -> Self {
        Instruction {
            opcode,
            dst,
            src1,
            src2,
        }
    }
}

/// Source operand slot of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Src1,
    Src2,
}

/// Producers of the two source operands of an instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyPair {
    pub src1: Option<usize>,
    pub src2: Option<usize>,
}

impl DependencyPair {
    pub fn new(src1: Option<usize>, src2: Option<usize>) -> Self {
        DependencyPair { src1, src2 }
    }

    pub fn is_empty(&self) -> bool {
        self.src1.is_none() && self.src2.is_none()
    }

    /// Resolved dependencies with the operand slot they feed, src1 first.
    pub fn iter(&self) -> impl Iterator<Item = (Operand, usize)> {
        let src1 = self.src1.map(|d| (Operand::Src1, d));
        let src2 = self.src2.map(|d| (Operand::Src2, d));
        src1.into_iter().chain(src2)
    }

    /// Pair in the `-1 = none` encoding used by trace tooling.
    pub fn as_raw(&self) -> (i64, i64) {
        let raw = |d: Option<usize>| d.map_or(-1, |d| d as i64);
        (raw(self.src1), raw(self.src2))
    }
}

/// Execution latency in cycles, indexed by opcode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyTable(Vec<Cycles>);

impl LatencyTable {
    pub fn new(latencies: Vec<Cycles>) -> Self {
        LatencyTable(latencies)
    }

    pub fn get(&self, opcode: Opcode) -> Option<Cycles> {
        self.0.get(opcode as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Cycles> for LatencyTable {
    fn from_iter<I: IntoIterator<Item = Cycles>>(iter: I) -> Self {
        LatencyTable(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_iterates_src1_first() {
        let pair = DependencyPair::new(Some(4), Some(2));
        let deps: Vec<_> = pair.iter().collect();
        assert_eq!(deps, vec![(Operand::Src1, 4), (Operand::Src2, 2)]);
    }

    #[test]
    fn pair_raw_encoding_uses_minus_one() {
        assert_eq!(DependencyPair::new(None, Some(3)).as_raw(), (-1, 3));
        assert_eq!(DependencyPair::default().as_raw(), (-1, -1));
        assert!(DependencyPair::default().is_empty());
    }

    #[test]
    fn latency_lookup_outside_table_is_none() {
        let table: LatencyTable = vec![1, 2].into_iter().collect();
        assert_eq!(table.get(1), Some(2));
        assert_eq!(table.get(2), None);
        assert_eq!(table.len(), 2);
    }
}
