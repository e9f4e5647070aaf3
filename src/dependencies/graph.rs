use super::*;
use petgraph::{prelude::*, Graph};
use std::{
    collections::{BTreeMap, HashSet},
    io,
};

/// Node weight of the exported dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstNode {
    pub index: usize,
    pub latency: Cycles,
    pub depth: Cycles,
}

/// Builds a petgraph view of the depth graph.
///
/// Node `i` is instruction `i`. Every resolved dependency becomes an edge from
/// the producer to the consumer, weighted with the operand slot it feeds.
pub fn to_graph(depths: &DepthGraph) -> Graph<InstNode, Operand> {
    let mut graph = Graph::with_capacity(depths.len(), depths.len() * 2);

    for (index, entry) in depths.entries().iter().enumerate() {
        graph.add_node(InstNode {
            index,
            latency: entry.latency,
            depth: entry.depth,
        });
    }

    for (index, entry) in depths.entries().iter().enumerate() {
        for (operand, dep) in entry.deps.iter() {
            graph.add_edge(NodeIndex::new(dep), NodeIndex::new(index), operand);
        }
    }

    graph
}

/// Writes the graph in Graphviz DOT format.
///
/// Instructions with the same depth share a rank. Edges between consecutive
/// instructions of `critical_path` are drawn bold red.
pub fn print_graph<W>(
    graph: &Graph<InstNode, Operand>,
    critical_path: &[usize],
    mut writer: W,
) -> Result<(), io::Error>
where
    W: io::Write,
{
    let critical: HashSet<(usize, usize)> = critical_path
        .iter()
        .zip(critical_path.iter().skip(1))
        .map(|(from, to)| (*from, *to))
        .collect();

    writeln!(writer, "digraph dataflow {{")?;

    let mut ranks: BTreeMap<Cycles, Vec<usize>> = BTreeMap::new();
    for node in graph.node_indices() {
        let inst = &graph[node];
        writeln!(
            writer,
            "  i{0:} [label=\"I{0:}\\nd={1:} l={2:}\"];",
            inst.index, inst.depth, inst.latency
        )?;
        ranks.entry(inst.depth).or_insert_with(Vec::new).push(inst.index);
    }
    writeln!(writer)?;

    for (depth, indices) in ranks.iter() {
        write!(writer, "  {{ rank=same; /* depth {} */", depth)?;
        for index in indices {
            write!(writer, " i{};", index)?;
        }
        writeln!(writer, " }}")?;
    }
    writeln!(writer)?;

    for edge in graph.raw_edges().iter() {
        let from = graph[edge.source()].index;
        let to = graph[edge.target()].index;
        let label = match edge.weight {
            Operand::Src1 => "src1",
            Operand::Src2 => "src2",
        };

        write!(writer, "  i{} -> i{} [label=\"{}\"", from, to, label)?;
        if critical.contains(&(from, to)) {
            write!(writer, ", color=red, penwidth=2")?;
        }
        writeln!(writer, "];")?;
    }

    writeln!(writer, "}}")?;

    Ok(())
}
