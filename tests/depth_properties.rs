extern crate dflow;

use dflow::{analyze_prog, Cycles, DependencyPair, DepthGraph, DflowError, Instruction, LatencyTable};

fn build(latencies: &[Cycles], trace: &[Instruction]) -> DepthGraph {
    DepthGraph::build(&LatencyTable::new(latencies.to_vec()), trace, trace.len()).unwrap()
}

#[test]
fn independent_instructions_start_at_zero() {
    let trace: Vec<_> = (0..8)
        .map(|r| Instruction::new(r % 3, 10 + r, Some(r), Some(r + 1)))
        .collect();
    let graph = build(&[4, 1, 7], &trace);

    for i in 0..trace.len() {
        assert_eq!(graph.depth_of(i).unwrap(), 0, "instruction {}", i);
        assert!(graph.dependencies_of(i).unwrap().is_empty());
    }
    assert_eq!(graph.program_depth(), 7);
}

#[test]
fn chain_depth_is_prefix_sum_of_latencies() {
    let latencies = [3, 1, 4, 1, 5];
    let trace: Vec<_> = (0..10u32)
        .map(|i| {
            let src = if i == 0 { None } else { Some(i - 1) };
            Instruction::new(i % 5, i, src, None)
        })
        .collect();
    let graph = build(&latencies, &trace);

    let mut expected = 0;
    for (i, inst) in trace.iter().enumerate() {
        assert_eq!(graph.depth_of(i).unwrap(), expected);
        if i > 0 {
            assert_eq!(
                graph.depth_of(i).unwrap(),
                graph.depth_of(i - 1).unwrap() + latencies[trace[i - 1].opcode as usize]
            );
        }
        expected += latencies[inst.opcode as usize];
    }
    assert_eq!(graph.program_depth(), expected);
    assert_eq!(graph.critical_path(), (0..10).collect::<Vec<_>>());
}

#[test]
fn depth_takes_the_later_of_two_parents() {
    // slow producer on src2, fast producer on src1
    let trace = [
        Instruction::new(1, 1, None, None),
        Instruction::new(0, 2, None, None),
        Instruction::new(0, 3, Some(2), Some(1)),
    ];
    let graph = build(&[1, 9], &trace);

    assert_eq!(graph.dependencies_of(2).unwrap(), DependencyPair::new(Some(1), Some(0)));
    assert_eq!(graph.depth_of(2).unwrap(), 9);
    assert_eq!(graph.critical_path(), vec![0, 2]);
}

#[test]
fn most_recent_writer_is_the_dependency() {
    let trace = [
        Instruction::new(0, 5, None, None),
        Instruction::new(1, 5, None, None),
        Instruction::new(0, 9, None, None),
        Instruction::new(0, 6, Some(5), Some(9)),
    ];
    let graph = build(&[1, 6], &trace);

    assert_eq!(graph.dependencies_of(3).unwrap(), DependencyPair::new(Some(1), Some(2)));
    assert_eq!(graph.depth_of(3).unwrap(), 6);
}

#[test]
fn program_depth_is_max_completion() {
    let trace = [
        Instruction::new(2, 1, None, None),
        Instruction::new(0, 2, Some(1), None),
        Instruction::new(1, 3, None, None),
        Instruction::new(0, 4, Some(2), Some(3)),
    ];
    let graph = build(&[1, 2, 8], &trace);

    let max = graph
        .entries()
        .iter()
        .map(|e| e.depth + e.latency)
        .max()
        .unwrap();
    assert_eq!(graph.program_depth(), max);
    assert_eq!(graph.program_depth(), 10);
}

#[test]
fn concrete_scenario_through_context() {
    const A: u32 = 0;
    const B: u32 = 1;
    let (r1, r2, r3) = (1, 2, 3);
    let trace = [
        Instruction::new(A, r1, None, None),
        Instruction::new(B, r2, Some(r1), None),
        Instruction::new(A, r3, Some(r2), Some(r1)),
    ];
    let latencies = LatencyTable::new(vec![1, 2]);
    let mut ctx = analyze_prog(&latencies, &trace, 3).unwrap();

    assert_eq!(ctx.inst_depth(0).unwrap(), 0);
    assert_eq!(ctx.inst_depth(1).unwrap(), 1);
    assert_eq!(ctx.inst_depth(2).unwrap(), 3);
    assert_eq!(ctx.inst_deps(2).unwrap().as_raw(), (1, 0));
    assert_eq!(ctx.prog_depth().unwrap(), 4);

    assert!(matches!(ctx.inst_depth(-1), Err(DflowError::IndexOutOfRange { .. })));
    assert!(matches!(ctx.inst_depth(3), Err(DflowError::IndexOutOfRange { .. })));

    ctx.free();
    assert!(matches!(ctx.inst_depth(0), Err(DflowError::InvalidContext)));
}

#[test]
fn built_graph_is_shareable_across_threads() {
    use std::{sync::Arc, thread};

    let trace: Vec<_> = (0..32u32)
        .map(|i| Instruction::new(0, i, i.checked_sub(1), None))
        .collect();
    let graph = Arc::new(build(&[2], &trace));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || graph.program_depth())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 64);
    }
}
