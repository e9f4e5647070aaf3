use super::*;

/// Finds the producers of both source operands of `trace[index]`.
///
/// Scans backward from `index - 1`, so the first match for a slot is the most
/// recent writer of that register. An absent operand never matches. Only
/// `trace[..=index]` is read, which makes calls for different indices
/// independent of each other.
///
/// Panics if `index` is outside the trace.
pub fn resolve(trace: &[Instruction], index: usize) -> DependencyPair {
    let target = &trace[index];
    let mut deps = DependencyPair::default();

    for (j, candidate) in trace[..index].iter().enumerate().rev() {
        if deps.src1.is_none() && target.src1 == Some(candidate.dst) {
            deps.src1 = Some(j);
        }
        if deps.src2.is_none() && target.src2 == Some(candidate.dst) {
            deps.src2 = Some(j);
        }

        // Absent operands count as found
        let src1_done = target.src1.is_none() || deps.src1.is_some();
        let src2_done = target.src2.is_none() || deps.src2.is_some();
        if src1_done && src2_done {
            break;
        }
    }

    deps
}
