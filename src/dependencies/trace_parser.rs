use super::*;
use crate::error::{DflowError, Result};
use nom::{space, types::CompleteStr, IResult};
use std::{fs::File, io, path::Path};

/// Reads a latency table: one cycle count per line, line `k` for opcode `k`.
///
/// Blank lines and lines starting with `#` are skipped and do not count as
/// opcodes.
pub fn read_latencies<T>(input: T) -> Result<LatencyTable>
where
    T: io::BufRead,
{
    read_records(input, "latencies", latency).map(LatencyTable::new)
}

/// Reads an instruction trace: one `opcode dst src1 src2` per line, with `-1`
/// standing for an absent source operand.
pub fn read_trace<T>(input: T) -> Result<Vec<Instruction>>
where
    T: io::BufRead,
{
    read_records(input, "trace", instruction)
}

/// Loads a latency table and a trace from the given files.
pub fn load_program<P, Q>(latency_file: P, trace_file: Q) -> Result<(LatencyTable, Vec<Instruction>)>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let latency_file = latency_file.as_ref();
    let trace_file = trace_file.as_ref();

    let input = io::BufReader::new(File::open(latency_file)?);
    let latencies = read_records(input, &latency_file.display().to_string(), latency)?;
    tracing::debug!(
        file = %latency_file.display(),
        opcodes = latencies.len(),
        "read latency table"
    );

    let input = io::BufReader::new(File::open(trace_file)?);
    let trace = read_records(input, &trace_file.display().to_string(), instruction)?;
    tracing::debug!(
        file = %trace_file.display(),
        instructions = trace.len(),
        "read trace"
    );

    Ok((LatencyTable::new(latencies), trace))
}

fn read_records<T, R, F>(input: T, source_name: &str, parse: F) -> Result<Vec<R>>
where
    T: io::BufRead,
    F: Fn(CompleteStr) -> IResult<CompleteStr, R>,
{
    let mut records = Vec::new();

    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        match parse(CompleteStr(text)) {
            Ok((rest, record)) if rest.0.trim().is_empty() => records.push(record),
            _ => {
                return Err(DflowError::Parse {
                    source_name: source_name.to_owned(),
                    line: line_no + 1,
                    text: text.to_owned(),
                })
            }
        }
    }

    Ok(records)
}

/// Digits only, so signs and embedded dashes never pass as numbers.
fn number(token: CompleteStr) -> Option<u32> {
    if token.0.bytes().all(|b| b.is_ascii_digit()) {
        token.0.parse().ok()
    } else {
        None
    }
}

fn operand_token(token: CompleteStr) -> Option<Option<Register>> {
    match token.0 {
        "-1" => Some(None),
        _ => number(token).map(Some),
    }
}

named!(token<CompleteStr, CompleteStr>, take_till1!(|c: char| c.is_whitespace()));

named!(u32_field<CompleteStr, u32>, map_opt!(token, number));

named!(latency<CompleteStr, Cycles>, call!(u32_field));

named!(operand<CompleteStr, Option<Register>>, map_opt!(token, operand_token));

named!(instruction<CompleteStr, Instruction>, do_parse!(
    opcode: u32_field >> space >>
    dst: u32_field    >> space >>
    src1: operand     >> space >>
    src2: operand     >>
    (Instruction { opcode, dst, src1, src2 })
));
