use clap::Parser;
use dflow::{
    dependencies::{self, DepthReport},
    AnalyzerConfig, ProgramContext, Result,
};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process,
};

#[derive(Parser, Debug)]
#[command(name = "dflow")]
#[command(about = "Dataflow dependency depth calculator", long_about = None)]
struct Args {
    /// Latency table, one cycle count per opcode
    latencies: PathBuf,

    /// Instruction trace, one `opcode dst src1 src2` per line
    trace: PathBuf,

    /// Write the dependency graph in Graphviz DOT format
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Write a JSON depth report
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the serialized dependency graph
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Analyzer configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resolve dependencies in parallel from this many instructions on
    #[arg(long)]
    parallel_threshold: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        "dflow=debug,info"
    } else {
        "dflow=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("dflow: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(threshold) = args.parallel_threshold {
        config.parallel_threshold = threshold;
    }
    tracing::debug!(?config, "analyzer configuration");

    let (latencies, trace) = dependencies::load_program(&args.latencies, &args.trace)?;
    let mut ctx = ProgramContext::analyze(&latencies, &trace, trace.len(), &config)?;

    // Print per-instruction results
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for inst in 0..trace.len() as i64 {
        let depth = ctx.inst_depth(inst)?;
        let (src1, src2) = ctx.inst_deps(inst)?.as_raw();
        writeln!(out, "inst {}: depth {}, deps ({}, {})", inst, depth, src1, src2)?;
    }
    writeln!(out, "program depth: {}", ctx.prog_depth()?)?;
    out.flush()?;

    let depths = ctx.graph()?;
    tracing::info!(
        instructions = depths.len(),
        program_depth = depths.program_depth(),
        "analysis finished"
    );

    if let Some(path) = &args.dot {
        let graph = dependencies::to_graph(depths);
        dependencies::print_graph(&graph, &depths.critical_path(), create(path)?)?;
        tracing::debug!(file = %path.display(), "wrote dot graph");
    }

    if let Some(path) = &args.json {
        serde_json::to_writer_pretty(create(path)?, &DepthReport::new(depths))?;
        tracing::debug!(file = %path.display(), "wrote depth report");
    }

    if let Some(path) = &args.graph {
        serde_json::to_writer(create(path)?, &dependencies::to_graph(depths))?;
        tracing::debug!(file = %path.display(), "wrote serialized graph");
    }

    ctx.free();

    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}
