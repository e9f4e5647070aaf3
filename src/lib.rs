#[macro_use]
extern crate nom;
#[macro_use]
extern crate serde_derive;

pub mod config;
pub mod context;
pub mod dependencies;
pub mod error;

pub use self::config::AnalyzerConfig;
pub use self::context::{analyze_prog, ProgramContext};
pub use self::dependencies::{
    resolve, Cycles, DependencyPair, DepthEntry, DepthGraph, Instruction, LatencyTable, Opcode,
    Register,
};
pub use self::error::{DflowError, Result};
