//! `lanesim` — a batched, lane-parallel 4-state digital logic simulator.
//!
//! Thousands of independent circuit instances (a gold reference, faulted
//! copies, or distinct ATPG patterns) are simulated in lockstep: every
//! [`tensor::LogicTensor`] carries one signal's state across every lane at
//! once, and every [`backend::Backend`] kernel is a pure, lane-independent
//! map. See `DESIGN.md` at the repository root for how each module is
//! grounded in its source material.

mod error;
mod logic;

pub mod backend;
pub mod fault;
pub mod flipflop;
pub mod gate;
pub mod monitor;
pub mod netlist;
pub mod scan;
pub mod tensor;

pub(crate) use fxhash::FxHashMap as HashMap;

pub use error::SimError;
pub use gate::GateKind;
pub use logic::State;
pub use netlist::chip::{Chip, ChipBuilder};
pub use netlist::{GateRecord, NetlistDesc};
pub use tensor::LogicTensor;
