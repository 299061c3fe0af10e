//! Netlist description and the compiled evaluation schedule (§3, §4.3).

pub mod chip;
mod levelize;

use crate::gate::GateKind;

/// An already-parsed circuit description — the "netlist ingestion
/// boundary" of §6. Producing one of these from textual HDL source is a
/// collaborator's job, not this crate's.
#[derive(Debug, Clone)]
pub struct NetlistDesc {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub wires: Vec<String>,
    pub gates: Vec<GateRecord>,
}

/// One gate instance. `ports` follows the convention from §6: for
/// combinational kinds, `[output, inputs...]`; for DFF, `[Q, D, clk,
/// reset?]` — the clk entry is accepted and ignored, since clocking is
/// implicit in [`chip::Chip::step`].
#[derive(Debug, Clone)]
pub struct GateRecord {
    pub kind: GateKind,
    pub name: String,
    pub ports: Vec<String>,
}

impl GateRecord {
    pub fn output(&self) -> &str {
        &self.ports[0]
    }

    /// Input port names. For combinational kinds this is every port after
    /// the output; callers must not use this for DFF ports (use
    /// [`GateRecord::dff_d`]/[`GateRecord::dff_reset`] instead).
    pub fn inputs(&self) -> &[String] {
        &self.ports[1..]
    }

    pub fn dff_d(&self) -> &str {
        &self.ports[1]
    }

    pub fn dff_reset(&self) -> Option<&str> {
        self.ports.get(3).map(String::as_str)
    }
}
