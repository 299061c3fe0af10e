//! [`Chip`]: a netlist compiled into a live evaluation schedule (§3, §4.3),
//! and [`ChipBuilder`], its fluent constructor.
//!
//! Grounded on the teacher's `Simulator`/`SimulatorBuilder` pair
//! (`simulator.rs`, `simulator/builder.rs`): a builder assembles
//! construction-time configuration and hands off to a `build()` that can
//! fail, and the built object owns a signal table plus a precompiled
//! evaluation order rather than re-deriving it every cycle.

use super::levelize::{self, Schedule};
use super::{GateRecord, NetlistDesc};
use crate::backend::Backend;
use crate::error::SimError;
use crate::fault::FaultCampaign;
use crate::flipflop::FlipFlop;
use crate::gate::{self, GateKind};
use crate::tensor::{check_compatible, LogicTensor};
use crate::HashMap;

struct CompiledGate {
    kind: GateKind,
    output: usize,
    inputs: Vec<usize>,
}

struct CompiledDff {
    q: usize,
    d: usize,
    reset: Option<usize>,
}

/// A compiled netlist: a dense signal table plus the evaluation order
/// computed once at construction (§4.3).
pub struct Chip<B: Backend> {
    backend: B,
    batch_size: usize,
    signal_index: HashMap<String, usize>,
    signal_names: Vec<String>,
    signals: Vec<LogicTensor>,
    comb_gates: Vec<CompiledGate>,
    dffs: Vec<(CompiledDff, FlipFlop)>,
    /// §4.5: registered stuck-at faults, overlaid onto a signal's tensor
    /// right after it is written (either by `set_input` or by the gate
    /// that drives it) and before any consumer reads it.
    fault_campaign: Option<FaultCampaign>,
}

impl<B: Backend> Chip<B> {
    fn new(netlist: &NetlistDesc, batch_size: usize, backend: B) -> Result<Self, SimError> {
        let Schedule {
            signal_index,
            comb_order,
            dff_order,
        } = levelize::compute_schedule(netlist)?;

        let resolve = |name: &str| -> Result<usize, SimError> {
            signal_index.get(name).copied().ok_or_else(|| SimError::UnknownSignal(name.to_string()))
        };

        let comb_gates = comb_order
            .into_iter()
            .map(|gi| compile_comb_gate(&netlist.gates[gi], &resolve))
            .collect::<Result<Vec<_>, _>>()?;

        let dffs = dff_order
            .into_iter()
            .map(|gi| {
                let meta = compile_dff(&netlist.gates[gi], &resolve)?;
                Ok((meta, FlipFlop::new(batch_size, backend)))
            })
            .collect::<Result<Vec<_>, SimError>>()?;

        let mut signals = vec![LogicTensor::zeros(batch_size, backend); signal_index.len()];
        for (meta, ff) in &dffs {
            signals[meta.q] = ff.q().clone();
        }

        let mut signal_names = vec![String::new(); signal_index.len()];
        for (name, &idx) in &signal_index {
            signal_names[idx] = name.clone();
        }

        log::debug!(
            "chip built: {} signals, {} combinational gates, {} flip-flops, batch_size={batch_size}, backend={:?}",
            signal_index.len(),
            comb_gates.len(),
            dffs.len(),
            backend.id(),
        );

        Ok(Self {
            backend,
            batch_size,
            signal_index,
            signal_names,
            signals,
            comb_gates,
            dffs,
            fault_campaign: None,
        })
    }

    /// Register the fault campaign whose faults §4.5 requires be overlaid
    /// onto every signal they target, immediately after that signal is
    /// written and before any consumer reads it. Replaces any previously
    /// attached campaign.
    pub fn attach_fault_campaign(&mut self, campaign: FaultCampaign) {
        self.fault_campaign = Some(campaign);
    }

    pub fn detach_fault_campaign(&mut self) -> Option<FaultCampaign> {
        self.fault_campaign.take()
    }

    /// §4.5's overlay: if a campaign is attached and has a fault on this
    /// signal, force it in place. A no-op when no campaign is attached or
    /// no fault targets this particular signal.
    fn overlay_fault(&self, idx: usize, tensor: &mut LogicTensor) -> Result<(), SimError> {
        if let Some(campaign) = &self.fault_campaign {
            let name = &self.signal_names[idx];
            if campaign.has_fault(name) {
                let (enable, value) = campaign.masks_for(name, self.backend);
                tensor.force(&enable, &value, self.backend)?;
            }
        }
        Ok(())
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Overwrite a primary input's tensor (§6). If a fault campaign is
    /// attached and targets this signal, the overlay (§4.5) is applied
    /// immediately, before any gate reads this value.
    pub fn set_input(&mut self, name: &str, mut tensor: LogicTensor) -> Result<(), SimError> {
        let idx = self.index_of(name)?;
        check_compatible(&self.signals[idx], &tensor, self.backend)?;
        self.overlay_fault(idx, &mut tensor)?;
        self.signals[idx] = tensor;
        Ok(())
    }

    /// Read any signal's current tensor (§6 `get_output`/`signals[name]`).
    pub fn get_output(&self, name: &str) -> Result<&LogicTensor, SimError> {
        let idx = self.index_of(name)?;
        Ok(&self.signals[idx])
    }

    /// Alias for [`Chip::get_output`], matching the `signals[name]`
    /// accessor named in §6.
    pub fn signal(&self, name: &str) -> Result<&LogicTensor, SimError> {
        self.get_output(name)
    }

    fn index_of(&self, name: &str) -> Result<usize, SimError> {
        self.signal_index.get(name).copied().ok_or_else(|| SimError::UnknownSignal(name.to_string()))
    }

    /// Advance the chip by one cycle (§4.3 "A cycle"):
    /// 1. Evaluate every combinational gate in schedule order, writing its
    ///    output back into the permanent signal slot.
    /// 2. Compute every DFF's Q_next from the current (pre-edge) D/reset.
    /// 3. Publish every Q_next atomically, only after every DFF in step 2
    ///    has been evaluated — this is what lets cross-coupled flip-flops
    ///    observe a single simultaneous clock edge (Testable Property 4).
    pub fn step(&mut self) -> Result<(), SimError> {
        log::trace!(
            "step: backend={:?}, batch_size={}, {} combinational gates, {} flip-flops",
            self.backend.id(),
            self.batch_size,
            self.comb_gates.len(),
            self.dffs.len(),
        );
        for gate in &self.comb_gates {
            let inputs: Vec<&LogicTensor> = gate.inputs.iter().map(|&idx| &self.signals[idx]).collect();
            let mut out = gate::evaluate(gate.kind, &inputs, self.backend)?;
            self.overlay_fault(gate.output, &mut out)?;
            self.signals[gate.output] = out;
        }

        let mut next_qs = Vec::with_capacity(self.dffs.len());
        for (meta, ff) in &self.dffs {
            let d = &self.signals[meta.d];
            let reset = meta.reset.map(|idx| &self.signals[idx]);
            let mut next = ff.eval_next(d, reset, self.backend)?;
            self.overlay_fault(meta.q, &mut next)?;
            next_qs.push(next);
        }
        for ((meta, ff), next) in self.dffs.iter_mut().zip(next_qs) {
            let q_idx = meta.q;
            ff.commit(next.clone());
            self.signals[q_idx] = next;
        }

        Ok(())
    }

    /// Directly overwrite a flip-flop's Q state, bypassing `step` (§4.6's
    /// zero-time scan load uses this).
    pub(crate) fn set_dff_q(&mut self, q_signal: &str, tensor: LogicTensor) -> Result<(), SimError> {
        let idx = self.index_of(q_signal)?;
        check_compatible(&self.signals[idx], &tensor, self.backend)?;
        if let Some((_, ff)) = self.dffs.iter_mut().find(|(meta, _)| meta.q == idx) {
            ff.commit(tensor.clone());
        }
        self.signals[idx] = tensor;
        Ok(())
    }
}

fn compile_comb_gate(record: &GateRecord, resolve: &impl Fn(&str) -> Result<usize, SimError>) -> Result<CompiledGate, SimError> {
    Ok(CompiledGate {
        kind: record.kind,
        output: resolve(record.output())?,
        inputs: record.inputs().iter().map(|n| resolve(n)).collect::<Result<_, _>>()?,
    })
}

fn compile_dff(record: &GateRecord, resolve: &impl Fn(&str) -> Result<usize, SimError>) -> Result<CompiledDff, SimError> {
    Ok(CompiledDff {
        q: resolve(record.output())?,
        d: resolve(record.dff_d())?,
        reset: record.dff_reset().map(resolve).transpose()?,
    })
}

/// Fluent constructor for [`Chip`], in the teacher's `SimulatorBuilder`
/// idiom: gather construction-time configuration, then `build()` into a
/// `Result` since levelization can fail (§4.3 step 4, §7).
pub struct ChipBuilder<'a, B: Backend> {
    netlist: &'a NetlistDesc,
    batch_size: usize,
    backend: B,
    fault_campaign: Option<FaultCampaign>,
}

impl<'a, B: Backend> ChipBuilder<'a, B> {
    pub fn new(netlist: &'a NetlistDesc, backend: B) -> Self {
        Self {
            netlist,
            batch_size: 1,
            backend,
            fault_campaign: None,
        }
    }

    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    /// Attach a fault campaign at construction time, so every `set_input`
    /// and gate evaluation overlays its faults automatically (§4.5).
    pub fn fault_campaign(mut self, campaign: FaultCampaign) -> Self {
        self.fault_campaign = Some(campaign);
        self
    }

    pub fn build(self) -> Result<Chip<B>, SimError> {
        let mut chip = Chip::new(self.netlist, self.batch_size, self.backend)?;
        if let Some(campaign) = self.fault_campaign {
            chip.attach_fault_campaign(campaign);
        }
        Ok(chip)
    }
}
