//! The waveform export boundary (§6): `Monitor` samples designated
//! signals once per cycle via `to_host`, without writing any file format
//! itself — that remains a collaborator's job (the teacher's own VCD
//! writer, `vcd.rs`, is the format-specific type this crate deliberately
//! does not carry, per spec.md's out-of-scope list).

use crate::backend::Backend;
use crate::error::SimError;
use crate::logic::State;
use crate::netlist::chip::Chip;

/// Accepts one cycle's worth of sampled signal states, in the §6 display
/// encoding ('0'/'1'/'X', Z folded to X). Implementing a concrete file
/// format (VCD, FST, ...) is left entirely to the sampler.
pub trait SignalSampler {
    fn sample(&mut self, cycle: u64, name: &str, values: &[char]);
}

/// Samples a fixed list of named signals from a [`Chip`] once per cycle.
///
/// Guarantees only what §6 promises: a sample taken between `step()` calls
/// reflects the just-committed state, nothing more.
pub struct Monitor {
    signals: Vec<String>,
    cycle: u64,
}

impl Monitor {
    pub fn new(signals: Vec<String>) -> Self {
        Self { signals, cycle: 0 }
    }

    /// Sample every tracked signal from `chip` into `sampler`, then
    /// advance this monitor's cycle counter. Call after `Chip::step` (or
    /// after a scan load), never mid-cycle.
    pub fn sample<B: Backend>(&mut self, chip: &Chip<B>, sampler: &mut dyn SignalSampler) -> Result<(), SimError> {
        for name in &self.signals {
            let tensor = chip.get_output(name)?;
            let values: Vec<char> = (0..tensor.len())
                .map(|i| {
                    let (v, s) = tensor.get(i);
                    State::from_vs(v, s).to_display_char()
                })
                .collect();
            sampler.sample(self.cycle, name, &values);
        }
        self.cycle += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScalarBackend;
    use crate::gate::GateKind;
    use crate::netlist::chip::ChipBuilder;
    use crate::netlist::{GateRecord, NetlistDesc};
    use crate::tensor::LogicTensor;

    struct RecordingSampler {
        samples: Vec<(u64, String, Vec<char>)>,
    }

    impl SignalSampler for RecordingSampler {
        fn sample(&mut self, cycle: u64, name: &str, values: &[char]) {
            self.samples.push((cycle, name.to_string(), values.to_vec()));
        }
    }

    #[test]
    fn z_folds_to_x_on_sample() {
        let netlist = NetlistDesc {
            inputs: vec!["a".into()],
            outputs: vec!["y".into()],
            wires: vec![],
            gates: vec![GateRecord {
                kind: GateKind::Buf,
                name: "g".into(),
                ports: vec!["y".into(), "a".into()],
            }],
        };
        let backend = ScalarBackend;
        let mut chip = ChipBuilder::new(&netlist, backend).batch_size(4).build().unwrap();
        let a = LogicTensor::from_host(vec![0, 1, 0, 1], vec![1, 1, 0, 0], backend);
        chip.set_input("a", a).unwrap();
        chip.step().unwrap();

        let mut monitor = Monitor::new(vec!["y".into()]);
        let mut sampler = RecordingSampler { samples: Vec::new() };
        monitor.sample(&chip, &mut sampler).unwrap();

        assert_eq!(sampler.samples.len(), 1);
        let (cycle, name, values) = &sampler.samples[0];
        assert_eq!(*cycle, 0);
        assert_eq!(name, "y");
        assert_eq!(values, &['0', '1', 'X', 'X']);
    }

    #[test]
    fn cycle_counter_advances() {
        let netlist = NetlistDesc {
            inputs: vec!["a".into()],
            outputs: vec!["y".into()],
            wires: vec![],
            gates: vec![GateRecord {
                kind: GateKind::Not,
                name: "g".into(),
                ports: vec!["y".into(), "a".into()],
            }],
        };
        let backend = ScalarBackend;
        let mut chip = ChipBuilder::new(&netlist, backend).batch_size(1).build().unwrap();
        chip.set_input("a", LogicTensor::zeros(1, backend)).unwrap();

        let mut monitor = Monitor::new(vec!["y".into()]);
        let mut sampler = RecordingSampler { samples: Vec::new() };
        chip.step().unwrap();
        monitor.sample(&chip, &mut sampler).unwrap();
        chip.step().unwrap();
        monitor.sample(&chip, &mut sampler).unwrap();

        assert_eq!(sampler.samples[0].0, 0);
        assert_eq!(sampler.samples[1].0, 1);
    }
}
