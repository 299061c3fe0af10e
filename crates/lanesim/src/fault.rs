//! [`FaultCampaign`]: maps named stuck-at faults to lane indices (§4.5).
//!
//! Grounded on the original source's `faults.py` `FaultCampaign` (batch
//! size, a growing fault list, a `next_free_index` starting at 1 so lane 0
//! stays the gold reference) — reimplemented as a pure mask producer with
//! no signal-state ownership of its own, per the ownership rule in §3
//! ("A FaultCampaign does not own any signal state").

use crate::backend::Backend;
use crate::error::SimError;
use crate::tensor::LogicTensor;

#[derive(Debug, Clone)]
struct FaultRecord {
    signal: String,
    stuck_value: u32,
    lane: usize,
}

/// A registry of stuck-at faults, each claiming one lane past the
/// reserved gold lane (lane 0).
#[derive(Debug, Clone)]
pub struct FaultCampaign {
    batch_size: usize,
    faults: Vec<FaultRecord>,
    next_free_index: usize,
}

impl FaultCampaign {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            faults: Vec::new(),
            next_free_index: 1,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Register a stuck-at fault on `signal`, returning the lane index
    /// assigned (monotonically increasing from 1). Multiple faults on the
    /// same signal are permitted provided they occupy different lanes,
    /// which holds automatically since each call claims the next lane.
    pub fn add_fault(&mut self, signal: impl Into<String>, stuck_value: u32) -> Result<usize, SimError> {
        if stuck_value > 1 {
            return Err(SimError::InvalidStuckValue(stuck_value));
        }
        if self.next_free_index >= self.batch_size {
            log::warn!(
                "fault campaign capacity exceeded: batch_size={} has no free lanes past {}",
                self.batch_size,
                self.next_free_index,
            );
            return Err(SimError::CapacityExceeded {
                batch_size: self.batch_size,
                max: self.batch_size.saturating_sub(1),
            });
        }
        let lane = self.next_free_index;
        self.next_free_index += 1;
        let signal = signal.into();
        log::debug!("fault registered: signal={signal} stuck_value={stuck_value} lane={lane}");
        self.faults.push(FaultRecord {
            signal,
            stuck_value,
            lane,
        });
        Ok(lane)
    }

    /// Whether any registered fault targets `signal`, so a [`crate::netlist::chip::Chip`]
    /// can skip materializing an overlay for signals with no faults at all.
    pub fn has_fault(&self, signal: &str) -> bool {
        self.faults.iter().any(|f| f.signal == signal)
    }

    /// Build the (enable, value) tensor pair for `signal`: `enable` is set
    /// on every lane carrying a fault on this signal, `value` carries that
    /// fault's stuck value. Both tensors are fully defined (S=1) on every
    /// lane. Backend-agnostic: the caller supplies the backend to
    /// materialize against.
    pub fn masks_for(&self, signal: &str, backend: impl Backend) -> (LogicTensor, LogicTensor) {
        let mut enable_v = vec![0u32; self.batch_size];
        let mut value_v = vec![0u32; self.batch_size];
        for fault in self.faults.iter().filter(|f| f.signal == signal) {
            enable_v[fault.lane] = 1;
            value_v[fault.lane] = fault.stuck_value;
        }
        let enable_s = vec![1u32; self.batch_size];
        let value_s = vec![1u32; self.batch_size];
        (
            LogicTensor::from_host(enable_v, enable_s, backend),
            LogicTensor::from_host(value_v, value_s, backend),
        )
    }
}
