//! [`ScanChain`]: zero-time scan load into a sequence of flip-flops (§4.6).
//!
//! Grounded on `modules.py`'s `ScanChain.scan_load`, which iterates scan
//! chain positions and device-to-device copies each column directly into
//! a register's Q rather than shifting bit-by-bit; the same shortcut is
//! expressed here over [`Chip`] instead of a raw device-array copy.

use crate::backend::Backend;
use crate::error::SimError;
use crate::netlist::chip::Chip;
use crate::tensor::LogicTensor;

/// An ordered list of K flip-flop identifiers (their Q signal names)
/// sharing one [`Chip`]'s batch size.
#[derive(Debug, Clone)]
pub struct ScanChain {
    chain: Vec<String>,
}

impl ScanChain {
    pub fn new(chain: Vec<String>) -> Self {
        Self { chain }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Load an N x K pattern (N = `chip`'s batch size, K = chain length)
    /// into the chain's flip-flops in one zero-time operation: column `j`
    /// overwrites flip-flop `j`'s Q with `(pattern_v[i][j], pattern_s[i][j])`
    /// for every lane `i`. Absent `pattern_s`, every loaded lane is defined
    /// (S=1). After this returns, reads of any chained flip-flop's Q in the
    /// same cycle see the loaded values, and the next `step()` uses them as
    /// pre-edge state.
    pub fn scan_load<B: Backend>(
        &self,
        chip: &mut Chip<B>,
        pattern_v: &[Vec<u32>],
        pattern_s: Option<&[Vec<u32>]>,
        backend: B,
    ) -> Result<(), SimError> {
        let batch_size = chip.batch_size();
        let cols = self.chain.len();
        check_shape(pattern_v, batch_size, cols)?;
        if let Some(s) = pattern_s {
            check_shape(s, batch_size, cols)?;
        }

        log::debug!("scan load: {cols} flip-flops x {batch_size} lanes, explicit unknown mask={}", pattern_s.is_some());

        for (j, q_signal) in self.chain.iter().enumerate() {
            let v: Vec<u32> = (0..batch_size).map(|i| pattern_v[i][j]).collect();
            let s: Vec<u32> = match pattern_s {
                Some(s) => (0..batch_size).map(|i| s[i][j]).collect(),
                None => vec![1; batch_size],
            };
            let tensor = LogicTensor::from_host(v, s, backend);
            chip.set_dff_q(q_signal, tensor)?;
        }
        Ok(())
    }
}

fn check_shape(pattern: &[Vec<u32>], expected_rows: usize, expected_cols: usize) -> Result<(), SimError> {
    let shape_ok = pattern.len() == expected_rows && pattern.iter().all(|row| row.len() == expected_cols);
    if shape_ok {
        return Ok(());
    }
    Err(SimError::ShapeMismatch {
        expected_rows,
        expected_cols,
        found_rows: pattern.len(),
        found_cols: pattern.first().map_or(0, Vec::len),
    })
}
