//! [`FlipFlop`]: a stateful sequential element (§4.4).
//!
//! Owns its Q tensor directly; the netlist layer ([`crate::netlist::chip`])
//! aliases this tensor into the signal table rather than copying it, per
//! the "stable identity" design note in SPEC_FULL.md §9.

use crate::backend::Backend;
use crate::error::SimError;
use crate::tensor::{check_compatible, LogicTensor};

/// A synchronous, active-high, reset-priority flip-flop (§4.4).
#[derive(Debug, Clone)]
pub struct FlipFlop {
    q: LogicTensor,
}

impl FlipFlop {
    /// A new flip-flop with Q initialized to strong 0 on every lane.
    pub fn new(batch_size: usize, backend: impl Backend) -> Self {
        Self {
            q: LogicTensor::zeros(batch_size, backend),
        }
    }

    pub fn q(&self) -> &LogicTensor {
        &self.q
    }

    /// Compute Q_next from `d` and an optional `reset`, without publishing
    /// it into `self.q`. Callers that need the two-phase commit described
    /// in §4.3 step 3 (e.g. [`crate::netlist::chip::Chip`]) call this for
    /// every DFF before calling [`FlipFlop::commit`] on any of them.
    pub fn eval_next(
        &self,
        d: &LogicTensor,
        reset: Option<&LogicTensor>,
        backend: impl Backend,
    ) -> Result<LogicTensor, SimError> {
        check_compatible(&self.q, d, backend)?;
        let n = d.len();
        let (rv, rs): (Vec<u32>, Vec<u32>) = match reset {
            Some(r) => {
                check_compatible(&self.q, r, backend)?;
                let (v, s) = r.to_host();
                (v, s)
            }
            // Absent a reset tensor, §4.4 defines reset as driven to logic
            // 0 on every lane.
            None => (vec![0; n], vec![1; n]),
        };
        let (dv, ds) = d.buffers();
        let mut out = LogicTensor::zeros(n, backend);
        let (ov, os) = out.buffers_mut();
        backend.dff_update(ov, os, dv, ds, &rv, &rs);
        Ok(out)
    }

    /// Publish a previously computed Q_next, replacing the current Q.
    pub fn commit(&mut self, q_next: LogicTensor) {
        self.q = q_next;
    }

    /// Convenience for standalone use outside a Chip: compute and commit
    /// in one call (no two-phase ordering concern with a single element).
    pub fn advance(
        &mut self,
        d: &LogicTensor,
        reset: Option<&LogicTensor>,
        backend: impl Backend,
    ) -> Result<(), SimError> {
        let next = self.eval_next(d, reset, backend)?;
        self.commit(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScalarBackend;
    use crate::logic::State;

    #[test]
    fn reset_glitch_propagation_s3() {
        let backend = ScalarBackend;
        let mut ff = FlipFlop::new(4, backend);
        let d = LogicTensor::ones(4, backend);
        let reset = LogicTensor::from_host(vec![0, 1, 0, 1], vec![1, 1, 0, 0], backend);
        ff.advance(&d, Some(&reset), backend).unwrap();
        let expected = [State::One, State::Zero, State::X, State::X];
        for i in 0..4 {
            let (v, s) = ff.q().get(i);
            assert_eq!(State::from_vs(v, s), expected[i], "lane {i}");
        }
    }

    #[test]
    fn absent_reset_samples_d() {
        let backend = ScalarBackend;
        let mut ff = FlipFlop::new(4, backend);
        let d = LogicTensor::from_host(vec![1, 0, 1, 0], vec![1, 1, 0, 0], backend);
        ff.advance(&d, None, backend).unwrap();
        assert_eq!(ff.q().to_host(), d.to_host());
    }

    #[test]
    fn two_phase_cross_coupled_edge_s5() {
        let backend = ScalarBackend;
        let mut q1 = FlipFlop::new(1, backend);
        let mut q2 = FlipFlop::new(1, backend);
        q1.commit(LogicTensor::zeros(1, backend));
        q2.commit(LogicTensor::ones(1, backend));

        let next1 = q1.eval_next(q2.q(), None, backend).unwrap();
        let next2 = q2.eval_next(q1.q(), None, backend).unwrap();
        q1.commit(next1);
        q2.commit(next2);
        assert_eq!(q1.q().get(0), (1, 1));
        assert_eq!(q2.q().get(0), (0, 1));

        let next1 = q1.eval_next(q2.q(), None, backend).unwrap();
        let next2 = q2.eval_next(q1.q(), None, backend).unwrap();
        q1.commit(next1);
        q2.commit(next2);
        assert_eq!(q1.q().get(0), (0, 1));
        assert_eq!(q2.q().get(0), (1, 1));
    }
}
