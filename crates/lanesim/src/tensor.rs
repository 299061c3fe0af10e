//! [`LogicTensor`]: a lane-parallel 4-state signal vector.
//!
//! Grounded on `core.py`'s `LogicTensor`, which owns a pair of device
//! arrays (`v_data`, `s_data`) and exposes `__and__`/`__or__`/`__xor__`/
//! `__invert__`/`force` plus the `zeros`/`unknown`/`randint` factories.
//! Here the pair of buffers is owned directly (no device/host split, since
//! every backend in this crate runs in host memory) and the backend that
//! produced a tensor is recorded so mismatched combinations are rejected
//! (§4.1) instead of silently read past each other's length.

use crate::backend::{Backend, BackendId};
use crate::error::SimError;

/// A fixed-length vector of N lanes carrying one signal's 4-state value
/// across N parallel circuit instances.
///
/// Invariants (§3): `v` and `s` have identical length; the tensor
/// remembers which backend produced it; its length (the batch size) is
/// immutable after construction.
#[derive(Debug, Clone)]
pub struct LogicTensor {
    v: Vec<u32>,
    s: Vec<u32>,
    backend: BackendId,
}

impl LogicTensor {
    /// Build directly from host V/S arrays of identical length.
    pub fn from_host(v: Vec<u32>, s: Vec<u32>, backend: impl Backend) -> Self {
        debug_assert_eq!(v.len(), s.len(), "V/S buffers must be the same length");
        Self {
            v,
            s,
            backend: backend.id(),
        }
    }

    pub fn zeros(n: usize, backend: impl Backend) -> Self {
        Self::from_host(vec![0; n], vec![1; n], backend)
    }

    pub fn ones(n: usize, backend: impl Backend) -> Self {
        Self::from_host(vec![1; n], vec![1; n], backend)
    }

    pub fn unknown(n: usize, backend: impl Backend) -> Self {
        Self::from_host(vec![0; n], vec![0; n], backend)
    }

    pub fn hiz(n: usize, backend: impl Backend) -> Self {
        Self::from_host(vec![1; n], vec![0; n], backend)
    }

    /// Uniform random 0/1 states (always strong/defined), using a caller
    /// supplied RNG so the crate stays free of a hard dependency on a
    /// particular RNG crate (stimulus generation is a collaborator concern).
    pub fn randint(n: usize, backend: impl Backend, mut next_bit: impl FnMut() -> bool) -> Self {
        let v = (0..n).map(|_| next_bit() as u32).collect();
        Self::from_host(v, vec![1; n], backend)
    }

    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    pub fn backend_id(&self) -> BackendId {
        self.backend
    }

    /// Read lane `i`'s state as a (V, S) pair.
    pub fn get(&self, i: usize) -> (u32, u32) {
        (self.v[i], self.s[i])
    }

    /// Copy both lane buffers out to host vectors.
    pub fn to_host(&self) -> (Vec<u32>, Vec<u32>) {
        (self.v.clone(), self.s.clone())
    }

    pub(crate) fn buffers(&self) -> (&[u32], &[u32]) {
        (&self.v, &self.s)
    }

    pub(crate) fn buffers_mut(&mut self) -> (&mut [u32], &mut [u32]) {
        (&mut self.v, &mut self.s)
    }

    /// §4.5/§4.1: in-place fault overlay. For each lane where `enable` is
    /// set, force this tensor to `value`'s V with S=1.
    pub fn force(&mut self, enable: &LogicTensor, value: &LogicTensor, backend: impl Backend) -> Result<(), SimError> {
        check_compatible(self, enable, backend)?;
        check_compatible(self, value, backend)?;
        let (en_v, _) = enable.buffers();
        let (val_v, _) = value.buffers();
        let (tv, ts) = self.buffers_mut();
        backend.inject_fault(tv, ts, en_v, val_v);
        Ok(())
    }
}

/// §4.1: two tensors participate in the same operation only if they were
/// produced by the same backend and share the same batch size.
pub(crate) fn check_compatible(a: &LogicTensor, b: &LogicTensor, backend: impl Backend) -> Result<(), SimError> {
    if a.backend_id() != backend.id() || b.backend_id() != backend.id() {
        let expected = format!("{:?}", backend.id());
        let found = if a.backend_id() != backend.id() {
            format!("{:?}", a.backend_id())
        } else {
            format!("{:?}", b.backend_id())
        };
        return Err(SimError::BackendMismatch { expected, found });
    }
    if a.len() != b.len() {
        return Err(SimError::BatchSizeMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScalarBackend;

    #[test]
    fn factories_have_expected_states() {
        let b = ScalarBackend;
        assert_eq!(LogicTensor::zeros(4, b).get(0), (0, 1));
        assert_eq!(LogicTensor::ones(4, b).get(0), (1, 1));
        assert_eq!(LogicTensor::unknown(4, b).get(0), (0, 0));
        assert_eq!(LogicTensor::hiz(4, b).get(0), (1, 0));
    }

    #[test]
    fn backend_mismatch_detected() {
        use crate::backend::SimdBackend;
        let a = LogicTensor::zeros(4, ScalarBackend);
        let c = LogicTensor::zeros(4, SimdBackend);
        let err = check_compatible(&a, &c, ScalarBackend).unwrap_err();
        assert!(matches!(err, SimError::BackendMismatch { .. }));
    }

    #[test]
    fn batch_size_mismatch_detected() {
        let a = LogicTensor::zeros(4, ScalarBackend);
        let c = LogicTensor::zeros(5, ScalarBackend);
        let err = check_compatible(&a, &c, ScalarBackend).unwrap_err();
        assert!(matches!(err, SimError::BatchSizeMismatch { .. }));
    }
}
