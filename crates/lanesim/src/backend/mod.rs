//! Compute backends: vectorized primitives over lane-parallel buffers.
//!
//! One implementation per execution target (§4.1, §5). All three share the
//! [`Backend`] trait and the same scalar kernels from [`crate::logic`], so
//! "bit-identical output" (Testable Property 10) falls out of calling
//! shared code rather than independently reimplementing the algebra per
//! target. Grounded on the teacher's `Backend` abstraction in spirit
//! (one capability object per execution target dispatched through a
//! uniform interface) even though the teacher's own `JitBackend` compiles
//! native code rather than dispatching lane kernels — see `DESIGN.md`.

mod accelerator;
mod scalar;
mod simd;

pub use accelerator::AcceleratorBackend;
pub use scalar::ScalarBackend;
pub use simd::SimdBackend;

/// Identifies which [`Backend`] produced a [`crate::tensor::LogicTensor`].
///
/// Since every backend here is a stateless capability object (no device
/// context to distinguish instances), the discriminant alone is enough to
/// detect [`crate::SimError::BackendMismatch`] without `dyn` downcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendId {
    Scalar,
    Simd,
    Accelerator,
}

/// A capability object providing vectorized 4-state primitives.
///
/// Every method is a pure, lane-independent map: output lane `i` depends
/// only on input lane `i` (Testable Property 2). Buffer lengths are not
/// checked here; callers (`crate::gate`, `crate::flipflop`) are expected to
/// have already validated batch-size agreement via
/// [`crate::tensor::LogicTensor`].
pub trait Backend: Copy {
    fn id(&self) -> BackendId;

    fn and(&self, out_v: &mut [u32], out_s: &mut [u32], av: &[u32], as_: &[u32], bv: &[u32], bs: &[u32]);
    fn or(&self, out_v: &mut [u32], out_s: &mut [u32], av: &[u32], as_: &[u32], bv: &[u32], bs: &[u32]);
    fn xor(&self, out_v: &mut [u32], out_s: &mut [u32], av: &[u32], as_: &[u32], bv: &[u32], bs: &[u32]);
    fn not(&self, out_v: &mut [u32], out_s: &mut [u32], av: &[u32], as_: &[u32]);

    /// §4.4: synchronous, active-high, reset-priority flip-flop advance.
    fn dff_update(
        &self,
        q_next_v: &mut [u32],
        q_next_s: &mut [u32],
        dv: &[u32],
        ds: &[u32],
        rv: &[u32],
        rs: &[u32],
    );

    /// §4.5: for each lane where `en` is set, force `target` to `val` with
    /// S=1; lanes where `en` is clear are left unchanged.
    fn inject_fault(&self, target_v: &mut [u32], target_s: &mut [u32], en_v: &[u32], val_v: &[u32]);
}
