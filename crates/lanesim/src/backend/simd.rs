use super::{Backend, BackendId};
use crate::logic;

/// Chunk width the kernels below are shaped around. Each lane's body is
/// branch-free (`crate::logic`'s truth tables compile to bitwise selects),
/// so iterating in fixed-size chunks gives the vectorizer an unrolled,
/// dependency-free loop body to pack into SIMD registers.
const LANES: usize = 8;

/// The same kernels as [`super::ScalarBackend`], shaped for auto-vectorization.
///
/// This stands in for the spec's "SIMD CPU" target: it is not a distinct
/// instruction-set build (no `target_feature` gating), just a loop body the
/// vectorizer can pack, matching how the original source's CPU backend and
/// its CUDA counterpart share one set of truth tables (`cpu_backend.py`,
/// `cuda_kernels.py`) and differ only in how the per-lane body is
/// dispatched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimdBackend;

macro_rules! chunked_binary {
    ($name:ident, $f:path) => {
        fn $name(&self, out_v: &mut [u32], out_s: &mut [u32], av: &[u32], as_: &[u32], bv: &[u32], bs: &[u32]) {
            let n = out_v.len();
            let full = n / LANES * LANES;
            let mut i = 0;
            while i < full {
                for l in 0..LANES {
                    let (v, s) = $f(av[i + l], as_[i + l], bv[i + l], bs[i + l]);
                    out_v[i + l] = v;
                    out_s[i + l] = s;
                }
                i += LANES;
            }
            while i < n {
                let (v, s) = $f(av[i], as_[i], bv[i], bs[i]);
                out_v[i] = v;
                out_s[i] = s;
                i += 1;
            }
        }
    };
}

impl Backend for SimdBackend {
    fn id(&self) -> BackendId {
        BackendId::Simd
    }

    chunked_binary!(and, logic::and_vs);
    chunked_binary!(or, logic::or_vs);
    chunked_binary!(xor, logic::xor_vs);

    fn not(&self, out_v: &mut [u32], out_s: &mut [u32], av: &[u32], as_: &[u32]) {
        let n = out_v.len();
        let full = n / LANES * LANES;
        let mut i = 0;
        while i < full {
            for l in 0..LANES {
                let (v, s) = logic::not_vs(av[i + l], as_[i + l]);
                out_v[i + l] = v;
                out_s[i + l] = s;
            }
            i += LANES;
        }
        while i < n {
            let (v, s) = logic::not_vs(av[i], as_[i]);
            out_v[i] = v;
            out_s[i] = s;
            i += 1;
        }
    }

    fn dff_update(
        &self,
        q_next_v: &mut [u32],
        q_next_s: &mut [u32],
        dv: &[u32],
        ds: &[u32],
        rv: &[u32],
        rs: &[u32],
    ) {
        let n = q_next_v.len();
        let full = n / LANES * LANES;
        let mut i = 0;
        while i < full {
            for l in 0..LANES {
                let (v, s) = logic::dff_next_vs(dv[i + l], ds[i + l], rv[i + l], rs[i + l]);
                q_next_v[i + l] = v;
                q_next_s[i + l] = s;
            }
            i += LANES;
        }
        while i < n {
            let (v, s) = logic::dff_next_vs(dv[i], ds[i], rv[i], rs[i]);
            q_next_v[i] = v;
            q_next_s[i] = s;
            i += 1;
        }
    }

    fn inject_fault(&self, target_v: &mut [u32], target_s: &mut [u32], en_v: &[u32], val_v: &[u32]) {
        let n = target_v.len();
        for i in 0..n {
            let mask = en_v[i] != 0;
            target_v[i] = if mask { val_v[i] } else { target_v[i] };
            target_s[i] = if mask { 1 } else { target_s[i] };
        }
    }
}
