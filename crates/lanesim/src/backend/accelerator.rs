use rayon::prelude::*;

use super::{Backend, BackendId};
use crate::logic;

/// A `rayon`-driven data-parallel backend standing in for the spec's
/// "data-parallel accelerator" execution target.
///
/// The retrieval pack has no GPU crate in its dependency stack; `rayon` is
/// the idiomatic Rust stand-in for SPMD-style lane parallelism (each lane
/// computed independently, fanned across worker threads), which is the
/// same shape as the original source's CUDA backend (`cuda_backend.py`,
/// `cuda_kernels.py`) without requiring a CUDA toolchain. Below a chunk
/// threshold it falls back to a sequential loop since spinning up the
/// thread pool costs more than small batches are worth.
const PAR_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, Copy, Default)]
pub struct AcceleratorBackend;

impl Backend for AcceleratorBackend {
    fn id(&self) -> BackendId {
        BackendId::Accelerator
    }

    fn and(&self, out_v: &mut [u32], out_s: &mut [u32], av: &[u32], as_: &[u32], bv: &[u32], bs: &[u32]) {
        binary_kernel(out_v, out_s, av, as_, bv, bs, logic::and_vs);
    }

    fn or(&self, out_v: &mut [u32], out_s: &mut [u32], av: &[u32], as_: &[u32], bv: &[u32], bs: &[u32]) {
        binary_kernel(out_v, out_s, av, as_, bv, bs, logic::or_vs);
    }

    fn xor(&self, out_v: &mut [u32], out_s: &mut [u32], av: &[u32], as_: &[u32], bv: &[u32], bs: &[u32]) {
        binary_kernel(out_v, out_s, av, as_, bv, bs, logic::xor_vs);
    }

    fn not(&self, out_v: &mut [u32], out_s: &mut [u32], av: &[u32], as_: &[u32]) {
        let n = out_v.len();
        if n >= PAR_THRESHOLD {
            out_v
                .par_iter_mut()
                .zip(out_s.par_iter_mut())
                .zip(av.par_iter())
                .zip(as_.par_iter())
                .for_each(|(((ov, os), &a), &as_i)| {
                    let (v, s) = logic::not_vs(a, as_i);
                    *ov = v;
                    *os = s;
                });
        } else {
            for i in 0..n {
                let (v, s) = logic::not_vs(av[i], as_[i]);
                out_v[i] = v;
                out_s[i] = s;
            }
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
        if n >= PAR_THRESHOLD {
            q_next_v
                .par_iter_mut()
                .zip(q_next_s.par_iter_mut())
                .enumerate()
                .for_each(|(i, (qv, qs))| {
                    let (v, s) = logic::dff_next_vs(dv[i], ds[i], rv[i], rs[i]);
                    *qv = v;
                    *qs = s;
                });
        } else {
            for i in 0..n {
                let (v, s) = logic::dff_next_vs(dv[i], ds[i], rv[i], rs[i]);
                q_next_v[i] = v;
                q_next_s[i] = s;
            }
        }
    }

    fn inject_fault(&self, target_v: &mut [u32], target_s: &mut [u32], en_v: &[u32], val_v: &[u32]) {
        let n = target_v.len();
        if n >= PAR_THRESHOLD {
            target_v
                .par_iter_mut()
                .zip(target_s.par_iter_mut())
                .enumerate()
                .for_each(|(i, (tv, ts))| {
                    if en_v[i] != 0 {
                        *tv = val_v[i];
                        *ts = 1;
                    }
                });
        } else {
            for i in 0..n {
                if en_v[i] != 0 {
                    target_v[i] = val_v[i];
                    target_s[i] = 1;
                }
            }
        }
    }
}

fn binary_kernel(
    out_v: &mut [u32],
    out_s: &mut [u32],
    av: &[u32],
    as_: &[u32],
    bv: &[u32],
    bs: &[u32],
    f: impl Fn(u32, u32, u32, u32) -> (u32, u32) + Sync,
) {
    let n = out_v.len();
    log::trace!("accelerator dispatch: n={n}, par={}", n >= PAR_THRESHOLD);
    if n >= PAR_THRESHOLD {
        out_v
            .par_iter_mut()
            .zip(out_s.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ov, os))| {
                let (v, s) = f(av[i], as_[i], bv[i], bs[i]);
                *ov = v;
                *os = s;
            });
    } else {
        for i in 0..n {
            let (v, s) = f(av[i], as_[i], bv[i], bs[i]);
            out_v[i] = v;
            out_s[i] = s;
        }
    }
}
