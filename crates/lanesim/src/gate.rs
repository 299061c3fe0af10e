//! Gate primitives: stateless combinational operators expressed purely
//! through [`Backend`] kernels (§4.2).
//!
//! Derived kinds (NAND/NOR/XNOR) are composed from AND/OR/XOR followed by
//! NOT, exactly as spec.md §4.2 specifies; BUF is the identity. DFF is not
//! a combinational kind — it is handled by [`crate::flipflop::FlipFlop`]
//! and wired in by [`crate::netlist::chip::Chip`].

use crate::backend::Backend;
use crate::error::SimError;
use crate::tensor::{check_compatible, LogicTensor};

/// The eight primitive gate kinds named in the data model (§3), plus DFF
/// which a [`crate::netlist::chip::Chip`] routes to the sequential path
/// rather than through [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    And,
    Or,
    Xor,
    Not,
    Nand,
    Nor,
    Xnor,
    Buf,
    Dff,
}

impl GateKind {
    /// Minimum and maximum input arity allowed by §3: binary kinds need
    /// exactly 2, NOT/BUF need exactly 1; `None` means unbounded (reducing
    /// n-ary AND/OR/XOR gates over more than two inputs is permitted, as
    /// spec.md only requires "arity >= 2 for binary kinds").
    pub fn arity(self) -> (usize, Option<usize>) {
        match self {
            GateKind::Not | GateKind::Buf => (1, Some(1)),
            GateKind::Dff => (1, Some(2)),
            _ => (2, None),
        }
    }

    pub fn is_combinational(self) -> bool {
        !matches!(self, GateKind::Dff)
    }
}

/// Evaluate a combinational gate over its already-fetched input tensors,
/// producing a fresh output tensor (§4.3 step 1 writes this back into the
/// stable signal table at the gate's output index).
pub fn evaluate(
    kind: GateKind,
    inputs: &[&LogicTensor],
    backend: impl Backend,
) -> Result<LogicTensor, SimError> {
    assert!(kind.is_combinational(), "DFF is not evaluated through gate::evaluate");
    let (min_arity, max_arity) = kind.arity();
    debug_assert!(
        inputs.len() >= min_arity && max_arity.is_none_or(|max| inputs.len() <= max),
        "{kind:?} got {} inputs, expected arity ({min_arity}, {max_arity:?}) -- malformed netlist should have been rejected at ingestion",
        inputs.len(),
    );
    let n = inputs[0].len();
    for pair in inputs.windows(2) {
        check_compatible(pair[0], pair[1], backend)?;
    }

    match kind {
        GateKind::Buf => {
            check_compatible(inputs[0], inputs[0], backend)?;
            Ok(inputs[0].clone())
        }
        GateKind::Not => {
            check_compatible(inputs[0], inputs[0], backend)?;
            let (av, as_) = inputs[0].buffers();
            let mut out = LogicTensor::zeros(n, backend);
            let (ov, os) = out.buffers_mut();
            backend.not(ov, os, av, as_);
            Ok(out)
        }
        GateKind::And | GateKind::Nand => {
            let mut acc = inputs[0].clone();
            for next in &inputs[1..] {
                acc = binary(backend, BinOp::And, &acc, next)?;
            }
            if matches!(kind, GateKind::Nand) {
                acc = invert(&acc, backend)?;
            }
            Ok(acc)
        }
        GateKind::Or | GateKind::Nor => {
            let mut acc = inputs[0].clone();
            for next in &inputs[1..] {
                acc = binary(backend, BinOp::Or, &acc, next)?;
            }
            if matches!(kind, GateKind::Nor) {
                acc = invert(&acc, backend)?;
            }
            Ok(acc)
        }
        GateKind::Xor | GateKind::Xnor => {
            let mut acc = inputs[0].clone();
            for next in &inputs[1..] {
                acc = binary(backend, BinOp::Xor, &acc, next)?;
            }
            if matches!(kind, GateKind::Xnor) {
                acc = invert(&acc, backend)?;
            }
            Ok(acc)
        }
        GateKind::Dff => unreachable!(),
    }
}

#[derive(Clone, Copy)]
enum BinOp {
    And,
    Or,
    Xor,
}

fn binary(backend: impl Backend, op: BinOp, a: &LogicTensor, b: &LogicTensor) -> Result<LogicTensor, SimError> {
    check_compatible(a, b, backend)?;
    let n = a.len();
    let mut out = LogicTensor::zeros(n, backend);
    let (av, as_) = a.buffers();
    let (bv, bs) = b.buffers();
    let (ov, os) = out.buffers_mut();
    match op {
        BinOp::And => backend.and(ov, os, av, as_, bv, bs),
        BinOp::Or => backend.or(ov, os, av, as_, bv, bs),
        BinOp::Xor => backend.xor(ov, os, av, as_, bv, bs),
    }
    Ok(out)
}

fn invert(a: &LogicTensor, backend: impl Backend) -> Result<LogicTensor, SimError> {
    let n = a.len();
    let mut out = LogicTensor::zeros(n, backend);
    let (av, as_) = a.buffers();
    let (ov, os) = out.buffers_mut();
    backend.not(ov, os, av, as_);
    Ok(out)
}
