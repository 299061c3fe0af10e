//! The 4-state logic algebra (IEEE-1164-style 0/1/X/Z), shared by every
//! backend so that bit-identical results (scalar, SIMD, accelerator) fall
//! out of calling the same scalar kernel rather than from three separate
//! reimplementations of the truth tables.

/// One signal lane's state: the (V, S) pair from the data model.
///
/// `S = true` means "defined logic level"; `S = false` means "not a usable
/// level". No other combination is ever produced by a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Strong logic low. (V=0, S=1)
    Zero,
    /// Strong logic high. (V=1, S=1)
    One,
    /// Unknown. (V=0, S=0)
    X,
    /// High impedance. (V=1, S=0)
    Z,
}

impl State {
    #[inline]
    pub fn from_vs(v: u32, s: u32) -> Self {
        match (v != 0, s != 0) {
            (false, true) => State::Zero,
            (true, true) => State::One,
            (false, false) => State::X,
            (true, false) => State::Z,
        }
    }

    #[inline]
    pub fn to_vs(self) -> (u32, u32) {
        match self {
            State::Zero => (0, 1),
            State::One => (1, 1),
            State::X => (0, 0),
            State::Z => (1, 0),
        }
    }

    /// Z folds to X, as mandated for display and for every gate kernel.
    #[inline]
    pub fn is_defined(self) -> bool {
        matches!(self, State::Zero | State::One)
    }

    /// The `Monitor`/`SignalSampler` display encoding (§6): Z folds to X.
    pub fn to_display_char(self) -> char {
        match self {
            State::Zero => '0',
            State::One => '1',
            State::X | State::Z => 'X',
        }
    }
}

/// 4-state AND. Controlling-value dominance (0) applies even when the
/// other operand is X or Z.
#[inline]
pub fn and_vs(av: u32, as_: u32, bv: u32, bs: u32) -> (u32, u32) {
    let a_zero = as_ != 0 && av == 0;
    let b_zero = bs != 0 && bv == 0;
    let a_one = as_ != 0 && av != 0;
    let b_one = bs != 0 && bv != 0;
    let both_one = a_one && b_one;
    let any_zero = a_zero || b_zero;
    let v = both_one as u32;
    let s = (any_zero || both_one) as u32;
    (v, s)
}

/// 4-state OR. Controlling-value dominance (1) applies even when the
/// other operand is X or Z.
#[inline]
pub fn or_vs(av: u32, as_: u32, bv: u32, bs: u32) -> (u32, u32) {
    let a_one = as_ != 0 && av != 0;
    let b_one = bs != 0 && bv != 0;
    let a_zero = as_ != 0 && av == 0;
    let b_zero = bs != 0 && bv == 0;
    let any_one = a_one || b_one;
    let both_zero = a_zero && b_zero;
    let v = any_one as u32;
    let s = (any_one || both_zero) as u32;
    (v, s)
}

/// 4-state XOR: defined only when both operands are defined.
#[inline]
pub fn xor_vs(av: u32, as_: u32, bv: u32, bs: u32) -> (u32, u32) {
    let valid = as_ != 0 && bs != 0;
    let v = if valid { av ^ bv } else { 0 };
    (v, valid as u32)
}

/// 4-state NOT: defined only when the operand is defined.
#[inline]
pub fn not_vs(av: u32, as_: u32) -> (u32, u32) {
    let valid = as_ != 0;
    let v = if valid { av ^ 1 } else { 0 };
    (v, valid as u32)
}

/// Synchronous, active-high, reset-priority flip-flop advance (§4.4).
#[inline]
pub fn dff_next_vs(dv: u32, ds: u32, rv: u32, rs: u32) -> (u32, u32) {
    if rs == 0 {
        // reset is X: Q_next is X regardless of D.
        (0, 0)
    } else if rv != 0 {
        // reset is logic 1: Q_next is strong 0.
        (0, 1)
    } else {
        // reset is logic 0: Q_next samples D byte-for-byte.
        (dv, ds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_truth_row_s1() {
        // a = [0,1,X,Z], b = [1,1,1,1] -> [0,1,X,X]
        let a = [(0u32, 1u32), (1, 1), (0, 0), (1, 0)];
        let b = (1u32, 1u32);
        let expected = [State::Zero, State::One, State::X, State::X];
        for (i, &(av, as_)) in a.iter().enumerate() {
            let (v, s) = and_vs(av, as_, b.0, b.1);
            assert_eq!(State::from_vs(v, s), expected[i], "lane {i}");
        }
    }

    #[test]
    fn or_x_dominance_s2() {
        // a = [1,1,X,X], b = [X,0,0,X] -> [1,1,X,X]
        let a = [(1u32, 1u32), (1, 1), (0, 0), (0, 0)];
        let b = [(0u32, 0u32), (0, 1), (0, 1), (0, 0)];
        let expected = [State::One, State::One, State::X, State::X];
        for i in 0..4 {
            let (v, s) = or_vs(a[i].0, a[i].1, b[i].0, b[i].1);
            assert_eq!(State::from_vs(v, s), expected[i], "lane {i}");
        }
    }

    #[test]
    fn reset_glitch_propagation_s3() {
        // reset = [0,1,X,X], D = [1,1,1,1] -> Q = [1,0,X,X]
        let reset = [(0u32, 1u32), (1, 1), (0, 0), (0, 0)];
        let expected = [State::One, State::Zero, State::X, State::X];
        for i in 0..4 {
            let (qv, qs) = dff_next_vs(1, 1, reset[i].0, reset[i].1);
            assert_eq!(State::from_vs(qv, qs), expected[i], "lane {i}");
        }
    }

    #[test]
    fn reset_priority_over_data() {
        assert_eq!(State::from_vs(0, 1), {
            let (v, s) = dff_next_vs(1, 1, 1, 1);
            State::from_vs(v, s)
        });
    }

    #[test]
    fn not_and_derived_nand() {
        let (v, s) = and_vs(1, 1, 1, 1);
        let (nv, ns) = not_vs(v, s);
        assert_eq!(State::from_vs(nv, ns), State::Zero);
    }

    #[test]
    fn four_state_closure() {
        let inputs = [(0u32, 0u32), (0, 1), (1, 0), (1, 1)];
        for &(av, as_) in &inputs {
            for &(bv, bs) in &inputs {
                for (v, s) in [
                    and_vs(av, as_, bv, bs),
                    or_vs(av, as_, bv, bs),
                    xor_vs(av, as_, bv, bs),
                ] {
                    assert!(v == 0 || v == 1);
                    assert!(s == 0 || s == 1);
                }
            }
            let (v, s) = not_vs(av, as_);
            assert!(v == 0 || v == 1);
            assert!(s == 0 || s == 1);
        }
    }
}
