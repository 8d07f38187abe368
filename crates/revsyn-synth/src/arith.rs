//! Reversible arithmetic and logic building blocks.
//!
//! Every routine emits gates through an [`Emitter`], so it is implicitly
//! controlled by whatever controls are active. Bit vectors are LSB first.
//! Unless stated otherwise, operands are left unchanged and only the named
//! destination is modified.

use revsyn_ir::{Gate, LineId};

use crate::emitter::Emitter;

// =============================================================================
// Addition and subtraction
// =============================================================================

/// `dest += src` (mod 2^n) with a ripple-carry adder; `src` is restored.
pub fn increase(e: &mut Emitter, dest: &[LineId], src: &[LineId]) {
    let n = dest.len().min(src.len());
    match n {
        0 => return,
        1 => {
            e.cnot(src[0], dest[0]);
            return;
        }
        _ => {}
    }

    for i in 1..n {
        e.cnot(src[i], dest[i]);
    }
    for i in (1..n - 1).rev() {
        e.cnot(src[i], src[i + 1]);
    }
    for i in 0..n - 1 {
        e.ccnot(dest[i], src[i], src[i + 1]);
    }
    e.cnot(src[n - 1], dest[n - 1]);
    for i in (0..n - 1).rev() {
        e.emit(Gate::peres([src[i]], dest[i], src[i + 1]));
    }
    for i in 1..n - 1 {
        e.cnot(src[i], src[i + 1]);
    }
    for i in 1..n {
        e.cnot(src[i], dest[i]);
    }
}

/// `dest -= src` (mod 2^n).
pub fn decrease(e: &mut Emitter, dest: &[LineId], src: &[LineId]) {
    bitwise_not(e, dest);
    increase(e, dest, src);
    bitwise_not(e, dest);
}

/// `dest += src` and `carry ^= carry-out`.
pub fn increase_with_carry(e: &mut Emitter, dest: &[LineId], src: &[LineId], carry: LineId) {
    let n = src.len().min(dest.len());
    if n == 0 {
        return;
    }

    for i in 1..n {
        e.cnot(src[i], dest[i]);
    }
    if n > 1 {
        e.cnot(src[n - 1], carry);
    }
    for i in (1..n.saturating_sub(1)).rev() {
        e.cnot(src[i], src[i + 1]);
    }
    for i in 0..n - 1 {
        e.ccnot(src[i], dest[i], src[i + 1]);
    }
    e.ccnot(src[n - 1], dest[n - 1], carry);
    for i in (1..n).rev() {
        e.cnot(src[i], dest[i]);
        e.ccnot(dest[i - 1], src[i - 1], src[i]);
    }
    for i in 1..n.saturating_sub(1) {
        e.cnot(src[i], src[i + 1]);
    }
    for i in 0..n {
        e.cnot(src[i], dest[i]);
    }
}

/// `dest -= src` and `borrow ^= borrow-out`.
pub fn decrease_with_carry(e: &mut Emitter, dest: &[LineId], src: &[LineId], borrow: LineId) {
    let n = src.len().min(dest.len());
    bitwise_not(e, &dest[..n]);
    increase_with_carry(e, dest, src, borrow);
    bitwise_not(e, &dest[..n]);
}

/// `dest += 1`.
pub fn increment(e: &mut Emitter, dest: &[LineId]) {
    for i in (0..dest.len()).rev() {
        e.emit(Gate::toffoli(dest[..i].iter().copied(), dest[i]));
    }
}

/// `dest -= 1`.
pub fn decrement(e: &mut Emitter, dest: &[LineId]) {
    for i in 0..dest.len() {
        e.emit(Gate::toffoli(dest[..i].iter().copied(), dest[i]));
    }
}

/// `dest := src - dest`.
pub fn subtract_from(e: &mut Emitter, dest: &[LineId], src: &[LineId]) {
    bitwise_not(e, dest);
    increase(e, dest, src);
    increment(e, dest);
}

// =============================================================================
// Bitwise operations
// =============================================================================

/// Invert every bit.
pub fn bitwise_not(e: &mut Emitter, dest: &[LineId]) {
    for &line in dest {
        e.not(line);
    }
}

/// `dest ^= src`.
pub fn bitwise_cnot(e: &mut Emitter, dest: &[LineId], src: &[LineId]) {
    for (&d, &s) in dest.iter().zip(src) {
        e.cnot(s, d);
    }
}

/// `dest ^= a & b`.
pub fn bitwise_and(e: &mut Emitter, dest: &[LineId], a: &[LineId], b: &[LineId]) {
    for ((&d, &x), &y) in dest.iter().zip(a).zip(b) {
        e.ccnot(x, y, d);
    }
}

/// `dest ^= a | b`.
pub fn bitwise_or(e: &mut Emitter, dest: &[LineId], a: &[LineId], b: &[LineId]) {
    for ((&d, &x), &y) in dest.iter().zip(a).zip(b) {
        e.cnot(x, d);
        e.cnot(y, d);
        e.ccnot(x, y, d);
    }
}

/// Swap two bit vectors.
pub fn swap(e: &mut Emitter, a: &[LineId], b: &[LineId]) {
    for (&x, &y) in a.iter().zip(b) {
        e.emit(Gate::swap(x, y));
    }
}

/// `dest ^= src << amount`.
pub fn shift_left(e: &mut Emitter, dest: &[LineId], src: &[LineId], amount: usize) {
    for (i, &s) in src.iter().enumerate() {
        if let Some(&d) = dest.get(i + amount) {
            e.cnot(s, d);
        }
    }
}

/// `dest ^= src >> amount`.
pub fn shift_right(e: &mut Emitter, dest: &[LineId], src: &[LineId], amount: usize) {
    for (i, &d) in dest.iter().enumerate() {
        if let Some(&s) = src.get(i + amount) {
            e.cnot(s, d);
        }
    }
}

// =============================================================================
// Comparisons
// =============================================================================

/// `dest ^= a < b`.
pub fn less_than(e: &mut Emitter, dest: LineId, a: &[LineId], b: &[LineId]) {
    decrease_with_carry(e, a, b, dest);
    increase(e, a, b);
}

/// `dest ^= a > b`.
pub fn greater_than(e: &mut Emitter, dest: LineId, a: &[LineId], b: &[LineId]) {
    less_than(e, dest, b, a);
}

/// `dest ^= a <= b`.
pub fn less_equals(e: &mut Emitter, dest: LineId, a: &[LineId], b: &[LineId]) {
    less_than(e, dest, b, a);
    e.not(dest);
}

/// `dest ^= a >= b`.
pub fn greater_equals(e: &mut Emitter, dest: LineId, a: &[LineId], b: &[LineId]) {
    less_than(e, dest, a, b);
    e.not(dest);
}

/// `dest ^= a == b`.
pub fn equals(e: &mut Emitter, dest: LineId, a: &[LineId], b: &[LineId]) {
    for (&x, &y) in a.iter().zip(b) {
        e.cnot(y, x);
        e.not(x);
    }
    e.emit(Gate::toffoli(a.iter().copied(), dest));
    for (&x, &y) in a.iter().zip(b) {
        e.not(x);
        e.cnot(y, x);
    }
}

/// `dest ^= a != b`.
pub fn not_equals(e: &mut Emitter, dest: LineId, a: &[LineId], b: &[LineId]) {
    equals(e, dest, a, b);
    e.not(dest);
}

// =============================================================================
// Multiplication and division
// =============================================================================

/// `dest += a * b` (mod 2^n) by shift-and-add; `dest` is expected to be zero.
pub fn multiplication(e: &mut Emitter, dest: &[LineId], a: &[LineId], b: &[LineId]) {
    let n = dest.len();
    if n == 0 {
        return;
    }
    e.controlled(&[a[0]], |e| bitwise_cnot(e, dest, b));
    for i in 1..n {
        e.controlled(&[a[i]], |e| increase(e, &dest[i..], &b[..n - i]));
    }
}

/// Restoring division of `remainder` by `divisor`.
///
/// On entry `remainder` holds the dividend and `quotient` is zero; on exit
/// they hold the remainder and the quotient. The divisor is restored.
pub fn modulo(e: &mut Emitter, quotient: &[LineId], remainder: &[LineId], divisor: &[LineId]) {
    let n = remainder.len();
    if n == 0 {
        return;
    }
    bitwise_not(e, &divisor[1..]);
    let mut s: Vec<LineId> = Vec::with_capacity(n);
    let mut p: Vec<LineId> = Vec::with_capacity(n);
    for i in (0..n).rev() {
        p.push(divisor[n - 1 - i]);
        s.insert(0, remainder[i]);
        // High divisor bits must be zero for this shift to apply.
        e.controlled(&divisor[n - i..], |e| {
            decrease_with_carry(e, &s, &p, quotient[i]);
            e.controlled(&[quotient[i]], |e| increase(e, &s, &p));
            e.not(quotient[i]);
        });
        if i > 0 {
            e.not(divisor[n - i]);
        }
    }
}

/// `quotient := dividend / divisor`; dividend and divisor are restored.
pub fn division(e: &mut Emitter, quotient: &[LineId], dividend: &[LineId], divisor: &[LineId]) {
    modulo(e, quotient, dividend, divisor);
    let n = dividend.len();
    if n == 0 {
        return;
    }
    bitwise_not(e, &divisor[1..]);
    let mut s: Vec<LineId> = Vec::with_capacity(n);
    let mut p: Vec<LineId> = Vec::with_capacity(n);
    for i in (0..n).rev() {
        p.push(divisor[n - 1 - i]);
        s.insert(0, dividend[i]);
        let mut controls = divisor[n - i..].to_vec();
        controls.push(quotient[i]);
        e.controlled(&controls, |e| increase(e, &s, &p));
        if i > 0 {
            e.not(divisor[n - i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revsyn_sim::{apply_gate, bits_from_value, value_from_bits};

    /// Lines `0..n` hold `a`, `n..2n` hold `b`, then `extra` zero lines.
    struct Bench {
        n: usize,
        a: Vec<LineId>,
        b: Vec<LineId>,
        scratch: Vec<LineId>,
    }

    impl Bench {
        fn new(n: usize, extra: usize) -> Self {
            let line = |i: usize| LineId(i as u32);
            Self {
                n,
                a: (0..n).map(line).collect(),
                b: (n..2 * n).map(line).collect(),
                scratch: (2 * n..2 * n + extra).map(line).collect(),
            }
        }

        fn run(&self, gates: &[Gate], a: u64, b: u64) -> Vec<bool> {
            let mut state = bits_from_value(a, self.n);
            state.extend(bits_from_value(b, self.n));
            state.resize(2 * self.n + self.scratch.len(), false);
            for gate in gates {
                apply_gate(&mut state, gate);
            }
            state
        }

        fn read(&self, state: &[bool], lines: &[LineId]) -> u64 {
            let bits: Vec<bool> = lines.iter().map(|l| state[l.index()]).collect();
            value_from_bits(&bits)
        }

        fn pairs(&self) -> impl Iterator<Item = (u64, u64)> {
            let max = 1u64 << self.n;
            (0..max).flat_map(move |a| (0..max).map(move |b| (a, b)))
        }
    }

    #[test]
    fn test_increase_and_decrease() {
        for n in 1..=4 {
            let t = Bench::new(n, 0);
            let mask = (1u64 << n) - 1;
            let mut add = Emitter::new();
            increase(&mut add, &t.a, &t.b);
            let mut sub = Emitter::new();
            decrease(&mut sub, &t.a, &t.b);
            for (a, b) in t.pairs() {
                let s = t.run(add.gates(), a, b);
                assert_eq!(t.read(&s, &t.a), (a + b) & mask);
                assert_eq!(t.read(&s, &t.b), b);
                let s = t.run(sub.gates(), a, b);
                assert_eq!(t.read(&s, &t.a), a.wrapping_sub(b) & mask);
                assert_eq!(t.read(&s, &t.b), b);
            }
        }
    }

    #[test]
    fn test_adder_uses_peres_gates() {
        let t = Bench::new(3, 0);
        let mut e = Emitter::new();
        increase(&mut e, &t.a, &t.b);
        let peres = e
            .gates()
            .iter()
            .filter(|g| g.kind() == revsyn_ir::GateKind::Peres)
            .count();
        assert_eq!(peres, 2);
    }

    #[test]
    fn test_subtract_from() {
        for n in 1..=3 {
            let t = Bench::new(n, 0);
            let mask = (1u64 << n) - 1;
            let mut e = Emitter::new();
            subtract_from(&mut e, &t.b, &t.a);
            for (a, b) in t.pairs() {
                let s = t.run(e.gates(), a, b);
                assert_eq!(t.read(&s, &t.b), a.wrapping_sub(b) & mask);
                assert_eq!(t.read(&s, &t.a), a);
            }
        }
    }

    #[test]
    fn test_increment_decrement() {
        let t = Bench::new(3, 0);
        let mut inc = Emitter::new();
        increment(&mut inc, &t.a);
        let mut dec = Emitter::new();
        decrement(&mut dec, &t.a);
        for a in 0..8 {
            assert_eq!(t.read(&t.run(inc.gates(), a, 0), &t.a), (a + 1) % 8);
            assert_eq!(t.read(&t.run(dec.gates(), a, 0), &t.a), (a + 7) % 8);
        }
    }

    #[test]
    fn test_comparisons() {
        type Cmp = fn(&mut Emitter, LineId, &[LineId], &[LineId]);
        let cases: [(Cmp, fn(u64, u64) -> bool); 6] = [
            (less_than, |a, b| a < b),
            (greater_than, |a, b| a > b),
            (less_equals, |a, b| a <= b),
            (greater_equals, |a, b| a >= b),
            (equals, |a, b| a == b),
            (not_equals, |a, b| a != b),
        ];
        for n in 1..=3 {
            let t = Bench::new(n, 1);
            for (build, expected) in cases {
                let mut e = Emitter::new();
                build(&mut e, t.scratch[0], &t.a, &t.b);
                for (a, b) in t.pairs() {
                    let s = t.run(e.gates(), a, b);
                    assert_eq!(s[t.scratch[0].index()], expected(a, b), "n={n} a={a} b={b}");
                    assert_eq!(t.read(&s, &t.a), a);
                    assert_eq!(t.read(&s, &t.b), b);
                }
            }
        }
    }

    #[test]
    fn test_bitwise_and_shifts() {
        let n = 3;
        let t = Bench::new(n, n);
        let mut and = Emitter::new();
        bitwise_and(&mut and, &t.scratch, &t.a, &t.b);
        let mut or = Emitter::new();
        bitwise_or(&mut or, &t.scratch, &t.a, &t.b);
        let mut shl = Emitter::new();
        shift_left(&mut shl, &t.scratch, &t.a, 1);
        let mut shr = Emitter::new();
        shift_right(&mut shr, &t.scratch, &t.a, 2);
        for (a, b) in t.pairs() {
            assert_eq!(t.read(&t.run(and.gates(), a, b), &t.scratch), a & b);
            assert_eq!(t.read(&t.run(or.gates(), a, b), &t.scratch), a | b);
            assert_eq!(t.read(&t.run(shl.gates(), a, b), &t.scratch), (a << 1) & 7);
            assert_eq!(t.read(&t.run(shr.gates(), a, b), &t.scratch), a >> 2);
        }
    }

    #[test]
    fn test_multiplication() {
        for n in 1..=3 {
            let t = Bench::new(n, n);
            let mask = (1u64 << n) - 1;
            let mut e = Emitter::new();
            multiplication(&mut e, &t.scratch, &t.a, &t.b);
            for (a, b) in t.pairs() {
                let s = t.run(e.gates(), a, b);
                assert_eq!(t.read(&s, &t.scratch), (a * b) & mask);
                assert_eq!(t.read(&s, &t.a), a);
                assert_eq!(t.read(&s, &t.b), b);
            }
        }
    }

    #[test]
    fn test_modulo_and_division() {
        for n in 1..=3 {
            let t = Bench::new(n, n);
            let mut rem = Emitter::new();
            modulo(&mut rem, &t.scratch, &t.a, &t.b);
            let mut div = Emitter::new();
            division(&mut div, &t.scratch, &t.a, &t.b);
            for (a, b) in t.pairs().filter(|&(_, b)| b != 0) {
                let s = t.run(rem.gates(), a, b);
                assert_eq!(t.read(&s, &t.a), a % b);
                assert_eq!(t.read(&s, &t.scratch), a / b);
                assert_eq!(t.read(&s, &t.b), b);

                let s = t.run(div.gates(), a, b);
                assert_eq!(t.read(&s, &t.scratch), a / b);
                assert_eq!(t.read(&s, &t.a), a);
                assert_eq!(t.read(&s, &t.b), b);
            }
        }
    }

    #[test]
    fn test_controlled_adder() {
        let t = Bench::new(2, 1);
        let mut e = Emitter::new();
        e.controlled(&[t.scratch[0]], |e| increase(e, &t.a, &t.b));
        for (a, b) in t.pairs() {
            // control line stays 0, so nothing happens
            let s = t.run(e.gates(), a, b);
            assert_eq!(t.read(&s, &t.a), a);
        }
    }
}
