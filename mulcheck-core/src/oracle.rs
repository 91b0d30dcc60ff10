//! oracle
//!
//! independently derives every intermediate value of the
//! unpack / abs / multiply / fix-sign pipeline from a raw vector.
//! nothing here reads the output of a routine under test.

use crate::check::{Observable, Observe};
use crate::vector::PackedVector;

/// lower bound of the signed 16-bit envelope
pub const SIGNED16_MIN: i32 = i16::MIN as i32;
/// upper bound of the signed 16-bit envelope
pub const SIGNED16_MAX: i32 = i16::MAX as i32;

pub fn in_signed16_range(value: i32) -> bool {
    (SIGNED16_MIN..=SIGNED16_MAX).contains(&value)
}

/// one side of a multiplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operand {
    input: i32,
    abs: i32,
    sign_bit: i32,
}

impl Operand {
    pub fn new(input: i32) -> Self {
        Self {
            input,
            abs: input.wrapping_abs(),
            sign_bit: i32::from(input < 0),
        }
    }

    pub fn input(&self) -> i32 {
        self.input
    }

    pub fn abs(&self) -> i32 {
        self.abs
    }

    /// 0 for non-negative inputs, 1 for negative
    pub fn sign_bit(&self) -> i32 {
        self.sign_bit
    }

    pub fn in_range(&self) -> bool {
        in_signed16_range(self.input)
    }
}

/// the full set of expected values for one vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpectedResult {
    pub a: Operand,
    pub b: Operand,
    pub range_error: i32,
    pub product_sign: i32,
    pub init_product: i32,
    pub final_product: i32,
}

impl Observe for ExpectedResult {
    fn observe(&self, observable: Observable) -> i32 {
        match observable {
            Observable::OperandA => self.a.input(),
            Observable::OperandB => self.b.input(),
            Observable::RangeError => self.range_error,
            Observable::SignA => self.a.sign_bit(),
            Observable::SignB => self.b.sign_bit(),
            Observable::ProductSign => self.product_sign,
            Observable::AbsA => self.a.abs(),
            Observable::AbsB => self.b.abs(),
            Observable::InitProduct => self.init_product,
            // a correct routine returns the same value it reports
            Observable::FinalProduct | Observable::Returned => self.final_product,
        }
    }
}

/// expected values for a packed vector
///
/// the upper half is operand a, the lower half operand b,
/// both sign-extended from 16 bits
pub fn evaluate(vector: u32) -> ExpectedResult {
    let packed = PackedVector::from(vector);
    evaluate_operands(packed.operand_a(), packed.operand_b())
}

/// expected values for an already unpacked pair
///
/// operands outside the signed 16-bit envelope raise the range flag;
/// the products then wrap rather than trap.
pub fn evaluate_operands(a: i32, b: i32) -> ExpectedResult {
    let a = Operand::new(a);
    let b = Operand::new(b);

    let range_error = i32::from(!a.in_range() || !b.in_range());

    // a zero operand never produces a negative product
    let negative = (a.input() < 0 && b.input() > 0) || (a.input() > 0 && b.input() < 0);
    let product_sign = i32::from(negative);

    let init_product = a.abs().wrapping_mul(b.abs());
    let final_product = a.input().wrapping_mul(b.input());

    ExpectedResult {
        a,
        b,
        range_error,
        product_sign,
        init_product,
        final_product,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector;

    #[test]
    fn test_negative_times_positive() {
        let e = evaluate(0xFFFC0003);
        assert_eq!(e.a.input(), -4);
        assert_eq!(e.b.input(), 3);
        assert_eq!(e.a.abs(), 4);
        assert_eq!(e.b.abs(), 3);
        assert_eq!(e.a.sign_bit(), 1);
        assert_eq!(e.b.sign_bit(), 0);
        assert_eq!(e.range_error, 0);
        assert_eq!(e.product_sign, 1);
        assert_eq!(e.init_product, 12);
        assert_eq!(e.final_product, -12);
    }

    #[test]
    fn test_zero_times_positive() {
        let e = evaluate(0x00000005);
        assert_eq!(e.a.input(), 0);
        assert_eq!(e.b.input(), 5);
        assert_eq!(e.a.sign_bit(), 0);
        assert_eq!(e.b.sign_bit(), 0);
        assert_eq!(e.product_sign, 0);
        assert_eq!(e.init_product, 0);
        assert_eq!(e.final_product, 0);
    }

    #[test]
    fn test_large_positive_operands() {
        let e = evaluate(0x7FF17FF2);
        assert_eq!(e.a.input(), 32753);
        assert_eq!(e.b.input(), 32754);
        assert_eq!(e.range_error, 0);
        assert_eq!(e.product_sign, 0);
        assert_eq!(e.final_product, 32753 * 32754);
        assert_eq!(e.final_product, 1_072_791_762);
    }

    #[test]
    fn test_zero_operand_is_not_negative() {
        // sign bits differ but the product is zero
        let e = evaluate(0x0000FFFC);
        assert_eq!(e.a.sign_bit(), 0);
        assert_eq!(e.b.sign_bit(), 1);
        assert_eq!(e.product_sign, 0);
        assert_eq!(e.final_product, 0);

        let e = evaluate(0xFFFD0000);
        assert_eq!(e.a.sign_bit(), 1);
        assert_eq!(e.product_sign, 0);
    }

    #[test]
    fn test_most_negative_squared() {
        let e = evaluate(0x80008000);
        assert_eq!(e.a.abs(), 32768);
        assert_eq!(e.b.abs(), 32768);
        assert_eq!(e.init_product, 1 << 30);
        assert_eq!(e.final_product, 1 << 30);
    }

    #[test]
    fn test_table_properties() {
        for v in vector::table() {
            let packed = v.packed();
            let e = evaluate(v.value());

            assert_eq!(e.final_product, packed.operand_a() * packed.operand_b(), "{v}");
            assert_eq!(e.init_product, e.final_product.abs(), "{v}");
            assert_eq!(e.range_error, 0, "{v}");

            let opposite = e.a.sign_bit() != e.b.sign_bit();
            let nonzero = e.a.input() != 0 && e.b.input() != 0;
            assert_eq!(e.product_sign == 1, opposite && nonzero, "{v}");

            if e.product_sign == 1 {
                assert_eq!(e.final_product, -e.init_product, "{v}");
            } else {
                assert_eq!(e.final_product, e.init_product, "{v}");
            }

            // pure: evaluating twice gives the same answer
            assert_eq!(e, evaluate(v.value()), "{v}");
        }
    }

    #[test]
    fn test_range_check_out_of_envelope() {
        let e = evaluate_operands(32768, 2);
        assert_eq!(e.range_error, 1);
        assert_eq!(e.final_product, 65536);

        let e = evaluate_operands(-3, -32769);
        assert_eq!(e.range_error, 1);
        assert_eq!(e.a.sign_bit(), 1);
        assert_eq!(e.b.sign_bit(), 1);

        let e = evaluate_operands(SIGNED16_MIN, SIGNED16_MAX);
        assert_eq!(e.range_error, 0);
    }

    #[test]
    fn test_operand_invariants() {
        for input in [SIGNED16_MIN, -1, 0, 1, SIGNED16_MAX] {
            let op = Operand::new(input);
            assert_eq!(op.abs(), input.abs());
            assert_eq!(op.sign_bit() == 1, input < 0);
        }
    }
}
