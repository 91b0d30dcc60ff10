//! routines under test
//!
//! the four externally supplied arithmetic steps and the values they
//! report back. every call hands its outputs back in a plain struct;
//! nothing is exchanged through shared state.

use crate::check::{Observable, Observe};
use crate::guard::RegisterBank;

/// output of the unpack step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UnpackOutput {
    /// 0 when both operands are within the signed 16-bit range
    pub returned: i32,
    /// the range flag as reported by the routine
    pub range_error: i32,
    pub a: i32,
    pub b: i32,
}

/// output of the absolute value step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AbsOutput {
    pub returned: i32,
    pub abs_value: i32,
    /// 0 for +, 1 for -
    pub sign_bit: i32,
}

/// output of the unsigned multiply step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MultiplyOutput {
    pub returned: i32,
    pub init_product: i32,
}

/// output of the sign correction step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FixSignOutput {
    pub returned: i32,
    pub final_product: i32,
    pub product_is_negative: i32,
}

/// the arithmetic routines being verified
pub trait Routines {
    /// split a packed vector into two sign-extended 16-bit operands
    fn unpack(&mut self, packed: u32) -> UnpackOutput;

    /// absolute value and sign bit of one operand
    fn abs(&mut self, value: i32) -> AbsOutput;

    /// product of two non-negative operands no larger than 2^16
    fn multiply(&mut self, a: i32, b: i32) -> MultiplyOutput;

    /// reapply the sign of the original operands to an unsigned product
    fn fix_sign(&mut self, product: i32, sign_a: i32, sign_b: i32) -> FixSignOutput;
}

/// a device under test: the routines plus the register set they run on
pub trait Target: Routines + RegisterBank {}

impl<T> Target for T where T: Routines + RegisterBank {}

/// which routine a guarded call went to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Call {
    Unpack,
    AbsA,
    AbsB,
    Multiply,
    FixSign,
}

impl Call {
    pub const COUNT: usize = 5;

    pub const ALL: [Call; Call::COUNT] = [
        Call::Unpack,
        Call::AbsA,
        Call::AbsB,
        Call::Multiply,
        Call::FixSign,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Unpack => "unpack",
            Self::AbsA => "abs(a)",
            Self::AbsB => "abs(b)",
            Self::Multiply => "multiply",
            Self::FixSign => "fix sign",
        }
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// everything the routines reported for one vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActualResult {
    pub unpack: UnpackOutput,
    pub abs_a: AbsOutput,
    pub abs_b: AbsOutput,
    pub multiply: MultiplyOutput,
    pub fix_sign: FixSignOutput,
}

impl Observe for ActualResult {
    fn observe(&self, observable: Observable) -> i32 {
        match observable {
            Observable::OperandA => self.unpack.a,
            Observable::OperandB => self.unpack.b,
            Observable::RangeError => self.unpack.range_error,
            Observable::SignA => self.abs_a.sign_bit,
            Observable::SignB => self.abs_b.sign_bit,
            Observable::ProductSign => self.fix_sign.product_is_negative,
            Observable::AbsA => self.abs_a.abs_value,
            Observable::AbsB => self.abs_b.abs_value,
            Observable::InitProduct => self.multiply.init_product,
            Observable::FinalProduct => self.fix_sign.final_product,
            Observable::Returned => self.fix_sign.returned,
        }
    }
}
