//! test vectors
//!
//! the fixed, ordered table of packed operand pairs that is driven
//! through the routines under test on every pass

use std::fmt::Display;

use bitfield_struct::bitfield;

/// a packed operand pair
///
/// operand b lives in bits [0, 16) and operand a in bits [16, 32).
/// both halves are two's complement and must be sign-extended on unpack
#[bitfield(u32)]
#[derive(PartialEq, Eq, Hash)]
pub struct PackedVector {
    pub b: u16,
    pub a: u16,
}

impl PackedVector {
    /// pack two signed 16-bit operands
    pub fn from_operands(a: i16, b: i16) -> Self {
        Self::new()
            .with_a(a as u16)
            .with_b(b as u16)
    }

    /// sign-extended upper half
    pub fn operand_a(&self) -> i32 {
        self.a() as i16 as i32
    }

    /// sign-extended lower half
    pub fn operand_b(&self) -> i32 {
        self.b() as i16 as i32
    }
}

/// a single entry of the vector table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestVector {
    value: u32,
    label: &'static str,
}

impl TestVector {
    pub const fn new(value: u32, label: &'static str) -> Self {
        Self { value, label }
    }

    /// the raw packed value handed to the unpack routine
    pub fn value(&self) -> u32 {
        self.value
    }

    /// what the vector is meant to exercise
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn packed(&self) -> PackedVector {
        PackedVector::from(self.value)
    }
}

impl Display for TestVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x} ({})", self.value, self.label)
    }
}

/// the reference vector table
pub const VECTORS: [TestVector; 10] = [
    TestVector::new(0xFFFC0003, "negative times positive"),
    TestVector::new(0x00000000, "zero times zero"),
    TestVector::new(0x00000005, "zero times positive"),
    TestVector::new(0x0000FFFC, "zero times negative"),
    TestVector::new(0xFFFD0000, "negative times zero"),
    TestVector::new(0x00020000, "positive times zero"),
    TestVector::new(0x80008000, "most negative times most negative"),
    TestVector::new(0xFFF3FFE0, "negative times negative"),
    TestVector::new(0x7FF38001, "large positive times large negative"),
    TestVector::new(0x7FF17FF2, "large positive times large positive"),
];

pub fn table() -> &'static [TestVector] {
    &VECTORS
}
