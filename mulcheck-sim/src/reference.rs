//! reference target
//! 
//! a register-level model of the four routines following the arm
//! procedure call standard: arguments arrive in r0-r3, results leave in
//! r0, r0-r3 and r12 are scratch and r4-r11 must be preserved. faults can
//! be injected to exercise the harness against a broken target.

use bitflags::bitflags;

use mulcheck_core::guard::{RegisterBank, RegisterSnapshot};
use mulcheck_core::routine::{
    AbsOutput, FixSignOutput, MultiplyOutput, Routines, UnpackOutput,
};

use crate::regs::{Reg, SoftRegisters};

bitflags! {
    /// injectable routine bugs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Faults: u16 {
        /// unpack uses r11 as scratch
        const CLOBBER_R11  = 1 << 0;
        /// unpack zero-extends operand b
        const ZERO_EXTEND  = 1 << 1;
        /// abs always reports a positive sign
        const STUCK_SIGN   = 1 << 2;
        /// multiply uses r4 and r5 without saving them
        const SKIP_RESTORE = 1 << 3;
        /// multiply adds one to every product
        const OFF_BY_ONE   = 1 << 4;
        /// fix sign flags a zero product as negative when the signs differ
        const LOOSE_SIGN   = 1 << 5;
        /// unpack reports a range error and a failing status for every vector
        const RANGE_FLAG   = 1 << 6;
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceTarget {
    regs: SoftRegisters,
    faults: Faults,
}

impl ReferenceTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        Self { faults, ..Self::default() }
    }

    pub fn faults(&self) -> Faults {
        self.faults
    }

    pub fn set_faults(&mut self, faults: Faults) {
        self.faults = faults;
    }

    pub fn regs(&self) -> &SoftRegisters {
        &self.regs
    }

    fn arg(&mut self, reg: Reg, value: i32) {
        self.regs.set(reg, value as u32);
    }

    fn r(&self, reg: Reg) -> u32 {
        self.regs.get(reg)
    }

    fn ret(&self) -> i32 {
        self.regs.get(Reg::R0) as i32
    }
}

impl RegisterBank for ReferenceTarget {
    fn snapshot(&mut self, pattern: &RegisterSnapshot) -> RegisterSnapshot {
        self.regs.snapshot(pattern)
    }

    fn extract(&self) -> RegisterSnapshot {
        self.regs.extract()
    }
}

impl Routines for ReferenceTarget {
    fn unpack(&mut self, packed: u32) -> UnpackOutput {
        self.regs.set(Reg::R0, packed);

        // asr r1, r0, #16
        self.regs.set(Reg::R1, ((self.r(Reg::R0) as i32) >> 16) as u32);
        // sxth r2, r0 (uxth with the fault)
        let low = self.r(Reg::R0) & 0xFFFF;
        let b = if self.faults.contains(Faults::ZERO_EXTEND) {
            low
        } else {
            low as u16 as i16 as i32 as u32
        };
        let scratch = if self.faults.contains(Faults::CLOBBER_R11) { Reg::R11 } else { Reg::R12 };
        self.regs.set(scratch, b);
        self.regs.set(Reg::R2, self.r(scratch));

        // both halves of a 32-bit word always fit in 16 bits
        let status = u32::from(self.faults.contains(Faults::RANGE_FLAG));
        self.regs.set(Reg::R3, status);
        self.regs.set(Reg::R0, status);

        UnpackOutput {
            returned: self.ret(),
            range_error: self.r(Reg::R3) as i32,
            a: self.r(Reg::R1) as i32,
            b: self.r(Reg::R2) as i32,
        }
    }

    fn abs(&mut self, value: i32) -> AbsOutput {
        self.arg(Reg::R0, value);

        // lsr r1, r0, #31
        let sign = if self.faults.contains(Faults::STUCK_SIGN) { 0 } else { self.r(Reg::R0) >> 31 };
        self.regs.set(Reg::R1, sign);
        // negative: rsb r0, r0, #0
        if self.r(Reg::R0) >> 31 == 1 {
            self.regs.set(Reg::R0, self.r(Reg::R0).wrapping_neg());
        }

        AbsOutput {
            returned: self.ret(),
            abs_value: self.ret(),
            sign_bit: self.r(Reg::R1) as i32,
        }
    }

    fn multiply(&mut self, a: i32, b: i32) -> MultiplyOutput {
        self.arg(Reg::R0, a);
        self.arg(Reg::R1, b);

        let save = !self.faults.contains(Faults::SKIP_RESTORE);
        if save {
            self.regs.push(&[Reg::R4, Reg::R5]);
        }

        // r4: product, r5: multiplier, r2: shifted multiplicand
        self.regs.set(Reg::R4, 0);
        self.regs.set(Reg::R5, self.r(Reg::R1));
        self.regs.set(Reg::R2, self.r(Reg::R0));
        while self.r(Reg::R5) != 0 {
            if self.r(Reg::R5) & 1 == 1 {
                self.regs.set(Reg::R4, self.r(Reg::R4).wrapping_add(self.r(Reg::R2)));
            }
            self.regs.set(Reg::R2, self.r(Reg::R2) << 1);
            self.regs.set(Reg::R5, self.r(Reg::R5) >> 1);
        }
        if self.faults.contains(Faults::OFF_BY_ONE) {
            self.regs.set(Reg::R4, self.r(Reg::R4).wrapping_add(1));
        }
        self.regs.set(Reg::R0, self.r(Reg::R4));

        if save {
            self.regs.pop(&[Reg::R4, Reg::R5]);
        }

        MultiplyOutput {
            returned: self.ret(),
            init_product: self.ret(),
        }
    }

    fn fix_sign(&mut self, product: i32, sign_a: i32, sign_b: i32) -> FixSignOutput {
        self.arg(Reg::R0, product);
        self.arg(Reg::R1, sign_a);
        self.arg(Reg::R2, sign_b);

        // eor r3, r1, r2
        self.regs.set(Reg::R3, self.r(Reg::R1) ^ self.r(Reg::R2));
        if self.r(Reg::R0) == 0 && !self.faults.contains(Faults::LOOSE_SIGN) {
            self.regs.set(Reg::R3, 0);
        }
        if self.r(Reg::R3) != 0 {
            self.regs.set(Reg::R0, self.r(Reg::R0).wrapping_neg());
        }

        FixSignOutput {
            returned: self.ret(),
            final_product: self.ret(),
            product_is_negative: self.r(Reg::R3) as i32,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mulcheck_core::check::{check_all, Tally};
    use mulcheck_core::guard::Guard;
    use mulcheck_core::oracle;
    use mulcheck_core::routine::ActualResult;
    use mulcheck_core::vector;

    fn run_vector(target: &mut ReferenceTarget, packed: u32) -> ActualResult {
        let unpack = target.unpack(packed);
        let abs_a = target.abs(unpack.a);
        let abs_b = target.abs(unpack.b);
        let multiply = target.multiply(abs_a.abs_value, abs_b.abs_value);
        let fix_sign = target.fix_sign(multiply.returned, abs_a.sign_bit, abs_b.sign_bit);
        ActualResult { unpack, abs_a, abs_b, multiply, fix_sign }
    }

    #[test]
    fn test_reference_matches_oracle() {
        let mut target = ReferenceTarget::new();
        let mut tally = Tally::new();

        for v in vector::table() {
            let actual = run_vector(&mut target, v.value());
            check_all(&oracle::evaluate(v.value()), &actual, &mut tally);
        }

        assert_eq!(tally.pass(), 110);
        assert_eq!(tally.fail(), 0);
        assert_eq!(target.regs().stack_depth(), 0);
    }

    #[test]
    fn test_multiply_preserves_registers() {
        let guard = Guard::default();
        let mut target = ReferenceTarget::new();

        let guarded = guard.call(&mut target, |t| t.multiply(32768, 32768));
        assert!(guarded.is_clean());
        assert_eq!(guarded.output.init_product, 1 << 30);

        target.set_faults(Faults::SKIP_RESTORE);
        let guarded = guard.call(&mut target, |t| t.multiply(7, 6));
        assert_eq!(guarded.output.returned, 42);
        // r4 holds the product and r5 the drained multiplier
        assert_eq!(guarded.mismatches, 2);
    }

    #[test]
    fn test_faults() {
        let guard = Guard::default();

        let mut target = ReferenceTarget::with_faults(Faults::CLOBBER_R11);
        let guarded = guard.call(&mut target, |t| t.unpack(0xFFFC0003));
        assert_eq!(guarded.mismatches, 1);
        assert_eq!((guarded.output.a, guarded.output.b), (-4, 3));

        let mut target = ReferenceTarget::with_faults(Faults::ZERO_EXTEND);
        assert_eq!(target.unpack(0x0000FFFC).b, 0xFFFC);

        let mut target = ReferenceTarget::with_faults(Faults::RANGE_FLAG);
        let unpack = target.unpack(0x7FF17FF2);
        assert_eq!((unpack.returned, unpack.range_error), (1, 1));
        assert_eq!((unpack.a, unpack.b), (32753, 32754));

        let mut target = ReferenceTarget::with_faults(Faults::STUCK_SIGN);
        let abs = target.abs(-4);
        assert_eq!((abs.abs_value, abs.sign_bit), (4, 0));

        let mut target = ReferenceTarget::with_faults(Faults::LOOSE_SIGN);
        assert_eq!(target.fix_sign(0, 0, 1).product_is_negative, 1);
        assert_eq!(target.fix_sign(0, 0, 1).final_product, 0);

        let mut target = ReferenceTarget::new();
        assert_eq!(target.fix_sign(0, 0, 1).product_is_negative, 0);
        assert_eq!(target.fix_sign(12, 1, 0).final_product, -12);
    }
}
