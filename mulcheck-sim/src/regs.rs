//! simulated register file
//! 
//! the core registers of the target, indexed by `Reg`,
//! plus a full-descending stack for push/pop

use mulcheck_core::guard::{RegisterBank, RegisterSnapshot, NUM_CONSERVED_REGS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    R0, R1, R2, R3, R4, R5, R6, R7, R8, R9, R10, R11, R12, Sp, Lr,
}

impl Reg {
    pub const COUNT: usize = 15;

    /// the callee-saved registers, in guard order
    pub const CONSERVED: [Reg; NUM_CONSERVED_REGS] = [
        Reg::R4, Reg::R5, Reg::R6, Reg::R7, Reg::R8, Reg::R9, Reg::R10, Reg::R11,
    ];
}

/// initial stack pointer; the stack itself is not memory mapped
const STACK_TOP: u32 = 0x2000_8000;

#[derive(Debug, Clone)]
pub struct SoftRegisters {
    regs: [u32; Reg::COUNT],
    stack: Vec<u32>,
}

impl Default for SoftRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftRegisters {
    pub fn new() -> Self {
        let mut regs = [0u32; Reg::COUNT];
        regs[Reg::Sp as usize] = STACK_TOP;
        Self { regs, stack: Vec::new() }
    }

    pub fn get(&self, reg: Reg) -> u32 {
        self.regs[reg as usize]
    }

    pub fn set(&mut self, reg: Reg, value: u32) {
        self.regs[reg as usize] = value;
    }

    /// push registers in list order
    pub fn push(&mut self, regs: &[Reg]) {
        for reg in regs {
            self.stack.push(self.get(*reg));
        }
        self.sync_sp();
    }

    /// pop registers pushed with the same list
    /// 
    /// an unbalanced pop reads zeroed stack memory
    pub fn pop(&mut self, regs: &[Reg]) {
        for reg in regs.iter().rev() {
            let value = self.stack.pop().unwrap_or_default();
            self.set(*reg, value);
        }
        self.sync_sp();
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    fn sync_sp(&mut self) {
        let depth = self.stack.len() as u32;
        self.regs[Reg::Sp as usize] = STACK_TOP.wrapping_sub(depth * 4);
    }
}

impl RegisterBank for SoftRegisters {
    fn snapshot(&mut self, pattern: &RegisterSnapshot) -> RegisterSnapshot {
        for (reg, value) in Reg::CONSERVED.iter().zip(pattern.values().iter()) {
            self.set(*reg, *value);
        }
        self.extract()
    }

    fn extract(&self) -> RegisterSnapshot {
        RegisterSnapshot::new(Reg::CONSERVED.map(|reg| self.get(reg)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mulcheck_core::guard::DEFAULT_PATTERN;

    #[test]
    fn test_push_pop() {
        let mut regs = SoftRegisters::new();
        regs.set(Reg::R4, 4);
        regs.set(Reg::R5, 5);
        regs.push(&[Reg::R4, Reg::R5]);
        assert_eq!(regs.get(Reg::Sp), STACK_TOP - 8);

        regs.set(Reg::R4, 0);
        regs.set(Reg::R5, 0);
        regs.pop(&[Reg::R4, Reg::R5]);
        assert_eq!((regs.get(Reg::R4), regs.get(Reg::R5)), (4, 5));
        assert_eq!(regs.stack_depth(), 0);
        assert_eq!(regs.get(Reg::Sp), STACK_TOP);
    }

    #[test]
    fn test_register_bank() {
        let mut regs = SoftRegisters::new();
        let pattern = RegisterSnapshot::default();
        let seeded = regs.snapshot(&pattern);
        assert_eq!(*seeded.values(), DEFAULT_PATTERN);
        assert_eq!(regs.get(Reg::R11), DEFAULT_PATTERN[7]);
        assert_eq!(regs.extract(), pattern);
    }
}
