//! register guard
//!
//! brackets a call to an untrusted routine with a known register
//! pattern and reports how many callee-saved registers it disturbed

use std::ops::Index;

use serde::{Deserialize, Serialize};

/// number of callee-saved registers watched (r4-r11)
pub const NUM_CONSERVED_REGS: usize = 8;

/// names of the watched registers, in snapshot order
pub const CONSERVED_REG_NAMES: [&str; NUM_CONSERVED_REGS] = [
    "r4", "r5", "r6", "r7", "r8", "r9", "r10", "r11",
];

/// default baseline: distinct, easily spotted, never zero
pub const DEFAULT_PATTERN: [u32; NUM_CONSERVED_REGS] = [
    0xCAFEF00D, 0x7250D00D, 0xD000000D, 0x1000000D,
    0x42424242, 0xCAAAAAAA, 0xC0DE0042, 0x08675309,
];

/// the values of the watched register set at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Deserialize, Serialize)]
#[serde(transparent)]
pub struct RegisterSnapshot([u32; NUM_CONSERVED_REGS]);

impl RegisterSnapshot {
    pub const fn new(values: [u32; NUM_CONSERVED_REGS]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[u32; NUM_CONSERVED_REGS] {
        &self.0
    }

    /// iterate (register name, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        CONSERVED_REG_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl Default for RegisterSnapshot {
    fn default() -> Self {
        Self(DEFAULT_PATTERN)
    }
}

impl Index<usize> for RegisterSnapshot {
    type Output = u32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<[u32; NUM_CONSERVED_REGS]> for RegisterSnapshot {
    fn from(values: [u32; NUM_CONSERVED_REGS]) -> Self {
        Self(values)
    }
}

/// access to the callee-saved register set of the target
///
/// on hardware both operations are thin assembly shims; in simulation
/// they read and write a software register file
pub trait RegisterBank {
    /// load `pattern` into the watched registers and return the baseline
    /// actually written
    fn snapshot(&mut self, pattern: &RegisterSnapshot) -> RegisterSnapshot;

    /// read the watched registers back
    fn extract(&self) -> RegisterSnapshot;
}

/// number of registers that differ between the two snapshots
pub fn compare(baseline: &RegisterSnapshot, observed: &RegisterSnapshot) -> usize {
    baseline
        .0
        .iter()
        .zip(observed.0.iter())
        .filter(|(lhs, rhs)| lhs != rhs)
        .count()
}

/// the registers that differ, as (name, baseline, observed)
pub fn mismatched<'a>(
    baseline: &'a RegisterSnapshot,
    observed: &'a RegisterSnapshot,
) -> impl Iterator<Item = (&'static str, u32, u32)> + 'a {
    baseline
        .iter()
        .zip(observed.0.iter().copied())
        .filter(|((_, lhs), rhs)| lhs != rhs)
        .map(|((name, lhs), rhs)| (name, lhs, rhs))
}

/// what to do with a detected register corruption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardPolicy {
    /// count the mismatches and report them, leave pass/fail alone
    Record,
    /// additionally count every corrupting call as one failure
    #[default]
    Escalate,
}

/// result of a guarded call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guarded<R> {
    pub output: R,
    pub observed: RegisterSnapshot,
    pub mismatches: usize,
}

impl<R> Guarded<R> {
    pub fn is_clean(&self) -> bool {
        self.mismatches == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    pattern: RegisterSnapshot,
    policy: GuardPolicy,
}

impl Guard {
    pub fn new(pattern: RegisterSnapshot, policy: GuardPolicy) -> Self {
        Self { pattern, policy }
    }

    pub fn pattern(&self) -> &RegisterSnapshot {
        &self.pattern
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    /// run `call` between a snapshot and an extract of `bank`
    ///
    /// nothing else may touch the register set while the call runs,
    /// which is why the whole cycle lives in one function
    pub fn call<B, F, R>(&self, bank: &mut B, call: F) -> Guarded<R>
    where
        B: RegisterBank + ?Sized,
        F: FnOnce(&mut B) -> R,
    {
        let baseline = bank.snapshot(&self.pattern);
        let output = call(bank);
        let observed = bank.extract();
        let mismatches = compare(&baseline, &observed);

        for (name, expected, actual) in mismatched(&baseline, &observed) {
            log::warn!("{name} not preserved: {expected:#010x} -> {actual:#010x}");
        }

        Guarded { output, observed, mismatches }
    }
}

impl Default for Guard {
    fn default() -> Self {
        Self::new(RegisterSnapshot::default(), GuardPolicy::default())
    }
}
