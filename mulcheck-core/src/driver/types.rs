//! driver types

use std::fmt::Display;

use nohash_hasher::IntMap;

use crate::check::{Tally, Verdict};
use crate::guard::GuardPolicy;
use crate::report::GuardRecord;

/// states of the verification driver
///
/// `Idle -> PerVectorSetup -> InvokeUnpack -> InvokeAbsA -> InvokeAbsB
/// -> InvokeMultiply -> InvokeFixSign -> Score`, then either back to
/// `PerVectorSetup` for the next vector or on to `RunComplete -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DriverState {
    #[default]
    Idle,
    PerVectorSetup,
    InvokeUnpack,
    InvokeAbsA,
    InvokeAbsB,
    InvokeMultiply,
    InvokeFixSign,
    Score,
    RunComplete,
}

impl DriverState {
    /// true for the states that bracket a routine call
    pub fn is_invoke(&self) -> bool {
        matches!(
            self,
            Self::InvokeUnpack
                | Self::InvokeAbsA
                | Self::InvokeAbsB
                | Self::InvokeMultiply
                | Self::InvokeFixSign
        )
    }
}

/// an externally triggered step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tick(pub u64);

impl Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// cumulative statistics of the run
///
/// never reset; every counter only grows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    tally: Tally,
    register_mismatches: u64,
    corrupted_calls: u32,
    passes: u32,
    failures: IntMap<usize, u32>,
}

impl RunStatistics {
    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn pass(&self) -> u32 {
        self.tally.pass()
    }

    pub fn fail(&self) -> u32 {
        self.tally.fail()
    }

    pub fn total(&self) -> u32 {
        self.tally.total()
    }

    /// registers found disturbed, summed over every guarded call
    pub fn register_mismatches(&self) -> u64 {
        self.register_mismatches
    }

    /// guarded calls that disturbed at least one register
    pub fn corrupted_calls(&self) -> u32 {
        self.corrupted_calls
    }

    /// completed passes over the vector table
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// cumulative failures of one vector
    pub fn failures(&self, index: usize) -> u32 {
        self.failures.get(&index).copied().unwrap_or_default()
    }

    /// (vector index, failures) for every vector that ever failed
    pub fn failing_vectors(&self) -> Vec<(usize, u32)> {
        let mut failing = self.failures
            .iter()
            .map(|(index, count)| (*index, *count))
            .collect::<Vec<_>>();
        failing.sort_unstable();
        failing
    }

    pub(crate) fn record_vector(
        &mut self,
        index: usize,
        tally: &Tally,
        guard: &[GuardRecord],
        policy: GuardPolicy,
    ) {
        self.tally.absorb(tally);
        let mut failures = tally.fail();

        for record in guard.iter().filter(|record| record.mismatches > 0) {
            self.register_mismatches += record.mismatches as u64;
            self.corrupted_calls += 1;
            if policy == GuardPolicy::Escalate {
                self.tally.record(Verdict::Fail);
                failures += 1;
            }
        }

        if failures > 0 {
            *self.failures.entry(index).or_default() += failures;
        }
    }

    pub(crate) fn record_pass(&mut self) {
        self.passes += 1;
    }
}
