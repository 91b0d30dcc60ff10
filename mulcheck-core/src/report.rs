//! reports
//!
//! structured results handed to the report collaborator. rendering them
//! as text and shipping them anywhere is the sink's business.

use std::convert::Infallible;

use crate::check::{Comparison, Observable, Observables, Tally};
use crate::guard::{GuardPolicy, CONSERVED_REG_NAMES, NUM_CONSERVED_REGS};
use crate::routine::Call;
use crate::vector::TestVector;

/// emitted once at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub observables: [Observable; Observable::COUNT],
    pub registers: [&'static str; NUM_CONSERVED_REGS],
    pub vectors: usize,
    pub policy: GuardPolicy,
}

impl Banner {
    pub fn new(vectors: usize, policy: GuardPolicy) -> Self {
        Self {
            observables: Observable::ALL,
            registers: CONSERVED_REG_NAMES,
            vectors,
            policy,
        }
    }
}

/// register guard outcome for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuardRecord {
    pub call: Call,
    pub mismatches: usize,
}

/// the scored result of one vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorReport {
    pub index: usize,
    pub vector: TestVector,
    /// expected/actual pairs in report order
    pub comparisons: [Comparison; Observable::COUNT],
    pub guard: [GuardRecord; Call::COUNT],
    /// comparator verdicts for this vector only
    pub tally: Tally,
    pub failed: Observables,
}

impl VectorReport {
    /// expected operand a and b, i.e. the test case inputs
    pub fn inputs(&self) -> (i32, i32) {
        (
            self.comparisons[Observable::OperandA as usize].expected,
            self.comparisons[Observable::OperandB as usize].expected,
        )
    }

    pub fn comparison(&self, observable: Observable) -> &Comparison {
        &self.comparisons[observable as usize]
    }

    pub fn register_mismatches(&self) -> usize {
        self.guard.iter().map(|g| g.mismatches).sum()
    }

    pub fn passed(&self) -> bool {
        self.failed.is_empty() && self.register_mismatches() == 0
    }
}

/// raw values returned by the calls of the last vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Returned {
    pub abs_a: i32,
    pub abs_b: i32,
    pub unpack: i32,
    pub init_product: i32,
    pub final_product: i32,
    pub mismatches: usize,
}

/// running totals after a vector has been scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Progress {
    pub tally: Tally,
    pub register_mismatches: u64,
    pub returned: Returned,
}

/// emitted when the vector table has been exhausted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// number of completed passes, this one included
    pub pass_number: u32,
    pub tally: Tally,
    pub register_mismatches: u64,
    pub corrupted_calls: u32,
    /// (vector index, cumulative failures) for every vector that failed
    pub failing_vectors: Vec<(usize, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Banner(Banner),
    Vector(VectorReport),
    Progress(Progress),
    Complete(Summary),
}

/// the report collaborator
///
/// delivery may be asynchronous; the board is responsible for not
/// ticking the driver again before the previous report has gone out
pub trait ReportSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn emit_report(&mut self, report: &Report) -> Result<(), Self::Error>;
}

/// collects reports in memory
impl ReportSink for Vec<Report> {
    type Error = Infallible;

    fn emit_report(&mut self, report: &Report) -> Result<(), Self::Error> {
        self.push(report.clone());
        Ok(())
    }
}
