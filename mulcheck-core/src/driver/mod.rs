//! verification driver
//!
//! walks the vector table one state per tick. every routine call is
//! bracketed by the register guard, every vector is scored against the
//! oracle, and the results are handed to a report sink. the driver
//! never stops: after the last vector it reports a summary, goes idle
//! and starts over with the statistics still accumulating.

pub mod error;
pub mod types;

pub use error::Error;
pub use types::*;

use crate::check::{self, Observables, Tally};
use crate::config::HarnessConfig;
use crate::guard::Guard;
use crate::oracle;
use crate::report::{
    Banner, GuardRecord, Progress, Report, ReportSink, Returned, Summary, VectorReport,
};
use crate::routine::{ActualResult, Call, Target};
use crate::vector::{self, TestVector};

/// per-vector scratch, rebuilt in `PerVectorSetup`
#[derive(Debug, Clone, Copy, Default)]
struct Scratch {
    actual: ActualResult,
    mismatches: [usize; Call::COUNT],
    /// reports of the current step already accepted by the sink
    delivered: usize,
}

pub struct Driver<T> {
    target: T,
    vectors: &'static [TestVector],
    guard: Guard,
    state: DriverState,
    index: usize,
    scratch: Scratch,
    stats: RunStatistics,
    banner_pending: bool,
}

impl<T: Target> Driver<T> {
    /// create a driver over the reference vector table
    pub fn new(target: T, config: &HarnessConfig) -> Self {
        Self {
            target,
            vectors: vector::table(),
            guard: Guard::from(config.guard),
            state: DriverState::Idle,
            index: 0,
            scratch: Scratch::default(),
            stats: RunStatistics::default(),
            banner_pending: config.banner,
        }
    }

    /// run a different fixed table
    pub fn with_vectors(mut self, vectors: &'static [TestVector]) -> Self {
        self.vectors = vectors;
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// index of the vector currently being worked on
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn vectors(&self) -> &'static [TestVector] {
        self.vectors
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    fn next_state(&self) -> DriverState {
        match self.state {
            DriverState::Idle if self.vectors.is_empty() => DriverState::RunComplete,
            DriverState::Idle => DriverState::PerVectorSetup,
            DriverState::PerVectorSetup => DriverState::InvokeUnpack,
            DriverState::InvokeUnpack => DriverState::InvokeAbsA,
            DriverState::InvokeAbsA => DriverState::InvokeAbsB,
            DriverState::InvokeAbsB => DriverState::InvokeMultiply,
            DriverState::InvokeMultiply => DriverState::InvokeFixSign,
            DriverState::InvokeFixSign => DriverState::Score,
            DriverState::Score if self.index + 1 < self.vectors.len() => DriverState::PerVectorSetup,
            DriverState::Score => DriverState::RunComplete,
            DriverState::RunComplete => DriverState::Idle,
        }
    }

    /// perform the work of the next state and enter it
    ///
    /// on error the driver stays in its current state and the same step
    /// is attempted again on the next tick
    pub fn advance<S>(&mut self, tick: Tick, sink: &mut S) -> Result<DriverState, Error>
    where
        S: ReportSink + ?Sized,
    {
        let next = self.next_state();

        match next {
            DriverState::Idle => (),
            DriverState::PerVectorSetup => self.setup(sink)?,
            DriverState::InvokeUnpack => {
                let packed = self.vectors[self.index].value();
                self.scratch.actual.unpack = self.invoke(Call::Unpack, |t| t.unpack(packed));
            }
            DriverState::InvokeAbsA => {
                let a = self.scratch.actual.unpack.a;
                self.scratch.actual.abs_a = self.invoke(Call::AbsA, |t| t.abs(a));
            }
            DriverState::InvokeAbsB => {
                let b = self.scratch.actual.unpack.b;
                self.scratch.actual.abs_b = self.invoke(Call::AbsB, |t| t.abs(b));
            }
            DriverState::InvokeMultiply => {
                let a = self.scratch.actual.abs_a.abs_value;
                let b = self.scratch.actual.abs_b.abs_value;
                self.scratch.actual.multiply = self.invoke(Call::Multiply, |t| t.multiply(a, b));
            }
            DriverState::InvokeFixSign => {
                let product = self.scratch.actual.multiply.returned;
                let sign_a = self.scratch.actual.abs_a.sign_bit;
                let sign_b = self.scratch.actual.abs_b.sign_bit;
                self.scratch.actual.fix_sign =
                    self.invoke(Call::FixSign, |t| t.fix_sign(product, sign_a, sign_b));
            }
            DriverState::Score => self.score(sink)?,
            DriverState::RunComplete => self.complete(sink)?,
        }

        log::debug!("tick {tick}: {:?} -> {:?} (vector {})", self.state, next, self.index);
        self.state = next;
        Ok(next)
    }

    fn setup<S>(&mut self, sink: &mut S) -> Result<(), Error>
    where
        S: ReportSink + ?Sized,
    {
        // only ever true on the tick leaving the initial idle
        if self.banner_pending {
            let banner = Banner::new(self.vectors.len(), self.guard.policy());
            sink.emit_report(&Report::Banner(banner)).map_err(Error::transport)?;
            self.banner_pending = false;
        }

        if self.state == DriverState::Score {
            self.index += 1;
        } else {
            self.index = 0;
        }
        self.scratch = Scratch::default();
        Ok(())
    }

    fn invoke<R>(&mut self, call: Call, f: impl FnOnce(&mut T) -> R) -> R {
        let guarded = self.guard.call(&mut self.target, f);
        if !guarded.is_clean() {
            log::warn!(
                "vector {}: {call} disturbed {} callee-saved registers",
                self.index,
                guarded.mismatches,
            );
        }
        self.scratch.mismatches[call as usize] = guarded.mismatches;
        guarded.output
    }

    fn score<S>(&mut self, sink: &mut S) -> Result<(), Error>
    where
        S: ReportSink + ?Sized,
    {
        let vector = self.vectors[self.index];
        let actual = &self.scratch.actual;
        let expected = oracle::evaluate(vector.value());

        let mut tally = Tally::new();
        let comparisons = check::check_all(&expected, actual, &mut tally);
        let failed = comparisons
            .iter()
            .filter(|c| !c.verdict.is_pass())
            .fold(Observables::empty(), |acc, c| acc | c.observable.flag());
        let guard = Call::ALL.map(|call| GuardRecord {
            call,
            mismatches: self.scratch.mismatches[call as usize],
        });

        // committed only once both reports are out
        let mut stats = self.stats.clone();
        stats.record_vector(self.index, &tally, &guard, self.guard.policy());

        let report = VectorReport {
            index: self.index,
            vector,
            comparisons,
            guard,
            tally,
            failed,
        };
        if !report.passed() {
            log::warn!("vector {} {vector}: {} checks failed", self.index, tally.fail());
        }

        let progress = Progress {
            tally: *stats.tally(),
            register_mismatches: stats.register_mismatches(),
            returned: Returned {
                abs_a: actual.abs_a.returned,
                abs_b: actual.abs_b.returned,
                unpack: actual.unpack.returned,
                init_product: actual.multiply.returned,
                final_product: actual.fix_sign.returned,
                mismatches: report.register_mismatches(),
            },
        };

        // a retried step resumes after the reports that already went out
        let reports = [Report::Vector(report), Report::Progress(progress)];
        for report in reports.iter().skip(self.scratch.delivered) {
            sink.emit_report(report).map_err(Error::transport)?;
            self.scratch.delivered += 1;
        }

        self.scratch.delivered = 0;
        self.stats = stats;
        Ok(())
    }

    fn complete<S>(&mut self, sink: &mut S) -> Result<(), Error>
    where
        S: ReportSink + ?Sized,
    {
        let mut stats = self.stats.clone();
        stats.record_pass();

        let summary = Summary {
            pass_number: stats.passes(),
            tally: *stats.tally(),
            register_mismatches: stats.register_mismatches(),
            corrupted_calls: stats.corrupted_calls(),
            failing_vectors: stats.failing_vectors(),
        };
        sink.emit_report(&Report::Complete(summary)).map_err(Error::transport)?;

        log::info!(
            "pass {} complete: {} of {} checks passed",
            stats.passes(),
            stats.pass(),
            stats.total(),
        );
        self.stats = stats;
        Ok(())
    }
}
