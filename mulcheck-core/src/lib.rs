//! mulcheck core
//!
//! the verification engine of the harness: a pure oracle for the
//! unpack / abs / multiply / fix-sign pipeline, the comparator that
//! scores routine outputs against it, the callee-saved register guard
//! and the tick-driven driver that ties them together

pub mod check;
pub mod config;
pub mod driver;
pub mod guard;
pub mod oracle;
pub mod report;
pub mod routine;
pub mod vector;

pub use check::{check, Observable, Observables, Tally, Verdict};
pub use config::HarnessConfig;
pub use driver::{Driver, DriverState, RunStatistics, Tick};
pub use guard::{Guard, GuardPolicy, RegisterBank, RegisterSnapshot};
pub use oracle::{evaluate, ExpectedResult, Operand};
pub use report::{Report, ReportSink};
pub use routine::{ActualResult, Routines, Target};
pub use vector::{PackedVector, TestVector};
