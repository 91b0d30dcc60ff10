//! comparator
//!
//! classifies expected/actual pairs and keeps the running pass/fail tally

use std::fmt::Display;

use bitflags::bitflags;

/// the eleven observables compared for every vector, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Observable {
    OperandA,
    OperandB,
    RangeError,
    SignA,
    SignB,
    ProductSign,
    AbsA,
    AbsB,
    InitProduct,
    FinalProduct,
    Returned,
}

impl Observable {
    pub const COUNT: usize = 11;

    pub const ALL: [Observable; Observable::COUNT] = [
        Observable::OperandA,
        Observable::OperandB,
        Observable::RangeError,
        Observable::SignA,
        Observable::SignB,
        Observable::ProductSign,
        Observable::AbsA,
        Observable::AbsB,
        Observable::InitProduct,
        Observable::FinalProduct,
        Observable::Returned,
    ];

    /// name of the value as exposed by the routine under test
    pub fn name(&self) -> &'static str {
        match self {
            Self::OperandA => "a_Multiplicand",
            Self::OperandB => "b_Multiplier",
            Self::RangeError => "rng_Error",
            Self::SignA => "a_Sign",
            Self::SignB => "b_Sign",
            Self::ProductSign => "prod_Is_Neg",
            Self::AbsA => "a_Abs",
            Self::AbsB => "b_Abs",
            Self::InitProduct => "init_Product",
            Self::FinalProduct => "final_Product",
            Self::Returned => "returned value",
        }
    }

    /// short description used for the pass/fail lines of a report
    pub fn description(&self) -> &'static str {
        match self {
            Self::OperandA => "a check",
            Self::OperandB => "b check",
            Self::RangeError => "input range check",
            Self::SignA => "sign bit a check",
            Self::SignB => "sign bit b check",
            Self::ProductSign => "prod sign check",
            Self::AbsA => "abs a check",
            Self::AbsB => "abs b check",
            Self::InitProduct => "initial product",
            Self::FinalProduct => "final product",
            Self::Returned => "returned result",
        }
    }

    pub fn flag(&self) -> Observables {
        Observables::from_bits_truncate(1 << (*self as u16))
    }
}

impl Display for Observable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// a set of observables, e.g. the ones that failed for a vector
    #[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, Default)]
    pub struct Observables: u16 {
        const OPERAND_A     = 1 << 0;
        const OPERAND_B     = 1 << 1;
        const RANGE_ERROR   = 1 << 2;
        const SIGN_A        = 1 << 3;
        const SIGN_B        = 1 << 4;
        const PRODUCT_SIGN  = 1 << 5;
        const ABS_A         = 1 << 6;
        const ABS_B         = 1 << 7;
        const INIT_PRODUCT  = 1 << 8;
        const FINAL_PRODUCT = 1 << 9;
        const RETURNED      = 1 << 10;
    }
}

impl Observables {
    /// iterate the members of the set in report order
    pub fn observables(&self) -> impl Iterator<Item = Observable> + '_ {
        Observable::ALL
            .into_iter()
            .filter(move |obs| self.contains(obs.flag()))
    }
}

/// anything that can be read out as a full row of observables
pub trait Observe {
    fn observe(&self, observable: Observable) -> i32;
}

/// outcome of a single comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.marker())
    }
}

/// pass/fail counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tally {
    pass: u32,
    fail: u32,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass(&self) -> u32 {
        self.pass
    }

    pub fn fail(&self) -> u32 {
        self.fail
    }

    pub fn total(&self) -> u32 {
        self.pass + self.fail
    }

    /// increment exactly one of the counters
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.pass += 1,
            Verdict::Fail => self.fail += 1,
        }
    }

    /// fold another tally into this one
    pub fn absorb(&mut self, other: &Tally) {
        self.pass += other.pass;
        self.fail += other.fail;
    }
}

/// compare one expected/actual pair and record the verdict
pub fn check(expected: i32, actual: i32, tally: &mut Tally) -> Verdict {
    let verdict = if expected == actual {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    tally.record(verdict);
    verdict
}

/// a single scored observable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Comparison {
    pub observable: Observable,
    pub expected: i32,
    pub actual: i32,
    pub verdict: Verdict,
}

/// score every observable of `actual` against `expected`, in report order
pub fn check_all<E, A>(expected: &E, actual: &A, tally: &mut Tally) -> [Comparison; Observable::COUNT]
where
    E: Observe,
    A: Observe,
{
    Observable::ALL.map(|observable| {
        let expected = expected.observe(observable);
        let actual = actual.observe(observable);
        let verdict = check(expected, actual, tally);
        if !verdict.is_pass() {
            log::warn!("{observable}: expected {expected}, got {actual}");
        }
        Comparison { observable, expected, actual, verdict }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row([i32; Observable::COUNT]);

    impl Observe for Row {
        fn observe(&self, observable: Observable) -> i32 {
            self.0[observable as usize]
        }
    }

    #[test]
    fn test_check_equal_passes() {
        let mut tally = Tally::new();
        for v in [0, -1, i32::MIN, i32::MAX, 1073741824] {
            let verdict = check(v, v, &mut tally);
            assert_eq!(verdict, Verdict::Pass);
            assert_eq!(verdict.marker(), "PASS");
        }
        assert_eq!(tally.pass(), 5);
        assert_eq!(tally.fail(), 0);
    }

    #[test]
    fn test_check_unequal_fails() {
        let mut tally = Tally::new();
        let verdict = check(-12, 12, &mut tally);
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(verdict.to_string(), "FAIL");
        assert_eq!(tally.pass(), 0);
        assert_eq!(tally.fail(), 1);
        assert_eq!(tally.total(), 1);
    }

    #[test]
    fn test_check_all_in_report_order() {
        let expected = Row([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        let actual = Row([1, 2, 3, 4, 0, 6, 7, 8, 9, 10, 0]);
        let mut tally = Tally::new();

        let row = check_all(&expected, &actual, &mut tally);

        assert_eq!(tally.pass(), 9);
        assert_eq!(tally.fail(), 2);
        assert_eq!(row.map(|c| c.observable), Observable::ALL);

        let failed = row
            .iter()
            .filter(|c| !c.verdict.is_pass())
            .fold(Observables::empty(), |acc, c| acc | c.observable.flag());
        assert_eq!(failed, Observables::SIGN_B | Observables::RETURNED);
        assert_eq!(
            failed.observables().collect::<Vec<_>>(),
            vec![Observable::SignB, Observable::Returned],
        );
    }

    #[test]
    fn test_flags_match_variants() {
        assert_eq!(Observable::OperandA.flag(), Observables::OPERAND_A);
        assert_eq!(Observable::ProductSign.flag(), Observables::PRODUCT_SIGN);
        assert_eq!(Observable::Returned.flag(), Observables::RETURNED);
        assert_eq!(Observables::all().observables().count(), Observable::COUNT);
    }
}
