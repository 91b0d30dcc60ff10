//! report text
//! 
//! renders reports the way the board prints them on its terminal.
//! every line ends in "\r\n".

use std::fmt::Write;

use mulcheck_core::report::{Banner, Progress, Report, Summary, VectorReport};

const EOL: &str = "\r\n";

pub fn render(report: &Report) -> String {
    match report {
        Report::Banner(banner) => render_banner(banner),
        Report::Vector(vector) => render_vector(vector),
        Report::Progress(progress) => render_progress(progress),
        Report::Complete(summary) => render_summary(summary),
    }
}

/// cut `text` down to at most `max_len` bytes
pub fn truncate(text: &mut String, max_len: usize) {
    if text.len() <= max_len {
        return;
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

// writes into a String cannot fail
macro_rules! crlf {
    ($out:expr, $($arg:tt)*) => {{
        let _ = write!($out, $($arg)*);
        $out.push_str(EOL);
    }};
}

pub fn render_banner(banner: &Banner) -> String {
    let mut out = String::new();
    crlf!(out, "========= mulcheck: signed 16-bit multiply verification =========");
    crlf!(out, "vectors per pass: {}", banner.vectors);
    crlf!(out, "guarded registers: {}", banner.registers.join(" "));
    crlf!(out, "register guard policy: {:?}", banner.policy);
    crlf!(out, "observables:");
    for (i, observable) in banner.observables.iter().enumerate() {
        crlf!(out, "  {:>2}: {}", i, observable.name());
    }
    out.push_str(EOL);
    out
}

pub fn render_vector(report: &VectorReport) -> String {
    let mut out = String::new();
    let (a, b) = report.inputs();

    crlf!(out, "========= Test Number: {} =========", report.index);
    crlf!(out, "test case INPUT: multiplier (a):   {:>11}", a);
    crlf!(out, "test case INPUT: multiplicand (b): {:>11}", b);
    for c in report.comparisons.iter() {
        let label = format!("{} p/f:", c.observable.description());
        crlf!(out, "{:<23}{}", label, c.verdict.marker());
    }
    for g in report.guard.iter() {
        let label = format!("{} regs p/f:", g.call);
        let marker = if g.mismatches == 0 { "PASS" } else { "FAIL" };
        crlf!(out, "{:<23}{} ({} disturbed)", label, marker, g.mismatches);
    }
    crlf!(out, "debug values        expected        actual");
    for c in report.comparisons.iter() {
        let label = format!("{}:", c.observable.name());
        crlf!(out, "{:.<17}{:>11}   {:>11}", label, c.expected, c.actual);
    }
    out
}

pub fn render_progress(progress: &Progress) -> String {
    let mut out = String::new();
    let r = &progress.returned;

    crlf!(out, "========= In-progress test summary:");
    crlf!(out, "{} of {} tests passed so far...", progress.tally.pass(), progress.tally.total());
    crlf!(out, "register mismatches so far: {}", progress.register_mismatches);
    crlf!(
        out,
        "{}, {}, {}, {}, {}, {} for debugging",
        r.abs_a, r.abs_b, r.mismatches, r.unpack, r.init_product, r.final_product,
    );
    out.push_str(EOL);
    out
}

pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();

    crlf!(out, "========= TESTS COMPLETE: Pass Number: {}", summary.pass_number);
    crlf!(out, "Summary of tests: {} of {} tests passed", summary.tally.pass(), summary.tally.total());
    crlf!(
        out,
        "register mismatches: {} in {} calls",
        summary.register_mismatches, summary.corrupted_calls,
    );
    if !summary.failing_vectors.is_empty() {
        let failing = summary.failing_vectors
            .iter()
            .map(|(index, count)| format!("{index} ({count})"))
            .collect::<Vec<_>>()
            .join(", ");
        crlf!(out, "failing vectors: {}", failing);
    }
    out.push_str(EOL);
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use mulcheck_core::check::{check_all, Tally};
    use mulcheck_core::guard::GuardPolicy;
    use mulcheck_core::oracle;
    use mulcheck_core::report::GuardRecord;
    use mulcheck_core::routine::Call;
    use mulcheck_core::vector;

    fn vector_report(index: usize) -> VectorReport {
        let v = vector::table()[index];
        let expected = oracle::evaluate(v.value());
        let mut tally = Tally::new();
        let comparisons = check_all(&expected, &expected, &mut tally);
        VectorReport {
            index,
            vector: v,
            comparisons,
            guard: Call::ALL.map(|call| GuardRecord { call, mismatches: 0 }),
            tally,
            failed: Default::default(),
        }
    }

    #[test]
    fn test_vector_layout() {
        let text = render_vector(&vector_report(0));
        let lines = text.split("\r\n").collect::<Vec<_>>();

        assert_eq!(lines[0], "========= Test Number: 0 =========");
        assert_eq!(lines[1], "test case INPUT: multiplier (a):            -4");
        assert_eq!(lines[2], "test case INPUT: multiplicand (b):           3");
        assert_eq!(lines[3], "a check p/f:           PASS");
        assert_eq!(lines[13], "returned result p/f:   PASS");
        assert!(text.contains("a_Multiplicand:..         -4            -4\r\n"));
        assert!(text.contains("final_Product:...        -12           -12\r\n"));
        assert!(text.ends_with("\r\n"));
        assert!(!text.contains("FAIL"));
    }

    #[test]
    fn test_summary_layout() {
        let mut tally = Tally::new();
        let expected = oracle::evaluate(0);
        check_all(&expected, &expected, &mut tally);

        let text = render_summary(&Summary {
            pass_number: 2,
            tally,
            register_mismatches: 3,
            corrupted_calls: 2,
            failing_vectors: vec![(0, 4), (8, 1)],
        });
        assert!(text.starts_with("========= TESTS COMPLETE: Pass Number: 2\r\n"));
        assert!(text.contains("Summary of tests: 11 of 11 tests passed\r\n"));
        assert!(text.contains("register mismatches: 3 in 2 calls\r\n"));
        assert!(text.contains("failing vectors: 0 (4), 8 (1)\r\n"));
    }

    #[test]
    fn test_banner_lists_observables() {
        let text = render_banner(&Banner::new(10, GuardPolicy::Escalate));
        assert!(text.contains("vectors per pass: 10\r\n"));
        assert!(text.contains("guarded registers: r4 r5 r6 r7 r8 r9 r10 r11\r\n"));
        assert!(text.contains("  10: returned value\r\n"));
    }

    #[test]
    fn test_truncate() {
        let mut text = String::from("0123456789");
        truncate(&mut text, 4);
        assert_eq!(text, "0123");
        truncate(&mut text, 100);
        assert_eq!(text, "0123");
    }
}
