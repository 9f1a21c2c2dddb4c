//! Reporting of search progress

use crate::coordinator::{SearchOutcome, Snapshot, StopReason};
use std::io::{self, Write};
use std::time::Duration;
use tracing::warn;

/// Receives a snapshot every time the global best improves.
pub trait Reporter {
    fn new_best(&mut self, snapshot: &Snapshot);
}

impl<F: FnMut(&Snapshot)> Reporter for F {
    fn new_best(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// Prints each new best as `Priv:`/`Pub:`/`IP:` lines.
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Self::new(io::stdout(), verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_best(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let secs = snapshot.elapsed.as_secs();
        if secs > 0 {
            writeln!(
                self.out,
                "----- {} --- {} keys tried",
                format_duration(snapshot.elapsed),
                snapshot.generated
            )?;
            if self.verbose {
                writeln!(
                    self.out,
                    "----- generation speed {} keys per second",
                    snapshot.generated / secs
                )?;
            }
        }

        if let Some(best) = &snapshot.best {
            writeln!(self.out, "Priv: {}", best.keys().secret.to_hex())?;
            writeln!(self.out, "Pub: {}", best.keys().public)?;
            writeln!(self.out, "IP: {}", best.address())?;
        }
        self.out.flush()
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn new_best(&mut self, snapshot: &Snapshot) {
        if let Err(e) = self.write_best(snapshot) {
            warn!(error = %e, "Failed to write report");
        }
    }
}

fn reason_text(reason: StopReason) -> &'static str {
    match reason {
        StopReason::Cancelled => "interrupted",
        StopReason::TimeLimit => "time limit reached",
        StopReason::TargetReached => "target reached",
    }
}

/// One-line summary printed when the search ends.
pub fn summary_line(outcome: &SearchOutcome) -> String {
    format!(
        "Search {} after {}: {} keys tried",
        reason_text(outcome.reason),
        format_duration(outcome.elapsed),
        outcome.generated
    )
}

/// Format like Go's `time.Duration`: `0s`, `750ns`, `1.5µs`, `12.25ms`,
/// `3.2s`, `1m30s`, `1h0m5.5s`.
pub fn format_duration(d: Duration) -> String {
    let ns = d.as_nanos();
    if ns == 0 {
        return "0s".to_string();
    }
    if ns < 1_000 {
        return format!("{}ns", ns);
    }
    if ns < 1_000_000 {
        return format!("{}{}µs", ns / 1_000, fraction(ns % 1_000, 3));
    }
    if ns < 1_000_000_000 {
        return format!("{}{}ms", ns / 1_000_000, fraction(ns % 1_000_000, 6));
    }

    let total = d.as_secs();
    let (hours, minutes, secs) = (total / 3600, total / 60 % 60, total % 60);
    let secs = format!("{}{}s", secs, fraction(u128::from(d.subsec_nanos()), 9));
    if hours > 0 {
        format!("{}h{}m{}", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m{}", minutes, secs)
    } else {
        secs
    }
}

// ".5" for (500, 3); empty when zero
fn fraction(value: u128, digits: usize) -> String {
    if value == 0 {
        return String::new();
    }
    let padded = format!("{:0width$}", value, width = digits);
    format!(".{}", padded.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;
    use crate::score::Candidate;
    use crate::seed::Seed;

    #[test]
    fn test_format_sub_second() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(999)), "999ns");
        assert_eq!(format_duration(Duration::from_micros(1)), "1µs");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.5ms");
        assert_eq!(format_duration(Duration::from_nanos(12_250_000)), "12.25ms");
    }

    #[test]
    fn test_format_seconds_and_up() {
        assert_eq!(format_duration(Duration::from_secs(1)), "1s");
        assert_eq!(format_duration(Duration::from_millis(3_200)), "3.2s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(format_duration(Duration::from_millis(3_723_500)), "1h2m3.5s");
        assert_eq!(format_duration(Duration::from_nanos(1_000_000_001)), "1.000000001s");
    }

    fn snapshot(elapsed: Duration) -> Snapshot {
        let seed = Seed::from_hex("ef04f3926ed9959d407ab2c14c04fe4742cdf833bad31ea8c797b6ee10e7a5e2")
            .unwrap();
        Snapshot {
            best: Some(Candidate::new(KeyPair::from_seed(&seed))),
            generated: 2_000,
            elapsed,
        }
    }

    #[test]
    fn test_console_report_lines() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true);
        reporter.new_best(&snapshot(Duration::from_secs(2)));
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "----- 2s --- 2000 keys tried");
        assert_eq!(lines[1], "----- generation speed 1000 keys per second");
        assert!(lines[2].starts_with("Priv: ef04f392"));
        assert_eq!(
            lines[3],
            "Pub: c14f47307e7b1a45df5ba772fe1f36249996df3cd346e192f0e9eff49fa4c506"
        );
        assert_eq!(lines[4], "IP: 200:7d61:719f:309:cb74:4148:b11a:3c1");
    }

    #[test]
    fn test_console_report_skips_stats_in_first_second() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true);
        reporter.new_best(&snapshot(Duration::from_millis(300)));
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.starts_with("Priv: "));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_summary_line() {
        let outcome = SearchOutcome {
            best: None,
            generated: 42,
            elapsed: Duration::from_secs(90),
            reason: StopReason::TimeLimit,
            workers_still_running: 0,
        };
        assert_eq!(
            summary_line(&outcome),
            "Search time limit reached after 1m30s: 42 keys tried"
        );
    }
}
