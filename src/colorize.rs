//! Event colorization engine
//!
//! Consumes the decoded event sequence and writes each output fragment
//! wrapped in ANSI color sequences. The color of a line is decided by a
//! fixed prefix table plus per-test sticky state: once a test's terminal
//! report line (`--- FAIL:` and friends) has been seen, every later output
//! line for the same (package, test) pair inherits that color until the
//! test's own terminal event closes it.
//!
//! test2json mis-attributes benchmark events (the `Test` field is left
//! empty for the name line, the timing summary, and anything a benchmark
//! prints right after), so the engine also repairs benchmark attribution by
//! recovering the name from the output text and carrying it across the
//! lines that follow.

use crate::error::Result;
use crate::event::{Action, Event, EventStream};
use regex::Regex;
use std::collections::HashMap;
use std::env::consts;
use std::io::{Read, Write};

const TERM_BOLD: u8 = 1;
const TERM_RED: u8 = 31;
const TERM_GREEN: u8 = 32;
const TERM_YELLOW: u8 = 33;
const TERM_DARK_GRAY: u8 = 90;
const TERM_WHITE: u8 = 97;

/// Markers that open a test's terminal report and become sticky state.
///
/// FAIL and SKIP stop short of the `Test` name: failed or skipped
/// benchmarks report as `--- FAIL: BenchmarkX` / `--- SKIP: BenchmarkX`.
/// Benchmarks never report `--- PASS`, so PASS keeps the longer prefix.
const STATE_FAIL: &str = "--- FAIL: ";
const STATE_PASS: &str = "--- PASS: Test";
const STATE_SKIP: &str = "--- SKIP: ";

/// Output prefix to attribute codes, first match wins.
const COLORS: &[(&str, &[u8])] = &[
    (STATE_FAIL, &[TERM_RED]),
    (STATE_PASS, &[TERM_GREEN]),
    (STATE_SKIP, &[TERM_YELLOW]),
    ("=== RUN   Test", &[TERM_WHITE]),
    ("=== PAUSE Test", &[TERM_DARK_GRAY]),
    ("=== CONT  Test", &[TERM_DARK_GRAY]),
    ("PASS\n", &[TERM_BOLD, TERM_GREEN]),
    ("ok  \t", &[TERM_BOLD, TERM_GREEN]),
    ("FAIL\n", &[TERM_BOLD, TERM_RED]),
    ("FAIL\t", &[TERM_BOLD, TERM_RED]),
    ("?   \t", &[TERM_BOLD, TERM_YELLOW]),
];

fn output_state(s: &str) -> Option<&'static str> {
    [STATE_FAIL, STATE_PASS, STATE_SKIP]
        .into_iter()
        .find(|marker| s.starts_with(marker))
}

fn output_color(s: &str) -> Option<&'static [u8]> {
    COLORS
        .iter()
        .find(|(prefix, _)| s.starts_with(prefix))
        .map(|(_, codes)| *codes)
}

/// Benchmark timing/alloc summary lines, always mis-attributed upstream.
fn is_benchmark_summary(s: &str) -> bool {
    s.ends_with(" allocs/op\n") || s.ends_with(" ns/op\n")
}

/// GOOS spelling of the host platform.
fn go_os() -> &'static str {
    match consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// GOARCH spelling of the host architecture.
fn go_arch() -> &'static str {
    match consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    }
}

/// Stateful classifier for one colorization pass.
///
/// Owns the per-package-per-test tracking table and the benchmark
/// carry-over marker; reentrant across passes, so a fresh value per stream
/// is cheap but not required.
pub struct Colorizer {
    /// package -> test -> last recorded state marker
    states: HashMap<String, HashMap<String, &'static str>>,
    /// Benchmark expected to own the next un-attributed output line.
    wait_for_bench: Option<String>,
    bench_name: Regex,
    goos_banner: String,
    goarch_banner: String,
    color: bool,
}

impl Colorizer {
    /// Create a colorizer that emits ANSI escape sequences.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Create a colorizer with color output on or off. With color off the
    /// output text is passed through verbatim, no escape sequences at all.
    pub fn with_color(color: bool) -> Self {
        Colorizer {
            states: HashMap::new(),
            wait_for_bench: None,
            bench_name: Regex::new(r"^(Benchmark.+)-\d+").expect("valid regex"),
            goos_banner: format!("goos: {}\n", go_os()),
            goarch_banner: format!("goarch: {}\n", go_arch()),
            color,
        }
    }

    /// Drain a whole event stream into `out`, coloring as it goes.
    ///
    /// Returns on natural end-of-stream or a closed pipe; any decode error
    /// aborts the pass.
    pub fn process<R: Read, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        for event in EventStream::new(input) {
            self.handle_event(event?, out)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Classify one event, update tracking state, and emit its output.
    pub fn handle_event<W: Write>(&mut self, mut ev: Event, out: &mut W) -> Result<()> {
        // Benchmark preamble lines carry no useful color semantics.
        if ev.output == self.goos_banner
            || ev.output == self.goarch_banner
            || ev.output.starts_with("pkg: ")
        {
            return Ok(());
        }

        if let Some(name) = self.benchmark_name(&ev.output) {
            // A benchmark name line: recover the name from the output text
            // and dress the line up like a normal test-start line.
            ev.test = name.clone();
            ev.output.insert_str(0, "=== ");
            self.wait_for_bench = Some(name);
        } else if let Some(name) = self.wait_for_bench.take() {
            if ev.action == Action::Output && is_benchmark_summary(&ev.output) {
                // The benchmark's own timing/alloc summary; keep waiting,
                // more summary lines may follow.
                self.wait_for_bench = Some(name.clone());
            }
            ev.test = name;
        }

        // Events without output describe package/test state transitions;
        // nothing is printed for them, only the tracking table changes.
        match ev.action {
            Action::Run => {
                self.states.entry(ev.package).or_default();
                return Ok(());
            }
            Action::Pass | Action::Fail | Action::Skip => {
                if ev.test.is_empty() {
                    // terminal event for the whole package
                    self.states.remove(&ev.package);
                } else if let Some(tests) = self.states.get_mut(&ev.package) {
                    tests.remove(&ev.test);
                }
                return Ok(());
            }
            Action::Output => {}
            Action::Other => return Ok(()),
        }

        let mut color = output_color(&ev.output);

        // A terminal report line opens sticky state so that later lines for
        // the same test, e.g.
        //     --- FAIL: TestFail (0.00s)
        //         example_test.go:11: failure reason
        // come out in the same color.
        if let Some(marker) = output_state(&ev.output) {
            self.states
                .entry(ev.package)
                .or_default()
                .insert(ev.test, marker);
        } else if let Some(marker) = self
            .states
            .get(&ev.package)
            .and_then(|tests| tests.get(&ev.test))
        {
            color = output_color(marker);
        }

        self.emit(out, color, &ev.output)
    }

    /// Recover a benchmark name from a `Benchmark<name>-<N>` line, where N
    /// is the GOMAXPROCS suffix. The name is everything before the final
    /// dash-integer.
    fn benchmark_name(&self, s: &str) -> Option<String> {
        self.bench_name
            .captures(s)
            .map(|captures| captures[1].to_string())
    }

    fn emit<W: Write>(&self, out: &mut W, color: Option<&'static [u8]>, text: &str) -> Result<()> {
        if !self.color {
            out.write_all(text.as_bytes())?;
            return Ok(());
        }
        if let Some(codes) = color {
            for code in codes {
                write!(out, "\x1b[{}m", code)?;
            }
        }
        out.write_all(text.as_bytes())?;
        // Reset is emitted after every line, colored or not.
        out.write_all(b"\x1b[0m")?;
        Ok(())
    }
}

impl Default for Colorizer {
    fn default() -> Self {
        Self::new()
    }
}
