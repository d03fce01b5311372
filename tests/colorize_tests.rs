//! End-to-end colorization scenarios
//!
//! These tests feed whole event streams through the engine and assert the
//! exact bytes that come out, escape sequences included.

use gotint::colorize::Colorizer;
use gotint::Error;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const WHITE: &str = "\x1b[97m";
const DARK_GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn colorize(stream: &str) -> String {
    let mut colorizer = Colorizer::new();
    let mut out = Vec::new();
    colorizer.process(stream.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_unmarked_output_passes_through() {
    let printed = colorize(
        r#"{"Action":"output","Package":"p","Test":"TestX","Output":"some build note\n"}"#,
    );
    assert_eq!(printed, format!("some build note\n{RESET}"));
}

#[test]
fn test_fail_state_is_sticky() {
    let stream = concat!(
        r#"{"Action":"output","Package":"p","Test":"TestX","Output":"--- FAIL: TestX (0.00s)\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Test":"TestX","Output":"extra info\n"}"#,
        "\n",
    );
    assert_eq!(
        colorize(stream),
        format!("{RED}--- FAIL: TestX (0.00s)\n{RESET}{RED}extra info\n{RESET}")
    );
}

#[test]
fn test_terminal_event_closes_test_state() {
    let stream = concat!(
        r#"{"Action":"output","Package":"p","Test":"TestX","Output":"--- FAIL: TestX (0.00s)\n"}"#,
        "\n",
        r#"{"Action":"pass","Package":"p","Test":"TestX"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Test":"TestX","Output":"later\n"}"#,
        "\n",
    );
    assert_eq!(
        colorize(stream),
        format!("{RED}--- FAIL: TestX (0.00s)\n{RESET}later\n{RESET}")
    );
}

#[test]
fn test_terminal_event_with_empty_test_closes_package() {
    let stream = concat!(
        r#"{"Action":"run","Package":"p","Test":"TestY"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Test":"TestY","Output":"--- SKIP: TestY (0.00s)\n"}"#,
        "\n",
        r#"{"Action":"skip","Package":"p"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Test":"TestY","Output":"tail\n"}"#,
        "\n",
    );
    assert_eq!(
        colorize(stream),
        format!("{YELLOW}--- SKIP: TestY (0.00s)\n{RESET}tail\n{RESET}")
    );
}

#[test]
fn test_full_failing_run() {
    let stream = concat!(
        r#"{"Action":"run","Package":"p","Test":"T"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Test":"T","Output":"--- FAIL: T (0.00s)\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Test":"T","Output":"    file.go:11: boom\n"}"#,
        "\n",
        r#"{"Action":"fail","Package":"p","Test":"T"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Test":"T","Output":"tail\n"}"#,
        "\n",
    );
    // exactly two red lines; the tracking entry is gone by the time the
    // trailing output arrives
    assert_eq!(
        colorize(stream),
        format!(
            "{RED}--- FAIL: T (0.00s)\n{RESET}{RED}    file.go:11: boom\n{RESET}tail\n{RESET}"
        )
    );
}

#[test]
fn test_benchmark_name_repair() {
    let stream = concat!(
        r#"{"Action":"output","Package":"p","Output":"BenchmarkFib-8\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Output":" 3000000\t 50 ns/op\n"}"#,
        "\n",
    );
    assert_eq!(
        colorize(stream),
        format!("=== BenchmarkFib-8\n{RESET} 3000000\t 50 ns/op\n{RESET}")
    );
}

#[test]
fn test_benchmark_error_attribution() {
    // b.Error output follows the summary with no test identifier; the
    // carry-over marker attributes it, and the sticky state it opens lands
    // under the repaired benchmark name.
    let stream = concat!(
        r#"{"Action":"output","Package":"p","Output":"BenchmarkErr-8\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Output":" 1000\t 2 allocs/op\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Output":"--- FAIL: BenchmarkErr\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Test":"BenchmarkErr","Output":"    bench_test.go:36: boom\n"}"#,
        "\n",
    );
    assert_eq!(
        colorize(stream),
        format!(
            "=== BenchmarkErr-8\n{RESET} 1000\t 2 allocs/op\n{RESET}{RED}--- FAIL: BenchmarkErr\n{RESET}{RED}    bench_test.go:36: boom\n{RESET}"
        )
    );
}

#[test]
fn test_package_banner_suppressed() {
    let stream = concat!(
        r#"{"Action":"output","Package":"p","Output":"pkg: example.com/pkg\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Output":"after\n"}"#,
        "\n",
    );
    assert_eq!(colorize(stream), format!("after\n{RESET}"));
}

#[test]
fn test_package_summary_lines() {
    let stream = concat!(
        r#"{"Action":"output","Package":"p","Output":"PASS\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Output":"ok  \texample.com/pkg\t0.01s\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"q","Output":"FAIL\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"r","Output":"?   \texample.com/empty\t[no test files]\n"}"#,
        "\n",
    );
    assert_eq!(
        colorize(stream),
        format!(
            "{BOLD}{GREEN}PASS\n{RESET}{BOLD}{GREEN}ok  \texample.com/pkg\t0.01s\n{RESET}{BOLD}{RED}FAIL\n{RESET}{BOLD}{YELLOW}?   \texample.com/empty\t[no test files]\n{RESET}"
        )
    );
}

#[test]
fn test_run_pause_cont_lines() {
    let stream = concat!(
        r#"{"Action":"output","Package":"p","Test":"TestX","Output":"=== RUN   TestX\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Test":"TestX","Output":"=== PAUSE TestX\n"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Test":"TestX","Output":"=== CONT  TestX\n"}"#,
        "\n",
    );
    assert_eq!(
        colorize(stream),
        format!(
            "{WHITE}=== RUN   TestX\n{RESET}{DARK_GRAY}=== PAUSE TestX\n{RESET}{DARK_GRAY}=== CONT  TestX\n{RESET}"
        )
    );
}

#[test]
fn test_unknown_action_is_a_no_op() {
    let stream = concat!(
        r#"{"Action":"start","Package":"p"}"#,
        "\n",
        r#"{"Action":"output","Package":"p","Output":"visible\n"}"#,
        "\n",
    );
    assert_eq!(colorize(stream), format!("visible\n{RESET}"));
}

#[test]
fn test_decode_error_aborts_the_pass() {
    let stream = concat!(
        r#"{"Action":"output","Package":"p","Output":"first\n"}"#,
        "\n",
        "this is not json\n",
    );
    let mut colorizer = Colorizer::new();
    let mut out = Vec::new();
    let err = colorizer.process(stream.as_bytes(), &mut out).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    // everything decoded before the fault was already emitted
    assert_eq!(String::from_utf8(out).unwrap(), format!("first\n{RESET}"));
}
