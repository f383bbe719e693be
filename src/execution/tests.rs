use super::*;
use crate::execution::capture::{spawn_reader, RawCapture};
use crate::execution::process::spawn;
use crate::execution::supervisor::wait_with_deadline;
use std::io::Cursor;
use std::time::{Duration, Instant};

fn temp_cwd() -> std::path::PathBuf {
    std::env::temp_dir()
}

#[test]
fn identifier_reports_shell_command_verbatim() {
    let spec = CommandSpec::Shell("echo hello | wc -c".to_string());
    assert_eq!(spec.identifier(), "echo hello | wc -c");
}

#[test]
fn identifier_joins_argv_with_spaces() {
    let spec = CommandSpec::argv(vec!["echo".to_string(), "a b".to_string()]);
    assert_eq!(spec.identifier(), "echo a b");
}

#[test]
fn validate_rejects_empty_shell_command() {
    assert!(CommandSpec::Shell("   ".to_string()).validate().is_err());
}

#[test]
fn validate_rejects_empty_argv() {
    assert!(CommandSpec::argv(Vec::new()).validate().is_err());
}

#[test]
fn spawn_runs_shell_command() {
    let spec = CommandSpec::Shell("exit 0".to_string());
    let mut child = spawn(&spec, &temp_cwd()).unwrap();
    let status = child.wait().unwrap();
    assert!(status.success());
}

#[test]
fn spawn_runs_argv_directly() {
    let spec = CommandSpec::argv(vec!["/bin/echo".to_string(), "hi".to_string()]);
    let mut child = spawn(&spec, &temp_cwd()).unwrap();
    let status = child.wait().unwrap();
    assert!(status.success());
}

#[test]
fn spawn_reports_missing_executable_as_launch_error() {
    let spec = CommandSpec::argv(vec!["/no/such/binary-cmdbox".to_string()]);
    let err = spawn(&spec, &temp_cwd()).unwrap_err();
    assert!(matches!(err, crate::errors::CmdboxError::Launch { .. }));
}

#[test]
fn drain_keeps_everything_under_the_limit() {
    let data = b"hello world".to_vec();
    let raw = spawn_reader(Cursor::new(data), 64).join().unwrap();

    assert_eq!(raw.prefix, b"hello world");
    assert_eq!(raw.total_bytes, 11);
}

#[test]
fn drain_counts_past_the_limit() {
    let data = vec![b'x'; 10_000];
    let raw = spawn_reader(Cursor::new(data), 100).join().unwrap();

    assert_eq!(raw.prefix.len(), 100);
    assert_eq!(raw.total_bytes, 10_000);
}

#[test]
fn drain_with_zero_limit_retains_nothing() {
    let raw = spawn_reader(Cursor::new(b"abc".to_vec()), 0).join().unwrap();

    assert!(raw.prefix.is_empty());
    assert_eq!(raw.total_bytes, 3);
}

#[test]
fn captured_stream_truncation_flag_matches_sizes() {
    for (total, limit) in [(0usize, 0usize), (5, 5), (5, 6), (6, 5), (100, 0)] {
        let raw = RawCapture {
            prefix: vec![b'a'; total.min(limit)],
            total_bytes: total,
        };
        let stream = CapturedStream::from_raw(raw, limit);

        assert_eq!(stream.truncated, total > limit, "total={total} limit={limit}");
        assert_eq!(stream.raw_bytes, total);
        assert_eq!(stream.content.len(), total.min(limit));
    }
}

#[test]
fn captured_stream_decodes_invalid_bytes_lossily() {
    let raw = RawCapture {
        prefix: vec![b'o', b'k', 0xff, 0xfe],
        total_bytes: 4,
    };
    let stream = CapturedStream::from_raw(raw, 64);

    assert!(stream.content.starts_with("ok"));
    assert!(stream.content.contains('\u{fffd}'));
}

#[test]
fn wait_returns_real_exit_code_before_deadline() {
    let spec = CommandSpec::Shell("exit 7".to_string());
    let mut child = spawn(&spec, &temp_cwd()).unwrap();

    let outcome = wait_with_deadline(&mut child, Duration::from_secs(5)).unwrap();

    assert!(!outcome.timed_out);
    assert_eq!(outcome.exit_code, 7);
}

#[test]
fn wait_kills_child_at_the_deadline() {
    let spec = CommandSpec::Shell("sleep 5".to_string());
    let mut child = spawn(&spec, &temp_cwd()).unwrap();

    let start = Instant::now();
    let outcome = wait_with_deadline(&mut child, Duration::from_millis(200)).unwrap();

    assert!(outcome.timed_out);
    assert_eq!(outcome.exit_code, UNKNOWN_EXIT_CODE);
    assert!(start.elapsed() < Duration::from_secs(3));
    // The child is reaped; a second try_wait must not find it running
    assert!(child.try_wait().is_ok());
}
