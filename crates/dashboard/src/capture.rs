//! Output capture
//!
//! Runs a producer against an in-memory buffer and turns failures into data:
//! the buffer always comes back, with an `ERROR during execution` line
//! appended when the run failed.

use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Prefix of the line appended to a failed run's output
pub const EXECUTION_ERROR_PREFIX: &str = "ERROR during execution: ";

/// Text captured from one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub output: String,
    /// Failure message, if the run returned an error or panicked
    pub error: Option<String>,
}

/// Run `f` with its output directed into a buffer
///
/// Errors and panics do not propagate. A termination request
/// ([`common::Error::Terminated`]) counts as normal completion.
pub fn capture_output<F>(f: F) -> Captured
where
    F: FnOnce(&mut dyn Write) -> common::Result<()>,
{
    let mut buf: Vec<u8> = Vec::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(&mut buf)));

    let failure = match outcome {
        Ok(Ok(())) => None,
        Ok(Err(e)) if e.is_termination() => {
            debug!(reason = %e, "Producer terminated early; keeping captured output");
            None
        }
        Ok(Err(e)) => Some(e.to_string()),
        Err(payload) => Some(panic_message(payload.as_ref())),
    };

    let mut output = String::from_utf8_lossy(&buf).into_owned();
    if let Some(msg) = &failure {
        error!("{}{}", EXECUTION_ERROR_PREFIX, msg);
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(EXECUTION_ERROR_PREFIX);
        output.push_str(msg);
        output.push('\n');
    }

    Captured {
        output,
        error: failure,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_run_keeps_output() {
        let captured = capture_output(|out| {
            writeln!(out, "line one")?;
            write!(out, "line two")?;
            Ok(())
        });
        assert_eq!(captured.output, "line one\nline two");
        assert!(captured.error.is_none());
    }

    #[test]
    fn test_failure_appends_error_line_after_partial_output() {
        let captured = capture_output(|out| {
            writeln!(out, "partial")?;
            Err(common::Error::data_source("failed to start market data session: refused"))
        });
        assert_eq!(
            captured.output,
            "partial\nERROR during execution: failed to start market data session: refused\n"
        );
        assert_eq!(
            captured.error.as_deref(),
            Some("failed to start market data session: refused")
        );
    }

    #[test]
    fn test_failure_without_output() {
        let captured = capture_output(|_out| Err(common::Error::internal("boom")));
        assert_eq!(captured.output, "ERROR during execution: Internal error: boom\n");
    }

    #[test]
    fn test_termination_is_normal_completion() {
        let captured = capture_output(|out| {
            writeln!(out, "before exit")?;
            Err(common::Error::terminated("exit requested"))
        });
        assert_eq!(captured.output, "before exit\n");
        assert!(captured.error.is_none());
    }

    #[test]
    fn test_panic_is_captured() {
        let captured = capture_output(|out| {
            writeln!(out, "started")?;
            panic!("index out of range");
        });
        assert!(captured.output.starts_with("started\n"));
        assert!(captured
            .output
            .ends_with("ERROR during execution: panic: index out of range\n"));
        assert_eq!(captured.error.as_deref(), Some("panic: index out of range"));
    }
}
