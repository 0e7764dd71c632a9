use std::process::{Command, Stdio};

use log::trace;
#[cfg(test)]
use mockall::automock;

use super::ExecError;

/// Runs an external command and hands back its combined output
///
/// This is the only place the crate touches processes, so tests substitute a
/// mock and never spawn anything. Implementations are shared between callers
/// and must be safe to invoke concurrently.
#[cfg_attr(test, automock)]
pub trait Executor: Send + Sync {
    /// Run `command` with `args`, returning stdout followed by stderr
    ///
    /// A non-success exit is an error carrying the same combined output.
    fn combined_output(&self, command: &str, args: &[String]) -> Result<Vec<u8>, ExecError>;
}

/// [`Executor`] backed by `std::process::Command`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn combined_output(&self, command: &str, args: &[String]) -> Result<Vec<u8>, ExecError> {
        let output = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ExecError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        trace!("EXEC [{}] [{}] -> {}", command, args.join(" "), output.status);

        if output.status.success() {
            Ok(combined)
        } else {
            Err(ExecError::Exit {
                command: command.to_string(),
                code: output.status.code(),
                output: String::from_utf8_lossy(&combined).into_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<String> { args.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn test_system_executor_success() {
        let output = SystemExecutor
            .combined_output("echo", &args(&["-n", "hello"]))
            .unwrap();
        assert_eq!(output, b"hello");
    }

    #[test]
    fn test_system_executor_combines_stderr() {
        let output = SystemExecutor
            .combined_output("sh", &args(&["-c", "printf out; printf err >&2"]))
            .unwrap();
        assert_eq!(output, b"outerr");
    }

    #[test]
    fn test_system_executor_exit_failure() {
        let err = SystemExecutor
            .combined_output("sh", &args(&["-c", "echo already exists >&2; exit 1"]))
            .unwrap_err();
        match err {
            ExecError::Exit { code, output, .. } => {
                assert_eq!(code, Some(1));
                assert_eq!(output.trim(), "already exists");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_system_executor_spawn_failure() {
        let err = SystemExecutor
            .combined_output("/nonexistent/ipset", &[])
            .unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }
}
