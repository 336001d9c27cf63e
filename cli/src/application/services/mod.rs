//! Application services: use-case orchestration.
//!
//! Each service module implements one pipeline stage (or the dispatcher) by
//! composing domain logic with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports`, never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

pub mod bootstrap;
pub mod host;
pub mod image;
pub mod installer;
pub mod lifecycle;
pub mod pipeline;
pub mod preflight;
pub mod update;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_support;

/// Best available failure detail from a finished command.
pub(crate) fn failure_detail(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    exit_detail(output.status)
}

pub(crate) fn exit_detail(status: std::process::ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by a signal".to_string(),
    }
}
