//! Outcome reporting
//!
//! Walkthroughs narrate what they do through a [`Reporter`]. The console
//! reporter prints the classic `[SUCCESS]` / `[FAILURE]` / `[PENDING]`
//! lines; tests substitute a recording implementation.

use tracing::Level;

/// Level at which console lines are mirrored to `tracing`
///
/// Below `INFO`, so a default log filter does not print each line twice.
pub const MIRROR_LEVEL: Level = Level::DEBUG;

/// Sink for human-readable walkthrough outcomes
///
/// Reporting never halts anything. A walkthrough that must stop returns
/// early, and the binary driving it chooses the exit code.
pub trait Reporter: Send + Sync {
    /// A step (or a check within a step) passed
    fn succeeded(&self, message: &str);

    /// A step (or a check within a step) did not pass
    fn failed(&self, message: &str);

    /// A precondition prevents the walkthrough from running at all
    fn pending(&self, message: &str);
}

/// Prints outcome lines to stdout and mirrors them to `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Create a console reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn succeeded(&self, message: &str) {
        tracing::event!(MIRROR_LEVEL, outcome = "success", "{message}");
        println!("{}", format_line(Outcome::Success, message));
    }

    fn failed(&self, message: &str) {
        tracing::event!(MIRROR_LEVEL, outcome = "failure", "{message}");
        println!("{}", format_line(Outcome::Failure, message));
    }

    fn pending(&self, message: &str) {
        tracing::event!(MIRROR_LEVEL, outcome = "pending", "{message}");
        println!("{}", format_line(Outcome::Pending, message));
    }
}

#[derive(Clone, Copy)]
enum Outcome {
    Success,
    Failure,
    Pending,
}

fn format_line(outcome: Outcome, message: &str) -> String {
    let tag = match outcome {
        Outcome::Success => "SUCCESS",
        Outcome::Failure => "FAILURE",
        Outcome::Pending => "PENDING",
    };
    format!("[{tag}] {}", message.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        assert_eq!(
            format_line(Outcome::Success, "Created new checkout."),
            "[SUCCESS] Created new checkout."
        );
        assert_eq!(
            format_line(Outcome::Failure, "\n  Email address was not set.\n"),
            "[FAILURE] Email address was not set."
        );
        assert_eq!(
            format_line(Outcome::Pending, "braintree.yml does not exist."),
            "[PENDING] braintree.yml does not exist."
        );
    }
}
