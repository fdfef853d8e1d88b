//! Shared setup for the walkthrough binaries
//!
//! Each binary loads `.env`, initialises tracing, runs one walkthrough and
//! turns its result into a process exit code.

use std::path::PathBuf;
use std::process::ExitCode;
use storefront_walkthrough::WalkthroughReport;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default location of the Braintree credentials
pub const DEFAULT_BRAINTREE_CONFIG: &str = "demos/walkthroughs/braintree.yml";

/// Default image uploaded by the product image walkthrough
pub const DEFAULT_IMAGE: &str = "demos/walkthroughs/assets/thinking-cat.jpg";

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "walkthrough_demos=info,storefront_walkthrough=info";

/// Load `.env` (if present) and install the tracing subscriber
pub fn init() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Path from an environment variable, or a default
#[must_use]
pub fn path_from_env(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| PathBuf::from(default), PathBuf::from)
}

/// Numeric id from an environment variable, or a default
#[must_use]
pub fn id_from_env(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Whether a checkout run counts as passed: no step failed, soft or hard
#[must_use]
pub fn checkout_passed(report: &WalkthroughReport) -> bool {
    report.failures().next().is_none() && !report.is_aborted()
}

/// Exit code for a finished checkout walkthrough
#[must_use]
pub fn checkout_exit_code(report: &WalkthroughReport) -> ExitCode {
    if checkout_passed(report) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_walkthrough::{CheckoutStep, StepOutcome, StepRecord};

    fn report(outcome: StepOutcome, aborted_at: Option<CheckoutStep>) -> WalkthroughReport {
        WalkthroughReport {
            steps: vec![StepRecord {
                step: CheckoutStep::CreateOrder,
                outcome,
            }],
            aborted_at,
            order: None,
        }
    }

    #[test]
    fn test_any_failure_fails_the_run() {
        assert!(checkout_passed(&report(StepOutcome::Succeeded, None)));
        assert!(!checkout_passed(&report(StepOutcome::Failed("soft".to_string()), None)));
        assert!(!checkout_passed(&report(
            StepOutcome::Failed("hard".to_string()),
            Some(CheckoutStep::CreateOrder)
        )));
    }

    #[test]
    fn test_default_filter_hides_mirrored_report_lines() {
        use storefront_walkthrough::report::MIRROR_LEVEL;
        use tracing::level_filters::LevelFilter;

        let filter = tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
        assert!(LevelFilter::INFO < LevelFilter::from_level(MIRROR_LEVEL));
    }

    #[test]
    fn test_unset_variables_use_defaults() {
        assert_eq!(
            path_from_env("WALKTHROUGH_DEMOS_UNSET_PATH", DEFAULT_IMAGE),
            PathBuf::from(DEFAULT_IMAGE)
        );
        assert_eq!(id_from_env("WALKTHROUGH_DEMOS_UNSET_ID", 1), 1);
    }
}
