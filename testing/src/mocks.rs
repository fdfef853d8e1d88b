//! Test doubles for the walkthrough seams
//!
//! - [`RecordingReporter`]: captures every reported line
//! - [`FixedGateway`]: a payment gateway that always vaults the same profile

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Only panics on a poisoned lock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storefront_walkthrough::payment::GatewayFuture;
use storefront_walkthrough::{CardHolder, GatewayError, GatewayProfile, PaymentGateway, VaultCard};
use storefront_walkthrough::Reporter;

/// Kind of a reported line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    /// `succeeded`
    Success,
    /// `failed`
    Failure,
    /// `pending`
    Pending,
}

/// A captured report line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportLine {
    /// Which reporter method was called
    pub kind: ReportKind,
    /// Message passed to it
    pub message: String,
}

/// Reporter that keeps every line for later assertions
///
/// # Example
///
/// ```
/// use storefront_testing::{RecordingReporter, ReportKind};
/// use storefront_walkthrough::Reporter;
///
/// let reporter = RecordingReporter::new();
/// reporter.succeeded("Created new checkout.");
/// reporter.failed("Failed to add a line item.");
///
/// assert_eq!(reporter.count(ReportKind::Success), 1);
/// assert!(reporter.contains("line item"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingReporter {
    lines: Arc<Mutex<Vec<ReportLine>>>,
}

impl RecordingReporter {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: ReportKind, message: &str) {
        self.lines.lock().unwrap().push(ReportLine {
            kind,
            message: message.to_string(),
        });
    }

    /// All captured lines, in order
    #[must_use]
    pub fn lines(&self) -> Vec<ReportLine> {
        self.lines.lock().unwrap().clone()
    }

    /// Messages of a given kind, in order
    #[must_use]
    pub fn messages(&self, kind: ReportKind) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.kind == kind)
            .map(|line| line.message.clone())
            .collect()
    }

    /// Number of lines of a given kind
    #[must_use]
    pub fn count(&self, kind: ReportKind) -> usize {
        self.messages(kind).len()
    }

    /// Whether any line contains `needle`
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|line| line.message.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn succeeded(&self, message: &str) {
        self.push(ReportKind::Success, message);
    }

    fn failed(&self, message: &str) {
        self.push(ReportKind::Failure, message);
    }

    fn pending(&self, message: &str) {
        self.push(ReportKind::Pending, message);
    }
}

/// Gateway returning a fixed profile (or a fixed rejection)
#[derive(Debug)]
pub struct FixedGateway {
    result: Result<GatewayProfile, String>,
    calls: AtomicUsize,
}

impl FixedGateway {
    /// Gateway that vaults every card as `customer_id` / `token`
    #[must_use]
    pub fn new(customer_id: &str, token: &str) -> Self {
        Self {
            result: Ok(GatewayProfile {
                customer_profile_id: customer_id.to_string(),
                payment_profile_id: token.to_string(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Gateway that rejects every card with `message`
    #[must_use]
    pub fn rejecting(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of cards vaulted so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PaymentGateway for FixedGateway {
    fn vault_card(&self, _holder: &CardHolder, _card: &VaultCard) -> GatewayFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self.result.clone().map_err(GatewayError::Rejected);
        Box::pin(async move { result })
    }
}
