use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::PaletteCommand;

/// Track palette protocol metrics without external dependencies.
pub(crate) struct Metrics;

static REQUESTS_SENT: AtomicU64 = AtomicU64::new(0);
static RESPONSES_RECEIVED: AtomicU64 = AtomicU64::new(0);
static FIRMWARE_ERRORS: AtomicU64 = AtomicU64::new(0);
static FORMAT_ERRORS: AtomicU64 = AtomicU64::new(0);
static TIMEOUTS: AtomicU64 = AtomicU64::new(0);
static LOCAL_REJECTIONS: AtomicU64 = AtomicU64::new(0);
static RESPONSE_LATENCY_TOTAL_NS: AtomicU64 = AtomicU64::new(0);
static RESPONSE_LATENCY_MAX_NS: AtomicU64 = AtomicU64::new(0);

const NANOSECONDS_PER_MICROSECOND: u128 = 1_000;

static COMMAND_COUNTERS: [AtomicU64; 9] = [const { AtomicU64::new(0) }; 9];

fn command_slot(command: PaletteCommand) -> usize {
    usize::from(command.as_u8() - 1)
}

/// Outcome of a request/response exchange for counting.
#[derive(Clone, Copy, Debug)]
pub(crate) enum ExchangeOutcome {
    /// Response decoded, success or firmware error.
    Response { firmware_error: bool },
    /// Response bytes were malformed.
    Malformed,
    /// No response within the timeout.
    TimedOut,
}

impl Metrics {
    #[inline]
    pub(crate) fn record_request(command: PaletteCommand) {
        REQUESTS_SENT.fetch_add(1, Ordering::Relaxed);
        COMMAND_COUNTERS[command_slot(command)].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejection() {
        LOCAL_REJECTIONS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_exchange(outcome: ExchangeOutcome, latency: Duration) {
        match outcome {
            ExchangeOutcome::Response { firmware_error } => {
                RESPONSES_RECEIVED.fetch_add(1, Ordering::Relaxed);
                if firmware_error {
                    FIRMWARE_ERRORS.fetch_add(1, Ordering::Relaxed);
                }
                record_latency(latency);
            }
            ExchangeOutcome::Malformed => {
                RESPONSES_RECEIVED.fetch_add(1, Ordering::Relaxed);
                FORMAT_ERRORS.fetch_add(1, Ordering::Relaxed);
                record_latency(latency);
            }
            ExchangeOutcome::TimedOut => {
                TIMEOUTS.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    #[inline]
    pub(crate) fn totals() -> MetricsSnapshot {
        let mut per_command = [0u64; 9];
        for (slot, counter) in per_command.iter_mut().zip(COMMAND_COUNTERS.iter()) {
            *slot = counter.load(Ordering::Relaxed);
        }

        MetricsSnapshot {
            requests_sent: REQUESTS_SENT.load(Ordering::Relaxed),
            responses_received: RESPONSES_RECEIVED.load(Ordering::Relaxed),
            firmware_errors: FIRMWARE_ERRORS.load(Ordering::Relaxed),
            format_errors: FORMAT_ERRORS.load(Ordering::Relaxed),
            timeouts: TIMEOUTS.load(Ordering::Relaxed),
            local_rejections: LOCAL_REJECTIONS.load(Ordering::Relaxed),
            response_latency_total_ns: RESPONSE_LATENCY_TOTAL_NS.load(Ordering::Relaxed),
            response_latency_max_ns: RESPONSE_LATENCY_MAX_NS.load(Ordering::Relaxed),
            per_command,
        }
    }
}

fn record_latency(duration: Duration) {
    let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
    RESPONSE_LATENCY_TOTAL_NS.fetch_add(nanos, Ordering::Relaxed);
    update_max(&RESPONSE_LATENCY_MAX_NS, nanos);
}

fn update_max(target: &AtomicU64, candidate: u64) {
    let mut current = target.load(Ordering::Relaxed);
    while candidate > current {
        match target.compare_exchange_weak(
            current,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return,
            Err(old) => current = old,
        }
    }
}

/// Lightweight snapshot of process-wide protocol counters.
#[derive(Default, Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    /// Requests handed to the transport.
    pub requests_sent: u64,
    /// Responses received, well-formed or not.
    pub responses_received: u64,
    /// Responses carrying a firmware error code.
    pub firmware_errors: u64,
    /// Responses rejected as malformed.
    pub format_errors: u64,
    /// Requests that got no response in time.
    pub timeouts: u64,
    /// Operations refused before anything was sent.
    pub local_rejections: u64,
    /// Sum of response latencies in nanoseconds.
    pub response_latency_total_ns: u64,
    /// Slowest response seen, in nanoseconds.
    pub response_latency_max_ns: u64,
    per_command: [u64; 9],
}

impl MetricsSnapshot {
    /// Number of requests sent for one command.
    #[must_use]
    pub fn requests_for(&self, command: PaletteCommand) -> u64 {
        self.per_command[command_slot(command)]
    }

    /// Average response latency in microseconds.
    #[must_use]
    pub fn avg_response_latency_us(&self) -> Option<u64> {
        if self.responses_received == 0 {
            return None;
        }

        let total_ns = u128::from(self.response_latency_total_ns);
        let count = u128::from(self.responses_received);
        u64::try_from(total_ns / (count * NANOSECONDS_PER_MICROSECOND)).ok()
    }
}
