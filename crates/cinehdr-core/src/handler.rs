//! Error reporting, throttling, and the process-wide handler.
//!
//! Per-pixel error sites can fire thousands of times per frame, so the
//! handler throttles emission to at most [`MAX_LOGS_PER_WINDOW`] diagnostics
//! per code per rolling one-second window. Throttled reports still update
//! the last-error record and still reach the user callback; only the
//! `tracing` emission is suppressed, and an aggregate summary preserves the
//! suppressed counts.
//!
//! A single mutex guards the throttle table, history, and last-error
//! record. The process-wide instance behind [`global`] initializes lazily;
//! engine entry points accept an explicit handler so tests and embedders
//! can keep state local.

use crate::error::{ErrorCode, ErrorReport, FallbackTier, Severity};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{error, warn};

/// Maximum diagnostics emitted per code per rolling window.
pub const MAX_LOGS_PER_WINDOW: u32 = 10;

/// Rolling throttle window length.
pub const THROTTLE_WINDOW: Duration = Duration::from_secs(1);

/// Maximum retained historical error reports.
const MAX_HISTORY: usize = 64;

/// Callback invoked on every reported error, throttled or not.
pub type ErrorCallback = Arc<dyn Fn(&ErrorReport) + Send + Sync>;

/// Per-code throttle bookkeeping.
#[derive(Debug, Clone)]
struct ThrottleEntry {
    window_start: Instant,
    count: u32,
    throttled: u64,
    first_throttled: Option<Instant>,
    last_throttled: Option<Instant>,
}

impl ThrottleEntry {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            count: 0,
            throttled: 0,
            first_throttled: None,
            last_throttled: None,
        }
    }

    /// Returns true when this event may be emitted.
    fn admit(&mut self, now: Instant) -> bool {
        if now.duration_since(self.window_start) >= THROTTLE_WINDOW {
            self.window_start = now;
            self.count = 0;
            // throttled counters survive the window roll for aggregation
        }
        if self.count >= MAX_LOGS_PER_WINDOW {
            self.throttled += 1;
            if self.first_throttled.is_none() {
                self.first_throttled = Some(now);
            }
            self.last_throttled = Some(now);
            return false;
        }
        self.count += 1;
        true
    }
}

/// Aggregate summary of throttled diagnostics for one code.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleSummary {
    /// The throttled code.
    pub code: ErrorCode,
    /// Number of suppressed emissions.
    pub suppressed: u64,
    /// Span between the first and last suppressed emission.
    pub span: Duration,
}

impl std::fmt::Display for ThrottleSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} diagnostics suppressed over {} ms",
            self.code,
            self.suppressed,
            self.span.as_millis()
        )
    }
}

#[derive(Default)]
struct HandlerState {
    last_error: Option<ErrorReport>,
    history: Vec<ErrorReport>,
    throttle: HashMap<ErrorCode, ThrottleEntry>,
    callback: Option<ErrorCallback>,
}

/// Mutex-guarded error handler.
///
/// # Example
///
/// ```rust
/// use cinehdr_core::{ErrorCode, ErrorHandler, FallbackTier};
///
/// let handler = ErrorHandler::new();
/// let tier = handler.report(ErrorCode::NanInf, "bad intermediate", None);
/// assert_eq!(tier, FallbackTier::Hard);
/// assert_eq!(handler.last_error().unwrap().code, ErrorCode::NanInf);
/// ```
pub struct ErrorHandler {
    state: Mutex<HandlerState>,
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorHandler {
    /// Creates a handler with empty state.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HandlerState::default()),
        }
    }

    /// Reports a diagnostic and returns the selected fallback tier.
    ///
    /// `field` optionally names the offending parameter and its value.
    pub fn report(
        &self,
        code: ErrorCode,
        message: &str,
        field: Option<(&str, f32)>,
    ) -> FallbackTier {
        self.report_with_context(code, message, field, "", "")
    }

    /// Reports a diagnostic with clip context attached.
    pub fn report_with_context(
        &self,
        code: ErrorCode,
        message: &str,
        field: Option<(&str, f32)>,
        clip_id: &str,
        timecode: &str,
    ) -> FallbackTier {
        let tier = code.fallback_tier().unwrap_or(FallbackTier::ParameterCorrection);

        let mut report = ErrorReport::new(code, message).with_clip(clip_id, timecode);
        if let Some((name, value)) = field {
            report = report.with_field(name, value);
        }
        report.action_taken = tier.action_tag().to_string();

        let mut state = self.state.lock().expect("error handler poisoned");

        let now = Instant::now();
        let admit = state
            .throttle
            .entry(code)
            .or_insert_with(|| ThrottleEntry::new(now))
            .admit(now);

        if admit {
            match code.severity() {
                Severity::Error => error!(code = code.name(), "{report}"),
                _ => warn!(code = code.name(), "{report}"),
            }
        }

        if state.history.len() >= MAX_HISTORY {
            state.history.remove(0);
        }
        state.history.push(report.clone());
        state.last_error = Some(report.clone());

        // The callback sees every report, throttled or not. It runs with
        // the lock released so a callback may itself report.
        let callback = state.callback.clone();
        drop(state);
        if let Some(cb) = callback {
            cb(&report);
        }

        tier
    }

    /// Installs the user error callback, replacing any previous one.
    pub fn set_callback(&self, callback: ErrorCallback) {
        let mut state = self.state.lock().expect("error handler poisoned");
        state.callback = Some(callback);
    }

    /// Most recent error report, if any.
    pub fn last_error(&self) -> Option<ErrorReport> {
        let state = self.state.lock().expect("error handler poisoned");
        state.last_error.clone()
    }

    /// Bounded history of recent reports, oldest first.
    pub fn history(&self) -> Vec<ErrorReport> {
        let state = self.state.lock().expect("error handler poisoned");
        state.history.clone()
    }

    /// Aggregate summaries for every code that was throttled.
    pub fn aggregate_reports(&self) -> Vec<ThrottleSummary> {
        let state = self.state.lock().expect("error handler poisoned");
        let mut summaries: Vec<ThrottleSummary> = ErrorCode::ALL
            .iter()
            .filter_map(|code| {
                let entry = state.throttle.get(code)?;
                if entry.throttled == 0 {
                    return None;
                }
                let span = match (entry.first_throttled, entry.last_throttled) {
                    (Some(first), Some(last)) => last.duration_since(first),
                    _ => Duration::ZERO,
                };
                Some(ThrottleSummary {
                    code: *code,
                    suppressed: entry.throttled,
                    span,
                })
            })
            .collect();
        summaries.sort_by_key(|s| std::cmp::Reverse(s.suppressed));
        summaries
    }

    /// Clears the last error, history, and throttle state.
    ///
    /// The installed callback survives a reset.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("error handler poisoned");
        state.last_error = None;
        state.history.clear();
        state.throttle.clear();
    }
}

static GLOBAL_HANDLER: Lazy<ErrorHandler> = Lazy::new(ErrorHandler::new);

/// The lazily initialized process-wide handler.
///
/// Engine entry points default to this when no explicit handler is
/// supplied; correctness never depends on it.
pub fn global() -> &'static ErrorHandler {
    &GLOBAL_HANDLER
}
