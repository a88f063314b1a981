//! Wall clock in milliseconds since the Unix epoch.

#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or_default()
}

/// Trailing-edge debounce: fires once `delay_ms` has passed since the most
/// recent [`Debouncer::mark`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    pending_since: Option<f64>,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending_since: None,
        }
    }

    /// Record a change, restarting the quiet period.
    pub fn mark(&mut self, now_ms: f64) {
        self.pending_since = Some(now_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Whether the quiet period has elapsed. Firing clears the pending change.
    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.pending_since {
            Some(since) if now_ms - since >= self.delay_ms => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}
