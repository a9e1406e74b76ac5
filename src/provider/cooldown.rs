// src/provider/cooldown.rs — Per-model cooldown tracking
//
// An admission gate shared by every concurrent generation call: models
// that recently failed with a quota/rate-limit/validity error are skipped
// until their timer expires. Not a circuit breaker — there is no half-open
// probing; an expired timer makes the model fully available again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source, injected so tests can advance time without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
struct CooldownEntry {
    until: Instant,
    reason: String,
}

/// In-memory, process-wide cooldown map. At most one entry per model;
/// a new failure overwrites the previous entry. Never persisted.
pub struct CooldownRegistry {
    entries: Mutex<HashMap<String, CooldownEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for CooldownRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CooldownRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// True while the model's cooldown timer is still running. Expired
    /// entries are evicted here — there is no background sweeper.
    pub fn is_on_cooldown(&self, model: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap();

        match entries.get(model) {
            None => false,
            Some(entry) if now >= entry.until => {
                entries.remove(model);
                tracing::info!(model = %model, "cooldown expired");
                false
            }
            Some(_) => true,
        }
    }

    /// Put `model` on cooldown, deriving the duration from the error text:
    /// an explicit "retry in N" directive wins, daily/quota exhaustion gets
    /// an hour, anything else a minute.
    pub fn set_cooldown(&self, model: &str, error_text: &str) {
        let secs = cooldown_secs(error_text);
        let reason: String = error_text.chars().take(100).collect();

        tracing::warn!(
            model = %model,
            cooldown_secs = secs,
            "model on cooldown: {}",
            reason
        );

        let entry = CooldownEntry {
            until: self.clock.now() + Duration::from_secs(secs),
            reason,
        };
        self.entries.lock().unwrap().insert(model.to_string(), entry);
    }

    /// `candidates` filtered to models not on cooldown, order preserved.
    pub fn available_models<'a>(&self, candidates: &'a [String]) -> Vec<&'a str> {
        candidates
            .iter()
            .map(String::as_str)
            .filter(|m| !self.is_on_cooldown(m))
            .collect()
    }

    /// The stored reason for a model's cooldown, if one is active.
    pub fn reason(&self, model: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        entries.get(model).map(|e| e.reason.clone())
    }
}

/// Duration rules, evaluated in order: explicit retry directive, then
/// hard-quota signals, then the one-minute default.
fn cooldown_secs(error_text: &str) -> u64 {
    if let Some(secs) = parse_retry_directive(error_text) {
        return secs;
    }

    let lower = error_text.to_lowercase();
    if lower.contains("perday") || lower.contains("daily") || lower.contains("quota") {
        return 3600;
    }

    60
}

/// Extract N from a "retry in N" directive, case-insensitive.
fn parse_retry_directive(text: &str) -> Option<u64> {
    let lower = text.to_lowercase();
    let idx = lower.find("retry in ")?;
    let rest = &lower[idx + "retry in ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// Manually advanced clock for cooldown-expiry tests.
    struct MockClock {
        now: StdMutex<Instant>,
    }

    impl MockClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: StdMutex::new(Instant::now()),
            })
        }

        fn advance(&self, d: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += d;
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    #[test]
    fn test_cooldown_secs_retry_directive() {
        assert_eq!(cooldown_secs("please retry in 45 seconds"), 45);
        assert_eq!(cooldown_secs("Retry in 7"), 7);
    }

    #[test]
    fn test_cooldown_secs_quota() {
        assert_eq!(cooldown_secs("daily quota exceeded"), 3600);
        assert_eq!(cooldown_secs("GenerateRequestsPerDayPerProject limit"), 3600);
    }

    #[test]
    fn test_cooldown_secs_default() {
        assert_eq!(cooldown_secs("HTTP 429: Too Many Requests"), 60);
    }

    #[test]
    fn test_retry_directive_wins_over_quota_signal() {
        // Both signals present: the explicit directive takes precedence.
        assert_eq!(cooldown_secs("quota exceeded, retry in 120"), 120);
    }

    #[test]
    fn test_set_then_check() {
        let reg = CooldownRegistry::new();
        assert!(!reg.is_on_cooldown("gemma-3-27b-it"));
        reg.set_cooldown("gemma-3-27b-it", "HTTP 429");
        assert!(reg.is_on_cooldown("gemma-3-27b-it"));
    }

    #[test]
    fn test_check_is_idempotent() {
        let clock = MockClock::new();
        let reg = CooldownRegistry::with_clock(clock.clone());
        reg.set_cooldown("m", "retry in 30");

        assert!(reg.is_on_cooldown("m"));
        assert!(reg.is_on_cooldown("m"));

        // The until timestamp was not extended by the checks: 31s after
        // the original set, the entry is gone.
        clock.advance(Duration::from_secs(31));
        assert!(!reg.is_on_cooldown("m"));
    }

    #[test]
    fn test_lazy_eviction_on_expiry() {
        let clock = MockClock::new();
        let reg = CooldownRegistry::with_clock(clock.clone());
        reg.set_cooldown("m", "retry in 10");

        clock.advance(Duration::from_secs(11));
        assert!(!reg.is_on_cooldown("m"));
        // Evicted, not just reported available
        assert!(reg.reason("m").is_none());
    }

    #[test]
    fn test_overwrite_does_not_accumulate() {
        let clock = MockClock::new();
        let reg = CooldownRegistry::with_clock(clock.clone());
        reg.set_cooldown("m", "retry in 3600");
        reg.set_cooldown("m", "retry in 5");

        // Second entry replaced the first; 6s is enough to expire.
        clock.advance(Duration::from_secs(6));
        assert!(!reg.is_on_cooldown("m"));
    }

    #[test]
    fn test_available_models_preserves_order() {
        let reg = CooldownRegistry::new();
        let candidates: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        reg.set_cooldown("b", "quota");

        assert_eq!(reg.available_models(&candidates), vec!["a", "c"]);
    }

    #[test]
    fn test_available_models_all_free() {
        let reg = CooldownRegistry::new();
        let candidates: Vec<String> = vec!["a".into(), "b".into()];
        assert_eq!(reg.available_models(&candidates), vec!["a", "b"]);
    }

    #[test]
    fn test_reason_truncated_to_100_chars() {
        let reg = CooldownRegistry::new();
        let long = "x".repeat(300);
        reg.set_cooldown("m", &long);
        assert_eq!(reg.reason("m").unwrap().len(), 100);
    }

    #[test]
    fn test_expiry_makes_model_available_again() {
        let clock = MockClock::new();
        let reg = CooldownRegistry::with_clock(clock.clone());
        let candidates: Vec<String> = vec!["m".into()];

        reg.set_cooldown("m", "retry in 45");
        assert!(reg.available_models(&candidates).is_empty());

        clock.advance(Duration::from_secs(46));
        assert_eq!(reg.available_models(&candidates), vec!["m"]);
    }
}
