//! Best-effort external data widgets.
//!
//! Each widget walks a deterministic, ordered chain of data sources and
//! always terminates in a usable value; failures are never raised to the
//! caller. The source that produced a value travels with it so surfaces can
//! show an informational notice for cached or fallback data.

pub mod quote;
pub mod weather;

use std::time::{Duration, Instant};

pub use quote::QuoteWidget;
pub use weather::WeatherWidget;

/// Where a widget value came from, in fallback-chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// A live provider response, by provider name.
    Provider(&'static str),
    /// A previously cached snapshot.
    Cache,
    /// The built-in terminal fallback.
    Fallback,
}

/// A widget value together with the source that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Fetched<T> {
    pub fn from_provider(value: T, name: &'static str) -> Self {
        Self {
            value,
            source: DataSource::Provider(name),
        }
    }

    pub fn from_cache(value: T) -> Self {
        Self {
            value,
            source: DataSource::Cache,
        }
    }

    pub fn from_fallback(value: T) -> Self {
        Self {
            value,
            source: DataSource::Fallback,
        }
    }
}

/// Fixed-window request budget: up to `limit` acquisitions per window, with
/// the counter fully reset when a window elapses. Denied checks consume
/// nothing.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    window_start: Instant,
    used: u32,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            window_start: Instant::now(),
            used: 0,
        }
    }

    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&mut self, now: Instant) -> bool {
        if now.duration_since(self.window_start) >= self.window {
            self.window_start = now;
            self.used = 0;
        }
        if self.used < self.limit {
            self.used += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_denies_after_budget_is_spent() {
        let mut limiter = RateLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();
        for _ in 0..5 {
            assert!(limiter.try_acquire_at(start));
        }
        assert!(!limiter.try_acquire_at(start));
        assert!(!limiter.try_acquire_at(start + Duration::from_secs(59)));
    }

    #[test]
    fn limiter_resets_fully_after_the_window() {
        let mut limiter = RateLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();
        for _ in 0..5 {
            assert!(limiter.try_acquire_at(start));
        }
        let later = start + Duration::from_secs(60);
        for _ in 0..5 {
            assert!(limiter.try_acquire_at(later));
        }
        assert!(!limiter.try_acquire_at(later));
    }
}
