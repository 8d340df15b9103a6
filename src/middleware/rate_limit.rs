//! Fixed-window request rate limiting.
//!
//! Each key owns a window that opens on its first request and lasts
//! `window`. Up to `max_requests` requests pass inside one window; the rest
//! are answered with 429 before reaching any handler.

use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::{task::JoinHandle, time::Instant};

use crate::{config::RateLimitConfig, error::ApiError};

pub const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Counter key. `None` is the shared global bucket.
type Key = Option<IpAddr>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u64 },
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u64,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u64,
    window: Duration,
    per_client: bool,
    windows: Mutex<HashMap<Key, Window>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: config.window,
            per_client: config.per_client,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub const fn max_requests(&self) -> u64 {
        self.max_requests
    }

    /// Picks the counter for a request from `peer`.
    pub const fn key_for(&self, peer: Option<IpAddr>) -> Key {
        if self.per_client { peer } else { None }
    }

    pub fn check(&self, key: Key) -> Decision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: Key, now: Instant) -> Decision {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let window = windows.entry(key).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(window.started);
        if elapsed >= self.window {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count >= self.max_requests {
            return Decision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        window.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - window.count,
        }
    }

    /// Drops windows that have expired by `now`, returning how many went.
    pub fn prune_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let before = windows.len();
        windows.retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        before - windows.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Prunes expired windows once per window length for the life of the process.
    pub fn spawn_pruner(self: &Arc<Self>) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.window);
            loop {
                ticker.tick().await;
                let pruned = limiter.prune_at(Instant::now());
                if pruned > 0 {
                    tracing::debug!("pruned {pruned} expired rate limit windows");
                }
            }
        })
    }
}

fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    match limiter.check(limiter.key_for(peer)) {
        Decision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(LIMIT_HEADER, HeaderValue::from(limiter.max_requests()));
            headers.insert(REMAINING_HEADER, HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after } => {
            tracing::warn!(
                "rate limit exceeded for {}",
                peer.map_or_else(|| "global bucket".to_string(), |ip| ip.to_string())
            );
            let mut response = ApiError::RateLimited.into_response();
            let headers = response.headers_mut();
            headers.insert(LIMIT_HEADER, HeaderValue::from(limiter.max_requests()));
            headers.insert(REMAINING_HEADER, HeaderValue::from(0u64));
            headers.insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_after_secs(retry_after)),
            );
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::Ipv4Addr;

    fn limiter(max_requests: u64, window_secs: u64, per_client: bool) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            max_requests,
            window: Duration::from_secs(window_secs),
            per_client,
        })
    }

    #[test]
    fn limits_within_one_window() {
        let limiter = limiter(2, 60, false);
        let now = Instant::now();

        assert_eq!(limiter.check_at(None, now), Decision::Allowed { remaining: 1 });
        assert_eq!(limiter.check_at(None, now), Decision::Allowed { remaining: 0 });
        assert_eq!(
            limiter.check_at(None, now + Duration::from_secs(20)),
            Decision::Limited {
                retry_after: Duration::from_secs(40)
            }
        );
    }

    #[test]
    fn window_reset_allows_again() {
        let limiter = limiter(1, 10, false);
        let start = Instant::now();

        assert!(matches!(limiter.check_at(None, start), Decision::Allowed { .. }));
        assert!(matches!(
            limiter.check_at(None, start + Duration::from_secs(9)),
            Decision::Limited { .. }
        ));
        assert_eq!(
            limiter.check_at(None, start + Duration::from_secs(10)),
            Decision::Allowed { remaining: 0 }
        );
    }

    #[test]
    fn limited_requests_do_not_extend_the_window() {
        let limiter = limiter(1, 10, false);
        let start = Instant::now();

        limiter.check_at(None, start);
        for offset in 1..10 {
            limiter.check_at(None, start + Duration::from_secs(offset));
        }
        assert!(matches!(
            limiter.check_at(None, start + Duration::from_secs(10)),
            Decision::Allowed { .. }
        ));
    }

    #[test]
    fn per_client_keys_are_independent() {
        let limiter = limiter(1, 60, true);
        let now = Instant::now();
        let a = limiter.key_for(Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
        let b = limiter.key_for(Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))));

        assert!(matches!(limiter.check_at(a, now), Decision::Allowed { .. }));
        assert!(matches!(limiter.check_at(a, now), Decision::Limited { .. }));
        assert!(matches!(limiter.check_at(b, now), Decision::Allowed { .. }));
    }

    #[test]
    fn global_mode_ignores_peer() {
        let limiter = limiter(1, 60, false);
        assert_eq!(
            limiter.key_for(Some(IpAddr::V4(Ipv4Addr::LOCALHOST))),
            None
        );
    }

    #[test]
    fn prune_drops_only_expired_windows() {
        let limiter = limiter(5, 10, true);
        let start = Instant::now();
        let a = Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        let b = Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)));

        limiter.check_at(a, start);
        limiter.check_at(b, start + Duration::from_secs(5));

        assert_eq!(limiter.prune_at(start + Duration::from_secs(12)), 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(1500)), 2);
        assert_eq!(retry_after_secs(Duration::from_secs(3)), 3);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }
}
