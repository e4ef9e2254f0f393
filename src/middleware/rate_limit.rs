use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::state::AppState;

/// Sliding-window limiter keyed by client address.
///
/// Each key keeps the instants of its accepted requests inside the window.
/// Rejected requests are counted but not recorded, so a client that keeps
/// hammering is let back in once its oldest accepted request ages out.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    clients: Mutex<HashMap<String, VecDeque<Instant>>>,
    total_requests: AtomicU64,
    rejected_requests: AtomicU64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RateLimitMetrics {
    pub total_requests: u64,
    pub rejected_requests: u64,
    pub tracked_clients: usize,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Mutex::new(HashMap::new()),
            total_requests: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
        }
    }

    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// Records a request from `key` at `now`; `false` means it must be refused.
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        let mut clients = self.clients.lock();
        let hits = clients.entry(key.to_string()).or_default();
        while let Some(&oldest) = hits.front() {
            if now.duration_since(oldest) >= self.window {
                hits.pop_front();
            } else {
                break;
            }
        }

        if hits.len() >= self.max_requests {
            self.rejected_requests.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        hits.push_back(now);
        true
    }

    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Drops clients with no request inside the window. Returns how many
    /// were evicted.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut clients = self.clients.lock();
        let before = clients.len();
        clients.retain(|_, hits| {
            hits.back()
                .map(|&newest| now.duration_since(newest) < self.window)
                .unwrap_or(false)
        });
        before - clients.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().len()
    }

    pub fn metrics(&self) -> RateLimitMetrics {
        RateLimitMetrics {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            tracked_clients: self.tracked_clients(),
        }
    }

    /// Runs [`RateLimiter::sweep`] every `every` until the runtime shuts down.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        info!(interval_secs = every.as_secs(), "Starting rate limiter sweeper");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = self.sweep();
                if evicted > 0 {
                    debug!(evicted, remaining = self.tracked_clients(), "Evicted idle rate limit entries");
                }
            }
        })
    }
}

/// Peer address of the request, or the first `X-Forwarded-For` hop when the
/// service sits behind a trusted proxy.
pub fn client_key(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    if path == "/health" {
        return Ok(next.run(request).await);
    }

    let client = client_key(&request, state.config().trust_forwarded_for);
    if !state.rate_limiter().check(&client) {
        let metrics = state.rate_limiter().metrics();
        warn!(
            client = %client,
            path = %path,
            total_requests = metrics.total_requests,
            rejected_requests = metrics.rejected_requests,
            "Rate limit exceeded"
        );
        return Err(AppError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}
