//! Token-bucket rate limiter for outbound email.
//!
//! The bucket refills continuously at `rate_per_sec` and holds at most
//! `burst` tokens, so short bursts go out immediately while sustained
//! sending settles at the configured rate.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Async token-bucket limiter.
///
/// Shared via `Arc`; [`acquire`](RateLimiter::acquire) sleeps until a token
/// is available, so callers just `limiter.acquire().await` before each send.
pub struct RateLimiter {
    rate_per_sec: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Create a limiter that refills at `rate_per_sec` tokens per second and
    /// allows bursts of up to `burst` tokens. The bucket starts full.
    pub fn new(rate_per_sec: f64, burst: u32) -> Self {
        let burst = f64::from(burst).max(1.0);
        Self {
            rate_per_sec: rate_per_sec.max(f64::MIN_POSITIVE),
            burst,
            bucket: Mutex::new(Bucket {
                tokens: burst,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Wait until a token is available, then consume it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                self.refill(&mut bucket);

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }

                // Time until one full token accumulates.
                let deficit = 1.0 - bucket.tokens;
                Duration::from_secs_f64(deficit / self.rate_per_sec)
            };

            tokio::time::sleep(wait).await;
        }
    }

    /// Consume a token if one is available right now.
    pub async fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().await;
        self.refill(&mut bucket);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec).min(self.burst);
        bucket.last_refill = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn burst_tokens_are_immediately_available() {
        let limiter = RateLimiter::new(1.0, 3);

        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);
    }

    #[tokio::test(start_paused = true)]
    async fn tokens_refill_over_time() {
        let limiter = RateLimiter::new(2.0, 1);

        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);

        // 2 tokens/sec: after 500ms one token has accumulated.
        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(limiter.try_acquire().await);
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_waits_for_refill() {
        let limiter = RateLimiter::new(10.0, 1);

        limiter.acquire().await;

        let start = Instant::now();
        limiter.acquire().await;
        let waited = start.elapsed();

        // 10 tokens/sec means the second acquire waits about 100ms.
        assert!(waited >= Duration::from_millis(90), "waited {waited:?}");
        assert!(waited <= Duration::from_millis(200), "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn bucket_never_exceeds_burst() {
        let limiter = RateLimiter::new(100.0, 2);

        // Long idle period must not bank more than `burst` tokens.
        tokio::time::advance(Duration::from_secs(60)).await;

        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);
    }
}
