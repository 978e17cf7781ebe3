//! Per-channel request queue enforcing minimum call spacing.

use questary_core::{ApiError, ApiResult, Channel, ClientConfig};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Serializes calls on one channel and keeps their start times at least one
/// interval apart.
///
/// Spacing is measured start-to-start: the timer is stamped when execution
/// begins, not when it completes. The internal mutex is held across the
/// compute-wait / stamp / execute sequence, so concurrent `enqueue` calls
/// are safe without any caller discipline; tokio's mutex is FIFO-fair, which
/// makes lock acquisition order the tie-break between near-simultaneous
/// callers.
pub struct RequestQueue {
    channel: Channel,
    interval: Duration,
    call_timeout: Option<Duration>,
    state: Mutex<QueueState>,
}

#[derive(Default)]
struct QueueState {
    last_start: Option<Instant>,
}

impl RequestQueue {
    /// Create a queue for one channel.
    pub fn new(channel: Channel, interval: Duration, call_timeout: Option<Duration>) -> Self {
        Self {
            channel,
            interval,
            call_timeout,
            state: Mutex::new(QueueState::default()),
        }
    }

    /// The channel this queue serializes.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Run `op` in the next free slot on this channel.
    ///
    /// Suspends until at least `interval` has passed since the previous
    /// call's start, then executes. The operation's outcome propagates
    /// unchanged; a failing call still consumes its slot. With a call
    /// timeout configured, an operation that outlives it fails with
    /// [`ApiError::Timeout`] and releases the slot; `last_start` keeps its
    /// normal start-of-call value either way.
    pub async fn enqueue<T, F, Fut>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let mut state = self.state.lock().await;

        if let Some(last) = state.last_start {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                let wait = self.interval - elapsed;
                tracing::debug!(
                    channel = self.channel.as_str(),
                    wait_ms = wait.as_millis() as u64,
                    "waiting before next call"
                );
                tokio::time::sleep(wait).await;
            }
        }

        state.last_start = Some(Instant::now());

        match self.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, op()).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        channel = self.channel.as_str(),
                        limit_ms = limit.as_millis() as u64,
                        "queued call timed out"
                    );
                    Err(ApiError::Timeout {
                        limit_ms: limit.as_millis() as u64,
                    })
                }
            },
            None => op().await,
        }
    }
}

impl std::fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestQueue")
            .field("channel", &self.channel.as_str())
            .field("interval", &self.interval)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

/// The static set of channel queues, one per [`Channel`].
///
/// Channels are fully independent: saturating one never delays another.
#[derive(Debug)]
pub struct ChannelQueues {
    completions_primary: RequestQueue,
    completions_secondary: RequestQueue,
    structured_memory: RequestQueue,
}

impl ChannelQueues {
    /// Build all channel queues from one client configuration.
    pub fn new(config: &ClientConfig) -> Self {
        let build = |channel| RequestQueue::new(channel, config.rate_interval, config.call_timeout);
        Self {
            completions_primary: build(Channel::CompletionsPrimary),
            completions_secondary: build(Channel::CompletionsSecondary),
            structured_memory: build(Channel::StructuredMemory),
        }
    }

    /// The queue for a channel.
    pub fn channel(&self, channel: Channel) -> &RequestQueue {
        match channel {
            Channel::CompletionsPrimary => &self.completions_primary,
            Channel::CompletionsSecondary => &self.completions_secondary,
            Channel::StructuredMemory => &self.structured_memory,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn queue(interval_ms: u64) -> RequestQueue {
        RequestQueue::new(
            Channel::StructuredMemory,
            Duration::from_millis(interval_ms),
            None,
        )
    }

    /// Shared start-time recorder for timing assertions.
    type Starts = Arc<std::sync::Mutex<Vec<Instant>>>;

    fn recorder() -> Starts {
        Arc::new(std::sync::Mutex::new(Vec::new()))
    }

    async fn record(starts: &Starts) -> ApiResult<()> {
        starts.lock().unwrap().push(Instant::now());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_runs_immediately() {
        let q = queue(1000);
        let before = Instant::now();
        q.enqueue(|| async { Ok(()) }).await.unwrap();
        assert_eq!(Instant::now(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_calls_are_spaced() {
        let q = queue(1000);
        let starts = recorder();
        for _ in 0..3 {
            q.enqueue(|| record(&starts)).await.unwrap();
        }
        let starts = starts.lock().unwrap();
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(1000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_zero_100_2500() {
        let q = Arc::new(queue(1000));
        let starts = recorder();
        let t0 = Instant::now();

        let first = {
            let (q, starts) = (q.clone(), starts.clone());
            tokio::spawn(async move { q.enqueue(|| record(&starts)).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = {
            let (q, starts) = (q.clone(), starts.clone());
            tokio::spawn(async move { q.enqueue(|| record(&starts)).await })
        };
        tokio::time::sleep(Duration::from_millis(2400)).await;
        let third = {
            let (q, starts) = (q.clone(), starts.clone());
            tokio::spawn(async move { q.enqueue(|| record(&starts)).await })
        };

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();
        third.await.unwrap().unwrap();

        let starts = starts.lock().unwrap();
        let offsets: Vec<u64> = starts.iter().map(|s| (*s - t0).as_millis() as u64).collect();
        assert_eq!(offsets, vec![0, 1000, 2500]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_enqueues_serialize_fifo() {
        let q = Arc::new(queue(100));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..4u32 {
            let (q, order) = (q.clone(), order.clone());
            handles.push(tokio::spawn(async move {
                q.enqueue(|| async {
                    order.lock().unwrap().push(i);
                    Ok(())
                })
                .await
            }));
            // Yield so each task reaches the lock before the next spawns.
            tokio::task::yield_now().await;
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_channels_do_not_delay_each_other() {
        let config = ClientConfig {
            rate_interval: Duration::from_millis(1000),
            ..ClientConfig::default()
        };
        let queues = Arc::new(ChannelQueues::new(&config));

        // Saturate structured-memory with a slow call.
        let busy = {
            let queues = queues.clone();
            tokio::spawn(async move {
                queues
                    .channel(Channel::StructuredMemory)
                    .enqueue(|| async {
                        tokio::time::sleep(Duration::from_millis(5000)).await;
                        Ok(())
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;

        let before = Instant::now();
        queues
            .channel(Channel::CompletionsPrimary)
            .enqueue(|| async { Ok(()) })
            .await
            .unwrap();
        assert_eq!(Instant::now(), before);

        busy.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_propagates_and_slot_is_consumed() {
        let q = queue(1000);
        let starts = recorder();

        let err = q
            .enqueue(|| async {
                Err::<(), _>(ApiError::RemoteFailure {
                    status: 500,
                    body: "boom".to_string(),
                })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::RemoteFailure { status: 500, .. }));

        // The failed call consumed the slot, so the next call still waits.
        let t0 = Instant::now();
        q.enqueue(|| record(&starts)).await.unwrap();
        let started = starts.lock().unwrap()[0];
        assert_eq!((started - t0).as_millis(), 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_timeout_fails_and_releases_slot() {
        let q = RequestQueue::new(
            Channel::StructuredMemory,
            Duration::from_millis(1000),
            Some(Duration::from_millis(500)),
        );

        let err = q
            .enqueue(|| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Timeout { limit_ms: 500 });

        // Next call waits relative to the timed-out call's start, not its
        // abandonment.
        let starts = recorder();
        let t0 = Instant::now();
        q.enqueue(|| record(&starts)).await.unwrap();
        let started = starts.lock().unwrap()[0];
        // 500ms already elapsed during the timeout; 500ms of interval remain.
        assert_eq!((started - t0).as_millis(), 500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_channel_runs_without_wait_after_interval() {
        let q = queue(1000);
        q.enqueue(|| async { Ok(()) }).await.unwrap();
        tokio::time::sleep(Duration::from_millis(3000)).await;

        let before = Instant::now();
        q.enqueue(|| async { Ok(()) }).await.unwrap();
        assert_eq!(Instant::now(), before);
    }
}
