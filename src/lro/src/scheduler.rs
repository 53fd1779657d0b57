// Copyright 2025 Atlas Maps Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the timer seam used by the poller.
//!
//! The poller never talks to a platform timer directly. It hands its work to
//! a [Scheduler] and keeps the returned [TimerHandle] so the pending work can
//! be cancelled. This keeps the poller portable and lets tests drive it with
//! a logical clock.

use futures::future::BoxFuture;
use std::time::Duration;

/// The trait implemented by timer facilities.
///
/// Implementations run `work` once, `after` the given delay. The returned
/// [TimerHandle] cancels the work if it has not started yet.
pub trait Scheduler: Send + Sync + std::fmt::Debug {
    /// Schedules `work` to run once after `after` elapses.
    fn schedule(&self, after: Duration, work: BoxFuture<'static, ()>) -> TimerHandle;

    /// Runs `work` as soon as possible.
    fn spawn(&self, work: BoxFuture<'static, ()>) -> TimerHandle {
        self.schedule(Duration::ZERO, work)
    }
}

/// An owned, cancellable handle to scheduled work.
///
/// Dropping the handle does **not** cancel the work, call
/// [cancel][TimerHandle::cancel] to do so. Cancelling work that already ran,
/// or cancelling twice, has no effect.
pub struct TimerHandle {
    cancel: Box<dyn Fn() + Send + Sync>,
}

impl TimerHandle {
    /// Creates a handle from a cancellation thunk.
    pub fn new<F>(cancel: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            cancel: Box::new(cancel),
        }
    }

    /// Cancels the scheduled work if it has not started yet.
    pub fn cancel(&self) {
        (self.cancel)()
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle").finish()
    }
}

/// A [Scheduler] backed by the tokio timer wheel.
///
/// This is the default scheduler. Tests can pause the tokio clock
/// (`#[tokio::test(start_paused = true)]`) to control it deterministically.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, after: Duration, work: BoxFuture<'static, ()>) -> TimerHandle {
        let task = tokio::spawn(async move {
            if !after.is_zero() {
                tokio::time::sleep(after).await;
            }
            work.await;
        });
        let abort = task.abort_handle();
        TimerHandle::new(move || abort.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::time::{Instant, advance};

    #[tokio::test(start_paused = true)]
    async fn schedule_runs_after_delay() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let start = Instant::now();
        let _handle = TokioScheduler.schedule(
            Duration::from_millis(100),
            Box::pin(async move {
                let _ = tx.send(());
            }),
        );
        rx.await.expect("scheduled work runs");
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_unfired_work() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let handle = TokioScheduler.schedule(
            Duration::from_millis(100),
            Box::pin(async move {
                flag.store(true, Ordering::SeqCst);
            }),
        );
        handle.cancel();
        advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let handle = TokioScheduler.schedule(Duration::from_millis(100), Box::pin(async {}));
        handle.cancel();
        handle.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_does_not_cancel() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let handle = TokioScheduler.schedule(
            Duration::from_millis(100),
            Box::pin(async move {
                let _ = tx.send(());
            }),
        );
        drop(handle);
        rx.await.expect("scheduled work still runs");
    }

    #[tokio::test(start_paused = true)]
    async fn spawn_runs_promptly() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let _handle = TokioScheduler.spawn(Box::pin(async move {
            let _ = tx.send(());
        }));
        rx.await.expect("spawned work runs");
    }
}
