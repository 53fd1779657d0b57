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

//! Types and functions to make long-running operations (LROs) easier to use.
//!
//! Some Atlas Maps endpoints are asynchronous on the server: the initial
//! request is answered with `202 Accepted` and a `Location` header naming a
//! status endpoint. The client must poll that location until the operation
//! reaches a terminal state, then decode the final payload. [Poller] drives
//! this loop: it issues the initial request, schedules polls at a fixed
//! interval, delivers the decoded result (or a failure) through a single
//! completion callback, and supports cooperative cancellation.

use crate::scheduler::{Scheduler, TimerHandle, TokioScheduler};
use crate::transport::PollTransport;
use atlas_core::Result;
use atlas_core::error::{Error, HttpError};
use atlas_core::response::{RawResponse, ResponseMetadata};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use url::Url;

pub mod scheduler;
pub mod transport;
mod details;

/// The header naming the client on poll requests.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// The suggested delay between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// The observable state of a long-running operation.
///
/// The status is monotonic with respect to the terminal partition: once a
/// terminal state ([Succeeded][OperationStatus::Succeeded],
/// [Failed][OperationStatus::Failed],
/// [Cancelled][OperationStatus::Cancelled]) is reached it never changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationStatus {
    /// Created, no network activity yet.
    NotStarted,
    /// The operation was accepted and is being polled.
    Running,
    /// The operation completed and its result was delivered.
    Succeeded,
    /// The operation failed; the failure was delivered.
    Failed,
    /// The operation was cancelled before it resolved.
    Cancelled,
}

impl OperationStatus {
    /// Returns true iff the status is terminal.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

type CompletionHandler<R> = Box<dyn FnOnce(Result<R>, Option<ResponseMetadata>) + Send>;
type BaseRequest = Box<dyn FnOnce() -> BoxFuture<'static, Result<RawResponse>> + Send>;

/// A builder for [Poller].
///
/// Obtained via [Poller::builder]. The poll transport is required; the
/// client id and the scheduler have defaults.
pub struct PollerBuilder<R> {
    transport: Arc<dyn PollTransport>,
    scheduler: Arc<dyn Scheduler>,
    client_id: Option<String>,
    response: PhantomData<R>,
}

impl<R> PollerBuilder<R>
where
    R: DeserializeOwned + Send + 'static,
{
    fn new(transport: Arc<dyn PollTransport>) -> Self {
        Self {
            transport,
            scheduler: Arc::new(TokioScheduler),
            client_id: None,
            response: PhantomData,
        }
    }

    /// Sets the client id sent with every poll request.
    pub fn with_client_id<V: Into<String>>(mut self, client_id: V) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Replaces the default tokio-backed [Scheduler].
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Creates the poller from the initial-request capability.
    ///
    /// `base` performs the initial request. It is supplied by the endpoint
    /// wrapper with all parameters, options, and retry settings captured,
    /// and is invoked at most once.
    pub fn build<B, BF>(self, base: B) -> Poller<R>
    where
        B: FnOnce() -> BF + Send + 'static,
        BF: Future<Output = Result<RawResponse>> + Send + 'static,
    {
        let invoker: BaseRequest =
            Box::new(move || Box::pin(base()) as BoxFuture<'static, Result<RawResponse>>);
        Poller {
            inner: Arc::new(Inner {
                transport: self.transport,
                scheduler: self.scheduler,
                client_id: self.client_id,
                state: Mutex::new(State {
                    status: OperationStatus::NotStarted,
                    pending: None,
                    location: None,
                    interval: DEFAULT_POLL_INTERVAL,
                    base: Some(invoker),
                    handler: None,
                }),
            }),
        }
    }
}

/// Drives a long-running operation from submission to terminal resolution.
///
/// The poller issues the initial request, and on `202 Accepted` polls the
/// URL from the `Location` header until the operation resolves. The final
/// `200` body is decoded into `R` and delivered, together with the raw
/// response metadata, through the completion callback passed to
/// [start][Poller::start].
///
/// Cloning the poller is cheap; clones observe and control the same
/// operation, which is how a caller holds on to [cancel][Poller::cancel]
/// while the operation runs.
///
/// # Example
/// ```
/// use atlas_maps_lro::Poller;
/// use atlas_maps_lro::transport::PollTransport;
/// use atlas_core::Result;
/// use atlas_core::response::{RawResponse, ResponseMetadata};
/// use http::{HeaderMap, StatusCode};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Debug, serde::Deserialize)]
/// struct BatchSummary {
///     total_requests: u32,
/// }
///
/// struct NullTransport;
///
/// #[async_trait::async_trait]
/// impl PollTransport for NullTransport {
///     async fn get(&self, _url: url::Url, _headers: HeaderMap) -> Result<RawResponse> {
///         unimplemented!("this operation completes on the initial request")
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let base = || async {
///     let metadata = ResponseMetadata::new(StatusCode::OK, HeaderMap::new());
///     let body = bytes::Bytes::from_static(br#"{"total_requests": 2}"#);
///     Ok(RawResponse::new(metadata, Some(body)))
/// };
/// let poller = Poller::<BatchSummary>::builder(Arc::new(NullTransport)).build(base);
/// let summary = poller.until_done(Duration::from_millis(50)).await?;
/// assert_eq!(summary.total_requests, 2);
/// # Result::<()>::Ok(()) });
/// ```
pub struct Poller<R> {
    inner: Arc<Inner<R>>,
}

impl<R> Clone for Poller<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R> std::fmt::Debug for Poller<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("status", &self.status())
            .finish()
    }
}

impl<R> Poller<R>
where
    R: DeserializeOwned + Send + 'static,
{
    /// Creates a builder for a poller using the given poll transport.
    pub fn builder(transport: Arc<dyn PollTransport>) -> PollerBuilder<R> {
        PollerBuilder::new(transport)
    }

    /// Begins the operation.
    ///
    /// Issues the initial request. A `200` response is decoded and delivered
    /// immediately. A `202` response must carry a `Location` header with an
    /// absolute URL; the poller then polls that URL every `interval` until
    /// the operation resolves. Any other outcome is a terminal failure.
    ///
    /// `on_complete` is invoked exactly once with the decoded result or a
    /// tagged failure, plus the raw response metadata when one was received.
    /// It is never invoked after [cancel][Poller::cancel] took effect.
    ///
    /// Each poll is scheduled `interval` after the previous poll was
    /// handled, not on a fixed cadence from the start of the operation, so
    /// scheduling drift accumulates over long operations.
    ///
    /// A failed poll is terminal: the poller never retries a poll request.
    /// Retries, where desired, belong to the transport below it.
    ///
    /// Call this at most once. Subsequent calls do nothing and their
    /// callback is dropped.
    pub fn start<F>(&self, interval: Duration, on_complete: F)
    where
        F: FnOnce(Result<R>, Option<ResponseMetadata>) + Send + 'static,
    {
        let base = {
            let mut state = self.inner.lock();
            let Some(base) = state.base.take() else {
                return;
            };
            state.interval = interval;
            state.handler = Some(Box::new(on_complete));
            base
        };
        let inner = self.inner.clone();
        let scheduler = self.inner.scheduler.clone();
        let _detached = scheduler.spawn(Box::pin(async move {
            Inner::run_base(inner, base).await;
        }));
    }

    /// Begins the operation and resolves when it does.
    ///
    /// A convenience wrapper over [start][Poller::start] for callers that do
    /// not need the response metadata. If the operation is cancelled before
    /// it resolves, the future resolves to
    /// [Error::cancelled][atlas_core::error::Error::cancelled].
    pub async fn until_done(self, interval: Duration) -> Result<R> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.start(interval, move |result, _metadata| {
            let _ = tx.send(result);
        });
        match rx.await {
            Ok(result) => result,
            Err(_) => Err(Error::cancelled()),
        }
    }
}

impl<R> Poller<R> {
    /// Cancels the operation.
    ///
    /// Cancellation is cooperative: it releases the pending poll timer and
    /// prevents any future poll, but does not abort a request already in
    /// flight. If such a request later completes, its result is discarded.
    /// The completion callback is never invoked for a cancellation.
    ///
    /// Safe to call from any state, including before
    /// [start][Poller::start]; cancelling a terminal operation does
    /// nothing.
    pub fn cancel(&self) {
        let (timer, handler, base) = {
            let mut state = self.inner.lock();
            if state.status.is_done() {
                return;
            }
            state.status = OperationStatus::Cancelled;
            (
                state.pending.take(),
                state.handler.take(),
                state.base.take(),
            )
        };
        if let Some(timer) = timer {
            timer.cancel();
        }
        // dropped outside the lock: both may own caller state
        drop(handler);
        drop(base);
    }

    /// Returns the current status of the operation.
    pub fn status(&self) -> OperationStatus {
        self.inner.lock().status
    }

    /// Returns true iff the operation reached a terminal state.
    pub fn is_done(&self) -> bool {
        self.status().is_done()
    }
}

struct State<R> {
    status: OperationStatus,
    pending: Option<TimerHandle>,
    location: Option<Url>,
    interval: Duration,
    base: Option<BaseRequest>,
    handler: Option<CompletionHandler<R>>,
}

struct Inner<R> {
    transport: Arc<dyn PollTransport>,
    scheduler: Arc<dyn Scheduler>,
    client_id: Option<String>,
    state: Mutex<State<R>>,
}

impl<R> Inner<R> {
    fn lock(&self) -> MutexGuard<'_, State<R>> {
        self.state.lock().expect("poller state lock poisoned")
    }
}

impl<R> Inner<R>
where
    R: DeserializeOwned + Send + 'static,
{
    async fn run_base(inner: Arc<Self>, base: BaseRequest) {
        let response = match base().await {
            Err(e) => {
                inner.finish(OperationStatus::Failed, Err(e), None);
                return;
            }
            Ok(response) => response,
        };
        let (metadata, body) = response.into_parts();
        match metadata.status().as_u16() {
            200 => {
                let result = details::decode_body::<R>(body.as_ref());
                let status = match &result {
                    Ok(_) => OperationStatus::Succeeded,
                    Err(_) => OperationStatus::Failed,
                };
                inner.finish(status, result, Some(metadata));
            }
            202 => match details::extract_location(&metadata) {
                Err(e) => inner.finish(OperationStatus::Failed, Err(e), Some(metadata)),
                Ok(location) => Self::enter_poll_loop(&inner, location),
            },
            _ => {
                let details = HttpError::from_metadata(&metadata, body);
                inner.finish(
                    OperationStatus::Failed,
                    Err(Error::unexpected_status(details)),
                    Some(metadata),
                );
            }
        }
    }

    fn enter_poll_loop(inner: &Arc<Self>, location: Url) {
        let mut state = inner.lock();
        if state.status.is_done() {
            // cancelled while the initial request was in flight
            return;
        }
        state.status = OperationStatus::Running;
        state.location = Some(location);
        Self::schedule_poll(inner, &mut state);
    }

    fn schedule_poll(inner: &Arc<Self>, state: &mut State<R>) {
        // at most one poll timer may be outstanding
        if let Some(prior) = state.pending.take() {
            prior.cancel();
        }
        let next = inner.clone();
        let work = Box::pin(async move {
            Inner::poll_once(next).await;
        });
        state.pending = Some(inner.scheduler.schedule(state.interval, work));
    }

    async fn poll_once(inner: Arc<Self>) {
        let location = {
            let mut state = inner.lock();
            if state.status != OperationStatus::Running {
                return;
            }
            // this timer fired, free the slot for the next one
            state.pending = None;
            match &state.location {
                None => return,
                Some(location) => location.clone(),
            }
        };
        let headers = match details::poll_headers(inner.client_id.as_deref()) {
            Err(e) => {
                inner.finish(OperationStatus::Failed, Err(e), None);
                return;
            }
            Ok(headers) => headers,
        };
        let response = match inner.transport.get(location, headers).await {
            Err(e) => {
                inner.finish(OperationStatus::Failed, Err(e), None);
                return;
            }
            Ok(response) => response,
        };
        let (metadata, body) = response.into_parts();
        match metadata.status().as_u16() {
            200 => {
                let result = details::decode_body::<R>(body.as_ref());
                let status = match &result {
                    Ok(_) => OperationStatus::Succeeded,
                    Err(_) => OperationStatus::Failed,
                };
                inner.finish(status, result, Some(metadata));
            }
            202 => {
                let mut state = inner.lock();
                if state.status != OperationStatus::Running {
                    // cancelled while the poll was in flight
                    return;
                }
                Self::schedule_poll(&inner, &mut state);
            }
            _ => {
                let details = HttpError::from_metadata(&metadata, body);
                inner.finish(
                    OperationStatus::Failed,
                    Err(Error::unexpected_status(details)),
                    Some(metadata),
                );
            }
        }
    }

    fn finish(&self, status: OperationStatus, result: Result<R>, metadata: Option<ResponseMetadata>) {
        let handler = {
            let mut state = self.lock();
            if state.status.is_done() {
                // terminal states are final, a late completion is discarded
                return;
            }
            state.status = status;
            if let Some(timer) = state.pending.take() {
                timer.cancel();
            }
            state.handler.take()
        };
        if let Some(handler) = handler {
            handler(result, metadata);
        }
    }
}
