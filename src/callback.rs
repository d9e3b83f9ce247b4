//! Bridge between callback-style producers and future-style consumers.
//!
//! [`create_promise_callback`] hands back a callback half and a future
//! half. The callback settles the future exactly once, on its first
//! invocation; later invocations are ignored and report non-acceptance.
//!
//! ```rust
//! use quarry_query::create_promise_callback;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (callback, promise) = create_promise_callback::<u32>();
//! assert!(callback.resolve(7));
//! assert!(!callback.resolve(9)); // already settled
//! assert_eq!(promise.await.unwrap(), 7);
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::{QueryError, QueryResult};

/// Create a linked callback/future pair.
pub fn create_promise_callback<T>() -> (PromiseCallback<T>, Promise<T>) {
    let (sender, receiver) = oneshot::channel();
    (
        PromiseCallback {
            sender: Arc::new(Mutex::new(Some(sender))),
        },
        Promise { receiver },
    )
}

/// The callback half: settles its [`Promise`] on first invocation.
///
/// Cloneable so it can be handed to several completion paths; whichever
/// fires first wins.
pub struct PromiseCallback<T> {
    sender: Arc<Mutex<Option<oneshot::Sender<QueryResult<T>>>>>,
}

impl<T> Clone for PromiseCallback<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T> PromiseCallback<T> {
    /// Settle with an explicit result. Returns whether this invocation
    /// was the one that settled the promise.
    pub fn settle(&self, result: QueryResult<T>) -> bool {
        match self.sender.lock().take() {
            Some(sender) => sender.send(result).is_ok(),
            None => false,
        }
    }

    /// Settle successfully.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settle with an error.
    pub fn reject(&self, error: QueryError) -> bool {
        self.settle(Err(error))
    }

    /// Whether the promise has already been settled through this
    /// callback.
    pub fn is_settled(&self) -> bool {
        self.sender.lock().is_none()
    }
}

/// The future half of a callback/future pair.
///
/// Resolves to whatever the callback settled with; if every callback
/// clone is dropped unsettled, resolves to an internal error.
pub struct Promise<T> {
    receiver: oneshot::Receiver<QueryResult<T>>,
}

impl<T> Future for Promise<T> {
    type Output = QueryResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(QueryError::internal(
                "callback dropped before settling its promise",
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}
