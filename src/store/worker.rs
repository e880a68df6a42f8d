//! Background store worker.
//!
//! Store calls run on a dedicated thread so that the event loop never blocks
//! on I/O. Requests go in over one channel, replies come back over another
//! and are drained by the event loop between input events.

use super::{Dispatch, ItemStore, StoreReply, StoreRequest, Ticket};
use crate::model::StoreError;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

type Reply = (Ticket, Result<StoreReply, StoreError>);

/// [`Dispatch`] implementation backed by a thread that owns the store.
pub struct StoreWorker {
    requests: Option<Sender<(Ticket, StoreRequest)>>,
    replies: Receiver<Reply>,
    /// Replies synthesized locally when the worker is gone.
    undeliverable: VecDeque<Reply>,
    handle: Option<JoinHandle<()>>,
}

impl StoreWorker {
    /// Move `store` onto a new worker thread.
    ///
    /// `latency` delays every call, to exercise slow-store behavior by hand.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the thread cannot be spawned.
    pub fn spawn<S>(mut store: S, latency: Duration) -> Result<Self, StoreError>
    where
        S: ItemStore + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<(Ticket, StoreRequest)>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();

        let handle = thread::Builder::new()
            .name("regroup-store".to_string())
            .spawn(move || {
                for (ticket, request) in request_rx {
                    if !latency.is_zero() {
                        thread::sleep(latency);
                    }
                    let reply = store.execute(&request);
                    debug!(ticket, request = request.label(), ok = reply.is_ok(), "Store call finished");
                    if reply_tx.send((ticket, reply)).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| StoreError::unavailable(format!("cannot start store worker: {e}")))?;

        Ok(Self {
            requests: Some(request_tx),
            replies: reply_rx,
            undeliverable: VecDeque::new(),
            handle: Some(handle),
        })
    }

    /// Block up to `timeout` for the next reply.
    pub fn wait_reply(&mut self, timeout: Duration) -> Option<Reply> {
        if let Some(reply) = self.undeliverable.pop_front() {
            return Some(reply);
        }
        match self.replies.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Dispatch for StoreWorker {
    fn dispatch(&mut self, ticket: Ticket, request: StoreRequest) {
        let sent = self
            .requests
            .as_ref()
            .is_some_and(|tx| tx.send((ticket, request)).is_ok());
        if !sent {
            warn!(ticket, "Store worker is not running");
            self.undeliverable
                .push_back((ticket, Err(StoreError::unavailable("store worker stopped"))));
        }
    }

    fn poll_reply(&mut self) -> Option<Reply> {
        self.undeliverable
            .pop_front()
            .or_else(|| self.replies.try_recv().ok())
    }
}

impl Drop for StoreWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Store worker panicked");
            }
        }
    }
}
