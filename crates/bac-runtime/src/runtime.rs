// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Event loop glue between a controller, tokio time and a transport.

use std::sync::Arc;

use bac_core::{
    AutocompleteController, EventOutcome, FetchRequest, FetchTicket, InputEvent,
    PresentationSurface, TimerId,
};
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::transport::Transport;

type LookupFuture = LocalBoxFuture<'static, (FetchTicket, Option<Value>)>;

/// Drives one controller on the current task.
///
/// Events go in through [`handle_event`](Self::handle_event); progress on the
/// debounce deadline and on in-flight lookups is made by awaiting
/// [`tick`](Self::tick), which is cancel-safe and can sit in a `select!`
/// next to the host's own event source.
pub struct AutocompleteRuntime<S: PresentationSurface> {
    controller: AutocompleteController<S>,
    transport: Arc<dyn Transport>,
    in_flight: FuturesUnordered<LookupFuture>,
    deadline: Option<(TimerId, Instant)>,
}

impl<S: PresentationSurface> AutocompleteRuntime<S> {
    pub fn new(controller: AutocompleteController<S>, transport: Arc<dyn Transport>) -> Self {
        let mut runtime = Self {
            controller,
            transport,
            in_flight: FuturesUnordered::new(),
            deadline: None,
        };
        runtime.pump();
        runtime
    }

    pub fn controller(&self) -> &AutocompleteController<S> {
        &self.controller
    }

    /// Direct access to the controller. Call [`sync`](Self::sync) after
    /// changing anything that may arm a timer or queue a lookup.
    pub fn controller_mut(&mut self) -> &mut AutocompleteController<S> {
        &mut self.controller
    }

    pub fn into_controller(self) -> AutocompleteController<S> {
        self.controller
    }

    pub fn handle_event(&mut self, event: InputEvent) -> EventOutcome {
        let outcome = self.controller.handle_event(event);
        self.pump();
        outcome
    }

    /// Pick up timer and lookup changes made through `controller_mut`.
    pub fn sync(&mut self) {
        self.pump();
    }

    /// Nothing is scheduled and nothing is in flight.
    pub fn is_idle(&self) -> bool {
        self.deadline.is_none() && self.in_flight.is_empty()
    }

    /// Number of lookups currently being performed by the transport.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Wait for the debounce deadline or the next lookup to complete, and
    /// apply it. Returns `false` immediately when idle.
    pub async fn tick(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }

        let deadline = self.deadline;
        let expiry = async move {
            match deadline {
                Some((_, at)) => sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = expiry => {
                if let Some((id, _)) = deadline {
                    self.deadline = None;
                    self.controller.fire_timer(id);
                }
            }
            Some((ticket, payload)) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                self.controller.settle(ticket, payload);
            }
        }
        self.pump();
        true
    }

    pub async fn run_until_idle(&mut self) {
        while self.tick().await {}
    }

    /// Feed events from `events` until the sender side is dropped, then hand
    /// the controller back. Unfinished lookups are abandoned.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<InputEvent>) -> AutocompleteController<S> {
        loop {
            let idle = self.is_idle();
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle_event(event);
                    }
                    None => break,
                },
                _ = self.tick(), if !idle => {}
            }
        }
        if !self.in_flight.is_empty() {
            debug!(abandoned = self.in_flight.len(), "event source closed with lookups in flight");
        }
        self.controller
    }

    /// Mirror the controller's timer into a deadline and start queued lookups.
    fn pump(&mut self) {
        self.deadline = match (self.controller.armed_timer(), self.deadline) {
            (Some(timer), Some((id, at))) if timer.id() == id => Some((id, at)),
            (Some(timer), _) => Some((timer.id(), Instant::now() + timer.delay())),
            (None, _) => None,
        };

        for request in self.controller.take_requests() {
            self.in_flight.push(lookup(Arc::clone(&self.transport), request));
        }
    }
}

fn lookup(transport: Arc<dyn Transport>, request: FetchRequest) -> LookupFuture {
    let FetchRequest { ticket, url, timeout } = request;
    async move {
        let payload = match tokio::time::timeout(timeout, transport.fetch(&url, timeout)).await {
            Ok(payload) => payload,
            Err(_) => {
                warn!(%url, timeout_ms = timeout.as_millis() as u64, "remote lookup timed out");
                None
            }
        };
        (ticket, payload)
    }
    .boxed_local()
}
