// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Debounce timing and in-flight remote lookups.
//!
//! The coordinator never waits on anything itself. Arming the debounce timer
//! records a [`DebounceTimer`] that the host turns into a real deadline, and
//! dispatching a lookup queues a [`FetchRequest`] that the host runs. Each
//! request carries a single-use [`FetchTicket`] which must come back through
//! [`FetchCoordinator::settle`] exactly once, whatever the outcome.
//!
//! Cancellation is logical only: re-arming replaces the timer id so a stale
//! expiry is ignored, and a response for a query the user has moved past is
//! still cached but never forces its results onto the display.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::cache::ResultCache;
use crate::query::Query;
use crate::suggestion::Suggestion;

/// Identity of one arming of the debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// The currently armed debounce timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceTimer {
    id: TimerId,
    query: Query,
    delay: Duration,
}

impl DebounceTimer {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Single-shot completion handle for a dispatched lookup.
///
/// Not `Clone`: settling consumes it, so a lookup cannot be settled twice.
#[must_use = "every dispatched lookup must be settled, even on failure"]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    id: u64,
    query: Query,
}

impl FetchTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

/// A remote lookup waiting to be performed by the host.
#[derive(Debug)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub url: String,
    pub timeout: Duration,
}

#[derive(Debug)]
struct PendingFetch {
    ticket_id: u64,
    query: Query,
    started: Instant,
}

/// Outcome of [`FetchCoordinator::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The query is already cached or already being looked up.
    Suppressed,
    /// A request was queued. `first_active` is set when it is the only lookup
    /// in flight, i.e. the fetching indicator should turn on.
    Started { first_active: bool },
}

/// Outcome of [`FetchCoordinator::settle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The ticket did not belong to a pending lookup of this coordinator.
    Unknown,
    /// Results were cached. `now_idle` is set when no lookups remain, i.e. the
    /// fetching indicator should turn off.
    Settled { query: Query, now_idle: bool },
}

#[derive(Debug)]
pub struct FetchCoordinator {
    delay: Duration,
    timeout: Duration,
    timer: Option<DebounceTimer>,
    pending: Vec<PendingFetch>,
    requests: VecDeque<FetchRequest>,
    next_timer_id: u64,
    next_ticket_id: u64,
}

impl FetchCoordinator {
    pub fn new(delay: Duration, timeout: Duration) -> Self {
        Self {
            delay,
            timeout,
            timer: None,
            pending: Vec::new(),
            requests: VecDeque::new(),
            next_timer_id: 0,
            next_ticket_id: 0,
        }
    }

    /// Arm the debounce timer for `query`, replacing any timer still armed.
    pub fn schedule(&mut self, query: Query) -> TimerId {
        self.cancel_timer();
        self.next_timer_id += 1;
        let id = TimerId(self.next_timer_id);
        trace!(%query, delay_ms = self.delay.as_millis() as u64, "debounce timer armed");
        self.timer = Some(DebounceTimer {
            id,
            query,
            delay: self.delay,
        });
        id
    }

    /// Disarm the debounce timer. Returns the id that will now be ignored.
    pub fn cancel_timer(&mut self) -> Option<TimerId> {
        self.timer.take().map(|timer| timer.id)
    }

    pub fn armed_timer(&self) -> Option<&DebounceTimer> {
        self.timer.as_ref()
    }

    /// Consume an expiry. Only the currently armed id yields its query.
    pub fn fire(&mut self, id: TimerId) -> Option<Query> {
        match &self.timer {
            Some(timer) if timer.id == id => self.timer.take().map(|timer| timer.query),
            _ => {
                trace!(?id, "ignoring stale debounce expiry");
                None
            }
        }
    }

    /// Queue a lookup for `query` unless it is cached or already in flight.
    pub fn dispatch(
        &mut self,
        query: Query,
        cache: &ResultCache,
        build_url: impl FnOnce(&Query) -> String,
    ) -> Dispatch {
        if cache.contains(query.as_str()) || self.is_pending(query.as_str()) {
            trace!(%query, "lookup suppressed, already cached or in flight");
            return Dispatch::Suppressed;
        }

        let first_active = self.pending.is_empty();
        self.next_ticket_id += 1;
        let ticket_id = self.next_ticket_id;
        let url = build_url(&query);
        debug!(%query, %url, ticket = ticket_id, "dispatching remote lookup");

        self.pending.push(PendingFetch {
            ticket_id,
            query: query.clone(),
            started: Instant::now(),
        });
        self.requests.push_back(FetchRequest {
            ticket: FetchTicket {
                id: ticket_id,
                query,
            },
            url,
            timeout: self.timeout,
        });
        Dispatch::Started { first_active }
    }

    /// Cache the outcome of a lookup and retire its pending entry.
    ///
    /// Success, failure and timeout all arrive here; the latter two simply
    /// carry an empty list.
    pub fn settle(
        &mut self,
        ticket: FetchTicket,
        results: Vec<Suggestion>,
        cache: &mut ResultCache,
    ) -> Settlement {
        let Some(position) = self.pending.iter().position(|p| p.ticket_id == ticket.id) else {
            warn!(ticket = ticket.id, query = %ticket.query, "settled a lookup that was not pending");
            return Settlement::Unknown;
        };
        let pending = self.pending.remove(position);
        debug!(
            query = %pending.query,
            results = results.len(),
            elapsed_ms = pending.started.elapsed().as_millis() as u64,
            "remote lookup settled"
        );

        cache.put(pending.query.clone(), results);
        Settlement::Settled {
            query: pending.query,
            now_idle: self.pending.is_empty(),
        }
    }

    pub fn is_pending(&self, query: &str) -> bool {
        self.pending.iter().any(|p| p.query.as_str() == query)
    }

    /// Number of lookups dispatched but not yet settled.
    pub fn active_count(&self) -> usize {
        self.pending.len()
    }

    /// Hand queued requests to the host.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        self.requests.drain(..).collect()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> FetchCoordinator {
        FetchCoordinator::new(Duration::from_millis(350), Duration::from_secs(10))
    }

    fn url(query: &Query) -> String {
        format!("/colors?q={query}")
    }

    #[test]
    fn rescheduling_before_expiry_dispatches_once() {
        let mut fetch = coordinator();
        let cache = ResultCache::new(256);

        let first = fetch.schedule(Query::new("red"));
        let second = fetch.schedule(Query::new("red"));
        assert_ne!(first, second);

        assert_eq!(fetch.fire(first), None, "stale expiry must be ignored");
        let query = fetch.fire(second).expect("armed expiry yields its query");
        assert_eq!(fetch.dispatch(query, &cache, url), Dispatch::Started { first_active: true });

        let requests = fetch.take_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "/colors?q=red");
        assert_eq!(requests[0].timeout, Duration::from_secs(10));
        let _ = fetch.settle(
            requests.into_iter().next().map(|r| r.ticket).expect("request"),
            Vec::new(),
            &mut ResultCache::new(0),
        );
    }

    #[test]
    fn in_flight_and_cached_queries_are_suppressed() {
        let mut fetch = coordinator();
        let mut cache = ResultCache::new(256);
        cache.put(Query::new("blue"), vec![Suggestion::titled("Blue")]);

        assert_eq!(fetch.dispatch(Query::new("blue"), &cache, url), Dispatch::Suppressed);
        assert_eq!(
            fetch.dispatch(Query::new("red"), &cache, url),
            Dispatch::Started { first_active: true }
        );
        assert_eq!(fetch.dispatch(Query::new("red"), &cache, url), Dispatch::Suppressed);
        assert_eq!(fetch.take_requests().len(), 1);
        assert_eq!(fetch.active_count(), 1);
    }

    #[test]
    fn indicator_transitions_follow_active_count() {
        let mut fetch = coordinator();
        let mut cache = ResultCache::new(256);

        assert_eq!(
            fetch.dispatch(Query::new("re"), &cache, url),
            Dispatch::Started { first_active: true }
        );
        assert_eq!(
            fetch.dispatch(Query::new("red"), &cache, url),
            Dispatch::Started { first_active: false }
        );

        let mut requests = fetch.take_requests().into_iter();
        let re = requests.next().expect("first request").ticket;
        let red = requests.next().expect("second request").ticket;

        // Completion order is independent of dispatch order.
        assert_eq!(
            fetch.settle(red, vec![Suggestion::titled("Red")], &mut cache),
            Settlement::Settled {
                query: Query::new("red"),
                now_idle: false
            }
        );
        assert_eq!(
            fetch.settle(re, Vec::new(), &mut cache),
            Settlement::Settled {
                query: Query::new("re"),
                now_idle: true
            }
        );
        assert!(cache.contains("re"));
        assert!(cache.contains("red"));
        assert_eq!(fetch.active_count(), 0);
    }

    #[test]
    fn foreign_ticket_is_not_cached() {
        let mut other = coordinator();
        let mut cache = ResultCache::new(256);
        assert!(matches!(
            other.dispatch(Query::new("red"), &cache, url),
            Dispatch::Started { .. }
        ));
        let ticket = other.take_requests().remove(0).ticket;

        let mut fetch = coordinator();
        assert_eq!(fetch.settle(ticket, Vec::new(), &mut cache), Settlement::Unknown);
        assert!(!cache.contains("red"));
    }

    #[test]
    fn cancel_disarms_timer() {
        let mut fetch = coordinator();
        let id = fetch.schedule(Query::new("red"));
        assert_eq!(fetch.armed_timer().map(DebounceTimer::id), Some(id));
        assert_eq!(fetch.cancel_timer(), Some(id));
        assert!(fetch.armed_timer().is_none());
        assert_eq!(fetch.fire(id), None);
    }
}
