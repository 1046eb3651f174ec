// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Tokio host for [`bac_core::AutocompleteController`].
//!
//! The controller is synchronous and performs no IO. This crate turns its
//! armed debounce timer into a tokio deadline and runs its queued remote
//! lookups through a [`Transport`], feeding both back in as they complete.

pub mod runtime;
pub mod transport;

pub use runtime::AutocompleteRuntime;
pub use transport::{HttpTransport, Transport, TransportError};

#[cfg(test)]
pub use transport::MockTransport;
