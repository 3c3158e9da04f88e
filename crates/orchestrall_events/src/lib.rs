//! Push-based event delivery from the Orchestrall platform.
//!
//! The platform pushes JSON frames over a persistent WebSocket at
//! `/v2/events`, parallel to REST traffic.  [`EventClient`] opens the
//! connection and [`EventStream::run`] is the dispatch loop: each frame
//! becomes a [`StreamEvent`](orchestrall_core::StreamEvent) and is handed
//! to the handlers registered in the [`SubscriptionRegistry`] for its type.
//! Unknown event types are ignored, unparseable frames are reported and
//! dropped, and the connection never reconnects on its own.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod registry;
mod state;

pub use client::{EventClient, EventStream, EventStreamHandle};
pub use registry::{Subscription, SubscriptionRegistry};
pub use state::ConnectionState;
