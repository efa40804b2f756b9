//! Core lifecycle registry for timed self-registration elections.
//!
//! An initiator opens an election with three sequential deadlines: candidates
//! self-register until the registration end, eligible voters cast a single
//! ballot for a registered candidate until the voting end, and the election
//! end is a hard close. Phases are never stored; they are derived from the
//! deadlines and the current time on every call.
//!
//! The registry is deliberately oblivious to transport and storage: callers
//! are assumed to arrive through an already-authenticated boundary, and the
//! [`registry::RegistryState`] container can be handed to any durable store
//! for checkpointing.

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use event::{Event, EventLog};
pub use model::{Candidate, Election, ElectionId, ElectionTimes, Identity, Phase};
pub use registry::{ElectionRegistry, RegistryState};
