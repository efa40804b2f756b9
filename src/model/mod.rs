mod counter;
mod election;

pub use counter::Counter;
pub use election::{Candidate, Election, ElectionTimes, Phase};

/// Our election IDs are integers.
pub type ElectionId = u32;
/// Caller identities (initiators, candidates, voters) are opaque address
/// strings, assumed unique and authenticated by the calling boundary.
pub type Identity = String;
