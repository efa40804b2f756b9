use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ElectionId, Identity};

/// Phases of the election lifecycle.
///
/// A phase is never stored; it is derived fresh from the deadlines and a
/// single time reading on every call, so there is no stored status to go
/// stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Candidates may self-register.
    Registration,
    /// Ballots are accepted for registered candidates.
    Voting,
    /// The voting window has closed.
    Closed,
}

/// The three absolute deadlines of an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionTimes {
    /// End of the registration window.
    pub registration_end: DateTime<Utc>,
    /// End of the voting window. Always `registration_end + voting_period`.
    pub voting_end: DateTime<Utc>,
    /// Hard end of the election. Computed from its own offset, not from the
    /// other two deadlines.
    pub election_end: DateTime<Utc>,
}

impl ElectionTimes {
    /// Validate the requested periods and compute the deadlines relative to
    /// `now`.
    ///
    /// Both periods must strictly exceed `min_period`, and the voting window
    /// must close strictly before the hard end.
    pub fn schedule(
        now: DateTime<Utc>,
        min_period: Duration,
        registration_period: Duration,
        voting_period: Duration,
        end_offset: Duration,
    ) -> Result<Self> {
        // Both periods are held to the minimum in a single symmetric check.
        if registration_period <= min_period || voting_period <= min_period {
            return Err(Error::InvalidPeriod {
                minimum: min_period.num_seconds(),
            });
        }
        if registration_period + voting_period >= end_offset {
            return Err(Error::InvalidScheduling);
        }

        let registration_end = now + registration_period;
        Ok(Self {
            registration_end,
            voting_end: registration_end + voting_period,
            election_end: now + end_offset,
        })
    }
}

/// A registered candidate within one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Number of valid ballots cast for this candidate.
    pub vote_count: u64,
    /// Always true for present entries; presence in the candidate map is
    /// what "registered" means structurally.
    pub registered: bool,
}

impl Candidate {
    pub fn new() -> Self {
        Self {
            vote_count: 0,
            registered: true,
        }
    }
}

impl Default for Candidate {
    fn default() -> Self {
        Self::new()
    }
}

/// Core election record, as held in the registry and handed to the durable
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    /// Unique ID, assigned sequentially at creation and never reused.
    pub id: ElectionId,
    /// Identity that started the election. Recorded for audit; grants no
    /// special runtime privilege.
    pub initiator: Identity,
    /// The three deadlines.
    #[serde(flatten)]
    pub times: ElectionTimes,
    /// Registered candidates by identity.
    pub candidates: HashMap<Identity, Candidate>,
    /// Identities that have cast a ballot. Only ever grows.
    pub has_voted: HashSet<Identity>,
}

impl Election {
    /// Create a new election with no candidates and no ballots.
    pub fn new(id: ElectionId, initiator: Identity, times: ElectionTimes) -> Self {
        Self {
            id,
            initiator,
            times,
            candidates: HashMap::new(),
            has_voted: HashSet::new(),
        }
    }

    /// Pure phase derivation from a single time reading.
    pub fn phase_at(&self, now: DateTime<Utc>) -> Phase {
        if now < self.times.registration_end {
            Phase::Registration
        } else if now < self.times.voting_end {
            Phase::Voting
        } else {
            Phase::Closed
        }
    }

    /// Votes currently counted for `candidate`; 0 when absent.
    pub fn candidate_votes(&self, candidate: &str) -> u64 {
        self.candidates
            .get(candidate)
            .map(|c| c.vote_count)
            .unwrap_or(0)
    }

    /// Number of distinct voters who have cast a ballot.
    pub fn ballots_cast(&self) -> u64 {
        self.has_voted.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 4, 1, 12, 0, 0).unwrap()
    }

    fn min_period() -> Duration {
        Duration::seconds(20)
    }

    impl Election {
        pub fn example_at(now: DateTime<Utc>) -> Self {
            let times = ElectionTimes::schedule(
                now,
                min_period(),
                Duration::seconds(21),
                Duration::seconds(21),
                Duration::seconds(45),
            )
            .unwrap();
            Election::new(1, "initiator".to_string(), times)
        }
    }

    #[test]
    fn schedule_computes_exact_deadlines() {
        let now = start_time();
        let times = ElectionTimes::schedule(
            now,
            min_period(),
            Duration::seconds(21),
            Duration::seconds(21),
            Duration::seconds(45),
        )
        .unwrap();

        assert_eq!(times.registration_end, now + Duration::seconds(21));
        assert_eq!(times.voting_end, now + Duration::seconds(42));
        assert_eq!(times.election_end, now + Duration::seconds(45));
    }

    #[test]
    fn schedule_rejects_short_periods() {
        let now = start_time();
        // A period equal to the minimum is not enough; it must be exceeded.
        for (registration, voting) in [(20, 21), (21, 20), (15, 15)] {
            let result = ElectionTimes::schedule(
                now,
                min_period(),
                Duration::seconds(registration),
                Duration::seconds(voting),
                Duration::seconds(45),
            );
            assert_eq!(result, Err(Error::InvalidPeriod { minimum: 20 }));
        }
    }

    #[test]
    fn schedule_rejects_end_before_windows_close() {
        let now = start_time();
        // 21 + 30 = 51 >= 31: the hard end falls inside the voting window.
        let result = ElectionTimes::schedule(
            now,
            min_period(),
            Duration::seconds(21),
            Duration::seconds(30),
            Duration::seconds(31),
        );
        assert_eq!(result, Err(Error::InvalidScheduling));

        // The sum equalling the offset is also rejected; strictly less only.
        let result = ElectionTimes::schedule(
            now,
            min_period(),
            Duration::seconds(21),
            Duration::seconds(21),
            Duration::seconds(42),
        );
        assert_eq!(result, Err(Error::InvalidScheduling));
    }

    #[test]
    fn phase_boundaries_are_half_open() {
        let now = start_time();
        let election = Election::example_at(now);

        assert_eq!(election.phase_at(now), Phase::Registration);
        assert_eq!(
            election.phase_at(now + Duration::seconds(20)),
            Phase::Registration
        );
        // The registration end itself already belongs to the voting window.
        assert_eq!(
            election.phase_at(now + Duration::seconds(21)),
            Phase::Voting
        );
        assert_eq!(
            election.phase_at(now + Duration::seconds(41)),
            Phase::Voting
        );
        // The voting end itself is closed.
        assert_eq!(
            election.phase_at(now + Duration::seconds(42)),
            Phase::Closed
        );
        assert_eq!(
            election.phase_at(now + Duration::seconds(100)),
            Phase::Closed
        );
    }

    #[test]
    fn absent_candidate_counts_as_zero() {
        let mut election = Election::example_at(start_time());
        assert_eq!(election.candidate_votes("nobody"), 0);

        election
            .candidates
            .insert("candidate".to_string(), Candidate::new());
        assert_eq!(election.candidate_votes("candidate"), 0);
    }
}
