use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::event::{Event, EventLog};
use crate::model::{Candidate, Counter, Election, ElectionId, ElectionTimes, Identity, Phase};

/// The durable contents of the registry: every election ever started plus
/// the ID allocator.
///
/// This is the container the embedding application checkpoints to its
/// durable store and injects back on restart. Elections are append-only;
/// nothing in here is ever deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    /// All elections, by ID.
    pub elections: BTreeMap<ElectionId, Election>,
    /// Allocator for the next election ID.
    pub counter: Counter,
}

impl RegistryState {
    /// An empty registry: no elections, IDs start at 1.
    pub fn new() -> Self {
        Self {
            elections: BTreeMap::new(),
            counter: Counter::new(1),
        }
    }
}

impl Default for RegistryState {
    fn default() -> Self {
        Self::new()
    }
}

/// The election lifecycle registry.
///
/// All operations are synchronous and take `&mut self`; the embedding
/// environment is assumed to serialize calls, so no locking happens here.
/// Every mutating call validates all of its preconditions before touching
/// any state, so a failed call leaves the registry exactly as it found it.
#[derive(Debug)]
pub struct ElectionRegistry<C = SystemClock> {
    config: Config,
    clock: C,
    state: RegistryState,
    events: EventLog,
}

impl ElectionRegistry<SystemClock> {
    /// A fresh registry on the system clock.
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ElectionRegistry<C> {
    /// A fresh registry on the given clock.
    pub fn with_clock(config: Config, clock: C) -> Self {
        Self::with_state(config, clock, RegistryState::new())
    }

    /// Resume from previously persisted state.
    pub fn with_state(config: Config, clock: C, state: RegistryState) -> Self {
        Self {
            config,
            clock,
            state,
            events: EventLog::new(),
        }
    }

    /// The durable state, e.g. for checkpointing after a batch of calls.
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Hand the durable state back, consuming the registry.
    pub fn into_state(self) -> RegistryState {
        self.state
    }

    /// Events published by successful calls since the last drain.
    pub fn events(&self) -> &[Event] {
        self.events.as_slice()
    }

    /// Take ownership of all pending events.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Start a new election with the caller as initiator.
    ///
    /// The registration window runs from now until
    /// `now + registration_period`, the voting window from there until
    /// `registration_end + voting_period`, and the election hard-ends at
    /// `now + end_offset`. Returns the new election's ID.
    pub fn start_election(
        &mut self,
        initiator: Identity,
        registration_period: Duration,
        voting_period: Duration,
        end_offset: Duration,
    ) -> Result<ElectionId> {
        let now = self.clock.now();

        // Validate the periods and compute the three deadlines.
        let times = ElectionTimes::schedule(
            now,
            self.config.min_period(),
            registration_period,
            voting_period,
            end_offset,
        )?;

        // Allocate the ID only once validation has passed; IDs are never
        // burned by failed calls.
        let id = self.state.counter.next();
        self.state
            .elections
            .insert(id, Election::new(id, initiator.clone(), times.clone()));

        info!("election {id} started by {initiator}");
        self.events.publish(Event::ElectionStarted {
            id,
            initiator,
            registration_end: times.registration_end,
            voting_end: times.voting_end,
            election_end: times.election_end,
        });
        Ok(id)
    }

    /// Register the caller as a candidate in the given election.
    pub fn register_candidate(&mut self, election_id: ElectionId, caller: Identity) -> Result<()> {
        let now = self.clock.now();

        let election = self
            .state
            .elections
            .get_mut(&election_id)
            .ok_or(Error::ElectionNotFound(election_id))?;

        // Registration is only open during the first window.
        if election.phase_at(now) != Phase::Registration {
            return Err(Error::RegistrationClosed(election_id));
        }
        if election.candidates.contains_key(&caller) {
            return Err(Error::AlreadyRegistered {
                election: election_id,
                candidate: caller,
            });
        }

        election.candidates.insert(caller.clone(), Candidate::new());

        info!("candidate {caller} registered in election {election_id}");
        self.events.publish(Event::CandidateRegistered {
            election_id,
            candidate: caller,
        });
        Ok(())
    }

    /// Cast the voter's single ballot for a registered candidate.
    ///
    /// Self-voting and initiator-voting are deliberately permitted; the only
    /// voter-side restriction is one ballot per identity per election.
    pub fn cast_vote(
        &mut self,
        election_id: ElectionId,
        voter: Identity,
        candidate: Identity,
    ) -> Result<()> {
        let now = self.clock.now();

        let election = self
            .state
            .elections
            .get_mut(&election_id)
            .ok_or(Error::ElectionNotFound(election_id))?;

        // Precondition order is fixed: window, then target, then voter.
        if election.phase_at(now) != Phase::Voting {
            return Err(Error::VotingNotOpen(election_id));
        }
        let Some(tally) = election.candidates.get_mut(&candidate) else {
            return Err(Error::CandidateNotRegistered {
                election: election_id,
                candidate,
            });
        };
        if election.has_voted.contains(&voter) {
            return Err(Error::AlreadyVoted {
                election: election_id,
                voter,
            });
        }

        // All checks passed; commit both mutations together.
        tally.vote_count += 1;
        election.has_voted.insert(voter.clone());

        info!("{voter} voted in election {election_id}");
        self.events.publish(Event::Voted {
            voter,
            election_id,
            candidate,
        });
        Ok(())
    }

    /// Whether a record for this election exists.
    ///
    /// Deliberately the literal "exists" semantic: a started election stays
    /// `true` even after its end time has passed.
    pub fn election_status(&self, election_id: ElectionId) -> Result<bool> {
        self.election(election_id).map(|_| true)
    }

    /// End of the registration window.
    pub fn registration_end_time(&self, election_id: ElectionId) -> Result<DateTime<Utc>> {
        Ok(self.election(election_id)?.times.registration_end)
    }

    /// End of the voting window.
    pub fn voting_end_time(&self, election_id: ElectionId) -> Result<DateTime<Utc>> {
        Ok(self.election(election_id)?.times.voting_end)
    }

    /// Hard end of the election.
    pub fn election_end_time(&self, election_id: ElectionId) -> Result<DateTime<Utc>> {
        Ok(self.election(election_id)?.times.election_end)
    }

    /// Identity that started the election.
    pub fn election_initiator(&self, election_id: ElectionId) -> Result<Identity> {
        Ok(self.election(election_id)?.initiator.clone())
    }

    /// Current vote count for a candidate; 0 if the candidate never
    /// registered.
    pub fn candidate_votes(&self, election_id: ElectionId, candidate: &str) -> Result<u64> {
        Ok(self.election(election_id)?.candidate_votes(candidate))
    }

    /// Number of registered candidates.
    pub fn candidate_count(&self, election_id: ElectionId) -> Result<usize> {
        Ok(self.election(election_id)?.candidates.len())
    }

    /// Number of distinct voters who have cast a ballot.
    pub fn ballots_cast(&self, election_id: ElectionId) -> Result<u64> {
        Ok(self.election(election_id)?.ballots_cast())
    }

    /// The election's current phase, derived from the clock.
    pub fn phase(&self, election_id: ElectionId) -> Result<Phase> {
        let now = self.clock.now();
        Ok(self.election(election_id)?.phase_at(now))
    }

    fn election(&self, election_id: ElectionId) -> Result<&Election> {
        self.state
            .elections
            .get(&election_id)
            .ok_or(Error::ElectionNotFound(election_id))
    }
}
