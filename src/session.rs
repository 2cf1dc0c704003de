use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, PrimitiveDateTime, Time};
use tracing::debug;

use crate::clock::SharedClock;
use crate::config::VoteConfig;
use crate::error::{Result, VoteError};

/// Per-place counts covering the full candidate set, zero-filled.
pub type Tally = BTreeMap<String, u32>;

/// Derived on every query from `created`, the start time, and the clock;
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Unborn,
    Open,
    ClosedAwaitingResults,
    ResultsVisible,
    Expired,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub key: String,
    pub state: SessionState,
    pub start_time: Option<OffsetDateTime>,
    pub voting_open: bool,
    pub votes: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tally: Option<Tally>,
}

/// One recurring voting period. Both windows are anchored to the calendar
/// date of `start_time`, so they are fixed permanently at creation.
#[derive(Debug)]
pub struct VoteSession {
    key: String,
    clock: SharedClock,
    config: Arc<VoteConfig>,
    created: bool,
    slot_time: Option<OffsetDateTime>,
    start_time: Option<OffsetDateTime>,
    votes: HashMap<String, String>,
}

impl VoteSession {
    pub fn new(key: impl Into<String>, clock: SharedClock, config: Arc<VoteConfig>) -> Self {
        Self {
            key: key.into(),
            clock,
            config,
            created: false,
            slot_time: None,
            start_time: None,
            votes: HashMap::new(),
        }
    }

    /// Succeeds at most once per session. The start time is snapshotted from
    /// the shared clock, not from `slot_utc`, so a skewed caller cannot shift
    /// the windows.
    pub fn create(&mut self, slot_utc: OffsetDateTime) -> Result<()> {
        if self.created {
            return Err(VoteError::AlreadyCreated);
        }

        let started = self.clock.now();
        self.slot_time = Some(slot_utc);
        self.start_time = Some(started);
        self.created = true;
        debug!(key = %self.key, "vote session created, start time {started}");
        Ok(())
    }

    pub fn vote(&mut self, user: &str, place: &str) -> Result<()> {
        self.check_ballot(place)?;
        if self.votes.contains_key(user) {
            return Err(VoteError::AlreadyVoted(user.to_string()));
        }

        self.votes.insert(user.to_string(), place.to_string());
        debug!(key = %self.key, user, place, "vote recorded");
        Ok(())
    }

    /// Re-voting for the current place is rejected, not treated as a no-op
    /// success.
    pub fn update_vote(&mut self, user: &str, new_place: &str) -> Result<()> {
        self.check_ballot(new_place)?;
        match self.votes.get(user) {
            None => Err(VoteError::NoExistingVote(user.to_string())),
            Some(current) if current == new_place => Err(VoteError::UnchangedPlace(
                user.to_string(),
                new_place.to_string(),
            )),
            Some(_) => {
                self.votes.insert(user.to_string(), new_place.to_string());
                debug!(key = %self.key, user, new_place, "vote updated");
                Ok(())
            }
        }
    }

    fn check_ballot(&self, place: &str) -> Result<()> {
        if !self.created {
            return Err(VoteError::NotCreated);
        }
        if !self.config.is_candidate(place) {
            return Err(VoteError::NotACandidate(place.to_string()));
        }
        if !self.is_open() {
            return Err(VoteError::VotingClosed);
        }
        Ok(())
    }

    pub fn can_vote(&self, user: &str) -> bool {
        !self.votes.contains_key(user) && self.is_open()
    }

    pub fn is_open(&self) -> bool {
        match self.start_time {
            Some(start) => self.open_at(self.clock.now(), start),
            None => false,
        }
    }

    /// Absent outside the results-visible window; otherwise one entry per
    /// candidate, with counts summing to the number of recorded votes.
    pub fn results(&self) -> Result<Tally> {
        match self.start_time {
            Some(start) if self.results_visible_at(self.clock.now(), start) => Ok(self.tally()),
            _ => Err(VoteError::ResultsNotVisible),
        }
    }

    pub fn state(&self) -> SessionState {
        let Some(start) = self.start_time else {
            return SessionState::Unborn;
        };
        let now = self.clock.now();

        if now > self.cutoff(start, self.config.voting_cutoff) {
            SessionState::Expired
        } else if self.results_visible_at(now, start) {
            SessionState::ResultsVisible
        } else if self.open_at(now, start) {
            SessionState::Open
        } else {
            SessionState::ClosedAwaitingResults
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            key: self.key.clone(),
            state: self.state(),
            start_time: self.start_time,
            voting_open: self.is_open(),
            votes: self.votes.clone(),
            tally: self.results().ok(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// `None` until `create` succeeds; fixed forever afterwards.
    pub fn start_time(&self) -> Option<OffsetDateTime> {
        self.start_time
    }

    pub fn slot_time(&self) -> Option<OffsetDateTime> {
        self.slot_time
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn voting_cutoff(&self) -> Option<OffsetDateTime> {
        self.start_time
            .map(|start| self.cutoff(start, self.config.voting_cutoff))
    }

    fn open_at(&self, now: OffsetDateTime, start: OffsetDateTime) -> bool {
        now >= start && now <= self.cutoff(start, self.config.voting_cutoff)
    }

    // Half-open on the left: results appear strictly after `results_open` and
    // stay up through the voting cutoff. The overlap with the voting window is
    // deliberate.
    fn results_visible_at(&self, now: OffsetDateTime, start: OffsetDateTime) -> bool {
        now > self.cutoff(start, self.config.results_open)
            && now <= self.cutoff(start, self.config.voting_cutoff)
    }

    fn cutoff(&self, start: OffsetDateTime, at: Time) -> OffsetDateTime {
        PrimitiveDateTime::new(start.date(), at).assume_utc()
    }

    fn tally(&self) -> Tally {
        let mut counts: Tally = self.config.places.iter().map(|p| (p.clone(), 0)).collect();
        for place in self.votes.values() {
            if let Some(count) = counts.get_mut(place) {
                *count += 1;
            }
        }
        counts
    }
}
