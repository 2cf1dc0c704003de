use std::collections::HashSet;
use thiserror::Error;
use time::{macros::time, Time};

use crate::slot::SlotGranularity;

pub const LUNCH_PLACES: [&str; 5] = ["PizzaHut", "McDonalds", "BurgerKing", "TacoBell", "Happy"];
pub const VOTING_CUTOFF: Time = time!(13:30);
pub const RESULTS_OPEN: Time = time!(11:30);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Candidate list is empty")]
    NoPlaces,
    #[error("Duplicate candidate: {0}")]
    DuplicatePlace(String),
    #[error("Empty candidate name")]
    EmptyPlace,
    #[error("Results must open before the voting cutoff")]
    WindowOrder,
}

#[derive(Debug, Clone)]
pub struct VoteConfig {
    pub places: Vec<String>,
    pub voting_cutoff: Time,
    pub results_open: Time,
    pub granularity: SlotGranularity,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            places: LUNCH_PLACES.iter().map(|p| p.to_string()).collect(),
            voting_cutoff: VOTING_CUTOFF,
            results_open: RESULTS_OPEN,
            granularity: SlotGranularity::Daily,
        }
    }
}

impl VoteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.places.is_empty() {
            return Err(ConfigError::NoPlaces);
        }
        if self.places.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::EmptyPlace);
        }

        let mut seen = HashSet::new();
        for place in &self.places {
            if !seen.insert(place.to_lowercase()) {
                return Err(ConfigError::DuplicatePlace(place.clone()));
            }
        }

        if self.results_open >= self.voting_cutoff {
            return Err(ConfigError::WindowOrder);
        }

        Ok(())
    }

    pub fn is_candidate(&self, place: &str) -> bool {
        self.places.iter().any(|p| p == place)
    }
}
