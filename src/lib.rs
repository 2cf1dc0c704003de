pub mod clock;
pub mod config;
pub mod error;
pub mod registry;
pub mod session;
pub mod slot;
pub mod sweeper;

pub use clock::{is_clock_principal, ClockService, SharedClock, CLOCK_PRINCIPAL};
pub use config::{ConfigError, VoteConfig, LUNCH_PLACES, RESULTS_OPEN, VOTING_CUTOFF};
pub use error::VoteError;
pub use registry::{SessionHandle, SessionRegistry};
pub use session::{SessionState, SessionStatus, Tally, VoteSession};
pub use slot::SlotGranularity;
