use std::sync::{Arc, Mutex, PoisonError};
use time::OffsetDateTime;
use tracing::info;

/// Reserved principal name the transport layer must require for `set_now`.
pub const CLOCK_PRINCIPAL: &str = "clock";

pub fn is_clock_principal(user: &str) -> bool {
    user.eq_ignore_ascii_case(CLOCK_PRINCIPAL)
}

/// Process-wide time source. Returns the wall clock until an override is set;
/// the override is last-write-wins and visible to every holder of the handle.
#[derive(Debug, Default)]
pub struct ClockService {
    override_time: Mutex<Option<OffsetDateTime>>,
}

pub type SharedClock = Arc<ClockService>;

impl ClockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedClock {
        Arc::new(Self::new())
    }

    pub fn now(&self) -> OffsetDateTime {
        self.override_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unwrap_or_else(OffsetDateTime::now_utc)
    }

    pub fn set_now(&self, t: OffsetDateTime) {
        info!("clock override set to {t}");
        *self
            .override_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(t);
    }

    pub fn is_overridden(&self) -> bool {
        self.override_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
