use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, Time, UtcOffset};

pub const SLOT_ROUND_MINUTES: u8 = 5;

/// How clock readings map onto recurring voting periods. The derived key is
/// the session's identity: any client deriving it from the same instant must
/// get the same string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotGranularity {
    Daily,
    FiveMinute,
}

impl SlotGranularity {
    /// `YYYY-MM-DD` for daily slots, `YYYY-MM-DDTHH:mm` for 5-minute slots,
    /// always in UTC.
    pub fn key_for(self, now: OffsetDateTime) -> String {
        let slot = self.truncate(now);
        match self {
            SlotGranularity::Daily => format!(
                "{:04}-{:02}-{:02}",
                slot.year(),
                u8::from(slot.month()),
                slot.day()
            ),
            SlotGranularity::FiveMinute => format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}",
                slot.year(),
                u8::from(slot.month()),
                slot.day(),
                slot.hour(),
                slot.minute()
            ),
        }
    }

    /// Nominal instant of the slot containing `now`: midnight for daily,
    /// the floored 5-minute boundary otherwise.
    pub fn truncate(self, now: OffsetDateTime) -> OffsetDateTime {
        let utc = now.to_offset(UtcOffset::UTC);
        match self {
            SlotGranularity::Daily => utc.replace_time(Time::MIDNIGHT),
            SlotGranularity::FiveMinute => {
                let minute = utc.minute() / SLOT_ROUND_MINUTES * SLOT_ROUND_MINUTES;
                let rounded = Time::from_hms(utc.hour(), minute, 0)
                    .expect("floored minute stays in range");
                utc.replace_time(rounded)
            }
        }
    }
}
