//! Wall-clock time model.
//!
//! Time is a Unix timestamp in whole seconds.  The traffic rule table only
//! needs the hour of day, which is derived arithmetically — no datetime
//! library required (rule windows are defined in UTC; callers feeding local
//! time simply pre-shift the timestamp).

use std::fmt;

/// A Unix timestamp in seconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    /// Timestamp at `hour`:00 on day zero.  Test and rule-table helper.
    #[inline]
    pub fn at_hour(hour: u32) -> Timestamp {
        Timestamp(hour as i64 * 3_600)
    }

    /// Hour of day in `0..24`.  Correct for pre-epoch timestamps too.
    #[inline]
    pub fn hour_of_day(self) -> u32 {
        (self.0.rem_euclid(86_400) / 3_600) as u32
    }

    /// The timestamp `secs` seconds later.
    #[inline]
    pub fn offset(self, secs: i64) -> Timestamp {
        Timestamp(self.0 + secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = self.0.div_euclid(86_400);
        let rem = self.0.rem_euclid(86_400);
        write!(f, "day {} {:02}:{:02}", day, rem / 3_600, (rem % 3_600) / 60)
    }
}
