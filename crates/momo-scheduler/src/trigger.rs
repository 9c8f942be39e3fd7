use chrono::{DateTime, Datelike, Duration, TimeZone};

/// The fixed daily trigger time (local wall clock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub hour: u32,
    pub minute: u32,
}

impl Trigger {
    /// Build a trigger, clamping out-of-range values to a valid wall-clock
    /// time instead of failing.
    pub fn new(hour: u32, minute: u32) -> Self {
        Self {
            hour: hour.min(23),
            minute: minute.min(59),
        }
    }

    /// Duration from `now` until the next firing of this trigger.
    ///
    /// The result is always in (0, 24h]: today's instant is used when it is
    /// still strictly in the future, otherwise tomorrow's. `now` exactly on
    /// the trigger rolls to tomorrow (24h) rather than firing twice.
    pub fn wait_from<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Duration {
        let candidate = match now
            .timezone()
            .with_ymd_and_hms(now.year(), now.month(), now.day(), self.hour, self.minute, 0)
            .single()
        {
            Some(c) => c,
            // DST gap or ambiguity: wait a full day and recompute then.
            None => return Duration::days(1),
        };

        if candidate > now {
            candidate - now
        } else {
            candidate + Duration::days(1) - now
        }
    }
}
