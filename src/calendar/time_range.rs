use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use chrono::NaiveTime;

use crate::prelude::*;

/// Daily time-of-day range, `start` inclusive, `end` exclusive.
///
/// The range wraps midnight whenever `end <= start`, e.g. `22:00-06:00`;
/// equal bounds cover the whole day.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct TimeOfDayRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeOfDayRange {
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn wraps(self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub fn contains(self, time: NaiveTime) -> bool {
        if self.wraps() {
            (time >= self.start) || (time < self.end)
        } else {
            (self.start <= time) && (time < self.end)
        }
    }
}

impl Display for TimeOfDayRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

impl Debug for TimeOfDayRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for TimeOfDayRange {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (start, end) =
            value.split_once('-').with_context(|| format!("`{value}` is not a time range"))?;
        Ok(Self {
            start: NaiveTime::parse_from_str(start.trim(), "%H:%M")?,
            end: NaiveTime::parse_from_str(end.trim(), "%H:%M")?,
        })
    }
}
