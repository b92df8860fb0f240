//! Calendar and time-of-day classification.
//!
//! Every tariff calculator composes the functions here instead of carrying
//! its own calendar conditionals, so the period semantics stay identical
//! across variants.

pub mod time_range;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

pub use self::time_range::TimeOfDayRange;

#[derive(Debug, Hash, Ord, PartialOrd, EnumSetType, Serialize, Deserialize)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Summer,
}

/// Color assigned to a calendar day by the day-colored tariff scheme.
///
/// The mapping is published externally and may be incomplete for future
/// dates: an absent date is [`DayColor::Unknown`], never an error.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayColor {
    Blue,
    White,
    Red,
    #[default]
    Unknown,
}

/// Two-rate time-of-day split: off-peak (HC) vs. peak (HP).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, derive_more::Display)]
pub enum Period {
    #[serde(rename = "HC")]
    #[display("HC")]
    OffPeak,

    #[serde(rename = "HP")]
    #[display("HP")]
    Peak,
}

/// Classifier output for one reading timestamp.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PeriodTag {
    pub period: Period,
    pub day_color: DayColor,
    pub season: Season,
    pub is_weekend: bool,
    pub is_critical_peak: bool,
}

/// Per-metering-point calendar configuration.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize, bon::Builder)]
pub struct CalendarConfig {
    /// Off-peak time-of-day ranges; possibly wrapping midnight, possibly
    /// disjoint (e.g. `02:00-07:00` plus `13:00-16:00`).
    #[serde_as(as = "Vec<serde_with::DisplayFromStr>")]
    #[serde(default)]
    #[builder(default)]
    pub off_peak_ranges: Vec<TimeOfDayRange>,

    #[serde(default = "defaults::weekend_days")]
    #[builder(default = DayOfWeek::Saturday | DayOfWeek::Sunday)]
    pub weekend_days: EnumSet<DayOfWeek>,

    /// Months counted as winter; every other month is summer.
    #[serde(default = "defaults::winter_months")]
    #[builder(default = defaults::winter_months())]
    pub winter_months: BTreeSet<u32>,

    /// Externally published day-to-color map.
    #[serde(default)]
    #[builder(default)]
    pub day_colors: BTreeMap<NaiveDate, DayColor>,

    /// Externally published critical peak days (typically ~22 per year).
    #[serde(default)]
    #[builder(default)]
    pub critical_days: BTreeSet<NaiveDate>,

    /// Daily peak window of the critical-peak-day scheme; wraps into the
    /// next day when `end <= start`.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    #[serde(default = "defaults::critical_window")]
    #[builder(default = defaults::critical_window())]
    pub critical_window: TimeOfDayRange,
}

mod defaults {
    use super::*;

    pub(super) fn weekend_days() -> EnumSet<DayOfWeek> {
        DayOfWeek::Saturday | DayOfWeek::Sunday
    }

    pub(super) fn winter_months() -> BTreeSet<u32> {
        BTreeSet::from([11, 12, 1, 2, 3])
    }

    pub(super) fn critical_window() -> TimeOfDayRange {
        "07:00-01:00".parse().expect("the built-in critical window is well-formed")
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CalendarConfig {
    #[must_use]
    pub fn is_off_peak(&self, at: NaiveDateTime) -> bool {
        self.off_peak_ranges.iter().any(|range| range.contains(at.time()))
    }

    #[must_use]
    pub fn is_weekend(&self, at: NaiveDateTime) -> bool {
        self.weekend_days.contains(DayOfWeek::from(at.weekday()))
    }

    #[must_use]
    pub fn season(&self, at: NaiveDateTime) -> Season {
        if self.winter_months.contains(&at.month()) { Season::Winter } else { Season::Summer }
    }

    /// Color of a calendar date; absent dates are [`DayColor::Unknown`].
    #[must_use]
    pub fn color_of(&self, date: NaiveDate) -> DayColor {
        self.day_colors.get(&date).copied().unwrap_or_default()
    }

    /// Whether the timestamp falls inside a critical day's peak window.
    ///
    /// With a wrapping window, the early-morning tail belongs to the
    /// *previous* calendar day's critical day.
    #[must_use]
    pub fn is_critical_peak(&self, at: NaiveDateTime) -> bool {
        let time = at.time();
        if self.critical_window.wraps() {
            if time >= self.critical_window.start {
                self.critical_days.contains(&at.date())
            } else if time < self.critical_window.end {
                at.date().pred_opt().is_some_and(|previous| self.critical_days.contains(&previous))
            } else {
                false
            }
        } else {
            self.critical_days.contains(&at.date()) && self.critical_window.contains(time)
        }
    }

    #[must_use]
    pub fn classify(&self, at: NaiveDateTime) -> PeriodTag {
        PeriodTag {
            period: if self.is_off_peak(at) { Period::OffPeak } else { Period::Peak },
            day_color: self.color_of(at.date()),
            season: self.season(at),
            is_weekend: self.is_weekend(at),
            is_critical_peak: self.is_critical_peak(at),
        }
    }
}
