//! Fetch-window planning for a metering API that only serves bounded date
//! spans.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive calendar-date window, at most the API's maximum span wide.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while(move |day| *day <= self.end)
    }

    #[must_use]
    pub fn days_count(self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum InvalidRangeError {
    #[display("the requested range starts after it ends: {start} > {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[display("window span and overlap must both be at least 1 day")]
    ZeroSpan,

    #[display(
        "an overlap of {overlap_days} day(s) does not fit a window span of {max_window_days} day(s)"
    )]
    OverlapTooLarge { max_window_days: u32, overlap_days: u32 },
}

/// Splits an arbitrary date range into bounded, overlapping fetch windows.
///
/// `max_window_days` is the external API's hard limit on one request;
/// `overlap_days` tolerates an API that occasionally returns fewer days
/// than asked for. Consecutive windows overlap by exactly `overlap_days`
/// (the final window may overlap more), and the union of the emitted
/// windows' calendar days equals the requested range exactly.
#[derive(Copy, Clone, Debug)]
pub struct WindowPlanner {
    pub max_window_days: u32,
    pub overlap_days: u32,
}

impl Default for WindowPlanner {
    fn default() -> Self {
        Self { max_window_days: 7, overlap_days: 1 }
    }
}

impl WindowPlanner {
    pub fn plan(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FetchWindow>, InvalidRangeError> {
        if start > end {
            return Err(InvalidRangeError::StartAfterEnd { start, end });
        }
        if self.max_window_days == 0 || self.overlap_days == 0 {
            return Err(InvalidRangeError::ZeroSpan);
        }
        if self.overlap_days >= self.max_window_days {
            return Err(InvalidRangeError::OverlapTooLarge {
                max_window_days: self.max_window_days,
                overlap_days: self.overlap_days,
            });
        }

        let step = Days::new(u64::from(self.max_window_days - self.overlap_days));
        let span = Days::new(u64::from(self.max_window_days - 1));
        let mut windows = Vec::new();
        let mut window_start = start;
        loop {
            let window_end = window_start
                .checked_add_days(span)
                .unwrap_or(NaiveDate::MAX)
                .min(end);
            windows.push(FetchWindow::new(window_start, window_end));
            if window_end == end {
                return Ok(windows);
            }
            window_start = window_start
                .checked_add_days(step)
                .expect("the step cannot overflow before reaching the range end");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, dom).unwrap()
    }

    #[test]
    fn test_single_window_for_short_range() {
        let windows = WindowPlanner::default().plan(day(2024, 1, 1), day(2024, 1, 3)).unwrap();
        assert_eq!(windows, vec![FetchWindow::new(day(2024, 1, 1), day(2024, 1, 3))]);
    }

    #[test]
    fn test_single_day_range() {
        let windows = WindowPlanner::default().plan(day(2024, 1, 1), day(2024, 1, 1)).unwrap();
        assert_eq!(windows, vec![FetchWindow::new(day(2024, 1, 1), day(2024, 1, 1))]);
    }

    #[test]
    fn test_consecutive_windows_overlap_exactly() {
        let windows = WindowPlanner::default().plan(day(2024, 1, 1), day(2024, 1, 20)).unwrap();
        for pair in windows.windows(2) {
            let overlap = (pair[0].end - pair[1].start).num_days() + 1;
            assert_eq!(overlap, 1, "{pair:?}");
        }
    }

    #[test]
    fn test_coverage_equals_requested_range() {
        let (start, end) = (day(2024, 2, 10), day(2024, 5, 3));
        let windows = WindowPlanner::default().plan(start, end).unwrap();
        let covered: BTreeSet<NaiveDate> = windows.iter().flat_map(|window| window.days()).collect();
        let requested: BTreeSet<NaiveDate> =
            start.iter_days().take_while(|current| *current <= end).collect();
        assert_eq!(covered, requested);
        assert!(windows.iter().all(|window| window.days_count() <= 7));
    }

    #[test]
    fn test_year_of_windows() {
        // 365 days at a 7-day span and 1-day overlap advance 6 days per
        // window: 61 windows in total.
        let windows = WindowPlanner::default().plan(day(2024, 1, 1), day(2024, 12, 30)).unwrap();
        assert_eq!(windows.len(), 61);
        assert_eq!(windows.last().unwrap().end, day(2024, 12, 30));
    }

    #[test]
    fn test_overlap_must_fit_window() {
        let planner = WindowPlanner { max_window_days: 7, overlap_days: 7 };
        assert!(matches!(
            planner.plan(day(2024, 1, 1), day(2024, 1, 31)),
            Err(InvalidRangeError::OverlapTooLarge { .. })
        ));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        assert!(matches!(
            WindowPlanner::default().plan(day(2024, 2, 1), day(2024, 1, 1)),
            Err(InvalidRangeError::StartAfterEnd { .. })
        ));
    }
}
