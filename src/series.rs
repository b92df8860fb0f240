//! The consumption series: one metering point, one simulated period.

use std::collections::{BTreeMap, btree_map::Entry};

use chrono::NaiveDateTime;

use crate::{
    prelude::*,
    quantity::energy::KilowattHours,
    reading::{ConsumptionReading, MeterReading},
};

/// Ordered consumption readings with strictly unique timestamps.
///
/// Built fresh for every simulation run and discarded with its results;
/// nothing here is persisted.
#[derive(Debug, Default)]
pub struct ConsumptionSeries {
    readings: Vec<ConsumptionReading>,
}

impl ConsumptionSeries {
    /// Merge per-window fetch batches into one normalized series.
    ///
    /// Overlapping windows redeliver boundary readings; duplicates are
    /// dropped first-write-wins, in batch order. A duplicate that
    /// *disagrees* on the power value is logged as a data inconsistency
    /// and likewise dropped — it never fails the run.
    pub fn merge(batches: impl IntoIterator<Item = Vec<MeterReading>>) -> Self {
        let mut by_timestamp: BTreeMap<NaiveDateTime, ConsumptionReading> = BTreeMap::new();
        for batch in batches {
            for reading in batch {
                let normalized = reading.normalize();
                match by_timestamp.entry(normalized.at) {
                    Entry::Vacant(entry) => {
                        entry.insert(normalized);
                    }
                    Entry::Occupied(entry) => {
                        if entry.get().power != normalized.power {
                            warn!(
                                at = %normalized.at,
                                kept = %entry.get().power,
                                dropped = %normalized.power,
                                "overlapping windows disagree on a reading",
                            );
                        }
                    }
                }
            }
        }
        Self { readings: by_timestamp.into_values().collect() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConsumptionReading> {
        self.readings.iter()
    }

    #[must_use]
    pub fn total_energy(&self) -> KilowattHours {
        self.readings.iter().map(|reading| reading.energy).sum()
    }

    /// Inclusive calendar-day span of the series; `0` when empty.
    #[must_use]
    pub fn days_count(&self) -> i64 {
        match (self.readings.first(), self.readings.last()) {
            (Some(first), Some(last)) => (last.at.date() - first.at.date()).num_days() + 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::{quantity::power::Watts, reading::ReadingQuality};

    fn reading(dom: u32, hour: u32, minute: u32, power: u32) -> MeterReading {
        MeterReading {
            at: NaiveDate::from_ymd_opt(2024, 3, dom)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
            power: Watts(power),
            interval: Some("PT30M".to_owned()),
            quality: ReadingQuality::Measured,
        }
    }

    #[test]
    fn test_merge_deduplicates_overlap() {
        let series = ConsumptionSeries::merge([
            vec![reading(1, 23, 0, 1000), reading(1, 23, 30, 1200)],
            vec![reading(1, 23, 30, 1200), reading(2, 0, 0, 800)],
        ]);
        assert_eq!(series.len(), 3);
        let distinct: BTreeSet<NaiveDateTime> =
            series.iter().map(|reading| reading.at).collect();
        assert_eq!(distinct.len(), series.len());
    }

    #[test]
    fn test_merge_keeps_first_write_on_disagreement() {
        tracing_subscriber::fmt().with_test_writer().try_init().ok();
        let series = ConsumptionSeries::merge([
            vec![reading(1, 23, 0, 1000)],
            vec![reading(1, 23, 0, 1600)],
        ]);
        assert_eq!(series.len(), 1);
        assert_eq!(series.iter().next().unwrap().power, Watts(1000));
    }

    #[test]
    fn test_merge_sorts_out_of_order_batches() {
        let series = ConsumptionSeries::merge([
            vec![reading(2, 0, 0, 800)],
            vec![reading(1, 23, 0, 1000)],
        ]);
        let timestamps: Vec<NaiveDateTime> = series.iter().map(|reading| reading.at).collect();
        assert!(timestamps.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_total_energy_and_span() {
        let series = ConsumptionSeries::merge([vec![
            reading(1, 23, 0, 1000),
            reading(3, 1, 0, 500),
        ]]);
        assert_eq!(series.total_energy(), KilowattHours::from_watt_hours(750));
        assert_eq!(series.days_count(), 3);
    }

    #[test]
    fn test_empty_series() {
        let series = ConsumptionSeries::merge(Vec::<Vec<MeterReading>>::new());
        assert!(series.is_empty());
        assert_eq!(series.days_count(), 0);
        assert_eq!(series.total_energy(), KilowattHours::ZERO);
    }
}
