use enumset::{EnumSet, enum_set};

use crate::{
    calculator::{CalculationError, CalculationResult, OfferCalculator, ensure_required, settle, tally},
    calendar::{CalendarConfig, Period, Season},
    catalog::{OfferType, PriceKey, PriceOffer},
    series::ConsumptionSeries,
};

/// Seasonal tariff: winter and summer each carry their own peak and
/// off-peak prices — four buckets.
pub struct SeasonalCalculator;

impl OfferCalculator for SeasonalCalculator {
    fn type_code(&self) -> OfferType {
        OfferType::Seasonal
    }

    fn required_price_keys(&self) -> EnumSet<PriceKey> {
        enum_set!(
            PriceKey::WinterHp | PriceKey::WinterHc | PriceKey::SummerHp | PriceKey::SummerHc
        )
    }

    fn calculate(
        &self,
        series: &ConsumptionSeries,
        offer: &PriceOffer,
        calendar: &CalendarConfig,
    ) -> Result<CalculationResult, CalculationError> {
        ensure_required(offer, self.required_price_keys())?;
        let tally = tally(series, calendar, |tag| {
            Some(match (tag.season, tag.period) {
                (Season::Winter, Period::Peak) => PriceKey::WinterHp,
                (Season::Winter, Period::OffPeak) => PriceKey::WinterHc,
                (Season::Summer, Period::Peak) => PriceKey::SummerHp,
                (Season::Summer, Period::OffPeak) => PriceKey::SummerHc,
            })
        });
        Ok(settle(offer, series, tally))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        calculator::testing,
        prelude::*,
        quantity::power::Watts,
        reading::{MeterReading, ReadingQuality},
        series::ConsumptionSeries,
    };

    fn offer() -> PriceOffer {
        testing::offer_of(
            OfferType::Seasonal,
            "15",
            &[
                (PriceKey::WinterHp, "0.32"),
                (PriceKey::WinterHc, "0.24"),
                (PriceKey::SummerHp, "0.19"),
                (PriceKey::SummerHc, "0.14"),
            ],
        )
    }

    #[test]
    fn test_buckets_by_season_and_period() -> Result {
        let calendar = CalendarConfig::builder()
            .off_peak_ranges(vec!["22:00-06:00".parse()?])
            .build();
        let reading = |month, hour| MeterReading {
            at: NaiveDate::from_ymd_opt(2024, month, 10)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            power: Watts(1000),
            interval: Some("PT30M".to_owned()),
            quality: ReadingQuality::Measured,
        };
        // March is winter by default; July is summer.
        let series =
            ConsumptionSeries::merge([vec![reading(3, 12), reading(3, 23), reading(7, 12), reading(7, 23)]]);

        let result = SeasonalCalculator.calculate(&series, &offer(), &calendar)?;
        assert_eq!(result.periods.len(), 4);
        for period in &result.periods {
            assert_eq!(period.energy, "0.5".parse()?, "{period:?}");
        }
        assert_eq!(result.total_energy, "2".parse()?);
        Ok(())
    }
}
