use enumset::{EnumSet, enum_set};

use crate::{
    calculator::{CalculationError, CalculationResult, OfferCalculator, ensure_required, settle, tally},
    calendar::CalendarConfig,
    catalog::{OfferType, PriceKey, PriceOffer},
    series::ConsumptionSeries,
};

/// Critical-peak-day tariff: a handful of very expensive "mobile peak"
/// days per year, normal pricing everywhere else.
pub struct EjpCalculator;

impl OfferCalculator for EjpCalculator {
    fn type_code(&self) -> OfferType {
        OfferType::Ejp
    }

    fn required_price_keys(&self) -> EnumSet<PriceKey> {
        enum_set!(PriceKey::Normal | PriceKey::Critical)
    }

    fn calculate(
        &self,
        series: &ConsumptionSeries,
        offer: &PriceOffer,
        calendar: &CalendarConfig,
    ) -> Result<CalculationResult, CalculationError> {
        ensure_required(offer, self.required_price_keys())?;
        let tally = tally(series, calendar, |tag| {
            Some(if tag.is_critical_peak { PriceKey::Critical } else { PriceKey::Normal })
        });
        Ok(settle(offer, series, tally))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::{calculator::testing, prelude::*};

    fn calendar() -> CalendarConfig {
        CalendarConfig::builder()
            .critical_days(BTreeSet::from([NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()]))
            .build()
    }

    fn offer() -> PriceOffer {
        testing::offer_of(
            OfferType::Ejp,
            "14.08",
            &[(PriceKey::Normal, "0.1752"), (PriceKey::Critical, "1.0562")],
        )
    }

    #[test]
    fn test_critical_window_prices_apply() -> Result {
        let series = testing::series_of(&[
            (1, 12, 0, 1000),  // plain day
            (2, 12, 0, 1000),  // critical day, inside the 07:00-01:00 window
            (3, 0, 30, 1000),  // tail of the critical day's window
            (3, 12, 0, 1000),  // next plain day
        ]);
        let result = EjpCalculator.calculate(&series, &offer(), &calendar())?;

        let energy_of = |key| {
            result.periods.iter().find(|period| period.key == key).map(|period| period.energy)
        };
        assert_eq!(energy_of(PriceKey::Critical), Some("1".parse()?));
        assert_eq!(energy_of(PriceKey::Normal), Some("1".parse()?));
        Ok(())
    }

    #[test]
    fn test_early_morning_of_the_critical_day_is_normal() -> Result {
        // 06:30 on the critical day is before its window opens.
        let series = testing::series_of(&[(2, 6, 30, 1000)]);
        let result = EjpCalculator.calculate(&series, &offer(), &calendar())?;
        assert_eq!(result.periods.len(), 1);
        assert_eq!(result.periods[0].key, PriceKey::Normal);
        Ok(())
    }
}
