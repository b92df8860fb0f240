use enumset::{EnumSet, enum_set};

use crate::{
    calculator::{CalculationError, CalculationResult, OfferCalculator, ensure_required, settle, tally},
    calendar::{CalendarConfig, DayColor, Period},
    catalog::{OfferType, PriceKey, PriceOffer},
    series::ConsumptionSeries,
};

/// Day-colored tariff: each calendar day carries one of three colors, and
/// each color has its own peak and off-peak prices — up to six buckets.
///
/// Days without a published color (typically future dates) are priced by
/// nobody: their energy goes to `excluded_kwh` and the result is reported
/// as partial rather than silently dropped.
pub struct TempoCalculator;

impl OfferCalculator for TempoCalculator {
    fn type_code(&self) -> OfferType {
        OfferType::Tempo
    }

    fn required_price_keys(&self) -> EnumSet<PriceKey> {
        enum_set!(
            PriceKey::BlueHp
                | PriceKey::BlueHc
                | PriceKey::WhiteHp
                | PriceKey::WhiteHc
                | PriceKey::RedHp
                | PriceKey::RedHc
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
            let (peak, off_peak) = match tag.day_color {
                DayColor::Blue => (PriceKey::BlueHp, PriceKey::BlueHc),
                DayColor::White => (PriceKey::WhiteHp, PriceKey::WhiteHc),
                DayColor::Red => (PriceKey::RedHp, PriceKey::RedHc),
                DayColor::Unknown => return None,
            };
            Some(match tag.period {
                Period::Peak => peak,
                Period::OffPeak => off_peak,
            })
        });
        Ok(settle(offer, series, tally))
    }
}
