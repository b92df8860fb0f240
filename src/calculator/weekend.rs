use enumset::{EnumSet, enum_set};

use crate::{
    calculator::{CalculationError, CalculationResult, OfferCalculator, ensure_required, settle, tally},
    calendar::{CalendarConfig, Period},
    catalog::{OfferType, PriceKey, PriceOffer},
    series::ConsumptionSeries,
};

/// Weekend tariff with the full four-way split: weekday and weekend days
/// each carry their own peak and off-peak prices.
pub struct WeekendHpHcCalculator;

impl OfferCalculator for WeekendHpHcCalculator {
    fn type_code(&self) -> OfferType {
        OfferType::WeekendHpHc
    }

    fn required_price_keys(&self) -> EnumSet<PriceKey> {
        enum_set!(
            PriceKey::WeekdayHp | PriceKey::WeekdayHc | PriceKey::WeekendHp | PriceKey::WeekendHc
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
            Some(match (tag.is_weekend, tag.period) {
                (false, Period::Peak) => PriceKey::WeekdayHp,
                (false, Period::OffPeak) => PriceKey::WeekdayHc,
                (true, Period::Peak) => PriceKey::WeekendHp,
                (true, Period::OffPeak) => PriceKey::WeekendHc,
            })
        });
        Ok(settle(offer, series, tally))
    }
}

/// Weekend tariff with the weekend collapsed to one off-peak-equivalent
/// rate; weekdays keep the usual HP/HC split.
///
/// When the offer *also* quotes a weekend HP/HC split, the split takes
/// precedence over the collapsed rate.
pub struct WeekendCalculator;

impl OfferCalculator for WeekendCalculator {
    fn type_code(&self) -> OfferType {
        OfferType::Weekend
    }

    fn required_price_keys(&self) -> EnumSet<PriceKey> {
        enum_set!(PriceKey::Hp | PriceKey::Hc | PriceKey::Weekend)
    }

    fn optional_price_keys(&self) -> EnumSet<PriceKey> {
        enum_set!(PriceKey::WeekendHp | PriceKey::WeekendHc)
    }

    fn calculate(
        &self,
        series: &ConsumptionSeries,
        offer: &PriceOffer,
        calendar: &CalendarConfig,
    ) -> Result<CalculationResult, CalculationError> {
        ensure_required(offer, self.required_price_keys())?;
        let split_weekend = offer.price(PriceKey::WeekendHp).is_some()
            && offer.price(PriceKey::WeekendHc).is_some();
        let tally = tally(series, calendar, |tag| {
            Some(match (tag.is_weekend, tag.period) {
                (false, Period::Peak) => PriceKey::Hp,
                (false, Period::OffPeak) => PriceKey::Hc,
                (true, Period::Peak) if split_weekend => PriceKey::WeekendHp,
                (true, Period::OffPeak) if split_weekend => PriceKey::WeekendHc,
                (true, _) => PriceKey::Weekend,
            })
        });
        Ok(settle(offer, series, tally))
    }
}
