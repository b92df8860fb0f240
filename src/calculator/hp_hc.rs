use enumset::{EnumSet, enum_set};

use crate::{
    calculator::{CalculationError, CalculationResult, OfferCalculator, ensure_required, settle, tally},
    calendar::{CalendarConfig, Period},
    catalog::{OfferType, PriceKey, PriceOffer},
    series::ConsumptionSeries,
};

/// Two-rate tariff: off-peak hours (HC) against peak hours (HP).
pub struct HpHcCalculator;

impl OfferCalculator for HpHcCalculator {
    fn type_code(&self) -> OfferType {
        OfferType::HpHc
    }

    fn required_price_keys(&self) -> EnumSet<PriceKey> {
        enum_set!(PriceKey::Hp | PriceKey::Hc)
    }

    fn calculate(
        &self,
        series: &ConsumptionSeries,
        offer: &PriceOffer,
        calendar: &CalendarConfig,
    ) -> Result<CalculationResult, CalculationError> {
        ensure_required(offer, self.required_price_keys())?;
        let tally = tally(series, calendar, |tag| {
            Some(match tag.period {
                Period::OffPeak => PriceKey::Hc,
                Period::Peak => PriceKey::Hp,
            })
        });
        Ok(settle(offer, series, tally))
    }
}
