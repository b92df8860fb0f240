use enumset::{EnumSet, enum_set};

use crate::{
    calculator::{CalculationError, CalculationResult, OfferCalculator, ensure_required, settle, tally},
    calendar::CalendarConfig,
    catalog::{OfferType, PriceKey, PriceOffer},
    series::ConsumptionSeries,
};

/// Flat rate: every kilowatt-hour costs the same, day and night.
pub struct BaseCalculator;

impl OfferCalculator for BaseCalculator {
    fn type_code(&self) -> OfferType {
        OfferType::Base
    }

    fn required_price_keys(&self) -> EnumSet<PriceKey> {
        enum_set!(PriceKey::Base)
    }

    fn calculate(
        &self,
        series: &ConsumptionSeries,
        offer: &PriceOffer,
        calendar: &CalendarConfig,
    ) -> Result<CalculationResult, CalculationError> {
        ensure_required(offer, self.required_price_keys())?;
        Ok(settle(offer, series, tally(series, calendar, |_| Some(PriceKey::Base))))
    }
}
