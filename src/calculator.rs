//! The offer-calculator family.
//!
//! One pure variant per tariff structure, all sharing the same capability:
//! accumulate kilowatt-hours into named buckets chosen from the calendar
//! tags, then price each bucket. Variants never look at the calendar
//! themselves beyond the tags from [`CalendarConfig::classify`].

mod base;
mod ejp;
mod hp_hc;
mod registry;
mod seasonal;
mod tempo;
mod weekend;

use std::collections::BTreeMap;

use enumset::EnumSet;
use rust_decimal::Decimal;
use serde::Serialize;

pub use self::{
    base::BaseCalculator,
    ejp::EjpCalculator,
    hp_hc::HpHcCalculator,
    registry::{CalculatorInfo, CalculatorRegistry},
    seasonal::SeasonalCalculator,
    tempo::TempoCalculator,
    weekend::{WeekendCalculator, WeekendHpHcCalculator},
};
use crate::{
    calendar::{CalendarConfig, PeriodTag},
    catalog::{OfferType, PriceKey, PriceOffer},
    prelude::*,
    quantity::{cost::Euro, energy::KilowattHours, rate::EuroPerKilowattHour},
    series::ConsumptionSeries,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CalculationError {
    /// The offer is structurally unusable for its declared tariff type;
    /// it is excluded from the ranking, never fatal to the run.
    #[display("offer `{offer_id}` is missing the required price `{key}`")]
    MissingPrice { offer_id: String, key: PriceKey },

    #[display("no calculator is registered for `{offer_type}`")]
    UnknownOfferType { offer_type: OfferType },
}

pub trait OfferCalculator: Send + Sync {
    fn type_code(&self) -> OfferType;

    /// Price keys the offer must carry; a missing one raises
    /// [`CalculationError::MissingPrice`] before anything is tallied.
    fn required_price_keys(&self) -> EnumSet<PriceKey>;

    /// Price keys the variant will use when present.
    fn optional_price_keys(&self) -> EnumSet<PriceKey> {
        EnumSet::empty()
    }

    fn calculate(
        &self,
        series: &ConsumptionSeries,
        offer: &PriceOffer,
        calendar: &CalendarConfig,
    ) -> Result<CalculationResult, CalculationError>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationStatus {
    /// Every reading was classified and priced.
    Full,

    /// Some energy could not be attributed to a priced bucket and is
    /// reported under `excluded_kwh`.
    Partial,
}

/// One priced bucket of the result.
#[derive(Clone, Debug, Serialize)]
pub struct PeriodCost {
    pub key: PriceKey,

    #[serde(rename = "kwh")]
    pub energy: KilowattHours,

    pub unit_price: EuroPerKilowattHour,

    pub cost: Euro,

    /// Share of the total consumption, in percent; `0` for an empty
    /// series.
    pub percentage: Decimal,
}

#[derive(Clone, Debug, Serialize)]
pub struct CalculationResult {
    pub offer_id: String,

    pub provider: String,

    pub offer_type: OfferType,

    #[serde(rename = "total_kwh")]
    pub total_energy: KilowattHours,

    /// Energy left out of the pricing, e.g. readings on days without a
    /// published color.
    #[serde(rename = "excluded_kwh")]
    pub excluded_energy: KilowattHours,

    pub subscription_cost: Euro,

    pub total_cost: Euro,

    pub periods: Vec<PeriodCost>,

    pub status: CalculationStatus,
}

pub(crate) struct Tally {
    pub buckets: BTreeMap<PriceKey, KilowattHours>,
    pub excluded: KilowattHours,
}

/// Fail fast when the offer does not carry every required price.
pub(crate) fn ensure_required(
    offer: &PriceOffer,
    required: EnumSet<PriceKey>,
) -> Result<(), CalculationError> {
    for key in required {
        if offer.price(key).is_none() {
            return Err(CalculationError::MissingPrice { offer_id: offer.id.clone(), key });
        }
    }
    Ok(())
}

/// Accumulate each reading's energy into the bucket its calendar tag maps
/// to; `None` sends the reading to the excluded pile.
pub(crate) fn tally(
    series: &ConsumptionSeries,
    calendar: &CalendarConfig,
    bucket_of: impl Fn(PeriodTag) -> Option<PriceKey>,
) -> Tally {
    let mut buckets: BTreeMap<PriceKey, KilowattHours> = BTreeMap::new();
    let mut excluded = KilowattHours::ZERO;
    for reading in series.iter() {
        match bucket_of(calendar.classify(reading.at)) {
            Some(key) => *buckets.entry(key).or_default() += reading.energy,
            None => excluded += reading.energy,
        }
    }
    Tally { buckets, excluded }
}

/// Price the tallied buckets and assemble the result.
///
/// The monthly subscription is prorated as `days_count / 30`, a fixed
/// convention applied uniformly to every variant regardless of actual
/// calendar month lengths, so results stay comparable across offers for
/// arbitrary ranges.
pub(crate) fn settle(
    offer: &PriceOffer,
    series: &ConsumptionSeries,
    tally: Tally,
) -> CalculationResult {
    let Tally { buckets, mut excluded } = tally;
    let total_energy = buckets.values().copied().sum::<KilowattHours>() + excluded;
    let subscription_cost =
        offer.subscription_monthly * Decimal::from(series.days_count()) / Decimal::from(30);

    let mut periods = Vec::with_capacity(buckets.len());
    let mut energy_cost = Euro::ZERO;
    for (key, energy) in buckets {
        let Some(unit_price) = offer.price(key) else {
            // Only reachable for optional buckets: required keys are
            // checked before anything is tallied.
            warn!(offer_id = %offer.id, key = %key, "no price for a tallied bucket");
            excluded += energy;
            continue;
        };
        let cost = energy * unit_price;
        energy_cost += cost;
        periods.push(PeriodCost {
            key,
            energy,
            unit_price,
            cost,
            percentage: percentage_of(energy, total_energy),
        });
    }

    CalculationResult {
        offer_id: offer.id.clone(),
        provider: offer.provider.clone(),
        offer_type: offer.offer_type,
        total_energy,
        excluded_energy: excluded,
        subscription_cost,
        total_cost: subscription_cost + energy_cost,
        periods,
        status: if excluded.is_zero() {
            CalculationStatus::Full
        } else {
            CalculationStatus::Partial
        },
    }
}

fn percentage_of(energy: KilowattHours, total: KilowattHours) -> Decimal {
    if total.is_zero() {
        Decimal::ZERO
    } else {
        (energy.0 / total.0 * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        quantity::power::Watts,
        reading::{MeterReading, ReadingQuality},
    };

    /// Half-hour readings for March 2024 test days.
    pub(crate) fn series_of(points: &[(u32, u32, u32, u32)]) -> ConsumptionSeries {
        let batch = points
            .iter()
            .map(|&(dom, hour, minute, power)| MeterReading {
                at: NaiveDate::from_ymd_opt(2024, 3, dom)
                    .unwrap()
                    .and_hms_opt(hour, minute, 0)
                    .unwrap(),
                power: Watts(power),
                interval: Some("PT30M".to_owned()),
                quality: ReadingQuality::Measured,
            })
            .collect();
        ConsumptionSeries::merge([batch])
    }

    pub(crate) fn offer_of(
        offer_type: OfferType,
        subscription_monthly: &str,
        prices: &[(PriceKey, &str)],
    ) -> PriceOffer {
        PriceOffer::builder()
            .id(format!("test-{offer_type}"))
            .provider("Testable Énergie".to_owned())
            .offer_type(offer_type)
            .power_kva(6)
            .subscription_monthly(subscription_monthly.parse().unwrap())
            .prices(
                prices
                    .iter()
                    .map(|&(key, price)| (key, price.parse().unwrap()))
                    .collect(),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_of_empty_total_is_zero() {
        assert_eq!(percentage_of(KilowattHours::ZERO, KilowattHours::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        let third = KilowattHours::from(Decimal::ONE);
        let total = KilowattHours::from(Decimal::from(3));
        assert_eq!(percentage_of(third, total), Decimal::new(3333, 2));
    }
}
