//! Read-only tariff catalog entries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use enumset::EnumSetType;
use serde::{Deserialize, Serialize};

use crate::quantity::{cost::Euro, rate::EuroPerKilowattHour};

/// Named unit-price slot on a tariff sheet.
///
/// Which keys an offer must carry is declared by the calculator variant
/// matching its [`OfferType`].
#[derive(
    Debug,
    Hash,
    Ord,
    PartialOrd,
    EnumSetType,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "snake_case")]
pub enum PriceKey {
    Base,

    #[display("HP")]
    Hp,
    #[display("HC")]
    Hc,

    #[display("HP bleu")]
    BlueHp,
    #[display("HC bleu")]
    BlueHc,
    #[display("HP blanc")]
    WhiteHp,
    #[display("HC blanc")]
    WhiteHc,
    #[display("HP rouge")]
    RedHp,
    #[display("HC rouge")]
    RedHc,

    Normal,
    Critical,

    #[display("HP hiver")]
    WinterHp,
    #[display("HC hiver")]
    WinterHc,
    #[display("HP été")]
    SummerHp,
    #[display("HC été")]
    SummerHc,

    #[display("HP semaine")]
    WeekdayHp,
    #[display("HC semaine")]
    WeekdayHc,
    #[display("HP week-end")]
    WeekendHp,
    #[display("HC week-end")]
    WeekendHc,
    Weekend,
}

/// Tariff structure code; each code maps to exactly one calculator variant.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferType {
    Base,
    HpHc,
    Tempo,
    Ejp,
    Seasonal,
    WeekendHpHc,
    Weekend,
}

/// One tariff product from a provider at a given power tier.
///
/// Supplied by the external catalog collaborator; the engine never mutates
/// it.
#[derive(Clone, Debug, Serialize, Deserialize, bon::Builder)]
pub struct PriceOffer {
    pub id: String,

    pub provider: String,

    pub offer_type: OfferType,

    /// Subscribed capacity this offer applies to.
    pub power_kva: u32,

    pub subscription_monthly: Euro,

    #[serde(default)]
    #[builder(default)]
    pub prices: BTreeMap<PriceKey, EuroPerKilowattHour>,

    #[serde(default)]
    pub valid_from: Option<NaiveDate>,

    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

impl PriceOffer {
    #[must_use]
    pub fn price(&self, key: PriceKey) -> Option<EuroPerKilowattHour> {
        self.prices.get(&key).copied()
    }

    /// Whether the offer's validity window overlaps the inclusive date
    /// range.
    #[must_use]
    pub fn is_valid_during(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.valid_from.is_none_or(|from| from <= end)
            && self.valid_until.is_none_or(|until| until >= start)
    }
}
