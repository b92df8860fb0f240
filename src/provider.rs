//! Seams to the external collaborators.
//!
//! The engine never talks to the network itself: the metering API, the
//! day-color publisher, and the offer catalog all sit behind these traits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    calendar::DayColor, catalog::PriceOffer, planner::FetchWindow, prelude::*,
    reading::MeterReading,
};

/// Identifier of a delivery point on the distribution grid.
#[derive(
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
pub struct UsagePointId(pub String);

#[async_trait]
pub trait ConsumptionProvider: Sync {
    /// Fetch the load curve for one bounded window.
    ///
    /// Called at most once per planned window per run. Retries, backoff,
    /// and timeouts all live behind this seam; a returned error is treated
    /// as a partial-data event, never as a crash.
    async fn fetch(
        &self,
        usage_point: &UsagePointId,
        window: FetchWindow,
    ) -> Result<Vec<MeterReading>>;
}

#[async_trait]
pub trait DayColorProvider: Sync {
    /// Published day colors for the inclusive date range.
    ///
    /// Unpublished dates (typically future ones) are simply absent from
    /// the map.
    async fn colors(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, DayColor>>;
}

#[async_trait]
pub trait OfferCatalog: Sync {
    /// Offers available at the given power tier.
    async fn offers(&self, power_kva: u32) -> Result<Vec<PriceOffer>>;
}
