//! The simulation orchestrator: plan, fetch, merge, classify, price, rank.

use std::{
    collections::BTreeSet,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    calculator::{CalculationResult, CalculatorRegistry},
    calendar::CalendarConfig,
    planner::{FetchWindow, WindowPlanner},
    prelude::*,
    provider::{ConsumptionProvider, DayColorProvider, OfferCatalog, UsagePointId},
    quantity::cost::Euro,
    reading::MeterReading,
    series::ConsumptionSeries,
};

/// Cooperative cancellation handle, checked between window fetches.
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(bon::Builder)]
pub struct SimulationRequest {
    pub usage_point: UsagePointId,

    /// Inclusive date range, typically the trailing 365 days.
    pub start: NaiveDate,
    pub end: NaiveDate,

    /// Subscribed capacity; offers at other tiers do not apply.
    pub power_kva: u32,

    #[builder(default)]
    pub calendar: CalendarConfig,

    #[builder(default)]
    pub cancellation: CancellationFlag,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Complete,

    /// Some windows could not be fetched; the ranking covers the rest and
    /// `missing_ranges` enumerates the gaps.
    PartialData,

    /// The run was cancelled between fetches; no ranking was computed.
    Cancelled,
}

/// An offer left out of the ranking, with the reason.
#[derive(Clone, Debug, Serialize)]
pub struct SkippedOffer {
    pub offer_id: String,
    pub reason: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AggregateStats {
    pub cheapest_offer_id: String,
    pub cheapest_total: Euro,
    pub most_expensive_offer_id: String,
    pub most_expensive_total: Euro,

    /// What switching from the most expensive ranked offer to the
    /// cheapest one would save over the simulated period.
    pub potential_savings: Euro,
}

impl AggregateStats {
    fn from_ranked(results: &[CalculationResult]) -> Option<Self> {
        let cheapest = results.first()?;
        let most_expensive = results.last()?;
        Some(Self {
            cheapest_offer_id: cheapest.offer_id.clone(),
            cheapest_total: cheapest.total_cost,
            most_expensive_offer_id: most_expensive.offer_id.clone(),
            most_expensive_total: most_expensive.total_cost,
            potential_savings: most_expensive.total_cost - cheapest.total_cost,
        })
    }
}

/// Best-effort outcome: ranked results plus a structured account of
/// everything that is missing or excluded.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub status: RunStatus,

    /// Ascending by total cost.
    pub results: Vec<CalculationResult>,

    pub skipped: Vec<SkippedOffer>,

    /// Date sub-ranges no fetched window covered.
    pub missing_ranges: Vec<FetchWindow>,

    pub stats: Option<AggregateStats>,

    pub readings_count: usize,
}

#[derive(bon::Builder)]
pub struct Simulator<'a> {
    fetcher: &'a dyn ConsumptionProvider,

    catalog: &'a dyn OfferCatalog,

    day_colors: Option<&'a dyn DayColorProvider>,

    registry: &'a CalculatorRegistry,

    #[builder(default)]
    planner: WindowPlanner,
}

impl Simulator<'_> {
    /// Run one simulation: assemble the series and rank every eligible
    /// offer against it.
    ///
    /// Per-window fetch failures degrade to partial data; a misconfigured
    /// offer is skipped; only a misconfigured range or an unreachable
    /// catalog abort the run.
    #[instrument(
        skip_all,
        fields(usage_point = %request.usage_point, start = %request.start, end = %request.end),
    )]
    pub async fn run(&self, request: &SimulationRequest) -> Result<SimulationReport> {
        let windows = self.planner.plan(request.start, request.end)?;
        debug!(n_windows = windows.len(), "planned the fetch windows");

        let calendar = self.load_day_colors(request).await;
        let offers = self
            .catalog
            .offers(request.power_kva)
            .await
            .context("failed to load the offer catalog")?;

        let (batches, fetched, missing, cancelled) = self.fetch_all(request, &windows).await;
        let missing_ranges = uncovered_ranges(&missing, &fetched);
        let series = ConsumptionSeries::merge(batches);
        info!(
            n_readings = series.len(),
            total_energy = %series.total_energy(),
            "assembled the consumption series",
        );

        if cancelled {
            info!("the run was cancelled; skipping the offer calculations");
            return Ok(SimulationReport {
                status: RunStatus::Cancelled,
                results: Vec::new(),
                skipped: Vec::new(),
                missing_ranges,
                stats: None,
                readings_count: series.len(),
            });
        }

        let mut results = Vec::new();
        let mut skipped = Vec::new();
        for offer in &offers {
            if offer.power_kva != request.power_kva {
                debug!(offer_id = %offer.id, "filtered out by power tier");
                continue;
            }
            if !offer.is_valid_during(request.start, request.end) {
                skipped.push(SkippedOffer {
                    offer_id: offer.id.clone(),
                    reason: "not valid during the simulated period".to_owned(),
                });
                continue;
            }
            let outcome = self
                .registry
                .get(offer.offer_type)
                .and_then(|calculator| calculator.calculate(&series, offer, &calendar));
            match outcome {
                Ok(result) => results.push(result),
                Err(error) => {
                    warn!(offer_id = %offer.id, error = %error, "offer skipped");
                    skipped.push(SkippedOffer {
                        offer_id: offer.id.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        results.sort_by(|a, b| {
            a.total_cost.cmp(&b.total_cost).then_with(|| a.offer_id.cmp(&b.offer_id))
        });
        let stats = AggregateStats::from_ranked(&results);

        Ok(SimulationReport {
            status: if missing_ranges.is_empty() {
                RunStatus::Complete
            } else {
                RunStatus::PartialData
            },
            results,
            skipped,
            missing_ranges,
            stats,
            readings_count: series.len(),
        })
    }

    /// Overlay freshly published day colors onto the request's calendar.
    ///
    /// A failing color collaborator is a classification gap, not an
    /// error: affected readings surface as excluded energy downstream.
    async fn load_day_colors(&self, request: &SimulationRequest) -> CalendarConfig {
        let mut calendar = request.calendar.clone();
        if let Some(provider) = self.day_colors {
            match provider.colors(request.start, request.end).await {
                Ok(colors) => calendar.day_colors.extend(colors),
                Err(error) => {
                    warn!(error = %error, "failed to load the day colors; carrying on without");
                }
            }
        }
        calendar
    }

    /// Fetch every planned window, once each, honoring cancellation in
    /// between.
    ///
    /// Returns the successful batches, the windows they came from, the
    /// failed or unattempted windows, and whether the run was cancelled.
    async fn fetch_all(
        &self,
        request: &SimulationRequest,
        windows: &[FetchWindow],
    ) -> (Vec<Vec<MeterReading>>, Vec<FetchWindow>, Vec<FetchWindow>, bool) {
        let mut batches = Vec::with_capacity(windows.len());
        let mut fetched = Vec::with_capacity(windows.len());
        let mut missing = Vec::new();
        for (index, window) in windows.iter().enumerate() {
            if request.cancellation.is_cancelled() {
                warn!(?window, "cancelled before the window was fetched");
                missing.extend_from_slice(&windows[index..]);
                return (batches, fetched, missing, true);
            }
            match self.fetcher.fetch(&request.usage_point, *window).await {
                Ok(batch) => {
                    trace!(?window, n_readings = batch.len(), "fetched");
                    fetched.push(*window);
                    batches.push(batch);
                }
                Err(error) => {
                    warn!(?window, error = %format!("{error:#}"), "window fetch failed");
                    missing.push(*window);
                }
            }
        }
        (batches, fetched, missing, false)
    }
}

/// Days of the `missing` windows that no fetched window covers, compressed
/// into contiguous ranges.
///
/// A failed window whose days are all redelivered by its overlapping
/// neighbors leaves no gap at all.
fn uncovered_ranges(missing: &[FetchWindow], fetched: &[FetchWindow]) -> Vec<FetchWindow> {
    let covered: BTreeSet<NaiveDate> = fetched.iter().flat_map(|window| window.days()).collect();
    missing
        .iter()
        .flat_map(|window| window.days())
        .filter(|day| !covered.contains(day))
        .collect::<BTreeSet<NaiveDate>>()
        .into_iter()
        .map(|day| FetchWindow::new(day, day))
        .coalesce(|left, right| {
            if left.end.succ_opt() == Some(right.start) {
                Ok(FetchWindow::new(left.start, right.end))
            } else {
                Err((left, right))
            }
        })
        .collect()
}
