//! Load-curve readings and unit normalization.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::quantity::{energy::KilowattHours, power::Watts};

/// Interval assumed when a reading carries no parseable interval code.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 30;

/// Parse an ISO-8601 duration code such as `PT10M`, `PT30M`, or `PT1H`
/// into minutes; anything else falls back to [`DEFAULT_INTERVAL_MINUTES`].
#[must_use]
pub fn interval_minutes(code: Option<&str>) -> u32 {
    code.and_then(parse_interval).unwrap_or(DEFAULT_INTERVAL_MINUTES)
}

fn parse_interval(code: &str) -> Option<u32> {
    let rest = code.strip_prefix("PT")?;
    if let Some(hours) = rest.strip_suffix('H') {
        hours.parse::<u32>().ok().map(|hours| hours * 60)
    } else {
        rest.strip_suffix('M')?.parse().ok()
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ReadingQuality {
    #[serde(rename = "BRUT")]
    Measured,

    #[serde(rename = "CORRIGE")]
    Corrected,

    #[serde(rename = "ESTIME")]
    Estimated,

    #[default]
    #[serde(other, rename = "INCONNU")]
    Unknown,
}

/// One raw load-curve point as delivered by the metering API: mean power
/// over the interval that *ends* at `at`.
#[derive(Clone, Debug, Deserialize)]
pub struct MeterReading {
    pub at: NaiveDateTime,

    /// The API quotes the value as a decimal string.
    #[serde(deserialize_with = "MeterReading::deserialize_power")]
    pub power: Watts,

    #[serde(default, rename = "interval_length")]
    pub interval: Option<String>,

    #[serde(default)]
    pub quality: ReadingQuality,
}

impl MeterReading {
    fn deserialize_power<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Watts, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Str(&value), &"a whole number of watts")
        })
    }

    /// Convert the raw power into energy over the reading's own interval.
    #[must_use]
    pub fn normalize(self) -> ConsumptionReading {
        let interval_minutes = interval_minutes(self.interval.as_deref());
        ConsumptionReading {
            at: self.at,
            power: self.power,
            interval_minutes,
            energy: KilowattHours::from_power_over(self.power, interval_minutes),
            quality: self.quality,
        }
    }
}

/// A normalized reading: raw power plus the energy it amounts to.
#[derive(Clone, Debug, Serialize)]
pub struct ConsumptionReading {
    pub at: NaiveDateTime,
    pub power: Watts,
    pub interval_minutes: u32,
    pub energy: KilowattHours,
    pub quality: ReadingQuality,
}
