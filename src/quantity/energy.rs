use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use rust_decimal::Decimal;

use crate::quantity::{Quantity, cost::Euro, power::Watts, rate::EuroPerKilowattHour};

/// Kilowatt-hours, the canonical energy unit of the engine.
pub type KilowattHours = Quantity<Decimal, 1, 1, 0>;

impl KilowattHours {
    pub fn from_watt_hours(watt_hours: impl Into<Decimal>) -> Self {
        Self(watt_hours.into() / Decimal::ONE_THOUSAND)
    }

    /// Energy drawn by `power` over one reading interval.
    ///
    /// The interval length is per-reading: two consecutive readings of the
    /// same series may legitimately span different intervals, e.g. around
    /// DST transitions.
    pub fn from_power_over(power: Watts, interval_minutes: u32) -> Self {
        Self(
            Decimal::from(power.0) * Decimal::from(interval_minutes)
                / (Decimal::from(60) * Decimal::ONE_THOUSAND),
        )
    }

    #[must_use]
    pub fn watt_hours(self) -> Decimal {
        self.0 * Decimal::ONE_THOUSAND
    }
}

impl Default for KilowattHours {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}Wh", self.watt_hours())
    }
}

impl Mul<EuroPerKilowattHour> for KilowattHours {
    type Output = Euro;

    fn mul(self, rhs: EuroPerKilowattHour) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
