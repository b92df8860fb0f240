use std::fmt::{Debug, Display, Formatter};

use rust_decimal::Decimal;

use crate::quantity::Quantity;

/// Euro per kilowatt-hour: a named unit price from a tariff sheet.
pub type EuroPerKilowattHour = Quantity<Decimal, -1, -1, 1>;

impl Display for EuroPerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} €/kWh", self.0)
    }
}

impl Debug for EuroPerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}€/kWh", self.0)
    }
}
