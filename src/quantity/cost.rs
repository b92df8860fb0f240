use std::fmt::{Debug, Display, Formatter};

use rust_decimal::Decimal;

use crate::quantity::Quantity;

pub type Euro = Quantity<Decimal, 0, 0, 1>;

impl Euro {
    /// Round to whole cents, half-up.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self(self.0.round_dp(2))
    }
}

impl Default for Euro {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Display for Euro {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} €", self.0)
    }
}

impl Debug for Euro {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}€", self.0)
    }
}
