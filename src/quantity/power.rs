use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Raw mean power of one load-curve reading, as the metering API delivers it.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    derive_more::From,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
pub struct Watts(pub u32);

impl Display for Watts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} W", self.0)
    }
}

impl Debug for Watts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}W", self.0)
    }
}
