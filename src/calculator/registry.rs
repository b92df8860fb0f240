use enumset::EnumSet;
use serde::Serialize;

use crate::{
    calculator::{
        BaseCalculator, CalculationError, EjpCalculator, HpHcCalculator, OfferCalculator,
        SeasonalCalculator, TempoCalculator, WeekendCalculator, WeekendHpHcCalculator,
    },
    catalog::{OfferType, PriceKey},
};

/// The closed set of calculator variants, in display order.
///
/// Built once per process and passed by reference to the orchestrator —
/// there is no runtime discovery and no global state behind it.
pub struct CalculatorRegistry {
    calculators: Vec<Box<dyn OfferCalculator>>,
}

impl CalculatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calculators: vec![
                Box::new(BaseCalculator),
                Box::new(HpHcCalculator),
                Box::new(WeekendCalculator),
                Box::new(WeekendHpHcCalculator),
                Box::new(SeasonalCalculator),
                Box::new(TempoCalculator),
                Box::new(EjpCalculator),
            ],
        }
    }

    pub fn get(&self, type_code: OfferType) -> Result<&dyn OfferCalculator, CalculationError> {
        self.calculators
            .iter()
            .map(Box::as_ref)
            .find(|calculator| calculator.type_code() == type_code)
            .ok_or(CalculationError::UnknownOfferType { offer_type: type_code })
    }

    /// Variant metadata for catalog-facing callers, in display order.
    #[must_use]
    pub fn list_all(&self) -> Vec<CalculatorInfo> {
        self.calculators
            .iter()
            .map(|calculator| CalculatorInfo {
                type_code: calculator.type_code(),
                required_price_keys: calculator.required_price_keys(),
                optional_price_keys: calculator.optional_price_keys(),
            })
            .collect()
    }
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CalculatorInfo {
    pub type_code: OfferType,
    pub required_price_keys: EnumSet<PriceKey>,
    pub optional_price_keys: EnumSet<PriceKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TYPES: [OfferType; 7] = [
        OfferType::Base,
        OfferType::HpHc,
        OfferType::Tempo,
        OfferType::Ejp,
        OfferType::Seasonal,
        OfferType::WeekendHpHc,
        OfferType::Weekend,
    ];

    #[test]
    fn test_every_offer_type_resolves() {
        let registry = CalculatorRegistry::new();
        for offer_type in ALL_TYPES {
            let calculator = registry.get(offer_type).unwrap();
            assert_eq!(calculator.type_code(), offer_type);
            assert!(!calculator.required_price_keys().is_empty());
        }
    }

    #[test]
    fn test_list_all_covers_every_variant() {
        let infos = CalculatorRegistry::new().list_all();
        assert_eq!(infos.len(), ALL_TYPES.len());
        for offer_type in ALL_TYPES {
            assert!(infos.iter().any(|info| info.type_code == offer_type));
        }
    }

    #[test]
    fn test_required_and_optional_keys_do_not_overlap() {
        for info in CalculatorRegistry::new().list_all() {
            assert!(
                (info.required_price_keys & info.optional_price_keys).is_empty(),
                "{:?}",
                info.type_code,
            );
        }
    }
}
