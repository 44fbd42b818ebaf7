//! Index-to-rupee price derivation.
//!
//! The estimators predict a wholesale-price-index (WPI) value, not a price.
//! This module is the single source of truth for turning that index into a
//! ₹/quintal figure; no other code may apply its own conversion.

use crate::domain::commodity::Commodity;
use crate::domain::types::PredictionResult;

/// Fractional width of the uncertainty band around the derived price.
/// The estimators expose no native confidence interval, so the band is a
/// fixed ±10%.
pub const PRICE_BAND_PCT: f64 = 0.10;

/// Per-commodity linear anchor: the ₹/quintal price at `reference_index`.
///
/// Reference prices are the midpoints of each crop's minimum-support-price
/// range at WPI base 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceAnchor {
    pub reference_index: f64,
    pub reference_price: f64,
}

pub fn anchor_for(commodity: Commodity) -> PriceAnchor {
    let reference_price = match commodity {
        Commodity::Jowar => 2260.0,
        Commodity::Wheat => 1737.5,
        Commodity::Cotton => 4840.0,
        Commodity::Sugarcane => 2512.5,
        Commodity::Bajra => 1762.5,
    };
    PriceAnchor {
        reference_index: 100.0,
        reference_price,
    }
}

/// Converts a raw predicted index value into the final result, scaling
/// linearly through the commodity's anchor and applying the fixed band.
pub fn derive_price(commodity: Commodity, raw_index: f64) -> PredictionResult {
    let anchor = anchor_for(commodity);
    let price = raw_index / anchor.reference_index * anchor.reference_price;
    PredictionResult {
        commodity,
        raw_index,
        price,
        price_min: price * (1.0 - PRICE_BAND_PCT),
        price_max: price * (1.0 + PRICE_BAND_PCT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_ordering_holds_for_every_commodity() {
        for commodity in Commodity::ALL {
            let result = derive_price(commodity, 126.0);
            assert!(result.price_min <= result.price);
            assert!(result.price <= result.price_max);
        }
    }

    #[test]
    fn test_scaling_is_proportional_to_index() {
        let at_reference = derive_price(Commodity::Wheat, 100.0);
        assert!((at_reference.price - 1737.5).abs() < 1e-9);

        let scaled = derive_price(Commodity::Wheat, 126.0);
        assert!((scaled.price - 1737.5 * 1.26).abs() < 1e-9);
        assert!((scaled.price_min - scaled.price * 0.9).abs() < 1e-9);
        assert!((scaled.price_max - scaled.price * 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_anchors_differ_per_commodity() {
        let wheat = derive_price(Commodity::Wheat, 120.0);
        let cotton = derive_price(Commodity::Cotton, 120.0);
        assert!(cotton.price > wheat.price);
    }
}
