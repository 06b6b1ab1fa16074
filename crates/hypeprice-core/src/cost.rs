//! Landed-cost arithmetic: shipping derivation, import tax, and final totals.
//!
//! All amounts are in the target currency (TWD). Inputs that are missing or
//! not finite count as zero; nothing in this module fails.

use std::fmt;
use std::str::FromStr;

use crate::offers::Offer;

/// Import tax applied to `base + shipping` when tax is enabled.
pub const TAX_RATE: f64 = 0.17;

/// Shipping-origin jurisdiction used to look up a flat per-pound rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Origin {
    #[default]
    Us,
    Gb,
    Jp,
    Hk,
    Au,
    Eu,
}

impl Origin {
    pub const ALL: [Origin; 6] = [
        Origin::Us,
        Origin::Gb,
        Origin::Jp,
        Origin::Hk,
        Origin::Au,
        Origin::Eu,
    ];

    /// Estimated shipping cost per pound. Not authoritative.
    #[must_use]
    pub fn rate_per_lb(self) -> f64 {
        match self {
            Origin::Us => 150.0,
            Origin::Gb => 200.0,
            Origin::Jp => 100.0,
            Origin::Hk => 60.0,
            Origin::Au => 220.0,
            Origin::Eu => 210.0,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Origin::Us => "US",
            Origin::Gb => "GB",
            Origin::Jp => "JP",
            Origin::Hk => "HK",
            Origin::Au => "AU",
            Origin::Eu => "EU",
        }
    }

    /// Case-insensitive lookup by two-letter code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|o| o.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|o| o.code()).collect();
            format!("unknown origin \"{s}\" (expected one of {})", known.join(", "))
        })
    }
}

/// Shipping cost for `weight_lbs` shipped from `origin_code`.
///
/// Unknown origin codes have a rate of zero.
#[must_use]
pub fn derive_shipping(weight_lbs: f64, origin_code: &str) -> i64 {
    let rate = Origin::from_code(origin_code).map_or(0.0, Origin::rate_per_lb);
    round_units(finite_or_zero(weight_lbs) * rate)
}

/// Where the shipping amount comes from.
///
/// Manual entry and weight/origin derivation both feed one value; the most
/// recent edit decides which variant is active and the number is computed on
/// read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shipping {
    Manual(f64),
    Derived,
}

/// User-adjustable parameters of the landed-cost computation.
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    pub shipping: Shipping,
    pub apply_tax: bool,
    /// Tax applies only when the base price is at or above this amount.
    pub tax_threshold_twd: f64,
    pub origin: Origin,
    pub weight_lbs: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            shipping: Shipping::Manual(800.0),
            apply_tax: true,
            tax_threshold_twd: 0.0,
            origin: Origin::Us,
            weight_lbs: 1.0,
        }
    }
}

impl CostModel {
    /// Effective shipping amount for the active [`Shipping`] variant.
    #[must_use]
    pub fn shipping_cost_twd(&self) -> f64 {
        match self.shipping {
            Shipping::Manual(amount) => finite_or_zero(amount),
            #[allow(clippy::cast_precision_loss)]
            Shipping::Derived => derive_shipping(self.weight_lbs, self.origin.code()) as f64,
        }
    }

    pub fn set_manual_shipping(&mut self, amount: f64) {
        self.shipping = Shipping::Manual(amount);
    }

    /// Updates the parcel weight and switches shipping to derived.
    pub fn set_weight_lbs(&mut self, weight_lbs: f64) {
        self.weight_lbs = weight_lbs;
        self.shipping = Shipping::Derived;
    }

    /// Updates the origin and switches shipping to derived.
    pub fn set_origin(&mut self, origin: Origin) {
        self.origin = origin;
        self.shipping = Shipping::Derived;
    }
}

/// Per-card cost breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandedCost {
    pub base: f64,
    pub shipping: f64,
    pub tax: i64,
    pub total: i64,
}

/// Computes the landed-cost breakdown of `offer` under `model`.
#[must_use]
pub fn landed_cost(offer: &Offer, model: &CostModel) -> LandedCost {
    let base = finite_or_zero(offer.base_price_twd());
    let shipping = model.shipping_cost_twd();
    let threshold = finite_or_zero(model.tax_threshold_twd);

    let tax = if model.apply_tax && base >= threshold {
        round_units((base + shipping) * TAX_RATE)
    } else {
        0
    };

    #[allow(clippy::cast_precision_loss)]
    let total = round_units(base + shipping + tax as f64);

    LandedCost {
        base,
        shipping,
        tax,
        total,
    }
}

/// Final landed cost of `offer` in whole currency units.
#[must_use]
pub fn compute_final_cost(offer: &Offer, model: &CostModel) -> i64 {
    landed_cost(offer, model).total
}

fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Rounds half away from zero to whole currency units.
#[allow(clippy::cast_possible_truncation)]
fn round_units(n: f64) -> i64 {
    finite_or_zero(n).round() as i64
}
