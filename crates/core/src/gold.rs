//! Gold-collateral valuation
//!
//! The collateral value of an ornament is its net weight times a market price
//! times a purity factor. How the market price is read depends on the
//! configured [`GoldValuationBasis`]:
//!
//! ```text
//! KaratPrice:    value = price × weight × purity[karat]
//! Benchmark22k:  value = price × weight × purity[karat] / purity[22K]
//! ```
//!
//! Lending limits are fixed fractions of the value (50% / 75% / 85% by default).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::{round_rupees, Rupees};

/// Gold fineness accepted on the loan form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Karat {
    #[serde(rename = "24")]
    K24,
    #[serde(rename = "22")]
    K22,
    #[serde(rename = "21")]
    K21,
    #[serde(rename = "20")]
    K20,
    #[serde(rename = "18")]
    K18,
    #[serde(rename = "14")]
    K14,
}

impl Karat {
    pub const ALL: [Karat; 6] = [
        Karat::K24,
        Karat::K22,
        Karat::K21,
        Karat::K20,
        Karat::K18,
        Karat::K14,
    ];

    /// Purity factor (fraction of pure gold)
    pub fn purity(self) -> f64 {
        match self {
            Karat::K24 => 0.999,
            Karat::K22 => 0.916,
            Karat::K21 => 0.875,
            Karat::K20 => 0.833,
            Karat::K18 => 0.750,
            Karat::K14 => 0.583,
        }
    }

    /// Karat number, e.g. 22
    pub fn value(self) -> u8 {
        match self {
            Karat::K24 => 24,
            Karat::K22 => 22,
            Karat::K21 => 21,
            Karat::K20 => 20,
            Karat::K18 => 18,
            Karat::K14 => 14,
        }
    }

    /// Parse a selector value: `"22"`, `"22K"` or `"22k"`. Unknown or blank is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let digits = raw
            .strip_suffix('K')
            .or_else(|| raw.strip_suffix('k'))
            .unwrap_or(raw)
            .trim();
        let value: u8 = digits.parse().ok()?;
        Self::ALL.into_iter().find(|k| k.value() == value)
    }
}

impl fmt::Display for Karat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.value())
    }
}

impl FromStr for Karat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unsupported karat: {:?}", s))
    }
}

/// How the entered market price relates to the ornament's karat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoldValuationBasis {
    /// The entered price is already specific to the selected karat
    #[default]
    KaratPrice,
    /// The entered price is the 22K benchmark; other karats are scaled against it
    #[serde(rename = "benchmark_22k")]
    Benchmark22k,
}

impl GoldValuationBasis {
    fn factor(self, karat: Karat) -> f64 {
        match self {
            Self::KaratPrice => karat.purity(),
            Self::Benchmark22k => karat.purity() / Karat::K22.purity(),
        }
    }
}

/// Lending limits as fractions of collateral value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LtvRatios {
    #[serde(default = "default_min_ratio")]
    pub min: f64,
    #[serde(default = "default_suggested_ratio")]
    pub suggested: f64,
    #[serde(default = "default_max_ratio")]
    pub max: f64,
}

fn default_min_ratio() -> f64 {
    0.50
}

fn default_suggested_ratio() -> f64 {
    0.75
}

fn default_max_ratio() -> f64 {
    0.85
}

impl Default for LtvRatios {
    fn default() -> Self {
        Self {
            min: default_min_ratio(),
            suggested: default_suggested_ratio(),
            max: default_max_ratio(),
        }
    }
}

/// Collateral value and the loan range it supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldLimits {
    pub gold_value: Rupees,
    pub min_loan: Rupees,
    pub max_loan: Rupees,
    pub suggested_loan: Rupees,
}

/// Gold valuator bound to a basis and LTV ratios
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GoldValuator {
    basis: GoldValuationBasis,
    ratios: LtvRatios,
}

impl GoldValuator {
    pub fn new(basis: GoldValuationBasis) -> Self {
        Self {
            basis,
            ratios: LtvRatios::default(),
        }
    }

    pub fn with_ratios(mut self, ratios: LtvRatios) -> Self {
        self.ratios = ratios;
        self
    }

    pub fn basis(&self) -> GoldValuationBasis {
        self.basis
    }

    pub fn ratios(&self) -> &LtvRatios {
        &self.ratios
    }

    /// Value the collateral and derive lending limits
    ///
    /// Returns `None` when price or weight is not positive or no karat is
    /// selected; the caller clears whatever it was showing.
    pub fn limits(&self, market_price: f64, karat: Option<Karat>, net_weight: f64) -> Option<GoldLimits> {
        let karat = karat?;
        if !(market_price.is_finite() && net_weight.is_finite()) {
            return None;
        }
        if market_price <= 0.0 || net_weight <= 0.0 {
            return None;
        }

        let value = market_price * net_weight * self.basis.factor(karat);

        Some(GoldLimits {
            gold_value: round_rupees(value),
            min_loan: round_rupees(value * self.ratios.min),
            max_loan: round_rupees(value * self.ratios.max),
            suggested_loan: round_rupees(value * self.ratios.suggested),
        })
    }
}

/// Value collateral with default LTV ratios
pub fn compute_gold_limits(
    market_price: f64,
    karat: Option<Karat>,
    net_weight: f64,
    basis: GoldValuationBasis,
) -> Option<GoldLimits> {
    GoldValuator::new(basis).limits(market_price, karat, net_weight)
}
