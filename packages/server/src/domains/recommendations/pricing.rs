//! Bundle tiers, discount pricing and budget ranges

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Round money to cents, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Duration tiers offered for every recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleTier {
    SixMonth,
    ThreeMonth,
    OneMonth,
    Single,
}

impl BundleTier {
    pub const ALL: [BundleTier; 4] = [
        BundleTier::SixMonth,
        BundleTier::ThreeMonth,
        BundleTier::OneMonth,
        BundleTier::Single,
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            BundleTier::SixMonth => "6_month",
            BundleTier::ThreeMonth => "3_month",
            BundleTier::OneMonth => "1_month",
            BundleTier::Single => "single",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            BundleTier::SixMonth => "6-Month Complete Routine",
            BundleTier::ThreeMonth => "3-Month Starter Kit",
            BundleTier::OneMonth => "1-Month Trial",
            BundleTier::Single => "Start with One",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BundleTier::SixMonth => "Your personalized skincare system for best results",
            BundleTier::ThreeMonth => "Begin your skincare journey",
            BundleTier::OneMonth => "Try before you commit",
            BundleTier::Single => "Our top pick for your concerns",
        }
    }

    /// Percent off the original price
    pub fn discount_percent(&self) -> u32 {
        match self {
            BundleTier::SixMonth => 40,
            BundleTier::ThreeMonth => 30,
            BundleTier::OneMonth => 20,
            BundleTier::Single => 0,
        }
    }

    /// How many routine products the tier includes (`None` = all)
    pub fn product_limit(&self) -> Option<usize> {
        match self {
            BundleTier::SixMonth => None,
            BundleTier::ThreeMonth => Some(3),
            BundleTier::OneMonth => Some(2),
            BundleTier::Single => Some(1),
        }
    }

    /// Multiplier applied to the per-month bundle price
    pub fn price_multiplier(&self) -> u32 {
        match self {
            BundleTier::SixMonth => 6,
            BundleTier::ThreeMonth => 3,
            BundleTier::OneMonth | BundleTier::Single => 1,
        }
    }

    pub fn duration_months(&self) -> u32 {
        self.price_multiplier()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundlePrice {
    pub original: Decimal,
    pub final_price: Decimal,
}

impl BundlePrice {
    pub const ZERO: BundlePrice = BundlePrice {
        original: Decimal::ZERO,
        final_price: Decimal::ZERO,
    };

    pub fn savings(&self) -> Decimal {
        self.original - self.final_price
    }
}

/// Price a tier from its line totals (each product plus its boosters).
///
/// Both prices are rounded to cents before the tier multiplier is applied.
pub fn price_tier<I>(tier: BundleTier, line_totals: I) -> BundlePrice
where
    I: IntoIterator<Item = Decimal>,
{
    let original: Decimal = line_totals.into_iter().sum();
    let keep = Decimal::ONE - Decimal::from(tier.discount_percent()) / Decimal::ONE_HUNDRED;
    let multiplier = Decimal::from(tier.price_multiplier());

    BundlePrice {
        original: round2(original) * multiplier,
        final_price: round2(original * keep) * multiplier,
    }
}

/// Monthly budget bracket picked in the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetRange {
    pub key: &'static str,
    pub min: u32,
    pub max: u32,
}

pub const BUDGET_RANGES: [BudgetRange; 4] = [
    BudgetRange { key: "0-50", min: 0, max: 50 },
    BudgetRange { key: "50-100", min: 50, max: 100 },
    BudgetRange { key: "100-200", min: 100, max: 200 },
    BudgetRange { key: "200+", min: 200, max: 999_999 },
];

const DEFAULT_BUDGET: BudgetRange = BUDGET_RANGES[2];

impl BudgetRange {
    /// Range for a quiz answer; unknown or missing answers get `100-200`.
    pub fn resolve(answer: Option<&str>) -> BudgetRange {
        answer
            .and_then(|key| BUDGET_RANGES.iter().find(|r| r.key == key.trim()))
            .copied()
            .unwrap_or(DEFAULT_BUDGET)
    }

    /// Whether a bundle's monthly cost stays within the bracket's maximum.
    pub fn fits(&self, final_price: Decimal, duration_months: u32) -> bool {
        let months = Decimal::from(duration_months.max(1));
        final_price / months <= Decimal::from(self.max)
    }
}

/// Guarantees shown with every recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incentives {
    pub free_shipping: bool,
    pub free_shipping_threshold: u32,
    /// Days
    pub money_back_guarantee: u32,
    pub bonus_samples: bool,
}

impl Default for Incentives {
    fn default() -> Self {
        Self {
            free_shipping: true,
            free_shipping_threshold: 100,
            money_back_guarantee: 90,
            bonus_samples: true,
        }
    }
}
