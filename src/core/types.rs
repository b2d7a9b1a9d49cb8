use serde::Serialize;

use super::error::{Result, SimulationError};

pub const MAX_DURATION_MONTHS: u32 = 240;
pub const DEFAULT_STARTING_PRICE: f64 = 47_000.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Purchases per month used to turn a periodic amount into a monthly one.
    pub fn periods_per_month(self) -> f64 {
        match self {
            Frequency::Daily => 30.44,
            Frequency::Weekly => 4.33,
            Frequency::Monthly => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyParameters {
    pub periodic_amount: f64,
    pub frequency: Frequency,
    pub duration_months: u32,
    pub annual_growth_percent: f64,
    pub starting_price: f64,
}

impl StrategyParameters {
    pub fn monthly_contribution(&self) -> f64 {
        self.periodic_amount * self.frequency.periods_per_month()
    }

    pub fn total_commitment(&self) -> f64 {
        self.monthly_contribution() * self.duration_months as f64
    }

    pub fn validate(&self) -> Result<()> {
        if !self.periodic_amount.is_finite() || self.periodic_amount <= 0.0 {
            return Err(SimulationError::InvalidAmount(self.periodic_amount));
        }
        if self.duration_months == 0 || self.duration_months > MAX_DURATION_MONTHS {
            return Err(SimulationError::InvalidDuration(self.duration_months));
        }
        if !self.starting_price.is_finite() || self.starting_price <= 0.0 {
            return Err(SimulationError::InvalidStartingPrice(self.starting_price));
        }
        if !self.annual_growth_percent.is_finite() || self.annual_growth_percent < 0.0 {
            return Err(SimulationError::InvalidGrowthRate(
                self.annual_growth_percent,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PricePath(Vec<f64>);

impl PricePath {
    pub fn new(prices: Vec<f64>) -> Self {
        Self(prices)
    }

    /// Price for a 1-based month index.
    pub fn price_for_month(&self, month: u32) -> Option<f64> {
        let index = (month as usize).checked_sub(1)?;
        self.0.get(index).copied()
    }

    pub fn prices(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyResult {
    pub month: u32,
    pub price: f64,
    pub amount_invested_this_month: f64,
    pub units_purchased_this_month: f64,
    pub cumulative_units: f64,
    pub cumulative_invested: f64,
    pub current_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub invested_total: f64,
    pub units_total: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
    pub frequency: Frequency,
    pub duration_months: u32,
    pub periodic_amount: f64,
    pub average_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewProjection {
    pub invested_total: f64,
    pub expected_final_value: f64,
    pub expected_profit: f64,
    #[serde(rename = "expectedROIPercent")]
    pub expected_roi_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub seed: Option<u64>,
    pub price_path: PricePath,
    pub months: Vec<MonthlyResult>,
    pub projection: Projection,
}
