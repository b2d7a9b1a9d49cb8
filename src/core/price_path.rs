use super::error::{Result, SimulationError};
use super::rng::RandomSource;
use super::types::{MAX_DURATION_MONTHS, PricePath};

pub const PRICE_FLOOR: f64 = 10_000.0;
pub const PRICE_CEILING: f64 = 500_000.0;
const MAX_DRAWDOWN_FROM_START: f64 = 0.8;
const VOLATILITY_BAND: f64 = 0.2;

/// Builds a monthly price path that follows a straight line from the starting
/// price to its compounded target, with up to ±10% noise per month.
pub fn generate_price_path(
    starting_price: f64,
    annual_growth_percent: f64,
    duration_months: u32,
    rng: &mut impl RandomSource,
) -> Result<PricePath> {
    if duration_months == 0 || duration_months > MAX_DURATION_MONTHS {
        return Err(SimulationError::InvalidDuration(duration_months));
    }
    if !starting_price.is_finite() || starting_price <= 0.0 {
        return Err(SimulationError::InvalidStartingPrice(starting_price));
    }
    if !annual_growth_percent.is_finite() || annual_growth_percent < 0.0 {
        return Err(SimulationError::InvalidGrowthRate(annual_growth_percent));
    }

    let years = duration_months as f64 / 12.0;
    let target_final_price = starting_price * (1.0 + annual_growth_percent / 100.0).powf(years);
    let relative_floor = starting_price * MAX_DRAWDOWN_FROM_START;

    let mut prices = Vec::with_capacity(duration_months as usize);
    for month in 1..=duration_months {
        let progress = month as f64 / duration_months as f64;
        let glidepath = starting_price + (target_final_price - starting_price) * progress;
        let volatility = (rng.next_f64() - 0.5) * VOLATILITY_BAND;

        let noisy = (glidepath + glidepath * volatility).max(relative_floor);
        let bounded = noisy.min(PRICE_CEILING).max(PRICE_FLOOR);
        prices.push(bounded.round());
    }

    Ok(PricePath::new(prices))
}
