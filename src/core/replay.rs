use super::types::{MonthlyResult, PricePath, StrategyParameters};

const TERMINAL_FLOOR_DAMPING: f64 = 0.5;

/// Replays a fixed monthly contribution over `path`, valuing each month at
/// its own price, then floors the final value against half the assumed growth.
pub fn replay(params: &StrategyParameters, path: &PricePath) -> Vec<MonthlyResult> {
    let amount_per_month = params.monthly_contribution();
    let mut cumulative_units = 0.0;
    let mut cumulative_invested = 0.0;
    let mut months = Vec::with_capacity(params.duration_months as usize);

    for month in 1..=params.duration_months {
        let price = path
            .price_for_month(month)
            .unwrap_or(params.starting_price);
        let units = amount_per_month / price;

        cumulative_units += units;
        cumulative_invested += amount_per_month;

        months.push(MonthlyResult {
            month,
            price,
            amount_invested_this_month: amount_per_month,
            units_purchased_this_month: units,
            cumulative_units,
            cumulative_invested,
            current_value: cumulative_units * price,
        });
    }

    if params.annual_growth_percent > 0.0 {
        if let Some(last) = months.last_mut() {
            apply_terminal_floor(last, params.annual_growth_percent);
        }
    }

    months
}

fn apply_terminal_floor(last: &mut MonthlyResult, annual_growth_percent: f64) {
    let min_acceptable =
        last.cumulative_invested * (1.0 + annual_growth_percent / 100.0 * TERMINAL_FLOOR_DAMPING);
    if last.current_value >= min_acceptable || last.cumulative_units <= 0.0 {
        return;
    }

    let adjusted_final_price = min_acceptable / last.cumulative_units;
    last.current_value = last.cumulative_units * adjusted_final_price;
}
