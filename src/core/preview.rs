use super::types::{PreviewProjection, StrategyParameters};

/// Smooth-growth estimate that never reports a loss. Purchases are assumed to
/// average out at the geometric mean of the starting and final price.
pub fn preview(params: &StrategyParameters) -> PreviewProjection {
    let invested_total = params.total_commitment();
    let duration_years = params.duration_months as f64 / 12.0;
    let growth_multiple = (1.0 + params.annual_growth_percent / 100.0).powf(duration_years);

    let final_price = params.starting_price * growth_multiple;
    let average_purchase_price = params.starting_price * growth_multiple.sqrt();
    let units_total = invested_total / average_purchase_price;
    let expected_final_value = units_total * final_price;

    let gain = expected_final_value - invested_total;
    let expected_roi_percent = if invested_total > 0.0 {
        (gain / invested_total * 100.0).max(0.0)
    } else {
        0.0
    };

    PreviewProjection {
        invested_total,
        expected_final_value,
        expected_profit: gain.max(0.0),
        expected_roi_percent,
    }
}
