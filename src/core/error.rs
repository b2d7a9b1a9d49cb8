use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulationError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("periodic amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    #[error("duration must be between 1 and 240 months, got {0}")]
    InvalidDuration(u32),

    #[error("starting price must be a positive number, got {0}")]
    InvalidStartingPrice(f64),

    #[error("annual growth must be a non-negative number, got {0}")]
    InvalidGrowthRate(f64),

    #[error("replay produced no months to summarize")]
    EmptyReplay,

    #[error("insufficient balance: plan requires {required:.2}, available {available:.2}")]
    InsufficientBalance { required: f64, available: f64 },
}
