mod engine;
mod error;
mod preview;
mod price_path;
mod replay;
mod rng;
mod types;

pub use engine::{check_affordability, run_seeded_simulation, run_simulation, summarize};
pub use error::{Result, SimulationError};
pub use preview::preview;
pub use price_path::{PRICE_CEILING, PRICE_FLOOR, generate_price_path};
pub use replay::replay;
pub use rng::{RandomSource, SeededRng, fresh_seed};
pub use types::{
    DEFAULT_STARTING_PRICE, Frequency, MAX_DURATION_MONTHS, MonthlyResult, PreviewProjection,
    PricePath, Projection, SimulationOutcome, StrategyParameters,
};
