use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    DEFAULT_STARTING_PRICE, Frequency, MAX_DURATION_MONTHS, MonthlyResult, PreviewProjection,
    Projection, SimulationOutcome, StrategyParameters, check_affordability, preview,
    run_seeded_simulation,
};

const MAX_ANNUAL_GROWTH_PERCENT: f64 = 1_000.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl From<CliFrequency> for Frequency {
    fn from(value: CliFrequency) -> Self {
        match value {
            CliFrequency::Daily => Frequency::Daily,
            CliFrequency::Weekly => Frequency::Weekly,
            CliFrequency::Monthly => Frequency::Monthly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiFrequency {
    #[serde(alias = "DAILY", alias = "Daily")]
    Daily,
    #[serde(alias = "WEEKLY", alias = "Weekly")]
    Weekly,
    #[serde(alias = "MONTHLY", alias = "Monthly")]
    Monthly,
}

impl From<ApiFrequency> for CliFrequency {
    fn from(value: ApiFrequency) -> Self {
        match value {
            ApiFrequency::Daily => CliFrequency::Daily,
            ApiFrequency::Weekly => CliFrequency::Weekly,
            ApiFrequency::Monthly => CliFrequency::Monthly,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    #[serde(alias = "periodicAmount")]
    amount: Option<f64>,
    frequency: Option<ApiFrequency>,
    #[serde(alias = "duration")]
    duration_months: Option<u32>,
    #[serde(alias = "annualGrowthPercent")]
    annual_growth: Option<f64>,
    #[serde(alias = "spotPrice")]
    starting_price: Option<f64>,
    seed: Option<u64>,
    available_balance: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[arg(long, help = "Fiat amount bought each period")]
    pub amount: f64,
    #[arg(long, value_enum, default_value_t = CliFrequency::Monthly)]
    pub frequency: CliFrequency,
    #[arg(
        long,
        default_value_t = 12,
        help = "Simulation horizon in months (1-240)"
    )]
    pub duration_months: u32,
    #[arg(
        long,
        default_value_t = 25.0,
        help = "Assumed annual price growth in percent, e.g. 25"
    )]
    pub annual_growth: f64,
    #[arg(
        long,
        help = "Spot price at the start of the plan; defaults to 47000 when unknown"
    )]
    pub starting_price: Option<f64>,
    #[arg(long, help = "Seed for a reproducible price path")]
    pub seed: Option<u64>,
    #[arg(
        long,
        help = "Fiat balance available; the plan is rejected if it needs more"
    )]
    pub available_balance: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct ApiRequest {
    pub params: StrategyParameters,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    seed: Option<u64>,
    frequency: Frequency,
    duration_months: u32,
    periodic_amount: f64,
    starting_price: f64,
    annual_growth_percent: f64,
    price_path: Vec<f64>,
    months: Vec<MonthlyResult>,
    projection: Projection,
    preview: PreviewProjection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    frequency: Frequency,
    duration_months: u32,
    periodic_amount: f64,
    starting_price: f64,
    annual_growth_percent: f64,
    #[serde(flatten)]
    preview: PreviewProjection,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn build_request(args: SimulateArgs) -> Result<ApiRequest, String> {
    if !args.amount.is_finite() || args.amount <= 0.0 {
        return Err("--amount must be > 0".to_string());
    }
    if args.duration_months == 0 || args.duration_months > MAX_DURATION_MONTHS {
        return Err(format!(
            "--duration-months must be between 1 and {MAX_DURATION_MONTHS}"
        ));
    }
    if !(0.0..=MAX_ANNUAL_GROWTH_PERCENT).contains(&args.annual_growth) {
        return Err(format!(
            "--annual-growth must be between 0 and {MAX_ANNUAL_GROWTH_PERCENT}"
        ));
    }
    let starting_price = args.starting_price.unwrap_or(DEFAULT_STARTING_PRICE);
    if !starting_price.is_finite() || starting_price <= 0.0 {
        return Err("--starting-price must be > 0".to_string());
    }
    if let Some(balance) = args.available_balance {
        if !balance.is_finite() || balance < 0.0 {
            return Err("--available-balance must be >= 0".to_string());
        }
    }

    let params = StrategyParameters {
        periodic_amount: args.amount,
        frequency: args.frequency.into(),
        duration_months: args.duration_months,
        annual_growth_percent: args.annual_growth,
        starting_price,
    };
    if let Some(balance) = args.available_balance {
        check_affordability(&params, balance).map_err(|e| e.to_string())?;
    }

    Ok(ApiRequest {
        params,
        seed: args.seed,
    })
}

pub fn simulate(request: &ApiRequest) -> Result<SimulateResponse, String> {
    let outcome = run_seeded_simulation(&request.params, request.seed).map_err(|e| e.to_string())?;
    let quick_estimate = preview(&request.params);
    Ok(build_simulate_response(&request.params, outcome, quick_estimate))
}

pub fn preview_only(request: &ApiRequest) -> PreviewResponse {
    let params = &request.params;
    PreviewResponse {
        frequency: params.frequency,
        duration_months: params.duration_months,
        periodic_amount: params.periodic_amount,
        starting_price: params.starting_price,
        annual_growth_percent: params.annual_growth_percent,
        preview: preview(params),
    }
}

fn build_simulate_response(
    params: &StrategyParameters,
    outcome: SimulationOutcome,
    quick_estimate: PreviewProjection,
) -> SimulateResponse {
    SimulateResponse {
        seed: outcome.seed,
        frequency: params.frequency,
        duration_months: params.duration_months,
        periodic_amount: params.periodic_amount,
        starting_price: params.starting_price,
        annual_growth_percent: params.annual_growth_percent,
        price_path: outcome.price_path.prices().to_vec(),
        months: outcome.months,
        projection: outcome.projection,
        preview: quick_estimate,
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route(
            "/api/preview",
            get(preview_get_handler).post(preview_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("DCA simulation API listening on http://{addr}");
    axum::serve(listener, app()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(payload: Result<Query<SimulatePayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => rejection_response(&rejection.body_text()),
    }
}

async fn simulate_post_handler(payload: Result<Json<SimulatePayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => rejection_response(&rejection.body_text()),
    }
}

async fn preview_get_handler(payload: Result<Query<SimulatePayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => preview_handler_impl(payload).await,
        Err(rejection) => rejection_response(&rejection.body_text()),
    }
}

async fn preview_post_handler(payload: Result<Json<SimulatePayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => preview_handler_impl(payload).await,
        Err(rejection) => rejection_response(&rejection.body_text()),
    }
}

fn rejection_response(msg: &str) -> Response {
    warn!(error = %msg, "rejected malformed request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            warn!(error = %msg, "rejected simulation request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match simulate(&request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn preview_handler_impl(payload: SimulatePayload) -> Response {
    match api_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, preview_only(&request)),
        Err(msg) => {
            warn!(error = %msg, "rejected preview request");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest, String> {
    let mut args = default_args_for_api();

    if let Some(v) = payload.amount {
        args.amount = v;
    }
    if let Some(v) = payload.frequency {
        args.frequency = v.into();
    }
    if let Some(v) = payload.duration_months {
        args.duration_months = v;
    }
    if let Some(v) = payload.annual_growth {
        args.annual_growth = v;
    }
    if let Some(v) = payload.starting_price {
        args.starting_price = Some(v);
    }
    if let Some(v) = payload.seed {
        args.seed = Some(v);
    }
    if let Some(v) = payload.available_balance {
        args.available_balance = Some(v);
    }

    build_request(args)
}

fn default_args_for_api() -> SimulateArgs {
    SimulateArgs {
        amount: 100.0,
        frequency: CliFrequency::Monthly,
        duration_months: 12,
        annual_growth: 25.0,
        starting_price: None,
        seed: None,
        available_balance: None,
    }
}
