use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    CalculationInput, CalculationResult, ChartSeries, ProjectionError, RateUnit, Schedule,
    TimeUnit, ValidationError, build_input, generate_chart_series, generate_schedule,
    run_calculation,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRateUnit {
    Percent,
    Decimal,
}

impl From<CliRateUnit> for RateUnit {
    fn from(value: CliRateUnit) -> Self {
        match value {
            CliRateUnit::Percent => RateUnit::Percent,
            CliRateUnit::Decimal => RateUnit::Decimal,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTimeUnit {
    Years,
    Months,
}

impl From<CliTimeUnit> for TimeUnit {
    fn from(value: CliTimeUnit) -> Self {
        match value {
            CliTimeUnit::Years => TimeUnit::Years,
            CliTimeUnit::Months => TimeUnit::Months,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiRateUnit {
    #[serde(alias = "percentage", alias = "pct")]
    Percent,
    #[serde(alias = "fraction")]
    Decimal,
}

impl From<ApiRateUnit> for RateUnit {
    fn from(value: ApiRateUnit) -> Self {
        match value {
            ApiRateUnit::Percent => RateUnit::Percent,
            ApiRateUnit::Decimal => RateUnit::Decimal,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiTimeUnit {
    #[serde(alias = "year")]
    Years,
    #[serde(alias = "month")]
    Months,
}

impl From<ApiTimeUnit> for TimeUnit {
    fn from(value: ApiTimeUnit) -> Self {
        match value {
            ApiTimeUnit::Years => TimeUnit::Years,
            ApiTimeUnit::Months => TimeUnit::Months,
        }
    }
}

/// Raw calculation request as it arrives over the wire. Numeric fields stay
/// strings so the validator owns the empty/non-numeric policy; missing
/// fields fall through as empty and fail with "is required".
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    principal: Option<String>,
    rate: Option<String>,
    time: Option<String>,
    #[serde(alias = "compoundingPeriod", alias = "compounding_period")]
    compounding: Option<String>,
    #[serde(alias = "rate_unit", alias = "rateMode")]
    rate_unit: Option<ApiRateUnit>,
    #[serde(alias = "time_unit", alias = "timeMode")]
    time_unit: Option<ApiTimeUnit>,
}

/// One-shot calculation from the command line; raw values go through the
/// same validation pipeline as API payloads.
#[derive(Parser, Debug)]
#[command(
    name = "interest",
    about = "Interest projection calculator (simple + compound amortization and growth series)"
)]
pub struct Cli {
    #[arg(long, help = "Starting principal, e.g. 10000")]
    pub principal: String,
    #[arg(long, help = "Annual interest rate in the chosen unit, e.g. 5 or 0.05")]
    pub rate: String,
    #[arg(long, help = "Duration in the chosen unit, e.g. 3")]
    pub time: String,
    #[arg(
        long,
        default_value = "0",
        help = "Compounding events per year: 0 (simple), 1, 2, 4 or 12"
    )]
    pub compounding: String,
    #[arg(long, value_enum, default_value_t = CliRateUnit::Percent)]
    rate_unit: CliRateUnit,
    #[arg(long, value_enum, default_value_t = CliTimeUnit::Years)]
    time_unit: CliTimeUnit,
    #[arg(long, help = "Emit the full JSON response instead of a text table")]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    success: bool,
    principal: f64,
    rate: f64,
    time: f64,
    compounding_period: u32,
    compounding_label: &'static str,
    amount: f64,
    interest: f64,
    schedule: Schedule,
    chart: ChartSeries,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

fn calculation_input_from_payload(
    payload: CalculatePayload,
) -> Result<CalculationInput, ValidationError> {
    let rate_unit = payload.rate_unit.map_or(RateUnit::Percent, RateUnit::from);
    let time_unit = payload.time_unit.map_or(TimeUnit::Years, TimeUnit::from);
    build_input(
        payload.principal.as_deref().unwrap_or(""),
        payload.rate.as_deref().unwrap_or(""),
        payload.time.as_deref().unwrap_or(""),
        payload.compounding.as_deref().unwrap_or(""),
        rate_unit,
        time_unit,
    )
}

fn project(input: &CalculationInput) -> Result<CalculateResponse, ProjectionError> {
    let result = run_calculation(input);
    let schedule = generate_schedule(&result)?;
    let chart = generate_chart_series(&result)?;
    Ok(build_calculate_response(&result, schedule, chart))
}

fn build_calculate_response(
    result: &CalculationResult,
    schedule: Schedule,
    chart: ChartSeries,
) -> CalculateResponse {
    CalculateResponse {
        success: true,
        principal: result.principal,
        rate: result.rate,
        time: result.time,
        compounding_period: result.compounding.code(),
        compounding_label: result.compounding.display_name(),
        amount: result.amount,
        interest: result.interest,
        schedule,
        chart,
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Interest calculator HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_get_handler(Query(payload): Query<CalculatePayload>) -> Response {
    calculate_handler_impl(payload)
}

async fn calculate_post_handler(Json(payload): Json<CalculatePayload>) -> Response {
    calculate_handler_impl(payload)
}

fn calculate_handler_impl(payload: CalculatePayload) -> Response {
    let input = match calculation_input_from_payload(payload) {
        Ok(input) => input,
        Err(e) => return validation_error_response(&e),
    };

    match project(&input) {
        Ok(response) => json_response(StatusCode::OK, response),
        // Unreachable after validation, but a contract breach must surface
        // as a server fault, not a user input error.
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

/// Runs one validated calculation and renders it for stdout.
pub fn run_one_shot(cli: &Cli) -> Result<String, ValidationError> {
    let input = build_input(
        &cli.principal,
        &cli.rate,
        &cli.time,
        &cli.compounding,
        cli.rate_unit.into(),
        cli.time_unit.into(),
    )?;

    // Validated input cannot trip the projection preconditions.
    let response = match project(&input) {
        Ok(response) => response,
        Err(e) => {
            return Err(ValidationError::new("input", e.to_string()));
        }
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&response)
            .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":\"{e}\"}}"));
        return Ok(format!("{json}\n"));
    }

    Ok(render_text_report(&response))
}

fn render_text_report(response: &CalculateResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!("Principal:   ${:.2}\n", response.principal));
    out.push_str(&format!("Rate:        {:.2}%\n", response.rate * 100.0));
    out.push_str(&format!("Time:        {:.2} years\n", response.time));
    out.push_str(&format!("Compounding: {}\n", response.compounding_label));
    out.push_str(&format!("Amount:      ${:.2}\n", response.amount));
    out.push_str(&format!("Interest:    ${:.2}\n\n", response.interest));

    out.push_str(&format!(
        "{:<22} {:>14} {:>14}\n",
        "Period", "Interest", "Total"
    ));
    for row in &response.schedule.rows {
        out.push_str(&format!(
            "{:<22} {:>14.2} {:>14.2}\n",
            row.period_label, row.cumulative_interest, row.period_total
        ));
    }
    if response.schedule.truncated {
        out.push_str(&format!(
            "(schedule capped; {} periods requested)\n",
            response.schedule.total_periods
        ));
    }
    out
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            success: false,
            error: msg.to_string(),
            field: None,
        },
    )
}

fn validation_error_response(err: &ValidationError) -> Response {
    json_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse {
            success: false,
            error: err.to_string(),
            field: Some(err.field),
        },
    )
}

#[cfg(test)]
fn calculation_input_from_json(json: &str) -> Result<CalculationInput, String> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    calculation_input_from_payload(payload).map_err(|e| e.to_string())
}
