use super::types::{
    CalculationInput, CalculationResult, ChartPoint, ChartSeries, CompoundingPeriod,
    ProjectionError, Schedule, ScheduleRow,
};

/// Amortization tables are capped at this many rows; longer schedules get a
/// terminal marker row instead of the remaining periods.
pub const MAX_SCHEDULE_ROWS: u32 = 100;

/// Chart series are sampled monthly and capped at ten years of points.
pub const MAX_CHART_MONTHS: u32 = 120;

/// Balance at `t_years` under the input's formula.
///
/// Simple (n = 0):   A = P(1 + rt)
/// Compound (n > 0): A = P(1 + r/n)^(nt)
pub fn amount_at(input: &CalculationInput, t_years: f64) -> f64 {
    match input.compounding.events_per_year() {
        0 => input.principal * (1.0 + input.rate * t_years),
        n => {
            let n = n as f64;
            input.principal * (1.0 + input.rate / n).powf(n * t_years)
        }
    }
}

/// Produces the headline amount/interest pair for a validated input. This is
/// the calculation the HTTP endpoint serves; schedule and chart derivation
/// trust its output rather than recomputing the headline figures.
pub fn run_calculation(input: &CalculationInput) -> CalculationResult {
    let amount = amount_at(input, input.time);
    CalculationResult {
        principal: input.principal,
        rate: input.rate,
        time: input.time,
        compounding: input.compounding,
        amount,
        interest: amount - input.principal,
    }
}

/// Rebuilds a `CalculationResult` from the fields of a remote calculation
/// response. The compounding code is checked against the closed set here;
/// an out-of-set code is a contract breach, not a user input error.
pub fn result_from_remote(
    principal: f64,
    rate: f64,
    time: f64,
    amount: f64,
    interest: f64,
    compounding_code: u32,
) -> Result<CalculationResult, ProjectionError> {
    let compounding = CompoundingPeriod::from_code(compounding_code)
        .ok_or(ProjectionError::UnknownCompoundingCode(compounding_code))?;
    let result = CalculationResult {
        principal,
        rate,
        time,
        compounding,
        amount,
        interest,
    };
    check_preconditions(&result)?;
    Ok(result)
}

fn check_preconditions(result: &CalculationResult) -> Result<(), ProjectionError> {
    if !result.principal.is_finite() || result.principal <= 0.0 {
        return Err(ProjectionError::NonPositivePrincipal(result.principal));
    }
    if !result.time.is_finite() || result.time <= 0.0 {
        return Err(ProjectionError::NonPositiveTime(result.time));
    }
    Ok(())
}

fn period_label(compounding: CompoundingPeriod, k: u32) -> String {
    match compounding {
        CompoundingPeriod::Simple | CompoundingPeriod::Annual => format!("Year {k}"),
        CompoundingPeriod::SemiAnnual => format!("H{k} (Y{})", k.div_ceil(2)),
        CompoundingPeriod::Quarterly => format!("Q{k} (Y{})", k.div_ceil(4)),
        CompoundingPeriod::Monthly => format!("Month {k} (Y{})", k.div_ceil(12)),
    }
}

/// Derives the period-by-period amortization schedule for a calculation.
///
/// Simple interest emits one row per whole year up to ceil(time); the final
/// row of a fractional year keeps the integer year multiplier, matching the
/// served calculation's documented behavior. Compound schedules walk the
/// running balance one period at a time and cap at [`MAX_SCHEDULE_ROWS`],
/// appending a terminal marker row when periods were cut.
pub fn generate_schedule(result: &CalculationResult) -> Result<Schedule, ProjectionError> {
    check_preconditions(result)?;

    let principal = result.principal;
    match result.compounding.events_per_year() {
        0 => {
            let year_count = result.time.ceil() as u32;
            let mut rows = Vec::with_capacity(year_count as usize);
            for year in 1..=year_count {
                // Interest for a partial final year still uses the whole
                // year index, not the fractional remainder.
                let cumulative_interest = principal * result.rate * year as f64;
                rows.push(ScheduleRow {
                    period_label: period_label(result.compounding, year),
                    principal_at_open: principal,
                    cumulative_interest,
                    period_total: principal + cumulative_interest,
                });
                if year as f64 >= result.time {
                    break;
                }
            }
            Ok(Schedule {
                rows,
                total_periods: year_count,
                truncated: false,
            })
        }
        n => {
            let rate_per_period = result.rate / n as f64;
            let total_periods = (result.time * n as f64).ceil() as u32;
            let emitted = total_periods.min(MAX_SCHEDULE_ROWS);
            let truncated = total_periods > MAX_SCHEDULE_ROWS;

            let mut rows = Vec::with_capacity(emitted as usize + usize::from(truncated));
            let mut running_total = principal;
            for k in 1..=emitted {
                running_total *= 1.0 + rate_per_period;
                rows.push(ScheduleRow {
                    period_label: period_label(result.compounding, k),
                    principal_at_open: principal,
                    cumulative_interest: running_total - principal,
                    period_total: running_total,
                });
            }
            if truncated {
                rows.push(ScheduleRow {
                    period_label: format!(
                        "Showing first {MAX_SCHEDULE_ROWS} of {total_periods} periods"
                    ),
                    principal_at_open: principal,
                    cumulative_interest: running_total - principal,
                    period_total: running_total,
                });
            }
            Ok(Schedule {
                rows,
                total_periods,
                truncated,
            })
        }
    }
}

/// Samples the growth curve monthly from month 0 through
/// min(ceil(time * 12), [`MAX_CHART_MONTHS`]) inclusive. Labeling cadence is
/// the front-end's concern; this is data only.
pub fn generate_chart_series(result: &CalculationResult) -> Result<ChartSeries, ProjectionError> {
    check_preconditions(result)?;

    let input = result.input();
    let requested_months = (result.time * 12.0).ceil() as u32;
    let month_count = requested_months.min(MAX_CHART_MONTHS);

    let points = (0..=month_count)
        .map(|i| ChartPoint {
            month_index: i,
            principal_value: result.principal,
            total_value: amount_at(&input, f64::from(i) / 12.0),
        })
        .collect();

    Ok(ChartSeries {
        points,
        truncated: requested_months > MAX_CHART_MONTHS,
    })
}
