mod engine;
mod normalize;
mod types;

pub use engine::{
    MAX_CHART_MONTHS, MAX_SCHEDULE_ROWS, amount_at, generate_chart_series, generate_schedule,
    result_from_remote, run_calculation,
};
pub use normalize::{
    RateUnit, TimeUnit, build_input, normalize_rate, normalize_time, validate_compounding,
    validate_principal, validate_rate, validate_time,
};
pub use types::{
    CalculationInput, CalculationResult, ChartPoint, ChartSeries, CompoundingPeriod,
    ProjectionError, Schedule, ScheduleRow, ValidationError,
};
