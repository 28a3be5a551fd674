use std::fmt;

use serde::Serialize;

/// Number of compounding events per year. `Simple` (code 0) selects the
/// simple-interest formula; everything else compounds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CompoundingPeriod {
    Simple,
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl CompoundingPeriod {
    /// Maps the wire code onto the closed set {0, 1, 2, 4, 12}. Unknown
    /// codes are rejected here rather than falling back to a formula.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(CompoundingPeriod::Simple),
            1 => Some(CompoundingPeriod::Annual),
            2 => Some(CompoundingPeriod::SemiAnnual),
            4 => Some(CompoundingPeriod::Quarterly),
            12 => Some(CompoundingPeriod::Monthly),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            CompoundingPeriod::Simple => 0,
            CompoundingPeriod::Annual => 1,
            CompoundingPeriod::SemiAnnual => 2,
            CompoundingPeriod::Quarterly => 4,
            CompoundingPeriod::Monthly => 12,
        }
    }

    /// Compounding events per year; zero for simple interest.
    pub fn events_per_year(self) -> u32 {
        self.code()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CompoundingPeriod::Simple => "Simple Interest",
            CompoundingPeriod::Annual => "Annual",
            CompoundingPeriod::SemiAnnual => "Semi-Annual",
            CompoundingPeriod::Quarterly => "Quarterly",
            CompoundingPeriod::Monthly => "Monthly",
        }
    }
}

/// Validated calculation input in canonical units: decimal annual rate and
/// fractional years. Unit conversion happens in the normalizer, never here.
#[derive(Debug, Clone, Copy)]
pub struct CalculationInput {
    pub principal: f64,
    pub rate: f64,
    pub time: f64,
    pub compounding: CompoundingPeriod,
}

/// Headline calculation outcome. `amount = principal + interest` holds by
/// construction; the two are never rounded independently.
#[derive(Debug, Clone, Copy)]
pub struct CalculationResult {
    pub principal: f64,
    pub rate: f64,
    pub time: f64,
    pub compounding: CompoundingPeriod,
    pub amount: f64,
    pub interest: f64,
}

impl CalculationResult {
    pub fn input(&self) -> CalculationInput {
        CalculationInput {
            principal: self.principal,
            rate: self.rate,
            time: self.time,
            compounding: self.compounding,
        }
    }
}

/// One period's snapshot in the amortization table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub period_label: String,
    pub principal_at_open: f64,
    pub cumulative_interest: f64,
    pub period_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    pub total_periods: u32,
    pub truncated: bool,
}

/// One monthly sample of the growth curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub month_index: u32,
    pub principal_value: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    pub truncated: bool,
}

/// A field-scoped input rejection. Always recoverable; the caller renders
/// the message next to the offending field and blocks submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A contract breach between the engine and its caller: the projection
/// functions were handed structurally invalid data. Distinct from
/// `ValidationError` so a malformed upstream result is never mistaken for
/// user input error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    NonPositivePrincipal(f64),
    NonPositiveTime(f64),
    UnknownCompoundingCode(u32),
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::NonPositivePrincipal(v) => {
                write!(
                    f,
                    "projection precondition violated: principal must be > 0, got {v}"
                )
            }
            ProjectionError::NonPositiveTime(v) => {
                write!(
                    f,
                    "projection precondition violated: time must be > 0, got {v}"
                )
            }
            ProjectionError::UnknownCompoundingCode(code) => {
                write!(
                    f,
                    "projection precondition violated: compounding code {code} is not one of 0, 1, 2, 4, 12"
                )
            }
        }
    }
}
