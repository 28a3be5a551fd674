use super::types::{CalculationInput, CompoundingPeriod, ValidationError};

/// Unit the rate field is entered in. `Percent` means "5" is five percent;
/// `Decimal` means "0.05" is five percent.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RateUnit {
    Percent,
    Decimal,
}

/// Unit the time field is entered in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimeUnit {
    Years,
    Months,
}

const MAX_PRINCIPAL: f64 = 1_000_000_000.0;
const MAX_TIME_YEARS: f64 = 100.0;

/// Converts a raw rate value into the canonical decimal annual fraction.
pub fn normalize_rate(raw: f64, unit: RateUnit) -> f64 {
    match unit {
        RateUnit::Percent => raw / 100.0,
        RateUnit::Decimal => raw,
    }
}

/// Converts a raw time value into canonical fractional years.
pub fn normalize_time(raw: f64, unit: TimeUnit) -> f64 {
    match unit {
        TimeUnit::Years => raw,
        TimeUnit::Months => raw / 12.0,
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::new(field, "must be a number")),
    }
}

pub fn validate_principal(raw: &str) -> Result<f64, ValidationError> {
    let value = parse_number("principal", raw)?;
    if value <= 0.0 {
        return Err(ValidationError::new("principal", "must be greater than 0"));
    }
    if value > MAX_PRINCIPAL {
        return Err(ValidationError::new(
            "principal",
            "cannot exceed 1,000,000,000",
        ));
    }
    Ok(value)
}

/// Validates the raw rate and returns it in canonical decimal form. The
/// ceiling is 100% in both units: raw > 100 fails in percent mode, raw > 1
/// fails in decimal mode.
pub fn validate_rate(raw: &str, unit: RateUnit) -> Result<f64, ValidationError> {
    let value = parse_number("rate", raw)?;
    if value <= 0.0 {
        return Err(ValidationError::new("rate", "must be greater than 0"));
    }
    match unit {
        RateUnit::Percent if value > 100.0 => {
            return Err(ValidationError::new("rate", "cannot exceed 100%"));
        }
        RateUnit::Decimal if value > 1.0 => {
            return Err(ValidationError::new(
                "rate",
                "cannot exceed 1 (100%) in decimal mode",
            ));
        }
        _ => {}
    }
    Ok(normalize_rate(value, unit))
}

/// Validates the raw time and returns canonical years. The 100-year ceiling
/// applies after normalization, so 1200 months passes and 1201 fails.
pub fn validate_time(raw: &str, unit: TimeUnit) -> Result<f64, ValidationError> {
    let value = parse_number("time", raw)?;
    if value <= 0.0 {
        return Err(ValidationError::new("time", "must be greater than 0"));
    }
    let years = normalize_time(value, unit);
    if years > MAX_TIME_YEARS {
        return Err(ValidationError::new("time", "cannot exceed 100 years"));
    }
    Ok(years)
}

/// Validates the compounding selector against the closed code set. Anything
/// outside {0, 1, 2, 4, 12} is rejected here, never coerced to a formula.
pub fn validate_compounding(raw: &str) -> Result<CompoundingPeriod, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("compounding", "is required"));
    }
    let code = trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::new("compounding", "must be a whole number"))?;
    CompoundingPeriod::from_code(code).ok_or_else(|| {
        ValidationError::new(
            "compounding",
            "must be one of 0 (simple), 1, 2, 4 or 12",
        )
    })
}

/// Runs the full validation pipeline over raw field values and produces a
/// canonical input. The first failing field wins, in form order.
pub fn build_input(
    principal: &str,
    rate: &str,
    time: &str,
    compounding: &str,
    rate_unit: RateUnit,
    time_unit: TimeUnit,
) -> Result<CalculationInput, ValidationError> {
    let principal = validate_principal(principal)?;
    let rate = validate_rate(rate, rate_unit)?;
    let time = validate_time(time, time_unit)?;
    let compounding = validate_compounding(compounding)?;
    Ok(CalculationInput {
        principal,
        rate,
        time,
        compounding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn normalize_rate_divides_by_100_in_percent_mode_only() {
        assert_approx(normalize_rate(5.0, RateUnit::Percent), 0.05);
        assert_approx(normalize_rate(0.05, RateUnit::Decimal), 0.05);
    }

    #[test]
    fn normalize_time_divides_by_12_in_months_mode_only() {
        assert_approx(normalize_time(18.0, TimeUnit::Months), 1.5);
        assert_approx(normalize_time(1.5, TimeUnit::Years), 1.5);
    }

    #[test]
    fn validate_principal_accepts_upper_bound_and_rejects_just_above() {
        assert_approx(
            validate_principal("1000000000").expect("bound is valid"),
            1_000_000_000.0,
        );
        let err = validate_principal("1000000001").expect_err("must reject above bound");
        assert_eq!(err.field, "principal");
    }

    #[test]
    fn validate_principal_rejects_empty_nonnumeric_and_nonpositive() {
        assert!(validate_principal("").is_err());
        assert!(validate_principal("   ").is_err());
        assert!(validate_principal("ten").is_err());
        assert!(validate_principal("0").is_err());
        assert!(validate_principal("-50").is_err());
    }

    #[test]
    fn validate_principal_rejects_nonfinite_input() {
        assert!(validate_principal("inf").is_err());
        assert!(validate_principal("NaN").is_err());
        assert!(validate_principal("1e999").is_err());
    }

    #[test]
    fn validate_rate_percent_mode_boundary() {
        assert_approx(
            validate_rate("100", RateUnit::Percent).expect("100% is valid"),
            1.0,
        );
        let err = validate_rate("100.0001", RateUnit::Percent).expect_err("must reject > 100");
        assert_eq!(err.field, "rate");
    }

    #[test]
    fn validate_rate_decimal_mode_boundary() {
        assert_approx(
            validate_rate("1", RateUnit::Decimal).expect("1.0 is valid"),
            1.0,
        );
        assert!(validate_rate("1.0001", RateUnit::Decimal).is_err());
    }

    #[test]
    fn validate_rate_returns_canonical_decimal() {
        assert_approx(
            validate_rate("5", RateUnit::Percent).expect("valid"),
            0.05,
        );
        assert_approx(
            validate_rate("0.05", RateUnit::Decimal).expect("valid"),
            0.05,
        );
    }

    #[test]
    fn validate_rate_rejects_empty_and_nonpositive() {
        assert!(validate_rate("", RateUnit::Percent).is_err());
        assert!(validate_rate("0", RateUnit::Percent).is_err());
        assert!(validate_rate("-5", RateUnit::Decimal).is_err());
        assert!(validate_rate("abc", RateUnit::Percent).is_err());
    }

    #[test]
    fn validate_time_boundary_in_years() {
        assert_approx(validate_time("100", TimeUnit::Years).expect("valid"), 100.0);
        assert!(validate_time("100.0001", TimeUnit::Years).is_err());
    }

    #[test]
    fn validate_time_ceiling_applies_after_month_conversion() {
        assert_approx(
            validate_time("1200", TimeUnit::Months).expect("1200 months is 100 years"),
            100.0,
        );
        assert!(validate_time("1201", TimeUnit::Months).is_err());
    }

    #[test]
    fn validate_time_rejects_empty_and_nonpositive() {
        assert!(validate_time("", TimeUnit::Years).is_err());
        assert!(validate_time("0", TimeUnit::Years).is_err());
        assert!(validate_time("-1", TimeUnit::Months).is_err());
    }

    #[test]
    fn validate_compounding_accepts_the_closed_code_set() {
        assert_eq!(
            validate_compounding("0").expect("valid"),
            CompoundingPeriod::Simple
        );
        assert_eq!(
            validate_compounding("1").expect("valid"),
            CompoundingPeriod::Annual
        );
        assert_eq!(
            validate_compounding("2").expect("valid"),
            CompoundingPeriod::SemiAnnual
        );
        assert_eq!(
            validate_compounding("4").expect("valid"),
            CompoundingPeriod::Quarterly
        );
        assert_eq!(
            validate_compounding("12").expect("valid"),
            CompoundingPeriod::Monthly
        );
    }

    #[test]
    fn validate_compounding_rejects_codes_outside_the_set() {
        for raw in ["3", "6", "365", "-1", "1.5", "", "monthly"] {
            let err = validate_compounding(raw).expect_err("must reject");
            assert_eq!(err.field, "compounding");
        }
    }

    #[test]
    fn build_input_produces_canonical_units() {
        let input = build_input("10000", "5", "18", "12", RateUnit::Percent, TimeUnit::Months)
            .expect("valid input");
        assert_approx(input.principal, 10_000.0);
        assert_approx(input.rate, 0.05);
        assert_approx(input.time, 1.5);
        assert_eq!(input.compounding, CompoundingPeriod::Monthly);
    }

    #[test]
    fn build_input_reports_first_failing_field_in_form_order() {
        let err = build_input("", "", "", "", RateUnit::Percent, TimeUnit::Years)
            .expect_err("must reject");
        assert_eq!(err.field, "principal");

        let err = build_input("100", "", "", "", RateUnit::Percent, TimeUnit::Years)
            .expect_err("must reject");
        assert_eq!(err.field, "rate");

        let err = build_input("100", "5", "", "", RateUnit::Percent, TimeUnit::Years)
            .expect_err("must reject");
        assert_eq!(err.field, "time");

        let err = build_input("100", "5", "2", "7", RateUnit::Percent, TimeUnit::Years)
            .expect_err("must reject");
        assert_eq!(err.field, "compounding");
    }
}
