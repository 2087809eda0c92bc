//! Load-time validation of numeric configuration.
//!
//! Runtime operations never fail on bad numbers; they clamp. Anything that
//! could break an invariant later (a capacity above the safe total, a
//! non-positive heating rate) is rejected here, once, when the configuration
//! is read.

use crate::mixture::MAX_SAFE_TOTAL;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field}: capacity {value} outside (0, {MAX_SAFE_TOTAL}]")]
    InvalidCapacity { field: String, value: f64 },
    #[error("{field}: rate {value} must be positive")]
    NonPositiveRate { field: String, value: f64 },
    #[error("{field}: value {value} must be finite and non-negative")]
    InvalidValue { field: String, value: f64 },
    #[error("{field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Check a mixture capacity against the anti-duplication ceiling.
pub fn validate_capacity(field: &str, value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 && value <= MAX_SAFE_TOTAL {
        Ok(value)
    } else {
        Err(ConfigError::InvalidCapacity {
            field: field.to_string(),
            value,
        })
    }
}

/// Check that a heating or cooling rate is strictly positive and finite.
pub fn validate_rate(field: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositiveRate {
            field: field.to_string(),
            value,
        })
    }
}

/// Check a heating/cooling rate pair.
pub fn validate_rates(heating_rate: f64, cooling_rate: f64) -> Result<(), ConfigError> {
    validate_rate("heating_rate", heating_rate)?;
    validate_rate("cooling_rate", cooling_rate)?;
    Ok(())
}

/// Check a temperature, modifier or similar quantity that may be zero.
pub fn validate_non_negative(field: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_bounds() {
        assert_eq!(validate_capacity("c", 4000.0), Ok(4000.0));
        assert_eq!(validate_capacity("c", MAX_SAFE_TOTAL), Ok(MAX_SAFE_TOTAL));
        assert!(validate_capacity("c", 0.0).is_err());
        assert!(validate_capacity("c", -1.0).is_err());
        assert!(validate_capacity("c", MAX_SAFE_TOTAL + 1.0).is_err());
        assert!(validate_capacity("c", f64::NAN).is_err());
    }

    #[test]
    fn capacity_error_names_field() {
        let err = validate_capacity("crucible.capacity", 0.0).unwrap_err();
        assert!(err.to_string().starts_with("crucible.capacity"));
    }

    #[test]
    fn rates_must_be_positive() {
        assert!(validate_rates(2.0, 1.0).is_ok());
        assert!(matches!(
            validate_rates(0.0, 1.0),
            Err(ConfigError::NonPositiveRate { .. })
        ));
        assert!(validate_rates(1.0, -0.5).is_err());
        assert!(validate_rates(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn non_negative_allows_zero() {
        assert_eq!(validate_non_negative("baseline", 0.0), Ok(0.0));
        assert!(validate_non_negative("baseline", -0.1).is_err());
    }
}
