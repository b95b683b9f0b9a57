//! Parameter checks run before a node is constructed.
//!
//! Each check names the node and parameter it rejects so the error points
//! at the offending field of the record.
//!
//! ```rust
//! use amp_config::validation::{check_positive, check_ring};
//!
//! assert!(check_positive("synth", "voices", 4.0).is_ok());
//! assert!(check_positive("synth", "voices", 0.0).is_err());
//!
//! // Half a sample of delay cannot be held by a ring.
//! assert!(check_ring("reverb", "len", 0.5 / 48000.0, 48000.0).is_err());
//! ```

use amp_core::parse_key;

use crate::error::ConfigError;
use crate::record::{CtrlConfig, KeyConfig};

/// Result type for parameter checks.
pub type ValidationResult<T> = Result<T, ConfigError>;

/// Rejects values that are not finite and strictly positive.
pub fn check_positive(node: &str, param: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            node,
            param,
            format!("must be positive, got {value}"),
        ))
    }
}

/// Rejects values that are not finite or are negative.
pub fn check_non_negative(node: &str, param: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            node,
            param,
            format!("must not be negative, got {value}"),
        ))
    }
}

/// Rejects ring lengths that hold less than one sample at `rate`.
pub fn check_ring(node: &str, param: &str, seconds: f64, rate: f64) -> ValidationResult<()> {
    check_positive(node, param, seconds)?;
    if seconds * rate < 1.0 {
        return Err(ConfigError::invalid(
            node,
            param,
            format!("{seconds} s is shorter than one sample at {rate} Hz"),
        ));
    }
    Ok(())
}

/// Accepts no delay at all, or at least one sample of it.
pub fn check_delay(node: &str, param: &str, seconds: f64, rate: f64) -> ValidationResult<()> {
    if seconds == 0.0 {
        return Ok(());
    }
    check_ring(node, param, seconds, rate)
}

/// Rejects compressor ratios below 1.
pub fn check_ratio(node: &str, ratio: f32) -> ValidationResult<()> {
    if ratio.is_finite() && ratio >= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            node,
            "ratio",
            format!("must be at least 1, got {ratio}"),
        ))
    }
}

/// Rejects clip thresholds outside `(0, max]`.
pub fn check_clip(sat: f32, max: f32) -> ValidationResult<()> {
    if !(max.is_finite() && max > 0.0) {
        return Err(ConfigError::invalid(
            "clip",
            "max",
            format!("must be positive, got {max}"),
        ));
    }
    if !(sat > 0.0 && sat <= max) {
        return Err(ConfigError::invalid(
            "clip",
            "sat",
            format!("must lie in (0, {max}], got {sat}"),
        ));
    }
    Ok(())
}

/// Rejects exponential controls whose range touches or crosses zero.
pub fn check_ctrl(ctrl: &CtrlConfig) -> ValidationResult<()> {
    if ctrl.exp && ctrl.low <= 0.0 {
        return Err(ConfigError::invalid(
            "ctrl",
            "low",
            format!("must be positive on an exponential control, got {}", ctrl.low),
        ));
    }
    if ctrl.exp && ctrl.high <= 0.0 {
        return Err(ConfigError::invalid(
            "ctrl",
            "high",
            format!("must be positive on an exponential control, got {}", ctrl.high),
        ));
    }
    Ok(())
}

/// Rejects empty child lists.
pub fn check_non_empty<T>(node: &str, items: &[T]) -> ValidationResult<()> {
    if items.is_empty() {
        Err(ConfigError::EmptyContainer(node.to_string()))
    } else {
        Ok(())
    }
}

/// Resolves a key number or note name.
pub fn resolve_key(node: &str, key: &KeyConfig) -> ValidationResult<u16> {
    match key {
        KeyConfig::Num(k) => Ok(*k),
        KeyConfig::Name(name) => parse_key(name)
            .ok_or_else(|| ConfigError::invalid(node, "key", format!("unknown note '{name}'"))),
    }
}

/// Resolves a name through `lookup`, rejecting unknown names.
pub fn resolve_name<T>(
    node: &str,
    param: &str,
    name: &str,
    lookup: impl Fn(&str) -> Option<T>,
) -> ValidationResult<T> {
    lookup(name).ok_or_else(|| ConfigError::invalid(node, param, format!("unknown name '{name}'")))
}
