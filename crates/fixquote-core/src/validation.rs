//! # Validation Module
//!
//! Admission checks for manually typed entries.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Admission Boundary                                 │
//! │                                                                         │
//! │  Typed input ("R$ 1.250,00", "Pump", "90")                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  THIS MODULE: parse + check                                             │
//! │  ├── amounts → Money, must be > 0                                       │
//! │  ├── names → trimmed, non-empty, bounded                                │
//! │  └── warranty days → bounded                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  ManualService / ManualPart constructors                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Selection (only ever holds admitted values)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fixquote_core::validation::parse_brl;
//!
//! assert_eq!(parse_brl("cost", "R$ 1.250,90").unwrap().cents(), 125090);
//! assert!(parse_brl("cost", "0").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted entry name.
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted warranty, in days (ten years).
pub const MAX_WARRANTY_DAYS: u32 = 3650;

// =============================================================================
// String Validators
// =============================================================================

/// Validates and trims a manual entry name.
///
/// ```rust
/// use fixquote_core::validation::validate_entry_name;
///
/// assert_eq!(validate_entry_name("  Door seal ").unwrap(), "Door seal");
/// assert!(validate_entry_name("   ").is_err());
/// ```
pub fn validate_entry_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an already-parsed amount for a manual entry.
///
/// ## Rules
/// - Must be positive (> 0). A free manual entry is never admitted.
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<Money> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(amount)
}

/// Validates a warranty length in days.
pub fn validate_warranty_days(days: u32) -> ValidationResult<u32> {
    if days > MAX_WARRANTY_DAYS {
        return Err(ValidationError::OutOfRange {
            field: "warranty_days".to_string(),
            min: 0,
            max: MAX_WARRANTY_DAYS as i64,
        });
    }
    Ok(days)
}

/// Parses a typed Brazilian-real amount into a positive [`Money`].
///
/// ## Accepted Forms
/// - `"1.234,56"`, `"1234,56"`, `"R$ 80,5"` (comma decimal)
/// - `"12.50"` (dot decimal when not followed by exactly three digits)
/// - `"1.250"` (dot as thousands separator)
/// - `"150"`
///
/// At most two decimal places. Zero and negative amounts are rejected.
pub fn parse_brl(field: &str, input: &str) -> ValidationResult<Money> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let cleaned: String = input
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if cleaned.starts_with('-') {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(invalid("expected digits with optional ',' or '.' separators"));
    }

    let normalized = if cleaned.contains(',') {
        if cleaned.matches(',').count() > 1 {
            return Err(invalid("more than one decimal comma"));
        }
        cleaned.replace('.', "").replace(',', ".")
    } else if let Some(last_dot) = cleaned.rfind('.') {
        let digits_after = cleaned.len() - last_dot - 1;
        if cleaned.matches('.').count() > 1 || digits_after == 3 {
            cleaned.replace('.', "")
        } else {
            cleaned
        }
    } else {
        cleaned
    };

    let (whole, fraction) = match normalized.split_once('.') {
        Some((w, f)) => (w, f),
        None => (normalized.as_str(), ""),
    };

    if fraction.len() > 2 {
        return Err(invalid("at most two decimal places"));
    }
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("no digits"));
    }

    let overflow = || ValidationError::OutOfRange {
        field: field.to_string(),
        min: 1,
        max: i64::MAX,
    };

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid("bad decimals"))? * 10,
        _ => fraction.parse().map_err(|_| invalid("bad decimals"))?,
    };

    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(overflow)?;

    validate_positive_amount(field, Money::from_cents(cents))
}

/// Parses a typed margin (`"30"`, `"40%"`).
pub fn parse_margin(input: &str) -> ValidationResult<crate::types::MarginPercent> {
    let digits = input.trim().trim_end_matches('%').trim();
    let value: u32 = digits.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "margin_percent".to_string(),
        reason: format!("'{}' is not a whole number", input.trim()),
    })?;
    crate::types::MarginPercent::new(value)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MarginPercent;

    fn cents(input: &str) -> i64 {
        parse_brl("value", input).unwrap().cents()
    }

    #[test]
    fn test_parse_brl_comma_decimal() {
        assert_eq!(cents("1.234,56"), 123456);
        assert_eq!(cents("1234,56"), 123456);
        assert_eq!(cents("R$ 80,5"), 8050);
        assert_eq!(cents(",99"), 99);
    }

    #[test]
    fn test_parse_brl_dot_forms() {
        assert_eq!(cents("12.50"), 1250);
        assert_eq!(cents("12.5"), 1250);
        assert_eq!(cents("1.250"), 125000);
        assert_eq!(cents("1.250.000"), 125000000);
        assert_eq!(cents("150"), 15000);
    }

    #[test]
    fn test_parse_brl_rejections() {
        assert!(matches!(
            parse_brl("cost", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_brl("cost", "0,00"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_brl("cost", "-10"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_brl("cost", "abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_brl("cost", "1,2,3"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_brl("cost", "10,123"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_brl("cost", "99999999999999999999"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_entry_name() {
        assert_eq!(validate_entry_name(" Pump ").unwrap(), "Pump");
        assert!(validate_entry_name("").is_err());
        assert!(validate_entry_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_warranty_days() {
        assert_eq!(validate_warranty_days(0).unwrap(), 0);
        assert_eq!(validate_warranty_days(90).unwrap(), 90);
        assert!(validate_warranty_days(MAX_WARRANTY_DAYS + 1).is_err());
    }

    #[test]
    fn test_parse_margin() {
        assert_eq!(parse_margin("30").unwrap(), MarginPercent::THIRTY);
        assert_eq!(parse_margin(" 40% ").unwrap(), MarginPercent::FORTY);
        assert!(matches!(
            parse_margin("35"),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert!(matches!(
            parse_margin("forty"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
