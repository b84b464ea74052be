use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

pub const MSG_INVALID_PAYLOAD: &str = "Dados inválidos";
pub const MSG_NAME_REQUIRED: &str = "Nome obrigatório";
pub const MSG_NAME_TOO_LONG: &str = "Nome deve ter no máximo 255 caracteres";
pub const MSG_VALUE_NEGATIVE: &str = "Valor não pode ser negativo";
pub const MSG_FACTOR_NOT_POSITIVE: &str = "Fator deve ser positivo";

const NAME_MAX_CHARS: usize = 255;

/// Declared field order of an input type, used to pick the first message.
pub trait InputShape: DeserializeOwned + Validate {
    const FIELDS: &'static [&'static str];
}

/// Parse an untrusted payload into `T` and validate it.
///
/// On failure the error is a single user-facing message: the first failing
/// field in `T::FIELDS` order, or a generic message when the payload does
/// not have the expected shape.
pub fn parse_input<T: InputShape>(payload: Value) -> Result<T, String> {
    let input: T = serde_json::from_value(payload).map_err(|e| {
        tracing::debug!("Rejected malformed input: {}", e);
        MSG_INVALID_PAYLOAD.to_string()
    })?;

    input
        .validate()
        .map_err(|errors| first_error_message(&errors, T::FIELDS))?;

    Ok(input)
}

/// `ValidationErrors` is unordered, so walk the declared fields first.
pub fn first_error_message(errors: &ValidationErrors, field_order: &[&str]) -> String {
    let mut fields: Vec<(usize, String, &Vec<ValidationError>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let field = field.to_string();
            let rank = field_order
                .iter()
                .position(|f| *f == field)
                .unwrap_or(field_order.len());
            (rank, field, errs)
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    fields
        .iter()
        .flat_map(|(_, _, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| MSG_INVALID_PAYLOAD.to_string())
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(error("required", MSG_NAME_REQUIRED));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(error("length", MSG_NAME_TOO_LONG));
    }
    Ok(())
}

pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(error("range", MSG_VALUE_NEGATIVE));
    }
    Ok(())
}

pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(error("range", MSG_FACTOR_NOT_POSITIVE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{CreateExampleInput, UpdateExampleInput};
    use serde_json::json;
    use std::str::FromStr;
    use uuid::Uuid;

    #[test]
    fn empty_name_reports_name_first() {
        let err = parse_input::<CreateExampleInput>(json!({
            "name": "",
            "value": -1,
        }))
        .unwrap_err();
        assert_eq!(err, MSG_NAME_REQUIRED);
    }

    #[test]
    fn negative_value_is_rejected() {
        let err = parse_input::<CreateExampleInput>(json!({
            "name": "Widget",
            "value": -0.01,
            "organization_id": Uuid::new_v4(),
        }))
        .unwrap_err();
        assert_eq!(err, MSG_VALUE_NEGATIVE);
    }

    #[test]
    fn missing_organization_is_rejected() {
        let err = parse_input::<CreateExampleInput>(json!({ "name": "Widget", "value": 1 })).unwrap_err();
        assert_eq!(err, "Organização obrigatória");
    }

    #[test]
    fn wrong_shape_is_generic() {
        let err = parse_input::<CreateExampleInput>(json!({
            "name": "Widget",
            "value": 1,
            "organization_id": "not-a-uuid",
        }))
        .unwrap_err();
        assert_eq!(err, MSG_INVALID_PAYLOAD);

        let err = parse_input::<CreateExampleInput>(json!("just a string")).unwrap_err();
        assert_eq!(err, MSG_INVALID_PAYLOAD);
    }

    #[test]
    fn valid_create_input_parses_decimal_exactly() {
        let input = parse_input::<CreateExampleInput>(json!({
            "name": "Widget",
            "value": "10.10",
            "organization_id": Uuid::new_v4(),
        }))
        .unwrap();
        assert_eq!(input.value, Some(Decimal::from_str("10.10").unwrap()));
    }

    #[test]
    fn long_names_are_rejected() {
        let name = "x".repeat(256);
        assert_eq!(validate_name(&name).unwrap_err().message.unwrap(), MSG_NAME_TOO_LONG);
        assert!(validate_name(&"x".repeat(255)).is_ok());
    }

    #[test]
    fn partial_update_only_checks_present_fields() {
        let input = parse_input::<UpdateExampleInput>(json!({ "value": 3 })).unwrap();
        assert!(input.name.is_none());
        assert!(input.is_active.is_none());

        let err = parse_input::<UpdateExampleInput>(json!({ "name": "   " })).unwrap_err();
        assert_eq!(err, MSG_NAME_REQUIRED);
    }

    #[test]
    fn zero_is_not_negative() {
        assert!(validate_non_negative(&Decimal::ZERO).is_ok());
        assert!(validate_positive(&Decimal::ZERO).is_err());
    }
}
