//! Typed field validation.
//!
//! A field specification names the field, the kind of value expected, and
//! whether it may be left empty; one generic validator turns raw text into a
//! [`FieldValue`] or a validation error naming the field.

use chrono::NaiveDate;

use crate::domain::error::StocklensError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Float,
    Date,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub optional: bool,
}

impl FieldSpec {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            kind,
            optional: false,
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            kind,
            optional: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Empty,
}

pub fn validate_field(spec: &FieldSpec, raw: &str) -> Result<FieldValue, StocklensError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        if spec.optional {
            return Ok(FieldValue::Empty);
        }
        return Err(StocklensError::validation(spec.name, "value is required"));
    }

    match spec.kind {
        FieldKind::Text => Ok(FieldValue::Text(trimmed.to_string())),
        FieldKind::Int => trimmed
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|_| StocklensError::validation(spec.name, "expected a whole number")),
        FieldKind::Float => trimmed
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| StocklensError::validation(spec.name, "expected a number")),
        FieldKind::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(FieldValue::Date)
            .map_err(|_| {
                StocklensError::validation(spec.name, "expected a date in YYYY-MM-DD format")
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_passes_through_trimmed() {
        let spec = FieldSpec::required("ticker", FieldKind::Text);
        let value = validate_field(&spec, "  AAPL ").unwrap();
        assert_eq!(value, FieldValue::Text("AAPL".into()));
    }

    #[test]
    fn required_empty_fails() {
        let spec = FieldSpec::required("ticker", FieldKind::Text);
        let err = validate_field(&spec, "   ").unwrap_err();
        assert!(matches!(
            err,
            StocklensError::Validation { field, .. } if field == "ticker"
        ));
    }

    #[test]
    fn optional_empty_is_empty() {
        let spec = FieldSpec::optional("end_date", FieldKind::Date);
        assert_eq!(validate_field(&spec, "").unwrap(), FieldValue::Empty);
    }

    #[test]
    fn int_parses() {
        let spec = FieldSpec::required("quantity", FieldKind::Int);
        assert_eq!(validate_field(&spec, "5").unwrap(), FieldValue::Int(5));
    }

    #[test]
    fn int_rejects_fraction() {
        let spec = FieldSpec::required("quantity", FieldKind::Int);
        let err = validate_field(&spec, "5.5").unwrap_err();
        assert!(matches!(
            err,
            StocklensError::Validation { field, .. } if field == "quantity"
        ));
    }

    #[test]
    fn float_parses() {
        let spec = FieldSpec::required("buy_price", FieldKind::Float);
        assert_eq!(
            validate_field(&spec, "199.5").unwrap(),
            FieldValue::Float(199.5)
        );
    }

    #[test]
    fn float_rejects_garbage() {
        let spec = FieldSpec::required("buy_price", FieldKind::Float);
        assert!(validate_field(&spec, "two hundred").is_err());
    }

    #[test]
    fn date_parses() {
        let spec = FieldSpec::required("buy_date", FieldKind::Date);
        assert_eq!(
            validate_field(&spec, "2022-08-02").unwrap(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2022, 8, 2).unwrap())
        );
    }

    #[test]
    fn date_rejects_wrong_format() {
        let spec = FieldSpec::required("buy_date", FieldKind::Date);
        assert!(validate_field(&spec, "02/08/2022").is_err());
        assert!(validate_field(&spec, "2022-13-40").is_err());
    }
}
