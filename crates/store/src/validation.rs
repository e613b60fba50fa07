//! Field-level validation shared by the input forms.
//!
//! Forms feed every raw field through a [`Checker`], which records each
//! violated rule instead of stopping at the first one. A form is accepted only
//! when the checker ends up empty.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Display format for dates entered by users.
pub const DATE_FORMAT: &str = "%d/%m/%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// One violated rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every rule violated by one submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Names of the rejected fields, in submission order.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects violations while a form is being parsed.
#[derive(Default)]
pub(crate) struct Checker {
    errors: ValidationErrors,
}

impl Checker {
    /// Records the error of `result`, if any.
    pub(crate) fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.push(field, message);
                None
            }
        }
    }

    /// Trimmed, non-empty text.
    pub(crate) fn required(&mut self, field: &str, raw: &str) -> Option<String> {
        self.check(field, required_text(raw))
    }

    /// Parses a field that must be present.
    pub(crate) fn parse<T>(
        &mut self,
        field: &str,
        raw: &str,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Option<T> {
        if raw.trim().is_empty() {
            self.errors.push(field, "must not be empty");
            return None;
        }
        self.check(field, parse(raw))
    }

    /// Parses a field that may be left empty.
    ///
    /// Returns `Ok(None)` for an empty field and `Err(())` when the rule was
    /// violated (the violation is already recorded).
    pub(crate) fn parse_optional<T>(
        &mut self,
        field: &str,
        raw: &str,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<Option<T>, ()> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        match self.check(field, parse(raw)) {
            Some(value) => Ok(Some(value)),
            None => Err(()),
        }
    }

    pub(crate) fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(field, message);
    }

    pub(crate) fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Returns trimmed text, or `None` when the field was left empty.
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn required_text(raw: &str) -> Result<String, String> {
    optional_text(raw).ok_or_else(|| "must not be empty".to_string())
}

/// Parses a date written as `DD/MM/YYYY` (or ISO `YYYY-MM-DD`).
///
/// The date must exist in the calendar: `31/02/2024` is rejected.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    let parsed = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .map_err(|_| format!("'{trimmed}' is not a valid date, use DD/MM/YYYY"))?;
    if !(1000..=9999).contains(&parsed.year()) {
        return Err(format!("'{trimmed}' must use a four-digit year"));
    }
    Ok(parsed)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_integer(raw: &str) -> Result<i64, String> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| format!("'{trimmed}' is not a whole number"))
}

/// Parses a decimal number; `,` is accepted as decimal separator.
pub fn parse_decimal(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let value = trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| format!("'{trimmed}' is not a number"))?;
    if !value.is_finite() {
        return Err(format!("'{trimmed}' is not a number"));
    }
    Ok(value)
}

/// Like [`parse_decimal`] but rejects negative values.
pub fn parse_quantity(raw: &str) -> Result<f64, String> {
    let value = parse_decimal(raw)?;
    if value < 0.0 {
        return Err("must not be negative".to_string());
    }
    Ok(value)
}

/// Parses a yes/no answer.
pub fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "да" | "так" | "tak" => Ok(true),
        "no" | "n" | "false" | "0" | "нет" | "ні" | "nie" => Ok(false),
        other => Err(format!("'{other}' is not a yes/no value")),
    }
}

pub fn check_email(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Err("must contain '@' and '.'".to_string());
    }
    Ok(trimmed.to_string())
}

pub fn check_phone(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err("must contain digits only".to_string());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_rejects_impossible_calendar_day() {
        assert!(parse_date("31/02/2024").is_err());
        assert_eq!(
            parse_date("01/03/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
    }

    #[test]
    fn date_accepts_iso_and_leap_day() {
        assert_eq!(
            parse_date("2024-02-29"),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert!(parse_date("29/02/2023").is_err());
    }

    #[test]
    fn date_rejects_short_year_and_garbage() {
        assert!(parse_date("01/03/24").is_err());
        assert!(parse_date("tomorrow").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn date_formats_back_to_display_form() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_date(date), "01/03/2024");
    }

    #[test]
    fn decimal_accepts_comma() {
        assert_eq!(parse_decimal("1,5"), Ok(1.5));
        assert_eq!(parse_decimal(" 40 "), Ok(40.0));
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("inf").is_err());
        assert!(parse_quantity("-1").is_err());
    }

    #[test]
    fn email_needs_at_and_dot() {
        assert!(check_email("owner@example.com").is_ok());
        assert!(check_email("owner.example.com").is_err());
        assert!(check_email("owner@example").is_err());
    }

    #[test]
    fn phone_digits_only() {
        assert_eq!(check_phone(" 380501234567 "), Ok("380501234567".to_string()));
        assert!(check_phone("+38 050").is_err());
        assert!(check_phone("").is_err());
    }

    #[test]
    fn flag_understands_original_answers() {
        assert_eq!(parse_flag("Да"), Ok(true));
        assert_eq!(parse_flag("ні"), Ok(false));
        assert_eq!(parse_flag("YES"), Ok(true));
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn checker_collects_every_violation() {
        let mut checker = Checker::default();
        checker.required("name", "  ");
        checker.parse("mileage", "12x", parse_integer);
        checker.parse("date", "", parse_date);
        assert_eq!(checker.parse_optional("price", "", parse_decimal), Ok(None));

        let errors = checker.finish().unwrap_err();
        assert_eq!(errors.fields(), vec!["name", "mileage", "date"]);
        assert_eq!(errors.to_string().matches(';').count(), 2);
    }
}
