use chrono::NaiveDate;
use serde::Serialize;

use crate::validation::{Checker, ValidationErrors, parse_date};

/// Inclusive date range with `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationErrors> {
        if start > end {
            let mut errors = ValidationErrors::default();
            errors.push("end", "must not be before the start date");
            return Err(errors);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

#[derive(Clone, Debug, Default)]
pub struct RawDateRange {
    pub start: String,
    pub end: String,
}

impl RawDateRange {
    pub fn validate(&self) -> Result<DateRange, ValidationErrors> {
        let mut c = Checker::default();
        let start = c.parse("start", &self.start, parse_date);
        let end = c.parse("end", &self.end, parse_date);

        let (Some(start), Some(end)) = (start, end) else {
            return Err(c.into_errors());
        };
        c.finish()?;
        DateRange::new(start, end)
    }
}
