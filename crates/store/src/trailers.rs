//! Trailers. Same shape as vehicles, without a tachograph.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::validation::{Checker, ValidationErrors, optional_text, parse_date, required_text};

#[derive(Clone, Debug, Default)]
pub struct RawTrailer {
    pub trailer_number: String,
    pub insurance_number: String,
    pub insurance_expiry: String,
    pub inspection_expiry: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrailerDraft {
    pub trailer_number: String,
    pub insurance_number: Option<String>,
    pub insurance_expiry: Option<NaiveDate>,
    pub inspection_expiry: Option<NaiveDate>,
}

impl RawTrailer {
    pub fn validate(&self) -> Result<TrailerDraft, ValidationErrors> {
        let mut c = Checker::default();
        let trailer_number = c.check("trailer_number", required_text(&self.trailer_number));
        let insurance_expiry = c.parse_optional("insurance_expiry", &self.insurance_expiry, parse_date);
        let inspection_expiry =
            c.parse_optional("inspection_expiry", &self.inspection_expiry, parse_date);

        let (Some(trailer_number), Ok(insurance_expiry), Ok(inspection_expiry)) =
            (trailer_number, insurance_expiry, inspection_expiry)
        else {
            return Err(c.into_errors());
        };
        c.finish()?;

        Ok(TrailerDraft {
            trailer_number,
            insurance_number: optional_text(&self.insurance_number),
            insurance_expiry,
            inspection_expiry,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Trailer {
    pub id: i32,
    pub trailer_number: String,
    pub insurance_number: String,
    pub insurance_expiry: NaiveDate,
    pub inspection_expiry: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trailers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub trailer_number: String,
    pub insurance_number: String,
    pub insurance_expiry: NaiveDate,
    pub inspection_expiry: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Trailer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            trailer_number: model.trailer_number,
            insurance_number: model.insurance_number,
            insurance_expiry: model.insurance_expiry,
            inspection_expiry: model.inspection_expiry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn validate_accepts_iso_dates() {
        let draft = RawTrailer {
            trailer_number: "AX7781".into(),
            insurance_number: " POL-9 ".into(),
            insurance_expiry: "2025-03-01".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(draft.insurance_number.as_deref(), Some("POL-9"));
        assert_eq!(draft.insurance_expiry, Some(date(2025, 3, 1)));
        assert_eq!(draft.inspection_expiry, None);
    }

    #[test]
    fn validate_reports_every_bad_field() {
        let errors = RawTrailer {
            trailer_number: "  ".into(),
            inspection_expiry: "32/01/2025".into(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.fields(), vec!["trailer_number", "inspection_expiry"]);
    }
}
