//! Vehicles and their document expiry dates.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::validation::{Checker, ValidationErrors, optional_text, parse_date, required_text};

/// Vehicle form as typed by the user. Empty fields keep the stored value on
/// update.
#[derive(Clone, Debug, Default)]
pub struct RawVehicle {
    pub vehicle_number: String,
    pub insurance_number: String,
    pub insurance_expiry: String,
    pub inspection_expiry: String,
    pub tachograph_calibration: String,
}

/// Validated vehicle fields. `None` means "not supplied".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VehicleDraft {
    pub vehicle_number: String,
    pub insurance_number: Option<String>,
    pub insurance_expiry: Option<NaiveDate>,
    pub inspection_expiry: Option<NaiveDate>,
    pub tachograph_calibration: Option<NaiveDate>,
}

impl RawVehicle {
    pub fn validate(&self) -> Result<VehicleDraft, ValidationErrors> {
        let mut c = Checker::default();
        let vehicle_number = c.check("vehicle_number", required_text(&self.vehicle_number));
        let insurance_expiry = c.parse_optional("insurance_expiry", &self.insurance_expiry, parse_date);
        let inspection_expiry =
            c.parse_optional("inspection_expiry", &self.inspection_expiry, parse_date);
        let tachograph_calibration =
            c.parse_optional("tachograph_calibration", &self.tachograph_calibration, parse_date);

        let (Some(vehicle_number), Ok(insurance_expiry), Ok(inspection_expiry), Ok(tachograph_calibration)) =
            (vehicle_number, insurance_expiry, inspection_expiry, tachograph_calibration)
        else {
            return Err(c.into_errors());
        };
        c.finish()?;

        Ok(VehicleDraft {
            vehicle_number,
            insurance_number: optional_text(&self.insurance_number),
            insurance_expiry,
            inspection_expiry,
            tachograph_calibration,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    pub id: i32,
    pub vehicle_number: String,
    pub insurance_number: String,
    pub insurance_expiry: NaiveDate,
    pub inspection_expiry: NaiveDate,
    pub tachograph_calibration: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub vehicle_number: String,
    pub insurance_number: String,
    pub insurance_expiry: NaiveDate,
    pub inspection_expiry: NaiveDate,
    pub tachograph_calibration: Option<NaiveDate>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Vehicle {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            vehicle_number: model.vehicle_number,
            insurance_number: model.insurance_number,
            insurance_expiry: model.insurance_expiry,
            inspection_expiry: model.inspection_expiry,
            tachograph_calibration: model.tachograph_calibration,
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
    fn validate_keeps_empty_fields_absent() {
        let draft = RawVehicle {
            vehicle_number: " KA1234 ".into(),
            inspection_expiry: "15/06/2025".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(draft.vehicle_number, "KA1234");
        assert_eq!(draft.insurance_number, None);
        assert_eq!(draft.insurance_expiry, None);
        assert_eq!(draft.inspection_expiry, Some(date(2025, 6, 15)));
    }

    #[test]
    fn validate_rejects_missing_number_and_bad_dates_together() {
        let errors = RawVehicle {
            insurance_expiry: "31/02/2024".into(),
            tachograph_calibration: "soon".into(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            errors.fields(),
            vec!["vehicle_number", "insurance_expiry", "tachograph_calibration"]
        );
    }
}
