//! Refueling records.
//!
//! A refueling is an insert-only event: every save creates a new row. Costs,
//! distance and average consumption are derived from the inputs by
//! [`RefuelFigures::compute`] and stored next to them.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

use crate::{
    Currency, StoreError,
    calc,
    validation::{
        Checker, ValidationErrors, optional_text, parse_date, parse_flag, parse_integer,
        parse_quantity,
    },
};

/// Refueling form as typed by the user.
#[derive(Clone, Debug, Default)]
pub struct RawRefuel {
    pub vehicle_number: String,
    pub fuel_date: String,
    pub fuel_card: String,
    pub previous_mileage: String,
    pub current_mileage: String,
    pub diesel_liters: String,
    pub diesel_price: String,
    pub currency: String,
    /// Empty means a full tank.
    pub full_tank: String,
    pub adblue_liters: String,
    pub adblue_price: String,
}

/// Validated refueling inputs. Derived values are not part of it.
#[derive(Clone, Debug, PartialEq)]
pub struct RefuelDraft {
    pub vehicle_number: String,
    pub fuel_date: NaiveDate,
    pub fuel_card: Option<String>,
    pub previous_mileage: i64,
    pub current_mileage: i64,
    pub diesel_liters: f64,
    pub diesel_price: f64,
    pub currency: Currency,
    pub full_tank: bool,
    pub adblue_liters: f64,
    pub adblue_price: f64,
}

fn parse_mileage(raw: &str) -> Result<i64, String> {
    let value = parse_integer(raw)?;
    if value < 0 {
        return Err("must not be negative".to_string());
    }
    Ok(value)
}

impl RawRefuel {
    pub fn validate(&self) -> Result<RefuelDraft, ValidationErrors> {
        let mut c = Checker::default();

        let vehicle_number = c.required("vehicle_number", &self.vehicle_number);
        let fuel_date = c.parse("fuel_date", &self.fuel_date, parse_date);
        let previous_mileage = c.parse("previous_mileage", &self.previous_mileage, parse_mileage);
        let current_mileage = c.parse("current_mileage", &self.current_mileage, parse_mileage);
        let diesel_liters = c.parse("diesel_liters", &self.diesel_liters, parse_quantity);
        let diesel_price = c.parse("diesel_price", &self.diesel_price, parse_quantity);
        let currency = c.parse("currency", &self.currency, |raw| Currency::try_from(raw));
        let full_tank = c.parse_optional("full_tank", &self.full_tank, parse_flag);
        let adblue_liters = c.parse_optional("adblue_liters", &self.adblue_liters, parse_quantity);
        let adblue_price = c.parse_optional("adblue_price", &self.adblue_price, parse_quantity);

        let (
            Some(vehicle_number),
            Some(fuel_date),
            Some(previous_mileage),
            Some(current_mileage),
            Some(diesel_liters),
            Some(diesel_price),
            Some(currency),
            Ok(full_tank),
            Ok(adblue_liters),
            Ok(adblue_price),
        ) = (
            vehicle_number,
            fuel_date,
            previous_mileage,
            current_mileage,
            diesel_liters,
            diesel_price,
            currency,
            full_tank,
            adblue_liters,
            adblue_price,
        )
        else {
            return Err(c.into_errors());
        };
        c.finish()?;

        let draft = RefuelDraft {
            vehicle_number,
            fuel_date,
            fuel_card: optional_text(&self.fuel_card),
            previous_mileage,
            current_mileage,
            diesel_liters,
            diesel_price,
            currency,
            full_tank: full_tank.unwrap_or(true),
            adblue_liters: adblue_liters.unwrap_or(0.0),
            adblue_price: adblue_price.unwrap_or(0.0),
        };
        if !RefuelFigures::compute(&draft).total_cost.is_finite() {
            let mut errors = ValidationErrors::default();
            errors.push("total_cost", "is out of range");
            return Err(errors);
        }
        Ok(draft)
    }
}

/// Values computed from a [`RefuelDraft`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RefuelFigures {
    pub diesel_cost: f64,
    pub adblue_cost: f64,
    pub total_cost: f64,
    /// `current - previous`; kept as is even when negative.
    pub distance: i64,
    /// Liters per 100 km, `0` when the distance is not positive.
    pub average_consumption: f64,
}

impl RefuelFigures {
    #[must_use]
    pub fn compute(draft: &RefuelDraft) -> Self {
        let diesel_cost = calc::cost(draft.diesel_liters, draft.diesel_price);
        let adblue_cost = calc::cost(draft.adblue_liters, draft.adblue_price);
        let distance = calc::distance(draft.previous_mileage, draft.current_mileage);
        Self {
            diesel_cost,
            adblue_cost,
            total_cost: diesel_cost + adblue_cost,
            distance,
            average_consumption: calc::average_consumption(draft.diesel_liters, distance),
        }
    }
}

/// A stored refueling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Refuel {
    pub id: i32,
    pub vehicle_number: String,
    pub fuel_date: NaiveDate,
    pub fuel_card: Option<String>,
    pub previous_mileage: i64,
    pub current_mileage: i64,
    pub diesel_liters: f64,
    pub diesel_price: f64,
    pub currency: Currency,
    pub full_tank: bool,
    pub adblue_liters: f64,
    pub adblue_price: f64,
    pub figures: RefuelFigures,
}

/// Filters for [`crate::Store::search_refuels`]. `None` means "any".
#[derive(Clone, Debug, Default)]
pub struct RefuelFilter {
    pub vehicle_number: Option<String>,
    pub fuel_card: Option<String>,
    /// Inclusive.
    pub from: Option<NaiveDate>,
    /// Inclusive.
    pub to: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "refuels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vehicle_number: String,
    pub fuel_date: NaiveDate,
    pub fuel_card: Option<String>,
    pub previous_mileage: i64,
    pub current_mileage: i64,
    pub diesel_liters: f64,
    pub currency: String,
    pub diesel_price: f64,
    pub diesel_cost: f64,
    pub full_tank: bool,
    pub adblue_liters: f64,
    pub adblue_price: f64,
    pub adblue_cost: f64,
    pub distance: i64,
    pub average_consumption: f64,
    pub total_cost: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_draft(draft: &RefuelDraft, figures: &RefuelFigures) -> Self {
        Self {
            id: ActiveValue::NotSet,
            vehicle_number: ActiveValue::Set(draft.vehicle_number.clone()),
            fuel_date: ActiveValue::Set(draft.fuel_date),
            fuel_card: ActiveValue::Set(draft.fuel_card.clone()),
            previous_mileage: ActiveValue::Set(draft.previous_mileage),
            current_mileage: ActiveValue::Set(draft.current_mileage),
            diesel_liters: ActiveValue::Set(draft.diesel_liters),
            currency: ActiveValue::Set(draft.currency.code().to_string()),
            diesel_price: ActiveValue::Set(draft.diesel_price),
            diesel_cost: ActiveValue::Set(figures.diesel_cost),
            full_tank: ActiveValue::Set(draft.full_tank),
            adblue_liters: ActiveValue::Set(draft.adblue_liters),
            adblue_price: ActiveValue::Set(draft.adblue_price),
            adblue_cost: ActiveValue::Set(figures.adblue_cost),
            distance: ActiveValue::Set(figures.distance),
            average_consumption: ActiveValue::Set(figures.average_consumption),
            total_cost: ActiveValue::Set(figures.total_cost),
        }
    }
}

impl TryFrom<Model> for Refuel {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let currency = Currency::try_from(model.currency.as_str())
            .map_err(|err| StoreError::Database(DbErr::Custom(err)))?;
        Ok(Self {
            id: model.id,
            vehicle_number: model.vehicle_number,
            fuel_date: model.fuel_date,
            fuel_card: model.fuel_card,
            previous_mileage: model.previous_mileage,
            current_mileage: model.current_mileage,
            diesel_liters: model.diesel_liters,
            diesel_price: model.diesel_price,
            currency,
            full_tank: model.full_tank,
            adblue_liters: model.adblue_liters,
            adblue_price: model.adblue_price,
            figures: RefuelFigures {
                diesel_cost: model.diesel_cost,
                adblue_cost: model.adblue_cost,
                total_cost: model.total_cost,
                distance: model.distance,
                average_consumption: model.average_consumption,
            },
        })
    }
}
