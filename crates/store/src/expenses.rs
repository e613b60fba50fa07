//! Organization expenses. Append-only, like payments.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

use crate::{
    Money,
    money::parse_positive_amount,
    util::normalize_display,
    validation::{Checker, ValidationErrors, parse_date},
};

#[derive(Clone, Debug, Default)]
pub struct RawExpense {
    /// Free-text category, e.g. "Road repair".
    pub kind: String,
    pub amount: String,
    pub spent_on: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub kind: String,
    pub amount: Money,
    pub spent_on: NaiveDate,
}

impl RawExpense {
    pub fn validate(&self) -> Result<ExpenseDraft, ValidationErrors> {
        let mut c = Checker::default();
        let kind = c.parse("kind", &self.kind, |raw| Ok(normalize_display(raw)));
        let amount = c.parse("amount", &self.amount, parse_positive_amount);
        let spent_on = c.parse("spent_on", &self.spent_on, parse_date);

        let (Some(kind), Some(amount), Some(spent_on)) = (kind, amount, spent_on) else {
            return Err(c.into_errors());
        };
        c.finish()?;

        Ok(ExpenseDraft {
            kind,
            amount,
            spent_on,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub id: i32,
    pub kind: String,
    pub amount: Money,
    pub spent_on: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: String,
    pub amount_minor: i64,
    pub spent_on: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ExpenseDraft> for ActiveModel {
    fn from(draft: &ExpenseDraft) -> Self {
        Self {
            id: ActiveValue::NotSet,
            kind: ActiveValue::Set(draft.kind.clone()),
            amount_minor: ActiveValue::Set(draft.amount.minor()),
            spent_on: ActiveValue::Set(draft.spent_on),
        }
    }
}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            amount: Money::new(model.amount_minor),
            spent_on: model.spent_on,
        }
    }
}
