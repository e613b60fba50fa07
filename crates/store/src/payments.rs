//! Plot payment ledger.
//!
//! Entries are appended and never edited. Meter readings share the ledger with
//! money payments but are left out of every monetary total.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    Money, StoreError,
    money::parse_positive_amount,
    plots::parse_plot_number,
    validation::{Checker, ValidationErrors, parse_date},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    MembershipFee,
    MeterReading,
    Electricity,
    Water,
}

impl PaymentKind {
    pub const ALL: [PaymentKind; 4] = [
        Self::MembershipFee,
        Self::MeterReading,
        Self::Electricity,
        Self::Water,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MembershipFee => "membership_fee",
            Self::MeterReading => "meter_reading",
            Self::Electricity => "electricity",
            Self::Water => "water",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::MembershipFee => "Membership fee",
            Self::MeterReading => "Meter reading",
            Self::Electricity => "Electricity",
            Self::Water => "Water",
        }
    }

    /// Whether entries of this kind count towards money totals.
    pub fn is_monetary(self) -> bool {
        !matches!(self, Self::MeterReading)
    }
}

impl core::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for PaymentKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "membership_fee" | "membership" | "fee" => Ok(Self::MembershipFee),
            "meter_reading" | "meter" => Ok(Self::MeterReading),
            "electricity" => Ok(Self::Electricity),
            "water" => Ok(Self::Water),
            other => Err(format!("unknown payment kind: {other}")),
        }
    }
}

/// One ledger line to append.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentDraft {
    pub plot_number: i32,
    pub kind: PaymentKind,
    pub amount: Money,
    pub paid_on: NaiveDate,
}

/// Payments form: one date, up to one amount per kind.
#[derive(Clone, Debug, Default)]
pub struct RawPlotPayments {
    pub plot_number: String,
    pub paid_on: String,
    pub membership_fee: String,
    pub meter_reading: String,
    pub electricity: String,
    pub water: String,
}

impl RawPlotPayments {
    /// Returns one draft per non-empty amount, in [`PaymentKind::ALL`] order.
    pub fn validate(&self) -> Result<Vec<PaymentDraft>, ValidationErrors> {
        let mut c = Checker::default();
        let plot_number = c.parse("plot_number", &self.plot_number, parse_plot_number);
        let paid_on = c.parse("paid_on", &self.paid_on, parse_date);

        let mut amounts = Vec::new();
        let mut invalid = false;
        for kind in PaymentKind::ALL {
            let raw = match kind {
                PaymentKind::MembershipFee => &self.membership_fee,
                PaymentKind::MeterReading => &self.meter_reading,
                PaymentKind::Electricity => &self.electricity,
                PaymentKind::Water => &self.water,
            };
            match c.parse_optional(kind.as_str(), raw, parse_positive_amount) {
                Ok(Some(amount)) => amounts.push((kind, amount)),
                Ok(None) => {}
                Err(()) => invalid = true,
            }
        }
        if amounts.is_empty() && !invalid {
            c.reject("amounts", "enter at least one amount");
        }

        let (Some(plot_number), Some(paid_on)) = (plot_number, paid_on) else {
            return Err(c.into_errors());
        };
        c.finish()?;

        Ok(amounts
            .into_iter()
            .map(|(kind, amount)| PaymentDraft {
                plot_number,
                kind,
                amount,
                paid_on,
            })
            .collect())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub id: i32,
    pub plot_number: i32,
    pub kind: PaymentKind,
    pub amount: Money,
    pub paid_on: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub plot_number: i32,
    pub kind: String,
    pub amount_minor: i64,
    pub paid_on: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plots::Entity",
        from = "Column::PlotNumber",
        to = "super::plots::Column::PlotNumber",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Plot,
}

impl Related<super::plots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PaymentDraft> for ActiveModel {
    fn from(draft: &PaymentDraft) -> Self {
        Self {
            id: ActiveValue::NotSet,
            plot_number: ActiveValue::Set(draft.plot_number),
            kind: ActiveValue::Set(draft.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(draft.amount.minor()),
            paid_on: ActiveValue::Set(draft.paid_on),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            plot_number: model.plot_number,
            kind: PaymentKind::try_from(model.kind.as_str())
                .map_err(|err| StoreError::Database(DbErr::Custom(err)))?,
            amount: Money::new(model.amount_minor),
            paid_on: model.paid_on,
        })
    }
}
