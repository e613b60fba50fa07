//! Garden plots and their owners.
//!
//! The merge rules live here so that the SQL store and the flat file apply
//! exactly the same upsert policy.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    util::normalize_display,
    validation::{Checker, ValidationErrors, check_email, check_phone, parse_flag, parse_integer},
};

/// Owner form as typed by the user.
#[derive(Clone, Debug, Default)]
pub struct RawPlot {
    pub plot_number: String,
    pub owner_name: String,
    pub phone: String,
    pub email: String,
    pub privatised: String,
}

/// Validated owner fields. `None` means "not supplied".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlotDraft {
    pub plot_number: i32,
    pub owner_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub privatised: Option<bool>,
}

pub(crate) fn parse_plot_number(raw: &str) -> Result<i32, String> {
    let value = parse_integer(raw)?;
    if value <= 0 {
        return Err("must be a positive number".to_string());
    }
    i32::try_from(value).map_err(|_| "is too large".to_string())
}

impl RawPlot {
    pub fn validate(&self) -> Result<PlotDraft, ValidationErrors> {
        let mut c = Checker::default();
        let plot_number = c.parse("plot_number", &self.plot_number, parse_plot_number);
        let owner_name = c.parse_optional("owner_name", &self.owner_name, |raw| {
            Ok(normalize_display(raw))
        });
        let phone = c.parse_optional("phone", &self.phone, check_phone);
        let email = c.parse_optional("email", &self.email, check_email);
        let privatised = c.parse_optional("privatised", &self.privatised, parse_flag);

        let (Some(plot_number), Ok(owner_name), Ok(phone), Ok(email), Ok(privatised)) =
            (plot_number, owner_name, phone, email, privatised)
        else {
            return Err(c.into_errors());
        };
        c.finish()?;

        Ok(PlotDraft {
            plot_number,
            owner_name,
            phone,
            email,
            privatised,
        })
    }
}

/// A plot with its owner details.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    pub plot_number: i32,
    pub owner_name: String,
    pub phone: String,
    pub email: String,
    pub privatised: bool,
}

impl Plot {
    /// Builds a new plot. Owner name, phone and email are required for a
    /// plot that does not exist yet.
    pub fn create(draft: PlotDraft) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if draft.owner_name.is_none() {
            errors.push("owner_name", "required for a new plot");
        }
        if draft.phone.is_none() {
            errors.push("phone", "required for a new plot");
        }
        if draft.email.is_none() {
            errors.push("email", "required for a new plot");
        }
        let (Some(owner_name), Some(phone), Some(email)) = (draft.owner_name, draft.phone, draft.email)
        else {
            return Err(errors);
        };

        Ok(Self {
            plot_number: draft.plot_number,
            owner_name,
            phone,
            email,
            privatised: draft.privatised.unwrap_or(false),
        })
    }

    /// Overwrites only the supplied fields.
    pub fn merge(&mut self, draft: PlotDraft) {
        if let Some(owner_name) = draft.owner_name {
            self.owner_name = owner_name;
        }
        if let Some(phone) = draft.phone {
            self.phone = phone;
        }
        if let Some(email) = draft.email {
            self.email = email;
        }
        if let Some(privatised) = draft.privatised {
            self.privatised = privatised;
        }
    }

    /// Insert-or-merge against the currently stored plot, if any.
    pub fn upsert(existing: Option<Plot>, draft: PlotDraft) -> Result<Self, ValidationErrors> {
        match existing {
            Some(mut plot) => {
                plot.merge(draft);
                Ok(plot)
            }
            None => Self::create(draft),
        }
    }
}

/// Filters for plot listings. `None` means "any".
#[derive(Clone, Debug, Default)]
pub struct PlotFilter {
    /// Case- and accent-insensitive substring of the owner name.
    pub owner_contains: Option<String>,
    pub privatised: Option<bool>,
}

impl PlotFilter {
    pub fn owner(name: impl Into<String>) -> Self {
        Self {
            owner_contains: Some(name.into()),
            privatised: None,
        }
    }

    pub fn matches(&self, plot: &Plot) -> bool {
        if let Some(privatised) = self.privatised
            && plot.privatised != privatised
        {
            return false;
        }
        match &self.owner_contains {
            Some(needle) => {
                let needle = crate::util::search_key(needle);
                crate::util::search_key(&plot.owner_name).contains(&needle)
            }
            None => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "plots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub plot_number: i32,
    pub owner_name: String,
    pub phone: String,
    pub email: String,
    pub privatised: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Plot {
    fn from(model: Model) -> Self {
        Self {
            plot_number: model.plot_number,
            owner_name: model.owner_name,
            phone: model.phone,
            email: model.email,
            privatised: model.privatised,
        }
    }
}

impl From<&Plot> for ActiveModel {
    fn from(plot: &Plot) -> Self {
        use sea_orm::ActiveValue;
        Self {
            plot_number: ActiveValue::Set(plot.plot_number),
            owner_name: ActiveValue::Set(plot.owner_name.clone()),
            phone: ActiveValue::Set(plot.phone.clone()),
            email: ActiveValue::Set(plot.email.clone()),
            privatised: ActiveValue::Set(plot.privatised),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Plot {
        Plot {
            plot_number: 12,
            owner_name: "Olena Kovalenko".into(),
            phone: "380501234567".into(),
            email: "olena@example.com".into(),
            privatised: true,
        }
    }

    #[test]
    fn validate_reports_all_rules() {
        let errors = RawPlot {
            plot_number: "12a".into(),
            owner_name: "x".into(),
            phone: "+380".into(),
            email: "nope".into(),
            privatised: "sometimes".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.fields(),
            vec!["plot_number", "phone", "email", "privatised"]
        );
    }

    #[test]
    fn validate_rejects_non_positive_number() {
        let errors = RawPlot {
            plot_number: "0".into(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(errors.contains("plot_number"));
    }

    #[test]
    fn create_requires_contact_fields() {
        let draft = RawPlot {
            plot_number: "7".into(),
            owner_name: "Ivan".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let errors = Plot::create(draft).unwrap_err();
        assert_eq!(errors.fields(), vec!["phone", "email"]);
    }

    #[test]
    fn merge_keeps_fields_left_empty() {
        let draft = RawPlot {
            plot_number: "12".into(),
            phone: "380671112233".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let merged = Plot::upsert(Some(stored()), draft).unwrap();
        assert_eq!(merged.phone, "380671112233");
        assert_eq!(merged.owner_name, "Olena Kovalenko");
        assert_eq!(merged.email, "olena@example.com");
        assert!(merged.privatised);
    }

    #[test]
    fn filter_matches_owner_ignoring_case() {
        assert!(PlotFilter::owner("kovalenko").matches(&stored()));
        assert!(!PlotFilter::owner("petrenko").matches(&stored()));
        let filter = PlotFilter {
            owner_contains: None,
            privatised: Some(false),
        };
        assert!(!filter.matches(&stored()));
    }
}
