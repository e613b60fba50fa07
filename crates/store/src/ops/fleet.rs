use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, Condition, IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    DateRange, ExpiryReport, ResultStore, StoreError, Trailer, TrailerDraft, Vehicle,
    VehicleDraft, trailers, validation::ValidationErrors, vehicles,
};

use super::{Store, with_tx};

/// Documents every new vehicle or trailer must come with.
fn require_documents(
    insurance_number: Option<String>,
    insurance_expiry: Option<NaiveDate>,
    inspection_expiry: Option<NaiveDate>,
) -> ResultStore<(String, NaiveDate, NaiveDate)> {
    let mut errors = ValidationErrors::default();
    if insurance_number.is_none() {
        errors.push("insurance_number", "required for a new record");
    }
    if insurance_expiry.is_none() {
        errors.push("insurance_expiry", "required for a new record");
    }
    if inspection_expiry.is_none() {
        errors.push("inspection_expiry", "required for a new record");
    }
    match (insurance_number, insurance_expiry, inspection_expiry) {
        (Some(number), Some(insurance), Some(inspection)) => Ok((number, insurance, inspection)),
        _ => Err(StoreError::Validation(errors)),
    }
}

impl Store {
    /// Inserts a vehicle or updates the supplied fields of the stored one.
    pub async fn upsert_vehicle(&self, draft: VehicleDraft) -> ResultStore<Vehicle> {
        with_tx!(self, |db_tx| {
            let existing = vehicles::Entity::find()
                .filter(vehicles::Column::VehicleNumber.eq(draft.vehicle_number.as_str()))
                .one(&db_tx)
                .await?;

            let model = match existing {
                Some(model) => {
                    let mut active = model.clone().into_active_model();
                    if let Some(value) = draft.insurance_number {
                        active.insurance_number = ActiveValue::Set(value);
                    }
                    if let Some(value) = draft.insurance_expiry {
                        active.insurance_expiry = ActiveValue::Set(value);
                    }
                    if let Some(value) = draft.inspection_expiry {
                        active.inspection_expiry = ActiveValue::Set(value);
                    }
                    if let Some(value) = draft.tachograph_calibration {
                        active.tachograph_calibration = ActiveValue::Set(Some(value));
                    }
                    if active.is_changed() {
                        active.update(&db_tx).await?
                    } else {
                        model
                    }
                }
                None => {
                    let (insurance_number, insurance_expiry, inspection_expiry) =
                        require_documents(
                            draft.insurance_number,
                            draft.insurance_expiry,
                            draft.inspection_expiry,
                        )?;
                    vehicles::ActiveModel {
                        id: ActiveValue::NotSet,
                        vehicle_number: ActiveValue::Set(draft.vehicle_number.clone()),
                        insurance_number: ActiveValue::Set(insurance_number),
                        insurance_expiry: ActiveValue::Set(insurance_expiry),
                        inspection_expiry: ActiveValue::Set(inspection_expiry),
                        tachograph_calibration: ActiveValue::Set(draft.tachograph_calibration),
                    }
                    .insert(&db_tx)
                    .await?
                }
            };
            tracing::info!(vehicle = %model.vehicle_number, "vehicle saved");
            Ok(Vehicle::from(model))
        })
    }

    pub async fn vehicle(&self, vehicle_number: &str) -> ResultStore<Vehicle> {
        let vehicle_number = vehicle_number.trim();
        with_tx!(self, |db_tx| {
            vehicles::Entity::find()
                .filter(vehicles::Column::VehicleNumber.eq(vehicle_number))
                .one(&db_tx)
                .await?
                .map(Vehicle::from)
                .ok_or_else(|| StoreError::NotFound(format!("vehicle {vehicle_number}")))
        })
    }

    /// Inserts a trailer or updates the supplied fields of the stored one.
    pub async fn upsert_trailer(&self, draft: TrailerDraft) -> ResultStore<Trailer> {
        with_tx!(self, |db_tx| {
            let existing = trailers::Entity::find()
                .filter(trailers::Column::TrailerNumber.eq(draft.trailer_number.as_str()))
                .one(&db_tx)
                .await?;

            let model = match existing {
                Some(model) => {
                    let mut active = model.clone().into_active_model();
                    if let Some(value) = draft.insurance_number {
                        active.insurance_number = ActiveValue::Set(value);
                    }
                    if let Some(value) = draft.insurance_expiry {
                        active.insurance_expiry = ActiveValue::Set(value);
                    }
                    if let Some(value) = draft.inspection_expiry {
                        active.inspection_expiry = ActiveValue::Set(value);
                    }
                    if active.is_changed() {
                        active.update(&db_tx).await?
                    } else {
                        model
                    }
                }
                None => {
                    let (insurance_number, insurance_expiry, inspection_expiry) =
                        require_documents(
                            draft.insurance_number,
                            draft.insurance_expiry,
                            draft.inspection_expiry,
                        )?;
                    trailers::ActiveModel {
                        id: ActiveValue::NotSet,
                        trailer_number: ActiveValue::Set(draft.trailer_number.clone()),
                        insurance_number: ActiveValue::Set(insurance_number),
                        insurance_expiry: ActiveValue::Set(insurance_expiry),
                        inspection_expiry: ActiveValue::Set(inspection_expiry),
                    }
                    .insert(&db_tx)
                    .await?
                }
            };
            tracing::info!(trailer = %model.trailer_number, "trailer saved");
            Ok(Trailer::from(model))
        })
    }

    pub async fn trailer(&self, trailer_number: &str) -> ResultStore<Trailer> {
        let trailer_number = trailer_number.trim();
        with_tx!(self, |db_tx| {
            trailers::Entity::find()
                .filter(trailers::Column::TrailerNumber.eq(trailer_number))
                .one(&db_tx)
                .await?
                .map(Trailer::from)
                .ok_or_else(|| StoreError::NotFound(format!("trailer {trailer_number}")))
        })
    }

    /// Vehicles and trailers with at least one document date in `range`.
    pub async fn documents_expiring(&self, range: DateRange) -> ResultStore<ExpiryReport> {
        let (start, end) = (range.start(), range.end());
        with_tx!(self, |db_tx| {
            let vehicles = vehicles::Entity::find()
                .filter(
                    Condition::any()
                        .add(vehicles::Column::InsuranceExpiry.between(start, end))
                        .add(vehicles::Column::InspectionExpiry.between(start, end))
                        .add(vehicles::Column::TachographCalibration.between(start, end)),
                )
                .order_by_asc(vehicles::Column::VehicleNumber)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Vehicle::from)
                .collect::<Vec<_>>();

            let trailers = trailers::Entity::find()
                .filter(
                    Condition::any()
                        .add(trailers::Column::InsuranceExpiry.between(start, end))
                        .add(trailers::Column::InspectionExpiry.between(start, end)),
                )
                .order_by_asc(trailers::Column::TrailerNumber)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Trailer::from)
                .collect::<Vec<_>>();

            tracing::debug!(
                vehicles = vehicles.len(),
                trailers = trailers.len(),
                %start,
                %end,
                "document expiry search"
            );
            Ok(ExpiryReport { vehicles, trailers })
        })
    }
}
