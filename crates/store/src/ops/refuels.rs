use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Refuel, RefuelDraft, RefuelFigures, RefuelFilter, ResultStore, StoreError, refuels,
};

use super::{Store, with_tx};

impl Store {
    /// Saves a refueling. Derived figures are computed here, never taken from
    /// the caller.
    pub async fn record_refuel(&self, draft: RefuelDraft) -> ResultStore<Refuel> {
        let figures = RefuelFigures::compute(&draft);
        with_tx!(self, |db_tx| {
            let model = refuels::ActiveModel::from_draft(&draft, &figures)
                .insert(&db_tx)
                .await?;
            tracing::info!(
                id = model.id,
                vehicle = %model.vehicle_number,
                distance = figures.distance,
                "refuel recorded"
            );
            Refuel::try_from(model)
        })
    }

    /// Refuelings matching every set field of `filter`, oldest first.
    pub async fn search_refuels(&self, filter: &RefuelFilter) -> ResultStore<Vec<Refuel>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to)
            && from > to
        {
            return Err(StoreError::invalid("to", "must not be before the start date"));
        }

        with_tx!(self, |db_tx| {
            let mut query = refuels::Entity::find();
            if let Some(number) = filter.vehicle_number.as_deref().map(str::trim)
                && !number.is_empty()
            {
                query = query.filter(refuels::Column::VehicleNumber.eq(number));
            }
            if let Some(card) = filter.fuel_card.as_deref().map(str::trim)
                && !card.is_empty()
            {
                query = query.filter(refuels::Column::FuelCard.eq(card));
            }
            if let Some(from) = filter.from {
                query = query.filter(refuels::Column::FuelDate.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(refuels::Column::FuelDate.lte(to));
            }

            let models = query
                .order_by_asc(refuels::Column::FuelDate)
                .order_by_asc(refuels::Column::Id)
                .all(&db_tx)
                .await?;
            tracing::debug!(found = models.len(), "refuel search");
            models
                .into_iter()
                .map(Refuel::try_from)
                .collect::<ResultStore<Vec<_>>>()
        })
    }
}
