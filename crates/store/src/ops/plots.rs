use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Plot, PlotDraft, PlotFilter, ResultStore, StoreError, plots};

use super::{Store, with_tx};

impl Store {
    /// Inserts a new plot or merges the supplied fields into the stored one.
    pub async fn upsert_plot(&self, draft: PlotDraft) -> ResultStore<Plot> {
        with_tx!(self, |db_tx| {
            let existing = plots::Entity::find_by_id(draft.plot_number)
                .one(&db_tx)
                .await?
                .map(Plot::from);
            let created = existing.is_none();
            let plot = Plot::upsert(existing, draft)?;

            let model: plots::ActiveModel = (&plot).into();
            if created {
                model.insert(&db_tx).await?;
            } else {
                model.update(&db_tx).await?;
            }
            tracing::info!(plot_number = plot.plot_number, created, "plot saved");
            Ok(plot)
        })
    }

    pub async fn plot(&self, plot_number: i32) -> ResultStore<Plot> {
        with_tx!(self, |db_tx| {
            let model = self.require_plot(&db_tx, plot_number).await?;
            Ok(Plot::from(model))
        })
    }

    /// Plots matching `filter`, ordered by plot number.
    pub async fn find_plots(&self, filter: &PlotFilter) -> ResultStore<Vec<Plot>> {
        with_tx!(self, |db_tx| {
            let mut query = plots::Entity::find();
            if let Some(privatised) = filter.privatised {
                query = query.filter(plots::Column::Privatised.eq(privatised));
            }
            // Owner matching folds case and accents, which SQLite cannot do.
            let plots = query
                .order_by_asc(plots::Column::PlotNumber)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Plot::from)
                .filter(|plot| filter.matches(plot))
                .collect::<Vec<_>>();
            tracing::debug!(found = plots.len(), "plot search");
            Ok(plots)
        })
    }

    pub(super) async fn require_plot(
        &self,
        db_tx: &DatabaseTransaction,
        plot_number: i32,
    ) -> ResultStore<plots::Model> {
        plots::Entity::find_by_id(plot_number)
            .one(db_tx)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("plot {plot_number}")))
    }
}
