//! Storage-agnostic access to plots.
//!
//! Both the SQL [`Store`] and the CSV [`PlotFile`] keep plots keyed by plot
//! number and apply the same merge rules, so callers that only manage owner
//! details can work against either.

use crate::{
    Plot, PlotDraft, PlotFile, PlotFilter, RawPlot, ResultStore, Store, StoreError,
};

pub trait PlotRepository {
    /// Inserts a new plot or merges the supplied fields into the stored one.
    fn upsert_plot(&self, draft: PlotDraft) -> impl Future<Output = ResultStore<Plot>> + Send;

    /// Point lookup by plot number.
    fn plot(&self, plot_number: i32) -> impl Future<Output = ResultStore<Plot>> + Send;

    /// Plots matching `filter`, ordered by plot number.
    fn find_plots(
        &self,
        filter: &PlotFilter,
    ) -> impl Future<Output = ResultStore<Vec<Plot>>> + Send;
}

/// Validates an owner form and saves it.
pub async fn save_plot<R: PlotRepository>(repository: &R, raw: &RawPlot) -> ResultStore<Plot> {
    let draft = raw.validate().map_err(StoreError::Validation)?;
    repository.upsert_plot(draft).await
}

/// Returns the first plot whose owner name matches `owner`.
pub async fn find_plot_by_owner<R: PlotRepository>(
    repository: &R,
    owner: &str,
) -> ResultStore<Plot> {
    if owner.trim().is_empty() {
        return Err(StoreError::invalid("owner_name", "must not be empty"));
    }
    repository
        .find_plots(&PlotFilter::owner(owner))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(owner.trim().to_string()))
}

impl PlotRepository for Store {
    fn upsert_plot(&self, draft: PlotDraft) -> impl Future<Output = ResultStore<Plot>> + Send {
        Store::upsert_plot(self, draft)
    }

    fn plot(&self, plot_number: i32) -> impl Future<Output = ResultStore<Plot>> + Send {
        Store::plot(self, plot_number)
    }

    fn find_plots(
        &self,
        filter: &PlotFilter,
    ) -> impl Future<Output = ResultStore<Vec<Plot>>> + Send {
        Store::find_plots(self, filter)
    }
}

impl PlotRepository for PlotFile {
    fn upsert_plot(&self, draft: PlotDraft) -> impl Future<Output = ResultStore<Plot>> + Send {
        PlotFile::upsert_plot(self, draft)
    }

    fn plot(&self, plot_number: i32) -> impl Future<Output = ResultStore<Plot>> + Send {
        PlotFile::plot(self, plot_number)
    }

    fn find_plots(
        &self,
        filter: &PlotFilter,
    ) -> impl Future<Output = ResultStore<Vec<Plot>>> + Send {
        PlotFile::find_plots(self, filter)
    }
}
