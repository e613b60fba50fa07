use std::collections::BTreeSet;

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    DateRange, Expense, ExpenseDraft, ExpenseGroup, LedgerSummary, Payment, PaymentDraft,
    PaymentKind, ResultStore, StoreError, expenses, payments,
};

use super::{Store, with_tx};

impl Store {
    /// Appends one payment to the ledger of an existing plot.
    pub async fn append_payment(&self, draft: PaymentDraft) -> ResultStore<Payment> {
        with_tx!(self, |db_tx| {
            self.require_plot(&db_tx, draft.plot_number).await?;
            self.insert_payment(&db_tx, &draft).await
        })
    }

    /// Appends several payments at once; either all of them are stored or
    /// none is.
    pub async fn record_plot_payments(
        &self,
        drafts: Vec<PaymentDraft>,
    ) -> ResultStore<Vec<Payment>> {
        if drafts.is_empty() {
            return Err(StoreError::invalid("amounts", "enter at least one amount"));
        }
        with_tx!(self, |db_tx| {
            let plot_numbers: BTreeSet<i32> = drafts.iter().map(|d| d.plot_number).collect();
            for plot_number in plot_numbers {
                self.require_plot(&db_tx, plot_number).await?;
            }

            let mut stored = Vec::with_capacity(drafts.len());
            for draft in &drafts {
                stored.push(self.insert_payment(&db_tx, draft).await?);
            }
            Ok(stored)
        })
    }

    /// Every payment of a plot, newest first.
    pub async fn payment_history(&self, plot_number: i32) -> ResultStore<Vec<Payment>> {
        with_tx!(self, |db_tx| {
            self.require_plot(&db_tx, plot_number).await?;
            payments::Entity::find()
                .filter(payments::Column::PlotNumber.eq(plot_number))
                .order_by_desc(payments::Column::PaidOn)
                .order_by_desc(payments::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Payment::try_from)
                .collect::<ResultStore<Vec<_>>>()
        })
    }

    /// Payments dated inside `range`, oldest first.
    pub async fn payments_between(&self, range: DateRange) -> ResultStore<Vec<Payment>> {
        with_tx!(self, |db_tx| self.payments_in(&db_tx, range).await)
    }

    /// Money received per payment kind. Meter readings are not money and are
    /// left out.
    pub async fn payment_summary(
        &self,
        range: DateRange,
    ) -> ResultStore<LedgerSummary<PaymentKind>> {
        let payments = self.payments_between(range).await?;
        let summary = LedgerSummary::collect(
            payments
                .into_iter()
                .filter(|p| p.kind.is_monetary())
                .map(|p| (p.kind, p.amount)),
        )?;
        tracing::debug!(total = %summary.total(), "payment summary");
        Ok(summary)
    }

    pub async fn append_expense(&self, draft: ExpenseDraft) -> ResultStore<Expense> {
        with_tx!(self, |db_tx| {
            let model = expenses::ActiveModel::from(&draft).insert(&db_tx).await?;
            tracing::info!(id = model.id, kind = %model.kind, "expense appended");
            Ok(Expense::from(model))
        })
    }

    /// Expenses dated inside `range`, oldest first.
    pub async fn expenses_between(&self, range: DateRange) -> ResultStore<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            let expenses = expenses::Entity::find()
                .filter(expenses::Column::SpentOn.between(range.start(), range.end()))
                .order_by_asc(expenses::Column::SpentOn)
                .order_by_asc(expenses::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Expense::from)
                .collect::<Vec<_>>();
            Ok(expenses)
        })
    }

    /// Expenses summed per day and category.
    pub async fn expense_summary(
        &self,
        range: DateRange,
    ) -> ResultStore<LedgerSummary<ExpenseGroup>> {
        let expenses = self.expenses_between(range).await?;
        let summary = LedgerSummary::collect(expenses.into_iter().map(|e| {
            (
                ExpenseGroup {
                    spent_on: e.spent_on,
                    kind: e.kind,
                },
                e.amount,
            )
        }))?;
        tracing::debug!(total = %summary.total(), "expense summary");
        Ok(summary)
    }

    async fn insert_payment(
        &self,
        db_tx: &DatabaseTransaction,
        draft: &PaymentDraft,
    ) -> ResultStore<Payment> {
        let model = payments::ActiveModel::from(draft).insert(db_tx).await?;
        tracing::info!(
            plot_number = model.plot_number,
            kind = %model.kind,
            "payment appended"
        );
        Payment::try_from(model)
    }

    async fn payments_in(
        &self,
        db_tx: &DatabaseTransaction,
        range: DateRange,
    ) -> ResultStore<Vec<Payment>> {
        payments::Entity::find()
            .filter(payments::Column::PaidOn.between(range.start(), range.end()))
            .order_by_asc(payments::Column::PaidOn)
            .order_by_asc(payments::Column::Id)
            .all(db_tx)
            .await?
            .into_iter()
            .map(Payment::try_from)
            .collect()
    }
}
