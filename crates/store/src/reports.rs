//! Aggregated views over the ledgers and the fleet.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Money, ResultStore, StoreError, Trailer, Vehicle};

/// Sum of the entries sharing one grouping key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupTotal<K> {
    pub key: K,
    pub total: Money,
    pub entries: usize,
}

/// Result of a ledger aggregation.
///
/// An empty range is an explicit [`LedgerSummary::NoData`] rather than an
/// empty list of groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LedgerSummary<K> {
    NoData,
    Totals { groups: Vec<GroupTotal<K>>, total: Money },
}

impl<K: Ord> LedgerSummary<K> {
    /// Groups `(key, amount)` pairs, ordered by key.
    ///
    /// Fails with [`StoreError::InvalidAmount`] when a total does not fit in
    /// the money range.
    pub fn collect(items: impl IntoIterator<Item = (K, Money)>) -> ResultStore<Self> {
        let mut grouped = BTreeMap::<K, (Money, usize)>::new();
        for (key, amount) in items {
            let slot = grouped.entry(key).or_insert((Money::ZERO, 0));
            slot.0 = add_amount(slot.0, amount)?;
            slot.1 += 1;
        }
        if grouped.is_empty() {
            return Ok(Self::NoData);
        }

        let mut total = Money::ZERO;
        let mut groups = Vec::with_capacity(grouped.len());
        for (key, (group_total, entries)) in grouped {
            total = add_amount(total, group_total)?;
            groups.push(GroupTotal {
                key,
                total: group_total,
                entries,
            });
        }
        Ok(Self::Totals { groups, total })
    }
}

fn add_amount(total: Money, amount: Money) -> ResultStore<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| StoreError::InvalidAmount("ledger total is out of range".to_string()))
}

impl<K> LedgerSummary<K> {
    pub fn total(&self) -> Money {
        match self {
            Self::NoData => Money::ZERO,
            Self::Totals { total, .. } => *total,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoData)
    }

    pub fn groups(&self) -> &[GroupTotal<K>] {
        match self {
            Self::NoData => &[],
            Self::Totals { groups, .. } => groups,
        }
    }
}

/// Grouping key of the expense report: one line per day and category.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ExpenseGroup {
    pub spent_on: NaiveDate,
    pub kind: String,
}

/// Vehicles and trailers with a document date inside the searched range.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExpiryReport {
    pub vehicles: Vec<Vehicle>,
    pub trailers: Vec<Trailer>,
}

impl ExpiryReport {
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty() && self.trailers.is_empty()
    }
}
