//! Plot register kept in a CSV file.
//!
//! One line per plot, keyed by plot number. Besides the owner details each
//! line carries four running balances that [`PlotFile::update_balances`]
//! overwrites in place. Fields are quoted as needed, so names containing
//! commas or quotes are stored safely.
//!
//! Every operation reads the whole file and, when it changes something,
//! writes a temporary sibling file that then replaces the original.

use std::{
    collections::BTreeMap,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::{
    Money, Plot, PlotDraft, PlotFilter, ResultStore, StoreError,
    plots::parse_plot_number,
    validation::{Checker, ValidationErrors, parse_decimal, parse_quantity},
};

/// Running values stored next to a plot in the flat file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PlotBalances {
    pub membership_fee: Money,
    /// Last electricity meter reading, in kWh.
    pub meter_reading: f64,
    pub electricity_paid: Money,
    pub water_paid: Money,
}

/// A plot with its balances.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlotAccount {
    pub plot: Plot,
    pub balances: PlotBalances,
}

#[derive(Clone, Debug, Default)]
pub struct RawPlotBalances {
    pub plot_number: String,
    pub membership_fee: String,
    pub meter_reading: String,
    pub electricity_paid: String,
    pub water_paid: String,
}

/// Balances to overwrite. `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BalancesDraft {
    pub plot_number: i32,
    pub membership_fee: Option<Money>,
    pub meter_reading: Option<f64>,
    pub electricity_paid: Option<Money>,
    pub water_paid: Option<Money>,
}

fn parse_balance(raw: &str) -> Result<Money, String> {
    let value = raw.parse::<Money>().map_err(|err| err.to_string())?;
    if value.is_negative() {
        return Err("must not be negative".to_string());
    }
    Ok(value)
}

impl RawPlotBalances {
    pub fn validate(&self) -> Result<BalancesDraft, ValidationErrors> {
        let mut c = Checker::default();
        let plot_number = c.parse("plot_number", &self.plot_number, parse_plot_number);
        let membership_fee = c.parse_optional("membership_fee", &self.membership_fee, parse_balance);
        let meter_reading = c.parse_optional("meter_reading", &self.meter_reading, parse_quantity);
        let electricity_paid =
            c.parse_optional("electricity_paid", &self.electricity_paid, parse_balance);
        let water_paid = c.parse_optional("water_paid", &self.water_paid, parse_balance);

        let (
            Some(plot_number),
            Ok(membership_fee),
            Ok(meter_reading),
            Ok(electricity_paid),
            Ok(water_paid),
        ) = (
            plot_number,
            membership_fee,
            meter_reading,
            electricity_paid,
            water_paid,
        )
        else {
            return Err(c.into_errors());
        };
        c.finish()?;

        Ok(BalancesDraft {
            plot_number,
            membership_fee,
            meter_reading,
            electricity_paid,
            water_paid,
        })
    }
}

impl PlotBalances {
    fn apply(&mut self, draft: &BalancesDraft) {
        if let Some(value) = draft.membership_fee {
            self.membership_fee = value;
        }
        if let Some(value) = draft.meter_reading {
            self.meter_reading = value;
        }
        if let Some(value) = draft.electricity_paid {
            self.electricity_paid = value;
        }
        if let Some(value) = draft.water_paid {
            self.water_paid = value;
        }
    }
}

/// One CSV line. Field order is the column order of the file.
#[derive(Debug, Serialize, Deserialize)]
struct PlotRow {
    plot_number: i32,
    owner_name: String,
    phone: String,
    email: String,
    privatised: bool,
    #[serde(with = "decimal")]
    membership_fee: Money,
    #[serde(with = "reading")]
    meter_reading: f64,
    #[serde(with = "decimal")]
    electricity_paid: Money,
    #[serde(with = "decimal")]
    water_paid: Money,
}

/// Amounts are written as `12.34` so the file stays readable.
mod decimal {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::Money;

    pub(super) fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Ok(Money::ZERO);
        }
        raw.parse().map_err(D::Error::custom)
    }
}

/// Meter readings are plain numbers; an empty cell reads as `0`.
mod reading {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::parse_decimal;

    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Ok(0.0);
        }
        parse_decimal(&raw).map_err(D::Error::custom)
    }
}

impl From<PlotRow> for PlotAccount {
    fn from(row: PlotRow) -> Self {
        Self {
            plot: Plot {
                plot_number: row.plot_number,
                owner_name: row.owner_name,
                phone: row.phone,
                email: row.email,
                privatised: row.privatised,
            },
            balances: PlotBalances {
                membership_fee: row.membership_fee,
                meter_reading: row.meter_reading,
                electricity_paid: row.electricity_paid,
                water_paid: row.water_paid,
            },
        }
    }
}

impl From<&PlotAccount> for PlotRow {
    fn from(account: &PlotAccount) -> Self {
        Self {
            plot_number: account.plot.plot_number,
            owner_name: account.plot.owner_name.clone(),
            phone: account.plot.phone.clone(),
            email: account.plot.email.clone(),
            privatised: account.plot.privatised,
            membership_fee: account.balances.membership_fee,
            meter_reading: account.balances.meter_reading,
            electricity_paid: account.balances.electricity_paid,
            water_paid: account.balances.water_paid,
        }
    }
}

/// CSV-backed plot register.
#[derive(Clone, Debug)]
pub struct PlotFile {
    path: PathBuf,
}

impl PlotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Inserts a new plot or merges the supplied fields. Balances are kept.
    pub async fn upsert_plot(&self, draft: PlotDraft) -> ResultStore<Plot> {
        let mut accounts = self.load().await?;
        let plot_number = draft.plot_number;
        let (existing, balances) = match accounts.remove(&plot_number) {
            Some(account) => (Some(account.plot), account.balances),
            None => (None, PlotBalances::default()),
        };
        let created = existing.is_none();
        let plot = Plot::upsert(existing, draft)?;

        accounts.insert(
            plot_number,
            PlotAccount {
                plot: plot.clone(),
                balances,
            },
        );
        self.save(&accounts).await?;
        tracing::info!(plot_number, created, path = %self.path.display(), "plot saved to file");
        Ok(plot)
    }

    pub async fn plot(&self, plot_number: i32) -> ResultStore<Plot> {
        Ok(self.account(plot_number).await?.plot)
    }

    pub async fn account(&self, plot_number: i32) -> ResultStore<PlotAccount> {
        self.load()
            .await?
            .remove(&plot_number)
            .ok_or_else(|| StoreError::NotFound(format!("plot {plot_number}")))
    }

    pub async fn find_plots(&self, filter: &PlotFilter) -> ResultStore<Vec<Plot>> {
        Ok(self
            .load()
            .await?
            .into_values()
            .map(|account| account.plot)
            .filter(|plot| filter.matches(plot))
            .collect())
    }

    /// Overwrites the supplied balances of an existing plot.
    pub async fn update_balances(&self, draft: BalancesDraft) -> ResultStore<PlotAccount> {
        let mut accounts = self.load().await?;
        let account = accounts
            .get_mut(&draft.plot_number)
            .ok_or_else(|| StoreError::NotFound(format!("plot {}", draft.plot_number)))?;
        account.balances.apply(&draft);
        let updated = account.clone();

        self.save(&accounts).await?;
        tracing::info!(plot_number = draft.plot_number, "plot balances updated");
        Ok(updated)
    }

    /// Reads every line. A missing file is an empty register.
    async fn load(&self) -> ResultStore<BTreeMap<i32, PlotAccount>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "plot file does not exist yet");
                return Ok(BTreeMap::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let mut accounts = BTreeMap::new();
        for row in reader.deserialize::<PlotRow>() {
            let account = PlotAccount::from(row?);
            accounts.insert(account.plot.plot_number, account);
        }
        tracing::debug!(path = %self.path.display(), plots = accounts.len(), "plot file loaded");
        Ok(accounts)
    }

    async fn save(&self, accounts: &BTreeMap<i32, PlotAccount>) -> ResultStore<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for account in accounts.values() {
            writer.serialize(PlotRow::from(account))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| StoreError::FlatFile(err.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
