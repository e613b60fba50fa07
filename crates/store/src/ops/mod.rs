use sea_orm::DatabaseConnection;

use crate::ResultStore;

mod fleet;
mod ledger;
mod plots;
mod refuels;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// SQL-backed entity store.
///
/// Every public operation runs in its own transaction.
#[derive(Debug)]
pub struct Store {
    database: DatabaseConnection,
}

impl Store {
    /// Return a builder for `Store`. Help to build the struct.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }
}

/// The builder for `Store`
#[derive(Default)]
pub struct StoreBuilder {
    database: DatabaseConnection,
}

impl StoreBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> StoreBuilder {
        self.database = db;
        self
    }

    /// Construct `Store`
    pub async fn build(self) -> ResultStore<Store> {
        Ok(Store {
            database: self.database,
        })
    }
}
