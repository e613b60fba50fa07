//! Record store for small-organization bookkeeping.
//!
//! The crate covers three record families:
//!
//! - fuel logs ([`Refuel`]) with derived costs and consumption;
//! - fleet documents ([`Vehicle`], [`Trailer`]) and their expiry dates;
//! - garden plots ([`Plot`]) with append-only payment and expense ledgers.
//!
//! Input arrives as `Raw*` forms holding the strings a user typed. Each form
//! validates into a typed draft, reporting every violated rule at once, and
//! only drafts reach the storage layer. [`Store`] keeps everything in SQL
//! through sea-orm; [`PlotFile`] keeps the plot register in a CSV file. Both
//! implement [`PlotRepository`].

pub use currency::Currency;
pub use error::{ErrorKind, StoreError};
pub use expenses::{Expense, ExpenseDraft, RawExpense};
pub use flat_file::{BalancesDraft, PlotAccount, PlotBalances, PlotFile, RawPlotBalances};
pub use money::{Money, ParseMoneyError};
pub use ops::{Store, StoreBuilder};
pub use payments::{Payment, PaymentDraft, PaymentKind, RawPlotPayments};
pub use plots::{Plot, PlotDraft, PlotFilter, RawPlot};
pub use range::{DateRange, RawDateRange};
pub use refuels::{RawRefuel, Refuel, RefuelDraft, RefuelFigures, RefuelFilter};
pub use reports::{ExpenseGroup, ExpiryReport, GroupTotal, LedgerSummary};
pub use repository::{PlotRepository, find_plot_by_owner, save_plot};
pub use trailers::{RawTrailer, Trailer, TrailerDraft};
pub use validation::{DATE_FORMAT, FieldError, ValidationErrors, format_date, parse_date};
pub use vehicles::{RawVehicle, Vehicle, VehicleDraft};

pub mod calc;
mod currency;
mod error;
mod expenses;
pub mod expr;
mod flat_file;
mod money;
mod ops;
mod payments;
mod plots;
mod range;
mod refuels;
mod reports;
mod repository;
mod trailers;
mod util;
mod validation;
mod vehicles;

pub type ResultStore<T> = Result<T, StoreError>;
