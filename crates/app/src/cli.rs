use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use store::{
    RawDateRange, RawExpense, RawPlot, RawPlotBalances, RawPlotPayments, RawRefuel, RawTrailer,
    RawVehicle,
};

#[derive(Parser, Debug)]
#[command(name = "tallybook")]
#[command(about = "Fuel logs, fleet documents and garden plot ledgers")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Override the database: `memory` or a SQLite file path.
    #[arg(long, global = true)]
    pub database: Option<String>,
    /// Override the CSV plot register used by `book`.
    #[arg(long, global = true)]
    pub plots_file: Option<PathBuf>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Refueling log.
    Refuel {
        #[command(subcommand)]
        command: RefuelCommand,
    },
    /// Vehicle documents.
    Vehicle {
        #[command(subcommand)]
        command: VehicleCommand,
    },
    /// Trailer documents.
    Trailer {
        #[command(subcommand)]
        command: TrailerCommand,
    },
    /// Document expiry across vehicles and trailers.
    Fleet {
        #[command(subcommand)]
        command: FleetCommand,
    },
    /// Garden plots and their payment ledger.
    Plot {
        #[command(subcommand)]
        command: PlotCommand,
    },
    /// Organization expenses.
    Expense {
        #[command(subcommand)]
        command: ExpenseCommand,
    },
    /// Plot register kept in the CSV file.
    Book {
        #[command(subcommand)]
        command: BookCommand,
    },
    /// Evaluate an arithmetic expression, e.g. `calc "(40 + 2,5) * 1.5"`.
    Calc {
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RefuelCommand {
    Add(RefuelArgs),
    Search(RefuelSearchArgs),
}

#[derive(Args, Debug)]
pub struct RefuelArgs {
    #[arg(long, default_value = "")]
    pub vehicle: String,
    /// DD/MM/YYYY
    #[arg(long, default_value = "")]
    pub date: String,
    #[arg(long, default_value = "")]
    pub card: String,
    #[arg(long, default_value = "")]
    pub previous_mileage: String,
    #[arg(long, default_value = "")]
    pub current_mileage: String,
    #[arg(long, default_value = "")]
    pub diesel_liters: String,
    #[arg(long, default_value = "")]
    pub diesel_price: String,
    /// EUR or PLN; the configured default when omitted.
    #[arg(long, default_value = "")]
    pub currency: String,
    /// yes/no; a full tank when omitted.
    #[arg(long, default_value = "")]
    pub full_tank: String,
    #[arg(long, default_value = "")]
    pub adblue_liters: String,
    #[arg(long, default_value = "")]
    pub adblue_price: String,
}

impl From<RefuelArgs> for RawRefuel {
    fn from(args: RefuelArgs) -> Self {
        Self {
            vehicle_number: args.vehicle,
            fuel_date: args.date,
            fuel_card: args.card,
            previous_mileage: args.previous_mileage,
            current_mileage: args.current_mileage,
            diesel_liters: args.diesel_liters,
            diesel_price: args.diesel_price,
            currency: args.currency,
            full_tank: args.full_tank,
            adblue_liters: args.adblue_liters,
            adblue_price: args.adblue_price,
        }
    }
}

#[derive(Args, Debug)]
pub struct RefuelSearchArgs {
    #[arg(long)]
    pub vehicle: Option<String>,
    #[arg(long)]
    pub card: Option<String>,
    /// First day, inclusive.
    #[arg(long)]
    pub from: Option<String>,
    /// Last day, inclusive.
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    /// First day, inclusive (DD/MM/YYYY).
    #[arg(long, default_value = "")]
    pub from: String,
    /// Last day, inclusive (DD/MM/YYYY).
    #[arg(long, default_value = "")]
    pub to: String,
}

impl From<RangeArgs> for RawDateRange {
    fn from(args: RangeArgs) -> Self {
        Self {
            start: args.from,
            end: args.to,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum VehicleCommand {
    /// Add a vehicle or update the fields given.
    Save(VehicleArgs),
    Show { number: String },
}

#[derive(Args, Debug)]
pub struct VehicleArgs {
    #[arg(long, default_value = "")]
    pub number: String,
    #[arg(long, default_value = "")]
    pub insurance_number: String,
    #[arg(long, default_value = "")]
    pub insurance_expiry: String,
    #[arg(long, default_value = "")]
    pub inspection_expiry: String,
    #[arg(long, default_value = "")]
    pub tachograph_calibration: String,
}

impl From<VehicleArgs> for RawVehicle {
    fn from(args: VehicleArgs) -> Self {
        Self {
            vehicle_number: args.number,
            insurance_number: args.insurance_number,
            insurance_expiry: args.insurance_expiry,
            inspection_expiry: args.inspection_expiry,
            tachograph_calibration: args.tachograph_calibration,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum TrailerCommand {
    /// Add a trailer or update the fields given.
    Save(TrailerArgs),
    Show { number: String },
}

#[derive(Args, Debug)]
pub struct TrailerArgs {
    #[arg(long, default_value = "")]
    pub number: String,
    #[arg(long, default_value = "")]
    pub insurance_number: String,
    #[arg(long, default_value = "")]
    pub insurance_expiry: String,
    #[arg(long, default_value = "")]
    pub inspection_expiry: String,
}

impl From<TrailerArgs> for RawTrailer {
    fn from(args: TrailerArgs) -> Self {
        Self {
            trailer_number: args.number,
            insurance_number: args.insurance_number,
            insurance_expiry: args.insurance_expiry,
            inspection_expiry: args.inspection_expiry,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum FleetCommand {
    /// Vehicles and trailers with a document date in the range.
    Expiring(RangeArgs),
}

#[derive(Args, Debug)]
pub struct PlotArgs {
    #[arg(long, default_value = "")]
    pub number: String,
    #[arg(long, default_value = "")]
    pub owner: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    /// yes/no
    #[arg(long, default_value = "")]
    pub privatised: String,
}

impl From<PlotArgs> for RawPlot {
    fn from(args: PlotArgs) -> Self {
        Self {
            plot_number: args.number,
            owner_name: args.owner,
            phone: args.phone,
            email: args.email,
            privatised: args.privatised,
        }
    }
}

#[derive(Args, Debug)]
pub struct PlotFindArgs {
    /// Part of the owner name; case and accents are ignored.
    #[arg(long)]
    pub owner: Option<String>,
    #[arg(long)]
    pub privatised: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum PlotCommand {
    /// Add a plot or update the fields given.
    Save(PlotArgs),
    Show {
        #[arg(value_parser = clap::value_parser!(i32).range(1..))]
        number: i32,
    },
    Find(PlotFindArgs),
    /// Record payments made on one day.
    Pay(PayArgs),
    /// Payments of one plot, newest first.
    History {
        #[arg(value_parser = clap::value_parser!(i32).range(1..))]
        number: i32,
    },
    /// Every payment in a date range.
    Payments(RangeArgs),
    /// Money received per payment kind.
    Report(RangeArgs),
}

#[derive(Args, Debug)]
pub struct PayArgs {
    #[arg(long, default_value = "")]
    pub number: String,
    #[arg(long, default_value = "")]
    pub date: String,
    #[arg(long, default_value = "")]
    pub membership_fee: String,
    #[arg(long, default_value = "")]
    pub meter_reading: String,
    #[arg(long, default_value = "")]
    pub electricity: String,
    #[arg(long, default_value = "")]
    pub water: String,
}

impl From<PayArgs> for RawPlotPayments {
    fn from(args: PayArgs) -> Self {
        Self {
            plot_number: args.number,
            paid_on: args.date,
            membership_fee: args.membership_fee,
            meter_reading: args.meter_reading,
            electricity: args.electricity,
            water: args.water,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ExpenseCommand {
    Add(ExpenseArgs),
    /// Expenses summed per day and category.
    Report(RangeArgs),
}

#[derive(Args, Debug)]
pub struct ExpenseArgs {
    #[arg(long, default_value = "")]
    pub kind: String,
    #[arg(long, default_value = "")]
    pub amount: String,
    #[arg(long, default_value = "")]
    pub date: String,
}

impl From<ExpenseArgs> for RawExpense {
    fn from(args: ExpenseArgs) -> Self {
        Self {
            kind: args.kind,
            amount: args.amount,
            spent_on: args.date,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum BookCommand {
    /// Add a plot or update the fields given.
    Save(PlotArgs),
    Show {
        #[arg(value_parser = clap::value_parser!(i32).range(1..))]
        number: i32,
    },
    Find(PlotFindArgs),
    /// Overwrite the running balances of a plot.
    Balances(BalancesArgs),
}

#[derive(Args, Debug)]
pub struct BalancesArgs {
    #[arg(long, default_value = "")]
    pub number: String,
    #[arg(long, default_value = "")]
    pub membership_fee: String,
    #[arg(long, default_value = "")]
    pub meter_reading: String,
    #[arg(long, default_value = "")]
    pub electricity_paid: String,
    #[arg(long, default_value = "")]
    pub water_paid: String,
}

impl From<BalancesArgs> for RawPlotBalances {
    fn from(args: BalancesArgs) -> Self {
        Self {
            plot_number: args.number,
            membership_fee: args.membership_fee,
            meter_reading: args.meter_reading,
            electricity_paid: args.electricity_paid,
            water_paid: args.water_paid,
        }
    }
}
