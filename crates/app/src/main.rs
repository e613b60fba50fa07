use std::process::ExitCode;

use clap::Parser;
use migration::{Migrator, MigratorTrait};
use serde::Serialize;
use store::{
    ErrorKind, Plot, PlotFile, PlotFilter, PlotRepository, RawDateRange, RawExpense, RawPlot,
    RawPlotBalances, RawPlotPayments, RawRefuel, RawTrailer, RawVehicle, RefuelFilter, Store,
    StoreError, ValidationErrors,
    expr::{self, ExprError},
    find_plot_by_owner, parse_date, save_plot,
};
use thiserror::Error;

use cli::{
    BookCommand, Cli, Command, ExpenseCommand, FleetCommand, Format, PlotCommand, PlotFindArgs,
    RefuelCommand, RefuelSearchArgs, TrailerCommand, VehicleCommand,
};
use settings::Settings;

mod cli;
mod render;
mod settings;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("cannot evaluate expression: {0}")]
    Expr(#[from] ExprError),
    #[error("cannot open database: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AppError {
    fn exit_code(&self) -> u8 {
        match self {
            AppError::Store(err) => match err.kind() {
                ErrorKind::Validation => 2,
                ErrorKind::NotFound => 3,
                ErrorKind::Storage => 1,
            },
            AppError::Expr(_) | AppError::Config(_) => 2,
            AppError::Database(_) | AppError::Json(_) => 1,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        AppError::Store(StoreError::Validation(value))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match Settings::load(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            let err = AppError::from(err);
            eprintln!("{err}");
            return ExitCode::from(err.exit_code());
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tallybook={level},store={level},migration={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    match run(cli, &settings).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            match &err {
                AppError::Store(StoreError::Validation(errors)) => {
                    eprint!("{}", render::validation_errors(errors));
                }
                AppError::Store(StoreError::NotFound(_) | StoreError::InvalidAmount(_))
                | AppError::Expr(_) => {
                    eprintln!("{err}");
                }
                _ => {
                    tracing::error!("{err}");
                    eprintln!("{err}");
                }
            }
            ExitCode::from(err.exit_code())
        }
    }
}

/// Runs one command and returns what to print.
async fn run(cli: Cli, settings: &Settings) -> Result<String, AppError> {
    let format = cli.format;
    match cli.command {
        Command::Calc { expression } => {
            let value = expr::evaluate(&expression)?;
            emit(format, &value, |value| format!("{value}\n"))
        }
        Command::Book { command } => {
            let book = PlotFile::new(&settings.plots_file);
            run_book(&book, command, format).await
        }
        Command::Refuel { command } => {
            let store = open_store(settings).await?;
            run_refuels(&store, command, format, settings).await
        }
        Command::Vehicle { command } => {
            let store = open_store(settings).await?;
            run_vehicles(&store, command, format).await
        }
        Command::Trailer { command } => {
            let store = open_store(settings).await?;
            run_trailers(&store, command, format).await
        }
        Command::Fleet {
            command: FleetCommand::Expiring(args),
        } => {
            let range = RawDateRange::from(args).validate()?;
            let store = open_store(settings).await?;
            let report = store.documents_expiring(range).await?;
            emit(format, &report, render::expiry_report)
        }
        Command::Plot { command } => {
            let store = open_store(settings).await?;
            run_plots(&store, command, format).await
        }
        Command::Expense { command } => {
            let store = open_store(settings).await?;
            run_expenses(&store, command, format).await
        }
    }
}

async fn open_store(settings: &Settings) -> Result<Store, AppError> {
    let url = settings.database.url();
    tracing::debug!(%url, "opening database");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(Store::builder().database(database).build().await?)
}

async fn run_refuels(
    store: &Store,
    command: RefuelCommand,
    format: Format,
    settings: &Settings,
) -> Result<String, AppError> {
    match command {
        RefuelCommand::Add(args) => {
            let mut raw = RawRefuel::from(args);
            if raw.currency.trim().is_empty() {
                raw.currency = settings.default_currency.code().to_string();
            }
            let refuel = store.record_refuel(raw.validate()?).await?;
            emit(format, &refuel, render::refuel)
        }
        RefuelCommand::Search(args) => {
            let refuels = store.search_refuels(&refuel_filter(args)?).await?;
            emit(format, &refuels, |r| render::refuels(r))
        }
    }
}

async fn run_vehicles(
    store: &Store,
    command: VehicleCommand,
    format: Format,
) -> Result<String, AppError> {
    match command {
        VehicleCommand::Save(args) => {
            let vehicle = store
                .upsert_vehicle(RawVehicle::from(args).validate()?)
                .await?;
            emit(format, &vehicle, render::vehicle)
        }
        VehicleCommand::Show { number } => {
            emit(format, &store.vehicle(&number).await?, render::vehicle)
        }
    }
}

async fn run_trailers(
    store: &Store,
    command: TrailerCommand,
    format: Format,
) -> Result<String, AppError> {
    match command {
        TrailerCommand::Save(args) => {
            let trailer = store
                .upsert_trailer(RawTrailer::from(args).validate()?)
                .await?;
            emit(format, &trailer, render::trailer)
        }
        TrailerCommand::Show { number } => {
            emit(format, &store.trailer(&number).await?, render::trailer)
        }
    }
}

async fn run_expenses(
    store: &Store,
    command: ExpenseCommand,
    format: Format,
) -> Result<String, AppError> {
    match command {
        ExpenseCommand::Add(args) => {
            let expense = store
                .append_expense(RawExpense::from(args).validate()?)
                .await?;
            emit(format, &expense, render::expense)
        }
        ExpenseCommand::Report(args) => {
            let range = RawDateRange::from(args).validate()?;
            let summary = store.expense_summary(range).await?;
            emit(format, &summary, render::expense_summary)
        }
    }
}

async fn run_plots(store: &Store, command: PlotCommand, format: Format) -> Result<String, AppError> {
    match command {
        PlotCommand::Save(args) => {
            let plot = save_plot(store, &RawPlot::from(args)).await?;
            emit(format, &plot, render::plot)
        }
        PlotCommand::Show { number } => emit(format, &store.plot(number).await?, render::plot),
        PlotCommand::Find(args) => {
            let plots = find_plots(store, args).await?;
            emit(format, &plots, |p| render::plots(p))
        }
        PlotCommand::Pay(args) => {
            let drafts = RawPlotPayments::from(args).validate()?;
            let payments = store.record_plot_payments(drafts).await?;
            emit(format, &payments, |p| render::payments(p))
        }
        PlotCommand::History { number } => {
            let payments = store.payment_history(number).await?;
            emit(format, &payments, |p| render::payments(p))
        }
        PlotCommand::Payments(args) => {
            let range = RawDateRange::from(args).validate()?;
            let payments = store.payments_between(range).await?;
            emit(format, &payments, |p| render::payments(p))
        }
        PlotCommand::Report(args) => {
            let range = RawDateRange::from(args).validate()?;
            let summary = store.payment_summary(range).await?;
            emit(format, &summary, render::payment_summary)
        }
    }
}

async fn run_book(book: &PlotFile, command: BookCommand, format: Format) -> Result<String, AppError> {
    match command {
        BookCommand::Save(args) => {
            let plot = save_plot(book, &RawPlot::from(args)).await?;
            emit(format, &plot, render::plot)
        }
        BookCommand::Show { number } => {
            emit(format, &book.account(number).await?, render::plot_account)
        }
        BookCommand::Find(args) => {
            let plots = find_plots(book, args).await?;
            emit(format, &plots, |p| render::plots(p))
        }
        BookCommand::Balances(args) => {
            let draft = RawPlotBalances::from(args).validate()?;
            let account = book.update_balances(draft).await?;
            emit(format, &account, render::plot_account)
        }
    }
}

/// A single owner match goes through the owner lookup so that a miss is
/// reported as "not found"; other filters list every match.
async fn find_plots<R: PlotRepository>(
    repository: &R,
    args: PlotFindArgs,
) -> Result<Vec<Plot>, AppError> {
    match (args.owner, args.privatised) {
        (Some(owner), None) => Ok(vec![find_plot_by_owner(repository, &owner).await?]),
        (owner, privatised) => Ok(repository
            .find_plots(&PlotFilter {
                owner_contains: owner,
                privatised,
            })
            .await?),
    }
}

fn refuel_filter(args: RefuelSearchArgs) -> Result<RefuelFilter, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut date = |field: &str, raw: Option<String>| match raw.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => parse_date(raw)
            .map_err(|message| errors.push(field, message))
            .ok(),
    };
    let from = date("from", args.from);
    let to = date("to", args.to);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(RefuelFilter {
        vehicle_number: args.vehicle,
        fuel_card: args.card,
        from,
        to,
    })
}

fn emit<T: Serialize>(
    format: Format,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<String, AppError> {
    match format {
        Format::Text => Ok(text(value)),
        Format::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let validation = AppError::from(ValidationErrors::default());
        assert_eq!(validation.exit_code(), 2);
        let missing = AppError::Store(StoreError::NotFound("plot 1".into()));
        assert_eq!(missing.exit_code(), 3);
        let storage = AppError::Store(StoreError::FlatFile("broken".into()));
        assert_eq!(storage.exit_code(), 1);
    }

    #[test]
    fn search_dates_are_checked_together() {
        let errors = refuel_filter(RefuelSearchArgs {
            vehicle: None,
            card: None,
            from: Some("31/02/2024".into()),
            to: Some("soon".into()),
        })
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["from", "to"]);
    }

    #[test]
    fn json_output_is_pretty_printed() {
        let out = emit(Format::Json, &vec![1, 2], |_| String::new()).unwrap();
        assert!(out.starts_with("[\n"));
        assert_eq!(emit(Format::Text, &3, |v| format!("{v}")).unwrap(), "3");
    }

    #[tokio::test]
    async fn calc_runs_without_a_database() {
        let cli = Cli::try_parse_from(["tallybook", "calc", "(40 + 2,5) * 2"]).unwrap();
        let out = run(cli, &Settings::default()).await.unwrap();
        assert_eq!(out, "85\n");
    }

    #[tokio::test]
    async fn store_commands_use_memory_database() {
        let settings = Settings {
            database: settings::Database::Memory,
            ..Settings::default()
        };
        let cli = Cli::try_parse_from(["tallybook", "plot", "show", "4"]).unwrap();
        let err = run(cli, &settings).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);

        let cli = Cli::try_parse_from([
            "tallybook",
            "refuel",
            "add",
            "--vehicle",
            "AB1234CD",
            "--date",
            "01/03/2024",
            "--previous-mileage",
            "1000",
            "--current-mileage",
            "1500",
            "--diesel-liters",
            "40",
            "--diesel-price",
            "1.5",
        ])
        .unwrap();
        let out = run(cli, &settings).await.unwrap();
        assert!(out.contains("Total:        60.00 EUR"));
    }
}
