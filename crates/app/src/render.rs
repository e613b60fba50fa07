//! Text blocks printed for query results.
//!
//! Every listing states explicitly when nothing matched.

use std::fmt::Write;

use store::{
    Expense, ExpenseGroup, ExpiryReport, LedgerSummary, Payment, PaymentKind, Plot, PlotAccount,
    Refuel, Trailer, ValidationErrors, Vehicle, format_date,
};

const NO_RESULTS: &str = "No results found.";

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

pub fn refuel(refuel: &Refuel) -> String {
    let figures = &refuel.figures;
    let mut out = String::new();
    let _ = writeln!(out, "Refuel #{}", refuel.id);
    let _ = writeln!(out, "  Vehicle:      {}", refuel.vehicle_number);
    let _ = writeln!(out, "  Date:         {}", format_date(refuel.fuel_date));
    let _ = writeln!(
        out,
        "  Fuel card:    {}",
        refuel.fuel_card.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "  Mileage:      {} -> {} ({} km)",
        refuel.previous_mileage, refuel.current_mileage, figures.distance
    );
    let _ = writeln!(
        out,
        "  Diesel:       {:.2} l x {:.2} = {:.2} {}",
        refuel.diesel_liters, refuel.diesel_price, figures.diesel_cost, refuel.currency
    );
    let _ = writeln!(
        out,
        "  AdBlue:       {:.2} l x {:.2} = {:.2} {}",
        refuel.adblue_liters, refuel.adblue_price, figures.adblue_cost, refuel.currency
    );
    let _ = writeln!(out, "  Full tank:    {}", yes_no(refuel.full_tank));
    let _ = writeln!(
        out,
        "  Consumption:  {:.2} l/100 km",
        figures.average_consumption
    );
    let _ = writeln!(
        out,
        "  Total:        {:.2} {}",
        figures.total_cost, refuel.currency
    );
    out
}

pub fn refuels(refuels: &[Refuel]) -> String {
    if refuels.is_empty() {
        return format!("{NO_RESULTS}\n");
    }
    refuels
        .iter()
        .map(refuel)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn vehicle(vehicle: &Vehicle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Vehicle {}", vehicle.vehicle_number);
    let _ = writeln!(out, "  Insurance:    {}", vehicle.insurance_number);
    let _ = writeln!(
        out,
        "  Insured till: {}",
        format_date(vehicle.insurance_expiry)
    );
    let _ = writeln!(
        out,
        "  Inspection:   {}",
        format_date(vehicle.inspection_expiry)
    );
    let _ = writeln!(
        out,
        "  Tachograph:   {}",
        vehicle
            .tachograph_calibration
            .map(format_date)
            .unwrap_or_else(|| "-".to_string())
    );
    out
}

pub fn trailer(trailer: &Trailer) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trailer {}", trailer.trailer_number);
    let _ = writeln!(out, "  Insurance:    {}", trailer.insurance_number);
    let _ = writeln!(
        out,
        "  Insured till: {}",
        format_date(trailer.insurance_expiry)
    );
    let _ = writeln!(
        out,
        "  Inspection:   {}",
        format_date(trailer.inspection_expiry)
    );
    out
}

pub fn expiry_report(report: &ExpiryReport) -> String {
    if report.is_empty() {
        return format!("{NO_RESULTS}\n");
    }
    report
        .vehicles
        .iter()
        .map(vehicle)
        .chain(report.trailers.iter().map(trailer))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn plot(plot: &Plot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Plot {}", plot.plot_number);
    let _ = writeln!(out, "  Owner:        {}", plot.owner_name);
    let _ = writeln!(out, "  Phone:        {}", plot.phone);
    let _ = writeln!(out, "  Email:        {}", plot.email);
    let _ = writeln!(out, "  Privatised:   {}", yes_no(plot.privatised));
    out
}

pub fn plots(plots: &[Plot]) -> String {
    if plots.is_empty() {
        return format!("{NO_RESULTS}\n");
    }
    plots.iter().map(plot).collect::<Vec<_>>().join("\n")
}

pub fn plot_account(account: &PlotAccount) -> String {
    let balances = &account.balances;
    let mut out = plot(&account.plot);
    let _ = writeln!(out, "  Membership:   {}", balances.membership_fee);
    let _ = writeln!(out, "  Meter:        {}", balances.meter_reading);
    let _ = writeln!(out, "  Electricity:  {}", balances.electricity_paid);
    let _ = writeln!(out, "  Water:        {}", balances.water_paid);
    out
}

pub fn payments(payments: &[Payment]) -> String {
    if payments.is_empty() {
        return format!("{NO_RESULTS}\n");
    }
    let mut out = String::new();
    for payment in payments {
        let _ = writeln!(
            out,
            "{}  plot {:>4}  {:<15} {:>12}",
            format_date(payment.paid_on),
            payment.plot_number,
            payment.kind.label(),
            payment.amount
        );
    }
    out
}

pub fn payment_summary(summary: &LedgerSummary<PaymentKind>) -> String {
    summary_block(summary, |kind| kind.label().to_string())
}

pub fn expense(expense: &Expense) -> String {
    format!(
        "Expense #{}: {} {} on {}\n",
        expense.id,
        expense.kind,
        expense.amount,
        format_date(expense.spent_on)
    )
}

pub fn expense_summary(summary: &LedgerSummary<ExpenseGroup>) -> String {
    summary_block(summary, |group| {
        format!("{}  {}", format_date(group.spent_on), group.kind)
    })
}

fn summary_block<K>(summary: &LedgerSummary<K>, label: impl Fn(&K) -> String) -> String {
    let LedgerSummary::Totals { groups, total } = summary else {
        return format!("No data for the selected period.\nTotal: {}\n", summary.total());
    };
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(
            out,
            "{:<32} {:>12}  ({} entries)",
            label(&group.key),
            group.total,
            group.entries
        );
    }
    let _ = writeln!(out, "Total: {total}");
    out
}

pub fn validation_errors(errors: &ValidationErrors) -> String {
    let mut out = String::from("Invalid input:\n");
    for error in errors.iter() {
        let _ = writeln!(out, "  - {}: {}", error.field, error.message);
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use store::{GroupTotal, Money, PlotBalances};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_listings_say_so() {
        assert_eq!(plots(&[]), "No results found.\n");
        assert_eq!(payments(&[]), "No results found.\n");
        assert_eq!(expiry_report(&ExpiryReport::default()), "No results found.\n");
    }

    #[test]
    fn no_data_summary_shows_zero_total() {
        let text = payment_summary(&LedgerSummary::NoData);
        assert!(text.starts_with("No data"));
        assert!(text.ends_with("Total: 0.00\n"));
    }

    #[test]
    fn summary_lists_groups_and_total() {
        let summary = LedgerSummary::Totals {
            groups: vec![GroupTotal {
                key: ExpenseGroup {
                    spent_on: date(2024, 5, 2),
                    kind: "Road repair".into(),
                },
                total: Money::new(15_050),
                entries: 2,
            }],
            total: Money::new(15_050),
        };
        let text = expense_summary(&summary);
        assert!(text.contains("02/05/2024  Road repair"));
        assert!(text.contains("150.50"));
        assert!(text.ends_with("Total: 150.50\n"));
    }

    #[test]
    fn account_block_shows_balances() {
        let account = PlotAccount {
            plot: Plot {
                plot_number: 3,
                owner_name: "Kovalenko, Olena".into(),
                phone: "380501234567".into(),
                email: "olena@example.com".into(),
                privatised: false,
            },
            balances: PlotBalances {
                water_paid: Money::new(2_050),
                ..Default::default()
            },
        };
        let text = plot_account(&account);
        assert!(text.starts_with("Plot 3\n"));
        assert!(text.contains("Owner:        Kovalenko, Olena"));
        assert!(text.contains("Water:        20.50"));
        assert!(text.contains("Privatised:   no"));
    }

    #[test]
    fn validation_block_lists_every_field() {
        let mut errors = ValidationErrors::default();
        errors.push("phone", "must contain digits only");
        errors.push("email", "must contain '@' and '.'");
        let text = validation_errors(&errors);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("  - phone: must contain digits only"));
    }
}
