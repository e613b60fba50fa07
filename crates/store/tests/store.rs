use chrono::NaiveDate;
use sea_orm::Database;

use migration::MigratorTrait;
use store::{
    DateRange, ErrorKind, ExpenseGroup, LedgerSummary, Money, PaymentDraft, PaymentKind,
    PlotDraft, PlotFilter, RawExpense, RawPlot, RawPlotPayments, RawRefuel, RawTrailer,
    RawVehicle, RefuelFilter, Store, StoreError,
};

async fn store_with_db() -> Store {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Store::builder().database(db).build().await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).unwrap()
}

fn refuel(vehicle: &str, day: &str, card: &str, previous: &str, current: &str) -> RawRefuel {
    RawRefuel {
        vehicle_number: vehicle.into(),
        fuel_date: day.into(),
        fuel_card: card.into(),
        previous_mileage: previous.into(),
        current_mileage: current.into(),
        diesel_liters: "40".into(),
        diesel_price: "1.5".into(),
        currency: "EUR".into(),
        full_tank: "yes".into(),
        adblue_liters: String::new(),
        adblue_price: String::new(),
    }
}

fn owner(number: &str, name: &str) -> RawPlot {
    RawPlot {
        plot_number: number.into(),
        owner_name: name.into(),
        phone: "380501234567".into(),
        email: "owner@example.com".into(),
        privatised: "no".into(),
    }
}

async fn seed_plot(store: &Store, number: &str, name: &str) {
    store::save_plot(store, &owner(number, name)).await.unwrap();
}

#[tokio::test]
async fn refuel_figures_are_computed_on_save() {
    let store = store_with_db().await;
    let draft = refuel("AB1234CD", "01/03/2024", "", "1000", "1500")
        .validate()
        .unwrap();

    let saved = store.record_refuel(draft).await.unwrap();
    assert_eq!(saved.figures.diesel_cost, 60.0);
    assert_eq!(saved.figures.distance, 500);
    assert_eq!(saved.figures.average_consumption, 40.0 / 500.0 * 100.0);
    assert_eq!(saved.figures.total_cost, 60.0);
    assert_eq!(saved.fuel_card, None);
}

#[tokio::test]
async fn refuel_without_distance_is_stored_with_zero_average() {
    let store = store_with_db().await;
    let draft = refuel("AB1234CD", "01/03/2024", "", "1500", "1500")
        .validate()
        .unwrap();

    let saved = store.record_refuel(draft).await.unwrap();
    assert_eq!(saved.figures.distance, 0);
    assert_eq!(saved.figures.average_consumption, 0.0);
}

#[test]
fn impossible_date_never_reaches_the_store() {
    let errors = refuel("AB1234CD", "31/02/2024", "", "1000", "1500")
        .validate()
        .unwrap_err();
    assert_eq!(errors.fields(), vec!["fuel_date"]);
}

#[tokio::test]
async fn refuel_search_filters_are_combined() {
    let store = store_with_db().await;
    for raw in [
        refuel("AB1234CD", "01/03/2024", "CARD-1", "1000", "1500"),
        refuel("AB1234CD", "15/03/2024", "CARD-2", "1500", "1900"),
        refuel("AB1234CD", "01/04/2024", "CARD-1", "1900", "2300"),
        refuel("XY9876ZW", "10/03/2024", "CARD-1", "500", "800"),
    ] {
        store.record_refuel(raw.validate().unwrap()).await.unwrap();
    }

    let march = store
        .search_refuels(&RefuelFilter {
            vehicle_number: Some("AB1234CD".into()),
            from: Some(date(2024, 3, 1)),
            to: Some(date(2024, 3, 31)),
            ..Default::default()
        })
        .await
        .unwrap();
    let days: Vec<_> = march.iter().map(|r| r.fuel_date).collect();
    assert_eq!(days, vec![date(2024, 3, 1), date(2024, 3, 15)]);

    let card = store
        .search_refuels(&RefuelFilter {
            fuel_card: Some("CARD-1".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(card.len(), 3);

    let everything = store.search_refuels(&RefuelFilter::default()).await.unwrap();
    assert_eq!(everything.len(), 4);
    assert!(everything.windows(2).all(|w| w[0].fuel_date <= w[1].fuel_date));
}

#[tokio::test]
async fn refuel_search_rejects_reversed_range() {
    let store = store_with_db().await;
    let err = store
        .search_refuels(&RefuelFilter {
            from: Some(date(2024, 4, 1)),
            to: Some(date(2024, 3, 1)),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn new_vehicle_needs_its_documents() {
    let store = store_with_db().await;
    let draft = RawVehicle {
        vehicle_number: "AB1234CD".into(),
        insurance_expiry: "01/01/2025".into(),
        ..Default::default()
    }
    .validate()
    .unwrap();

    let err = store.upsert_vehicle(draft).await.unwrap_err();
    let StoreError::Validation(errors) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(errors.fields(), vec!["insurance_number", "inspection_expiry"]);
    assert_eq!(
        store.vehicle("AB1234CD").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn vehicle_upsert_keeps_fields_left_empty() {
    let store = store_with_db().await;
    let created = RawVehicle {
        vehicle_number: "AB1234CD".into(),
        insurance_number: "INS-1".into(),
        insurance_expiry: "01/01/2025".into(),
        inspection_expiry: "15/06/2025".into(),
        tachograph_calibration: String::new(),
    };
    store
        .upsert_vehicle(created.validate().unwrap())
        .await
        .unwrap();

    let update = RawVehicle {
        vehicle_number: "AB1234CD".into(),
        inspection_expiry: "20/06/2026".into(),
        tachograph_calibration: "01/02/2026".into(),
        ..Default::default()
    };
    store
        .upsert_vehicle(update.validate().unwrap())
        .await
        .unwrap();

    let stored = store.vehicle(" AB1234CD ").await.unwrap();
    assert_eq!(stored.insurance_number, "INS-1");
    assert_eq!(stored.insurance_expiry, date(2025, 1, 1));
    assert_eq!(stored.inspection_expiry, date(2026, 6, 20));
    assert_eq!(stored.tachograph_calibration, Some(date(2026, 2, 1)));

    // An update that supplies nothing changes nothing.
    let unchanged = store
        .upsert_vehicle(
            RawVehicle {
                vehicle_number: "AB1234CD".into(),
                ..Default::default()
            }
            .validate()
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unchanged, stored);
}

#[tokio::test]
async fn expiring_documents_use_inclusive_bounds() {
    let store = store_with_db().await;
    let vehicles = [
        ("AA0001", "31/01/2025", "01/06/2025", ""),
        ("AA0002", "01/06/2025", "01/07/2025", "01/01/2025"),
        ("AA0003", "01/06/2025", "01/07/2025", ""),
    ];
    for (number, insurance, inspection, tachograph) in vehicles {
        let raw = RawVehicle {
            vehicle_number: number.into(),
            insurance_number: format!("INS-{number}"),
            insurance_expiry: insurance.into(),
            inspection_expiry: inspection.into(),
            tachograph_calibration: tachograph.into(),
        };
        store.upsert_vehicle(raw.validate().unwrap()).await.unwrap();
    }
    let trailer = RawTrailer {
        trailer_number: "TR-7".into(),
        insurance_number: "INS-T".into(),
        insurance_expiry: "01/03/2025".into(),
        inspection_expiry: "15/01/2025".into(),
    };
    store
        .upsert_trailer(trailer.validate().unwrap())
        .await
        .unwrap();

    let report = store
        .documents_expiring(range(date(2025, 1, 1), date(2025, 1, 31)))
        .await
        .unwrap();
    let numbers: Vec<_> = report
        .vehicles
        .iter()
        .map(|v| v.vehicle_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["AA0001", "AA0002"]);
    assert_eq!(report.trailers.len(), 1);
    assert_eq!(report.trailers[0].trailer_number, "TR-7");

    let quiet = store
        .documents_expiring(range(date(2030, 1, 1), date(2030, 12, 31)))
        .await
        .unwrap();
    assert!(quiet.is_empty());
}

#[tokio::test]
async fn trailer_upsert_merges_supplied_fields() {
    let store = store_with_db().await;
    let created = RawTrailer {
        trailer_number: "TR-7".into(),
        insurance_number: "INS-T".into(),
        insurance_expiry: "01/03/2025".into(),
        inspection_expiry: "15/01/2025".into(),
    };
    store
        .upsert_trailer(created.validate().unwrap())
        .await
        .unwrap();

    let update = RawTrailer {
        trailer_number: "TR-7".into(),
        insurance_number: "INS-T2".into(),
        ..Default::default()
    };
    let stored = store
        .upsert_trailer(update.validate().unwrap())
        .await
        .unwrap();
    assert_eq!(stored.insurance_number, "INS-T2");
    assert_eq!(stored.insurance_expiry, date(2025, 3, 1));
    assert_eq!(store.trailer("TR-7").await.unwrap(), stored);
}

#[tokio::test]
async fn plot_upsert_then_find_returns_merged_state() {
    let store = store_with_db().await;
    seed_plot(&store, "12", "Olena Kovalenko").await;

    let update = RawPlot {
        plot_number: "12".into(),
        email: "olena@example.org".into(),
        privatised: "так".into(),
        ..Default::default()
    };
    store::save_plot(&store, &update).await.unwrap();

    let plot = store.plot(12).await.unwrap();
    assert_eq!(plot.owner_name, "Olena Kovalenko");
    assert_eq!(plot.phone, "380501234567");
    assert_eq!(plot.email, "olena@example.org");
    assert!(plot.privatised);
}

#[tokio::test]
async fn new_plot_without_contacts_is_rejected() {
    let store = store_with_db().await;
    let err = store
        .upsert_plot(PlotDraft {
            plot_number: 4,
            owner_name: Some("Ivan".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        store.plot(4).await.unwrap_err(),
        StoreError::NotFound("plot 4".to_string())
    );
}

#[tokio::test]
async fn plots_are_found_by_owner_ignoring_case_and_accents() {
    let store = store_with_db().await;
    seed_plot(&store, "3", "Élodie Durand").await;
    seed_plot(&store, "8", "Ivan Petrenko").await;

    let found = store::find_plot_by_owner(&store, "elodie").await.unwrap();
    assert_eq!(found.plot_number, 3);

    let all = store.find_plots(&PlotFilter::default()).await.unwrap();
    let numbers: Vec<_> = all.iter().map(|p| p.plot_number).collect();
    assert_eq!(numbers, vec![3, 8]);

    assert_eq!(
        store::find_plot_by_owner(&store, "nobody")
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn payments_need_an_existing_plot() {
    let store = store_with_db().await;
    let drafts = RawPlotPayments {
        plot_number: "99".into(),
        paid_on: "01/05/2024".into(),
        water: "10".into(),
        ..Default::default()
    }
    .validate()
    .unwrap();

    let err = store.record_plot_payments(drafts).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn payment_history_is_newest_first() {
    let store = store_with_db().await;
    seed_plot(&store, "12", "Olena Kovalenko").await;
    for (day, amount) in [("01/03/2024", "10"), ("01/05/2024", "30"), ("01/04/2024", "20")] {
        let drafts = RawPlotPayments {
            plot_number: "12".into(),
            paid_on: day.into(),
            electricity: amount.into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        store.record_plot_payments(drafts).await.unwrap();
    }

    let history = store.payment_history(12).await.unwrap();
    let days: Vec<_> = history.iter().map(|p| p.paid_on).collect();
    assert_eq!(days, vec![date(2024, 5, 1), date(2024, 4, 1), date(2024, 3, 1)]);
}

#[tokio::test]
async fn payment_summary_leaves_out_meter_readings() {
    let store = store_with_db().await;
    seed_plot(&store, "12", "Olena Kovalenko").await;
    seed_plot(&store, "14", "Ivan Petrenko").await;

    let first = RawPlotPayments {
        plot_number: "12".into(),
        paid_on: "01/05/2024".into(),
        membership_fee: "150".into(),
        meter_reading: "4521.5".into(),
        electricity: "42,30".into(),
        ..Default::default()
    };
    let second = RawPlotPayments {
        plot_number: "14".into(),
        paid_on: "31/05/2024".into(),
        membership_fee: "150".into(),
        ..Default::default()
    };
    let outside = RawPlotPayments {
        plot_number: "14".into(),
        paid_on: "01/06/2024".into(),
        water: "99".into(),
        ..Default::default()
    };
    for raw in [first, second, outside] {
        store
            .record_plot_payments(raw.validate().unwrap())
            .await
            .unwrap();
    }

    let may = range(date(2024, 5, 1), date(2024, 5, 31));
    assert_eq!(store.payments_between(may).await.unwrap().len(), 4);

    let summary = store.payment_summary(may).await.unwrap();
    assert_eq!(summary.total(), Money::new(34_230));
    let kinds: Vec<_> = summary.groups().iter().map(|g| (g.key, g.total)).collect();
    assert_eq!(
        kinds,
        vec![
            (PaymentKind::MembershipFee, Money::new(30_000)),
            (PaymentKind::Electricity, Money::new(4_230)),
        ]
    );
}

#[tokio::test]
async fn empty_range_aggregates_to_no_data() {
    let store = store_with_db().await;
    seed_plot(&store, "12", "Olena Kovalenko").await;
    let drafts = RawPlotPayments {
        plot_number: "12".into(),
        paid_on: "01/05/2024".into(),
        water: "10".into(),
        ..Default::default()
    }
    .validate()
    .unwrap();
    store.record_plot_payments(drafts).await.unwrap();

    let january = range(date(2024, 1, 1), date(2024, 1, 31));
    let payments = store.payment_summary(january).await.unwrap();
    assert_eq!(payments, LedgerSummary::NoData);
    assert_eq!(payments.total(), Money::ZERO);

    let expenses = store.expense_summary(january).await.unwrap();
    assert!(expenses.is_empty());
    assert_eq!(expenses.total(), Money::ZERO);
}

#[tokio::test]
async fn oversized_expense_total_is_an_error() {
    let store = store_with_db().await;
    for day in ["02/05/2024", "03/05/2024"] {
        let draft = RawExpense {
            kind: "Fence".into(),
            amount: "50000000000000000".into(),
            spent_on: day.into(),
        }
        .validate()
        .unwrap();
        store.append_expense(draft).await.unwrap();
    }

    let err = store
        .expense_summary(range(date(2024, 5, 1), date(2024, 5, 31)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidAmount(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn single_payment_is_appended_to_the_ledger() {
    let store = store_with_db().await;
    seed_plot(&store, "12", "Olena Kovalenko").await;

    let payment = store
        .append_payment(PaymentDraft {
            plot_number: 12,
            kind: PaymentKind::Water,
            amount: Money::new(1_250),
            paid_on: date(2024, 5, 3),
        })
        .await
        .unwrap();
    assert_eq!(payment.plot_number, 12);
    assert_eq!(payment.amount, Money::new(1_250));

    let err = store
        .append_payment(PaymentDraft {
            plot_number: 99,
            kind: PaymentKind::Water,
            amount: Money::new(500),
            paid_on: date(2024, 5, 3),
        })
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::NotFound("plot 99".to_string()));

    let may = store
        .payments_between(range(date(2024, 5, 1), date(2024, 5, 31)))
        .await
        .unwrap();
    assert_eq!(may, vec![payment]);
}

#[tokio::test]
async fn rejected_payment_batch_stores_nothing() {
    let store = store_with_db().await;
    seed_plot(&store, "12", "Olena Kovalenko").await;
    let paid_on = date(2024, 5, 3);

    let err = store
        .record_plot_payments(vec![
            PaymentDraft {
                plot_number: 12,
                kind: PaymentKind::MembershipFee,
                amount: Money::new(15_000),
                paid_on,
            },
            PaymentDraft {
                plot_number: 99,
                kind: PaymentKind::Water,
                amount: Money::new(500),
                paid_on,
            },
        ])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert!(store.payment_history(12).await.unwrap().is_empty());
}

#[tokio::test]
async fn expense_summary_groups_by_day_and_kind() {
    let store = store_with_db().await;
    for (kind, amount, day) in [
        ("Road repair", "100", "02/05/2024"),
        ("Road repair", "50.50", "02/05/2024"),
        ("Water pump", "300", "02/05/2024"),
        ("Road repair", "25", "10/05/2024"),
    ] {
        let draft = RawExpense {
            kind: kind.into(),
            amount: amount.into(),
            spent_on: day.into(),
        }
        .validate()
        .unwrap();
        store.append_expense(draft).await.unwrap();
    }

    let summary = store
        .expense_summary(range(date(2024, 5, 1), date(2024, 5, 31)))
        .await
        .unwrap();
    assert_eq!(summary.total(), Money::new(47_550));
    let lines: Vec<_> = summary
        .groups()
        .iter()
        .map(|g| (g.key.clone(), g.total, g.entries))
        .collect();
    assert_eq!(
        lines,
        vec![
            (
                ExpenseGroup {
                    spent_on: date(2024, 5, 2),
                    kind: "Road repair".into()
                },
                Money::new(15_050),
                2
            ),
            (
                ExpenseGroup {
                    spent_on: date(2024, 5, 2),
                    kind: "Water pump".into()
                },
                Money::new(30_000),
                1
            ),
            (
                ExpenseGroup {
                    spent_on: date(2024, 5, 10),
                    kind: "Road repair".into()
                },
                Money::new(2_500),
                1
            ),
        ]
    );
}
