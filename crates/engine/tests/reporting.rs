use chrono::{NaiveDate, TimeZone, Utc};

use engine::{
    AdvisorRow, CommissionInputs, MonthFilter, MonthlySeries, Operation, OperationQuery,
    OperationStatus, Participant, ParticipantId, PipelineFees, ReportClock, Role, Roster,
    SortKey, SortState, StatusFilter, Summary, Viewer, YearFilter, filters, net_fee_for,
    reports, split_commission,
};

const LEADER: &str = "leader";

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn roster() -> Roster {
    [
        Participant::new(LEADER, Role::TeamLeaderBroker).named("Laura", "Gómez"),
        Participant::new("ana", Role::Advisor).named("Ana", "Peña"),
        Participant::new("bruno", Role::Advisor).named("Bruno", "Díaz"),
    ]
    .into_iter()
    .collect()
}

/// 200k reservation at 3% + 3%, closed in the given month of 2024.
fn closed_deal(month: u32) -> Operation {
    let mut op = Operation::new(LEADER, 200_000.0);
    op.buyer_side_percent = 3.0;
    op.seller_side_percent = 3.0;
    op.status = OperationStatus::Closed;
    op.reservation_date = Some(date(2024, month, 1));
    op.closing_date = Some(date(2024, month, 21));
    op
}

fn book() -> Vec<Operation> {
    // leader alone
    let mut solo = closed_deal(1);
    solo.buyer_side = true;
    solo.address = Some("Av. Corrientes 1234".to_string());

    // ana alone at 50%
    let mut ana = closed_deal(2);
    ana.primary_advisor_id = Some("ana".into());
    ana.advisor_percent = 50.0;
    ana.buyer_side = true;
    ana.seller_side = true;
    ana.address = Some("Av. Santa Fe 5678".to_string());

    // ana + bruno at 60/40
    let mut shared = closed_deal(3);
    shared.primary_advisor_id = Some("ana".into());
    shared.secondary_advisor_id = Some("bruno".into());
    shared.advisor_percent = 60.0;
    shared.secondary_advisor_percent = 40.0;
    shared.seller_side = true;

    // bruno on a brokerage-sourced listing
    let mut sourced = closed_deal(3);
    sourced.primary_advisor_id = Some("bruno".into());
    sourced.advisor_percent = 50.0;
    sourced.listing_not_owned = true;

    // still open, reserved in 2025
    let mut open = Operation::new(LEADER, 100_000.0);
    open.buyer_side_percent = 4.0;
    open.reservation_date = Some(date(2025, 5, 10));

    // fell through
    let mut fallen = closed_deal(4);
    fallen.status = OperationStatus::InProgress;
    fallen.closing_date = None;
    fallen.mark_fallen("financing rejected").unwrap();

    vec![solo, ana, shared, sourced, open, fallen]
}

#[test]
fn retained_fee_formula_holds() {
    let split = split_commission(&CommissionInputs {
        reservation_value: 350_000.0,
        gross_commission_percent: 5.0,
        advisor_percent: 40.0,
        shared_partner_percent: 20.0,
        referral_percent: 25.0,
    });
    let expected = 350_000.0 * 5.0 / 100.0 * (1.0 - 0.20) * (1.0 - 0.25);
    assert!(approx(split.retained_brokerage_fee, expected));
    assert!(approx(split.advisor_fee, expected * 0.4));
}

#[test]
fn net_shares_add_up_to_retained_fee() {
    let roster = roster();
    let ops = book();
    for op in &ops {
        let retained = engine::CommissionSplit::of(op).retained_brokerage_fee;
        let total: f64 = roster.iter().map(|p| net_fee_for(op, p)).sum();
        assert!(approx(total, retained), "op {} leaks fees", op.id);
    }
}

#[test]
fn gross_excludes_not_owned_listings_but_net_does_not() {
    let roster = roster();
    let ops = book();
    let closed = OperationQuery {
        status: StatusFilter::Status(OperationStatus::Closed),
        ..OperationQuery::default()
    }
    .apply(&ops, &roster);
    assert_eq!(closed.len(), 4);

    let team = Summary::compute(&closed, Viewer::All, &roster);
    assert!(approx(team.adjusted_gross_fees, 36_000.0));
    assert!(approx(team.adjusted_net_fees, 48_000.0));

    let bruno = roster.get(&"bruno".into()).unwrap();
    let summary = Summary::compute(&closed, Viewer::Participant(bruno), &roster);
    // 2400 from the shared deal plus 6000 from the brokerage-sourced one.
    assert!(approx(summary.adjusted_net_fees, 8_400.0));
}

#[test]
fn team_summary_statistics() {
    let roster = roster();
    let ops = book();
    let closed = OperationQuery {
        status: StatusFilter::Status(OperationStatus::Closed),
        year: YearFilter::Year(2024),
        ..OperationQuery::default()
    }
    .apply(&ops, &roster);

    let summary = Summary::compute(&closed, Viewer::All, &roster);
    assert_eq!(summary.total_operations, 4);
    assert_eq!(summary.total_tips, 4);
    assert_eq!(summary.buyer_tips, 2);
    assert!(approx(summary.total_reservation_value, 800_000.0));
    assert!(approx(summary.average_operation_value, 200_000.0));
    assert!(approx(summary.average_days_to_sell, 20.0));
}

#[test]
fn advisor_rows_and_contribution() {
    let roster = roster();
    let ops = book();
    let closed = OperationQuery {
        status: StatusFilter::Status(OperationStatus::Closed),
        ..OperationQuery::default()
    }
    .apply(&ops, &roster);

    let rows = AdvisorRow::build_all(&closed, &roster);
    assert_eq!(rows.len(), 3);

    // leader: 12000, ana: 12000 + 6000, bruno: 6000 (+0 for the sourced one)
    assert_eq!(rows[0].participant, ParticipantId::from("ana"));
    assert!(approx(rows[0].adjusted_gross_fees, 18_000.0));
    assert!(approx(rows[0].contribution_percent, 50.0));
    assert_eq!(rows[0].operations, 2);
    assert_eq!(rows[0].tips, 3);

    let total: f64 = rows.iter().map(|r| r.contribution_percent).sum();
    assert!(approx(total, 100.0));

    let bruno = rows.iter().find(|r| r.participant.as_str() == "bruno").unwrap();
    assert_eq!(bruno.operations, 2);
    assert!(approx(bruno.contribution_percent, 6_000.0 * 100.0 / 36_000.0));
    assert!(approx(
        reports::contribution_percent(&closed, &"bruno".into(), &roster),
        bruno.contribution_percent
    ));
}

#[test]
fn all_filters_return_every_operation() {
    let roster = roster();
    let ops = book();
    let refs: Vec<&Operation> = ops.iter().collect();
    let out = filters::by_status(&refs, StatusFilter::All);
    let out = filters::by_year(&out, YearFilter::All);
    let out = filters::by_month(&out, MonthFilter::All);
    let out = filters::by_search_text(&out, "", &roster);
    assert_eq!(out.len(), ops.len());
    for op in &ops {
        assert!(out.iter().any(|o| o.id == op.id));
    }
}

#[test]
fn search_and_sort_through_query() {
    let roster = roster();
    let ops = book();
    let by_name = OperationQuery {
        search: "pena".to_string(),
        ..OperationQuery::default()
    }
    .apply(&ops, &roster);
    assert_eq!(by_name.len(), 2);

    let mut sort = SortState::default();
    sort.toggle(SortKey::Value);
    let sorted = OperationQuery {
        sort,
        ..OperationQuery::default()
    }
    .apply(&ops, &roster);
    assert!(approx(sorted[0].reservation_value, 100_000.0));
}

#[test]
fn current_year_comes_from_the_clock() {
    let roster = roster();
    let ops = book();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let clock = ReportClock::new(now, chrono_tz::UTC);

    let this_year = OperationQuery::current_year(&clock).apply(&ops, &roster);
    assert_eq!(this_year.len(), 1);
    assert_eq!(this_year[0].status, OperationStatus::InProgress);

    let refs: Vec<&Operation> = ops.iter().collect();
    let pipeline = PipelineFees::compute(&refs, &clock);
    assert!(approx(pipeline.current_year, 4_000.0));
    assert!(approx(pipeline.previous_year, 0.0));
}

#[test]
fn monthly_series_of_closed_fees() {
    let ops = book();
    let refs: Vec<&Operation> = ops.iter().collect();
    let series = MonthlySeries::gross_fees(&refs, 2024, OperationStatus::Closed);
    assert!(approx(series.months[0], 12_000.0));
    assert!(approx(series.months[2], 12_000.0));
    assert!(approx(series.cumulative()[11], 36_000.0));
}
