use chrono::Utc;
use clap::Parser;
use engine::{
    AdvisorRow, Attribution, CommissionInputs, FeeBreakdown, MonthFilter, MonthlySeries,
    Operation, OperationQuery, OperationSource, OperationStatus, ParticipantSource, PipelineFees,
    ReportClock, Roster, SortState, Summary, Viewer, YearFilter, split_commission,
};

use cli::{Args, Command, Filters};
use error::{AppError, Result};
use render::Render;
use store::FileStore;

mod cli;
mod error;
mod render;
mod settings;
mod store;

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = settings::load(&args)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "brokerdesk={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let clock = ReportClock::with_timezone_name(Utc::now(), &settings.timezone)?;
    let render = Render::new(settings.currency);

    let output = match args.command {
        Command::Split {
            value,
            gross,
            advisor,
            shared,
            referral,
        } => {
            let split = split_commission(&CommissionInputs {
                reservation_value: value,
                gross_commission_percent: gross,
                advisor_percent: advisor,
                shared_partner_percent: shared,
                referral_percent: referral,
            });
            serde_json::to_value(render.split(&split))?
        }
        command => {
            let store = FileStore::open(&settings.operations, &settings.roster)?;
            let team = store.team_leader(&settings.team)?;
            let leader = store.fetch_participant(&team)?;
            let operations = store.fetch_operations(&team)?;
            tracing::info!(
                team = %leader.display_name(),
                currency = %settings.currency,
                operations = operations.len(),
                "book loaded"
            );
            report(command, &operations, store.roster(), &clock, render)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn report(
    command: Command,
    operations: &[Operation],
    roster: &Roster,
    clock: &ReportClock,
    render: Render,
) -> Result<serde_json::Value> {
    let value = match command {
        Command::Summary(filters) => {
            let viewer = viewer(&filters, roster)?;
            let ops = visible(&query(&filters, clock)?.apply(operations, roster), viewer);
            serde_json::to_value(render.summary(&Summary::compute(&ops, viewer, roster)))?
        }
        Command::List(filters) => {
            let viewer = viewer(&filters, roster)?;
            let ops = visible(&query(&filters, clock)?.apply(operations, roster), viewer);
            serde_json::to_value(render.operations(&ops, viewer, roster))?
        }
        Command::Advisors(filters) => {
            let ops = query(&filters, clock)?.apply(operations, roster);
            let rows = match viewer(&filters, roster)? {
                Viewer::All => AdvisorRow::build_all(&ops, roster),
                Viewer::Participant(p) => vec![AdvisorRow::build(&ops, p, roster)],
            };
            serde_json::to_value(render.advisors(&rows))?
        }
        Command::Monthly { year } => {
            let year = match parse_year(&year, clock)? {
                YearFilter::Year(year) => year,
                YearFilter::All => clock.current_year(),
            };
            let ops: Vec<&Operation> = operations.iter().collect();
            let series = MonthlySeries::gross_fees(&ops, year, OperationStatus::Closed);
            serde_json::to_value(render.monthly(&series))?
        }
        Command::Pipeline => {
            let ops: Vec<&Operation> = operations.iter().collect();
            serde_json::to_value(render.pipeline(&PipelineFees::compute(&ops, clock)))?
        }
        Command::Breakdown { id } => {
            let op = operations
                .iter()
                .find(|op| op.id == id)
                .ok_or_else(|| engine::EngineError::KeyNotFound(id.to_string()))?;
            let franchise_default = roster.get(&op.team_id).and_then(|p| p.franchise_percent);
            let breakdown = FeeBreakdown::resolve(op, franchise_default);
            serde_json::to_value(render.breakdown(&breakdown))?
        }
        Command::Split { .. } => {
            return Err(AppError::Usage("split does not read stored operations".to_string()));
        }
    };
    Ok(value)
}

fn query(filters: &Filters, clock: &ReportClock) -> Result<OperationQuery> {
    let month = if filters.month.trim().eq_ignore_ascii_case("current") {
        MonthFilter::Month(clock.current_month())
    } else {
        filters.month.parse()?
    };
    let sort = match &filters.sort {
        Some(key) => SortState::new(key.parse()?, filters.asc),
        None => SortState::default(),
    };
    Ok(OperationQuery {
        status: filters.status.parse()?,
        year: parse_year(&filters.year, clock)?,
        month,
        operation_type: filters.operation_type.parse()?,
        search: filters.search.clone(),
        sort,
    })
}

fn parse_year(year: &str, clock: &ReportClock) -> Result<YearFilter> {
    if year.trim().eq_ignore_ascii_case("current") {
        return Ok(YearFilter::Year(clock.current_year()));
    }
    Ok(year.parse()?)
}

fn viewer<'a>(filters: &Filters, roster: &'a Roster) -> Result<Viewer<'a>> {
    match &filters.participant {
        Some(id) => Ok(Viewer::Participant(roster.require(&id.as_str().into())?)),
        None => Ok(Viewer::All),
    }
}

/// A team leader sees the whole book, an advisor only the operations they
/// are assigned to.
fn visible<'a>(ops: &[&'a Operation], viewer: Viewer<'_>) -> Vec<&'a Operation> {
    match viewer {
        Viewer::Participant(p) if !p.is_team_leader() => ops
            .iter()
            .copied()
            .filter(|op| Attribution::of(op, &p.id).is_owner())
            .collect(),
        _ => ops.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use engine::{Participant, Role};

    use super::*;

    fn clock() -> ReportClock {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        ReportClock::with_timezone_name(now, "UTC").unwrap()
    }

    fn everything() -> Filters {
        Filters {
            status: "all".to_string(),
            year: "all".to_string(),
            month: "all".to_string(),
            operation_type: "all".to_string(),
            ..Filters::default()
        }
    }

    fn roster() -> Roster {
        [
            Participant::new("leader", Role::TeamLeaderBroker),
            Participant::new("ana", Role::Advisor).named("Ana", "Peña"),
        ]
        .into_iter()
        .collect()
    }

    fn book() -> Vec<Operation> {
        let mut mine = Operation::new("leader", 100_000.0);
        mine.buyer_side_percent = 3.0;
        mine.status = OperationStatus::Closed;
        mine.reservation_date = NaiveDate::from_ymd_opt(2025, 2, 1);
        mine.closing_date = NaiveDate::from_ymd_opt(2025, 3, 2);

        let mut anas = Operation::new("leader", 200_000.0);
        anas.seller_side_percent = 3.0;
        anas.primary_advisor_id = Some("ana".into());
        anas.advisor_percent = 50.0;
        anas.reservation_date = NaiveDate::from_ymd_opt(2024, 11, 2);
        vec![mine, anas]
    }

    #[test]
    fn current_keywords_follow_the_clock() {
        let filters = Filters {
            status: "closed".to_string(),
            year: "current".to_string(),
            month: "current".to_string(),
            sort: Some("value".to_string()),
            asc: true,
            ..everything()
        };
        let query = query(&filters, &clock()).unwrap();
        assert_eq!(query.year, YearFilter::Year(2025));
        assert_eq!(query.month, MonthFilter::Month(3));
        assert_eq!(query.status, engine::StatusFilter::Status(OperationStatus::Closed));
        assert!(query.sort.active().is_some());
    }

    #[test]
    fn bad_filter_values_are_rejected() {
        let filters = Filters {
            month: "13".to_string(),
            ..everything()
        };
        assert!(query(&filters, &clock()).is_err());
    }

    #[test]
    fn advisor_summary_covers_assigned_operations() {
        let ops = book();
        let filters = Filters {
            participant: Some("ana".to_string()),
            ..everything()
        };
        let value = report(
            Command::Summary(filters),
            &ops,
            &roster(),
            &clock(),
            Render::new(engine::Currency::Usd),
        )
        .unwrap();
        assert_eq!(value["total_operations"], 1);
        // 6000 retained, half to ana
        assert_eq!(value["adjusted_net_fees_minor"], 300_000);
        assert_eq!(value["currency"], "USD");
    }

    #[test]
    fn team_summary_and_pipeline() {
        let ops = book();
        let render = Render::new(engine::Currency::Usd);
        let summary = report(Command::Summary(everything()), &ops, &roster(), &clock(), render)
            .unwrap();
        assert_eq!(summary["total_operations"], 2);
        assert_eq!(summary["adjusted_gross_fees_minor"], 900_000);
        assert_eq!(summary["average_days_to_sell"], 29.0);

        let pipeline = report(Command::Pipeline, &ops, &roster(), &clock(), render).unwrap();
        assert_eq!(pipeline["previous_year_minor"], 600_000);
        assert_eq!(pipeline["current_year_minor"], 0);
    }

    #[test]
    fn breakdown_of_unknown_operation_fails() {
        let err = report(
            Command::Breakdown {
                id: uuid::Uuid::new_v4(),
            },
            &book(),
            &roster(),
            &clock(),
            Render::new(engine::Currency::Usd),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Engine(_)));
    }
}
