//! Aggregation reporter.
//!
//! Reduces an already-filtered set of operations into the figures shown on
//! dashboards and in per-advisor report rows. Every reducer is total: empty
//! input produces zeros, never NaN.

use std::cmp::Ordering;

use chrono::Datelike;

use crate::{
    Attribution, FeeBreakdown, Operation, OperationStatus, Participant, ParticipantId,
    ReportClock, Role, Roster,
    net_fees::gross_contribution,
    util::{non_negative, ratio},
};

/// Whose net fees a summary reports.
#[derive(Clone, Copy, Debug)]
pub enum Viewer<'a> {
    /// The whole team: advisor shares plus the team leader's net.
    All,
    Participant(&'a Participant),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub total_operations: usize,
    pub buyer_tips: u32,
    pub seller_tips: u32,
    pub total_tips: u32,
    pub total_reservation_value: f64,
    pub average_operation_value: f64,
    /// Reservation to closing, over closed operations with both dates. 0 when
    /// none qualifies.
    pub average_days_to_sell: f64,
    /// Retained brokerage fees, excluding listings not owned.
    pub adjusted_gross_fees: f64,
    pub adjusted_net_fees: f64,
}

impl Summary {
    pub fn compute(ops: &[&Operation], viewer: Viewer<'_>, roster: &Roster) -> Self {
        let mut summary = Summary {
            total_operations: ops.len(),
            ..Summary::default()
        };

        for op in ops {
            summary.buyer_tips += op.buyer_tip();
            summary.seller_tips += op.seller_tip();
            summary.total_reservation_value += non_negative(op.reservation_value);
            summary.adjusted_gross_fees += gross_contribution(op);

            let breakdown = FeeBreakdown::resolve(op, franchise_default(op, viewer, roster));
            summary.adjusted_net_fees += match viewer {
                Viewer::All => breakdown.internal_total(),
                Viewer::Participant(p) => breakdown.net_for(&p.id),
            };
        }

        summary.total_tips = summary.buyer_tips + summary.seller_tips;
        summary.average_operation_value =
            ratio(summary.total_reservation_value, ops.len() as f64);
        summary.average_days_to_sell = average_days_to_sell(ops);
        summary
    }
}

/// Franchise fallback for `op`: the team leader's own setting.
fn franchise_default(op: &Operation, viewer: Viewer<'_>, roster: &Roster) -> Option<f64> {
    let from_viewer = match viewer {
        Viewer::Participant(p) if p.id == op.team_id => p.franchise_percent,
        _ => None,
    };
    from_viewer.or_else(|| roster.get(&op.team_id).and_then(|p| p.franchise_percent))
}

/// Average reservation-to-closing days over closed operations with both
/// dates; 0 when none qualifies.
pub fn average_days_to_sell(ops: &[&Operation]) -> f64 {
    let days: Vec<i64> = ops.iter().filter_map(|op| op.days_to_sell()).collect();
    ratio(days.iter().sum::<i64>() as f64, days.len() as f64)
}

/// Gross fees of the operations `id` owns, weighted by its attribution share.
pub fn own_adjusted_gross(ops: &[&Operation], id: &ParticipantId) -> f64 {
    ops.iter()
        .map(|op| gross_contribution(op) * Attribution::of(op, id).share)
        .sum()
}

/// Share (0-100) of the visible participants' adjusted gross that `id`
/// brought in. 0 when nobody brought in anything.
pub fn contribution_percent(ops: &[&Operation], id: &ParticipantId, roster: &Roster) -> f64 {
    let total: f64 = roster.iter().map(|p| own_adjusted_gross(ops, &p.id)).sum();
    ratio(own_adjusted_gross(ops, id) * 100.0, total)
}

/// One line of the per-advisor report.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvisorRow {
    pub participant: ParticipantId,
    pub name: String,
    pub role: Role,
    /// Operations the participant owns, either alone or shared.
    pub operations: usize,
    pub tips: u32,
    pub adjusted_gross_fees: f64,
    pub adjusted_net_fees: f64,
    pub contribution_percent: f64,
    pub average_operation_value: f64,
    pub average_days_to_sell: f64,
}

impl AdvisorRow {
    /// One row per roster member, highest adjusted gross first.
    pub fn build_all(ops: &[&Operation], roster: &Roster) -> Vec<AdvisorRow> {
        let mut rows: Vec<AdvisorRow> = roster
            .iter()
            .map(|participant| Self::build(ops, participant, roster))
            .collect();

        rows.sort_by(|a, b| {
            b.adjusted_gross_fees
                .total_cmp(&a.adjusted_gross_fees)
                .then_with(|| a.name.cmp(&b.name))
        });
        tracing::debug!(rows = rows.len(), "advisor report built");
        rows
    }

    /// A single participant's row, contribution measured against the whole
    /// roster.
    pub fn build(ops: &[&Operation], participant: &Participant, roster: &Roster) -> AdvisorRow {
        let mut owned: Vec<&Operation> = Vec::new();
        let mut tips = 0;
        for op in ops {
            let attribution = Attribution::of(op, &participant.id);
            if attribution.is_owner() {
                owned.push(*op);
                tips += attribution.tips;
            }
        }
        let summary = Summary::compute(ops, Viewer::Participant(participant), roster);
        let owned_value: f64 = owned
            .iter()
            .map(|op| non_negative(op.reservation_value))
            .sum();

        AdvisorRow {
            participant: participant.id.clone(),
            name: participant.display_name(),
            role: participant.role,
            operations: owned.len(),
            tips,
            adjusted_gross_fees: own_adjusted_gross(ops, &participant.id),
            adjusted_net_fees: summary.adjusted_net_fees,
            contribution_percent: contribution_percent(ops, &participant.id, roster),
            average_operation_value: ratio(owned_value, owned.len() as f64),
            average_days_to_sell: average_days_to_sell(&owned),
        }
    }
}

/// Gross fees per calendar month of one year.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonthlySeries {
    pub year: i32,
    /// Index 0 is January.
    pub months: [f64; 12],
}

impl MonthlySeries {
    /// Adjusted gross fees of operations in `status`, bucketed by the month of
    /// their reference date. Operations without a date are skipped.
    pub fn gross_fees(ops: &[&Operation], year: i32, status: OperationStatus) -> Self {
        let mut months = [0.0; 12];
        for op in ops.iter().filter(|op| op.status == status) {
            let Some(date) = op.reference_date() else {
                continue;
            };
            if date.year() != year {
                continue;
            }
            months[date.month0() as usize] += gross_contribution(op);
        }
        Self { year, months }
    }

    /// Running totals, month by month.
    #[must_use]
    pub fn cumulative(&self) -> [f64; 12] {
        let mut running = 0.0;
        self.months.map(|value| {
            running += value;
            running
        })
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.months.iter().sum()
    }

    /// Month (1-12) with the highest fees, `None` when every month is zero.
    #[must_use]
    pub fn best_month(&self) -> Option<u32> {
        self.months
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
            .map(|(idx, _)| idx as u32 + 1)
    }
}

/// Adjusted gross fees still in progress ("open pipeline").
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PipelineFees {
    pub current_year: f64,
    pub previous_year: f64,
}

impl PipelineFees {
    /// In-progress operations dated in the clock's current or previous year.
    pub fn compute(ops: &[&Operation], clock: &ReportClock) -> Self {
        let year = clock.current_year();
        let mut fees = PipelineFees::default();
        for op in ops
            .iter()
            .filter(|op| op.status == OperationStatus::InProgress)
        {
            match op.reference_date().map(|d| d.year()) {
                Some(y) if y == year => fees.current_year += gross_contribution(op),
                Some(y) if y == year - 1 => fees.previous_year += gross_contribution(op),
                _ => {}
            }
        }
        fees
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.current_year + self.previous_year
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn deal(value: f64) -> Operation {
        let mut op = Operation::new("leader", value);
        op.buyer_side_percent = 3.0;
        op.seller_side_percent = 3.0;
        op
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let summary = Summary::compute(&[], Viewer::All, &Roster::new());
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.average_days_to_sell, 0.0);
        assert_eq!(summary.average_operation_value, 0.0);
    }

    #[test]
    fn bad_reservation_values_count_as_zero() {
        let good = deal(200_000.0);
        let nan = deal(f64::NAN);
        let negative = deal(-100_000.0);
        let roster: Roster = [Participant::new("leader", Role::TeamLeaderBroker)]
            .into_iter()
            .collect();

        let with_nan = Summary::compute(&[&good, &nan], Viewer::All, &roster);
        assert_eq!(with_nan.total_reservation_value, 200_000.0);
        assert_eq!(with_nan.average_operation_value, 100_000.0);
        assert_eq!(with_nan.adjusted_gross_fees, 12_000.0);

        let with_negative = Summary::compute(&[&good, &negative], Viewer::All, &roster);
        assert_eq!(with_negative.total_reservation_value, 200_000.0);
        assert_eq!(with_negative.average_operation_value, 100_000.0);

        let leader = roster.get(&"leader".into()).unwrap();
        let row = AdvisorRow::build(&[&good, &nan, &negative], leader, &roster);
        assert_eq!(row.operations, 3);
        assert!((row.average_operation_value - 200_000.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn team_leader_franchise_setting_is_the_fallback() {
        let roster: Roster = [
            Participant::new("leader", Role::TeamLeaderBroker).franchise_percent(20.0),
        ]
        .into_iter()
        .collect();
        let inherited = deal(200_000.0);
        let mut own = deal(200_000.0);
        own.franchise_or_broker_percent = Some(10.0);

        let team = Summary::compute(&[&inherited], Viewer::All, &roster);
        assert!((team.adjusted_net_fees - 9_600.0).abs() < 1e-9);
        assert_eq!(team.adjusted_gross_fees, 12_000.0);

        let leader = roster.get(&"leader".into()).unwrap();
        let as_leader = Summary::compute(&[&inherited], Viewer::Participant(leader), &roster);
        assert!((as_leader.adjusted_net_fees - 9_600.0).abs() < 1e-9);

        let overridden = Summary::compute(&[&own], Viewer::All, &roster);
        assert!((overridden.adjusted_net_fees - 10_800.0).abs() < 1e-9);
    }

    #[test]
    fn tips_counted_from_flags() {
        let mut op = deal(100.0);
        op.buyer_side = true;
        op.seller_side = true;
        op.buyer_side_percent = 0.0;
        let summary = Summary::compute(&[&op], Viewer::All, &Roster::new());
        assert_eq!(summary.total_tips, 2);
        assert_eq!(summary.buyer_tips, 1);
    }

    #[test]
    fn average_days_only_closed_with_dates() {
        let mut closed = deal(1.0);
        closed.status = OperationStatus::Closed;
        closed.reservation_date = Some(date(2024, 1, 1));
        closed.closing_date = Some(date(2024, 1, 11));
        let mut open = deal(1.0);
        open.reservation_date = Some(date(2024, 1, 1));
        open.closing_date = Some(date(2024, 12, 1));
        let mut partial = deal(1.0);
        partial.status = OperationStatus::Closed;
        partial.closing_date = Some(date(2024, 2, 1));

        assert_eq!(average_days_to_sell(&[&closed, &open, &partial]), 10.0);
        assert_eq!(average_days_to_sell(&[&open]), 0.0);
    }

    #[test]
    fn monthly_series_accumulates() {
        let mut jan = deal(100_000.0);
        jan.status = OperationStatus::Closed;
        jan.closing_date = Some(date(2024, 1, 15));
        let mut mar = deal(200_000.0);
        mar.status = OperationStatus::Closed;
        mar.closing_date = Some(date(2024, 3, 2));
        let mut other_year = deal(200_000.0);
        other_year.status = OperationStatus::Closed;
        other_year.closing_date = Some(date(2023, 3, 2));

        let series =
            MonthlySeries::gross_fees(&[&jan, &mar, &other_year], 2024, OperationStatus::Closed);
        assert_eq!(series.months[0], 6_000.0);
        assert_eq!(series.months[2], 12_000.0);
        assert_eq!(series.cumulative()[1], 6_000.0);
        assert_eq!(series.cumulative()[11], 18_000.0);
        assert_eq!(series.total(), 18_000.0);
        assert_eq!(series.best_month(), Some(3));
    }
}
