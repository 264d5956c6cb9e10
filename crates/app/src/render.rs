//! Conversion of engine results into `api_types` payloads.
//!
//! This is the only place amounts leave `f64`: each is rounded to the minor
//! units of the reporting currency exactly once.

use api_types::{operation, report, split, stats};
use engine::{
    AdvisorRow, AdvisorShare, CommissionSplit, Currency, FeeBreakdown, MonthlySeries, Money,
    Operation, OperationStatus, PipelineFees, Role, Roster, Summary, Viewer, net_fee_for,
};

#[derive(Clone, Copy, Debug)]
pub struct Render {
    currency: Currency,
}

impl Render {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    fn minor(self, amount: f64) -> i64 {
        Money::from_major(amount, self.currency).minor()
    }

    fn currency(self) -> api_types::Currency {
        match self.currency {
            Currency::Ars => api_types::Currency::Ars,
            Currency::Usd => api_types::Currency::Usd,
            Currency::Eur => api_types::Currency::Eur,
        }
    }

    pub fn summary(self, summary: &Summary) -> stats::Statistic {
        stats::Statistic {
            currency: self.currency(),
            total_operations: summary.total_operations,
            buyer_tips: summary.buyer_tips,
            seller_tips: summary.seller_tips,
            total_tips: summary.total_tips,
            total_reservation_value_minor: self.minor(summary.total_reservation_value),
            average_operation_value_minor: self.minor(summary.average_operation_value),
            average_days_to_sell: days(summary.average_days_to_sell),
            adjusted_gross_fees_minor: self.minor(summary.adjusted_gross_fees),
            adjusted_net_fees_minor: self.minor(summary.adjusted_net_fees),
        }
    }

    pub fn monthly(self, series: &MonthlySeries) -> stats::MonthlyFees {
        stats::MonthlyFees {
            currency: self.currency(),
            year: series.year,
            months_minor: series.months.iter().map(|v| self.minor(*v)).collect(),
            cumulative_minor: series.cumulative().iter().map(|v| self.minor(*v)).collect(),
            total_minor: self.minor(series.total()),
            best_month: series.best_month(),
        }
    }

    pub fn pipeline(self, fees: &PipelineFees) -> stats::Pipeline {
        stats::Pipeline {
            currency: self.currency(),
            current_year_minor: self.minor(fees.current_year),
            previous_year_minor: self.minor(fees.previous_year),
            total_minor: self.minor(fees.total()),
        }
    }

    pub fn advisors(self, rows: &[AdvisorRow]) -> report::AdvisorReport {
        report::AdvisorReport {
            currency: self.currency(),
            rows: rows
                .iter()
                .map(|row| report::AdvisorRow {
                    participant_id: row.participant.to_string(),
                    name: row.name.clone(),
                    role: match row.role {
                        Role::TeamLeaderBroker => report::Role::TeamLeaderBroker,
                        Role::Advisor => report::Role::Advisor,
                    },
                    operations: row.operations,
                    tips: row.tips,
                    adjusted_gross_fees_minor: self.minor(row.adjusted_gross_fees),
                    adjusted_net_fees_minor: self.minor(row.adjusted_net_fees),
                    contribution_percent: row.contribution_percent,
                    average_operation_value_minor: self.minor(row.average_operation_value),
                    average_days_to_sell: days(row.average_days_to_sell),
                })
                .collect(),
        }
    }

    /// `net_fee_minor` follows `viewer`: one participant's share or the team
    /// total.
    pub fn operations(
        self,
        ops: &[&Operation],
        viewer: Viewer<'_>,
        roster: &Roster,
    ) -> operation::OperationList {
        operation::OperationList {
            currency: self.currency(),
            operations: ops
                .iter()
                .map(|op| self.operation(op, viewer, roster))
                .collect(),
        }
    }

    fn operation(
        self,
        op: &Operation,
        viewer: Viewer<'_>,
        roster: &Roster,
    ) -> operation::OperationView {
        let advisors = [&op.primary_advisor_id, &op.secondary_advisor_id]
            .into_iter()
            .flatten()
            .map(|id| roster.display_name(id).unwrap_or_else(|| id.to_string()))
            .collect();
        let net = match viewer {
            Viewer::All => Summary::compute(&[op], viewer, roster).adjusted_net_fees,
            Viewer::Participant(p) => net_fee_for(op, p),
        };

        operation::OperationView {
            id: op.id,
            status: match op.status {
                OperationStatus::InProgress => operation::OperationStatus::InProgress,
                OperationStatus::Closed => operation::OperationStatus::Closed,
                OperationStatus::Fallen => operation::OperationStatus::Fallen,
            },
            operation_type: op.operation_type.as_str().to_string(),
            address: op.address.clone(),
            advisors,
            reservation_value_minor: self.minor(op.reservation_value),
            reservation_date: op.reservation_date,
            closing_date: op.closing_date,
            tips: op.tips(),
            retained_brokerage_fee_minor: self
                .minor(CommissionSplit::of(op).retained_brokerage_fee),
            net_fee_minor: self.minor(net),
            listing_not_owned: op.listing_not_owned,
        }
    }

    /// A bare split, with no advisors resolved: the team leader keeps the
    /// retained fee minus the advisor fee.
    pub fn split(self, commission: &CommissionSplit) -> split::SplitView {
        let leader = commission.retained_brokerage_fee - commission.advisor_fee;
        split::SplitView {
            currency: self.currency(),
            gross_brokerage_fee_minor: self.minor(commission.gross_brokerage_fee),
            shared_partner_cut_minor: self.minor(commission.shared_partner_cut),
            referral_cut_minor: self.minor(commission.referral_cut),
            retained_brokerage_fee_minor: self.minor(commission.retained_brokerage_fee),
            advisor_fee_minor: self.minor(commission.advisor_fee),
            primary: None,
            secondary: None,
            team_leader_share_minor: self.minor(leader),
            franchise_cut_minor: 0,
            team_leader_net_minor: self.minor(leader),
        }
    }

    pub fn breakdown(self, breakdown: &FeeBreakdown) -> split::SplitView {
        let share = |slot: &AdvisorShare| split::AdvisorShareView {
            participant_id: slot.advisor.to_string(),
            applied_percent: slot.applied_percent,
            amount_minor: self.minor(slot.amount),
        };
        split::SplitView {
            primary: breakdown.primary.as_ref().map(&share),
            secondary: breakdown.secondary.as_ref().map(&share),
            team_leader_share_minor: self.minor(breakdown.team_leader_share),
            franchise_cut_minor: self.minor(breakdown.franchise_cut),
            team_leader_net_minor: self.minor(breakdown.team_leader_net),
            ..self.split(&breakdown.split)
        }
    }
}

/// Zero means no closed operation qualified.
fn days(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use engine::{CommissionInputs, Participant, split_commission};

    use super::*;

    #[test]
    fn amounts_are_rounded_to_minor_units() {
        let render = Render::new(Currency::Ars);
        let view = render.split(&split_commission(&CommissionInputs {
            reservation_value: 123_456.78,
            gross_commission_percent: 3.0,
            advisor_percent: 40.0,
            shared_partner_percent: 0.0,
            referral_percent: 0.0,
        }));
        assert_eq!(view.currency, api_types::Currency::Ars);
        // 3703.7034 retained, 1481.48136 to the advisor
        assert_eq!(view.retained_brokerage_fee_minor, 370_370);
        assert_eq!(view.advisor_fee_minor, 148_148);
        assert_eq!(view.team_leader_net_minor, 222_222);
    }

    #[test]
    fn missing_days_to_sell_renders_as_none() {
        let render = Render::new(Currency::Usd);
        let stat = render.summary(&Summary::default());
        assert_eq!(stat.average_days_to_sell, None);
        assert_eq!(stat.total_operations, 0);
    }

    #[test]
    fn operation_view_names_advisors() {
        let roster: Roster = [
            Participant::new("leader", Role::TeamLeaderBroker),
            Participant::new("ana", Role::Advisor).named("Ana", "Peña"),
        ]
        .into_iter()
        .collect();
        let mut op = Operation::new("leader", 100_000.0);
        op.buyer_side_percent = 4.0;
        op.primary_advisor_id = Some("ana".into());
        op.secondary_advisor_id = Some("ghost".into());
        op.advisor_percent = 50.0;

        let list = Render::new(Currency::Usd).operations(&[&op], Viewer::All, &roster);
        let view = &list.operations[0];
        assert_eq!(view.advisors, vec!["Ana Peña".to_string(), "ghost".to_string()]);
        assert_eq!(view.retained_brokerage_fee_minor, 400_000);
        assert_eq!(view.net_fee_minor, 400_000);

        // half of the 4000 goes to the advisor pool, ana claims 50% of it
        let ana = roster.get(&"ana".into()).unwrap();
        let render = Render::new(Currency::Usd);
        let list = render.operations(&[&op], Viewer::Participant(ana), &roster);
        assert_eq!(list.operations[0].net_fee_minor, 100_000);
    }
}
