//! Net fee resolver.
//!
//! Distributes the retained brokerage fee of one operation between the team
//! leader and up to two advisors, then applies the franchise cut to the team
//! leader's share.
//!
//! Rules, by advisor assignment:
//!
//! - no primary advisor: the team leader keeps the whole retained fee;
//! - one advisor: the advisor nets `advisor_percent` of the retained fee and
//!   the team leader keeps the remainder;
//! - two distinct advisors: half of the retained fee forms the advisor pool,
//!   split by `advisor_percent` / `secondary_advisor_percent`; the team leader
//!   keeps everything the advisors do not claim.
//!
//! A team leader assigned as one of the advisors always claims 100% of that
//! advisor slot. The franchise cut only ever reduces the team leader's
//! remainder, never an advisor share.

use crate::{
    CommissionSplit, Operation, Participant, ParticipantId,
    util::{fraction, percent_of},
};

const TWO_ADVISOR_POOL: f64 = 0.5;
const TEAM_LEADER_AS_ADVISOR_PERCENT: f64 = 100.0;

/// One advisor slot of an operation.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvisorShare {
    pub advisor: ParticipantId,
    /// Percentage actually applied, after the team-leader-as-advisor rule.
    pub applied_percent: f64,
    pub amount: f64,
}

/// How a single operation's commission ends up distributed.
#[derive(Clone, Debug, PartialEq)]
pub struct FeeBreakdown {
    pub split: CommissionSplit,
    pub team_leader: ParticipantId,
    pub primary: Option<AdvisorShare>,
    pub secondary: Option<AdvisorShare>,
    /// Team leader remainder before the franchise cut.
    pub team_leader_share: f64,
    pub franchise_cut: f64,
    /// Team leader remainder after the franchise cut.
    pub team_leader_net: f64,
}

impl FeeBreakdown {
    /// Resolve the distribution of `op`.
    ///
    /// `franchise_default` is the team leader's configured franchise cut, used
    /// when the operation does not carry its own percentage.
    pub fn resolve(op: &Operation, franchise_default: Option<f64>) -> Self {
        let split = CommissionSplit::of(op);
        let retained = split.retained_brokerage_fee;
        let team_leader = op.team_id.clone();

        let applied = |advisor: &ParticipantId, configured: f64| {
            if *advisor == team_leader {
                TEAM_LEADER_AS_ADVISOR_PERCENT
            } else {
                configured
            }
        };

        let (primary, secondary) = match advisors(op) {
            Advisors::None => (None, None),
            Advisors::One(advisor) => {
                let applied_percent = applied(advisor, op.advisor_percent);
                let share = AdvisorShare {
                    advisor: advisor.clone(),
                    applied_percent,
                    amount: percent_of(retained, applied_percent),
                };
                (Some(share), None)
            }
            Advisors::Two(first, second) => {
                let pool = retained * TWO_ADVISOR_POOL;
                let first_percent = applied(first, op.advisor_percent);
                let second_percent = applied(second, op.secondary_advisor_percent);
                (
                    Some(AdvisorShare {
                        advisor: first.clone(),
                        applied_percent: first_percent,
                        amount: percent_of(pool, first_percent),
                    }),
                    Some(AdvisorShare {
                        advisor: second.clone(),
                        applied_percent: second_percent,
                        amount: percent_of(pool, second_percent),
                    }),
                )
            }
        };

        let advisors_total: f64 = primary.iter().chain(secondary.iter()).map(|s| s.amount).sum();
        let team_leader_share = retained - advisors_total;

        let franchise_percent = op.franchise_or_broker_percent.or(franchise_default);
        let team_leader_net =
            team_leader_share * (1.0 - fraction(franchise_percent.unwrap_or_default()));

        Self {
            split,
            team_leader,
            primary,
            secondary,
            team_leader_share,
            franchise_cut: team_leader_share - team_leader_net,
            team_leader_net,
        }
    }

    /// Net amount credited to `id` across every slot it occupies.
    #[must_use]
    pub fn net_for(&self, id: &ParticipantId) -> f64 {
        let mut total = 0.0;
        if self.team_leader == *id {
            total += self.team_leader_net;
        }
        for share in self.primary.iter().chain(self.secondary.iter()) {
            if share.advisor == *id {
                total += share.amount;
            }
        }
        total
    }

    /// Everything that stays inside the team: advisor shares plus the team
    /// leader's net.
    #[must_use]
    pub fn internal_total(&self) -> f64 {
        let advisors: f64 = self
            .primary
            .iter()
            .chain(self.secondary.iter())
            .map(|s| s.amount)
            .sum();
        advisors + self.team_leader_net
    }
}

enum Advisors<'a> {
    None,
    One(&'a ParticipantId),
    Two(&'a ParticipantId, &'a ParticipantId),
}

/// Advisor cardinality. A secondary without a primary is ignored, and the
/// same id in both slots counts as a single advisor.
fn advisors(op: &Operation) -> Advisors<'_> {
    match (&op.primary_advisor_id, &op.secondary_advisor_id) {
        (None, _) => Advisors::None,
        (Some(primary), Some(secondary)) if primary != secondary => {
            Advisors::Two(primary, secondary)
        }
        (Some(primary), _) => Advisors::One(primary),
    }
}

/// Net fee `participant` earns from `op`.
///
/// The team leader's own franchise setting is used as the fallback franchise
/// cut. A participant with no slot in the operation nets 0.
#[must_use]
pub fn net_fee_for(op: &Operation, participant: &Participant) -> f64 {
    let franchise_default = if participant.id == op.team_id {
        participant.franchise_percent
    } else {
        None
    };
    FeeBreakdown::resolve(op, franchise_default).net_for(&participant.id)
}

/// Contribution of `op` to gross aggregates.
///
/// Operations whose listing did not originate with the advisor contribute
/// nothing to gross totals; their net shares are unaffected.
#[must_use]
pub fn gross_contribution(op: &Operation) -> f64 {
    if op.listing_not_owned {
        0.0
    } else {
        CommissionSplit::of(op).retained_brokerage_fee
    }
}

/// Which part of an operation is credited to a participant in per-advisor
/// reports.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Attribution {
    /// Weight of the operation credited (1.0 sole owner, 0.5 when two
    /// distinct advisors share it, 0.0 otherwise).
    pub share: f64,
    /// Sides credited.
    pub tips: u32,
}

impl Attribution {
    pub fn of(op: &Operation, id: &ParticipantId) -> Self {
        match advisors(op) {
            Advisors::None if op.team_id == *id => Self {
                share: 1.0,
                tips: op.tips(),
            },
            Advisors::One(advisor) if advisor == id => Self {
                share: 1.0,
                tips: op.tips(),
            },
            Advisors::Two(first, second) if first == id || second == id => Self {
                share: TWO_ADVISOR_POOL,
                tips: op.tips().min(1),
            },
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.share > 0.0
    }
}
