//! Report payloads handed to dashboards.
//!
//! Monetary values are integer minor units of `currency`, rounded once by the
//! producer. Percentages and averages of day counts stay as floats.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Ars,
    #[default]
    Usd,
    Eur,
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub currency: Currency,
        pub total_operations: usize,
        pub buyer_tips: u32,
        pub seller_tips: u32,
        pub total_tips: u32,
        pub total_reservation_value_minor: i64,
        pub average_operation_value_minor: i64,
        /// `None` when no closed operation has both dates ("N/A").
        pub average_days_to_sell: Option<f64>,
        pub adjusted_gross_fees_minor: i64,
        pub adjusted_net_fees_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyFees {
        pub currency: Currency,
        pub year: i32,
        /// Index 0 is January.
        pub months_minor: Vec<i64>,
        pub cumulative_minor: Vec<i64>,
        pub total_minor: i64,
        /// 1-12, absent when the year has no fees.
        pub best_month: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Pipeline {
        pub currency: Currency,
        pub current_year_minor: i64,
        pub previous_year_minor: i64,
        pub total_minor: i64,
    }
}

pub mod report {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        TeamLeaderBroker,
        Advisor,
    }

    /// One line of the per-advisor report.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdvisorRow {
        pub participant_id: String,
        pub name: String,
        pub role: Role,
        pub operations: usize,
        pub tips: u32,
        pub adjusted_gross_fees_minor: i64,
        pub adjusted_net_fees_minor: i64,
        pub contribution_percent: f64,
        pub average_operation_value_minor: i64,
        pub average_days_to_sell: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdvisorReport {
        pub currency: Currency,
        pub rows: Vec<AdvisorRow>,
    }
}

pub mod operation {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OperationStatus {
        InProgress,
        Closed,
        Fallen,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperationView {
        pub id: Uuid,
        pub status: OperationStatus,
        pub operation_type: String,
        pub address: Option<String>,
        pub advisors: Vec<String>,
        pub reservation_value_minor: i64,
        pub reservation_date: Option<NaiveDate>,
        pub closing_date: Option<NaiveDate>,
        pub tips: u32,
        pub retained_brokerage_fee_minor: i64,
        /// Net for the requested participant, or the team total.
        pub net_fee_minor: i64,
        pub listing_not_owned: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperationList {
        pub currency: Currency,
        pub operations: Vec<OperationView>,
    }
}

pub mod split {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdvisorShareView {
        pub participant_id: String,
        pub applied_percent: f64,
        pub amount_minor: i64,
    }

    /// Full distribution of one operation's commission.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitView {
        pub currency: Currency,
        pub gross_brokerage_fee_minor: i64,
        pub shared_partner_cut_minor: i64,
        pub referral_cut_minor: i64,
        pub retained_brokerage_fee_minor: i64,
        pub advisor_fee_minor: i64,
        pub primary: Option<AdvisorShareView>,
        pub secondary: Option<AdvisorShareView>,
        pub team_leader_share_minor: i64,
        pub franchise_cut_minor: i64,
        pub team_leader_net_minor: i64,
    }
}
