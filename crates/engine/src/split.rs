//! Commission split calculator.
//!
//! Turns a reservation value and its percentage inputs into the brokerage fee
//! the team retains and the primary advisor's fee.

use crate::{
    Operation,
    util::{fraction, non_negative, percent_of},
};

/// Inputs of the split. Build it from an [`Operation`] or by hand for what-if
/// calculations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CommissionInputs {
    pub reservation_value: f64,
    pub gross_commission_percent: f64,
    pub advisor_percent: f64,
    pub shared_partner_percent: f64,
    pub referral_percent: f64,
}

impl CommissionInputs {
    /// Any value that the split will treat as 0 although it is not 0.
    fn is_degenerate(&self) -> bool {
        [
            self.reservation_value,
            self.gross_commission_percent,
            self.advisor_percent,
            self.shared_partner_percent,
            self.referral_percent,
        ]
        .iter()
        .any(|v| !v.is_finite() || *v < 0.0)
    }
}

impl From<&Operation> for CommissionInputs {
    fn from(op: &Operation) -> Self {
        Self {
            reservation_value: op.reservation_value,
            gross_commission_percent: op.gross_commission_percent(),
            advisor_percent: op.advisor_percent,
            shared_partner_percent: op.shared_partner_percent,
            referral_percent: op.referral_percent,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CommissionSplit {
    /// Commission charged on the deal before any cut.
    pub gross_brokerage_fee: f64,
    /// Paid to the sharing partner brokerage.
    pub shared_partner_cut: f64,
    /// Paid to the referrer, after the shared partner cut.
    pub referral_cut: f64,
    /// What the brokerage keeps after external cuts.
    pub retained_brokerage_fee: f64,
    /// `advisor_percent` of the retained fee.
    pub advisor_fee: f64,
}

/// Split one deal's commission.
///
/// External cuts are deducted sequentially: first the shared partner, then
/// the referral on what is left. Degenerate inputs (NaN, negative, infinite)
/// count as 0. Cuts of 100% or more are not clamped, so the retained fee can
/// be zero or negative.
#[must_use]
pub fn split_commission(inputs: &CommissionInputs) -> CommissionSplit {
    if inputs.is_degenerate() {
        tracing::warn!(?inputs, "degenerate commission inputs normalized to zero");
    }
    let value = non_negative(inputs.reservation_value);
    let gross_brokerage_fee = percent_of(value, inputs.gross_commission_percent);

    let after_shared = gross_brokerage_fee * (1.0 - fraction(inputs.shared_partner_percent));
    let retained_brokerage_fee = after_shared * (1.0 - fraction(inputs.referral_percent));

    CommissionSplit {
        gross_brokerage_fee,
        shared_partner_cut: gross_brokerage_fee - after_shared,
        referral_cut: after_shared - retained_brokerage_fee,
        retained_brokerage_fee,
        advisor_fee: percent_of(retained_brokerage_fee, inputs.advisor_percent),
    }
}

impl CommissionSplit {
    pub fn of(op: &Operation) -> Self {
        split_commission(&CommissionInputs::from(op))
    }
}
