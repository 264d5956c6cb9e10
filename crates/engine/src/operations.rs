//! Operation primitives.
//!
//! An `Operation` is a recorded property sale or rental. Its percentage
//! inputs drive every commission figure; the engine only reads them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ParticipantId, ResultEngine, util::non_negative};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    #[default]
    InProgress,
    Closed,
    Fallen,
}

impl TryFrom<&str> for OperationStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in_progress" | "in-progress" | "en curso" => Ok(Self::InProgress),
            "closed" | "cerrada" => Ok(Self::Closed),
            "fallen" | "caída" | "caida" => Ok(Self::Fallen),
            other => Err(EngineError::InvalidStatus(format!(
                "unknown operation status: {other}"
            ))),
        }
    }
}

/// Kind of deal. Only used for filtering and search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    #[default]
    Sale,
    Purchase,
    TraditionalRental,
    TemporaryRental,
    CommercialRental,
    RealEstateDevelopment,
    Garage,
    BusinessGoodwill,
    LandSubdivision,
    DevelopmentLots,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::TraditionalRental => "traditional_rental",
            Self::TemporaryRental => "temporary_rental",
            Self::CommercialRental => "commercial_rental",
            Self::RealEstateDevelopment => "real_estate_development",
            Self::Garage => "garage",
            Self::BusinessGoodwill => "business_goodwill",
            Self::LandSubdivision => "land_subdivision",
            Self::DevelopmentLots => "development_lots",
        }
    }
}

impl TryFrom<&str> for OperationType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sale" => Ok(Self::Sale),
            "purchase" => Ok(Self::Purchase),
            "traditional_rental" => Ok(Self::TraditionalRental),
            "temporary_rental" => Ok(Self::TemporaryRental),
            "commercial_rental" => Ok(Self::CommercialRental),
            "real_estate_development" => Ok(Self::RealEstateDevelopment),
            "garage" => Ok(Self::Garage),
            "business_goodwill" => Ok(Self::BusinessGoodwill),
            "land_subdivision" => Ok(Self::LandSubdivision),
            "development_lots" => Ok(Self::DevelopmentLots),
            other => Err(EngineError::InvalidFilter(format!(
                "unknown operation type: {other}"
            ))),
        }
    }
}

/// A brokerage transaction.
///
/// Percentages are expressed in `0..=100`. Absent values deserialize to 0
/// and out-of-range values are kept as-is; the calculation layer normalizes
/// them at the point of use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: Uuid,
    /// The owning team leader's id.
    pub team_id: ParticipantId,
    #[serde(default)]
    pub status: OperationStatus,
    #[serde(default)]
    pub operation_type: OperationType,
    #[serde(default)]
    pub reservation_value: f64,
    #[serde(default)]
    pub buyer_side_percent: f64,
    #[serde(default)]
    pub seller_side_percent: f64,
    #[serde(default)]
    pub buyer_side: bool,
    #[serde(default)]
    pub seller_side: bool,
    #[serde(default)]
    pub advisor_percent: f64,
    #[serde(default)]
    pub secondary_advisor_percent: f64,
    #[serde(default)]
    pub shared_partner_percent: f64,
    #[serde(default)]
    pub referral_percent: f64,
    /// Cut retained by a franchise or parent broker. `None` falls back to the
    /// team leader's configured setting.
    #[serde(default)]
    pub franchise_or_broker_percent: Option<f64>,
    #[serde(default)]
    pub primary_advisor_id: Option<ParticipantId>,
    #[serde(default)]
    pub secondary_advisor_id: Option<ParticipantId>,
    /// The lead originated from the brokerage, not from the advisor.
    #[serde(default)]
    pub listing_not_owned: bool,
    #[serde(default)]
    pub reservation_date: Option<NaiveDate>,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
    #[serde(default)]
    pub fall_reason: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Operation {
    /// A new in-progress operation with every commission input at zero.
    pub fn new(team_id: impl Into<ParticipantId>, reservation_value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id: team_id.into(),
            status: OperationStatus::InProgress,
            operation_type: OperationType::Sale,
            reservation_value,
            buyer_side_percent: 0.0,
            seller_side_percent: 0.0,
            buyer_side: false,
            seller_side: false,
            advisor_percent: 0.0,
            secondary_advisor_percent: 0.0,
            shared_partner_percent: 0.0,
            referral_percent: 0.0,
            franchise_or_broker_percent: None,
            primary_advisor_id: None,
            secondary_advisor_id: None,
            listing_not_owned: false,
            reservation_date: None,
            closing_date: None,
            fall_reason: None,
            address: None,
            city: None,
            province: None,
            notes: None,
        }
    }

    /// Sum of both side percentages, independent of the side flags. Each
    /// side is sanitized first.
    #[must_use]
    pub fn gross_commission_percent(&self) -> f64 {
        non_negative(self.buyer_side_percent) + non_negative(self.seller_side_percent)
    }

    #[must_use]
    pub fn buyer_tip(&self) -> u32 {
        u32::from(self.buyer_side)
    }

    #[must_use]
    pub fn seller_tip(&self) -> u32 {
        u32::from(self.seller_side)
    }

    /// Number of represented sides (0, 1 or 2).
    #[must_use]
    pub fn tips(&self) -> u32 {
        self.buyer_tip() + self.seller_tip()
    }

    /// Date used by year/month filters: closing date, else reservation date.
    #[must_use]
    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.closing_date.or(self.reservation_date)
    }

    /// Days between reservation and closing for closed operations with both
    /// dates.
    #[must_use]
    pub fn days_to_sell(&self) -> Option<i64> {
        if self.status != OperationStatus::Closed {
            return None;
        }
        let (reserved, closed) = (self.reservation_date?, self.closing_date?);
        Some((closed - reserved).num_days())
    }

    /// Toggle between in progress and closed.
    pub fn toggle_closed(&mut self) -> ResultEngine<OperationStatus> {
        self.status = match self.status {
            OperationStatus::InProgress => OperationStatus::Closed,
            OperationStatus::Closed => OperationStatus::InProgress,
            OperationStatus::Fallen => {
                return Err(EngineError::InvalidTransition(
                    "a fallen operation cannot be closed or reopened".to_string(),
                ));
            }
        };
        Ok(self.status)
    }

    /// Mark the operation as fallen through. A reason is required.
    pub fn mark_fallen(&mut self, reason: &str) -> ResultEngine<()> {
        if self.status == OperationStatus::Fallen {
            return Err(EngineError::InvalidTransition(
                "operation already fallen".to_string(),
            ));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(EngineError::InvalidTransition(
                "fall reason must not be empty".to_string(),
            ));
        }
        self.status = OperationStatus::Fallen;
        self.fall_reason = Some(reason.to_string());
        Ok(())
    }
}
