//! Commission-splitting and reporting engine for a brokerage back-office.
//!
//! The engine is pure: it takes already-materialized [`Operation`]s and
//! [`Participant`]s and returns plain numbers. Nothing here performs I/O or
//! reads the system clock; callers pass a [`ReportClock`] when a "current"
//! date matters.

pub use clock::ReportClock;
pub use currency::Currency;
pub use error::EngineError;
pub use filters::{
    MonthFilter, OperationQuery, OperationTypeFilter, SortKey, SortState, StatusFilter,
    YearFilter,
};
pub use money::Money;
pub use net_fees::{AdvisorShare, Attribution, FeeBreakdown, gross_contribution, net_fee_for};
pub use operations::{Operation, OperationStatus, OperationType};
pub use participants::{Participant, ParticipantId, Role, Roster};
pub use ports::{OperationSource, ParticipantSource};
pub use reports::{AdvisorRow, MonthlySeries, PipelineFees, Summary, Viewer};
pub use split::{CommissionInputs, CommissionSplit, split_commission};

pub mod filters;
pub mod reports;

mod clock;
mod currency;
mod error;
mod money;
mod net_fees;
mod operations;
mod participants;
mod ports;
mod split;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
