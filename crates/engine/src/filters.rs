//! Operation filter pipeline.
//!
//! Every stage takes a slice of borrowed operations and returns a new vector;
//! the caller's collection is never reordered or mutated.

use std::{cmp::Ordering, str::FromStr};

use chrono::Datelike;

use crate::{
    EngineError, Operation, OperationStatus, OperationType, ReportClock, Roster,
    util::fold_text,
};

/// Filter by status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every status, fallen operations included.
    #[default]
    All,
    /// In progress and closed; what the operations table shows by default.
    Active,
    Status(OperationStatus),
}

impl StatusFilter {
    fn matches(self, op: &Operation) -> bool {
        match self {
            Self::All => true,
            Self::Active => op.status != OperationStatus::Fallen,
            Self::Status(status) => op.status == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            other => OperationStatus::try_from(other).map(Self::Status),
        }
    }
}

/// Filter by the year of an operation's reference date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl FromStr for YearFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<i32>()
            .map(Self::Year)
            .map_err(|_| EngineError::InvalidFilter(format!("invalid year: {s}")))
    }
}

/// Filter by the month (1-12) of an operation's reference date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

impl FromStr for MonthFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match s.parse::<u32>() {
            Ok(month @ 1..=12) => Ok(Self::Month(month)),
            _ => Err(EngineError::InvalidFilter(format!("invalid month: {s}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OperationTypeFilter {
    #[default]
    All,
    Type(OperationType),
}

impl FromStr for OperationTypeFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        OperationType::try_from(s).map(Self::Type)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    Value,
    ReservationDate,
    ClosingDate,
}

impl FromStr for SortKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "value" => Ok(Self::Value),
            "reservation" | "reservation_date" => Ok(Self::ReservationDate),
            "closing" | "closing_date" => Ok(Self::ClosingDate),
            other => Err(EngineError::InvalidFilter(format!("invalid sort key: {other}"))),
        }
    }
}

/// The single active sort of a table.
///
/// Holding at most one key makes the sort orders mutually exclusive: picking
/// a new column drops the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<(SortKey, bool)>,
}

impl SortState {
    pub fn new(key: SortKey, ascending: bool) -> Self {
        Self {
            active: Some((key, ascending)),
        }
    }

    /// Click on a column: flip its direction when already active, otherwise
    /// activate it ascending.
    pub fn toggle(&mut self, key: SortKey) {
        self.active = match self.active {
            Some((current, ascending)) if current == key => Some((key, !ascending)),
            _ => Some((key, true)),
        };
    }

    #[must_use]
    pub fn active(&self) -> Option<(SortKey, bool)> {
        self.active
    }

    /// Order `ops` by the active key, or by closing date descending when none
    /// is active.
    pub fn apply<'a>(&self, ops: &[&'a Operation]) -> Vec<&'a Operation> {
        match self.active {
            Some((key, ascending)) => sort_by(ops, key, ascending),
            None => sort_by(ops, SortKey::ClosingDate, false),
        }
    }
}

pub fn by_status<'a>(ops: &[&'a Operation], filter: StatusFilter) -> Vec<&'a Operation> {
    ops.iter().copied().filter(|op| filter.matches(op)).collect()
}

/// Keep operations whose reference date (closing, else reservation) falls in
/// the year. Operations without any date only survive `YearFilter::All`.
pub fn by_year<'a>(ops: &[&'a Operation], filter: YearFilter) -> Vec<&'a Operation> {
    match filter {
        YearFilter::All => ops.to_vec(),
        YearFilter::Year(year) => ops
            .iter()
            .copied()
            .filter(|op| op.reference_date().is_some_and(|d| d.year() == year))
            .collect(),
    }
}

/// Same as [`by_year`] for the month, in any year.
pub fn by_month<'a>(ops: &[&'a Operation], filter: MonthFilter) -> Vec<&'a Operation> {
    match filter {
        MonthFilter::All => ops.to_vec(),
        MonthFilter::Month(month) => ops
            .iter()
            .copied()
            .filter(|op| op.reference_date().is_some_and(|d| d.month() == month))
            .collect(),
    }
}

pub fn by_operation_type<'a>(
    ops: &[&'a Operation],
    filter: OperationTypeFilter,
) -> Vec<&'a Operation> {
    match filter {
        OperationTypeFilter::All => ops.to_vec(),
        OperationTypeFilter::Type(kind) => ops
            .iter()
            .copied()
            .filter(|op| op.operation_type == kind)
            .collect(),
    }
}

/// Case- and accent-insensitive search.
///
/// The query is split on whitespace and every token must appear somewhere in
/// the operation's searchable text: advisor names (resolved through the
/// roster), address, city, province, operation type and notes. An empty
/// query keeps everything.
pub fn by_search_text<'a>(
    ops: &[&'a Operation],
    query: &str,
    roster: &Roster,
) -> Vec<&'a Operation> {
    let tokens: Vec<String> = fold_text(query)
        .split_whitespace()
        .map(ToString::to_string)
        .collect();
    if tokens.is_empty() {
        return ops.to_vec();
    }
    ops.iter()
        .copied()
        .filter(|op| {
            let haystack = searchable_text(op, roster);
            tokens.iter().all(|token| haystack.contains(token.as_str()))
        })
        .collect()
}

fn searchable_text(op: &Operation, roster: &Roster) -> String {
    let names = [&op.primary_advisor_id, &op.secondary_advisor_id]
        .into_iter()
        .flatten()
        .filter_map(|id| roster.display_name(id));
    let fields = [&op.address, &op.city, &op.province, &op.notes]
        .into_iter()
        .flatten()
        .cloned();
    let parts: Vec<String> = names
        .chain(fields)
        .chain(std::iter::once(op.operation_type.as_str().replace('_', " ")))
        .collect();
    fold_text(&parts.join(" "))
}

/// Stable sort by one key.
///
/// Dates compare chronologically (equivalent to comparing ISO `YYYY-MM-DD`
/// strings). Operations missing the date always go last, whatever the
/// direction.
pub fn sort_by<'a>(ops: &[&'a Operation], key: SortKey, ascending: bool) -> Vec<&'a Operation> {
    let mut sorted = ops.to_vec();
    match key {
        SortKey::Value => sorted.sort_by(|a, b| {
            let ord = a.reservation_value.total_cmp(&b.reservation_value);
            if ascending { ord } else { ord.reverse() }
        }),
        SortKey::ReservationDate => {
            sorted.sort_by(|a, b| cmp_dates(a.reservation_date, b.reservation_date, ascending))
        }
        SortKey::ClosingDate => {
            sorted.sort_by(|a, b| cmp_dates(a.closing_date, b.closing_date, ascending))
        }
    }
    sorted
}

fn cmp_dates<T: Ord>(a: Option<T>, b: Option<T>, ascending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if ascending => a.cmp(&b),
        (Some(a), Some(b)) => b.cmp(&a),
    }
}

/// Filters for listing operations, applied in pipeline order: status, year,
/// month, type, search, then sort.
#[derive(Clone, Debug, Default)]
pub struct OperationQuery {
    pub status: StatusFilter,
    pub year: YearFilter,
    pub month: MonthFilter,
    pub operation_type: OperationTypeFilter,
    pub search: String,
    pub sort: SortState,
}

impl OperationQuery {
    /// Default dashboard query: everything in the clock's current year.
    pub fn current_year(clock: &ReportClock) -> Self {
        Self {
            year: YearFilter::Year(clock.current_year()),
            ..Self::default()
        }
    }

    /// Run the pipeline over `ops`.
    pub fn apply<'a>(&self, ops: &'a [Operation], roster: &Roster) -> Vec<&'a Operation> {
        let all: Vec<&Operation> = ops.iter().collect();
        let filtered = by_status(&all, self.status);
        let filtered = by_year(&filtered, self.year);
        let filtered = by_month(&filtered, self.month);
        let filtered = by_operation_type(&filtered, self.operation_type);
        let filtered = by_search_text(&filtered, &self.search, roster);
        tracing::debug!(
            input = ops.len(),
            output = filtered.len(),
            "operation filter pipeline"
        );
        self.sort.apply(&filtered)
    }
}
