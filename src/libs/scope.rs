//! Caller-scoped task queries.
//!
//! Every read of the `tasks` relation is restricted to the rows its caller is
//! allowed to see: tasks the caller created, and tasks that belong to a
//! project the caller is a member of. [`TaskQuery`] is the only way to build
//! a read predicate for the task repository, and it cannot be constructed
//! without a caller, so the visibility rule is always the first conjunct of
//! whatever it produces.
//!
//! ## Filters
//!
//! - [`scheduled_between`] / [`due_between`]: inclusive date ranges. Reversed
//!   bounds are accepted and simply match nothing.
//! - [`due_filter`]: `today` (due on the current date) or `past` (due before
//!   it). Anything else imposes no constraint.
//! - [`done_filter`]: done-state.
//!
//! Filters are AND-ed with each other and with the visibility rule. Picking
//! one due-date mode (range or keyword) is left to the caller.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use taskscope::libs::auth::Caller;
//! use taskscope::libs::clock::FixedClock;
//! use taskscope::libs::scope::{DueFilter, TaskQuery};
//!
//! let caller = Caller::with_projects(2, [5]);
//! let query = TaskQuery::for_caller(caller).due(DueFilter::Past);
//! let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
//! assert_eq!(
//!     query.predicate(&clock).to_string(),
//!     "((creator_id = 2 OR project_id IN (5)) AND due_at < '2025-06-01')"
//! );
//! ```

use super::auth::{AuthContext, Caller, ProjectId, UserId};
use super::clock::Clock;
use super::error::ScopeError;
use super::messages::Message;
use super::predicate::{Column, Predicate, DATE_FORMAT};
use super::task::TaskId;
use crate::msg_debug;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Parses a `YYYY-MM-DD` calendar date, ignoring surrounding whitespace.
///
/// Dates are bound to SQLite as text and compared as strings, which only
/// agrees with calendar order for four-digit years, so any other year is
/// rejected.
pub fn parse_date(input: &str) -> Result<NaiveDate, ScopeError> {
    let invalid = |error: String| ScopeError::InvalidArgument(Message::InvalidDate(input.to_string(), error).to_string());

    let date = NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| invalid(e.to_string()))?;
    if !(0..=9999).contains(&date.year()) {
        return Err(invalid("year must be between 0000 and 9999".to_string()));
    }

    Ok(date)
}

/// `creator_id = caller_id OR project_id IN project_ids`.
///
/// With no memberships this is just the creator check; an empty `IN` list is
/// never emitted.
pub fn visibility_predicate(caller_id: UserId, project_ids: &BTreeSet<ProjectId>) -> Predicate {
    let created = Predicate::eq(Column::CreatorId, caller_id);
    if project_ids.is_empty() {
        return created;
    }

    created.or(Predicate::is_in(Column::ProjectId, project_ids.iter().copied()))
}

/// Visibility for an optional caller. A missing caller is a hard failure.
pub fn caller_visibility(caller: Option<&Caller>) -> Result<Predicate, ScopeError> {
    let caller = caller.ok_or(ScopeError::Unauthorized)?;
    Ok(visibility_predicate(caller.id, &caller.project_ids))
}

/// `scheduled_at >= from AND scheduled_at <= to`.
pub fn scheduled_between(from: &str, to: &str) -> Result<Predicate, ScopeError> {
    Ok(date_range(Column::ScheduledAt, parse_date(from)?, parse_date(to)?))
}

/// `due_at >= from AND due_at <= to`.
pub fn due_between(from: &str, to: &str) -> Result<Predicate, ScopeError> {
    Ok(date_range(Column::DueAt, parse_date(from)?, parse_date(to)?))
}

pub fn date_range(column: Column, from: NaiveDate, to: NaiveDate) -> Predicate {
    Predicate::ge(column, from).and(Predicate::le(column, to))
}

pub fn due_filter(filter: DueFilter, today: NaiveDate) -> Predicate {
    match filter {
        DueFilter::Today => Predicate::eq(Column::DueAt, today),
        DueFilter::Past => Predicate::lt(Column::DueAt, today),
        DueFilter::None => Predicate::True,
    }
}

pub fn done_filter(done: bool) -> Predicate {
    Predicate::eq(Column::IsDone, done)
}

/// Due-date keyword filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DueFilter {
    Today,
    Past,
    #[default]
    None,
}

impl DueFilter {
    /// Permissive keyword parsing: `"today"` and `"past"` select a filter,
    /// anything else (or no keyword) means no due-date constraint.
    pub fn lenient(keyword: Option<&str>) -> Self {
        match keyword {
            Some("today") => DueFilter::Today,
            Some("past") => DueFilter::Past,
            Some(other) => {
                msg_debug!(Message::UnknownDueFilter(other.to_string()));
                DueFilter::None
            }
            None => DueFilter::None,
        }
    }
}

/// Strict keyword parsing: unknown keywords are rejected.
impl FromStr for DueFilter {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DueFilter::Today),
            "past" => Ok(DueFilter::Past),
            "none" => Ok(DueFilter::None),
            other => Err(ScopeError::InvalidArgument(format!(
                "unknown due filter '{}' (expected today, past or none)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Filter {
    ScheduledBetween(NaiveDate, NaiveDate),
    DueBetween(NaiveDate, NaiveDate),
    Due(DueFilter),
    Done(bool),
    Id(TaskId),
}

impl Filter {
    fn predicate(&self, today: NaiveDate) -> Predicate {
        match self {
            Filter::ScheduledBetween(from, to) => date_range(Column::ScheduledAt, *from, *to),
            Filter::DueBetween(from, to) => date_range(Column::DueAt, *from, *to),
            Filter::Due(filter) => due_filter(*filter, today),
            Filter::Done(done) => done_filter(*done),
            Filter::Id(id) => Predicate::eq(Column::Id, *id),
        }
    }
}

/// A read of the `tasks` relation on behalf of one caller.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    caller: Caller,
    filters: Vec<Filter>,
}

impl TaskQuery {
    pub fn for_caller(caller: Caller) -> Self {
        Self {
            caller,
            filters: Vec::new(),
        }
    }

    /// Builds a query for whoever `auth` says is signed in.
    pub fn from_auth<A: AuthContext + ?Sized>(auth: &A) -> Result<Self, ScopeError> {
        auth.caller().map(Self::for_caller).ok_or(ScopeError::Unauthorized)
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn scheduled_between(mut self, from: &str, to: &str) -> Result<Self, ScopeError> {
        self.filters.push(Filter::ScheduledBetween(parse_date(from)?, parse_date(to)?));
        Ok(self)
    }

    pub fn due_between(mut self, from: &str, to: &str) -> Result<Self, ScopeError> {
        self.filters.push(Filter::DueBetween(parse_date(from)?, parse_date(to)?));
        Ok(self)
    }

    pub fn due(mut self, filter: DueFilter) -> Self {
        self.filters.push(Filter::Due(filter));
        self
    }

    pub fn done(mut self, done: bool) -> Self {
        self.filters.push(Filter::Done(done));
        self
    }

    pub fn id(mut self, id: TaskId) -> Self {
        self.filters.push(Filter::Id(id));
        self
    }

    /// Visibility rule AND every filter, in the order they were added.
    ///
    /// The clock is read exactly once, so all due-date filters in one query
    /// compare against the same day.
    pub fn predicate(&self, clock: &dyn Clock) -> Predicate {
        let today = clock.today();
        let predicate = self
            .filters
            .iter()
            .fold(visibility_predicate(self.caller.id, &self.caller.project_ids), |acc, filter| {
                acc.and(filter.predicate(today))
            });

        msg_debug!(Message::TaskQueryBuilt(self.caller.id, predicate.to_string()));
        predicate
    }
}
