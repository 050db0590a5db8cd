#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use std::cell::Cell;
    use std::collections::BTreeSet;
    use taskscope::libs::auth::{Caller, Session};
    use taskscope::libs::clock::{Clock, FixedClock};
    use taskscope::libs::error::ScopeError;
    use taskscope::libs::predicate::{Column, Predicate};
    use taskscope::libs::scope::{
        caller_visibility, due_between, due_filter, parse_date, scheduled_between, visibility_predicate, DueFilter,
        TaskQuery,
    };
    use taskscope::libs::task::Task;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task_with_dates(scheduled_at: Option<&str>, due_at: Option<&str>) -> Task {
        Task {
            id: 1,
            title: "Plan sprint".to_string(),
            is_done: false,
            creator_id: 1,
            project_id: None,
            scheduled_at: scheduled_at.map(date),
            due_at: due_at.map(date),
            created_at: None,
            updated_at: None,
        }
    }

    /// Counts how often "today" is asked for.
    struct CountingClock {
        today: NaiveDate,
        reads: Cell<usize>,
    }

    impl Clock for CountingClock {
        fn today(&self) -> NaiveDate {
            self.reads.set(self.reads.get() + 1);
            self.today
        }
    }

    #[test]
    fn test_visibility_without_memberships_is_creator_check() {
        let predicate = visibility_predicate(7, &BTreeSet::new());
        assert_eq!(predicate, Predicate::eq(Column::CreatorId, 7i64));

        let (sql, params) = predicate.to_sql();
        assert_eq!(sql, "creator_id = ?");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_visibility_with_memberships() {
        let projects: BTreeSet<i64> = [7, 5].into_iter().collect();
        let (sql, params) = visibility_predicate(2, &projects).to_sql();

        assert_eq!(sql, "(creator_id = ? OR project_id IN (?, ?))");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_missing_caller_is_unauthorized() {
        assert_eq!(caller_visibility(None), Err(ScopeError::Unauthorized));
        assert!(matches!(
            TaskQuery::from_auth(&Session::anonymous()),
            Err(ScopeError::Unauthorized)
        ));

        let caller = Caller::with_projects(3, [5]);
        let query = TaskQuery::from_auth(&Session::authenticated(caller.clone())).unwrap();
        assert_eq!(query.caller(), &caller);
        assert!(caller_visibility(Some(&caller)).is_ok());
    }

    #[test]
    fn test_scheduled_between_is_inclusive() {
        let predicate = scheduled_between("2025-06-01", "2025-06-30").unwrap();

        assert!(predicate.matches(&task_with_dates(Some("2025-06-01"), None)));
        assert!(predicate.matches(&task_with_dates(Some("2025-06-15"), None)));
        assert!(predicate.matches(&task_with_dates(Some("2025-06-30"), None)));
        assert!(!predicate.matches(&task_with_dates(Some("2025-05-31"), None)));
        assert!(!predicate.matches(&task_with_dates(Some("2025-07-01"), None)));
        assert!(!predicate.matches(&task_with_dates(None, None)));
    }

    #[test]
    fn test_due_between_targets_due_column() {
        let predicate = due_between("2025-06-01", "2025-06-01").unwrap();

        assert!(predicate.matches(&task_with_dates(None, Some("2025-06-01"))));
        assert!(!predicate.matches(&task_with_dates(Some("2025-06-01"), None)));
    }

    #[test]
    fn test_reversed_bounds_match_nothing() {
        let predicate = scheduled_between("2025-06-30", "2025-06-01").unwrap();

        for day in ["2025-06-01", "2025-06-15", "2025-06-30"] {
            assert!(!predicate.matches(&task_with_dates(Some(day), None)));
        }
    }

    #[test]
    fn test_malformed_dates_are_invalid_arguments() {
        assert!(matches!(
            scheduled_between("June 1st", "2025-06-30"),
            Err(ScopeError::InvalidArgument(_))
        ));
        assert!(matches!(
            due_between("2025-06-01", "2025-13-01"),
            Err(ScopeError::InvalidArgument(_))
        ));
        assert!(matches!(
            TaskQuery::for_caller(Caller::new(1)).scheduled_between("", "2025-06-01"),
            Err(ScopeError::InvalidArgument(_))
        ));

        // Surrounding whitespace is tolerated
        assert!(scheduled_between(" 2025-06-01 ", "2025-06-30\n").is_ok());
    }

    #[test]
    fn test_dates_outside_four_digit_years_are_rejected() {
        for input in ["+10000-01-01", "-0001-01-01", "+20000-12-31"] {
            assert!(
                matches!(parse_date(input), Err(ScopeError::InvalidArgument(_))),
                "{} should be rejected",
                input
            );
        }
        assert!(matches!(
            scheduled_between("2025-01-01", "+20000-01-01"),
            Err(ScopeError::InvalidArgument(_))
        ));
        assert!(matches!(
            TaskQuery::for_caller(Caller::new(1)).due_between("-0001-01-01", "2025-01-01"),
            Err(ScopeError::InvalidArgument(_))
        ));

        assert_eq!(parse_date("0001-01-01").unwrap(), date("0001-01-01"));
        assert_eq!(parse_date("9999-12-31").unwrap(), date("9999-12-31"));
    }

    #[test]
    fn test_due_today() {
        let today = date("2025-06-15");
        let predicate = due_filter(DueFilter::lenient(Some("today")), today);

        assert!(predicate.matches(&task_with_dates(None, Some("2025-06-15"))));
        assert!(!predicate.matches(&task_with_dates(None, Some("2025-06-14"))));
        assert!(!predicate.matches(&task_with_dates(None, Some("2025-06-16"))));
    }

    #[test]
    fn test_due_past() {
        let today = date("2025-06-15");
        let predicate = due_filter(DueFilter::lenient(Some("past")), today);

        assert!(predicate.matches(&task_with_dates(None, Some("2025-06-14"))));
        assert!(predicate.matches(&task_with_dates(None, Some("2024-01-01"))));
        assert!(!predicate.matches(&task_with_dates(None, Some("2025-06-15"))));
        assert!(!predicate.matches(&task_with_dates(None, None)));
    }

    #[test]
    fn test_unknown_due_keyword_imposes_nothing() {
        let today = date("2025-06-15");

        assert_eq!(DueFilter::lenient(Some("tomorrow")), DueFilter::None);
        assert_eq!(DueFilter::lenient(Some("Today")), DueFilter::None);
        assert_eq!(DueFilter::lenient(None), DueFilter::None);
        assert_eq!(due_filter(DueFilter::None, today), Predicate::True);

        let caller = Caller::with_projects(4, [5]);
        let plain = TaskQuery::for_caller(caller.clone());
        let unknown = TaskQuery::for_caller(caller).due(DueFilter::lenient(Some("someday")));
        let clock = FixedClock(today);
        assert_eq!(unknown.predicate(&clock), plain.predicate(&clock));
    }

    #[test]
    fn test_strict_due_keyword_parsing() {
        assert_eq!("today".parse::<DueFilter>(), Ok(DueFilter::Today));
        assert_eq!("past".parse::<DueFilter>(), Ok(DueFilter::Past));
        assert_eq!("none".parse::<DueFilter>(), Ok(DueFilter::None));
        assert!(matches!("tomorow".parse::<DueFilter>(), Err(ScopeError::InvalidArgument(_))));
    }

    #[test]
    fn test_visibility_is_first_conjunct() {
        let caller = Caller::with_projects(2, [5]);
        let query = TaskQuery::for_caller(caller.clone())
            .scheduled_between("2025-06-01", "2025-06-30")
            .unwrap()
            .done(false);

        let predicate = query.predicate(&FixedClock(date("2025-06-15")));
        match predicate {
            Predicate::And(parts) => {
                assert_eq!(parts[0], visibility_predicate(caller.id, &caller.project_ids));
                assert_eq!(parts.len(), 4);
            }
            other => panic!("expected a conjunction, got {}", other),
        }
    }

    #[test]
    fn test_filters_never_widen_visibility() {
        let caller = Caller::new(1);
        let query = TaskQuery::for_caller(caller).due(DueFilter::None);
        let predicate = query.predicate(&FixedClock(date("2025-06-15")));

        let mut foreign = task_with_dates(None, None);
        foreign.creator_id = 2;
        assert!(!predicate.matches(&foreign));
    }

    #[test]
    fn test_clock_is_read_once_per_query() {
        let clock = CountingClock {
            today: date("2025-06-15"),
            reads: Cell::new(0),
        };
        let query = TaskQuery::for_caller(Caller::new(1))
            .due(DueFilter::Today)
            .due(DueFilter::Past);

        query.predicate(&clock);
        assert_eq!(clock.reads.get(), 1);
    }

    #[test]
    fn test_sql_for_full_query() {
        let query = TaskQuery::for_caller(Caller::with_projects(2, [5]))
            .due_between("2025-06-01", "2025-06-30")
            .unwrap()
            .due(DueFilter::Today);

        let (sql, params) = query.predicate(&FixedClock(date("2025-06-15"))).to_sql();
        assert_eq!(
            sql,
            "((creator_id = ? OR project_id IN (?)) AND due_at >= ? AND due_at <= ? AND due_at = ?)"
        );
        assert_eq!(params.len(), 5);
    }
}
