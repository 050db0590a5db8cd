#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::path::PathBuf;
    use taskscope::db::db::Db;
    use taskscope::db::projects::Projects;
    use taskscope::db::tasks::Tasks;
    use taskscope::db::users::Users;
    use taskscope::libs::auth::Caller;
    use taskscope::libs::clock::FixedClock;
    use taskscope::libs::scope::TaskQuery;
    use taskscope::libs::task::{NewTask, Task};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct VisibilityTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
    }

    impl TestContext for VisibilityTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join("taskscope.db");
            VisibilityTestContext { _temp_dir: temp_dir, path }
        }
    }

    impl VisibilityTestContext {
        fn db(&self) -> Db {
            Db::open(&self.path).unwrap()
        }
    }

    fn visible_by_rule(caller: &Caller, task: &Task) -> bool {
        task.creator_id == caller.id || task.project_id.is_some_and(|p| caller.project_ids.contains(&p))
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    proptest! {
        #[test]
        fn visibility_predicate_agrees_with_rule(
            caller_id in 1i64..6,
            memberships in proptest::collection::btree_set(1i64..8, 0..4),
            creator_id in 1i64..6,
            project_id in proptest::option::of(1i64..8),
        ) {
            let caller = Caller { id: caller_id, project_ids: memberships };
            let task = Task {
                id: 1,
                title: "generated".to_string(),
                is_done: false,
                creator_id,
                project_id,
                scheduled_at: None,
                due_at: None,
                created_at: None,
                updated_at: None,
            };
            let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());

            let predicate = TaskQuery::for_caller(caller.clone()).predicate(&clock);
            prop_assert_eq!(predicate.matches(&task), visible_by_rule(&caller, &task));
        }
    }

    #[test_context(VisibilityTestContext)]
    #[test]
    fn test_creator_and_member_scenario(ctx: &mut VisibilityTestContext) {
        let mut users = Users::with_db(ctx.db());
        let mut projects = Projects::with_db(ctx.db());
        let mut tasks = Tasks::with_db(ctx.db());

        let user_a = users.create("a").unwrap();
        let user_b = users.create("b").unwrap();
        let user_c = users.create("c").unwrap();
        assert_eq!((user_a, user_b, user_c), (1, 2, 3));

        let mut project_id = 0;
        for name in ["p1", "p2", "p3", "p4", "p5"] {
            project_id = projects.create(name).unwrap();
        }
        assert_eq!(project_id, 5);

        users.add_membership(user_b, 5).unwrap();
        users.add_membership(user_c, 5).unwrap();

        let a = users.caller(user_a).unwrap().unwrap();
        let b = users.caller(user_b).unwrap().unwrap();
        let c = users.caller(user_c).unwrap().unwrap();
        assert!(a.project_ids.is_empty());

        tasks.insert(&a, &NewTask::new("X")).unwrap();
        tasks.insert(&b, &NewTask::new("Y").in_project(5)).unwrap();

        assert_eq!(titles(&tasks.fetch(&TaskQuery::for_caller(a)).unwrap()), vec!["X"]);
        assert_eq!(titles(&tasks.fetch(&TaskQuery::for_caller(b)).unwrap()), vec!["Y"]);
        assert_eq!(titles(&tasks.fetch(&TaskQuery::for_caller(c)).unwrap()), vec!["Y"]);
    }

    #[test_context(VisibilityTestContext)]
    #[test]
    fn test_sql_and_memory_evaluation_agree(ctx: &mut VisibilityTestContext) {
        let mut users = Users::with_db(ctx.db());
        let mut projects = Projects::with_db(ctx.db());
        let mut tasks = Tasks::with_db(ctx.db());

        let user_ids: Vec<i64> = (1..=4).map(|i| users.create(&format!("user{}", i)).unwrap()).collect();
        let project_ids: Vec<i64> = (1..=3).map(|i| projects.create(&format!("project{}", i)).unwrap()).collect();

        // user1: no projects, user2: project1, user3: project1 + project2, user4: project3
        users.add_membership(user_ids[1], project_ids[0]).unwrap();
        users.add_membership(user_ids[2], project_ids[0]).unwrap();
        users.add_membership(user_ids[2], project_ids[1]).unwrap();
        users.add_membership(user_ids[3], project_ids[2]).unwrap();

        for (i, user_id) in user_ids.iter().enumerate() {
            let caller = users.caller(*user_id).unwrap().unwrap();
            tasks.insert(&caller, &NewTask::new(&format!("private {}", i))).unwrap();
            for project_id in &project_ids {
                tasks
                    .insert(&caller, &NewTask::new(&format!("{} in {}", i, project_id)).in_project(*project_id))
                    .unwrap();
            }
        }

        // Every task, collected as each user's own creations (no memberships)
        let mut all = Vec::new();
        for user_id in &user_ids {
            let owner = Caller::new(*user_id);
            all.extend(tasks.fetch(&TaskQuery::for_caller(owner)).unwrap());
        }
        assert_eq!(all.len(), 16);

        for user_id in &user_ids {
            let caller = users.caller(*user_id).unwrap().unwrap();
            let from_sql: Vec<i64> = tasks
                .fetch(&TaskQuery::for_caller(caller.clone()))
                .unwrap()
                .iter()
                .map(|t| t.id)
                .collect();
            let mut from_rule: Vec<i64> = all.iter().filter(|t| visible_by_rule(&caller, t)).map(|t| t.id).collect();
            from_rule.sort();

            assert_eq!(from_sql, from_rule, "user {}", user_id);
        }
    }

    #[test_context(VisibilityTestContext)]
    #[test]
    fn test_large_membership_sets_stay_queryable(ctx: &mut VisibilityTestContext) {
        let mut users = Users::with_db(ctx.db());
        let mut projects = Projects::with_db(ctx.db());
        let mut tasks = Tasks::with_db(ctx.db());

        let reader = users.create("reader").unwrap();
        let writer = users.create("writer").unwrap();
        let joined = projects.create("joined").unwrap();
        let other = projects.create("other").unwrap();

        let writer = users.caller(writer).unwrap().unwrap();
        let shared = tasks.insert(&writer, &NewTask::new("shared").in_project(joined)).unwrap();
        tasks.insert(&writer, &NewTask::new("hidden").in_project(other)).unwrap();

        // More memberships than SQLite accepts host parameters
        let memberships = std::iter::once(joined).chain((other + 1)..=(other + 40_000));
        let reader = Caller::with_projects(reader, memberships);

        let visible = tasks.fetch(&TaskQuery::for_caller(reader.clone())).unwrap();
        assert_eq!(visible.iter().map(|t| t.id).collect::<Vec<_>>(), vec![shared]);
        assert_eq!(tasks.count(&TaskQuery::for_caller(reader.clone())).unwrap(), 1);
        assert!(visible.iter().all(|t| visible_by_rule(&reader, t)));
    }

    #[test_context(VisibilityTestContext)]
    #[test]
    fn test_leaving_a_project_hides_its_tasks(ctx: &mut VisibilityTestContext) {
        let mut users = Users::with_db(ctx.db());
        let mut projects = Projects::with_db(ctx.db());
        let mut tasks = Tasks::with_db(ctx.db());

        let owner = users.create("owner").unwrap();
        let member = users.create("member").unwrap();
        let project = projects.create("shared").unwrap();
        users.add_membership(member, project).unwrap();

        let owner = users.caller(owner).unwrap().unwrap();
        tasks.insert(&owner, &NewTask::new("shared work").in_project(project)).unwrap();

        let before = users.caller(member).unwrap().unwrap();
        assert_eq!(tasks.count(&TaskQuery::for_caller(before)).unwrap(), 1);

        assert!(users.remove_membership(member, project).unwrap());
        let after = users.caller(member).unwrap().unwrap();
        assert_eq!(tasks.count(&TaskQuery::for_caller(after)).unwrap(), 0);
    }
}
