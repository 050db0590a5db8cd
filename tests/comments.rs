#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use taskscope::db::comments::{Commentable, CommentableKind, Comments};
    use taskscope::db::db::Db;
    use taskscope::db::projects::Projects;
    use taskscope::db::tasks::Tasks;
    use taskscope::db::users::Users;
    use taskscope::libs::auth::Caller;
    use taskscope::libs::error::ScopeError;
    use taskscope::libs::task::NewTask;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct CommentsTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
        owner: Caller,
        member: Caller,
        outsider: Caller,
        project_id: i64,
        task_id: i64,
    }

    impl TestContext for CommentsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join("taskscope.db");

            let mut users = Users::with_db(Db::open(&path).unwrap());
            let mut projects = Projects::with_db(Db::open(&path).unwrap());
            let owner = users.create("owner").unwrap();
            let member = users.create("member").unwrap();
            let outsider = users.create("outsider").unwrap();
            let project_id = projects.create("roadmap").unwrap();
            users.add_membership(owner, project_id).unwrap();
            users.add_membership(member, project_id).unwrap();

            let owner = users.caller(owner).unwrap().unwrap();
            let task_id = Tasks::with_db(Db::open(&path).unwrap())
                .insert(&owner, &NewTask::new("Plan Q3").in_project(project_id))
                .unwrap();

            CommentsTestContext {
                member: users.caller(member).unwrap().unwrap(),
                outsider: users.caller(outsider).unwrap().unwrap(),
                owner,
                _temp_dir: temp_dir,
                path,
                project_id,
                task_id,
            }
        }
    }

    impl CommentsTestContext {
        fn comments(&self) -> Comments {
            Comments::with_db(Db::open(&self.path).unwrap())
        }
    }

    #[test_context(CommentsTestContext)]
    #[test]
    fn test_task_comments_follow_task_visibility(ctx: &mut CommentsTestContext) {
        let mut comments = ctx.comments();
        let task = Commentable::task(ctx.task_id);

        let first = comments.add(&ctx.owner, task, "Kickoff on Monday").unwrap();
        let second = comments.add(&ctx.member, task, "I'll bring the numbers").unwrap();

        let listed = comments.list(&ctx.member, task).unwrap();
        assert_eq!(listed.iter().map(|c| c.id).collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(listed[0].owner, task);
        assert_eq!(listed[0].author_id, ctx.owner.id);
        assert_eq!(listed[1].body, "I'll bring the numbers");

        assert!(comments.list(&ctx.outsider, task).unwrap().is_empty());
        let err = comments.add(&ctx.outsider, task, "let me in").unwrap_err();
        assert!(err.to_string().contains(&format!("Task #{} not found", ctx.task_id)));
    }

    #[test_context(CommentsTestContext)]
    #[test]
    fn test_project_comments_require_membership(ctx: &mut CommentsTestContext) {
        let mut comments = ctx.comments();
        let project = Commentable::project(ctx.project_id);

        comments.add(&ctx.member, project, "Roadmap draft is up").unwrap();

        assert_eq!(comments.for_project(&ctx.owner, ctx.project_id).unwrap().len(), 1);
        assert!(comments.for_project(&ctx.outsider, ctx.project_id).unwrap().is_empty());
        assert!(comments.add(&ctx.outsider, project, "hello?").is_err());
    }

    #[test_context(CommentsTestContext)]
    #[test]
    fn test_task_and_project_comments_are_kept_apart(ctx: &mut CommentsTestContext) {
        let mut comments = ctx.comments();

        // Same numeric id, different owner kinds
        comments.add(&ctx.owner, Commentable::task(ctx.task_id), "on the task").unwrap();
        comments.add(&ctx.owner, Commentable::project(ctx.project_id), "on the project").unwrap();
        assert_eq!(ctx.task_id, ctx.project_id);

        let on_task = comments.for_task(&ctx.owner, ctx.task_id).unwrap();
        let on_project = comments.for_project(&ctx.owner, ctx.project_id).unwrap();
        assert_eq!(on_task.len(), 1);
        assert_eq!(on_task[0].owner.kind, CommentableKind::Task);
        assert_eq!(on_project.len(), 1);
        assert_eq!(on_project[0].body, "on the project");
    }

    #[test_context(CommentsTestContext)]
    #[test]
    fn test_only_author_deletes(ctx: &mut CommentsTestContext) {
        let mut comments = ctx.comments();
        let id = comments
            .add(&ctx.member, Commentable::task(ctx.task_id), "typo")
            .unwrap();

        let err = comments.delete(&ctx.owner, id).unwrap_err();
        assert!(err.to_string().contains(&format!("Comment #{} not found", id)));

        comments.delete(&ctx.member, id).unwrap();
        assert!(comments.for_task(&ctx.member, ctx.task_id).unwrap().is_empty());
    }

    #[test_context(CommentsTestContext)]
    #[test]
    fn test_schema_rejects_unknown_kinds(ctx: &mut CommentsTestContext) {
        let db = Db::open(&ctx.path).unwrap();
        let result = db.conn.execute(
            "INSERT INTO comments (commentable_type, commentable_id, author_id, body) VALUES ('user', 1, 1, 'x')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_commentable_kind_tags() {
        assert_eq!("task".parse::<CommentableKind>(), Ok(CommentableKind::Task));
        assert_eq!("project".parse::<CommentableKind>(), Ok(CommentableKind::Project));
        assert!(matches!(
            "Task".parse::<CommentableKind>(),
            Err(ScopeError::InvalidArgument(_))
        ));
        assert_eq!(CommentableKind::Project.to_string(), "project");
    }
}
