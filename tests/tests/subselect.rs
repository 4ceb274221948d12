use pretty_assertions::assert_eq;
use tests::prelude::*;

fn config() -> Configuration {
    let mut config = Configuration::new();

    let comment = config
        .add_result_map(ResultMap::builder::<Comment>("comment").auto(true))
        .unwrap();

    let author = config
        .add_result_map(ResultMap::builder::<Author>("author").auto(true))
        .unwrap();

    config
        .add_statement(
            Statement::builder(
                "commentsOf",
                "SELECT id, body FROM comments WHERE post_id = ${1} ORDER BY id",
            )
            .params([Type::I64])
            .returns(Returns::List(comment)),
        )
        .unwrap();

    config
        .add_statement(
            Statement::builder("authorById", "SELECT id, name FROM authors WHERE id = ${1}")
                .params([Type::I64])
                .returns(Returns::One(author)),
        )
        .unwrap();

    let post = config
        .add_result_map(
            ResultMap::builder::<Post>("post")
                .column("id", "id")
                .column("title", "title")
                .subselect("author", "author_id", "authorById")
                .subselect("comments", "id", "commentsOf"),
        )
        .unwrap();

    config
        .add_statement(
            Statement::builder("posts", "SELECT id, author_id, title FROM posts ORDER BY id")
                .returns(Returns::List(post)),
        )
        .unwrap();

    config
}

async fn each_object_runs_its_subselects(test: impl Setup) {
    let (db, log) = test.setup(blog::FIXTURES, config()).await;

    let posts: Vec<Post> = db.list("posts", args![]).await.unwrap();

    assert_eq!(
        posts
            .iter()
            .map(|post| (post.id, post.author.clone(), post.comments.clone()))
            .collect::<Vec<_>>(),
        vec![
            (
                10,
                Some(author(1, "ana")),
                vec![comment(100, "first"), comment(101, "second")]
            ),
            (11, Some(author(1, "ana")), vec![]),
            (12, Some(author(2, "bo")), vec![comment(102, "third")]),
        ]
    );

    // One query for the posts, then two per post.
    let queries = log.queries();
    assert_eq!(queries.len(), 7);
    assert!(queries[0].starts_with("SELECT id, author_id, title FROM posts"));
}

async fn subselects_share_the_session_transaction(test: impl Setup) {
    let (db, log) = test.setup(blog::FIXTURES, config()).await;
    let mut session = db.session().await.unwrap();

    session.begin().await.unwrap();

    let before: Vec<Post> = session.list("posts", args![]).await.unwrap();
    assert_eq!(before[0].comments.len(), 2);

    session.rollback().await.unwrap();

    assert_eq!(
        log.transactions(),
        vec![
            rowmap_core::driver::operation::Transaction::Start,
            rowmap_core::driver::operation::Transaction::Rollback,
        ]
    );
}

async fn unknown_subselect_statements_fail_validation(test: impl Setup) {
    let mut config = Configuration::new();
    config
        .add_result_map(
            ResultMap::builder::<Post>("post")
                .column("id", "id")
                .subselect("comments", "id", "missing"),
        )
        .unwrap();

    let driver = test.driver(blog::FIXTURES).await.unwrap();
    let err = Db::new(tests::LoggingDriver::new(driver), config).unwrap_err();

    assert!(err.is_result_map());
    assert!(err.is_configuration());
}

tests!(
    each_object_runs_its_subselects,
    subselects_share_the_session_transaction,
    unknown_subselect_statements_fail_validation,
);
