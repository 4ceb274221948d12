use pretty_assertions::assert_eq;
use tests::prelude::*;

fn config() -> Configuration {
    let mut config = Configuration::new();

    let count = config
        .add_result_map(ResultMap::scalar::<i64>("count"))
        .unwrap();

    config
        .add_statement(
            Statement::builder(
                "insertComment",
                "INSERT INTO comments (id, post_id, body) VALUES (${1.id}, ${2}, ${1.body})",
            )
            .params([Comment::ty(), Type::I64]),
        )
        .unwrap();

    config
        .add_statement(
            Statement::builder("retitle", "UPDATE posts SET title = ${1} WHERE author_id = ${2}")
                .params([Type::String, Type::I64]),
        )
        .unwrap();

    config
        .add_statement(
            Statement::builder("countComments", "SELECT count(*) FROM comments")
                .returns(Returns::One(count)),
        )
        .unwrap();

    config
}

async fn count_comments(session: &mut rowmap::Session) -> i64 {
    session
        .one::<i64>("countComments", args![])
        .await
        .unwrap()
        .unwrap()
}

async fn bean_parameters_are_flattened(test: impl Setup) {
    let (db, log) = test.setup(blog::FIXTURES, config()).await;

    let inserted = db
        .exec(
            "insertComment",
            args![Value::bean(comment(103, "fourth")), 11_i64],
        )
        .await
        .unwrap();
    assert_eq!(inserted, Value::U64(1));

    let updated = db
        .exec("retitle", args!["Renamed", 1_i64])
        .await
        .unwrap();
    assert_eq!(updated, Value::U64(2));

    assert_eq!(
        log.queries()[0],
        "INSERT INTO comments (id, post_id, body) VALUES (?, ?, ?)"
    );
    assert_eq!(
        log.params()[0],
        vec![Value::I64(103), Value::I64(11), Value::from("fourth")]
    );
}

async fn rollback_discards_writes(test: impl Setup) {
    let (db, _log) = test.setup(blog::FIXTURES, config()).await;
    let mut session = db.session().await.unwrap();

    session.begin().await.unwrap();
    session
        .exec("insertComment", args![Value::bean(comment(103, "draft")), 10_i64])
        .await
        .unwrap();
    assert_eq!(count_comments(&mut session).await, 4);
    session.rollback().await.unwrap();

    assert_eq!(count_comments(&mut session).await, 3);

    session.begin().await.unwrap();
    session
        .exec("insertComment", args![Value::bean(comment(104, "kept")), 10_i64])
        .await
        .unwrap();
    session.commit().await.unwrap();

    assert_eq!(count_comments(&mut session).await, 4);
}

async fn wrong_argument_types_are_rejected(test: impl Setup) {
    let (db, _log) = test.setup(blog::FIXTURES, config()).await;

    let err = db
        .exec("retitle", args![Value::bean(author(1, "ana")), 1_i64])
        .await
        .unwrap_err();
    assert!(err.is_type_conversion(), "{err}");
}

tests!(
    bean_parameters_are_flattened,
    rollback_discards_writes,
    wrong_argument_types_are_rejected,
);
