use pretty_assertions::assert_eq;
use tests::prelude::*;

#[derive(Debug, Default, Clone, PartialEq, rowmap::Bean)]
struct Summary {
    id: i64,

    #[bean(rename = "headline")]
    title: String,

    score: Option<f64>,

    #[bean(skip)]
    loaded: bool,
}

fn config(sql: &str) -> Configuration {
    let mut config = Configuration::new();

    let summary = config
        .add_result_map(ResultMap::builder::<Summary>("summary").auto(true))
        .unwrap();

    config
        .add_statement(Statement::builder("summaries", sql).returns(Returns::List(summary)))
        .unwrap();

    config
}

async fn columns_match_properties_ignoring_case(test: impl Setup) {
    let sql = "SELECT id AS ID, title AS HeadLine, score AS Score FROM posts ORDER BY id";
    let (db, _log) = test.setup(blog::FIXTURES, config(sql)).await;

    let summaries: Vec<Summary> = db.list("summaries", args![]).await.unwrap();

    assert_eq!(
        summaries,
        vec![
            Summary {
                id: 10,
                title: "Hello".to_string(),
                score: Some(4.5),
                loaded: false,
            },
            Summary {
                id: 11,
                title: "Again".to_string(),
                score: None,
                loaded: false,
            },
            Summary {
                id: 12,
                title: String::new(),
                score: Some(1.0),
                loaded: false,
            },
        ]
    );
}

async fn unmatched_columns_are_errors(test: impl Setup) {
    let sql = "SELECT id, author_id FROM posts";
    let (db, _log) = test.setup(blog::FIXTURES, config(sql)).await;

    let err = db.list::<Summary>("summaries", args![]).await.unwrap_err();

    assert!(err.is_result_map());
    assert!(err.to_string().contains("author_id"), "{err}");
}

async fn scalar_maps(test: impl Setup) {
    let mut config = Configuration::new();

    let count = config
        .add_result_map(ResultMap::scalar::<u32>("count"))
        .unwrap();
    let title = config
        .add_result_map(ResultMap::scalar::<Option<String>>("title").scalar_column("title"))
        .unwrap();

    config
        .add_statement(
            Statement::builder("countPosts", "SELECT count(*) FROM posts WHERE author_id = ${1}")
                .params([Type::I64])
                .returns(Returns::One(count)),
        )
        .unwrap();
    config
        .add_statement(
            Statement::builder("titles", "SELECT id, title FROM posts ORDER BY id")
                .returns(Returns::List(title)),
        )
        .unwrap();

    let (db, _log) = test.setup(blog::FIXTURES, config).await;

    let count: Option<u32> = db.one("countPosts", args![1_i64]).await.unwrap();
    assert_eq!(count, Some(2));

    let titles: Vec<Option<String>> = db.list("titles", args![]).await.unwrap();
    assert_eq!(
        titles,
        vec![Some("Hello".to_string()), Some("Again".to_string()), None]
    );
}

tests!(
    columns_match_properties_ignoring_case,
    unmatched_columns_are_errors,
    scalar_maps,
);
