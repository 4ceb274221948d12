use pretty_assertions::assert_eq;
use tests::prelude::*;

const MAPPER: &str = r#"{
    "result_maps": [
        { "id": "comment", "type": "Comment", "auto": true },
        {
            "id": "post",
            "type": "Post",
            "group_by": ["id"],
            "mappings": [
                { "property": "id", "column": "post_id" },
                { "property": "title", "column": "title" },
                { "property": "author", "column": "author_id", "select": "authorById" },
                { "property": "comments", "result_map": "commentRow" }
            ]
        },
        { "id": "author", "type": "Author", "auto": true }
    ],
    "statements": [
        {
            "name": "authorById",
            "sql": "SELECT id, name FROM authors WHERE id = ${1}",
            "params": ["i64"],
            "returns": "one",
            "result_map": "author"
        }
    ]
}"#;

fn config(mapper: &str) -> rowmap::Result<Configuration> {
    let mut config = Configuration::new();
    config
        .register_bean::<Post>()
        .register_bean::<Author>()
        .register_bean::<Comment>();

    // Nested maps are referenced by id and must be registered first.
    config.load_json(
        r#"{
            "result_maps": [
                { "id": "commentRow", "type": "Comment", "group_by": ["id"],
                  "mappings": [
                    { "property": "id", "column": "comment_id" },
                    { "property": "body", "column": "body" }
                  ] }
            ]
        }"#,
    )?;
    config.load_json(mapper)?;

    config.load_json(
        r#"{
            "statements": [
                {
                    "name": "postsOf",
                    "sql": "SELECT p.id AS post_id, p.title, p.author_id, c.id AS comment_id, c.body FROM posts p LEFT JOIN comments c ON c.post_id = p.id WHERE p.author_id = ${1} ORDER BY p.id, c.id",
                    "params": ["i64"],
                    "returns": "list",
                    "result_map": "post"
                },
                {
                    "name": "deleteComments",
                    "sql": "DELETE FROM comments WHERE post_id = ${1}",
                    "params": ["Option<i64>"]
                }
            ]
        }"#,
    )?;

    Ok(config)
}

async fn declarative_mappers_run(test: impl Setup) {
    let (db, _log) = test.setup(blog::FIXTURES, config(MAPPER).unwrap()).await;

    let posts: Vec<Post> = db.list("postsOf", args![1_i64]).await.unwrap();

    assert_eq!(
        posts,
        vec![
            Post {
                id: 10,
                title: "Hello".to_string(),
                score: 0.0,
                author: Some(author(1, "ana")),
                comments: vec![comment(100, "first"), comment(101, "second")],
            },
            Post {
                id: 11,
                title: "Again".to_string(),
                score: 0.0,
                author: Some(author(1, "ana")),
                comments: vec![],
            },
        ]
    );

    let deleted = db.exec("deleteComments", args![10_i64]).await.unwrap();
    assert_eq!(deleted, Value::U64(2));
}

#[test]
fn definition_errors_name_their_source() {
    let err = config(&MAPPER.replace(
        "\"select\": \"authorById\"",
        "\"select\": \"authorById\", \"column_index\": 3",
    ))
    .unwrap_err();
    assert!(err.is_configuration(), "{err}");
    assert!(err.to_string().starts_with("result map `post`"), "{err}");

    let err = config(&MAPPER.replace("\"type\": \"Post\"", "\"type\": \"Widget\"")).unwrap_err();
    assert!(err.is_configuration(), "{err}");

    let err = config(&MAPPER.replace("\"returns\"", "\"return\"")).unwrap_err();
    assert!(err.to_string().starts_with("invalid mapper definition"), "{err}");
}

tests!(declarative_mappers_run);
