use pretty_assertions::assert_eq;
use tests::prelude::*;

const POSTS_WITH_COMMENTS: &str = "
    SELECT p.id AS post_id, p.title, p.score,
           a.id AS author_id, a.name AS author_name,
           c.id AS comment_id, c.body
    FROM posts p
    JOIN authors a ON a.id = p.author_id
    LEFT JOIN comments c ON c.post_id = p.id
    ORDER BY p.id, c.id";

fn config() -> Configuration {
    let mut config = Configuration::new();

    let comment = config
        .add_result_map(
            ResultMap::builder::<Comment>("comment")
                .column("id", "comment_id")
                .column("body", "body")
                .group_by(["id"]),
        )
        .unwrap();

    let author = config
        .add_result_map(
            ResultMap::builder::<Author>("author")
                .column("id", "author_id")
                .column("name", "author_name"),
        )
        .unwrap();

    let post = config
        .add_result_map(
            ResultMap::builder::<Post>("post")
                .column("id", "post_id")
                .column("title", "title")
                .column("score", "score")
                .nested("author", &author)
                .nested("comments", &comment)
                .group_by(["id"]),
        )
        .unwrap();

    config
        .add_statement(
            Statement::builder("postsWithComments", POSTS_WITH_COMMENTS)
                .returns(Returns::List(post.clone())),
        )
        .unwrap();

    config
        .add_statement(
            Statement::builder(
                "postWithComments",
                format!("SELECT * FROM ({POSTS_WITH_COMMENTS}) WHERE post_id = ${{1}}"),
            )
            .params([Type::I64])
            .returns(Returns::One(post)),
        )
        .unwrap();

    config
}

async fn rows_merge_into_one_post_per_key(test: impl Setup) {
    let (db, log) = test.setup(blog::FIXTURES, config()).await;

    let posts: Vec<Post> = db.list("postsWithComments", args![]).await.unwrap();

    assert_eq!(
        posts,
        vec![
            Post {
                id: 10,
                title: "Hello".to_string(),
                score: 4.5,
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
            Post {
                id: 12,
                title: String::new(),
                score: 1.0,
                author: Some(author(2, "bo")),
                comments: vec![comment(102, "third")],
            },
        ]
    );

    // Joined rows are merged client side: one round trip.
    assert_eq!(log.queries().len(), 1);
}

async fn grouped_single_result(test: impl Setup) {
    let (db, _log) = test.setup(blog::FIXTURES, config()).await;

    let post: Option<Post> = db.one("postWithComments", args![10_i64]).await.unwrap();
    let post = post.unwrap();
    assert_eq!(post.comments.len(), 2);
    assert_eq!(post.author, Some(author(1, "ana")));

    let missing: Option<Post> = db.one("postWithComments", args![99_i64]).await.unwrap();
    assert_eq!(missing, None);
}

async fn array_results(test: impl Setup) {
    let mut config = config();
    let post = config.result_map("post").unwrap().clone();
    config
        .add_statement(
            Statement::builder("postArray", POSTS_WITH_COMMENTS).returns(Returns::Array(post)),
        )
        .unwrap();

    let (db, _log) = test.setup(blog::FIXTURES, config).await;

    let posts: Box<[Post]> = db.array("postArray", args![]).await.unwrap();
    let ids = posts.iter().map(|post| post.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![10, 11, 12]);
}

tests!(
    rows_merge_into_one_post_per_key,
    grouped_single_result,
    array_results,
);
