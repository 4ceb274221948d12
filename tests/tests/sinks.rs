use pretty_assertions::assert_eq;
use tests::prelude::*;

fn config() -> Configuration {
    let mut config = Configuration::new();

    let comment = config
        .add_result_map(ResultMap::builder::<Comment>("comment").auto(true))
        .unwrap();

    config
        .add_statement(
            Statement::builder("streamComments", "SELECT id, body FROM comments ORDER BY id")
                .returns(Returns::Callback(comment.clone())),
        )
        .unwrap();

    config
        .add_statement(
            Statement::builder("anyComment", "SELECT id, body FROM comments ORDER BY id")
                .returns(Returns::One(comment)),
        )
        .unwrap();

    config
}

async fn caller_sinks_receive_every_row(test: impl Setup) {
    let (db, _log) = test.setup(blog::FIXTURES, config()).await;

    let mut bodies = vec![];
    let mut sink = sink::from_fn(|value: Value| {
        let comment: Comment = value.into_bean()?;
        bodies.push(comment.body);
        Ok(())
    });

    db.exec_into("streamComments", args![], &mut sink)
        .await
        .unwrap();
    drop(sink);

    assert_eq!(bodies, vec!["first", "second", "third"]);
}

#[derive(Default)]
struct Recording {
    pushed: Vec<Value>,
    commits: usize,
}

impl rowmap::Sink for Recording {
    fn push(&mut self, value: Value) -> rowmap::Result<()> {
        self.pushed.push(value);
        Ok(())
    }

    fn commit(&mut self) -> rowmap::Result<()> {
        self.commits += 1;
        Ok(())
    }
}

async fn sinks_are_committed_once(test: impl Setup) {
    let (db, _log) = test.setup(blog::FIXTURES, config()).await;

    let mut sink = Recording::default();
    db.exec_into("streamComments", args![], &mut sink)
        .await
        .unwrap();

    assert_eq!(sink.pushed.len(), 3);
    assert_eq!(sink.commits, 1);
}

async fn callback_statements_need_a_sink(test: impl Setup) {
    let (db, _log) = test.setup(blog::FIXTURES, config()).await;

    let err = db.exec("streamComments", args![]).await.unwrap_err();
    assert!(err.is_mapping());
}

async fn single_results_reject_a_second_row(test: impl Setup) {
    let (db, _log) = test.setup(blog::FIXTURES, config()).await;

    let err = db.one::<Comment>("anyComment", args![]).await.unwrap_err();
    assert!(err.is_multiple_results());
}

async fn unknown_statements(test: impl Setup) {
    let (db, _log) = test.setup(blog::FIXTURES, config()).await;

    let err = db.exec("nope", args![]).await.unwrap_err();
    assert!(err.is_mapping());
}

tests!(
    caller_sinks_receive_every_row,
    sinks_are_committed_once,
    callback_statements_need_a_sink,
    single_results_reject_a_second_row,
    unknown_statements,
);
