use crate::Setup;

/// Runs one test body on its own current-thread Tokio runtime.
///
/// Tests are plain `#[test]` functions so the harness controls the runtime
/// and log capture.
pub struct RowmapTest<S: Setup> {
    runtime: tokio::runtime::Runtime,
    setup: Option<S>,
}

impl<S: Setup> RowmapTest<S> {
    /// Create a new RowmapTest with a current-thread runtime.
    pub fn new(setup: S) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime");

        Self {
            runtime,
            setup: Some(setup),
        }
    }

    /// Run a test function with the setup, using our managed runtime.
    pub fn run_test<F, Fut>(&mut self, test_fn: F)
    where
        F: FnOnce(S) -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        let setup = self.setup.take().expect("Setup already consumed");
        self.runtime.block_on(async {
            test_fn(setup).await;
        });
    }
}
