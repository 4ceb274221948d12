#[macro_use]
mod macros;

pub mod blog;
pub mod db;
mod exec_log;
mod logging_driver;
pub mod prelude;
mod rowmap_test;

pub use exec_log::ExecLog;
pub use logging_driver::{DriverOp, LoggingDriver};

// Re-export for use in macros - needs to be public for macro expansion
pub use rowmap_test::RowmapTest;

use rowmap::{Configuration, Db};
use rowmap_core::Driver;

#[async_trait::async_trait]
pub trait Setup: Send + Sync + 'static {
    /// Opens a database with `fixtures` applied and wraps it in a
    /// [`LoggingDriver`].
    async fn setup(&self, fixtures: &str, config: Configuration) -> (Db, ExecLog) {
        let driver = LoggingDriver::new(self.driver(fixtures).await.unwrap());
        let log = driver.log();
        (Db::new(driver, config).unwrap(), log)
    }

    /// A fresh database with `fixtures` applied.
    async fn driver(&self, fixtures: &str) -> rowmap::Result<Box<dyn Driver>>;
}
