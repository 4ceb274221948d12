use rowmap::Sqlite;
use rowmap_core::Driver;

use crate::Setup;

pub struct SetupSqlite;

impl SetupSqlite {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SetupSqlite {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Setup for SetupSqlite {
    async fn driver(&self, fixtures: &str) -> rowmap::Result<Box<dyn Driver>> {
        let sqlite = Sqlite::new("sqlite::memory:")?;
        sqlite.execute_batch(fixtures)?;
        Ok(Box::new(sqlite))
    }
}
