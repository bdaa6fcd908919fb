use sqlx::PgPool;

/// Runs queries against the deposit ledger database.
///
/// Every query is a plain struct with a `kanau::processor::Processor` impl on
/// this type, so the SQL for a lookup sits next to the row type it returns.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trip a trivial query, used by readiness checks.
    #[tracing::instrument(skip_all, err, name = "SQL:Ping")]
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
