use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, warn};

/// Run `f` as a single unit of work
///
/// Every statement `f` issues on the supplied connection commits together when it returns
/// `Ok`, or is rolled back when it returns `Err`. The original error is returned unchanged;
/// a failed rollback is only logged. The connection goes back to the pool on every path,
/// including when the future is dropped mid-flight (sqlx rolls back an unfinished
/// transaction on drop).
///
/// ```ignore
/// run_in_transaction(&pool, |conn| {
///     Box::pin(async move {
///         sqlx::query("DELETE FROM t WHERE owner = $1").bind(7).execute(&mut *conn).await?;
///         sqlx::query("INSERT INTO t (owner) VALUES ($1)").bind(7).execute(&mut *conn).await?;
///         Ok::<_, sqlx::Error>(())
///     })
/// })
/// .await?;
/// ```
pub async fn run_in_transaction<T, E, F>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>> + Send,
    E: From<sqlx::Error>,
{
    let mut tx = pool.begin().await?;

    match f(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Transaction rollback failed");
            } else {
                debug!("Transaction rolled back");
            }
            Err(err)
        }
    }
}
