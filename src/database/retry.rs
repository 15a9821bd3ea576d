use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::manager::DatabaseError;

const BACKOFF_STEP_MS: u64 = 50;

/// Run a store operation, retrying transient failures up to `max_retries`
/// extra times with a linear backoff. Non-transient errors return at once.
pub async fn with_retry<T, F, Fut>(
    operation: &str,
    max_retries: u32,
    mut attempt: F,
) -> Result<T, DatabaseError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DatabaseError>>,
{
    let mut tries = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && tries < max_retries => {
                tries += 1;
                warn!(operation, attempt = tries, error = %err, "Transient database failure, retrying");
                tokio::time::sleep(Duration::from_millis(BACKOFF_STEP_MS * tries as u64)).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// `with_retry` for inserts. When a transient failure struck after the
/// server had already committed, the next attempt hits the unique key;
/// `committed` then checks whether the stored row is our own write.
pub async fn with_insert_retry<F, Fut, C, CFut>(
    operation: &str,
    max_retries: u32,
    mut attempt: F,
    committed: C,
) -> Result<(), DatabaseError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), DatabaseError>>,
    C: FnOnce() -> CFut,
    CFut: Future<Output = Result<bool, DatabaseError>>,
{
    let mut tries = 0;
    loop {
        match attempt().await {
            Ok(()) => return Ok(()),
            Err(err) if err.is_transient() && tries < max_retries => {
                tries += 1;
                warn!(operation, attempt = tries, error = %err, "Transient database failure, retrying");
                tokio::time::sleep(Duration::from_millis(BACKOFF_STEP_MS * tries as u64)).await;
            }
            Err(DatabaseError::Duplicate(what)) if tries > 0 => {
                if committed().await? {
                    warn!(operation, "Insert had committed before the retry");
                    return Ok(());
                }
                return Err(DatabaseError::Duplicate(what));
            }
            Err(err) => return Err(err),
        }
    }
}
