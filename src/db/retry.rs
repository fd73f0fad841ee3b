//! Connection retry and error reporting shared by the server backends.

use crate::config::ConnectionConfig;
use crate::error::GlanceError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of connection retry attempts.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay between retry attempts (doubles each retry).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Runs `attempt` until it succeeds, fails permanently, or runs out of tries.
pub(crate) async fn connect_with_retry<P, F, Fut>(
    config: &ConnectionConfig,
    mut attempt: F,
) -> Result<P, GlanceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<P, sqlx::Error>>,
{
    let mut last_error = None;
    let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);

    for n in 1..=MAX_RETRY_ATTEMPTS {
        debug!("Connection attempt {} of {}", n, MAX_RETRY_ATTEMPTS);

        match attempt().await {
            Ok(pool) => {
                debug!("Successfully connected to database");
                return Ok(pool);
            }
            Err(e) => {
                let is_transient = is_transient_error(&e);
                last_error = Some(e);

                if n < MAX_RETRY_ATTEMPTS && is_transient {
                    warn!(
                        "Connection attempt {} failed (transient error), retrying in {:?}",
                        n, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                } else {
                    break;
                }
            }
        }
    }

    match last_error {
        Some(error) => Err(map_connection_error(error, config)),
        None => Err(GlanceError::connection("No connection attempt was made")),
    }
}

/// Refused connections and timeouts are worth another attempt; bad
/// credentials or a missing database are not.
pub(crate) fn is_transient_error(error: &sqlx::Error) -> bool {
    if matches!(error, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) {
        return true;
    }
    let message = error.to_string().to_lowercase();
    ["connection refused", "timed out", "temporarily unavailable", "connection reset"]
        .iter()
        .any(|needle| message.contains(needle))
}

/// Turns a failed connect into a message naming the endpoint.
pub(crate) fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> GlanceError {
    let endpoint = format!(
        "{}:{}",
        config.host.as_deref().unwrap_or("localhost"),
        config.port()
    );
    let message = error.to_string().to_lowercase();

    let reason = if message.contains("authentication failed") || message.contains("access denied")
    {
        format!(
            "authentication failed for user '{}'",
            config.user.as_deref().unwrap_or("unknown")
        )
    } else if (message.contains("does not exist") && message.contains("database"))
        || message.contains("unknown database")
    {
        format!(
            "database '{}' does not exist",
            config.database.as_deref().unwrap_or("unknown")
        )
    } else if is_transient_error(&error) {
        format!("server unreachable ({error})")
    } else {
        error.to_string()
    };

    GlanceError::connection(format!("{endpoint}: {reason}"))
}
