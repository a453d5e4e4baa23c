use crate::error::{CoreError, Result};
use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Per-request timeout applied by [`default_client`].
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// How many times to try a remote source and how long to wait in between.
/// The wait doubles after every failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_tries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_tries: 3,
            initial_backoff: Duration::from_millis(1000),
        }
    }
}

pub fn default_client() -> Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// GET `url` and return the body as text, retrying on transport errors,
/// non-200 statuses and empty bodies.
///
/// The error of the final attempt is returned once every try fails.
pub async fn fetch_text(client: &Client, url: &str, policy: RetryPolicy) -> Result<String> {
    let max_tries = policy.max_tries.max(1);
    let mut backoff = policy.initial_backoff;
    let mut last_error = CoreError::BadResponse(format!("no attempt made for {}", url));

    for attempt in 1..=max_tries {
        match client.get(url).send().await {
            Ok(response) => {
                if response.status() != StatusCode::OK {
                    warn!(
                        "Attempt {}/{}: Bad response status for {}: {}",
                        attempt,
                        max_tries,
                        url,
                        response.status()
                    );
                    last_error = CoreError::BadResponse(format!("status {}", response.status()));
                } else {
                    match response.text().await {
                        Ok(body) => {
                            if body.trim().is_empty() {
                                warn!("Attempt {}/{}: Empty response for {}", attempt, max_tries, url);
                                last_error = CoreError::BadResponse("empty body".to_string());
                            } else {
                                return Ok(body);
                            }
                        }
                        Err(e) => {
                            warn!(
                                "Attempt {}/{}: Failed to read response body for {}: {}",
                                attempt, max_tries, url, e
                            );
                            last_error = CoreError::HttpRequest(e);
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Attempt {}/{}: Request failed for {}: {}", attempt, max_tries, url, e);
                last_error = CoreError::HttpRequest(e);
            }
        }

        if attempt < max_tries {
            info!(
                "Sleeping for {} milliseconds before retry for {}",
                backoff.as_millis(),
                url
            );
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }
    }

    warn!("All attempts failed for {}", url);
    Err(last_error)
}
