//! External URL probing with retry, backoff and per-host rate limiting.

use log::debug;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, Url};
use tokio::time::{Duration, sleep};

use std::error::Error as StdError;

use crate::config::Config;
use crate::core::constants::{defaults, error_messages, http_status};
use crate::core::error::Result;
use crate::core::types::{Outcome, ValidationStatus};
use crate::validation::rate_limiter::RateLimiter;
use crate::validation::truncate_detail;

/// What one attempt decided.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// Terminal outcome, no further attempts.
    Done(Outcome),
    /// Transient failure. The outcome is used once the attempt budget runs out.
    Retry(Outcome),
}

/// The parts of a response the classification needs.
#[derive(Debug)]
struct Probe {
    status: u16,
    final_url: Url,
    location: Option<String>,
}

impl Probe {
    fn from_response(response: &Response) -> Self {
        let final_url = response.url().clone();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                final_url
                    .join(value)
                    .map(|resolved| resolved.to_string())
                    .unwrap_or_else(|_| value.to_string())
            });

        Self {
            status: response.status().as_u16(),
            final_url,
            location,
        }
    }
}

#[derive(Debug)]
pub struct ExternalChecker {
    client: Client,
    limiter: RateLimiter,
    retry_attempts: u8,
    backoff_base: Duration,
}

impl ExternalChecker {
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        let client = Client::builder()
            .timeout(config.timeout_duration())
            .redirect(Policy::limited(defaults::MAX_REDIRECTS))
            .user_agent(user_agent)
            .pool_max_idle_per_host(config.concurrency().min(20))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        let limiter = RateLimiter::new(config.rate_limit_delay_duration());
        debug!(
            "External checks: {} attempt(s), {}ms between requests per host",
            config.retry_attempts(),
            limiter.delay().as_millis()
        );

        Ok(Self {
            client,
            limiter,
            retry_attempts: config.retry_attempts(),
            backoff_base: config.backoff_base_duration(),
        })
    }

    /// Probe `url` until a terminal outcome or until the attempt budget is spent.
    pub async fn check(&self, url: &str) -> Outcome {
        for attempt in 0..self.retry_attempts {
            self.limiter.acquire(url).await;

            let step = match self.probe(url).await {
                Ok(probe) => classify_response(url, &probe),
                Err(err) => classify_transport(&err),
            };

            match step {
                Step::Done(outcome) => return outcome,
                Step::Retry(outcome) => {
                    if attempt + 1 >= self.retry_attempts {
                        return outcome;
                    }
                    let delay = self.backoff(attempt);
                    debug!(
                        "{url}: {} on attempt {}, retrying in {}ms",
                        outcome.message,
                        attempt + 1,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                }
            }
        }

        Outcome::new(ValidationStatus::Error, "Max retries exceeded")
    }

    /// `backoff_base * 2^attempt`, zero-based.
    fn backoff(&self, attempt: u8) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(u32::from(attempt)))
    }

    /// HEAD first; a server rejecting HEAD gets one GET whose body is never read.
    async fn probe(&self, url: &str) -> reqwest::Result<Probe> {
        let response = self.client.head(url).send().await?;
        if response.status().as_u16() != http_status::METHOD_NOT_ALLOWED {
            return Ok(Probe::from_response(&response));
        }

        debug!("{url}: HEAD not allowed, falling back to GET");
        let response = self.client.get(url).send().await?;
        Ok(Probe::from_response(&response))
    }
}

fn classify_response(url: &str, probe: &Probe) -> Step {
    let code = probe.status;
    let redirected = Url::parse(url).map_or(true, |requested| requested != probe.final_url);

    match code {
        200..=299 => Step::Done(
            Outcome::new(ValidationStatus::Ok, "OK")
                .with_code(code)
                .with_redirect(redirected.then(|| probe.final_url.to_string())),
        ),
        300..=399 => {
            let target = probe
                .location
                .clone()
                .unwrap_or_else(|| probe.final_url.to_string());
            Step::Done(
                Outcome::new(ValidationStatus::Redirect, format!("Redirect to {target}"))
                    .with_code(code)
                    .with_redirect(Some(target)),
            )
        }
        // Many hosts block automated probes while the page works in a browser
        http_status::FORBIDDEN => Step::Done(
            Outcome::new(ValidationStatus::Ok, "Access restricted (may be valid)").with_code(code),
        ),
        http_status::TOO_MANY_REQUESTS => {
            Step::Retry(Outcome::new(ValidationStatus::Error, "Rate limited").with_code(code))
        }
        400..=499 => Step::Done(
            Outcome::new(ValidationStatus::Broken, format!("Client error: {code}")).with_code(code),
        ),
        _ => Step::Retry(
            Outcome::new(ValidationStatus::Error, format!("Server error: {code}")).with_code(code),
        ),
    }
}

fn classify_transport(err: &reqwest::Error) -> Step {
    let detail = truncate_detail(&describe(err));

    if err.is_redirect() {
        Step::Done(Outcome::new(ValidationStatus::Error, "Too many redirects"))
    } else if is_tls_error(err) {
        Step::Done(Outcome::new(
            ValidationStatus::Error,
            format!("SSL error: {detail}"),
        ))
    } else if err.is_timeout() {
        Step::Retry(Outcome::new(ValidationStatus::Timeout, "Connection timed out"))
    } else if err.is_connect() {
        Step::Retry(Outcome::new(
            ValidationStatus::Broken,
            format!("Connection failed: {detail}"),
        ))
    } else {
        Step::Done(Outcome::new(ValidationStatus::Error, format!("Error: {detail}")))
    }
}

/// The innermost cause of `err`, which names the actual failure.
fn describe(err: &reqwest::Error) -> String {
    let mut source: &dyn std::error::Error = err;
    while let Some(inner) = source.source() {
        source = inner;
    }

    let description = source.to_string();
    if description.is_empty() {
        error_messages::UNKNOWN_ERROR.to_string()
    } else {
        description
    }
}

/// The top-level message embeds the URL, so only the causes are inspected.
fn is_tls_error(err: &reqwest::Error) -> bool {
    let mut current = std::error::Error::source(err);
    while let Some(error) = current {
        if is_tls_cause(error) {
            return true;
        }
        current = error.source();
    }
    false
}

/// A `rustls` error, directly or wrapped in the I/O error the connector
/// reports. Messages naming TLS are accepted when no typed error is present.
fn is_tls_cause(error: &(dyn StdError + 'static)) -> bool {
    if error.downcast_ref::<rustls::Error>().is_some() {
        return true;
    }
    let wrapped = error
        .downcast_ref::<std::io::Error>()
        .and_then(std::io::Error::get_ref)
        .is_some_and(|inner| inner.downcast_ref::<rustls::Error>().is_some());
    if wrapped {
        return true;
    }

    let text = error.to_string().to_lowercase();
    error_messages::TLS_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}
