//! Shared ureq agent setup and the retry loop every backend call runs through.

use std::io::{self, Read};
use std::time::Duration;

/// Connect phase cap, so a dead host fails long before the request deadline.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How many times a failed call is repeated and how long to wait in between.
///
/// The wait before retry `n` (1-based) is `base_delay * 2^(n-1)`, so the
/// default two retries wait 1s and then 2s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: usize,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: usize, base_delay: Duration) -> Self {
        Self {
            retries,
            base_delay,
        }
    }

    /// First try plus retries.
    pub fn max_attempts(&self) -> usize {
        self.retries + 1
    }

    pub fn delay_before_retry(&self, retry: usize) -> Duration {
        let shift = u32::try_from(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        let factor = 1u32.checked_shl(shift).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `call` until it succeeds, `retryable` rejects the error, or the
    /// attempts run out. `call` receives the 1-based attempt number and
    /// `wait` performs the backoff sleep.
    pub fn run<T, E>(
        &self,
        mut call: impl FnMut(usize) -> Result<T, E>,
        mut retryable: impl FnMut(&E) -> bool,
        mut wait: impl FnMut(Duration),
    ) -> Result<T, E> {
        let mut attempt = 1;
        loop {
            let err = match call(attempt) {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if attempt >= self.max_attempts() || !retryable(&err) {
                return Err(err);
            }
            let delay = self.delay_before_retry(attempt);
            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Backing off");
            wait(delay);
            attempt += 1;
        }
    }
}

/// Agent with a whole-request deadline of `timeout`.
pub fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .build()
}

/// Read a response body, refusing anything larger than `limit` bytes.
pub(crate) fn read_body(response: ureq::Response, limit: usize) -> io::Result<Vec<u8>> {
    let declared = response
        .header("Content-Length")
        .and_then(|value| value.parse::<u64>().ok());
    if let Some(length) = declared
        && length > limit as u64
    {
        return Err(too_large(length));
    }
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut bytes)?;
    if bytes.len() > limit {
        return Err(too_large(bytes.len() as u64));
    }
    Ok(bytes)
}

fn too_large(length: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Response body too large ({length} bytes)"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn oversized_declared_length_is_rejected() {
        let url = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nok".to_string());
        let response = build_agent(Duration::from_secs(5)).get(&url).call().unwrap();
        let err = read_body(response, 10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn small_body_is_returned() {
        let url = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 11\r\n\r\n{\"ok\":true}".to_string());
        let response = build_agent(Duration::from_secs(5)).get(&url).call().unwrap();
        assert_eq!(read_body(response, 64).unwrap(), b"{\"ok\":true}");
    }

    #[test]
    fn default_policy_waits_one_then_two_seconds() {
        let policy = RetryPolicy::new(2, Duration::from_secs(1));
        let mut seen = Vec::new();
        let mut slept = Vec::new();
        let result: Result<(), &str> = policy.run(
            |attempt| {
                seen.push(attempt);
                Err("down")
            },
            |_| true,
            |delay| slept.push(delay),
        );
        assert_eq!(result, Err("down"));
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(slept, vec![Duration::from_secs(1), Duration::from_secs(2)]);
    }

    #[test]
    fn success_stops_the_loop() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let result: Result<usize, &str> = policy.run(
            |attempt| if attempt < 3 { Err("flaky") } else { Ok(attempt) },
            |_| true,
            |_| {},
        );
        assert_eq!(result, Ok(3));
    }

    #[test]
    fn non_retryable_error_returns_immediately() {
        let policy = RetryPolicy::new(2, Duration::from_secs(1));
        let mut calls = 0;
        let mut slept = Vec::new();
        let result: Result<(), &str> = policy.run(
            |_| {
                calls += 1;
                Err("unauthorized")
            },
            |_| false,
            |delay| slept.push(delay),
        );
        assert_eq!(result, Err("unauthorized"));
        assert_eq!(calls, 1);
        assert!(slept.is_empty());
    }

    #[test]
    fn delay_doubles_per_retry() {
        let policy = RetryPolicy::new(4, Duration::from_millis(250));
        let delays: Vec<_> = (1..=4).map(|n| policy.delay_before_retry(n)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(2),
            ]
        );
    }
}
