// src/core/net.rs
use std::{
    fs,
    path::Path,
    thread,
    time::Duration,
};

use thiserror::Error;

use crate::code::ErrorCode;
use crate::config::consts::{DOWNLOAD_PAUSE_MS, HTTP_TIMEOUT_SECS, TRIAL_INTERVAL_SECS, TRIAL_NUM};

#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered, but not with 2xx.
    #[error("HTTP error: {status} {url}")]
    Status { url: String, status: u16 },

    /// No usable answer (DNS, connect, TLS, timeout, body read).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

/// Source of remote bytes. `HttpClient` in production, fakes in tests.
pub trait Fetch {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let bytes = self.get_bytes(url)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, FetchError> {
        let inner = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(concat!("badge_scrape/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport { url: s!(), message: e.to_string() })?;
        Ok(Self { inner })
    }
}

impl Fetch for HttpClient {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: s!(url),
            message: e.to_string(),
        };

        let resp = self.inner.get(url).send().map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: s!(url), status: status.as_u16() });
        }
        Ok(resp.bytes().map_err(transport)?.to_vec())
    }
}

/// True when a GET on `url` succeeds.
pub fn check_url(fetch: &dyn Fetch, url: &str) -> bool {
    fetch.get_bytes(url).is_ok()
}

/// Fetch `url` into `dst`.
///
/// `Cancel` when `dst` exists and `overwrite` is off, `Argument` when the
/// server rejected the request, `Http` when it could not be reached, `File`
/// when the bytes could not be written.
pub fn download_file(fetch: &dyn Fetch, url: &str, dst: &Path, overwrite: bool) -> ErrorCode {
    if !overwrite && dst.is_file() {
        return ErrorCode::Cancel;
    }

    let bytes = match fetch.get_bytes(url) {
        Ok(b) => b,
        Err(e @ FetchError::Status { .. }) => {
            loge!("{e}\n{url}");
            return ErrorCode::Argument;
        }
        Err(e @ FetchError::Transport { .. }) => {
            loge!("{e}\n{url}");
            return ErrorCode::Http;
        }
    };

    if let Err(e) = fs::write(dst, bytes) {
        loge!("Failed to write {}: {e}", dst.display());
        return ErrorCode::File;
    }
    thread::sleep(Duration::from_millis(DOWNLOAD_PAUSE_MS));
    ErrorCode::Success
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: TRIAL_NUM,
            interval: Duration::from_secs(TRIAL_INTERVAL_SECS),
        }
    }
}

/// Download, then keep retrying while `dst` does not exist.
///
/// The first retry happens whatever the first error was; after that a
/// rejected request (`Argument`) stops the loop. An existing `dst` with
/// `overwrite` off counts as done.
pub fn download_and_check_file(
    fetch: &dyn Fetch,
    url: &str,
    dst: &Path,
    overwrite: bool,
    policy: RetryPolicy,
) -> bool {
    if download_file(fetch, url, dst, overwrite) == ErrorCode::Cancel {
        return true;
    }

    for i in 0..policy.attempts {
        if dst.is_file() {
            return true;
        }
        loge!(
            "Download failed, retrying in {} seconds ( {} Fail )",
            policy.interval.as_secs(),
            i + 1
        );
        thread::sleep(policy.interval);
        if download_file(fetch, url, dst, overwrite) == ErrorCode::Argument {
            return false;
        }
    }
    dst.is_file()
}


#[cfg(test)]
mod tests {
    use super::fake::{FakeFetch, Reply};
    use super::*;

    const URL: &str = "https://example.test/a.png";

    fn fast(attempts: u32) -> RetryPolicy {
        RetryPolicy { attempts, interval: Duration::ZERO }
    }

    #[test]
    fn download_maps_failures_to_codes() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("a.png");

        let rejected = FakeFetch::default().on(URL, Reply::Status(404));
        assert_eq!(download_file(&rejected, URL, &dst, true), ErrorCode::Argument);

        let down = FakeFetch::default().on(URL, Reply::Down);
        assert_eq!(download_file(&down, URL, &dst, true), ErrorCode::Http);

        let bad_dst = dir.path().join("missing_dir").join("a.png");
        let ok = FakeFetch::default().on(URL, Reply::Body(b"png".to_vec()));
        assert_eq!(download_file(&ok, URL, &bad_dst, true), ErrorCode::File);
        assert!(!dst.exists());
    }

    #[test]
    fn download_respects_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("a.png");
        fs::write(&dst, b"old").unwrap();

        let fetch = FakeFetch::default().on(URL, Reply::Body(b"new".to_vec()));
        assert_eq!(download_file(&fetch, URL, &dst, false), ErrorCode::Cancel);
        assert!(fetch.calls.borrow().is_empty());
        assert_eq!(fs::read(&dst).unwrap(), b"old");

        assert_eq!(download_file(&fetch, URL, &dst, true), ErrorCode::Success);
        assert_eq!(fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn retry_recovers_after_transport_errors() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("a.png");
        let fetch = FakeFetch::default()
            .on(URL, Reply::Down)
            .on(URL, Reply::Down)
            .on(URL, Reply::Body(b"png".to_vec()));

        assert!(download_and_check_file(&fetch, URL, &dst, true, fast(5)));
        assert_eq!(fetch.calls.borrow().len(), 3);
        assert_eq!(fs::read(&dst).unwrap(), b"png");
    }

    #[test]
    fn retry_stops_on_rejected_request() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("a.png");
        let fetch = FakeFetch::default().on(URL, Reply::Status(404));

        assert!(!download_and_check_file(&fetch, URL, &dst, true, fast(10)));
        // first attempt, then one retry that is allowed to fail with any code
        assert_eq!(fetch.calls.borrow().len(), 2);
    }

    #[test]
    fn retry_gives_up_after_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("a.png");
        let fetch = FakeFetch::default().on(URL, Reply::Down);

        assert!(!download_and_check_file(&fetch, URL, &dst, true, fast(3)));
        assert_eq!(fetch.calls.borrow().len(), 4);
    }

    #[test]
    fn existing_file_without_overwrite_is_done() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("a.png");
        fs::write(&dst, b"old").unwrap();
        let fetch = FakeFetch::default();
        assert!(download_and_check_file(&fetch, URL, &dst, false, fast(3)));
    }

    #[test]
    fn check_url_is_plain_success() {
        let fetch = FakeFetch::default()
            .on(URL, Reply::Body(Vec::new()))
            .on("https://example.test/gone", Reply::Status(410));
        assert!(check_url(&fetch, URL));
        assert!(!check_url(&fetch, "https://example.test/gone"));
    }
}
