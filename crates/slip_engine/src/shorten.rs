use std::time::Duration;

use rand::Rng;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use slip_logging::{slip_debug, slip_info};

use crate::{FailureKind, ShortenError};

/// Public YOURLS endpoint of the hosted form.
pub const DEFAULT_ENDPOINT: &str = "https://uplatimi.online/na/yourls-api.php";

const KEYWORD_CHARACTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone)]
pub struct ShortenSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ShortenSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Turns a long share URL into a short link.
#[async_trait::async_trait]
pub trait LinkShortener: Send + Sync {
    async fn shorten(&self, long_url: &str) -> Result<String, ShortenError>;
}

/// Client for the YOURLS `shorturl` action.
#[derive(Debug, Clone)]
pub struct YourlsShortener {
    settings: ShortenSettings,
}

#[derive(Debug, Deserialize)]
struct ShortUrlResponse {
    shorturl: Option<String>,
}

impl YourlsShortener {
    pub fn new(settings: ShortenSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ShortenError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| ShortenError::new(FailureKind::Network, err.to_string()))
    }
}

/// Form body for a `shorturl` request.
pub fn request_body(keyword: &str, long_url: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("action", "shorturl")
        .append_pair("format", "json")
        .append_pair("keyword", keyword)
        .append_pair("url", long_url)
        .finish()
}

#[async_trait::async_trait]
impl LinkShortener for YourlsShortener {
    async fn shorten(&self, long_url: &str) -> Result<String, ShortenError> {
        let endpoint = reqwest::Url::parse(&self.settings.endpoint)
            .map_err(|err| ShortenError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;
        let keyword = generate_keyword();
        slip_debug!("Requesting short link with keyword {}", keyword);

        let response = client
            .post(endpoint)
            .header(
                CONTENT_TYPE,
                "application/x-www-form-urlencoded;charset=UTF-8",
            )
            .body(request_body(&keyword, long_url))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShortenError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let parsed: ShortUrlResponse = serde_json::from_slice(&body)
            .map_err(|err| ShortenError::new(FailureKind::MalformedResponse, err.to_string()))?;
        match parsed.shorturl {
            Some(link) if !link.trim().is_empty() => {
                slip_info!("Short link created: {}", link);
                Ok(link)
            }
            _ => Err(ShortenError::new(
                FailureKind::MalformedResponse,
                "response has no shorturl",
            )),
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ShortenError {
    if err.is_timeout() {
        return ShortenError::new(FailureKind::Timeout, err.to_string());
    }
    ShortenError::new(FailureKind::Network, err.to_string())
}

/// A probably-unique keyword built from the current time. Not a secret.
pub fn generate_keyword() -> String {
    keyword_from_timestamp(
        chrono::Utc::now().timestamp_millis(),
        &mut rand::thread_rng(),
    )
}

/// Insert a random letter before every even-indexed digit of `millis`.
pub fn keyword_from_timestamp(millis: i64, rng: &mut impl Rng) -> String {
    let digits = millis.to_string();
    let mut keyword = String::with_capacity(digits.len() * 3 / 2 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index % 2 == 0 {
            let pick = rng.gen_range(0..KEYWORD_CHARACTERS.len());
            keyword.push(char::from(KEYWORD_CHARACTERS[pick]));
        }
        keyword.push(digit);
    }
    keyword
}
