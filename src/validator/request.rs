//! Live confirm call against a running payments API.
use log::*;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::{error::Result, validator::response::HttpResponse};

/// Header carrying the merchant API key.
pub const API_KEY_HEADER: &str = "api-key";

/// Parameters for `POST {base_url}/payments/{payment_id}/confirm`.
#[derive(Debug, Clone)]
pub struct ConfirmRequest {
    pub base_url: String,
    pub payment_id: String,
    pub api_key: SecretString,
    pub payload: Value,
}

impl ConfirmRequest {
    pub fn endpoint(&self) -> Result<Url> {
        let base = Url::parse(self.base_url.trim_end_matches('/'))?;
        let endpoint = format!(
            "{}/payments/{}/confirm",
            base.as_str().trim_end_matches('/'),
            self.payment_id
        );
        Ok(Url::parse(&endpoint)?)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut api_key = HeaderValue::from_str(self.api_key.expose_secret())?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);

        Ok(headers)
    }

    /// Send the request and capture the response. Non-2xx statuses are
    /// returned as responses; only transport failures are errors.
    pub async fn send(&self) -> Result<HttpResponse> {
        let endpoint = self.endpoint()?;

        info!("POST {endpoint}");

        let response = reqwest::Client::new()
            .post(endpoint)
            .headers(self.headers()?)
            .json(&self.payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        debug!("received status {status} with {} byte body", body.len());

        Ok(HttpResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(base_url: &str) -> ConfirmRequest {
        ConfirmRequest {
            base_url: base_url.into(),
            payment_id: "pay_123".into(),
            api_key: SecretString::from("snd_key".to_string()),
            payload: serde_json::json!({"payment_method": "bank_redirect"}),
        }
    }

    #[test]
    fn builds_confirm_endpoint() {
        let url = request("http://localhost:8080").endpoint().unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/payments/pay_123/confirm"
        );

        let url = request("https://sandbox.example.com/api/")
            .endpoint()
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sandbox.example.com/api/payments/pay_123/confirm"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(request("not a url").endpoint().is_err());
    }

    #[test]
    fn marks_api_key_sensitive() {
        let headers = request("http://localhost").headers().unwrap();
        let key = headers.get(API_KEY_HEADER).unwrap();
        assert!(key.is_sensitive());
        assert_eq!(key.to_str().unwrap(), "snd_key");
    }
}
