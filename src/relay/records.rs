//! Record fetch: paginated custom-object records.
//!
//! Upstream expects `GET /api/customObjects/{objectKey}/records?limit=1000`
//! with a JSON body carrying the continuation token. reqwest's generic
//! `request` builder attaches the body even though the verb is GET.

use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::relay::error::{RelayError, RelayResult};
use crate::relay::payload::non_empty_str;
use crate::relay::{RelayOperation, API_KEY_HEADER};

/// Page size requested from upstream.
pub const PAGE_LIMIT: u32 = 1000;

/// A validated record fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFetch {
    pub api_key: String,
    pub object_key: String,
    pub continuation_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordFetchBody<'a> {
    continuation_token: &'a str,
}

impl RecordFetch {
    /// Extract the fetch from a client payload.
    pub fn from_payload(payload: &Value) -> RelayResult<Self> {
        let (Some(api_key), Some(object_key)) = (
            non_empty_str(payload, "apiKey"),
            non_empty_str(payload, "objectKey"),
        ) else {
            return Err(RelayError::InvalidRequest("apiKey and objectKey are required"));
        };
        // URL normalization drops dot segments, which would change the endpoint.
        if matches!(object_key, "." | "..") {
            return Err(RelayError::InvalidRequest("objectKey must not be '.' or '..'"));
        }

        let continuation_token = payload
            .get("continuationToken")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(Self {
            api_key: api_key.to_string(),
            object_key: object_key.to_string(),
            continuation_token: continuation_token.to_string(),
        })
    }

    /// Upstream URL for `base_url`, with the object key as one encoded segment.
    pub fn endpoint(&self, base_url: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithoutBase)?
            .pop_if_empty()
            .extend(["api", "customObjects", self.object_key.as_str(), "records"]);
        url.set_query(Some(&format!("limit={}", PAGE_LIMIT)));
        Ok(url)
    }
}

impl RelayOperation for RecordFetch {
    fn name(&self) -> &'static str {
        "records"
    }

    fn request(&self, client: &reqwest::Client, base_url: &str) -> Result<RequestBuilder, url::ParseError> {
        let url = self.endpoint(base_url)?;
        Ok(client
            .request(Method::GET, url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(ACCEPT, "application/json")
            .json(&RecordFetchBody {
                continuation_token: &self.continuation_token,
            }))
    }

    /// Only an exact 200 counts.
    fn is_success(&self, status: StatusCode) -> bool {
        status == StatusCode::OK
    }
}
