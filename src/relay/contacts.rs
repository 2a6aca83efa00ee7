//! Contact-list submission.

use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::relay::error::{RelayError, RelayResult};
use crate::relay::payload::{array, non_empty_str};
use crate::relay::{RelayOperation, API_KEY_HEADER};

/// A validated contact-list submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactListSubmit {
    pub api_key: String,
    pub group_list_name: String,
    pub user_profile_ids: Vec<Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactListBody<'a> {
    group_list_name: &'a str,
    user_profile_ids: &'a [Value],
}

impl ContactListSubmit {
    /// Extract the submission from a client payload.
    pub fn from_payload(payload: &Value) -> RelayResult<Self> {
        let (Some(api_key), Some(group_list_name), Some(user_profile_ids)) = (
            non_empty_str(payload, "apiKey"),
            non_empty_str(payload, "groupListName"),
            array(payload, "userProfileIds"),
        ) else {
            return Err(RelayError::InvalidRequest(
                "apiKey, groupListName and userProfileIds (array) are required",
            ));
        };

        Ok(Self {
            api_key: api_key.to_string(),
            group_list_name: group_list_name.to_string(),
            user_profile_ids: user_profile_ids.clone(),
        })
    }

    /// Upstream URL for `base_url`.
    pub fn endpoint(&self, base_url: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithoutBase)?
            .pop_if_empty()
            .extend(["api", "contact", "list"]);
        Ok(url)
    }
}

impl RelayOperation for ContactListSubmit {
    fn name(&self) -> &'static str {
        "contact_list"
    }

    fn request(&self, client: &reqwest::Client, base_url: &str) -> Result<RequestBuilder, url::ParseError> {
        let url = self.endpoint(base_url)?;
        Ok(client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(ACCEPT, "application/json")
            .json(&ContactListBody {
                group_list_name: &self.group_list_name,
                user_profile_ids: &self.user_profile_ids,
            }))
    }

    /// Any 2xx counts, unlike record fetch.
    fn is_success(&self, status: StatusCode) -> bool {
        status.is_success()
    }
}
