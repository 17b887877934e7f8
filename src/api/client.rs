use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{MailError, MailResult};

use super::labels;
use super::messages;
use super::models::{FetchFailure, Label, Message, QueryOutcome};

const GMAIL_API_BASE_URL: &str = "https://gmail.googleapis.com";

#[derive(Debug, Clone)]
pub struct GmailClient {
    http: Client,
    base_url: String,
}

impl GmailClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            base_url: GMAIL_API_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    pub fn get_msg(&self, id: &str, access_token: &str) -> MailResult<Message> {
        let endpoint = messages::message_endpoint(id);
        let query = messages::get_query();
        self.get_json(&endpoint, access_token, Some(&query))
    }

    /// Runs a mailbox search (same syntax as the Gmail search box, e.g.
    /// `"in:sent after:2017/01/01"`) and fetches every hit in full.
    pub fn search(&self, query: &str, access_token: &str) -> MailResult<QueryOutcome> {
        let params = messages::search_query(query);
        self.list_and_fetch(&params, access_token)
    }

    /// Fetches up to `limit` of the most recent messages in full.
    pub fn list(&self, limit: u32, access_token: &str) -> MailResult<QueryOutcome> {
        let params = messages::list_query(limit);
        self.list_and_fetch(&params, access_token)
    }

    // The list endpoint only returns id stubs, so every message costs a
    // second round trip. Fetches are sequential; a failed one is logged
    // and recorded in the outcome instead of aborting the batch.
    fn list_and_fetch(
        &self,
        params: &[(String, String)],
        access_token: &str,
    ) -> MailResult<QueryOutcome> {
        let list: GmailMessageListResource =
            self.get_json(messages::list_endpoint(), access_token, Some(params))?;

        let mut outcome = QueryOutcome::default();
        for entry in list.messages.unwrap_or_default() {
            match self.get_msg(&entry.id, access_token) {
                Ok(message) => outcome.messages.push(message),
                Err(error) => {
                    log::warn!("dropping message {}: {error}", entry.id);
                    outcome.failures.push(FetchFailure {
                        id: entry.id,
                        error,
                    });
                }
            }
        }

        Ok(outcome)
    }

    pub fn get_label(&self, id: &str, access_token: &str) -> MailResult<Label> {
        let endpoint = labels::label_endpoint(id);
        self.get_json(&endpoint, access_token, None)
    }

    pub fn list_labels(&self, access_token: &str) -> MailResult<Vec<Label>> {
        let endpoint = labels::list_labels_endpoint();
        let response: GmailLabelListResource = self.get_json(endpoint, access_token, None)?;
        let mut labels_out = response.labels.unwrap_or_default();
        labels_out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(labels_out)
    }

    /// Sum of unread messages and unread threads for the given label
    /// id. Unknown labels surface as an api error.
    pub fn unread_count(&self, label_id: &str, access_token: &str) -> MailResult<i64> {
        let label = self.get_label(label_id, access_token)?;
        Ok(label.unread_total())
    }

    pub fn unread(&self, access_token: &str) -> MailResult<i64> {
        self.unread_count("UNREAD", access_token)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        access_token: &str,
        query: Option<&[(String, String)]>,
    ) -> MailResult<T> {
        let url = self.endpoint_url(endpoint)?;
        let mut request = self.http.get(url).bearer_auth(access_token);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send()?;
        self.parse_json_response(response)
    }

    fn endpoint_url(&self, endpoint: &str) -> MailResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.set_path(endpoint.trim_start_matches('/'));
        Ok(url)
    }

    fn parse_json_response<T: DeserializeOwned>(&self, response: Response) -> MailResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json()?);
        }

        let body = response.text().unwrap_or_default();
        Err(map_api_error(status, &body))
    }
}

impl Default for GmailClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct GmailMessageListResource {
    messages: Option<Vec<GmailMessageListEntry>>,
}

#[derive(Debug, Deserialize)]
struct GmailMessageListEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GmailLabelListResource {
    labels: Option<Vec<Label>>,
}

#[derive(Debug, Deserialize)]
struct GmailApiErrorEnvelope {
    error: GmailApiError,
}

#[derive(Debug, Deserialize)]
struct GmailApiError {
    code: Option<u16>,
    status: Option<String>,
    message: Option<String>,
    errors: Option<Vec<GmailApiErrorDetail>>,
}

#[derive(Debug, Deserialize)]
struct GmailApiErrorDetail {
    reason: Option<String>,
}

fn map_api_error(status: StatusCode, body: &str) -> MailError {
    let message = parse_api_error_message(body).unwrap_or_else(|| {
        let body = body.trim();
        if body.is_empty() {
            "no error details in response body".to_string()
        } else {
            body.to_string()
        }
    });

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return MailError::Auth(format!(
            "gmail api authorization failed ({status}): {message}"
        ));
    }

    MailError::Api(format!("gmail api request failed ({status}): {message}"))
}

fn parse_api_error_message(body: &str) -> Option<String> {
    let envelope = serde_json::from_str::<GmailApiErrorEnvelope>(body).ok()?;
    let mut parts = Vec::new();

    if let Some(message) = envelope.error.message {
        parts.push(message);
    }

    if let Some(status) = envelope.error.status {
        parts.push(format!("status={status}"));
    }

    if let Some(code) = envelope.error.code {
        parts.push(format!("code={code}"));
    }

    if let Some(reason) = envelope
        .error
        .errors
        .and_then(|errors| errors.into_iter().find_map(|detail| detail.reason))
    {
        parts.push(format!("reason={reason}"));
    }

    if parts.is_empty() {
        return None;
    }

    Some(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_unauthorized_as_auth_error() {
        let error = map_api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"code":401,"message":"Request had invalid authentication credentials.","status":"UNAUTHENTICATED"}}"#,
        );

        match error {
            MailError::Auth(message) => {
                assert!(message.contains("invalid authentication credentials"));
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn maps_unknown_label_as_api_error() {
        let error = map_api_error(
            StatusCode::NOT_FOUND,
            r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#,
        );

        match error {
            MailError::Api(message) => {
                assert!(message.contains("Requested entity was not found"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn falls_back_to_raw_body_for_non_json_errors() {
        let error = map_api_error(StatusCode::BAD_GATEWAY, "upstream exploded");

        match error {
            MailError::Api(message) => assert!(message.contains("upstream exploded")),
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn parses_list_resource_stubs() {
        let list: GmailMessageListResource = serde_json::from_str(
            r#"{"messages":[{"id":"a1","threadId":"t1"},{"id":"b2","threadId":"t2"}],"resultSizeEstimate":2}"#,
        )
        .expect("list json");

        let ids: Vec<String> = list
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.id)
            .collect();
        assert_eq!(ids, ["a1", "b2"]);
    }

    #[test]
    fn joins_endpoint_paths_against_base_url() {
        let client = GmailClient::with_base_url("http://localhost:8080");
        let url = client
            .endpoint_url("/gmail/v1/users/me/labels")
            .expect("endpoint url");

        assert_eq!(url.as_str(), "http://localhost:8080/gmail/v1/users/me/labels");
    }
}
