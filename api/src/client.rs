//! Smart Entry API client implementation

use crate::error::ApiError;
use crate::session::SessionHandle;
use crate::types::{
    AssignBarcodeRequest, DeassignBarcodeRequest, EntryEvent, EntryHistory, EntryStats,
    ImportSummary, LoginRequest, LoginResponse, MarkEntryRequest, MarkEntryResponse, Participant,
    Venue,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Fallback API host when `SMART_ENTRY_API_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Typed client for the Smart Entry conference API
///
/// Cheap to clone: clones share the underlying connection pool and the
/// [`SessionHandle`]. The bearer token is attached to every request when
/// the handle holds one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionHandle,
}

impl ApiClient {
    /// Create a client against an explicit base URL
    ///
    /// Trailing slashes on the base URL are stripped so path joining is
    /// uniform.
    #[must_use]
    pub fn new(base_url: impl Into<String>, session: SessionHandle) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http: Client::new(),
            base_url,
            session,
        }
    }

    /// Create a client with the base URL from `SMART_ENTRY_API_URL`,
    /// falling back to [`DEFAULT_BASE_URL`]
    #[must_use]
    pub fn from_env(session: SessionHandle) -> Self {
        let base_url = std::env::var("SMART_ENTRY_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, session)
    }

    /// The session handle this client reads its bearer token from
    #[must_use]
    pub const fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// The configured base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ═══════════════════════════════════════════════════════════════════
    // Auth
    // ═══════════════════════════════════════════════════════════════════

    /// Log in with an email or staff id and a password
    ///
    /// The returned token is NOT stored automatically; the session
    /// workflow decides when to store it (and when to persist it).
    ///
    /// # Errors
    ///
    /// Rejected credentials surface as [`ApiError::Unauthorized`].
    #[tracing::instrument(skip(self, password))]
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.post_json(
            "/auth/login",
            &LoginRequest {
                identifier: identifier.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    // ═══════════════════════════════════════════════════════════════════
    // Participants
    // ═══════════════════════════════════════════════════════════════════

    /// Search participants by email, name, reference number, mobile
    /// number, or barcode
    ///
    /// Results come back in server order; the client imposes no sort.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] on any non-success response.
    #[tracing::instrument(skip(self))]
    pub async fn search_participants(&self, query: &str) -> Result<Vec<Participant>, ApiError> {
        let response = self
            .send(
                self.http
                    .get(self.url("/participants/search"))
                    .query(&[("query", query)]),
            )
            .await?;
        Self::decode(response).await
    }

    /// Fetch the full participant roster
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] on any non-success response.
    pub async fn list_participants(&self) -> Result<Vec<Participant>, ApiError> {
        self.get_json("/participants").await
    }

    /// Upload a participant roster spreadsheet (multipart)
    ///
    /// The file goes up under the `file` form field; parsing happens
    /// server-side and the summary is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] on any non-success response.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_roster(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportSummary, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .send(
                self.http
                    .post(self.url("/participants/upload-excel"))
                    .multipart(form),
            )
            .await?;
        Self::decode(response).await
    }

    /// Assign a badge barcode to a participant
    ///
    /// # Errors
    ///
    /// A duplicate barcode surfaces as [`ApiError::Conflict`]; the server
    /// is the sole authority on uniqueness.
    #[tracing::instrument(skip(self))]
    pub async fn assign_barcode(
        &self,
        email: &str,
        barcode: &str,
    ) -> Result<Participant, ApiError> {
        self.post_json(
            "/participants/assign-barcode",
            &AssignBarcodeRequest {
                email: email.to_string(),
                barcode: barcode.to_string(),
            },
        )
        .await
    }

    /// Remove a participant's badge barcode
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] on any non-success response.
    #[tracing::instrument(skip(self))]
    pub async fn deassign_barcode(&self, email: &str) -> Result<Participant, ApiError> {
        self.post_json(
            "/participants/deassign-barcode",
            &DeassignBarcodeRequest {
                email: email.to_string(),
            },
        )
        .await
    }

    // ═══════════════════════════════════════════════════════════════════
    // Entries
    // ═══════════════════════════════════════════════════════════════════

    /// Record an attendance event for a barcode at a venue
    ///
    /// # Errors
    ///
    /// An unknown or unassigned barcode surfaces as [`ApiError::Conflict`].
    #[tracing::instrument(skip(self))]
    pub async fn mark_entry(
        &self,
        barcode: &str,
        venue: Venue,
    ) -> Result<MarkEntryResponse, ApiError> {
        self.post_json(
            "/entries/mark",
            &MarkEntryRequest {
                barcode: barcode.to_string(),
                venue,
            },
        )
        .await
    }

    /// Fetch the most recent entries for a barcode
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] on any non-success response.
    #[tracing::instrument(skip(self))]
    pub async fn entry_history(&self, barcode: &str) -> Result<EntryHistory, ApiError> {
        self.get_json(&format!("/entries/{barcode}")).await
    }

    /// Fetch every recorded entry event
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] on any non-success response.
    pub async fn all_entries(&self) -> Result<Vec<EntryEvent>, ApiError> {
        self.get_json("/entries/all").await
    }

    /// Fetch aggregate entry statistics
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] on any non-success response.
    pub async fn entry_stats(&self) -> Result<EntryStats, ApiError> {
        self.get_json("/entries/stats").await
    }

    // ═══════════════════════════════════════════════════════════════════
    // Request plumbing
    // ═══════════════════════════════════════════════════════════════════

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the bearer token (when present) and dispatch the request
    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let builder = match self.session.bearer().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.http.get(self.url(path))).await?;
        Self::decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.http.post(self.url(path)).json(body)).await?;
        Self::decode(response).await
    }

    /// Map a response onto the error taxonomy and decode success bodies
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            return serde_json::from_str(&text)
                .map_err(|e| ApiError::ResponseParseFailed(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
            StatusCode::CONFLICT => ApiError::Conflict {
                message: extract_error_message(&body),
            },
            _ => ApiError::RequestFailed {
                status: status.as_u16(),
                message: extract_error_message(&body),
            },
        })
    }
}

/// Pull a human-readable message out of an error payload
///
/// The server reports errors as `{"error": …}` or `{"message": …}`; plain
/// text bodies are passed through and empty bodies get a generic message.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let message = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .or_else(|| value.get("message").and_then(serde_json::Value::as_str));
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped_from_base_url() {
        let client = ApiClient::new("http://localhost:4000///", SessionHandle::new());
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert_eq!(client.url("/participants"), "http://localhost:4000/participants");
    }

    #[test]
    fn error_message_extracted_from_error_field() {
        assert_eq!(
            extract_error_message(r#"{"error":"Barcode already assigned"}"#),
            "Barcode already assigned"
        );
    }

    #[test]
    fn error_message_extracted_from_message_field() {
        assert_eq!(
            extract_error_message(r#"{"message":"No participant for barcode"}"#),
            "No participant for barcode"
        );
    }

    #[test]
    fn plain_text_error_body_passes_through() {
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn empty_error_body_gets_generic_message() {
        assert_eq!(extract_error_message(""), "Request failed");
        assert_eq!(extract_error_message("   "), "Request failed");
    }
}
