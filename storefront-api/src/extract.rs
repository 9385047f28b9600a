/// Request extractors with storefront error semantics
///
/// [`ApiJson`] differs from `axum::Json` in two ways:
///
/// - An empty body deserializes as `T::default()`, so a request with no body
///   reaches the handler and missing fields are reported by the handler's
///   own checks (e.g. "missing size") instead of a generic rejection.
/// - Malformed JSON is an [`ApiError::BadRequest`] in the usual error format.
///
/// The `Content-Type` header is not enforced.
///
/// [`ApiQuery`] wraps `axum::extract::Query` so a malformed query string is
/// a JSON [`ApiError::BadRequest`] rather than a plain-text rejection.

use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Lenient JSON request body
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T> ApiJson<T>
where
    T: DeserializeOwned + Default,
{
    /// Parses a raw body
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiJson(T::default()));
        }

        serde_json::from_slice(body)
            .map(ApiJson)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        Self::parse(&body)
    }
}

/// Query string parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {}", e.body_text())))?;

        Ok(ApiQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct SizeBody {
        size: Option<String>,
    }

    #[test]
    fn test_empty_body_is_default() {
        let ApiJson(body) = ApiJson::<SizeBody>::parse(b"").unwrap();
        assert_eq!(body, SizeBody::default());

        let ApiJson(body) = ApiJson::<SizeBody>::parse(b"  \n").unwrap();
        assert_eq!(body.size, None);
    }

    #[test]
    fn test_parses_fields() {
        let ApiJson(body) = ApiJson::<SizeBody>::parse(br#"{"size": "L"}"#).unwrap();
        assert_eq!(body.size.as_deref(), Some("L"));

        let ApiJson(body) = ApiJson::<SizeBody>::parse(b"{}").unwrap();
        assert_eq!(body.size, None);
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        let err = ApiJson::<SizeBody>::parse(b"{size: L").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.starts_with("Invalid JSON body")));

        let err = ApiJson::<SizeBody>::parse(br#"{"size": 5}"#).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_from_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(axum::body::Body::from(r#"{"size":"M"}"#))
            .unwrap();

        let ApiJson(body) = ApiJson::<SizeBody>::from_request(req, &()).await.unwrap();
        assert_eq!(body.size.as_deref(), Some("M"));
    }

    #[derive(Debug, Deserialize)]
    struct FilterQuery {
        filter: Option<String>,
    }

    async fn query(uri: &str) -> Result<ApiQuery<FilterQuery>, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ApiQuery::<FilterQuery>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_query_parses() {
        let ApiQuery(q) = query("/orders?filter=Completed").await.unwrap();
        assert_eq!(q.filter.as_deref(), Some("Completed"));

        let ApiQuery(q) = query("/orders").await.unwrap();
        assert_eq!(q.filter, None);
    }

    #[tokio::test]
    async fn test_duplicate_query_key_is_bad_request() {
        let err = query("/orders?filter=onCart&filter=Completed").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.starts_with("Invalid query string")));
    }
}
