use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::DomainError;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct Paging {
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

/// Success body: `{success: true, message?, count?, total?, page?, pages?, data?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(flatten)]
    paging: Option<Paging>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            paging: None,
            data: Some(data),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::data(items)
        }
    }

    pub fn page(items: Vec<T>, paging: Paging) -> Self {
        Self {
            paging: Some(paging),
            ..Self::list(items)
        }
    }
}

impl Envelope<()> {
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            data: None,
            ..Self::data(())
        }
        .message(message)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// `Json` whose rejections use the error envelope.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| DomainError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// `Query` whose rejections use the error envelope.
pub struct QueryParams<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| DomainError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// `Path` whose rejections use the error envelope.
pub struct PathParam<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| DomainError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_envelope_carries_counts() {
        let body = serde_json::to_value(Envelope::page(
            vec![1, 2],
            Paging { total: 12, page: 2, pages: 3 },
        ))
        .expect("serialize");

        assert_eq!(
            body,
            json!({ "success": true, "count": 2, "total": 12, "page": 2, "pages": 3, "data": [1, 2] })
        );
    }

    #[test]
    fn done_envelope_has_no_data() {
        let body = serde_json::to_value(Envelope::done("Product deleted successfully"))
            .expect("serialize");
        assert_eq!(body, json!({ "success": true, "message": "Product deleted successfully" }));
    }
}
