//! # Response Envelope
//!
//! The success envelope every endpoint shares:
//! `{ "success": true, "data": ..., "meta"?: {...} }` for payloads,
//! `{ "success": true, "message": "..." }` for acknowledgements.
//! Failures are rendered by [`crate::error::ApiError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use aisle_db::Page;

/// Pagination metadata attached to listing responses.
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub current_page: u32,
    pub per_page: u32,
    pub total: i64,
    pub last_page: u32,
}

impl<T> From<&Page<T>> for Meta {
    fn from(page: &Page<T>) -> Self {
        Meta {
            current_page: page.current_page,
            per_page: page.per_page,
            total: page.total,
            last_page: page.last_page,
        }
    }
}

/// The standard success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success with a data payload.
    pub fn data(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
            meta: None,
            status: StatusCode::OK,
        }
    }

    /// Success with a data payload and a message.
    pub fn data_with_message(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            meta: None,
            status: StatusCode::OK,
        }
    }

    /// Marks the response as 201 Created.
    pub fn created(mut self) -> Self {
        self.status = StatusCode::CREATED;
        self
    }

    /// Attaches pagination metadata.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl ApiResponse<()> {
    /// Success with only a message (acknowledgements, informational
    /// outcomes like "coupon already applied").
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: None,
            message: Some(message.into()),
            meta: None,
            status: StatusCode::OK,
        }
    }
}

/// Builds a listing response from a repository page.
pub fn paginated<T: Serialize>(page: Page<T>) -> ApiResponse<Vec<T>> {
    let meta = Meta::from(&page);
    ApiResponse::data(page.items).with_meta(meta)
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let response = ApiResponse::data(vec![1, 2, 3]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("message").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn test_paginated_meta() {
        let page = Page::new(vec!["a", "b"], 5, 2, 2);
        let response = paginated(page);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["meta"]["current_page"], 2);
        assert_eq!(json["meta"]["total"], 5);
        assert_eq!(json["meta"]["last_page"], 3);
    }

    #[test]
    fn test_message_only() {
        let response = ApiResponse::message("Coupon applied successfully");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Coupon applied successfully");
        assert!(json.get("data").is_none());
    }
}
