//! Request extractors shared by route handlers.

use axum::{
    extract::{
        FromRequestParts, Path,
        path::ErrorKind,
        rejection::PathRejection,
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Extractor for a numeric record ID in the URL path.
///
/// A segment that does not parse as an ID names no record, so it is
/// answered with 404 like any other unknown ID instead of axum's 400.
/// A route that does not declare the parameter is a wiring bug and stays 500.
///
/// # Example
///
/// ```rust,ignore
/// async fn show(IdPath(id): IdPath<PostId>) -> impl IntoResponse {
///     format!("post {id}")
/// }
/// ```
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(PathRejection::FailedToDeserializePathParams(err))
                if !matches!(
                    err.kind(),
                    ErrorKind::WrongNumberOfParameters { .. } | ErrorKind::UnsupportedType { .. }
                ) =>
            {
                tracing::debug!(error = %err, path = %parts.uri.path(), "Unparseable ID in path");
                Err(AppError::NotFound(parts.uri.path().to_string()))
            }
            Err(rejection) => Err(AppError::Internal(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    use quill_core::PostId;

    use super::*;

    fn app() -> Router {
        Router::new().route(
            "/post/{id}",
            get(|IdPath(id): IdPath<PostId>| async move { id.to_string() }),
        )
    }

    async fn status_of(uri: &str) -> StatusCode {
        app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_numeric_id_is_extracted() {
        let response = app()
            .oneshot(Request::get("/post/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"42");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        assert_eq!(status_of("/post/abc").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("/post/1.5").await, StatusCode::NOT_FOUND);
        assert_eq!(
            status_of("/post/99999999999999999999").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_missing_route_parameter_is_a_server_error() {
        let app = Router::new().route(
            "/posts",
            get(|IdPath(id): IdPath<PostId>| async move { id.to_string() }),
        );
        let response = app
            .oneshot(Request::get("/posts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
