//! Request extractors that run the schema validator at the HTTP boundary,
//! so handlers receive typed values and never see a rejected payload.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::db::models::SearchParams;
use crate::db::schema::{self, Shaped};

/// JSON body checked against `T::SHAPE` before it is decoded.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Shaped + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        Ok(Self(schema::validate::<T>(value)?))
    }
}

/// The integer `{user_id}` path segment.
pub struct UserIdPath(pub i64);

impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(Self(schema::parse_integer_param("user_id", &raw)?))
    }
}

#[derive(Debug, Deserialize)]
struct RawSearchParams {
    #[serde(default, rename = "sortBy", alias = "sort_by")]
    sort_by: Option<String>,
    #[serde(default)]
    order: Option<String>,
}

/// `sortBy` and `order` query parameters with `sortBy` parsed into [`SortBy`].
///
/// [`SortBy`]: crate::db::models::SortBy
pub struct SearchQueryParams(pub SearchParams);

impl<S> FromRequestParts<S> for SearchQueryParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawSearchParams>::from_request_parts(parts, state).await?;
        let sort_by = schema::parse_sort_by(raw.sort_by.as_deref())?;
        Ok(Self(SearchParams {
            sort_by,
            order: raw.order,
        }))
    }
}
