use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::extract::{SearchQueryParams, UserIdPath, ValidatedJson};
use crate::api::server::AppState;
use crate::db::models::{Profile, SearchQuery, User};
use crate::directory::operations;

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    UserIdPath(user_id): UserIdPath,
) -> Json<Option<User>> {
    Json(operations::get_user(&state.store, user_id).await)
}

pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    UserIdPath(user_id): UserIdPath,
) -> Json<Option<Profile>> {
    Json(operations::get_user_profile(&state.store, user_id).await)
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(user): ValidatedJson<User>,
) -> (StatusCode, Json<User>) {
    let user = operations::create_user(&state.store, user).await;
    (StatusCode::CREATED, Json(user))
}

pub async fn search_users_submit(
    State(state): State<Arc<AppState>>,
    Path(user_type): Path<String>,
    SearchQueryParams(params): SearchQueryParams,
    ValidatedJson(query): ValidatedJson<SearchQuery>,
) -> Result<Json<Option<User>>, ApiError> {
    let user = operations::search_users_submit(&state.store, &user_type, &query, &params).await?;
    Ok(Json(user))
}

pub async fn search_users_do_thing(
    State(state): State<Arc<AppState>>,
    Path(user_type): Path<String>,
    SearchQueryParams(params): SearchQueryParams,
    ValidatedJson(query): ValidatedJson<SearchQuery>,
) -> Json<Option<User>> {
    Json(operations::search_users_do_thing(&state.store, &user_type, &query, &params).await)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::server::{router, AppState};
    use crate::db::repo::UserStore;

    fn app() -> (Router, UserStore) {
        let store = UserStore::seeded();
        let state = Arc::new(AppState {
            store: store.clone(),
        });
        (router(state), store)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn foo_user() -> Value {
        json!({
            "id": 99,
            "username": "foo",
            "email": "foo@email.com",
            "level": 3,
            "profile": {"name": "Foo Bar", "age": 22}
        })
    }

    #[tokio::test]
    async fn test_get_seeded_users() {
        let (app, _) = app();

        let (status, body) = send(&app, Method::GET, "/users/99", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, foo_user());

        let (status, body) = send(&app, Method::GET, "/users/88", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"id": 88, "username": "bar", "email": "bar@email.com", "level": 4})
        );
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_null() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/users/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_non_integer_user_id_is_validation_failure() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/users/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");
    }

    #[tokio::test]
    async fn test_get_user_profile() {
        let (app, _) = app();

        let (status, body) = send(&app, Method::GET, "/users/profile/99", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"name": "Foo Bar", "age": 22}));

        let (status, body) = send(&app, Method::GET, "/users/profile/88", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (app, store) = app();
        let user = json!({"id": 1, "username": "x", "email": "x@e.com", "level": 1});

        let (status, body) = send(&app, Method::POST, "/users", Some(user.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, user);
        assert_eq!(store.len().await, 3);

        let (status, body) = send(&app, Method::GET, "/users/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user);
    }

    #[tokio::test]
    async fn test_create_missing_email_leaves_store_unchanged() {
        let (app, store) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({"id": 1, "username": "x", "level": 1})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");
        assert_eq!(body["message"], "missing required field `email`");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_create_partial_profile_leaves_store_unchanged() {
        let (app, store) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({
                "id": 1,
                "username": "x",
                "email": "x@e.com",
                "level": 1,
                "profile": {"name": "X"}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");
        assert_eq!(store.len().await, 2);
        assert!(store.find_by_id(1).await.is_none());
    }

    #[tokio::test]
    async fn test_create_malformed_json() {
        let (app, store) = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/users")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_search_submit_finds_by_username() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/users/search/admin/submit?sortBy=name",
            Some(json!({"name": "foo", "age": 0})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, foo_user());
    }

    #[tokio::test]
    async fn test_search_submit_accepts_snake_case_sort_by() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/users/search/admin/submit?sort_by=email&order=desc",
            Some(json!({"name": "bar", "age": 99})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 88);
    }

    #[tokio::test]
    async fn test_search_submit_non_admin_is_precondition_failure() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/users/search/guest/submit?sortBy=name",
            Some(json!({"name": "foo", "age": 0})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "precondition");
    }

    #[tokio::test]
    async fn test_search_submit_without_sort_by_is_precondition_failure() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/users/search/admin/submit",
            Some(json!({"name": "foo", "age": 0})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "query parameter `sortBy` is required");
    }

    #[tokio::test]
    async fn test_search_submit_invalid_sort_by_is_validation_failure() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/users/search/admin/submit?sortBy=age",
            Some(json!({"name": "foo", "age": 0})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");
    }

    #[tokio::test]
    async fn test_search_submit_requires_full_body() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/users/search/admin/submit?sortBy=name",
            Some(json!({"name": "foo"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "missing required field `age`");
    }

    #[tokio::test]
    async fn test_search_do_thing_returns_first_record() {
        let (app, _) = app();

        for uri in [
            "/users/search/guest/do_thing",
            "/users/search/admin/do_thing?sortBy=email",
            "/users/search/anything/do_thing?order=%25%25garbage%21",
        ] {
            let (status, body) =
                send(&app, Method::POST, uri, Some(json!({"name": "nobody", "age": -1}))).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, foo_user(), "{uri}");
        }
    }
}
