//! Notification read-state handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use jobportal_core::notification::{
    self,
    model::{Notification, NotificationList},
};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<NotificationList>> {
    let list = notification::list_notifications(&state.db, &identity).await?;
    Ok(Json(list))
}

pub async fn unread_count(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<Value>> {
    let count = notification::unread_count(&state.db, &identity).await?;
    Ok(Json(json!({ "unreadCount": count })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Notification>> {
    let updated = notification::mark_read(&state.db, &identity, &id).await?;
    Ok(Json(updated))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<Value>> {
    let updated = notification::mark_all_read(&state.db, &identity).await?;
    Ok(Json(json!({ "updated": updated })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{bearer, call, test_app, TEST_SECRET};
    use axum::http::{Method, StatusCode};
    use jobportal_core::auth::issue_token;
    use jobportal_core::{Identity, Role};
    use serde_json::json;

    async fn seed(app: &axum::Router, recipient: &str, kind: &str, message: &str) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/internal/notifications",
            None,
            Some(json!({ "recipient": recipient, "type": kind, "message": message })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let (app, _) = test_app();
        let (status, body) = call(&app, Method::GET, "/notifications", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Authentication required");

        let (status, _) = call(&app, Method::PUT, "/notifications/read-all", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_fetch_mark_all_fetch() {
        let (app, _) = test_app();
        let token = bearer("u123", Role::Candidate);
        let first = seed(&app, "u123", "SYSTEM", "Welcome").await;
        seed(&app, "u123", "JOB_ALERT", "A job matches").await;
        seed(&app, "u123", "SYSTEM", "Profile tip").await;

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/notifications/{}/read", first),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&app, Method::GET, "/notifications", Some(&token), None).await;
        assert_eq!(body["notifications"].as_array().unwrap().len(), 3);
        assert_eq!(body["unreadCount"], 2);

        let (status, body) = call(&app, Method::PUT, "/notifications/read-all", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updated"], 2);

        let (_, body) = call(&app, Method::GET, "/notifications", Some(&token), None).await;
        assert_eq!(body["unreadCount"], 0);
        let list = body["notifications"].as_array().unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.iter().all(|n| n["isRead"] == true));

        let (_, body) = call(&app, Method::GET, "/notifications/unread-count", Some(&token), None).await;
        assert_eq!(body["unreadCount"], 0);
    }

    #[tokio::test]
    async fn test_foreign_and_missing_ids_look_the_same() {
        let (app, _) = test_app();
        let theirs = seed(&app, "u456", "JOB_ALERT", "Not yours").await;
        let token = bearer("u123", Role::Candidate);

        let (foreign_status, foreign_body) = call(
            &app,
            Method::PUT,
            &format!("/notifications/{}/read", theirs),
            Some(&token),
            None,
        )
        .await;
        let (missing_status, missing_body) = call(
            &app,
            Method::PUT,
            "/notifications/does-not-exist/read",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(foreign_status, StatusCode::NOT_FOUND);
        assert_eq!(missing_status, StatusCode::NOT_FOUND);
        assert_eq!(foreign_body, missing_body);

        let owner = bearer("u456", Role::Candidate);
        let (_, body) = call(&app, Method::GET, "/notifications", Some(&owner), None).await;
        assert_eq!(body["unreadCount"], 1);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let (app, _) = test_app();
        let id = seed(&app, "u123", "NEW_APPLICATION", "New applicant").await;
        let token = bearer("u123", Role::Employer);
        let uri = format!("/notifications/{}/read", id);

        let (s1, b1) = call(&app, Method::PUT, &uri, Some(&token), None).await;
        let (s2, b2) = call(&app, Method::PUT, &uri, Some(&token), None).await;
        assert_eq!((s1, s2), (StatusCode::OK, StatusCode::OK));
        assert_eq!(b1["isRead"], true);
        assert_eq!(b1["readAt"], b2["readAt"]);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (app, _) = test_app();
        let identity = Identity::new("u123", Role::Candidate).unwrap();
        let token = issue_token(TEST_SECRET, &identity, chrono::Duration::hours(-1)).unwrap();
        let (status, _) = call(&app, Method::GET, "/notifications", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
