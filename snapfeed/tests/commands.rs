use std::io::Write;
use std::sync::Arc;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use snapfeed::cli::{Command, SortArg};
use snapfeed::commands::execute;
use snapfeed_api::{Client, ClientConfig, MemoryStorage, TokenStorage};
use snapfeed_auth::Session;

const USER_JSON: &str = r#"{
    "id": 7,
    "username": "ana",
    "email": "ana@example.com",
    "profile_picture": null,
    "followers_count": 3,
    "following_count": 4
}"#;

const POST_JSON: &str = r#"{
    "id": 11,
    "content": "first light",
    "image": null,
    "author": {"id": 7, "username": "ana", "profile_picture": null},
    "likes_count": 3,
    "comments_count": 0,
    "is_liked": true,
    "is_saved": false,
    "created_at": "2024-05-01T10:00:00Z"
}"#;

async fn signed_in() -> (ServerGuard, Arc<MemoryStorage>, Arc<Session>) {
    let server = Server::new_async().await;
    let storage = Arc::new(MemoryStorage::with_session("access-1", "refresh-1"));
    let client = Arc::new(Client::new(ClientConfig::new(server.url()), storage.clone()).unwrap());
    (server, storage, Session::new(client))
}

#[tokio::test]
async fn test_health_reports_base_url_and_status() {
    let (mut server, _storage, session) = signed_in().await;
    let _health = server
        .mock("GET", "/health/")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let output = execute(Command::Health, &session).await.unwrap();

    assert_eq!(output["online"], json!(true));
    assert_eq!(output["base_url"], json!(server.url()));
}

#[tokio::test]
async fn test_feed_passes_filters_through() {
    let (mut server, _storage, session) = signed_in().await;
    let feed = server
        .mock("GET", "/posts/")
        .match_header("authorization", "Bearer access-1")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sort".into(), "liked".into()),
            Matcher::UrlEncoded("user".into(), "7".into()),
        ]))
        .with_status(200)
        .with_body(format!("[{}]", POST_JSON))
        .expect(1)
        .create_async()
        .await;

    let output = execute(
        Command::Feed {
            sort: SortArg::Liked,
            search: None,
            page: 1,
            user: Some(7),
        },
        &session,
    )
    .await
    .unwrap();

    assert_eq!(output[0]["id"], json!(11));
    feed.assert_async().await;
}

#[tokio::test]
async fn test_like_returns_the_updated_post() {
    let (mut server, _storage, session) = signed_in().await;
    let like = server
        .mock("POST", "/posts/11/like/")
        .with_status(200)
        .with_body(r#"{"liked": true}"#)
        .expect(1)
        .create_async()
        .await;
    let _post = server
        .mock("GET", "/posts/detail/11/")
        .with_status(200)
        .with_body(POST_JSON)
        .create_async()
        .await;

    let output = execute(Command::Like { id: 11 }, &session).await.unwrap();

    assert_eq!(output["is_liked"], json!(true));
    like.assert_async().await;
}

#[tokio::test]
async fn test_delete_reports_the_id() {
    let (mut server, _storage, session) = signed_in().await;
    let _delete = server
        .mock("DELETE", "/posts/detail/11/")
        .with_status(204)
        .create_async()
        .await;

    let output = execute(Command::Delete { id: 11 }, &session).await.unwrap();

    assert_eq!(output, json!({ "deleted": 11 }));
}

#[tokio::test]
async fn test_create_uploads_media_from_disk() {
    let (mut server, _storage, session) = signed_in().await;
    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(b"PNG fake").unwrap();

    let create = server
        .mock("POST", "/posts/")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data".into()),
        )
        .match_body(Matcher::Regex(r#"name="image""#.into()))
        .with_status(201)
        .with_body(POST_JSON)
        .expect(1)
        .create_async()
        .await;

    execute(
        Command::Create {
            content: "first light".into(),
            media: Some(file.path().to_path_buf()),
        },
        &session,
    )
    .await
    .unwrap();

    create.assert_async().await;
}

#[tokio::test]
async fn test_create_rejects_unsupported_media_before_sending() {
    let (mut server, _storage, session) = signed_in().await;
    let mut file = tempfile::Builder::new().suffix(".exe").tempfile().unwrap();
    file.write_all(b"MZ").unwrap();

    let create = server
        .mock("POST", "/posts/")
        .expect(0)
        .create_async()
        .await;

    let result = execute(
        Command::Create {
            content: "hello".into(),
            media: Some(file.path().to_path_buf()),
        },
        &session,
    )
    .await;

    assert!(result.is_err());
    create.assert_async().await;
}

#[tokio::test]
async fn test_whoami_without_session_fails() {
    let server = Server::new_async().await;
    let client = Arc::new(
        Client::new(ClientConfig::new(server.url()), Arc::new(MemoryStorage::new())).unwrap(),
    );
    let session = Session::new(client);

    let err = execute(Command::Whoami, &session).await.unwrap_err();

    assert_eq!(err.to_string(), "Not logged in");
}

#[tokio::test]
async fn test_whoami_restores_the_user() {
    let (mut server, _storage, session) = signed_in().await;
    let _profile = server
        .mock("GET", "/users/profile/")
        .with_status(200)
        .with_body(USER_JSON)
        .create_async()
        .await;

    let output = execute(Command::Whoami, &session).await.unwrap();

    assert_eq!(output["username"], json!("ana"));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_storage() {
    let (mut server, storage, session) = signed_in().await;
    let _logout = server
        .mock("POST", "/auth/logout/")
        .match_body(Matcher::Json(json!({ "refresh": "refresh-1" })))
        .with_status(205)
        .create_async()
        .await;

    let output = execute(Command::Logout, &session).await.unwrap();

    assert_eq!(output, json!({ "logged_out": true }));
    assert!(storage.access_token().is_none());
    assert!(storage.refresh_token().is_none());
}
