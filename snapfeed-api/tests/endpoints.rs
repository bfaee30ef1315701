use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use mockito::{Matcher, Server};
use snapfeed_api::endpoints::posts::{MediaFile, Sort};
use snapfeed_api::store::ACCESS_TOKEN_KEY;
use snapfeed_api::{
    ApiError, Client, ClientConfig, HandlerError, MemoryStorage, Request, SessionHandler,
    TokenStorage,
};

const POST_JSON: &str = r#"{
    "id": 11,
    "content": "first light",
    "image": null,
    "author": {"id": 3, "username": "ana", "profile_picture": null},
    "likes_count": 2,
    "comments_count": 1,
    "is_liked": false,
    "is_saved": true,
    "created_at": "2024-05-01T10:00:00Z"
}"#;

struct RotatingHandler {
    storage: Arc<MemoryStorage>,
}

impl SessionHandler for RotatingHandler {
    fn refresh_access_token(&self) -> BoxFuture<'_, Result<String, HandlerError>> {
        async move {
            self.storage.set(ACCESS_TOKEN_KEY, "fresh")?;
            Ok("fresh".to_string())
        }
        .boxed()
    }

    fn logout(&self) -> BoxFuture<'_, ()> {
        async move {
            let _ = self.storage.clear();
        }
        .boxed()
    }
}

#[tokio::test]
async fn test_list_posts_sends_only_non_default_params() {
    let mut server = Server::new_async().await;
    let storage = Arc::new(MemoryStorage::with_session("token", "refresh"));
    let client = Client::new(ClientConfig::new(server.url()), storage).unwrap();

    let mock = server
        .mock("GET", "/posts/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sort".into(), "trending".into()),
            Matcher::UrlEncoded("search".into(), "sunset".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(format!(
            r#"{{"count": 30, "next": "{}/posts/?page=3", "previous": null, "results": [{}]}}"#,
            server.url(),
            POST_JSON
        ))
        .expect(1)
        .create_async()
        .await;

    let page = client
        .send(
            Request::posts()
                .list()
                .sort(Sort::Trending)
                .search("sunset")
                .page(2),
        )
        .await
        .unwrap();

    assert!(page.has_more());
    assert_eq!(page.results()[0].author.username, "ana");
    assert!(page.results()[0].is_saved);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_profile_posts_and_saved_lists() {
    let mut server = Server::new_async().await;
    let storage = Arc::new(MemoryStorage::with_session("token", "refresh"));
    let client = Client::new(ClientConfig::new(server.url()), storage).unwrap();

    let by_user = server
        .mock("GET", "/posts/")
        .match_query(Matcher::UrlEncoded("user".into(), "3".into()))
        .with_status(200)
        .with_body(format!("[{}]", POST_JSON))
        .expect(1)
        .create_async()
        .await;
    let saved = server
        .mock("GET", "/users/saved/")
        .with_status(200)
        .with_body(format!(r#"{{"results": [{}]}}"#, POST_JSON))
        .expect(1)
        .create_async()
        .await;

    let posts = client.send(Request::posts().by_user(3)).await.unwrap();
    let saved_posts = client.send(Request::users().saved()).await.unwrap();

    assert_eq!(posts.into_results().len(), 1);
    assert_eq!(saved_posts.results()[0].id, 11);
    by_user.assert_async().await;
    saved.assert_async().await;
}

#[tokio::test]
async fn test_create_post_multipart_is_rebuilt_after_refresh() {
    let mut server = Server::new_async().await;
    let storage = Arc::new(MemoryStorage::with_session("expired", "refresh"));
    let client = Client::new(ClientConfig::new(server.url()), storage.clone()).unwrap();
    let handler: Arc<dyn SessionHandler> = Arc::new(RotatingHandler {
        storage: storage.clone(),
    });
    client.register_session_handler(Arc::downgrade(&handler));

    let rejected = server
        .mock("POST", "/posts/")
        .match_header("authorization", "Bearer expired")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let created = server
        .mock("POST", "/posts/")
        .match_header("authorization", "Bearer fresh")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::Regex(r#"name="image"; filename="cat.png""#.into()))
        .with_status(201)
        .with_body(POST_JSON)
        .expect(1)
        .create_async()
        .await;

    let request = Request::posts()
        .create("first light", Some(MediaFile::from_name("cat.png", b"png-bytes".to_vec())))
        .unwrap();
    let post = client.send(request).await.unwrap();

    assert_eq!(post.id, 11);
    rejected.assert_async().await;
    created.assert_async().await;
}

#[tokio::test]
async fn test_mutations_and_profile_lookup() {
    let mut server = Server::new_async().await;
    let storage = Arc::new(MemoryStorage::with_session("token", "refresh"));
    let client = Client::new(ClientConfig::new(server.url()), storage).unwrap();

    let like = server
        .mock("POST", "/posts/11/like/")
        .with_status(200)
        .with_body(r#"{"liked": true}"#)
        .expect(1)
        .create_async()
        .await;
    let save = server
        .mock("POST", "/posts/11/save/")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/posts/detail/11/")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let follow = server
        .mock("POST", "/users/3/follow-toggle/")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let profile = server
        .mock("GET", "/users/3/profile/")
        .with_status(200)
        .with_body(
            r#"{"id": 3, "username": "ana", "email": "ana@example.com",
                "followers_count": 5, "following_count": 1, "posts_count": 7,
                "is_following": false}"#,
        )
        .expect(1)
        .create_async()
        .await;

    client.send(Request::posts().like(11)).await.unwrap();
    client.send(Request::posts().save(11)).await.unwrap();
    client.send(Request::posts().delete(11)).await.unwrap();
    client.send(Request::users().toggle_follow(3)).await.unwrap();
    let mut user = client.send(Request::users().profile(3)).await.unwrap();
    user.toggle_following();

    assert_eq!(user.posts_count, 7);
    assert_eq!(user.followers_count, 6);
    for mock in [like, save, delete, follow, profile] {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_not_found_surfaces_detail() {
    let mut server = Server::new_async().await;
    let storage = Arc::new(MemoryStorage::with_session("token", "refresh"));
    let client = Client::new(ClientConfig::new(server.url()), storage).unwrap();

    let _missing = server
        .mock("GET", "/posts/detail/404/")
        .with_status(404)
        .with_body(r#"{"detail": "No Post matches the given query."}"#)
        .create_async()
        .await;

    let err = client.send(Request::posts().get(404)).await.unwrap_err();

    assert!(matches!(err, ApiError::Client { .. }));
    assert_eq!(err.detail(), Some("No Post matches the given query."));
}
