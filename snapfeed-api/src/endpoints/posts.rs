use super::{Page, PostId, UserId};
use crate::error::ApiError;
use crate::request::{EmptyResponse, Method, Request, RequestData};
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Display;
use std::path::Path;

pub const MAX_MEDIA_SIZE: usize = 10 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
pub const ALLOWED_VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/quicktime", "video/mov"];

// Common

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    pub author: Author,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_saved: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Local view of the post after a successful like toggle.
    pub fn toggle_like(&mut self) {
        if self.is_liked {
            self.likes_count = self.likes_count.saturating_sub(1);
        } else {
            self.likes_count += 1;
        }
        self.is_liked = !self.is_liked;
    }

    pub fn toggle_save(&mut self) {
        self.is_saved = !self.is_saved;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    #[default]
    Latest,
    Liked,
    Trending,
}

impl Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Liked => f.write_str("liked"),
            Self::Trending => f.write_str("trending"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Image or video attached to a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Build from a file name, guessing the MIME type from its extension.
    pub fn from_name(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_from_extension(&file_name).to_string();
        Self::new(file_name, mime_type, bytes)
    }

    pub fn kind(&self) -> Option<MediaKind> {
        if ALLOWED_IMAGE_TYPES.contains(&self.mime_type.as_str()) {
            Some(MediaKind::Image)
        } else if ALLOWED_VIDEO_TYPES.contains(&self.mime_type.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<MediaKind, ApiError> {
        if self.bytes.len() > MAX_MEDIA_SIZE {
            return Err(ApiError::InvalidRequest(format!(
                "File size must be less than {}MB",
                MAX_MEDIA_SIZE / (1024 * 1024)
            )));
        }
        self.kind().ok_or_else(|| {
            ApiError::InvalidRequest(
                "File type not supported. Please upload images (JPEG, PNG, GIF, WebP) or videos (MP4, WebM, MOV)"
                    .to_string(),
            )
        })
    }

    fn part(&self) -> Part {
        let part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        match part.mime_str(&self.mime_type) {
            Ok(part) => part,
            Err(_) => Part::bytes(self.bytes.clone()).file_name(self.file_name.clone()),
        }
    }
}

fn mime_from_extension(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        _ => "application/octet-stream",
    }
}

// Requests

/// Only non-default parameters go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListPostsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,
}

#[derive(Default, Debug, Clone)]
pub struct ListPosts {
    query: ListPostsQuery,
}

impl ListPosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.query.sort = (sort != Sort::Latest).then_some(sort);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.query.search = (!search.trim().is_empty()).then_some(search);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.query.page = (page > 1).then_some(page);
        self
    }

    pub fn user(mut self, user: UserId) -> Self {
        self.query.user = Some(user);
        self
    }

    pub fn query(&self) -> &ListPostsQuery {
        &self.query
    }
}

impl Request for ListPosts {
    type Data = ListPostsQuery;
    type Response = Page<Post>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/posts/".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        if self.query == ListPostsQuery::default() {
            RequestData::Empty
        } else {
            RequestData::Query(&self.query)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetPost {
    post_id: PostId,
}

impl GetPost {
    pub fn new(post_id: PostId) -> Self {
        Self { post_id }
    }
}

impl Request for GetPost {
    type Data = ();
    type Response = Post;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/posts/detail/{}/", self.post_id).into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeletePost {
    post_id: PostId,
}

impl DeletePost {
    pub fn new(post_id: PostId) -> Self {
        Self { post_id }
    }
}

impl Request for DeletePost {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/posts/detail/{}/", self.post_id).into()
    }
}

/// Multipart post creation: `content` plus an optional `image` or `video` part.
#[derive(Debug, Clone)]
pub struct CreatePost {
    content: String,
    media: Option<MediaFile>,
}

impl CreatePost {
    /// Fails when there is neither text nor media, or the media is rejected.
    pub fn new(content: impl Into<String>, media: Option<MediaFile>) -> Result<Self, ApiError> {
        let content = content.into();
        if content.trim().is_empty() && media.is_none() {
            return Err(ApiError::InvalidRequest(
                "Please add some content or media to your post".to_string(),
            ));
        }
        if let Some(media) = &media {
            media.validate()?;
        }
        Ok(Self { content, media })
    }

    fn form(&self) -> Form {
        let form = Form::new().text("content", self.content.clone());
        match &self.media {
            Some(media) => match media.kind() {
                Some(MediaKind::Image) => form.part("image", media.part()),
                Some(MediaKind::Video) => form.part("video", media.part()),
                None => form,
            },
            None => form,
        }
    }
}

impl Request for CreatePost {
    type Data = ();
    type Response = Post;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/posts/".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Multipart(self.form())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LikePost {
    post_id: PostId,
}

impl LikePost {
    pub fn new(post_id: PostId) -> Self {
        Self { post_id }
    }
}

impl Request for LikePost {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/posts/{}/like/", self.post_id).into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SavePost {
    post_id: PostId,
}

impl SavePost {
    pub fn new(post_id: PostId) -> Self {
        Self { post_id }
    }
}

impl Request for SavePost {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/posts/{}/save/", self.post_id).into()
    }
}
