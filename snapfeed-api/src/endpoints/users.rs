use super::posts::Post;
use super::{Page, UserId};
use crate::request::{EmptyResponse, Method, Request};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub posts_count: u64,
    #[serde(default)]
    pub is_following: Option<bool>,
}

impl UserProfile {
    /// Local view of the profile after a successful follow toggle.
    pub fn toggle_following(&mut self) {
        let following = self.is_following.unwrap_or(false);
        self.followers_count = if following {
            self.followers_count.saturating_sub(1)
        } else {
            self.followers_count + 1
        };
        self.is_following = Some(!following);
    }
}

// Requests

/// Profile of the signed-in user.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetProfile;

impl Request for GetProfile {
    type Data = ();
    type Response = User;

    fn endpoint(&self) -> Cow<'_, str> {
        "/users/profile/".into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetUserProfile {
    user_id: UserId,
}

impl GetUserProfile {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl Request for GetUserProfile {
    type Data = ();
    type Response = UserProfile;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/users/{}/profile/", self.user_id).into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ToggleFollow {
    user_id: UserId,
}

impl ToggleFollow {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl Request for ToggleFollow {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/users/{}/follow-toggle/", self.user_id).into()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListSavedPosts;

impl Request for ListSavedPosts {
    type Data = ();
    type Response = Page<Post>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/users/saved/".into()
    }
}
