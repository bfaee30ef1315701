use crate::endpoints::{
    PostId, UserId,
    auth::{
        ForgotPassword, Login, Logout, RefreshToken, Register, ResendOtp, ResetPassword,
        VerifyForgotOtp, VerifyOtp,
    },
    posts::{CreatePost, DeletePost, GetPost, LikePost, ListPosts, MediaFile, SavePost},
    users::{GetProfile, GetUserProfile, ListSavedPosts, ToggleFollow},
};
use crate::error::ApiError;
use secrecy::SecretString;

pub struct AuthRepository;

impl AuthRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn login(&self, email: impl Into<String>, password: SecretString) -> Login {
        Login::new(email, password)
    }

    pub fn register(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
        password: SecretString,
        confirm_password: SecretString,
    ) -> Register {
        Register::new(username, email, password, confirm_password)
    }

    pub fn logout(&self, refresh_token: impl Into<String>) -> Logout {
        Logout::new(refresh_token)
    }

    pub fn refresh(&self, refresh_token: impl Into<String>) -> RefreshToken {
        RefreshToken::new(refresh_token)
    }

    pub fn verify_otp(&self, email: impl Into<String>, otp: impl Into<String>) -> VerifyOtp {
        VerifyOtp::new(email, otp)
    }

    pub fn resend_otp(&self, email: impl Into<String>) -> ResendOtp {
        ResendOtp::new(email)
    }

    pub fn forgot_password(&self, email: impl Into<String>) -> ForgotPassword {
        ForgotPassword::new(email)
    }

    pub fn verify_forgot_otp(
        &self,
        email: impl Into<String>,
        otp: impl Into<String>,
    ) -> VerifyForgotOtp {
        VerifyForgotOtp::new(email, otp)
    }

    pub fn reset_password(
        &self,
        email: impl Into<String>,
        otp: impl Into<String>,
        password: SecretString,
    ) -> ResetPassword {
        ResetPassword::new(email, otp, password)
    }
}

pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self {}
    }

    /// The signed-in user.
    pub fn me(&self) -> GetProfile {
        GetProfile
    }

    pub fn profile(&self, user_id: UserId) -> GetUserProfile {
        GetUserProfile::new(user_id)
    }

    pub fn toggle_follow(&self, user_id: UserId) -> ToggleFollow {
        ToggleFollow::new(user_id)
    }

    pub fn saved(&self) -> ListSavedPosts {
        ListSavedPosts
    }
}

pub struct PostRepository;

impl PostRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn list(&self) -> ListPosts {
        ListPosts::new()
    }

    /// Posts authored by one user, as shown on their profile.
    pub fn by_user(&self, user_id: UserId) -> ListPosts {
        ListPosts::new().user(user_id)
    }

    pub fn get(&self, post_id: PostId) -> GetPost {
        GetPost::new(post_id)
    }

    pub fn delete(&self, post_id: PostId) -> DeletePost {
        DeletePost::new(post_id)
    }

    pub fn create(
        &self,
        content: impl Into<String>,
        media: Option<MediaFile>,
    ) -> Result<CreatePost, ApiError> {
        CreatePost::new(content, media)
    }

    pub fn like(&self, post_id: PostId) -> LikePost {
        LikePost::new(post_id)
    }

    pub fn save(&self, post_id: PostId) -> SavePost {
        SavePost::new(post_id)
    }
}
