//! `/auth/` endpoints.
//!
//! None of these take part in the refresh protocol: a 401 here means bad
//! credentials or a dead refresh token, not an expired access token.

use super::users::User;
use super::{serialize_secret, Message};
use crate::request::{EmptyResponse, Method, Request, RequestData};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Requests

#[derive(Debug, Serialize)]
pub struct Login {
    email: String,
    #[serde(serialize_with = "serialize_secret")]
    password: SecretString,
}

impl Login {
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

impl Request for Login {
    type Data = Self;
    type Response = LoginResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/login/".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Serialize)]
pub struct Register {
    username: String,
    email: String,
    #[serde(serialize_with = "serialize_secret")]
    password: SecretString,
    #[serde(serialize_with = "serialize_secret")]
    confirm_password: SecretString,
}

impl Register {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: SecretString,
        confirm_password: SecretString,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password,
            confirm_password,
        }
    }
}

impl Request for Register {
    type Data = Self;
    type Response = Message;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/register/".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

/// Blacklists the refresh token server-side.
#[derive(Debug, Clone, Serialize)]
pub struct Logout {
    refresh: String,
}

impl Logout {
    pub fn new(refresh: impl Into<String>) -> Self {
        Self {
            refresh: refresh.into(),
        }
    }
}

impl Request for Logout {
    type Data = Self;
    type Response = EmptyResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/logout/".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshToken {
    refresh: String,
}

impl RefreshToken {
    pub fn new(refresh: impl Into<String>) -> Self {
        Self {
            refresh: refresh.into(),
        }
    }
}

impl Request for RefreshToken {
    type Data = Self;
    type Response = RefreshResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/refresh/".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtp {
    email: String,
    otp: String,
}

impl VerifyOtp {
    pub fn new(email: impl Into<String>, otp: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            otp: otp.into(),
        }
    }
}

impl Request for VerifyOtp {
    type Data = Self;
    type Response = Message;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/verify-otp/".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResendOtp {
    email: String,
}

impl ResendOtp {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

impl Request for ResendOtp {
    type Data = Self;
    type Response = Message;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/resend-otp/".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPassword {
    email: String,
}

impl ForgotPassword {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

impl Request for ForgotPassword {
    type Data = Self;
    type Response = Message;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/forgot-password/".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyForgotOtp {
    email: String,
    otp: String,
}

impl VerifyForgotOtp {
    pub fn new(email: impl Into<String>, otp: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            otp: otp.into(),
        }
    }
}

impl Request for VerifyForgotOtp {
    type Data = Self;
    type Response = Message;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/verify-forgot-otp/".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Serialize)]
pub struct ResetPassword {
    email: String,
    otp: String,
    #[serde(serialize_with = "serialize_secret")]
    password: SecretString,
}

impl ResetPassword {
    pub fn new(email: impl Into<String>, otp: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            otp: otp.into(),
            password,
        }
    }
}

impl Request for ResetPassword {
    type Data = Self;
    type Response = Message;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/reset-password/".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

// Responses

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// `refresh` is only present when the backend rotates refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_body_exposes_password_only_on_the_wire() {
        let login = Login::new("ana@example.com", SecretString::from("hunter2"));
        assert_eq!(
            serde_json::to_value(&login).unwrap(),
            json!({"email": "ana@example.com", "password": "hunter2"})
        );
        assert!(!format!("{:?}", login).contains("hunter2"));
    }

    #[test]
    fn test_register_body() {
        let register = Register::new(
            "ana",
            "ana@example.com",
            SecretString::from("pw"),
            SecretString::from("pw"),
        );
        assert_eq!(
            serde_json::to_value(&register).unwrap(),
            json!({
                "username": "ana",
                "email": "ana@example.com",
                "password": "pw",
                "confirm_password": "pw"
            })
        );
    }

    #[test]
    fn test_auth_endpoint_paths() {
        assert_eq!(RefreshToken::new("r").endpoint(), "/auth/refresh/");
        assert_eq!(
            VerifyForgotOtp::new("a", "1").endpoint(),
            "/auth/verify-forgot-otp/"
        );
    }

    #[test]
    fn test_refresh_response_without_rotation() {
        let resp: RefreshResponse = serde_json::from_str(r#"{"access": "a2"}"#).unwrap();
        assert_eq!(resp.access, "a2");
        assert!(resp.refresh.is_none());
    }
}
