use crate::request::{EmptyResponse, Request};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, Default)]
pub struct HealthCheck;

impl Request for HealthCheck {
    type Data = ();
    type Response = EmptyResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/health/".into()
    }
}
