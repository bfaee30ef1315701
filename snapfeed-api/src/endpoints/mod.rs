pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

pub type UserId = u64;
pub type PostId = u64;

/// List payload. Paginated endpoints answer with an envelope, others with a
/// bare array; both decode here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    List(Vec<T>),
}

impl<T> Page<T> {
    pub fn results(&self) -> &[T] {
        match self {
            Page::Paginated { results, .. } => results,
            Page::List(items) => items,
        }
    }

    pub fn into_results(self) -> Vec<T> {
        match self {
            Page::Paginated { results, .. } => results,
            Page::List(items) => items,
        }
    }

    pub fn has_more(&self) -> bool {
        matches!(self, Page::Paginated { next: Some(_), .. })
    }
}

/// Free-form acknowledgement returned by the auth flows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

pub(crate) fn serialize_secret<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}
