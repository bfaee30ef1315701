use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use serde_json::{json, Value};
use snapfeed_api::endpoints::posts::MediaFile;
use snapfeed_api::Request;
use snapfeed_auth::Session;

use crate::cli::Command;

/// Run one subcommand against the session and return what should be printed.
/// Failures are logged before they are returned.
pub async fn execute(command: Command, session: &Session) -> Result<Value> {
    run(command, session)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Command failed"))
}

async fn run(command: Command, session: &Session) -> Result<Value> {
    let client = session.client();

    let output = match command {
        Command::Health => {
            let online = client.check_health().await;
            json!({ "base_url": client.config().base_url, "online": online })
        }

        Command::Login { email, password } => {
            let user = session.login(&email, SecretString::from(password)).await?;
            serde_json::to_value(user)?
        }

        Command::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let message = session
                .register(
                    &username,
                    &email,
                    SecretString::from(password),
                    SecretString::from(confirm_password),
                )
                .await?;
            serde_json::to_value(message)?
        }

        Command::VerifyOtp { email, otp } => {
            serde_json::to_value(session.verify_otp(&email, &otp).await?)?
        }

        Command::ResendOtp { email } => serde_json::to_value(session.resend_otp(&email).await?)?,

        Command::ForgotPassword { email } => {
            serde_json::to_value(session.forgot_password(&email).await?)?
        }

        Command::VerifyForgotOtp { email, otp } => {
            serde_json::to_value(session.verify_forgot_otp(&email, &otp).await?)?
        }

        Command::ResetPassword {
            email,
            otp,
            password,
        } => serde_json::to_value(
            session
                .reset_password(&email, &otp, SecretString::from(password))
                .await?,
        )?,

        Command::Logout => {
            session.logout().await;
            json!({ "logged_out": true })
        }

        Command::Whoami => match session.restore().await? {
            Some(user) => serde_json::to_value(user)?,
            None => bail!("Not logged in"),
        },

        Command::Feed {
            sort,
            search,
            page,
            user,
        } => {
            let mut request = Request::posts().list().sort(sort.into()).page(page);
            if let Some(search) = search {
                request = request.search(search);
            }
            if let Some(user) = user {
                request = request.user(user);
            }
            serde_json::to_value(client.send(request).await?)?
        }

        Command::Post { id } => serde_json::to_value(client.send(Request::posts().get(id)).await?)?,

        Command::Create { content, media } => {
            let media = match media {
                Some(path) => {
                    let bytes = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let file_name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    Some(MediaFile::from_name(file_name, bytes))
                }
                None => None,
            };
            let request = Request::posts().create(content, media)?;
            serde_json::to_value(client.send(request).await?)?
        }

        Command::Delete { id } => {
            client.send(Request::posts().delete(id)).await?;
            tracing::info!(post_id = id, "Post deleted");
            json!({ "deleted": id })
        }

        Command::Like { id } => {
            client.send(Request::posts().like(id)).await?;
            serde_json::to_value(client.send(Request::posts().get(id)).await?)?
        }

        Command::Save { id } => {
            client.send(Request::posts().save(id)).await?;
            serde_json::to_value(client.send(Request::posts().get(id)).await?)?
        }

        Command::Profile { id: Some(id) } => {
            serde_json::to_value(client.send(Request::users().profile(id)).await?)?
        }

        Command::Profile { id: None } => {
            serde_json::to_value(client.send(Request::users().me()).await?)?
        }

        Command::Follow { id } => {
            client.send(Request::users().toggle_follow(id)).await?;
            serde_json::to_value(client.send(Request::users().profile(id)).await?)?
        }

        Command::Saved => serde_json::to_value(client.send(Request::users().saved()).await?)?,
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::file_writer;
    use snapfeed_api::{Client, ClientConfig, MemoryStorage};
    use std::sync::Arc;
    use tracing_subscriber::{fmt, layer::SubscriberExt};

    #[tokio::test]
    async fn test_failed_command_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let (writer, guard) = file_writer(dir.path(), "snapfeed-test.log");
        let subscriber = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(writer).with_ansi(false));
        let default_guard = tracing::subscriber::set_default(subscriber);

        let client = Client::new(
            ClientConfig::new("http://127.0.0.1:9"),
            Arc::new(MemoryStorage::new()),
        )
        .unwrap();
        let session = Session::new(Arc::new(client));

        let err = execute(Command::Whoami, &session).await.unwrap_err();
        assert_eq!(err.to_string(), "Not logged in");

        drop(default_guard);
        drop(guard);
        let contents = std::fs::read_to_string(dir.path().join("snapfeed-test.log")).unwrap();
        assert!(contents.contains("ERROR"));
        assert!(contents.contains("Command failed"));
        assert!(contents.contains("Not logged in"));
    }
}
