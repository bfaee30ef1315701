use std::sync::Arc;

use snapfeed_api::endpoints::posts::Sort;
use snapfeed_api::{ApiError, Client, ClientConfig, MemoryStorage, Request};

#[tokio::main]
pub async fn main() -> Result<(), ApiError> {
    let client = Client::new(ClientConfig::default(), Arc::new(MemoryStorage::new()))?;
    client.set_token(Some("access_token"));

    let req = Request::posts().list().sort(Sort::Trending).search("rust");

    let page = client.send(req).await?;
    for post in page.results() {
        println!("{} by {}: {}", post.id, post.author.username, post.content);
    }
    Ok(())
}
