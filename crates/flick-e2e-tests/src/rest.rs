use anyhow::{Result, anyhow};
use reqwest::Url;
use serde_json::Value;
use tracing::info;

pub async fn create_movie(
    client: &reqwest::Client,
    base_url: &Url,
    payload: &Value,
) -> Result<Value> {
    let api_url = base_url.join("v1/movies")?;

    let response = client.post(api_url).json(payload).send().await?;
    info!("Create movie response: {:#?}", response);
    assert_eq!(response.status().as_u16(), 201);

    let mut body: Value = response.json().await?;
    body.get_mut("movie")
        .map(Value::take)
        .ok_or_else(|| anyhow!("Response has no movie"))
}
