use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::info;
use url::Url;

/// Download the configured page and return its body text.
///
/// One GET, no retries. A non-success status is an error here rather than
/// an empty table three stages later.
pub fn fetch_page(client: &Client, config: &Config) -> Result<String> {
    let url = Url::parse(&config.url).map_err(|e| Error::Fetch {
        url: config.url.clone(),
        message: e.to_string(),
    })?;

    let body = client
        .get(url.as_str())
        .header(USER_AGENT, &config.user_agent)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(|e| Error::Fetch {
            url: config.url.clone(),
            message: e.to_string(),
        })?;

    info!(url = %url, bytes = body.len(), "fetched page");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_a_fetch_error() {
        let config = Config {
            url: "not a url".into(),
            ..Config::default()
        };
        let client = Client::new();
        match fetch_page(&client, &config) {
            Err(Error::Fetch { url, .. }) => assert_eq!(url, "not a url"),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }
}
