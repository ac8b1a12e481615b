use std::env;

use dotenvy::dotenv;

/// Connection settings for the marketplace API. The bearer token is read
/// once here and handed to the client at construction; call sites never
/// reach into ambient storage for credentials.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub bearer_token: String,
}

impl Config {
    pub fn from_env() -> Config {
        dotenv().ok();

        let base_url = env::var("JOBFLOW_API_URL")
            .expect("Environment variable 'JOBFLOW_API_URL' must be set");
        let bearer_token = env::var("JOBFLOW_API_TOKEN")
            .expect("Environment variable 'JOBFLOW_API_TOKEN' must be set");
        Config {
            base_url,
            bearer_token,
        }
    }

    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Config {
        Config {
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
        }
    }
}
