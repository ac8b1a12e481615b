use std::env;
use std::sync::Arc;

use jobflow::{Actor, Config, HttpApi, JobsView};

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    let profile_id = env::var("JOBFLOW_PROFILE_ID")
        .expect("Environment variable 'JOBFLOW_PROFILE_ID' must be set");

    let api = Arc::new(HttpApi::new(&config));
    let mut view = JobsView::new(api, Actor::client(profile_id.as_str()));

    match view.refresh().await {
        Ok(jobs) => {
            for job in jobs {
                println!(
                    "{} [{}] proposals: {}, views: {}",
                    job.title,
                    job.status,
                    job.proposal_badge(),
                    job.view_badge(),
                );
            }
        }
        Err(err) => eprintln!("Could not fetch jobs: {err}"),
    }
}
