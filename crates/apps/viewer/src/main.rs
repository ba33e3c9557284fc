use std::sync::Arc;

use catalog::SidebarController;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use viewer::app::{self, SceneRequest, Services};
use viewer::cli::{Args, Command, parse_extent};
use viewer::{ViewerConfig, ViewerError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ViewerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = ViewerConfig::from_env()?;
    args.apply(&mut config)?;
    info!("resolution {} with at most {} locations", config.resolution, config.max_locations);

    match args.command {
        Command::Sample { extent, wkid } => {
            let extent = parse_extent(&extent, wkid)?;
            let services = Services::http(&config);
            let grid = app::sample_once(&services, &extent, config.resolution).await;
            println!("{}", serde_json::to_string_pretty(&grid)?);
        }
        Command::Scene {
            extent,
            wkid,
            sources,
            time,
            weather,
            wireframe,
        } => {
            let catalog = app::load_catalog(&config)?;
            let feeds = app::selection_for(&catalog, &sources).active_feeds(&catalog);
            let request = SceneRequest {
                extent: parse_extent(&extent, wkid)?,
                resolution: config.resolution,
                feeds,
                fetch_weather: weather,
                elapsed_s: time,
                wireframe,
            };
            let services = Services::http(&config);
            let frame = app::compose_once(&services, &request).await;
            println!("{}", serde_json::to_string_pretty(&frame)?);
        }
        Command::Catalog {
            toggle,
            collapse,
            close,
        } => {
            let mut controller = SidebarController::new(app::load_catalog(&config)?);
            for id in &collapse {
                controller.toggle_category(id);
            }
            for id in &toggle {
                controller.toggle_source(id);
            }
            if close {
                controller.toggle_sidebar();
            }
            println!("{}", serde_json::to_string_pretty(&app::catalog_view(&controller))?);
        }
        Command::Watch { sources } => {
            let catalog = app::load_catalog(&config)?;
            let feeds = app::selection_for(&catalog, &sources).active_feeds(&catalog);
            info!(
                "watching view events (elevation feed: {}, weather feed: {})",
                feeds.elevation, feeds.weather
            );
            let services = Arc::new(Services::http(&config));
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            let session = app::watch(services, &config, feeds, stdin, &mut stdout).await?;
            info!(
                "input closed after {} session events",
                session.events().events().len()
            );
        }
    }

    Ok(())
}
