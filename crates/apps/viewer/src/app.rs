//! Command bodies, generic over the elevation and weather services so they
//! run the same against HTTP endpoints and in-memory fakes.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use catalog::{
    ActiveFeeds, Catalog, CategoryRow, SelectedSources, SidebarController, SidebarLayout,
};
use foundation::extent::GeoExtent;
use foundation::time::Time;
use runtime::frame::Frame;
use runtime::generation::Generation;
use scene::compositor::{SceneCompositor, SceneFrame};
use scene::state::SceneState;
use scene::visibility::LayerVisibility;
use serde::Serialize;
use sources::elevation::{ElevationService, HttpElevationService};
use sources::grid::ElevationGrid;
use sources::sampler::{ElevationSampler, SamplerConfig};
use sources::weather::{HttpWeatherService, WeatherFeed, WeatherService};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::session::{MapSession, SessionConfig, SessionStep, ViewEvent};

pub struct Services<E, W> {
    pub sampler: ElevationSampler<E>,
    pub weather: WeatherFeed<W>,
}

impl<E: ElevationService, W: WeatherService> Services<E, W> {
    pub fn new(elevation: E, weather: W, config: &ViewerConfig) -> Self {
        Self {
            sampler: ElevationSampler::with_config(
                elevation,
                SamplerConfig {
                    max_locations: config.max_locations,
                },
            ),
            weather: WeatherFeed::new(weather),
        }
    }
}

impl Services<HttpElevationService, HttpWeatherService> {
    pub fn http(config: &ViewerConfig) -> Self {
        if config.api_key.is_none() {
            warn!("ARCGIS_ELEVATION_API_KEY is not set; elevation requests will be rejected");
        }
        let client = reqwest::Client::new();
        let elevation = HttpElevationService::with_client(
            config.elevation_url.clone(),
            config.api_key.clone(),
            client.clone(),
        );
        let weather =
            HttpWeatherService::new(config.weather_url.clone(), config.weather_limit)
                .with_client(client);
        Self::new(elevation, weather, config)
    }
}

pub fn load_catalog(config: &ViewerConfig) -> Result<Catalog, ViewerError> {
    match &config.catalog_path {
        Some(path) => {
            info!("loading catalog from {}", path.display());
            Ok(Catalog::from_path(path)?)
        }
        None => Ok(catalog::default_catalog()),
    }
}

/// The explicit selection, or the catalog default when none is given.
pub fn selection_for(catalog: &Catalog, sources: &[String]) -> SelectedSources {
    if sources.is_empty() {
        catalog.default_selection()
    } else {
        sources.iter().map(String::as_str).collect()
    }
}

pub async fn sample_once<E: ElevationService, W: WeatherService>(
    services: &Services<E, W>,
    extent: &GeoExtent,
    resolution: NonZeroU32,
) -> ElevationGrid {
    info!(
        "sampling extent [{}, {}, {}, {}] at resolution {}",
        extent.xmin,
        extent.ymin,
        extent.xmax,
        extent.ymax,
        resolution
    );
    services.sampler.sample(extent, resolution).await
}

pub struct SceneRequest {
    pub extent: GeoExtent,
    pub resolution: NonZeroU32,
    pub feeds: ActiveFeeds,
    pub fetch_weather: bool,
    pub elapsed_s: f64,
    pub wireframe: bool,
}

pub async fn compose_once<E: ElevationService, W: WeatherService>(
    services: &Services<E, W>,
    request: &SceneRequest,
) -> SceneFrame {
    let mut state = SceneState {
        center: {
            let (x, y) = request.extent.center();
            Some(foundation::point::GeoPoint::new(x, y))
        },
        extent: Some(request.extent),
        ..SceneState::default()
    };
    if request.feeds.elevation {
        let grid = sample_once(services, &request.extent, request.resolution).await;
        state.elevation.data = Some(Arc::new(grid));
    }
    if request.fetch_weather && request.feeds.weather {
        if let Some(obs) = services.weather.fetch().await {
            state.weather = layers::weather::WeatherState::from_observation(&obs);
        }
    }

    let mut compositor = SceneCompositor::new();
    compositor.set_wireframe(request.wireframe);
    compositor.compose(
        Frame::at(0, Time(request.elapsed_s)),
        &state,
        LayerVisibility::from(request.feeds),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub open: bool,
    pub layout: SidebarLayout,
    pub feeds: ActiveFeeds,
    pub categories: Vec<CategoryRow>,
}

pub fn catalog_view(controller: &SidebarController) -> CatalogView {
    CatalogView {
        open: controller.is_open(),
        layout: controller.layout(),
        feeds: controller.active_feeds(),
        categories: controller.rows(),
    }
}

async fn publish<O: AsyncWrite + Unpin>(
    output: &mut O,
    state: &SceneState,
) -> Result<(), ViewerError> {
    let mut line = serde_json::to_string(&state.summary())?;
    line.push('\n');
    output.write_all(line.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

/// Event loop for `watch`: view events in, published state summaries out.
///
/// Returns the session once input has ended and every in-flight fetch has
/// been applied or dropped.
pub async fn watch<E, W, R, O>(
    services: Arc<Services<E, W>>,
    config: &ViewerConfig,
    feeds: ActiveFeeds,
    input: R,
    output: &mut O,
) -> Result<MapSession, ViewerError>
where
    E: ElevationService + 'static,
    W: WeatherService + 'static,
    R: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let start = Instant::now();
    let now = || Time(start.elapsed().as_secs_f64());
    let mut session = MapSession::new(SessionConfig {
        resolution: config.resolution,
        debounce_ms: config.debounce_ms,
        center: config.center,
        zoom: config.zoom,
    });

    if feeds.weather {
        let obs = services.weather.fetch().await;
        let state = session.apply_weather(now(), obs.as_ref());
        publish(output, &state).await?;
    }

    let mut lines = input.lines();
    let mut input_open = true;
    let mut fetches: JoinSet<(Generation, ElevationGrid)> = JoinSet::new();

    loop {
        let deadline = session.next_deadline();
        if !input_open && fetches.is_empty() && deadline.is_none() {
            break;
        }
        let wake = start + Duration::from_secs_f64(deadline.map_or(0.0, Time::seconds));

        let step = tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) if line.trim().is_empty() => SessionStep::default(),
                Some(line) => match serde_json::from_str::<ViewEvent>(&line) {
                    Ok(event) => session.handle(now(), event),
                    Err(err) => {
                        warn!("skipping unreadable view event: {err}");
                        SessionStep::default()
                    }
                },
                None => {
                    debug!("input closed");
                    input_open = false;
                    session.flush(now())
                }
            },
            Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                match joined {
                    Ok((generation, grid)) => SessionStep {
                        published: session.complete_fetch(now(), generation, grid),
                        fetch: None,
                    },
                    Err(err) => {
                        warn!("elevation task failed: {err}");
                        SessionStep::default()
                    }
                }
            },
            // The timer already reached the deadline; pin `poll` to it.
            _ = tokio::time::sleep_until(wake), if deadline.is_some() => session.flush(now()),
        };

        if let Some(state) = step.published {
            publish(output, &state).await?;
        }
        if let Some(ticket) = step.fetch {
            if feeds.elevation {
                let services = Arc::clone(&services);
                fetches.spawn(async move {
                    let grid = services.sampler.sample(&ticket.extent, ticket.resolution).await;
                    (ticket.generation, grid)
                });
            } else {
                let empty = ElevationGrid::empty(ticket.extent, ticket.resolution);
                if let Some(state) = session.complete_fetch(now(), ticket.generation, empty) {
                    publish(output, &state).await?;
                }
            }
        }
    }

    Ok(session)
}
