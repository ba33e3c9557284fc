//! Map-to-scene bridge.
//!
//! `MapSession` owns the latest grid, the loading flag and the weather, and
//! republishes a fresh [`SceneState`] whenever one of them changes. Fetches
//! are issued as [`FetchTicket`]s; the caller runs them and hands the
//! result back through [`MapSession::complete_fetch`].

use std::num::NonZeroU32;
use std::sync::Arc;

use foundation::extent::GeoExtent;
use foundation::point::GeoPoint;
use foundation::time::Time;
use layers::weather::WeatherState;
use runtime::debounce::Debouncer;
use runtime::event_bus::EventBus;
use runtime::generation::{Generation, Generations};
use scene::state::{ElevationState, SceneState};
use serde::{Deserialize, Serialize};
use sources::grid::ElevationGrid;
use sources::protocol::ClimateObservation;
use tracing::debug;

/// Notification from the map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    Ready {
        extent: GeoExtent,
        #[serde(default)]
        center: Option<GeoPoint>,
        #[serde(default)]
        zoom: Option<f64>,
    },
    ExtentChanged {
        extent: GeoExtent,
        #[serde(default)]
        center: Option<GeoPoint>,
        #[serde(default)]
        zoom: Option<f64>,
    },
    ZoomChanged {
        zoom: f64,
        #[serde(default)]
        center: Option<GeoPoint>,
    },
}

/// A fetch the session wants run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: Generation,
    pub extent: GeoExtent,
    pub resolution: NonZeroU32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SessionConfig {
    pub resolution: NonZeroU32,
    pub debounce_ms: u64,
    pub center: GeoPoint,
    pub zoom: f64,
}

/// What handling one event produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStep {
    pub published: Option<SceneState>,
    pub fetch: Option<FetchTicket>,
}

pub struct MapSession {
    resolution: NonZeroU32,
    center: Option<GeoPoint>,
    zoom: Option<f64>,
    extent: Option<GeoExtent>,
    grid: Option<Arc<ElevationGrid>>,
    weather: WeatherState,
    debouncer: Debouncer,
    generations: Generations,
    in_flight: Option<Generation>,
    bus: EventBus,
}

impl MapSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            resolution: config.resolution,
            center: Some(config.center),
            zoom: Some(config.zoom),
            extent: None,
            grid: None,
            weather: WeatherState::default(),
            debouncer: Debouncer::from_millis(config.debounce_ms),
            generations: Generations::new(),
            in_flight: None,
            bus: EventBus::new(),
        }
    }

    pub fn handle(&mut self, now: Time, event: ViewEvent) -> SessionStep {
        match event {
            ViewEvent::Ready {
                extent,
                center,
                zoom,
            } => {
                self.update_view(Some(extent), center, zoom);
                self.debouncer.cancel();
                self.bus.emit(now, "view.ready", "initial fetch");
                let fetch = self.issue_fetch(now);
                SessionStep {
                    published: fetch.map(|_| self.snapshot()),
                    fetch,
                }
            }
            ViewEvent::ExtentChanged {
                extent,
                center,
                zoom,
            } => {
                self.update_view(Some(extent), center, zoom);
                self.debouncer.trigger(now);
                self.bus.emit(now, "view.extent", "fetch scheduled");
                SessionStep::default()
            }
            ViewEvent::ZoomChanged { zoom, center } => {
                self.update_view(None, center, Some(zoom));
                self.bus.emit(now, "view.zoom", format!("zoom {zoom:.1}"));
                SessionStep {
                    published: Some(self.snapshot()),
                    fetch: None,
                }
            }
        }
    }

    /// Fires the debounced fetch once the quiet period has passed.
    pub fn poll(&mut self, now: Time) -> SessionStep {
        if !self.debouncer.poll(now) {
            return SessionStep::default();
        }
        let fetch = self.issue_fetch(now);
        SessionStep {
            published: fetch.map(|_| self.snapshot()),
            fetch,
        }
    }

    /// Fires a pending debounced fetch immediately.
    pub fn flush(&mut self, now: Time) -> SessionStep {
        match self.debouncer.deadline() {
            Some(deadline) => self.poll(if now >= deadline { now } else { deadline }),
            None => SessionStep::default(),
        }
    }

    pub fn next_deadline(&self) -> Option<Time> {
        self.debouncer.deadline()
    }

    /// Applies a finished fetch; results of superseded generations are
    /// dropped and publish nothing.
    #[must_use]
    pub fn complete_fetch(
        &mut self,
        now: Time,
        generation: Generation,
        grid: ElevationGrid,
    ) -> Option<SceneState> {
        if !self.generations.is_current(generation) {
            debug!("dropping stale elevation result {generation:?}");
            self.bus.emit(now, "fetch.dropped", format!("{generation:?}"));
            return None;
        }
        self.bus.emit(
            now,
            "fetch.applied",
            format!("{generation:?} with {} points", grid.points.len()),
        );
        self.grid = Some(Arc::new(grid));
        if self.in_flight == Some(generation) {
            self.in_flight = None;
        }
        Some(self.snapshot())
    }

    pub fn apply_weather(
        &mut self,
        now: Time,
        observation: Option<&ClimateObservation>,
    ) -> SceneState {
        self.weather = match observation {
            Some(obs) => WeatherState::from_observation(obs),
            None => WeatherState::default(),
        };
        self.bus.emit(now, "weather.applied", format!("{:?}", self.weather.kind));
        self.snapshot()
    }

    pub fn snapshot(&self) -> SceneState {
        SceneState {
            center: self.center,
            zoom: self.zoom,
            extent: self.extent,
            elevation: ElevationState {
                visible: true,
                data: self.grid.clone(),
                loading: self.in_flight.is_some(),
            },
            weather: self.weather,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    fn update_view(
        &mut self,
        extent: Option<GeoExtent>,
        center: Option<GeoPoint>,
        zoom: Option<f64>,
    ) {
        if extent.is_some() {
            self.extent = extent;
        }
        if center.is_some() {
            self.center = center;
        }
        if zoom.is_some() {
            self.zoom = zoom;
        }
    }

    fn issue_fetch(&mut self, now: Time) -> Option<FetchTicket> {
        let extent = self.extent?;
        let generation = self.generations.issue();
        self.in_flight = Some(generation);
        self.bus.emit(now, "fetch.issued", format!("{generation:?}"));
        Some(FetchTicket {
            generation,
            extent,
            resolution: self.resolution,
        })
    }
}
