//! Weather state and the translucent overlay plane that shows it.

use foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use sources::protocol::ClimateObservation;

use crate::layer::{Layer, LayerId, Placement};
use crate::symbology::{Color, MaterialStyle};

pub const WEATHER_PLANE_SIZE: f64 = 25.0;
pub const WEATHER_ORIGIN: Vec3 = Vec3::new(0.0, 2.0, 0.0);
/// Opacity used when the state carries none.
pub const FALLBACK_OPACITY: f32 = 0.3;
/// Temperature assumed when an observation does not report one.
pub const DEFAULT_TEMPERATURE: f64 = 15.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    #[default]
    Clear,
    Mixed,
    Rain,
    Snow,
    Fog,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    pub visible: bool,
    pub opacity: f32,
    pub kind: WeatherKind,
    /// Degrees Celsius.
    pub temperature: f64,
    /// 0..=1, drives the opacity pulse rate.
    pub intensity: f64,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            visible: true,
            opacity: 0.7,
            kind: WeatherKind::Clear,
            temperature: DEFAULT_TEMPERATURE,
            intensity: 0.5,
        }
    }
}

impl WeatherState {
    pub fn from_observation(obs: &ClimateObservation) -> Self {
        let temperature = obs.mean_temperature.unwrap_or(DEFAULT_TEMPERATURE);
        let precipitation = obs.total_precipitation.unwrap_or(0.0);
        let kind = if precipitation > 0.0 && temperature < 0.0 {
            WeatherKind::Snow
        } else if precipitation > 0.0 {
            WeatherKind::Rain
        } else {
            WeatherKind::Clear
        };
        let intensity = if precipitation > 0.0 {
            (precipitation / 10.0).clamp(0.0, 1.0)
        } else {
            0.5
        };
        Self {
            kind,
            temperature,
            intensity,
            ..Self::default()
        }
    }
}

pub fn weather_color(state: &WeatherState) -> Color {
    match state.kind {
        WeatherKind::Rain => Color::rgb(0x46, 0x82, 0xb4),
        WeatherKind::Snow => Color::rgb(0xf0, 0xf8, 0xff),
        WeatherKind::Fog => Color::rgb(0x70, 0x80, 0x90),
        _ if state.temperature < 0.0 => Color::rgb(0xb0, 0xe0, 0xe6),
        _ => Color::rgb(0x87, 0xce, 0xeb),
    }
}

/// `base + sin(t * intensity) * 0.1`, clamped to `[0, 1]`.
pub fn overlay_opacity(state: &WeatherState, elapsed_s: f64) -> f32 {
    let base = if state.opacity > 0.0 {
        state.opacity
    } else {
        FALLBACK_OPACITY
    };
    let pulse = (elapsed_s * state.intensity).sin() * 0.1;
    (base as f64 + pulse).clamp(0.0, 1.0) as f32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherOverlay {
    pub size: f64,
    pub placement: Placement,
    pub material: MaterialStyle,
    pub kind: WeatherKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherLayer {
    id: LayerId,
}

impl WeatherLayer {
    pub fn new(id: u64) -> Self {
        Self { id: LayerId(id) }
    }

    /// The overlay for this frame, `None` when the state is hidden.
    pub fn overlay(&self, state: &WeatherState, elapsed_s: f64) -> Option<WeatherOverlay> {
        if !state.visible {
            return None;
        }
        Some(WeatherOverlay {
            size: WEATHER_PLANE_SIZE,
            placement: Placement::ground(WEATHER_ORIGIN),
            material: MaterialStyle::translucent(
                weather_color(state),
                overlay_opacity(state, elapsed_s),
            ),
            kind: state.kind,
        })
    }
}

impl Layer for WeatherLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "weather"
    }
}

#[cfg(test)]
mod tests {
    use super::{WeatherKind, WeatherLayer, WeatherState, overlay_opacity, weather_color};
    use crate::symbology::Color;
    use sources::protocol::ClimateObservation;

    fn state(kind: WeatherKind, temperature: f64) -> WeatherState {
        WeatherState {
            kind,
            temperature,
            ..WeatherState::default()
        }
    }

    #[test]
    fn kind_beats_temperature() {
        assert_eq!(weather_color(&state(WeatherKind::Snow, -5.0)), Color::rgb(0xf0, 0xf8, 0xff));
        assert_eq!(weather_color(&state(WeatherKind::Rain, -5.0)), Color::rgb(0x46, 0x82, 0xb4));
        assert_eq!(weather_color(&state(WeatherKind::Fog, 20.0)), Color::rgb(0x70, 0x80, 0x90));
        assert_eq!(weather_color(&state(WeatherKind::Clear, -0.5)), Color::rgb(0xb0, 0xe0, 0xe6));
        assert_eq!(weather_color(&state(WeatherKind::Mixed, 0.0)), Color::rgb(0x87, 0xce, 0xeb));
    }

    #[test]
    fn opacity_pulses_around_base() {
        let s = WeatherState::default();
        assert_eq!(overlay_opacity(&s, 0.0), 0.7);
        let peak = std::f64::consts::PI; // sin(pi * 0.5) == 1
        assert!((overlay_opacity(&s, peak) - 0.8).abs() < 1e-6);

        let unset = WeatherState {
            opacity: 0.0,
            ..s
        };
        assert!((overlay_opacity(&unset, 0.0) - 0.3).abs() < 1e-6);

        let full = WeatherState {
            opacity: 1.0,
            ..s
        };
        assert_eq!(overlay_opacity(&full, peak), 1.0);
    }

    #[test]
    fn derives_state_from_observation() {
        let snow = WeatherState::from_observation(&ClimateObservation {
            mean_temperature: Some(-4.0),
            total_precipitation: Some(25.0),
            ..Default::default()
        });
        assert_eq!(snow.kind, WeatherKind::Snow);
        assert_eq!(snow.intensity, 1.0);

        let rain = WeatherState::from_observation(&ClimateObservation {
            mean_temperature: Some(6.0),
            total_precipitation: Some(3.0),
            ..Default::default()
        });
        assert_eq!(rain.kind, WeatherKind::Rain);
        assert!((rain.intensity - 0.3).abs() < 1e-12);

        let dry = WeatherState::from_observation(&ClimateObservation::default());
        assert_eq!(dry, WeatherState::default());
    }

    #[test]
    fn hidden_state_has_no_overlay() {
        let layer = WeatherLayer::new(2);
        let hidden = WeatherState {
            visible: false,
            ..WeatherState::default()
        };
        assert!(layer.overlay(&hidden, 1.0).is_none());

        let overlay = layer.overlay(&WeatherState::default(), 0.0).unwrap();
        assert_eq!(overlay.size, 25.0);
        assert!(overlay.material.transparent);
    }
}
