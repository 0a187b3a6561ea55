#![forbid(unsafe_code)]

//! Engine configuration (deterministic, env-overridable).
//!
//! The thresholds differ slightly between the platforms the engine ships on
//! (tvOS debounces scrolling at 150ms, the web build at 100ms), so all of
//! them are configuration rather than constants.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::gesture::GestureConfig;

const ENV_LONG_PRESS_MS: &str = "TENFOOT_LONG_PRESS_MS";
const ENV_JITTER_RADIUS: &str = "TENFOOT_JITTER_RADIUS";
const ENV_SWIPE_DISTANCE: &str = "TENFOOT_SWIPE_DISTANCE";
const ENV_SWIPE_WINDOW_MS: &str = "TENFOOT_SWIPE_WINDOW_MS";
const ENV_SCROLL_DEBOUNCE_MS: &str = "TENFOOT_SCROLL_DEBOUNCE_MS";
const ENV_PRIMARY_WEIGHT: &str = "TENFOOT_PRIMARY_WEIGHT";
const ENV_SECONDARY_WEIGHT: &str = "TENFOOT_SECONDARY_WEIGHT";
const ENV_HISTORY_DEPTH: &str = "TENFOOT_HISTORY_DEPTH";
const ENV_SEEK_STEP_MS: &str = "TENFOOT_SEEK_STEP_MS";
const ENV_VOLUME_STEP: &str = "TENFOOT_VOLUME_STEP";
const ENV_TELEMETRY_CAPACITY: &str = "TENFOOT_TELEMETRY_CAPACITY";

/// Weights for directional candidate scoring.
///
/// `score = primary * along_axis_distance + secondary * off_axis_distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverWeights {
    pub primary: f32,
    pub secondary: f32,
}

impl Default for ResolverWeights {
    fn default() -> Self {
        Self {
            primary: 1.0,
            secondary: 2.0,
        }
    }
}

/// Engine configuration.
///
/// # Environment Variables
/// - `TENFOOT_LONG_PRESS_MS` (u64)
/// - `TENFOOT_JITTER_RADIUS` (f32, layout units)
/// - `TENFOOT_SWIPE_DISTANCE` (f32, layout units)
/// - `TENFOOT_SWIPE_WINDOW_MS` (u64)
/// - `TENFOOT_SCROLL_DEBOUNCE_MS` (u64)
/// - `TENFOOT_PRIMARY_WEIGHT` / `TENFOOT_SECONDARY_WEIGHT` (f32)
/// - `TENFOOT_HISTORY_DEPTH` (usize)
/// - `TENFOOT_SEEK_STEP_MS` (u64)
/// - `TENFOOT_VOLUME_STEP` (i32)
/// - `TENFOOT_TELEMETRY_CAPACITY` (usize)
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub gesture: GestureConfig,
    pub weights: ResolverWeights,
    /// Quiet window for coalescing scroll-into-view requests.
    pub scroll_debounce: Duration,
    /// Maximum retained history entries; the oldest are dropped beyond it.
    pub history_depth: usize,
    /// Relative seek applied by left/right during playback.
    pub seek_step: Duration,
    /// Volume delta applied by up/down during playback.
    pub volume_step: i32,
    /// Command records retained in memory.
    pub telemetry_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            weights: ResolverWeights::default(),
            scroll_debounce: Duration::from_millis(100),
            history_depth: 64,
            seek_step: Duration::from_secs(10),
            volume_step: 5,
            telemetry_capacity: 256,
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct EngineConfigParse {
    pub config: EngineConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> EngineConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> EngineConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Parse config through a custom lookup (tests, host-provided settings).
    #[must_use]
    pub fn from_lookup<F>(get: F) -> EngineConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        from_env_with(get)
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.gesture.long_press.is_zero() {
            errors.push(ConfigError::new(
                "long_press",
                "0",
                "long press threshold must be positive",
            ));
        }
        if !(self.gesture.jitter_radius.is_finite() && self.gesture.jitter_radius >= 0.0) {
            errors.push(ConfigError::new(
                "jitter_radius",
                self.gesture.jitter_radius.to_string(),
                "expected finite, non-negative radius",
            ));
        }
        if !(self.gesture.swipe_distance.is_finite()
            && self.gesture.swipe_distance > self.gesture.jitter_radius)
        {
            errors.push(ConfigError::new(
                "swipe_distance",
                self.gesture.swipe_distance.to_string(),
                "swipe distance must exceed the jitter radius",
            ));
        }
        if self.gesture.swipe_window.is_zero() {
            errors.push(ConfigError::new(
                "swipe_window",
                "0",
                "swipe window must be positive",
            ));
        }
        validate_weight("primary_weight", self.weights.primary, &mut errors);
        validate_weight("secondary_weight", self.weights.secondary, &mut errors);
        if self.history_depth == 0 {
            errors.push(ConfigError::new(
                "history_depth",
                "0",
                "history must retain at least one entry",
            ));
        }
        if self.volume_step <= 0 {
            errors.push(ConfigError::new(
                "volume_step",
                self.volume_step.to_string(),
                "expected positive integer",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Builder: set the scroll debounce window.
    #[must_use]
    pub fn with_scroll_debounce(mut self, window: Duration) -> Self {
        self.scroll_debounce = window;
        self
    }

    /// Builder: set gesture thresholds.
    #[must_use]
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    /// Builder: set resolver weights.
    #[must_use]
    pub fn with_weights(mut self, weights: ResolverWeights) -> Self {
        self.weights = weights;
        self
    }
}

fn validate_weight(field: &'static str, weight: f32, errors: &mut Vec<ConfigError>) {
    if !(weight.is_finite() && weight > 0.0) {
        errors.push(ConfigError::new(
            field,
            weight.to_string(),
            "expected finite, positive weight",
        ));
    }
}

fn parse_millis(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_millis)
}

fn parse_f32(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

fn from_env_with<F>(mut get: F) -> EngineConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = EngineConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_LONG_PRESS_MS) {
        match parse_millis(&value) {
            Some(parsed) => config.gesture.long_press = parsed,
            None => errors.push(ConfigError::new(
                "long_press",
                value,
                "expected milliseconds",
            )),
        }
    }

    if let Some(value) = get(ENV_JITTER_RADIUS) {
        match parse_f32(&value) {
            Some(parsed) => config.gesture.jitter_radius = parsed,
            None => errors.push(ConfigError::new(
                "jitter_radius",
                value,
                "expected number",
            )),
        }
    }

    if let Some(value) = get(ENV_SWIPE_DISTANCE) {
        match parse_f32(&value) {
            Some(parsed) => config.gesture.swipe_distance = parsed,
            None => errors.push(ConfigError::new(
                "swipe_distance",
                value,
                "expected number",
            )),
        }
    }

    if let Some(value) = get(ENV_SWIPE_WINDOW_MS) {
        match parse_millis(&value) {
            Some(parsed) => config.gesture.swipe_window = parsed,
            None => errors.push(ConfigError::new(
                "swipe_window",
                value,
                "expected milliseconds",
            )),
        }
    }

    if let Some(value) = get(ENV_SCROLL_DEBOUNCE_MS) {
        match parse_millis(&value) {
            Some(parsed) => config.scroll_debounce = parsed,
            None => errors.push(ConfigError::new(
                "scroll_debounce",
                value,
                "expected milliseconds",
            )),
        }
    }

    if let Some(value) = get(ENV_PRIMARY_WEIGHT) {
        match parse_f32(&value) {
            Some(parsed) => config.weights.primary = parsed,
            None => errors.push(ConfigError::new(
                "primary_weight",
                value,
                "expected number",
            )),
        }
    }

    if let Some(value) = get(ENV_SECONDARY_WEIGHT) {
        match parse_f32(&value) {
            Some(parsed) => config.weights.secondary = parsed,
            None => errors.push(ConfigError::new(
                "secondary_weight",
                value,
                "expected number",
            )),
        }
    }

    if let Some(value) = get(ENV_HISTORY_DEPTH) {
        match parse_usize(&value) {
            Some(parsed) => config.history_depth = parsed,
            None => errors.push(ConfigError::new(
                "history_depth",
                value,
                "expected positive integer",
            )),
        }
    }

    if let Some(value) = get(ENV_SEEK_STEP_MS) {
        match parse_millis(&value) {
            Some(parsed) => config.seek_step = parsed,
            None => errors.push(ConfigError::new(
                "seek_step",
                value,
                "expected milliseconds",
            )),
        }
    }

    if let Some(value) = get(ENV_VOLUME_STEP) {
        match value.trim().parse::<i32>() {
            Ok(parsed) => config.volume_step = parsed,
            Err(_) => errors.push(ConfigError::new(
                "volume_step",
                value,
                "expected positive integer",
            )),
        }
    }

    if let Some(value) = get(ENV_TELEMETRY_CAPACITY) {
        match parse_usize(&value) {
            Some(parsed) => config.telemetry_capacity = parsed,
            None => errors.push(ConfigError::new(
                "telemetry_capacity",
                value,
                "expected integer",
            )),
        }
    }

    if let Err(violations) = config.validate() {
        errors.extend(violations);
    }

    EngineConfigParse { config, errors }
}
