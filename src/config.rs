//! Host-supplied configuration.
//!
//! A backdrop recognises three options: a three-channel [`Tint`], a `speed`
//! multiplier, and whether pointer interaction is enabled. Configuration is
//! built with method chaining, or read from the environment:
//!
//! | Variable | Example | Meaning |
//! |----------|---------|---------|
//! | `GLOWFIELD_TINT` | `0.6,0.8,1.0` | RGB channel multipliers |
//! | `GLOWFIELD_SPEED` | `1.5` | aging/integration multiplier |
//! | `GLOWFIELD_MOUSE` | `false` | pointer attraction on/off |
//!
//! ```ignore
//! let config = BackdropConfig::new()
//!     .with_tint(Tint::new(0.6, 0.8, 1.0))
//!     .with_speed(0.5)
//!     .with_mouse_enabled(false);
//! ```

use crate::error::ConfigError;
use std::str::FromStr;

/// Environment variable holding the tint as `r,g,b`.
pub const ENV_TINT: &str = "GLOWFIELD_TINT";
/// Environment variable holding the speed multiplier.
pub const ENV_SPEED: &str = "GLOWFIELD_SPEED";
/// Environment variable toggling pointer interaction.
pub const ENV_MOUSE: &str = "GLOWFIELD_MOUSE";

/// Per-channel multiplier applied to all generated colour, nominally 0-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint(pub [f32; 3]);

impl Tint {
    /// Neutral tint: colours pass through unchanged.
    pub const WHITE: Tint = Tint([1.0, 1.0, 1.0]);

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub fn r(&self) -> f32 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> f32 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> f32 {
        self.0[2]
    }

    /// Replace non-finite channels with 1.0.
    fn sanitized(self) -> Self {
        Self(self.0.map(|c| if c.is_finite() { c } else { 1.0 }))
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Tint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels: Vec<f32> = s
            .split(',')
            .map(|part| part.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|_| ConfigError::InvalidTint(s.to_string()))?;

        match channels.as_slice() {
            [r, g, b] => Ok(Tint::new(*r, *g, *b)),
            _ => Err(ConfigError::InvalidTint(s.to_string())),
        }
    }
}

/// Configuration for a mounted backdrop.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropConfig {
    /// Colour multiplier for particles and the static fallback.
    pub tint: Tint,
    /// Positive multiplier on aging and integration rate.
    pub speed: f32,
    /// Whether pointer/touch movement attracts particles.
    pub mouse_enabled: bool,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            tint: Tint::WHITE,
            speed: 1.0,
            mouse_enabled: true,
        }
    }
}

impl BackdropConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the colour tint.
    pub fn with_tint(mut self, tint: Tint) -> Self {
        self.tint = tint;
        self
    }

    /// Set the speed multiplier.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Enable or disable pointer attraction.
    pub fn with_mouse_enabled(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Return a copy safe to simulate with.
    ///
    /// A speed that is not a positive finite number falls back to 1.0.
    pub fn sanitized(&self) -> Self {
        let speed = if self.speed.is_finite() && self.speed > 0.0 {
            self.speed
        } else {
            log::warn!("speed {} is not a positive number, using 1.0", self.speed);
            1.0
        };
        Self {
            tint: self.tint.sanitized(),
            speed,
            mouse_enabled: self.mouse_enabled,
        }
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Overlay values found through `lookup` onto this configuration.
    ///
    /// Unparseable values are logged and skipped.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_TINT) {
            match value.parse::<Tint>() {
                Ok(tint) => self.tint = tint,
                Err(e) => log::warn!("ignoring {}: {}", ENV_TINT, e),
            }
        }
        if let Some(value) = lookup(ENV_SPEED) {
            match parse_number(ENV_SPEED, &value) {
                Ok(speed) => self.speed = speed,
                Err(e) => log::warn!("ignoring {}: {}", ENV_SPEED, e),
            }
        }
        if let Some(value) = lookup(ENV_MOUSE) {
            match parse_bool(ENV_MOUSE, &value) {
                Ok(enabled) => self.mouse_enabled = enabled,
                Err(e) => log::warn!("ignoring {}: {}", ENV_MOUSE, e),
            }
        }
        self
    }
}

/// Parse a float option, naming `key` in the error.
pub fn parse_number(key: &str, value: &str) -> Result<f32, ConfigError> {
    value.trim().parse::<f32>().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parse a boolean option (`1/0`, `true/false`, `yes/no`, `on/off`).
pub fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
