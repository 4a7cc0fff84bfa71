use crate::angle::{Angle, Rotation};
use crate::wheel::{
    AnimationTiming, DEFAULT_DAMPENING_FACTOR, DEFAULT_VISIBLE_ANGLE_DEGREES,
    DURATION_DISTANCE_FACTOR, Dampening, LayoutDirection, RotationLimits, SECONDS_PER_RADIAN,
    SnapBack, WedgeSeries, WedgeSeriesError, Wheel,
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Wheel layout and drag behavior, as read from `config.toml`.
///
/// Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WheelConfig {
    pub wedges: Vec<String>,
    /// Only used when `wedges` is empty.
    pub wedge_count: usize,
    pub wedge_separation: f64,
    pub direction: LayoutDirection,
    pub visible_angle: f64,
    pub min_rotation: Option<f64>,
    pub max_rotation: Option<f64>,
    pub dampening_factor: f64,
    pub snap_back: SnapBack,
    pub seconds_per_radian: f64,
    pub duration_distance_factor: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            wedges: Vec::new(),
            wedge_count: 10,
            wedge_separation: 90.0,
            direction: LayoutDirection::default(),
            visible_angle: DEFAULT_VISIBLE_ANGLE_DEGREES,
            min_rotation: None,
            max_rotation: None,
            dampening_factor: DEFAULT_DAMPENING_FACTOR,
            snap_back: SnapBack::default(),
            seconds_per_radian: SECONDS_PER_RADIAN,
            duration_distance_factor: DURATION_DISTANCE_FACTOR,
        }
    }
}

impl WheelConfig {
    pub fn wedge_count(&self) -> usize {
        if self.wedges.is_empty() {
            self.wedge_count
        } else {
            self.wedges.len()
        }
    }

    /// Label of wedge `index`, falling back to its number.
    pub fn label(&self, index: usize) -> String {
        self.wedges
            .get(index)
            .cloned()
            .unwrap_or_else(|| index.to_string())
    }

    pub fn series(&self) -> Result<WedgeSeries, ConfigError> {
        let series = WedgeSeries::new(
            self.wedge_count(),
            Angle::from_degrees(self.wedge_separation),
            self.direction,
        )?
        .with_visible_angle(Rotation::from_degrees(self.visible_angle))?;
        Ok(series)
    }

    pub fn limits(&self) -> Result<RotationLimits, ConfigError> {
        if let (Some(min), Some(max)) = (self.min_rotation, self.max_rotation)
            && min > max
        {
            return Err(ConfigError::InvalidLimits { min, max });
        }
        Ok(RotationLimits::new(
            self.min_rotation.map(Rotation::from_degrees),
            self.max_rotation.map(Rotation::from_degrees),
        ))
    }

    pub fn dampening(&self) -> Result<Dampening, ConfigError> {
        Dampening::new(self.dampening_factor)
            .ok_or(ConfigError::InvalidDampening(self.dampening_factor))
    }

    pub fn timing(&self) -> AnimationTiming {
        AnimationTiming {
            seconds_per_radian: self.seconds_per_radian,
            distance_factor: self.duration_distance_factor,
        }
    }

    /// Builds an idle wheel at rotation zero.
    pub fn wheel(&self) -> Result<Wheel, ConfigError> {
        Ok(Wheel::new(self.series()?)
            .with_limits(self.limits()?)
            .with_snap_back(self.snap_back)
            .with_dampening(self.dampening()?)
            .with_timing(self.timing()))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid wedge series: {0}")]
    Series(#[from] WedgeSeriesError),
    #[error("Dampening factor must be positive and finite (got {0})")]
    InvalidDampening(f64),
    #[error("min_rotation ({min}) is greater than max_rotation ({max})")]
    InvalidLimits { min: f64, max: f64 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "spinwheel", "spinwheel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Loads the config file (missing is fine) layered under `SPINWHEEL_*`
/// environment variables.
pub fn load_config(path: Option<&Path>) -> Result<WheelConfig, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };
    log::debug!("Loading config from {}", config_path.display());

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("SPINWHEEL").try_parsing(true))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Writes the default config unless one already exists.
pub fn write_default_config(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
