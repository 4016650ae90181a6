use chipviz_boundary::{Viewport, DEFAULT_MARGIN};
use chipviz_helpers::parse_level;
use chipviz_tour::TourOptions;
use chipviz_traits::{ChipError, ChipResult};
use log::LevelFilter;
use ron::extensions::Extensions;
use ron::Options;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;

fn default_dimensions() -> usize {
    2
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Settings of a boundary tracing run, usually kept in a `.ron` file:
///
/// ```ron
/// (
///     dimensions: 2,
///     viewport: (xmin: 0.0, xmax: 10.0, ymin: 0.0, ymax: 10.0),
///     tour: (max_passes: 50),
///     logging: (level: "debug"),
/// )
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BoundaryConfig {
    /// Dimensionality of the midpoints to keep from the hyperplane file.
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Fixed viewing rectangle. Derived from the midpoints when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,

    /// Padding of a derived viewport, as a fraction of the data extent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,

    #[serde(default)]
    pub tour: TourOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            dimensions: default_dimensions(),
            viewport: None,
            margin: None,
            tour: TourOptions::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BoundaryConfig {
    fn get_options() -> Options {
        Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .with_default_extension(Extensions::UNWRAP_NEWTYPES)
    }

    pub fn serialize_ron(&self) -> ChipResult<String> {
        let pretty = ron::ser::PrettyConfig::default();
        let answer = Self::get_options()
            .to_string_pretty(self, pretty)
            .map_err(|e| ChipError::Config(e.to_string()))?;
        // RON doesn't put its own options in the serialization format, so we have to add it manually
        Ok(format!("#![enable(implicit_some)]\n{answer}\n"))
    }

    pub fn deserialize_ron(ron: &str) -> ChipResult<Self> {
        let config: Self = Self::get_options()
            .from_str(ron)
            .map_err(|e| ChipError::Config(format!("Syntax error in config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ChipResult<()> {
        if self.dimensions == 0 {
            return Err(ChipError::Config("dimensions must be at least 1".to_string()));
        }
        if let Some(viewport) = &self.viewport {
            viewport.validate()?;
        }
        if let Some(margin) = self.margin {
            if !margin.is_finite() || margin < 0.0 {
                return Err(ChipError::Config(format!("invalid margin {margin}")));
            }
        }
        parse_level(&self.logging.level)?;
        Ok(())
    }

    pub fn margin(&self) -> f64 {
        self.margin.unwrap_or(DEFAULT_MARGIN)
    }

    pub fn log_level(&self) -> ChipResult<LevelFilter> {
        parse_level(&self.logging.level)
    }
}

/// Read a boundary configuration from a file.
pub fn read_configuration(config_filename: impl AsRef<Path>) -> ChipResult<BoundaryConfig> {
    let path = config_filename.as_ref();
    let config_content = read_to_string(path).map_err(|e| ChipError::from_io(path, e))?;
    read_configuration_str(&config_content)
}

/// Read a boundary configuration from its RON text.
pub fn read_configuration_str(config_content: &str) -> ChipResult<BoundaryConfig> {
    BoundaryConfig::deserialize_ron(config_content)
}
