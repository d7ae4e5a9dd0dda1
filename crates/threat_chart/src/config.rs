use crate::{
    color::Rgb,
    constants::{
        AGGREGATE_HEIGHT, AGGREGATE_MARGIN_BOTTOM, CHART_WIDTH, DEFAULT_PALETTE, FACET_HEIGHT,
        FACET_MARGIN_BOTTOM, INNER_PADDING, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP,
        OUTER_PADDING_INNER, TRANSITION_DURATION,
    },
    error::{ChartError, Result},
    reconcile::{Easing, Timing},
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Top level configuration (TOML)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "ChartLayout::aggregate")]
    pub aggregate: ChartLayout,
    #[serde(default = "ChartLayout::facet")]
    pub facet: ChartLayout,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

/// Canvas size, margins and band padding of one chart
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    #[serde(default = "default_outer_padding")]
    pub outer_padding: f64,
    #[serde(default = "default_inner_padding")]
    pub inner_padding: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnimationConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: Easing,
}

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

fn default_outer_padding() -> f64 {
    OUTER_PADDING_INNER
}

fn default_inner_padding() -> f64 {
    INNER_PADDING
}

fn default_duration_ms() -> u64 {
    TRANSITION_DURATION.as_millis() as u64
}

impl ChartLayout {
    /// Country/year chart
    pub fn aggregate() -> Self {
        Self {
            width: CHART_WIDTH,
            height: AGGREGATE_HEIGHT,
            margin: Margin {
                top: MARGIN_TOP,
                right: MARGIN_RIGHT,
                bottom: AGGREGATE_MARGIN_BOTTOM,
                left: MARGIN_LEFT,
            },
            outer_padding: OUTER_PADDING_INNER,
            inner_padding: INNER_PADDING,
        }
    }

    /// Per-severity chart
    pub fn facet() -> Self {
        Self {
            height: FACET_HEIGHT,
            margin: Margin {
                bottom: FACET_MARGIN_BOTTOM,
                ..Self::aggregate().margin
            },
            ..Self::aggregate()
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.width <= self.margin.left + self.margin.right {
            return Err(ChartError::Config(format!(
                "[{}] width {} leaves no room between margins",
                name, self.width
            )));
        }
        if self.height <= self.margin.top + self.margin.bottom {
            return Err(ChartError::Config(format!(
                "[{}] height {} leaves no room between margins",
                name, self.height
            )));
        }
        for (label, p) in [
            ("outer_padding", self.outer_padding),
            ("inner_padding", self.inner_padding),
        ] {
            if !(0.0..1.0).contains(&p) {
                return Err(ChartError::Config(format!(
                    "[{}] {} must be in [0, 1), got {}",
                    name, label, p
                )));
            }
        }
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            easing: Easing::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aggregate: ChartLayout::aggregate(),
            facet: ChartLayout::facet(),
            animation: AnimationConfig::default(),
            palette: default_palette(),
        }
    }
}

impl Config {
    /// 設定ファイルから読み込み
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChartError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            ChartError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// 設定の検証
    pub fn validate(&self) -> Result<()> {
        self.aggregate.validate("aggregate")?;
        self.facet.validate("facet")?;
        if self.palette.is_empty() {
            return Err(ChartError::Config("palette cannot be empty".to_string()));
        }
        self.palette()?;
        Ok(())
    }

    pub fn palette(&self) -> Result<Vec<Rgb>> {
        self.palette.iter().map(|c| c.parse()).collect()
    }

    pub fn timing(&self) -> Timing {
        Timing {
            duration: Duration::from_millis(self.animation.duration_ms),
            easing: self.animation.easing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_matches_dashboard() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.aggregate.height, 400.0);
        assert_eq!(config.facet.height, 300.0);
        assert_eq!(config.facet.margin.bottom, 40.0);
        assert_eq!(config.facet.margin.right, 120.0);
        assert_eq!(config.timing().duration, Duration::from_millis(600));
        assert_eq!(config.palette().unwrap().len(), 8);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
palette = ["#000000", "#ffffff"]

[animation]
duration_ms = 250
easing = "linear"

[facet]
width = 800
height = 320
margin = {{ top = 40, right = 100, bottom = 40, left = 50 }}
"##
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.facet.width, 800.0);
        assert_eq!(config.facet.inner_padding, INNER_PADDING);
        assert_eq!(config.aggregate, ChartLayout::aggregate());
        assert_eq!(config.timing().duration, Duration::from_millis(250));
        assert_eq!(config.timing().easing, Easing::Linear);
        assert_eq!(config.palette().unwrap()[1], Rgb([255, 255, 255]));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.aggregate.width = 100.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.facet.inner_padding = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.palette = vec!["red".to_string()];
        assert!(matches!(config.validate(), Err(ChartError::InvalidColor(_))));

        let mut config = Config::default();
        config.palette.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[animation\nduration_ms = ").unwrap();
        match Config::load_from_file(file.path()) {
            Err(ChartError::Config(msg)) => assert!(msg.contains("Failed to parse")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load_from_file("no/such/config.toml");
        assert!(matches!(result, Err(ChartError::Config(_))));
    }
}
