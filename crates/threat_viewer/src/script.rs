use crate::error::{Result, ViewerError};
use std::{str::FromStr, time::Duration};
use threat_chart::{DimValue, Dimension, Point};

/// One scripted legend click: `country=USA`, `year=2021`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleStep {
    pub dimension: Dimension,
    pub value: DimValue,
}

impl FromStr for ToggleStep {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ViewerError::InvalidToggle(s.to_string());
        let (dim, value) = s.split_once('=').ok_or_else(invalid)?;
        let dimension = Dimension::from_str(dim.trim()).map_err(|_| invalid())?;
        let value = DimValue::parse_for(dimension, value).ok_or_else(invalid)?;
        Ok(Self { dimension, value })
    }
}

/// Pointer position for the hover frame: `x,y`
pub fn parse_point(s: &str) -> Result<Point> {
    let invalid =
        || ViewerError::InvalidConfiguration(format!("Invalid pointer '{s}', expected x,y"));
    let (x, y) = s.split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().map_err(|_| invalid())?;
    let y: f64 = y.trim().parse().map_err(|_| invalid())?;
    Ok(Point::new(x, y))
}

/// Sample times covering one transition, both ends included
pub fn frame_times(start: Duration, duration: Duration, frames: u32) -> Vec<Duration> {
    if frames == 0 {
        return vec![start + duration];
    }
    (0..=frames)
        .map(|i| start + duration * i / frames)
        .collect()
}
