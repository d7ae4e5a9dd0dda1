use crate::{color::Rgb, constants::UNKNOWN_FILL, domain::DomainSet, record::DimValue};

/// Ordinal palette assignment by position in a domain
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: DomainSet,
    palette: Vec<Rgb>,
}

impl ColorScale {
    pub fn new(domain: DomainSet, palette: Vec<Rgb>) -> Self {
        Self { domain, palette }
    }

    /// Palette entry of `value`, wrapping when the domain outgrows the palette
    pub fn color(&self, value: &DimValue) -> Rgb {
        match self.domain.index_of(value) {
            Some(i) if !self.palette.is_empty() => self.palette[i % self.palette.len()],
            _ => unknown_fill(),
        }
    }

    pub fn domain(&self) -> &DomainSet {
        &self.domain
    }
}

fn unknown_fill() -> Rgb {
    UNKNOWN_FILL.parse().unwrap_or(Rgb([204, 204, 204]))
}
