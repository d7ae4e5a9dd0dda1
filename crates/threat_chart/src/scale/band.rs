use crate::{domain::DomainSet, record::DimValue};

/// Equal-width slots, one per domain value, in domain order.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: DomainSet,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    // derived
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(domain: DomainSet, range: (f64, f64)) -> Self {
        let mut scale = Self {
            domain,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        scale.rescale();
        scale
    }

    /// Gap between adjacent slots as a fraction of the step
    pub fn padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    /// Sets both inner and outer padding
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.padding_outer = padding.max(0.0);
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        if n == 0.0 {
            self.start = self.range.0;
            self.step = 0.0;
            self.bandwidth = 0.0;
            return;
        }
        let (lo, hi) = if self.range.1 < self.range.0 {
            (self.range.1, self.range.0)
        } else {
            self.range
        };
        let span = hi - lo;
        self.step = span / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        self.start = lo + (span - self.step * (n - self.padding_inner)) * self.align;
        self.bandwidth = self.step * (1.0 - self.padding_inner);
    }

    /// Left edge of the slot of `value`
    pub fn position(&self, value: &DimValue) -> Option<f64> {
        self.domain
            .index_of(value)
            .map(|i| self.start + self.step * i as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &DomainSet {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}
