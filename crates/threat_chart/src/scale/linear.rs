/// Linear map from a numeric domain to an output coordinate range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Round step near `(stop - start) / count`, 1/2/5 × 10^k.
///
/// Negative results mean "divide by |inc|" so sub-unit steps stay exact.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    if !(step.is_finite() && step > 0.0) {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power < 0.0 {
        -(10f64.powf(-power) / factor)
    } else {
        10f64.powf(power) * factor
    }
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Extends the domain outward to round tick boundaries
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut prestep = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if prestep == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }
        // avoid -0.0 leaking into labels
        start += 0.0;
        stop += 0.0;
        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    /// Maps a domain value to the range; a degenerate domain maps to the
    /// range start (the zero line for bar charts).
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round tick values inside the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let (lo, hi) = if d1 < d0 { (d1, d0) } else { (d0, d1) };
        if lo == hi {
            return vec![lo];
        }
        let inc = tick_increment(lo, hi, count);
        if inc > 0.0 {
            let i0 = (lo / inc).ceil() as i64;
            let i1 = (hi / inc).floor() as i64;
            (i0..=i1).map(|i| i as f64 * inc).collect()
        } else if inc < 0.0 {
            let inv = -inc;
            let i0 = (lo * inv).ceil() as i64;
            let i1 = (hi * inv).floor() as i64;
            (i0..=i1).map(|i| i as f64 / inv).collect()
        } else {
            Vec::new()
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_rounds_upper_bound() {
        assert_eq!(LinearScale::new((0.0, 123.0), (0.0, 1.0)).nice(10).domain(), (0.0, 130.0));
        assert_eq!(LinearScale::new((0.0, 13.0), (0.0, 1.0)).nice(10).domain(), (0.0, 13.0));
        assert_eq!(LinearScale::new((0.0, 2.0), (0.0, 1.0)).nice(10).domain(), (0.0, 2.0));
        assert_eq!(LinearScale::new((0.0, 0.97), (0.0, 1.0)).nice(10).domain(), (0.0, 1.0));
    }

    #[test]
    fn test_zero_domain_is_stable() {
        let scale = LinearScale::new((0.0, 0.0), (350.0, 50.0)).nice(10);
        assert_eq!(scale.domain(), (0.0, 0.0));
        assert_eq!(scale.map(0.0), 350.0);
        assert_eq!(scale.map(3.0), 350.0);
        assert_eq!(scale.ticks(10), vec![0.0]);
    }

    #[test]
    fn test_inverted_range() {
        let scale = LinearScale::new((0.0, 10.0), (350.0, 50.0));
        assert_eq!(scale.map(0.0), 350.0);
        assert_eq!(scale.map(10.0), 50.0);
        assert_eq!(scale.map(5.0), 200.0);
    }

    #[test]
    fn test_ticks() {
        let ticks = LinearScale::new((0.0, 130.0), (0.0, 1.0)).ticks(10);
        assert_eq!(ticks.len(), 14);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(ticks[13], 130.0);

        let small = LinearScale::new((0.0, 2.0), (0.0, 1.0));
        assert_eq!(small.ticks(10).len(), 11);
        assert_eq!(small.ticks(10)[5], 1.0);
    }
}
