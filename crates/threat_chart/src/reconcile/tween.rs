use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::{Display, EnumString};

use crate::constants::TRANSITION_DURATION;

/// Values that can be blended between two states
pub trait Interpolate: Copy {
    fn lerp(&self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

/// Easing curve shared by every transition of a chart
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// Duration and easing of transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration: TRANSITION_DURATION,
            easing: Easing::default(),
        }
    }
}

/// In-flight transition from `from` to `to` starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: Duration,
    timing: Timing,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, start: Duration, timing: Timing) -> Self {
        Self {
            from,
            to,
            start,
            timing,
        }
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self, now: Duration) -> f64 {
        if self.timing.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.timing.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: Duration) -> T {
        let t = self.timing.easing.apply(self.progress(now));
        self.from.lerp(&self.to, t)
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    /// Restarts toward `to` from wherever the transition currently is
    pub fn retarget(&mut self, to: T, now: Duration) {
        self.from = self.value_at(now);
        self.to = to;
        self.start = now;
    }

    pub fn from(&self) -> &T {
        &self.from
    }

    pub fn to(&self) -> &T {
        &self.to
    }

    pub fn start(&self) -> Duration {
        self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_cubic_in_out_shape() {
        let e = Easing::CubicInOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(0.5), 0.5);
        assert_eq!(e.apply(1.0), 1.0);
        assert!(e.apply(0.25) < 0.25);
        assert!(e.apply(0.75) > 0.75);
        assert_eq!(e.apply(2.0), 1.0);
    }

    #[test]
    fn test_tween_progress() {
        let timing = Timing {
            duration: ms(600),
            easing: Easing::Linear,
        };
        let tween = Tween::new(0.0, 60.0, ms(100), timing);
        assert_eq!(tween.value_at(ms(0)), 0.0);
        assert_eq!(tween.value_at(ms(400)), 30.0);
        assert!(!tween.is_finished(ms(699)));
        assert!(tween.is_finished(ms(700)));
        assert_eq!(tween.value_at(ms(5_000)), 60.0);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let timing = Timing {
            duration: ms(100),
            easing: Easing::Linear,
        };
        let mut tween = Tween::new(0.0, 100.0, ms(0), timing);
        tween.retarget(0.0, ms(50));
        assert_eq!(*tween.from(), 50.0);
        assert_eq!(tween.start(), ms(50));
        assert_eq!(tween.value_at(ms(100)), 25.0);
        assert_eq!(tween.value_at(ms(150)), 0.0);
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let timing = Timing {
            duration: Duration::ZERO,
            easing: Easing::CubicInOut,
        };
        let tween = Tween::new(1.0, 2.0, ms(10), timing);
        assert!(tween.is_finished(ms(0)));
        assert_eq!(tween.value_at(ms(0)), 2.0);
    }

    #[test]
    fn test_easing_names() {
        assert_eq!("linear".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!(Easing::CubicInOut.to_string(), "cubic-in-out");
    }
}
