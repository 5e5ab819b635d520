//! Float curves - authored interpolation curves для timelines
//!
//! Curve = набор ключей (time, value), отсортированных по time.
//! Timeline сэмплирует curve по playback position каждый tick.
//!
//! Curves read-only в runtime (авторятся в RON вместе с weapon config).

use serde::{Deserialize, Serialize};

/// Ключ curve: значение `value` в момент `time` (секунды)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Режим интерполяции между соседними ключами
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurveInterpolation {
    #[default]
    Linear,
    /// Ступенька: значение левого ключа до следующего ключа
    Constant,
    /// Smoothstep между ключами (плоские касательные на ключах)
    Cubic,
}

/// Float curve (аналог authored curve asset)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FloatCurve {
    keys: Vec<CurveKey>,
    #[serde(default)]
    interpolation: CurveInterpolation,
}

impl FloatCurve {
    /// Создать curve из ключей (сортирует по time)
    pub fn from_keys(mut keys: Vec<CurveKey>, interpolation: CurveInterpolation) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys, interpolation }
    }

    /// 0 → 1 линейно за `duration` секунд
    pub fn linear(duration: f32) -> Self {
        Self::from_keys(
            vec![CurveKey::new(0.0, 0.0), CurveKey::new(duration, 1.0)],
            CurveInterpolation::Linear,
        )
    }

    /// 0 → 1 с плавным стартом и финишем
    pub fn ease_in_out(duration: f32) -> Self {
        Self::from_keys(
            vec![CurveKey::new(0.0, 0.0), CurveKey::new(duration, 1.0)],
            CurveInterpolation::Cubic,
        )
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn interpolation(&self) -> CurveInterpolation {
        self.interpolation
    }

    /// Время последнего ключа (0 для пустой curve)
    pub fn duration(&self) -> f32 {
        self.keys.last().map(|k| k.time).unwrap_or(0.0)
    }

    /// Значение curve в момент `time`
    ///
    /// До первого ключа → первое значение, после последнего → последнее.
    /// Пустая curve → 0.
    pub fn sample(&self, time: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // Первый ключ строго правее time (существует: time < last.time)
        let right_index = self.keys.partition_point(|k| k.time <= time);
        let left = self.keys[right_index - 1];
        let right = self.keys[right_index];

        let span = right.time - left.time;
        if span <= f32::EPSILON {
            return right.value;
        }
        let t = (time - left.time) / span;

        match self.interpolation {
            CurveInterpolation::Linear => left.value + (right.value - left.value) * t,
            CurveInterpolation::Constant => left.value,
            CurveInterpolation::Cubic => {
                let eased = t * t * (3.0 - 2.0 * t);
                left.value + (right.value - left.value) * eased
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_curve_samples_zero() {
        let curve = FloatCurve::default();
        assert_eq!(curve.sample(0.5), 0.0);
        assert_eq!(curve.duration(), 0.0);
    }

    #[test]
    fn test_linear_curve_midpoint() {
        let curve = FloatCurve::linear(2.0);
        assert_eq!(curve.sample(1.0), 0.5);
        assert_eq!(curve.duration(), 2.0);
    }

    #[test]
    fn test_sample_clamps_outside_keys() {
        let curve = FloatCurve::from_keys(
            vec![CurveKey::new(0.5, 2.0), CurveKey::new(1.0, 4.0)],
            CurveInterpolation::Linear,
        );
        assert_eq!(curve.sample(0.0), 2.0);
        assert_eq!(curve.sample(3.0), 4.0);
    }

    #[test]
    fn test_keys_sorted_on_construction() {
        let curve = FloatCurve::from_keys(
            vec![CurveKey::new(1.0, 1.0), CurveKey::new(0.0, 0.0), CurveKey::new(0.5, 0.8)],
            CurveInterpolation::Linear,
        );
        assert_eq!(curve.keys()[0].time, 0.0);
        assert_eq!(curve.keys()[2].time, 1.0);
        // Между ключами 0.0 и 0.5
        assert!((curve.sample(0.25) - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_constant_interpolation_holds_left_value() {
        let curve = FloatCurve::from_keys(
            vec![CurveKey::new(0.0, 1.0), CurveKey::new(1.0, 5.0)],
            CurveInterpolation::Constant,
        );
        assert_eq!(curve.sample(0.99), 1.0);
        assert_eq!(curve.sample(1.0), 5.0);
    }

    #[test]
    fn test_cubic_is_eased() {
        let curve = FloatCurve::ease_in_out(1.0);
        assert_eq!(curve.sample(0.5), 0.5);
        // Медленный старт
        assert!(curve.sample(0.1) < 0.1);
        // Медленный финиш
        assert!(curve.sample(0.9) > 0.9);
    }
}
