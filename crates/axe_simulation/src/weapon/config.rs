//! Tunables throwing weapon + authored curves
//!
//! Author-time конфиг: загружается из RON один раз при спавне,
//! в runtime не меняется. Отсутствующие поля → default значения.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::curve::FloatCurve;

/// Ошибки загрузки конфига
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read weapon config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse weapon config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize weapon config: {0}")]
    Serialize(#[from] ron::Error),

    #[error("invalid weapon config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Диапазон pitch offset (градусы), min ≤ max
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchRange {
    pub min: f32,
    pub max: f32,
}

impl PitchRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Равномерный sample в [min, max]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowingWeaponConfig {
    // === Curves (None = линейная интерполяция) ===
    /// Spin во время полёта
    pub rotation_forward_curve: Option<FloatCurve>,
    /// Flight trace (значение = gravity scale)
    pub throw_trace_curve: Option<FloatCurve>,
    /// Alpha возврата к игроку
    pub return_speed_curve: Option<FloatCurve>,
    /// Покачивание застрявшего weapon
    pub wiggle_curve: Option<FloatCurve>,

    // === Flight ===
    /// Play rate spin timeline
    pub spin_rate: f32,
    /// Градусы pitch на единицу значения spin curve
    pub rotation_multiplier: f32,
    /// Скорость броска (передаётся игроком в throw)
    pub throw_speed: f32,
    /// Насколько впереди камеры weapon стартует
    pub throw_direction_multiplier: f32,
    /// Длина trace луча вдоль forward
    pub trace_probe_distance: f32,
    /// Flight trace timeline зациклен (trace до попадания)
    pub trace_looping: bool,
    /// Z-ускорение projectile (0 = прямая траектория)
    pub projectile_gravity: f32,

    // === Return ===
    /// Множитель скорости возврата
    pub return_speed: f32,
    /// Предел расстояния для расчёта rate
    pub max_calculation_distance: f32,
    /// Расстояние, на котором rate = return_speed
    pub optimal_distance: f32,
    pub return_rate_min: f32,
    pub return_rate_max: f32,
    /// Delay сброса return флага (секунды)
    pub return_delay: f32,

    // === Wiggle ===
    /// Guard повторного wiggle (секунды)
    pub wiggle_delay: f32,
    pub wiggle_rate: f32,
    /// Градусы pitch на единицу wiggle curve
    pub wiggle_pitch_amplitude: f32,

    // === Lodge ===
    /// Offset для почти вертикальных нормалей вниз (потолок)
    pub inclined_pitch_range: PitchRange,
    /// Authoring tunable, в lodge не участвует: нормали вверх всегда
    /// выше порога и получают forced_lodge_pitch
    pub regular_pitch_range: PitchRange,
    /// Pitch нормали выше порога → forced_lodge_pitch
    pub near_vertical_threshold: f32,
    pub forced_lodge_pitch: f32,

    // === Rig ===
    /// Pivot point относительно root
    pub pivot_offset: Vec3,
    /// Lodge point относительно pivot
    pub lodge_point_offset: Vec3,
    /// Длина timeline без curve
    pub default_timeline_length: f32,
}

impl Default for ThrowingWeaponConfig {
    fn default() -> Self {
        Self {
            rotation_forward_curve: None,
            throw_trace_curve: None,
            return_speed_curve: None,
            wiggle_curve: None,

            spin_rate: 1.0,
            rotation_multiplier: -360.0,
            throw_speed: 2500.0,
            throw_direction_multiplier: 100.0,
            trace_probe_distance: 60.0,
            trace_looping: true,
            projectile_gravity: 0.0,

            return_speed: 0.5,
            max_calculation_distance: 3000.0,
            optimal_distance: 1400.0,
            return_rate_min: 0.4,
            return_rate_max: 0.7,
            return_delay: 0.2,

            wiggle_delay: 0.2,
            wiggle_rate: 3.0,
            wiggle_pitch_amplitude: -30.0,

            inclined_pitch_range: PitchRange::new(-45.0, -30.0),
            regular_pitch_range: PitchRange::new(-35.0, -25.0),
            near_vertical_threshold: -80.0,
            forced_lodge_pitch: -90.0,

            pivot_offset: Vec3::ZERO,
            lodge_point_offset: Vec3::new(0.0, 0.0, 20.0),
            default_timeline_length: 1.0,
        }
    }
}

impl ThrowingWeaponConfig {
    /// Parse + validate
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron(&source)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Проверка значений, на которых ломается математика возврата/полёта
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("optimal_distance", self.optimal_distance)?;
        positive("max_calculation_distance", self.max_calculation_distance)?;
        positive("trace_probe_distance", self.trace_probe_distance)?;
        positive("return_rate_min", self.return_rate_min)?;
        positive("default_timeline_length", self.default_timeline_length)?;
        non_negative("spin_rate", self.spin_rate)?;
        non_negative("wiggle_rate", self.wiggle_rate)?;
        non_negative("wiggle_delay", self.wiggle_delay)?;
        non_negative("return_delay", self.return_delay)?;

        if self.return_rate_min > self.return_rate_max {
            return Err(ConfigError::Invalid {
                field: "return_rate_min",
                reason: format!(
                    "min {} exceeds max {}",
                    self.return_rate_min, self.return_rate_max
                ),
            });
        }
        ordered_range("inclined_pitch_range", self.inclined_pitch_range)?;
        ordered_range("regular_pitch_range", self.regular_pitch_range)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected positive value, got {}", value),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected non-negative value, got {}", value),
        })
    }
}

fn ordered_range(field: &'static str, range: PitchRange) -> Result<(), ConfigError> {
    if range.min <= range.max {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("min {} exceeds max {}", range.min, range.max),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_tunables() {
        let config = ThrowingWeaponConfig::default();
        assert_eq!(config.trace_probe_distance, 60.0);
        assert_eq!(config.max_calculation_distance, 3000.0);
        assert_eq!(config.optimal_distance, 1400.0);
        assert_eq!(config.return_rate_min, 0.4);
        assert_eq!(config.return_rate_max, 0.7);
        assert_eq!(config.wiggle_delay, 0.2);
        assert_eq!(config.near_vertical_threshold, -80.0);
        assert_eq!(config.forced_lodge_pitch, -90.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = ThrowingWeaponConfig::from_ron("(return_speed: 0.8, spin_rate: 2.5)").unwrap();
        assert_eq!(config.return_speed, 0.8);
        assert_eq!(config.spin_rate, 2.5);
        assert_eq!(config.optimal_distance, 1400.0);
        assert!(config.return_speed_curve.is_none());
    }

    #[test]
    fn test_ron_roundtrip_keeps_curves() {
        let mut config = ThrowingWeaponConfig::default();
        config.return_speed_curve = Some(FloatCurve::ease_in_out(1.0));

        let text = config.to_ron().unwrap();
        let parsed = ThrowingWeaponConfig::from_ron(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_inverted_rate_bounds_rejected() {
        let result = ThrowingWeaponConfig::from_ron("(return_rate_min: 0.9, return_rate_max: 0.7)");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "return_rate_min", .. })
        ));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = ThrowingWeaponConfig::from_ron("(spin_rate: \"fast\")");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_pitch_range_sample_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let range = PitchRange::new(-45.0, -30.0);
        for _ in 0..100 {
            assert!(range.contains(range.sample(&mut rng)));
        }
        assert_eq!(PitchRange::new(-10.0, -10.0).sample(&mut rng), -10.0);
    }
}
