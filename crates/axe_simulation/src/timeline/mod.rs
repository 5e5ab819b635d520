//! Timeline driver - per-tick playback поверх FloatCurve
//!
//! Timeline = явный state object {curve, position, rate, looping, direction}.
//! Владелец вызывает `advance(dt)` каждый tick и сам решает что делать
//! со значением (update) и с `finished` (finish handler).
//!
//! Никаких callbacks внутри: handlers живут в владельце (ThrowingWeapon,
//! PlayerCharacter), timeline только считает playback.

use crate::curve::FloatCurve;

pub mod deferred;

pub use deferred::DeferredFlag;

#[cfg(test)]
mod timeline_tests;

/// Длина timeline без curve (секунды)
pub const DEFAULT_TIMELINE_LENGTH: f32 = 1.0;

/// Направление проигрывания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayDirection {
    #[default]
    Forward,
    Backward,
}

/// Результат одного tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineStep {
    /// Значение curve (или position / length без curve)
    pub value: f32,
    /// Playback position после tick
    pub position: f32,
    /// Non-looping timeline дошёл до конца (true ровно один раз)
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    curve: Option<FloatCurve>,
    default_length: f32,
    position: f32,
    play_rate: f32,
    looping: bool,
    playing: bool,
    direction: PlayDirection,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(DEFAULT_TIMELINE_LENGTH)
    }
}

impl Timeline {
    pub fn new(default_length: f32) -> Self {
        Self {
            curve: None,
            default_length: default_length.max(0.0),
            position: 0.0,
            play_rate: 1.0,
            looping: false,
            playing: false,
            direction: PlayDirection::Forward,
        }
    }

    /// Привязать curve (None = линейная интерполяция по position)
    pub fn set_curve(&mut self, curve: Option<FloatCurve>) {
        self.curve = curve;
    }

    pub fn curve(&self) -> Option<&FloatCurve> {
        self.curve.as_ref()
    }

    /// Отрицательный rate не поддерживается (для обратного хода - reverse)
    pub fn set_play_rate(&mut self, rate: f32) {
        self.play_rate = rate.max(0.0);
    }

    pub fn play_rate(&self) -> f32 {
        self.play_rate
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn direction(&self) -> PlayDirection {
        self.direction
    }

    pub fn playback_position(&self) -> f32 {
        self.position
    }

    /// Длина: duration curve, либо default length
    pub fn length(&self) -> f32 {
        match &self.curve {
            Some(curve) if curve.duration() > 0.0 => curve.duration(),
            _ => self.default_length,
        }
    }

    /// Сброс в 0 и проигрывание вперёд
    pub fn play_from_start(&mut self) {
        self.position = 0.0;
        self.direction = PlayDirection::Forward;
        self.playing = true;
    }

    /// Продолжить вперёд с текущей позиции
    pub fn play(&mut self) {
        self.direction = PlayDirection::Forward;
        self.playing = true;
    }

    /// Продолжить назад с текущей позиции
    pub fn reverse(&mut self) {
        self.direction = PlayDirection::Backward;
        self.playing = true;
    }

    /// Остановить. Возвращает true если timeline играл.
    pub fn stop(&mut self) -> bool {
        let was_playing = self.playing;
        self.playing = false;
        was_playing
    }

    /// Текущее значение (curve в position, либо нормализованная position)
    pub fn value(&self) -> f32 {
        match &self.curve {
            Some(curve) => curve.sample(self.position),
            None => {
                let length = self.length();
                if length > 0.0 {
                    self.position / length
                } else {
                    1.0
                }
            }
        }
    }

    /// Продвинуть playback на `dt * rate`
    ///
    /// None если timeline не играет.
    pub fn advance(&mut self, dt: f32) -> Option<TimelineStep> {
        if !self.playing {
            return None;
        }

        let length = self.length();
        let delta = dt.max(0.0) * self.play_rate;
        let mut finished = false;

        if length <= 0.0 {
            // Вырожденный timeline: заканчивается на первом tick
            self.position = 0.0;
            finished = !self.looping;
        } else {
            match self.direction {
                PlayDirection::Forward => {
                    self.position += delta;
                    if self.position >= length {
                        if self.looping {
                            self.position = self.position.rem_euclid(length);
                        } else {
                            self.position = length;
                            finished = true;
                        }
                    }
                }
                PlayDirection::Backward => {
                    self.position -= delta;
                    if self.position <= 0.0 {
                        if self.looping {
                            self.position = self.position.rem_euclid(length);
                        } else {
                            self.position = 0.0;
                            finished = true;
                        }
                    }
                }
            }
        }

        if finished {
            self.playing = false;
        }

        Some(TimelineStep {
            value: self.value(),
            position: self.position,
            finished,
        })
    }
}
