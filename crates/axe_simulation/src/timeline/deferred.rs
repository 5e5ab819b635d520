//! DeferredFlag - one-shot отложенный таймер (armed → fired)
//!
//! Замена host timer callbacks: владелец тикает флаг в своём tick
//! и при `fired` выставляет свой boolean.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeferredFlag {
    remaining: f32,
    armed: bool,
}

impl DeferredFlag {
    /// Взвести (перевзвод сбрасывает оставшееся время)
    pub fn arm(&mut self, delay: f32) {
        self.remaining = delay.max(0.0);
        self.armed = true;
    }

    pub fn clear(&mut self) {
        self.armed = false;
        self.remaining = 0.0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// true ровно один раз - на tick когда время истекло
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.armed {
            return false;
        }
        self.remaining -= dt.max(0.0);
        if self.remaining <= 0.0 {
            self.clear();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_flag_fires_once() {
        let mut flag = DeferredFlag::default();
        assert!(!flag.tick(1.0)); // не взведён

        flag.arm(0.2);
        assert!(flag.is_armed());
        assert!(!flag.tick(0.1));
        assert!(flag.tick(0.15));
        assert!(!flag.is_armed());
        assert!(!flag.tick(0.15)); // повторно не стреляет
    }

    #[test]
    fn test_deferred_flag_clear_cancels() {
        let mut flag = DeferredFlag::default();
        flag.arm(0.2);
        flag.clear();
        assert!(!flag.tick(1.0));
    }
}
