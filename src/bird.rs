use crate::config::Tuning;
use crate::geometry::Rect;

/// The player. Horizontal position never changes; only `y` moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) velocity: f64,
    /// Visual tilt in degrees, positive = nose up.
    pub(crate) rotation: f64,
}

impl Bird {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            rotation: 0.0,
        }
    }

    pub fn at_start(tuning: &Tuning) -> Self {
        let (x, y) = tuning.bird_start();
        Self::new(x, y)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn jump(&mut self, tuning: &Tuning) {
        self.velocity = tuning.jump_velocity;
        self.rotation = tuning.jump_rotation;
    }

    pub fn update(&mut self, tuning: &Tuning) {
        self.velocity += tuning.gravity;
        self.y += self.velocity;

        // Ease toward nose-up while rising, nose-down while falling
        if self.velocity < 0.0 {
            self.rotation = (self.rotation + tuning.rotation_step).min(tuning.rotation_max);
        } else {
            self.rotation = (self.rotation - tuning.rotation_step).max(tuning.rotation_min);
        }
    }

    /// Sprite bounds.
    pub fn rect(&self, tuning: &Tuning) -> Rect {
        Rect::new(self.x, self.y, tuning.bird_width, tuning.bird_height)
    }

    pub fn hitbox(&self, tuning: &Tuning) -> Rect {
        let inset = tuning.hitbox_inset * 2.0;
        self.rect(tuning).inflate(-inset, -inset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_rest() {
        let bird = Bird::at_start(&Tuning::default());
        assert_eq!(bird.x(), 50.0);
        assert_eq!(bird.y(), 256.0);
        assert_eq!(bird.velocity(), 0.0);
        assert_eq!(bird.rotation(), 0.0);
    }

    #[test]
    fn test_gravity_accumulates() {
        let tuning = Tuning::default();
        let mut bird = Bird::new(50.0, 100.0);
        bird.update(&tuning);
        assert_eq!(bird.velocity(), 0.25);
        assert_eq!(bird.y(), 100.25);
        bird.update(&tuning);
        assert_eq!(bird.velocity(), 0.5);
        assert_eq!(bird.y(), 100.75);
    }

    #[test]
    fn test_jump_sets_velocity_and_rotation() {
        let tuning = Tuning::default();
        let mut bird = Bird::new(50.0, 100.0);
        bird.velocity = 3.0;
        bird.jump(&tuning);
        assert_eq!(bird.velocity(), -6.0);
        assert_eq!(bird.rotation(), 45.0);
    }

    #[test]
    fn test_rotation_capped_while_rising() {
        let tuning = Tuning::default();
        let mut bird = Bird::new(50.0, 200.0);
        bird.jump(&tuning);
        // 45 is above the rising cap, so the first rising frame pulls it to 30
        bird.update(&tuning);
        assert_eq!(bird.rotation(), 30.0);
        bird.update(&tuning);
        assert_eq!(bird.rotation(), 30.0);
    }

    #[test]
    fn test_rotation_eases_down_while_falling() {
        let tuning = Tuning::default();
        let mut bird = Bird::new(50.0, 200.0);
        bird.update(&tuning);
        assert_eq!(bird.rotation(), -3.0);
        for _ in 0..30 {
            bird.update(&tuning);
        }
        assert_eq!(bird.rotation(), -45.0);
    }

    #[test]
    fn test_hitbox_is_inset() {
        let tuning = Tuning::default();
        let bird = Bird::new(50.0, 100.0);
        assert_eq!(bird.rect(&tuning), Rect::new(50.0, 100.0, 34.0, 24.0));
        assert_eq!(bird.hitbox(&tuning), Rect::new(55.0, 105.0, 24.0, 14.0));
    }
}
