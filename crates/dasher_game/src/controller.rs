use dasher_core::SpriteAnim;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerInput {
    pub jump_pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub gravity: f32,
    pub jump_velocity: f32,
    /// Sprite top y at which the runner is standing on the floor.
    pub ground_y: f32,
}

/// Vertical-only runner. The horizontal position never changes; the world
/// scrolls past it instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Runner {
    pub sprite: SpriteAnim,
    pub velocity_y: f32,
    pub airborne: bool,
}

impl Runner {
    pub fn new(sprite: SpriteAnim) -> Self {
        Self {
            sprite,
            velocity_y: 0.0,
            airborne: false,
        }
    }

    pub fn step(mut self, input: ControllerInput, dt: f32, config: &ControllerConfig) -> Self {
        // At or below the floor line counts as grounded. Depending on gravity
        // and step size the landing step can end below the line; snap back to it.
        if self.sprite.position.y >= config.ground_y {
            self.sprite.position.y = config.ground_y;
            self.velocity_y = 0.0;
            self.airborne = false;
        } else {
            self.velocity_y += config.gravity * dt;
            self.airborne = true;
        }

        if input.jump_pressed && !self.airborne {
            self.velocity_y += config.jump_velocity;
        }

        self.sprite.position.y += self.velocity_y * dt;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn config() -> ControllerConfig {
        ControllerConfig {
            gravity: 1000.0,
            jump_velocity: -600.0,
            ground_y: 252.0,
        }
    }

    fn grounded_runner() -> Runner {
        Runner::new(SpriteAnim::new(
            128.0,
            128.0,
            Vec2::new(192.0, 252.0),
            1.0 / 12.0,
        ))
    }

    #[test]
    fn idle_on_ground_stays_put() {
        let mut runner = grounded_runner();
        for _ in 0..30 {
            runner = runner.step(ControllerInput::default(), DT, &config());
        }
        assert_eq!(runner.sprite.position.y, 252.0);
        assert_eq!(runner.velocity_y, 0.0);
        assert!(!runner.airborne);
    }

    #[test]
    fn jump_from_ground_applies_impulse_before_moving() {
        let runner = grounded_runner().step(ControllerInput { jump_pressed: true }, DT, &config());
        assert_eq!(runner.velocity_y, -600.0);
        assert!(!runner.airborne, "airborne is decided before the impulse");
        assert!((runner.sprite.position.y - (252.0 - 10.0)).abs() < 1e-3);

        let next = runner.step(ControllerInput::default(), DT, &config());
        assert!(next.airborne);
        assert!((next.velocity_y - (-600.0 + 1000.0 * DT)).abs() < 1e-3);
    }

    #[test]
    fn jump_is_ignored_while_airborne() {
        let mut runner = grounded_runner().step(ControllerInput { jump_pressed: true }, DT, &config());
        runner = runner.step(ControllerInput::default(), DT, &config());
        let before = runner.velocity_y;

        let after = runner.step(ControllerInput { jump_pressed: true }, DT, &config());
        assert!(after.airborne);
        assert!((after.velocity_y - (before + 1000.0 * DT)).abs() < 1e-3);
    }

    #[test]
    fn jump_arc_returns_to_the_floor() {
        let mut runner = grounded_runner().step(ControllerInput { jump_pressed: true }, DT, &config());
        let mut peak = runner.sprite.position.y;
        let mut steps = 0;
        while runner.sprite.position.y < 252.0 {
            runner = runner.step(ControllerInput::default(), DT, &config());
            peak = peak.min(runner.sprite.position.y);
            steps += 1;
            assert!(steps < 200, "runner never landed");
        }
        // v^2 / 2g = 180 units above the floor, give or take integration error.
        assert!(peak < 252.0 - 160.0 && peak > 252.0 - 200.0, "peak {peak}");
        // Roughly 2 * 600 / 1000 = 1.2 s in the air.
        assert!((65..=80).contains(&steps), "air steps {steps}");

        let landed = runner.step(ControllerInput::default(), DT, &config());
        assert!(!landed.airborne);
        assert_eq!(landed.velocity_y, 0.0);
        assert_eq!(landed.sprite.position.y, 252.0);
    }

    #[test]
    fn overshooting_landing_snaps_before_next_jump() {
        // Heavier gravity makes the landing step end below the floor.
        let heavy = ControllerConfig {
            gravity: 1100.0,
            ..config()
        };
        let mut runner = grounded_runner().step(ControllerInput { jump_pressed: true }, DT, &heavy);
        let mut steps = 0;
        while runner.sprite.position.y < 252.0 {
            runner = runner.step(ControllerInput::default(), DT, &heavy);
            steps += 1;
            assert!(steps < 200, "runner never landed");
        }
        assert!(runner.sprite.position.y > 253.0, "landed at {}", runner.sprite.position.y);

        let jumped = runner.step(ControllerInput { jump_pressed: true }, DT, &heavy);
        assert!(!jumped.airborne);
        assert_eq!(jumped.velocity_y, -600.0);
        assert!((jumped.sprite.position.y - 242.0).abs() < 1e-3);

        let next = jumped.step(ControllerInput::default(), DT, &heavy);
        assert!(next.airborne);
        assert!(next.sprite.position.y < 242.0);
    }

    #[test]
    fn below_the_floor_counts_as_grounded() {
        let mut runner = grounded_runner();
        runner.sprite.position.y = 260.0;
        runner.velocity_y = 300.0;

        let next = runner.step(ControllerInput { jump_pressed: true }, DT, &config());
        assert!(!next.airborne);
        assert_eq!(next.velocity_y, -600.0);
        assert!((next.sprite.position.y - 242.0).abs() < 1e-3);
    }
}
