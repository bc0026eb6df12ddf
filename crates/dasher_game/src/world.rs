//! Complete simulation state for one run and its per-step update.
//!
//! `World` is a plain `Copy` value. `update` consumes the previous state and
//! returns the next one; nothing here touches the window, the GPU or the
//! clock, so whole runs can be replayed headless.

use dasher_core::{advance, SpriteAnim};
use glam::Vec2;

use crate::assets::{TextureId, TextureSizes};
use crate::collision::first_hit;
use crate::config::GameConfig;
use crate::controller::{ControllerConfig, ControllerInput, Runner};
use crate::parallax::ParallaxLayer;

pub const OBSTACLE_COUNT: usize = 3;
pub const LAYER_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameInput {
    /// Jump was freshly pressed since the previous step.
    pub jump_pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World {
    pub config: GameConfig,
    pub player: Runner,
    pub obstacles: [SpriteAnim; OBSTACLE_COUNT],
    /// Background, midground, foreground.
    pub layers: [ParallaxLayer; LAYER_COUNT],
    /// x coordinate the player must reach to win; scrolls with the obstacles.
    pub finish_line: f32,
    /// Latched on the first obstacle hit and never cleared within a run.
    pub collided: bool,
}

impl World {
    pub fn new(config: GameConfig, sizes: &TextureSizes) -> Self {
        let window_width = config.window_width as f32;
        let window_height = config.window_height as f32;

        let (player_sheet_w, player_sheet_h) = sizes.get(TextureId::Player);
        let player_w = (player_sheet_w / config.player_sheet_columns) as f32;
        let player_h = player_sheet_h as f32;
        let player = Runner::new(SpriteAnim::new(
            player_w,
            player_h,
            Vec2::new(window_width / 2.0 - player_w / 2.0, window_height - player_h),
            config.player_frame_time,
        ));

        let (obstacle_sheet_w, obstacle_sheet_h) = sizes.get(TextureId::Obstacle);
        let obstacle_w = (obstacle_sheet_w / config.obstacle_sheet_columns) as f32;
        let obstacle_h = (obstacle_sheet_h / config.obstacle_sheet_rows) as f32;
        let obstacles: [SpriteAnim; OBSTACLE_COUNT] = std::array::from_fn(|i| {
            SpriteAnim::new(
                obstacle_w,
                obstacle_h,
                Vec2::new(
                    window_width + i as f32 * config.obstacle_spacing,
                    window_height - obstacle_h,
                ),
                config.obstacle_frame_time,
            )
        });
        let finish_line = obstacles[OBSTACLE_COUNT - 1].position.x;

        let layers: [ParallaxLayer; LAYER_COUNT] = std::array::from_fn(|i| {
            ParallaxLayer::new(
                config.layer_speeds[i],
                sizes.get(TextureId::LAYERS[i]).0,
                config.layer_scale,
            )
        });

        Self {
            config,
            player,
            obstacles,
            layers,
            finish_line,
            collided: false,
        }
    }

    pub fn ground_y(&self) -> f32 {
        self.config.window_height as f32 - self.player.sprite.source.height
    }

    fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            gravity: self.config.gravity,
            jump_velocity: self.config.jump_velocity,
            ground_y: self.ground_y(),
        }
    }

    /// Signed distance the finish line still has to travel to reach the player.
    pub fn finish_distance(&self) -> f32 {
        self.finish_line - self.player.sprite.position.x
    }

    /// Advance one step. The simulation keeps running after a hit or a win;
    /// only the collision flag latches.
    pub fn update(self, input: GameInput, dt: f32) -> World {
        let config = self.config;
        let mut next = self;

        for layer in &mut next.layers {
            *layer = layer.advance(dt);
        }

        next.player = next.player.step(
            ControllerInput {
                jump_pressed: input.jump_pressed,
            },
            dt,
            &self.controller_config(),
        );

        for obstacle in &mut next.obstacles {
            obstacle.position.x += config.obstacle_velocity * dt;
        }
        next.finish_line += config.obstacle_velocity * dt;

        if !next.player.airborne {
            next.player.sprite = advance(next.player.sprite, dt, config.player_max_frame);
        }
        for obstacle in &mut next.obstacles {
            *obstacle = advance(*obstacle, dt, config.obstacle_max_frame);
        }

        let player_bounds = next.player.sprite.bounds();
        if let Some(index) = first_hit(&player_bounds, &next.obstacles, config.obstacle_inset) {
            if !next.collided {
                log::debug!(
                    "Obstacle {} hit at x={:.1}, player y={:.1}",
                    index,
                    next.obstacles[index].position.x,
                    next.player.sprite.position.y
                );
            }
            next.collided = true;
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn world() -> World {
        World::new(GameConfig::default(), &TextureSizes::default())
    }

    fn run_idle(mut world: World, steps: usize) -> World {
        for _ in 0..steps {
            world = world.update(GameInput::default(), DT);
        }
        world
    }

    #[test]
    fn initial_layout_matches_window() {
        let world = world();
        assert_eq!(world.player.sprite.position, Vec2::new(192.0, 252.0));
        assert_eq!(world.player.sprite.source.width, 128.0);
        assert_eq!(world.ground_y(), 252.0);

        let xs: Vec<f32> = world.obstacles.iter().map(|o| o.position.x).collect();
        assert_eq!(xs, vec![512.0, 812.0, 1112.0]);
        for obstacle in &world.obstacles {
            assert_eq!(obstacle.position.y, 280.0);
            assert_eq!(obstacle.source.width, 100.0);
            assert_eq!(obstacle.source.height, 100.0);
        }
        assert_eq!(world.finish_line, 1112.0);
        assert_eq!(world.layers[0].wrap_width, 512.0);
        assert_eq!(world.layers[2].wrap_width, 704.0);
        assert!(!world.collided);
    }

    #[test]
    fn one_second_step_moves_obstacles_and_finish_line() {
        let next = world().update(GameInput::default(), 1.0);

        let xs: Vec<f32> = next.obstacles.iter().map(|o| o.position.x).collect();
        assert_eq!(xs, vec![312.0, 612.0, 912.0]);
        assert_eq!(next.finish_line, 912.0);
        assert!(!next.collided);

        assert_eq!(next.layers[0].offset, -20.0);
        assert_eq!(next.layers[1].offset, -40.0);
        assert_eq!(next.layers[2].offset, -80.0);
    }

    #[test]
    fn idle_run_hits_the_first_obstacle() {
        let before = run_idle(world(), 72);
        assert!(!before.collided, "hitbox centre is still right of the player");

        let after = before.update(GameInput::default(), DT);
        assert!(after.collided);
    }

    #[test]
    fn collision_flag_latches() {
        let mut world = run_idle(world(), 80);
        assert!(world.collided);
        for _ in 0..600 {
            world = world.update(GameInput::default(), DT);
            assert!(world.collided);
        }
        assert!(world.obstacles.iter().all(|o| o.position.x < 0.0));
    }

    #[test]
    fn jump_sets_exact_impulse() {
        let next = world().update(GameInput { jump_pressed: true }, DT);
        assert_eq!(next.player.velocity_y, -600.0);
        assert!(next.player.sprite.position.y < 252.0);

        let after = next.update(GameInput::default(), DT);
        assert!(after.player.airborne);
    }

    #[test]
    fn player_animation_freezes_in_the_air() {
        let mut world = world().update(GameInput { jump_pressed: true }, DT);
        world = world.update(GameInput::default(), DT);
        let frame = world.player.sprite.frame;
        let running_time = world.player.sprite.running_time;
        let obstacle_frame = world.obstacles[0].frame;

        // 31 steps of 1/60 s cross the 1/16 s obstacle timer every 4th step.
        for _ in 0..29 {
            world = world.update(GameInput::default(), DT);
            assert!(world.player.airborne);
        }
        assert_eq!(world.player.sprite.frame, frame);
        assert_eq!(world.player.sprite.running_time, running_time);
        assert_eq!(obstacle_frame, 0);
        assert_eq!(world.obstacles[0].frame, 7);
    }

    #[test]
    fn frames_stay_within_sheet() {
        let mut world = world();
        for step in 0..1000 {
            let input = GameInput {
                jump_pressed: step % 97 == 0,
            };
            world = world.update(input, DT);
            assert!(world.player.sprite.frame <= world.config.player_max_frame);
            for obstacle in &world.obstacles {
                assert!(obstacle.frame <= world.config.obstacle_max_frame);
                assert!(obstacle.source.x < 800.0);
            }
        }
    }

    #[test]
    fn finish_line_tracks_last_obstacle() {
        let world = run_idle(world(), 123);
        assert_eq!(world.finish_line, world.obstacles[OBSTACLE_COUNT - 1].position.x);
        assert!((world.finish_distance() - (world.finish_line - 192.0)).abs() < 1e-4);
    }

    #[test]
    fn custom_tuning_changes_layout() {
        let config = GameConfig {
            obstacle_spacing: 150.0,
            ..GameConfig::default()
        };
        let world = World::new(config, &TextureSizes::default());
        assert_eq!(world.obstacles[1].position.x, 662.0);
        assert_eq!(world.finish_line, 812.0);
    }
}
