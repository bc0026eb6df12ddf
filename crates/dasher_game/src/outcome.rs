use std::fmt;

use dasher_devtools::Banner;

use crate::config::GameConfig;
use crate::world::World;

const BANNER_FONT_SIZE: f32 = 40.0;
const BANNER_COLOR: [u8; 4] = [230, 41, 55, 255];

/// What the present phase shows for a given world state. Derived on demand,
/// never stored in `World`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    GameOver,
    Won,
}

impl Outcome {
    /// A latched collision outranks reaching the finish line.
    pub fn of(world: &World) -> Self {
        if world.collided {
            Outcome::GameOver
        } else if world.player.sprite.position.x >= world.finish_line {
            Outcome::Won
        } else {
            Outcome::Running
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Running => "Running",
            Outcome::GameOver => "Game Over",
            Outcome::Won => "You Win",
        }
    }

    pub fn shows_sprites(self) -> bool {
        self == Outcome::Running
    }

    pub fn banner(self, config: &GameConfig) -> Option<Banner> {
        let text = match self {
            Outcome::Running => return None,
            Outcome::GameOver => "Game Over!",
            Outcome::Won => "You Win!",
        };
        Some(Banner {
            text: text.to_string(),
            position: (
                config.window_width as f32 / 4.0,
                config.window_height as f32 / 2.0,
            ),
            font_size: BANNER_FONT_SIZE,
            color: BANNER_COLOR,
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureSizes;

    fn world() -> World {
        World::new(GameConfig::default(), &TextureSizes::default())
    }

    #[test]
    fn fresh_world_is_running_without_banner() {
        let world = world();
        assert_eq!(Outcome::of(&world), Outcome::Running);
        assert!(Outcome::Running.shows_sprites());
        assert_eq!(Outcome::Running.banner(&world.config), None);
    }

    #[test]
    fn collision_means_game_over() {
        let mut world = world();
        world.collided = true;
        assert_eq!(Outcome::of(&world), Outcome::GameOver);

        let banner = Outcome::GameOver
            .banner(&world.config)
            .expect("game over shows a banner");
        assert_eq!(banner.text, "Game Over!");
        assert_eq!(banner.position, (128.0, 190.0));
        assert_eq!(banner.font_size, 40.0);
    }

    #[test]
    fn passing_finish_line_wins_and_hides_sprites() {
        let mut world = world();
        world.finish_line = 150.0;
        let outcome = Outcome::of(&world);
        assert_eq!(outcome, Outcome::Won);
        assert!(!outcome.shows_sprites());
        assert_eq!(
            outcome.banner(&world.config).map(|b| b.text),
            Some("You Win!".to_string())
        );
    }

    #[test]
    fn finish_line_exactly_at_player_wins() {
        let mut world = world();
        world.finish_line = world.player.sprite.position.x;
        assert_eq!(Outcome::of(&world), Outcome::Won);
    }

    #[test]
    fn collision_outranks_win() {
        let mut world = world();
        world.finish_line = 0.0;
        world.collided = true;
        assert_eq!(Outcome::of(&world), Outcome::GameOver);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(Outcome::GameOver.to_string(), "Game Over");
        assert_eq!(Outcome::Won.to_string(), "You Win");
    }
}
