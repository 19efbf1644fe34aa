//! Per-frame game logic: spawning, scrolling, scoring and collisions.

use crate::bird::Bird;
use crate::config::Tuning;
use crate::pipe::Pipe;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Discrete player inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Flap, or restart after a crash.
    Jump,
    Quit,
}

/// What the frame driver should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct GameState {
    tuning: Tuning,
    rng: StdRng,
    bird: Bird,
    pipes: Vec<Pipe>,
    score: u32,
    game_over: bool,
    last_spawn_ms: u64,
}

impl GameState {
    /// Start playing at `now_ms`. A `seed` makes pipe layouts reproducible.
    pub fn new(tuning: Tuning, seed: Option<u64>, now_ms: u64) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            bird: Bird::at_start(&tuning),
            tuning,
            rng,
            pipes: Vec::new(),
            score: 0,
            game_over: false,
            last_spawn_ms: now_ms,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    /// Pipes in spawn order, which is also left-to-right order.
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.bird = Bird::at_start(&self.tuning);
        self.pipes.clear();
        self.score = 0;
        self.game_over = false;
        self.last_spawn_ms = now_ms;
        info!("new round at {now_ms}ms");
    }

    pub fn handle_input(&mut self, input: Input, now_ms: u64) -> Flow {
        match input {
            Input::Jump => {
                if self.game_over {
                    self.reset(now_ms);
                } else {
                    self.bird.jump(&self.tuning);
                }
                Flow::Continue
            }
            Input::Quit => Flow::Quit,
        }
    }

    pub fn spawn_if_due(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_spawn_ms) > self.tuning.spawn_interval_ms {
            let pipe = Pipe::new(self.tuning.field_width, &self.tuning, &mut self.rng);
            debug!("spawned pipe with gap center {}", pipe.gap_center());
            self.pipes.push(pipe);
            self.last_spawn_ms = now_ms;
        }
    }

    /// Advance one frame. Does nothing once the round is over.
    pub fn update(&mut self, now_ms: u64) {
        if self.game_over {
            return;
        }

        self.bird.update(&self.tuning);
        self.spawn_if_due(now_ms);

        let despawn_x = self.tuning.pipe_despawn_x;
        self.pipes.retain(|p| p.x > despawn_x);

        let bird_x = self.bird.x;
        for pipe in &mut self.pipes {
            pipe.update(&self.tuning);
            if !pipe.scored && bird_x > pipe.midpoint() {
                pipe.scored = true;
                self.score += 1;
                debug!("score {}", self.score);
            }
        }

        self.check_collisions();
    }

    pub fn check_collisions(&mut self) {
        let floor = self.tuning.floor_y();
        if self.bird.y >= floor {
            self.bird.y = floor;
            self.game_over = true;
        } else if self.bird.y <= 0.0 {
            self.bird.y = 0.0;
            self.game_over = true;
        }

        let hitbox = self.bird.hitbox(&self.tuning);
        if self
            .pipes
            .iter()
            .any(|p| p.top_rect().intersects(&hitbox) || p.bottom_rect().intersects(&hitbox))
        {
            self.game_over = true;
        }

        if self.game_over {
            info!("game over with score {}", self.score);
        }
    }
}
