//! Particle burst shown over the results view on a new personal best.

use rand::Rng;
use std::time::{Duration, Instant};

pub const BANNER_TEXT: &str = "NEW BEST!";
const SPARKS: [char; 8] = ['*', '+', '#', '%', '@', '~', '^', '!'];
const SPARK_COUNT: usize = 30;
const GRAVITY: f64 = 15.0;
/// Animation advances in fixed steps, one per tick
const STEP_SECS: f64 = 0.1;
const OFF_SCREEN_SLACK: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    /// Letter of the banner; homes in on its slot instead of falling
    pub target: Option<(f64, f64)>,
}

impl Particle {
    fn spark<R: Rng + ?Sized>(rng: &mut R, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: SPARKS[rng.gen_range(0..SPARKS.len())],
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.0..4.0),
            target: None,
        }
    }

    fn letter<R: Rng + ?Sized>(
        rng: &mut R,
        from: (f64, f64),
        to: (f64, f64),
        symbol: char,
    ) -> Self {
        Self {
            x: from.0,
            y: from.1,
            vel_x: to.0 - from.0,
            vel_y: to.1 - from.1,
            symbol,
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(3.0..5.0),
            target: Some(to),
        }
    }

    pub fn is_letter(&self) -> bool {
        self.target.is_some()
    }

    /// Returns false once the particle has burned out
    fn update(&mut self, dt: f64) -> bool {
        match self.target {
            Some((tx, ty)) => {
                let dist = ((tx - self.x).powi(2) + (ty - self.y).powi(2)).sqrt();
                if dist > 1.0 {
                    self.x += self.vel_x * dt;
                    self.y += self.vel_y * dt;
                    self.vel_x *= 0.95;
                    self.vel_y *= 0.95;
                } else {
                    self.x = tx;
                    self.y = ty;
                    self.vel_x = 0.0;
                    self.vel_y = 0.0;
                }
            }
            None => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += GRAVITY * dt;
            }
        }
        self.age += dt;
        self.age < self.max_age
    }

    /// 1.0 when fresh, 0.0 when burned out
    pub fn brightness(&self) -> f64 {
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<Particle>,
    started_at: Option<Instant>,
    duration: Duration,
    width: f64,
    height: f64,
}

impl CelebrationAnimation {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            started_at: None,
            duration: Duration::from_secs(3),
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start(&mut self, width: u16, height: u16, now: Instant) {
        let mut rng = rand::thread_rng();
        self.particles.clear();
        self.started_at = Some(now);
        self.width = width as f64;
        self.height = height as f64;

        let cx = self.width / 2.0;
        let cy = self.height / 2.0;

        let spacing = 2.0;
        let left = cx - (BANNER_TEXT.chars().count() as f64 - 1.0) * spacing / 2.0;
        for (i, ch) in BANNER_TEXT.chars().enumerate().filter(|(_, c)| *c != ' ') {
            let from = (cx + rng.gen_range(-10.0..10.0), cy + rng.gen_range(-5.0..5.0));
            let to = (left + i as f64 * spacing, cy - 2.0);
            self.particles.push(Particle::letter(&mut rng, from, to, ch));
        }

        for _ in 0..SPARK_COUNT {
            let x = cx + rng.gen_range(-15.0..15.0);
            let y = cy + rng.gen_range(-8.0..8.0);
            self.particles.push(Particle::spark(&mut rng, x, y));
        }
    }

    pub fn stop(&mut self) {
        self.started_at = None;
        self.particles.clear();
    }

    /// Advances one frame; ends the animation once its duration has passed
    pub fn update(&mut self, now: Instant) {
        let Some(started) = self.started_at else {
            return;
        };
        if now.saturating_duration_since(started) >= self.duration {
            self.stop();
            return;
        }

        let (w, h) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(STEP_SECS);
            if p.is_letter() {
                return alive;
            }
            let off_screen =
                p.y > h + OFF_SCREEN_SLACK || p.x < -OFF_SCREEN_SLACK || p.x > w + OFF_SCREEN_SLACK;
            alive && !off_screen
        });
    }
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new()
    }
}
