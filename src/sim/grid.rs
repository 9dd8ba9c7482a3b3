//! Discrete grid engine: a directional actor that grows on targets

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use crate::policy::Tuned;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in grid space (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Snake tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    pub grid_size: i32,
    pub start: IVec2,
    pub start_heading: Direction,
    /// Target for the very first round; later targets are random
    pub first_target: IVec2,
    pub target_points: u32,
    /// Tick interval at score 0 (ms)
    pub base_interval_ms: u32,
    /// Interval reduction per `speedup_every` points (ms)
    pub speedup_ms: u32,
    pub speedup_every: u32,
    pub min_interval_ms: u32,
    /// Walls wrap and the body can cross itself
    pub forgiving: Tuned<bool>,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            start: IVec2::new(10, 10),
            start_heading: Direction::Right,
            first_target: IVec2::new(15, 10),
            target_points: 10,
            base_interval_ms: 150,
            speedup_ms: 10,
            speedup_every: 50,
            min_interval_ms: 50,
            forgiving: Tuned::new(false, true),
        }
    }
}

impl SnakeConfig {
    /// Tick interval in seconds for the current score
    pub fn interval_secs(&self, score: u64) -> f32 {
        let steps = score / u64::from(self.speedup_every.max(1));
        let cut = steps.saturating_mul(u64::from(self.speedup_ms));
        let ms = u64::from(self.base_interval_ms)
            .saturating_sub(cut)
            .max(u64::from(self.min_interval_ms));
        ms as f32 / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    /// Occupied cells, head first
    pub body: VecDeque<IVec2>,
    /// Direction of the last completed move
    pub heading: Direction,
    /// Direction the next move will take
    pub queued: Direction,
    pub target: IVec2,
}

impl SnakeState {
    pub fn new(config: &SnakeConfig) -> Self {
        Self {
            body: VecDeque::from([config.start]),
            heading: config.start_heading,
            queued: config.start_heading,
            target: config.first_target,
        }
    }

    #[inline]
    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Queue a turn. Reversing the current heading is ignored.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.heading.opposite() {
            log::debug!("Ignoring reversal {:?} -> {:?}", self.heading, direction);
            return false;
        }
        self.queued = direction;
        true
    }
}

#[inline]
fn in_grid(cell: IVec2, size: i32) -> bool {
    cell.x >= 0 && cell.y >= 0 && cell.x < size && cell.y < size
}

/// Uniformly random free cell, drawn from an explicit free list.
/// `None` when every cell is occupied.
pub fn respawn_target<'a>(
    occupied: impl IntoIterator<Item = &'a IVec2>,
    grid_size: i32,
    rng: &mut impl Rng,
) -> Option<IVec2> {
    let size = grid_size.max(0) as usize;
    let mut taken = vec![false; size * size];
    for cell in occupied {
        if in_grid(*cell, grid_size) {
            taken[cell.y as usize * size + cell.x as usize] = true;
        }
    }
    let free: Vec<usize> = (0..size * size).filter(|&i| !taken[i]).collect();
    if free.is_empty() {
        return None;
    }
    let pick = free[rng.random_range(0..free.len())];
    Some(IVec2::new((pick % size) as i32, (pick / size) as i32))
}

/// Advance one tick
pub fn step(
    prev: &SnakeState,
    config: &SnakeConfig,
    privileged: bool,
    rng: &mut impl Rng,
) -> (SnakeState, Vec<GameEvent>) {
    let mut events = Vec::new();
    let size = config.grid_size;
    let forgiving = config.forgiving.pick(privileged);

    let mut head = prev.head() + prev.queued.delta();
    if !in_grid(head, size) {
        if size > 0 && forgiving {
            head = IVec2::new(head.x.rem_euclid(size), head.y.rem_euclid(size));
        } else {
            events.push(GameEvent::Crashed);
            return (prev.clone(), events);
        }
    }

    let grows = head == prev.target;
    if !forgiving {
        // The tail moves out of the way unless this move grows
        let checked = if grows { prev.len() } else { prev.len() - 1 };
        if prev.body.iter().take(checked).any(|&c| c == head) {
            events.push(GameEvent::Crashed);
            return (prev.clone(), events);
        }
    }

    let mut next = prev.clone();
    next.heading = prev.queued;
    next.body.push_front(head);
    if grows {
        events.push(GameEvent::Scored(config.target_points));
        match respawn_target(next.body.iter(), size, rng) {
            Some(target) => next.target = target,
            None => events.push(GameEvent::Won),
        }
    } else {
        next.body.pop_back();
    }

    (next, events)
}
