//! Relocation state machine for the hidden ghost.

use super::InquiredSet;
use crate::model::cell::Cell;
use crate::model::grid::Grid;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

pub const DEFAULT_MOVEMENT_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverState {
    /// No relocation pending.
    Stationary,
    /// Threshold met; the relocation resolves within the same evaluation.
    Eligible,
    /// No moves left. Terminal.
    Exhausted,
}

/// Which cells a relocating ghost may land on. The current cell is always excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocationPolicy {
    /// Uniform over every other cell.
    AnyOther,
    /// Prefer cells neither inquired nor next to an inquired cell, falling back
    /// to any other cell when no such cell remains.
    #[default]
    AvoidProbed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub from: Cell,
    pub to: Cell,
    pub moves_left: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GhostMover {
    position: Cell,
    moves_left: u32,
    threshold: f64,
    policy: RelocationPolicy,
    state: MoverState,
}

impl GhostMover {
    pub fn new(position: Cell, moves_left: u32, threshold: f64, policy: RelocationPolicy) -> Self {
        Self {
            position,
            moves_left,
            threshold,
            policy,
            state: if moves_left == 0 {
                MoverState::Exhausted
            } else {
                MoverState::Stationary
            },
        }
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn state(&self) -> MoverState {
        self.state
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn policy(&self) -> RelocationPolicy {
        self.policy
    }

    /// Runs after every inquiry. Relocates the ghost once the inquired share of
    /// its neighbourhood reaches the threshold and moves remain.
    pub fn evaluate<R: Rng + ?Sized>(
        &mut self,
        grid: Grid,
        inquired: &mut InquiredSet,
        rng: &mut R,
    ) -> Option<Relocation> {
        if self.state == MoverState::Exhausted {
            return None;
        }

        let fraction = inquired.neighbor_fraction(grid, self.position);
        if fraction < self.threshold {
            self.state = MoverState::Stationary;
            return None;
        }

        self.state = MoverState::Eligible;
        let candidates = self.candidates(grid, inquired);
        let Some(target) = candidates.choose(rng).copied() else {
            self.state = MoverState::Stationary;
            return None;
        };

        let from = self.position;
        self.position = target;
        self.moves_left -= 1;
        inquired.clear_adjacency();

        event!(
            target: "ghostbuster_core::ghost",
            Level::INFO,
            from = %from,
            to = %target,
            moves_left = self.moves_left,
            fraction,
            "ghost relocated"
        );

        self.state = if self.moves_left == 0 {
            event!(target: "ghostbuster_core::ghost", Level::INFO, "ghost movement exhausted");
            MoverState::Exhausted
        } else {
            MoverState::Stationary
        };

        Some(Relocation {
            from,
            to: target,
            moves_left: self.moves_left,
        })
    }

    fn candidates(&self, grid: Grid, inquired: &InquiredSet) -> Vec<Cell> {
        let others: Vec<Cell> = grid.cells().filter(|cell| *cell != self.position).collect();
        if self.policy == RelocationPolicy::AvoidProbed {
            let quiet: Vec<Cell> = others
                .iter()
                .copied()
                .filter(|cell| !inquired.touches(grid, *cell))
                .collect();
            if !quiet.is_empty() {
                return quiet;
            }
        }
        others
    }
}
