mod heuristic;

pub use heuristic::HeuristicPolicy;

use ghostbuster_core::{BeliefGrid, Cell, GameOutcome, GameState, Grid, InquiredSet, LikelihoodModel};

/// Context provided to policies for decision-making. Only player-visible state is exposed.
pub struct PolicyContext<'a> {
    pub grid: Grid,
    pub belief: &'a BeliefGrid,
    pub inquired: &'a InquiredSet,
    pub likelihood: &'a LikelihoodModel,
    pub inquiries: u32,
    pub max_inquiries: u32,
}

impl<'a> PolicyContext<'a> {
    pub fn from_game(game: &'a GameState, max_inquiries: u32) -> Self {
        Self {
            grid: game.grid(),
            belief: game.belief(),
            inquired: game.inquired(),
            likelihood: game.likelihood(),
            inquiries: game.inquiries(),
            max_inquiries,
        }
    }

    pub fn budget_spent(&self) -> bool {
        self.inquiries >= self.max_inquiries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Inquire(Cell),
    Burst(Cell),
}

impl Decision {
    pub fn cell(self) -> Cell {
        match self {
            Decision::Inquire(cell) | Decision::Burst(cell) => cell,
        }
    }
}

/// Unified interface for ghost-hunting agents
pub trait Policy: Send {
    /// Choose the next probe, or commit to a burst
    fn decide(&mut self, ctx: &PolicyContext) -> Decision;

    /// Optional: observe how the game ended
    fn observe_outcome(&mut self, _outcome: GameOutcome) {}
}
