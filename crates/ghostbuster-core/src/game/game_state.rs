use super::config::GameConfig;
use crate::belief::{BeliefGrid, LikelihoodModel, ObservationSampler};
use crate::error::{ConfigError, GameError};
use crate::ghost::{GhostMover, InquiredSet, MoverState};
use crate::model::bucket::DistanceBucket;
use crate::model::cell::Cell;
use crate::model::color::ObservedColor;
use crate::model::grid::Grid;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Win,
    Lose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    InProgress,
    Finished(GameOutcome),
}

/// Result of one inquiry: the sampled colour and the post-update belief.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InquiryResult {
    pub color: ObservedColor,
    pub belief: Vec<f64>,
    /// The ghost relocated while this inquiry was being resolved.
    pub ghost_moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurstResult {
    pub outcome: GameOutcome,
    pub actual_position: Cell,
}

/// Player-facing rendering of the game. The ghost is only revealed once the game is over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub grid_size: usize,
    pub moves_left: u32,
    pub inquiries: u32,
    pub phase: GamePhase,
    pub cells: Vec<CellView>,
    pub ghost_position: Option<Cell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellView {
    pub cell: Cell,
    pub inquired: bool,
    /// Colour seen on the most recent inquiry of this cell.
    pub color: Option<ObservedColor>,
    pub probability: f64,
}

/// One game session. Every turn runs to completion before the next is accepted.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    grid: Grid,
    sampler: ObservationSampler,
    belief: BeliefGrid,
    mover: GhostMover,
    inquired: InquiredSet,
    colors: BTreeMap<Cell, ObservedColor>,
    phase: GamePhase,
    inquiries: u32,
    rng: StdRng,
    seed: u64,
}

impl GameState {
    /// Starts a game. The seed is drawn from entropy when the config has none.
    pub fn new_game(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.rng_seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = Grid::new(config.grid_size);
        let ghost = match config.ghost_start {
            Some(cell) => cell,
            None => Cell::new(
                rng.gen_range(0..grid.size()),
                rng.gen_range(0..grid.size()),
            ),
        };

        let belief = BeliefGrid::uniform(grid, config.min_prob);

        event!(
            target: "ghostbuster_core::game",
            Level::DEBUG,
            seed,
            grid_size = grid.size(),
            moves_left = config.moves_left,
            "new game"
        );

        Self::assemble(
            config,
            seed,
            rng,
            belief,
            ghost,
            None,
            InquiredSet::new(),
            BTreeMap::new(),
            GamePhase::InProgress,
            0,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        config: GameConfig,
        seed: u64,
        rng: StdRng,
        belief: BeliefGrid,
        ghost: Cell,
        moves_left: Option<u32>,
        inquired: InquiredSet,
        colors: BTreeMap<Cell, ObservedColor>,
        phase: GamePhase,
        inquiries: u32,
    ) -> Result<Self, ConfigError> {
        let grid = Grid::new(config.grid_size);
        let sampler = ObservationSampler::new(&config.likelihood_table)?;
        let mover = GhostMover::new(
            ghost,
            moves_left.unwrap_or(config.moves_left),
            config.movement_threshold,
            config.relocation,
        );

        Ok(Self {
            config,
            grid,
            sampler,
            belief,
            mover,
            inquired,
            colors,
            phase,
            inquiries,
            rng,
            seed,
        })
    }

    /// Probes `cell`: samples a colour from the true distance, folds it into the
    /// belief, then lets the ghost react.
    pub fn inquire(&mut self, cell: Cell) -> Result<InquiryResult, GameError> {
        self.ensure_playable(cell)?;
        let bucket = DistanceBucket::from_distance(cell.chebyshev(self.mover.position()));
        let color = self.sampler.observe(bucket, &mut self.rng);
        Ok(self.apply_observation(cell, color))
    }

    /// Like [`GameState::inquire`] but with the colour supplied by the caller,
    /// for replays and scripted scenarios.
    pub fn record_observation(
        &mut self,
        cell: Cell,
        color: ObservedColor,
    ) -> Result<InquiryResult, GameError> {
        self.ensure_playable(cell)?;
        Ok(self.apply_observation(cell, color))
    }

    /// Single authoritative guess. Ends the game either way.
    pub fn burst_guess(&mut self, cell: Cell) -> Result<BurstResult, GameError> {
        self.ensure_playable(cell)?;
        let actual_position = self.mover.position();
        let outcome = if cell == actual_position {
            GameOutcome::Win
        } else {
            GameOutcome::Lose
        };
        self.phase = GamePhase::Finished(outcome);

        event!(
            target: "ghostbuster_core::game",
            Level::INFO,
            guess = %cell,
            actual = %actual_position,
            outcome = ?outcome,
            inquiries = self.inquiries,
            "burst guess"
        );

        Ok(BurstResult {
            outcome,
            actual_position,
        })
    }

    fn apply_observation(&mut self, cell: Cell, color: ObservedColor) -> InquiryResult {
        self.belief
            .update(cell, color, &self.config.likelihood_table);
        self.inquired.record(cell);
        self.colors.insert(cell, color);
        self.inquiries += 1;
        let relocation = self
            .mover
            .evaluate(self.grid, &mut self.inquired, &mut self.rng);

        event!(
            target: "ghostbuster_core::belief",
            Level::DEBUG,
            cell = %cell,
            color = %color,
            peak = self.belief.probability(self.belief.most_likely_cell()),
            ghost_moved = relocation.is_some(),
            "belief updated"
        );

        InquiryResult {
            color,
            belief: self.belief.to_vec(),
            ghost_moved: relocation.is_some(),
        }
    }

    fn ensure_playable(&self, cell: Cell) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::InvalidState);
        }
        if !self.grid.contains(cell) {
            return Err(GameError::InvalidCell {
                row: cell.row,
                col: cell.col,
                grid_size: self.grid.size(),
            });
        }
        Ok(())
    }

    pub fn view(&self) -> GameView {
        let cells = self
            .grid
            .cells()
            .map(|cell| CellView {
                cell,
                inquired: self.inquired.contains(cell),
                color: self.colors.get(&cell).copied(),
                probability: self.belief.probability(cell),
            })
            .collect();

        GameView {
            grid_size: self.grid.size(),
            moves_left: self.mover.moves_left(),
            inquiries: self.inquiries,
            phase: self.phase,
            cells,
            ghost_position: self.is_over().then(|| self.mover.position()),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn belief(&self) -> &BeliefGrid {
        &self.belief
    }

    pub fn likelihood(&self) -> &LikelihoodModel {
        &self.config.likelihood_table
    }

    pub fn inquired(&self) -> &InquiredSet {
        &self.inquired
    }

    /// Last colour observed at each inquired cell.
    pub fn observed_colors(&self) -> &BTreeMap<Cell, ObservedColor> {
        &self.colors
    }

    pub fn observed_color(&self, cell: Cell) -> Option<ObservedColor> {
        self.colors.get(&cell).copied()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Finished(_))
    }

    pub fn inquiries(&self) -> u32 {
        self.inquiries
    }

    pub fn moves_left(&self) -> u32 {
        self.mover.moves_left()
    }

    pub fn mover_state(&self) -> MoverState {
        self.mover.state()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Engine-side truth. Never forward this to a player before the game ends.
    pub fn ghost_position(&self) -> Cell {
        self.mover.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost::RelocationPolicy;

    fn config(seed: u64) -> GameConfig {
        GameConfig {
            grid_size: 6,
            ghost_start: Some(Cell::new(2, 2)),
            ..GameConfig::default()
        }
        .with_seed(seed)
    }

    #[test]
    fn new_game_starts_uniform() {
        let game = GameState::new_game(config(1)).unwrap();
        assert_eq!(game.belief().as_slice().len(), 36);
        assert!((game.belief().total() - 1.0).abs() < 1e-12);
        assert_eq!(game.belief().floor(), 1e-5);
        assert_eq!(game.phase(), GamePhase::InProgress);
        assert_eq!(game.seed(), 1);
        assert_eq!(game.ghost_position(), Cell::new(2, 2));
    }

    #[test]
    fn invalid_cell_is_rejected_without_mutation() {
        let mut game = GameState::new_game(config(2)).unwrap();
        let before = game.belief().clone();
        let err = game.inquire(Cell::new(6, 0)).expect_err("row 6 is off the board");
        assert_eq!(
            err,
            GameError::InvalidCell {
                row: 6,
                col: 0,
                grid_size: 6
            }
        );
        assert_eq!(game.belief(), &before);
        assert_eq!(game.inquiries(), 0);
        assert!(game.inquired().is_empty());
        assert!(game.burst_guess(Cell::new(0, 9)).is_err());
        assert!(!game.is_over());
    }

    #[test]
    fn inquire_records_cell_and_returns_belief() {
        let mut game = GameState::new_game(config(3)).unwrap();
        let result = game.inquire(Cell::new(0, 0)).unwrap();
        assert_eq!(result.belief.len(), 36);
        assert_eq!(result.belief, game.belief().to_vec());
        assert!(game.inquired().contains(Cell::new(0, 0)));
        assert_eq!(game.inquiries(), 1);
    }

    #[test]
    fn burst_guess_is_terminal() {
        let mut game = GameState::new_game(config(4)).unwrap();
        let result = game.burst_guess(Cell::new(2, 2)).unwrap();
        assert_eq!(result.outcome, GameOutcome::Win);
        assert_eq!(result.actual_position, Cell::new(2, 2));
        assert_eq!(game.phase(), GamePhase::Finished(GameOutcome::Win));

        assert_eq!(game.inquire(Cell::new(0, 0)), Err(GameError::InvalidState));
        assert_eq!(
            game.record_observation(Cell::new(0, 0), ObservedColor::Red),
            Err(GameError::InvalidState)
        );
        assert_eq!(game.burst_guess(Cell::new(2, 2)), Err(GameError::InvalidState));
        assert_eq!(game.inquiries(), 0);
    }

    #[test]
    fn wrong_burst_guess_loses() {
        let mut game = GameState::new_game(config(5)).unwrap();
        let result = game.burst_guess(Cell::new(0, 0)).unwrap();
        assert_eq!(result.outcome, GameOutcome::Lose);
        assert_eq!(result.actual_position, Cell::new(2, 2));
    }

    #[test]
    fn view_hides_ghost_until_the_end() {
        let mut game = GameState::new_game(config(6)).unwrap();
        game.inquire(Cell::new(1, 1)).unwrap();
        let view = game.view();
        assert!(view.ghost_position.is_none());
        assert_eq!(view.cells.len(), 36);
        assert!(view.cells[7].inquired);
        assert!(!view.cells[0].inquired);

        game.burst_guess(Cell::new(5, 5)).unwrap();
        assert_eq!(game.view().ghost_position, Some(game.ghost_position()));
    }

    #[test]
    fn view_keeps_the_latest_colour_per_cell() {
        let mut cfg = config(8);
        cfg.moves_left = 0;
        let mut game = GameState::new_game(cfg).unwrap();
        game.record_observation(Cell::new(0, 1), ObservedColor::Yellow)
            .unwrap();
        game.record_observation(Cell::new(4, 4), ObservedColor::Orange)
            .unwrap();
        game.record_observation(Cell::new(0, 1), ObservedColor::Green)
            .unwrap();

        let view = game.view();
        assert_eq!(view.cells[1].color, Some(ObservedColor::Green));
        assert_eq!(view.cells[28].color, Some(ObservedColor::Orange));
        assert!(
            view.cells
                .iter()
                .filter(|cell| !cell.inquired)
                .all(|cell| cell.color.is_none())
        );
        assert_eq!(game.observed_colors().len(), 2);
        assert_eq!(game.observed_color(Cell::new(3, 3)), None);

        let sampled = game.inquire(Cell::new(5, 0)).unwrap().color;
        assert_eq!(game.view().cells[30].color, Some(sampled));
    }

    #[test]
    fn surrounding_the_ghost_moves_it() {
        let mut cfg = config(7);
        cfg.relocation = RelocationPolicy::AnyOther;
        let mut game = GameState::new_game(cfg).unwrap();
        let neighbors = game.grid().neighbors(Cell::new(2, 2));
        let mut moved = false;
        for (index, cell) in neighbors.iter().enumerate() {
            let result = game.record_observation(*cell, ObservedColor::Orange).unwrap();
            if result.ghost_moved {
                assert_eq!(index, 5, "6 of 8 neighbours reach 0.75");
                moved = true;
                break;
            }
        }
        assert!(moved);
        assert_ne!(game.ghost_position(), Cell::new(2, 2));
        assert_eq!(game.moves_left(), 2);
    }

    #[test]
    fn same_seed_replays_identically() {
        let play = |seed| {
            let mut game = GameState::new_game(GameConfig::default().with_seed(seed)).unwrap();
            let colors: Vec<ObservedColor> = (0..10)
                .map(|i| game.inquire(Cell::new(i, (i * 3) % 10)).unwrap().color)
                .collect();
            (colors, game.ghost_position(), game.belief().to_vec())
        };
        assert_eq!(play(99), play(99));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = GameConfig {
            grid_size: 0,
            ..GameConfig::default()
        };
        assert!(GameState::new_game(cfg).is_err());
    }
}
