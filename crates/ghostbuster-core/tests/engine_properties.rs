use ghostbuster_core::{
    Cell, DistanceBucket, GameConfig, GameOutcome, GameSnapshot, GameState, LikelihoodModel,
    MoverState, ObservedColor, RelocationPolicy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SUM_TOLERANCE: f64 = 1e-9;

fn assert_belief_invariants(game: &GameState) {
    let belief = game.belief();
    let total: f64 = belief.as_slice().iter().sum();
    assert!((total - 1.0).abs() < SUM_TOLERANCE, "belief sums to {total}");
    let floor = game.config().min_prob;
    for (index, prob) in belief.as_slice().iter().enumerate() {
        assert!(*prob >= floor, "cell {index} at {prob} is below the floor {floor}");
    }
}

fn six_by_six(ghost: Cell) -> GameConfig {
    GameConfig {
        grid_size: 6,
        ghost_start: Some(ghost),
        ..GameConfig::default()
    }
    .with_seed(36)
}

#[test]
fn invariants_hold_after_every_inquiry() {
    for seed in 0..8u64 {
        let mut game = GameState::new_game(GameConfig::default().with_seed(seed)).unwrap();
        assert_belief_invariants(&game);
        let mut picker = StdRng::seed_from_u64(seed ^ 0xfeed);
        for _ in 0..150 {
            let cell = Cell::new(picker.gen_range(0..10), picker.gen_range(0..10));
            game.inquire(cell).unwrap();
            assert_belief_invariants(&game);
        }
    }
}

#[test]
fn invariants_hold_under_adversarial_observations() {
    let mut game = GameState::new_game(GameConfig::default().with_seed(1)).unwrap();
    for round in 0..60 {
        let color = ObservedColor::ALL[round % 4];
        game.record_observation(Cell::new(9, 9), color).unwrap();
        game.record_observation(Cell::new(0, 0), ObservedColor::Green).unwrap();
        assert_belief_invariants(&game);
    }
}

#[test]
fn most_likely_color_raises_clicked_cell() {
    let model = LikelihoodModel::default();
    let red = model.most_likely_color(DistanceBucket::Zero);
    for trial in 0..40u64 {
        let mut game = GameState::new_game(GameConfig::default().with_seed(trial)).unwrap();
        let mut picker = StdRng::seed_from_u64(trial + 1000);
        for _ in 0..5 {
            let color = [ObservedColor::Orange, ObservedColor::Yellow, ObservedColor::Green]
                [picker.gen_range(0..3)];
            let cell = Cell::new(picker.gen_range(0..10), picker.gen_range(0..10));
            game.record_observation(cell, color).unwrap();
        }

        let cell = Cell::new(picker.gen_range(0..10), picker.gen_range(0..10));
        let prior = game.belief().probability(cell);
        game.record_observation(cell, red).unwrap();
        assert!(
            game.belief().probability(cell) > prior,
            "trial {trial}: {cell} did not gain mass from a red reading"
        );
    }
}

#[test]
fn floored_cell_is_revived_by_favourable_evidence() {
    let mut game = GameState::new_game(GameConfig::default().with_seed(3)).unwrap();
    let target = Cell::new(0, 0);
    for _ in 0..10 {
        game.record_observation(Cell::new(9, 9), ObservedColor::Red)
            .unwrap();
    }
    let floor = game.config().min_prob;
    assert_eq!(game.belief().probability(target), floor);

    game.record_observation(target, ObservedColor::Red).unwrap();
    assert!(game.belief().probability(target) > floor);
    assert_belief_invariants(&game);
}

#[test]
fn ghost_never_moves_before_threshold() {
    let ghost = Cell::new(4, 4);
    let config = GameConfig {
        ghost_start: Some(ghost),
        relocation: RelocationPolicy::AnyOther,
        ..GameConfig::default()
    }
    .with_seed(12);
    let mut game = GameState::new_game(config).unwrap();

    // Probes away from the ghost never count toward its neighbourhood.
    for row in 0..10 {
        game.inquire(Cell::new(row, 0)).unwrap();
        game.inquire(Cell::new(row, 9)).unwrap();
    }
    assert_eq!(game.ghost_position(), ghost);

    // Five of eight neighbours stays under 0.75.
    for cell in game.grid().neighbors(ghost).into_iter().take(5) {
        let result = game.inquire(cell).unwrap();
        assert!(!result.ghost_moved);
    }
    assert_eq!(game.ghost_position(), ghost);
    assert_eq!(game.moves_left(), 3);
}

#[test]
fn ghost_never_moves_without_budget() {
    let ghost = Cell::new(2, 2);
    let config = GameConfig {
        moves_left: 0,
        ..six_by_six(ghost)
    };
    let mut game = GameState::new_game(config).unwrap();
    for cell in game.grid().cells().collect::<Vec<_>>() {
        let result = game.inquire(cell).unwrap();
        assert!(!result.ghost_moved);
    }
    assert_eq!(game.ghost_position(), ghost);
    assert_eq!(game.moves_left(), 0);
}

#[test]
fn relocation_budget_is_spent_then_exhausted() {
    let config = GameConfig {
        moves_left: 2,
        relocation: RelocationPolicy::AnyOther,
        ..six_by_six(Cell::new(2, 2))
    };
    let mut game = GameState::new_game(config).unwrap();
    let mut moves = 0;
    for _ in 0..4 {
        for cell in game.grid().cells().collect::<Vec<_>>() {
            if game.inquire(cell).unwrap().ghost_moved {
                moves += 1;
            }
        }
    }
    assert_eq!(moves, 2);
    assert_eq!(game.moves_left(), 0);
    assert_eq!(game.mover_state(), MoverState::Exhausted);
}

#[test]
fn burst_guess_is_decided_by_true_position() {
    for seed in [5u64, 6, 7] {
        let reference = GameState::new_game(GameConfig::default().with_seed(seed)).unwrap();
        let ghost = reference.ghost_position();
        for cell in reference.grid().cells() {
            let mut game = GameState::new_game(GameConfig::default().with_seed(seed)).unwrap();
            assert_eq!(game.ghost_position(), ghost);
            let result = game.burst_guess(cell).unwrap();
            let expected = if cell == ghost {
                GameOutcome::Win
            } else {
                GameOutcome::Lose
            };
            assert_eq!(result.outcome, expected);
            assert_eq!(result.actual_position, ghost);
        }
    }
}

#[test]
fn red_on_ghost_cell_tops_six_by_six_grid() {
    let ghost = Cell::new(2, 2);
    let mut game = GameState::new_game(six_by_six(ghost)).unwrap();
    let prior = game.belief().probability(ghost);
    assert!((prior - 1.0 / 36.0).abs() < 1e-15);

    game.record_observation(ghost, ObservedColor::Red).unwrap();

    let belief = game.belief();
    assert_eq!(belief.most_likely_cell(), ghost);
    let peak = belief.probability(ghost);
    assert!(peak > 1.0 / 36.0);
    for cell in game.grid().cells().filter(|cell| *cell != ghost) {
        assert!(belief.probability(cell) < peak);
    }
}

#[test]
fn unlikely_orange_on_ghost_cell_does_not_collapse_it() {
    let ghost = Cell::new(2, 2);
    let distant = Cell::new(5, 5);
    let mut game = GameState::new_game(six_by_six(ghost)).unwrap();
    assert_eq!(
        game.likelihood().row(DistanceBucket::Zero),
        &[0.80, 0.10, 0.05, 0.05]
    );

    game.record_observation(ghost, ObservedColor::Red).unwrap();
    game.record_observation(ghost, ObservedColor::Orange).unwrap();

    let belief = game.belief();
    assert!(belief.probability(ghost) > belief.probability(distant));
    assert!(belief.probability(ghost) > game.config().min_prob);
    assert_belief_invariants(&game);
}

#[test]
fn snapshot_roundtrip_after_long_game() {
    let config = GameConfig {
        relocation: RelocationPolicy::AnyOther,
        ..GameConfig::default()
    }
    .with_seed(404);
    let mut game = GameState::new_game(config).unwrap();
    let mut picker = StdRng::seed_from_u64(404);
    for _ in 0..80 {
        game.inquire(Cell::new(picker.gen_range(0..10), picker.gen_range(0..10)))
            .unwrap();
    }

    let json = GameSnapshot::to_json(&game).unwrap();
    let restored = GameState::load_json(&json).unwrap();

    assert_eq!(restored.belief().as_slice(), game.belief().as_slice());
    assert_eq!(restored.ghost_position(), game.ghost_position());
    assert_eq!(restored.moves_left(), game.moves_left());
    assert_eq!(
        restored.inquired().iter().collect::<Vec<_>>(),
        game.inquired().iter().collect::<Vec<_>>()
    );
    assert_eq!(restored.snapshot(), game.snapshot());
}
