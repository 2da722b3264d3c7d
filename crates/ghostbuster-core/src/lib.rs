pub mod belief;
pub mod error;
pub mod game;
pub mod ghost;
pub mod model;

pub use belief::{BeliefGrid, LikelihoodModel, ObservationSampler};
pub use error::{ConfigError, GameError, SnapshotError};
pub use game::config::GameConfig;
pub use game::game_state::{BurstResult, GameOutcome, GamePhase, GameState, GameView, InquiryResult};
pub use game::serialization::{CellObservation, GameSnapshot};
pub use ghost::{GhostMover, InquiredSet, MoverState, RelocationPolicy};
pub use model::bucket::DistanceBucket;
pub use model::cell::Cell;
pub use model::color::ObservedColor;
pub use model::grid::Grid;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "ghostbuster"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
