pub mod bot;
pub mod policy;

pub use bot::{BeliefView, BotDifficulty, BotParams, UnknownDifficulty};
pub use policy::{Decision, HeuristicPolicy, Policy, PolicyContext};
