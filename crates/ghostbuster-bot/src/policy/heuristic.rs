use super::{Decision, Policy, PolicyContext};
use crate::bot::{BeliefView, BotDifficulty, BotParams};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{Level, event};

/// Rule-based agent whose probing strategy depends on [`BotDifficulty`]
pub struct HeuristicPolicy {
    difficulty: BotDifficulty,
    params: BotParams,
    rng: StdRng,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty, seed: u64) -> Self {
        Self::with_params(difficulty, BotParams::default(), seed)
    }

    pub fn with_params(difficulty: BotDifficulty, params: BotParams, seed: u64) -> Self {
        Self {
            difficulty,
            params,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn easy(seed: u64) -> Self {
        Self::new(BotDifficulty::Easy, seed)
    }

    pub fn normal() -> Self {
        Self::new(BotDifficulty::Normal, 0)
    }

    pub fn hard() -> Self {
        Self::new(BotDifficulty::Hard, 0)
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }

    fn confident(&self, ctx: &PolicyContext, peak: f64) -> bool {
        ctx.inquiries >= self.params.min_inquiries && peak >= self.params.confidence
    }
}

impl Policy for HeuristicPolicy {
    fn decide(&mut self, ctx: &PolicyContext) -> Decision {
        let view = BeliefView::new(ctx.belief, ctx.likelihood, ctx.inquired);
        let (peak_cell, peak) = view.peak();

        if ctx.budget_spent() {
            let decision = Decision::Burst(peak_cell);
            log_decision(ctx, self.difficulty, decision, peak, "budget_spent");
            return decision;
        }

        let (decision, reason) = match self.difficulty {
            BotDifficulty::Easy => {
                let probe = view
                    .uninquired()
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or(peak_cell);
                (Decision::Inquire(probe), "easy_random_probe")
            }
            BotDifficulty::Normal if self.confident(ctx, peak) => {
                (Decision::Burst(peak_cell), "confident_burst")
            }
            BotDifficulty::Normal => (
                Decision::Inquire(view.best_uninquired()),
                "greedy_probe",
            ),
            BotDifficulty::Hard if self.confident(ctx, peak) => {
                (Decision::Burst(peak_cell), "confident_burst")
            }
            BotDifficulty::Hard => (
                Decision::Inquire(view.most_informative_probe()),
                "entropy_probe",
            ),
        };
        log_decision(ctx, self.difficulty, decision, peak, reason);
        decision
    }
}

fn log_decision(
    ctx: &PolicyContext,
    difficulty: BotDifficulty,
    decision: Decision,
    peak: f64,
    reason: &str,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let action = match decision {
        Decision::Inquire(_) => "inquire",
        Decision::Burst(_) => "burst",
    };

    event!(
        target: "ghostbuster_bot::decide",
        Level::DEBUG,
        difficulty = %difficulty,
        action,
        cell = %decision.cell(),
        peak,
        inquiries = ctx.inquiries,
        max_inquiries = ctx.max_inquiries,
        reason,
    );
}
