mod agents;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ghostbuster_bot::{Decision, PolicyContext};
use ghostbuster_core::belief::telemetry::BeliefMetrics;
use ghostbuster_core::{Cell, GameError, GameOutcome, GameState};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{BenchmarkConfig, ResolvedOutputs};
use agents::AgentBlueprint;

/// Primary entry point for orchestrating benchmark runs.
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub agents: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    /// Structured event log, when enabled.
    pub events_path: Option<PathBuf>,
}

impl BenchmarkRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;
        config.game.validate()?;

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    /// Play every configured game once per agent, streaming JSONL rows to disk.
    ///
    /// All agents face the same ghost start and observation stream for a given game index.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config)?;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let mut records = Vec::with_capacity(self.agents.len());

            for agent in &self.agents {
                let record = self.play_game(game_index, game_seed, agent)?;
                write_game_row(&mut writer, &self.config, game_index, game_seed, &record)?;
                rows_written += 1;
                records.push(record);
            }

            analytics.record_game(game_index, &records)?;
        }

        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;


        Ok(RunSummary {
            games_played: self.config.games.count,
            agents: self.agents.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            events_path: self
                .logging_enabled
                .then(|| self.outputs.events_jsonl.clone()),
        })
    }

    fn play_game(
        &self,
        game_index: usize,
        game_seed: u64,
        agent: &AgentBlueprint,
    ) -> Result<GameRecord, RunnerError> {
        let max_inquiries = self.config.games.max_inquiries;
        let mut game = GameState::new_game(self.config.game.clone().with_seed(game_seed))?;
        let mut policy = agent.spawn_policy(game_seed);
        let mut metrics = DecisionMetrics::default();
        let mut ghost_moves = 0u32;

        let (guess, result) = loop {
            let decision = {
                let ctx = PolicyContext::from_game(&game, max_inquiries);
                let start = Instant::now();
                let decision = policy.decide(&ctx);
                metrics.record(start.elapsed());
                decision
            };

            match decision {
                Decision::Inquire(cell) if game.inquiries() < max_inquiries => {
                    if game.inquire(cell)?.ghost_moved {
                        ghost_moves += 1;
                    }
                }
                Decision::Inquire(cell) => {
                    let fallback = game.belief().most_likely_cell();
                    event!(
                        target: "ghostbuster_bench::game",
                        Level::WARN,
                        agent = %agent.name,
                        requested = %cell,
                        fallback = %fallback,
                        "agent exceeded the inquiry budget; forcing a burst"
                    );
                    break (fallback, game.burst_guess(fallback)?);
                }
                Decision::Burst(cell) => break (cell, game.burst_guess(cell)?),
            }
        };
        policy.observe_outcome(result.outcome);

        let belief = BeliefMetrics::from_belief(game.belief());
        let decisions = metrics.finalize();

        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "ghostbuster_bench::game",
                Level::INFO,
                run_id = %self.config.run_id,
                game_index = game_index as u64,
                agent = %agent.name,
                outcome = ?result.outcome,
                inquiries = game.inquiries(),
                ghost_moves,
                final_entropy = belief.entropy,
            );
        }

        Ok(GameRecord {
            agent_name: agent.name.clone(),
            outcome: result.outcome,
            inquiries: game.inquiries(),
            ghost_moves,
            guess,
            ghost: result.actual_position,
            final_entropy: belief.entropy,
            peak_probability: belief.peak_probability,
            metrics: decisions,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_row(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    game_seed: u64,
    record: &GameRecord,
) -> Result<(), RunnerError> {
    let row = GameLogRow {
        run_id: &config.run_id,
        game_id: format!("G{game_index:05}"),
        game_index,
        game_seed,
        agent: &record.agent_name,
        outcome: record.outcome,
        inquiries: record.inquiries,
        ghost_moves: record.ghost_moves,
        guess: record.guess,
        ghost: record.ghost,
        final_entropy: record.final_entropy,
        peak_probability: record.peak_probability,
        decisions: record.metrics.decisions,
        speed_ms_decision: record.metrics.avg_ms_per_decision,
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Result of one agent playing one game.
pub struct GameRecord {
    pub agent_name: String,
    pub outcome: GameOutcome,
    pub inquiries: u32,
    pub ghost_moves: u32,
    pub guess: Cell,
    pub ghost: Cell,
    pub final_entropy: f64,
    pub peak_probability: f64,
    pub metrics: DecisionSummary,
}

impl GameRecord {
    pub fn won(&self) -> bool {
        self.outcome == GameOutcome::Win
    }
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.decisions += 1;
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    game_id: String,
    game_index: usize,
    game_seed: u64,
    agent: &'a str,
    outcome: GameOutcome,
    inquiries: u32,
    ghost_moves: u32,
    guess: Cell,
    ghost: Cell,
    final_entropy: f64,
    peak_probability: f64,
    decisions: u32,
    speed_ms_decision: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("invalid game configuration: {0}")]
    Engine(#[from] ghostbuster_core::ConfigError),
    #[error("game execution failed: {0}")]
    Game(#[from] GameError),
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid heuristic parameter for agent '{name}': {message}")]
    InvalidHeuristicParam { name: String, message: String },
}
