use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::{AgentConfig, BenchmarkConfig};
use crate::runner::GameRecord;

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("baseline agent '{0}' not present in benchmark results")]
    MissingBaseline(String),
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("baseline '{0}' missing for game {1}")]
    MissingBaselineGame(String, String),
    #[error("statistics error: {0}")]
    Stats(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct AnalyticsCollector {
    baseline: String,
    agents: HashMap<String, AgentAccumulator>,
    comparisons: HashMap<String, ComparisonAccumulator>,
    agent_order: Vec<String>,
    z: f64,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Result<Self, AnalyticsError> {
        let baseline = config
            .metrics
            .baseline
            .clone()
            .ok_or_else(|| AnalyticsError::MissingBaseline("<unset>".into()))?;

        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(agent.name.clone(), AgentAccumulator::new(agent.clone()));
            order.push(agent.name.clone());
        }

        Ok(Self {
            baseline,
            agents,
            comparisons: HashMap::new(),
            agent_order: order,
            z: standard_normal()?.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0),
        })
    }

    /// Record every agent's result for one shared game seed.
    pub fn record_game(
        &mut self,
        game_index: usize,
        records: &[GameRecord],
    ) -> Result<(), AnalyticsError> {
        let game_id = format!("G{game_index:05}");

        let baseline_inquiries = records
            .iter()
            .find(|record| record.agent_name == self.baseline)
            .map(|record| f64::from(record.inquiries))
            .ok_or_else(|| {
                AnalyticsError::MissingBaselineGame(self.baseline.clone(), game_id.clone())
            })?;

        for record in records {
            let acc = self
                .agents
                .get_mut(&record.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(record.agent_name.clone()))?;
            acc.record_game(record);

            if record.agent_name != self.baseline {
                self.comparisons
                    .entry(record.agent_name.clone())
                    .or_insert_with(ComparisonAccumulator::new)
                    .record(f64::from(record.inquiries) - baseline_inquiries);
            }
        }

        Ok(())
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report(self.z));
            }
        }

        if !reports.iter().any(|report| report.name == self.baseline) {
            return Err(AnalyticsError::MissingBaseline(self.baseline));
        }

        let normal = standard_normal()?;
        let mut comparisons = Vec::new();
        for report in &reports {
            let (p_value, sample_size) = match self.comparisons.remove(&report.name) {
                Some(comp) => comp.wilcoxon_signed_rank(&normal),
                None if report.name == self.baseline => (1.0, report.games),
                None => (1.0, 0),
            };
            comparisons.push(ComparisonReport {
                agent: report.name.clone(),
                p_value,
                sample_size,
            });
        }

        Ok(AnalyticsSummary {
            baseline: self.baseline,
            confidence_level: CONFIDENCE_LEVEL,
            agents: reports,
            comparisons,
        }
        .enrich())
    }
}

fn standard_normal() -> Result<Normal, AnalyticsError> {
    Normal::new(0.0, 1.0).map_err(|err| AnalyticsError::Stats(err.to_string()))
}

struct AgentAccumulator {
    config: AgentConfig,
    games: usize,
    wins: usize,
    total_inquiries: u64,
    total_ghost_moves: u64,
    total_entropy: f64,
    total_latency_ms: f64,
    total_decisions: u64,
}

impl AgentAccumulator {
    fn new(config: AgentConfig) -> Self {
        Self {
            config,
            games: 0,
            wins: 0,
            total_inquiries: 0,
            total_ghost_moves: 0,
            total_entropy: 0.0,
            total_latency_ms: 0.0,
            total_decisions: 0,
        }
    }

    fn record_game(&mut self, record: &GameRecord) {
        self.games += 1;
        if record.won() {
            self.wins += 1;
        }
        self.total_inquiries += u64::from(record.inquiries);
        self.total_ghost_moves += u64::from(record.ghost_moves);
        self.total_entropy += record.final_entropy;
        self.total_latency_ms += record.metrics.total_ms;
        self.total_decisions += u64::from(record.metrics.decisions);
    }

    fn into_report(self, z: f64) -> AgentReport {
        let per_game = |total: f64| {
            if self.games == 0 {
                0.0
            } else {
                total / self.games as f64
            }
        };

        AgentReport {
            name: self.config.name.clone(),
            params: self.config.params.clone(),
            games: self.games,
            wins: self.wins,
            win_rate: per_game(self.wins as f64),
            ci95: wilson_interval(self.wins, self.games, z),
            avg_inquiries: per_game(self.total_inquiries as f64),
            avg_ghost_moves: per_game(self.total_ghost_moves as f64),
            avg_final_entropy: per_game(self.total_entropy),
            average_ms_per_decision: if self.total_decisions == 0 {
                0.0
            } else {
                self.total_latency_ms / self.total_decisions as f64
            },
            delta_vs_baseline: 0.0,
        }
    }
}

/// Wilson score interval for a binomial proportion.
pub fn wilson_interval(successes: usize, trials: usize, z: f64) -> (f64, f64) {
    if trials == 0 {
        return (0.0, 0.0);
    }
    let n = trials as f64;
    let p = successes as f64 / n;
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let margin = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;
    ((center - margin).max(0.0), (center + margin).min(1.0))
}

#[derive(Clone)]
struct ComparisonAccumulator {
    diffs: Vec<f64>,
}

impl ComparisonAccumulator {
    fn new() -> Self {
        Self { diffs: Vec::new() }
    }

    fn record(&mut self, diff: f64) {
        self.diffs.push(diff);
    }

    /// Two-sided signed-rank test on paired differences (normal approximation).
    fn wilcoxon_signed_rank(self, normal: &Normal) -> (f64, usize) {
        let mut paired: Vec<(f64, f64)> = self
            .diffs
            .into_iter()
            .filter(|d| d.abs() > f64::EPSILON)
            .map(|d| (d.abs(), d.signum()))
            .collect();
        let n = paired.len();
        if n == 0 {
            return (1.0, 0);
        }
        paired.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut w_plus = 0.0;
        let mut w_minus = 0.0;
        let mut tie_adjustment = 0.0;
        let mut i = 0;
        while i < n {
            let mut j = i;
            while j + 1 < n && (paired[j + 1].0 - paired[i].0).abs() < 1e-12 {
                j += 1;
            }
            let rank = (i + j + 2) as f64 / 2.0;
            for (_, sign) in &paired[i..=j] {
                if *sign > 0.0 {
                    w_plus += rank;
                } else {
                    w_minus += rank;
                }
            }
            let ties = (j - i + 1) as f64;
            tie_adjustment += (ties.powi(3) - ties) / 48.0;
            i = j + 1;
        }

        let n_f = n as f64;
        let mean_w = n_f * (n_f + 1.0) / 4.0;
        let variance_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_adjustment;
        if variance_w <= 0.0 {
            return (1.0, n);
        }

        let w: f64 = f64::min(w_plus, w_minus);
        let z = (((w - mean_w).abs() - 0.5) / variance_w.sqrt()).max(0.0);
        let p = 2.0 * (1.0 - normal.cdf(z));
        (p.clamp(0.0, 1.0), n)
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: String,
    pub confidence_level: f64,
    pub agents: Vec<AgentReport>,
    pub comparisons: Vec<ComparisonReport>,
}

impl AnalyticsSummary {
    pub fn enrich(mut self) -> Self {
        let baseline_rate = self
            .agents
            .iter()
            .find(|agent| agent.name == self.baseline)
            .map(|agent| agent.win_rate)
            .unwrap_or(0.0);

        for agent in &mut self.agents {
            agent.delta_vs_baseline = agent.win_rate - baseline_rate;
        }

        self
    }

    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Ghost Hunt Summary\n\n");
        rows.push_str(&format!(
            "Baseline: `{}`; intervals are {:.0}% Wilson bounds on the win rate; p-values compare inquiries used against the baseline.\n\n",
            self.baseline,
            self.confidence_level * 100.0
        ));
        rows.push_str("| Agent | Games | Win % | Δ vs baseline | CI | Avg inquiries | Avg ghost moves | Avg final entropy | Avg ms/decision | p-value |\n");
        rows.push_str("|-------|-------|-------|----------------|----|---------------|-----------------|-------------------|-----------------|---------|\n");

        for agent in &self.agents {
            let p_value = self
                .comparisons
                .iter()
                .find(|c| c.agent == agent.name)
                .map(|c| c.p_value)
                .unwrap_or(1.0);

            rows.push_str(&format!(
                "| {name} | {games} | {win:.1}% | {delta:+.1} pp | [{low:.1}%, {high:.1}%] | {inquiries:.2} | {moves:.2} | {entropy:.3} | {latency:.3} | {p_value:.3} |\n",
                name = agent.name,
                games = agent.games,
                win = agent.win_rate * 100.0,
                delta = agent.delta_vs_baseline * 100.0,
                low = agent.ci95.0 * 100.0,
                high = agent.ci95.1 * 100.0,
                inquiries = agent.avg_inquiries,
                moves = agent.avg_ghost_moves,
                entropy = agent.avg_final_entropy,
                latency = agent.average_ms_per_decision,
            ));
        }

        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub params: serde_yaml::Value,
    pub games: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub ci95: (f64, f64),
    pub avg_inquiries: f64,
    pub avg_ghost_moves: f64,
    pub avg_final_entropy: f64,
    pub average_ms_per_decision: f64,
    #[serde(skip)]
    pub delta_vs_baseline: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub agent: String,
    pub p_value: f64,
    pub sample_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wilson_interval_brackets_the_observed_rate() {
        let (low, high) = wilson_interval(30, 40, 1.96);
        assert!(low < 0.75 && 0.75 < high);
        assert!(low > 0.5 && high < 0.9);
    }

    #[test]
    fn wilson_interval_stays_inside_unit_range() {
        let (low, high) = wilson_interval(0, 10, 1.96);
        assert!((0.0..1e-12).contains(&low));
        assert!(high > 0.0 && high < 0.4);
        let (low, high) = wilson_interval(10, 10, 1.96);
        assert!(low > 0.6);
        assert!(high <= 1.0);
        assert_eq!(wilson_interval(0, 0, 1.96), (0.0, 0.0));
    }

    #[test]
    fn signed_rank_detects_consistent_shift() {
        let normal = standard_normal().unwrap();
        let mut shifted = ComparisonAccumulator::new();
        for i in 0..30 {
            shifted.record(-1.0 - f64::from(i % 4));
        }
        let (p, n) = shifted.wilcoxon_signed_rank(&normal);
        assert_eq!(n, 30);
        assert!(p < 0.01, "p = {p}");

        let mut balanced = ComparisonAccumulator::new();
        for i in 0..30 {
            balanced.record(if i % 2 == 0 { 2.0 } else { -2.0 });
        }
        let (p, _) = balanced.wilcoxon_signed_rank(&normal);
        assert!(p > 0.5, "p = {p}");
    }

    #[test]
    fn zero_differences_are_ignored() {
        let normal = standard_normal().unwrap();
        let mut comp = ComparisonAccumulator::new();
        comp.record(0.0);
        comp.record(0.0);
        assert_eq!(comp.wilcoxon_signed_rank(&normal), (1.0, 0));
    }
}
