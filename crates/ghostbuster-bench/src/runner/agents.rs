use ghostbuster_bot::{BotDifficulty, BotParams, HeuristicPolicy, Policy};

use super::AgentError;
use crate::config::{AgentConfig, AgentKind};

pub(super) struct AgentBlueprint {
    pub(super) name: String,
    implementation: AgentImplementation,
}

enum AgentImplementation {
    Heuristic(HeuristicOptions),
}

impl AgentBlueprint {
    pub(super) fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let implementation = match config.kind {
            AgentKind::Heuristic => {
                AgentImplementation::Heuristic(HeuristicOptions::from_params(
                    &config.name,
                    &config.params,
                )?)
            }
        };

        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    /// Fresh policy for one game. `seed` drives any randomness inside the agent.
    pub(super) fn spawn_policy(&self, seed: u64) -> Box<dyn Policy> {
        match &self.implementation {
            AgentImplementation::Heuristic(opts) => Box::new(HeuristicPolicy::with_params(
                opts.difficulty,
                opts.params,
                seed,
            )),
        }
    }
}

#[derive(Debug)]
pub(super) struct HeuristicOptions {
    pub(super) difficulty: BotDifficulty,
    pub(super) params: BotParams,
}

impl HeuristicOptions {
    pub(super) fn from_params(name: &str, params: &serde_yaml::Value) -> Result<Self, AgentError> {
        let mut options = Self {
            difficulty: BotDifficulty::Normal,
            params: BotParams::default(),
        };
        if params.is_null() {
            return Ok(options);
        }

        let mapping = params
            .as_mapping()
            .ok_or_else(|| invalid(name, "expected mapping for heuristic params"))?;

        for (key, value) in mapping {
            match key.as_str() {
                Some("difficulty") => {
                    let text = value
                        .as_str()
                        .ok_or_else(|| invalid(name, "difficulty must be a string"))?;
                    options.difficulty = text
                        .parse()
                        .map_err(|err: ghostbuster_bot::UnknownDifficulty| {
                            invalid(name, &err.to_string())
                        })?;
                }
                Some("confidence") => {
                    let confidence = value
                        .as_f64()
                        .filter(|c| *c > 0.0 && *c <= 1.0)
                        .ok_or_else(|| invalid(name, "confidence must be a number in (0, 1]"))?;
                    options.params = options.params.with_confidence(confidence);
                }
                Some("min_inquiries") => {
                    let min = value
                        .as_u64()
                        .and_then(|v| u32::try_from(v).ok())
                        .ok_or_else(|| invalid(name, "min_inquiries must be a small integer"))?;
                    options.params.min_inquiries = min;
                }
                _ => {}
            }
        }

        Ok(options)
    }
}

fn invalid(name: &str, message: &str) -> AgentError {
    AgentError::InvalidHeuristicParam {
        name: name.to_string(),
        message: message.to_string(),
    }
}
