use std::fs;
use std::path::Path;

use ghostbuster_bench::config::BenchmarkConfig;
use ghostbuster_bench::logging::init_event_log;
use ghostbuster_bench::runner::BenchmarkRunner;
use tempfile::tempdir;

fn load_config(output_dir: &Path) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
games:
  seed: 4242
  count: 4
  max_inquiries: 25
game:
  grid_size: 8
agents:
  - name: "baseline"
    kind: "heuristic"
    params:
      difficulty: "normal"
  - name: "easy"
    kind: "heuristic"
    params:
      difficulty: "easy"
  - name: "hard"
    kind: "heuristic"
    params:
      difficulty: "hard"
      confidence: 0.85
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
metrics:
  baseline: "baseline"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("games.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_normalized(dir: &Path) -> (String, String) {
    let config = load_config(dir);
    let outputs = config.resolved_outputs();
    let runner = BenchmarkRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("benchmark completes");

    assert_eq!(summary.games_played, 4);
    assert_eq!(summary.agents, 3);
    assert_eq!(summary.rows_written, 12);
    assert!(summary.events_path.is_none());

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let mut normalized = String::new();
    for line in jsonl.lines() {
        let mut value: serde_json::Value = serde_json::from_str(line).expect("row decodes to JSON");
        let obj = value.as_object_mut().expect("row is an object");
        let speed = obj
            .get_mut("speed_ms_decision")
            .expect("rows carry decision latency");
        *speed = serde_json::Value::from(0.0);

        let inquiries = obj["inquiries"].as_u64().expect("inquiries is numeric");
        assert!(inquiries <= 25);
        let won = obj["outcome"] == "win";
        assert_eq!(won, obj["guess"] == obj["ghost"]);

        normalized.push_str(&serde_json::to_string(&value).expect("re-serialize normalized row"));
        normalized.push('\n');
    }

    let markdown = fs::read_to_string(&summary.summary_path).expect("summary readable");
    (normalized, markdown)
}

#[test]
fn benchmark_smoke_test_is_deterministic() {
    let first_dir = tempdir().expect("temp dir");
    let second_dir = tempdir().expect("temp dir");

    let (first, markdown) = run_normalized(first_dir.path());
    let (second, _) = run_normalized(second_dir.path());

    assert_eq!(first, second, "same seed must replay identical games");
    assert_eq!(first.lines().count(), 12);
    for agent in ["baseline", "easy", "hard"] {
        assert!(
            markdown.contains(&format!("| {agent} |")),
            "summary is missing a row for {agent}"
        );
    }
}

#[test]
fn agents_share_game_seeds() {
    let dir = tempdir().expect("temp dir");
    let (rows, _) = run_normalized(dir.path());
    let rows: Vec<serde_json::Value> = rows
        .lines()
        .map(|line| serde_json::from_str(line).expect("json"))
        .collect();

    for game in rows.chunks(3) {
        let seed = &game[0]["game_seed"];
        assert!(game.iter().all(|row| &row["game_seed"] == seed));
        assert!(game.iter().all(|row| row["game_id"] == game[0]["game_id"]));
    }
}

#[test]
fn structured_run_writes_event_log() {
    let dir = tempdir().expect("temp dir");
    let mut config = load_config(dir.path());
    config.logging.enable_structured = true;
    config.outputs.events_jsonl = Some(
        dir.path()
            .join("logs/{run_id}.events.jsonl")
            .display()
            .to_string(),
    );
    let outputs = config.resolved_outputs();
    let expected = dir.path().join("logs/test_smoke.events.jsonl");
    assert_eq!(outputs.events_jsonl, expected);

    let event_log = init_event_log(&config, &outputs)
        .expect("event log opens")
        .expect("structured logging is enabled");
    assert_eq!(event_log.path, expected);

    let runner = BenchmarkRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("benchmark completes");
    assert_eq!(summary.events_path.as_deref(), Some(expected.as_path()));
    drop(event_log);

    let log = fs::read_to_string(&expected).expect("event log readable");
    let started: serde_json::Value = log
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).expect("event is JSON"))
        .find(|event| event["message"] == "bench run started")
        .expect("run start is logged");
    assert_eq!(started["run_id"], "test_smoke");
    assert_eq!(started["engine"], "ghostbuster");
    assert_eq!(started["grid_size"], 8);
    assert_eq!(started["agents"], 3);
}
