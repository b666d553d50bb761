use std::time::Duration;

use gridiron_schedule::evaluation::{Rule, RuleSet};
use gridiron_schedule::ga::{GaConfig, GeneticOptimizer, OptimizerState};
use gridiron_schedule::loader::parse_season_with;
use gridiron_schedule::models::{Schedule, SeasonBuilder, SeasonInstance};
use gridiron_schedule::repair::ScheduleRepairer;
use gridiron_schedule::result::{JsonLinesSink, MemorySink, ResultSink, RunResult};

const TEAMS: usize = 8;

/// Season file for a single round robin of `TEAMS` teams.
fn round_robin_text() -> String {
    let names = ["DAL", "DET", "NYG", "GB", "PHI", "CHI", "WAS", "MIN"];
    let mut text = String::from("# id acronym conference division priorBye threeRoad\n");
    for (id, name) in names.iter().enumerate() {
        let division = if id % 2 == 0 { "East" } else { "North" };
        text += &format!("{id} {name} NFC {division} {} {}\n", id % 8, id % 3 == 0);
    }
    text += "\n0 PST\n1 MST\n2 CST\n3 EST\n\n";
    let mut id = 0;
    for a in 0..TEAMS {
        for b in (a + 1)..TEAMS {
            let (home, away) = if (a + b) % 2 == 0 { (a, b) } else { (b, a) };
            text += &format!("{id} {home} {away} {} {}\n", home % 4, (a * b) % 9 + 1);
            id += 1;
        }
    }
    text += "\n1\n6 D\n";
    text
}

fn load() -> SeasonInstance {
    let builder = SeasonBuilder::new()
        .with_num_weeks(TEAMS)
        .with_weeks_without_fixed_slots([TEAMS - 1]);
    parse_season_with(&round_robin_text(), builder).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn loaded_season_runs_to_a_consistent_result() {
    init_tracing();
    let season = load();
    assert_eq!(season.num_fixtures(), TEAMS * (TEAMS - 1) / 2);

    let rules = RuleSet::standard(&season);
    let config = GaConfig::default()
        .with_population_size(12)
        .with_max_generations(Some(10))
        .with_time_limit(Duration::from_secs(120));
    let mut optimizer = GeneticOptimizer::new(&season, &rules, config);

    let result = optimizer.run(2024).unwrap();

    assert_eq!(optimizer.state(), OptimizerState::Terminated);
    assert!(result.generation_count <= 10);
    assert_eq!(result.best_schedule.len(), TEAMS * TEAMS * 2);
    assert!(result.best_fitness <= rules.max_eval());
    assert_eq!(result.is_optimal, result.best_fitness == rules.max_eval());

    let best = Schedule::from_flat(&season, &result.best_schedule).unwrap();
    assert_eq!(rules.fitness(&season, &best), result.best_fitness);

    // every row still holds the team's fixtures plus one bye
    for team in season.teams() {
        let mut row: Vec<usize> = best.row(team.id).iter().map(|c| c.fixture).collect();
        row.sort_unstable();
        let mut expected = team.fixture_ids.clone();
        expected.push(season.bye());
        expected.sort_unstable();
        assert_eq!(row, expected);
    }

    let analysis = rules.analyze(&season, &best);
    assert_eq!(analysis.fitness, result.best_fitness);
}

#[test]
fn repaired_schedules_round_trip_through_text() {
    let season = load();
    let repairer = ScheduleRepairer::new(&season);
    let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(99);

    let mut clean = 0;
    for _ in 0..30 {
        let mut schedule = repairer.random_schedule(&mut rng);
        let report = repairer.repair(&mut schedule);
        if report.is_clean() {
            clean += 1;
            assert_eq!(Rule::WellFormed.raw_penalty(&season, &schedule), 0);
            for team in 0..TEAMS {
                for week in 0..season.num_weeks() {
                    let fixture = schedule.fixture(team, week);
                    match season.opponent_of(team, fixture) {
                        Some(opp) => {
                            assert_eq!(schedule.fixture(opp, week), fixture);
                            assert_eq!(schedule.slot(opp, week), schedule.slot(team, week));
                        }
                        None => assert_eq!(fixture, season.bye()),
                    }
                }
            }
        }

        let text = schedule.to_text();
        assert_eq!(Schedule::from_text(&season, &text).unwrap(), schedule);
    }
    assert!(clean > 0, "no clean repair in 30 random schedules");
}

#[test]
fn results_flow_into_sinks() {
    let season = load();
    let rules = RuleSet::standard(&season);
    let config = GaConfig::default()
        .with_population_size(4)
        .with_max_generations(Some(2));

    let mut memory = MemorySink::new();
    let mut lines = JsonLinesSink::new(Vec::new());
    for seed in [1, 2] {
        let result = GeneticOptimizer::new(&season, &rules, config.clone())
            .run(seed)
            .unwrap();
        memory.accept(&result).unwrap();
        lines.accept(&result).unwrap();
    }

    let text = String::from_utf8(lines.into_inner()).unwrap();
    let parsed: Vec<RunResult> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].seed, 1);
    assert_eq!(parsed[1].best_schedule, memory.results[1].best_schedule);
    assert!(text.contains("\"bestFitness\""));
}
