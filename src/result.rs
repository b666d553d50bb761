//! Run records and where they go.
//!
//! A [`RunResult`] is what one optimizer run leaves behind. It serializes
//! with camelCase keys so downstream tooling can read it as plain JSON.
//! [`ResultSink`] is the output seam: the library never opens files itself.

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::SinkError;

/// Outcome of one optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Seed the run's random generator was created from.
    pub seed: u64,
    /// Wall-clock duration of the run.
    pub elapsed_seconds: f64,
    /// Whether the best fitness reached the rule set's maximum.
    pub is_optimal: bool,
    /// Generations evolved (the initial population is generation 0).
    pub generation_count: usize,
    /// Best schedule in flat form (see [`Schedule::to_flat`](crate::models::Schedule::to_flat)).
    pub best_schedule: Vec<u32>,
    /// Fitness of `best_schedule`.
    pub best_fitness: i64,
    /// Best fitness at each sampled generation.
    pub best_fitness_per_generation: Vec<i64>,
    /// Mean fitness at each sampled generation.
    pub mean_fitness_per_generation: Vec<f64>,
}

impl RunResult {
    /// Compact JSON form.
    pub fn to_json(&self) -> Result<String, SinkError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Receives finished runs.
pub trait ResultSink {
    /// Accepts one run result.
    fn accept(&mut self, result: &RunResult) -> Result<(), SinkError>;
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn accept(&mut self, result: &RunResult) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, result)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps results in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Results in arrival order.
    pub results: Vec<RunResult>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for MemorySink {
    fn accept(&mut self, result: &RunResult) -> Result<(), SinkError> {
        self.results.push(result.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(seed: u64) -> RunResult {
        RunResult {
            seed,
            elapsed_seconds: 1.5,
            is_optimal: false,
            generation_count: 3,
            best_schedule: vec![0, 1, 2, 0],
            best_fitness: 90,
            best_fitness_per_generation: vec![70, 80, 90, 90],
            mean_fitness_per_generation: vec![50.0, 60.5, 71.0, 75.25],
        }
    }

    #[test]
    fn test_camel_case_keys() {
        let json = sample(7).to_json().unwrap();
        assert!(json.contains("\"elapsedSeconds\":1.5"));
        assert!(json.contains("\"isOptimal\":false"));
        assert!(json.contains("\"bestFitnessPerGeneration\":[70,80,90,90]"));
        assert!(json.contains("\"meanFitnessPerGeneration\""));
        assert!(!json.contains("best_fitness"));

        let back: RunResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample(7));
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.accept(&sample(1)).unwrap();
        sink.accept(&sample(2)).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: RunResult = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.seed, 2);
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.accept(&sample(4)).unwrap();
        assert_eq!(sink.results, vec![sample(4)]);
    }
}
