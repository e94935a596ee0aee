use std::collections::HashMap;
use std::fs::File as StdFile;
use std::io::{BufRead, BufReader as StdBufReader, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::ParseError;
use crate::solver::{Solution, Termination};
use crate::tour::Tour;

/// Reads known optimal tour lengths, one `name : length` entry per line.
pub fn load_optimal_solutions(file_path: &Path) -> Result<HashMap<String, f64>, ParseError> {
    let file = StdFile::open(file_path).map_err(|source| ParseError::Io {
        path: file_path.display().to_string(),
        source,
    })?;
    parse_optimal_solutions(StdBufReader::new(file))
}

/// Names are lower-cased and cut at the first whitespace, so
/// `berlin52 (52 cities) : 7542 km` maps `berlin52` to 7542.
pub fn parse_optimal_solutions(reader: impl BufRead) -> Result<HashMap<String, f64>, ParseError> {
    let mut solutions = HashMap::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| ParseError::Syntax {
            line: idx + 1,
            message: format!("read error: {}", e),
        })?;
        let Some((name_part, value_part)) = line.split_once(':') else {
            continue;
        };
        let Some(clean_name) = name_part.split_whitespace().next() else {
            continue;
        };
        let value_str = value_part.split_whitespace().next().unwrap_or("");

        let value = value_str.parse::<f64>().map_err(|e| ParseError::Syntax {
            line: idx + 1,
            message: format!("invalid solution value for {}: '{}': {}", clean_name, value_str, e),
        })?;
        solutions.insert(clean_name.to_lowercase(), value);
    }
    Ok(solutions)
}

/// Percentage by which `found_length` exceeds `optimal_length`.
pub fn gap_percent(found_length: f64, optimal_length: f64) -> f64 {
    if optimal_length == 0.0 {
        if found_length == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        (found_length - optimal_length) / optimal_length * 100.0
    }
}

/// Looks up `problem_name` and returns the known optimum and the gap to it.
pub fn evaluate_solution(
    problem_name: &str,
    found_length: f64,
    optimal_solutions: &HashMap<String, f64>,
) -> Option<(f64, f64)> {
    optimal_solutions
        .get(&problem_name.to_lowercase())
        .map(|&optimal| (optimal, gap_percent(found_length, optimal)))
}

/// Summary of a run, printed as text or JSON by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub instance: String,
    pub cities: usize,
    pub best_length: f64,
    pub best_tour: Vec<usize>,
    pub iterations: usize,
    pub termination: Termination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_percent: Option<f64>,
}

impl RunReport {
    pub fn new(instance: &str, solution: &Solution, optimum: Option<(f64, f64)>) -> Self {
        RunReport {
            instance: instance.to_string(),
            cities: solution.best_tour.len(),
            best_length: solution.best_length,
            best_tour: solution.best_tour.canonical().into_cities(),
            iterations: solution.iterations,
            termination: solution.termination,
            optimal_length: optimum.map(|(opt, _)| opt),
            gap_percent: optimum.map(|(_, gap)| gap),
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = format!(
            "Instance: {} ({} cities)\nBest tour length: {:.2}\nIterations: {} ({:?})\nBest tour: {:?}",
            self.instance,
            self.cities,
            self.best_length,
            self.iterations,
            self.termination,
            self.best_tour
        );
        if let (Some(opt), Some(gap)) = (self.optimal_length, self.gap_percent) {
            out.push_str(&format!("\nKnown optimum: {:.2} (gap {:.2}%)", opt, gap));
        }
        out
    }
}

/// Writes the convergence history as `iteration,best_length` lines.
pub fn write_history(mut out: impl Write, history: &[f64]) -> std::io::Result<()> {
    writeln!(out, "iteration,best_length")?;
    for (iteration, length) in history.iter().enumerate() {
        writeln!(out, "{},{}", iteration, length)?;
    }
    Ok(())
}

/// Writes the tour in canonical order, one city index per line.
pub fn write_tour(mut out: impl Write, tour: &Tour) -> std::io::Result<()> {
    for city in tour.canonical().cities() {
        writeln!(out, "{}", city)?;
    }
    Ok(())
}
