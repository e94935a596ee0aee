//! Ant System solver for the symmetric Traveling Salesman Problem.
//!
//! The core takes a [`DistanceMatrix`] and an [`AcoConfig`] and returns a
//! [`Solution`]: the best tour, its length and the convergence history.
//! [`parser`] loads TSPLIB or CSV instances and [`report`] formats results
//! for the command-line binary.

pub mod config;
pub mod construction;
pub mod error;
pub mod matrix;
pub mod parser;
pub mod pheromone;
pub mod report;
pub mod solver;
pub mod tour;

use std::fs::File as StdFile;
use std::io::BufWriter;

use tracing::warn;

pub use config::{AcoConfig, Config, InputFormat};
pub use construction::{build_tour, roulette_select};
pub use error::{Error, ParseError, Result};
pub use matrix::{DistanceMatrix, PheromoneMatrix};
pub use pheromone::update_pheromones;
pub use solver::{OptimizerState, Solution, Termination, should_stop, solve, solve_with_rng};
pub use tour::Tour;

/// Loads the instance named by `config`, solves it and prints the result.
pub fn run(config: &Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let instance = parser::load_instance(&config.file_path, config.format)?;
    let solution = solve(&instance.matrix, &config.aco)?;

    let optimum = match &config.solutions_path {
        Some(path) => {
            let known = report::load_optimal_solutions(path)?;
            let found = report::evaluate_solution(&instance.name, solution.best_length, &known);
            if found.is_none() {
                warn!(instance = %instance.name, "no known optimum for instance");
            }
            found
        }
        None => None,
    };

    if let Some(path) = &config.history_path {
        let file = StdFile::create(path)?;
        report::write_history(BufWriter::new(file), &solution.history)?;
    }

    if let Some(path) = &config.tour_path {
        let file = StdFile::create(path)?;
        report::write_tour(BufWriter::new(file), &solution.best_tour)?;
    }

    let run_report = report::RunReport::new(&instance.name, &solution, optimum);
    if config.json {
        println!("{}", serde_json::to_string_pretty(&run_report)?);
    } else {
        println!("{}", run_report.to_text());
    }
    Ok(())
}
