use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::{Error, Result};

/// Parameters of one ant-system run.
#[derive(Debug, Clone, PartialEq)]
pub struct AcoConfig {
    pub num_ants: Option<usize>, // Defaults to the number of cities
    pub alpha: f64,              // Pheromone influence
    pub beta: f64,               // Heuristic influence
    pub rho: f64,                // Evaporation rate
    pub q: f64,                  // Pheromone deposit amount scaling factor
    pub max_iterations: usize,
    pub convergence_threshold: usize, // Iterations without improvement before stopping
    pub seed: Option<u64>,
    pub initial_pheromone: f64,
    pub min_pheromone: f64, // Floor applied after evaporation
    pub parallel: bool,     // Build the ants' tours on the rayon pool
}

impl Default for AcoConfig {
    fn default() -> Self {
        AcoConfig {
            num_ants: None,
            alpha: 1.0,
            beta: 2.0,
            rho: 0.5,
            q: 1.0,
            max_iterations: 200,
            convergence_threshold: 100,
            seed: None,
            initial_pheromone: 1.0,
            min_pheromone: 1e-10,
            parallel: true,
        }
    }
}

impl AcoConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of ants for an instance of `num_cities` cities.
    pub fn ants_for(&self, num_cities: usize) -> usize {
        self.num_ants.unwrap_or(num_cities)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_ants == Some(0) {
            return Err(Error::parameter("num_ants", "must be greater than 0"));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(Error::parameter(
                "alpha",
                format!("must be a finite value >= 0, got {}", self.alpha),
            ));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(Error::parameter(
                "beta",
                format!("must be a finite value >= 0, got {}", self.beta),
            ));
        }
        if !(self.rho > 0.0 && self.rho <= 1.0) {
            return Err(Error::parameter(
                "rho",
                format!("must be in (0, 1], got {}", self.rho),
            ));
        }
        if !(self.q.is_finite() && self.q > 0.0) {
            return Err(Error::parameter(
                "q",
                format!("must be a finite value > 0, got {}", self.q),
            ));
        }
        if self.max_iterations == 0 {
            return Err(Error::parameter("max_iterations", "must be greater than 0"));
        }
        if self.convergence_threshold == 0 {
            return Err(Error::parameter(
                "convergence_threshold",
                "must be greater than 0",
            ));
        }
        if !(self.initial_pheromone.is_finite() && self.initial_pheromone > 0.0) {
            return Err(Error::parameter(
                "initial_pheromone",
                format!("must be a finite value > 0, got {}", self.initial_pheromone),
            ));
        }
        if !(self.min_pheromone.is_finite() && self.min_pheromone > 0.0) {
            return Err(Error::parameter(
                "min_pheromone",
                format!("must be a finite value > 0, got {}", self.min_pheromone),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Decide from the file extension (`.tsp` is TSPLIB, anything else CSV)
    Auto,
    Tsplib,
    Csv,
}

/// Solve a TSP instance with the Ant System.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// TSPLIB (.tsp) file or CSV distance matrix
    file_path: PathBuf,

    /// Number of ants per iteration [default: number of cities]
    #[arg(short = 'n', long = "ants")]
    num_ants: Option<usize>,

    #[arg(short = 'i', long = "iters", default_value_t = 200)]
    num_iters: usize,

    /// Iterations without improvement before stopping
    #[arg(short = 't', long = "threshold", default_value_t = 100)]
    convergence_threshold: usize,

    #[arg(short = 'a', long, default_value_t = 1.0)]
    alpha: f64,

    #[arg(short = 'b', long, default_value_t = 2.0)]
    beta: f64,

    #[arg(short = 'e', long = "evap-rate", default_value_t = 0.5)]
    evap_rate: f64,

    #[arg(short = 'q', long = "q-val", default_value_t = 1.0)]
    q_val: f64,

    #[arg(short = 'p', long = "init-pheromone", default_value_t = 1.0)]
    init_pheromone: f64,

    #[arg(short = 'm', long = "min-pheromone-val", default_value_t = 1e-10)]
    min_pheromone_val: f64,

    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Build tours on a single thread
    #[arg(long)]
    sequential: bool,

    #[arg(short = 'f', long, value_enum, default_value_t = InputFormat::Auto)]
    format: InputFormat,

    /// File of known optimal lengths (`name : length` per line)
    #[arg(long)]
    solutions: Option<PathBuf>,

    /// Write the convergence history as `iteration,best_length` lines
    #[arg(long)]
    history_out: Option<PathBuf>,

    /// Write the best tour, one city index per line
    #[arg(long)]
    tour_out: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

/// Everything the binary needs for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub file_path: PathBuf,
    pub format: InputFormat,
    pub aco: AcoConfig,
    pub solutions_path: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
    pub tour_path: Option<PathBuf>,
    pub json: bool,
}

impl Config {
    pub fn build<I, T>(args: I) -> std::result::Result<Config, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        Ok(Config {
            file_path: cli.file_path,
            format: cli.format,
            aco: AcoConfig {
                num_ants: cli.num_ants,
                alpha: cli.alpha,
                beta: cli.beta,
                rho: cli.evap_rate,
                q: cli.q_val,
                max_iterations: cli.num_iters,
                convergence_threshold: cli.convergence_threshold,
                seed: cli.seed,
                initial_pheromone: cli.init_pheromone,
                min_pheromone: cli.min_pheromone_val,
                parallel: !cli.sequential,
            },
            solutions_path: cli.solutions,
            history_path: cli.history_out,
            tour_path: cli.tour_out,
            json: cli.json,
        })
    }
}
