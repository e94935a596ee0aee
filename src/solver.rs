use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AcoConfig;
use crate::construction::build_tour;
use crate::error::{Error, Result};
use crate::matrix::{DistanceMatrix, PheromoneMatrix};
use crate::pheromone::update_pheromones;
use crate::tour::Tour;

/// Why the optimization loop stopped. Both are successful outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The best length did not improve for `convergence_threshold` iterations.
    Converged,
    /// `max_iterations` were run without converging.
    Exhausted,
}

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub best_tour: Tour,
    pub best_length: f64,
    /// Global best length after each iteration.
    pub history: Vec<f64>,
    pub iterations: usize,
    pub termination: Termination,
}

/// Tours built in one iteration, in ant order.
#[derive(Debug, Clone)]
pub struct Batch {
    pub tours: Vec<Tour>,
    pub lengths: Vec<f64>,
}

/// Returns true once `stable` iterations have passed without improvement.
pub fn should_stop(stable: usize, threshold: usize) -> bool {
    stable >= threshold
}

/// Mutable state of a run: pheromone trails, global best and counters.
#[derive(Debug, Clone)]
pub struct OptimizerState {
    pub pheromone: PheromoneMatrix,
    pub best_tour: Option<Tour>,
    pub best_length: f64,
    pub stable_iterations: usize,
    pub iteration: usize,
    pub history: Vec<f64>,
}

impl OptimizerState {
    pub fn new(num_cities: usize, initial_pheromone: f64) -> Self {
        OptimizerState {
            pheromone: PheromoneMatrix::uniform(num_cities, initial_pheromone),
            best_tour: None,
            best_length: f64::INFINITY,
            stable_iterations: 0,
            iteration: 0,
            history: Vec::new(),
        }
    }

    /// Runs one iteration: builds a batch of tours, tracks the best one,
    /// records the history and updates the trails.
    ///
    /// `master` provides one seed per ant so each tour gets its own stream,
    /// whether the batch is built sequentially or on the rayon pool.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        dist: &DistanceMatrix,
        config: &AcoConfig,
        master: &mut R,
    ) -> Result<Batch> {
        let num_ants = config.ants_for(dist.len());
        let seeds: Vec<u64> = (0..num_ants).map(|_| master.random::<u64>()).collect();

        let pheromone = &self.pheromone;
        let construct = |seed: &u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(*seed);
            let tour = build_tour(dist, pheromone, config.alpha, config.beta, &mut rng);
            let length = tour.length(dist);
            (tour, length)
        };
        let built: Vec<(Tour, f64)> = if config.parallel {
            seeds.par_iter().map(construct).collect()
        } else {
            seeds.iter().map(construct).collect()
        };
        let (tours, lengths): (Vec<Tour>, Vec<f64>) = built.into_iter().unzip();

        if let Some(&length) = lengths.iter().find(|l| !l.is_finite()) {
            return Err(Error::NonFiniteTourLength {
                iteration: self.iteration,
                length,
            });
        }

        let mut iter_best: Option<usize> = None;
        for (idx, &length) in lengths.iter().enumerate() {
            if iter_best.is_none_or(|b| length < lengths[b]) {
                iter_best = Some(idx);
            }
        }

        match iter_best {
            Some(idx) if lengths[idx] < self.best_length => {
                debug!(
                    iteration = self.iteration,
                    length = lengths[idx],
                    previous = self.best_length,
                    "new best tour"
                );
                self.best_length = lengths[idx];
                self.best_tour = Some(tours[idx].clone());
                self.stable_iterations = 0;
            }
            _ => self.stable_iterations += 1,
        }
        self.history.push(self.best_length);

        update_pheromones(
            &mut self.pheromone,
            &tours,
            &lengths,
            config.rho,
            config.q,
            config.min_pheromone,
        );
        self.iteration += 1;

        Ok(Batch { tours, lengths })
    }

    /// Termination reason if the run should stop now.
    pub fn termination(&self, config: &AcoConfig) -> Option<Termination> {
        if should_stop(self.stable_iterations, config.convergence_threshold) {
            Some(Termination::Converged)
        } else if self.iteration >= config.max_iterations {
            Some(Termination::Exhausted)
        } else {
            None
        }
    }
}

/// Runs the ant system on `dist` until convergence or `max_iterations`.
pub fn solve(dist: &DistanceMatrix, config: &AcoConfig) -> Result<Solution> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    if config.seed.is_none() {
        info!(seed, "no seed given, drew one from the thread generator");
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    solve_with_rng(dist, config, &mut rng)
}

/// Same as [`solve`] but draws all randomness from `rng`; `config.seed` is ignored.
pub fn solve_with_rng<R: Rng + ?Sized>(
    dist: &DistanceMatrix,
    config: &AcoConfig,
    rng: &mut R,
) -> Result<Solution> {
    config.validate()?;
    let n_cities = dist.len();
    info!(
        cities = n_cities,
        ants = config.ants_for(n_cities),
        alpha = config.alpha,
        beta = config.beta,
        rho = config.rho,
        q = config.q,
        seed = ?config.seed,
        "starting ant system"
    );

    let mut state = OptimizerState::new(n_cities, config.initial_pheromone);
    let termination = loop {
        state.step(dist, config, rng)?;

        let iteration = state.iteration - 1;
        if iteration % 100 == 0 || state.iteration == config.max_iterations {
            info!(
                "Iter {}: Best tour length so far: {:.2}",
                iteration, state.best_length
            );
        }

        if let Some(reason) = state.termination(config) {
            break reason;
        }
    };

    let best_tour = match state.best_tour {
        Some(tour) => tour,
        None => {
            return Err(Error::NonFiniteTourLength {
                iteration: state.iteration,
                length: state.best_length,
            });
        }
    };
    info!(
        iterations = state.iteration,
        best_length = state.best_length,
        ?termination,
        "ant system finished"
    );

    Ok(Solution {
        best_tour,
        best_length: state.best_length,
        history: state.history,
        iterations: state.iteration,
        termination,
    })
}
