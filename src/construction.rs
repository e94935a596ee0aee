use rand::Rng;
use rand::prelude::IndexedRandom;

use crate::matrix::{DistanceMatrix, PheromoneMatrix};
use crate::tour::Tour;

/// Construction state of a single ant, dropped once its tour is complete.
struct Ant {
    tour: Vec<usize>,
    visited: Vec<bool>,
    current_city_idx: usize,
}

impl Ant {
    fn new(start_node: usize, num_cities: usize) -> Self {
        let mut visited = vec![false; num_cities];
        visited[start_node] = true;
        let mut tour = Vec::with_capacity(num_cities);
        tour.push(start_node);
        Ant {
            tour,
            visited,
            current_city_idx: start_node,
        }
    }

    fn visit_city(&mut self, city_idx: usize) {
        self.tour.push(city_idx);
        self.visited[city_idx] = true;
        self.current_city_idx = city_idx;
    }

    fn tour_completed(&self) -> bool {
        self.tour.len() == self.visited.len()
    }

    fn unvisited(&self) -> Vec<usize> {
        (0..self.visited.len())
            .filter(|&i| !self.visited[i])
            .collect()
    }
}

/// Picks an index from `weights` given a uniform `draw` in `[0, 1)`.
///
/// `weights` should sum to 1. The first index whose cumulative weight exceeds
/// `draw` wins; if rounding leaves `draw` beyond the final sum, the last
/// index with a positive weight is returned. Returns `None` when no weight is
/// positive.
pub fn roulette_select(weights: &[f64], draw: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (idx, &w) in weights.iter().enumerate() {
        if w > 0.0 {
            cumulative += w;
            last_positive = Some(idx);
            if draw < cumulative {
                return Some(idx);
            }
        }
    }
    last_positive
}

/// Attractiveness of moving along `from -> to`: `tau^alpha * eta^beta`.
///
/// Non-finite results count as zero so they cannot poison the distribution.
pub fn edge_weight(
    dist: &DistanceMatrix,
    pheromone: &PheromoneMatrix,
    from: usize,
    to: usize,
    alpha: f64,
    beta: f64,
) -> f64 {
    let w = pheromone.get(from, to).powf(alpha) * dist.heuristic(from, to).powf(beta);
    if w.is_finite() && w > 0.0 { w } else { 0.0 }
}

/// Builds one tour with the ant-system transition rule.
///
/// Reads `dist` and `pheromone` only; the same generator state always yields
/// the same tour.
pub fn build_tour<R: Rng + ?Sized>(
    dist: &DistanceMatrix,
    pheromone: &PheromoneMatrix,
    alpha: f64,
    beta: f64,
    rng: &mut R,
) -> Tour {
    let n_cities = dist.len();
    let mut ant = Ant::new(rng.random_range(0..n_cities), n_cities);
    let mut weights = Vec::with_capacity(n_cities);

    while !ant.tour_completed() {
        let current_city = ant.current_city_idx;
        let candidates = ant.unvisited();

        weights.clear();
        weights.extend(
            candidates
                .iter()
                .map(|&next| edge_weight(dist, pheromone, current_city, next, alpha, beta)),
        );
        let total: f64 = weights.iter().sum();

        let chosen = if total.is_finite() && total > 0.0 {
            for w in weights.iter_mut() {
                *w /= total;
            }
            roulette_select(&weights, rng.random::<f64>()).map(|idx| candidates[idx])
        } else {
            None
        };

        // Underflow, overflow or degenerate input: any unvisited city will do.
        let next_city = match chosen {
            Some(city) => city,
            None => match candidates.choose(rng) {
                Some(&city) => city,
                None => break,
            },
        };
        ant.visit_city(next_city);
    }

    Tour::new(ant.tour)
}
