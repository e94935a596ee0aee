use serde::Serialize;

use crate::matrix::DistanceMatrix;

/// A Hamiltonian cycle stored as a permutation of `0..n`.
///
/// The closing edge (last city back to the first) is implicit: it is never
/// stored, but [`Tour::edges`] and [`Tour::length`] always include it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Tour(Vec<usize>);

impl Tour {
    pub fn new(cities: Vec<usize>) -> Self {
        Tour(cities)
    }

    pub fn cities(&self) -> &[usize] {
        &self.0
    }

    pub fn into_cities(self) -> Vec<usize> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The n cyclic edges of the tour, the closing edge last.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.0.len();
        (0..n).map(move |k| (self.0[k], self.0[(k + 1) % n]))
    }

    /// Sum of the distances over all cyclic edges.
    pub fn length(&self, dist: &DistanceMatrix) -> f64 {
        self.edges().map(|(a, b)| dist.distance(a, b)).sum()
    }

    /// Whether every index in `0..n` appears exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.0.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &city in &self.0 {
            if city >= n || seen[city] {
                return false;
            }
            seen[city] = true;
        }
        true
    }

    /// Rotates the tour to start at its smallest city and picks the direction
    /// whose second city is smaller, so equal cycles compare equal.
    pub fn canonical(&self) -> Tour {
        let n = self.0.len();
        if n < 3 {
            let mut cities = self.0.clone();
            cities.sort_unstable();
            return Tour(cities);
        }
        let start = self
            .0
            .iter()
            .enumerate()
            .min_by_key(|&(_, &c)| c)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let forward: Vec<usize> = (0..n).map(|k| self.0[(start + k) % n]).collect();
        let backward: Vec<usize> = (0..n).map(|k| self.0[(start + n - k) % n]).collect();
        if backward[1] < forward[1] {
            Tour(backward)
        } else {
            Tour(forward)
        }
    }
}
