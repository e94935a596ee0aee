use crate::error::{Error, Result};

/// Heuristic value used for an off-diagonal zero distance, where `1/d` is undefined.
pub const ZERO_DISTANCE_HEURISTIC: f64 = 1e9;

/// Immutable square matrix of pairwise city distances.
///
/// Off-diagonal entries are finite and non-negative. The diagonal is never
/// read by the optimizer and may hold anything (0, NaN, inf).
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    dist: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n < 2 {
            return Err(Error::InvalidMatrix(format!(
                "at least 2 cities are required, got {}",
                n
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::InvalidMatrix(format!(
                    "row {} has {} entries, expected {} (matrix must be square)",
                    i,
                    row.len(),
                    n
                )));
            }
            for (j, &d) in row.iter().enumerate() {
                if i == j {
                    continue;
                }
                if !d.is_finite() {
                    return Err(Error::InvalidMatrix(format!(
                        "distance({}, {}) is not finite: {}",
                        i, j, d
                    )));
                }
                if d < 0.0 {
                    return Err(Error::InvalidMatrix(format!(
                        "distance({}, {}) is negative: {}",
                        i, j, d
                    )));
                }
            }
        }
        Ok(DistanceMatrix { dist: rows })
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.dist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dist.is_empty()
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.dist[from][to]
    }

    /// Desirability of the edge `from -> to`: the inverse distance.
    pub fn heuristic(&self, from: usize, to: usize) -> f64 {
        let d = self.dist[from][to];
        if d > 0.0 {
            1.0 / d
        } else {
            ZERO_DISTANCE_HEURISTIC
        }
    }
}

/// Symmetric matrix of trail strengths, evolved once per iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    tau: Vec<Vec<f64>>,
}

impl PheromoneMatrix {
    pub fn uniform(n: usize, value: f64) -> Self {
        PheromoneMatrix {
            tau: vec![vec![value; n]; n],
        }
    }

    pub fn len(&self) -> usize {
        self.tau.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tau.is_empty()
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.tau[from][to]
    }

    /// Multiplies every entry by `1 - rho`, never letting a trail drop below `floor`.
    pub fn evaporate(&mut self, rho: f64, floor: f64) {
        let keep = 1.0 - rho;
        for row in self.tau.iter_mut() {
            for value in row.iter_mut() {
                *value = (*value * keep).max(floor);
            }
        }
    }

    /// Adds `amount` to both directions of the edge `(a, b)`.
    pub fn deposit(&mut self, a: usize, b: usize, amount: f64) {
        self.tau[a][b] += amount;
        self.tau[b][a] += amount;
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.tau.len();
        (0..n).all(|i| (i + 1..n).all(|j| self.tau[i][j] == self.tau[j][i]))
    }

    /// Smallest trail strength in the matrix.
    pub fn min_value(&self) -> f64 {
        self.tau
            .iter()
            .flatten()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }
}
