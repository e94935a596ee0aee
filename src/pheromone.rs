use crate::matrix::PheromoneMatrix;
use crate::tour::Tour;

/// Applies one ant-system update: evaporation of every trail, then a deposit
/// of `q / L` on each edge of every tour in the batch.
///
/// Must be called with the complete batch of an iteration. Deposits from
/// different ants on the same edge add up. Tours with a non-positive length
/// deposit nothing.
pub fn update_pheromones(
    pheromone: &mut PheromoneMatrix,
    tours: &[Tour],
    lengths: &[f64],
    rho: f64,
    q: f64,
    min_pheromone: f64,
) {
    debug_assert_eq!(tours.len(), lengths.len());

    pheromone.evaporate(rho, min_pheromone);

    for (tour, &length) in tours.iter().zip(lengths) {
        if length <= 0.0 {
            continue;
        }
        let amount = q / length;
        for (a, b) in tour.edges() {
            pheromone.deposit(a, b, amount);
        }
    }
}
