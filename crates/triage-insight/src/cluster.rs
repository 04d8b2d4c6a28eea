//! Seeded k-means over dense vectors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::InsightError;

pub const DEFAULT_SEED: u64 = 42;
const DEFAULT_MAX_ITERATIONS: usize = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub centroids: Vec<Vec<f32>>,
    /// Cluster index per input point.
    pub assignments: Vec<usize>,
    pub iterations: usize,
}

impl Clustering {
    /// Index of the input point nearest each centroid, in centroid order.
    pub fn representatives(&self, points: &[Vec<f32>]) -> Vec<usize> {
        self.centroids
            .iter()
            .filter_map(|c| nearest(points, c))
            .collect()
    }
}

/// Lloyd's algorithm with k-means++ seeding. The same seed and input always
/// produce the same clustering.
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    seed: u64,
    max_iterations: usize,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn fit(&self, points: &[Vec<f32>]) -> Result<Clustering, InsightError> {
        if points.is_empty() {
            return Err(InsightError::InsufficientData("no points to cluster".into()));
        }
        if self.k == 0 || self.k > points.len() {
            return Err(InsightError::Clustering(format!(
                "cannot form {} clusters from {} points",
                self.k,
                points.len()
            )));
        }
        let dim = points[0].len();
        if points.iter().any(|p| p.len() != dim) {
            return Err(InsightError::Clustering("points differ in dimension".into()));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.init_centroids(points, &mut rng);
        let mut assignments = vec![usize::MAX; points.len()];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            let mut changed = false;
            for (i, p) in points.iter().enumerate() {
                let nearest = nearest(&centroids, p).unwrap_or(0);
                if assignments[i] != nearest {
                    assignments[i] = nearest;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            for (c, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&Vec<f32>> = points
                    .iter()
                    .zip(&assignments)
                    .filter(|(_, a)| **a == c)
                    .map(|(p, _)| p)
                    .collect();
                // An empty cluster keeps its previous centroid.
                if members.is_empty() {
                    continue;
                }
                let n = members.len() as f32;
                *centroid = (0..dim)
                    .map(|d| members.iter().map(|m| m[d]).sum::<f32>() / n)
                    .collect();
            }
        }

        Ok(Clustering {
            centroids,
            assignments,
            iterations,
        })
    }

    /// k-means++: first centroid uniformly at random, then each next one with
    /// probability proportional to squared distance from the chosen set.
    fn init_centroids(&self, points: &[Vec<f32>], rng: &mut StdRng) -> Vec<Vec<f32>> {
        let mut chosen = vec![rng.random_range(0..points.len())];

        while chosen.len() < self.k {
            let weights: Vec<f32> = points
                .iter()
                .map(|p| {
                    chosen
                        .iter()
                        .map(|&c| squared_distance(p, &points[c]))
                        .fold(f32::INFINITY, f32::min)
                })
                .collect();
            let total: f32 = weights.iter().sum();

            let next = if total > 0.0 {
                let mut target = rng.random::<f32>() * total;
                weights
                    .iter()
                    .position(|w| {
                        target -= w;
                        target <= 0.0 && *w > 0.0
                    })
                    .unwrap_or_else(|| weights.iter().rposition(|w| *w > 0.0).unwrap_or(0))
            } else {
                // All remaining points coincide with a centroid.
                (0..points.len()).find(|i| !chosen.contains(i)).unwrap_or(0)
            };
            chosen.push(next);
        }

        chosen.into_iter().map(|i| points[i].clone()).collect()
    }
}

pub fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the point nearest `target` (Euclidean); ties go to the lowest index.
pub fn nearest(points: &[Vec<f32>], target: &[f32]) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, squared_distance(p, target)))
        .fold(None, |best: Option<(usize, f32)>, (i, d)| match best {
            Some((_, bd)) if bd <= d => best,
            _ => Some((i, d)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
        ]
    }

    #[test]
    fn test_separates_two_blobs() {
        let c = KMeans::new(2).fit(&blobs()).unwrap();
        assert_eq!(c.assignments[0], c.assignments[1]);
        assert_eq!(c.assignments[1], c.assignments[2]);
        assert_eq!(c.assignments[3], c.assignments[4]);
        assert_eq!(c.assignments[4], c.assignments[5]);
        assert_ne!(c.assignments[0], c.assignments[3]);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = KMeans::new(3).fit(&blobs()).unwrap();
        let b = KMeans::new(3).fit(&blobs()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_representatives_are_members() {
        let points = blobs();
        let c = KMeans::new(2).fit(&points).unwrap();
        let reps = c.representatives(&points);
        assert_eq!(reps.len(), 2);
        for (cluster, rep) in reps.iter().enumerate() {
            assert_eq!(c.assignments[*rep], cluster);
        }
    }

    #[test]
    fn test_identical_points() {
        let points = vec![vec![0.0, 0.0]; 4];
        let c = KMeans::new(3).fit(&points).unwrap();
        assert_eq!(c.centroids.len(), 3);
        assert!(c.assignments.iter().all(|a| *a < 3));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            KMeans::new(2).fit(&[]),
            Err(InsightError::InsufficientData(_))
        ));
        assert!(matches!(
            KMeans::new(0).fit(&blobs()),
            Err(InsightError::Clustering(_))
        ));
        assert!(matches!(
            KMeans::new(7).fit(&blobs()),
            Err(InsightError::Clustering(_))
        ));
        let ragged = vec![vec![0.0, 1.0], vec![0.0]];
        assert!(matches!(
            KMeans::new(1).fit(&ragged),
            Err(InsightError::Clustering(_))
        ));
    }

    #[test]
    fn test_nearest() {
        let points = vec![vec![0.0], vec![2.0], vec![2.0]];
        assert_eq!(nearest(&points, &[1.9]), Some(1));
        assert_eq!(nearest(&[], &[1.0]), None);
    }
}
