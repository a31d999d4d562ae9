//! Catalogue of continuous benchmark functions.
//!
//! Every function is minimized and reaches its global minimum of 0 at the
//! origin, which lies inside each search domain.

use std::f64::consts::{E, PI};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::BenchmarkFunction;

const CSENDES_EPS: f64 = 1e-20;

fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

fn csendes(x: &[f64]) -> f64 {
    x.iter()
        .map(|&v| v.powi(6) * (2.0 + (1.0 / (v + CSENDES_EPS)).sin()))
        .sum()
}

fn salomon(x: &[f64]) -> f64 {
    let w = sphere(x).sqrt();
    0.1f64.mul_add(w, 1.0 - (2.0 * PI * w).cos())
}

fn ackley1(x: &[f64]) -> f64 {
    let inv_dim = 1.0 / x.len() as f64;
    let radial = -0.02 * (inv_dim * sphere(x)).sqrt();
    let periodic = inv_dim * x.iter().map(|v| (2.0 * PI * v).cos()).sum::<f64>();
    (-20.0f64).mul_add(radial.exp(), -periodic.exp()) + 20.0 + E
}

fn alpine1(x: &[f64]) -> f64 {
    x.iter().map(|&v| v.mul_add(v.sin(), 0.1 * v).abs()).sum()
}

fn rastrigin(x: &[f64]) -> f64 {
    let dim = x.len() as f64;
    10.0f64.mul_add(
        dim,
        x.iter()
            .map(|v| v * v - 10.0 * (2.0 * PI * v).cos())
            .sum::<f64>(),
    )
}

fn schwefel(x: &[f64]) -> f64 {
    sphere(x).powf(PI.sqrt())
}

fn brown(x: &[f64]) -> f64 {
    x.windows(2)
        .map(|pair| {
            let (left, right) = (pair[0] * pair[0], pair[1] * pair[1]);
            left.powf(right + 1.0) + right.powf(left + 1.0)
        })
        .sum()
}

const CATALOGUE: [BenchmarkFunction; 8] = [
    BenchmarkFunction::new("sphere", sphere, -10.0, 10.0),
    BenchmarkFunction::new("csendes", csendes, -1.0, 1.0),
    BenchmarkFunction::new("salomon", salomon, -100.0, 100.0),
    BenchmarkFunction::new("ackley1", ackley1, -35.0, 35.0),
    BenchmarkFunction::new("alpine1", alpine1, -10.0, 10.0),
    BenchmarkFunction::new("rastrigin", rastrigin, -5.12, 5.12),
    BenchmarkFunction::new("schwefel", schwefel, -100.0, 100.0),
    BenchmarkFunction::new("brown", brown, -1.0, 4.0),
];

/// Look up a benchmark by its catalogue name.
pub fn get(name: &str) -> DomainResult<BenchmarkFunction> {
    CATALOGUE
        .iter()
        .find(|b| b.name == name)
        .copied()
        .ok_or_else(|| DomainError::UnknownBenchmark(name.to_string()))
}

/// Every registered benchmark, in catalogue order.
pub fn all() -> &'static [BenchmarkFunction] {
    &CATALOGUE
}
