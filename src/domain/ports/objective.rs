use crate::domain::errors::ObjectiveError;

/// A scalar function minimized by the search engine.
pub trait Objective {
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError>;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> Result<f64, ObjectiveError>,
{
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        self(position)
    }
}
