use crate::shape::Shape;
use crate::spot::Spot;

/// Grades how well a spot looks like a given shape.
pub trait ShapeClassifier: Sync {
    /// Grade in [0, 100].
    fn evaluate(&self, spot: &Spot, shape: Shape) -> anyhow::Result<f64>;
}
