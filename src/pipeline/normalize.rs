//! Min-max scaling of CLTV values into [0, 1]

/// Value assigned to every customer when all CLTV values are equal.
///
/// A zero range maps to the lower bound of the target interval.
pub const DEGENERATE_SCALE_VALUE: f64 = 0.0;

/// Result of scaling a population of values
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledValues {
    pub values: Vec<f64>,
    /// True when min == max and every value was set to [`DEGENERATE_SCALE_VALUE`]
    pub degenerate: bool,
}

/// Linearly rescale `values` so the minimum maps to 0 and the maximum to 1.
pub fn min_max_scale(values: &[f64]) -> ScaledValues {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if values.is_empty() || range == 0.0 || !range.is_finite() {
        return ScaledValues {
            values: vec![DEGENERATE_SCALE_VALUE; values.len()],
            degenerate: true,
        };
    }

    let scaled = values
        .iter()
        .map(|v| ((v - min) / range).clamp(0.0, 1.0))
        .collect();

    ScaledValues {
        values: scaled,
        degenerate: false,
    }
}
