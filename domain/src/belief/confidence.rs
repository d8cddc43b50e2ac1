//! Confidence arithmetic shared by beliefs and frames.

/// The neutral confidence used whenever evidence is absent or unscorable.
pub const NEUTRAL_CONFIDENCE: f64 = 0.5;

/// Clamp a raw value into [0, 1]. NaN maps to [`NEUTRAL_CONFIDENCE`].
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        NEUTRAL_CONFIDENCE
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Frame-weighted exponential blend: `(1 - weight) * current + weight * strength`.
pub fn blend(current: f64, strength: f64, weight: f64) -> f64 {
    let weight = clamp_confidence(weight);
    clamp_confidence((1.0 - weight) * current + weight * strength)
}
