use crate::models::audio_models::AudioLevels;

/// Compute RMS level of samples (0.0–1.0 range for normalized audio).
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Compute peak absolute level of samples.
pub fn peak_level(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

pub fn measure(samples: &[f32]) -> AudioLevels {
    AudioLevels {
        level: rms_level(samples),
        peak_level: peak_level(samples),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rms_level_silence() {
        assert_eq!(rms_level(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(rms_level(&[]), 0.0);
    }

    #[test]
    fn rms_level_full_scale() {
        assert_relative_eq!(rms_level(&[1.0, -1.0, 1.0]), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn peak_level_basic() {
        assert_relative_eq!(peak_level(&[0.1, -0.5, 0.3]), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn measure_combines_both() {
        let levels = measure(&[0.6, -0.8]);
        assert_relative_eq!(levels.peak_level, 0.8, epsilon = 1e-6);
        assert_relative_eq!(levels.level, (0.5f32).sqrt(), epsilon = 1e-6);
    }
}
