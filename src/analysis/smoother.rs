//! Noise smoothing
//!
//! Zeroes envelope entries at or below a fixed amplitude threshold.

use super::envelope::Envelope;

/// Keep entries strictly above `threshold`, zero the rest
pub fn smooth(envelope: &Envelope, threshold: i32) -> Envelope {
    envelope
        .values()
        .iter()
        .map(|&value| if value > threshold { value } else { 0 })
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_smooth_zeroes_noise() {
        let envelope = Envelope::new(vec![5, 20, 15, 90, 85, 80, 2, 1, 1, 1, 1, 1, 1]);
        let smoothed = smooth(&envelope, 10);
        assert_eq!(
            smoothed.values(),
            &[0, 20, 15, 90, 85, 80, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let smoothed = smooth(&Envelope::new(vec![100, 101, 99]), 100);
        assert_eq!(smoothed.values(), &[0, 101, 0]);
    }

    #[test]
    fn test_negative_values_zeroed() {
        let smoothed = smooth(&Envelope::new(vec![-5, -200]), 0);
        assert_eq!(smoothed.values(), &[0, 0]);
    }

    #[test]
    fn test_entries_are_zero_or_unchanged() {
        let envelope = Envelope::new((0..500).map(|i| (i * 37) % 311 - 50).collect());
        let smoothed = smooth(&envelope, 100);

        assert_eq!(smoothed.len(), envelope.len());
        for (out, input) in smoothed.values().iter().zip(envelope.values()) {
            assert!(*out == 0 || out == input);
        }
    }

    #[test]
    fn test_empty_envelope() {
        assert!(smooth(&Envelope::default(), 100).is_empty());
    }
}
