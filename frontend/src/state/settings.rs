//! Dispatch pacing configuration.
//!
//! Held for the session only; the values travel with each job submission
//! and are never persisted anywhere durable.

use common::error::{Error, Result};

/// How fast the backend dispatcher may drain a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub rate_per_hour: u32,
    pub pause_seconds: u32,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            rate_per_hour: 100,
            pause_seconds: 5,
        }
    }
}

impl DispatchSettings {
    /// Applies new pacing values. The rate must be positive; the pause is
    /// clamped to zero. On failure the previous values are kept.
    pub fn update(&mut self, rate_per_hour: i64, pause_seconds: i64) -> Result<()> {
        if rate_per_hour <= 0 {
            return Err(Error::Validation(
                "emails per hour must be greater than zero".into(),
            ));
        }
        self.rate_per_hour = u32::try_from(rate_per_hour).unwrap_or(u32::MAX);
        self.pause_seconds = u32::try_from(pause_seconds.max(0)).unwrap_or(u32::MAX);
        Ok(())
    }

    /// Parses and applies the raw form inputs.
    pub fn apply_inputs(&mut self, rate: &str, pause: &str) -> Result<()> {
        let rate = rate
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::Validation("emails per hour must be a whole number".into()))?;
        let pause = pause
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::Validation("pause seconds must be a whole number".into()))?;
        self.update(rate, pause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let settings = DispatchSettings::default();
        assert_eq!(settings.rate_per_hour, 100);
        assert_eq!(settings.pause_seconds, 5);
    }

    #[test]
    fn zero_rate_is_rejected_and_prior_values_kept() {
        let mut settings = DispatchSettings::default();
        settings.update(250, 2).unwrap();

        let err = settings.update(0, 5).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(settings.rate_per_hour, 250);
        assert_eq!(settings.pause_seconds, 2);
    }

    #[test]
    fn negative_pause_is_clamped() {
        let mut settings = DispatchSettings::default();
        settings.update(50, -3).unwrap();
        assert_eq!(settings.pause_seconds, 0);
        assert_eq!(settings.rate_per_hour, 50);
    }

    #[test]
    fn non_numeric_inputs_are_validation_errors() {
        let mut settings = DispatchSettings::default();
        assert!(matches!(
            settings.apply_inputs("fast", "5"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            settings.apply_inputs("100", ""),
            Err(Error::Validation(_))
        ));
        assert_eq!(settings, DispatchSettings::default());
    }
}
