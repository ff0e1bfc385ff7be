use crate::core::{TransformConfig, TransformRequest};
use crate::utils::{CompressorError, CompressorResult};

/// Validates a transform request before any decode work happens.
pub fn validate_request(request: &TransformRequest) -> CompressorResult<()> {
    let quality = request.quality;
    // The negated comparison also rejects NaN
    if !(quality > 0.0 && quality <= 1.0) {
        return Err(CompressorError::validation(format!(
            "Invalid quality value: {}. Must be within (0, 1]", quality
        )));
    }
    Ok(())
}

/// Validates service configuration values.
pub fn validate_config(config: &TransformConfig) -> CompressorResult<()> {
    if let Some(dimension) = config.max_dimension {
        if dimension == 0 {
            return Err(CompressorError::validation("Max dimension cannot be 0"));
        }
    }

    if let Some(bytes) = config.max_output_bytes {
        if bytes == 0 {
            return Err(CompressorError::validation("Max output size cannot be 0"));
        }
    }

    if config.workers == 0 {
        return Err(CompressorError::validation("Worker count cannot be 0"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_quality_within_unit_interval() {
        for quality in [0.01, 0.5, 0.8, 1.0] {
            let request = TransformRequest { quality, ..Default::default() };
            assert!(validate_request(&request).is_ok());
        }
    }

    #[test]
    fn rejects_out_of_range_quality() {
        for quality in [0.0, -0.5, 1.01, f32::NAN] {
            let request = TransformRequest { quality, ..Default::default() };
            assert!(validate_request(&request).is_err());
        }
    }

    #[test]
    fn rejects_zeroed_config_limits() {
        let config = TransformConfig { max_dimension: Some(0), ..Default::default() };
        assert!(validate_config(&config).is_err());

        let config = TransformConfig { max_output_bytes: Some(0), ..Default::default() };
        assert!(validate_config(&config).is_err());

        let config = TransformConfig { workers: 0, ..Default::default() };
        assert!(validate_config(&config).is_err());

        assert!(validate_config(&TransformConfig::default()).is_ok());
    }

    #[test]
    fn disabled_limits_are_valid() {
        let config = TransformConfig {
            max_dimension: None,
            max_output_bytes: None,
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
