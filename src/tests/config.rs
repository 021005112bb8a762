use crate::{config::VerifierConfig, error::ConfigError};

#[test]
fn rejects_zero_epoch_size() {
  assert_eq!(VerifierConfig::new(1, 0, 0).unwrap_err(), ConfigError::InvalidEpochSize);
}

#[test]
fn block_range_is_inclusive_and_contiguous() {
  let config = VerifierConfig::new(1, 100, 50).unwrap();
  assert_eq!(config.block_range(1), (100, 149));
  assert_eq!(config.block_range(2), (150, 199));
}
