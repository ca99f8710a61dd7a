//! Jittered exponential backoff for reconnecting to the panel host.

use std::time::Duration;

use rand::Rng;

use crate::config::HostConfig;

/// Delay before connection attempt number `attempt` (1-based).
///
/// The first attempt is immediate. Later attempts wait `base * 2^(attempt-2)`,
/// capped at `max`, plus up to 10% jitter.
pub fn connect_delay(attempt: u32, config: &HostConfig) -> Duration {
    if attempt <= 1 {
        return Duration::ZERO;
    }

    let factor = 2u64.saturating_pow(attempt - 2);
    let capped = config
        .backoff_base_ms
        .saturating_mul(factor)
        .min(config.backoff_max_ms);

    let jitter_range = capped / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_delay_grows_and_caps() {
        let config = HostConfig {
            connect_attempts: 10,
            backoff_base_ms: 100,
            backoff_max_ms: 1000,
        };

        assert_eq!(connect_delay(1, &config), Duration::ZERO);

        let second = connect_delay(2, &config).as_millis();
        assert!((100..110).contains(&second));

        let third = connect_delay(3, &config).as_millis();
        assert!((200..220).contains(&third));

        let capped = connect_delay(20, &config).as_millis();
        assert!((1000..1100).contains(&capped));
    }
}
