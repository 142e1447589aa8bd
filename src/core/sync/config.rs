/*!
 * Synchronization Configuration
 *
 * Runtime configuration for wait strategy selection
 */

use crate::core::limits::{
    DEFAULT_MAX_SPINS, DEFAULT_SPIN_DURATION, LOW_LATENCY_MAX_SPINS, LOW_LATENCY_SPIN_DURATION,
};
use std::str::FromStr;
use std::time::Duration;

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyType {
    /// Condvar-based wait/notify (no CPU burned while blocked)
    Condvar,
    /// Polling with adaptive backoff (low latency for very short critical sections)
    SpinWait,
    /// Auto-select
    Auto,
}

impl FromStr for StrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "condvar" => Ok(Self::Condvar),
            "spinwait" | "spin" => Ok(Self::SpinWait),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown wait strategy: {other}")),
        }
    }
}

/// Synchronization configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Preferred strategy
    pub strategy: StrategyType,
    /// Spin duration before the spinner starts sleeping (SpinWait only)
    pub spin_duration: Duration,
    /// Spin iterations before the spinner starts sleeping (SpinWait only)
    pub max_spins: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Auto,
            spin_duration: DEFAULT_SPIN_DURATION,
            max_spins: DEFAULT_MAX_SPINS,
        }
    }
}

impl SyncConfig {
    /// Configuration optimized for very short critical sections
    pub const fn low_latency() -> Self {
        Self {
            strategy: StrategyType::SpinWait,
            spin_duration: LOW_LATENCY_SPIN_DURATION,
            max_spins: LOW_LATENCY_MAX_SPINS,
        }
    }

    /// Configuration optimized for long holds
    pub const fn long_wait() -> Self {
        Self {
            strategy: StrategyType::Condvar,
            spin_duration: Duration::from_micros(1),
            max_spins: 10,
        }
    }

    /// Resolve `Auto` to a concrete strategy
    pub fn select_strategy(&self) -> StrategyType {
        match self.strategy {
            // Hold times are unbounded; park instead of polling
            StrategyType::Auto => StrategyType::Condvar,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolves_to_condvar() {
        assert_eq!(SyncConfig::default().select_strategy(), StrategyType::Condvar);
    }

    #[test]
    fn test_presets() {
        assert_eq!(SyncConfig::low_latency().select_strategy(), StrategyType::SpinWait);
        assert_eq!(SyncConfig::long_wait().select_strategy(), StrategyType::Condvar);
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("Condvar".parse::<StrategyType>(), Ok(StrategyType::Condvar));
        assert_eq!(" spin ".parse::<StrategyType>(), Ok(StrategyType::SpinWait));
        assert!("futex".parse::<StrategyType>().is_err());
    }
}
