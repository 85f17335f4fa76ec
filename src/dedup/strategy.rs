//! Keep-strategies for choosing the surviving record of a duplicate group.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use super::DedupError;

/// Policy for choosing one record among records sharing an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepStrategy {
    /// Highest completeness score wins; ties go to the earliest record
    #[default]
    MostComplete,
    /// Earliest record in input order
    First,
    /// Latest record in input order
    Last,
}

impl KeepStrategy {
    /// Stable label used on the command line and in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MostComplete => "most_complete",
            Self::First => "first",
            Self::Last => "last",
        }
    }

    /// Resolves a strategy name under the given policy for unknown names.
    ///
    /// With [`UnknownStrategyPolicy::FallbackToFirst`], an unrecognized name
    /// resolves to [`KeepStrategy::First`] and the returned value records the
    /// fallback so it can be reported.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::UnknownStrategy`] for an unrecognized name under
    /// [`UnknownStrategyPolicy::Reject`].
    pub fn resolve(
        name: &str,
        policy: UnknownStrategyPolicy,
    ) -> Result<ResolvedStrategy, DedupError> {
        match (name.parse::<Self>(), policy) {
            (Ok(strategy), _) => Ok(ResolvedStrategy::from(strategy)),
            (Err(err), UnknownStrategyPolicy::Reject) => Err(err),
            (Err(_), UnknownStrategyPolicy::FallbackToFirst) => {
                warn!(requested = name, applied = "first", "Unknown keep strategy, falling back");
                Ok(ResolvedStrategy {
                    strategy: Self::First,
                    fallback: Some(StrategyFallback {
                        requested: name.to_string(),
                        applied: Self::First,
                    }),
                })
            }
        }
    }
}

impl fmt::Display for KeepStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeepStrategy {
    type Err = DedupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "most_complete" => Ok(Self::MostComplete),
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            _ => Err(DedupError::unknown_strategy(s)),
        }
    }
}

/// What to do with a strategy name that is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownStrategyPolicy {
    /// Fail with [`DedupError::UnknownStrategy`]
    #[default]
    Reject,
    /// Apply [`KeepStrategy::First`] and report the substitution
    FallbackToFirst,
}

/// A substituted strategy, surfaced in the dedup report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyFallback {
    /// Name that was asked for
    pub requested: String,
    /// Strategy actually applied
    pub applied: KeepStrategy,
}

/// A strategy plus the fallback that produced it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedStrategy {
    /// Strategy to apply
    pub strategy: KeepStrategy,
    /// Present when an unknown name was replaced
    pub fallback: Option<StrategyFallback>,
}

impl From<KeepStrategy> for ResolvedStrategy {
    fn from(strategy: KeepStrategy) -> Self {
        Self {
            strategy,
            fallback: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!("most_complete".parse::<KeepStrategy>().unwrap(), KeepStrategy::MostComplete);
        assert_eq!("most-complete".parse::<KeepStrategy>().unwrap(), KeepStrategy::MostComplete);
        assert_eq!("FIRST".parse::<KeepStrategy>().unwrap(), KeepStrategy::First);
        assert_eq!("last".parse::<KeepStrategy>().unwrap(), KeepStrategy::Last);
    }

    #[test]
    fn test_parse_unknown_name_is_error() {
        let err = "newest".parse::<KeepStrategy>().unwrap_err();
        assert_eq!(err, DedupError::unknown_strategy("newest"));
    }

    #[test]
    fn test_resolve_reject_policy_errors() {
        let result = KeepStrategy::resolve("random", UnknownStrategyPolicy::Reject);
        assert!(matches!(result, Err(DedupError::UnknownStrategy { .. })));
    }

    #[test]
    fn test_resolve_fallback_policy_reports_substitution() {
        let resolved =
            KeepStrategy::resolve("random", UnknownStrategyPolicy::FallbackToFirst).unwrap();
        assert_eq!(resolved.strategy, KeepStrategy::First);
        let fallback = resolved.fallback.unwrap();
        assert_eq!(fallback.requested, "random");
        assert_eq!(fallback.applied, KeepStrategy::First);
    }

    #[test]
    fn test_resolve_known_name_has_no_fallback() {
        let resolved = KeepStrategy::resolve("last", UnknownStrategyPolicy::FallbackToFirst).unwrap();
        assert_eq!(resolved, ResolvedStrategy::from(KeepStrategy::Last));
    }

    #[test]
    fn test_display_round_trips_label() {
        for strategy in [KeepStrategy::MostComplete, KeepStrategy::First, KeepStrategy::Last] {
            assert_eq!(strategy.to_string().parse::<KeepStrategy>().unwrap(), strategy);
        }
    }
}
