//! Platform analytics queries.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Timeframe used when an analytics query does not name one.
pub const DEFAULT_TIMEFRAME: &str = "7d";

/// Parameters for a platform analytics request.
///
/// ```
/// use orchestrall_core::AnalyticsQuery;
///
/// let query = AnalyticsQuery::builder()
///     .metrics(vec!["latency".to_string(), "errors".to_string()])
///     .build()
///     .unwrap();
/// assert_eq!(
///     query.to_query(),
///     vec![
///         ("timeframe".to_string(), "7d".to_string()),
///         ("metrics".to_string(), "latency,errors".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct AnalyticsQuery {
    /// Reporting window, such as `24h`, `7d` or `30d`.
    #[builder(default = "DEFAULT_TIMEFRAME.to_string()")]
    timeframe: String,
    /// Metric names to report.  An empty list asks for the platform's
    /// default set.
    #[builder(default)]
    metrics: Vec<String>,
}

impl AnalyticsQuery {
    /// Creates a builder for an analytics query.
    pub fn builder() -> AnalyticsQueryBuilder {
        AnalyticsQueryBuilder::default()
    }

    /// Renders the query as URL parameters.
    ///
    /// Metrics are comma-joined into a single `metrics` parameter, omitted
    /// entirely when no metrics are named.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("timeframe".to_string(), self.timeframe.clone())];
        if !self.metrics.is_empty() {
            pairs.push(("metrics".to_string(), self.metrics.join(",")));
        }
        pairs
    }
}

impl Default for AnalyticsQuery {
    fn default() -> Self {
        Self {
            timeframe: DEFAULT_TIMEFRAME.to_string(),
            metrics: Vec::new(),
        }
    }
}
