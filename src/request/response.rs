//! Wire shape of a successful `POST /dcf` response.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValuationResponse {
    pub valuation_summary: Vec<PercentileSummary>,
    #[serde(default, deserialize_with = "ordered_plots")]
    pub plots: Vec<(String, PlotFragment)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileSummary {
    pub percentiles: f64,
    pub equity_value: f64,
    pub equity_value_per_share: f64,
    #[serde(rename = "Price/Value")]
    pub price_to_value: f64,
    #[serde(rename = "PNL")]
    pub pnl: f64,
    pub current_market_cap: f64,
    pub current_price_per_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotFragment {
    pub html: String,
}

/// `plots` is a JSON object whose key order is the display order.
fn ordered_plots<'de, D>(deserializer: D) -> Result<Vec<(String, PlotFragment)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PlotsVisitor;

    impl<'de> Visitor<'de> for PlotsVisitor {
        type Value = Vec<(String, PlotFragment)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of report name to {html}")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut plots = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, fragment)) = map.next_entry::<String, PlotFragment>()? {
                plots.push((name, fragment));
            }
            Ok(plots)
        }
    }

    deserializer.deserialize_map(PlotsVisitor)
}
