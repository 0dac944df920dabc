//! Result Presenter
//!
//! Read-only projection of a successful valuation into display rows and
//! embeddable report fragments.

use regex::Regex;

use crate::request::{PercentileSummary, ValuationResponse};

/// Outcome of a completed valuation, as kept by the workspace
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationResult {
    pub summaries: Vec<PercentileSummary>,
    pub market: MarketMetrics,
    pub reports: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketMetrics {
    pub market_cap: f64,
    pub price_per_share: f64,
}

impl ValuationResult {
    /// `None` when the response carries no summary rows.
    pub fn from_response(response: ValuationResponse) -> Option<Self> {
        let first = response.valuation_summary.first()?;
        let market = MarketMetrics {
            market_cap: first.current_market_cap,
            price_per_share: first.current_price_per_share,
        };
        Some(Self {
            market,
            reports: response
                .plots
                .into_iter()
                .map(|(name, fragment)| (name, fragment.html))
                .collect(),
            summaries: response.valuation_summary,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub market_cap: String,
    pub price_per_share: String,
    pub rows: Vec<SummaryRow>,
    pub reports: Vec<ReportFragment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: String,
    pub equity_value: String,
    pub equity_value_per_share: String,
    pub price_to_value: String,
    pub pnl: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportFragment {
    pub name: String,
    pub html: String,
}

lazy_static::lazy_static! {
    static ref FIXED_WIDTH: Regex = Regex::new(r"width:\s*\d+px").expect("static regex");
    static ref FIXED_HEIGHT: Regex = Regex::new(r"height:\s*\d+px").expect("static regex");
}

/// Render nothing until a result exists
pub fn present(result: Option<&ValuationResult>) -> Option<ResultView> {
    let result = result?;
    Some(ResultView {
        market_cap: format_amount(result.market.market_cap),
        price_per_share: format_amount(result.market.price_per_share),
        rows: result.summaries.iter().map(summary_row).collect(),
        reports: result
            .reports
            .iter()
            .map(|(name, html)| ReportFragment {
                name: name.clone(),
                html: fit_fragment(html),
            })
            .collect(),
    })
}

fn summary_row(summary: &PercentileSummary) -> SummaryRow {
    SummaryRow {
        label: format!("P{}", summary.percentiles),
        equity_value: format_amount(summary.equity_value),
        equity_value_per_share: format_amount(summary.equity_value_per_share),
        price_to_value: format_amount(summary.price_to_value),
        pnl: format!("{:.2}%", summary.pnl),
    }
}

/// Stretch a fixed-size report fragment to the presentation surface
pub fn fit_fragment(html: &str) -> String {
    let html = FIXED_WIDTH.replace_all(html, "width: 100%");
    FIXED_HEIGHT.replace_all(&html, "height: 600px").into_owned()
}

/// Two decimals with `,` thousands separators
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}
