//! Default parameter catalogue loaded at start-up and on reset.

use super::{Distribution, ParameterItem, ParameterSet, Section};

fn item(key: &str, label: &str, distribution: Distribution) -> ParameterItem {
    ParameterItem::new(key, label, distribution)
}

pub fn default_catalogue() -> ParameterSet {
    vec![
        Section::new(
            "capitalStructure",
            "Capital Structure",
            vec![
                item("risk_free_rate", "Risk Free Rate", Distribution::normal(0.04, 0.002)),
                item("ERP", "ERP", Distribution::normal(0.048, 0.001)),
                item("equity_value", "Equity Value", Distribution::triangular(45.0, 51.016, 57.0)),
                item("debt_value", "Debt Value", Distribution::triangular(3.7, 3.887, 4.0)),
                item("unlevered_beta", "Unlevered Beta", Distribution::triangular(0.8, 0.9, 1.0)),
                item(
                    "terminal_unlevered_beta",
                    "Terminal Unlevered Beta",
                    Distribution::triangular(0.8, 0.9, 1.0),
                ),
                item(
                    "year_beta_begins_to_converge_to_terminal_beta",
                    "Year Beta Begins To Converge To Terminal Beta",
                    Distribution::uniform(1.0, 2.0),
                ),
            ],
        ),
        Section::new(
            "costOfCapital",
            "Cost of Capital",
            vec![
                item(
                    "current_pretax_cost_of_debt",
                    "Current Pretax Cost Of Debt",
                    Distribution::triangular(0.057, 0.06, 0.063),
                ),
                item(
                    "terminal_pretax_cost_of_debt",
                    "Terminal Pretax Cost Of Debt",
                    Distribution::triangular(0.052, 0.055, 0.058),
                ),
                item(
                    "year_cost_of_debt_begins_to_converge_to_terminal_cost_of_debt",
                    "Year Cost Of Debt Begins To Converge To Terminal Value",
                    Distribution::uniform(1.0, 2.0),
                ),
                item(
                    "current_effective_tax_rate",
                    "Current Effective Tax Rate",
                    Distribution::triangular(0.23, 0.24, 0.25),
                ),
                item("marginal_tax_rate", "Marginal Tax Rate", Distribution::triangular(0.23, 0.25, 0.27)),
                item(
                    "year_effective_tax_rate_begin_to_converge_marginal_tax_rate",
                    "Year Effective Tax Rate Begin To Converge Marginal Tax Rate",
                    Distribution::uniform(1.0, 3.0),
                ),
                item(
                    "additional_return_on_cost_of_capital_in_perpetuity",
                    "Additional Return On Cost Of Capital In Perpetuity",
                    Distribution::triangular(0.0, 0.02, 0.035),
                ),
            ],
        ),
        Section::new(
            "revenueGrowth",
            "Revenue Growth Assumptions",
            vec![
                item("revenue_base", "Revenue Base", Distribution::triangular(8.8, 9.2, 9.6)),
                item(
                    "revenue_growth_rate_cycle1_begin",
                    "Revenue Growth Rate Cycle 1 Begin",
                    Distribution::skew_normal(-2.9, 0.145, 0.032),
                ),
                item(
                    "revenue_growth_rate_cycle1_end",
                    "Revenue Growth Rate Cycle 1 End",
                    Distribution::skew_normal(-2.9, 0.18, 0.033),
                ),
            ],
        ),
        Section::new(
            "revenueTiming",
            "Revenue Timing Assumptions",
            vec![
                item("length_of_cycle1", "Length of Cycle 1", Distribution::uniform(4.0, 8.0)),
                item(
                    "revenue_growth_rate_cycle2_begin",
                    "Revenue Growth Rate Cycle 2 Begin",
                    Distribution::skew_normal(-2.9, 0.165, 0.034),
                ),
                item(
                    "revenue_growth_rate_cycle2_end",
                    "Revenue Growth Rate Cycle 2 End",
                    Distribution::skew_normal(-2.9, 0.11, 0.032),
                ),
                item("length_of_cycle2", "Length of Cycle 2", Distribution::uniform(4.0, 8.0)),
                item(
                    "revenue_growth_rate_cycle3_begin",
                    "Revenue Growth Rate Cycle 3 Begin",
                    Distribution::skew_normal(-2.9, 0.09, 0.024),
                ),
                item(
                    "revenue_growth_rate_cycle3_end",
                    "Revenue Growth Rate Cycle 3 End",
                    Distribution::normal(0.04, 0.002),
                ),
                item("length_of_cycle3", "Length of Cycle 3", Distribution::uniform(4.0, 8.0)),
                item(
                    "revenue_convergance_periods_cycle1",
                    "Revenue Convergence Periods Cycle 1",
                    Distribution::uniform(1.0, 2.0),
                ),
                item(
                    "revenue_convergance_periods_cycle2",
                    "Revenue Convergence Periods Cycle 2",
                    Distribution::uniform(1.0, 2.0),
                ),
                item(
                    "revenue_convergance_periods_cycle3",
                    "Revenue Convergence Periods Cycle 3",
                    Distribution::uniform(1.0, 2.0),
                ),
            ],
        ),
        Section::new(
            "operatingEfficiency",
            "Operating Efficiency & Profitability",
            vec![
                item(
                    "current_sales_to_capital_ratio",
                    "Current Sales to Capital Ratio",
                    Distribution::triangular(1.5, 1.7, 1.9),
                ),
                item(
                    "terminal_sales_to_capital_ratio",
                    "Terminal Sales to Capital Ratio",
                    Distribution::triangular(1.1, 1.3, 1.6),
                ),
                item(
                    "year_sales_to_capital_begins_to_converge_to_terminal_sales_to_capital",
                    "Year Sales to Capital Begins to Converge to Terminal Value",
                    Distribution::uniform(1.0, 3.0),
                ),
                item(
                    "current_operating_margin",
                    "Current Operating Margin",
                    Distribution::triangular(0.145, 0.15, 0.155),
                ),
                item(
                    "terminal_operating_margin",
                    "Terminal Operating Margin",
                    Distribution::triangular(0.12, 0.175, 0.22),
                ),
                item(
                    "year_operating_margin_begins_to_converge_to_terminal_operating_margin",
                    "Year Operating Margin Begins to Converge to Terminal Value",
                    Distribution::uniform(1.0, 3.0),
                ),
            ],
        ),
        Section::new(
            "balanceSheet",
            "Balance Sheet & Asset Structure",
            vec![
                item(
                    "cash_and_non_operating_asset",
                    "Cash and Non-Operating Asset",
                    Distribution::uniform(1.6, 1.8),
                ),
                item(
                    "asset_liquidation_during_negative_growth",
                    "Asset Liquidation During Negative Growth",
                    Distribution::uniform(0.0, 0.000000001),
                ),
                item(
                    "current_invested_capital",
                    "Current Invested Capital",
                    Distribution::uniform(5.8, 6.2),
                ),
            ],
        ),
        Section::new(
            "shareStructure",
            "Share Structure",
            vec![item("shares_outstanding", "Shares Outstanding %", Distribution::constant(0.0275898))],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DistributionKind;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_shape() {
        let catalogue = default_catalogue();
        assert_eq!(catalogue.len(), 7);

        let total: usize = catalogue.iter().map(|s| s.items().len()).sum();
        assert_eq!(total, 37);
    }

    #[test]
    fn test_catalogue_keys_are_unique() {
        let catalogue = default_catalogue();
        let mut sections = HashSet::new();
        let mut items = HashSet::new();
        for section in &catalogue {
            assert!(sections.insert(section.key().to_string()), "duplicate section {}", section.key());
            for item in section.items() {
                assert!(items.insert(item.key().to_string()), "duplicate item {}", item.key());
            }
        }
    }

    #[test]
    fn test_every_kind_is_represented() {
        let kinds: HashSet<DistributionKind> = default_catalogue()
            .iter()
            .flat_map(|s| s.items().iter().map(|i| i.kind()))
            .collect();
        assert_eq!(kinds.len(), DistributionKind::ALL.len());
    }
}
