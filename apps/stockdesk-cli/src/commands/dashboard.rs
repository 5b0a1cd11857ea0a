//! Dashboard figures and the revenue chart.

use anyhow::bail;
use chrono::{Local, NaiveDate};
use clap::Subcommand;
use serde_json::json;
use stockdesk_core::date_range::DateRangeOption;
use stockdesk_core::navigation::DASHBOARD_HOME;
use stockdesk_core::{RevenueChart, RevenueQuery};

use super::Context;
use crate::output::render_table;

#[derive(Subcommand)]
pub enum DashboardCommand {
    /// Headline counts and total revenue
    Stats,

    /// Revenue per period
    Revenue {
        /// week, 30days, 90days, 6months, year or all
        #[arg(long, default_value = "30days")]
        range: DateRangeOption,
        /// Custom start date (YYYY-MM-DD); needs --to
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Custom end date (YYYY-MM-DD); needs --from
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
}

pub async fn run(ctx: &Context, command: DashboardCommand) -> anyhow::Result<()> {
    ctx.open_page(DASHBOARD_HOME).await?;
    let api = ctx.client.analytics();

    match command {
        DashboardCommand::Stats => {
            let stats = api.dashboard().await?;
            ctx.out.record(
                &stats,
                vec![
                    ("Products", stats.total_products.to_string()),
                    ("Low stock", stats.low_stock_products.to_string()),
                    ("Orders", stats.total_orders.to_string()),
                    ("Pending orders", stats.pending_orders.to_string()),
                    ("Revenue", stats.total_revenue.to_string()),
                ],
            )
        }

        DashboardCommand::Revenue { range, from, to } => {
            let (label, query) = match (from, to) {
                (Some(from), Some(to)) => {
                    if from > to {
                        bail!("--from {} is after --to {}", from, to);
                    }
                    let query = RevenueQuery {
                        start_date: from.format("%Y-%m-%d").to_string(),
                        end_date: to.format("%Y-%m-%d").to_string(),
                    };
                    (format!("{} to {}", query.start_date, query.end_date), query)
                }
                _ => {
                    let resolved = range.resolve(Local::now().date_naive());
                    (range.label().to_string(), resolved.to_query())
                }
            };

            let chart = api.revenue_chart(&query).await?;
            if ctx.out.is_json() {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "startDate": query.start_date,
                        "endDate": query.end_date,
                        "data": chart.data,
                    }))?
                );
                return Ok(());
            }
            println!("{}", label);
            println!("{}", render_chart(&chart));
            Ok(())
        }
    }
}

fn render_chart(chart: &RevenueChart) -> String {
    let mut rows: Vec<Vec<String>> = chart
        .data
        .iter()
        .map(|point| {
            vec![
                point.period.clone(),
                point.revenue.to_string(),
                point.order_count.to_string(),
            ]
        })
        .collect();
    if !rows.is_empty() {
        rows.push(vec![
            "Total".to_string(),
            chart.total_revenue().to_string(),
            chart.total_orders().to_string(),
        ]);
    }
    render_table(&["Period", "Revenue", "Orders"], rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_has_total_row() {
        let chart: RevenueChart = serde_json::from_value(json!({
            "data": [
                { "period": "2026-01", "revenue": 150.5, "orderCount": 3 },
                { "period": "2026-02", "revenue": 49.5, "orderCount": 1 }
            ]
        }))
        .unwrap();
        let rendered = render_chart(&chart);
        assert!(rendered.contains("Total"));
        assert!(rendered.contains("200.00"));
    }

    #[test]
    fn test_empty_chart() {
        assert_eq!(render_chart(&RevenueChart::default()), "No results");
    }
}
