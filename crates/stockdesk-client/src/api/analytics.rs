//! Dashboard figures.

use serde::Deserialize;
use stockdesk_core::date_range::DateRange;
use stockdesk_core::{DashboardStats, RevenueChart, RevenuePoint, RevenueQuery};

use crate::client::ApiClient;
use crate::error::ClientResult;

pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalyticsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        AnalyticsApi { client }
    }

    pub async fn dashboard(&self) -> ClientResult<DashboardStats> {
        let stats: Option<DashboardStats> = self.client.get("/analytics/dashboard").await?;
        Ok(stats.unwrap_or_default())
    }

    /// Revenue per period between `startDate` and `endDate`.
    pub async fn revenue_chart(&self, query: &RevenueQuery) -> ClientResult<RevenueChart> {
        let payload: Option<ChartPayload> = self
            .client
            .get_with("/analytics/revenue-chart", query)
            .await?;
        Ok(match payload {
            Some(ChartPayload::Points(data)) => RevenueChart { data },
            Some(ChartPayload::Chart(chart)) => chart,
            None => RevenueChart::default(),
        })
    }

    pub async fn revenue_for(&self, range: &DateRange) -> ClientResult<RevenueChart> {
        self.revenue_chart(&range.to_query()).await
    }
}

/// The chart arrives either bare or wrapped in `{ data }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChartPayload {
    Points(Vec<RevenuePoint>),
    Chart(RevenueChart),
}
