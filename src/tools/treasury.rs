//! Fiscal Data Treasury tools. All endpoints are parameterless GETs under
//! the fiscal_service API; the adapter handles everything else.

use crate::client::ApiAdapter;
use crate::tools::render;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct TreasuryTools {
    adapter: Arc<ApiAdapter>,
}

impl TreasuryTools {
    #[must_use]
    pub const fn new(adapter: Arc<ApiAdapter>) -> Self {
        Self { adapter }
    }

    #[instrument(skip(self))]
    async fn fetch(&self, endpoint: &str, fallback: &str) -> String {
        render(self.adapter.get(endpoint).await, fallback)
    }

    /// Outstanding debt, updated once per fiscal year.
    pub async fn debt_outstanding(&self) -> String {
        self.fetch(
            "accounting/od/debt_outstanding",
            "Unable to fetch outstanding debt, or no data found.",
        )
        .await
    }

    /// Outstanding gold reserves.
    pub async fn gold_reserves(&self) -> String {
        self.fetch(
            "accounting/od/gold_reserve",
            "Unable to fetch gold reserves, or no data found.",
        )
        .await
    }

    /// Treasury General Account balance (daily treasury statement).
    pub async fn daily_treasury_statement(&self) -> String {
        self.fetch(
            "accounting/dts/operating_cash_balance",
            "Unable to fetch the daily treasury statement, or no data found.",
        )
        .await
    }

    /// Deposits and withdrawals from the Treasury General Account.
    pub async fn operating_cash_activities(&self) -> String {
        self.fetch(
            "accounting/dts/deposits_withdrawals_operating_cash",
            "Unable to fetch details on deposits and withdrawls, or no data found.",
        )
        .await
    }

    /// Issues and redemptions of marketable and nonmarketable securities.
    pub async fn public_debt_transactions(&self) -> String {
        self.fetch(
            "accounting/dts/public_debt_transactions",
            "Unable to fetch details of public debt transactions, or no data found.",
        )
        .await
    }
}
