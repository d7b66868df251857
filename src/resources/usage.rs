use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::params::{Query, UsageParams, DEFAULT_USAGE_PERIOD};
use crate::CallWhiz;

impl CallWhiz {
    /// Usage statistics for `period`. An unset period means `"month"`; an
    /// explicit one, even empty, is sent as given.
    pub async fn get_usage(&self, params: UsageParams) -> Result<Value> {
        let mut query = Query::default();
        query.push(
            "period",
            params.period.as_deref().unwrap_or(DEFAULT_USAGE_PERIOD),
        );
        query.push_date("from_date", params.from_date);
        query.push_date("to_date", params.to_date);
        self.request(Method::GET, "/usage", query.into_pairs(), None)
            .await
    }

    /// Gets the current credit balance.
    pub async fn get_credit_balance(&self) -> Result<Value> {
        self.request(Method::GET, "/usage/credits", Vec::new(), None)
            .await
    }

    /// Gets account limits and quotas.
    pub async fn get_account_limits(&self) -> Result<Value> {
        self.request(Method::GET, "/usage/limits", Vec::new(), None)
            .await
    }
}
