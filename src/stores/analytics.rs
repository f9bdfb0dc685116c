//! Admin analytics state.
//!
//! Holds the dashboard's headline counters and the daily sales series.
//! Unlike the other stores, failures here are kept as inline state (the
//! dashboard renders the error in place) rather than pushed as notices.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{AnalysisResponse, AnalyticsSummary, DailySale};

const ANALYSIS_PATH: &str = "/analysis-data";

const FETCH_FAILED: &str = "Failed to load analytics data. Please try again later.";
const INVALID_DATA: &str = "Invalid data received from API";

#[derive(Default)]
struct AnalyticsInner {
    summary: Option<AnalyticsSummary>,
    daily_sales: Vec<DailySale>,
    error: Option<String>,
}

pub struct AnalyticsStore {
    inner: Mutex<AnalyticsInner>,
    loading: AtomicBool,
    client: ApiClient,
}

impl AnalyticsStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            inner: Mutex::new(AnalyticsInner::default()),
            loading: AtomicBool::new(false),
            client,
        }
    }

    pub fn summary(&self) -> Option<AnalyticsSummary> {
        self.lock().summary.clone()
    }

    pub fn daily_sales(&self) -> Vec<DailySale> {
        self.lock().daily_sales.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Fetch the dashboard data, normalizing the sales dates.
    ///
    /// A payload missing either section counts as a server-side failure;
    /// previously loaded data is kept in that case.
    pub async fn fetch(&self) {
        self.loading.store(true, Ordering::SeqCst);
        match self.client.get::<AnalysisResponse>(ANALYSIS_PATH).await {
            Ok(AnalysisResponse {
                analytics_data: Some(summary),
                daily_sales_data: Some(series),
            }) => {
                let daily_sales = series.into_iter().map(DailySale::from_record).collect();
                let mut inner = self.lock();
                inner.summary = Some(summary);
                inner.daily_sales = daily_sales;
                inner.error = None;
            }
            Ok(_) => {
                debug!("analytics payload missing a section");
                self.lock().error = Some(INVALID_DATA.to_string());
            }
            Err(e) => {
                debug!(error = %e, "analytics fetch failed");
                let message = match e {
                    ApiError::Rejected(msg) => msg,
                    _ => FETCH_FAILED.to_string(),
                };
                self.lock().error = Some(message);
            }
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, AnalyticsInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
