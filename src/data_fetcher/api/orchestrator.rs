//! Fixture pipeline: date cache, pagination, league filter, enrichment

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use super::fixtures_api::list_fixtures;
use super::http_client::ApiClient;
use super::limiter::LimiterStats;
use super::predictions_api::enrich_fixtures;
use crate::config::Config;
use crate::data_fetcher::cache::{CacheSettings, CacheStats, PipelineCache};
use crate::data_fetcher::league_filter::{LeagueAllowSet, filter_fixtures};
use crate::data_fetcher::models::Fixture;
use crate::error::AppError;

/// Entry point used by the report and bot layers.
///
/// Owns the upstream client, both cache tiers, the league allow-set and the
/// timezone in which fixture dates are interpreted. Cached fixture lists are
/// keyed by date together with the timezone and allow-set that produced them.
#[derive(Debug)]
pub struct FixtureService {
    client: ApiClient,
    cache: PipelineCache,
    allowed: LeagueAllowSet,
    timezone: String,
    scope: String,
}

impl FixtureService {
    pub fn new(
        client: ApiClient,
        cache: PipelineCache,
        allowed: LeagueAllowSet,
        timezone: impl Into<String>,
    ) -> Self {
        let timezone = timezone.into();
        let scope = format!("{}/{}", timezone, allowed.fingerprint());
        Self {
            client,
            cache,
            allowed,
            timezone,
            scope,
        }
    }

    /// Builds the service from validated configuration, restoring the
    /// persistent cache when one is configured.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let leagues = config.allowed_leagues().await?;
        let settings = CacheSettings::from_config(&config.cache)?;
        let cache = PipelineCache::open(settings).await;

        info!(
            "Fixture service ready: {} leagues, timezone {}, {} concurrent requests",
            leagues.len(),
            config.timezone,
            config.max_concurrent_requests
        );

        Ok(Self::new(
            ApiClient::from_config(config),
            cache,
            LeagueAllowSet::from_leagues(&leagues),
            &config.timezone,
        ))
    }

    /// Returns the not-started fixtures for `date` in the allowed leagues,
    /// each carrying a prediction (possibly empty), in upstream order.
    ///
    /// A cached date is returned without any upstream request. Errors while
    /// listing fixtures fail the whole call; prediction errors only empty the
    /// affected fixture's prediction.
    #[instrument(skip(self))]
    pub async fn get_enriched_fixtures(&self, date: NaiveDate) -> Result<Vec<Fixture>, AppError> {
        if let Some(cached) = self.cache.get_fixtures(date, &self.scope).await {
            info!("Serving {} cached fixtures for {}", cached.len(), date);
            return Ok(cached);
        }

        info!("Fetching fixtures for {} in {}", date, self.timezone);
        let fixtures = list_fixtures(&self.client, date, &self.timezone).await?;
        let total = fixtures.len();

        let relevant = filter_fixtures(fixtures, &self.allowed);
        info!(
            "{} of {} fixtures are in the {} allowed leagues",
            relevant.len(),
            total,
            self.allowed.len()
        );

        let enriched = enrich_fixtures(&self.client, &self.cache, relevant).await;
        self.cache.put_fixtures(date, &self.scope, enriched.clone()).await;
        Ok(enriched)
    }

    /// Empties both cache tiers and the persistent mirror.
    pub async fn clear_caches(&self) {
        self.cache.clear().await;
    }

    /// Flushes the persistent cache and releases the HTTP client.
    pub async fn close(&self) {
        if let Err(e) = self.cache.flush().await {
            warn!("Failed to flush persistent cache on close: {}", e);
        }
        self.client.close().await;
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    pub async fn cached_dates(&self) -> Vec<String> {
        self.cache.cached_dates().await
    }

    pub fn limiter_stats(&self) -> LimiterStats {
        self.client.limiter_stats()
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn allowed_leagues(&self) -> &LeagueAllowSet {
        &self.allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::limiter::RequestLimiter;
    use crate::testing_utils::TestDataBuilder;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn service(server: &MockServer, allowed: &[i64]) -> FixtureService {
        FixtureService::new(
            ApiClient::new(server.uri(), "test-key", Duration::from_secs(5), 0, RequestLimiter::new(3)),
            PipelineCache::new(CacheSettings::default()),
            allowed.iter().copied().collect(),
            "UTC",
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fixtures"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(
                vec![TestDataBuilder::fixture_json(1, 39), TestDataBuilder::fixture_json(2, 5)],
                1,
                1,
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/predictions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(
                vec![TestDataBuilder::prediction_json("Arsenal")],
                1,
                1,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let service = service(&server, &[39]);
        let first = service.get_enriched_fixtures(date()).await.unwrap();
        let second = service.get_enriched_fixtures(date()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(service.cached_dates().await, vec!["2024-05-01".to_string()]);
    }

    #[tokio::test]
    async fn test_fixture_failure_propagates_and_caches_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fixtures"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let service = service(&server, &[39]);
        let err = service.get_enriched_fixtures(date()).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(503));
        assert!(service.cached_dates().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_caches_forces_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fixtures"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(vec![], 1, 1)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let service = service(&server, &[39]);
        service.get_enriched_fixtures(date()).await.unwrap();
        service.clear_caches().await;
        service.get_enriched_fixtures(date()).await.unwrap();
    }

    #[tokio::test]
    async fn test_close_is_repeatable() {
        let server = MockServer::start().await;
        let service = service(&server, &[39]);
        service.close().await;
        service.close().await;
        assert_eq!(service.limiter_stats().in_flight, 0);
    }
}
