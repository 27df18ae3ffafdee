use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::http_client::ApiClient;
use crate::data_fetcher::cache::PipelineCache;
use crate::data_fetcher::models::{ApiPrediction, Fixture, Prediction};
use crate::error::AppError;

const PREDICTIONS_PATH: &str = "predictions";

/// Fetches the provider's prediction for one fixture.
/// An empty `response` array yields [`Prediction::Empty`].
#[instrument(skip(client))]
pub async fn fetch_prediction(client: &ApiClient, fixture_id: i64) -> Result<Prediction, AppError> {
    let envelope = client
        .fetch_envelope::<ApiPrediction>(PREDICTIONS_PATH, &[("fixture", fixture_id.to_string())])
        .await?;
    Ok(Prediction::from_response(envelope.response))
}

/// Prediction for one fixture: prediction tier first, then upstream.
/// Non-empty upstream results are stored in the prediction tier.
async fn prediction_for(
    client: &ApiClient,
    cache: &PipelineCache,
    fixture_id: i64,
) -> Result<Prediction, AppError> {
    if let Some(cached) = cache.get_prediction(fixture_id).await {
        return Ok(cached);
    }

    let prediction = fetch_prediction(client, fixture_id).await?;
    if prediction.is_empty() {
        debug!("No prediction available yet for fixture {}", fixture_id);
    } else {
        cache.put_prediction(fixture_id, prediction.clone()).await;
    }
    Ok(prediction)
}

/// Attaches a prediction to every fixture.
///
/// All lookups run concurrently (upstream calls are bounded by the client's
/// limiter) and the result keeps the input order and length. A failure for
/// one fixture is logged and leaves that fixture with an empty prediction;
/// it never affects the others.
#[instrument(skip(client, cache, fixtures), fields(count = fixtures.len()))]
pub async fn enrich_fixtures(
    client: &ApiClient,
    cache: &PipelineCache,
    fixtures: Vec<Fixture>,
) -> Vec<Fixture> {
    let lookups = fixtures
        .iter()
        .map(|fixture| prediction_for(client, cache, fixture.id));
    let results: Vec<Result<Prediction, AppError>> = join_all(lookups).await;

    let mut failed = 0usize;
    let enriched: Vec<Fixture> = fixtures
        .into_iter()
        .zip(results)
        .map(|(fixture, result)| {
            let prediction = match result {
                Ok(prediction) => prediction,
                Err(e) => {
                    failed += 1;
                    warn!(
                        "Failed to fetch prediction for fixture {} ({} vs {}): {}",
                        fixture.id, fixture.home_team, fixture.away_team, e
                    );
                    Prediction::Empty
                }
            };
            fixture.with_prediction(prediction)
        })
        .collect();

    let available = enriched.iter().filter(|f| !f.prediction.is_empty()).count();
    info!(
        "Enriched {} fixtures: {} with predictions, {} failed",
        enriched.len(),
        available,
        failed
    );
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::limiter::RequestLimiter;
    use crate::data_fetcher::cache::CacheSettings;
    use crate::testing_utils::TestDataBuilder;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn test_client(server: &MockServer, limit: usize) -> ApiClient {
        ApiClient::new(server.uri(), "test-key", Duration::from_secs(5), 0, RequestLimiter::new(limit))
    }

    async fn mount_prediction(server: &MockServer, fixture_id: i64, winner: &str) {
        Mock::given(method("GET"))
            .and(path("/predictions"))
            .and(query_param("fixture", fixture_id.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestDataBuilder::envelope(vec![TestDataBuilder::prediction_json(winner)], 1, 1)),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_prediction_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predictions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(vec![], 1, 1)),
            )
            .mount(&server)
            .await;

        let prediction = fetch_prediction(&test_client(&server, 1), 5).await.unwrap();
        assert!(prediction.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_one_fixture() {
        let server = MockServer::start().await;
        let ids: Vec<i64> = vec![771, 772, 773, 774, 775, 776, 777, 778, 779, 780];
        for id in ids.iter().filter(|id| **id != 777) {
            mount_prediction(&server, *id, "Arsenal").await;
        }
        Mock::given(method("GET"))
            .and(path("/predictions"))
            .and(query_param("fixture", "777"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server, 3);
        let cache = PipelineCache::new(CacheSettings::default());
        let fixtures: Vec<Fixture> = ids.iter().map(|id| TestDataBuilder::fixture(*id, 39)).collect();

        let enriched = enrich_fixtures(&client, &cache, fixtures).await;

        assert_eq!(enriched.iter().map(|f| f.id).collect::<Vec<_>>(), ids);
        for fixture in &enriched {
            assert_eq!(fixture.prediction.is_empty(), fixture.id == 777);
        }
        assert!(cache.get_prediction(777).await.is_none());
        assert!(cache.get_prediction(771).await.is_some());
    }

    #[tokio::test]
    async fn test_cached_prediction_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predictions"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let cache = PipelineCache::new(CacheSettings::default());
        cache.put_prediction(10, TestDataBuilder::prediction("Chelsea")).await;

        let enriched = enrich_fixtures(
            &test_client(&server, 1),
            &cache,
            vec![TestDataBuilder::fixture(10, 39)],
        )
        .await;
        let details = enriched[0].prediction.details().unwrap();
        assert_eq!(details.winner.as_deref(), Some("Chelsea"));
    }

    #[tokio::test]
    async fn test_empty_prediction_refetched_next_time() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predictions"))
            .and(query_param("fixture", "42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(vec![], 1, 1)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server, 1);
        let cache = PipelineCache::new(CacheSettings::default());
        for _ in 0..2 {
            let enriched = enrich_fixtures(&client, &cache, vec![TestDataBuilder::fixture(42, 39)]).await;
            assert!(enriched[0].prediction.is_empty());
        }
        assert!(cache.get_prediction(42).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predictions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestDataBuilder::envelope(vec![TestDataBuilder::prediction_json("Arsenal")], 1, 1))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;

        let client = test_client(&server, 2);
        let cache = PipelineCache::new(CacheSettings::default());
        let fixtures: Vec<Fixture> = (1..=12).map(|id| TestDataBuilder::fixture(id, 39)).collect();

        let enriched = enrich_fixtures(&client, &cache, fixtures).await;

        assert_eq!(enriched.len(), 12);
        let stats = client.limiter_stats();
        assert!(stats.peak_in_flight <= 2, "peak was {}", stats.peak_in_flight);
        assert_eq!(stats.in_flight, 0);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let server = MockServer::start().await;
        let cache = PipelineCache::new(CacheSettings::default());
        let enriched = enrich_fixtures(&test_client(&server, 1), &cache, Vec::new()).await;
        assert!(enriched.is_empty());
    }
}
