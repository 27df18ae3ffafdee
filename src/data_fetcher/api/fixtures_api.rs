use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

use super::http_client::ApiClient;
use crate::constants::FIXTURE_STATUS_NOT_STARTED;
use crate::data_fetcher::models::{ApiFixture, Fixture};
use crate::error::AppError;

const FIXTURES_PATH: &str = "fixtures";

/// Builds the query for one page of not-started fixtures on `date`.
pub fn build_fixtures_query(date: NaiveDate, timezone: &str, page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("date", date.format("%Y-%m-%d").to_string()),
        ("status", FIXTURE_STATUS_NOT_STARTED.to_string()),
        ("timezone", timezone.to_string()),
        ("page", page.to_string()),
    ]
}

/// Retrieves every not-started fixture for `date`, following pagination.
///
/// Pages are requested one after another starting at 1. Retrieval stops when
/// a page is empty, when the page just read is the last one the provider
/// reports, or when a page contributes no fixture ids that were not already
/// seen. Fixtures keep the provider's per-page order; repeated ids are dropped.
/// Any page failure aborts the whole date.
#[instrument(skip(client))]
pub async fn list_fixtures(
    client: &ApiClient,
    date: NaiveDate,
    timezone: &str,
) -> Result<Vec<Fixture>, AppError> {
    let mut fixtures: Vec<Fixture> = Vec::new();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut page = 1u32;

    loop {
        let query = build_fixtures_query(date, timezone, page);
        let envelope = client
            .fetch_envelope::<ApiFixture>(FIXTURES_PATH, &query)
            .await?;

        let received = envelope.response.len();
        if received == 0 {
            debug!("Page {} for {} is empty, stopping", page, date);
            break;
        }

        let before = fixtures.len();
        for raw in envelope.response {
            if seen.insert(raw.fixture.id) {
                fixtures.push(Fixture::from(raw));
            }
        }
        let added = fixtures.len() - before;
        debug!(
            "Page {} for {}: {} fixtures received, {} new",
            page, date, received, added
        );

        if added == 0 {
            debug!("Page {} for {} added no new fixtures, stopping", page, date);
            break;
        }

        // Without paging metadata the provider holds a single page
        let (current, total) = envelope
            .paging
            .map(|p| (p.current.max(page), p.total))
            .unwrap_or((page, page));
        if current >= total {
            break;
        }
        page = current + 1;
    }

    info!(
        "Retrieved {} not-started fixtures for {} across {} page(s)",
        fixtures.len(),
        date,
        page
    );
    Ok(fixtures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::limiter::RequestLimiter;
    use crate::testing_utils::TestDataBuilder;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn test_client(server: &MockServer) -> ApiClient {
        ApiClient::new(server.uri(), "test-key", Duration::from_secs(5), 0, RequestLimiter::new(3))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    async fn mount_page(server: &MockServer, page: u32, total: u32, ids: std::ops::Range<i64>) {
        let fixtures: Vec<_> = ids.map(|id| TestDataBuilder::fixture_json(id, 39)).collect();
        Mock::given(method("GET"))
            .and(path("/fixtures"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestDataBuilder::envelope(fixtures, page, total)),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_build_fixtures_query() {
        let query = build_fixtures_query(date(), "Asia/Makassar", 2);
        assert_eq!(
            query,
            vec![
                ("date", "2024-05-01".to_string()),
                ("status", "NS".to_string()),
                ("timezone", "Asia/Makassar".to_string()),
                ("page", "2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_collects_all_pages_in_order() {
        let server = MockServer::start().await;
        mount_page(&server, 1, 3, 1..21).await;
        mount_page(&server, 2, 3, 21..41).await;
        mount_page(&server, 3, 3, 41..46).await;

        let fixtures = list_fixtures(&test_client(&server), date(), "UTC").await.unwrap();
        let ids: Vec<i64> = fixtures.iter().map(|f| f.id).collect();
        assert_eq!(ids, (1..46).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_stops_on_empty_page_despite_total() {
        let server = MockServer::start().await;
        mount_page(&server, 1, 5, 1..11).await;
        mount_page(&server, 2, 5, 0..0).await;

        let fixtures = list_fixtures(&test_client(&server), date(), "UTC").await.unwrap();
        assert_eq!(fixtures.len(), 10);
    }

    #[tokio::test]
    async fn test_stops_when_page_repeats() {
        let server = MockServer::start().await;
        // Page 2 echoes page 1 and claims more pages exist
        mount_page(&server, 1, 10, 1..6).await;
        mount_page(&server, 2, 10, 1..6).await;

        let fixtures = list_fixtures(&test_client(&server), date(), "UTC").await.unwrap();
        assert_eq!(fixtures.len(), 5);
    }

    #[tokio::test]
    async fn test_empty_first_page_is_not_an_error() {
        let server = MockServer::start().await;
        mount_page(&server, 1, 0, 0..0).await;

        let fixtures = list_fixtures(&test_client(&server), date(), "UTC").await.unwrap();
        assert!(fixtures.is_empty());
    }

    #[tokio::test]
    async fn test_page_failure_aborts_date() {
        let server = MockServer::start().await;
        mount_page(&server, 1, 2, 1..6).await;
        Mock::given(method("GET"))
            .and(path("/fixtures"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = list_fixtures(&test_client(&server), date(), "UTC")
            .await
            .unwrap_err();
        assert_eq!(err.upstream_status(), Some(500));
    }

    #[tokio::test]
    async fn test_sends_date_status_and_timezone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fixtures"))
            .and(query_param("date", "2024-05-01"))
            .and(query_param("status", "NS"))
            .and(query_param("timezone", "Asia/Makassar"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(
                    vec![TestDataBuilder::fixture_json(9, 39)],
                    1,
                    1,
                )),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fixtures = list_fixtures(&test_client(&server), date(), "Asia/Makassar")
            .await
            .unwrap();
        assert_eq!(fixtures.len(), 1);
        assert!(fixtures[0].prediction.is_empty());
    }
}
