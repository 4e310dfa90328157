//! Vessel search by name.

use equasis_core::{VesselSummary, normalize_vessel_name};
use equasis_fetch::{FetchRequest, SessionGateway};
use tracing::{info, instrument};

use crate::error::CollectError;
use crate::extract::extract_vessel_list;

/// Searches vessels whose name matches `name`.
///
/// An empty result is not an error. Malformed names fail before any request
/// is made.
#[instrument(skip(gateway))]
pub async fn search_by_name(
    gateway: &mut SessionGateway,
    name: &str,
) -> Result<Vec<VesselSummary>, CollectError> {
    let name = normalize_vessel_name(name)?;
    let document = gateway.fetch(&FetchRequest::ship_search(&name)).await?;
    let vessels = extract_vessel_list(&document);

    info!(name = %name, matches = vessels.len(), "Search finished");
    Ok(vessels)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use equasis_core::FailureKind;
    use equasis_fetch::{
        Credentials, FetchContext, FetchSettings, Method, RecordingSleeper, RetryPolicy,
        ScriptedTransport,
    };

    fn gateway(transport: &Arc<ScriptedTransport>) -> SessionGateway {
        let ctx = FetchContext::builder()
            .transport(transport.clone())
            .sleeper(Arc::new(RecordingSleeper::new()))
            .settings(FetchSettings::default().with_retry(RetryPolicy::no_retry()))
            .build()
            .unwrap();
        SessionGateway::new(ctx, Credentials::new("me@example.com", "secret"))
    }

    #[tokio::test]
    async fn test_search_posts_name_and_lists_rows() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_login_ok().push_page(
            "/EquasisWeb/restricted/ShipInfo",
            r#"<table class="tableLS"><tr><td>9321483</td><td>EMMA MAERSK</td></tr></table>"#,
        );
        let mut gw = gateway(&transport);

        let vessels = search_by_name(&mut gw, "  emma maersk ").await.unwrap();

        assert_eq!(vessels.len(), 1);
        assert_eq!(vessels[0].imo, "9321483");
        let request = transport.requests().pop().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.query_value("fs"), Some("ShipList"));
        assert!(request.form.iter().any(|(k, v)| k == "P_ENTSHIP" && v == "emma maersk"));
    }

    #[tokio::test]
    async fn test_search_without_matches_is_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_login_ok()
            .push_page("/EquasisWeb/restricted/ShipInfo", "<p>No ship has been found</p>");
        let mut gw = gateway(&transport);

        assert!(search_by_name(&mut gw, "NOBODY").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_without_request() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut gw = gateway(&transport);

        let err = search_by_name(&mut gw, "  ").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedInput);
        assert_eq!(transport.request_count(), 0);
    }
}
