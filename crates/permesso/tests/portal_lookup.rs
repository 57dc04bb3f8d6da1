use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use permesso::config::PortalConfig;
use permesso::workflows::permit::{
    normalize_for_year, PermitStatusService, PortalClient, StatusClassifier, StatusVerdict,
};

#[derive(Debug, Clone)]
struct SeenRequest {
    query: Option<String>,
    referer: Option<String>,
    cookie: Option<String>,
    user_agent: Option<String>,
}

#[derive(Clone)]
struct FakePortal {
    status: StatusCode,
    body: &'static str,
    delay: Duration,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakePortal {
    fn answering(body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            delay: Duration::ZERO,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("seen mutex").clone()
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn stranieri(
    State(portal): State<FakePortal>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> (StatusCode, &'static str) {
    portal.seen.lock().expect("seen mutex").push(SeenRequest {
        query,
        referer: header_value(&headers, header::REFERER),
        cookie: header_value(&headers, header::COOKIE),
        user_agent: header_value(&headers, header::USER_AGENT),
    });
    if !portal.delay.is_zero() {
        tokio::time::sleep(portal.delay).await;
    }
    (portal.status, portal.body)
}

async fn spawn_portal(portal: FakePortal) -> SocketAddr {
    let app = Router::new()
        .route("/stranieri/", get(stranieri))
        .with_state(portal);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake portal");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake portal serves");
    });
    addr
}

fn client_for(addr: SocketAddr, timeout: Duration) -> PortalClient {
    PortalClient::new(&PortalConfig {
        base_url: format!("http://{addr}/stranieri/"),
        timeout,
    })
    .expect("client builds")
}

#[tokio::test]
async fn short_code_scenario_ends_in_ready_card() {
    let portal = FakePortal::answering("<html>...Il permesso è pronto per LA CONSEGNA...</html>");
    let addr = spawn_portal(portal.clone()).await;
    let service = PermitStatusService::new(client_for(addr, Duration::from_secs(20)));

    let code = normalize_for_year("123456", 2026);
    assert_eq!(code.normalized(), "26123456");

    let reply = service.resolve(&code).await;

    assert!(reply.text.contains("\u{1f7e2}  <b>Status:</b>  Ready for Pickup!"));
    assert!(reply
        .text
        .contains("<b>Permit Code:</b>  <code>123456</code>"));

    let seen = portal.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].query.as_deref(),
        Some("lang=italian&mime=&pratica=26123456&invia=Invia")
    );
}

#[tokio::test]
async fn request_looks_like_the_portal_form_submission() {
    let portal = FakePortal::answering("pratica in trattazione");
    let addr = spawn_portal(portal.clone()).await;
    let classifier = StatusClassifier::new(client_for(addr, Duration::from_secs(20)));

    let verdict = classifier
        .classify(&normalize_for_year("26bo123456", 2026))
        .await;
    assert_eq!(verdict, StatusVerdict::Processing);

    let seen = portal.seen();
    let request = seen.first().expect("one request");
    assert_eq!(
        request.referer.as_deref(),
        Some(
            format!("http://{addr}/stranieri/?lang=italian&mime=&pratica=26BO123456&invia=Invia")
                .as_str()
        )
    );
    assert_eq!(
        request.cookie.as_deref(),
        Some("cookieconsent_status=dismiss")
    );
    assert!(request
        .user_agent
        .as_deref()
        .is_some_and(|agent| agent.contains("Chrome/144.0.0.0")));
}

#[tokio::test]
async fn page_without_known_tokens_is_unknown() {
    let addr = spawn_portal(FakePortal::answering("<p>Nessun risultato</p>")).await;
    let classifier = StatusClassifier::new(client_for(addr, Duration::from_secs(20)));

    let verdict = classifier
        .classify(&normalize_for_year("ZZ0000000", 2026))
        .await;
    assert_eq!(verdict, StatusVerdict::Unknown);
}

#[tokio::test]
async fn server_error_is_query_error() {
    let portal = FakePortal {
        status: StatusCode::SERVICE_UNAVAILABLE,
        ..FakePortal::answering("la consegna")
    };
    let addr = spawn_portal(portal.clone()).await;
    let classifier = StatusClassifier::new(client_for(addr, Duration::from_secs(20)));

    let verdict = classifier.classify(&normalize_for_year("123456", 2026)).await;

    assert_eq!(verdict, StatusVerdict::QueryError);
    assert_eq!(portal.seen().len(), 1, "no retry after a failed attempt");
}

#[tokio::test]
async fn slow_portal_times_out_as_query_error() {
    let portal = FakePortal {
        delay: Duration::from_secs(5),
        ..FakePortal::answering("la consegna")
    };
    let addr = spawn_portal(portal.clone()).await;
    let classifier = StatusClassifier::new(client_for(addr, Duration::from_millis(200)));

    let verdict = classifier.classify(&normalize_for_year("123456", 2026)).await;

    assert_eq!(verdict, StatusVerdict::QueryError);
    assert_eq!(portal.seen().len(), 1);
}

#[tokio::test]
async fn refused_connection_is_query_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("reserve port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let service = PermitStatusService::new(client_for(addr, Duration::from_secs(2)));
    let reply = service.resolve(&normalize_for_year("123456", 2026)).await;

    assert!(reply.text.contains("Connection Error"));
    assert!(reply.text.contains("Please try again in a few minutes."));
    assert!(!reply.text.contains("error sending request"));
}
