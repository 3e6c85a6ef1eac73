use crate::domain::session::Session;
use crate::external_connections::test_util::FakeExternalConnectivity;
use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One request as the stub data service received it
#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or_else(|err| {
            panic!("Request body was not JSON! Error: {err}, Received body: {}", self.body)
        })
    }
}

/// A local HTTP server standing in for the hosted data service. It answers every request with
/// the same status and JSON body and records what it was sent.
pub struct StubDataService {
    base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubDataService {
    pub async fn answering(status: StatusCode, response_body: &'static str) -> StubDataService {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&captured);
        let router: Router = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
                let recorder = Arc::clone(&recorder);
                async move {
                    recorder
                        .lock()
                        .expect("captured request mutex poisoned")
                        .push(CapturedRequest {
                            method,
                            path: uri.path().to_owned(),
                            query: uri.query().map(str::to_owned),
                            headers,
                            body,
                        });

                    (status, [(CONTENT_TYPE, "application/json")], body_for(status, response_body))
                }
            },
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("stub data service could not bind");
        let address = listener
            .local_addr()
            .expect("stub data service has no address");
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("stub data service stopped unexpectedly");
        });

        StubDataService {
            base_url: format!("http://{address}"),
            captured,
        }
    }

    /// Connectivity aimed at this stub, acting for [session]
    pub fn connectivity(&self, session: Option<Session>) -> FakeExternalConnectivity {
        FakeExternalConnectivity::pointed_at(&self.base_url, session)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured
            .lock()
            .expect("captured request mutex poisoned")
            .clone()
    }

    /// The single request the stub received, failing the test if there were more or fewer
    pub fn only_request(&self) -> CapturedRequest {
        let requests = self.requests();
        assert_eq!(1, requests.len(), "expected exactly one request, got {requests:#?}");
        requests[0].clone()
    }
}

/// 204 responses must not carry a body
fn body_for(status: StatusCode, response_body: &'static str) -> &'static str {
    if status == StatusCode::NO_CONTENT {
        ""
    } else {
        response_body
    }
}
