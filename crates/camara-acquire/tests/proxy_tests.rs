use camara_acquire::{ConsultaError, ProxyResolver, Resolution, Resolver};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_success_envelope_yields_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/consulta/pl%202306%20%2F%202020"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": "[TITULO]PL 2306/2020[/TITULO]"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let proxy = ProxyResolver::new(&server.uri()).unwrap();
    let resolution = proxy.resolve("  pl   2306 /  2020 ").await.unwrap();
    assert_eq!(
        resolution,
        Resolution::Report {
            text: "[TITULO]PL 2306/2020[/TITULO]".into()
        }
    );
}

#[tokio::test]
async fn test_error_envelope_is_a_message_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "Erro ao consultar proposição: timeout"
        })))
        .mount(&server)
        .await;

    let proxy = ProxyResolver::new(&server.uri()).unwrap();
    let resolution = proxy.resolve("PEC 45/2019").await.unwrap();
    assert_eq!(
        resolution,
        Resolution::Message {
            text: "Erro ao consultar proposição: timeout".into()
        }
    );
}

#[tokio::test]
async fn test_empty_input_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let proxy = ProxyResolver::new(&server.uri()).unwrap();
    let err = proxy.resolve("").await.unwrap_err();
    assert_eq!(err.to_string(), "Digite o número da proposição");

    let err = proxy.resolve("qualquer coisa").await.unwrap_err();
    assert!(err.to_string().starts_with("Formato inválido"));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let proxy = ProxyResolver::new(&server.uri()).unwrap();
    let err = proxy.resolve("PL 1/2020").await.unwrap_err();
    assert!(matches!(err, ConsultaError::Decode { .. }));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let proxy = ProxyResolver::new(&server.uri()).unwrap();
    let err = proxy.resolve("PL 1/2020").await.unwrap_err();
    assert!(matches!(err, ConsultaError::Status { status: 502, .. }));
}

/// An address nothing listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let proxy = ProxyResolver::new(&closed_port_url()).unwrap();

    let err = proxy.resolve("PL 2306/2020").await.unwrap_err();
    assert!(matches!(err, ConsultaError::Network { ref url, .. } if url.contains("/consulta/")));
    assert!(!err.to_string().contains("127.0.0.1"));
}
