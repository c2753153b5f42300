use camara_acquire::{ApiConfig, CamaraClient, ConsultaError, DirectResolver, Resolution, Resolver};
use camara_model::IdentifierError;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver(server: &MockServer) -> DirectResolver {
    let config = ApiConfig::default()
        .with_api_base(&server.uri())
        .with_tracking_page_base("https://www.camara.leg.br/proposicoesWeb/fichadetramitacao?idProposicao=");
    DirectResolver::new(CamaraClient::new(config).unwrap())
}

fn search_hit() -> serde_json::Value {
    json!({"dados": [{
        "id": 123,
        "siglaTipo": "PL",
        "numero": 2306,
        "ano": 2020,
        "ementa": "Dispõe sobre medidas de transparência."
    }]})
}

fn details() -> serde_json::Value {
    json!({"dados": {
        "id": 123,
        "statusProposicao": {
            "dataHora": "2021-05-05T10:00",
            "siglaOrgao": "CCJC",
            "regime": "Ordinário",
            "descricaoSituacao": "Aguardando Parecer"
        },
        "urlInteiroTeor": "https://www.camara.leg.br/proposicoesWeb/prop_mostrarintegra?codteor=1"
    }})
}

async fn mount_search(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/proposicoes"))
        .and(query_param("siglaTipo", "PL"))
        .and(query_param("numero", "2306"))
        .and(query_param("ano", "2020"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_lookup_with_empty_history() {
    let server = MockServer::start().await;
    mount_search(&server, search_hit()).await;
    Mock::given(method("GET"))
        .and(path("/proposicoes/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(details()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/proposicoes/123/tramitacoes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"dados": []})))
        .expect(1)
        .mount(&server)
        .await;

    let resolution = resolver(&server).resolve("PL 2306/2020").await.unwrap();
    let Resolution::Record(record) = resolution else {
        panic!("expected a record, got {resolution:?}");
    };

    assert_eq!(record.proposicao, "PL 2306/2020");
    assert_eq!(record.ementa, "Dispõe sobre medidas de transparência.");
    assert_eq!(record.status, "Aguardando Parecer");
    assert_eq!(record.orgao, "CCJC");
    assert_eq!(record.regime, "Ordinário");
    assert_eq!(record.data, "N/A");
    assert_eq!(record.despacho, "N/A");
    assert_eq!(record.descricao, "N/A");
    assert_eq!(
        record.link_pagina,
        "https://www.camara.leg.br/proposicoesWeb/fichadetramitacao?idProposicao=123"
    );
    assert_eq!(
        record.link_texto.as_deref(),
        Some("https://www.camara.leg.br/proposicoesWeb/prop_mostrarintegra?codteor=1")
    );
}

#[tokio::test]
async fn test_lookup_takes_first_history_entry() {
    let server = MockServer::start().await;
    mount_search(&server, search_hit()).await;
    Mock::given(method("GET"))
        .and(path("/proposicoes/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(details()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/proposicoes/123/tramitacoes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"dados": [
            {"dataHora": "2020-04-28T18:24", "despacho": "Apresentação", "descricaoTramitacao": "Apresentação de Proposição"},
            {"dataHora": "2021-05-05T10:00", "despacho": "Designado Relator"}
        ]})))
        .mount(&server)
        .await;

    let Resolution::Record(record) = resolver(&server).resolve("pl 2306 / 2020").await.unwrap() else {
        panic!("expected a record");
    };
    assert_eq!(record.data, "2020-04-28T18:24");
    assert_eq!(record.despacho, "Apresentação");
    assert_eq!(record.descricao, "Apresentação de Proposição");
}

#[tokio::test]
async fn test_empty_search_is_not_found_without_follow_ups() {
    let server = MockServer::start().await;
    mount_search(&server, json!({"dados": []})).await;
    Mock::given(path("/proposicoes/123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = resolver(&server).resolve("PL 2306/2020").await.unwrap_err();
    assert!(matches!(err, ConsultaError::NotFound(ref label) if label == "PL 2306/2020"));
}

#[tokio::test]
async fn test_invalid_input_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = resolver(&server).resolve("lei das fake news").await.unwrap_err();
    assert!(matches!(
        err,
        ConsultaError::Identifier(IdentifierError::InvalidFormat(_))
    ));

    let err = resolver(&server).resolve("   ").await.unwrap_err();
    assert!(matches!(err, ConsultaError::Identifier(IdentifierError::Empty)));
}

#[tokio::test]
async fn test_history_failure_aborts_join() {
    let server = MockServer::start().await;
    mount_search(&server, search_hit()).await;
    Mock::given(method("GET"))
        .and(path("/proposicoes/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(details()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/proposicoes/123/tramitacoes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = resolver(&server).resolve("PL 2306/2020").await.unwrap_err();
    assert!(matches!(err, ConsultaError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_malformed_details_is_decode_error() {
    let server = MockServer::start().await;
    mount_search(&server, search_hit()).await;
    Mock::given(method("GET"))
        .and(path("/proposicoes/123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>manutenção</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/proposicoes/123/tramitacoes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"dados": []})))
        .mount(&server)
        .await;

    let err = resolver(&server).resolve("PL 2306/2020").await.unwrap_err();
    assert!(matches!(err, ConsultaError::Decode { .. }));
    assert!(err.to_string().starts_with("Resposta inválida"));
}

/// An address nothing listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn test_unreachable_api_is_network_error() {
    let config = ApiConfig::default().with_api_base(&closed_port_url());
    let resolver = DirectResolver::new(CamaraClient::new(config).unwrap());

    let err = resolver.resolve("PL 2306/2020").await.unwrap_err();
    assert!(matches!(err, ConsultaError::Network { .. }), "got {err:?}");
    assert_eq!(err.to_string(), "Erro de rede ao consultar proposição");
}
