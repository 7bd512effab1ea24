//! End-to-end dispatcher tests over a recording transport, plus wire-level
//! coverage of `HttpTransport` against a local mock server.

use async_trait::async_trait;
use cielo::{
    BLANK, Card, Cielo, CieloError, Customer, HttpTransport, Method, Payment, RawResponse,
    RecurrentPayment, Sale, StatusKind, Transport, TransportError,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAYMENT_ID: &str = "26e5da86-d975-4e2f-aa25-862b5a43e9f4";

#[derive(Debug, Clone)]
struct RecordedCall {
    method: Method,
    path: String,
    body: Option<Value>,
}

enum Reply {
    /// 200 with the request body echoed back
    Echo,
    Fixed { status: u16, body: String },
}

struct MockTransport {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    reply: Reply,
}

impl MockTransport {
    fn new(reply: Reply) -> (Self, Arc<Mutex<Vec<RecordedCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: Arc::clone(&calls),
                reply,
            },
            calls,
        )
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        match &self.reply {
            Reply::Echo => Ok(RawResponse {
                status: 200,
                body: body.map(|b| b.to_string()).unwrap_or_default(),
            }),
            Reply::Fixed { status, body } => Ok(RawResponse {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

fn credit_sale() -> Sale {
    Sale::new("order-1234")
        .customer(Customer::new("Ana Souza"))
        .payment(Payment::credit(
            15700,
            Card::new("4111111111111111", "ANA SOUZA", "12/2030", "123").brand("Visa"),
        ))
}

fn recurrent_sale() -> Sale {
    Sale::new("order-5678").payment(
        Payment::credit(9900, Card::new("4111111111111111", "ANA SOUZA", "12/2030", "123"))
            .recurrent(RecurrentPayment::new("Monthly")),
    )
}

#[tokio::test]
async fn invalid_guid_is_rejected_before_the_transport() {
    let (transport, calls) = MockTransport::new(Reply::Fixed {
        status: 200,
        body: "{}".into(),
    });
    let gateway = Cielo::with_transport(transport);

    for result in [
        gateway.capture("abc", None).await,
        gateway.cancel_payment("", Some(100)).await,
        gateway.deactivate_recurrent_payment("not-a-guid").await,
        gateway.get_sale("26e5da86d9754e2faa25862b5a43e9f4").await,
    ] {
        assert!(matches!(result.unwrap_err(), CieloError::InvalidArgument(_)));
    }
    assert_eq!(calls.lock().unwrap().len(), 0);
}

#[tokio::test]
async fn invalid_payload_is_rejected_before_the_transport() {
    let (transport, calls) = MockTransport::new(Reply::Fixed {
        status: 200,
        body: "{}".into(),
    });
    let gateway = Cielo::with_transport(transport);

    let err = gateway.credit(&Sale::new("")).await.unwrap_err();
    let errors = err.field_errors().expect("validation error");
    assert_eq!(errors.message_at(&["MerchantOrderId"]), Some(BLANK));
    assert_eq!(errors.message_at(&["Payment"]), Some(BLANK));
    assert_eq!(calls.lock().unwrap().len(), 0);
}

#[tokio::test]
async fn capture_builds_the_expected_path() {
    let (transport, calls) = MockTransport::new(Reply::Fixed {
        status: 200,
        body: "{}".into(),
    });
    let gateway = Cielo::with_transport(transport);

    gateway.capture(PAYMENT_ID, None).await.unwrap();
    gateway.capture(PAYMENT_ID, Some(5000)).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].method, Method::Put);
    assert_eq!(calls[0].path, format!("sales/{}/capture", PAYMENT_ID));
    assert!(calls[0].body.is_none());
    assert_eq!(calls[1].path, format!("sales/{}/capture?amount=5000", PAYMENT_ID));
    assert!(calls[1].body.is_none());
}

#[tokio::test]
async fn void_path_depends_on_amount_presence() {
    let (transport, calls) = MockTransport::new(Reply::Fixed {
        status: 200,
        body: "{}".into(),
    });
    let gateway = Cielo::with_transport(transport);

    gateway.cancel_payment(PAYMENT_ID, None).await.unwrap();
    gateway.cancel_payment(PAYMENT_ID, Some(1000)).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].path, format!("sales/{}/void", PAYMENT_ID));
    assert_eq!(calls[1].path, format!("sales/{}/void?amount=1000", PAYMENT_ID));
    assert_eq!(calls[1].method, Method::Put);
}

#[tokio::test]
async fn deactivate_builds_the_recurrent_path() {
    let (transport, calls) = MockTransport::new(Reply::Fixed {
        status: 200,
        body: "{}".into(),
    });
    let gateway = Cielo::with_transport(transport);

    gateway.deactivate_recurrent_payment(PAYMENT_ID).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].method, Method::Put);
    assert_eq!(calls[0].path, format!("RecurrentPayment/{}/Deactivate", PAYMENT_ID));
}

#[tokio::test]
async fn get_sale_issues_a_get_with_no_body() {
    let (transport, calls) = MockTransport::new(Reply::Fixed {
        status: 200,
        body: "{}".into(),
    });
    let gateway = Cielo::with_transport(transport);

    gateway.get_sale(PAYMENT_ID).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].method, Method::Get);
    assert_eq!(calls[0].path, format!("sales/{}", PAYMENT_ID));
    assert!(calls[0].body.is_none());
}

#[tokio::test]
async fn create_round_trips_the_payload_through_an_echo_transport() {
    let (transport, calls) = MockTransport::new(Reply::Echo);
    let gateway = Cielo::with_transport(transport);

    let sale = credit_sale();
    let created = gateway.credit(&sale).await.unwrap();

    assert_eq!(created, serde_json::to_value(&sale).unwrap());
    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].method, Method::Post);
    assert_eq!(calls[0].path, "sales/");
}

#[tokio::test]
async fn deprecated_recurrent_alias_still_dispatches() {
    let (transport, calls) = MockTransport::new(Reply::Echo);
    let gateway = Cielo::with_transport(transport);

    #[allow(deprecated)]
    let created = gateway.recurrent(&recurrent_sale()).await.unwrap();

    assert_eq!(created["Payment"]["RecurrentPayment"]["Interval"], "Monthly");
    assert_eq!(calls.lock().unwrap()[0].path, "sales/");
}

#[tokio::test]
async fn gateway_error_list_is_surfaced() {
    let (transport, _calls) = MockTransport::new(Reply::Fixed {
        status: 400,
        body: r#"[{"Code":126,"Message":"Credit Card Expiration Date is invalid"}]"#.into(),
    });
    let gateway = Cielo::with_transport(transport);

    match gateway.credit(&credit_sale()).await.unwrap_err() {
        CieloError::Gateway { kind, status, errors } => {
            assert_eq!(kind, StatusKind::ClientError);
            assert_eq!(status, 400);
            assert_eq!(errors[0].code, 126);
            assert_eq!(errors[0].message, "Credit Card Expiration Date is invalid");
        }
        other => panic!("expected gateway error, got {:?}", other),
    }
}

#[tokio::test]
async fn unparseable_error_body_maps_to_transport_error() {
    let (transport, _calls) = MockTransport::new(Reply::Fixed {
        status: 500,
        body: "<html>oops</html>".into(),
    });
    let gateway = Cielo::with_transport(transport);

    assert!(matches!(
        gateway.credit(&credit_sale()).await.unwrap_err(),
        CieloError::Transport(TransportError::Malformed(_))
    ));
}

#[tokio::test]
async fn http_transport_posts_the_sale_with_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/sales/"))
        .and(header("MerchantId", "mid"))
        .and(header("MerchantKey", "mkey"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"Payment": {"PaymentId": PAYMENT_ID, "Status": 1}})),
        )
        .mount(&server)
        .await;

    let transport =
        HttpTransport::new("mid", "mkey").with_base_url(format!("{}/1/", server.uri()));
    let gateway = Cielo::with_transport(transport);

    let created = gateway.credit(&credit_sale()).await.unwrap();
    assert_eq!(created["Payment"]["PaymentId"], PAYMENT_ID);
}

#[tokio::test]
async fn http_transport_capture_sends_amount_as_query_arg() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/1/sales/{}/capture", PAYMENT_ID)))
        .and(query_param("amount", "5000"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let transport =
        HttpTransport::new("mid", "mkey").with_base_url(format!("{}/1/", server.uri()));
    let gateway = Cielo::with_transport(transport);

    // bodyless 200 maps to a null payload
    assert_eq!(
        gateway.capture(PAYMENT_ID, Some(5000)).await.unwrap(),
        Value::Null
    );
}

#[tokio::test]
async fn http_transport_maps_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/1/sales/{}/void", PAYMENT_ID)))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!([{"Code": 999, "Message": "Internal error"}])),
        )
        .mount(&server)
        .await;

    let transport =
        HttpTransport::new("mid", "mkey").with_base_url(format!("{}/1/", server.uri()));
    let gateway = Cielo::with_transport(transport);

    match gateway.cancel_payment(PAYMENT_ID, None).await.unwrap_err() {
        CieloError::Gateway { kind, status, errors } => {
            assert_eq!(kind, StatusKind::ServerError);
            assert_eq!(status, 500);
            assert_eq!(errors[0].code, 999);
        }
        other => panic!("expected gateway error, got {:?}", other),
    }
}
