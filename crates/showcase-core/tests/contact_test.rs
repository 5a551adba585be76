#![allow(clippy::unwrap_used)]
// Contact form delivery through the EmailJS client, against wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use showcase_core::contact::submit;
use showcase_core::{ContactField, ContactForm, CoreError, FormStatus};
use showcase_mail::{EmailJsClient, EmailJsCredentials};

async fn setup() -> (MockServer, EmailJsClient) {
    let server = MockServer::start().await;
    let client = EmailJsClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        EmailJsCredentials {
            service_id: "service_site".into(),
            template_id: "template_contact".into(),
            public_key: SecretString::from("pk"),
            access_token: None,
        },
    );
    (server, client)
}

fn filled_form() -> ContactForm {
    let mut form = ContactForm::new();
    form.set_field(ContactField::Name, "Ada Lovelace");
    form.set_field(ContactField::Email, "ada@example.com");
    form.set_field(ContactField::Subject, "Curso");
    form.set_field(ContactField::Message, "Quisiera más información del curso.");
    form
}

#[tokio::test]
async fn test_submit_sends_template_params() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1.0/email/send"))
        .and(body_partial_json(json!({
            "service_id": "service_site",
            "template_params": {
                "from_name": "Ada Lovelace",
                "from_email": "ada@example.com",
                "company": "No especificada"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = filled_form();
    submit(&mut form, &client).await.unwrap();
    assert_eq!(form.status(), &FormStatus::Sent);
}

#[tokio::test]
async fn test_rejection_keeps_fields_for_retry() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(412).set_body_string("Template not found"))
        .mount(&server)
        .await;

    let mut form = filled_form();
    let err = submit(&mut form, &client).await.unwrap_err();
    match err {
        CoreError::Delivery { message, status } => {
            assert_eq!(status, Some(412));
            assert_eq!(message, "Template not found");
        }
        other => panic!("expected Delivery, got: {other:?}"),
    }
    assert!(matches!(form.status(), FormStatus::Failed(_)));
    assert_eq!(form.message().name, "Ada Lovelace");
}

#[tokio::test]
async fn test_invalid_form_never_reaches_the_service() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut form = filled_form();
    form.set_field(ContactField::Email, "not-an-email");
    let err = submit(&mut form, &client).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "email", .. }));
    assert_eq!(form.status(), &FormStatus::Idle);
}

#[tokio::test]
async fn test_unreachable_service_is_reported_as_delivery_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = EmailJsClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://127.0.0.1:{port}")).unwrap(),
        EmailJsCredentials {
            service_id: "service_site".into(),
            template_id: "template_contact".into(),
            public_key: SecretString::from("pk"),
            access_token: None,
        },
    );

    let mut form = filled_form();
    let err = submit(&mut form, &client).await.unwrap_err();
    match err {
        CoreError::Delivery { message, status } => {
            assert_eq!(message, "cannot reach the mail service");
            assert_eq!(status, None);
        }
        other => panic!("expected Delivery, got: {other:?}"),
    }
    assert!(matches!(form.status(), FormStatus::Failed(_)));
    assert_eq!(form.message().name, "Ada Lovelace");
}
