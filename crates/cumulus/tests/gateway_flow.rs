//! Request flows through a configured gateway.

use cumulus::config::{ApiConfig, CumulusConfig};
use cumulus::prelude::*;
use http::StatusCode;

fn gateway() -> Gateway {
    let config = CumulusConfig::builder()
        .api(ApiConfig {
            application_url: "https://heat.example.com:8004/v1".to_string(),
            expose_internal_errors: false,
            ..Default::default()
        })
        .build();
    Gateway::from_config(&config).unwrap()
}

fn resource_params() -> PathParams {
    PathParams::new()
        .with(names::TENANT_ID, "acme")
        .with(names::STACK_NAME, "wordpress")
        .with(names::STACK_ID, "42")
        .with(names::RESOURCE_NAME, "WebServer")
}

#[test]
fn test_resource_request() {
    let gateway = gateway();
    let ctx = gateway.tenant_context("acme").unwrap();
    let ctx = gateway
        .resolve(Stage::Resource, ctx, &resource_params())
        .unwrap();

    let resource = ctx.resource().unwrap();
    assert_eq!(
        resource.arn(),
        "arn:openstack:heat::acme:stacks/wordpress/42/resources/WebServer"
    );

    let links = [
        gateway.link(&ctx, resource.into(), None).unwrap(),
        gateway
            .link(&ctx, resource.stack().into(), Some("stack"))
            .unwrap(),
    ];
    assert_eq!(
        links[0].href,
        "https://heat.example.com:8004/v1/acme/stacks/wordpress/42/resources/WebServer"
    );
    assert_eq!(links[0].rel, "self");
    assert_eq!(
        links[1].href,
        "https://heat.example.com:8004/v1/acme/stacks/wordpress/42"
    );

    let body = serde_json::to_value(&links).unwrap();
    assert_eq!(body[1]["rel"], "stack");
}

#[test]
fn test_url_path_round_trip_through_gateway() {
    let gateway = gateway();
    let ctx = gateway
        .resolve(Stage::Resource, gateway.context(), &resource_params())
        .unwrap();

    let identity = Identity::from(ctx.resource().unwrap().clone());
    let parsed = Identity::from_url_path("acme", &identity.url_path()).unwrap();
    assert_eq!(parsed, identity);
    assert_eq!(identity.arn().parse::<Identity>().unwrap(), identity);
}

#[test]
fn test_invalid_link_record_is_redacted() {
    let gateway = gateway();
    let ctx = gateway.context();

    let fields = IdentityFields {
        tenant: Some("acme".to_string()),
        stack_name: Some("word/press".to_string()),
        stack_id: Some("42".to_string()),
        path: None,
    };
    let error = gateway.link(&ctx, fields, None).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Internal);
    assert_eq!(error.explanation(), "Invalid Stack address");

    let rendered = gateway.render_error(&error, Some(&ctx));
    assert_eq!(rendered.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rendered.body["error"]["message"], "An internal error occurred");
}

#[test]
fn test_stage_failure_response() {
    let gateway = gateway();
    let params = resource_params().with(names::STACK_NAME, "");

    let failure = gateway
        .resolve(Stage::Resource, gateway.context(), &params)
        .unwrap_err();
    assert_eq!(failure.stage, "stack");

    let rendered = gateway.render_error(&failure.error, None);
    assert_eq!(rendered.status, StatusCode::BAD_REQUEST);
    assert_eq!(rendered.body["error"]["code"], "BAD_REQUEST");
}

#[test]
fn test_backend_errors() {
    let gateway = gateway();
    let cases = [
        ("StackNotFound", ExistencePolicy::AssumeMissing, StatusCode::NOT_FOUND),
        ("AttributeError", ExistencePolicy::AssumeMissing, StatusCode::NOT_FOUND),
        ("AttributeError", ExistencePolicy::MustExist, StatusCode::BAD_REQUEST),
        ("InvalidTenant", ExistencePolicy::AssumeMissing, StatusCode::FORBIDDEN),
        ("StackExists", ExistencePolicy::AssumeMissing, StatusCode::CONFLICT),
        ("KeyError", ExistencePolicy::MustExist, StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (kind, policy, status) in cases {
        let error = gateway.backend_error(&BackendError::new(kind, "engine said no"), policy);
        assert_eq!(gateway.render_error(&error, None).status, status, "{kind}");
    }
}

#[test]
fn test_session_tenant_wins_over_route() {
    let gateway = gateway();
    let params = PathParams::new()
        .with(names::TENANT_ID, "t2")
        .with(names::STACK_NAME, "s")
        .with(names::STACK_ID, "i");

    let failure = gateway
        .resolve(Stage::Stack, gateway.tenant_context("t1").unwrap(), &params)
        .unwrap_err();
    assert_eq!(failure.stage, "tenant");
    assert_eq!(failure.error.category(), ErrorCategory::Forbidden);

    let params = params.with(names::TENANT_ID, "t1");
    let ctx = gateway
        .resolve(Stage::Stack, gateway.tenant_context("t1").unwrap(), &params)
        .unwrap();
    let stack = ctx.stack().unwrap();
    assert_eq!(stack.tenant().as_str(), "t1");
    assert_eq!(
        gateway.link(&ctx, stack.into(), None).unwrap().href,
        "https://heat.example.com:8004/v1/t1/stacks/s/i"
    );
}
