//! Integration tests against a mock registry server.

use confctl_client::{
    ApiVersion, ClientConfig, ClientError, ConfigurationQuery, CreateConfigurationOpts,
    CreateNamespaceOpts, RegistryClient,
};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_BODY: &str =
    r#"{"accessToken":"test-token","tokenTtl":18000,"globalAdmin":true,"username":"nacos"}"#;

fn client_for(server: &MockServer) -> RegistryClient {
    let config = ClientConfig::new(server.uri(), "nacos", "nacos");
    RegistryClient::new(config).unwrap()
}

async fn mount_v1_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_BODY))
        .mount(server)
        .await;
}

fn user_page(page_number: u32, pages_available: u32, total: u32, names: &[&str]) -> String {
    let items: Vec<String> = names
        .iter()
        .map(|n| format!(r#"{{"username":"{n}","password":"x"}}"#))
        .collect();
    format!(
        r#"{{"totalCount":{total},"pageNumber":{page_number},"pagesAvailable":{pages_available},"pageItems":[{}]}}"#,
        items.join(",")
    )
}

#[tokio::test]
async fn detect_selects_v1_when_only_v1_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/console/server/state"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"version":"2.2.0","standalone_mode":"standalone","function_mode":null}"#,
        ))
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), "nacos", "nacos");
    let mut client = RegistryClient::connect(config).await.unwrap();
    assert_eq!(client.api_version(), ApiVersion::V1);
    assert_eq!(client.server_version().await.unwrap(), "2.2.0");
}

#[tokio::test]
async fn detect_prefers_v3_when_both_answer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/console/server/state"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"version":"3.0.2"}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/console/server/state"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"version":"3.0.2"}"#))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), "nacos", "nacos");
    let client = RegistryClient::connect(config).await.unwrap();
    assert_eq!(client.api_version(), ApiVersion::V3);
}

#[tokio::test]
async fn detect_falls_back_to_v1_without_raising() {
    let server = MockServer::start().await;
    // no state endpoint mounted at all

    let config = ClientConfig::new(server.uri(), "nacos", "nacos");
    let client = RegistryClient::connect(config).await.unwrap();
    assert_eq!(client.api_version(), ApiVersion::V1);
}

#[tokio::test]
async fn token_is_cached_across_operations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_BODY))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/console/namespaces"))
        .and(query_param("accessToken", "test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"code":200,"message":null,"data":[]}"#),
        )
        .expect(2)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.list_namespaces().await.unwrap();
    client.list_namespaces().await.unwrap();
}

#[tokio::test]
async fn login_rejection_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("unknown user nacos"))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let err = client.list_namespaces().await.unwrap_err();
    assert!(matches!(err, ClientError::AuthenticationFailed { .. }));
    assert!(err.to_string().contains("unknown user"));
}

#[tokio::test]
async fn pagination_drains_exactly_pages_available_fetches() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/auth/users"))
        .and(query_param("pageNo", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(user_page(1, 3, 5, &["a", "b"])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/users"))
        .and(query_param("pageNo", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(user_page(2, 3, 5, &["c", "d"])),
        )
        .expect(1)
        .mount(&server)
        .await;
    // final page: pages_available == page_number must stop the loop
    Mock::given(method("GET"))
        .and(path("/v1/auth/users"))
        .and(query_param("pageNo", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(user_page(3, 3, 5, &["e"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let users = client.list_users().await.unwrap();
    assert_eq!(users.len(), 5);
    let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn pagination_stops_immediately_when_no_pages_available() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string(user_page(1, 0, 0, &[])))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    assert!(client.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn pagination_unwraps_v3_envelope_with_same_termination_rule() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/auth/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_BODY))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/auth/user/list"))
        .and(query_param("pageNo", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"code":0,"message":null,"data":{}}}"#,
            user_page(1, 1, 2, &["a", "b"])
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_api_version(ApiVersion::V3);
    let users = client.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn failed_page_aborts_whole_fetch() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/users"))
        .and(query_param("pageNo", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(user_page(1, 2, 4, &["a", "b"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/users"))
        .and(query_param("pageNo", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server exploded"))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, ClientError::Http { status: 500, .. }));
}

#[tokio::test]
async fn upsert_updates_when_id_already_listed() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/console/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code":200,"message":null,"data":[
                {"namespace":"X","namespaceShowName":"X","namespaceDesc":"","quota":200,"configCount":0,"type":2}]}"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/console/namespaces"))
        .and(query_param("namespace", "X"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/console/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let opts = CreateNamespaceOpts {
        id: "X".to_string(),
        name: "X renamed".to_string(),
        description: "updated".to_string(),
    };
    client.create_or_update_namespace(&opts).await.unwrap();
}

#[tokio::test]
async fn upsert_creates_when_id_not_listed() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/console/namespaces"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"code":200,"message":null,"data":[]}"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/console/namespaces"))
        .and(body_string_contains("customNamespaceId=X"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/console/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let opts = CreateNamespaceOpts {
        id: "X".to_string(),
        name: "X".to_string(),
        description: String::new(),
    };
    client.create_or_update_namespace(&opts).await.unwrap();
}

#[tokio::test]
async fn missing_configuration_is_not_found_on_empty_200() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    // the registry answers a missing config with 200 and an empty body
    Mock::given(method("GET"))
        .and(path("/v1/cs/configs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let query = ConfigurationQuery {
        data_id: "missing.yaml".to_string(),
        group: "DEFAULT_GROUP".to_string(),
        namespace_id: "dev".to_string(),
    };
    let err = client.get_configuration(&query).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));
    assert!(err.to_string().contains("missing.yaml"));
}

#[tokio::test]
async fn configuration_round_trips_through_create_and_get() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;

    let opts = CreateConfigurationOpts {
        data_id: "app.yaml".to_string(),
        group: "DEFAULT_GROUP".to_string(),
        namespace_id: "dev".to_string(),
        content: "a: 1".to_string(),
        kind: "yaml".to_string(),
        ..CreateConfigurationOpts::default()
    };

    Mock::given(method("POST"))
        .and(path("/v1/cs/configs"))
        .and(body_string_contains("dataId=app.yaml"))
        .and(body_string_contains("group=DEFAULT_GROUP"))
        .and(body_string_contains("tenant=dev"))
        .and(body_string_contains("type=yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&server)
        .await;

    // fixture echoing exactly what the create request carried
    Mock::given(method("GET"))
        .and(path("/v1/cs/configs"))
        .and(query_param("dataId", "app.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"id":"1","dataId":"app.yaml","group":"DEFAULT_GROUP","content":"a: 1",
                "tenant":"dev","type":"yaml","md5":"d6e0c0b1"}"#,
        ))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.create_configuration(&opts).await.unwrap();

    let fetched = client
        .get_configuration(&ConfigurationQuery {
            data_id: opts.data_id.clone(),
            group: opts.group.clone(),
            namespace_id: opts.namespace_id.clone(),
        })
        .await
        .unwrap();

    assert_eq!(fetched.data_id, opts.data_id);
    assert_eq!(fetched.effective_group(), opts.group);
    assert_eq!(fetched.effective_namespace(), opts.namespace_id);
    assert_eq!(fetched.content, opts.content);
    assert_eq!(fetched.kind, opts.kind);
}

#[tokio::test]
async fn list_all_configurations_visits_each_namespace_once() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/console/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code":200,"message":null,"data":[
                {"namespace":"ns1","namespaceShowName":"ns1","namespaceDesc":"","configCount":2}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/cs/configs"))
        .and(query_param("tenant", "ns1"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"totalCount":2,"pageNumber":1,"pagesAvailable":1,"pageItems":[
                {"dataId":"a.yaml","group":"DEFAULT_GROUP","content":"a","tenant":"ns1"},
                {"dataId":"b.yaml","group":"DEFAULT_GROUP","content":"b","tenant":"ns1"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let configs = client.list_all_configurations().await.unwrap();
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0].data_id, "a.yaml");
    assert_eq!(configs[1].data_id, "b.yaml");
}

#[tokio::test]
async fn html_error_body_is_not_echoed_in_error_detail() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/v1/console/namespaces"))
        .respond_with(
            ResponseTemplate::new(502).set_body_string("<html><body>Bad Gateway</body></html>"),
        )
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let err = client.delete_namespace("dev").await.unwrap_err();
    match err {
        ClientError::Http { status, detail, .. } => {
            assert_eq!(status, 502);
            assert!(detail.is_empty());
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_error_body_is_included_in_error_detail() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/console/namespaces"))
        .respond_with(ResponseTemplate::new(500).set_body_string("namespace ID already exists"))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let opts = CreateNamespaceOpts {
        id: "dup".to_string(),
        name: "dup".to_string(),
        description: String::new(),
    };
    let err = client.create_namespace(&opts).await.unwrap_err();
    assert!(err.to_string().contains("namespace ID already exists"));
}

#[tokio::test]
async fn configuration_with_explicit_null_fields_decodes() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    // unset columns arrive as JSON null, not as omitted keys
    Mock::given(method("GET"))
        .and(path("/v1/cs/configs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"id":"9","dataId":"app.yaml","group":"DEFAULT_GROUP","content":"a: 1",
                "tenant":"dev","type":"yaml","appName":null,"desc":null,
                "configTags":null,"encryptedDataKey":null}"#,
        ))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let cfg = client
        .get_configuration(&ConfigurationQuery {
            data_id: "app.yaml".to_string(),
            group: "DEFAULT_GROUP".to_string(),
            namespace_id: "dev".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(cfg.content, "a: 1");
    assert_eq!(cfg.application, "");
    assert_eq!(cfg.tags, "");
}

#[tokio::test]
async fn listing_with_null_page_items_is_empty() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"totalCount":0,"pageNumber":1,"pagesAvailable":0,"pageItems":null}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    assert!(client.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn oversized_error_body_is_truncated_in_detail() {
    let server = MockServer::start().await;
    mount_v1_login(&server).await;
    let huge = "x".repeat((1 << 20) + 4096);
    Mock::given(method("DELETE"))
        .and(path("/v1/console/namespaces"))
        .respond_with(ResponseTemplate::new(500).set_body_string(huge))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let err = client.delete_namespace("dev").await.unwrap_err();
    match err {
        ClientError::Http { status, detail, .. } => {
            assert_eq!(status, 500);
            assert_eq!(detail.len(), 1 << 20);
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn v3_configuration_get_unwraps_envelope_and_dual_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/auth/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_BODY))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/console/cs/config"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code":0,"message":"success","data":{
                "id":"7","dataId":"app.yaml","groupName":"DEFAULT_GROUP",
                "namespaceId":"dev","content":"a: 1","type":"yaml"}}"#,
        ))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_api_version(ApiVersion::V3);
    let cfg = client
        .get_configuration(&ConfigurationQuery {
            data_id: "app.yaml".to_string(),
            group: "DEFAULT_GROUP".to_string(),
            namespace_id: "dev".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(cfg.effective_group(), "DEFAULT_GROUP");
    assert_eq!(cfg.effective_namespace(), "dev");
}
