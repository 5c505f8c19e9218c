#![allow(clippy::unwrap_used)]
// Integration tests for `Client` using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

use unified_api::{
    Client, DEFAULT_USER_AGENT, DeviceFilter, Error, GuestAuthorization, ListOptions, Request,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = Client::with_http(reqwest::Client::new(), &base_url, "default").unwrap();
    (server, client)
}

/// Start a server, mount a login that issues both cookies, and log in.
async fn logged_in() -> (MockServer, Client) {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "unifises=abc123; Path=/")
                .append_header("Set-Cookie", "csrf_token=tok456; Path=/")
                .set_body_json(json!({"data": [], "meta": {"rc": "ok"}})),
        )
        .mount(&server)
        .await;

    client.login("admin", &password()).await.unwrap();
    (server, client)
}

fn password() -> SecretString {
    "hunter2".to_string().into()
}

fn site_path(suffix: &str) -> String {
    format!("/api/s/default/{suffix}")
}

fn ok_envelope(data: Value) -> Value {
    json!({"data": data, "meta": {"rc": "ok"}})
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn login_stores_session_cookies() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"username": "admin", "password": "hunter2"})))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "unifises=abc123; Path=/; HttpOnly")
                .append_header("Set-Cookie", "csrf_token=tok456; Path=/")
                .set_body_json(json!({"data": [], "meta": {"rc": "ok"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let status = client.login("admin", &password()).await.unwrap();

    assert_eq!(status.username, "admin");
    assert_eq!(status.status, "ok");
    let cookies = client.session_cookies();
    assert_eq!(cookies.session.as_deref(), Some("abc123"));
    assert_eq!(cookies.csrf.as_deref(), Some("tok456"));
}

#[tokio::test]
async fn login_without_session_cookie_fails() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = client.login("admin", &password()).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn login_without_csrf_token_fails() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "unifises=abc123; Path=/")
                .set_body_json(json!({"data": [], "meta": {"rc": "ok"}})),
        )
        .mount(&server)
        .await;

    let result = client.login("admin", &password()).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_logged_in());
    assert_eq!(client.session_cookies().csrf, None);
}

#[tokio::test]
async fn relogin_does_not_reuse_previous_session() {
    let (server, client) = logged_in().await;
    server.reset().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.login("admin", &password()).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    let cookies = client.session_cookies();
    assert_eq!(cookies.session, None);
    assert_eq!(cookies.csrf, None);
}

#[tokio::test]
async fn login_rejected_reports_controller_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "invalid credentials", "request_id": "req-9"})),
        )
        .mount(&server)
        .await;

    let err = client.login("admin", &password()).await.unwrap_err();

    assert!(err.is_auth_failure());
    let text = err.to_string();
    assert!(text.contains("invalid credentials"), "got: {text}");
    assert!(text.contains("401 (request \"req-9\")"), "got: {text}");
    assert!(text.starts_with("POST "), "got: {text}");
}

#[tokio::test]
async fn requests_before_login_are_refused_locally() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.list_alarms(None).await;
    assert!(matches!(result, Err(Error::NotLoggedIn)), "got: {result:?}");
}

#[tokio::test]
async fn logout_clears_session() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/logoff"))
        .and(header_regex("cookie", "unifises=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();

    assert!(!client.is_logged_in());
    assert_eq!(client.session_cookies().csrf, None);
    assert!(matches!(client.list_events(None).await, Err(Error::NotLoggedIn)));
}

#[tokio::test]
async fn failed_logout_keeps_session() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/logoff"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client.logout().await.is_err());
    assert!(client.is_logged_in());
}

#[tokio::test]
async fn transport_failure_is_not_retried() {
    let base_url = Url::parse("http://127.0.0.1:1").unwrap();
    let client = Client::with_http(reqwest::Client::new(), &base_url, "default").unwrap();

    let result = client.login("admin", &password()).await;

    assert!(matches!(result, Err(Error::Transport(_))), "got: {result:?}");
}

// ── Session cookies and headers ─────────────────────────────────────

#[tokio::test]
async fn rotated_cookie_is_sent_on_next_request() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("list/event")))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "unifises=rotated789; Path=/")
                .set_body_json(ok_envelope(json!([]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(site_path("list/alarm")))
        .and(header_regex("cookie", "unifises=rotated789"))
        .and(header_regex("cookie", "csrf_token=tok456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    client.list_events(None).await.unwrap();
    client.list_alarms(None).await.unwrap();

    assert_eq!(client.session_cookies().session.as_deref(), Some("rotated789"));
}

/// Issues a fresh `unifises` value on every response.
struct RotatingSession {
    issued: AtomicUsize,
}

impl Respond for RotatingSession {
    fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(200)
            .append_header("Set-Cookie", format!("unifises=rot-{n}; Path=/").as_str())
            .set_body_json(ok_envelope(json!([])))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_client_never_sends_torn_session() {
    const TASKS: usize = 8;
    const CALLS: usize = 10;

    let (server, client) = logged_in().await;
    Mock::given(method("GET"))
        .and(path(site_path("list/alarm")))
        .respond_with(RotatingSession {
            issued: AtomicUsize::new(0),
        })
        .expect(u64::try_from(TASKS * CALLS).unwrap())
        .mount(&server)
        .await;

    let client = Arc::new(client);
    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                for _ in 0..CALLS {
                    client.list_alarms(None).await.unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let requests = server.received_requests().await.unwrap();
    let cookie_headers: Vec<String> = requests
        .iter()
        .filter(|r| r.url.path() == site_path("list/alarm"))
        .map(|r| r.headers.get("cookie").unwrap().to_str().unwrap().to_owned())
        .collect();
    assert_eq!(cookie_headers.len(), TASKS * CALLS);
    for value in &cookie_headers {
        let (session, csrf) = value.split_once("; ").unwrap();
        let session = session.strip_prefix("unifises=").unwrap();
        assert!(
            session == "abc123" || session.starts_with("rot-"),
            "unexpected session cookie: {value}"
        );
        assert_eq!(csrf, "csrf_token=tok456", "torn cookie header: {value}");
    }

    let issued: Vec<String> = (0..TASKS * CALLS).map(|n| format!("rot-{n}")).collect();
    let cookies = client.session_cookies();
    let last = cookies.session.as_deref().unwrap();
    assert!(issued.iter().any(|v| v == last), "final session {last} was never issued");
    assert_eq!(cookies.csrf.as_deref(), Some("tok456"));
}

#[tokio::test]
async fn requests_carry_accept_agent_and_csrf_headers() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path(site_path("cmd/stamgr")))
        .and(header("accept", "application/json"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .and(header("x-csrf-token", "tok456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.block_client("AA:BB:CC:DD:EE:FF", true).await.unwrap();
    assert!(resp.is_ok());
}

#[tokio::test]
async fn custom_user_agent_is_prefixed() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = Client::with_http(reqwest::Client::new(), &base_url, "default")
        .unwrap()
        .with_user_agent("inventory-bot/3");

    let expected = format!("inventory-bot/3+{DEFAULT_USER_AGENT}");
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("user-agent", expected.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "unifises=abc123; Path=/")
                .append_header("Set-Cookie", "csrf_token=tok456; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.login("admin", &password()).await.unwrap();
}

// ── Lists and lookups ───────────────────────────────────────────────

#[tokio::test]
async fn list_alarms_decodes_records() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("list/alarm")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"_id": "a1", "msg": "x"}]})),
        )
        .mount(&server)
        .await;

    let alarms = client.list_alarms(None).await.unwrap();

    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0].id, "a1");
    assert_eq!(alarms[0].message.as_deref(), Some("x"));
}

#[tokio::test]
async fn list_events_keeps_server_order() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("list/event")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            {"_id": "evt3", "key": "EVT_WU_Connected", "subsystem": "wlan"},
            {"_id": "evt1", "key": "EVT_LU_Disconnected", "subsystem": "lan"},
            {"_id": "evt3", "key": "EVT_WU_Connected", "subsystem": "wlan"}
        ]))))
        .mount(&server)
        .await;

    let events = client.list_events(None).await.unwrap();

    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["evt3", "evt1", "evt3"]);
    assert_eq!(events[1].subsystem.as_deref(), Some("lan"));
}

#[tokio::test]
async fn list_options_become_query_parameters() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("list/user")))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            {"_id": "u1", "mac": "00:11:22:33:44:55", "is_guest": true}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let users = client
        .list_users(Some(&ListOptions { page: 2, per_page: 25 }))
        .await
        .unwrap();

    assert!(users[0].is_guest);
}

#[tokio::test]
async fn sites_are_controller_scoped() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/v1/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            {"_id": "s1", "name": "default", "desc": "Default", "role": "admin"}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/sites/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            {"_id": "s3", "name": "branch"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let sites = client.list_sites(None).await.unwrap();

    assert_eq!(sites[0].name, "default");
    assert_eq!(sites[0].desc.as_deref(), Some("Default"));
    assert_eq!(client.get_site(3).await.unwrap().name, "branch");
}

#[tokio::test]
async fn rejected_envelope_is_an_error() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"rc": "error", "msg": "api.err.InvalidObject"},
            "data": []
        })))
        .mount(&server)
        .await;

    match client.list_devices(None).await {
        Err(Error::Rejected { message }) => assert!(message.contains("InvalidObject")),
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("list/alarm")))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\": [oops"))
        .mount(&server)
        .await;

    match client.list_alarms(None).await {
        Err(Error::Decode { body, .. }) => assert_eq!(body, "{\"data\": [oops"),
        other => panic!("expected Decode, got: {other:?}"),
    }
}

#[tokio::test]
async fn get_with_invalid_id_sends_nothing() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(0)
        .mount(&server)
        .await;

    for result in [
        client.get_alarm(0).await.map(|_| ()),
        client.get_event(-3).await.map(|_| ()),
        client.get_device(0).await.map(|_| ()),
        client.get_user(0).await.map(|_| ()),
        client.get_site(0).await.map(|_| ()),
    ] {
        assert!(
            matches!(result, Err(Error::InvalidArgument { argument: "id", .. })),
            "got: {result:?}"
        );
    }
}

#[tokio::test]
async fn get_returns_first_record_or_not_found() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("list/alarm/7")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            {"_id": "a7", "msg": "AP lost contact"}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(site_path("list/alarm/8")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .mount(&server)
        .await;

    let alarm = client.get_alarm(7).await.unwrap();
    assert_eq!(alarm.id, "a7");

    let missing = client.get_alarm(8).await.unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn api_error_carries_status_and_headers() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("list/event")))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-request-id", "edge-1")
                .set_body_json(json!({"meta": {"rc": "error", "msg": "api.err.NotFound"}})),
        )
        .mount(&server)
        .await;

    match client.list_events(None).await {
        Err(Error::Api(api)) => {
            assert_eq!(api.status.as_u16(), 404);
            assert_eq!(api.message, "api.err.NotFound");
            assert_eq!(api.request_id, "");
            assert_eq!(api.headers.get("x-request-id").unwrap(), "edge-1");
            assert!(api.url.path().ends_with("/list/event"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Devices ─────────────────────────────────────────────────────────

fn device_fixture() -> Value {
    ok_envelope(json!([
        {"_id": "d1", "mac": "aa:bb:cc:00:00:01", "type": "uap", "name": "Lobby AP",
         "ip": "10.0.0.11", "model": "U7PG2", "adopted": true, "locating": true},
        {"_id": "d2", "mac": "aa:bb:cc:00:00:02", "type": "usw", "name": "Core Switch",
         "ip": "10.0.0.2", "model": "US24", "adopted": true},
        {"_id": "d3", "mac": "aa:bb:cc:00:00:03", "type": "uap", "adopted": false}
    ]))
}

#[tokio::test]
async fn list_devices_short_filters_by_type() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_fixture()))
        .mount(&server)
        .await;

    let aps = client
        .list_devices_short(DeviceFilter::Uap, None)
        .await
        .unwrap();
    let ids: Vec<&str> = aps.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["d1", "d3"]);
    assert_eq!(aps[0].name.as_deref(), Some("Lobby AP"));

    let all = client
        .list_devices_short(DeviceFilter::All, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn device_lookups_by_mac() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device/aa:bb:cc:00:00:01")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            {"_id": "d1", "mac": "aa:bb:cc:00:00:01", "type": "uap", "ip": "10.0.0.11", "locating": true}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device/aa:bb:cc:00:00:03")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            {"_id": "d3", "mac": "aa:bb:cc:00:00:03", "type": "uap"}
        ]))))
        .mount(&server)
        .await;

    assert_eq!(
        client.device_ip_from_mac("aa:bb:cc:00:00:01").await.unwrap(),
        "10.0.0.11"
    );
    assert_eq!(
        client.device_id_from_mac("aa:bb:cc:00:00:01").await.unwrap(),
        "d1"
    );
    assert!(client.is_locating("aa:bb:cc:00:00:01").await.unwrap());

    let no_ip = client.device_ip_from_mac("aa:bb:cc:00:00:03").await.unwrap_err();
    assert!(no_ip.is_not_found());

    let empty = client.get_device_by_mac("  ").await.unwrap_err();
    assert!(matches!(empty, Error::InvalidArgument { argument: "mac", .. }));
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn locate_and_restart_use_devmgr() {
    let (server, client) = logged_in().await;

    for cmd in ["set-locate", "unset-locate", "restart"] {
        Mock::given(method("POST"))
            .and(path(site_path("cmd/devmgr")))
            .and(body_json(json!({"cmd": cmd, "mac": "aa:bb:cc:00:00:01"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
            .expect(1)
            .mount(&server)
            .await;
    }

    assert!(client.set_locate("aa:bb:cc:00:00:01", true).await.unwrap().is_ok());
    assert!(client.set_locate("aa:bb:cc:00:00:01", false).await.unwrap().is_ok());
    assert!(client.restart_ap("aa:bb:cc:00:00:01").await.unwrap().is_ok());
}

#[tokio::test]
async fn disable_and_rename_update_device_record() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device/aa:bb:cc:00:00:01")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            {"_id": "5f1d", "mac": "aa:bb:cc:00:00:01", "type": "uap"}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(site_path("rest/device/5f1d")))
        .and(body_json(json!({"disabled": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(site_path("rest/device/5f1d")))
        .and(body_json(json!({"name": "Attic AP"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    client.disable_ap("aa:bb:cc:00:00:01", true).await.unwrap();
    client.rename_ap("aa:bb:cc:00:00:01", "Attic AP").await.unwrap();
}

#[tokio::test]
async fn block_twice_sends_identical_bodies() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path(site_path("cmd/stamgr")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(2)
        .mount(&server)
        .await;

    client.block_client("01:23:45:67:89:ab", true).await.unwrap();
    client.block_client("01:23:45:67:89:ab", true).await.unwrap();

    let bodies: Vec<Value> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().ends_with("cmd/stamgr"))
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0], json!({"cmd": "block-sta", "mac": "01:23:45:67:89:ab"}));
}

#[tokio::test]
async fn command_bodies_keep_mac_as_given() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .mount(&server)
        .await;

    client.block_client("AA:BB:CC:DD:EE:FF", true).await.unwrap();
    client.unauthorize_guest(" Aa:bB:cc:dd:ee:ff").await.unwrap();
    client.restart_ap("AA:BB:CC:00:00:01").await.unwrap();

    let bodies: Vec<Value> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().contains("/cmd/"))
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(
        bodies,
        vec![
            json!({"cmd": "block-sta", "mac": "AA:BB:CC:DD:EE:FF"}),
            json!({"cmd": "unauthorize-guest", "mac": " Aa:bB:cc:dd:ee:ff"}),
            json!({"cmd": "restart", "mac": "AA:BB:CC:00:00:01"}),
        ]
    );
}

#[tokio::test]
async fn guest_commands_omit_unset_limits() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path(site_path("cmd/stamgr")))
        .and(body_json(json!({
            "cmd": "authorize-guest",
            "mac": "01:23:45:67:89:AB",
            "minutes": 120,
            "down": 5000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(site_path("cmd/stamgr")))
        .and(body_json(json!({"cmd": "unauthorize-guest", "mac": "01:23:45:67:89:ab"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    client
        .authorize_guest(GuestAuthorization {
            mac: "01:23:45:67:89:AB".into(),
            minutes: Some(120),
            down: Some(5000),
            ..GuestAuthorization::default()
        })
        .await
        .unwrap();
    client.unauthorize_guest("01:23:45:67:89:ab").await.unwrap();
}

#[tokio::test]
async fn command_rc_error_is_returned_not_raised() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path(site_path("cmd/stamgr")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "meta": {"rc": "error", "msg": "api.err.UnknownStation"}
        })))
        .mount(&server)
        .await;

    let resp = client.unauthorize_guest("01:23:45:67:89:ab").await.unwrap();
    assert!(!resp.is_ok());
    assert_eq!(resp.meta.msg.as_deref(), Some("api.err.UnknownStation"));
}

// ── Raw execution ───────────────────────────────────────────────────

#[tokio::test]
async fn execute_to_writer_copies_body_verbatim() {
    let (server, client) = logged_in().await;

    let raw = "{\"data\":[{\"_id\":\"a1\"}],\"meta\":{\"rc\":\"ok\"}}";
    Mock::given(method("GET"))
        .and(path(site_path("list/alarm")))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw))
        .mount(&server)
        .await;

    let mut out = Vec::new();
    let meta = client
        .execute_to_writer(Request::get("list/alarm"), &mut out)
        .await
        .unwrap();

    assert_eq!(meta.status.as_u16(), 200);
    assert_eq!(String::from_utf8(out).unwrap(), raw);

    let bytes = client
        .execute_bytes(Request::get("list/alarm"))
        .await
        .unwrap();
    assert_eq!(&bytes.body[..], raw.as_bytes());
}
