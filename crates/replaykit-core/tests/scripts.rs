//! End-to-end rendering of stored flows against golden scripts.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use replaykit_core::{
    render_flow_requests, render_raw_flow, render_single_request, Direction, ErrorKind, Flow,
    Message, ReplayError, RequestOptions,
};

use vector_loader::load_text;

fn notes_login() -> Flow {
    Flow::from_json(&load_text("flows", "notes_login.json")).unwrap()
}

#[test]
fn session_script_matches_golden() {
    let script = render_flow_requests(&notes_login(), RequestOptions::flow()).unwrap();
    assert_eq!(script, load_text("flows", "notes_login.requests.py"));
}

#[test]
fn raw_script_matches_golden() {
    let script = render_raw_flow(&notes_login()).unwrap();
    assert_eq!(script, load_text("flows", "notes_login.pwn.py"));
}

#[test]
fn rendering_twice_is_byte_identical() {
    let flow = notes_login();
    for opts in [
        RequestOptions::flow(),
        RequestOptions {
            tokenize: false,
            use_session: false,
        },
    ] {
        assert_eq!(
            render_flow_requests(&flow, opts).unwrap(),
            render_flow_requests(&flow, opts).unwrap()
        );
    }
    assert_eq!(render_raw_flow(&flow).unwrap(), render_raw_flow(&flow).unwrap());
}

#[test]
fn sessionless_flow_passes_headers_per_call() {
    let opts = RequestOptions {
        tokenize: true,
        use_session: false,
    };
    let script = render_flow_requests(&notes_login(), opts).unwrap();
    assert!(!script.contains("Session()"));
    assert_eq!(script.matches(", headers=headers)").count(), 2);
    assert!(script.contains("headers = {'Cookie': 'session=xyz'}\n"));
}

#[test]
fn untokenized_flow_keeps_raw_bodies() {
    let opts = RequestOptions {
        tokenize: false,
        use_session: true,
    };
    let script = render_flow_requests(&notes_login(), opts).unwrap();
    assert!(script.contains("data = b'username=bob&password=hunter2'\n"));
}

#[test]
fn single_request_uses_the_flow_port() {
    let flow = notes_login();
    let raw = flow.messages[2].text_bytes().unwrap();
    let script = render_single_request(raw, &flow, RequestOptions::single()).unwrap();
    assert!(script.contains(
        "requests.get(f\"http://{host}:5000\" + '/notes?id=3', data=data, headers=headers)"
    ));
    assert!(script.contains("host = os.getenv(\"TARGET_IP\")\n"));
}

#[test]
fn get_a_server_post_b_renders_two_calls_in_order() {
    let flow = Flow::new(
        8000,
        vec![
            Message::client_text("GET /a HTTP/1.1\r\n\r\n"),
            Message::server_text("\u{0}\u{1} whatever the server said"),
            Message::client_text("POST /b HTTP/1.1\r\n\r\n"),
        ],
    );
    let script = render_flow_requests(&flow, RequestOptions::flow()).unwrap();
    let calls: Vec<&str> = script
        .lines()
        .filter(|l| l.starts_with("s.get(") || l.starts_with("s.post("))
        .collect();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].contains("'/a'"));
    assert!(calls[1].contains("'/b'"));
}

#[test]
fn no_partial_script_on_failure() {
    let flow = Flow::new(
        8000,
        vec![
            Message::client_text("GET /a HTTP/1.1\r\n\r\n"),
            Message::client_text("GET b HTTP/1.1\r\n\r\n"),
        ],
    );
    match render_flow_requests(&flow, RequestOptions::flow()) {
        Err(ReplayError::FlowRenderFailed { index, source }) => {
            assert_eq!(index, 1);
            assert_eq!(source.kind(), ErrorKind::InvalidPath);
        }
        other => panic!("expected FlowRenderFailed, got {other:?}"),
    }
}

#[test]
fn raw_ping_pong() {
    let flow = Flow::new(
        4444,
        vec![
            Message::raw(Direction::Client, b"PING\n"),
            Message::raw(Direction::Server, b"PONG\n"),
        ],
    );
    let script = render_raw_flow(&flow).unwrap();
    let body: Vec<&str> = script.lines().skip(5).collect();
    assert_eq!(body, vec!["proc.write(b\"PING\\x0a\")", "proc.recvuntil(b\"PONG\\x0a\")"]);
}
