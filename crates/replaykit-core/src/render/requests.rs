//! `requests`-based replay scripts (single request and whole flow).

use bytes::Bytes;

use crate::error::Result;
use crate::flow::Flow;
use crate::http::DecodedRequest;

use super::pyrepr::PyLiteral;
use super::script::{ScriptWriter, TargetHost};

/// Behavioural switches for the HTTP renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Structurally decode bodies according to their content type.
    pub tokenize: bool,
    /// Share one `requests.Session` instead of passing headers per call.
    pub use_session: bool,
}

impl RequestOptions {
    /// Defaults for a single edited request.
    pub fn single() -> Self {
        Self {
            tokenize: true,
            use_session: false,
        }
    }

    /// Defaults for a whole flow.
    pub fn flow() -> Self {
        Self {
            tokenize: true,
            use_session: true,
        }
    }
}

/// Render one raw client request as a standalone script.
pub fn render_single_request(raw: &[u8], flow: &Flow, opts: RequestOptions) -> Result<String> {
    let port = flow.port()?;
    let req = DecodedRequest::from_bytes(Bytes::copy_from_slice(raw), opts.tokenize)?;

    let mut w = ScriptWriter::new();
    w.line("import os").line("import requests").blank();
    w.line(TargetHost::Env.statement()).blank();
    if opts.use_session {
        w.line("s = requests.Session()");
    }
    write_headers(&mut w, &req, opts.use_session);
    write_data(&mut w, &req);
    w.blank();
    write_call(&mut w, &req, port, opts.use_session);
    Ok(w.finish())
}

/// Render every client message of `flow`, in capture order, as one script.
///
/// Server messages are skipped. The first message that fails aborts the
/// render with `FlowRenderFailed` carrying its position.
pub fn render_flow_requests(flow: &Flow, opts: RequestOptions) -> Result<String> {
    let port = flow.port()?;
    let requests = flow
        .client_messages()
        .map(|(index, msg)| {
            DecodedRequest::from_message(msg, opts.tokenize).map_err(|e| e.at_message(index))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut w = ScriptWriter::new();
    w.line("import os").line("import requests").line("import sys").blank();
    w.line(TargetHost::EnvOrArg.statement()).blank();
    if opts.use_session {
        w.line("s = requests.Session()");
    }
    for req in &requests {
        w.blank();
        write_headers(&mut w, req, opts.use_session);
        write_data(&mut w, req);
        write_call(&mut w, req, port, opts.use_session);
    }
    Ok(w.finish())
}

fn write_headers(w: &mut ScriptWriter, req: &DecodedRequest, use_session: bool) {
    let target = if use_session { "s.headers" } else { "headers" };
    w.line(format!("{target} = {}", req.headers.to_py()));
}

fn write_data(w: &mut ScriptWriter, req: &DecodedRequest) {
    w.line(format!("data = {}", req.body.to_py()));
}

fn write_call(w: &mut ScriptWriter, req: &DecodedRequest, port: u16, use_session: bool) {
    let client = if use_session { "s" } else { "requests" };
    let headers_arg = if use_session { "" } else { ", headers=headers" };
    w.line(format!(
        "{client}.{method}(f\"http://{{host}}:{port}\" + {path}, {param}=data{headers_arg})",
        method = req.method.as_str(),
        path = req.path.to_py(),
        param = req.param.as_str(),
    ));
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;
    use crate::error::ErrorKind;
    use crate::flow::Message;

    fn flow() -> Flow {
        Flow::new(8080, Vec::new())
    }

    #[test]
    fn single_request_without_session() {
        let script = render_single_request(
            b"GET /ping HTTP/1.1\r\nHost: x\r\nUser-Agent: t\r\n\r\n",
            &flow(),
            RequestOptions::single(),
        )
        .unwrap();
        assert_eq!(
            script,
            "import os\nimport requests\n\nhost = os.getenv(\"TARGET_IP\")\n\n\
             headers = {'User-Agent': 't'}\ndata = b''\n\n\
             requests.get(f\"http://{host}:8080\" + '/ping', data=data, headers=headers)\n"
        );
    }

    #[test]
    fn single_request_with_session() {
        let opts = RequestOptions {
            tokenize: true,
            use_session: true,
        };
        let script = render_single_request(
            b"POST /api HTTP/1.1\r\nContent-Type: application/json\r\n\r\n{\"a\":1}",
            &flow(),
            opts,
        )
        .unwrap();
        assert!(script.contains(
            "s = requests.Session()\ns.headers = {'Content-Type': 'application/json'}\n"
        ));
        assert!(script.contains("data = {'a': 1}\n"));
        assert!(script.ends_with("s.post(f\"http://{host}:8080\" + '/api', json=data)\n"));
        assert_eq!(script.matches(".post(").count(), 1);
    }

    #[test]
    fn single_request_reports_decode_failures() {
        let opts = RequestOptions::single();
        let err = render_single_request(b"GET ping HTTP/1.1\r\n\r\n", &flow(), opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);

        let err = render_single_request(b"GET /", &flow(), opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRequest);

        let no_port = Flow {
            dst_port: None,
            messages: Vec::new(),
        };
        let err = render_single_request(b"GET / HTTP/1.1\r\n\r\n", &no_port, opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedFlow);
    }

    #[test]
    fn non_ascii_text_body_keeps_captured_bytes() {
        let raw = "POST /x HTTP/1.1\r\nContent-Type: text/plain\r\n\r\ncaf\u{e9} \u{20ac}";
        let script =
            render_single_request(raw.as_bytes(), &flow(), RequestOptions::single()).unwrap();
        assert!(script.contains("data = b'caf\\xc3\\xa9 \\xe2\\x82\\xac'\n"));
        assert!(script
            .contains("requests.post(f\"http://{host}:8080\" + '/x', data=data, headers=headers)"));
    }

    #[test]
    fn flow_skips_server_messages_and_keeps_order() {
        let flow = Flow::new(
            80,
            vec![
                Message::client_text("GET /a HTTP/1.1\r\nHost: h\r\n\r\n"),
                Message::server_text("this is not HTTP at all"),
                Message::client_text("POST /b HTTP/1.1\r\nContent-Type: text/plain\r\n\r\nhi"),
            ],
        );
        let script = render_flow_requests(&flow, RequestOptions::flow()).unwrap();
        let a = script.find("s.get(f\"http://{host}:80\" + '/a', data=data)").unwrap();
        let b = script.find("s.post(f\"http://{host}:80\" + '/b', data=data)").unwrap();
        assert!(a < b);
        assert_eq!(script.matches("s.get(").count() + script.matches("s.post(").count(), 2);
        assert_eq!(script.matches("requests.Session()").count(), 1);
        assert!(script.contains("data = b'hi'\n"));
        assert!(script.contains("host = os.getenv(\"TARGET_IP\", sys.argv[1])"));
    }

    #[test]
    fn flow_failure_names_the_message() {
        let flow = Flow::new(
            80,
            vec![
                Message::client_text("GET /a HTTP/1.1\r\n\r\n"),
                Message::server_text("ok"),
                Message::client_text("BREW /pot HTTP/1.1\r\n\r\n"),
            ],
        );
        let err = render_flow_requests(&flow, RequestOptions::flow()).unwrap_err();
        match err {
            crate::error::ReplayError::FlowRenderFailed { index, ref source } => {
                assert_eq!(index, 2);
                assert_eq!(source.kind(), ErrorKind::InvalidMethod);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let flow = Flow::new(
            5000,
            vec![Message::client_text(
                "POST /login HTTP/1.1\r\n\
                 Content-Type: application/x-www-form-urlencoded\r\n\r\nu=a&p=b",
            )],
        );
        let first = render_flow_requests(&flow, RequestOptions::flow()).unwrap();
        let second = render_flow_requests(&flow, RequestOptions::flow()).unwrap();
        assert_eq!(first, second);
    }
}
