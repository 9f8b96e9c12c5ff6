//! HTTP delegate for a remote arithmetic service
//!
//! Operations are POSTed as JSON to `{base}/api/matrix/{operation}`. Only
//! available when the "http" feature is enabled.

#[cfg(feature = "http")]
pub mod http_impl {
    use std::future::Future;
    use std::time::Duration;

    use log::debug;
    use reqwest::Client;

    use crate::delegate::{ArithmeticDelegate, DelegateReply, DelegateRequest};
    use crate::wire;
    use mxtrace_core::{MxError, Operation, Result};

    /// Client for the remote arithmetic service
    #[derive(Debug, Clone)]
    pub struct HttpDelegate {
        client: Client,
        base_url: String,
        timeout: Duration,
    }

    impl HttpDelegate {
        /// Create a delegate for the service rooted at `base_url`
        pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
            let client = Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| MxError::BackendUnavailable(e.to_string()))?;

            Ok(Self {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                timeout,
            })
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        pub fn timeout(&self) -> Duration {
            self.timeout
        }

        /// Endpoint serving `op`
        pub fn endpoint(&self, op: Operation) -> String {
            format!("{}/api/matrix/{}", self.base_url, op.name())
        }

        async fn post(&self, request: &DelegateRequest<'_>) -> Result<DelegateReply> {
            let url = self.endpoint(request.operation);
            debug!("POST {url}");

            let response = self
                .client
                .post(&url)
                .json(&wire::encode_request(request))
                .send()
                .await
                .map_err(|e| self.unavailable(e))?;

            // error replies arrive with a 4xx status but still carry a body
            let status = response.status();
            let body = response.text().await.map_err(|e| self.unavailable(e))?;
            debug!("{url} answered {status} with {} bytes", body.len());

            match wire::decode_reply(&body) {
                Err(MxError::MalformedResponse(reason)) if !status.is_success() => {
                    Err(MxError::BackendRejected(format!("HTTP {status}: {reason}")))
                }
                decoded => decoded,
            }
        }

        fn unavailable(&self, error: reqwest::Error) -> MxError {
            if error.is_timeout() {
                MxError::BackendUnavailable(format!("no answer within {:?}", self.timeout))
            } else {
                MxError::BackendUnavailable(error.to_string())
            }
        }
    }

    impl ArithmeticDelegate for HttpDelegate {
        fn name(&self) -> &str {
            &self.base_url
        }

        fn compute(
            &self,
            request: &DelegateRequest<'_>,
        ) -> impl Future<Output = Result<DelegateReply>> + Send {
            self.post(request)
        }
    }
}

#[cfg(feature = "http")]
pub use http_impl::*;

#[cfg(not(feature = "http"))]
pub mod http_stub {
    use std::future::{self, Future};
    use std::time::Duration;

    use crate::delegate::{ArithmeticDelegate, DelegateReply, DelegateRequest};
    use mxtrace_core::{MxError, Result};

    const DISABLED: &str = "HTTP support not enabled. Build with --features http";

    #[derive(Debug, Clone)]
    pub struct HttpDelegate;

    impl HttpDelegate {
        pub fn new(_base_url: &str, _timeout: Duration) -> Result<Self> {
            Err(MxError::BackendUnavailable(DISABLED.to_string()))
        }
    }

    impl ArithmeticDelegate for HttpDelegate {
        fn name(&self) -> &str {
            "http (disabled)"
        }

        fn compute(
            &self,
            _request: &DelegateRequest<'_>,
        ) -> impl Future<Output = Result<DelegateReply>> + Send {
            future::ready(Err(MxError::BackendUnavailable(DISABLED.to_string())))
        }
    }
}

#[cfg(not(feature = "http"))]
pub use http_stub::*;

#[cfg(all(test, feature = "http"))]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::delegate::{ArithmeticDelegate, DelegateRequest};
    use mxtrace_core::{Matrix, MxError, Operation};

    /// Serve one connection with a canned response and hand back the request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (format!("http://{addr}"), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(split) = text.find("\r\n\r\n") {
                let length = text[..split]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if buf.len() >= split + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_posts_operands_and_decodes_result() {
        let (base, server) = serve_once("200 OK", r#"{"result": [[6, 8], [10, 12]]}"#).await;
        let delegate = HttpDelegate::new(&base, Duration::from_secs(5)).unwrap();

        let a = Matrix::from([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::from([[5.0, 6.0], [7.0, 8.0]]);
        let reply = delegate
            .compute(&DelegateRequest::new(Operation::Add, &a, Some(&b)))
            .await
            .unwrap();
        assert_eq!(reply, Ok(Matrix::from([[6.0, 8.0], [10.0, 12.0]])));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/matrix/add HTTP/1.1"));
        assert!(request.contains(r#""A":[[1.0,2.0],[3.0,4.0]]"#));
        assert!(request.contains(r#""B":[[5.0,6.0],[7.0,8.0]]"#));
    }

    #[tokio::test]
    async fn test_error_body_with_bad_status() {
        let (base, server) = serve_once(
            "400 Bad Request",
            r#"{"error": "multiply requires A.cols == B.rows"}"#,
        )
        .await;
        let delegate = HttpDelegate::new(&base, Duration::from_secs(5)).unwrap();

        let a = Matrix::zeros(1, 1);
        let reply = delegate
            .compute(&DelegateRequest::new(Operation::Multiply, &a, Some(&a)))
            .await
            .unwrap();
        assert_eq!(reply, Err("multiply requires A.cols == B.rows".to_string()));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_error_page_is_rejected() {
        let (base, server) = serve_once("500 Internal Server Error", "oops").await;
        let delegate = HttpDelegate::new(&base, Duration::from_secs(5)).unwrap();

        let a = Matrix::zeros(1, 1);
        let err = delegate
            .compute(&DelegateRequest::new(Operation::ReduceToRref, &a, None))
            .await
            .unwrap_err();
        assert!(matches!(err, MxError::BackendRejected(_)));
        assert!(server.await.unwrap().starts_with("POST /api/matrix/rref"));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // bind then drop to get a port with nothing listening
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let delegate =
            HttpDelegate::new(&format!("http://127.0.0.1:{port}/"), Duration::from_secs(2)).unwrap();
        assert_eq!(delegate.endpoint(Operation::Subtract), format!("http://127.0.0.1:{port}/api/matrix/subtract"));

        let a = Matrix::zeros(1, 1);
        let err = delegate
            .compute(&DelegateRequest::new(Operation::Add, &a, Some(&a)))
            .await
            .unwrap_err();
        assert!(matches!(err, MxError::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn test_stalled_backend_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let delegate = HttpDelegate::new(&format!("http://{addr}"), Duration::from_millis(200)).unwrap();
        let a = Matrix::zeros(1, 1);
        let err = delegate
            .compute(&DelegateRequest::new(Operation::Add, &a, Some(&a)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            MxError::BackendUnavailable("no answer within 200ms".to_string())
        );
        server.abort();
    }
}
