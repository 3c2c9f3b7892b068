use crate::api::Fetcher;
use crate::error::AppError;
use serde_json::Value;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::http(err.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_json(&self, url: &str) -> Result<Value, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| AppError::http(format!("GET {url}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http(format!("GET {url}: status {status}")));
        }

        response
            .json::<Value>()
            .map_err(|err| AppError::http(format!("GET {url}: invalid JSON body: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::HttpFetcher;
    use crate::api::Fetcher;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/users")
    }

    #[test]
    fn fetches_json_body() {
        let url = serve_once("HTTP/1.1 200 OK", r#"[{"id":1}]"#);
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let value = fetcher.fetch_json(&url).unwrap();
        assert_eq!(value[0]["id"], 1);
    }

    #[test]
    fn non_success_status_is_http_error() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch_json(&url).unwrap_err();
        assert_eq!(err.code(), "http_error");
        assert!(err.message().contains("500"));
    }

    #[test]
    fn invalid_body_is_http_error() {
        let url = serve_once("HTTP/1.1 200 OK", "<html>not json</html>");
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch_json(&url).unwrap_err();
        assert_eq!(err.code(), "http_error");
    }

    #[test]
    fn unreachable_host_is_http_error() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch_json(&format!("http://{addr}/users")).unwrap_err();
        assert_eq!(err.code(), "http_error");
    }
}
