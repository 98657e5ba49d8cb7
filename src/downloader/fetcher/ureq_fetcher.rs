use std::io::Read;
use std::time::Duration;

use ureq::{Agent, AgentBuilder};

use super::{FileDownloader, Response};

/// Sent with every request, page and image alike.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct UReqFetcher {
    agent: Agent,
}

impl FileDownloader for UReqFetcher {
    fn fetch(&self, url: &str) -> Response {
        let response = self.agent.get(url).call();

        match response {
            Ok(response) => {
                let mut body = Vec::new();

                if let Err(e) = response.into_reader().read_to_end(&mut body) {
                    return Response::invalid_body(e.to_string());
                }

                Response::ok(body)
            }

            Err(ureq::Error::Status(status, _)) => Response::status(status),

            Err(e) => Response::network_error(e.to_string()),
        }
    }
}

impl UReqFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();

        UReqFetcher { agent }
    }
}

impl Default for UReqFetcher {
    fn default() -> Self {
        Self::new(crate::config::ScraperConfig::default().timeout())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    use super::{UReqFetcher, USER_AGENT};
    use crate::downloader::FileDownloader;
    use crate::error::FetchError;

    /// Answers a single request with `reply` and hands back what was received.
    fn serve_once(reply: &'static str) -> (SocketAddr, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();

            let mut request = Vec::new();
            let mut buffer = [0u8; 1024];

            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = stream.read(&mut buffer).unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }

            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();

            String::from_utf8_lossy(&request).into_owned()
        });

        (address, handle)
    }

    #[test]
    fn test_status_is_preserved_and_user_agent_sent() {
        let (address, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );

        let url = format!("http://{}/missing.png", address);

        let fetcher = UReqFetcher::new(Duration::from_secs(5));

        let error = fetcher.fetch_image(&url).unwrap_err();

        assert_eq!(error, FetchError::Status { url, status: 404 });

        let request = server.join().unwrap().to_lowercase();

        assert!(request.starts_with("get /missing.png"));
        assert!(request.contains(&format!("user-agent: {}", USER_AGENT.to_lowercase())));
        assert!(request.contains("chrome/91"));
    }

    #[test]
    fn test_body_is_returned() {
        let (address, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 4\r\nConnection: close\r\n\r\nPNG!",
        );

        let fetcher = UReqFetcher::new(Duration::from_secs(5));

        let body = fetcher
            .fetch_page(&format!("http://{}/index.html", address))
            .unwrap();

        assert_eq!(body, b"PNG!".to_vec());

        server.join().unwrap();
    }

    #[test]
    fn test_timeout_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        // Accept and never answer.
        thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(3));
        });

        let fetcher = UReqFetcher::new(Duration::from_millis(200));

        let error = fetcher
            .fetch_image(&format!("http://{}/slow.png", address))
            .unwrap_err();

        assert!(matches!(error, FetchError::Network { .. }));
    }
}
