use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;

use super::{CallError, Transport};

/// Line-framed call client over a Unix domain socket. Each call writes one
/// JSON request line and waits for one status line back (`ok` or
/// `err <detail>`). The stream is connected lazily and dropped on any
/// connection-level failure so the next call reconnects.
pub struct UnixSocketTransport {
    path: PathBuf,
    timeout: Duration,
    stream: Option<BufReader<UnixStream>>,
}

impl UnixSocketTransport {
    pub fn new(path: PathBuf, timeout: Duration) -> Self {
        Self {
            path,
            timeout,
            stream: None,
        }
    }

    fn connect(&self) -> Result<BufReader<UnixStream>, CallError> {
        let stream = UnixStream::connect(&self.path).map_err(classify_io_error)?;
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(classify_io_error)?;
        stream
            .set_write_timeout(Some(self.timeout))
            .map_err(classify_io_error)?;
        Ok(BufReader::new(stream))
    }

    fn exchange(&mut self, request: &str) -> Result<String, CallError> {
        if self.stream.is_none() {
            self.stream = Some(self.connect()?);
        }
        let Some(reader) = self.stream.as_mut() else {
            return Err(CallError::Other("transport stream unavailable".to_string()));
        };

        reader
            .get_mut()
            .write_all(request.as_bytes())
            .map_err(classify_io_error)?;

        let mut response = String::new();
        let read = reader.read_line(&mut response).map_err(classify_io_error)?;
        if read == 0 {
            return Err(CallError::Connection("peer closed the channel".to_string()));
        }
        Ok(response)
    }
}

impl Transport for UnixSocketTransport {
    fn call(&mut self, method: &str, payload: &str) -> Result<(), CallError> {
        validate_method(method)?;
        validate_payload(payload)?;

        let request = format!("{}\n", json!({ "method": method, "payload": payload }));

        let response = self.exchange(&request).map_err(|e| {
            // A dead or desynced stream must not poison later calls.
            if matches!(e, CallError::Connection(_) | CallError::Timeout(_)) {
                self.stream = None;
            }
            e
        })?;

        match response.trim_end() {
            "ok" => Ok(()),
            other => Err(CallError::Other(format!(
                "peer rejected call: {}",
                other
            ))),
        }
    }
}

/// A method name the router can dispatch: non-empty, ASCII identifier
/// characters only. Anything else is a caller bug.
fn validate_method(method: &str) -> Result<(), CallError> {
    if method.is_empty() {
        return Err(CallError::InvalidArgument("empty method name".to_string()));
    }
    if !method
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(CallError::InvalidArgument(format!(
            "method name is not an identifier: {:?}",
            method
        )));
    }
    Ok(())
}

fn validate_payload(payload: &str) -> Result<(), CallError> {
    serde_json::from_str::<serde_json::Value>(payload).map_err(|e| {
        CallError::InvalidArgument(format!("payload is not valid JSON: {}", e))
    })?;
    Ok(())
}

fn classify_io_error(error: std::io::Error) -> CallError {
    match error.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => CallError::Timeout(error.to_string()),
        ErrorKind::ConnectionRefused
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::NotFound
        | ErrorKind::UnexpectedEof => CallError::Connection(error.to_string()),
        _ => CallError::Other(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::os::unix::net::UnixListener;

    #[test]
    fn test_rejects_bad_method_before_connecting() {
        let mut transport = UnixSocketTransport::new(
            PathBuf::from("/nonexistent/socket"),
            Duration::from_millis(100),
        );
        let err = transport.call("no spaces allowed", "{}").unwrap_err();
        assert!(matches!(err, CallError::InvalidArgument(_)));

        let err = transport.call("", "{}").unwrap_err();
        assert!(matches!(err, CallError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_non_json_payload() {
        let mut transport = UnixSocketTransport::new(
            PathBuf::from("/nonexistent/socket"),
            Duration::from_millis(100),
        );
        let err = transport.call("receive_system_stats", "not json").unwrap_err();
        assert!(matches!(err, CallError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_socket_is_connection_error() {
        let mut transport = UnixSocketTransport::new(
            PathBuf::from("/nonexistent/socket"),
            Duration::from_millis(100),
        );
        let err = transport.call("receive_system_stats", "{}").unwrap_err();
        assert!(matches!(err, CallError::Connection(_)));
    }

    #[test]
    fn test_call_round_trip() {
        let dir = std::env::temp_dir().join(format!("sysbridge-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("router.sock");
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path).unwrap();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let mut request = Vec::new();
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                if request.ends_with(b"\n") || n == 0 {
                    break;
                }
            }
            stream.write_all(b"ok\n").unwrap();
            String::from_utf8(request).unwrap()
        });

        let mut transport = UnixSocketTransport::new(path.clone(), Duration::from_secs(5));
        transport
            .call("receive_system_stats", r#"{"cpu":1.0}"#)
            .unwrap();

        let request = server.join().unwrap();
        let value: serde_json::Value = serde_json::from_str(request.trim_end()).unwrap();
        assert_eq!(value["method"], "receive_system_stats");
        assert_eq!(value["payload"], r#"{"cpu":1.0}"#);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_peer_rejection_is_other() {
        let dir = std::env::temp_dir().join(format!("sysbridge-rej-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("router.sock");
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path).unwrap();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).unwrap();
            stream.write_all(b"err unknown method\n").unwrap();
        });

        let mut transport = UnixSocketTransport::new(path.clone(), Duration::from_secs(5));
        let err = transport
            .call("receive_system_stats", "{}")
            .unwrap_err();
        assert!(matches!(err, CallError::Other(_)));

        server.join().unwrap();
        let _ = std::fs::remove_file(&path);
    }
}
