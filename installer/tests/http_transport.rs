//! Integration tests for the `ureq` transport against local sockets.

use camino::Utf8PathBuf;
use contrast_go_installer::artefact::download::{ArtifactClient, HttpClient, USER_AGENT};
use contrast_go_installer::error::InstallError;
use contrast_go_installer::install_flow::{InstallRequest, Platform, install_with};
use contrast_go_installer::test_utils::sha256_hex;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

const BINARY: &[u8] = b"served over http";

/// A request line and its `User-Agent` header.
#[derive(Debug)]
struct Seen {
    request_line: String,
    user_agent: Option<String>,
}

fn read_request(stream: &TcpStream) -> io::Result<Seen> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut user_agent = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("user-agent")
        {
            user_agent = Some(value.trim().to_owned());
        }
    }
    Ok(Seen {
        request_line: request_line.trim_end().to_owned(),
        user_agent,
    })
}

/// Serve `connections` requests, one per connection, as a release server.
fn serve_release(listener: TcpListener, connections: usize) -> JoinHandle<Vec<Seen>> {
    thread::spawn(move || {
        let checksum = sha256_hex(BINARY);
        let mut seen = Vec::new();
        for stream in listener.incoming().take(connections) {
            let mut stream = stream.expect("accept");
            let request = read_request(&stream).expect("read request");
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nX-Checksum-Sha256: {checksum}\r\n\
                 Connection: close\r\n\r\n",
                BINARY.len()
            );
            stream.write_all(head.as_bytes()).expect("write head");
            if request.request_line.starts_with("GET ") {
                stream.write_all(BINARY).expect("write body");
            }
            stream.flush().expect("flush");
            seen.push(request);
        }
        seen
    })
}

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("local addr").port()
}

#[test]
fn refused_connection_is_network_error() {
    let base_url = format!("http://127.0.0.1:{}", closed_port());
    let dir = tempfile::tempdir().expect("temp dir");
    let destination =
        Utf8PathBuf::try_from(dir.path().join("contrast-go")).expect("UTF-8 path");
    let request = InstallRequest::new(base_url, "latest", Platform::new("linux", "amd64"), destination.clone());
    let lookup = |_: &str| -> io::Result<PathBuf> { Err(io::Error::from(io::ErrorKind::NotFound)) };

    let err = install_with(&request, &HttpClient, &lookup).expect_err("nothing is listening");

    assert!(matches!(err, InstallError::Network(_)), "unexpected error: {err:?}");
    assert!(
        err.to_string().contains("network communication issue"),
        "unexpected message: {err}"
    );
    assert!(!destination.exists());
}

#[test]
fn installs_from_http_server_with_user_agent() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    let server = serve_release(listener, 2);

    let dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 path");
    let destination = root.join("bin").join("contrast-go");
    let request = InstallRequest::new(
        base_url,
        "1.2.3",
        Platform::new("linux", "amd64"),
        destination.clone(),
    )
    .with_temp_dir(root.clone());
    let found = destination.clone().into_std_path_buf();
    let lookup = move |_: &str| -> io::Result<PathBuf> { Ok(found.clone()) };

    install_with(&request, &HttpClient, &lookup).expect("install succeeds");

    let seen = server.join().expect("server thread");
    assert_eq!(
        seen.iter().map(|s| s.request_line.as_str()).collect::<Vec<_>>(),
        [
            "HEAD /1.2.3/linux-amd64/contrast-go HTTP/1.1",
            "GET /1.2.3/linux-amd64/contrast-go HTTP/1.1",
        ]
    );
    assert!(
        seen.iter().all(|s| s.user_agent.as_deref() == Some(USER_AGENT)),
        "unexpected user agents: {seen:?}"
    );
    assert_eq!(std::fs::read(&destination).expect("read install"), BINARY);
}

#[test]
fn head_exposes_checksum_and_length() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!(
        "http://{}/1.2.3/linux-amd64/contrast-go",
        listener.local_addr().expect("local addr")
    );
    let server = serve_release(listener, 1);

    let response = HttpClient.head(&url).expect("head succeeds");

    assert!(response.is_ok());
    assert_eq!(response.checksum(), Some(sha256_hex(BINARY).as_str()));
    assert_eq!(response.content_length(), Some(BINARY.len() as u64));
    let mut body = Vec::new();
    response
        .into_body()
        .read_to_end(&mut body)
        .expect("read empty body");
    assert!(body.is_empty());
    server.join().expect("server thread");
}
