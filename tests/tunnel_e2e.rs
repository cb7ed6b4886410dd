mod e2e_utils;

use e2e_utils::{closed_port, read_head, TcpDestination, TestProxyServer};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

async fn send_connect(proxy: &TestProxyServer, target: &str) -> TcpStream {
    let mut stream = TcpStream::connect(proxy.addr())
        .await
        .expect("Should be able to connect to the proxy");

    let request = format!("CONNECT {target} HTTP/1.1\r\nHost: {target}\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("Should be able to write CONNECT request");
    stream
}

#[tokio::test]
async fn test_connect_relays_bytes_both_ways() {
    let proxy = TestProxyServer::start().await.expect("Failed to start proxy");
    let destination = TcpDestination::start().await;

    let mut client = send_connect(&proxy, &destination.addr().to_string()).await;
    let mut upstream = timeout(Duration::from_secs(5), destination.accept())
        .await
        .expect("Proxy should dial the destination");

    let head = timeout(Duration::from_secs(5), read_head(&mut client))
        .await
        .expect("Should receive tunnel acknowledgment");
    assert!(head.starts_with("HTTP/1.1 200"), "Expected 200, got: {}", head);
    assert!(!head.to_ascii_lowercase().contains("content-length"), "Unexpected framing: {}", head);

    let request = b"seventeen bytes!!";
    assert_eq!(request.len(), 17);
    client.write_all(request).await.unwrap();

    let mut received = [0u8; 17];
    upstream.read_exact(&mut received).await.unwrap();
    assert_eq!(&received, request);

    let reply = b"nine byte";
    assert_eq!(reply.len(), 9);
    upstream.write_all(reply).await.unwrap();

    let mut received = [0u8; 9];
    client.read_exact(&mut received).await.unwrap();
    assert_eq!(&received, reply);
}

#[tokio::test]
async fn test_acknowledgment_precedes_destination_bytes() {
    let proxy = TestProxyServer::start().await.expect("Failed to start proxy");
    let destination = TcpDestination::start().await;

    let mut client = send_connect(&proxy, &destination.addr().to_string()).await;

    // The destination speaks first, as soon as it is dialed.
    let mut upstream = destination.accept().await;
    upstream.write_all(b"SSH-2.0-banner\r\n").await.unwrap();

    let head = timeout(Duration::from_secs(5), read_head(&mut client))
        .await
        .expect("Should receive tunnel acknowledgment");
    assert!(head.starts_with("HTTP/1.1 200"), "Expected 200 first, got: {}", head);
    assert!(!head.contains("SSH-2.0"));

    let mut banner = [0u8; 16];
    client.read_exact(&mut banner).await.unwrap();
    assert_eq!(&banner, b"SSH-2.0-banner\r\n");
}

#[tokio::test]
async fn test_client_close_reaches_destination() {
    let proxy = TestProxyServer::start().await.expect("Failed to start proxy");
    let destination = TcpDestination::start().await;

    let mut client = send_connect(&proxy, &destination.addr().to_string()).await;
    let mut upstream = destination.accept().await;
    read_head(&mut client).await;

    client.write_all(b"last words").await.unwrap();
    client.shutdown().await.unwrap();

    let mut received = Vec::new();
    timeout(Duration::from_secs(5), upstream.read_to_end(&mut received))
        .await
        .expect("Destination should observe end-of-stream")
        .unwrap();
    assert_eq!(received, b"last words");

    let mut rest = Vec::new();
    let n = timeout(Duration::from_secs(5), client.read_to_end(&mut rest))
        .await
        .expect("Client should observe end-of-stream");
    assert!(n.is_err() || rest.is_empty());
}

#[tokio::test]
async fn test_client_end_of_stream_closes_both_connections() {
    let proxy = TestProxyServer::start().await.expect("Failed to start proxy");
    let destination = TcpDestination::start().await;

    let mut client = send_connect(&proxy, &destination.addr().to_string()).await;
    let mut upstream = destination.accept().await;
    read_head(&mut client).await;

    client.shutdown().await.unwrap();

    // The destination keeps its socket open and still has something to say.
    let destination_task = tokio::spawn(async move {
        let mut received = Vec::new();
        let _ = upstream.read_to_end(&mut received).await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = upstream.write_all(b"late").await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        received
    });

    let mut rest = Vec::new();
    let read = timeout(Duration::from_secs(5), client.read_to_end(&mut rest))
        .await
        .expect("Client should observe end-of-stream without waiting for the destination");
    assert!(read.is_err() || rest.is_empty(), "Tunnel kept relaying: {:?}", rest);

    let received = destination_task.await.unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_connect_to_closed_port_answers_service_unavailable() {
    let proxy = TestProxyServer::start().await.expect("Failed to start proxy");
    let port = closed_port().await;

    let mut client = send_connect(&proxy, &format!("127.0.0.1:{}", port)).await;

    let head = timeout(Duration::from_secs(5), read_head(&mut client))
        .await
        .expect("Should receive an answer");
    assert!(head.starts_with("HTTP/1.1 503"), "Expected 503, got: {}", head);

    let length: usize = head
        .lines()
        .find_map(|line| line.strip_prefix("Content-Length: "))
        .expect("Error reply should be framed")
        .trim()
        .parse()
        .unwrap();
    assert!(length > 1);

    let mut body = vec![0u8; length];
    client.read_exact(&mut body).await.unwrap();
    let body = String::from_utf8(body).unwrap();
    assert!(body.contains(&format!("127.0.0.1:{}", port)), "Unexpected body: {}", body);
}
