//! End-to-end scenarios over a real TCP connection

use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tandb::{Config, LineCodec, Response, Server};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;

const SWEEP_INTERVAL: Duration = Duration::from_millis(200);

struct TestServer {
    client: Framed<TcpStream, LineCodec>,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = Server::new(Config::default().with_sweep_interval(SWEEP_INTERVAL));
        let task = tokio::spawn(server.serve(listener, async {
            let _ = shutdown_rx.await;
        }));

        let stream = TcpStream::connect(addr).await.unwrap();
        Self {
            client: Framed::new(stream, LineCodec::default()),
            shutdown_tx,
            task,
        }
    }

    /// Send one request and collect every line of its response
    async fn call(&mut self, line: &str) -> Vec<String> {
        self.client.send(line.to_string()).await.unwrap();
        let first = self.client.next().await.unwrap().unwrap();
        let mut lines = vec![first.clone()];
        for _ in 0..Response::array_len(&first).unwrap_or(0) {
            lines.push(self.client.next().await.unwrap().unwrap());
        }
        lines
    }

    async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        self.task.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_set_then_get() {
    let mut server = TestServer::start().await;

    assert_eq!(server.call("SET foo bar").await, vec!["OK"]);
    assert_eq!(server.call("GET foo").await, vec!["\"bar\""]);
    assert_eq!(
        server.call("SET foo other").await,
        vec!["[ERROR] the key foo already exists"]
    );
    assert_eq!(server.call("GET foo").await, vec!["\"bar\""]);

    server.stop().await;
}

#[tokio::test]
async fn test_setex_expires_after_sweep() {
    let mut server = TestServer::start().await;

    assert_eq!(server.call("SETEX k v 1").await, vec!["OK"]);
    assert_eq!(server.call("GET k").await, vec!["\"v\""]);

    tokio::time::sleep(Duration::from_secs(1) + SWEEP_INTERVAL * 3).await;

    assert_eq!(
        server.call("GET k").await,
        vec!["[ERROR] the key k does not exist"]
    );
    assert_eq!(server.call("EXISTS k").await, vec!["FALSE"]);

    server.stop().await;
}

#[tokio::test]
async fn test_persist_keeps_key() {
    let mut server = TestServer::start().await;

    server.call("SETEX k v 1").await;
    assert_eq!(server.call("PERSIST k").await, vec!["OK"]);
    assert_eq!(server.call("TTL k").await, vec!["-1"]);

    tokio::time::sleep(Duration::from_secs(1) + SWEEP_INTERVAL * 3).await;
    assert_eq!(server.call("GET k").await, vec!["\"v\""]);

    server.stop().await;
}

#[tokio::test]
async fn test_set_cardinality_and_membership() {
    let mut server = TestServer::start().await;

    assert_eq!(server.call("SADD s a").await, vec!["1"]);
    assert_eq!(server.call("SADD s b").await, vec!["1"]);
    assert_eq!(server.call("SCARD s").await, vec!["2"]);
    assert_eq!(server.call("SISMEMBER s a").await, vec!["TRUE"]);
    assert_eq!(server.call("SISMEMBER s c").await, vec!["FALSE"]);

    server.stop().await;
}

#[tokio::test]
async fn test_sorted_members() {
    let mut server = TestServer::start().await;

    server.call("ZADD z b").await;
    server.call("ZADD z a").await;
    assert_eq!(server.call("ZMEMBERS z").await, vec!["*2", "1) \"a\"", "2) \"b\""]);
    assert_eq!(server.call("ZCARD z").await, vec!["2"]);

    server.stop().await;
}

#[tokio::test]
async fn test_sdiff_and_sdiffstore() {
    let mut server = TestServer::start().await;

    server.call("SADD x a").await;
    server.call("SADD x b").await;
    server.call("SADD y b").await;

    assert_eq!(server.call("SDIFF x y").await, vec!["*1", "1) \"a\""]);
    assert_eq!(server.call("SDIFFSTORE x y z").await, vec!["OK"]);
    assert_eq!(server.call("SMEMBERS z").await, vec!["*1", "1) \"a\""]);
    assert_eq!(
        server.call("SDIFF x nope").await,
        vec!["[ERROR] the set nope does not exist"]
    );

    server.stop().await;
}

#[tokio::test]
async fn test_expire_missing_key_creates_nothing() {
    let mut server = TestServer::start().await;

    assert_eq!(
        server.call("EXPIRE ghost 10").await,
        vec!["[ERROR] the key ghost does not exist"]
    );
    assert_eq!(server.call("EXISTS ghost").await, vec!["FALSE"]);
    assert_eq!(server.call("KEYS").await, vec!["*0"]);

    server.stop().await;
}

#[tokio::test]
async fn test_protocol_errors_keep_connection_open() {
    let mut server = TestServer::start().await;

    assert_eq!(
        server.call("NOPE").await,
        vec!["[ERROR] invalid command NOPE"]
    );
    assert_eq!(
        server.call("GET").await,
        vec!["[ERROR] wrong number of arguments for GET"]
    );
    assert_eq!(server.call("ping").await, vec!["PONG"]);
    assert_eq!(
        server.call("MGET a b").await,
        vec!["*2", "1) (nil)", "2) (nil)"]
    );

    server.stop().await;
}

#[tokio::test]
async fn test_values_that_look_like_replies_stay_scalar() {
    let mut server = TestServer::start().await;

    server.call("SET star *3").await;
    server.call("SET err [ERROR]").await;

    assert_eq!(server.call("GET star").await, vec!["\"*3\""]);
    assert_eq!(server.call("GET err").await, vec!["\"[ERROR]\""]);
    // the connection is still in step after both replies
    assert_eq!(server.call("PING").await, vec!["PONG"]);

    server.stop().await;
}
