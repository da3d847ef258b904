mod common;

use common::{bulk, int, ok, Client};
use ferrum_lite::{RespValue, Server};
use std::time::Duration;

/// Wait for a counter the server updates from another task
async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn test_counters() {
    let server = Server::run().await.unwrap();
    assert_eq!(server.command_count(), 0);

    let mut c = Client::connect(&server).await;
    c.cmd(&["PING"]).await;
    assert_eq!(server.command_count(), 1);
    assert_eq!(server.current_connection_count(), 1);
    assert_eq!(server.total_connection_count(), 1);

    drop(c);
    eventually(|| server.current_connection_count() == 0).await;
    assert_eq!(server.total_connection_count(), 1);
}

#[tokio::test]
async fn test_quit_closes_connection() {
    let server = Server::run().await.unwrap();
    let mut c = Client::connect(&server).await;

    assert_eq!(c.cmd(&["QUIT"]).await, ok());
    assert_eq!(c.reply().await, None);
}

#[tokio::test]
async fn test_restart_keeps_data_and_address() {
    let mut server = Server::run().await.unwrap();
    let addr = server.addr();
    {
        let mut c = Client::connect(&server).await;
        c.cmd(&["RPUSH", "survivor", "yes"]).await;
    }

    server.restart().await.unwrap();
    assert_eq!(server.addr(), addr);

    let mut c = Client::connect(&server).await;
    assert_eq!(c.cmd(&["LPOP", "survivor"]).await, bulk("yes"));
}

#[tokio::test]
async fn test_close_drops_clients() {
    let mut server = Server::run().await.unwrap();
    let mut c = Client::connect(&server).await;
    c.cmd(&["PING"]).await;

    server.close().await;
    assert!(!server.is_running());

    assert_eq!(c.reply().await, None);
    eventually(|| server.current_connection_count() == 0).await;
}

#[tokio::test]
async fn test_unknown_command() {
    let server = Server::run().await.unwrap();
    let mut c = Client::connect(&server).await;
    assert_eq!(
        c.cmd(&["NOSUCH", "x"]).await,
        RespValue::error("ERR unknown command 'NOSUCH'")
    );
    assert_eq!(c.cmd(&["DEL", "x"]).await, int(0));
}
