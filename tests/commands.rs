mod common;

use common::{bulk, bulks, int, ok, Client};
use ferrum_lite::{RespValue, Server};

#[tokio::test]
async fn test_list_round_trip() {
    let server = Server::run().await.unwrap();
    let mut c = Client::connect(&server).await;

    assert_eq!(c.cmd(&["LPUSH", "foo", "bar"]).await, int(1));
    assert_eq!(c.cmd(&["LPOP", "foo"]).await, bulk("bar"));
    assert_eq!(c.cmd(&["EXISTS", "foo"]).await, int(0));
}

#[tokio::test]
async fn test_set_members_sorted() {
    let server = Server::run().await.unwrap();
    let mut c = Client::connect(&server).await;

    assert_eq!(c.cmd(&["SADD", "s", "a", "b", "c"]).await, int(3));
    assert_eq!(c.cmd(&["SADD", "s", "a"]).await, int(0));
    assert_eq!(c.cmd(&["SMEMBERS", "s"]).await, bulks(&["a", "b", "c"]));
    assert_eq!(server.store().members("s").unwrap(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_multi_exec() {
    let server = Server::run().await.unwrap();
    let mut c = Client::connect(&server).await;

    assert_eq!(c.cmd(&["MULTI"]).await, ok());
    assert_eq!(
        c.cmd(&["LPUSH", "x", "1"]).await,
        RespValue::simple_string("QUEUED")
    );
    assert_eq!(c.cmd(&["EXEC"]).await, RespValue::array(vec![int(1)]));
    assert_eq!(c.cmd(&["LPUSH", "x", "1"]).await, int(2));
}

#[tokio::test]
async fn test_watch_conflict_across_connections() {
    let server = Server::run().await.unwrap();
    let mut c1 = Client::connect(&server).await;
    let mut c2 = Client::connect(&server).await;

    c1.cmd(&["RPUSH", "one", "two"]).await;
    assert_eq!(c1.cmd(&["WATCH", "one"]).await, ok());
    c1.cmd(&["MULTI"]).await;
    c1.cmd(&["LPOP", "one"]).await;

    assert_eq!(c2.cmd(&["RPUSH", "one", "three"]).await, int(2));

    assert_eq!(c1.cmd(&["EXEC"]).await, RespValue::array(vec![]));
    assert_eq!(c1.cmd(&["LPOP", "one"]).await, bulk("two"));
    assert_eq!(c1.cmd(&["LPOP", "one"]).await, bulk("three"));
}

#[tokio::test]
async fn test_keys_and_scan() {
    let server = Server::run().await.unwrap();
    for key in ["foo", "foobar", "barfoo", "fooooo"] {
        server.store().set_add(key, ["x"]).unwrap();
    }
    let mut c = Client::connect(&server).await;

    assert_eq!(
        c.cmd(&["KEYS", "foo*"]).await,
        bulks(&["foo", "foobar", "fooooo"])
    );
    assert_eq!(
        c.cmd(&["SCAN", "42"]).await,
        RespValue::array(vec![bulk("0"), bulks(&[])])
    );
}

#[tokio::test]
async fn test_auth_required() {
    let server = Server::run().await.unwrap();
    server.require_auth("nocomment");
    let mut c = Client::connect(&server).await;

    assert_eq!(
        c.cmd(&["PING"]).await,
        RespValue::error("NOAUTH Authentication required.")
    );
    assert_eq!(
        c.cmd(&["AUTH", "wrong"]).await,
        RespValue::error("ERR invalid password")
    );
    assert_eq!(c.cmd(&["AUTH", "nocomment"]).await, ok());
    assert_eq!(c.cmd(&["PING"]).await, RespValue::simple_string("PONG"));
}

#[tokio::test]
async fn test_select_is_per_connection() {
    let server = Server::run().await.unwrap();
    let mut c1 = Client::connect(&server).await;
    let mut c2 = Client::connect(&server).await;

    c1.cmd(&["SELECT", "2"]).await;
    c1.cmd(&["SADD", "k", "a"]).await;
    assert_eq!(c2.cmd(&["EXISTS", "k"]).await, int(0));
    assert!(server.store().db(2).exists("k"));
}

#[tokio::test]
async fn test_direct_api_visible_to_clients() {
    let server = Server::run().await.unwrap();
    server.store().push("queue", ["a", "b"]).unwrap();
    let mut c = Client::connect(&server).await;

    assert_eq!(c.cmd(&["LRANGE", "queue", "0", "-1"]).await, bulks(&["a", "b"]));
    c.cmd(&["RPUSH", "queue", "c"]).await;
    assert_eq!(server.store().list("queue").unwrap(), vec!["a", "b", "c"]);
    assert_eq!(
        server.store().dump(),
        "- queue\n   \"a\"\n   \"b\"\n   \"c\"\n"
    );
}

#[tokio::test]
async fn test_inline_commands() {
    let server = Server::run().await.unwrap();
    let addr = server.addr().unwrap();
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    stream.write_all(b"PING\r\n").await.unwrap();
    let mut reply = [0u8; 7];
    stream.read_exact(&mut reply).await.unwrap();
    assert_eq!(&reply, b"+PONG\r\n");
}
