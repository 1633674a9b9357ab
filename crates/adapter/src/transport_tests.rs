use tokio::net::TcpListener;

use super::*;

async fn serve_one_session(listener: TcpListener, password: &'static str) {
    let (mut stream, _) = listener.accept().await.expect("accept");
    let (id, kind, body) = read_packet(&mut stream).await.expect("read auth");
    assert_eq!(kind, RCON_TYPE_AUTH);
    if body == password {
        write_packet(&mut stream, id, RCON_TYPE_AUTH_RESPONSE, "").await.expect("auth ok");
    } else {
        write_packet(&mut stream, -1, RCON_TYPE_AUTH_RESPONSE, "").await.expect("auth reject");
        return;
    }

    loop {
        let Ok((id, kind, body)) = read_packet(&mut stream).await else { return };
        assert_eq!(kind, RCON_TYPE_EXEC_COMMAND);
        let reply = format!("ok: {body}");
        if write_packet(&mut stream, id, RCON_TYPE_RESPONSE, &reply).await.is_err() {
            return;
        }
    }
}

#[tokio::test]
async fn authenticates_then_round_trips_a_command() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();
    tokio::spawn(serve_one_session(listener, "secret"));

    let connector = RconConnector::new(addr, "secret");
    let mut transport = connector.connect().await.expect("connect");
    let reply = transport.send("summon villager").await.expect("send");
    assert_eq!(reply, "ok: summon villager");
    transport.close().await;
}

#[tokio::test]
async fn rejected_password_fails_connect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();
    tokio::spawn(serve_one_session(listener, "secret"));

    let connector = RconConnector::new(addr, "wrong");
    let err = connector.connect().await.unwrap_err();
    assert!(err.contains("rejected"));
}
