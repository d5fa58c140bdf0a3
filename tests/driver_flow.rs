//! The driver over in-memory transports.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{test_config, ChannelSink, DuplexConnector};
use slirc_chat::client::{Driver, Input};
use slirc_chat::router::Pane;
use slirc_chat::sink::RecordingSink;
use slirc_proto::Command;
use tokio::time::timeout;

#[tokio::test]
async fn test_session_over_transport() -> anyhow::Result<()> {
    let (connector, mut peers, attempts) = DuplexConnector::new();
    let (sink, mut watcher) = ChannelSink::new();
    let mut driver = Driver::new(test_config("me"), connector, sink);
    let input = driver.sender();

    driver.connect();
    input.send(Input::User("/connect".into()))?;
    let handle = tokio::spawn(async move {
        driver.run().await;
    });

    let mut peer = timeout(Duration::from_secs(5), peers.recv())
        .await?
        .ok_or_else(|| anyhow::anyhow!("no connection"))?;
    peer.register("me").await?;
    peer.sync("welcome").await?;

    input.send(Input::User("/join #test".into()))?;
    let join = peer.recv().await?;
    assert!(matches!(&join.command, Command::JOIN(c, None) if c == "#test"));

    peer.send_raw(":me!user@host JOIN #test").await?;
    let names = peer.recv().await?;
    assert!(matches!(&names.command, Command::NAMES(Some(c)) if c == "#test"));

    peer.send_raw(":irc.test 353 me = #test :alice bob").await?;
    peer.send_raw(":irc.test 366 me #test :End of /NAMES list.").await?;
    peer.send_raw(":alice!a@host QUIT :bye").await?;
    peer.sync("after-quit").await?;

    let mut seen = RecordingSink::new();
    assert!(watcher.drain_into(&mut seen));
    assert_eq!(seen.roster("#test"), vec!["bob"]);
    assert!(seen
        .infos(&Pane::Target("#test".into()))
        .contains(&"alice has quit (bye)."));

    input.send(Input::User("hello channel".into()))?;
    let privmsg = peer.recv().await?;
    assert!(matches!(&privmsg.command, Command::PRIVMSG(t, text) if t == "#test" && text == "hello channel"));

    input.send(Input::Shutdown)?;
    let quit = peer.recv().await?;
    assert!(matches!(quit.command, Command::QUIT(_)));
    assert!(peer.closed().await);

    timeout(Duration::from_secs(5), handle).await??;
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    assert!(!watcher.drain_into(&mut seen));
    assert_eq!(
        seen.messages(&Pane::Target("#test".into())),
        vec![("me", "hello channel")]
    );
    assert!(seen.roster("#test").is_empty());
    Ok(())
}

#[tokio::test]
async fn test_oversized_line_keeps_connection() -> anyhow::Result<()> {
    let (connector, mut peers, _attempts) = DuplexConnector::new();
    let (sink, mut watcher) = ChannelSink::new();
    let mut driver = Driver::new(test_config("me"), connector, sink);
    let input = driver.sender();

    driver.connect();
    let handle = tokio::spawn(async move {
        driver.run().await;
    });

    let mut peer = timeout(Duration::from_secs(5), peers.recv())
        .await?
        .ok_or_else(|| anyhow::anyhow!("no connection"))?;
    peer.register("me").await?;
    peer.sync("welcome").await?;
    peer.send_raw(":me!user@host JOIN #test").await?;
    peer.recv().await?;

    input.send(Input::User("x".repeat(600)))?;
    let text = watcher
        .info_starting_with(&Pane::Target("#test".into()), "Not sent")
        .await?;
    assert!(text.contains("message too long"));

    input.send(Input::User("still here".into()))?;
    let privmsg = peer.recv().await?;
    assert!(matches!(&privmsg.command, Command::PRIVMSG(t, text) if t == "#test" && text == "still here"));

    input.send(Input::Shutdown)?;
    timeout(Duration::from_secs(5), handle).await??;
    Ok(())
}

#[tokio::test]
async fn test_plain_text_without_connection() -> anyhow::Result<()> {
    let (connector, _peers, attempts) = DuplexConnector::new();
    let mut driver = Driver::new(test_config("me"), connector, RecordingSink::new());
    let input = driver.sender();

    input.send(Input::User("hello?".into()))?;
    input.send(Input::Shutdown)?;
    driver.run().await;

    assert_eq!(attempts.load(Ordering::SeqCst), 0);
    assert_eq!(driver.sink().calls.len(), 1);
    assert_eq!(driver.sink().infos(&Pane::Server), vec!["You are not connected."]);
    Ok(())
}

#[tokio::test]
async fn test_server_eof_tears_down() -> anyhow::Result<()> {
    let (connector, mut peers, _attempts) = DuplexConnector::new();
    let (sink, mut watcher) = ChannelSink::new();
    let mut driver = Driver::new(test_config("me"), connector, sink);
    let input = driver.sender();

    driver.connect();
    let handle = tokio::spawn(async move {
        driver.run().await;
    });

    let mut peer = timeout(Duration::from_secs(5), peers.recv())
        .await?
        .ok_or_else(|| anyhow::anyhow!("no connection"))?;
    peer.register("me").await?;
    watcher.info_starting_with(&Pane::Server, "Connected as me").await?;
    drop(peer);

    let text = watcher.info_starting_with(&Pane::Server, "Disconnected").await?;
    assert_eq!(text, "Disconnected: connection closed by server.");

    input.send(Input::User("anyone?".into()))?;
    watcher
        .info_starting_with(&Pane::Server, "You are not connected.")
        .await?;

    input.send(Input::Shutdown)?;
    timeout(Duration::from_secs(5), handle).await??;
    Ok(())
}

#[tokio::test]
async fn test_connect_failure_reported() -> anyhow::Result<()> {
    let (connector, peers, attempts) = DuplexConnector::new();
    drop(peers);
    let (sink, mut watcher) = ChannelSink::new();
    let mut driver = Driver::new(test_config("me"), connector, sink);
    let input = driver.sender();

    driver.connect();
    let handle = tokio::spawn(async move {
        driver.run().await;
    });

    let text = watcher.info_starting_with(&Pane::Server, "Disconnected").await?;
    assert!(text.starts_with("Disconnected: could not connect to irc.freenode.net:6667"));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    input.send(Input::Shutdown)?;
    timeout(Duration::from_secs(5), handle).await??;
    Ok(())
}
