//! Scripted IRC server peer.

use std::time::Duration;

use slirc_proto::{Command, Message, Transport};
use tokio::io::DuplexStream;
use tokio::time::timeout;

/// The server end of one client connection.
pub struct TestPeer {
    transport: Transport<DuplexStream>,
}

#[allow(dead_code)]
impl TestPeer {
    pub fn new(stream: DuplexStream) -> Self {
        Self {
            transport: Transport::new(stream),
        }
    }

    /// Send a raw line, e.g. `":irc.test 001 me :Welcome"`.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        let msg: Message = line.parse()?;
        self.transport.write_message(&msg).await?;
        Ok(())
    }

    /// Receive one message from the client.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        match timeout(Duration::from_secs(5), self.transport.read_message()).await?? {
            Some(msg) => Ok(msg),
            None => anyhow::bail!("client closed the connection"),
        }
    }

    /// Receive until `predicate` matches, returning the matching message.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Message>
    where
        F: FnMut(&Message) -> bool,
    {
        loop {
            let msg = self.recv().await?;
            if predicate(&msg) {
                return Ok(msg);
            }
        }
    }

    /// Consume NICK and USER and answer with a welcome.
    pub async fn register(&mut self, nick: &str) -> anyhow::Result<()> {
        let msg = self.recv().await?;
        anyhow::ensure!(matches!(msg.command, Command::NICK(_)), "expected NICK, got {msg:?}");
        let msg = self.recv().await?;
        anyhow::ensure!(matches!(msg.command, Command::USER(..)), "expected USER, got {msg:?}");
        self.send_raw(&format!(":irc.test 001 {nick} :Welcome to the test network {nick}"))
            .await
    }

    /// Round-trip a PING so everything sent before it has been processed.
    pub async fn sync(&mut self, token: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("PING :{token}")).await?;
        self.recv_until(|msg| matches!(&msg.command, Command::PONG(t, _) if t == token))
            .await?;
        Ok(())
    }

    /// Whether the client has closed its side.
    pub async fn closed(&mut self) -> bool {
        matches!(
            timeout(Duration::from_secs(5), self.transport.read_message()).await,
            Ok(Ok(None))
        )
    }
}
