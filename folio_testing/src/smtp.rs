use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    sync::Mutex,
};
use tracing::{info, warn};

/// A plaintext SMTP server that accepts `AUTH PLAIN`/`AUTH LOGIN` without
/// checking credentials and records every message. It never offers
/// `STARTTLS`, like local mail catchers.
#[derive(Debug, Clone, Default)]
pub struct FakeSmtp {
    reject_recipients: bool,
    inbox: Arc<Mutex<Vec<SmtpMessage>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpMessage {
    pub from: String,
    pub recipients: Vec<String>,
    pub data: String,
}

impl FakeSmtp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every `RCPT TO` with `554 Transaction failed`.
    pub fn rejecting(mut self) -> Self {
        self.reject_recipients = true;
        self
    }

    pub async fn inbox(&self) -> Vec<SmtpMessage> {
        self.inbox.lock().await.clone()
    }

    /// Listen on an ephemeral port and return the bound address.
    pub async fn spawn(&self) -> anyhow::Result<SocketAddr> {
        let listener = TcpListener::bind((IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
            .await
            .context("Failed to bind to an ephemeral port")?;
        let addr = listener.local_addr()?;

        tokio::spawn(self.clone().accept_loop(listener));

        Ok(addr)
    }

    async fn accept_loop(self, listener: TcpListener) {
        loop {
            let stream = match listener.accept().await {
                Ok((stream, _)) => stream,
                Err(err) => {
                    warn!(error = %err, "Failed to accept smtp connection");
                    continue;
                }
            };
            let server = self.clone();
            tokio::spawn(async move {
                if let Err(err) = server.handle(stream).await {
                    warn!(error = %err, "SMTP session failed");
                }
            });
        }
    }

    async fn handle(&self, stream: TcpStream) -> anyhow::Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        writer.write_all(b"220 fake.smtp ESMTP ready\r\n").await?;

        let mut from = String::new();
        let mut recipients = Vec::new();

        while let Some(line) = lines.next_line().await? {
            let command = line.to_ascii_uppercase();
            let reply: &[u8] = if command.starts_with("EHLO") {
                b"250-fake.smtp\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME\r\n"
            } else if command.starts_with("HELO") {
                b"250 fake.smtp\r\n"
            } else if command.starts_with("AUTH") {
                b"235 2.7.0 Authentication successful\r\n"
            } else if command.starts_with("MAIL FROM:") {
                from = address(&line);
                recipients.clear();
                b"250 2.1.0 OK\r\n"
            } else if command.starts_with("RCPT TO:") {
                if self.reject_recipients {
                    b"554 5.7.1 Transaction failed\r\n"
                } else {
                    recipients.push(address(&line));
                    b"250 2.1.5 OK\r\n"
                }
            } else if command == "DATA" {
                writer.write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n").await?;
                let mut data = Vec::new();
                while let Some(line) = lines.next_line().await? {
                    if line == "." {
                        break;
                    }
                    data.push(line.strip_prefix('.').unwrap_or(&line).to_owned());
                }
                let message = SmtpMessage {
                    from: std::mem::take(&mut from),
                    recipients: std::mem::take(&mut recipients),
                    data: data.join("\r\n"),
                };
                info!(from = %message.from, to = ?message.recipients, "Accepted message");
                self.inbox.lock().await.push(message);
                b"250 2.0.0 OK: queued\r\n"
            } else if command == "QUIT" {
                writer.write_all(b"221 2.0.0 Bye\r\n").await?;
                return Ok(());
            } else if command == "RSET" || command == "NOOP" {
                b"250 2.0.0 OK\r\n"
            } else {
                b"502 5.5.2 Command not recognized\r\n"
            };
            writer.write_all(reply).await?;
        }

        Ok(())
    }
}

pub async fn start_server(host: IpAddr, port: u16) -> anyhow::Result<()> {
    info!("Starting smtp testing server on {host}:{port}");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    FakeSmtp::new().accept_loop(listener).await;

    Ok(())
}

fn address(line: &str) -> String {
    line.split_once('<')
        .and_then(|(_, rest)| rest.split_once('>'))
        .map(|(addr, _)| addr.to_owned())
        .unwrap_or_default()
}
