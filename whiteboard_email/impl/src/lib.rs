use std::time::Duration;

use anyhow::anyhow;
use lettre::{
    message::{header, Mailbox, MessageBuilder},
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};
use whiteboard_email_contracts::{Email, EmailSendError, EmailService};
use whiteboard_models::email_address::EmailAddress;
use whiteboard_utils::Apply;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddress,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    timeout: Duration,
}

impl EmailServiceImpl {
    /// Create a pooled smtp transport that authenticates as `from`.
    ///
    /// No connection is opened until the first email is sent or
    /// [`EmailService::ping`] is called, but the connection pool spawns its
    /// background task right away, so this must be called from within a tokio
    /// runtime.
    pub fn new(
        url: &str,
        from: EmailAddress,
        password: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?
            .credentials(Credentials::new(from.as_str().into(), password.into()))
            .build();

        Ok(Self {
            from,
            transport,
            timeout,
        })
    }

    fn build_message(&self, email: Email) -> Result<Message, lettre::error::Error> {
        Message::builder()
            .from(mailbox(&self.from))
            .to(mailbox(&email.recipient))
            .apply_map(email.reply_to.as_ref().map(mailbox), MessageBuilder::reply_to)
            .subject(email.subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(email.body)
    }

    fn classify(&self, err: SmtpError) -> EmailSendError {
        let code = err.status().map(|code| code.to_string());
        if err.is_timeout() {
            EmailSendError::Timeout(self.timeout)
        } else if err.is_permanent() {
            EmailSendError::Rejected { code }
        } else if err.is_transient() {
            EmailSendError::Deferred { code }
        } else {
            EmailSendError::Connection(err.to_string())
        }
    }
}

fn mailbox(address: &EmailAddress) -> Mailbox {
    Mailbox::new(None, address.0.clone())
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> Result<(), EmailSendError> {
        let message = self
            .build_message(email)
            .map_err(|err| EmailSendError::Message(err.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.transport.send(message))
            .await
            .map_err(|_| EmailSendError::Timeout(self.timeout))?
            .map_err(|err| self.classify(err))?;

        if !response.is_positive() {
            let code = response.code().to_string();
            warn!(%code, "smtp server did not accept the email");
            return Err(EmailSendError::Rejected { code: Some(code) });
        }

        debug!(code = %response.code(), "smtp server accepted the email");
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        tokio::time::timeout(self.timeout, self.transport.test_connection())
            .await
            .map_err(|_| anyhow!("Timed out pinging smtp server"))??
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use tokio::net::TcpListener;
    use whiteboard_demo::{JANE, JANE_TEXT, MAILBOX, SUBJECT};

    use super::*;

    fn sut(url: &str, timeout: Duration) -> EmailServiceImpl {
        EmailServiceImpl::new(url, MAILBOX.clone(), "hunter2", timeout).unwrap()
    }

    fn email() -> Email {
        Email {
            recipient: MAILBOX.clone(),
            subject: SUBJECT.into(),
            body: JANE_TEXT.into(),
            reply_to: JANE.email.mailbox(),
        }
    }

    #[tokio::test]
    async fn message_headers() {
        let sut = sut("smtp://localhost", Duration::from_secs(1));

        let message = sut.build_message(email()).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("From: relay@example.com\r\n"), "{formatted}");
        assert!(formatted.contains("To: relay@example.com\r\n"), "{formatted}");
        assert!(formatted.contains("Reply-To: jane@example.com\r\n"), "{formatted}");
        assert!(formatted.contains("Subject: New Message from Portfolio Website\r\n"));
        assert!(formatted.contains("Content-Type: text/plain"));
    }

    #[tokio::test]
    async fn message_without_reply_to() {
        let sut = sut("smtp://localhost", Duration::from_secs(1));

        let message = sut
            .build_message(Email {
                reply_to: None,
                ..email()
            })
            .unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(!formatted.contains("Reply-To:"), "{formatted}");
    }

    #[tokio::test]
    async fn invalid_url() {
        assert!(EmailServiceImpl::new(
            "http://localhost",
            MAILBOX.clone(),
            "hunter2",
            Duration::from_secs(1)
        )
        .is_err());
    }

    #[tokio::test]
    async fn connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let sut = sut(&format!("smtp://127.0.0.1:{port}"), Duration::from_secs(5));

        let result = sut.send(email()).await;

        let err = result.unwrap_err();
        assert!(
            matches!(err.kind(), "connection" | "timeout"),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut connections = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                connections.push(stream);
            }
        });

        let timeout = Duration::from_millis(300);
        let sut = sut(&format!("smtp://127.0.0.1:{port}"), timeout);

        let start = Instant::now();
        let result = sut.send(email()).await;

        assert_eq!(result, Err(EmailSendError::Timeout(timeout)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn ping_unreachable_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let sut = sut(&format!("smtp://127.0.0.1:{port}"), Duration::from_secs(5));

        assert!(sut.ping().await.is_err());
    }
}
