use folio_email_contracts::{Email, EmailBody, EmailSendError};
use folio_email_impl::{smtp::SmtpCredentials, SmtpEmailService};
use folio_testing::smtp::FakeSmtp;
use folio_utils::assert_matches;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn ok_without_starttls() {
    // Arrange
    let server = FakeSmtp::new();
    let port = server.spawn().await.unwrap().port();
    let sut = make_sut(port);

    // Act
    let result = sut.send(make_email()).await;

    // Assert
    result.unwrap();
    let inbox = server.inbox().await;
    assert_eq!(inbox.len(), 1);
    let message = &inbox[0];
    assert_eq!(message.from, "relay@example.com");
    assert_eq!(message.recipients, ["owner@example.com"]);
    assert!(message
        .data
        .lines()
        .any(|line| line.starts_with("Reply-To: ") && line.contains("<jane@example.com>")));
    assert!(message
        .data
        .contains("Subject: Portfolio Contact: Jane (jane@example.com)"));
    assert!(message.data.contains("multipart/alternative"));
    assert!(message.data.contains("plain body"));
}

#[tokio::test]
async fn rejected() {
    // Arrange
    let server = FakeSmtp::new().rejecting();
    let port = server.spawn().await.unwrap().port();
    let sut = make_sut(port);

    // Act
    let result = sut.send(make_email()).await;

    // Assert
    assert_matches!(result, Err(EmailSendError::Delivery(_)));
    assert!(server.inbox().await.is_empty());
}

#[tokio::test]
async fn unreachable() {
    // Arrange
    let sut = make_sut(1);

    // Act
    let result = sut.send(make_email()).await;

    // Assert
    assert_matches!(result, Err(EmailSendError::Delivery(_)));
}

fn make_sut(port: u16) -> SmtpEmailService {
    SmtpEmailService::new(
        "127.0.0.1",
        port,
        Some(SmtpCredentials {
            username: "relay".into(),
            password: "secret".into(),
        }),
        "Portfolio Contact <relay@example.com>".parse().unwrap(),
    )
    .unwrap()
}

fn make_email() -> Email {
    Email {
        recipient: "owner@example.com".parse().unwrap(),
        subject: "Portfolio Contact: Jane (jane@example.com)".into(),
        body: EmailBody::Alternative {
            text: "plain body".into(),
            html: "<p>html body</p>".into(),
        },
        reply_to: Some("Jane <jane@example.com>".parse().unwrap()),
    }
}
