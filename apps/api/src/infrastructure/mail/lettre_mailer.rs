use async_trait::async_trait;
use lettre::{
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::path::Path;

use super::traits::{DispatchError, ReportAttachment, ReportMailer};
use crate::{
    config::{MailConfig, MailTransportConfig},
    domain::report::locale::ReportLocale,
};

/// Sends reports through `lettre`, over SMTP or into an outbox directory.
pub struct LettreReportMailer {
    transport: MailTransport,
    from: Mailbox,
    recipients: Vec<Mailbox>,
    locale: ReportLocale,
}

enum MailTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

impl LettreReportMailer {
    pub fn new(config: &MailConfig, locale: ReportLocale) -> Result<Self, DispatchError> {
        let transport = match &config.transport {
            MailTransportConfig::Smtp {
                host,
                port,
                username,
                password,
                use_tls,
            } => {
                if !use_tls {
                    tracing::warn!("SMTP TLS is disabled - this is not recommended for production");
                }

                let smtp_builder = if *use_tls {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                } else {
                    Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host))
                }
                .map_err(|e| DispatchError::Transport(format!("create SMTP transport: {e}")))?
                .port(*port)
                .credentials(Credentials::new(username.clone(), password.clone()));

                MailTransport::Smtp(smtp_builder.build())
            }
            MailTransportConfig::File { path } => {
                let outbox = Path::new(path);
                if !outbox.exists() {
                    std::fs::create_dir_all(outbox).map_err(|e| {
                        DispatchError::Transport(format!("create outbox directory: {e}"))
                    })?;
                }
                MailTransport::File(AsyncFileTransport::<Tokio1Executor>::new(outbox))
            }
        };

        let recipients = config
            .recipients
            .iter()
            .map(|r| parse_mailbox(r))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            transport,
            from: parse_mailbox(&config.from)?,
            recipients,
            locale,
        })
    }

    fn build_message(&self, attachment: &ReportAttachment) -> Result<Message, DispatchError> {
        let pdf = ContentType::parse("application/pdf")
            .map_err(|e| DispatchError::Message(format!("content type: {e}")))?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(self.locale.email_subject(&attachment.file_name));
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(self.locale.email_body().to_string()))
                    .singlepart(
                        Attachment::new(attachment.file_name.clone())
                            .body(attachment.bytes.to_vec(), pdf),
                    ),
            )
            .map_err(|e| DispatchError::Message(e.to_string()))
    }
}

#[async_trait]
impl ReportMailer for LettreReportMailer {
    async fn send_report(&self, attachment: &ReportAttachment) -> Result<(), DispatchError> {
        let message = self.build_message(attachment)?;

        match &self.transport {
            MailTransport::Smtp(smtp) => {
                smtp.send(message)
                    .await
                    .map_err(|e| DispatchError::Transport(format!("send SMTP email: {e}")))?;
            }
            MailTransport::File(file) => {
                file.send(message)
                    .await
                    .map_err(|e| DispatchError::Transport(format!("write email file: {e}")))?;
            }
        }

        tracing::info!(
            recipients = self.recipients.len(),
            file_name = %attachment.file_name,
            "Report email sent"
        );
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        match self.transport {
            MailTransport::Smtp(_) => "smtp",
            MailTransport::File(_) => "file",
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address.parse::<Mailbox>().map_err(|e| DispatchError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}
