// `MessageSender` over the EmailJS REST client.

use showcase_mail::{EmailJsClient, TemplateParams};

use super::{ContactMessage, MessageSender};
use crate::error::CoreError;

impl From<&ContactMessage> for TemplateParams {
    fn from(message: &ContactMessage) -> Self {
        Self {
            from_name: message.name.trim().to_owned(),
            from_email: message.email.trim().to_owned(),
            subject: message.subject.trim().to_owned(),
            message: message.message.trim().to_owned(),
            company: message.company_or_placeholder().to_owned(),
        }
    }
}

impl MessageSender for EmailJsClient {
    async fn send(&self, message: &ContactMessage) -> Result<(), CoreError> {
        let params = TemplateParams::from(message);
        EmailJsClient::send(self, &params).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_params_trim_and_default_company() {
        let message = ContactMessage {
            name: " Ada ".into(),
            email: "ada@example.com ".into(),
            subject: "Hola".into(),
            message: "Un mensaje suficientemente largo".into(),
            company: "   ".into(),
        };
        let params = TemplateParams::from(&message);
        assert_eq!(params.from_name, "Ada");
        assert_eq!(params.from_email, "ada@example.com");
        assert_eq!(params.company, "No especificada");
    }
}
