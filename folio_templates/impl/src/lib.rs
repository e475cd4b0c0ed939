use std::sync::Arc;

use folio_di::Build;
use folio_templates_contracts::{Template, TemplateService, TEMPLATES};
use tera::Tera;

#[derive(Debug, Clone, Build)]
pub struct TemplateServiceImpl {
    #[state]
    state: State,
}

#[derive(Debug, Clone)]
struct State(Arc<Tera>);

impl Default for State {
    fn default() -> Self {
        let mut tera = Tera::default();

        for &(name, template) in TEMPLATES {
            tera.add_raw_template(name, template).unwrap();
        }

        Self(tera.into())
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.state.0.render(T::NAME, &context).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use folio_templates_contracts::{
        ContactNotification, ContactNotificationHtml, ContactNotificationText,
    };

    use super::*;

    fn notification() -> ContactNotification {
        ContactNotification {
            name: "Jane <Doe>".into(),
            email: "jane@example.com".into(),
            message: "Hello,\nI'd like to discuss a project & more.".into(),
        }
    }

    #[test]
    fn text() {
        // Arrange
        let sut = TemplateServiceImpl {
            state: Default::default(),
        };

        // Act
        let result = sut.render(&ContactNotificationText(notification())).unwrap();

        // Assert
        assert!(result.starts_with("New contact form submission:\n"));
        assert!(result.contains("Name: Jane <Doe>\n"));
        assert!(result.contains("Email: jane@example.com\n"));
        assert!(result.contains("Message: Hello,\nI'd like to discuss a project & more.\n"));
        assert!(result.contains("Sent from your portfolio contact form"));
    }

    #[test]
    fn html_escapes_submitted_values() {
        // Arrange
        let sut = TemplateServiceImpl {
            state: Default::default(),
        };

        // Act
        let result = sut.render(&ContactNotificationHtml(notification())).unwrap();

        // Assert
        assert!(result.contains("<strong>Name:</strong> Jane &lt;Doe&gt;</p>"));
        assert!(result.contains("href=\"mailto:jane@example.com\""));
        assert!(result.contains("Hello,<br>I&#x27;d like to discuss a project &amp; more."));
        assert!(!result.contains("<Doe>"));
        assert!(result.contains("respond to Jane &lt;Doe&gt;."));
    }
}
