//! This module provides a service for rendering the alert email bodies using
//! the minijinja templating engine.

use minijinja::Environment;
use thiserror::Error;

/// A service for rendering templates using the minijinja templating engine.
pub struct TemplateService {
    env: Environment<'static>,
}

/// Error type for the TemplateService.
#[derive(Debug, Error)]
pub enum TemplateServiceError {
    /// The template failed to parse or render.
    #[error("Failed to render template")]
    RenderError(#[from] minijinja::Error),
}

/// Turns an ISO-8601 instant such as `2024-05-01T10:00:00Z` into
/// `2024-05-01 10:00:00 `.
pub fn human_time(value: String) -> String {
    value.replace('T', " ").replace('Z', " ")
}

impl TemplateService {
    /// Creates a new instance of `TemplateService`. Undefined variables are
    /// errors, and the `human_time` filter is registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        env.add_filter("human_time", human_time);

        Self { env }
    }

    /// Renders a template with the given context.
    pub fn render(
        &self,
        template_str: &str,
        context: serde_json::Value,
    ) -> Result<String, TemplateServiceError> {
        tracing::debug!(
            template = template_str,
            context = %context,
            "Rendering template with context."
        );

        match self.env.render_str(template_str, context) {
            Ok(rendered_string) => Ok(rendered_string),
            Err(e) => {
                tracing::warn!("Failed to render template '{}': {}", template_str, e);
                Err(TemplateServiceError::RenderError(e))
            }
        }
    }
}

impl Default for TemplateService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_render_alert_body() {
        let service = TemplateService::new();
        let template = "Labels Alert: {{ labels_alert_found }}\r\nTime (UTC): {{ event_time }}";
        let context = json!({
            "labels_alert_found": "Person,Dog",
            "event_time": "2024-05-01 10:00:00 ",
        });
        let result = service.render(template, context).unwrap();
        assert_eq!(result, "Labels Alert: Person,Dog\r\nTime (UTC): 2024-05-01 10:00:00 ");
    }

    #[test]
    fn test_human_time_filter() {
        let service = TemplateService::new();
        let result = service
            .render("{{ t | human_time }}", json!({ "t": "2024-05-01T10:00:00.123Z" }))
            .unwrap();
        assert_eq!(result, "2024-05-01 10:00:00.123 ");
    }

    #[test]
    fn test_render_with_missing_variable_fails() {
        let service = TemplateService::new();
        let result = service.render("Hello, {{ name }}", json!({}));
        assert!(matches!(result, Err(TemplateServiceError::RenderError(_))));
    }

    #[test]
    fn test_render_with_invalid_template_fails() {
        let service = TemplateService::new();
        let result = service.render("Hello, {{ name }", json!({ "name": "World" }));
        assert!(result.is_err());
    }
}
