//! SMS templates with `{{variable}}` placeholders

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Template variables, keyed by placeholder name
pub type TemplateVars = BTreeMap<String, String>;

/// Name of the template used to announce a new vote
pub const NEW_VOTE_TEMPLATE: &str = "Nouveau vote";

/// A named SMS template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsTemplate {
    pub nom: String,
    pub type_notification: String,
    pub template: String,
    #[serde(default = "default_active")]
    pub actif: bool,
}

fn default_active() -> bool {
    true
}

impl SmsTemplate {
    pub fn new(
        nom: impl Into<String>,
        type_notification: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            nom: nom.into(),
            type_notification: type_notification.into(),
            template: template.into(),
            actif: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.actif = false;
        self
    }

    pub fn render(&self, vars: &TemplateVars) -> String {
        render(&self.template, vars)
    }

    /// Notification type recorded for messages sent from this template
    pub fn notification_type(&self) -> String {
        notification_type_for(&self.nom)
    }
}

/// Replace every `{{key}}` in `template` with its value
///
/// Placeholders with no matching variable are left untouched. The template
/// is scanned once, so substituted values are never expanded again.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let key = &after[..close];
        if key.contains("{{") {
            // Unbalanced opener: keep it and resume on the inner one
            out.push_str("{{");
            rest = after;
            continue;
        }
        match vars.get(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

/// Merge global and recipient variables; recipient values win on collision
pub fn merge_vars(global: &TemplateVars, recipient: &TemplateVars) -> TemplateVars {
    let mut merged = global.clone();
    merged.extend(recipient.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Derive a notification type from a template name
///
/// Lowercases the name and replaces its first space with `_`
/// ("Nouveau vote" → "nouveau_vote").
pub fn notification_type_for(template_name: &str) -> String {
    template_name.to_lowercase().replacen(' ', "_", 1)
}
