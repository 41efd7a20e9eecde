//! Template rendering with variable substitution

use crate::templates::types::{RenderedTemplate, Template};
use outreach_ai::LeadData;

/// Placeholder names understood by the renderer, without `{{ }}`
///
/// # Placeholders
/// - `{{name}}` - Lead's name
/// - `{{company}}` - Lead's company
/// - `{{title}}` - Lead's job title
/// - `{{industry}}` - Lead's industry
pub const PLACEHOLDERS: [&str; 4] = ["name", "company", "title", "industry"];

/// Renders templates by substituting lead attributes
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Render subject (when present) and content of a template for a lead
    pub fn render(template: &Template, lead: &LeadData) -> RenderedTemplate {
        RenderedTemplate {
            subject: template
                .subject_template
                .as_deref()
                .map(|subject| Self::substitute(Some(subject), lead)),
            content: Self::substitute(Some(&template.content_template), lead),
        }
    }

    /// Replace every known placeholder in `template` with the lead's value
    ///
    /// Absent values become the empty string. Substitution is a single
    /// left-to-right pass, so inserted values are never re-scanned. Unknown
    /// `{{...}}` tokens are left verbatim. A missing template renders empty.
    pub fn substitute(template: Option<&str>, lead: &LeadData) -> String {
        let Some(template) = template else {
            return String::new();
        };

        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            let Some(end) = after_open.find("}}") else {
                result.push_str(&rest[start..]);
                rest = "";
                break;
            };

            match Self::lookup(&after_open[..end], lead) {
                Some(value) => {
                    result.push_str(value);
                    rest = &after_open[end + 2..];
                }
                None => {
                    // Not ours: emit one brace and rescan from the next one
                    result.push('{');
                    rest = &rest[start + 1..];
                }
            }
        }

        result.push_str(rest);
        result
    }

    fn lookup<'a>(key: &str, lead: &'a LeadData) -> Option<&'a str> {
        let value = match key {
            "name" => Some(lead.name.as_str()),
            "company" => lead.company.as_deref(),
            "title" => lead.title.as_deref(),
            "industry" => lead.industry.as_deref(),
            _ => return None,
        };
        Some(value.unwrap_or(""))
    }

    /// Extract all placeholder names from a template string
    ///
    /// Returns names without `{{ }}` markers, trimmed, sorted and deduplicated.
    pub fn extract_placeholders(template_str: &str) -> Vec<String> {
        let mut variables = Vec::new();
        let mut chars = template_str.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '{' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                while let Some(ch) = chars.next() {
                    if ch == '}' && chars.peek() == Some(&'}') {
                        chars.next();
                        if !var_name.trim().is_empty() {
                            variables.push(var_name.trim().to_string());
                        }
                        break;
                    } else {
                        var_name.push(ch);
                    }
                }
            }
        }

        variables.sort();
        variables.dedup();
        variables
    }

    /// Placeholders that substitution will leave untouched
    pub fn unknown_placeholders(template_str: &str) -> Vec<String> {
        Self::extract_placeholders(template_str)
            .into_iter()
            .filter(|name| !PLACEHOLDERS.contains(&name.as_str()))
            .collect()
    }

    /// Lead used to preview templates
    pub fn sample_lead() -> LeadData {
        LeadData::new("John Smith")
            .with_company("TechCorp Inc")
            .with_title("VP of Marketing")
            .with_industry("SaaS")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use outreach_ai::{Channel, MessageType, Tone};

    fn lead() -> LeadData {
        TemplateRenderer::sample_lead()
    }

    fn template(subject: Option<&str>, content: &str) -> Template {
        Template {
            id: "t1".to_string(),
            owner: "test@example.com".to_string(),
            name: "Test".to_string(),
            channel: Channel::Email,
            message_type: MessageType::ColdOutreach,
            tone: Tone::Professional,
            subject_template: subject.map(str::to_string),
            content_template: content.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_end_to_end_substitution() {
        let rendered = TemplateRenderer::substitute(
            Some("Hi {{name}}, saw {{company}} in {{industry}}."),
            &lead(),
        );

        assert_eq!(rendered, "Hi John Smith, saw TechCorp Inc in SaaS.");
    }

    #[test]
    fn test_every_occurrence_is_replaced() {
        let rendered = TemplateRenderer::substitute(
            Some("{{company}} / {{company}} / {{title}}{{title}}"),
            &lead(),
        );

        assert_eq!(
            rendered,
            "TechCorp Inc / TechCorp Inc / VP of MarketingVP of Marketing"
        );
        for token in PLACEHOLDERS {
            assert!(!rendered.contains(&format!("{{{{{}}}}}", token)));
        }
    }

    #[test]
    fn test_absent_fields_render_empty() {
        let lead = LeadData::new("Jane");
        let rendered =
            TemplateRenderer::substitute(Some("[{{company}}|{{title}}|{{industry}}]"), &lead);

        assert_eq!(rendered, "[||]");
    }

    #[test]
    fn test_missing_or_empty_template_renders_empty() {
        assert_eq!(TemplateRenderer::substitute(None, &lead()), "");
        assert_eq!(TemplateRenderer::substitute(Some(""), &lead()), "");
    }

    #[test]
    fn test_text_without_tokens_is_unchanged() {
        let text = "Plain text with {single} braces and }} stray closers {{";
        assert_eq!(TemplateRenderer::substitute(Some(text), &lead()), text);
    }

    #[test]
    fn test_unknown_tokens_are_left_verbatim() {
        let rendered =
            TemplateRenderer::substitute(Some("Re: {{previous_subject}} for {{name}}"), &lead());

        assert_eq!(rendered, "Re: {{previous_subject}} for John Smith");
    }

    #[test]
    fn test_spaced_tokens_are_not_placeholders() {
        let rendered = TemplateRenderer::substitute(Some("Hi {{ name }}"), &lead());
        assert_eq!(rendered, "Hi {{ name }}");
    }

    #[test]
    fn test_extra_leading_brace_is_kept() {
        let rendered = TemplateRenderer::substitute(Some("{{{name}}}"), &lead());
        assert_eq!(rendered, "{John Smith}");
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let lead = LeadData::new("{{company}}").with_company("Acme");
        let rendered = TemplateRenderer::substitute(Some("Hello {{name}}"), &lead);

        assert_eq!(rendered, "Hello {{company}}");
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = template(
            Some("Quick question about {{company}}'s growth strategy"),
            "Hi {{name}},\n\nHow is {{industry}} treating you?",
        );

        let first = TemplateRenderer::render(&template, &lead());
        let second = TemplateRenderer::render(&template, &lead());

        assert_eq!(first, second);
        assert_eq!(
            first.subject.as_deref(),
            Some("Quick question about TechCorp Inc's growth strategy")
        );
        assert_eq!(first.content, "Hi John Smith,\n\nHow is SaaS treating you?");
    }

    #[test]
    fn test_render_without_subject() {
        let rendered = TemplateRenderer::render(&template(None, "Hi {{name}}"), &lead());
        assert_eq!(rendered.subject, None);
        assert_eq!(rendered.content, "Hi John Smith");
    }

    #[test]
    fn test_extract_placeholders() {
        let vars = TemplateRenderer::extract_placeholders(
            "Hello {{name}}, {{ company }} and {{name}} again. Re: {{previous_subject}}",
        );

        assert_eq!(vars, vec!["company", "name", "previous_subject"]);
    }

    #[test]
    fn test_unknown_placeholders() {
        let unknown =
            TemplateRenderer::unknown_placeholders("{{name}} {{industry}} {{previous_subject}}");
        assert_eq!(unknown, vec!["previous_subject"]);
    }
}
