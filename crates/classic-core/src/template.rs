//! The HTML document an action is exported as.
//!
//! Templates use `{{name}}` placeholders. Known names are `title`, `key` and
//! `description`; the description is scrubbed before substitution. Values are
//! inserted verbatim: titles and descriptions are already HTML.

use thiserror::Error;
use tracing::debug;

use crate::action::Action;
use crate::scrub::scrub;

/// Skeleton every action is written into unless a caller supplies another.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>{{title}}</title>
  </head>
  <body>
    <div>
      <h1>{{title}}</h1>
    </div>
    <div>
      {{description}}
    </div>
  </body>
</html>
"#;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder {{{{{name}}}}} at byte {offset}")]
    UnknownPlaceholder { name: String, offset: usize },
    #[error("unterminated placeholder at byte {offset}")]
    Unterminated { offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Key,
    Description,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "key" => Some(Self::Key),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed HTML template.
#[derive(Debug, Clone)]
pub struct ActionTemplate {
    segments: Vec<Segment>,
}

impl Default for ActionTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE).expect("built-in template is well-formed")
    }
}

impl ActionTemplate {
    /// Parse `source`, rejecting unknown or unterminated placeholders.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut consumed = 0;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let close = after_open.find("}}").ok_or(TemplateError::Unterminated {
                offset: consumed + open,
            })?;
            let name = after_open[..close].trim();
            let field = Field::from_name(name).ok_or_else(|| TemplateError::UnknownPlaceholder {
                name: name.to_string(),
                offset: consumed + open,
            })?;
            segments.push(Segment::Field(field));

            let advance = open + 2 + close + 2;
            consumed += advance;
            rest = &rest[advance..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        debug!(segments = segments.len(), "parsed action template");
        Ok(Self { segments })
    }

    /// Render `action` into a complete document.
    ///
    /// Substitution is single-pass, so placeholder-like text inside a record
    /// is emitted as-is.
    pub fn render(&self, action: &Action) -> String {
        let description = scrub(&action.description);
        let mut out = String::with_capacity(
            self.segments
                .iter()
                .map(|s| match s {
                    Segment::Literal(text) => text.len(),
                    Segment::Field(_) => 0,
                })
                .sum::<usize>()
                + description.len()
                + action.title.len() * 2,
        );
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::Title) => out.push_str(&action.title),
                Segment::Field(Field::Key) => out.push_str(&action.key),
                Segment::Field(Field::Description) => out.push_str(&description),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Action {
        Action {
            key: "77".into(),
            title: "Protect the <em>wetlands</em>".into(),
            description: r#"<img src="cid:logo.png"><a href="http://hq.demaction.org/x">go</a>"#
                .into(),
            ..Default::default()
        }
    }

    #[test]
    fn default_template_parses() {
        assert!(ActionTemplate::parse(DEFAULT_TEMPLATE).is_ok());
    }

    #[test]
    fn renders_title_and_scrubbed_description() {
        let html = ActionTemplate::default().render(&sample());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Protect the <em>wetlands</em></title>"));
        assert!(html.contains("<h1>Protect the <em>wetlands</em></h1>"));
        assert!(html.contains(
            r#"<img src="https:logo.png"><a href="http://org.salsalabs.com/x">go</a>"#
        ));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn custom_template_with_key() {
        let t = ActionTemplate::parse("<p id=\"{{ key }}\">{{title}}</p>").unwrap();
        assert_eq!(t.render(&sample()), "<p id=\"77\">Protect the <em>wetlands</em></p>");
    }

    #[test]
    fn placeholder_text_in_record_is_not_expanded() {
        let t = ActionTemplate::parse("{{title}}|{{description}}").unwrap();
        let a = Action {
            title: "{{description}}".into(),
            description: "body".into(),
            ..Default::default()
        };
        assert_eq!(t.render(&a), "{{description}}|body");
    }

    #[test]
    fn unknown_placeholder_rejected() {
        let err = ActionTemplate::parse("<p>{{author}}</p>").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownPlaceholder {
                name: "author".into(),
                offset: 3
            }
        );
        assert_eq!(err.to_string(), "unknown placeholder {{author}} at byte 3");
    }

    #[test]
    fn unterminated_placeholder_rejected() {
        let err = ActionTemplate::parse("<p>{{title}}</p>{{desc").unwrap_err();
        assert_eq!(err, TemplateError::Unterminated { offset: 16 });
    }
}
