use super::HtmlRenderer;
use crate::document::{DocumentError, HtmlDocument, RenderParams};
use maud::{PreEscaped, html};

/// System message container with one alert per message type.
///
/// Message text is HTML and is emitted as is.
#[derive(Debug, Default)]
pub struct MessageRenderer;

impl HtmlRenderer for MessageRenderer {
    fn render(
        &mut self,
        doc: &HtmlDocument,
        _name: &str,
        _params: &RenderParams,
        _content: Option<&str>,
    ) -> Result<String, DocumentError> {
        // Grouped by type, in order of first appearance.
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for message in doc.messages() {
            match groups.iter_mut().find(|(kind, _)| *kind == message.kind) {
                Some((_, texts)) => texts.push(message.text.as_str()),
                None => groups.push((message.kind.as_str(), vec![message.text.as_str()])),
            }
        }

        let markup = html! {
            div id="system-message-container" aria-live="polite" {
                @for (kind, texts) in &groups {
                    div class=(format!("alert alert-{kind}")) role="alert" {
                        @for text in texts {
                            div.alert-message { (PreEscaped(*text)) }
                        }
                    }
                }
            }
        };
        Ok(markup.into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::html_document;

    fn render(doc: &HtmlDocument) -> String {
        MessageRenderer.render(doc, "", &RenderParams::default(), None).unwrap()
    }

    #[test]
    fn empty_container() {
        assert_eq!(
            render(&html_document()),
            "<div id=\"system-message-container\" aria-live=\"polite\"></div>"
        );
    }

    #[test]
    fn groups_by_type() {
        let mut doc = html_document();
        doc.enqueue_message("Saved.", "success");
        doc.enqueue_message("Check <a href=\"/log\">the log</a>.", "warning");
        doc.enqueue_message("Published.", "success");

        assert_eq!(
            render(&doc),
            "<div id=\"system-message-container\" aria-live=\"polite\">\
             <div class=\"alert alert-success\" role=\"alert\">\
             <div class=\"alert-message\">Saved.</div>\
             <div class=\"alert-message\">Published.</div></div>\
             <div class=\"alert alert-warning\" role=\"alert\">\
             <div class=\"alert-message\">Check <a href=\"/log\">the log</a>.</div></div></div>"
        );
    }
}
