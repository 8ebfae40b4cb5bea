//! Atom 1.0 renderer.

use super::{FeedError, FeedItem, parse_feed_date};
use crate::document::{Document, FeedDocument};
use crate::escape::{encode_link, escape_html, rel_to_abs, strip_tags};
use crate::renderer::FeedRenderer;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::fmt::Write;

pub const ATOM_MIME: &str = "application/atom+xml";

#[derive(Debug, Default)]
pub struct AtomRenderer;

fn iso8601(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Feed title with the site name added per `sitename_pagetitles`.
fn feed_title(doc: &FeedDocument) -> String {
    let settings = doc.settings();
    let title = doc.meta().title();
    match settings.sitename_pagetitles {
        1 => format!("{} - {}", settings.sitename, title),
        2 => format!("{} - {}", title, settings.sitename),
        _ => title.to_string(),
    }
}

impl FeedRenderer for AtomRenderer {
    fn content_type(&self) -> &'static str {
        ATOM_MIME
    }

    fn render(&self, doc: &FeedDocument, now: DateTime<FixedOffset>) -> Result<String, FeedError> {
        let tz = doc.timezone()?;
        let now = now.with_timezone(&tz);
        let settings = doc.settings();
        let site_url = settings.site_url.as_str();
        let meta = doc.meta();

        let mut feed = String::from("<feed xmlns=\"http://www.w3.org/2005/Atom\"");
        if !meta.language().is_empty() {
            let _ = write!(feed, " xml:lang=\"{}\"", meta.language());
        }
        feed.push_str(">\n");
        let _ = writeln!(feed, "\t<title type=\"text\">{}</title>", escape_html(&feed_title(doc)));
        let _ = writeln!(
            feed,
            "\t<subtitle type=\"text\">{}</subtitle>",
            escape_html(meta.description())
        );
        for category in &doc.categories {
            let _ = writeln!(feed, "\t<category term=\"{}\" />", escape_html(category));
        }
        let _ = writeln!(feed, "\t<link rel=\"alternate\" type=\"text/html\" href=\"{site_url}\"/>");
        let _ = writeln!(feed, "\t<id>{}</id>", meta.base().replace(' ', "%20"));
        let _ = writeln!(feed, "\t<updated>{}</updated>", escape_html(&iso8601(&now)));

        if !doc.editor.is_empty() {
            feed.push_str("\t<author>\n");
            let _ = writeln!(feed, "\t\t<name>{}</name>", escape_html(&doc.editor));
            if !doc.editor_email.is_empty() {
                let _ = writeln!(feed, "\t\t<email>{}</email>", escape_html(&doc.editor_email));
            }
            feed.push_str("\t</author>\n");
        }

        let _ = writeln!(feed, "\t<generator>{}</generator>", escape_html(meta.generator()));
        let _ = writeln!(
            feed,
            "\t<link rel=\"self\" type=\"{ATOM_MIME}\" href=\"{}\"/>",
            escape_html(&format!("{site_url}{}", doc.syndication_url("atom")).replace(' ', "%20"))
        );

        let content_base = doc.content_base();
        for item in doc.items() {
            render_entry(&mut feed, item, site_url, &content_base, &tz, &now)?;
        }

        feed.push_str("</feed>\n");
        Ok(feed)
    }
}

fn render_entry(
    feed: &mut String,
    item: &FeedItem,
    site_url: &str,
    content_base: &str,
    tz: &FixedOffset,
    now: &DateTime<FixedOffset>,
) -> Result<(), FeedError> {
    let link = encode_link(&item.link);
    let date = if item.date.is_empty() {
        *now
    } else {
        parse_feed_date(&item.date, tz)?
    };
    let updated = escape_html(&iso8601(&date));

    feed.push_str("\t<entry>\n");
    let _ = writeln!(feed, "\t\t<title>{}</title>", escape_html(&strip_tags(&item.title)));
    let _ = writeln!(
        feed,
        "\t\t<link rel=\"alternate\" type=\"text/html\" href=\"{site_url}{link}\"/>"
    );
    let _ = writeln!(feed, "\t\t<published>{updated}</published>");
    let _ = writeln!(feed, "\t\t<updated>{updated}</updated>");

    let guid = if item.guid.is_empty() {
        format!("{site_url}{link}").replace(' ', "%20")
    } else {
        escape_html(&item.guid)
    };
    let _ = writeln!(feed, "\t\t<id>{guid}</id>");

    if !item.author.is_empty() {
        feed.push_str("\t\t<author>\n");
        let _ = writeln!(feed, "\t\t\t<name>{}</name>", escape_html(&item.author));
        if !item.author_email.is_empty() {
            let _ = writeln!(feed, "\t\t\t<email>{}</email>", escape_html(&item.author_email));
        }
        feed.push_str("\t\t</author>\n");
    }

    if !item.description.is_empty() {
        let body = escape_html(&rel_to_abs(&item.description, content_base));
        let _ = writeln!(feed, "\t\t<summary type=\"html\">{body}</summary>");
        let _ = writeln!(feed, "\t\t<content type=\"html\">{body}</content>");
    }
    for category in &item.categories {
        let _ = writeln!(feed, "\t\t<category term=\"{}\" />", escape_html(category));
    }
    if let Some(enclosure) = &item.enclosure {
        let _ = writeln!(
            feed,
            "\t\t<link rel=\"enclosure\" href=\"{}\" type=\"{}\" length=\"{}\"/>",
            enclosure.url, enclosure.mime, enclosure.length
        );
    }
    feed.push_str("\t</entry>\n");
    Ok(())
}
