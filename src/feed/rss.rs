//! RSS 2.0 renderer.
//!
//! ```text
//! <rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
//!     <channel>
//!         <title>, <description>, <link>, <lastBuildDate>, <generator>
//!         <atom:link rel="self" .../>
//!         optional channel elements
//!         <item>...</item>*
//!     </channel>
//! </rss>
//! ```

use super::{FeedError, FeedItem, absolute_link, parse_feed_date};
use crate::document::{Document, FeedDocument};
use crate::escape::{encode_link, escape_html, rel_to_abs, strip_tags};
use crate::renderer::FeedRenderer;
use chrono::{DateTime, FixedOffset};
use std::fmt::Write;

pub const RSS_MIME: &str = "application/rss+xml";

#[derive(Debug, Default)]
pub struct RssRenderer;

impl FeedRenderer for RssRenderer {
    fn content_type(&self) -> &'static str {
        RSS_MIME
    }

    fn render(&self, doc: &FeedDocument, now: DateTime<FixedOffset>) -> Result<String, FeedError> {
        let tz = doc.timezone()?;
        let site_url = doc.settings().site_url.as_str();
        let meta = doc.meta();
        let last_build = doc.last_build_date.unwrap_or(now).with_timezone(&tz);

        let mut feed = String::new();
        feed.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n");
        feed.push_str("\t<channel>\n");
        line(&mut feed, 2, "title", &escape_html(meta.title()));
        line(
            &mut feed,
            2,
            "description",
            &format!("<![CDATA[{}]]>", meta.description()),
        );
        line(
            &mut feed,
            2,
            "link",
            &format!("{site_url}{}", encode_link(meta.link())),
        );
        line(&mut feed, 2, "lastBuildDate", &escape_html(&last_build.to_rfc2822()));
        line(&mut feed, 2, "generator", meta.generator());
        let _ = writeln!(
            feed,
            "\t\t<atom:link rel=\"self\" type=\"{RSS_MIME}\" href=\"{}\"/>",
            escape_html(&format!("{site_url}{}", doc.syndication_url("rss")).replace(' ', "%20"))
        );

        if let Some(image) = &doc.image {
            feed.push_str("\t\t<image>\n");
            line(&mut feed, 3, "url", &image.url);
            line(&mut feed, 3, "title", &escape_html(&image.title));
            line(&mut feed, 3, "link", &image.link.replace(' ', "%20"));
            if !image.width.is_empty() {
                line(&mut feed, 3, "width", &image.width);
            }
            if !image.height.is_empty() {
                line(&mut feed, 3, "height", &image.height);
            }
            if !image.description.is_empty() {
                line(
                    &mut feed,
                    3,
                    "description",
                    &format!("<![CDATA[{}]]>", image.description),
                );
            }
            feed.push_str("\t\t</image>\n");
        }

        if !meta.language().is_empty() {
            line(&mut feed, 2, "language", meta.language());
        }
        optional(&mut feed, "copyright", &doc.copyright);
        if !doc.editor_email.is_empty() {
            line(
                &mut feed,
                2,
                "managingEditor",
                &format!("{} ({})", escape_html(&doc.editor_email), escape_html(&doc.editor)),
            );
        }
        optional(&mut feed, "webMaster", &doc.webmaster);
        if !doc.pub_date.is_empty() {
            let pub_date = parse_feed_date(&doc.pub_date, &tz)?;
            line(&mut feed, 2, "pubDate", &escape_html(&pub_date.to_rfc2822()));
        }
        for category in &doc.categories {
            line(&mut feed, 2, "category", &escape_html(category));
        }
        optional(&mut feed, "docs", &doc.docs);
        optional(&mut feed, "ttl", &doc.ttl);
        optional(&mut feed, "rating", &doc.rating);
        optional(&mut feed, "skipHours", &doc.skip_hours);
        optional(&mut feed, "skipDays", &doc.skip_days);

        let content_base = doc.content_base();
        for item in doc.items() {
            render_item(&mut feed, item, site_url, &content_base, &tz)?;
        }

        feed.push_str("\t</channel>\n");
        feed.push_str("</rss>\n");
        Ok(feed)
    }
}

fn render_item(
    feed: &mut String,
    item: &FeedItem,
    site_url: &str,
    content_base: &str,
    tz: &FixedOffset,
) -> Result<(), FeedError> {
    let link = absolute_link(site_url, &item.link);

    feed.push_str("\t\t<item>\n");
    line(feed, 3, "title", &escape_html(&strip_tags(&item.title)));
    line(feed, 3, "link", &link);
    if item.guid.is_empty() {
        let _ = writeln!(feed, "\t\t\t<guid isPermaLink=\"true\">{link}</guid>");
    } else {
        let _ = writeln!(
            feed,
            "\t\t\t<guid isPermaLink=\"false\">{}</guid>",
            escape_html(&item.guid)
        );
    }
    line(
        feed,
        3,
        "description",
        &format!("<![CDATA[{}]]>", rel_to_abs(&item.description, content_base)),
    );
    if !item.author_email.is_empty() {
        line(
            feed,
            3,
            "author",
            &escape_html(&format!("{} ({})", item.author_email, item.author)),
        );
    }
    for category in &item.categories {
        line(feed, 3, "category", &escape_html(category));
    }
    if !item.comments.is_empty() {
        line(feed, 3, "comments", &escape_html(&item.comments));
    }
    if !item.date.is_empty() {
        let date = parse_feed_date(&item.date, tz)?;
        line(feed, 3, "pubDate", &escape_html(&date.to_rfc2822()));
    }
    if let Some(enclosure) = &item.enclosure {
        let _ = writeln!(
            feed,
            "\t\t\t<enclosure url=\"{}\" length=\"{}\" type=\"{}\"/>",
            enclosure.url, enclosure.length, enclosure.mime
        );
    }
    feed.push_str("\t\t</item>\n");
    Ok(())
}

/// `<tag>value</tag>` indented by `depth` tabs. `value` is written as is.
fn line(feed: &mut String, depth: usize, tag: &str, value: &str) {
    let _ = writeln!(feed, "{}<{tag}>{value}</{tag}>", "\t".repeat(depth));
}

fn optional(feed: &mut String, tag: &str, value: &str) {
    if !value.is_empty() {
        line(feed, 2, tag, &escape_html(value));
    }
}
