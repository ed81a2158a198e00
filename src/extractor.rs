//! Turns one agenda page into an [`Event`] and its [`Contribution`]s.
//!
//! Missing markup never fails extraction: absent fields become empty strings
//! or the sentinels defined on [`Contribution`].

use tracing::debug;

use crate::constants::PDF_EXTENSION;
use crate::markup::{Node, Page, Query};
use crate::normalize::{normalize_date, strip_bracketed, strip_parens_chars, strip_title_artifacts};
use crate::types::{Contribution, Event};

const EVENT_TITLE: Query = Query::tag("h1").with_attr("itemprop", "name");
const EVENT_DATE: Query = Query::tag("time").with_attr("itemprop", "startDate");
const CONTRIBUTION_ITEM: Query =
    Query::tag("li").with_classes(&["timetable-item", "timetable-contrib"]);
const CONTRIBUTION_TITLE: Query = Query::tag("span").with_classes(&["timetable-title"]);
const SPEAKER_LIST: Query = Query::tag("div").with_classes(&["speaker-list"]);
const SPEAKER_LABEL: Query = Query::tag("span");
const AFFILIATION: Query = Query::tag("span").with_classes(&["affiliation"]);
const ATTACHMENTS: Query = Query::tag("div").with_classes(&["js-attachment-container"]);
const LINK: Query = Query::tag("a").having("href");
const PREVIOUS_EVENT: Query = Query::tag("a").with_classes(&["icon-prev"]).having("href");

/// The speaker list starts with a role label; the name is the second span.
const SPEAKER_NAME_INDEX: usize = 1;

/// Everything extracted from a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub event: Event,
    pub contributions: Vec<Contribution>,
}

pub struct Extractor {
    origin: String,
}

impl Extractor {
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// Extract the event, its contributions and the link to the older event.
    ///
    /// `page_url` is the address the page was served from and becomes the event URL.
    pub fn extract(&self, page: &Page, page_url: &str) -> ExtractedPage {
        let title = page.find(&EVENT_TITLE).map(|n| n.text()).unwrap_or_default();
        let date = page
            .find(&EVENT_DATE)
            .map(|n| normalize_date(&n.text()))
            .unwrap_or_default();
        let previous_link = page
            .find(&PREVIOUS_EVENT)
            .and_then(|n| n.attr("href"))
            .map(|href| self.resolve(href));

        let contributions: Vec<Contribution> = page
            .find_all(&CONTRIBUTION_ITEM)
            .iter()
            .map(|item| self.contribution(item))
            .collect();
        debug!(
            url = page_url,
            contributions = contributions.len(),
            has_previous = previous_link.is_some(),
            "Extracted page"
        );

        ExtractedPage {
            event: Event {
                title,
                url: page_url.to_string(),
                date,
                previous_link,
            },
            contributions,
        }
    }

    fn contribution(&self, item: &Node<'_>) -> Contribution {
        let title = item
            .find(&CONTRIBUTION_TITLE)
            .map(|n| strip_title_artifacts(&n.text()))
            .unwrap_or_default();
        let mut contribution = Contribution::new(title);

        if let Some(speakers) = item.find(&SPEAKER_LIST) {
            if let Some(name) = speakers.find_all(&SPEAKER_LABEL).get(SPEAKER_NAME_INDEX) {
                contribution.speaker = strip_bracketed(&name.text());
            }
            if let Some(affiliation) = speakers.find(&AFFILIATION) {
                contribution.institution = strip_parens_chars(&affiliation.text());
            }
        }

        contribution.attachment_url = self.attachment(item);
        contribution
    }

    /// The attachment box's first link, kept only when it points at a PDF
    fn attachment(&self, item: &Node<'_>) -> Option<String> {
        let href = item.find(&ATTACHMENTS)?.find(&LINK)?.attr("href")?;
        href.ends_with(PDF_EXTENSION).then(|| self.resolve(href))
    }

    /// Make a link from the page absolute by prefixing the site origin.
    pub fn resolve(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }
        if href.starts_with('/') {
            format!("{}{}", self.origin, href)
        } else {
            format!("{}/{}", self.origin, href)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://agenda.infn.it";
    const URL: &str = "https://agenda.infn.it/event/44949/";

    fn extract(html: &str) -> ExtractedPage {
        Extractor::new(ORIGIN).extract(&Page::parse(html), URL)
    }

    fn contribution_page(items: &str) -> String {
        format!(
            r#"<html><body>
                <h1 itemprop="name">Detector meeting</h1>
                <time itemprop="startDate">Thursday Sep 26, 2024, 2:00 PM</time>
                <ul>{items}</ul>
                <a class="icon-prev" href="/event/44800/">Older event</a>
            </body></html>"#
        )
    }

    #[test]
    fn test_event_metadata() {
        let page = extract(&contribution_page(""));
        assert_eq!(page.event.title, "Detector meeting");
        assert_eq!(page.event.url, URL);
        assert_eq!(page.event.date, "2024-09-26 14:00");
        assert_eq!(
            page.event.previous_link.as_deref(),
            Some("https://agenda.infn.it/event/44800/")
        );
        assert!(page.contributions.is_empty());
    }

    #[test]
    fn test_missing_event_markup_gives_empty_fields() {
        let page = extract("<html><body><p>Nothing here</p></body></html>");
        assert_eq!(page.event.title, "");
        assert_eq!(page.event.date, "");
        assert_eq!(page.event.previous_link, None);
        assert!(page.contributions.is_empty());
    }

    #[test]
    fn test_full_contribution() {
        let page = extract(&contribution_page(
            r#"<li class="timetable-item timetable-contrib">
                 <span class="timetable-title">Calibration status¶</span>
                 <div class="speaker-list">
                   <span>Speaker:</span>
                   <span>Mario Rossi (INFN)</span>
                   <span class="affiliation">(INFN Bologna)</span>
                 </div>
                 <div class="js-attachment-container">
                   <a href="/event/44949/contributions/1/attachments/2/slides.pdf">slides</a>
                 </div>
               </li>"#,
        ));
        assert_eq!(page.contributions.len(), 1);
        let c = &page.contributions[0];
        assert_eq!(c.title, "Calibration status");
        assert_eq!(c.speaker, "Mario Rossi");
        assert_eq!(c.institution, "INFN Bologna");
        assert_eq!(
            c.attachment_url.as_deref(),
            Some("https://agenda.infn.it/event/44949/contributions/1/attachments/2/slides.pdf")
        );
    }

    #[test]
    fn test_contribution_without_optional_markup() {
        let page = extract(&contribution_page(
            r#"<li class="timetable-item timetable-contrib"></li>"#,
        ));
        let c = &page.contributions[0];
        assert_eq!(c.title, "");
        assert_eq!(c.speaker, Contribution::NOT_AVAILABLE);
        assert_eq!(c.institution, Contribution::NOT_AVAILABLE);
        assert_eq!(c.attachment_or_sentinel(), Contribution::NO_ATTACHMENT);
    }

    #[test]
    fn test_single_speaker_span_keeps_sentinel() {
        let page = extract(&contribution_page(
            r#"<li class="timetable-item timetable-contrib">
                 <div class="speaker-list"><span>Speaker:</span></div>
               </li>"#,
        ));
        let c = &page.contributions[0];
        assert_eq!(c.speaker, Contribution::NOT_AVAILABLE);
        assert_eq!(c.institution, Contribution::NOT_AVAILABLE);
    }

    #[test]
    fn test_non_pdf_attachment_is_ignored() {
        let page = extract(&contribution_page(
            r#"<li class="timetable-item timetable-contrib">
                 <div class="js-attachment-container">
                   <a href="/event/1/attachments/slides.pptx">slides</a>
                 </div>
               </li>"#,
        ));
        assert_eq!(page.contributions[0].attachment_url, None);
        assert_eq!(page.contributions[0].attachment_or_sentinel(), "no PDF");
    }

    #[test]
    fn test_only_first_attachment_link_is_considered() {
        let page = extract(&contribution_page(
            r#"<li class="timetable-item timetable-contrib">
                 <div class="js-attachment-container">
                   <a href="/a/slides.pptx">slides</a>
                   <a href="/a/talk.pdf">talk</a>
                 </div>
               </li>"#,
        ));
        assert_eq!(page.contributions[0].attachment_url, None);
        assert_eq!(
            page.contributions[0].attachment_or_sentinel(),
            Contribution::NO_ATTACHMENT
        );
    }

    #[test]
    fn test_first_attachment_link_without_href_is_skipped() {
        let page = extract(&contribution_page(
            r#"<li class="timetable-item timetable-contrib">
                 <div class="js-attachment-container">
                   <a class="toggle">files</a>
                   <a href="/a/talk.pdf">talk</a>
                 </div>
               </li>"#,
        ));
        assert_eq!(
            page.contributions[0].attachment_url.as_deref(),
            Some("https://agenda.infn.it/a/talk.pdf")
        );
    }

    #[test]
    fn test_contribution_items_may_carry_extra_classes() {
        let page = extract(&contribution_page(
            r#"<li class="timetable-item timetable-contrib highlighted">
                 <span class="timetable-title">Flagged</span>
               </li>"#,
        ));
        assert_eq!(page.contributions.len(), 1);
        assert_eq!(page.contributions[0].title, "Flagged");
    }

    #[test]
    fn test_contributions_keep_markup_order() {
        let page = extract(&contribution_page(
            r#"<li class="timetable-item timetable-contrib"><span class="timetable-title">One</span></li>
               <li class="timetable-item timetable-break"><span class="timetable-title">Coffee</span></li>
               <li class="timetable-item timetable-contrib"><span class="timetable-title">Two</span></li>
               <li class="timetable-item timetable-contrib"><span class="timetable-title">Three</span></li>"#,
        ));
        let titles: Vec<_> = page.contributions.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_resolve() {
        let extractor = Extractor::new("https://agenda.infn.it/");
        assert_eq!(
            extractor.resolve("/event/1/"),
            "https://agenda.infn.it/event/1/"
        );
        assert_eq!(
            extractor.resolve("event/1/"),
            "https://agenda.infn.it/event/1/"
        );
        assert_eq!(
            extractor.resolve("https://indico.cern.ch/event/9/"),
            "https://indico.cern.ch/event/9/"
        );
    }
}
