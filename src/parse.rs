use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result, ENTRIES_PER_PAGE};

/// Marks the entry describing the app itself rather than a review.
const APP_METADATA_MARKER: &str = "im:name";

/// One normalized review row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    pub review_id: String,
    pub title: String,
    /// Raw `updated` label, not parsed.
    pub date: String,
    /// ISO alpha-3 code, `None` when the storefront name didn't resolve.
    pub country: Option<String>,
    pub author: String,
    pub author_url: String,
    pub version: String,
    pub rating: String,
    pub review: String,
    pub vote_count: String,
    pub page: u32,
}

/// What a successfully fetched page turned out to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// The feed object had no entries at all.
    NoEntries,
    /// Review rows, possibly none if every entry was app metadata.
    Records(Vec<ReviewRecord>),
}

/// A decoded feed document, as returned by the feed client.
#[derive(Debug, Clone)]
pub struct FeedPage(Value);

impl FeedPage {
    pub fn new(doc: Value) -> Self {
        Self(doc)
    }

    /// Extracts every review entry on the page, tagging each with `page` and `country`.
    /// The first malformed review entry fails the whole page.
    pub fn extract(&self, page: u32, country: Option<&str>) -> Result<PageContent> {
        let entries = match self.entries()? {
            Some(entries) => entries,
            None => return Ok(PageContent::NoEntries),
        };

        let mut records = Vec::with_capacity(ENTRIES_PER_PAGE.min(entries.len()));
        for entry in entries {
            let entry = entry
                .as_object()
                .ok_or_else(|| Error::UnexpectedShape("feed.entry[]".into()))?;
            if is_app_metadata(entry) {
                continue;
            }
            records.push(extract_record(entry, page, country)?);
        }
        Ok(PageContent::Records(records))
    }

    /// `None` when the feed carries no entries. A lone entry object counts as a list of one.
    fn entries(&self) -> Result<Option<Vec<&Value>>> {
        let feed = self
            .0
            .get("feed")
            .ok_or_else(|| Error::MissingField("feed".into()))?
            .as_object()
            .ok_or_else(|| Error::UnexpectedShape("feed".into()))?;

        match feed.get("entry") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(list)) if list.is_empty() => Ok(None),
            Some(Value::Array(list)) => Ok(Some(list.iter().collect())),
            Some(Value::Object(obj)) if obj.is_empty() => Ok(None),
            Some(single @ Value::Object(_)) => Ok(Some(vec![single])),
            Some(_) => Err(Error::UnexpectedShape("feed.entry".into())),
        }
    }
}

/// Only a non-empty marker counts; `{}`, `""`, `false` and `0` leave the entry a review.
fn is_app_metadata(entry: &Map<String, Value>) -> bool {
    match entry.get(APP_METADATA_MARKER) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(list)) => !list.is_empty(),
        Some(Value::Object(obj)) => !obj.is_empty(),
    }
}

fn extract_record(
    entry: &Map<String, Value>,
    page: u32,
    country: Option<&str>,
) -> Result<ReviewRecord> {
    Ok(ReviewRecord {
        review_id: label(entry, &["id"])?,
        title: label(entry, &["title"])?,
        date: label(entry, &["updated"])?,
        country: country.map(str::to_owned),
        author: label(entry, &["author", "name"])?,
        author_url: label(entry, &["author", "uri"])?,
        version: label(entry, &["im:version"])?,
        rating: label(entry, &["im:rating"])?,
        review: label(entry, &["content"])?,
        vote_count: label(entry, &["im:voteCount"])?,
        page,
    })
}

/// Walks `path` down from `entry` and returns the `label` found there.
fn label(entry: &Map<String, Value>, path: &[&str]) -> Result<String> {
    let mut node = entry;
    let mut walked = String::new();
    for key in path {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(key);

        node = node
            .get(*key)
            .ok_or_else(|| Error::MissingField(walked.clone()))?
            .as_object()
            .ok_or_else(|| Error::UnexpectedShape(walked.clone()))?;
    }

    if !walked.is_empty() {
        walked.push('.');
    }
    walked.push_str("label");
    match node.get("label") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(Error::UnexpectedShape(walked)),
        None => Err(Error::MissingField(walked)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn review_entry(id: &str) -> Value {
        json!({
            "id": { "label": id },
            "title": { "label": format!("Title {id}") },
            "updated": { "label": "2019-03-01T10:15:00-07:00" },
            "author": {
                "name": { "label": "Jane" },
                "uri": { "label": "https://itunes.apple.com/us/reviews/id1" }
            },
            "im:version": { "label": "5.2.1" },
            "im:rating": { "label": "5" },
            "im:voteCount": { "label": "0" },
            "content": { "label": "Works great" }
        })
    }

    fn app_entry() -> Value {
        json!({
            "im:name": { "label": "TouchRetouch" },
            "id": { "label": "https://itunes.apple.com/us/app/id373311252" }
        })
    }

    fn page_of(entries: Value) -> FeedPage {
        FeedPage::new(json!({ "feed": { "entry": entries } }))
    }

    #[test]
    fn extracts_every_field() {
        let page = page_of(json!([review_entry("42")]));
        let PageContent::Records(records) = page.extract(3, Some("USA")).unwrap() else {
            panic!("expected records");
        };
        assert_eq!(
            records,
            vec![ReviewRecord {
                review_id: "42".into(),
                title: "Title 42".into(),
                date: "2019-03-01T10:15:00-07:00".into(),
                country: Some("USA".into()),
                author: "Jane".into(),
                author_url: "https://itunes.apple.com/us/reviews/id1".into(),
                version: "5.2.1".into(),
                rating: "5".into(),
                review: "Works great".into(),
                vote_count: "0".into(),
                page: 3,
            }]
        );
    }

    #[test]
    fn skips_app_metadata_entries() {
        let page = page_of(json!([app_entry(), review_entry("1"), review_entry("2")]));
        let PageContent::Records(records) = page.extract(1, None).unwrap() else {
            panic!("expected records");
        };
        let ids: Vec<_> = records.iter().map(|r| r.review_id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert!(records.iter().all(|r| r.country.is_none()));
    }

    #[test]
    fn empty_marker_is_not_app_metadata() {
        let mut blank_object = review_entry("1");
        blank_object[APP_METADATA_MARKER] = json!({});
        let mut blank_string = review_entry("2");
        blank_string[APP_METADATA_MARKER] = json!("");
        let mut null_marker = review_entry("3");
        null_marker[APP_METADATA_MARKER] = Value::Null;

        let page = page_of(json!([blank_object, blank_string, null_marker]));
        let PageContent::Records(records) = page.extract(1, None).unwrap() else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn empty_marker_entry_without_review_fields_fails_the_page() {
        let page = page_of(json!([
            review_entry("1"),
            { "im:name": {}, "id": { "label": "app" } }
        ]));
        assert!(matches!(
            page.extract(1, None),
            Err(Error::MissingField(path)) if path == "title.label"
        ));
    }

    #[test]
    fn metadata_only_page_has_no_records() {
        let page = page_of(json!([app_entry()]));
        assert_eq!(
            page.extract(1, Some("USA")).unwrap(),
            PageContent::Records(vec![])
        );
    }

    #[test]
    fn missing_or_empty_entry_means_no_entries() {
        let no_entry = FeedPage::new(json!({ "feed": { "author": {} } }));
        assert_eq!(no_entry.extract(1, None).unwrap(), PageContent::NoEntries);
        assert_eq!(
            page_of(json!([])).extract(1, None).unwrap(),
            PageContent::NoEntries
        );
        assert_eq!(
            page_of(Value::Null).extract(1, None).unwrap(),
            PageContent::NoEntries
        );
    }

    #[test]
    fn single_entry_object_is_a_list_of_one() {
        let page = page_of(review_entry("7"));
        let PageContent::Records(records) = page.extract(2, None).unwrap() else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].review_id, "7");
    }

    #[test]
    fn numeric_labels_are_kept_as_text() {
        let mut entry = review_entry("9");
        entry["im:rating"] = json!({ "label": 4 });
        let PageContent::Records(records) = page_of(json!([entry])).extract(1, None).unwrap()
        else {
            panic!("expected records");
        };
        assert_eq!(records[0].rating, "4");
    }

    #[test]
    fn one_malformed_entry_fails_the_page() {
        let mut broken = review_entry("2");
        broken["author"].as_object_mut().unwrap().remove("uri");
        let page = page_of(json!([review_entry("1"), broken]));
        match page.extract(1, None) {
            Err(Error::MissingField(path)) => assert_eq!(path, "author.uri"),
            other => panic!("expected missing field, got {other:?}"),
        }
    }

    #[test]
    fn missing_label_is_malformed() {
        let mut broken = review_entry("2");
        broken["content"] = json!({});
        match page_of(json!([broken])).extract(1, None) {
            Err(Error::MissingField(path)) => assert_eq!(path, "content.label"),
            other => panic!("expected missing field, got {other:?}"),
        }
    }

    #[test]
    fn wrong_shapes_are_malformed() {
        let mut broken = review_entry("2");
        broken["author"] = json!("Jane");
        assert!(matches!(
            page_of(json!([broken])).extract(1, None),
            Err(Error::UnexpectedShape(path)) if path == "author"
        ));
        assert!(matches!(
            FeedPage::new(json!({ "other": 1 })).extract(1, None),
            Err(Error::MissingField(path)) if path == "feed"
        ));
        assert!(matches!(
            page_of(json!("nope")).extract(1, None),
            Err(Error::UnexpectedShape(_))
        ));
    }
}
