//! Extraction of games from BGG XML API2 responses.
//!
//! Both extractors are total: a missing element or attribute makes that
//! field absent, a missing required field drops that item, and a document
//! that is not well-formed XML yields no items at all.

use std::str::FromStr;

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use super::types::{GameRecord, GameSummary};

/// Item type BGG uses for base games (as opposed to expansions/accessories).
const BASE_GAME_TYPE: &str = "boardgame";

/// Parse a `/search` response into `(id, name)` pairs, in document order.
pub fn parse_search_response(xml: &str) -> Vec<GameSummary> {
    let Some(doc) = parse_document(xml) else {
        return Vec::new();
    };

    let summaries: Vec<GameSummary> = items(&doc).filter_map(search_item).collect();
    debug!(count = summaries.len(), "Parsed BGG search response");
    summaries
}

/// Parse a `/thing` response into full records, in document order.
///
/// Only items typed `boardgame` are kept.
pub fn parse_thing_response(xml: &str) -> Vec<GameRecord> {
    let Some(doc) = parse_document(xml) else {
        return Vec::new();
    };

    let records: Vec<GameRecord> = items(&doc)
        .filter(|item| item.attribute("type") == Some(BASE_GAME_TYPE))
        .filter_map(thing_item)
        .collect();
    debug!(count = records.len(), "Parsed BGG thing response");
    records
}

fn parse_document(xml: &str) -> Option<Document<'_>> {
    match Document::parse(xml) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(error = %e, "BGG response is not well-formed XML");
            None
        }
    }
}

fn items<'a, 'input>(doc: &'a Document<'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants().filter(|n| n.has_tag_name("item"))
}

fn search_item(item: Node) -> Option<GameSummary> {
    let upstream_id = parse_number(item.attribute("id"))?;

    // Search hits may carry an alternate name when the query matched it;
    // take the primary one when BGG sends both.
    let name = primary_name(item).or_else(|| {
        item.children()
            .find(|n| n.has_tag_name("name"))
            .and_then(|n| non_empty(n.attribute("value")))
    })?;

    Some(GameSummary { upstream_id, name })
}

fn thing_item(item: Node) -> Option<GameRecord> {
    let upstream_id = parse_number(item.attribute("id"))?;
    let name = primary_name(item)?;

    Some(GameRecord {
        upstream_id,
        name,
        year_published: parse_number(value_of(item, "yearpublished")),
        min_players: parse_number(value_of(item, "minplayers")),
        max_players: parse_number(value_of(item, "maxplayers")),
        playing_time_minutes: parse_number(value_of(item, "playingtime")),
        image_url: text_of(item, "image"),
        description: text_of(item, "description"),
    })
}

fn primary_name(item: Node) -> Option<String> {
    item.children()
        .find(|n| n.has_tag_name("name") && n.attribute("type") == Some("primary"))
        .and_then(|n| non_empty(n.attribute("value")))
}

/// The `value` attribute of the first child element named `tag`.
fn value_of<'a>(item: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    item.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.attribute("value"))
}

/// The text content of the first child element named `tag`.
fn text_of(item: Node, tag: &str) -> Option<String> {
    item.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| non_empty(n.text()))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_number<T: FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<items total="3" termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
    <item type="boardgame" id="13">
        <name type="primary" value="Catan"/>
        <yearpublished value="1995" />
    </item>
    <item type="boardgame" id="278">
        <name type="alternate" value="Catan Card Game"/>
    </item>
    <item type="boardgame" id="926">
        <name type="primary" value="Catan: Cities &amp; Knights"/>
    </item>
</items>"#;

    const THING_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
    <item type="boardgame" id="13">
        <thumbnail>https://cf.geekdo-images.com/thumb/catan.jpg</thumbnail>
        <image>https://cf.geekdo-images.com/original/catan.jpg</image>
        <name type="alternate" sortindex="1" value="Die Siedler von Catan" />
        <name type="primary" sortindex="1" value="Catan" />
        <description>Trade, build and settle.&#10;&#10;Players collect resources &amp; more.</description>
        <yearpublished value="1995" />
        <minplayers value="3" />
        <maxplayers value="4" />
        <playingtime value="120" />
        <minplaytime value="60" />
        <maxplaytime value="120" />
    </item>
</items>"#;

    #[test]
    fn test_parse_search_response() {
        let summaries = parse_search_response(SEARCH_XML);

        assert_eq!(summaries.len(), 3);
        assert_eq!(
            summaries[0],
            GameSummary {
                upstream_id: 13,
                name: "Catan".to_string()
            }
        );
        // Falls back to the only name listed
        assert_eq!(summaries[1].name, "Catan Card Game");
        // Entities decoded
        assert_eq!(summaries[2].name, "Catan: Cities & Knights");
    }

    #[test]
    fn test_parse_search_prefers_primary_name() {
        let xml = r#"<items total="1">
            <item type="boardgame" id="13">
                <name type="alternate" value="Die Siedler von Catan"/>
                <name type="primary" value="Catan"/>
            </item>
        </items>"#;

        let summaries = parse_search_response(xml);
        assert_eq!(summaries[0].name, "Catan");
    }

    #[test]
    fn test_parse_search_drops_items_missing_id_or_name() {
        let xml = r#"<items total="4">
            <item type="boardgame"><name type="primary" value="No Id"/></item>
            <item type="boardgame" id="abc"><name type="primary" value="Bad Id"/></item>
            <item type="boardgame" id="5"></item>
            <item type="boardgame" id="6"><name type="primary" value="Kept"/></item>
        </items>"#;

        let summaries = parse_search_response(xml);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].upstream_id, 6);
    }

    #[test]
    fn test_parse_search_empty_result() {
        let xml = r#"<items total="0" termsofuse="https://boardgamegeek.com/xmlapi/termsofuse"></items>"#;
        assert!(parse_search_response(xml).is_empty());
    }

    #[test]
    fn test_parse_thing_response_full_record() {
        let records = parse_thing_response(THING_XML);

        assert_eq!(records.len(), 1);
        let catan = &records[0];
        assert_eq!(catan.upstream_id, 13);
        assert_eq!(catan.name, "Catan");
        assert_eq!(catan.year_published, Some(1995));
        assert_eq!(catan.min_players, Some(3));
        assert_eq!(catan.max_players, Some(4));
        assert_eq!(catan.playing_time_minutes, Some(120));
        assert_eq!(
            catan.image_url.as_deref(),
            Some("https://cf.geekdo-images.com/original/catan.jpg")
        );
        assert_eq!(
            catan.description.as_deref(),
            Some("Trade, build and settle.\n\nPlayers collect resources & more.")
        );
    }

    #[test]
    fn test_parse_thing_missing_year_is_absent_not_zero() {
        let xml = r#"<items>
            <item type="boardgame" id="42">
                <name type="primary" value="Untitled"/>
                <minplayers value="2"/>
            </item>
        </items>"#;

        let records = parse_thing_response(xml);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year_published, None);
        assert_eq!(records[0].min_players, Some(2));
        assert_eq!(records[0].max_players, None);
        assert_eq!(records[0].image_url, None);
        assert_eq!(records[0].description, None);
    }

    #[test]
    fn test_parse_thing_non_numeric_values_are_absent() {
        let xml = r#"<items>
            <item type="boardgame" id="7">
                <name type="primary" value="Odd Data"/>
                <yearpublished value="NaN"/>
                <minplayers value=""/>
                <maxplayers value="four"/>
                <playingtime/>
            </item>
        </items>"#;

        let record = &parse_thing_response(xml)[0];
        assert_eq!(record.year_published, None);
        assert_eq!(record.min_players, None);
        assert_eq!(record.max_players, None);
        assert_eq!(record.playing_time_minutes, None);
    }

    #[test]
    fn test_parse_thing_keeps_negative_year() {
        let xml = r#"<items>
            <item type="boardgame" id="188">
                <name type="primary" value="Go"/>
                <yearpublished value="-2200"/>
            </item>
        </items>"#;

        assert_eq!(parse_thing_response(xml)[0].year_published, Some(-2200));
    }

    #[test]
    fn test_parse_thing_excludes_expansions() {
        let xml = r#"<items>
            <item type="boardgame" id="13">
                <name type="primary" value="Catan"/>
                <yearpublished value="1995"/>
            </item>
            <item type="boardgameexpansion" id="325">
                <name type="primary" value="Catan: Seafarers"/>
                <yearpublished value="1997"/>
            </item>
            <item type="boardgameaccessory" id="9999">
                <name type="primary" value="Catan Card Holder"/>
            </item>
        </items>"#;

        let records = parse_thing_response(xml);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].upstream_id, 13);
    }

    #[test]
    fn test_parse_thing_requires_primary_name() {
        let xml = r#"<items>
            <item type="boardgame" id="1">
                <name type="alternate" value="Only Alternate"/>
            </item>
            <item type="boardgame" id="2">
                <name type="primary" value="Has Primary"/>
            </item>
        </items>"#;

        let records = parse_thing_response(xml);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Has Primary");
    }

    #[test]
    fn test_parse_thing_malformed_item_does_not_abort_others() {
        let xml = r#"<items>
            <item type="boardgame"><name type="primary" value="No Id"/></item>
            <item type="boardgame" id="3"><name type="primary" value="Fine"/></item>
        </items>"#;

        let records = parse_thing_response(xml);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].upstream_id, 3);
    }

    #[test]
    fn test_parse_thing_blank_text_fields_are_absent() {
        let xml = r#"<items>
            <item type="boardgame" id="3">
                <name type="primary" value="Blank"/>
                <image>   </image>
                <description></description>
            </item>
        </items>"#;

        let record = &parse_thing_response(xml)[0];
        assert_eq!(record.image_url, None);
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse_thing_response(THING_XML), parse_thing_response(THING_XML));
        assert_eq!(parse_search_response(SEARCH_XML), parse_search_response(SEARCH_XML));
    }

    #[test]
    fn test_not_well_formed_document_yields_nothing() {
        assert!(parse_search_response("<html><body>Service Unavailable").is_empty());
        assert!(parse_thing_response("").is_empty());
    }
}
