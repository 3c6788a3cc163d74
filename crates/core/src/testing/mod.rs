//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the catalog and store
//! traits, allowing the search flow and the HTTP layer to be tested without
//! network access or a database file.
//!
//! # Example
//!
//! ```rust,ignore
//! use meeplelog_core::testing::{fixtures, MockBoardGameCatalog, MockGameStore};
//!
//! let catalog = MockBoardGameCatalog::new();
//! catalog.add_record(fixtures::catan()).await;
//!
//! let store = MockGameStore::new();
//! store.set_unavailable(true);
//!
//! // Use in GameSearchService...
//! ```

mod mock_catalog;
mod mock_game_store;

pub use mock_catalog::{MockBoardGameCatalog, RecordedCall};
pub use mock_game_store::MockGameStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::bgg::GameRecord;

    /// Create a game record with typical metadata.
    pub fn game_record(upstream_id: u64, name: &str) -> GameRecord {
        GameRecord {
            upstream_id,
            name: name.to_string(),
            year_published: Some(2000),
            min_players: Some(2),
            max_players: Some(4),
            playing_time_minutes: Some(60),
            image_url: Some(format!("https://cf.geekdo-images.com/{}.jpg", upstream_id)),
            description: Some(format!("{} is a board game.", name)),
        }
    }

    /// The Settlers of Catan, BGG id 13.
    pub fn catan() -> GameRecord {
        GameRecord {
            upstream_id: 13,
            name: "Catan".to_string(),
            year_published: Some(1995),
            min_players: Some(3),
            max_players: Some(4),
            playing_time_minutes: Some(120),
            image_url: Some("https://cf.geekdo-images.com/original/catan.jpg".to_string()),
            description: Some("Trade, build and settle.".to_string()),
        }
    }

    /// Build a BGG `search` response listing `games` as boardgame hits.
    pub fn search_response_xml(games: &[(u64, &str)]) -> String {
        let items: String = games
            .iter()
            .map(|(id, name)| {
                format!(
                    r#"<item type="boardgame" id="{}"><name type="primary" value="{}"/></item>"#,
                    id,
                    escape_xml(name)
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?><items total="{}">{}</items>"#,
            games.len(),
            items
        )
    }

    /// Build one BGG `thing` item element for `record`.
    pub fn thing_item_xml(record: &GameRecord) -> String {
        let mut xml = format!(r#"<item type="boardgame" id="{}">"#, record.upstream_id);
        if let Some(image) = &record.image_url {
            xml.push_str(&format!("<image>{}</image>", escape_xml(image)));
        }
        xml.push_str(&format!(
            r#"<name type="primary" sortindex="1" value="{}"/>"#,
            escape_xml(&record.name)
        ));
        if let Some(description) = &record.description {
            xml.push_str(&format!(
                "<description>{}</description>",
                escape_xml(description)
            ));
        }
        let numbers = [
            ("yearpublished", record.year_published.map(i64::from)),
            ("minplayers", record.min_players.map(i64::from)),
            ("maxplayers", record.max_players.map(i64::from)),
            ("playingtime", record.playing_time_minutes.map(i64::from)),
        ];
        for (tag, value) in numbers {
            if let Some(value) = value {
                xml.push_str(&format!(r#"<{} value="{}"/>"#, tag, value));
            }
        }
        xml.push_str("</item>");
        xml
    }

    /// Build a BGG `thing` response containing `records`.
    pub fn thing_response_xml(records: &[GameRecord]) -> String {
        let items: String = records.iter().map(thing_item_xml).collect();
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?><items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">{}</items>"#,
            items
        )
    }

    fn escape_xml(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }
}
