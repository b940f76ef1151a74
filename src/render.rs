//! Artifact rendering
//!
//! Maps decoded artifacts to display blocks. Every function here is a pure,
//! single pass over its input: order is preserved and nothing is sorted,
//! filtered or deduplicated.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::artifact::{Record, defaults, display_value};

pub const NO_HOTEL_PACKAGES: &str = "No hotel packages found.";

/// Severity of a notice block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Layout column for hotel cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Left,
    Right,
}

impl Column {
    /// Cards alternate columns by index parity
    #[must_use]
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Column::Left
        } else {
            Column::Right
        }
    }
}

/// One line inside an expander, optionally labelled (`URL: ...`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpanderItem {
    pub label: Option<String>,
    pub text: String,
}

impl ExpanderItem {
    fn labelled(label: &str, text: String) -> Self {
        Self {
            label: Some(label.to_string()),
            text,
        }
    }

    fn plain(text: String) -> Self {
        Self { label: None, text }
    }
}

/// Collapsible section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expander {
    pub label: String,
    pub items: Vec<ExpanderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotelCard {
    pub column: Column,
    pub hotel_name: String,
    pub location: String,
    pub price: String,
    /// Whether `price` came from the package rather than the default
    pub has_price: bool,
    pub rating: String,
    pub included_meals: String,
    pub booking_url: String,
    pub activities: Option<Expander>,
}

/// A self-contained unit of rendered output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayBlock {
    Notice { level: NoticeLevel, message: String },
    Line { label: String, text: String },
    HotelCard(HotelCard),
    Expander(Expander),
    Frame { html: String, height: u32, scrolling: bool },
}

impl DisplayBlock {
    pub fn notice(level: NoticeLevel, message: impl Into<String>) -> Self {
        DisplayBlock::Notice {
            level,
            message: message.into(),
        }
    }
}

/// Render the hotel packages artifact as cards.
///
/// A missing artifact, an empty object, or a missing `packages` list gives a
/// single warning notice instead.
#[must_use]
pub fn render_hotel_packages(data: Option<&Map<String, Value>>) -> Vec<DisplayBlock> {
    let packages = data
        .filter(|map| !map.is_empty())
        .and_then(|map| Record::from_map(map).list("packages"));

    let Some(packages) = packages else {
        return vec![DisplayBlock::notice(NoticeLevel::Warning, NO_HOTEL_PACKAGES)];
    };

    packages
        .iter()
        .enumerate()
        .map(|(index, package)| DisplayBlock::HotelCard(hotel_card(index, Record::new(package))))
        .collect()
}

fn hotel_card(index: usize, package: Record<'_>) -> HotelCard {
    let activities = package
        .list("activities")
        .filter(|list| !list.is_empty())
        .map(|list| Expander {
            label: "Activities".to_string(),
            items: list
                .iter()
                .map(|activity| ExpanderItem::plain(display_value(activity)))
                .collect(),
        });

    HotelCard {
        column: Column::for_index(index),
        hotel_name: package.get_or("hotel_name", defaults::HOTEL_NAME),
        location: package.get_or("location", defaults::LOCATION),
        price: package.get_or("price", defaults::PRICE),
        has_price: package.get("price").is_some(),
        rating: package.get_or("rating", defaults::RATING),
        included_meals: package.get_or("included_meals", defaults::INCLUDED_MEALS),
        booking_url: booking_link(package.get_or("booking_url", defaults::BOOKING_URL)),
        activities,
    }
}

/// Keep only http(s) or relative link targets
fn booking_link(url: String) -> String {
    let target = url.trim_start();
    let scheme = target
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .filter(|scheme| !scheme.contains(['/', '?', '#']));

    match scheme {
        None => url,
        Some(scheme)
            if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
        {
            url
        }
        Some(_) => defaults::BOOKING_URL.to_string(),
    }
}

/// Render the search queries artifact as numbered lines.
#[must_use]
pub fn render_search_queries(data: &Map<String, Value>) -> Vec<DisplayBlock> {
    Record::from_map(data)
        .list("queries")
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, query)| DisplayBlock::Line {
            label: format!("Query {}:", i + 1),
            text: match query {
                Value::Null => defaults::SEARCH_QUERY.to_string(),
                other => display_value(other),
            },
        })
        .collect()
}

/// Render the search results artifact as one expander per result.
#[must_use]
pub fn render_search_results(data: &Map<String, Value>) -> Vec<DisplayBlock> {
    Record::from_map(data)
        .list("results")
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let result = Record::new(result);
            DisplayBlock::Expander(Expander {
                label: format!("{}. {}", i + 1, result.get_or("title", defaults::TITLE)),
                items: vec![
                    ExpanderItem::labelled("URL", result.get_or("url", defaults::URL)),
                    ExpanderItem::labelled("Snippet", result.get_or("snippet", defaults::SNIPPET)),
                    ExpanderItem::labelled("Score", result.get_or("score", defaults::SCORE)),
                    ExpanderItem::labelled(
                        "Search Query",
                        result.get_or("search_query", defaults::SEARCH_QUERY),
                    ),
                ],
            })
        })
        .collect()
}

/// Embed the final report verbatim in a fixed-height frame.
#[must_use]
pub fn render_html_report(html: &str, height: u32, scrolling: bool) -> Vec<DisplayBlock> {
    vec![DisplayBlock::Frame {
        html: html.to_string(),
        height,
        scrolling,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    fn cards(blocks: &[DisplayBlock]) -> Vec<&HotelCard> {
        blocks
            .iter()
            .filter_map(|b| match b {
                DisplayBlock::HotelCard(card) => Some(card),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_hotel_packages_empty_mapping_gives_single_notice() {
        let empty = Map::new();
        let blocks = render_hotel_packages(Some(&empty));
        assert_eq!(
            blocks,
            vec![DisplayBlock::notice(NoticeLevel::Warning, NO_HOTEL_PACKAGES)]
        );
    }

    #[test]
    fn test_hotel_packages_missing_data_gives_single_notice() {
        assert_eq!(render_hotel_packages(None).len(), 1);

        let no_key = object(json!({"hotels": []}));
        assert_eq!(
            render_hotel_packages(Some(&no_key)),
            vec![DisplayBlock::notice(NoticeLevel::Warning, NO_HOTEL_PACKAGES)]
        );
    }

    #[test]
    fn test_hotel_packages_empty_list_gives_no_blocks() {
        let data = object(json!({"packages": []}));
        assert!(render_hotel_packages(Some(&data)).is_empty());
    }

    #[test]
    fn test_hotel_package_without_fields_uses_defaults() {
        let data = object(json!({"packages": [{}]}));
        let blocks = render_hotel_packages(Some(&data));
        assert_eq!(
            blocks,
            vec![DisplayBlock::HotelCard(HotelCard {
                column: Column::Left,
                hotel_name: "Unknown Hotel".to_string(),
                location: "Location not specified".to_string(),
                price: "Price not available".to_string(),
                has_price: false,
                rating: "N/A".to_string(),
                included_meals: "Not specified".to_string(),
                booking_url: "#".to_string(),
                activities: None,
            })]
        );
    }

    #[test]
    fn test_hotel_package_fields_and_activities() {
        let data = object(json!({"packages": [{
            "hotel_name": "Riverside Suites",
            "location": "Bangkok, Thailand",
            "price": 450,
            "rating": 4.6,
            "included_meals": "Breakfast",
            "booking_url": "https://example.com/book/1",
            "activities": ["Temple tour", "Night market"]
        }]}));
        let blocks = render_hotel_packages(Some(&data));
        let card = cards(&blocks)[0];

        assert_eq!(card.hotel_name, "Riverside Suites");
        assert_eq!(card.price, "450");
        assert!(card.has_price);
        assert_eq!(card.rating, "4.6");
        assert_eq!(card.booking_url, "https://example.com/book/1");

        let activities = card.activities.as_ref().unwrap();
        assert_eq!(activities.label, "Activities");
        let lines: Vec<&str> = activities.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(lines, vec!["Temple tour", "Night market"]);
    }

    #[rstest]
    #[case("https://example.com/book/1", "https://example.com/book/1")]
    #[case("HTTP://example.com", "HTTP://example.com")]
    #[case("/book?id=3", "/book?id=3")]
    #[case("book/3#rooms:deluxe", "book/3#rooms:deluxe")]
    #[case("javascript:alert(document.cookie)", "#")]
    #[case("  JavaScript:alert(1)", "#")]
    #[case("data:text/html,<script>alert(1)</script>", "#")]
    fn test_booking_url_scheme_is_restricted(#[case] url: &str, #[case] expected: &str) {
        let data = object(json!({"packages": [{"booking_url": url}]}));
        let blocks = render_hotel_packages(Some(&data));
        assert_eq!(cards(&blocks)[0].booking_url, expected);
    }

    #[test]
    fn test_empty_activities_have_no_expander() {
        let data = object(json!({"packages": [{"activities": []}, {"activities": "spa"}]}));
        let blocks = render_hotel_packages(Some(&data));
        assert!(cards(&blocks).iter().all(|c| c.activities.is_none()));
    }

    #[test]
    fn test_hotel_cards_alternate_columns() {
        let data = object(json!({"packages": [
            {"hotel_name": "A"}, {"hotel_name": "B"}, {"hotel_name": "C"}, {"hotel_name": "D"}, {"hotel_name": "E"}
        ]}));
        let blocks = render_hotel_packages(Some(&data));
        let layout: Vec<(&str, Column)> = cards(&blocks)
            .iter()
            .map(|c| (c.hotel_name.as_str(), c.column))
            .collect();
        assert_eq!(
            layout,
            vec![
                ("A", Column::Left),
                ("B", Column::Right),
                ("C", Column::Left),
                ("D", Column::Right),
                ("E", Column::Left),
            ]
        );
    }

    #[test]
    fn test_search_queries_numbered_in_order() {
        let data = object(json!({"queries": ["hotels in Bangkok", "luxury spa Bangkok"]}));
        assert_eq!(
            render_search_queries(&data),
            vec![
                DisplayBlock::Line {
                    label: "Query 1:".to_string(),
                    text: "hotels in Bangkok".to_string(),
                },
                DisplayBlock::Line {
                    label: "Query 2:".to_string(),
                    text: "luxury spa Bangkok".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_search_queries_null_entry_uses_default() {
        let data = object(json!({"queries": [null, "spa Bangkok"]}));
        let texts: Vec<String> = render_search_queries(&data)
            .into_iter()
            .filter_map(|block| match block {
                DisplayBlock::Line { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["No Query", "spa Bangkok"]);
    }

    #[test]
    fn test_search_queries_missing_key() {
        assert!(render_search_queries(&Map::new()).is_empty());
    }

    #[test]
    fn test_search_results_defaults_and_numbering() {
        let data = object(json!({"results": [{"title": "A"}, {"url": "u2"}]}));
        let blocks = render_search_results(&data);
        assert_eq!(blocks.len(), 2);

        let DisplayBlock::Expander(first) = &blocks[0] else {
            panic!("expected expander");
        };
        assert_eq!(first.label, "1. A");
        let texts: Vec<&str> = first.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["No URL", "No Snippet", "N/A", "No Query"]);

        let DisplayBlock::Expander(second) = &blocks[1] else {
            panic!("expected expander");
        };
        assert_eq!(second.label, "2. No Title");
        assert_eq!(second.items[0], ExpanderItem::labelled("URL", "u2".to_string()));
        let labels: Vec<&str> = second
            .items
            .iter()
            .filter_map(|i| i.label.as_deref())
            .collect();
        assert_eq!(labels, vec!["URL", "Snippet", "Score", "Search Query"]);
    }

    #[test]
    fn test_search_results_score_is_shown_as_number() {
        let data = object(json!({"results": [{"score": 0.87}]}));
        let blocks = render_search_results(&data);
        let DisplayBlock::Expander(result) = &blocks[0] else {
            panic!("expected expander");
        };
        assert_eq!(result.items[2].text, "0.87");
    }

    #[test]
    fn test_html_report_frame() {
        assert_eq!(
            render_html_report("<p>done</p>", 600, true),
            vec![DisplayBlock::Frame {
                html: "<p>done</p>".to_string(),
                height: 600,
                scrolling: true,
            }]
        );
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let data = object(json!({
            "packages": [{"hotel_name": "A", "activities": ["x"]}, {"price": "99"}],
            "results": [{"title": "t"}],
            "queries": ["q"]
        }));
        assert_eq!(
            render_hotel_packages(Some(&data)),
            render_hotel_packages(Some(&data))
        );
        assert_eq!(render_search_results(&data), render_search_results(&data));
        assert_eq!(
            serde_json::to_string(&render_search_queries(&data)).unwrap(),
            serde_json::to_string(&render_search_queries(&data)).unwrap()
        );
    }
}
