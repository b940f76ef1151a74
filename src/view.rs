//! HTML painting of a [`DashboardView`]
//!
//! All interpolated text goes through maud's escaping. The final report is
//! passed to the frame through `srcdoc`, so it is attribute-escaped as well.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::artifact::ArtifactKind;
use crate::dashboard::{DashboardView, Tab};
use crate::render::{Column, DisplayBlock, Expander, HotelCard, NoticeLevel};
use crate::validation::{Field, MAX_TRIP_DAYS, MIN_TRIP_DAYS, TripType};

const STYLESHEET: &str = r#"
body { font-family: sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 20rem; padding: 1.5rem; background-color: #f0f2f6; box-sizing: border-box; }
aside label { display: block; margin-top: 0.8rem; font-size: 0.9rem; }
aside input, aside select { width: 100%; box-sizing: border-box; }
main { flex: 1; padding: 1.5rem 2rem; }
.main-header { font-size: 2.5rem; color: #1E88E5; text-align: center; margin-bottom: 1rem; }
.tagline { text-align: center; }
.sub-header { font-size: 1.5rem; color: #424242; margin-bottom: 1rem; }
.card { padding: 1.5rem; border-radius: 10px; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); margin-bottom: 1rem; background-color: #f8f9fa; }
.hotel-card { border: 1px solid #e0e0e0; border-radius: 10px; padding: 1rem; margin-bottom: 1rem; }
.price-tag { background-color: #4CAF50; color: white; padding: 0.3rem 0.6rem; border-radius: 5px; font-weight: bold; }
.columns { display: flex; gap: 1rem; }
.column { flex: 1; }
.notice { padding: 0.8rem 1rem; border-radius: 5px; margin-bottom: 1rem; }
.notice-info { background-color: #e3f2fd; }
.notice-warning { background-color: #fff8e1; }
.notice-error { background-color: #ffebee; color: #b71c1c; }
.field-error { color: #b71c1c; font-size: 0.85rem; }
details.expander { border: 1px solid #e0e0e0; border-radius: 5px; padding: 0.5rem 1rem; margin-bottom: 0.5rem; }
.tabs > input { display: none; }
.tabs > label { display: inline-block; padding: 0.5rem 1rem; cursor: pointer; border-bottom: 2px solid transparent; }
.tabs > input:checked + label { border-bottom-color: #1E88E5; color: #1E88E5; }
.tab-panel { display: none; }
#tab-0:checked ~ #panel-0, #tab-1:checked ~ #panel-1, #tab-2:checked ~ #panel-2, #tab-3:checked ~ #panel-3 { display: block; }
iframe.report { width: 100%; border: 1px solid #e0e0e0; }
"#;

const COLAB_STEPS: [&str; 4] = [
    "Run the Trip Adviser search notebook in Google Colab",
    "Download the output JSON files from the Colab output directory",
    "Upload the files to this dashboard using the sidebar",
    "View the results in the respective tabs",
];

/// Paint the complete page.
#[must_use]
pub fn page(view: &DashboardView) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Trip Adviser AI" }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                (sidebar(view))
                main {
                    h1.main-header { "Trip Adviser AI" }
                    p.tagline { "Find your perfect hotel stay with AI assistance" }
                    div.tabs {
                        @for (i, tab) in view.tabs.iter().enumerate() {
                            input type="radio" name="tab" id=(format!("tab-{i}")) checked[i == 0];
                            label for=(format!("tab-{i}")) { (tab.title) }
                        }
                        @for (i, tab) in view.tabs.iter().enumerate() {
                            section.tab-panel id=(format!("panel-{i}")) {
                                (tab_panel(tab))
                            }
                        }
                    }
                    hr;
                    details.expander {
                        summary { "How to use with Google Colab" }
                        ol {
                            @for step in COLAB_STEPS {
                                li { (step) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn sidebar(view: &DashboardView) -> Markup {
    let params = &view.params;
    let selected = params.trip_type();
    let warnings_for = |field: Field| view.warnings.iter().filter(move |w| w.field == field);

    html! {
        aside {
            form method="post" action="/" enctype="multipart/form-data" {
                h2 { "Trip Parameters" }
                label for="country" { "Destination Country" }
                input id="country" type="text" name="country" value=(params.country);
                label for="city" { "Desired City" }
                input id="city" type="text" name="city" value=(params.city);

                label for="budget" { "Budget (e.g., $200-$1000)" }
                input id="budget" type="text" name="budget" value=(params.budget);
                @for warning in warnings_for(Field::Budget) {
                    p.field-error { (warning.message) }
                }
                @if let Some(range) = params.budget_range() {
                    p.hint { "Budget range: " (range.to_string()) }
                }

                label for="trip_type" { "Trip Type" }
                select id="trip_type" name="trip_type" {
                    @for trip_type in TripType::ALL {
                        option value=(trip_type.as_str()) selected[trip_type == selected] {
                            (trip_type.as_str())
                        }
                    }
                }
                @for warning in warnings_for(Field::TripType) {
                    p.field-error { (warning.message) }
                }

                label for="duration" { "Trip Duration (days)" }
                input id="duration" type="number" name="duration" min=(MIN_TRIP_DAYS) max=(MAX_TRIP_DAYS)
                    value=(params.duration);
                @for warning in warnings_for(Field::Duration) {
                    p.field-error { (warning.message) }
                }

                hr;
                h2 { "Upload Results" }
                p { "Upload JSON files from Google Colab output:" }
                @for kind in ArtifactKind::ALL {
                    label for=(kind.form_field()) { (upload_label(kind)) }
                    input id=(kind.form_field()) type="file" name=(kind.form_field())
                        accept=(upload_accept(kind));
                }
                p { button type="submit" { "Update dashboard" } }
            }
        }
    }
}

fn upload_label(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::SearchQueries => "Search Queries JSON",
        ArtifactKind::SearchResults => "Search Results JSON",
        ArtifactKind::HotelPackages => "Trip Packages JSON",
        ArtifactKind::HtmlReport => "HTML Report",
    }
}

fn upload_accept(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::HtmlReport => ".html,text/html",
        _ => ".json,application/json",
    }
}

fn tab_panel(tab: &Tab) -> Markup {
    let lines: Vec<(&str, &str)> = tab
        .blocks
        .iter()
        .filter_map(|block| match block {
            DisplayBlock::Line { label, text } => Some((label.as_str(), text.as_str())),
            _ => None,
        })
        .collect();
    let cards: Vec<&HotelCard> = tab
        .blocks
        .iter()
        .filter_map(|block| match block {
            DisplayBlock::HotelCard(card) => Some(card),
            _ => None,
        })
        .collect();

    html! {
        h2.sub-header { (tab.title) }
        @for block in &tab.blocks {
            @match block {
                DisplayBlock::Notice { level, message } => {
                    div class=(format!("notice notice-{}", notice_class(*level))) { (message) }
                },
                DisplayBlock::Expander(expander) => {
                    (expander_markup(expander))
                },
                DisplayBlock::Frame { html: report, height, scrolling } => {
                    iframe.report srcdoc=(report) height=(height)
                        style=(format!("height: {height}px;"))
                        scrolling=(if *scrolling { "yes" } else { "no" })
                        sandbox="allow-scripts allow-popups" {}
                },
                DisplayBlock::Line { .. } | DisplayBlock::HotelCard(_) => {},
            }
        }
        @if !lines.is_empty() {
            div.card {
                @for (label, text) in &lines {
                    p { b { (label) } " " (text) }
                }
            }
        }
        @if !cards.is_empty() {
            div.columns {
                @for column in [Column::Left, Column::Right] {
                    div.column {
                        @for card in cards.iter().filter(|c| c.column == column) {
                            (hotel_card(card))
                        }
                    }
                }
            }
        }
    }
}

fn notice_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    }
}

fn hotel_card(card: &HotelCard) -> Markup {
    html! {
        div.hotel-card {
            h3 { (card.hotel_name) }
            p { "📍 " (card.location) }
            p {
                span.price-tag {
                    @if card.has_price { "$" }
                    (card.price)
                }
            }
            p { "⭐ Rating: " (card.rating) "/5" }
            p { "🍽️ Meals: " (card.included_meals) }
            a href=(card.booking_url) { "Book Now" }
            @if let Some(activities) = &card.activities {
                (expander_markup(activities))
            }
        }
    }
}

fn expander_markup(expander: &Expander) -> Markup {
    let plain = expander.items.iter().all(|item| item.label.is_none());
    html! {
        details.expander {
            summary { (expander.label) }
            @if plain {
                ul {
                    @for item in &expander.items {
                        li { (item.text) }
                    }
                }
            } @else {
                @for item in &expander.items {
                    p {
                        @if let Some(label) = &item.label {
                            strong { (label) ":" } " "
                        }
                        (item.text)
                    }
                }
            }
        }
    }
}
