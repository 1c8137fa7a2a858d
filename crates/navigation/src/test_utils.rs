//! Test fixtures: a small copy of the site markup
//!
//! Two categories: `coding` with two openable items and `music` with one
//! openable item plus an item (`bare`) that has no detail payload.

use page_dom::{Document, El, NodeId, Window};

use crate::markup::{controls, grid, views};

/// Fixture category ids
pub mod categories {
    /// Default fallback category
    pub const CODING: &str = "coding";
    /// Second category
    pub const MUSIC: &str = "music";
}

fn code_block(source: &str) -> El {
    El::div().class("code-container").children([
        El::new("button").class("copy-btn").text("Copy"),
        El::new("pre").child(El::new("code").text(source)),
    ])
}

fn item(key: &str, title: &str, payload: Option<El>) -> El {
    let preview = El::div().class(grid::PREVIEW).children([
        El::div().class(grid::IMAGE).child(El::new("img").attr("src", &format!("/img/{key}.png"))),
        El::div()
            .class(grid::DETAILS)
            .child(El::new("h3").class(grid::TITLE).text(title)),
    ]);
    let mut el = El::div()
        .class(grid::ITEM)
        .attr(controls::DATA_CATEGORY, key)
        .child(preview);
    if let Some(payload) = payload {
        el = el.child(El::div().class(grid::EXPANDED_CONTENT).child(payload));
    }
    el
}

fn payload(text: &str, image: &str, source: &str) -> El {
    El::div().children([
        El::new("p").text(text),
        El::new("img").class("post-image").attr("src", image),
        code_block(source),
    ])
}

fn category_page(id: &str, title: &str, items: Vec<El>) -> El {
    El::div()
        .id(&format!("{id}{}", views::CATEGORY_ID_SUFFIX))
        .class(views::CATEGORY)
        .style("display", "none")
        .children([
            El::new("button").class(controls::BACK_BUTTON).text("Back"),
            El::new("h2").class(views::CATEGORY_TITLE).text(title),
            El::div().class(grid::GRID).children(items),
        ])
}

/// Markup of the whole site, home visible, no overlay yet
pub fn site_document() -> Document {
    let mut doc = Document::new();
    let body = doc.body();

    doc.build(
        body,
        El::new("header").children([
            El::new("a").id(controls::HOME_LINK_ID).text("LogovoDushnil"),
            El::new("input").id("theme-toggle").attr("type", "checkbox"),
            El::new("nav").children([
                El::new("a")
                    .class(controls::NAV_ITEM)
                    .attr(controls::DATA_PAGE, controls::PAGE_HOME)
                    .text("Home"),
                El::new("a")
                    .class(controls::NAV_ITEM)
                    .attr(controls::DATA_PAGE, controls::PAGE_FEED)
                    .text("Feed"),
            ]),
        ]),
    );

    doc.build(
        body,
        El::div().class(views::MAIN_CONTENT).children([
            El::div().class(views::HOME).children([
                El::new("h1").text("Welcome"),
                El::new("img").class("post-image").attr("src", "/img/banner.png"),
                code_block("cargo run"),
            ]),
            El::div().class(views::FEED).style("display", "none").children([
                El::div()
                    .class(controls::CATEGORY_ITEM)
                    .attr(controls::DATA_CATEGORY, categories::CODING)
                    .text("Coding"),
                El::div()
                    .class(controls::CATEGORY_ITEM)
                    .attr(controls::DATA_CATEGORY, categories::MUSIC)
                    .text("Music"),
            ]),
            category_page(
                categories::CODING,
                "Coding",
                vec![
                    item("1", "First post", Some(payload("Hello", "/img/one.png", "fn main() {}"))),
                    item("2", "Second post", Some(payload("Again", "/img/two.png", "let x = 2;"))),
                ],
            ),
            category_page(
                categories::MUSIC,
                "Music",
                vec![
                    item("1", "Playlist", Some(payload("Tracks", "/img/tracks.png", "play()"))),
                    item("bare", "Nothing inside", None),
                ],
            ),
        ]),
    );

    doc.build(
        body,
        El::new("nav").class("mobile-nav").children(["home", "feed", "search", "profile"].map(|page| {
            El::new("a").class("mobile-nav-item").attr(controls::DATA_PAGE, page).text(page)
        })),
    );

    doc
}

/// The fixture site opened at `fragment`
pub fn site_window(fragment: &str) -> Window {
    Window::new(site_document(), fragment)
}

/// Item `key` of category `category`
///
/// # Panics
///
/// Panics when the fixture has no such item.
pub fn item_node(doc: &Document, category: &str, key: &str) -> NodeId {
    find_item(doc, category, key).unwrap_or_else(|| panic!("fixture has no item {category}/{key}"))
}

/// Item `key` of category `category`, if present
pub fn find_item(doc: &Document, category: &str, key: &str) -> Option<NodeId> {
    let page = doc.get_element_by_id(&format!("{category}{}", views::CATEGORY_ID_SUFFIX))?;
    doc.query_class_attr(page, grid::ITEM, controls::DATA_CATEGORY, key)
        .into_iter()
        .next()
}
