//! Site Flow Tests
//!
//! End-to-end runs of the booted site: browsing, the overlay with its
//! widgets, history and the persisted theme.

use logovo::{Handled, Site, SiteConfig};
use navigation::markup::{controls, grid, overlay};
use navigation::test_utils::{categories, item_node, site_document, site_window};
use navigation::{TransitionOutcome, ViewKey};
use page_dom::NodeId;
use std::sync::Arc;
use std::time::Duration;
use storage::{KvConfig, KvStore};
use tempfile::TempDir;
use widgets::copy::{CODE_CONTAINER, COPY_BUTTON, DEFAULT_COPIED_LABEL};
use widgets::lightbox::POST_IMAGE;
use widgets::{MemoryClipboard, MobileTab};

fn boot(fragment: &str) -> Site {
    logovo::init_tracing();
    Site::boot(site_document(), fragment, SiteConfig::default()).unwrap()
}

fn visible(site: &Site) -> Vec<ViewKey> {
    site.coordinator().registry().visible_views(site.document())
}

fn menu_entry(site: &Site, page: &str) -> NodeId {
    site.coordinator().registry().menu_entry(site.document(), page).unwrap()
}

fn category_tile(site: &Site, id: &str) -> NodeId {
    let doc = site.document();
    doc.query_class_attr(doc.body(), controls::CATEGORY_ITEM, controls::DATA_CATEGORY, id)
        .into_iter()
        .next()
        .unwrap()
}

fn overlay_part(site: &Site, class: &str) -> NodeId {
    let doc = site.document();
    let overlay = site.coordinator().registry().overlay(doc).unwrap();
    doc.first_with_class(overlay, class).unwrap()
}

fn mobile_tab(site: &Site, page: &str) -> NodeId {
    let doc = site.document();
    doc.query_class_attr(doc.body(), "mobile-nav-item", controls::DATA_PAGE, page)
        .into_iter()
        .next()
        .unwrap()
}

/// Boot at the home view
#[test]
fn test_boot_at_home() {
    let mut site = boot("");
    site.run_until_idle();

    assert_eq!(visible(&site), vec![ViewKey::Home]);
    assert_eq!(site.mobile_tab(), Some(MobileTab::Home));
    assert_eq!(site.document().title(), "LogovoDushnil");
    assert!(site.coordinator().registry().overlay(site.document()).is_some());
    assert!(!site.coordinator().lock().is_held());
}

/// Feed, category, item, copy, lightbox and Escape in one visit
#[tokio::test]
async fn test_browse_open_copy_and_dismiss() {
    logovo::init_tracing();
    let clipboard = Arc::new(MemoryClipboard::new());
    let mut site = Site::with_parts(
        site_window(""),
        SiteConfig::default(),
        KvStore::in_memory().unwrap(),
        clipboard.clone(),
    );
    site.run_until_idle();

    // Home -> feed
    let feed = menu_entry(&site, "feed");
    assert_eq!(
        site.click(feed).await.unwrap(),
        Handled::Navigation(TransitionOutcome::Started)
    );
    site.run_until_idle();
    assert_eq!(site.window().location_hash(), "#list");
    assert_eq!(site.mobile_tab(), Some(MobileTab::Feed));

    // Feed -> coding
    let tile = category_tile(&site, categories::CODING);
    site.click(tile).await.unwrap();
    site.run_until_idle();
    assert_eq!(site.window().location_hash(), "#category/coding");
    assert_eq!(visible(&site), vec![ViewKey::Category(categories::CODING.to_string())]);

    // Open the first post
    let item = item_node(site.document(), categories::CODING, "1");
    let preview = site.document().first_with_class(item, grid::PREVIEW).unwrap();
    site.click(preview).await.unwrap();
    site.run_until_idle();
    assert_eq!(site.window().location_hash(), "#item/coding/1");
    assert!(site.coordinator().overlay().is_active(site.document()));

    // Copy buttons inside projected content are live
    let content = overlay_part(&site, overlay::CONTENT);
    let button = site.document().first_with_class(content, COPY_BUTTON).unwrap();
    assert_eq!(site.click(button).await.unwrap(), Handled::Copy);
    assert_eq!(clipboard.contents().as_deref(), Some("fn main() {}"));
    assert_eq!(site.document().text_content(button), DEFAULT_COPIED_LABEL);
    assert!(site.document().closest(button, CODE_CONTAINER).is_some());

    // So are its images
    let image = site.document().first_with_class(content, POST_IMAGE).unwrap();
    assert_eq!(site.click(image).await.unwrap(), Handled::Lightbox);
    site.advance(Duration::from_millis(20));
    assert!(site.lightbox_shown());

    // Escape closes the lightbox and the overlay together
    assert!(site.key_down("Escape"));
    site.run_until_idle();
    assert!(!site.lightbox_shown());
    assert!(!site.coordinator().overlay().is_active(site.document()));
    assert_eq!(site.window().location_hash(), "#category/coding");
    assert_eq!(site.document().text_content(button), "Copy");
    assert!(!site.coordinator().lock().is_held());
}

/// Mobile tabs navigate and history walks back and forth
#[tokio::test]
async fn test_mobile_tab_then_history() {
    let mut site = boot("");
    site.run_until_idle();

    let feed = mobile_tab(&site, "feed");
    assert_eq!(
        site.click(feed).await.unwrap(),
        Handled::MobileTab(MobileTab::Feed, TransitionOutcome::Started)
    );
    site.run_until_idle();
    assert_eq!(visible(&site), vec![ViewKey::Feed]);

    let search = mobile_tab(&site, "search");
    assert_eq!(
        site.click(search).await.unwrap(),
        Handled::MobileTab(MobileTab::Search, TransitionOutcome::Ignored)
    );
    assert_eq!(visible(&site), vec![ViewKey::Feed]);

    assert!(site.back().started());
    site.run_until_idle();
    assert_eq!(visible(&site), vec![ViewKey::Home]);
    assert_eq!(site.mobile_tab(), Some(MobileTab::Home));

    assert!(site.forward().started());
    site.run_until_idle();
    assert_eq!(visible(&site), vec![ViewKey::Feed]);
    assert_eq!(site.forward(), TransitionOutcome::Ignored);
}

/// Clicks on nothing bound fall through
#[tokio::test]
async fn test_unbound_click() {
    let mut site = boot("");
    let body = site.document().body();
    assert_eq!(site.click(body).await.unwrap(), Handled::Nothing);
}

/// The theme choice survives a reload
#[test]
fn test_theme_survives_reload() {
    logovo::init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs").to_string_lossy().into_owned();
    let open = || KvStore::new(KvConfig::new(&path).flush_every_ms(None)).unwrap();

    {
        let mut site = Site::with_parts(
            site_window(""),
            SiteConfig::default(),
            open(),
            Arc::new(MemoryClipboard::new()),
        );
        site.change_theme(true).unwrap();
    }

    let site = Site::with_parts(
        site_window(""),
        SiteConfig::default(),
        open(),
        Arc::new(MemoryClipboard::new()),
    );
    let body = site.document().body();
    assert!(site.document().has_class(body, "light-theme"));
}

/// A deep link settles on the tokio clock
#[tokio::test(start_paused = true)]
async fn test_deep_link_on_paused_clock() {
    let mut site = boot("#item/coding/2");
    let started = tokio::time::Instant::now();

    assert!(site.run_for(Duration::from_secs(1)).await > 0);

    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(site.clock().now(), Duration::from_secs(1));
    assert!(site.coordinator().overlay().is_active(site.document()));
    assert_eq!(site.window().history.len(), 1);
    assert!(!site.coordinator().lock().is_held());
}

/// Installing the subscriber twice is harmless
#[test]
fn test_init_tracing_is_idempotent() {
    logovo::init_tracing();
    logovo::init_tracing();
    tracing::info!("still logging");
}
