//! Expandable grid baseline
//!
//! Items of an expandable grid have one canonical resting state: the preview
//! is laid out and visible, the detail payload is hidden. Transitions that
//! get interrupted (or legacy in-place expansion, which nothing sets any
//! more) can leave items with ad-hoc inline styles; the resetter erases them.

use page_dom::{Document, NodeId};

use crate::markup::{grid, markers};

/// Restores grids and their items to the collapsed baseline
#[derive(Debug, Clone, Copy, Default)]
pub struct GridStateResetter;

impl GridStateResetter {
    /// Reset every item of `grid` and clear the grid's inline height
    pub fn reset(doc: &mut Document, grid_node: NodeId) {
        for item in doc.query_class(grid_node, grid::ITEM) {
            Self::reset_item(doc, item);
        }
        doc.set_style(grid_node, "height", "");
    }

    /// Reset every grid inside a view container
    pub fn reset_view(doc: &mut Document, view: NodeId) {
        for grid_node in doc.query_class(view, grid::GRID) {
            Self::reset(doc, grid_node);
        }
    }

    /// Bring one item to the collapsed baseline
    pub fn reset_item(doc: &mut Document, item: NodeId) {
        doc.clear_style(item);
        doc.remove_class(item, markers::EXPANDED);
        doc.remove_class(item, markers::ANIMATING);

        if let Some(preview) = doc.first_with_class(item, grid::PREVIEW) {
            doc.set_style(preview, "display", "flex");
            doc.set_style(preview, "opacity", "1");

            if let Some(image) = doc.first_with_class(preview, grid::IMAGE) {
                doc.set_style(image, "display", "block");
                doc.set_style(image, "opacity", "1");
                doc.set_style(image, "height", grid::PREVIEW_IMAGE_HEIGHT);
                doc.set_style(image, "max-height", grid::PREVIEW_IMAGE_HEIGHT);
                doc.set_style(image, "visibility", "visible");
            }

            if let Some(details) = doc.first_with_class(preview, grid::DETAILS) {
                doc.set_style(details, "display", "block");
                doc.set_style(details, "opacity", "1");
            }
        }

        if let Some(content) = doc.first_with_class(item, grid::EXPANDED_CONTENT) {
            doc.set_style(content, "display", "none");
            doc.set_style(content, "opacity", "0");
            doc.set_style(content, "transform", "scale(0.95)");
        }
    }

    /// Prepare a freshly initialized grid; items without a detail payload are left alone
    ///
    /// Returns the items that can be opened.
    pub fn prepare(doc: &mut Document, grid_node: NodeId) -> Vec<NodeId> {
        let openable: Vec<NodeId> = doc
            .query_class(grid_node, grid::ITEM)
            .into_iter()
            .filter(|item| doc.first_with_class(*item, grid::EXPANDED_CONTENT).is_some())
            .collect();
        for item in &openable {
            Self::reset_item(doc, *item);
        }
        openable
    }

    /// Whether an item is at the collapsed baseline
    pub fn is_collapsed(doc: &Document, item: NodeId) -> bool {
        if !doc.inline_style(item).is_empty()
            || doc.has_class(item, markers::EXPANDED)
            || doc.has_class(item, markers::ANIMATING)
        {
            return false;
        }
        doc.first_with_class(item, grid::EXPANDED_CONTENT)
            .map_or(true, |content| doc.display(content) == "none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_dom::El;

    fn item(key: &str) -> El {
        El::div().class(grid::ITEM).attr("data-category", key).children([
            El::div().class(grid::PREVIEW).children([
                El::div().class(grid::IMAGE),
                El::div().class(grid::DETAILS).child(El::new("h3").class(grid::TITLE).text(key)),
            ]),
            El::div().class(grid::EXPANDED_CONTENT).child(El::new("p").text("body")),
        ])
    }

    fn grid_doc() -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let grid_node = doc.build(body, El::div().class(grid::GRID).children([item("1"), item("2")]));
        (doc, grid_node)
    }

    fn snapshot(doc: &Document, root: NodeId) -> Vec<(Vec<String>, Vec<(String, String)>)> {
        doc.descendants(root)
            .into_iter()
            .chain(std::iter::once(root))
            .map(|n| {
                (
                    doc.classes(n).to_vec(),
                    doc.inline_style(n).iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_reset_neutralizes_interrupted_expansion() {
        let (mut doc, grid_node) = grid_doc();
        let items = doc.query_class(grid_node, grid::ITEM);
        let first = items[0];
        doc.add_class(first, markers::EXPANDED);
        doc.add_class(first, markers::ANIMATING);
        doc.set_style(first, "position", "absolute");
        doc.set_style(grid_node, "height", "900px");
        let content = doc.first_with_class(first, grid::EXPANDED_CONTENT).unwrap();
        doc.set_style(content, "display", "block");

        GridStateResetter::reset(&mut doc, grid_node);

        for item in items {
            assert!(GridStateResetter::is_collapsed(&doc, item));
        }
        assert_eq!(doc.style(grid_node, "height"), None);
        let image = doc.first_with_class(first, grid::IMAGE).unwrap();
        assert_eq!(doc.style(image, "height"), Some("120px"));
        assert_eq!(doc.style(image, "max-height"), Some("120px"));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (mut doc, grid_node) = grid_doc();
        let first = doc.query_class(grid_node, grid::ITEM)[0];
        doc.add_class(first, markers::EXPANDED);

        GridStateResetter::reset(&mut doc, grid_node);
        let once = snapshot(&doc, grid_node);
        GridStateResetter::reset(&mut doc, grid_node);
        assert_eq!(snapshot(&doc, grid_node), once);
    }

    #[test]
    fn test_reset_on_clean_grid_matches_baseline() {
        let (mut doc, grid_node) = grid_doc();
        GridStateResetter::reset(&mut doc, grid_node);
        let baseline = snapshot(&doc, grid_node);

        let (mut fresh, fresh_grid) = grid_doc();
        GridStateResetter::reset(&mut fresh, fresh_grid);
        assert_eq!(snapshot(&fresh, fresh_grid), baseline);
    }

    #[test]
    fn test_prepare_skips_items_without_payload() {
        let mut doc = Document::new();
        let body = doc.body();
        let grid_node = doc.build(
            body,
            El::div().class(grid::GRID).children([
                item("1"),
                El::div().class(grid::ITEM).style("opacity", "0.2").child(El::div().class(grid::PREVIEW)),
            ]),
        );

        let openable = GridStateResetter::prepare(&mut doc, grid_node);
        assert_eq!(openable.len(), 1);

        let bare = doc.query_class(grid_node, grid::ITEM)[1];
        assert_eq!(doc.style(bare, "opacity"), Some("0.2"));
    }
}
