//! Markup tree traversal and SDF dispatch.

use std::path::Path;

use rayon::prelude::*;

use confsync_confluence::RemoteApi;
use confsync_diagrams::DiagramRenderer;
use confsync_markup::{MarkupNode, NodeKind};
use confsync_sdf::{DocBuilder, MediaLayout, SdfElement};

use crate::director::ContentDirector;
use crate::error::SyncError;
use crate::pipeline::DiagramPipeline;
use crate::properties::{PROPERTIES_LANGUAGE, PropertiesFile};

/// Language tags the engine treats specially.
#[derive(Clone, Debug)]
pub struct ConvertSettings {
    /// Code blocks with this language go through the diagram pipeline.
    pub diagram_language: String,
    /// Code blocks with this language are the document's own linkage
    /// metadata and are suppressed from output.
    pub properties_language: String,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            diagram_language: "mermaid".to_owned(),
            properties_language: PROPERTIES_LANGUAGE.to_owned(),
        }
    }
}

/// Per-conversion state.
#[derive(Clone, Debug)]
pub struct ConvertContext<'a> {
    /// Path of the document being converted.
    pub doc_path: &'a Path,
    /// Cached remote page id from the properties block, when linked.
    /// Diagram uploads require this; without it diagrams fall back to
    /// code blocks.
    pub page_id: Option<String>,
}

/// Converts the rendered markup tree into an ordered SDF sequence.
///
/// Dispatch is a closed match over [`NodeKind`]; unrecognized kinds are
/// silently skipped. Table cells and list items are converted concurrently
/// but reassembled by original index, so output order always mirrors source
/// order.
pub struct TraversalEngine<'a> {
    pipeline: DiagramPipeline<'a>,
    paragraph_director: &'a dyn ContentDirector,
    cell_director: &'a dyn ContentDirector,
    settings: ConvertSettings,
}

impl<'a> TraversalEngine<'a> {
    /// Create an engine over the given collaborators.
    #[must_use]
    pub fn new(
        api: &'a dyn RemoteApi,
        renderer: &'a dyn DiagramRenderer,
        paragraph_director: &'a dyn ContentDirector,
        cell_director: &'a dyn ContentDirector,
        settings: ConvertSettings,
    ) -> Self {
        Self {
            pipeline: DiagramPipeline::new(api, renderer),
            paragraph_director,
            cell_director,
            settings,
        }
    }

    /// Convert a full document source into its SDF sequence.
    ///
    /// The properties block is read first so diagram uploads inside the
    /// traversal can resolve the cached page id.
    pub fn convert(&self, source: &str, doc_path: &Path) -> Result<Vec<SdfElement>, SyncError> {
        let properties = PropertiesFile::parse(source)?.properties;
        let ctx = ConvertContext {
            doc_path,
            page_id: properties.page_id,
        };

        let root = confsync_markup::parse(source);
        let mut builder = DocBuilder::new();
        for child in &root.children {
            self.traverse(child, &mut builder, &ctx)?;
        }
        Ok(builder.build())
    }

    /// Convert one node, appending its SDF elements to the builder.
    ///
    /// Called once per direct child of a container, in source order.
    pub fn traverse(
        &self,
        node: &MarkupNode,
        builder: &mut DocBuilder,
        ctx: &ConvertContext<'_>,
    ) -> Result<(), SyncError> {
        match &node.kind {
            NodeKind::Heading { level } => {
                builder.add_item(SdfElement::heading(*level, node.text_content()));
            }
            NodeKind::Table => self.convert_table(node, builder, ctx)?,
            NodeKind::CodeBlock { language } => {
                self.convert_code_block(language.as_deref(), node, builder, ctx);
            }
            NodeKind::Paragraph => {
                self.paragraph_director.add_items(node, builder, ctx.doc_path)?;
            }
            NodeKind::List { ordered } => self.convert_list(node, *ordered, builder, ctx)?,
            NodeKind::BlockQuote => {
                builder.add_item(SdfElement::blockquote(node.text_content()));
            }
            NodeKind::Rule => builder.add_item(SdfElement::rule()),
            // Not block content at this level; skipped, not an error.
            NodeKind::TableRow
            | NodeKind::TableCell
            | NodeKind::ListItem { .. }
            | NodeKind::Checkbox { .. }
            | NodeKind::Text
            | NodeKind::Container => {}
        }
        Ok(())
    }

    /// Convert a table, fanning out all cells of all rows.
    ///
    /// Each cell gets a fresh sub-builder and its own table-cell director
    /// run. `par_iter().collect()` reassembles by original index, so row and
    /// cell order survive regardless of completion order.
    fn convert_table(
        &self,
        node: &MarkupNode,
        builder: &mut DocBuilder,
        ctx: &ConvertContext<'_>,
    ) -> Result<(), SyncError> {
        let director = self.cell_director;
        let doc_path = ctx.doc_path;

        let rows: Vec<&MarkupNode> = node.rows().collect();
        let converted: Vec<SdfElement> = rows
            .par_iter()
            .map(|row| {
                let cells: Vec<&MarkupNode> = row.cells().collect();
                let cells: Vec<Vec<SdfElement>> = cells
                    .par_iter()
                    .map(|cell| {
                        let mut sub = DocBuilder::new();
                        director.add_items(cell, &mut sub, doc_path)?;
                        Ok::<_, SyncError>(sub.build())
                    })
                    .collect::<Result<_, _>>()?;
                Ok::<_, SyncError>(SdfElement::table_row(cells))
            })
            .collect::<Result<_, _>>()?;

        builder.add_item(SdfElement::table(converted));
        Ok(())
    }

    /// Convert an ordered or unordered list.
    ///
    /// A list is a task list iff its item count equals its
    /// checkbox-descendant count; the checkboxes are not matched to items
    /// positionally.
    fn convert_list(
        &self,
        node: &MarkupNode,
        ordered: bool,
        builder: &mut DocBuilder,
        ctx: &ConvertContext<'_>,
    ) -> Result<(), SyncError> {
        let items: Vec<&MarkupNode> = node.items().collect();

        if items.len() == node.checkbox_count() {
            let tasks = items
                .iter()
                .map(|item| {
                    let checked = matches!(
                        item.kind,
                        NodeKind::ListItem {
                            checked: Some(true)
                        }
                    );
                    SdfElement::task_item(item.text_content().trim(), checked)
                })
                .collect();
            builder.add_item(SdfElement::task_list(tasks));
            return Ok(());
        }

        let director = self.paragraph_director;
        let doc_path = ctx.doc_path;

        let converted: Vec<SdfElement> = items
            .par_iter()
            .map(|item| {
                // Strip the list-item wrapper down to its inline content
                // before handing it to the paragraph director.
                let synthetic =
                    MarkupNode::with_children(NodeKind::Paragraph, item.children.clone());
                let mut sub = DocBuilder::new();
                director.add_items(&synthetic, &mut sub, doc_path)?;
                Ok::<_, SyncError>(SdfElement::list_item(sub.build()))
            })
            .collect::<Result<_, _>>()?;

        builder.add_item(if ordered {
            SdfElement::ordered_list(converted)
        } else {
            SdfElement::bullet_list(converted)
        });
        Ok(())
    }

    /// Convert a code block, routing diagram languages through the
    /// attachment pipeline.
    fn convert_code_block(
        &self,
        language: Option<&str>,
        node: &MarkupNode,
        builder: &mut DocBuilder,
        ctx: &ConvertContext<'_>,
    ) {
        let raw = node.text_content();
        // Fenced blocks keep the final newline of their last line; drop it.
        let text = raw.strip_suffix('\n').unwrap_or(&raw);

        if let Some(lang) = language {
            if lang == self.settings.diagram_language
                && let Some(page_id) = ctx.page_id.as_deref()
                && let Some(file_id) = self.pipeline.diagram_to_attachment(text, page_id)
            {
                builder.add_item(SdfElement::media_single(file_id, MediaLayout::Wide));
                return;
            }

            // The document's own linkage metadata is not content.
            if lang == self.settings.properties_language {
                return;
            }
        }

        builder.add_item(SdfElement::code_block(text));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use confsync_confluence::{
        AttachmentExtensions, AttachmentResult, AttachmentsResponse, ConfluenceError, CreatedPage,
        MultipartForm,
    };
    use confsync_diagrams::DiagramError;

    use super::*;
    use crate::director::PlainTextDirector;

    #[derive(Default)]
    struct StubApi {
        uploads: AtomicUsize,
        fail_upload: bool,
    }

    impl RemoteApi for StubApi {
        fn create_page(&self, _: &str, _: &str) -> Result<CreatedPage, ConfluenceError> {
            panic!("engine never creates pages");
        }

        fn update_page(&self, _: &str, _: &str, _: &Value) -> Result<(), ConfluenceError> {
            panic!("engine never updates pages");
        }

        fn upload_attachment(
            &self,
            _page_id: &str,
            _form: MultipartForm,
        ) -> Result<AttachmentsResponse, ConfluenceError> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            if self.fail_upload {
                return Err(ConfluenceError::Http {
                    status: 500,
                    body: "boom".to_owned(),
                });
            }
            Ok(AttachmentsResponse {
                results: vec![AttachmentResult {
                    id: Some("att-1".to_owned()),
                    title: None,
                    extensions: Some(AttachmentExtensions {
                        file_id: Some("file-1".to_owned()),
                    }),
                }],
                size: 1,
            })
        }
    }

    struct StubRenderer {
        renders: AtomicUsize,
        fail: bool,
    }

    impl StubRenderer {
        fn ok() -> Self {
            Self {
                renders: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                renders: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    impl DiagramRenderer for StubRenderer {
        fn render(&self, _render_id: &str, _source: &str) -> Result<String, DiagramError> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DiagramError::Http("connection refused".to_owned()));
            }
            Ok("<svg viewBox=\"0 0 10 10\"><g/></svg>".to_owned())
        }
    }

    const PARAGRAPH: PlainTextDirector = PlainTextDirector;

    fn engine<'a>(api: &'a StubApi, renderer: &'a StubRenderer) -> TraversalEngine<'a> {
        TraversalEngine::new(api, renderer, &PARAGRAPH, &PARAGRAPH, ConvertSettings::default())
    }

    fn convert(source: &str) -> Vec<SdfElement> {
        let api = StubApi::default();
        let renderer = StubRenderer::ok();
        engine(&api, &renderer)
            .convert(source, Path::new("doc.md"))
            .unwrap()
    }

    fn flat_text(content: &[confsync_sdf::InlineNode]) -> String {
        content
            .iter()
            .map(|n| match n {
                confsync_sdf::InlineNode::Text { text }
                | confsync_sdf::InlineNode::Code { text }
                | confsync_sdf::InlineNode::Link { text, .. } => text.as_str(),
            })
            .collect()
    }

    #[test]
    fn output_order_mirrors_source_order() {
        let elements = convert(
            "# Title\n\nFirst paragraph.\n\n> Quoted.\n\n---\n\n```sh\nls -la\n```\n",
        );

        assert_eq!(elements.len(), 5);
        assert!(matches!(&elements[0], SdfElement::Heading { level: 1, text } if text == "Title"));
        assert!(matches!(&elements[1], SdfElement::Paragraph { .. }));
        assert!(matches!(&elements[2], SdfElement::Blockquote { text } if text == "Quoted."));
        assert!(matches!(&elements[3], SdfElement::Rule));
        assert!(matches!(&elements[4], SdfElement::CodeBlock { text } if text == "ls -la"));
    }

    #[test]
    fn heading_levels_carry_through() {
        let elements = convert("## Second\n\n#### Fourth\n");
        assert!(matches!(&elements[0], SdfElement::Heading { level: 2, .. }));
        assert!(matches!(&elements[1], SdfElement::Heading { level: 4, .. }));
    }

    #[test]
    fn table_keeps_row_and_cell_shape() {
        let elements = convert(
            "| H1 | H2 |\n|----|----|\n| a1 | a2 |\n| b1 | b2 |\n",
        );

        let SdfElement::Table { rows } = &elements[0] else {
            panic!("expected table, got {:?}", elements[0]);
        };
        assert_eq!(rows.len(), 3);

        for (r, expected) in rows.iter().zip([["H1", "H2"], ["a1", "a2"], ["b1", "b2"]]) {
            let SdfElement::TableRow { cells } = r else {
                panic!("expected table row, got {r:?}");
            };
            assert_eq!(cells.len(), 2);
            for (cell, want) in cells.iter().zip(expected) {
                assert_eq!(cell.len(), 1);
                let SdfElement::Paragraph { content } = &cell[0] else {
                    panic!("expected paragraph cell, got {:?}", cell[0]);
                };
                assert_eq!(flat_text(content), want);
            }
        }
    }

    #[test]
    fn empty_table_cell_yields_empty_sequence() {
        let elements = convert("| H |\n|---|\n|   |\n");
        let SdfElement::Table { rows } = &elements[0] else {
            panic!("expected table");
        };
        let SdfElement::TableRow { cells } = &rows[1] else {
            panic!("expected row");
        };
        assert!(cells[0].is_empty());
    }

    #[test]
    fn properties_block_is_suppressed() {
        let elements = convert("```yaml\npageId: \"7\"\n```\n\nBody text.\n");
        assert_eq!(elements.len(), 1);
        assert!(matches!(&elements[0], SdfElement::Paragraph { .. }));
    }

    #[test]
    fn yaml_block_mid_document_is_also_suppressed() {
        let elements = convert("Intro.\n\n```yaml\nkey: value\n```\n\nOutro.\n");
        assert_eq!(elements.len(), 2);
        assert!(elements
            .iter()
            .all(|e| matches!(e, SdfElement::Paragraph { .. })));
    }

    #[test]
    fn untagged_code_block_stays_a_code_block() {
        let elements = convert("```\nraw text\n```\n");
        assert!(matches!(&elements[0], SdfElement::CodeBlock { text } if text == "raw text"));
    }

    #[test]
    fn diagram_on_linked_document_becomes_media() {
        let api = StubApi::default();
        let renderer = StubRenderer::ok();
        let source = "```yaml\npageId: \"42\"\n```\n\n```mermaid\ngraph TD; A-->B;\n```\n";
        let elements = engine(&api, &renderer)
            .convert(source, Path::new("doc.md"))
            .unwrap();

        assert_eq!(elements.len(), 1);
        assert!(matches!(
            &elements[0],
            SdfElement::MediaSingle {
                attachment_id,
                layout: MediaLayout::Wide,
            } if attachment_id == "file-1"
        ));
        assert_eq!(api.uploads.load(Ordering::SeqCst), 1);
        assert_eq!(renderer.renders.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn diagram_on_unlinked_document_stays_code() {
        let api = StubApi::default();
        let renderer = StubRenderer::ok();
        let elements = engine(&api, &renderer)
            .convert("```mermaid\ngraph TD; A-->B;\n```\n", Path::new("doc.md"))
            .unwrap();

        assert!(matches!(&elements[0], SdfElement::CodeBlock { text } if text.contains("graph TD")));
        assert_eq!(renderer.renders.load(Ordering::SeqCst), 0);
        assert_eq!(api.uploads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_render_degrades_to_code_block() {
        let api = StubApi::default();
        let renderer = StubRenderer::failing();
        let source = "```yaml\npageId: \"42\"\n```\n\n```mermaid\ngraph TD; A-->B;\n```\n";
        let elements = engine(&api, &renderer)
            .convert(source, Path::new("doc.md"))
            .unwrap();

        assert_eq!(elements.len(), 1);
        assert!(matches!(&elements[0], SdfElement::CodeBlock { text } if text.contains("graph TD")));
        assert_eq!(api.uploads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_upload_degrades_to_code_block() {
        let api = StubApi {
            fail_upload: true,
            ..StubApi::default()
        };
        let renderer = StubRenderer::ok();
        let source = "```yaml\npageId: \"42\"\n```\n\n```mermaid\ngraph TD; A-->B;\n```\n";
        let elements = engine(&api, &renderer)
            .convert(source, Path::new("doc.md"))
            .unwrap();

        assert!(matches!(&elements[0], SdfElement::CodeBlock { .. }));
        assert_eq!(api.uploads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn checkbox_list_becomes_task_list() {
        let elements = convert("- [x] done thing\n- [ ] open thing\n");

        let SdfElement::TaskList { items } = &elements[0] else {
            panic!("expected task list, got {:?}", elements[0]);
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(
            &items[0],
            SdfElement::TaskItem { text, checked: true } if text == "done thing"
        ));
        assert!(matches!(
            &items[1],
            SdfElement::TaskItem { text, checked: false } if text == "open thing"
        ));
    }

    #[test]
    fn loose_checkbox_list_keeps_checked_state() {
        let elements = convert("- [x] done thing\n\n- [ ] open thing\n");

        let SdfElement::TaskList { items } = &elements[0] else {
            panic!("expected task list, got {:?}", elements[0]);
        };
        assert!(matches!(
            &items[0],
            SdfElement::TaskItem { checked: true, .. }
        ));
        assert!(matches!(
            &items[1],
            SdfElement::TaskItem { checked: false, .. }
        ));
    }

    #[test]
    fn plain_list_keeps_list_shape() {
        let elements = convert("1. first\n2. second\n3. third\n");

        let SdfElement::OrderedList { items } = &elements[0] else {
            panic!("expected ordered list, got {:?}", elements[0]);
        };
        assert_eq!(items.len(), 3);
        for (item, want) in items.iter().zip(["first", "second", "third"]) {
            let SdfElement::ListItem { content } = item else {
                panic!("expected list item");
            };
            let SdfElement::Paragraph { content } = &content[0] else {
                panic!("expected paragraph inside item");
            };
            assert_eq!(flat_text(content), want);
        }
    }

    #[test]
    fn mixed_list_is_not_a_task_list() {
        // Two checkboxes across three items: the literal count heuristic
        // rejects task-list treatment.
        let elements = convert("- [x] a\n- [ ] b\n- c\n");
        assert!(matches!(&elements[0], SdfElement::BulletList { .. }));
    }

    #[test]
    fn checkbox_count_is_literal_not_positional() {
        // Three items, three checkbox descendants, but all checkboxes sit
        // under the first item. The heuristic only compares counts.
        let checked_item = MarkupNode::with_children(
            NodeKind::ListItem { checked: Some(true) },
            vec![
                MarkupNode::new(NodeKind::Checkbox { checked: true }),
                MarkupNode::text("carries all boxes"),
                MarkupNode::new(NodeKind::Checkbox { checked: false }),
                MarkupNode::new(NodeKind::Checkbox { checked: false }),
            ],
        );
        let plain_item = |text: &str| {
            MarkupNode::with_children(
                NodeKind::ListItem { checked: None },
                vec![MarkupNode::text(text)],
            )
        };
        let list = MarkupNode::with_children(
            NodeKind::List { ordered: false },
            vec![checked_item, plain_item("second"), plain_item("third")],
        );

        let api = StubApi::default();
        let renderer = StubRenderer::ok();
        let eng = engine(&api, &renderer);
        let ctx = ConvertContext {
            doc_path: Path::new("doc.md"),
            page_id: None,
        };
        let mut builder = DocBuilder::new();
        eng.traverse(&list, &mut builder, &ctx).unwrap();
        let elements = builder.build();

        let SdfElement::TaskList { items } = &elements[0] else {
            panic!("expected task list, got {:?}", elements[0]);
        };
        assert_eq!(items.len(), 3);
        assert!(matches!(&items[0], SdfElement::TaskItem { checked: true, .. }));
        assert!(matches!(&items[1], SdfElement::TaskItem { checked: false, .. }));
    }

    #[test]
    fn inline_container_nodes_are_skipped() {
        let api = StubApi::default();
        let renderer = StubRenderer::ok();
        let eng = engine(&api, &renderer);
        let ctx = ConvertContext {
            doc_path: Path::new("doc.md"),
            page_id: None,
        };
        let mut builder = DocBuilder::new();
        eng.traverse(&MarkupNode::text("stray"), &mut builder, &ctx)
            .unwrap();
        eng.traverse(&MarkupNode::new(NodeKind::Container), &mut builder, &ctx)
            .unwrap();
        assert!(builder.is_empty());
    }
}
