//! End-to-end properties of the render pipeline.

use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use taccuino_markdown::domain::attachments::{AttachmentMetadata, AttachmentSource};
use taccuino_markdown::domain::note_link;
use taccuino_markdown::{
    LinkRouter, LinkTarget, MarkdownPipeline, Navigator, Notifier, RenderConfig, StorageId,
    UiNode, Workspace,
};

struct TestWorkspace {
    active: Option<String>,
}

#[async_trait]
impl Workspace for TestWorkspace {
    fn active_storage(&self) -> Option<StorageId> {
        self.active.clone()
    }

    fn storages(&self) -> Vec<StorageId> {
        vec!["first".to_string(), "second".to_string()]
    }

    async fn resolve_note_path(&self, storage: &str, note_id: &str) -> Option<String> {
        (storage == "second" && note_id == NOTE_ID)
            .then(|| format!("/storages/second/notes/{note_id}"))
    }

    async fn attachment(&self, key: &str) -> Option<AttachmentMetadata> {
        (key == "paste-a1b2c3d4").then(|| AttachmentMetadata {
            id: "att-9".to_string(),
            content_type: "image/png".to_string(),
            source: AttachmentSource::Store {
                object_key: "paste-a1b2c3d4.png".to_string(),
            },
        })
    }
}

const NOTE_ID: &str = "7def6396-0d9c-4efc-a7b2-0f9c1a3318b5";

fn workspace() -> TestWorkspace {
    TestWorkspace {
        active: Some("first".to_string()),
    }
}

fn config() -> RenderConfig {
    RenderConfig::new("dark", "monokai")
}

async fn render(source: &str) -> Vec<UiNode> {
    MarkdownPipeline::default()
        .render(source, &config(), &workspace())
        .await
        .tree
}

fn collect<'a>(nodes: &'a [UiNode], found: &mut Vec<&'a UiNode>, pred: &impl Fn(&UiNode) -> bool) {
    for node in nodes {
        if pred(node) {
            found.push(node);
        }
        match node {
            UiNode::Element { children, .. } | UiNode::Link { children, .. } => {
                collect(children, found, pred);
            }
            _ => {}
        }
    }
}

fn find_all<'a>(nodes: &'a [UiNode], pred: impl Fn(&UiNode) -> bool) -> Vec<&'a UiNode> {
    let mut found = Vec::new();
    collect(nodes, &mut found, &pred);
    found
}

#[tokio::test]
async fn checkbox_indices_count_from_zero_and_reset_per_pass() {
    let source = "- [ ] a\n- [ ] b\n- [x] c";
    let pipeline = MarkdownPipeline::default();

    for _pass in 0..2 {
        let document = pipeline.render(source, &config(), &workspace()).await;
        let checkboxes = find_all(&document.tree, |n| matches!(n, UiNode::Checkbox { .. }));
        let states: Vec<(usize, bool)> = checkboxes
            .iter()
            .map(|n| match n {
                UiNode::Checkbox { index, checked } => (*index, *checked),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(states, vec![(0, false), (1, false), (2, true)]);
    }
}

#[tokio::test]
async fn script_and_event_handlers_never_reach_the_tree() {
    let source = "safe\n\n<script>alert(1)</script>\n\n<p onclick=\"steal()\">para</p>";
    let tree = render(source).await;

    let scripts = find_all(&tree, |n| {
        matches!(n, UiNode::Element { tag_name, .. } if tag_name == "script")
    });
    assert!(scripts.is_empty());

    let with_onclick = find_all(&tree, |n| {
        matches!(n, UiNode::Element { properties, .. } if properties.contains_key("onclick"))
    });
    assert!(with_onclick.is_empty());

    // The paragraph itself survives, only the handler is gone.
    let paragraphs = find_all(&tree, |n| {
        matches!(n, UiNode::Element { tag_name, .. } if tag_name == "p")
    });
    assert!(paragraphs.len() >= 2);
}

#[tokio::test]
async fn duplicate_headings_get_distinct_slugs() {
    let document = MarkdownPipeline::default()
        .render("# Overview\n\n# Overview", &config(), &workspace())
        .await;

    let slugs: Vec<&str> = document.toc.iter().map(|h| h.slug.as_str()).collect();
    assert_eq!(slugs, vec!["overview", "overview-1"]);

    let ids: Vec<String> = find_all(&document.tree, |n| {
        matches!(n, UiNode::Element { tag_name, .. } if tag_name == "h1")
    })
    .iter()
    .filter_map(|n| match n {
        UiNode::Element { properties, .. } => properties.get("id").cloned(),
        _ => None,
    })
    .collect();
    assert_eq!(ids, vec!["overview".to_string(), "overview-1".to_string()]);
}

#[tokio::test]
async fn note_links_round_trip_through_the_pre_pass() {
    let source = format!("See [other](:note:{NOTE_ID}).");
    let tree = render(&source).await;

    let links = find_all(&tree, |n| matches!(n, UiNode::Link { .. }));
    assert_eq!(links.len(), 1);
    let UiNode::Link { target, .. } = links[0] else {
        unreachable!();
    };
    let LinkTarget::Note { note_id } = target else {
        panic!("expected note target, got {target:?}");
    };

    assert_eq!(note_id, NOTE_ID);
    // Inverse rewrite recovers the original token.
    assert_eq!(note_link::prefix_note_id(note_id), format!(":note:{NOTE_ID}"));
}

#[derive(Default)]
struct ClickRecorder {
    navigated: Mutex<Vec<String>>,
    toasts: Mutex<Vec<String>>,
}

#[async_trait]
impl Navigator for ClickRecorder {
    async fn navigate_to(&self, path: &str) {
        self.navigated
            .lock()
            .expect("navigated lock")
            .push(path.to_string());
    }

    async fn open_external(&self, _url: &str) {}
}

#[async_trait]
impl Notifier for ClickRecorder {
    async fn notify(&self, title: &str, _description: &str) {
        self.toasts
            .lock()
            .expect("toast lock")
            .push(title.to_string());
    }
}

#[tokio::test]
async fn clicking_a_note_link_resolves_across_storages() {
    // The active storage ("first") does not contain the note; "second" does.
    let source = format!("[other](:note:{NOTE_ID})");
    let tree = render(&source).await;
    let links = find_all(&tree, |n| matches!(n, UiNode::Link { .. }));
    let UiNode::Link { target, .. } = links[0] else {
        unreachable!();
    };

    let ws = workspace();
    let recorder = ClickRecorder::default();
    let router = LinkRouter::new(&ws, &recorder, &recorder);
    router.open(target).await;

    assert_eq!(
        *recorder.navigated.lock().expect("navigated lock"),
        vec![format!("/storages/second/notes/{NOTE_ID}")]
    );
    assert!(recorder.toasts.lock().expect("toast lock").is_empty());
}

#[tokio::test]
async fn attachment_images_resolve_against_the_map() {
    let tree = render("![shot](paste-a1b2c3d4) and ![ext](https://example.com/x.png)").await;

    let attachments = find_all(&tree, |n| matches!(n, UiNode::AttachmentImage { .. }));
    assert_eq!(attachments.len(), 1);

    let expandable = find_all(&tree, |n| matches!(n, UiNode::ExpandableImage { .. }));
    assert_eq!(expandable.len(), 1);
}

#[tokio::test]
async fn diagram_fences_reach_their_components() {
    let source = "```plantuml\nA -> B\n```\n\n```chart(yaml)\ntype: bar\n```";
    let document = MarkdownPipeline::default()
        .render(source, &config(), &workspace())
        .await;

    assert!(document.contains_diagram);

    let remote = find_all(&document.tree, |n| {
        matches!(n, UiNode::RemoteDiagram { .. })
    });
    assert_eq!(remote.len(), 1);
    let UiNode::RemoteDiagram {
        callout_url,
        payload,
        ..
    } = remote[0]
    else {
        unreachable!();
    };
    assert_eq!(callout_url, "https://kroki.io/plantuml/svg");
    assert_eq!(payload, "A -> B\n");

    let charts = find_all(&document.tree, |n| {
        matches!(n, UiNode::Chart { yaml_flavored: true, .. })
    });
    assert_eq!(charts.len(), 1);
}

#[tokio::test]
async fn code_fences_carry_the_configured_theme() {
    let tree = render("```rust\nfn main() {}\n```").await;

    let fences = find_all(&tree, |n| matches!(n, UiNode::CodeFence { .. }));
    assert_eq!(fences.len(), 1);
    let UiNode::CodeFence {
        language, theme, ..
    } = fences[0]
    else {
        unreachable!();
    };
    assert_eq!(language.as_deref(), Some("rust"));
    assert_eq!(theme, "monokai");
}
