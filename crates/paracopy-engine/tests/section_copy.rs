use std::cell::RefCell;

use paracopy_config::{Config, IndentMode, OutputMode};
use paracopy_engine::{
    ClipboardError, ClipboardSink, CopyHost, DecorationKind, MemoryRoot, Notifier, PassOutcome,
    RenderedBlock, RenderedRoot, SectionAction, TaskQueue, decorate_render, render_markdown,
};
use pretty_assertions::assert_eq;
use relative_path::RelativePath;

fn load_fixture(name: &str) -> MemoryRoot {
    let md = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    render_markdown(&md)
}

fn article_config() -> Config {
    Config {
        regex_patterns: "^Article".to_string(),
        ..Config::default()
    }
}

fn payloads<B: RenderedBlock + Clone + 'static>(actions: &[SectionAction<B>]) -> Vec<String> {
    actions.iter().map(SectionAction::payload).collect()
}

/// Render listing: indentation marker, affordance label, text.
fn listing(root: &MemoryRoot) -> String {
    root.blocks()
        .iter()
        .map(|block| {
            let marker = block
                .indent_marker()
                .map_or("-", |m| m.class_name());
            format!("{marker} | {}", block.visible_text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Default)]
struct Clipboard(Vec<String>);

impl ClipboardSink for Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0.push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct Notices(RefCell<Vec<String>>);

impl Notifier for Notices {
    fn notify(&self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

#[test]
fn articles_split_at_each_heading() {
    let root = MemoryRoot::from_texts(["Article 1", "Body text A", "Article 2", "Body text B"]);

    let actions = decorate_render(&root, RelativePath::new("law.md"), &article_config()).into_actions();

    assert_eq!(
        payloads(&actions),
        vec!["Article 1\nBody text A", "Article 2\nBody text B"]
    );
}

#[test]
fn lease_fixture_plain_payloads() {
    let root = load_fixture("lease");

    let actions = decorate_render(&root, RelativePath::new("law/lease.md"), &article_config())
        .into_actions();

    let starts: Vec<_> = actions.iter().map(SectionAction::block_index).collect();
    assert_eq!(starts, vec![1, 3, 6]);
    assert_eq!(
        payloads(&actions),
        vec![
            "Article 1 Parties\nThe lessor and the lessee agree as follows.",
            "Article 2 Rent\nRent is due monthly, see schedule.\nLate payment incurs interest.",
            "Article 3 Termination",
        ]
    );
}

#[test]
fn lease_fixture_structured_payloads() {
    let root = load_fixture("lease");
    let config = Config {
        output_mode: OutputMode::Structured,
        ..article_config()
    };

    let actions = decorate_render(&root, RelativePath::new("law/lease.md"), &config).into_actions();

    assert_eq!(
        payloads(&actions)[..2].to_vec(),
        vec![
            "Article 1 Parties\nThe **lessor** and the *lessee* agree as follows.",
            "Article 2 Rent\nRent is due monthly, see [schedule](https://example.org/rent).\nLate payment incurs interest.",
        ]
    );
}

#[test]
fn default_patterns_handle_statute_numbering() {
    let root = load_fixture("statute");

    let actions =
        decorate_render(&root, RelativePath::new("statute.md"), &Config::default()).into_actions();

    assert_eq!(
        payloads(&actions),
        vec![
            "第一条 为了规范合同行为，制定本法。\n本法适用于平等主体之间订立的合同。",
            "第二条 合同是民事主体之间设立、变更、终止民事法律关系的协议。",
            "1.1 Scope\nApplies to all members.",
        ]
    );
}

#[test]
fn injected_previews_and_rerenders_do_not_leak() {
    let root = load_fixture("lease");
    let config = article_config();
    let path = RelativePath::new("law/lease.md");

    let actions = decorate_render(&root, path, &config).into_actions();
    root.block(2)
        .unwrap()
        .append_decoration(DecorationKind::BlockPreview, "Referenced by 3 notes");
    root.block(4)
        .unwrap()
        .append_decoration(DecorationKind::LinkPreview, "schedule preview");
    let rerender = decorate_render(&root, path, &config);

    assert!(rerender.actions().is_empty());
    assert_eq!(
        actions[0].payload(),
        "Article 1 Parties\nThe lessor and the lessee agree as follows."
    );
    assert_eq!(
        actions[1].payload(),
        "Article 2 Rent\nRent is due monthly, see schedule.\nLate payment incurs interest."
    );
}

#[test]
fn decorated_listing() {
    let root = load_fixture("lease");
    let config = Config {
        indent_type: IndentMode::Hanging,
        ..article_config()
    };

    decorate_render(&root, RelativePath::new("law/lease.md"), &config);
    decorate_render(&root, RelativePath::new("law/lease.md"), &config);

    insta::assert_snapshot!(listing(&root), @r"
    lac-indent-hanging | Preamble text that is not part of any article.
    lac-indent-hanging | 📋Article 1 Parties
    lac-indent-hanging | The lessor and the lessee agree as follows. ^parties
    lac-indent-hanging | 📋Article 2 Rent
    lac-indent-hanging | Rent is due monthly, see schedule.
    lac-indent-hanging | Late payment incurs interest.
    lac-indent-hanging | 📋Article 3 Termination
    ");
}

#[test]
fn whitelist_keeps_other_notes_untouched() {
    let root = load_fixture("lease");
    let config = Config {
        whitelist_folders: vec!["contracts".to_string()],
        ..article_config()
    };

    let outcome = decorate_render(&root, RelativePath::new("law/lease.md"), &config);

    assert!(matches!(outcome, PassOutcome::OutOfScope));
    insta::assert_snapshot!(listing(&root), @r"
    - | Preamble text that is not part of any article.
    - | Article 1 Parties
    - | The lessor and the lessee agree as follows. ^parties
    - | Article 2 Rent
    - | Rent is due monthly, see schedule.
    - | Late payment incurs interest.
    - | Article 3 Termination
    ");
}

#[test]
fn invoking_an_affordance_copies_and_reverts() {
    let root = load_fixture("lease");
    let actions = decorate_render(&root, RelativePath::new("law/lease.md"), &article_config())
        .into_actions();
    let mut clipboard = Clipboard::default();
    let notices = Notices::default();
    let queue = TaskQueue::new();

    actions[2]
        .invoke(&mut CopyHost {
            clipboard: &mut clipboard,
            notifier: &notices,
            scheduler: &queue,
        })
        .unwrap();

    assert_eq!(clipboard.0, vec!["Article 3 Termination"]);
    assert_eq!(root.block(6).unwrap().visible_text(), "✅Article 3 Termination");
    queue.run_all();
    assert_eq!(root.block(6).unwrap().visible_text(), "📋Article 3 Termination");
    assert!(notices.0.borrow().is_empty());
}
