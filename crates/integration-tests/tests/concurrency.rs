//! Overlapping invocations: snapshot isolation and single-flight preview

#![cfg(unix)]

mod common;

use std::time::Duration;

use common::{slow_hyhdl, Harness, FAKE_HYHDL};
use hyhdl_core::application::{CancelToken, InvocationOptions};
use hyhdl_core::domain::{Delivery, Document, SnapshotStrategy, ToolMode, ToolResult};
use hyhdl_core::port::editor_host::mocks::HostEvent;

fn variant(body: &str) -> Document {
    // same file, two different in-memory states
    Document::from_path("/work/rtl/alu.v", format!("module alu; {body} endmodule"))
}

#[tokio::test]
async fn test_unique_snapshots_do_not_observe_each_other() {
    let harness = Harness::new(&slow_hyhdl("0.3"));
    let first = variant("wire a;");
    let second = variant("wire b;");
    let options = InvocationOptions::default();

    let (a, b) = tokio::join!(
        harness
            .bridge
            .generate(ToolMode::Instantiate, &first, &options, CancelToken::never()),
        harness
            .bridge
            .generate(ToolMode::Instantiate, &second, &options, CancelToken::never()),
    );

    assert_eq!(a.unwrap(), format!("INST:{}", first.text));
    assert_eq!(b.unwrap(), format!("INST:{}", second.text));
    assert!(harness.leftover_snapshots().is_empty());
}

#[tokio::test]
async fn test_fixed_snapshot_is_last_write_wins() {
    let harness = Harness::with_settings(FAKE_HYHDL, |s| {
        s.snapshot_strategy = SnapshotStrategy::Fixed;
    });
    let first = variant("wire a;");
    let second = variant("wire b;");

    let snap_a = harness.bridge.snapshot(&first).await.unwrap();
    let snap_b = harness.bridge.snapshot(&second).await.unwrap();
    assert_eq!(snap_a.path, snap_b.path);
    assert_eq!(snap_a.path, harness.scratch_dir().join("code"));

    let invocation =
        harness
            .bridge
            .build_command(ToolMode::Instantiate, &snap_a.path, &InvocationOptions::default());
    let artifact = match harness
        .bridge
        .invoke(&invocation, CancelToken::never())
        .await
        .unwrap()
    {
        ToolResult::Success { artifact } => artifact,
        other => panic!("expected success, got {other:?}"),
    };

    // the first caller reads the second caller's content
    let payload = harness.bridge.read_payload(&artifact).await.unwrap();
    assert_eq!(payload, format!("INST:{}", second.text));
}

#[tokio::test]
async fn test_fixed_snapshot_is_kept_after_run() {
    let harness = Harness::with_settings(FAKE_HYHDL, |s| {
        s.snapshot_strategy = SnapshotStrategy::Fixed;
    });
    let document = variant("wire a;");

    harness
        .bridge
        .generate(
            ToolMode::Preview,
            &document,
            &InvocationOptions::default(),
            CancelToken::never(),
        )
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(harness.scratch_dir().join("code")).unwrap(),
        document.text
    );
}

#[tokio::test]
async fn test_newer_preview_supersedes_running_one() {
    let harness = Harness::new(&slow_hyhdl("0.5"));
    let first = variant("wire a;");
    let second = variant("wire b;");
    harness.host.set_active_document(Some(first));

    let commands = harness.commands();
    let documentation = commands.documentation();

    let (older, newer) = tokio::join!(documentation.open_preview(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        documentation.update_preview(second.clone()).await
    });

    assert_eq!(older.unwrap(), None);
    let html = format!("<html><body>{}</body></html>", second.text);
    assert_eq!(newer.unwrap(), Some(Delivery::PreviewHtml(html.clone())));

    let rendered: Vec<_> = harness
        .host
        .events()
        .into_iter()
        .filter(|e| matches!(e, HostEvent::PreviewHtml(_)))
        .collect();
    assert_eq!(rendered, vec![HostEvent::PreviewHtml(html)]);
    assert_eq!(documentation.current_document(), Some(second));
    assert!(harness.leftover_snapshots().is_empty());
}
