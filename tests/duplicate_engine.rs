//! End-to-end behaviour of duplication jobs against in-memory environments

mod common;

use common::*;
use contentful_duplicate::DuplicateError;
use contentful_duplicate::duplicate::{DuplicationJob, JobWarning, NamingRule, RootStatus, run_job};
use serde_json::json;

fn source() -> MemoryStore {
    MemoryStore::new("develop")
}

fn target() -> MemoryStore {
    MemoryStore::new("staging").with_content_types(&["page", "section", "author"])
}

#[tokio::test]
async fn test_duplicates_single_entry_with_renamed_title() {
    let source = source().with_entry(entry(
        "home",
        "page",
        false,
        json!({"title": {"en-US": "Home", "de-DE": "Startseite"}, "slug": {"en-US": "home"}}),
    ));
    let target = target();

    let job = DuplicationJob::new(["home"]).naming(NamingRule::new("[COPY] ", " v2"));
    let report = run_job(&job, &source, &target).await.unwrap();

    assert_eq!(target.created().len(), 1);
    let duplicate_id = report.duplicate_of("home").unwrap();
    let duplicate = target.entry(duplicate_id);

    assert_eq!(text(&duplicate, "title"), "[COPY] Home v2");
    assert_eq!(duplicate.fields["title"]["de-DE"], json!("[COPY] Startseite v2"));
    assert_eq!(text(&duplicate, "slug"), "home");

    assert_eq!(report.roots.len(), 1);
    assert_eq!(report.roots[0].status, RootStatus::Duplicated);
    assert_eq!(report.roots[0].name.as_deref(), Some("[COPY] Home v2"));
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_regex_replaces_first_match_only() {
    let source = source().with_entry(entry("a", "page", false, json!({"title": {"en-US": "2023 recap 2023"}})));
    let target = target();

    let naming = NamingRule::new("", "").with_replacement("2023", "2024").unwrap();
    let job = DuplicationJob::new(["a"]).naming(naming);
    let report = run_job(&job, &source, &target).await.unwrap();

    let duplicate = target.entry(report.duplicate_of("a").unwrap());
    assert_eq!(text(&duplicate, "title"), "2024 recap 2023");
}

#[tokio::test]
async fn test_links_point_at_duplicates() {
    let source = source()
        .with_entry(entry(
            "page",
            "page",
            false,
            json!({
                "title": {"en-US": "Page"},
                "author": {"en-US": entry_link("alice")},
                "sections": {"en-US": [entry_link("s1"), entry_link("s2")]}
            }),
        ))
        .with_entry(entry("alice", "author", false, json!({"name": {"en-US": "Alice"}})))
        .with_entry(entry("s1", "section", false, json!({"title": {"en-US": "One"}})))
        .with_entry(entry("s2", "section", false, json!({"title": {"en-US": "Two"}})));
    let target = target();

    let job = DuplicationJob::new(["page"]).naming(NamingRule::new("", " (copy)"));
    let report = run_job(&job, &source, &target).await.unwrap();

    assert_eq!(target.created().len(), 4);
    assert_eq!(report.stats.created, 4);
    assert_eq!(report.id_map.len(), 4);

    let page = target.entry(report.duplicate_of("page").unwrap());
    assert_eq!(linked_id(&page, "author"), report.duplicate_of("alice").unwrap());
    assert_eq!(
        linked_ids(&page, "sections"),
        vec![
            report.duplicate_of("s1").unwrap().to_string(),
            report.duplicate_of("s2").unwrap().to_string()
        ]
    );

    let alice = target.entry(report.duplicate_of("alice").unwrap());
    assert_eq!(text(&alice, "name"), "Alice (copy)");
}

#[tokio::test]
async fn test_excluded_entries_are_never_read_or_copied() {
    let source = source()
        .with_entry(entry(
            "page",
            "page",
            false,
            json!({"title": {"en-US": "Page"}, "author": {"en-US": entry_link("shared")}}),
        ))
        .with_entry(entry("shared", "author", false, json!({"name": {"en-US": "Shared"}})));
    let target = target();

    let job = DuplicationJob::new(["page"]).exclude(["shared"]);
    let report = run_job(&job, &source, &target).await.unwrap();

    assert_eq!(source.fetches_of("shared"), 0);
    assert_eq!(target.created().len(), 1);
    assert!(report.duplicate_of("shared").is_none());

    let page = target.entry(report.duplicate_of("page").unwrap());
    assert_eq!(linked_id(&page, "author"), "shared");
}

#[tokio::test]
async fn test_excluded_root_is_skipped() {
    let source = source().with_entry(entry("a", "page", false, json!({"title": {"en-US": "A"}})));
    let target = target();

    let job = DuplicationJob::new(["a"]).exclude(["a"]);
    let report = run_job(&job, &source, &target).await.unwrap();

    assert!(target.created().is_empty());
    assert_eq!(report.roots[0].status, RootStatus::Excluded);
}

#[tokio::test]
async fn test_two_entry_cycle_is_patched() {
    let source = source()
        .with_entry(entry(
            "a",
            "page",
            false,
            json!({"title": {"en-US": "A"}, "related": {"en-US": entry_link("b")}}),
        ))
        .with_entry(entry(
            "b",
            "page",
            false,
            json!({"title": {"en-US": "B"}, "related": {"en-US": entry_link("a")}}),
        ));
    let target = target();

    let job = DuplicationJob::new(["a"]);
    let report = run_job(&job, &source, &target).await.unwrap();

    assert_eq!(target.created().len(), 2);
    let a2 = report.duplicate_of("a").unwrap();
    let b2 = report.duplicate_of("b").unwrap();

    assert_eq!(linked_id(&target.entry(a2), "related"), b2);
    assert_eq!(linked_id(&target.entry(b2), "related"), a2);
    assert_eq!(target.updated(), vec![b2.to_string()]);

    assert_eq!(report.stats.loop_references_patched, 1);
    assert!(report.unresolved.is_empty());
    assert_eq!(
        report.warnings,
        vec![JobWarning::LoopReference {
            parent_id: "b".into(),
            parent_name: Some("B".into()),
            child_id: "a".into(),
            child_name: Some("A".into()),
        }]
    );
}

#[tokio::test]
async fn test_self_reference_points_at_own_duplicate() {
    let source = source().with_entry(entry(
        "a",
        "page",
        false,
        json!({"title": {"en-US": "A"}, "related": {"en-US": [entry_link("a")]}}),
    ));
    let target = target();

    let report = run_job(&DuplicationJob::new(["a"]), &source, &target).await.unwrap();

    let a2 = report.duplicate_of("a").unwrap();
    assert_eq!(target.created(), vec![a2.to_string()]);
    assert_eq!(linked_ids(&target.entry(a2), "related"), vec![a2.to_string()]);
}

#[tokio::test]
async fn test_shared_child_is_duplicated_once() {
    // page -> left -> leaf, page -> right -> leaf
    let source = source()
        .with_entry(entry(
            "page",
            "page",
            false,
            json!({"left": {"en-US": entry_link("left")}, "right": {"en-US": entry_link("right")}}),
        ))
        .with_entry(entry("left", "section", false, json!({"child": {"en-US": entry_link("leaf")}})))
        .with_entry(entry("right", "section", false, json!({"child": {"en-US": entry_link("leaf")}})))
        .with_entry(entry("leaf", "section", false, json!({"title": {"en-US": "Leaf"}})));
    let target = target();

    let report = run_job(&DuplicationJob::new(["page"]), &source, &target).await.unwrap();

    assert_eq!(target.created().len(), 4);
    let leaf2 = report.duplicate_of("leaf").unwrap();
    assert_eq!(linked_id(&target.entry(report.duplicate_of("left").unwrap()), "child"), leaf2);
    assert_eq!(linked_id(&target.entry(report.duplicate_of("right").unwrap()), "child"), leaf2);
    assert!(report.unresolved.is_empty());
}

#[tokio::test]
async fn test_entry_shared_by_two_roots_is_duplicated_once() {
    let source = source()
        .with_entry(entry("r1", "page", false, json!({"child": {"en-US": entry_link("shared")}})))
        .with_entry(entry("r2", "page", false, json!({"child": {"en-US": entry_link("shared")}})))
        .with_entry(entry("shared", "section", false, json!({"title": {"en-US": "Shared"}})));
    let target = target();

    let report = run_job(&DuplicationJob::new(["r1", "r2"]), &source, &target).await.unwrap();

    assert_eq!(target.created().len(), 3);
    assert_eq!(source.fetches_of("shared"), 2); // once by the schema scan, once when copied
    let shared2 = report.duplicate_of("shared").unwrap();
    let r1_copy = report.duplicate_of("r1").unwrap();
    let r2_copy = report.duplicate_of("r2").unwrap();

    assert_eq!(linked_id(&target.entry(r1_copy), "child"), shared2);
    assert_eq!(linked_id(&target.entry(r2_copy), "child"), shared2);
    assert!(target.updated().contains(&r2_copy.to_string()));
    assert!(report.unresolved.is_empty());
}

#[tokio::test]
async fn test_create_failure_stops_the_job() {
    // page -> [s1, a1, s2]; authors cannot be created in the target
    let source = source()
        .with_entry(entry(
            "page",
            "page",
            false,
            json!({"parts": {"en-US": [entry_link("s1"), entry_link("a1"), entry_link("s2")]}}),
        ))
        .with_entry(entry("s1", "section", false, json!({"title": {"en-US": "One"}})))
        .with_entry(entry("a1", "author", false, json!({"name": {"en-US": "Alice"}})))
        .with_entry(entry("s2", "section", false, json!({"title": {"en-US": "Two"}})));
    let target = target().failing_create_for("author");

    let err = run_job(&DuplicationJob::new(["page"]), &source, &target).await.unwrap_err();

    match err {
        DuplicateError::Create { id, content_type, .. } => {
            assert_eq!(id, "a1");
            assert_eq!(content_type, "author");
        }
        other => panic!("unexpected error: {}", other),
    }

    // s1 stays behind; neither the later sibling nor the parent was created
    let created = target.created();
    assert_eq!(created.len(), 1);
    assert_eq!(text(&target.entry(&created[0]), "title"), "One");
    assert_eq!(source.fetches_of("s2"), 1);
}

#[tokio::test]
async fn test_links_in_name_fields_are_not_followed() {
    // "widget" is missing from the target but only reachable through a name field
    let source = source()
        .with_entry(entry(
            "page",
            "page",
            false,
            json!({"title": {"en-US": entry_link("label")}, "slug": {"en-US": "page"}}),
        ))
        .with_entry(entry("label", "widget", false, json!({"name": {"en-US": "Label"}})));
    let target = target();

    let report = run_job(&DuplicationJob::new(["page"]), &source, &target).await.unwrap();

    assert_eq!(source.fetches_of("label"), 0);
    assert_eq!(target.created().len(), 1);
    let page = target.entry(report.duplicate_of("page").unwrap());
    assert_eq!(linked_id(&page, "title"), "label");
}

#[tokio::test]
async fn test_single_level_keeps_original_links() {
    let source = source()
        .with_entry(entry(
            "page",
            "page",
            false,
            json!({"title": {"en-US": "Page"}, "author": {"en-US": entry_link("alice")}}),
        ))
        .with_entry(entry("alice", "author", false, json!({"name": {"en-US": "Alice"}})));
    let target = target();

    let job = DuplicationJob::new(["page"]).single_level(true);
    let report = run_job(&job, &source, &target).await.unwrap();

    assert_eq!(target.created().len(), 1);
    let page = target.entry(report.duplicate_of("page").unwrap());
    assert_eq!(linked_id(&page, "author"), "alice");
}

#[tokio::test]
async fn test_missing_content_type_creates_nothing() {
    let source = source()
        .with_entry(entry(
            "page",
            "page",
            false,
            json!({"hero": {"en-US": entry_link("banner")}, "card": {"en-US": entry_link("promo")}}),
        ))
        .with_entry(entry("banner", "hero", false, json!({})))
        .with_entry(entry("promo", "card", false, json!({})));
    let target = target();

    let err = run_job(&DuplicationJob::new(["page"]), &source, &target).await.unwrap_err();

    match err {
        DuplicateError::MissingContentTypes(missing) => assert_eq!(missing, vec!["card", "hero"]),
        other => panic!("unexpected error: {}", other),
    }
    assert!(target.created().is_empty());
}

#[tokio::test]
async fn test_unknown_entry_fails_before_any_write() {
    let source = source().with_entry(entry(
        "page",
        "page",
        false,
        json!({"author": {"en-US": entry_link("ghost")}}),
    ));
    let target = target();

    let err = run_job(&DuplicationJob::new(["page"]), &source, &target).await.unwrap_err();

    assert!(matches!(err, DuplicateError::Fetch { ref id, .. } if id == "ghost"));
    assert!(target.created().is_empty());
}

#[tokio::test]
async fn test_publish_mirrors_original_state() {
    let source = source()
        .with_entry(entry(
            "live",
            "page",
            true,
            json!({"title": {"en-US": "Live"}, "draft": {"en-US": entry_link("wip")}}),
        ))
        .with_entry(entry("wip", "page", false, json!({"title": {"en-US": "WIP"}})));
    let target = target();

    let job = DuplicationJob::new(["live"]).publish(true);
    let report = run_job(&job, &source, &target).await.unwrap();

    assert!(target.entry(report.duplicate_of("live").unwrap()).is_published());
    assert!(!target.entry(report.duplicate_of("wip").unwrap()).is_published());
    assert_eq!(report.stats.published, 1);
    assert_eq!(report.stats.drafts, 1);
    assert!(report.roots[0].published);
}

#[tokio::test]
async fn test_nothing_is_published_unless_requested() {
    let source = source().with_entry(entry("live", "page", true, json!({"title": {"en-US": "Live"}})));
    let target = target();

    let report = run_job(&DuplicationJob::new(["live"]), &source, &target).await.unwrap();

    assert!(target.published().is_empty());
    assert_eq!(report.stats.drafts, 1);
}

#[tokio::test]
async fn test_protected_environment_stays_draft() {
    let source = source().with_entry(entry("live", "page", true, json!({"title": {"en-US": "Live"}})));
    let target = MemoryStore::new("master").with_content_types(&["page"]);

    let job = DuplicationJob::new(["live"]).publish(true);
    let report = run_job(&job, &source, &target).await.unwrap();

    assert_eq!(target.created().len(), 1);
    assert!(target.published().is_empty());
    assert_eq!(
        report.warnings,
        vec![JobWarning::ProtectedEnvironment {
            environment: "master".into()
        }]
    );
}

fn hero_type() -> contentful_duplicate::api::ContentType {
    content_type(
        "hero",
        json!([
            {"id": "title", "type": "Symbol", "required": true},
            {"id": "image", "type": "Link", "linkType": "Asset", "required": true}
        ]),
    )
}

#[tokio::test]
async fn test_missing_required_asset_keeps_draft() {
    let source = source().with_entry(entry(
        "banner",
        "hero",
        true,
        json!({"title": {"en-US": "Banner"}, "image": {"en-US": asset_link("img1")}}),
    ));
    let target = MemoryStore::new("staging").with_content_type(hero_type());

    let job = DuplicationJob::new(["banner"]).publish(true);
    let report = run_job(&job, &source, &target).await.unwrap();

    let duplicate_id = report.duplicate_of("banner").unwrap();
    assert!(!target.entry(duplicate_id).is_published());
    assert_eq!(
        report.warnings,
        vec![JobWarning::MissingRequiredAsset {
            entry_id: "banner".into(),
            duplicate_id: duplicate_id.into(),
            field: "image".into(),
            asset_id: Some("img1".into()),
        }]
    );
}

#[tokio::test]
async fn test_present_required_asset_allows_publish() {
    let source = source().with_entry(entry(
        "banner",
        "hero",
        true,
        json!({"title": {"en-US": "Banner"}, "image": {"en-US": asset_link("img1")}}),
    ));
    let target = MemoryStore::new("staging")
        .with_content_type(hero_type())
        .with_asset("img1");

    let job = DuplicationJob::new(["banner"]).publish(true);
    let report = run_job(&job, &source, &target).await.unwrap();

    assert!(target.entry(report.duplicate_of("banner").unwrap()).is_published());
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_publish_failure_is_a_warning() {
    let source = source().with_entry(entry("live", "page", true, json!({"title": {"en-US": "Live"}})));
    let target = target().failing_publish_for("page");

    let job = DuplicationJob::new(["live"]).publish(true);
    let report = run_job(&job, &source, &target).await.unwrap();

    assert_eq!(target.created().len(), 1);
    assert_eq!(report.stats.drafts, 1);
    assert!(matches!(
        report.warnings.as_slice(),
        [JobWarning::PublishFailed { entry_id, .. }] if entry_id == "live"
    ));
}

#[tokio::test]
async fn test_published_cycle_is_republished_after_patch() {
    let source = source()
        .with_entry(entry(
            "a",
            "page",
            true,
            json!({"title": {"en-US": "A"}, "related": {"en-US": entry_link("b")}}),
        ))
        .with_entry(entry(
            "b",
            "page",
            true,
            json!({"title": {"en-US": "B"}, "related": {"en-US": entry_link("a")}}),
        ));
    let target = target();

    let job = DuplicationJob::new(["a"]).publish(true);
    let report = run_job(&job, &source, &target).await.unwrap();

    let a2 = report.duplicate_of("a").unwrap();
    let b2 = report.duplicate_of("b").unwrap();
    let b_copy = target.entry(b2);

    assert_eq!(linked_id(&b_copy, "related"), a2);
    assert!(b_copy.is_published());
    // b2 published on creation and again once its link was rewritten
    assert_eq!(target.published().iter().filter(|id| id.as_str() == b2).count(), 2);
    assert_eq!(b_copy.sys.published_version, Some(3));
}

#[tokio::test]
async fn test_root_reached_earlier_is_not_duplicated_again() {
    let source = source()
        .with_entry(entry(
            "page",
            "page",
            false,
            json!({"title": {"en-US": "Page"}, "author": {"en-US": entry_link("alice")}}),
        ))
        .with_entry(entry("alice", "author", false, json!({"name": {"en-US": "Alice"}})));
    let target = target();

    let job = DuplicationJob::new(["page", "alice", "page"]);
    let report = run_job(&job, &source, &target).await.unwrap();

    assert_eq!(target.created().len(), 2);
    assert_eq!(report.roots[0].status, RootStatus::Duplicated);
    assert_eq!(report.roots[1].status, RootStatus::AlreadyDuplicated);
    assert_eq!(report.roots[1].duplicate_id.as_deref(), report.duplicate_of("alice"));
    assert_eq!(report.roots[1].name.as_deref(), Some("Alice"));
    assert_eq!(report.roots[2].status, RootStatus::AlreadyDuplicated);
    assert!(report.unresolved.is_empty());
}

#[tokio::test]
async fn test_duplicate_within_same_environment() {
    let store = MemoryStore::new("develop")
        .with_content_types(&["page"])
        .with_entry(entry("a", "page", false, json!({"title": {"en-US": "A"}})));

    let job = DuplicationJob::new(["a"]).naming(NamingRule::new("Copy of ", ""));
    let report = run_job(&job, &store, &store).await.unwrap();

    let copy = store.entry(report.duplicate_of("a").unwrap());
    assert_eq!(text(&copy, "title"), "Copy of A");
    assert_eq!(text(&store.entry("a"), "title"), "A");
}
