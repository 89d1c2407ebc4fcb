//! Selective sync planning.

use std::path::Path;

use huginn::mirror::{PlanStep, PlannedBundle, PlannedFile};
use huginn::{RemoteEntry, RequiredFileSet, SyncPlanner};

fn listing() -> Vec<RemoteEntry> {
    vec![
        RemoteEntry::file("config.json", 10),
        RemoteEntry::file("README.md", 2000),
        RemoteEntry::file(".gitattributes", 50),
        RemoteEntry::file("vocab.txt", 30),
        RemoteEntry::directory("Seg.mlmodelc"),
        RemoteEntry::directory("Emb.mlmodelc"),
        RemoteEntry::directory("docs"),
    ]
}

fn bundles(steps: &[PlanStep]) -> Vec<&PlannedBundle> {
    steps
        .iter()
        .filter_map(|step| match step {
            PlanStep::Bundle(bundle) => Some(bundle),
            PlanStep::File(_) => None,
        })
        .collect()
}

fn files(steps: &[PlanStep]) -> Vec<&PlannedFile> {
    steps
        .iter()
        .filter_map(|step| match step {
            PlanStep::File(file) => Some(file),
            PlanStep::Bundle(_) => None,
        })
        .collect()
}

#[test]
fn essential_files_and_bare_bundle() {
    let root = Path::new("/cache/model");
    let required: RequiredFileSet = ["Seg.mlmodelc"].into_iter().collect();

    let plan = SyncPlanner::default().plan(&listing(), &required, root);

    let files = files(&plan.steps);
    let names: Vec<_> = files.iter().map(|f| f.remote_path.as_str()).collect();
    assert_eq!(names, vec!["config.json", "vocab.txt"]);
    assert_eq!(files[0].destination, root.join("config.json"));
    assert_eq!(files[0].size, 10);

    let bundles = bundles(&plan.steps);
    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles[0].remote_path, "Seg.mlmodelc");
    assert_eq!(bundles[0].local_root, root.join("Seg.mlmodelc"));

    assert!(plan.skipped.contains(&"README.md".to_string()));
    assert!(plan.skipped.contains(&"Emb.mlmodelc".to_string()));
    assert!(plan.skipped.contains(&"docs".to_string()));
}

#[test]
fn variant_prefixed_bundle_lands_under_variant() {
    let root = Path::new("/cache/model");
    let required: RequiredFileSet = ["variant-a/Seg.mlmodelc"].into_iter().collect();

    let plan = SyncPlanner::default().plan(&listing(), &required, root);
    let bundles = bundles(&plan.steps);

    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles[0].remote_path, "Seg.mlmodelc");
    assert_eq!(
        bundles[0].local_root,
        root.join("variant-a").join("Seg.mlmodelc")
    );
}

#[test]
fn variants_coexist() {
    let root = Path::new("/cache/model");
    let required: RequiredFileSet = ["Seg.mlmodelc", "v1/Seg.mlmodelc", "v2/Seg.mlmodelc"]
        .into_iter()
        .collect();

    let plan = SyncPlanner::default().plan(&listing(), &required, root);
    let roots: Vec<_> = bundles(&plan.steps)
        .iter()
        .map(|b| b.local_root.clone())
        .collect();

    assert_eq!(
        roots,
        vec![
            root.join("Seg.mlmodelc"),
            root.join("v1").join("Seg.mlmodelc"),
            root.join("v2").join("Seg.mlmodelc"),
        ]
    );
}

#[test]
fn unsafe_entries_are_skipped() {
    let entries = vec![
        RemoteEntry::file("../escape.json", 1),
        RemoteEntry::file("/etc/config.json", 1),
        RemoteEntry::directory("../Seg.mlmodelc"),
    ];
    let required: RequiredFileSet = ["../Seg.mlmodelc"].into_iter().collect();

    let plan = SyncPlanner::default().plan(&entries, &required, Path::new("/cache/m"));
    assert!(plan.steps.is_empty());
    assert_eq!(plan.skipped.len(), 3);
}

#[test]
fn lfs_size_is_planned() {
    let mut entry = RemoteEntry::file("tokenizer.json", 134);
    entry.lfs = Some(huginn::LfsInfo {
        size: 9000,
        oid: None,
        pointer_size: Some(134),
    });

    let plan = SyncPlanner::default().plan(&[entry], &RequiredFileSet::new(), Path::new("/c"));
    assert_eq!(files(&plan.steps)[0].size, 9000);
}
