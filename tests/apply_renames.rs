use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::fs;
use track_renamer::{
    apply_renames, ApplyOptions, CancelToken, Observer, RenameFailure, RenameOutcome,
    RenameProposal, RenamerError,
};

fn apply(dir: &TempDir, pairs: &[RenameProposal]) -> track_renamer::ApplyReport {
    apply_renames(
        dir.path(),
        pairs,
        &ApplyOptions::default(),
        &CancelToken::new(),
        &mut (),
    )
    .unwrap()
}

#[test]
fn one_collision_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    dir.child("a_1.mp3").write_str("a").unwrap();
    dir.child("b_2.mp3").write_str("b").unwrap();
    dir.child("c_3.mp3").write_str("c").unwrap();
    dir.child("b 2.mp3").write_str("already here").unwrap();

    let pairs = [
        RenameProposal::new("a_1.mp3", "a 1.mp3"),
        RenameProposal::new("b_2.mp3", "b 2.mp3"),
        RenameProposal::new("c_3.mp3", "c 3.mp3"),
    ];
    let report = apply(&dir, &pairs);

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes[0].success());
    assert_eq!(report.outcomes[1].failure(), Some(&RenameFailure::TargetExists));
    assert!(report.outcomes[2].success());
    assert_eq!(report.renamed(), 2);
    assert_eq!(report.failed(), 1);

    assert_eq!(fs::read_to_string(dir.path().join("a 1.mp3")).unwrap(), "a");
    assert_eq!(fs::read_to_string(dir.path().join("c 3.mp3")).unwrap(), "c");
    assert_eq!(fs::read_to_string(dir.path().join("b_2.mp3")).unwrap(), "b");
    assert_eq!(
        fs::read_to_string(dir.path().join("b 2.mp3")).unwrap(),
        "already here"
    );
}

#[test]
fn vanished_source_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    dir.child("x_1.mp3").touch().unwrap();
    let pairs = [
        RenameProposal::new("gone.mp3", "gone now.mp3"),
        RenameProposal::new("x_1.mp3", "x 1.mp3"),
    ];
    let report = apply(&dir, &pairs);
    assert_eq!(report.outcomes[0].failure(), Some(&RenameFailure::SourceMissing));
    assert!(report.outcomes[1].success());
}

#[test]
fn empty_and_escaping_targets_are_rejected() {
    let dir = TempDir::new().unwrap();
    dir.child("song.mp3").touch().unwrap();
    let pairs = [
        RenameProposal::new("song.mp3", ""),
        RenameProposal::new("song.mp3", "../song.mp3"),
        RenameProposal::new("song.mp3", "song.mp3"),
    ];
    let report = apply(&dir, &pairs);

    assert_eq!(report.outcomes[0].failure(), Some(&RenameFailure::EmptyName));
    assert!(matches!(report.outcomes[1].failure(), Some(RenameFailure::InvalidName(_))));
    assert!(matches!(report.outcomes[2].failure(), Some(RenameFailure::InvalidName(_))));
    assert!(dir.path().join("song.mp3").exists());
    assert!(!dir.path().parent().unwrap().join("song.mp3").exists());
}

#[test]
fn case_only_rename_is_not_a_collision() {
    let dir = TempDir::new().unwrap();
    dir.child("song.mp3").write_str("x").unwrap();
    let report = apply(&dir, &[RenameProposal::new("song.mp3", "Song.mp3")]);
    assert!(report.outcomes[0].success(), "{:?}", report.outcomes[0]);
    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["Song.mp3"]);
}

fn entry_names(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(unix)]
#[test]
fn symlink_under_target_name_is_a_collision() {
    let dir = TempDir::new().unwrap();
    dir.child("a_1.mp3").write_str("a").unwrap();
    std::os::unix::fs::symlink("a_1.mp3", dir.path().join("a 1.mp3")).unwrap();

    let report = apply(&dir, &[RenameProposal::new("a_1.mp3", "a 1.mp3")]);

    assert_eq!(report.outcomes[0].failure(), Some(&RenameFailure::TargetExists));
    assert_eq!(entry_names(&dir), ["a 1.mp3", "a_1.mp3"]);
    assert!(fs::symlink_metadata(dir.path().join("a 1.mp3")).unwrap().file_type().is_symlink());
}

#[test]
fn hard_link_under_target_name_is_a_collision() {
    let dir = TempDir::new().unwrap();
    dir.child("b_2.mp3").write_str("b").unwrap();
    fs::hard_link(dir.path().join("b_2.mp3"), dir.path().join("b 2.mp3")).unwrap();

    let report = apply(&dir, &[RenameProposal::new("b_2.mp3", "b 2.mp3")]);

    assert_eq!(report.outcomes[0].failure(), Some(&RenameFailure::TargetExists));
    assert_eq!(report.renamed(), 0);
    assert_eq!(entry_names(&dir), ["b 2.mp3", "b_2.mp3"]);
}

#[test]
fn missing_directory_is_a_structural_error() {
    let dir = TempDir::new().unwrap();
    let err = apply_renames(
        &dir.path().join("missing"),
        &[RenameProposal::new("a_b.mp3", "a b.mp3")],
        &ApplyOptions::default(),
        &CancelToken::new(),
        &mut (),
    )
    .unwrap_err();
    assert!(matches!(err, RenamerError::DirectoryNotFound(_)));
}

struct CancelAfterFirst {
    cancel: CancelToken,
    outcomes: usize,
}

impl Observer for CancelAfterFirst {
    fn on_outcome(&mut self, _outcome: &RenameOutcome) {
        self.outcomes += 1;
        self.cancel.cancel();
    }
}

#[test]
fn cancellation_stops_before_the_next_pair() {
    let dir = TempDir::new().unwrap();
    dir.child("a_1.mp3").touch().unwrap();
    dir.child("b_2.mp3").touch().unwrap();
    let cancel = CancelToken::new();
    let mut observer = CancelAfterFirst {
        cancel: cancel.clone(),
        outcomes: 0,
    };

    let report = apply_renames(
        dir.path(),
        &[
            RenameProposal::new("a_1.mp3", "a 1.mp3"),
            RenameProposal::new("b_2.mp3", "b 2.mp3"),
        ],
        &ApplyOptions::default(),
        &cancel,
        &mut observer,
    )
    .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(observer.outcomes, 1);
    assert!(dir.path().join("a 1.mp3").exists());
    assert!(dir.path().join("b_2.mp3").exists());
}

#[test]
fn outcomes_serialize_with_success_flag_and_detail() {
    let dir = TempDir::new().unwrap();
    dir.child("a_1.mp3").touch().unwrap();
    dir.child("a 1.mp3").touch().unwrap();
    let report = apply(&dir, &[RenameProposal::new("a_1.mp3", "a 1.mp3")]);

    let json = serde_json::to_value(&report).unwrap();
    let first = &json["outcomes"][0];
    assert_eq!(first["original"], "a_1.mp3");
    assert_eq!(first["success"], false);
    assert_eq!(first["error_kind"], "target_exists");
    assert!(!first["error_detail"].as_str().unwrap().is_empty());
}
