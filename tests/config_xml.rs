use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use track_renamer::config::{
    default_config_path, default_log_path, default_rules_db_path, load_or_init, LoadResult,
    CONFIG_ENV_VAR,
};
use track_renamer::{load_config_from_xml_path, LogLevel};

#[test]
fn reads_all_fields_and_trims_whitespace() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    let music = td.path().join("Downloaded Music");
    let db = td.path().join("rules.db");
    let log = td.path().join("renamer.log");
    let xml = format!(
        r#"<config>
  <music_dir>  {music}  </music_dir>
  <rules_db>
    {db}
  </rules_db>
  <log_level> info </log_level>
  <log_file>{log}</log_file>
  <seed_defaults> false </seed_defaults>
</config>"#,
        music = music.display(),
        db = db.display(),
        log = log.display()
    );
    fs::write(&cfg_path, xml).unwrap();

    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    assert_eq!(cfg.music_dir, music);
    assert_eq!(cfg.rules_db, db);
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(cfg.log_file, Some(log));
    assert!(!cfg.seed_defaults);
}

#[test]
fn empty_elements_keep_defaults() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(
        &cfg_path,
        "<config><music_dir>/srv/music</music_dir><log_file></log_file><log_level/></config>",
    )
    .unwrap();
    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    assert_eq!(cfg.music_dir, PathBuf::from("/srv/music"));
    assert_eq!(cfg.log_level, LogLevel::Normal);
    assert!(cfg.seed_defaults);
}

#[test]
fn unknown_element_is_rejected() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><music_folder>/x</music_folder></config>").unwrap();
    let err = load_config_from_xml_path(&cfg_path).unwrap_err();
    assert!(format!("{err:#}").contains("music_folder"), "{err:#}");
}

#[test]
fn bad_values_are_rejected() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><log_level>loud</log_level></config>").unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());

    fs::write(&cfg_path, "<config><seed_defaults>sometimes</seed_defaults></config>").unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());

    fs::write(&cfg_path, "<config><music_dir>/x</music_dir>").unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());
}

#[test]
fn explicit_missing_config_is_an_error() {
    let td = tempdir().unwrap();
    assert!(load_or_init(Some(&td.path().join("absent.xml"))).is_err());
}

#[test]
#[serial]
fn env_directory_gets_config_xml_and_colocated_data() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, &base);
    }

    let cfg_path = default_config_path().unwrap();
    assert_eq!(cfg_path, base.join("config.xml"));
    assert_eq!(default_log_path().unwrap().parent().unwrap(), base.as_path());
    assert_eq!(default_rules_db_path().unwrap(), base.join("rules.db"));

    // Env-selected file is missing: defaults, and no template is written.
    let loaded = load_or_init(None).unwrap();
    assert!(matches!(loaded, LoadResult::Defaults(_)));
    assert!(!cfg_path.exists());

    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }
}

#[test]
#[serial]
fn env_file_is_loaded() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("custom.xml");
    fs::write(&cfg_path, "<config><log_level>debug</log_level></config>").unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, &cfg_path);
    }

    let loaded = load_or_init(None).unwrap();
    match &loaded {
        LoadResult::Loaded(cfg, path) => {
            assert_eq!(path, &cfg_path);
            assert_eq!(cfg.log_level, LogLevel::Debug);
        }
        other => panic!("expected Loaded, got {other:?}"),
    }

    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }
}

#[cfg(unix)]
#[test]
#[serial]
fn template_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;
    let td = tempdir().unwrap();
    let path = td.path().join("track_renamer").join("config.xml");
    track_renamer::config::create_template_config(&path).unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("<seed_defaults>true</seed_defaults>"));
}
