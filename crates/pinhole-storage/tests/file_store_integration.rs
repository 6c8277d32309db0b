use std::fs;
use std::io::Write;

use pinhole_generator::Seed;
use pinhole_storage::{
    CollisionPolicy, FileStore, ReadRepository, Repository, ShortCode, StoreError, StoreSettings,
};
use tempfile::TempDir;

fn settings() -> StoreSettings {
    StoreSettings::builder()
        .seed(Seed::from_secret("integration"))
        .build()
}

#[test]
fn open_path_creates_missing_log() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("urls.txt");

    let (store, recovery) = FileStore::open_path(&path, settings()).expect("open store");

    assert!(path.exists());
    assert!(store.is_empty());
    assert!(recovery.is_clean());
}

#[test]
fn records_survive_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("urls.txt");

    let (first, second) = {
        let (store, _) = FileStore::open_path(&path, settings()).expect("open store");
        let first = store.store_url("https://example.com/a").expect("store a");
        let second = store.store_url("https://example.com/b").expect("store b");
        store.increment(&first.code).expect("increment");
        store.increment(&first.code).expect("increment");
        store.sync().expect("sync");
        (first, second)
    };

    let (store, recovery) = FileStore::open_path(&path, settings()).expect("reopen store");

    assert!(recovery.is_clean());
    assert_eq!(recovery.lines_applied, 4);
    assert_eq!(recovery.records, 2);
    assert_eq!(store.len(), 2);

    let a = store.get_by_code(&first.code).expect("a");
    assert_eq!(a.url, "https://example.com/a");
    assert_eq!(a.visit_count, 2);
    assert_eq!(store.get_by_code(&second.code).expect("b"), second);
}

#[test]
fn log_is_one_json_object_per_line() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("urls.txt");

    let (store, _) = FileStore::open_path(&path, settings()).expect("open store");
    let record = store.store_url("http://example.com/path").expect("store");
    store.increment(&record.code).expect("increment");

    let content = fs::read_to_string(&path).expect("read log");
    assert_eq!(
        content,
        format!(
            "{{\"code\":\"{code}\",\"url\":\"http://example.com/path\",\"visit\":0}}\n\
             {{\"code\":\"{code}\",\"url\":\"http://example.com/path\",\"visit\":1}}\n",
            code = record.code
        )
    );
}

#[test]
fn partial_failure_bootstrap() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("urls.txt");
    fs::write(
        &path,
        concat!(
            "{\"code\":\"aaa\",\"url\":\"u1\",\"visit\":4}\n",
            "this is not json\n",
            "{\"code\":\"bbb\",\"url\":\"u2\"}\n",
        ),
    )
    .expect("seed log");

    let (store, recovery) = FileStore::open_path(&path, settings()).expect("open store");

    assert_eq!(store.get_by_code(&ShortCode::new("aaa")).unwrap().visit_count, 4);
    assert_eq!(store.get_by_code(&ShortCode::new("bbb")).unwrap().url, "u2");
    assert_eq!(recovery.invalid_lines.len(), 1);
    assert_eq!(recovery.invalid_lines[0].number, 2);

    match recovery.into_result() {
        Err(StoreError::InvalidFormat { count, lines }) => {
            assert_eq!(count, 1);
            assert_eq!(lines, vec!["this is not json".to_string()]);
        }
        other => panic!("expected InvalidFormat, got {other:?}"),
    }
}

#[test]
fn appends_after_torn_write_stay_readable() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("urls.txt");
    {
        let mut file = fs::File::create(&path).expect("create log");
        file.write_all(b"{\"code\":\"aaa\",\"url\":\"u1\"}\n{\"code\":\"aaa\",\"u")
            .expect("write torn log");
    }

    {
        let (store, recovery) = FileStore::open_path(&path, settings()).expect("open store");
        assert_eq!(recovery.invalid_lines.len(), 1);
        store.increment(&ShortCode::new("aaa")).expect("increment");
    }

    let (store, recovery) = FileStore::open_path(&path, settings()).expect("reopen store");
    assert_eq!(recovery.invalid_lines.len(), 1);
    assert_eq!(store.get_by_code(&ShortCode::new("aaa")).unwrap().visit_count, 1);
}

#[test]
fn same_seed_reproduces_codes_across_fresh_logs() {
    let dir = TempDir::new().expect("temp dir");

    let codes = |name: &str| {
        let (store, _) = FileStore::open_path(dir.path().join(name), settings()).expect("open store");
        (0..5)
            .map(|i| store.store_url(&format!("https://example.com/{i}")).unwrap().code)
            .collect::<Vec<_>>()
    };

    assert_eq!(codes("one.txt"), codes("two.txt"));
}

#[test]
fn retry_policy_is_carried_by_settings() {
    let dir = TempDir::new().expect("temp dir");
    let settings = StoreSettings::builder()
        .collision_policy(CollisionPolicy::Retry { attempts: 3 })
        .build();

    let (store, _) = FileStore::open_path(dir.path().join("urls.txt"), settings).expect("open store");

    assert_eq!(store.collision_policy(), CollisionPolicy::Retry { attempts: 3 });
}
