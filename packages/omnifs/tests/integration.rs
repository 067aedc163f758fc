use std::io::{Read, SeekFrom, Write};
use std::path::Path;

use omnifs::{
    AssetBundle, BackendConfig, ContainerSession, ContentError, Environment, Error,
    LocalFileSystem, StorageContainer, Stream, Vfs,
};

fn write_fixture(dir: &Path, name: &str, content: &[u8]) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn abs(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

#[test]
fn local_facade_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let vfs = Vfs::new(Box::new(LocalFileSystem::new()));
    let path = abs(&dir, "save.dat");

    let mut stream = vfs.create(None, &path).unwrap();
    stream.write_all(b"slot 1").unwrap();
    drop(stream);

    let mut stream = vfs.open_read(None, &abs(&dir, ""), "save.dat").unwrap();
    let mut content = String::new();
    stream.read_to_string(&mut content).unwrap();
    assert_eq!(content, "slot 1");

    vfs.delete(None, &path).unwrap();
    assert!(!vfs.exists(None, &path).unwrap());
}

#[test]
fn directory_lifecycle_is_uniform() {
    let dir = tempfile::tempdir().unwrap();

    let local = Vfs::new(Box::new(LocalFileSystem::new()));
    let doclib = Vfs::from_config(
        BackendConfig::DocumentLibrary {
            root: dir.path().join("docs"),
        },
        &Environment::default(),
    )
    .unwrap();

    let cases: [(&Vfs, String); 2] = [
        (&local, abs(&dir, "nested/deep")),
        (&doclib, "nested/deep".to_string()),
    ];

    for (vfs, path) in &cases {
        vfs.create_directory(None, path).unwrap();
        vfs.create_directory(None, path).unwrap();
        assert!(vfs.directory_exists(None, path).unwrap());
        vfs.delete_directory(None, path).unwrap();
        assert!(!vfs.directory_exists(None, path).unwrap());
    }
}

#[test]
fn listing_pattern_rules_are_uniform() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "a.txt", b"a");
    write_fixture(dir.path(), "b.txt", b"b");
    write_fixture(dir.path(), "c.png", b"c");

    let vfs = Vfs::new(Box::new(LocalFileSystem::new()));
    let root = abs(&dir, "");

    assert_eq!(
        vfs.list_files(None, &root, None).unwrap(),
        vec!["a.txt", "b.txt", "c.png"]
    );
    assert_eq!(
        vfs.list_files(None, &root, Some("*.txt")).unwrap(),
        vec!["a.txt", "b.txt"]
    );
    let err = vfs.list_files(None, &root, Some("")).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn container_requires_a_handle() {
    let vfs = Vfs::new(Box::new(StorageContainer::new()));
    let err = vfs.exists(None, "anything").unwrap_err();
    assert!(matches!(err, Error::MissingStorageHandle));
}

#[test]
fn default_handle_stands_in_for_an_explicit_one() {
    let dir = tempfile::tempdir().unwrap();
    let vfs = Vfs::new(Box::new(StorageContainer::new()));
    let handle = ContainerSession::open(dir.path().join("sandbox")).unwrap();

    vfs.set_default_handle(handle.clone());
    vfs.create(None, "state.bin").unwrap();
    assert!(vfs.exists(None, "state.bin").unwrap());

    vfs.clear_default_handle();
    let err = vfs.exists(None, "state.bin").unwrap_err();
    assert!(matches!(err, Error::MissingStorageHandle));

    // An explicit handle still works after the default is gone.
    assert!(vfs.exists(Some(&handle), "state.bin").unwrap());
}

#[test]
fn explicit_handle_overrides_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let vfs = Vfs::new(Box::new(StorageContainer::new()));
    let first = ContainerSession::open(dir.path().join("first")).unwrap();
    let second = ContainerSession::open(dir.path().join("second")).unwrap();

    vfs.set_default_handle(first);
    vfs.create(None, "only-in-first").unwrap();

    assert!(!vfs.exists(Some(&second), "only-in-first").unwrap());
}

#[test]
fn bundle_open_stream_materializes_at_offset_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "level1.map", b"tile data goes here");

    let vfs = Vfs::new(Box::new(AssetBundle::new(dir.path())));
    let mut stream = vfs.open_stream(None, "", "level1", ".map").unwrap();

    // Bundle streams are sequential-only; open_stream hands back an
    // in-memory copy that supports random access.
    assert!(stream.supports_seek());
    let mut content = Vec::new();
    stream.read_to_end(&mut content).unwrap();
    assert_eq!(content, b"tile data goes here");

    stream.seek(SeekFrom::Start(5)).unwrap();
    let mut tail = String::new();
    stream.read_to_string(&mut tail).unwrap();
    assert_eq!(tail, "data goes here");
}

#[test]
fn bundle_exists_ignores_case() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("Textures")).unwrap();
    write_fixture(&dir.path().join("Textures"), "Logo.png", b"png");

    let vfs = Vfs::new(Box::new(AssetBundle::new(dir.path())));
    assert!(vfs.exists(None, "Textures/logo.PNG").unwrap());
    assert!(!vfs.exists(None, "Textures/banner.png").unwrap());
}

#[test]
fn bundle_rejects_writes_through_the_facade() {
    let dir = tempfile::tempdir().unwrap();
    let vfs = Vfs::new(Box::new(AssetBundle::new(dir.path())));

    let err = vfs.create(None, "new.txt").unwrap_err();
    assert!(matches!(err, Error::AccessDenied { .. }));
    let err = vfs.delete(None, "new.txt").unwrap_err();
    assert!(matches!(err, Error::AccessDenied { .. }));
}

#[test]
fn open_stream_error_translation() {
    let dir = tempfile::tempdir().unwrap();
    let vfs = Vfs::new(Box::new(LocalFileSystem::new()));

    let err = vfs
        .open_stream(None, &abs(&dir, ""), "missing", ".txt")
        .unwrap_err();
    assert!(matches!(err, ContentError::NotFound { .. }));

    let err = vfs
        .open_stream(None, &abs(&dir, "no-such-dir"), "file", ".txt")
        .unwrap_err();
    assert!(matches!(err, ContentError::DirectoryNotFound { .. }));
}

#[test]
fn normalize_filename_against_a_bundle() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "font.ttf", b"glyphs");

    let vfs = Vfs::new(Box::new(AssetBundle::new(dir.path())));

    assert_eq!(
        vfs.normalize_filename(None, "font", &[".otf", ".ttf"])
            .unwrap(),
        Some("font.ttf".to_string())
    );
    assert_eq!(
        vfs.normalize_filename(None, "font.ttf", &[]).unwrap(),
        Some("font.ttf".to_string())
    );
    assert_eq!(
        vfs.normalize_filename(None, "font.otf", &[".ttf"]).unwrap(),
        None
    );
}

#[test]
fn backslash_paths_reach_every_backend_normalized() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("maps")).unwrap();
    write_fixture(&dir.path().join("maps"), "town.map", b"map");

    let vfs = Vfs::new(Box::new(AssetBundle::new(dir.path())));
    assert!(vfs.exists(None, "maps\\town.map").unwrap());
}
