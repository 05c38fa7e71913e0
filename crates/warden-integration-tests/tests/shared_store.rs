//! Concurrent access through the coarse-locked handle.

use std::thread;

use warden_test::sample_vfs;
use warden_vfs::{SharedVfs, VfsError};

#[test]
fn test_concurrent_appends_are_serialized() {
    let shared = SharedVfs::from(sample_vfs().unwrap());
    shared
        .try_write(|fs| fs.write_file("/tmp/log.txt", "start"))
        .unwrap();

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let handle = shared.clone();
            thread::spawn(move || {
                for line in 0..25 {
                    handle
                        .try_write(|fs| {
                            fs.append_file("/tmp/log.txt", &format!("{worker}:{line}"), false)
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let content = shared.try_read(|fs| fs.read_file("/tmp/log.txt")).unwrap();
    assert_eq!(content.lines().count(), 101);
    assert_eq!(content.lines().next(), Some("start"));
}

#[test]
fn test_readers_and_writers_interleave() {
    let shared = SharedVfs::from(sample_vfs().unwrap());
    let writer = {
        let handle = shared.clone();
        thread::spawn(move || {
            for i in 0..50 {
                handle
                    .try_write(|fs| fs.write_file(&format!("/tmp/f{i}"), "x"))
                    .unwrap();
            }
        })
    };
    let reader = {
        let handle = shared.clone();
        thread::spawn(move || {
            let mut seen = 0usize;
            for _ in 0..50 {
                let listed = handle.try_read(|fs| fs.read_dir("/tmp", true)).unwrap();
                assert!(listed.len() >= seen);
                seen = listed.len();
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();

    assert_eq!(
        shared.try_read(|fs| fs.read_dir("/tmp", true)).unwrap().len(),
        50
    );
    assert!(matches!(
        shared.try_read(|fs| fs.read_file("/missing")),
        Err(VfsError::NotFound(_))
    ));
}
