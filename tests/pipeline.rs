use std::io::Write;

use taskpool::{EventFilter, EventStore, ThreadPool};

fn write_log(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("failed to create temp log");
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_store_parses_fields_from_file() {
    let log = write_log(&[
        "url: http://example.com/index.html",
        "device: aa:bb:cc:dd:ee:ff",
        "timestamp: 1545523200",
        "noise line without any field",
    ]);

    let store = EventStore::with_pool(ThreadPool::with_threads(4));
    store.read_from_file(log.path()).unwrap();

    let events = store.events();
    assert_eq!(events.len(), 3);
    assert!(events.iter().any(|e| e.url == "http://example.com/index.html"));
    assert!(events.iter().any(|e| e.device == "aa:bb:cc:dd:ee:ff"));
    assert!(events.iter().any(|e| e.timestamp == "1545523200"));
    assert_eq!(store.pool().in_flight(), 0);
}

#[test]
fn test_filter_counts_flagged_urls() {
    let log = write_log(&[
        "url: http://news.example.com/story",
        "url: http://bad.example.com/xxx/clip",
        "url: http://videos.example.net/porn-clip",
        "device: 00:11:22:33:44:55",
        "timestamp: 1545609600",
    ]);

    let store = EventStore::with_pool(ThreadPool::with_threads(4));
    store.read_from_file(log.path()).unwrap();

    let filter = EventFilter::with_pool(".*(porn|xxx).*", ThreadPool::with_threads(2)).unwrap();
    assert_eq!(filter.count_matches(&store).unwrap(), 2);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let store = EventStore::with_pool(ThreadPool::with_threads(1));
    assert!(store
        .read_from_file("/definitely/not/here/input_01.txt")
        .is_err());
}

#[test]
fn test_empty_file_yields_empty_store() {
    let log = write_log(&[]);
    let store = EventStore::with_pool(ThreadPool::with_threads(2));
    store.read_from_file(log.path()).unwrap();
    assert!(store.is_empty());

    let filter = EventFilter::with_pool("xxx", ThreadPool::with_threads(1)).unwrap();
    assert_eq!(filter.count_matches(&store).unwrap(), 0);
}
