use rotalog::{debugv, errorf, infof, noticef, warnv, Level, RotatingWriter, SuffixFormat};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Checks `YYYY/MM/DD HH:MM:SS [LEVEL] message` and returns the message.
fn message_of(line: &str) -> &str {
    let (stamp, rest) = line.split_at(19);
    let digits: Vec<char> = stamp.chars().filter(char::is_ascii_digit).collect();
    assert_eq!(digits.len(), 14, "malformed timestamp in {line:?}");
    assert_eq!(&stamp[4..5], "/");
    assert_eq!(&stamp[13..14], ":");
    let rest = rest.strip_prefix(" [").expect("level tag");
    let (level, message) = rest.split_once("] ").expect("closing bracket");
    assert!(level.parse::<Level>().is_ok(), "unknown level in {line:?}");
    message
}

#[test]
fn second_rotation_moves_first_window_aside() {
    let dir = TempDir::new().unwrap();
    let writer = RotatingWriter::new(dir.path().join("logs/app"), SuffixFormat::Second);

    writer.notice("hello");
    let first = fs::read_to_string(dir.path().join("logs/app")).unwrap();
    assert_eq!(message_of(first.trim_end()), "hello");
    assert!(first.ends_with(" [NOTICE] hello\n"));

    thread::sleep(Duration::from_millis(1200));
    writer.notice("again");

    let names = entries(&dir.path().join("logs"));
    assert_eq!(names.len(), 2, "unexpected files {names:?}");
    assert_eq!(names[0], "app");

    // The archived name is the first line's timestamp, digits only.
    let suffix: String = first[..19].chars().filter(char::is_ascii_digit).collect();
    assert_eq!(names[1], format!("app.{suffix}"));
    assert_eq!(
        fs::read_to_string(dir.path().join("logs").join(&names[1])).unwrap(),
        first
    );

    let live = fs::read_to_string(dir.path().join("logs/app")).unwrap();
    assert_eq!(live.lines().count(), 1);
    assert!(live.ends_with(" [NOTICE] again\n"));
}

#[test]
fn concurrent_writers_never_interleave() {
    const THREADS: usize = 8;
    const LINES: usize = 250;

    let dir = TempDir::new().unwrap();
    let writer = Arc::new(RotatingWriter::new(
        dir.path().join("app"),
        SuffixFormat::Second,
    ));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for i in 0..LINES {
                    infof!(writer, "worker-{t} line-{i}");
                    if i % 50 == 0 {
                        thread::sleep(Duration::from_millis(5));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut seen = HashSet::new();
    for name in entries(dir.path()) {
        let contents = fs::read_to_string(dir.path().join(&name)).unwrap();
        assert!(contents.ends_with('\n'));
        for line in contents.lines() {
            let message = message_of(line);
            assert!(message.starts_with("worker-"), "torn line {line:?}");
            assert!(seen.insert(message.to_string()), "duplicate line {line:?}");
        }
    }
    assert_eq!(seen.len(), THREADS * LINES);
}

#[test]
fn format_macros_and_level_methods_share_one_line_format() {
    let dir = TempDir::new().unwrap();
    let writer = RotatingWriter::new(dir.path().join("app"), SuffixFormat::Day);

    writer.debug("d");
    writer.info("i");
    writer.warn("w");
    writer.error("e");
    noticef!(writer, "{} of {}", 1, 2);
    errorf!(writer, "code {code:#x}", code = 255);
    warnv!(writer, "retry ", 3, 5, "s");
    debugv!(writer, String::from("n="), 1.5);

    let contents = fs::read_to_string(dir.path().join("app")).unwrap();
    let tagged: Vec<_> = contents
        .lines()
        .map(|line| line.split_at(20).1.to_string())
        .collect();
    assert_eq!(
        tagged,
        [
            "[DEBUG] d",
            "[INFO] i",
            "[WARN] w",
            "[ERROR] e",
            "[NOTICE] 1 of 2",
            "[ERROR] code 0xff",
            "[WARN] retry 3 5s",
            "[DEBUG] n=1.5",
        ]
    );
}
