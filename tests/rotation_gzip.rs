//! Segment rotation and gzip-output tests: naming, self-describing
//! segments, dedup across rotations, and seekable compressed members.

use std::fs;
use std::io::Read;

use chrono::Utc;
use flate2::read::{GzDecoder, MultiGzDecoder};
use tempfile::TempDir;
use webarc_core::{HttpRequest, HttpResponse, WarcWriter, WarcWriterOptions};

struct ParsedRecord {
    offset: usize,
    headers: Vec<(String, String)>,
    content: Vec<u8>,
}

impl ParsedRecord {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn kind(&self) -> &str {
        self.header("WARC-Type").unwrap_or("")
    }
}

fn parse_warc(bytes: &[u8]) -> Vec<ParsedRecord> {
    let mut records = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let rest = &bytes[pos..];
        let head_end = rest
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header terminator");
        let head = std::str::from_utf8(&rest[..head_end]).expect("utf8 header");

        let mut lines = head.split("\r\n");
        assert_eq!(lines.next(), Some("WARC/1.1"), "version line");
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(": "))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        let length: usize = headers
            .iter()
            .find(|(key, _)| key == "Content-Length")
            .expect("content length header")
            .1
            .parse()
            .expect("numeric content length");

        let content_start = pos + head_end + 4;
        let content = bytes[content_start..content_start + length].to_vec();
        records.push(ParsedRecord {
            offset: pos,
            headers,
            content,
        });
        pos = content_start + length + 4;
    }
    records
}

#[test]
fn overflow_rotates_into_self_describing_segment() {
    let dir = TempDir::new().expect("tmp");
    let options = WarcWriterOptions::builder()
        .output_dir(dir.path())
        .base_name("site")
        .max_segment_bytes(600)
        .build();
    let mut writer = WarcWriter::new(options);

    let big = vec![0xAAu8; 700];
    writer
        .write_resource("http://ex.com/big", "application/octet-stream", &big, Utc::now())
        .expect("write big");
    // Cumulative bytes now exceed the threshold, so this write opens
    // segment 00002 first.
    writer
        .write_resource("http://ex.com/small", "text/plain", b"tiny", Utc::now())
        .expect("write small");
    let finished = writer.finish().expect("finish");

    assert_eq!(finished.stats.file_count, 2);

    let second_path = dir.path().join("site-00002.warc");
    assert!(second_path.exists());
    let second = parse_warc(&fs::read(&second_path).expect("read second"));
    assert_eq!(second[0].kind(), "warcinfo");
    assert_eq!(second[0].header("WARC-Filename"), Some("site-00002.warc"));
    assert_eq!(second[1].kind(), "resource");
    assert_eq!(
        second[1].header("WARC-Warcinfo-ID"),
        second[0].header("WARC-Record-ID"),
        "records reference their own segment's warcinfo"
    );

    // The second segment's CDX row names the rotated file and an offset
    // local to it.
    let cdx = fs::read_to_string(&finished.cdx_path).expect("read cdx");
    let small_row = cdx
        .lines()
        .find(|line| line.contains("http://ex.com/small"))
        .expect("row for rotated record");
    let fields: Vec<&str> = small_row.split(' ').collect();
    assert_eq!(fields[9], "site-00002.warc");
    let offset: usize = fields[8].parse().expect("offset");
    assert_eq!(offset, second[1].offset);
}

#[test]
fn dedup_survives_rotation() {
    let dir = TempDir::new().expect("tmp");
    let options = WarcWriterOptions::builder()
        .output_dir(dir.path())
        .base_name("site")
        .max_segment_bytes(400)
        .build();
    let mut writer = WarcWriter::new(options);

    let payload = vec![0x5Au8; 500];
    writer
        .write_resource("http://ex.com/asset", "image/png", &payload, Utc::now())
        .expect("first write");
    // Rotation happens here; the identical payload must still be
    // recognized from the previous segment.
    writer
        .write_resource("http://ex.com/asset", "image/png", &payload, Utc::now())
        .expect("second write");
    let finished = writer.finish().expect("finish");

    assert_eq!(finished.stats.file_count, 2);
    assert_eq!(finished.stats.duplicates_skipped, 1);
    assert_eq!(finished.stats.cdx_records, 1);

    let second = parse_warc(&fs::read(dir.path().join("site-00002.warc")).expect("read second"));
    let kinds: Vec<&str> = second.iter().map(ParsedRecord::kind).collect();
    assert_eq!(kinds, vec!["warcinfo", "revisit"]);

    let first = parse_warc(&fs::read(&finished.warc_path).expect("read first"));
    assert_eq!(
        second[1].header("WARC-Refers-To"),
        first[1].header("WARC-Record-ID"),
        "revisit points across the rotation at the original record"
    );
}

#[test]
fn request_response_pairs_never_split_across_segments() {
    let dir = TempDir::new().expect("tmp");
    let options = WarcWriterOptions::builder()
        .output_dir(dir.path())
        .base_name("site")
        .max_segment_bytes(700)
        .build();
    let mut writer = WarcWriter::new(options);

    let request = HttpRequest {
        method: "GET".to_string(),
        headers: vec![("Host".to_string(), "ex.com".to_string())],
        body: None,
    };
    for index in 0..4 {
        let response = HttpResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("Content-Type".to_string(), "text/html".to_string())],
            body: format!("page {index} {}", "x".repeat(400)).into_bytes(),
        };
        writer
            .write_request_response(&format!("http://ex.com/p{index}"), &request, &response)
            .expect("write exchange");
    }
    let finished = writer.finish().expect("finish");
    assert!(finished.stats.file_count > 1, "rotation exercised");

    for sequence in 1..=finished.stats.file_count {
        let name = if sequence == 1 {
            "site.warc".to_string()
        } else {
            format!("site-{sequence:05}.warc")
        };
        let records = parse_warc(&fs::read(dir.path().join(&name)).expect("read segment"));
        let requests = records.iter().filter(|r| r.kind() == "request").count();
        let responses = records
            .iter()
            .filter(|r| matches!(r.kind(), "response" | "revisit"))
            .count();
        assert_eq!(requests, responses, "pairs stay whole in {name}");
    }
}

#[test]
fn gzip_writes_one_member_per_record() {
    let dir = TempDir::new().expect("tmp");
    let options = WarcWriterOptions::builder()
        .output_dir(dir.path())
        .base_name("site")
        .gzip(true)
        .build();
    let mut writer = WarcWriter::new(options);

    writer
        .write_resource("http://ex.com/a", "text/plain", b"alpha", Utc::now())
        .expect("write a");
    writer
        .write_resource("http://ex.com/b", "text/plain", b"beta", Utc::now())
        .expect("write b");
    let finished = writer.finish().expect("finish");

    assert_eq!(
        finished.warc_path.file_name().and_then(|n| n.to_str()),
        Some("site.warc.gz")
    );
    let bytes = fs::read(&finished.warc_path).expect("read gz");
    assert_eq!(finished.stats.total_bytes, bytes.len() as u64);

    // Whole-file decode sees all three records (warcinfo + two resources).
    let mut inflated = Vec::new();
    MultiGzDecoder::new(bytes.as_slice())
        .read_to_end(&mut inflated)
        .expect("inflate all members");
    let records = parse_warc(&inflated);
    let kinds: Vec<&str> = records.iter().map(ParsedRecord::kind).collect();
    assert_eq!(kinds, vec!["warcinfo", "resource", "resource"]);
}

#[test]
fn gzip_cdx_offsets_address_member_boundaries() {
    let dir = TempDir::new().expect("tmp");
    let options = WarcWriterOptions::builder()
        .output_dir(dir.path())
        .base_name("site")
        .gzip(true)
        .build();
    let mut writer = WarcWriter::new(options);

    writer
        .write_resource("http://ex.com/a", "text/plain", b"alpha", Utc::now())
        .expect("write a");
    writer
        .write_resource("http://ex.com/b", "text/plain", b"beta", Utc::now())
        .expect("write b");
    let finished = writer.finish().expect("finish");

    let bytes = fs::read(&finished.warc_path).expect("read gz");
    let cdx = fs::read_to_string(&finished.cdx_path).expect("read cdx");
    for line in cdx.lines().skip(1) {
        let fields: Vec<&str> = line.split(' ').collect();
        let url = fields[2];
        let offset: usize = fields[8].parse().expect("offset");
        assert_eq!(fields[9], "site.warc.gz");

        // Seeking to the row's offset yields one inflatable member holding
        // exactly the indexed record.
        let mut member = String::new();
        GzDecoder::new(&bytes[offset..])
            .read_to_string(&mut member)
            .expect("inflate member at offset");
        assert!(member.starts_with("WARC/1.1\r\nWARC-Type: resource\r\n"));
        assert!(member.contains(&format!("WARC-Target-URI: {url}\r\n")));
    }
}
