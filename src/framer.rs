//! Pure framing of [`WarcRecord`] values into WARC/1.1 byte blocks.
//!
//! Responsibilities:
//! - Emit the version line, header block, payload, and record separator.
//! - Derive `Content-Length` from the actual content buffer, never from a
//!   caller-supplied value.
//! - Keep header order stable so identical records frame identically.
//!
//! No I/O happens here; the segment writer decides where the bytes land.

use chrono::SecondsFormat;

use crate::constants::{REVISIT_PROFILE_IDENTICAL_DIGEST, WARC_VERSION};
use crate::types::WarcRecord;

const CRLF: &str = "\r\n";

/// Frame a record into its on-disk byte block, trailing separator included.
#[must_use]
pub fn frame_record(record: &WarcRecord) -> Vec<u8> {
    let content = record.content();

    let mut head = String::with_capacity(512);
    head.push_str(WARC_VERSION);
    head.push_str(CRLF);
    push_header(&mut head, "WARC-Type", record.kind().as_str());
    push_header(
        &mut head,
        "WARC-Date",
        &record.date().to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    push_header(&mut head, "WARC-Record-ID", &record.id().bracketed());
    push_variant_headers(&mut head, record);
    push_header(&mut head, "Content-Length", &content.len().to_string());
    head.push_str(CRLF);

    let mut block = Vec::with_capacity(head.len() + content.len() + 4);
    block.extend_from_slice(head.as_bytes());
    block.extend_from_slice(content);
    block.extend_from_slice(b"\r\n\r\n");
    block
}

fn push_header(head: &mut String, name: &str, value: &str) {
    head.push_str(name);
    head.push_str(": ");
    head.push_str(value);
    head.push_str(CRLF);
}

fn push_digest(head: &mut String, digest: &str) {
    push_header(head, "WARC-Payload-Digest", &format!("sha-256:{digest}"));
}

fn push_extras(head: &mut String, extras: &[(String, String)]) {
    for (name, value) in extras {
        push_header(head, name, value);
    }
}

// Stable per-variant order: Target-URI, Concurrent-To, Refers-To, Profile,
// Warcinfo-ID, Filename, Payload-Digest, Content-Type, extras.
fn push_variant_headers(head: &mut String, record: &WarcRecord) {
    match record {
        WarcRecord::Warcinfo { filename, .. } => {
            push_header(head, "WARC-Filename", filename);
            push_header(head, "Content-Type", "application/warc-fields");
        }
        WarcRecord::Request {
            target_uri,
            concurrent_to,
            warcinfo_id,
            content_type,
            extra_headers,
            ..
        } => {
            push_header(head, "WARC-Target-URI", target_uri);
            push_header(head, "WARC-Concurrent-To", &concurrent_to.bracketed());
            push_header(head, "WARC-Warcinfo-ID", &warcinfo_id.bracketed());
            push_header(head, "Content-Type", content_type);
            push_extras(head, extra_headers);
        }
        WarcRecord::Response {
            target_uri,
            warcinfo_id,
            content_type,
            payload_digest,
            extra_headers,
            ..
        }
        | WarcRecord::Resource {
            target_uri,
            warcinfo_id,
            content_type,
            payload_digest,
            extra_headers,
            ..
        } => {
            push_header(head, "WARC-Target-URI", target_uri);
            push_header(head, "WARC-Warcinfo-ID", &warcinfo_id.bracketed());
            push_digest(head, payload_digest);
            push_header(head, "Content-Type", content_type);
            push_extras(head, extra_headers);
        }
        WarcRecord::Metadata {
            target_uri,
            warcinfo_id,
            content_type,
            ..
        } => {
            push_header(head, "WARC-Target-URI", target_uri);
            push_header(head, "WARC-Warcinfo-ID", &warcinfo_id.bracketed());
            push_header(head, "Content-Type", content_type);
        }
        WarcRecord::Revisit {
            target_uri,
            warcinfo_id,
            refers_to,
            payload_digest,
            ..
        } => {
            push_header(head, "WARC-Target-URI", target_uri);
            push_header(head, "WARC-Refers-To", &refers_to.bracketed());
            push_header(head, "WARC-Profile", REVISIT_PROFILE_IDENTICAL_DIGEST);
            push_header(head, "WARC-Warcinfo-ID", &warcinfo_id.bracketed());
            push_digest(head, payload_digest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordId;
    use chrono::Utc;

    fn resource(content: &[u8]) -> WarcRecord {
        WarcRecord::Resource {
            id: RecordId::generate(),
            date: Utc::now(),
            target_uri: "http://example.com/img.png".to_string(),
            warcinfo_id: RecordId::generate(),
            content_type: "image/png".to_string(),
            payload_digest: "ab12".to_string(),
            content: content.to_vec(),
            extra_headers: Vec::new(),
        }
    }

    fn header_block(block: &[u8]) -> String {
        let text = String::from_utf8_lossy(block);
        let end = text.find("\r\n\r\n").expect("header terminator");
        text[..end].to_string()
    }

    #[test]
    fn content_length_matches_buffer() {
        let block = frame_record(&resource(b"0123456789"));
        let head = header_block(&block);
        assert!(head.contains("Content-Length: 10"));
    }

    #[test]
    fn version_line_comes_first() {
        let block = frame_record(&resource(b"x"));
        assert!(block.starts_with(b"WARC/1.1\r\nWARC-Type: resource\r\n"));
    }

    #[test]
    fn block_ends_with_record_separator() {
        let body = b"payload";
        let block = frame_record(&resource(body));
        assert!(block.ends_with(b"payload\r\n\r\n"));
    }

    #[test]
    fn revisit_has_zero_length_and_refers_to() {
        let refers_to = RecordId::generate();
        let record = WarcRecord::Revisit {
            id: RecordId::generate(),
            date: Utc::now(),
            target_uri: "http://example.com/".to_string(),
            warcinfo_id: RecordId::generate(),
            refers_to: refers_to.clone(),
            payload_digest: "cafe".to_string(),
        };
        let head = header_block(&frame_record(&record));
        assert!(head.contains("Content-Length: 0"));
        assert!(head.contains(&format!("WARC-Refers-To: {}", refers_to.bracketed())));
        assert!(head.contains("WARC-Profile: http://netpreserve.org/warc/1.1/revisit/identical-payload-digest"));
    }

    #[test]
    fn warcinfo_omits_target_uri() {
        let record = WarcRecord::Warcinfo {
            id: RecordId::generate(),
            date: Utc::now(),
            filename: "site.warc".to_string(),
            content: b"software: test\r\n".to_vec(),
        };
        let head = header_block(&frame_record(&record));
        assert!(!head.contains("WARC-Target-URI"));
        assert!(head.contains("WARC-Filename: site.warc"));
        assert!(head.contains("Content-Type: application/warc-fields"));
    }

    #[test]
    fn digest_is_labeled_sha256() {
        let head = header_block(&frame_record(&resource(b"x")));
        assert!(head.contains("WARC-Payload-Digest: sha-256:ab12"));
    }

    #[test]
    fn extra_headers_pass_through_after_content_type() {
        let record = WarcRecord::Resource {
            id: RecordId::generate(),
            date: Utc::now(),
            target_uri: "http://example.com/".to_string(),
            warcinfo_id: RecordId::generate(),
            content_type: "text/plain".to_string(),
            payload_digest: "00".to_string(),
            content: Vec::new(),
            extra_headers: vec![("WARC-IP-Address".to_string(), "203.0.113.9".to_string())],
        };
        let head = header_block(&frame_record(&record));
        let content_type_at = head.find("Content-Type:").expect("content type");
        let extra_at = head.find("WARC-IP-Address: 203.0.113.9").expect("extra");
        assert!(extra_at > content_type_at);
    }

    #[test]
    fn identical_records_frame_identically() {
        let record = resource(b"same");
        assert_eq!(frame_record(&record), frame_record(&record));
    }
}
