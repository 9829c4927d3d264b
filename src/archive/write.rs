//! Write operations for `WarcWriter`.
//!
//! Owns the record pipeline: caller input → digest/dedup decision →
//! framing → segment append → CDX row. Rotation is checked before a
//! record (or request/response pair) is started, never in the middle, so
//! paired records always share a segment.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use url::Url;

use crate::cdx::{CdxRow, bare_mime, cdx_timestamp};
use crate::constants::{SOFTWARE, WARC_FORMAT};
use crate::error::{Result, WarcError};
use crate::framer::frame_record;
use crate::io::BlockPlacement;
use crate::types::{HttpRequest, HttpResponse, RecordId, RecordKind, WarcRecord};

use super::lifecycle::WarcWriter;

impl WarcWriter {
    /// Record one captured HTTP exchange: a `request` record plus either a
    /// full `response` or, when this URL already stored byte-identical
    /// content, a zero-length `revisit` pointing at the original.
    pub fn write_request_response(
        &mut self,
        url: &str,
        request: &HttpRequest,
        response: &HttpResponse,
    ) -> Result<()> {
        self.ensure_started()?;
        self.rotate_if_needed()?;

        let date = Utc::now();
        let digest = sha256_hex(&response.body);
        let duplicate_of = self
            .dedup
            .lookup(url, &digest)
            .map(|entry| entry.record_id.clone());

        // The paired record's id is minted up front so the request can
        // reference it regardless of which variant gets written.
        let paired_id = RecordId::generate();
        let warcinfo_id = self.current_warcinfo_id()?;

        let request_record = WarcRecord::Request {
            id: RecordId::generate(),
            date,
            target_uri: url.to_string(),
            concurrent_to: paired_id.clone(),
            warcinfo_id: warcinfo_id.clone(),
            content_type: "application/http; msgtype=request".to_string(),
            content: http_request_bytes(url, request),
            extra_headers: Vec::new(),
        };
        self.append_record(&request_record)?;
        self.notify_record(url, RecordKind::Request);

        match duplicate_of {
            Some(refers_to) => {
                let revisit = WarcRecord::Revisit {
                    id: paired_id,
                    date,
                    target_uri: url.to_string(),
                    warcinfo_id,
                    refers_to,
                    payload_digest: digest,
                };
                self.append_record(&revisit)?;
                self.duplicates_skipped += 1;
                self.notify_record(url, RecordKind::Revisit);
            }
            None => {
                let record = WarcRecord::Response {
                    id: paired_id,
                    date,
                    target_uri: url.to_string(),
                    warcinfo_id,
                    content_type: "application/http; msgtype=response".to_string(),
                    payload_digest: digest.clone(),
                    content: http_response_bytes(response),
                    extra_headers: Vec::new(),
                };
                let content_length = record.content().len() as u64;
                let placement = self.append_record(&record)?;
                self.dedup.record(url, &digest, record.id().clone());

                let mime = bare_mime(response.header("content-type").unwrap_or("unk"));
                self.push_cdx_row(
                    url,
                    &record.date(),
                    &mime,
                    response.status,
                    &digest,
                    content_length,
                    placement,
                )?;
                self.notify_record(url, RecordKind::Response);
            }
        }
        Ok(())
    }

    /// Record a standalone byte blob (e.g. a downloaded asset) with no
    /// associated HTTP exchange, with the same dedup behavior as
    /// [`write_request_response`](Self::write_request_response).
    pub fn write_resource(
        &mut self,
        url: &str,
        content_type: &str,
        body: &[u8],
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_started()?;
        self.rotate_if_needed()?;

        let digest = sha256_hex(body);
        if let Some(entry) = self.dedup.lookup(url, &digest) {
            let refers_to = entry.record_id.clone();
            let revisit = WarcRecord::Revisit {
                id: RecordId::generate(),
                date: timestamp,
                target_uri: url.to_string(),
                warcinfo_id: self.current_warcinfo_id()?,
                refers_to,
                payload_digest: digest,
            };
            self.append_record(&revisit)?;
            self.duplicates_skipped += 1;
            self.notify_record(url, RecordKind::Revisit);
            return Ok(());
        }

        let record = WarcRecord::Resource {
            id: RecordId::generate(),
            date: timestamp,
            target_uri: url.to_string(),
            warcinfo_id: self.current_warcinfo_id()?,
            content_type: content_type.to_string(),
            payload_digest: digest.clone(),
            content: body.to_vec(),
            extra_headers: Vec::new(),
        };
        let placement = self.append_record(&record)?;
        self.dedup.record(url, &digest, record.id().clone());

        // A stored standalone asset is by definition a successful capture.
        let mime = bare_mime(content_type);
        self.push_cdx_row(
            url,
            &timestamp,
            &mime,
            200,
            &digest,
            body.len() as u64,
            placement,
        )?;
        self.notify_record(url, RecordKind::Resource);
        Ok(())
    }

    /// Record arbitrary JSON side information about a target URI. Never
    /// deduplicated, never indexed in the CDX.
    pub fn write_metadata(
        &mut self,
        target_uri: &str,
        metadata: &serde_json::Value,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_started()?;
        self.rotate_if_needed()?;

        let record = WarcRecord::Metadata {
            id: RecordId::generate(),
            date: timestamp,
            target_uri: target_uri.to_string(),
            warcinfo_id: self.current_warcinfo_id()?,
            content_type: "application/json".to_string(),
            content: serde_json::to_vec(metadata)?,
        };
        self.append_record(&record)?;
        self.notify_record(target_uri, RecordKind::Metadata);
        Ok(())
    }

    /// Write the warcinfo record opening the current segment and remember
    /// its id for the segment's other records to reference.
    pub(crate) fn write_warcinfo(&mut self) -> Result<()> {
        let Some(segments) = self.segments.as_ref() else {
            return Err(WarcError::NotStarted);
        };
        let filename = segments.current_file_name();

        let record = WarcRecord::Warcinfo {
            id: RecordId::generate(),
            date: Utc::now(),
            filename,
            content: self.warcinfo_body(),
        };
        let id = record.id().clone();
        self.append_record(&record)?;
        self.warcinfo_id = Some(id);
        Ok(())
    }

    /// Rotation check shared by all write operations. Runs before the
    /// record (or pair) so rotation never splits related records, and
    /// writes the new segment's warcinfo immediately so the segment stays
    /// self-describing.
    pub(crate) fn rotate_if_needed(&mut self) -> Result<()> {
        let Some(segments) = self.segments.as_mut() else {
            return Err(WarcError::NotStarted);
        };
        if !segments.should_rotate() {
            return Ok(());
        }
        segments.rotate()?;
        self.write_warcinfo()
    }

    fn append_record(&mut self, record: &WarcRecord) -> Result<BlockPlacement> {
        let Some(segments) = self.segments.as_mut() else {
            return Err(WarcError::NotStarted);
        };
        let block = frame_record(record);
        let placement = segments.append(&block)?;
        self.record_count += 1;
        tracing::debug!(
            record.kind = %record.kind(),
            record.id = %record.id(),
            record.offset = placement.offset,
            record.bytes = placement.written,
            "record written"
        );
        Ok(placement)
    }

    #[allow(clippy::too_many_arguments)]
    fn push_cdx_row(
        &mut self,
        url: &str,
        date: &DateTime<Utc>,
        mime: &str,
        status: u16,
        digest: &str,
        length: u64,
        placement: BlockPlacement,
    ) -> Result<()> {
        let Some(segments) = self.segments.as_ref() else {
            return Err(WarcError::NotStarted);
        };
        self.cdx.push(CdxRow {
            urlkey: crate::surt::to_surt(url),
            timestamp: cdx_timestamp(date),
            url: url.to_string(),
            mime: mime.to_string(),
            status,
            digest: digest.to_string(),
            length,
            offset: placement.offset,
            filename: segments.current_file_name(),
        });
        Ok(())
    }

    fn current_warcinfo_id(&self) -> Result<RecordId> {
        self.warcinfo_id.clone().ok_or(WarcError::NotStarted)
    }

    fn notify_record(&self, url: &str, kind: RecordKind) {
        if let Some(observer) = &self.observer {
            observer.on_record_written(url, kind);
        }
    }

    fn warcinfo_body(&self) -> Vec<u8> {
        let mut body = String::with_capacity(128);
        body.push_str(&format!("software: {SOFTWARE}\r\n"));
        body.push_str(&format!("format: {WARC_FORMAT}\r\n"));
        body.push_str(&format!("isPartOf: {}\r\n", self.options.base_name));
        for (key, value) in &self.options.warcinfo_fields {
            body.push_str(&format!("{key}: {value}\r\n"));
        }
        body.into_bytes()
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Serialize the captured request as an `application/http` payload. The
/// request line uses the URL's path and query; unparseable URLs fall back
/// to the URL text itself rather than failing the write.
fn http_request_bytes(url: &str, request: &HttpRequest) -> Vec<u8> {
    let path = Url::parse(url).ok().map_or_else(
        || url.to_string(),
        |parsed| {
            let mut path = parsed.path().to_string();
            if let Some(query) = parsed.query() {
                path.push('?');
                path.push_str(query);
            }
            path
        },
    );

    let mut out = Vec::with_capacity(128);
    out.extend_from_slice(format!("{} {} HTTP/1.1\r\n", request.method, path).as_bytes());
    for (name, value) in &request.headers {
        out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    out.extend_from_slice(b"\r\n");
    if let Some(body) = &request.body {
        out.extend_from_slice(body);
    }
    out
}

/// Serialize the captured response as an `application/http` payload.
fn http_response_bytes(response: &HttpResponse) -> Vec<u8> {
    let mut out = Vec::with_capacity(256 + response.body.len());
    out.extend_from_slice(
        format!("HTTP/1.1 {} {}\r\n", response.status, response.status_text).as_bytes(),
    );
    for (name, value) in &response.headers {
        out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(&response.body);
    out
}
