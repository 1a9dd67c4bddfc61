//! `multipart/form-data` encoding.
//!
//! Scalar fields are emitted first, then file parts, each in the order they
//! were added. Framing is CRLF throughout; file content is embedded
//! byte-exact. The boundary is 16 random bytes, hex encoded, fresh per
//! encoder.

use std::path::Path;

use rand::Rng;

use crate::Error;

const EOL: &str = "\r\n";
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Encoder for a `multipart/form-data` body.
pub struct Multipart {
    boundary: String,
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

struct FilePart {
    name: String,
    filename: String,
    mime: String,
    data: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Multipart {
            boundary: generate_boundary(),
            fields: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Add a scalar field.
    pub fn field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Add a file part by path. The file is read fully into memory, the
    /// filename is the path base name and the mime type is inferred from
    /// the extension.
    pub fn file(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.part(name, filename, data);
        Ok(())
    }

    /// Add a file part from already-read content.
    pub fn part(&mut self, name: impl Into<String>, filename: impl Into<String>, data: Vec<u8>) {
        let filename = filename.into();
        let mime = mime_guess::from_path(&filename)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        self.files.push(FilePart {
            name: name.into(),
            filename,
            mime,
            data,
        });
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn body(&self) -> Vec<u8> {
        let mut body = Vec::new();
        let separator = format!("--{}", self.boundary);

        for (name, value) in &self.fields {
            push_line(&mut body, &separator);
            push_line(
                &mut body,
                &format!("Content-Disposition: form-data; name=\"{}\"", name),
            );
            push_line(&mut body, "");
            push_line(&mut body, value);
        }

        for file in &self.files {
            push_line(&mut body, &separator);
            push_line(
                &mut body,
                &format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                    file.name, file.filename
                ),
            );
            push_line(&mut body, &format!("Content-Type: {}", file.mime));
            push_line(&mut body, "Content-Transfer-Encoding: binary");
            push_line(&mut body, &format!("Content-Length: {}", file.data.len()));
            push_line(&mut body, "");
            body.extend_from_slice(&file.data);
            body.extend_from_slice(EOL.as_bytes());
        }

        push_line(&mut body, &format!("{}--", separator));
        body
    }
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}

fn push_line(body: &mut Vec<u8>, line: &str) {
    body.extend_from_slice(line.as_bytes());
    body.extend_from_slice(EOL.as_bytes());
}

fn generate_boundary() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
