//! Edge reader (§4.10/§6): header-driven iteration over delimited edge files, with optional
//! `.gz` auto-detection and optional threaded decompression.
//!
//! Grounded on `original_source/kgtk/join/edgereader.py`. Two redesigns from the original,
//! per spec.md §9 and DESIGN.md: the header's line counter is a plain `Cell<usize>` instead of
//! a single-element mutable list worked around a frozen class, and the optional
//! producer/consumer hand-off signals end-of-stream by closing its channel instead of sending an
//! in-band `None` sentinel.

use crate::config::CompilerConfig;
use crate::errors::EdgeReaderError;
use flate2::read::MultiGzDecoder;
use std::cell::Cell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::mpsc::{sync_channel, Receiver};
use std::thread;

const REQUIRED_COLUMNS: [&str; 3] = ["node1", "node2", "label"];

pub struct EdgeReader<R: BufRead> {
    reader: R,
    separator: char,
    column_index: HashMap<String, usize>,
    columns: Vec<String>,
    require_all_columns: bool,
    prohibit_extra_columns: bool,
    fill_missing_columns: bool,
    line_count: Cell<usize>,
    done: bool,
}

impl EdgeReader<BufReader<Box<dyn Read>>> {
    /// Open `path` (or standard input when `path` is `None` or `"-"`), auto-detecting `.gz`
    /// by filename suffix.
    pub fn open(path: Option<&str>, config: &CompilerConfig) -> Result<Self, EdgeReaderError> {
        let raw: Box<dyn Read> = match path {
            None | Some("-") => Box::new(io::stdin()),
            Some(p) => {
                let file = File::open(p).map_err(|e| EdgeReaderError::Io(e.to_string()))?;
                if p.ends_with(".gz") {
                    Box::new(MultiGzDecoder::new(file))
                } else {
                    Box::new(file)
                }
            }
        };
        Self::from_reader(BufReader::new(raw), config)
    }
}

impl<R: BufRead> EdgeReader<R> {
    pub fn from_reader(mut reader: R, config: &CompilerConfig) -> Result<Self, EdgeReaderError> {
        let separator = config
            .column_separator
            .chars()
            .next()
            .expect("CompilerConfig::column_separator validated to be one character");

        let mut header_line = String::new();
        let bytes_read = reader
            .read_line(&mut header_line)
            .map_err(|e| EdgeReaderError::Io(e.to_string()))?;
        if bytes_read == 0 {
            return Err(EdgeReaderError::HeaderError("empty input".into()));
        }

        let columns: Vec<String> = header_line
            .trim_end_matches(['\r', '\n'])
            .split(separator)
            .map(str::to_string)
            .collect();

        if columns.len() < 3 {
            return Err(EdgeReaderError::HeaderError(format!(
                "header has fewer than 3 columns: {header_line:?}"
            )));
        }

        let mut column_index = HashMap::new();
        for (i, name) in columns.iter().enumerate() {
            column_index.insert(name.clone(), i);
        }
        for required in REQUIRED_COLUMNS {
            if !column_index.contains_key(required) {
                return Err(EdgeReaderError::HeaderError(format!(
                    "header missing required column '{required}'"
                )));
            }
        }

        Ok(Self {
            reader,
            separator,
            column_index,
            columns,
            require_all_columns: config.require_all_columns,
            prohibit_extra_columns: config.prohibit_extra_columns,
            fill_missing_columns: config.fill_missing_columns,
            line_count: Cell::new(0),
            done: false,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 1-based, counted after the header (so the first data record is line 1).
    pub fn current_line(&self) -> usize {
        self.line_count.get()
    }

    fn next_record(&mut self) -> Option<Result<HashMap<String, String>, EdgeReaderError>> {
        if self.done {
            return None;
        }
        let mut line = String::new();
        let bytes_read = match self.reader.read_line(&mut line) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Some(Err(EdgeReaderError::Io(e.to_string())));
            }
        };
        if bytes_read == 0 {
            self.done = true;
            return None;
        }
        self.line_count.set(self.line_count.get() + 1);
        let line_no = self.line_count.get();

        let mut fields: Vec<String> = line
            .trim_end_matches(['\r', '\n'])
            .split(self.separator)
            .map(str::to_string)
            .collect();

        if fields.len() < self.columns.len() {
            if self.fill_missing_columns {
                fields.resize(self.columns.len(), String::new());
            } else if self.require_all_columns {
                return Some(Err(EdgeReaderError::RecordShapeError {
                    line: line_no,
                    detail: format!(
                        "expected {} columns, got {}",
                        self.columns.len(),
                        fields.len()
                    ),
                }));
            }
        } else if fields.len() > self.columns.len() && self.prohibit_extra_columns {
            return Some(Err(EdgeReaderError::RecordShapeError {
                line: line_no,
                detail: format!(
                    "expected {} columns, got {}",
                    self.columns.len(),
                    fields.len()
                ),
            }));
        }

        let mut record = HashMap::with_capacity(self.columns.len());
        for (name, value) in self.columns.iter().zip(fields.into_iter()) {
            record.insert(name.clone(), value);
        }
        Some(Ok(record))
    }
}

impl<R: BufRead> Iterator for EdgeReader<R> {
    type Item = Result<HashMap<String, String>, EdgeReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

/// Decouples line production from parsing: one worker thread reads raw lines and sends them
/// over a bounded channel; the caller drains the receiver. End-of-stream is the channel closing
/// (the sender dropping) rather than an in-band sentinel value.
pub fn spawn_line_producer(path: String, capacity: usize) -> Receiver<io::Result<String>> {
    let (tx, rx) = sync_channel(capacity);
    thread::spawn(move || {
        let result = File::open(&path).map(BufReader::new);
        let mut reader = match result {
            Ok(r) => r,
            Err(e) => {
                let _ = tx.send(Err(e));
                return;
            }
        };
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(Ok(line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        }
        // tx drops here, closing the channel — the consumer's `recv()` sees `Err` and stops.
    });
    rx
}
