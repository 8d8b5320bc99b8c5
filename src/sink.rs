// src/sink.rs
//
// Telemetry consumption boundary. The pipeline only supplies
// CameraData; where it goes (display, log, export) is the sink's
// business.

use crate::types::CameraData;
use anyhow::Result;
use std::io::Write;

/// External consumer of per-frame telemetry records.
pub trait TelemetrySink {
    fn emit(&mut self, data: &CameraData) -> Result<()>;
}

/// Writes each record as one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn emit(&mut self, data: &CameraData) -> Result<()> {
        serde_json::to_writer(&mut self.writer, data)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
