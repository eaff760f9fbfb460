use crate::application::envelope::Envelope;
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

/// An envelope paired with its HTTP-style status code, as written to the
/// output stream: `{"code": 404, "response": {...}}`. Envelope keys come out
/// in sorted order.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Response {
    pub code: u16,
    pub response: Value,
}

impl Response {
    pub fn new<T: Serialize>(envelope: Envelope<T>) -> Result<Self> {
        Ok(Self {
            code: envelope.code,
            response: serde_json::to_value(&envelope)?,
        })
    }
}

/// Writes responses as JSON lines.
pub struct ResponseWriter<W: Write> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, response: &Response) -> Result<()> {
        serde_json::to_writer(&mut self.writer, response)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
