//! Line-oriented publish sink over any writer.

use crate::{Result, traits::PublishSink};
use std::io::Write;

/// Writes each publication as one `topic payload` line.
///
/// Used by the CLI to print publications to stdout, where they can be piped
/// into `mosquitto_pub -l` or inspected by hand. The retained flag is not
/// written.
///
/// # Examples
///
/// ```
/// use wiegand_hardware::sinks::TopicWriterSink;
/// use wiegand_hardware::traits::PublishSink;
///
/// let mut sink = TopicWriterSink::new(Vec::new());
/// sink.publish("/devices/wiegand/controls/Len", "26", true).unwrap();
/// assert_eq!(sink.into_inner(), b"/devices/wiegand/controls/Len 26\n");
/// ```
#[derive(Debug)]
pub struct TopicWriterSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> TopicWriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> PublishSink for TopicWriterSink<W> {
    fn publish(&mut self, topic: &str, payload: &str, _retained: bool) -> Result<()> {
        writeln!(self.writer, "{topic} {payload}")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
