//! The cooperative event loop.
//!
//! ```text
//!            wait_for_edges(poll_interval)
//! EdgeSource ─────────────────────────────> FrameAccumulator::push
//!                                                   │
//!            now()                                  │ RawFrame
//! EdgeSource ─────────────────────────────> FrameAccumulator::poll
//!                                                   │
//!                                                   v
//!                     PublishSink <── FramePublisher <── FormatDecoder
//! ```
//!
//! One task owns everything. Each iteration checks the cancellation token,
//! waits at most `poll_interval` for edges, pushes them, then polls the
//! accumulator so an idle frame closes even when no further edges arrive.

use crate::error::Result;
use crate::stats::GatewayStats;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wiegand_core::{CaptureConfig, DecoderConfig, DeviceId};
use wiegand_hardware::{EdgeSource, PublishSink};
use wiegand_protocol::{DecodedFrame, FormatDecoder, FrameAccumulator, FramePublisher, RawFrame};

/// Decodes frames from an edge source and publishes them to a sink.
///
/// # Examples
///
/// ```
/// use tokio_util::sync::CancellationToken;
/// use wiegand_core::Timestamp;
/// use wiegand_gateway::Gateway;
/// use wiegand_hardware::mock::MemorySink;
/// use wiegand_hardware::replay::ReplayEdgeSource;
///
/// # #[tokio::main]
/// # async fn main() -> wiegand_gateway::Result<()> {
/// let capture = "0 D1\n2000 D0\n4000 D1\n";
/// let source = ReplayEdgeSource::from_capture(capture.as_bytes())?;
/// let sink = MemorySink::new();
///
/// let mut gateway = Gateway::builder(source, sink.clone()).skip_meta(true).build()?;
/// let stats = gateway.run(&CancellationToken::new()).await?;
///
/// // Three bits is below the minimum frame length.
/// assert_eq!(stats.frames_emitted, 0);
/// assert_eq!(stats.accumulator.discarded_frames, 1);
/// assert!(sink.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Gateway<S: EdgeSource, P: PublishSink> {
    source: S,
    sink: P,
    capture: CaptureConfig,
    accumulator: FrameAccumulator,
    decoder: FormatDecoder,
    publisher: FramePublisher,
    skip_meta: bool,
    last_frame: Option<DecodedFrame>,
    previous_frame: Option<DecodedFrame>,
    stats: GatewayStats,
}

impl<S: EdgeSource, P: PublishSink> Gateway<S, P> {
    pub fn builder(source: S, sink: P) -> GatewayBuilder<S, P> {
        GatewayBuilder::new(source, sink)
    }

    /// Run until the token is cancelled or the source disconnects.
    ///
    /// Device meta is published first unless `skip_meta` is set.
    ///
    /// # Errors
    ///
    /// Returns an error only if meta publication fails; nothing is read
    /// from the source in that case.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<GatewayStats> {
        if !self.skip_meta {
            self.publish_meta()?;
        }

        let poll_interval = self.capture.poll_interval();
        info!(
            source = %self.source.source_info(),
            device = %self.publisher.device_id(),
            "Gateway started"
        );

        loop {
            if cancel.is_cancelled() {
                info!("Cancellation requested");
                break;
            }

            match self.source.wait_for_edges(poll_interval).await {
                Ok(edges) => {
                    for edge in edges {
                        if let Some(raw) = self.accumulator.push(edge) {
                            self.handle_frame(&raw);
                        }
                    }
                }
                Err(e) if e.is_disconnected() => {
                    info!(error = %e, "Edge source ended");
                    break;
                }
                Err(e) => {
                    self.stats.read_errors += 1;
                    warn!(error = %e, "Edge read failed, skipping");
                }
            }

            if let Some(raw) = self.accumulator.poll(self.source.now()) {
                self.handle_frame(&raw);
            }
        }

        if let Err(e) = self.sink.flush() {
            warn!(error = %e, "Final sink flush failed");
        }
        let stats = self.stats();
        info!(%stats, "Gateway stopped");
        Ok(stats)
    }

    /// Publish the static device description.
    ///
    /// # Errors
    ///
    /// Returns the first sink error.
    pub fn publish_meta(&mut self) -> Result<()> {
        for publication in self.publisher.meta_values() {
            self.sink
                .publish(&publication.topic, &publication.payload, publication.retained)?;
        }
        self.sink.flush()?;
        debug!(device = %self.publisher.device_id(), "Published device meta");
        Ok(())
    }

    /// Decode and publish one frame.
    pub fn handle_frame(&mut self, raw: &RawFrame) -> &DecodedFrame {
        let decoded = self.decoder.decode(raw);
        self.stats.frames_emitted += 1;

        if decoded.is_ok() {
            self.stats.frames_decoded += 1;
            info!(
                counter = decoded.sequence_counter(),
                format = %decoded.format(),
                facility = decoded.facility(),
                card = decoded.card(),
                "Card read"
            );
        } else {
            self.stats.frames_failed += 1;
            warn!(
                counter = decoded.sequence_counter(),
                len = decoded.length(),
                bits = %decoded.bits(),
                error = decoded.error_str(),
                "Frame not decoded"
            );
        }

        for publication in self.publisher.frame_values(&decoded) {
            if let Err(e) =
                self.sink
                    .publish(&publication.topic, &publication.payload, publication.retained)
            {
                self.stats.publish_failures += 1;
                warn!(topic = %publication.topic, error = %e, "Publish failed");
            }
        }
        if let Err(e) = self.sink.flush() {
            warn!(error = %e, "Sink flush failed");
        }

        self.previous_frame = self.last_frame.take();
        self.last_frame.insert(decoded)
    }

    pub fn stats(&self) -> GatewayStats {
        GatewayStats {
            accumulator: self.accumulator.stats(),
            ..self.stats
        }
    }

    /// Most recently published frame.
    pub fn last_frame(&self) -> Option<&DecodedFrame> {
        self.last_frame.as_ref()
    }

    /// The frame published before [`last_frame`](Self::last_frame).
    pub fn previous_frame(&self) -> Option<&DecodedFrame> {
        self.previous_frame.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

}

/// Builder for [`Gateway`]; every setting has a default.
#[derive(Debug)]
pub struct GatewayBuilder<S: EdgeSource, P: PublishSink> {
    source: S,
    sink: P,
    capture: CaptureConfig,
    decoder: DecoderConfig,
    device_id: DeviceId,
    skip_meta: bool,
}

impl<S: EdgeSource, P: PublishSink> GatewayBuilder<S, P> {
    pub fn new(source: S, sink: P) -> Self {
        Self {
            source,
            sink,
            capture: CaptureConfig::default(),
            decoder: DecoderConfig::default(),
            device_id: DeviceId::default(),
            skip_meta: false,
        }
    }

    pub fn capture(mut self, capture: CaptureConfig) -> Self {
        self.capture = capture;
        self
    }

    pub fn decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = device_id;
        self
    }

    pub fn skip_meta(mut self, skip_meta: bool) -> Self {
        self.skip_meta = skip_meta;
        self
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Config` if the capture settings are invalid.
    pub fn build(self) -> Result<Gateway<S, P>> {
        self.capture.validate()?;
        Ok(Gateway {
            source: self.source,
            sink: self.sink,
            accumulator: FrameAccumulator::new(self.capture.clone()),
            capture: self.capture,
            decoder: FormatDecoder::new(self.decoder),
            publisher: FramePublisher::new(self.device_id),
            skip_meta: self.skip_meta,
            last_frame: None,
            previous_frame: None,
            stats: GatewayStats::default(),
        })
    }
}
