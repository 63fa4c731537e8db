//! Gateway runs against replayed, scripted and simulated edge sources.

mod common;

use common::{ScriptedSource, W26_123_45678, capture_text, edges, topic};
use rstest::rstest;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiegand_core::{Bits, CaptureConfig, DecoderConfig, Edge, Line, Timestamp};
use wiegand_gateway::{Gateway, GatewayError};
use wiegand_hardware::HardwareError;
use wiegand_hardware::mock::{MemorySink, MockEdgeSource};
use wiegand_hardware::replay::ReplayEdgeSource;

fn replay(text: &str) -> ReplayEdgeSource {
    ReplayEdgeSource::from_capture(text.as_bytes()).unwrap()
}

#[tokio::test]
async fn test_replay_publishes_meta_then_frame() {
    let sink = MemorySink::new();
    let source = replay(&capture_text(W26_123_45678, 0));

    let mut gateway = Gateway::builder(source, sink.clone()).build().unwrap();
    let stats = gateway.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(stats.frames_emitted, 1);
    assert_eq!(stats.frames_decoded, 1);

    let published = sink.publications();
    assert_eq!(published[0].topic, "/devices/wiegand/meta/name");
    assert_eq!(sink.latest(&topic("ReadCounter")).as_deref(), Some("1"));
    assert_eq!(sink.latest(&topic("Bits")).as_deref(), Some(W26_123_45678));
    assert_eq!(sink.latest(&topic("Len")).as_deref(), Some("26"));
    assert_eq!(sink.latest(&topic("RawValue")).as_deref(), Some("49767645"));
    assert_eq!(sink.latest(&topic("FacilityCode")).as_deref(), Some("123"));
    assert_eq!(sink.latest(&topic("CardNumber")).as_deref(), Some("45678"));
    assert_eq!(sink.latest(&topic("Format")).as_deref(), Some("w26"));
    assert_eq!(sink.latest(&topic("LastError")).as_deref(), Some(""));
    assert!(published.iter().all(|p| p.retained));
}

#[tokio::test]
async fn test_skip_meta() {
    let sink = MemorySink::new();
    let source = replay(&capture_text(W26_123_45678, 0));

    let mut gateway = Gateway::builder(source, sink.clone())
        .skip_meta(true)
        .build()
        .unwrap();
    gateway.run(&CancellationToken::new()).await.unwrap();

    let published = sink.publications();
    assert_eq!(published.len(), 8);
    assert_eq!(published[0].topic, topic("ReadCounter"));
}

#[tokio::test]
async fn test_meta_failure_is_fatal() {
    let sink = MemorySink::new();
    sink.set_failing(true);
    let source = replay(&capture_text(W26_123_45678, 0));

    let mut gateway = Gateway::builder(source, sink.clone()).build().unwrap();
    let result = gateway.run(&CancellationToken::new()).await;

    assert!(matches!(
        result,
        Err(GatewayError::Hardware(HardwareError::PublishFailed { .. }))
    ));
    assert_eq!(gateway.source().remaining(), 26);
}

#[tokio::test]
async fn test_frame_publish_failure_is_counted() {
    let sink = MemorySink::new();
    sink.set_failing(true);
    let source = replay(&capture_text(W26_123_45678, 0));

    let mut gateway = Gateway::builder(source, sink.clone())
        .skip_meta(true)
        .build()
        .unwrap();
    let stats = gateway.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(stats.frames_emitted, 1);
    assert_eq!(stats.publish_failures, 8);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_back_to_back_frames_are_numbered() {
    let mut capture = capture_text(W26_123_45678, 0);
    capture.push_str(&capture_text("1010", 200_000));
    capture.push_str(&capture_text("1000001001101001011011101110101010", 400_000));

    let sink = MemorySink::new();
    let mut gateway = Gateway::builder(replay(&capture), sink.clone())
        .skip_meta(true)
        .build()
        .unwrap();
    let stats = gateway.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(stats.frames_emitted, 2);
    assert_eq!(stats.accumulator.discarded_frames, 1);

    let counters: Vec<String> = sink
        .publications()
        .into_iter()
        .filter(|p| p.topic == topic("ReadCounter"))
        .map(|p| p.payload)
        .collect();
    assert_eq!(counters, vec!["1", "2"]);
    assert_eq!(sink.latest(&topic("Format")).as_deref(), Some("w34"));
    assert_eq!(sink.latest(&topic("FacilityCode")).as_deref(), Some("1234"));

    assert_eq!(gateway.previous_frame().unwrap().sequence_counter(), 1);
    assert_eq!(gateway.last_frame().unwrap().sequence_counter(), 2);
}

#[tokio::test]
async fn test_parity_failure_is_published() {
    let sink = MemorySink::new();
    let source = replay(&capture_text("10111101110110010011011111", 0));

    let mut gateway = Gateway::builder(source, sink.clone())
        .skip_meta(true)
        .build()
        .unwrap();
    let stats = gateway.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(stats.frames_failed, 1);
    assert_eq!(sink.latest(&topic("LastError")).as_deref(), Some("parity_fail"));
    assert_eq!(sink.latest(&topic("Format")).as_deref(), Some("unknown"));
    assert_eq!(sink.latest(&topic("FacilityCode")).as_deref(), Some("-1"));
    assert_eq!(sink.latest(&topic("CardNumber")).as_deref(), Some("-1"));
    assert_eq!(
        sink.latest(&topic("Bits")).as_deref(),
        Some("10111101110110010011011111")
    );
}

#[rstest]
#[case::w26(W26_123_45678, "w26", "123", "45678", "")]
#[case::w34("1000001001101001011011101110101010", "w34", "1234", "56789", "")]
#[case::inverted_w26("01000010001001101100100010", "w26", "123", "45678", "")]
#[case::salvaged_w26("010111101110110010011011101", "w26", "123", "45678", "")]
#[case::ambiguous_window("110111101110110010011011101", "unknown", "-1", "-1", "len_mismatch")]
#[case::parity_fail("10111101110110010011011111", "unknown", "-1", "-1", "parity_fail")]
#[tokio::test]
async fn test_replayed_frame_outcome(
    #[case] bits: &str,
    #[case] format: &str,
    #[case] facility: &str,
    #[case] card: &str,
    #[case] error: &str,
) {
    let sink = MemorySink::new();
    let mut gateway = Gateway::builder(replay(&capture_text(bits, 0)), sink.clone())
        .skip_meta(true)
        .build()
        .unwrap();
    let stats = gateway.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(stats.frames_emitted, 1);
    assert_eq!(stats.frames_failed, u64::from(!error.is_empty()));
    assert_eq!(sink.latest(&topic("Format")).as_deref(), Some(format));
    assert_eq!(sink.latest(&topic("FacilityCode")).as_deref(), Some(facility));
    assert_eq!(sink.latest(&topic("CardNumber")).as_deref(), Some(card));
    assert_eq!(sink.latest(&topic("LastError")).as_deref(), Some(error));
}

#[tokio::test]
async fn test_decoder_config_applies() {
    let reversed: String = W26_123_45678.chars().rev().collect();
    let sink = MemorySink::new();
    let decoder = DecoderConfig {
        reverse_bits: true,
        ..DecoderConfig::default()
    };

    let mut gateway = Gateway::builder(replay(&capture_text(&reversed, 0)), sink.clone())
        .decoder(decoder)
        .skip_meta(true)
        .build()
        .unwrap();
    gateway.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(sink.latest(&topic("CardNumber")).as_deref(), Some("45678"));
}

#[tokio::test]
async fn test_read_errors_are_skipped() {
    let source = ScriptedSource::new()
        .error(HardwareError::invalid_data("edge queue overrun"))
        .edges(edges(W26_123_45678, Timestamp::ZERO))
        .error(HardwareError::invalid_data("bad line"))
        .idle(10);

    let sink = MemorySink::new();
    let mut gateway = Gateway::builder(source, sink.clone())
        .skip_meta(true)
        .build()
        .unwrap();
    let stats = gateway.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(stats.read_errors, 2);
    assert_eq!(stats.frames_decoded, 1);
    assert_eq!(sink.latest(&topic("CardNumber")).as_deref(), Some("45678"));
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let sink = MemorySink::new();
    let source = replay(&capture_text(W26_123_45678, 0));
    let mut gateway = Gateway::builder(source, sink.clone()).build().unwrap();
    let stats = gateway.run(&cancel).await.unwrap();

    assert_eq!(stats.frames_emitted, 0);
    // Meta still goes out; no edges are read.
    assert_eq!(sink.len(), 18);
    assert_eq!(gateway.source().remaining(), 26);
}

#[tokio::test(start_paused = true)]
async fn test_simulated_reader_then_cancel() {
    let (source, handle) = MockEdgeSource::new();
    let cancel = CancellationToken::new();
    let sink = MemorySink::new();

    let driver = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let bits: Bits = W26_123_45678.parse().unwrap();
            handle
                .send_bits(&bits, Line::D1, Duration::from_millis(2))
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
            cancel.cancel();
            handle
        })
    };

    let mut gateway = Gateway::builder(source, sink.clone())
        .skip_meta(true)
        .build()
        .unwrap();
    let stats = gateway.run(&cancel).await.unwrap();
    let _handle = driver.await.unwrap();

    assert_eq!(stats.frames_decoded, 1);
    assert_eq!(sink.latest(&topic("FacilityCode")).as_deref(), Some("123"));
}

#[tokio::test(start_paused = true)]
async fn test_simulated_bounce_and_miswiring() {
    let (source, handle) = MockEdgeSource::new();
    let sink = MemorySink::new();

    tokio::spawn(async move {
        let bits: Bits = W26_123_45678.parse().unwrap();
        // Miswired: D0 carries the ones. Every pulse bounces on the other line.
        for bit in bits.iter() {
            let line = if bit { Line::D0 } else { Line::D1 };
            let at = handle.now();
            handle.send_edge(Edge::new(line, at)).await.unwrap();
            handle
                .send_edge(Edge::new(line.other(), at + Duration::from_micros(30)))
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        tokio::time::sleep(Duration::from_millis(300)).await;
        // Dropping the handle disconnects the source.
    });

    let capture = CaptureConfig {
        min_pulse_interval_us: 400,
        ..CaptureConfig::default()
    };
    let mut gateway = Gateway::builder(source, sink.clone())
        .capture(capture)
        .skip_meta(true)
        .build()
        .unwrap();
    let stats = gateway.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(stats.accumulator.rejected_edges, 26);
    assert_eq!(stats.frames_decoded, 1);
    assert_eq!(sink.latest(&topic("FacilityCode")).as_deref(), Some("123"));
    assert_eq!(sink.latest(&topic("Bits")).as_deref(), Some(W26_123_45678));
}
