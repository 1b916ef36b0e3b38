//! Stream Lifecycle Integration Tests
//!
//! Exercises the full path from the real tonic client through the
//! subscription lifecycle binding, against an in-process price engine.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tokio_stream::wrappers::{TcpListenerStream, UnboundedReceiverStream};
use tonic::transport::Server;
use tonic::{Request, Response, Status};

use price_viewer::proto::price_stream_server::{PriceStream, PriceStreamServer};
use price_viewer::{
    BindingParams, ClientHolder, GrpcCandleSource, StreamBinding, StreamError, StreamSnapshot,
    StreamSubscriber, proto,
};

type CandlePublisher = mpsc::UnboundedSender<Result<proto::Candle, Status>>;

/// In-process price engine with one publisher handle per accepted stream.
struct FakeEngine {
    supported_interval_ms: i32,
    streams: Mutex<Vec<(String, CandlePublisher)>>,
}

impl FakeEngine {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            supported_interval_ms: 1000,
            streams: Mutex::new(Vec::new()),
        })
    }

    fn stream_count(&self) -> usize {
        self.streams.lock().len()
    }

    fn publisher(&self, index: usize) -> CandlePublisher {
        self.streams.lock()[index].1.clone()
    }

    fn subscribed_symbol(&self, index: usize) -> String {
        self.streams.lock()[index].0.clone()
    }
}

#[tonic::async_trait]
impl PriceStream for FakeEngine {
    type StreamAggregatesStream = UnboundedReceiverStream<Result<proto::Candle, Status>>;

    async fn stream_aggregates(
        &self,
        request: Request<proto::SubscribeRequest>,
    ) -> Result<Response<Self::StreamAggregatesStream>, Status> {
        let req = request.into_inner();
        if req.symbol.is_empty() {
            return Err(Status::invalid_argument("symbol required"));
        }
        if req.interval_ms != 0 && req.interval_ms != self.supported_interval_ms {
            return Err(Status::invalid_argument(
                "requested interval not supported by current engine instance",
            ));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.streams.lock().push((req.symbol, tx));
        Ok(Response::new(UnboundedReceiverStream::new(rx)))
    }
}

/// Start a test engine on a random port and return a binding wired to it.
async fn setup() -> (
    Arc<FakeEngine>,
    StreamBinding,
    watch::Receiver<StreamSnapshot>,
    tokio::task::JoinHandle<()>,
) {
    let engine = FakeEngine::new();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let service = PriceStreamServer::from_arc(Arc::clone(&engine));
    let server_handle = tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    // Give the accept loop time to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let holder = Arc::new(ClientHolder::new(format!("http://{addr}")));
    let source = Arc::new(GrpcCandleSource::new(holder));
    let binding = StreamBinding::new(StreamSubscriber::new(source));
    let snapshots = binding.watch();

    (engine, binding, snapshots, server_handle)
}

fn wire_candle(symbol: &str, close: f64) -> proto::Candle {
    proto::Candle {
        symbol: symbol.to_string(),
        window_start_ms: 1_700_000_000_000,
        open: close - 10.0,
        high: close + 10.0,
        low: close - 20.0,
        close,
        volume: 1.5,
        vwap: 50_010.0,
    }
}

/// Wait until the snapshot satisfies `predicate`, or fail after 5 seconds.
async fn wait_for_snapshot<F>(
    rx: &mut watch::Receiver<StreamSnapshot>,
    predicate: F,
) -> StreamSnapshot
where
    F: Fn(&StreamSnapshot) -> bool,
{
    timeout(Duration::from_secs(5), async {
        loop {
            if predicate(&rx.borrow()) {
                return rx.borrow().clone();
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("timed out waiting for snapshot")
}

/// Wait until the engine has accepted `count` streams.
async fn wait_for_streams(engine: &FakeEngine, count: usize) {
    timeout(Duration::from_secs(5), async {
        while engine.stream_count() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("timed out waiting for engine stream");
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn streams_candles_into_connected_state() {
    let (engine, mut binding, mut snapshots, server) = setup().await;

    binding.set_params(BindingParams::new("BTCUSDT", 1000));
    assert!(binding.snapshot().is_loading);
    wait_for_streams(&engine, 1).await;
    assert_eq!(engine.subscribed_symbol(0), "BTCUSDT");

    engine
        .publisher(0)
        .send(Ok(wire_candle("BTCUSDT", 50_000.12)))
        .unwrap();

    let snapshot = wait_for_snapshot(&mut snapshots, |s| s.data.is_some()).await;
    let candle = snapshot.data.unwrap();
    assert_eq!(candle.symbol, "BTCUSDT");
    assert_eq!(candle.close, Decimal::try_from(50_000.12).unwrap());
    assert_eq!(candle.volume, Decimal::try_from(1.5).unwrap());
    assert_eq!(candle.vwap, Decimal::try_from(50_010.0).unwrap());
    assert_eq!(candle.window_start_ms, 1_700_000_000_000);
    assert!(snapshot.is_connected);
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.error, None);

    server.abort();
}

#[tokio::test]
async fn newest_candle_supersedes_prior() {
    let (engine, mut binding, mut snapshots, server) = setup().await;

    binding.set_params(BindingParams::new("BTCUSDT", 1000));
    wait_for_streams(&engine, 1).await;

    let publisher = engine.publisher(0);
    publisher.send(Ok(wire_candle("BTCUSDT", 50_000.0))).unwrap();
    publisher.send(Ok(wire_candle("BTCUSDT", 50_001.0))).unwrap();

    let snapshot = wait_for_snapshot(&mut snapshots, |s| {
        s.data
            .as_ref()
            .is_some_and(|c| c.close == Decimal::try_from(50_001.0).unwrap())
    })
    .await;
    assert!(snapshot.is_connected);

    server.abort();
}

// =============================================================================
// Failure Paths
// =============================================================================

#[tokio::test]
async fn error_before_data_moves_to_failed() {
    let (engine, mut binding, mut snapshots, server) = setup().await;

    binding.set_params(BindingParams::new("BTCUSDT", 1000));
    wait_for_streams(&engine, 1).await;

    engine
        .publisher(0)
        .send(Err(Status::internal("stream closed")))
        .unwrap();

    let snapshot = wait_for_snapshot(&mut snapshots, |s| s.error.is_some()).await;
    assert_eq!(snapshot.data, None);
    assert_eq!(
        snapshot.error,
        Some(StreamError::Transport("stream closed".to_string()))
    );
    assert!(!snapshot.is_connected);
    assert!(!snapshot.is_loading);

    server.abort();
}

#[tokio::test]
async fn engine_rejection_surfaces_through_the_error_path() {
    let (engine, mut binding, mut snapshots, server) = setup().await;

    // The engine serves 1000ms aggregates only.
    binding.set_params(BindingParams::new("BTCUSDT", 250));

    let snapshot = wait_for_snapshot(&mut snapshots, |s| s.error.is_some()).await;
    assert!(matches!(
        snapshot.error,
        Some(StreamError::Transport(message))
            if message.contains("interval not supported")
    ));
    assert_eq!(engine.stream_count(), 0);

    server.abort();
}

#[tokio::test]
async fn unreachable_engine_surfaces_through_the_error_path() {
    // Bind and immediately drop a listener to get a dead port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let holder = Arc::new(ClientHolder::new(format!("http://{addr}")));
    let source = Arc::new(GrpcCandleSource::new(holder));
    let mut binding = StreamBinding::new(StreamSubscriber::new(source));
    let mut snapshots = binding.watch();

    binding.set_params(BindingParams::new("BTCUSDT", 1000));

    let snapshot = wait_for_snapshot(&mut snapshots, |s| s.error.is_some()).await;
    assert_eq!(snapshot.data, None);
    assert!(!snapshot.is_connected);
}

// =============================================================================
// Parameter Changes
// =============================================================================

#[tokio::test]
async fn switching_symbols_cancels_the_old_stream_first() {
    let (engine, mut binding, mut snapshots, server) = setup().await;

    binding.set_params(BindingParams::new("BTCUSDT", 1000));
    wait_for_streams(&engine, 1).await;
    let old_publisher = engine.publisher(0);
    old_publisher.send(Ok(wire_candle("BTCUSDT", 50_000.0))).unwrap();
    wait_for_snapshot(&mut snapshots, |s| s.is_connected).await;

    binding.set_params(BindingParams::new("ETHUSDT", 1000));
    // State resets synchronously before any new event can arrive.
    assert_eq!(binding.snapshot(), StreamSnapshot::loading());

    wait_for_streams(&engine, 2).await;
    assert_eq!(engine.subscribed_symbol(1), "ETHUSDT");

    // The old stream's consumer goes away after cancellation.
    timeout(Duration::from_secs(5), async {
        while !old_publisher.is_closed() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("old stream was not torn down");

    engine
        .publisher(1)
        .send(Ok(wire_candle("ETHUSDT", 3_000.0)))
        .unwrap();

    let snapshot = wait_for_snapshot(&mut snapshots, |s| s.data.is_some()).await;
    assert_eq!(snapshot.data.unwrap().symbol, "ETHUSDT");

    server.abort();
}

#[tokio::test]
async fn disabling_tears_down_without_reopening() {
    let (engine, mut binding, mut snapshots, server) = setup().await;

    binding.set_params(BindingParams::new("BTCUSDT", 1000));
    wait_for_streams(&engine, 1).await;
    let publisher = engine.publisher(0);
    publisher.send(Ok(wire_candle("BTCUSDT", 50_000.0))).unwrap();
    wait_for_snapshot(&mut snapshots, |s| s.is_connected).await;

    binding.set_params(BindingParams::new("BTCUSDT", 1000).disabled());
    assert_eq!(binding.snapshot(), StreamSnapshot::idle());

    timeout(Duration::from_secs(5), async {
        while !publisher.is_closed() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("stream was not torn down");

    assert_eq!(engine.stream_count(), 1);

    server.abort();
}
