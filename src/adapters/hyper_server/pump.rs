use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tracing::debug;

use crate::domain::{PumpDirection, PumpReport};

const BUFFER_SIZE: usize = 32 * 1024;

/// Close signal shared by the two pumps of a tunnel.
///
/// The first pump to stop raises it, which makes the other one stop too, so
/// both connections of the pair are released. Raising it again is a no-op.
pub struct Teardown {
    closed: watch::Sender<bool>,
}

impl Teardown {
    pub fn new() -> Self {
        let (closed, _) = watch::channel(false);
        Self { closed }
    }

    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    fn watch(&self) -> watch::Receiver<bool> {
        self.closed.subscribe()
    }
}

impl Default for Teardown {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies `source` into `destination` until end-of-stream, the first I/O error
/// or the tunnel teardown, then raises the teardown, shuts the destination's
/// write side down and drops the source.
///
/// Errors end the copy silently; they are only reported back in the [`PumpReport`].
/// The shutdown result is ignored so that closing an already closed peer is a no-op.
pub async fn pump<R, W>(mut source: R, mut destination: W, direction: PumpDirection, teardown: Arc<Teardown>) -> PumpReport
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut closed = teardown.watch();
    let mut buf = vec![0u8; BUFFER_SIZE];
    let mut bytes = 0u64;

    let report = loop {
        let n = tokio::select! {
            read = source.read(&mut buf) => match read {
                Ok(0) => break PumpReport::finished(direction, bytes),
                Ok(n) => n,
                Err(e) => break PumpReport::failed(direction, bytes, e),
            },
            _ = closed.wait_for(|closed| *closed) => break PumpReport::finished(direction, bytes),
        };

        let written = tokio::select! {
            written = destination.write_all(&buf[..n]) => written,
            _ = closed.wait_for(|closed| *closed) => break PumpReport::finished(direction, bytes),
        };
        if let Err(e) = written {
            break PumpReport::failed(direction, bytes, e);
        }
        bytes += n as u64;
    };

    teardown.close();
    let _ = destination.shutdown().await;
    drop(source);

    match &report.error {
        Some(e) => debug!("{} stopped after {} bytes: {}", direction, report.bytes, e),
        None => debug!("{} finished after {} bytes", direction, report.bytes),
    }
    report
}
