use std::pin::Pin;
use std::task::{Context, Poll};

use hyper::rt::{Read, ReadBufCursor, Write};
use hyper_util::client::legacy::connect::{Connected, Connection};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;

/// Connection to an origin server, in clear text or over TLS.
pub enum OriginStream {
    Plain { inner: TokioIo<TcpStream> },
    Tls { inner: Box<TokioIo<TlsStream<TcpStream>>> },
}

impl Read for OriginStream {
    fn poll_read(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: ReadBufCursor<'_>) -> Poll<std::io::Result<()>> {
        match &mut *self {
            OriginStream::Plain { inner } => Pin::new(inner).poll_read(cx, buf),
            OriginStream::Tls { inner } => Pin::new(inner.as_mut()).poll_read(cx, buf),
        }
    }
}

impl Write for OriginStream {
    fn poll_write(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        match &mut *self {
            OriginStream::Plain { inner } => Pin::new(inner).poll_write(cx, buf),
            OriginStream::Tls { inner } => Pin::new(inner.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match &mut *self {
            OriginStream::Plain { inner } => Pin::new(inner).poll_flush(cx),
            OriginStream::Tls { inner } => Pin::new(inner.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match &mut *self {
            OriginStream::Plain { inner } => Pin::new(inner).poll_shutdown(cx),
            OriginStream::Tls { inner } => Pin::new(inner.as_mut()).poll_shutdown(cx),
        }
    }
}

impl Connection for OriginStream {
    fn connected(&self) -> Connected {
        Connected::new()
    }
}

impl From<TcpStream> for OriginStream {
    fn from(inner: TcpStream) -> Self {
        OriginStream::Plain {
            inner: TokioIo::new(inner),
        }
    }
}

impl From<TlsStream<TcpStream>> for OriginStream {
    fn from(inner: TlsStream<TcpStream>) -> Self {
        OriginStream::Tls {
            inner: Box::new(TokioIo::new(inner)),
        }
    }
}
