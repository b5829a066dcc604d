//! Pod log access

use async_trait::async_trait;
use tokio::io::AsyncRead;

/// Readable stream of a pod's captured output. Dropping it closes the stream.
pub type LogStream = Box<dyn AsyncRead + Send + Unpin>;

/// Opens the output stream of a pod
#[async_trait]
pub trait LogReader: Send + Sync {
    async fn open(&self, namespace: &str, pod: &str) -> std::io::Result<LogStream>;
}
