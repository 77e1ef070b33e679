use crate::DomainResult;
use crate::ports::BoxFuture;

/// Event transport to the external work queue. At-least-once: the transport
/// owns retries, consumers must be idempotent. An `Ok` return is the
/// acknowledgment that gates every local commit.
pub trait HendelseProducer: Send + Sync {
    fn send(&self, topic: &str, key: &str, data: &str) -> BoxFuture<'_, DomainResult<()>>;
}
