use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use evvm_crypto::{Address, Bytes, Signer, SignerError};

/// Wraps a [`Signer`] and records every prompt it receives.
#[derive(Debug, Default)]
pub struct CountingSigner<S> {
    inner: S,
    calls: AtomicUsize,
    messages: Mutex<Vec<Vec<u8>>>,
}

impl<S> CountingSigner<S> {
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages in the order they were presented, decoded as UTF-8.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|m| String::from_utf8_lossy(m).into_owned())
            .collect()
    }

    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S> Signer for CountingSigner<S>
where
    S: Signer,
{
    fn address(&self) -> Address {
        self.inner.address()
    }

    async fn sign(&self, message: &[u8]) -> Result<Bytes, SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_vec());
        self.inner.sign(message).await
    }
}

/// Produces a fixed 65-byte signature derived from the message length.
/// Enough for flows that never verify the signature.
#[derive(Debug, Clone, Copy)]
pub struct DummySigner(pub Address);

#[async_trait]
impl Signer for DummySigner {
    fn address(&self) -> Address {
        self.0
    }

    async fn sign(&self, message: &[u8]) -> Result<Bytes, SignerError> {
        let tag = u8::try_from(message.len() % 256).unwrap_or_default();
        Ok(Bytes::from(vec![tag; 65]))
    }
}

/// Fails every prompt with the configured error.
#[derive(Debug, Clone)]
pub struct RejectingSigner {
    pub address: Address,
    pub error: SignerError,
}

impl RejectingSigner {
    pub const fn user_rejects(address: Address) -> Self {
        Self {
            address,
            error: SignerError::UserRejected,
        }
    }
}

#[async_trait]
impl Signer for RejectingSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, _message: &[u8]) -> Result<Bytes, SignerError> {
        Err(self.error.clone())
    }
}

/// Signs successfully `allowed` times, then rejects.
#[derive(Debug)]
pub struct FlakySigner<S> {
    inner: S,
    allowed: AtomicUsize,
}

impl<S> FlakySigner<S> {
    pub const fn new(inner: S, allowed: usize) -> Self {
        Self {
            inner,
            allowed: AtomicUsize::new(allowed),
        }
    }
}

#[async_trait]
impl<S> Signer for FlakySigner<S>
where
    S: Signer,
{
    fn address(&self) -> Address {
        self.inner.address()
    }

    async fn sign(&self, message: &[u8]) -> Result<Bytes, SignerError> {
        if self
            .allowed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_err()
        {
            return Err(SignerError::UserRejected);
        }
        self.inner.sign(message).await
    }
}
