//! Disposable resources held by a workspace

use anyhow::Result;

/// A resource released when its workspace is disposed
pub trait Disposable: Send {
    fn dispose(&mut self) -> Result<()>;
}

/// Adapter turning a closure into a [`Disposable`]
pub struct OnDispose<F>(Option<F>);

impl<F> OnDispose<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    pub fn new(f: F) -> Self {
        Self(Some(f))
    }
}

impl<F> Disposable for OnDispose<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    fn dispose(&mut self) -> Result<()> {
        match self.0.take() {
            Some(f) => f(),
            None => Ok(()),
        }
    }
}
