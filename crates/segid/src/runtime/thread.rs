use core::future::Future;
use std::thread;

use crate::{Error, Result, runtime::Spawner};

/// Runs each renewal on a fresh, named OS thread.
///
/// The loader future is driven with [`futures::executor::block_on`], so the
/// loader must not depend on a specific async runtime's reactor.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSpawner;

impl Spawner for ThreadSpawner {
    fn spawn<F>(&self, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        thread::Builder::new()
            .name("segid-renewal".into())
            .spawn(move || futures::executor::block_on(task))
            .map(drop)
            .map_err(|e| Error::Spawn(e.to_string()))
    }
}
