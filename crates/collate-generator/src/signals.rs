//! Generation lifecycle signals.
//!
//! Plugins connect named handlers to a [`Signal`]; the run sends each signal
//! once with the generator that just finished.

use std::{collections::HashMap, error::Error as StdError, fmt};

use thiserror::Error;
use tracing::debug;

use crate::context::Generator;

/// Boxed error returned by signal handlers.
pub type HandlerError = Box<dyn StdError + Send + Sync>;

type Handler = Box<dyn Fn(&mut Generator) -> std::result::Result<(), HandlerError> + Send + Sync>;

/// Points in the generation lifecycle that plugins can hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The article generator has finalized its context.
    ArticleGeneratorFinalized,
    /// The page generator has finalized its context.
    PageGeneratorFinalized,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ArticleGeneratorFinalized => "article_generator_finalized",
            Self::PageGeneratorFinalized => "page_generator_finalized",
        })
    }
}

/// Signal dispatch errors.
#[derive(Debug, Error)]
pub enum SignalError {
    /// A connected handler failed.
    #[error("{signal} handler '{handler}' failed: {source}")]
    Handler {
        signal: Signal,
        handler: &'static str,
        #[source]
        source: HandlerError,
    },
}

/// Result type for signal dispatch.
pub type Result<T> = std::result::Result<T, SignalError>;

/// Registry of signal handlers.
#[derive(Default)]
pub struct Signals {
    handlers: HashMap<Signal, Vec<(&'static str, Handler)>>,
}

impl fmt::Debug for Signals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: HashMap<_, Vec<_>> = self
            .handlers
            .iter()
            .map(|(signal, hs)| (signal, hs.iter().map(|(name, _)| *name).collect()))
            .collect();
        f.debug_struct("Signals").field("handlers", &names).finish()
    }
}

impl Signals {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a named handler to a signal. Handlers run in connection order.
    pub fn connect<F>(&mut self, signal: Signal, name: &'static str, handler: F)
    where
        F: Fn(&mut Generator) -> std::result::Result<(), HandlerError> + Send + Sync + 'static,
    {
        debug!(%signal, handler = name, "connecting handler");
        self.handlers
            .entry(signal)
            .or_default()
            .push((name, Box::new(handler)));
    }

    /// Names of the handlers connected to a signal.
    pub fn handlers(&self, signal: Signal) -> Vec<&'static str> {
        self.handlers
            .get(&signal)
            .map(|hs| hs.iter().map(|(name, _)| *name).collect())
            .unwrap_or_default()
    }

    /// Send a signal, stopping at the first failing handler.
    ///
    /// Returns the number of handlers that ran.
    pub fn send(&self, signal: Signal, generator: &mut Generator) -> Result<usize> {
        let Some(handlers) = self.handlers.get(&signal) else {
            return Ok(0);
        };

        for &(name, ref handler) in handlers {
            debug!(%signal, handler = name, "running handler");
            handler(generator).map_err(|source| SignalError::Handler {
                signal,
                handler: name,
                source,
            })?;
        }

        Ok(handlers.len())
    }
}
