//! Remote context loading.
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use iref::{Iri, IriBuf};
use json_ld::{LoadError, LoadingResult, RemoteDocument};
use serde_json::{Map, Value};

use crate::error::CanonicalizationError as Error;

const AT_CONTEXT: &str = "@context";

/// Resolver for remote `@context` references.
///
/// The returned remote document must be a JSON object carrying an
/// `@context` entry. Implementations are populated ahead of time: the
/// processor never performs network I/O on its own.
pub trait ContextLoader: Send + Sync {
    fn load_context(&self, iri: &str) -> Result<Value, Error>;
}

impl<L: ContextLoader + ?Sized> ContextLoader for &L {
    fn load_context(&self, iri: &str) -> Result<Value, Error> {
        (**self).load_context(iri)
    }
}

/// Loader rejecting every remote context.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoader;

impl ContextLoader for NoLoader {
    fn load_context(&self, iri: &str) -> Result<Value, Error> {
        Err(Error::LoadingContextFailed(
            iri.to_string(),
            "no context loader configured".to_string(),
        ))
    }
}

/// Pre-resolved contexts, keyed by IRI.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    documents: HashMap<String, Value>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a remote document (a JSON object with an `@context` entry).
    pub fn insert(&mut self, iri: impl Into<String>, document: Value) -> Option<Value> {
        self.documents.insert(iri.into(), document)
    }

    /// Registers a bare context under `iri`.
    pub fn insert_context(&mut self, iri: impl Into<String>, context: Value) -> Option<Value> {
        let mut document = Map::new();
        document.insert(AT_CONTEXT.to_string(), context);
        self.insert(iri, Value::Object(document))
    }

    pub fn with_context(mut self, iri: impl Into<String>, context: Value) -> Self {
        self.insert_context(iri, context);
        self
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.documents.contains_key(iri)
    }
}

impl ContextLoader for StaticLoader {
    fn load_context(&self, iri: &str) -> Result<Value, Error> {
        self.documents
            .get(iri)
            .cloned()
            .ok_or_else(|| Error::LoadingContextFailed(iri.to_string(), "unknown context".to_string()))
    }
}

impl json_ld::Loader for StaticLoader {
    async fn load(&self, url: &Iri) -> LoadingResult {
        let document = self
            .load_context(url.as_str())
            .map_err(|e| LoadError::new(url.to_owned(), e))?;
        remote_document(url, &document).map_err(|e| LoadError::new(url.to_owned(), e))
    }
}

fn remote_document(url: &Iri, document: &Value) -> Result<RemoteDocument, Error> {
    if document.get(AT_CONTEXT).is_none() {
        return Err(Error::InvalidRemoteContext(url.to_string()));
    }
    let json = json_syntax::to_value(document).map_err(|e| Error::Json(e.to_string()))?;
    Ok(RemoteDocument::new(Some(url.to_owned()), None, json))
}

/// Remote contexts seen while processing one document.
///
/// Serves a [`ContextLoader`] to the JSON-LD processor, keeps each loaded
/// document for the rest of the run and bounds the number of distinct
/// contexts a document may pull in. The first failure is kept so that it can
/// be reported as is once the processor gives up.
pub(crate) struct RemoteContexts<'a> {
    loader: &'a dyn ContextLoader,
    max_remote_contexts: usize,
    loaded: Mutex<HashMap<IriBuf, RemoteDocument>>,
    failure: Mutex<Option<Error>>,
}

impl<'a> RemoteContexts<'a> {
    pub fn new(loader: &'a dyn ContextLoader, max_remote_contexts: usize) -> Self {
        Self {
            loader,
            max_remote_contexts,
            loaded: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
        }
    }

    fn fetch(&self, url: &Iri) -> Result<RemoteDocument, Error> {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(document) = loaded.get(url) {
            return Ok(document.clone());
        }
        if loaded.len() >= self.max_remote_contexts {
            return Err(Error::TooManyRemoteContexts(self.max_remote_contexts));
        }
        log::debug!("loading context {}", url);
        let document = remote_document(url, &self.loader.load_context(url.as_str())?)?;
        loaded.insert(url.to_owned(), document.clone());
        Ok(document)
    }

    /// Error to report for a failed run, `cause` being the processor's own.
    pub fn take_error(&self, cause: String) -> Error {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or(Error::Expansion(cause))
    }
}

impl json_ld::Loader for RemoteContexts<'_> {
    async fn load(&self, url: &Iri) -> LoadingResult {
        self.fetch(url).map_err(|e| {
            let mut failure = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
            if failure.is_none() {
                *failure = Some(e.clone());
            }
            LoadError::new(url.to_owned(), e)
        })
    }
}
