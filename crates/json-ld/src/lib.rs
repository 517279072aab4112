//! JSON-LD processing for Linked Data Signatures.
//!
//! Documents are expanded against their `@context` and converted to an RDF
//! dataset by the [`json_ld`] processor, then canonicalized with URDNA2015
//! into sorted N-Quads. Remote contexts only come from the [`ContextLoader`]
//! given by the caller.
mod error;
mod loader;

pub use error::CanonicalizationError;
pub use loader::{ContextLoader, NoLoader, StaticLoader};

pub use ldsig_rdf::{CanonicalForm, DataSet};

use std::fmt::Write;
use std::str::FromStr;

use iref::IriBuf;
use json_ld::{JsonLdProcessor, RemoteDocument};
use ldsig_rdf::{urdna2015, Lang, Literal, Object, Statement};
use rdf_types::{Quad, RdfDisplay};
use serde::Deserialize;
use serde_json::{json, Value};

use loader::RemoteContexts;

/// Default bound on the distinct remote contexts a document may load.
pub const DEFAULT_MAX_REMOTE_CONTEXTS: usize = 32;

/// Default bound on the nesting of objects and arrays in a document.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options of the expansion and toRdf algorithms.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsonLdOptions {
    /// Base IRI used to resolve relative identifiers.
    pub base: Option<String>,
    /// Context applied before the document's own `@context`.
    pub expand_context: Option<Value>,
    /// Fail on keys that do not expand to an IRI instead of dropping them.
    pub strict: bool,
    pub max_remote_contexts: usize,
    /// Deepest nesting of objects and arrays accepted, the top-level value
    /// being at depth 1.
    pub max_depth: usize,
}

impl Default for JsonLdOptions {
    fn default() -> Self {
        Self {
            base: None,
            expand_context: None,
            strict: true,
            max_remote_contexts: DEFAULT_MAX_REMOTE_CONTEXTS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanonicalizationOptions {
    #[serde(flatten)]
    pub json_ld: JsonLdOptions,
    /// Work budget of the blank node labeling step, per squared number of
    /// blank nodes without a unique first-degree hash.
    pub work_factor: usize,
}

impl Default for CanonicalizationOptions {
    fn default() -> Self {
        Self {
            json_ld: JsonLdOptions::default(),
            work_factor: urdna2015::DEFAULT_WORK_FACTOR,
        }
    }
}

impl From<JsonLdOptions> for CanonicalizationOptions {
    fn from(json_ld: JsonLdOptions) -> Self {
        Self {
            json_ld,
            ..Self::default()
        }
    }
}

impl From<&JsonLdOptions> for json_ld::Options {
    fn from(options: &JsonLdOptions) -> Self {
        let expansion_policy = if options.strict {
            json_ld::expansion::Policy {
                invalid: json_ld::expansion::Action::Reject,
                vocab: json_ld::expansion::Action::Keep,
                allow_undefined: false,
            }
        } else {
            json_ld::expansion::Policy::default()
        };
        Self {
            expansion_policy,
            ..Default::default()
        }
    }
}

fn check_depth(document: &Value, max_depth: usize) -> Result<(), CanonicalizationError> {
    let mut pending = vec![(document, 1)];
    while let Some((value, depth)) = pending.pop() {
        let nested: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(entries) => entries.values().collect(),
            _ => continue,
        };
        if depth > max_depth {
            return Err(CanonicalizationError::DocumentDepthExceeded(max_depth));
        }
        pending.extend(nested.into_iter().map(|value| (value, depth + 1)));
    }
    Ok(())
}

/// Puts `expand_context` in front of the document's own contexts.
fn with_expand_context(document: &Value, expand_context: &Value) -> Value {
    let context = expand_context
        .get("@context")
        .unwrap_or(expand_context)
        .clone();
    match document {
        Value::Object(entries) => {
            let mut entries = entries.clone();
            let contexts = match entries.remove("@context") {
                None => vec![context],
                Some(Value::Array(local)) => std::iter::once(context).chain(local).collect(),
                Some(local) => vec![context, local],
            };
            entries.insert("@context".to_string(), Value::Array(contexts));
            Value::Object(entries)
        }
        nodes => json!({"@context": context, "@graph": nodes}),
    }
}

/// <https://www.w3.org/TR/json-ld11-api/#dom-jsonldprocessor-tordf>
pub fn json_to_dataset(
    document: &Value,
    loader: &dyn ContextLoader,
    options: &JsonLdOptions,
) -> Result<DataSet, CanonicalizationError> {
    if !document.is_object() && !document.is_array() {
        return Err(CanonicalizationError::ExpectedObject);
    }
    check_depth(document, options.max_depth)?;
    let base = match &options.base {
        Some(base) => Some(
            IriBuf::new(base.clone())
                .map_err(|_| CanonicalizationError::InvalidBaseIri(base.clone()))?,
        ),
        None => None,
    };
    let json = match &options.expand_context {
        Some(expand_context) => json_syntax::to_value(with_expand_context(document, expand_context)),
        None => json_syntax::to_value(document),
    }
    .map_err(|e| CanonicalizationError::Json(e.to_string()))?;

    let input: RemoteDocument = RemoteDocument::new(base, None, json);
    let contexts = RemoteContexts::new(loader, options.max_remote_contexts);
    let mut generator = rdf_types::generator::Blank::new();
    let mut rdf = futures::executor::block_on(input.to_rdf_using(
        &mut generator,
        &contexts,
        options.into(),
    ))
    .map_err(|e| contexts.take_error(e.to_string()))?;

    let mut dataset = DataSet::default();
    for Quad(subject, predicate, object, graph) in rdf.quads() {
        let mut nquad = format!(
            "{} {} {}",
            subject.rdf_display(),
            predicate.rdf_display(),
            object.rdf_display()
        );
        if let Some(graph) = graph {
            let _ = write!(nquad, " {}", graph.rdf_display());
        }
        nquad.push_str(" .");
        let mut statement = Statement::from_str(&nquad)?;
        if let Object::Literal(Literal::LangTagged { lang, .. }) = &mut statement.object {
            *lang = Lang::from_str(&lang.as_str().to_ascii_lowercase())?;
        }
        dataset.add_statement(statement);
    }
    log::trace!("converted document into {} quads", dataset.len());
    Ok(dataset)
}

/// Canonical N-Quads of a JSON-LD document.
///
/// Two documents describing isomorphic RDF datasets produce byte-identical
/// output, whatever their key order, array order or blank node labels.
pub fn canonicalize(
    document: &Value,
    loader: &dyn ContextLoader,
    options: &CanonicalizationOptions,
) -> Result<CanonicalForm, CanonicalizationError> {
    let dataset = json_to_dataset(document, loader, &options.json_ld)?;
    let normalized = urdna2015::normalize_with_limit(&dataset, options.work_factor)?;
    let canonical = CanonicalForm::from_normalized(&normalized);
    log::trace!("canonical form has {} quads", canonical.len());
    Ok(canonical)
}
