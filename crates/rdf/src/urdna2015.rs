//! URDNA2015 canonical blank node labeling.
//!
//! <https://www.w3.org/TR/rdf-canon/>
use std::collections::BTreeMap as Map;
use std::collections::{BTreeSet, HashMap};

use ldsig_crypto::hashes::sha256_hex;

use crate::error::Error;
use crate::{BlankIdPosition, DataSet, Predicate, Statement};

/// Prefix of canonical blank node labels.
pub const CANONICAL_PREFIX: &str = "_:c14n";

/// Default work factor of the blank node disambiguation step.
///
/// A dataset with `n` blank nodes sharing their first-degree hash may spend
/// `work_factor * n * n` units of work in Hash N-Degree Quads, one unit per
/// invocation and one per evaluated permutation. Chains and lists cost about
/// `4 * n * n`; symmetric structures with large permutation groups run out.
pub const DEFAULT_WORK_FACTOR: usize = 16;

/// <https://www.w3.org/TR/rdf-canon/#dfn-identifier-issuer>
#[derive(Debug, Clone)]
pub struct IdentifierIssuer {
    identifier_prefix: String,
    identifier_counter: u64,
    issued_order: Vec<String>,
    issued: HashMap<String, String>,
}

impl IdentifierIssuer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            identifier_prefix: prefix.into(),
            identifier_counter: 0,
            issued_order: Vec::new(),
            issued: HashMap::new(),
        }
    }

    pub fn find_issued_identifier(&self, existing_identifier: &str) -> Option<&str> {
        self.issued.get(existing_identifier).map(String::as_str)
    }

    /// Existing identifiers, in the order they were issued a new one.
    pub fn issued_identifiers(&self) -> impl Iterator<Item = &str> {
        self.issued_order.iter().map(String::as_str)
    }

    /// <https://www.w3.org/TR/rdf-canon/#issue-identifier>
    pub fn issue(&mut self, existing_identifier: &str) -> String {
        if let Some(id) = self.issued.get(existing_identifier) {
            return id.clone();
        }
        let issued_identifier = format!("{}{}", self.identifier_prefix, self.identifier_counter);
        self.issued
            .insert(existing_identifier.to_string(), issued_identifier.clone());
        self.issued_order.push(existing_identifier.to_string());
        self.identifier_counter += 1;
        issued_identifier
    }
}

/// Caps the work spent in Hash N-Degree Quads.
#[derive(Debug)]
struct WorkBudget {
    limit: usize,
    used: usize,
}

impl WorkBudget {
    /// Budget for `ambiguous` blank nodes.
    fn new(work_factor: usize, ambiguous: usize) -> Self {
        Self {
            limit: work_factor
                .saturating_mul(ambiguous)
                .saturating_mul(ambiguous),
            used: 0,
        }
    }

    fn charge(&mut self, units: usize) -> Result<(), Error> {
        match self.used.checked_add(units) {
            Some(used) if used <= self.limit => {
                self.used = used;
                Ok(())
            }
            _ => Err(Error::RefinementLimitExceeded(self.limit)),
        }
    }
}

fn factorial(n: usize) -> usize {
    (2..=n).fold(1usize, |acc, k| acc.saturating_mul(k))
}

/// <https://www.w3.org/TR/rdf-canon/#canon-state>
struct NormalizationState<'a> {
    blank_node_to_quads: Map<&'a str, Vec<&'a Statement>>,
    canonical_issuer: IdentifierIssuer,
}

/// <https://www.w3.org/TR/rdf-canon/#hash-1d-quads>
fn hash_first_degree_quads(state: &NormalizationState, reference_blank_node_identifier: &str) -> String {
    let mut nquads: Vec<String> = Vec::new();
    if let Some(quads) = state.blank_node_to_quads.get(reference_blank_node_identifier) {
        for quad in quads {
            let mut quad: Statement = (*quad).clone();
            for label in quad.blank_node_components_mut() {
                label.0 = if label.0 == reference_blank_node_identifier {
                    "_:a".to_string()
                } else {
                    "_:z".to_string()
                };
            }
            nquads.push(String::from(&quad));
        }
    }
    nquads.sort();
    sha256_hex(nquads.concat().as_bytes())
}

/// <https://www.w3.org/TR/rdf-canon/#hash-related-blank-node>
fn hash_related_blank_node(
    state: &NormalizationState,
    related: &str,
    quad: &Statement,
    issuer: &IdentifierIssuer,
    position: BlankIdPosition,
) -> String {
    let identifier = match state.canonical_issuer.find_issued_identifier(related) {
        Some(id) => id.to_string(),
        None => match issuer.find_issued_identifier(related) {
            Some(id) => id.to_string(),
            None => hash_first_degree_quads(state, related),
        },
    };
    let mut input = position.into_char().to_string();
    if position != BlankIdPosition::Graph {
        let Predicate::IRIRef(ref predicate) = quad.predicate;
        input.push('<');
        input.push_str(&predicate.0);
        input.push('>');
    }
    input.push_str(&identifier);
    sha256_hex(input.as_bytes())
}

/// <https://www.w3.org/TR/rdf-canon/#hash-nd-quads>
fn hash_n_degree_quads(
    state: &NormalizationState,
    budget: &mut WorkBudget,
    identifier: &str,
    issuer: &IdentifierIssuer,
) -> Result<(String, IdentifierIssuer), Error> {
    budget.charge(1)?;
    let mut issuer = issuer.clone();
    let mut hash_to_related_blank_nodes: Map<String, Vec<&str>> = Map::new();
    if let Some(quads) = state.blank_node_to_quads.get(identifier) {
        for quad in quads {
            for (component, position) in quad.blank_node_components_with_position() {
                if component.0 != identifier {
                    let hash = hash_related_blank_node(state, &component.0, quad, &issuer, position);
                    hash_to_related_blank_nodes
                        .entry(hash)
                        .or_default()
                        .push(component.0.as_str());
                }
            }
        }
    }
    let mut data_to_hash = String::new();
    for (related_hash, blank_node_list) in hash_to_related_blank_nodes {
        data_to_hash.push_str(&related_hash);
        let mut chosen_path = String::new();
        let mut chosen_issuer = None;
        budget.charge(factorial(blank_node_list.len()))?;
        'perm: for permutation in combination::permutate::from_vec(&blank_node_list) {
            let mut issuer_copy = issuer.clone();
            let mut path = String::new();
            let mut recursion_list: Vec<&str> = Vec::new();
            for related in permutation {
                if let Some(canonical_identifier) =
                    state.canonical_issuer.find_issued_identifier(related)
                {
                    path.push_str(canonical_identifier);
                } else {
                    if issuer_copy.find_issued_identifier(related).is_none() {
                        recursion_list.push(related);
                    }
                    path.push_str(&issuer_copy.issue(related));
                }
                if !chosen_path.is_empty() && path.len() >= chosen_path.len() && path > chosen_path
                {
                    continue 'perm;
                }
            }
            for related in recursion_list {
                let (hash, result_issuer) =
                    hash_n_degree_quads(state, budget, related, &issuer_copy)?;
                path.push_str(&issuer_copy.issue(related));
                path.push('<');
                path.push_str(&hash);
                path.push('>');
                issuer_copy = result_issuer;
                if !chosen_path.is_empty() && path.len() >= chosen_path.len() && path > chosen_path
                {
                    continue 'perm;
                }
            }
            if chosen_path.is_empty() || path < chosen_path {
                chosen_path = path;
                chosen_issuer = Some(issuer_copy);
            }
        }
        data_to_hash.push_str(&chosen_path);
        issuer = chosen_issuer.ok_or(Error::MissingChosenIssuer)?;
    }
    Ok((sha256_hex(data_to_hash.as_bytes()), issuer))
}

/// Relabels every blank node of the dataset with its canonical `_:c14nN`
/// label, using the default work factor.
pub fn normalize(input_dataset: &DataSet) -> Result<DataSet, Error> {
    normalize_with_limit(input_dataset, DEFAULT_WORK_FACTOR)
}

/// <https://www.w3.org/TR/rdf-canon/#canon-algorithm>
///
/// Fails with [`Error::RefinementLimitExceeded`] if disambiguating the blank
/// nodes takes more than `work_factor * n * n` units of work, `n` being the
/// number of blank nodes left without a unique first-degree hash.
pub fn normalize_with_limit(input_dataset: &DataSet, work_factor: usize) -> Result<DataSet, Error> {
    let input_dataset_quads = input_dataset.statements();
    let mut state = NormalizationState {
        blank_node_to_quads: Map::new(),
        canonical_issuer: IdentifierIssuer::new(CANONICAL_PREFIX),
    };
    for quad in input_dataset_quads.iter() {
        for blank_node_identifier in quad.blank_node_components() {
            let quads = state
                .blank_node_to_quads
                .entry(blank_node_identifier.0.as_str())
                .or_default();
            // a node occurring twice in one quad maps to it once
            if !quads.iter().any(|q| std::ptr::eq(*q, quad)) {
                quads.push(quad);
            }
        }
    }
    log::trace!(
        "canonicalizing {} quads with {} blank nodes",
        input_dataset_quads.len(),
        state.blank_node_to_quads.len()
    );

    let mut non_normalized_identifiers: BTreeSet<&str> =
        state.blank_node_to_quads.keys().copied().collect();
    let mut hash_to_blank_nodes: Map<String, Vec<&str>> = Map::new();
    let mut simple = true;
    while simple {
        simple = false;
        hash_to_blank_nodes.clear();
        for identifier in non_normalized_identifiers.iter() {
            let hash = hash_first_degree_quads(&state, identifier);
            hash_to_blank_nodes.entry(hash).or_default().push(*identifier);
        }
        let unique: Vec<(String, &str)> = hash_to_blank_nodes
            .iter()
            .filter(|(_, identifiers)| identifiers.len() == 1)
            .map(|(hash, identifiers)| (hash.clone(), identifiers[0]))
            .collect();
        for (hash, identifier) in unique {
            state.canonical_issuer.issue(identifier);
            non_normalized_identifiers.remove(identifier);
            hash_to_blank_nodes.remove(&hash);
            simple = true;
        }
    }

    let ambiguous = hash_to_blank_nodes.values().map(Vec::len).sum();
    let mut budget = WorkBudget::new(work_factor, ambiguous);
    for identifier_list in hash_to_blank_nodes.values() {
        let mut hash_path_list: Vec<(String, IdentifierIssuer)> = Vec::new();
        for identifier in identifier_list {
            if state
                .canonical_issuer
                .find_issued_identifier(identifier)
                .is_some()
            {
                continue;
            }
            let mut temporary_issuer = IdentifierIssuer::new("_:b");
            temporary_issuer.issue(identifier);
            hash_path_list.push(hash_n_degree_quads(
                &state,
                &mut budget,
                identifier,
                &temporary_issuer,
            )?);
        }
        hash_path_list.sort_by(|a, b| a.0.cmp(&b.0));
        for (_hash, issuer) in hash_path_list {
            for existing_identifier in issuer.issued_identifiers() {
                state.canonical_issuer.issue(existing_identifier);
            }
        }
    }
    if budget.used > 0 {
        log::trace!(
            "disambiguating {} blank nodes used {} of {} units of work",
            ambiguous,
            budget.used,
            budget.limit
        );
    }

    let mut normalized_dataset = DataSet::default();
    for quad in input_dataset_quads.iter() {
        let mut quad_copy = quad.clone();
        for label in quad_copy.blank_node_components_mut() {
            let canonical_identifier = state
                .canonical_issuer
                .find_issued_identifier(&label.0)
                .ok_or_else(|| Error::MissingIdentifier(label.0.clone()))?;
            label.0 = canonical_identifier.to_string();
        }
        normalized_dataset.add_statement(quad_copy);
    }
    Ok(normalized_dataset)
}
