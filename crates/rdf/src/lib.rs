//! Resource Description Framework (RDF) utilities, including the URDNA2015
//! canonicalization algorithm and canonical N-Quads serialization.
use std::collections::hash_map::Iter as HashMapIter;
use std::collections::HashMap;
use std::fmt;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

mod error;
pub mod urdna2015;

pub use error::Error;

// https://www.w3.org/TR/rdf-canon/
// https://www.w3.org/TR/n-quads/#terminals

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDF_JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// <https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset>
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub default_graph: Graph,
    pub named_graphs: HashMap<GraphLabel, Graph>,
}

/// <https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-graph>
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub triples: Vec<Triple>,
}

/// <https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-triple>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: Subject,
    pub predicate: Predicate,
    pub object: Object,
}

/// Triple with an optional graph label, i.e. one N-Quads line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: Subject,
    pub predicate: Predicate,
    pub object: Object,
    pub graph_label: Option<GraphLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    IRIRef(IRIRef),
    BlankNodeLabel(BlankNodeLabel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    IRIRef(IRIRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    IRIRef(IRIRef),
    BlankNodeLabel(BlankNodeLabel),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphLabel {
    IRIRef(IRIRef),
    BlankNodeLabel(BlankNodeLabel),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IRIRef(pub String);

/// Blank node label, including its `_:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlankNodeLabel(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    String {
        string: StringLiteral,
    },
    Typed {
        string: StringLiteral,
        type_: IRIRef,
    },
    LangTagged {
        string: StringLiteral,
        lang: Lang,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lang(String);

impl Lang {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Position of a blank node inside a statement, as used by the hashing steps
/// of URDNA2015.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlankIdPosition {
    Subject,
    Object,
    Graph,
}

impl BlankIdPosition {
    pub fn into_char(self) -> char {
        match self {
            Self::Subject => 's',
            Self::Object => 'o',
            Self::Graph => 'g',
        }
    }
}

impl fmt::Display for BlankIdPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.into_char().fmt(f)
    }
}

impl From<&Statement> for String {
    fn from(statement: &Statement) -> String {
        String::from(&statement.subject)
            + " "
            + &String::from(&statement.predicate)
            + " "
            + &String::from(&statement.object)
            + &match &statement.graph_label {
                Some(graph_label) => " ".to_string() + &String::from(graph_label),
                None => "".to_string(),
            }
            + " .\n"
    }
}

impl From<&Subject> for String {
    fn from(subject: &Subject) -> String {
        match subject {
            Subject::IRIRef(iri_ref) => String::from(iri_ref),
            Subject::BlankNodeLabel(blank_node_label) => String::from(blank_node_label),
        }
    }
}

impl From<&Predicate> for String {
    fn from(predicate: &Predicate) -> String {
        match predicate {
            Predicate::IRIRef(iri_ref) => String::from(iri_ref),
        }
    }
}

impl From<&Object> for String {
    fn from(object: &Object) -> String {
        match object {
            Object::IRIRef(iri_ref) => String::from(iri_ref),
            Object::BlankNodeLabel(blank_node_label) => String::from(blank_node_label),
            Object::Literal(literal) => String::from(literal),
        }
    }
}

impl From<&GraphLabel> for String {
    fn from(graph_label: &GraphLabel) -> String {
        match graph_label {
            GraphLabel::IRIRef(iri_ref) => String::from(iri_ref),
            GraphLabel::BlankNodeLabel(blank_node_label) => String::from(blank_node_label),
        }
    }
}

impl From<&IRIRef> for String {
    fn from(iri_ref: &IRIRef) -> String {
        let string = &iri_ref.0;
        let mut out = String::with_capacity(string.len() + 2);
        out.push('<');
        for c in string.chars() {
            match c {
                '\x00'..='\x20' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                    let code: u32 = c.into();
                    out.push_str(&format!("\\u{:04X}", code))
                }
                _ => out.push(c),
            }
        }
        out.push('>');
        out
    }
}

impl From<&StringLiteral> for String {
    fn from(string_literal: &StringLiteral) -> String {
        let string = &string_literal.0;
        // estimate size of escaped string
        let mut out = String::with_capacity(string.len() + 6);
        out.push('"');
        for c in string.chars() {
            match c {
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        }
        out.push('"');
        out
    }
}

impl From<&BlankNodeLabel> for String {
    fn from(blank_node_label: &BlankNodeLabel) -> String {
        // Escaping not implemented, since we are constructing these
        blank_node_label.0.clone()
    }
}

impl From<&Lang> for String {
    fn from(lang: &Lang) -> String {
        lang.0.clone()
    }
}

impl From<&Literal> for String {
    fn from(literal: &Literal) -> String {
        match literal {
            Literal::String { string } => String::from(string),
            Literal::Typed { string, type_ } => String::from(string) + "^^" + &String::from(type_),
            Literal::LangTagged { string, lang } => {
                String::from(string) + "@" + &String::from(lang)
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(self))
    }
}

fn parse_lang_subtag(chars: &mut Peekable<Chars>, string: &mut String) -> Result<(), Error> {
    let mut empty = true;
    while let Some(c) = chars.peek() {
        if c.is_ascii_alphanumeric() {
            string.push(*c);
            chars.next();
            empty = false;
        } else {
            break;
        }
    }
    if empty {
        return Err(Error::ExpectedLang);
    }
    Ok(())
}

// [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*
fn parse_lang(chars: &mut Peekable<Chars>) -> Result<Lang, Error> {
    let mut string = String::new();
    let mut empty = true;
    while let Some(c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            string.push(*c);
            chars.next();
            empty = false;
        } else {
            break;
        }
    }
    if empty {
        return Err(Error::ExpectedLang);
    }
    while chars.peek() == Some(&'-') {
        string.push('-');
        chars.next();
        parse_lang_subtag(chars, &mut string)?;
    }
    Ok(Lang(string))
}

impl FromStr for Lang {
    type Err = Error;
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let mut chars = tag.chars().peekable();
        let lang = parse_lang(&mut chars)?;
        if chars.next().is_some() {
            return Err(Error::ExpectedLang);
        }
        Ok(lang)
    }
}

impl Statement {
    pub fn blank_node_components(&self) -> Vec<&BlankNodeLabel> {
        self.blank_node_components_with_position()
            .into_iter()
            .map(|(label, _position)| label)
            .collect()
    }

    pub fn blank_node_components_mut(&mut self) -> Vec<&mut BlankNodeLabel> {
        let mut labels: Vec<&mut BlankNodeLabel> = Vec::new();
        if let Subject::BlankNodeLabel(ref mut label) = self.subject {
            labels.push(label)
        }
        if let Object::BlankNodeLabel(ref mut label) = self.object {
            labels.push(label)
        }
        if let Some(GraphLabel::BlankNodeLabel(ref mut label)) = self.graph_label {
            labels.push(label)
        }
        labels
    }

    pub fn blank_node_components_with_position(&self) -> Vec<(&BlankNodeLabel, BlankIdPosition)> {
        let mut labels = Vec::new();
        if let Subject::BlankNodeLabel(ref label) = self.subject {
            labels.push((label, BlankIdPosition::Subject))
        }
        if let Object::BlankNodeLabel(ref label) = self.object {
            labels.push((label, BlankIdPosition::Object))
        }
        if let Some(GraphLabel::BlankNodeLabel(ref label)) = self.graph_label {
            labels.push((label, BlankIdPosition::Graph))
        }
        labels
    }
}

pub struct DataSetGraphIter<'a> {
    dataset: &'a DataSet,
    named_graphs_iter: Option<HashMapIter<'a, GraphLabel, Graph>>,
}

impl<'a> Iterator for DataSetGraphIter<'a> {
    type Item = (Option<&'a GraphLabel>, &'a Graph);
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(ref mut named_graphs_iter) = self.named_graphs_iter {
            named_graphs_iter
                .next()
                .map(|(graph_label, graph)| (Some(graph_label), graph))
        } else {
            self.named_graphs_iter = Some(self.dataset.named_graphs.iter());
            Some((None, &self.dataset.default_graph))
        }
    }
}

impl DataSet {
    pub fn iterable(&self) -> DataSetGraphIter<'_> {
        DataSetGraphIter {
            dataset: self,
            named_graphs_iter: None,
        }
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.iterable()
            .flat_map(|(graph_name, graph)| {
                graph.triples.iter().cloned().map(move |triple| Statement {
                    subject: triple.subject,
                    predicate: triple.predicate,
                    object: triple.object,
                    graph_label: graph_name.cloned(),
                })
            })
            .collect()
    }

    pub fn add_statement(&mut self, statement: Statement) {
        let graph = match statement.graph_label {
            Some(label) => self.named_graphs.entry(label).or_default(),
            None => &mut self.default_graph,
        };
        graph.add(Triple {
            subject: statement.subject,
            predicate: statement.predicate,
            object: statement.object,
        });
    }

    /// Number of statements across all graphs, duplicates included.
    pub fn len(&self) -> usize {
        self.iterable().map(|(_, graph)| graph.triples.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialized statements, sorted and deduplicated.
    pub fn to_nquads_vec(&self) -> Vec<String> {
        // https://www.w3.org/TR/n-quads/
        let mut lines = self
            .statements()
            .iter()
            .map(String::from)
            .collect::<Vec<String>>();
        lines.sort();
        lines.dedup();
        lines
    }

    pub fn to_nquads(&self) -> String {
        self.to_nquads_vec().join("")
    }
}

impl Graph {
    pub fn add(&mut self, triple: Triple) {
        self.triples.push(triple);
    }
}

/// Canonical N-Quads document.
///
/// Lines are sorted byte-wise, deduplicated and each terminated by `" .\n"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalForm {
    nquads: String,
    count: usize,
}

impl CanonicalForm {
    /// Builds the canonical form of an already canonically labeled dataset.
    pub fn from_normalized(dataset: &DataSet) -> Self {
        let lines = dataset.to_nquads_vec();
        Self {
            count: lines.len(),
            nquads: lines.concat(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.nquads
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.nquads.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.nquads.into_bytes()
    }

    /// Statement lines, each including its trailing newline.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.nquads.split_inclusive('\n')
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nquads)
    }
}

impl AsRef<[u8]> for CanonicalForm {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

fn parse_uchar(chars: &mut Peekable<Chars>, len: usize) -> Result<char, Error> {
    let escaped: String = chars.take(len).collect();
    char::try_from(u32::from_str_radix(&escaped, 16).map_err(|_| Error::ExpectedLiteral)?)
        .map_err(|_| Error::ExpectedLiteral)
}

fn parse_iri_ref(chars: &mut Peekable<Chars>) -> Result<IRIRef, Error> {
    let mut out = String::new();
    if chars.next() != Some('<') {
        return Err(Error::ExpectedIRIRef);
    }
    while let Some(c) = chars.next() {
        match c {
            '>' => return Ok(IRIRef(out)),
            '\\' => {
                let c = match chars.next() {
                    Some('u') => parse_uchar(chars, 4)?,
                    Some('U') => parse_uchar(chars, 8)?,
                    _ => return Err(Error::ExpectedIRIRef),
                };
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    Err(Error::ExpectedIRIRef)
}

fn parse_string_literal_quote(chars: &mut Peekable<Chars>) -> Result<StringLiteral, Error> {
    let mut string = String::new();
    if chars.next() != Some('"') {
        return Err(Error::ExpectedLiteral);
    }
    while let Some(c) = chars.next() {
        match c {
            '"' => return Ok(StringLiteral(string)),
            '\\' => {
                let c = match chars.next() {
                    Some('u') => parse_uchar(chars, 4)?,
                    Some('U') => parse_uchar(chars, 8)?,
                    Some('t') => '\t',
                    Some('b') => '\x08',
                    Some('n') => '\n',
                    Some('r') => '\r',
                    Some('f') => '\x0c',
                    Some('"') => '"',
                    Some('\'') => '\'',
                    Some('\\') => '\\',
                    _ => return Err(Error::ExpectedLiteral),
                };
                string.push(c);
            }
            _ => string.push(c),
        }
    }
    Err(Error::ExpectedLiteral)
}

fn parse_literal(chars: &mut Peekable<Chars>) -> Result<Literal, Error> {
    let string = parse_string_literal_quote(chars)?;
    match chars.peek() {
        Some(' ') | Some('\t') | None => Ok(Literal::String { string }),
        Some('^') => {
            chars.next();
            if chars.next() != Some('^') {
                return Err(Error::ExpectedLiteral);
            }
            let type_ = parse_iri_ref(chars)?;
            // xsd:string literals are serialized without their datatype
            if type_.0 == XSD_STRING {
                Ok(Literal::String { string })
            } else {
                Ok(Literal::Typed { string, type_ })
            }
        }
        Some('@') => {
            chars.next();
            let lang = parse_lang(chars)?;
            Ok(Literal::LangTagged { string, lang })
        }
        _ => Err(Error::ExpectedLiteral),
    }
}

fn parse_blank_node_label(chars: &mut Peekable<Chars>) -> Result<BlankNodeLabel, Error> {
    if chars.next() != Some('_') {
        return Err(Error::ExpectedBlankNodeLabel);
    }
    if chars.next() != Some(':') {
        return Err(Error::ExpectedBlankNodeLabel);
    }
    let mut out = String::from("_:");
    while let Some(c) = chars.peek() {
        match c {
            ' ' | '\t' => break,
            _ => {
                out.push(*c);
                chars.next();
            }
        }
    }
    if out.len() == 2 {
        return Err(Error::ExpectedBlankNodeLabel);
    }
    Ok(BlankNodeLabel(out))
}

fn parse_subject(chars: &mut Peekable<Chars>) -> Result<Subject, Error> {
    match chars.peek() {
        Some('<') => Ok(Subject::IRIRef(parse_iri_ref(chars)?)),
        Some('_') => Ok(Subject::BlankNodeLabel(parse_blank_node_label(chars)?)),
        _ => Err(Error::ExpectedTerm),
    }
}

fn parse_predicate(chars: &mut Peekable<Chars>) -> Result<Predicate, Error> {
    Ok(Predicate::IRIRef(parse_iri_ref(chars)?))
}

fn parse_object(chars: &mut Peekable<Chars>) -> Result<Object, Error> {
    match chars.peek() {
        Some('"') => Ok(Object::Literal(parse_literal(chars)?)),
        Some('<') => Ok(Object::IRIRef(parse_iri_ref(chars)?)),
        Some('_') => Ok(Object::BlankNodeLabel(parse_blank_node_label(chars)?)),
        _ => Err(Error::ExpectedTerm),
    }
}

fn parse_graph_label(chars: &mut Peekable<Chars>) -> Result<Option<GraphLabel>, Error> {
    match chars.peek() {
        Some('<') => Ok(Some(GraphLabel::IRIRef(parse_iri_ref(chars)?))),
        Some('_') => Ok(Some(GraphLabel::BlankNodeLabel(parse_blank_node_label(
            chars,
        )?))),
        Some(_) => Err(Error::ExpectedTerm),
        None => Ok(None),
    }
}

fn ignore_whitespace(chars: &mut Peekable<Chars>) {
    while let Some(c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            _ => break,
        }
    }
}

impl FromStr for Statement {
    type Err = Error;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line
            .trim_end()
            .strip_suffix('.')
            .ok_or(Error::ExpectedNQuad)?;
        if !line.ends_with(|c: char| c == ' ' || c == '\t') {
            return Err(Error::ExpectedNQuad);
        }
        let mut chars = line.trim().chars().peekable();
        let subject = parse_subject(&mut chars)?;
        ignore_whitespace(&mut chars);
        let predicate = parse_predicate(&mut chars)?;
        ignore_whitespace(&mut chars);
        let object = parse_object(&mut chars)?;
        ignore_whitespace(&mut chars);
        let graph_label = parse_graph_label(&mut chars)?;
        ignore_whitespace(&mut chars);
        if chars.next().is_some() {
            return Err(Error::ExpectedNQuad);
        }
        Ok(Self {
            subject,
            predicate,
            object,
            graph_label,
        })
    }
}

impl FromStr for DataSet {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut dataset = DataSet::default();
        for line in s.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            dataset.add_statement(Statement::from_str(trimmed)?);
        }
        Ok(dataset)
    }
}
