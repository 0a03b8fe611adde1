//! The smart search facade. [`Engine`] ties the tokenizer, the filter tree
//! compiler and the predicate renderer together and hands the predicate to a
//! [`SearchBackend`] that owns the actual store.

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::compile::compile;
use crate::error::{Result, SearchError};
use crate::filter::{BoolOp, FilterNode, Interpretation, Operator};
use crate::grammar::tokenize;
use crate::interpret::Interpreter;
use crate::predicate::{Predicate, compile_query};
use crate::profile::Entity;
use crate::settings::{SearchSettings, Settings};

pub type Row = serde_json::Map<String, serde_json::Value>;

/// The store that runs predicates. Errors from it are passed on unchanged.
pub trait SearchBackend {
    fn search(&self, entity: Entity, predicate: &Predicate, options: &SearchOptions) -> Result<Vec<Row>>;
}

// ------------- Options -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    pub max_result: usize,
    pub offset: usize,
}

impl SearchOptions {
    pub fn new(defaults: &SearchSettings) -> Self {
        Self { max_result: defaults.max_result, offset: defaults.offset }
    }

    /// Builds options from textual key/value pairs. Unknown keys are ignored
    /// and missing ones take the configured defaults.
    pub fn from_pairs<'a, I>(pairs: I, defaults: &SearchSettings) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::new(defaults);
        for (key, value) in pairs {
            let slot = match key {
                "max_result" => &mut options.max_result,
                "offset" => &mut options.offset,
                _ => continue,
            };
            *slot = value.trim().parse().map_err(|_| {
                SearchError::InvalidOption(format!(
                    "Invalid value for option '{}'. Only integer values allowed.",
                    key
                ))
            })?;
        }
        Ok(options)
    }
}

// ------------- Results -------------
/// Outcome of parsing a query for one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// The query tokenized. `success` is false when some token was rejected,
    /// the details are in the tree's interpretations.
    Compiled { success: bool, filter: FilterNode },
    /// The query could not be tokenized at all.
    Rejected(Interpretation),
}

impl Parsed {
    pub fn success(&self) -> bool {
        matches!(self, Parsed::Compiled { success: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Interpreted {
    Tree(FilterNode),
    Rejected(Vec<Interpretation>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub result: Vec<Row>,
    pub interpretation: Interpreted,
    pub search_options: SearchOptions,
}

impl FilterNode {
    /// Restricts a search to one routing context, identified by its route target.
    pub fn routing_context(entity: Entity, rt: &str) -> FilterNode {
        FilterNode::leaf(Operator::Equals, entity.profile().routing_column, rt)
    }
}

// ------------- Engine -------------
#[derive(Debug, Clone, Default)]
pub struct Engine {
    settings: Settings,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn default_options(&self) -> SearchOptions {
        SearchOptions::new(&self.settings.search)
    }

    pub fn interpreter(&self, entity: Entity) -> Interpreter {
        Interpreter::new(entity.profile(), self.settings.parser.routing_id)
    }

    pub fn parse(&self, entity: Entity, query: &str) -> Parsed {
        let parser = &self.settings.parser;
        match tokenize(query, parser.max_depth, parser.max_terms) {
            Ok(tokens) => {
                let (success, filter) = compile(&tokens, &self.interpreter(entity));
                debug!(%entity, query, success, "query compiled");
                Parsed::Compiled { success, filter }
            }
            Err(kind) => {
                debug!(%entity, query, error = %kind, "query rejected");
                Parsed::Rejected(Interpretation::syntax_error(query, kind))
            }
        }
    }

    pub fn compile_query(&self, entity: Entity, filter: &FilterNode) -> Result<Predicate> {
        compile_query(entity.profile(), filter)
    }

    /// Parses `query`, and when every token was understood, runs it through
    /// `backend` with `extra` ANDed in.
    pub fn smart_search(
        &self,
        backend: &dyn SearchBackend,
        entity: Entity,
        query: &str,
        options: SearchOptions,
        extra: Option<FilterNode>,
    ) -> Result<SearchResponse> {
        let start = Instant::now();
        let filter = match self.parse(entity, query) {
            Parsed::Rejected(interpretation) => {
                return Ok(SearchResponse {
                    result: Vec::new(),
                    interpretation: Interpreted::Rejected(vec![interpretation]),
                    search_options: options,
                });
            }
            Parsed::Compiled { success: false, filter } => {
                info!(%entity, "query has errors, not searching");
                return Ok(SearchResponse {
                    result: Vec::new(),
                    interpretation: Interpreted::Tree(filter),
                    search_options: options,
                });
            }
            Parsed::Compiled { success: true, filter } => filter,
        };
        let scoped = match extra {
            Some(extra) => FilterNode::branch(BoolOp::And, filter.clone(), extra),
            None => filter.clone(),
        };
        let predicate = self.compile_query(entity, &scoped)?;
        let result = backend.search(entity, &predicate, &options).inspect_err(|e| {
            warn!(error = %e, %entity, "search failed");
        })?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(ms = elapsed_ms, rows = result.len(), %entity, "smart search complete");
        Ok(SearchResponse {
            result,
            interpretation: Interpreted::Tree(filter),
            search_options: options,
        })
    }
}
