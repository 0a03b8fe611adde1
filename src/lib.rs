//! ipam-search – the smart search query engine of an IP address management system.
//!
//! Network engineers look up address blocks (prefixes), address pools and
//! routing contexts (VRFs) with one free text string, for example
//! `10/8 #core (status=assigned or description~*uplink)`. The engine turns
//! that string into
//! * a structured filter tree, translated into a parameterized PostgreSQL
//!   predicate for the store, and
//! * an interpretation of every token, so the user can see how the query was
//!   understood and which parts were rejected.
//!
//! Bad user input never produces an `Err`. Unbalanced quotes, unknown
//! attributes and the like are reported inside the interpretation instead.
//!
//! ## Modules
//! * [`grammar`] – pest based tokenizer (grammar in `smart.pest`) recognizing
//!   IPv6 literals, quoted strings, `key<op>value` expressions, tags, route
//!   targets, boolean keywords and bare words.
//! * [`normalize`] – inserts implicit `and`s and drops dangling keywords.
//! * [`compile`] – left folds tokens into a binary [`filter::FilterNode`] tree.
//! * [`interpret`] – per entity reading of literal tokens (tags, IPv4/IPv6
//!   prefixes and addresses, free text).
//! * [`validate`] – checks expressions against the entity's attribute table.
//! * [`profile`] – static attribute and column tables for each [`profile::Entity`].
//! * [`predicate`] – renders a filter tree into SQL text and ordered parameters.
//! * [`search`] – the [`search::Engine`] facade running a query through a
//!   [`search::SearchBackend`].
//! * [`allocate`] – checks free range allocation requests before they are
//!   handed to a [`allocate::RangeAllocator`].
//! * [`settings`] – layered configuration.
//!
//! ## Quick Start
//! ```
//! use ipam_search::{profile::Entity, search::{Engine, Parsed}};
//! let engine = Engine::default();
//! let parsed = engine.parse(Entity::Prefix, "10/8 #core");
//! assert!(parsed.success());
//! if let Parsed::Compiled { filter, .. } = parsed {
//!     let predicate = engine.compile_query(Entity::Prefix, &filter).unwrap();
//!     assert_eq!(predicate.params.len(), 3);
//! }
//! ```

pub mod allocate;
pub mod compile;
pub mod error;
pub mod filter;
pub mod grammar;
pub mod interpret;
pub mod net;
pub mod normalize;
pub mod predicate;
pub mod profile;
pub mod search;
pub mod settings;
pub mod validate;
