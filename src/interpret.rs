use tracing::debug;

use crate::filter::{BoolOp, FilterNode, Interpretation, Operator};
use crate::grammar::Atom;
use crate::net::{Ipv4Literal, canonical_ipv6_prefix, classify_ipv4};
use crate::profile::EntityProfile;
use crate::settings::RoutingIdMode;

/// Turns literal atoms into filter nodes for one entity.
#[derive(Debug, Clone, Copy)]
pub struct Interpreter {
    pub profile: &'static EntityProfile,
    pub routing_id: RoutingIdMode,
}

impl Interpreter {
    pub fn new(profile: &'static EntityProfile, routing_id: RoutingIdMode) -> Self {
        Self { profile, routing_id }
    }

    pub fn interpret(&self, atom: &Atom) -> FilterNode {
        match atom {
            Atom::Tag(name) => self.tag(name),
            Atom::RoutingId(rt) => self.routing_id(rt),
            Atom::Ipv6Address(address) if self.profile.exposes_prefix() => {
                debug!(address = %address, "interpreted as IPv6 address");
                FilterNode::leaf(Operator::ContainsEquals, "prefix", address.as_str())
                    .with_interpretation(Interpretation::new(
                        address.as_str(),
                        "IPv6 address",
                        "prefix",
                        Operator::ContainsEquals.name(),
                    ))
            }
            Atom::Ipv6Prefix(literal) if self.profile.exposes_prefix() => self.ipv6_prefix(literal),
            Atom::Word(word) if self.profile.exposes_prefix() => match classify_ipv4(word) {
                Some(literal) => self.ipv4(word, literal),
                None => self.free_text(word),
            },
            other => self.free_text(other.text()),
        }
    }

    fn tag(&self, name: &str) -> FilterNode {
        let own = FilterNode::leaf(Operator::EqualsAny, "tags", name);
        let (node, interpretation) = if self.profile.inherits_tags {
            let inherited = FilterNode::leaf(Operator::EqualsAny, "inherited_tags", name);
            (FilterNode::branch(BoolOp::Or, own, inherited), "(inherited) tag")
        } else {
            (own, "tag")
        };
        node.with_interpretation(Interpretation::new(
            format!("#{}", name),
            interpretation,
            "tag",
            Operator::EqualsAny.name(),
        ))
    }

    fn routing_id(&self, rt: &str) -> FilterNode {
        match self.routing_id {
            RoutingIdMode::Legacy => self.regex_chain(
                rt,
                self.profile.legacy_routing_columns,
                self.profile.legacy_routing_label,
            ),
            RoutingIdMode::Direct => FilterNode::leaf(Operator::Equals, self.profile.routing_column, rt)
                .with_interpretation(Interpretation::new(rt, "vrf_rt", "VRF RT", Operator::Equals.name())),
        }
    }

    fn ipv6_prefix(&self, literal: &str) -> FilterNode {
        let strict = canonical_ipv6_prefix(literal).unwrap_or_else(|| literal.to_string());
        let mut interpretation = Interpretation::new(
            literal,
            "IPv6 prefix",
            "prefix",
            Operator::ContainedWithinEquals.name(),
        );
        if strict != literal {
            interpretation.strict_prefix = Some(strict.clone());
        }
        FilterNode::leaf(Operator::ContainedWithinEquals, "prefix", strict).with_interpretation(interpretation)
    }

    fn ipv4(&self, word: &str, literal: Ipv4Literal) -> FilterNode {
        match literal {
            Ipv4Literal::Prefix { expanded, strict } => {
                debug!(word, expanded = %expanded, "interpreted as IPv4 prefix");
                let mut interpretation = Interpretation::new(
                    word,
                    "IPv4 prefix",
                    "prefix",
                    Operator::ContainedWithinEquals.name(),
                );
                if expanded != word {
                    interpretation.expanded = Some(expanded.clone());
                }
                if strict != expanded {
                    interpretation.strict_prefix = Some(strict.clone());
                }
                FilterNode::leaf(Operator::ContainedWithinEquals, "prefix", strict)
                    .with_interpretation(interpretation)
            }
            Ipv4Literal::Address(address) => {
                debug!(word, "interpreted as IPv4 address");
                FilterNode::leaf(Operator::ContainsEquals, "prefix", address.as_str()).with_interpretation(
                    Interpretation::new(
                        address.as_str(),
                        "IPv4 address",
                        "prefix",
                        Operator::ContainsEquals.name(),
                    ),
                )
            }
        }
    }

    fn free_text(&self, text: &str) -> FilterNode {
        self.regex_chain(text, self.profile.free_text, self.profile.free_text_label)
    }

    fn regex_chain(&self, text: &str, columns: &[&str], label: &str) -> FilterNode {
        let leaves = columns
            .iter()
            .map(|column| FilterNode::leaf(Operator::RegexMatch, *column, text));
        // profiles always list at least one free text column
        let chain = FilterNode::fold(BoolOp::Or, leaves)
            .unwrap_or_else(|| FilterNode::leaf(Operator::RegexMatch, "description", text));
        chain.with_interpretation(Interpretation::new(text, "text", label, "regex"))
    }
}
