//! Segmentation of a cleaned document into labeled sections.
//!
//! Three tiers, first one that yields a candidate wins:
//! 1. semantic landmarks (`header`, `nav`, `main`, `section`, `footer`, `article`)
//! 2. heading groups (`h1`-`h3` plus following siblings)
//! 3. the whole body
//!
//! Each candidate is serialized on its own, so content collection and the
//! raw-HTML snapshot see exactly the region that was chosen.

pub mod content;

use std::collections::HashSet;

use dom_query::{Document, NodeId, Selection};
use url::Url;

use crate::dom;
use crate::limits::{self, MAX_SECTIONS};
use crate::patterns::{self, GROUP_HEADINGS, LANDMARK_TAGS};
use crate::result::Section;

/// A region of the page selected for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Tag the region is named after.
    pub tag: String,
    pub class: String,
    pub id: String,
    /// Serialized HTML of the region.
    pub html: String,
}

impl Candidate {
    fn from_element(sel: &Selection) -> Self {
        Self {
            tag: dom::tag_name(sel).unwrap_or_default(),
            class: dom::class_name(sel).unwrap_or_default(),
            id: dom::id(sel).unwrap_or_default(),
            html: dom::outer_html(sel).to_string(),
        }
    }
}

/// Which tier produced the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Landmark,
    Heading,
    Body,
}

/// Split `doc` into at most 20 sections, resolving URLs against `base`.
#[must_use]
pub fn segment(doc: &Document, base: &Url) -> Vec<Section> {
    let (tier, candidates) = candidates(doc);
    tracing::debug!(?tier, candidates = candidates.len(), "segmenting");

    candidates
        .iter()
        .take(MAX_SECTIONS)
        .enumerate()
        .map(|(index, candidate)| limits::limit(content::collect(candidate, index, base)))
        .collect()
}

/// Candidate regions of `doc` and the tier that produced them, at most
/// [`MAX_SECTIONS`] of them.
#[must_use]
pub fn candidates(doc: &Document) -> (Tier, Vec<Candidate>) {
    let body = dom::body(doc);
    if !body.exists() {
        return (Tier::Body, Vec::new());
    }

    let landmarks = landmark_candidates(&body);
    if !landmarks.is_empty() {
        return (Tier::Landmark, landmarks);
    }

    let groups = heading_candidates(&body);
    if !groups.is_empty() {
        return (Tier::Heading, groups);
    }

    (Tier::Body, vec![Candidate::from_element(&body)])
}

fn landmark_candidates(body: &Selection) -> Vec<Candidate> {
    dom::elements_in_order(body, LANDMARK_TAGS)
        .iter()
        .take(MAX_SECTIONS)
        .map(Candidate::from_element)
        .collect()
}

/// One group per top-level `h1`/`h2`/`h3`: the heading plus its following
/// element siblings up to the next heading of equal or higher rank.
fn heading_candidates(body: &Selection) -> Vec<Candidate> {
    let group_tags: Vec<&str> = GROUP_HEADINGS.iter().map(|(tag, _)| *tag).collect();
    let mut absorbed: HashSet<NodeId> = HashSet::new();
    let mut groups = Vec::new();

    for heading in dom::elements_in_order(body, &group_tags) {
        if groups.len() >= MAX_SECTIONS {
            break;
        }
        let Some(node) = heading.nodes().first().copied() else {
            continue;
        };
        if dom::self_or_ancestor(&node, |n| absorbed.contains(&n.id)) {
            continue;
        }
        let Some(rank) = dom::node_tag(&node).and_then(|t| patterns::heading_rank(&t)) else {
            continue;
        };

        absorbed.insert(node.id);
        let mut html = dom::outer_html(&heading).to_string();

        let mut next = dom::next_element_sibling(&node);
        while let Some(sibling) = next {
            let closes_group = dom::node_tag(&sibling)
                .and_then(|t| patterns::heading_rank(&t))
                .is_some_and(|r| r <= rank);
            if closes_group {
                break;
            }
            absorbed.insert(sibling.id);
            html.push('\n');
            html.push_str(&dom::outer_html(&Selection::from(sibling)));
            next = dom::next_element_sibling(&sibling);
        }

        groups.push(Candidate {
            tag: "section".to_string(),
            class: dom::class_name(&heading).unwrap_or_default(),
            id: dom::id(&heading).unwrap_or_default(),
            html,
        });
    }

    groups
}
