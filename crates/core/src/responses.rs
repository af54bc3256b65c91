//! Canned reply templates used when no domain answers.

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Which situation a canned reply is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Processing failed for an unspecific reason.
    Generic,
    /// A knowledge source timed out or was unreachable.
    Network,
    /// Processing worked but nothing matched.
    NoMatch,
}

/// Source of canned reply text.
pub trait ResponseProvider: Send + Sync {
    fn pick(&self, kind: ResponseKind) -> String;
}

const GENERIC: &[&str] = &[
    "I'm not completely sure about that one. Could you rephrase it, or ask me about insurance coverage, \
     the claims process, or your case timeline?",
    "Good question. I don't have a confident answer right now, but our team can help. You can also ask me \
     about UM/UIM coverage, letters of representation, or how settlements work.",
    "I couldn't find a reliable answer for that. Try asking about insurance terms, medical treatment after \
     an accident, or what happens during a settlement.",
];

const NETWORK: &[&str] = &[
    "I'm having trouble reaching my knowledge sources right now. Please try again in a moment.",
    "Something is slow on my end and I couldn't finish looking that up. Please ask again shortly.",
];

const NO_MATCH: &[&str] = &[
    "I don't have information on that yet. Try asking about insurance coverage (UM, UIM, PIP), the legal \
     process (LOR, statute of limitations), medical treatment, or settlements.",
];

/// Picks uniformly at random from fixed template lists.
pub struct TemplateResponses {
    rng: Mutex<StdRng>,
}

impl TemplateResponses {
    pub fn new() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }

    /// Deterministic picks for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    fn templates(kind: ResponseKind) -> &'static [&'static str] {
        match kind {
            ResponseKind::Generic => GENERIC,
            ResponseKind::Network => NETWORK,
            ResponseKind::NoMatch => NO_MATCH,
        }
    }
}

impl Default for TemplateResponses {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseProvider for TemplateResponses {
    fn pick(&self, kind: ResponseKind) -> String {
        let mut rng = self.rng.lock();
        Self::templates(kind).choose(&mut *rng).map(|s| (*s).to_string()).unwrap_or_default()
    }
}

/// Always returns the same text. Useful in tests.
#[derive(Debug, Clone)]
pub struct FixedResponse(pub String);

impl ResponseProvider for FixedResponse {
    fn pick(&self, _kind: ResponseKind) -> String {
        self.0.clone()
    }
}
