use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use super::slug::{FALLBACK_ID_PREFIX, FALLBACK_ID_RANGE, generate_id, slugify};

const FALLBACK_REROLLS: usize = 16;

type HeadingKey = (u8, String);

/// One id-assignment pass over a single document.
///
/// The extractor registers the id it chose for every `(level, text)` it
/// keeps; the injector later hands that id to the first matching heading in
/// the rendered markup, so outline links and document anchors agree.
pub struct AnchorRegistry {
    rng: StdRng,
    used: HashSet<String>,
    assigned: HashMap<HeadingKey, String>,
    claimed: HashSet<HeadingKey>,
}

impl Default for AnchorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            used: HashSet::new(),
            assigned: HashMap::new(),
            claimed: HashSet::new(),
        }
    }

    /// Generates and registers an id for a heading without one.
    pub fn assign(&mut self, level: u8, text: &str) -> String {
        let id = self.fresh(text);
        self.assigned.insert((level, text.to_string()), id.clone());
        id
    }

    /// Registers an author-supplied id as-is. Explicit ids are never rewritten.
    pub fn claim_explicit(&mut self, level: u8, text: &str, id: &str) -> String {
        self.used.insert(id.to_string());
        self.assigned.insert((level, text.to_string()), id.to_string());
        id.to_string()
    }

    /// Hands out the registered id for `(level, text)` once.
    pub fn take(&mut self, level: u8, text: &str) -> Option<String> {
        let key = (level, text.to_string());
        let id = self.assigned.get(&key)?.clone();
        if !self.claimed.insert(key) {
            return None;
        }
        trace!(level, id = %id, "reusing registered heading id");
        Some(id)
    }

    /// Records a heading that already carries `id` in the markup.
    pub fn observe(&mut self, level: u8, text: &str, id: &str) {
        self.used.insert(id.to_string());
        let key = (level, text.to_string());
        if self.assigned.get(&key).is_some_and(|assigned| assigned == id) {
            self.claimed.insert(key);
        }
    }

    /// Marks an id as taken without tying it to a heading.
    pub fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }

    /// A generated id not yet handed out in this pass.
    ///
    /// Fallback ids stay in the `heading-NNNN` form: a taken one is rerolled,
    /// then the lowest free number is used. Only once all four digit numbers
    /// are taken does a fallback id get a `-N` suffix like any other.
    pub fn fresh(&mut self, text: &str) -> String {
        let mut base = generate_id(text, &mut self.rng);

        if slugify(text).is_empty() {
            let mut attempts = 0;
            while self.used.contains(&base) && attempts < FALLBACK_REROLLS {
                base = generate_id(text, &mut self.rng);
                attempts += 1;
            }
            if self.used.contains(&base) {
                base = self.lowest_free_fallback().unwrap_or(base);
            }
            debug!(id = %base, "heading text has no usable characters, using fallback id");
        }

        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        if candidate != base {
            debug!(base = %base, id = %candidate, "heading id collision resolved");
        }

        self.used.insert(candidate.clone());
        candidate
    }

    fn lowest_free_fallback(&self) -> Option<String> {
        FALLBACK_ID_RANGE
            .map(|number| format!("{FALLBACK_ID_PREFIX}{number}"))
            .find(|id| !self.used.contains(id))
    }
}
