use std::collections::HashMap;

use crate::tle::error::ParseError;
use crate::tle::parsing::parse_lenient;
use crate::tle::types::{classify_name, ObjectClass, TrackedObject};

/// Split multi-satellite TLE text into (name, line1, line2) groups.
/// Accepts both 2-line and 3-line (named) records; unknown lines are
/// skipped.
pub fn split_tle_groups(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}

/// A TLE group that failed to decode during ingestion.
#[derive(Debug, Clone)]
pub struct RejectedTle {
    pub name: Option<String>,
    pub line1: String,
    pub error: ParseError,
}

/// Outcome of one ingestion run: loaded catalog numbers alongside the
/// rejected groups. A bad record never aborts the rest of the batch.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub loaded: Vec<u32>,
    pub rejected: Vec<RejectedTle>,
}

/// Tracked objects keyed by catalog number. A fresh TLE supersedes the
/// stored one only when its epoch is newer.
#[derive(Debug, Default)]
pub struct Catalog {
    objects: HashMap<u32, TrackedObject>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, catalog_number: u32) -> Option<&TrackedObject> {
        self.objects.get(&catalog_number)
    }

    pub fn objects(&self) -> impl Iterator<Item = &TrackedObject> {
        self.objects.values()
    }

    /// Insert or supersede. Returns false when an entry with an equal or
    /// newer epoch is already present (the insert is dropped).
    pub fn insert(&mut self, object: TrackedObject) -> bool {
        match self.objects.get(&object.catalog_number()) {
            Some(existing) if existing.elements.epoch >= object.elements.epoch => false,
            _ => {
                self.objects.insert(object.catalog_number(), object);
                true
            }
        }
    }

    /// Parse every TLE group in `content` into the catalog. Unparseable
    /// groups are reported and logged, never fatal.
    pub fn ingest_text(&mut self, content: &str) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();

        for (name, line1, line2) in split_tle_groups(content) {
            match parse_lenient(&line1, &line2) {
                Ok(elements) => {
                    let (obj_name, class) = match &name {
                        Some(n) => (n.clone(), classify_name(n)),
                        None => (
                            format!("OBJECT {}", elements.catalog_number),
                            ObjectClass::Satellite,
                        ),
                    };
                    let catalog_number = elements.catalog_number;
                    if self.insert(TrackedObject::new(obj_name, class, elements)) {
                        outcome.loaded.push(catalog_number);
                    }
                }
                Err(error) => {
                    log::warn!(
                        "skipping unparseable TLE{}: {error}",
                        name.as_deref()
                            .map(|n| format!(" for {n}"))
                            .unwrap_or_default()
                    );
                    outcome.rejected.push(RejectedTle { name, line1, error });
                }
            }
        }

        outcome
    }
}
