use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::models::ClassificationTerm;

/// Guitar term categories, used to organise the terms file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TermCategory {
    Instruments,
    Gear,
    Techniques,
    Genres,
    General,
}

impl TermCategory {
    pub fn from_header(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "instruments" => TermCategory::Instruments,
            "gear" => TermCategory::Gear,
            "techniques" => TermCategory::Techniques,
            "genres" => TermCategory::Genres,
            _ => TermCategory::General,
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            TermCategory::Instruments => "instruments",
            TermCategory::Gear => "gear",
            TermCategory::Techniques => "techniques",
            TermCategory::Genres => "genres",
            TermCategory::General => "general",
        }
    }
}

/// Guitar vocabulary used to classify channels
#[derive(Debug, Clone, Default)]
pub struct GuitarTermDictionary {
    /// Terms organized by category, always lower-case
    terms: HashMap<TermCategory, Vec<String>>,
}

impl GuitarTermDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dictionary seeded with the built-in vocabulary
    pub fn with_default_terms() -> Self {
        let mut dictionary = Self::new();
        dictionary.load_default_terms();
        dictionary
    }

    /// Build a dictionary from terms file content
    pub fn parse(content: &str) -> Self {
        let mut dictionary = Self::new();
        dictionary.parse_terms_file(content);
        dictionary
    }

    /// Load dictionary from a terms file.
    ///
    /// A missing file yields an empty dictionary.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !tokio::fs::try_exists(path).await? {
            info!("📚 No guitar terms file at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let dictionary = Self::parse(&content);
        info!(
            "📚 Loaded {} guitar terms from: {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// Write the dictionary back in terms file format
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        tokio::fs::write(path.as_ref(), self.to_terms_file()).await?;
        info!("💾 Saved guitar terms to: {}", path.as_ref().display());
        Ok(())
    }

    /// Get terms for a specific category
    pub fn get_terms(&self, category: &TermCategory) -> Vec<String> {
        self.terms.get(category).cloned().unwrap_or_default()
    }

    /// All terms as classification terms, duplicates removed
    pub fn classification_terms(&self) -> Vec<ClassificationTerm> {
        let mut seen = std::collections::HashSet::new();
        self.terms
            .values()
            .flatten()
            .filter(|term| seen.insert(term.as_str()))
            .map(|term| ClassificationTerm::new(term))
            .collect()
    }

    /// Add a term to a category. Returns false when it was already present.
    pub fn add_term(&mut self, category: TermCategory, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() || self.contains_term(&term) {
            return false;
        }
        self.terms.entry(category).or_default().push(term);
        true
    }

    /// Remove a term from whichever category holds it
    pub fn remove_term(&mut self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        let mut removed = false;
        for terms in self.terms.values_mut() {
            let before = terms.len();
            terms.retain(|t| *t != term);
            removed |= terms.len() != before;
        }
        removed
    }

    /// Check if a term exists in the dictionary
    pub fn contains_term(&self, term: &str) -> bool {
        let term_lower = term.trim().to_lowercase();
        self.terms.values().flatten().any(|t| *t == term_lower)
    }

    pub fn len(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load_default_terms(&mut self) {
        let instruments = [
            "guitar", "guitarist", "bass", "ukulele", "banjo", "mandolin",
            "stratocaster", "telecaster", "les paul", "gitarre", "guitarra",
        ];

        let gear = [
            "fender", "gibson", "ibanez", "pedalboard", "effects pedal",
            "fuzz", "overdrive", "tube amp", "humbucker", "pickups", "luthier",
        ];

        let techniques = [
            "riff", "chord", "fingerstyle", "fingerpicking", "shred", "tabs",
            "tablature", "solo lesson", "strumming", "slide guitar", "tapping",
        ];

        let genres = ["blues", "metal", "flamenco", "bluegrass", "shoegaze"];

        for (category, terms) in [
            (TermCategory::Instruments, &instruments[..]),
            (TermCategory::Gear, &gear[..]),
            (TermCategory::Techniques, &techniques[..]),
            (TermCategory::Genres, &genres[..]),
        ] {
            for term in terms {
                self.add_term(category.clone(), term);
            }
        }
    }

    /// Parse terms from a terms file
    fn parse_terms_file(&mut self, content: &str) {
        let mut current_category = TermCategory::General;

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_category = TermCategory::from_header(&line[1..line.len() - 1]);
                continue;
            }

            self.add_term(current_category.clone(), line);
        }
    }

    fn to_terms_file(&self) -> String {
        let mut out = String::from("# Guitar terms, one per line\n");
        for category in [
            TermCategory::General,
            TermCategory::Instruments,
            TermCategory::Gear,
            TermCategory::Techniques,
            TermCategory::Genres,
        ] {
            let terms = self.get_terms(&category);
            if terms.is_empty() {
                continue;
            }
            out.push_str(&format!("\n[{}]\n", category.header()));
            for term in terms {
                out.push_str(&term);
                out.push('\n');
            }
        }
        out
    }

    /// Get statistics about the dictionary
    pub fn get_stats(&self) -> TermDictionaryStats {
        let category_counts = self
            .terms
            .iter()
            .map(|(k, v)| (k.clone(), v.len()))
            .collect();

        TermDictionaryStats {
            total_terms: self.len(),
            category_counts,
        }
    }
}

/// Statistics about the term dictionary
#[derive(Debug, Clone)]
pub struct TermDictionaryStats {
    pub total_terms: usize,
    pub category_counts: HashMap<TermCategory, usize>,
}

impl TermDictionaryStats {
    pub fn summary(&self) -> String {
        format!(
            "Guitar Term Dictionary Stats:\n\
            - Total terms: {}\n\
            - Categories: {:?}",
            self.total_terms, self.category_counts
        )
    }
}
