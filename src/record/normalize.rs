//! Value normalization applied by the loader before records reach the graph
//! builder.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Apostrophe look-alikes folded into `'`
const APOSTROPHE_VARIANTS: [char; 6] = ['\u{2019}', '\u{02BC}', '\u{0060}', '\u{00B4}', '\u{2018}', '\u{201B}'];

/// Split a delimited cell into clean items.
///
/// Items are trimmed, apostrophe variants unified, blanks dropped,
/// duplicates removed case-insensitively (first spelling wins) and the
/// result sorted.
pub fn normalize_list_field(field: &str, delimiter: char) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut items: Vec<String> = field
        .split(delimiter)
        .map(|item| {
            let unified: String = item
                .trim()
                .chars()
                .map(|c| if APOSTROPHE_VARIANTS.contains(&c) { '\'' } else { c })
                .collect();
            unified.trim().to_string()
        })
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect();
    items.sort();
    items
}

/// Split `[coarse, types] granular; details` into its two parts.
///
/// Without a leading bracket group the whole text is granular.
pub fn split_data_modalities(text: &str) -> (String, String) {
    static BRACKETS: OnceLock<Regex> = OnceLock::new();
    let re = BRACKETS.get_or_init(|| Regex::new(r"^\[(.*?)\]\s*(.*)$").expect("static regex"));

    let text = text.trim();
    if text.is_empty() {
        return (String::new(), String::new());
    }

    match re.captures(text) {
        Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
        None => (String::new(), text.to_string()),
    }
}

/// Repair PMC links carrying a doubled `PMCPMC` prefix.
pub fn fix_pmc_link(link: &str) -> String {
    static DOUBLED: OnceLock<Regex> = OnceLock::new();
    let re = DOUBLED.get_or_init(|| Regex::new(r"PMCPMC(\d+)").expect("static regex"));
    re.replace_all(link.trim(), "PMC$1").into_owned()
}

/// Reorder author names to `Last First Middle` and drop repeats. Order of
/// first appearance is kept.
///
/// When comparing, a lone capital initial between two other name parts is
/// ignored, so `Smith John Q Public` repeats `Smith John Public`. An initial
/// at the end of the reordered name still counts: `Nalls Mike A` and
/// `Nalls Mike` are both kept.
pub fn normalize_author_names(authors: &str) -> Vec<String> {
    static MIDDLE_INITIAL: OnceLock<Regex> = OnceLock::new();
    let re = MIDDLE_INITIAL.get_or_init(|| Regex::new(r"\s+[A-Z]\s+").expect("static regex"));

    let mut seen = HashSet::new();
    let mut normalized = Vec::new();
    for author in authors.split(';') {
        let parts: Vec<&str> = author.split_whitespace().collect();
        let Some((last, first_middle)) = parts.split_last() else {
            continue;
        };
        let name = format!("{} {}", last, first_middle.join(" ")).trim().to_string();
        let key = re.replace_all(&name, " ").to_lowercase();
        if seen.insert(key) {
            normalized.push(name);
        }
    }
    normalized
}

/// Words ignored when scoring free-text connection fields
pub fn stopwords() -> &'static HashSet<&'static str> {
    static STOPWORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOPWORDS.get_or_init(|| {
        [
            // articles, prepositions, auxiliaries
            "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
            "from", "as", "is", "was", "are", "were", "be", "been", "being", "have", "has", "had",
            "do", "does", "did", "will", "would", "should", "could", "may", "might", "must", "can",
            // generic research vocabulary
            "data", "analysis", "study", "research", "using", "based", "method", "methods",
            "approach", "approaches", "model", "models", "system", "systems", "tool", "tools",
            "use", "used", "uses", "application", "applications", "code", "software", "program",
            "programs", "package", "packages", "library", "libraries", "framework", "frameworks",
            // numerals and abbreviations
            "i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x", "vs", "etc", "eg", "ie",
        ]
        .into_iter()
        .collect()
    })
}

/// True if `item` should be skipped when stopword filtering is on
pub fn is_stopword(item: &str) -> bool {
    item.chars().count() <= 2 || stopwords().contains(item.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_list_field() {
        let items = normalize_list_field(" Parkinson’s Disease; AD ;ad;; Alzheimer's Disease ", ';');
        assert_eq!(items, vec!["AD", "Alzheimer's Disease", "Parkinson's Disease"]);
        assert!(normalize_list_field("", ';').is_empty());
    }

    #[test]
    fn test_split_data_modalities() {
        assert_eq!(
            split_data_modalities("[clinical, imaging] Clinical assessments; MRI"),
            ("clinical, imaging".to_string(), "Clinical assessments; MRI".to_string())
        );
        assert_eq!(split_data_modalities("MRI; PET"), (String::new(), "MRI; PET".to_string()));
        assert_eq!(split_data_modalities("  "), (String::new(), String::new()));
    }

    #[test]
    fn test_fix_pmc_link() {
        assert_eq!(
            fix_pmc_link("https://www.ncbi.nlm.nih.gov/pmc/articles/PMCPMC10764118/"),
            "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC10764118/"
        );
        assert_eq!(fix_pmc_link("PMC123"), "PMC123");
    }

    #[test]
    fn test_normalize_author_names() {
        let authors = normalize_author_names("Mike Nalls; Jane Doe; Mike A Nalls;  ");
        assert_eq!(authors, vec!["Nalls Mike", "Doe Jane", "Nalls Mike A"]);

        let deduped = normalize_author_names("John Q Smith; John Q Smith");
        assert_eq!(deduped, vec!["Smith John Q"]);

        let interior = normalize_author_names("John Q Public Smith; John Public Smith");
        assert_eq!(interior, vec!["Smith John Q Public"]);
    }

    #[test]
    fn test_stopwords() {
        assert!(is_stopword("Data"));
        assert!(is_stopword("R"));
        assert!(!is_stopword("Python"));
    }
}
