//! Identifier helpers shared by the compilers.

use std::collections::HashSet;

/// Naive English singular of a collection name (`users` → `user`).
///
/// Only the common plural endings are handled. Words ending in `ss`, `us`
/// or `is` are left alone.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }

    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if lower.len() > suffix.len() && lower.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }

    if lower.len() > 1 && lower.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

/// Split on anything that is not alphanumeric
pub fn split_words(name: &str) -> Vec<&str> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Singular PascalCase model name: `order_items` → `OrderItem`.
///
/// Returns an empty string when `name` has no alphanumeric content; a
/// leading digit is prefixed with `Model` so the result is a valid
/// identifier.
pub fn model_name(name: &str) -> String {
    let words = split_words(name);
    let Some((last, init)) = words.split_last() else {
        return String::new();
    };

    let mut out: String = init.iter().map(|w| capitalize(w)).collect();
    out.push_str(&capitalize(&singularize(last)));

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "Model");
    }
    out
}

/// Whether `name` can be written bare as a JS object key or binding
pub fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Hands out names, suffixing repeats deterministically (`a`, `a2`, `a3`)
#[derive(Debug, Default)]
pub struct UniqueNames {
    taken: HashSet<String>,
    separator: &'static str,
}

impl UniqueNames {
    pub fn new(separator: &'static str) -> Self {
        Self {
            taken: HashSet::new(),
            separator,
        }
    }

    /// Mark `name` as taken without handing it out
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    pub fn claim(&mut self, base: &str) -> String {
        self.claim_with(base, &[])
    }

    /// Claim a name together with derived bindings (`name + suffix`).
    ///
    /// A candidate is accepted only when it and every derived name are
    /// free; all of them are then taken.
    pub fn claim_with(&mut self, base: &str, suffixes: &[&str]) -> String {
        let mut n = 1;
        loop {
            let candidate = if n == 1 {
                base.to_string()
            } else {
                format!("{}{}{}", base, self.separator, n)
            };

            let derived: Vec<String> = suffixes.iter().map(|s| format!("{}{}", candidate, s)).collect();
            let free = !self.taken.contains(&candidate) && derived.iter().all(|d| !self.taken.contains(d));

            if free {
                self.taken.extend(derived);
                self.taken.insert(candidate.clone());
                return candidate;
            }
            n += 1;
        }
    }
}
