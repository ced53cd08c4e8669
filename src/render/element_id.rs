use indexmap::{IndexMap, IndexSet};

use crate::core::tokenize;

/// Builds an element identifier `{prefix}_{token}..._{uid}`.
///
/// Tokens are passed through [`tokenize`] so ids stay stable for any label.
#[must_use]
pub fn element_id(prefix: &str, tokens: &[&str], uid: &str) -> String {
    let mut id = String::from(prefix);
    for token in tokens {
        id.push('_');
        id.push_str(&tokenize(token));
    }
    id.push('_');
    id.push_str(uid);
    id
}

/// Identifier of a child element nested under `parent`.
#[must_use]
pub fn child_id(parent: &str, child: &str) -> String {
    format!("{parent}/{}", tokenize(child))
}

/// `true` when `id` is `target` itself or nested under it.
#[must_use]
pub fn is_within(id: &str, target: &str) -> bool {
    id.strip_prefix(target)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Hands out one id token per distinct label.
///
/// Labels that [`tokenize`] to the same text (`"Yes"` and `"yes"`) would share
/// an element id; later ones get a `-{n}` suffix so every label keeps its own
/// elements. Tokens depend only on the order labels are first seen.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    by_label: IndexMap<String, String>,
    taken: IndexSet<String>,
}

impl TokenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `labels` registered in order.
    #[must_use]
    pub fn seeded<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for label in labels {
            registry.token(label.as_ref());
        }
        registry
    }

    /// Token for `label`, registering it on first use.
    pub fn token(&mut self, label: &str) -> String {
        if let Some(token) = self.by_label.get(label) {
            return token.clone();
        }
        let base = tokenize(label);
        let mut token = base.clone();
        let mut suffix = 2usize;
        while self.taken.contains(&token) {
            token = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.taken.insert(token.clone());
        self.by_label.insert(label.to_owned(), token.clone());
        token
    }
}
