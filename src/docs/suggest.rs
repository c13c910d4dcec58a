//! Partial-name search and "did you mean" suggestions

use super::find::Symbol;
use super::types::Type;

/// A symbol together with the full name of the type declaring it
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub owner: &'a str,
    pub symbol: Symbol<'a>,
}

impl Entry<'_> {
    /// Display path such as `Array#push`, `Array.new` or `Foo::Bar`
    pub fn path(&self) -> String {
        match self.symbol {
            Symbol::Type(t) => t.full_name.clone(),
            Symbol::Constant(c) => format!("{}::{}", self.owner, c.name),
            Symbol::InstanceMethod(m) => format!("{}#{}", self.owner, m.name),
            Symbol::Constructor(m) | Symbol::ClassMethod(m) => {
                format!("{}.{}", self.owner, m.name)
            }
            Symbol::Macro(m) => format!("{}.{} (macro)", self.owner, m.name),
        }
    }
}

/// Every type and member in the tree, in level order
pub fn entries(root: &Type) -> Vec<Entry<'_>> {
    let mut out = Vec::new();
    let mut queue = vec![root];

    while !queue.is_empty() {
        let mut next = Vec::new();
        for t in queue {
            let owner = t.full_name.as_str();
            out.push(Entry {
                owner,
                symbol: Symbol::Type(t),
            });
            out.extend(t.constants.iter().map(|c| Entry {
                owner,
                symbol: Symbol::Constant(c),
            }));
            out.extend(t.constructors.iter().map(|m| Entry {
                owner,
                symbol: Symbol::Constructor(m),
            }));
            out.extend(t.class_methods.iter().map(|m| Entry {
                owner,
                symbol: Symbol::ClassMethod(m),
            }));
            out.extend(t.instance_methods.iter().map(|m| Entry {
                owner,
                symbol: Symbol::InstanceMethod(m),
            }));
            out.extend(t.macros.iter().map(|m| Entry {
                owner,
                symbol: Symbol::Macro(m),
            }));
            next.extend(t.types.iter());
        }
        queue = next;
    }

    out
}

/// Case-insensitive substring search over names
pub fn search<'a>(root: &'a Type, query: &str) -> Vec<Entry<'a>> {
    let query_lower = query.to_lowercase();
    entries(root)
        .into_iter()
        .filter(|e| e.symbol.name().to_lowercase().contains(&query_lower))
        .collect()
}

/// Names close to `symbol`: case-insensitive matches first, then anything
/// within an edit distance of 2, closest first. At most 5 names.
pub fn suggestions(root: &Type, symbol: &str) -> Vec<String> {
    let symbol_lower = symbol.to_lowercase();
    let mut scored: Vec<(usize, &str)> = Vec::new();

    for entry in entries(root) {
        let name = entry.symbol.name();
        if name.is_empty() || name == symbol || scored.iter().any(|(_, n)| *n == name) {
            continue;
        }

        let name_lower = name.to_lowercase();
        let distance = if name_lower == symbol_lower {
            0
        } else {
            edit_distance(&symbol_lower, &name_lower)
        };
        if distance <= 2 {
            scored.push((distance, name));
        }
    }

    // stable: ties keep level order
    scored.sort_by_key(|(dist, _)| *dist);
    scored
        .into_iter()
        .take(5)
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Levenshtein distance between two strings
fn edit_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();
    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] {
                0
            } else {
                1
            };
            matrix[i][j] = std::cmp::min(
                std::cmp::min(matrix[i - 1][j] + 1, matrix[i][j - 1] + 1),
                matrix[i - 1][j - 1] + cost,
            );
        }
    }

    matrix[len1][len2]
}
