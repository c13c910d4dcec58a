//! Level-order symbol lookup over a documentation tree

use super::types::{Constant, Method, Named, Type};

/// A match returned by [`find_symbol`], borrowed from the tree
#[derive(Debug, Clone, Copy)]
pub enum Symbol<'a> {
    Type(&'a Type),
    Constant(&'a Constant),
    Constructor(&'a Method),
    ClassMethod(&'a Method),
    InstanceMethod(&'a Method),
    Macro(&'a Method),
}

impl<'a> Symbol<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Symbol::Type(t) => &t.name,
            Symbol::Constant(c) => &c.name,
            Symbol::Constructor(m)
            | Symbol::ClassMethod(m)
            | Symbol::InstanceMethod(m)
            | Symbol::Macro(m) => &m.name,
        }
    }

    /// Short label for the kind of match
    pub fn kind(&self) -> &'a str {
        match self {
            Symbol::Type(t) => &t.kind,
            Symbol::Constant(_) => "constant",
            Symbol::Constructor(_) => "constructor",
            Symbol::ClassMethod(_) => "class method",
            Symbol::InstanceMethod(_) => "instance method",
            Symbol::Macro(_) => "macro",
        }
    }
}

/// Search `root` and every nested type for `symbol`.
///
/// The root is searched together with its direct children, then each deeper
/// level in turn, so a shallower match always wins. Within a level, types are
/// visited in declaration order and each one is checked in this order: its own
/// name and full name, constants, constructors, class methods, instance
/// methods, macros.
pub fn find_symbol<'a>(root: &'a Type, symbol: &str) -> Option<Symbol<'a>> {
    let mut level: Vec<&'a Type> = Vec::with_capacity(root.types.len() + 1);
    level.push(root);
    level.extend(root.types.iter());

    // root's children are already part of the first level
    let mut skip_children_of_first = true;

    while !level.is_empty() {
        let mut next = Vec::new();

        for &t in &level {
            if let Some(found) = match_type(t, symbol) {
                return Some(found);
            }

            if skip_children_of_first {
                skip_children_of_first = false;
                continue;
            }
            next.extend(t.types.iter());
        }

        level = next;
    }

    None
}

fn match_type<'a>(t: &'a Type, symbol: &str) -> Option<Symbol<'a>> {
    if t.matches(symbol) {
        return Some(Symbol::Type(t));
    }

    if let Some(c) = t.constants.iter().find(|c| c.matches(symbol)) {
        return Some(Symbol::Constant(c));
    }

    let members: [(&'a [Method], fn(&'a Method) -> Symbol<'a>); 4] = [
        (t.constructors.as_slice(), Symbol::Constructor),
        (t.class_methods.as_slice(), Symbol::ClassMethod),
        (t.instance_methods.as_slice(), Symbol::InstanceMethod),
        (t.macros.as_slice(), Symbol::Macro),
    ];

    members
        .into_iter()
        .find_map(|(list, wrap)| list.iter().find(|m| m.matches(symbol)).map(wrap))
}
