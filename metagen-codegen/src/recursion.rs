//! Boxing of recursive declarations.
//!
//! A Rust type that contains itself by value has infinite size. Fields and
//! variants whose type reaches back to the enclosing declaration through a
//! chain of by-value containment are wrapped in `Box`. `Vec` and map values
//! already live on the heap and break such chains.

use crate::decl::{Decl, Primitive, TargetType, TypeSpec};
use std::collections::{HashMap, HashSet, VecDeque};

/// Wraps recursive by-value references in `Box`.
///
/// Returns the number of type positions that were boxed.
pub fn box_recursive_fields(decls: &mut [Decl]) -> usize {
    let graph = containment_graph(decls);
    let mut reverse: HashMap<&str, Vec<&str>> = HashMap::new();
    for (from, targets) in &graph {
        for to in targets {
            reverse.entry(to.as_str()).or_default().push(from.as_str());
        }
    }

    let reaching: HashMap<String, HashSet<String>> = graph
        .keys()
        .map(|owner| (owner.clone(), reaches(owner, &reverse)))
        .collect();

    let mut total = 0;
    for decl in decls.iter_mut() {
        let Decl::Type(decl) = decl else { continue };
        let Some(cycle) = reaching.get(&decl.ident).filter(|set| !set.is_empty()) else {
            continue;
        };

        let boxed: usize = match &mut decl.spec {
            TypeSpec::Record { bases, fields } => bases
                .iter_mut()
                .map(|b| &mut b.ty)
                .chain(fields.iter_mut().map(|f| &mut f.ty))
                .map(|ty| box_reaching(ty, cycle))
                .sum(),
            TypeSpec::Union { variants } => variants
                .iter_mut()
                .filter_map(|v| v.ty.as_mut())
                .map(|ty| box_reaching(ty, cycle))
                .sum(),
            TypeSpec::Alias(_) | TypeSpec::Newtype(_) => 0,
        };

        if boxed > 0 {
            tracing::debug!(declaration = %decl.ident, boxed, "boxed recursive references");
        }
        total += boxed;
    }
    total
}

/// By-value edges from each type declaration to the symbols it contains.
fn containment_graph(decls: &[Decl]) -> HashMap<String, Vec<String>> {
    decls
        .iter()
        .filter_map(|decl| match decl {
            Decl::Type(t) => Some(t),
            Decl::Consts(_) => None,
        })
        .map(|decl| {
            let mut targets = Vec::new();
            match &decl.spec {
                TypeSpec::Record { bases, fields } => {
                    let members = bases.iter().map(|b| &b.ty);
                    for ty in members.chain(fields.iter().map(|f| &f.ty)) {
                        by_value_symbols(ty, &mut targets);
                    }
                }
                TypeSpec::Union { variants } => {
                    for ty in variants.iter().filter_map(|v| v.ty.as_ref()) {
                        by_value_symbols(ty, &mut targets);
                    }
                }
                TypeSpec::Alias(ty) => by_value_symbols(ty, &mut targets),
                TypeSpec::Newtype(_) => {}
            }
            (decl.ident.clone(), targets)
        })
        .collect()
}

fn by_value_symbols(ty: &TargetType, out: &mut Vec<String>) {
    match ty {
        TargetType::Symbol(name) => out.push(name.clone()),
        TargetType::Option(inner) => by_value_symbols(inner, out),
        TargetType::Tuple(items) => items.iter().for_each(|item| by_value_symbols(item, out)),
        TargetType::Vec(_)
        | TargetType::Map(..)
        | TargetType::Boxed(_)
        | TargetType::Primitive(_)
        | TargetType::Constrained { .. } => {}
    }
}

/// Every declaration with a by-value path to `owner`, `owner` included when
/// it is part of a cycle.
fn reaches(owner: &str, reverse: &HashMap<&str, Vec<&str>>) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([owner]);

    while let Some(node) = queue.pop_front() {
        for &from in reverse.get(node).into_iter().flatten() {
            if seen.insert(from.to_string()) {
                queue.push_back(from);
            }
        }
    }
    seen
}

fn box_reaching(ty: &mut TargetType, reaching: &HashSet<String>) -> usize {
    if matches!(ty, TargetType::Symbol(name) if reaching.contains(name.as_str())) {
        let inner = std::mem::replace(ty, TargetType::Primitive(Primitive::Unit));
        *ty = TargetType::Boxed(Box::new(inner));
        return 1;
    }
    match ty {
        TargetType::Option(inner) => box_reaching(inner, reaching),
        TargetType::Tuple(items) => items
            .iter_mut()
            .map(|item| box_reaching(item, reaching))
            .sum(),
        _ => 0,
    }
}
