//! Lookup helpers shared by the index and the definitions.

use gojs_model::{Object, ObjectKind, TypeTable};

/// Marker prefixed to a type string for pointer indirection.
pub const POINTER_MARKER: char = '*';

/// Strip leading pointer markers so `*T` and `T` address the same entry.
pub fn trim_indirection(id: &str) -> &str {
    id.trim_start_matches(POINTER_MARKER)
}

/// The pointer-indirected form of a type id.
pub fn pointer_id(id: &str) -> String {
    format!("{POINTER_MARKER}{id}")
}

/// Canonical id of an object that can be a dependency: variables,
/// functions, constants and type names. Everything else has no id.
pub fn dependency_id(obj: &Object, types: &TypeTable) -> Option<String> {
    match obj.kind {
        ObjectKind::Var | ObjectKind::Func | ObjectKind::Const | ObjectKind::TypeName => {
            obj.canonical_id(types)
        }
        ObjectKind::PkgName | ObjectKind::Builtin | ObjectKind::Nil => None,
    }
}

/// Default local name of an unaliased import: its last path segment.
pub fn default_import_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_indirection_strips_every_marker() {
        assert_eq!(trim_indirection("*b Circle"), "b Circle");
        assert_eq!(trim_indirection("**b Circle"), "b Circle");
        assert_eq!(trim_indirection("b Circle"), "b Circle");
    }

    #[test]
    fn test_pointer_id() {
        assert_eq!(pointer_id("b Circle"), "*b Circle");
    }

    #[test]
    fn test_default_import_name() {
        assert_eq!(default_import_name("github.com/acme/shapes"), "shapes");
        assert_eq!(default_import_name("fmt"), "fmt");
    }
}
