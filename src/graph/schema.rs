//! Conventional fact names, node kinds and edge kinds

/// Fact naming the kind of a node ("file", "anchor", "record", ...)
pub const NODE_KIND_FACT: &str = "/kythe/node/kind";
/// Fact holding the raw text of a file node
pub const FILE_TEXT_FACT: &str = "/kythe/text";
/// Fact holding the character encoding of a file node's text
pub const FILE_ENCODING_FACT: &str = "/kythe/text/encoding";

pub const FILE_KIND: &str = "file";
pub const ANCHOR_KIND: &str = "anchor";

/// Anchor -> file containment
pub const CHILD_OF_EDGE: &str = "/kythe/edge/childof";
/// Anchor -> referenced entity; sub-kinds extend it with a `/` suffix
pub const REF_EDGE: &str = "/kythe/edge/ref";

/// Fact name of an edge entry that carries no annotation
pub const EDGE_ANNOTATION_MARKER: &str = "/";

const REVERSE_PREFIX: char = '%';

/// Returns the kind labelling the reverse of an edge of `kind`.
///
/// Applying it twice yields `kind` again.
pub fn mirror_edge(kind: &str) -> String {
    match kind.strip_prefix(REVERSE_PREFIX) {
        Some(forward) => forward.to_string(),
        None => format!("{REVERSE_PREFIX}{kind}"),
    }
}

/// Whether `kind` labels a mirrored (reverse) edge
pub fn is_reverse_edge(kind: &str) -> bool {
    kind.starts_with(REVERSE_PREFIX)
}

/// Whether `kind` is [`REF_EDGE`] or one of its sub-kinds
pub fn is_ref_edge(kind: &str) -> bool {
    match kind.strip_prefix(REF_EDGE) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
