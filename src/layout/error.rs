use super::CellId;

/// Structural violations that stop a page from being laid out.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("nesting depth {depth} at `{name}` exceeds the limit of {limit}")]
    DepthExceeded {
        depth: usize,
        limit: usize,
        name: String,
    },
    #[error("cell `{name}` references parent {parent} which has not been placed")]
    UnknownParent { parent: CellId, name: String },
}
