use super::{Cell, CellId, CellKind, LayoutError, Point, Rect, Size};

/// draw.io reserves the first two cells of every page: the root and its default layer.
pub const ROOT_ID: CellId = CellId(0);
pub const LAYER_ID: CellId = CellId(1);
const FIRST_CELL_ID: u32 = 2;

/// Per-page arena of placed cells, indexed by id.
///
/// A parent is always inserted before its children, so a child's absolute bounds
/// come from one indexed lookup of the parent's cached origin. Ids are dense and
/// strictly increasing; edge ids are drawn from the same counter without a slot.
#[derive(Debug, Clone)]
pub struct Registry {
    prefix: String,
    next_id: u32,
    cells: Vec<Cell>,
    slots: Vec<Option<usize>>,
}

impl Registry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next_id: FIRST_CELL_ID,
            cells: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn issue_id(&mut self) -> CellId {
        let id = CellId(self.next_id);
        self.next_id += 1;
        self.slots.push(None);
        id
    }

    pub fn insert(
        &mut self,
        parent: Option<CellId>,
        relative: Point,
        size: Size,
        kind: CellKind,
        name: Option<String>,
        label: String,
    ) -> Result<CellId, LayoutError> {
        let origin = match parent {
            Some(parent_id) => self
                .get(parent_id)
                .map(|cell| cell.bounds.origin())
                .ok_or_else(|| LayoutError::UnknownParent {
                    parent: parent_id,
                    name: label.clone(),
                })?,
            None => Point::default(),
        };
        let id = self.issue_id();
        if let Some(slot) = self.slot_index(id) {
            self.slots[slot] = Some(self.cells.len());
        }
        self.cells.push(Cell {
            id,
            parent,
            kind,
            name,
            label,
            relative,
            bounds: Rect::new(origin.offset(relative), size),
        });
        Ok(id)
    }

    fn slot_index(&self, id: CellId) -> Option<usize> {
        let index = id.0.checked_sub(FIRST_CELL_ID)? as usize;
        (index < self.slots.len()).then_some(index)
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        let slot = self.slot_index(id)?;
        self.slots[slot].map(|index| &self.cells[index])
    }

    pub fn bounds(&self, id: CellId) -> Option<Rect> {
        self.get(id).map(|cell| cell.bounds)
    }

    /// Cells in insertion order; parents precede children.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: CellId) -> Vec<CellId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).and_then(|cell| cell.parent);
        while let Some(parent) = current {
            if chain.len() > self.cells.len() {
                break;
            }
            chain.push(parent);
            current = self.get(parent).and_then(|cell| cell.parent);
        }
        chain
    }

    pub fn qualified_id(&self, id: CellId) -> String {
        format!("{}{}", self.prefix, id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(registry: &mut Registry, parent: Option<CellId>, x: f32, y: f32) -> CellId {
        registry
            .insert(
                parent,
                Point::new(x, y),
                Size::new(100.0, 100.0),
                CellKind::ResourceGroup,
                Some(format!("rg-{x}-{y}")),
                String::new(),
            )
            .unwrap()
    }

    #[test]
    fn child_bounds_add_parent_origin() {
        let mut registry = Registry::new("p1-");
        let outer = container(&mut registry, None, 40.0, 60.0);
        let inner = container(&mut registry, Some(outer), 10.0, 20.0);
        let deepest = container(&mut registry, Some(inner), 5.0, 5.0);
        let bounds = registry.bounds(deepest).unwrap();
        assert_eq!((bounds.x, bounds.y), (55.0, 85.0));
        assert_eq!(registry.get(deepest).unwrap().relative, Point::new(5.0, 5.0));
        assert_eq!(registry.ancestors(deepest), vec![inner, outer]);
    }

    #[test]
    fn ids_are_dense_and_increasing() {
        let mut registry = Registry::new("p1-");
        let a = container(&mut registry, None, 0.0, 0.0);
        let edge = registry.issue_id();
        let b = container(&mut registry, None, 0.0, 0.0);
        assert_eq!((a.0, edge.0, b.0), (2, 3, 4));
        assert!(registry.get(edge).is_none());
        assert_eq!(registry.get(b).unwrap().id, b);
        assert_eq!(registry.qualified_id(b), "p1-4");
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut registry = Registry::new("p1-");
        let err = registry
            .insert(
                Some(CellId(42)),
                Point::default(),
                Size::new(1.0, 1.0),
                CellKind::Subnet,
                None,
                "orphan".to_string(),
            )
            .unwrap_err();
        assert!(matches!(err, LayoutError::UnknownParent { parent: CellId(42), .. }));
        assert!(registry.is_empty());
    }
}
