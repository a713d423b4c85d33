//! Merge lattices.
//!
//! A merge lattice enumerates every combination of iterators that can be
//! live at the same coordinate. Its root is the full iteration space of an
//! assignment; each edge removes one iterator and leads to the space that is
//! left once that iterator is exhausted. Each point carries the assignment
//! specialized to the arrays still present there.
//!
//! Points are owned by one map keyed by their set expression. Two parents
//! reaching the same space share the same point, so the structure is a DAG.
//! Removing an iterator always removes at least one leaf, so it has no cycles.

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use crate::error::{LowerError, LowerResult};
use crate::expr::IndexStmt;
use crate::format::FormatMap;
use crate::lir::ArrayLevel;
use crate::set_expr::{project_stmt, simplify, split_iterators_locators, SetExpr, Simplified, Split};

/// Index of a point in its lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(usize);

impl PointId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One vertex of a merge lattice.
#[derive(Clone, Debug)]
pub struct MergePoint {
    /// Space this point covers; also its key in the lattice
    pub sexpr: SetExpr,
    /// Levels that drive the loop for this point (never empty)
    pub iterators: Vec<ArrayLevel>,
    /// Levels probed by coordinate
    pub locators: Vec<ArrayLevel>,
    /// Points reached by removing one of `iterators`
    pub children: Vec<PointId>,
    /// Assignment valid when exactly these levels are present
    pub body: IndexStmt,
}

impl MergePoint {
    /// Iterators followed by locators.
    pub fn levels(&self) -> impl Iterator<Item = &ArrayLevel> {
        self.iterators.iter().chain(&self.locators)
    }
}

/// The lattice of one assignment.
#[derive(Clone, Debug)]
pub struct MergeLattice {
    points: IndexMap<SetExpr, MergePoint>,
    root: PointId,
}

impl MergeLattice {
    /// Build the lattice for `body` iterated over `sexpr`.
    #[instrument(level = "debug", skip_all, fields(space = %sexpr))]
    pub fn build(sexpr: &SetExpr, body: &IndexStmt, formats: &FormatMap) -> LowerResult<Self> {
        let mut points = IndexMap::new();
        let root = build_point(&mut points, sexpr, body, formats)?;
        debug!(points = points.len(), "built merge lattice");
        Ok(Self { points, root })
    }

    pub fn root_id(&self) -> PointId {
        self.root
    }

    pub fn root(&self) -> &MergePoint {
        self.point(self.root)
    }

    pub fn point(&self, id: PointId) -> &MergePoint {
        &self.points[id.0]
    }

    pub fn get(&self, sexpr: &SetExpr) -> Option<&MergePoint> {
        self.points.get(sexpr)
    }

    pub fn id_of(&self, sexpr: &SetExpr) -> Option<PointId> {
        self.points.get_index_of(sexpr).map(PointId)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in construction order: every point after all of its children.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &MergePoint)> {
        self.points.values().enumerate().map(|(i, p)| (PointId(i), p))
    }

    /// Every point dominated by `id`, excluding `id` itself.
    ///
    /// Ordered parents before descendants, so the most constrained case (most
    /// iterators live) comes first. Shared descendants appear once.
    pub fn sub_points(&self, id: PointId) -> Vec<PointId> {
        let mut visited = vec![false; self.points.len()];
        let mut order = Vec::new();
        self.post_order(id, &mut visited, &mut order);
        order.reverse();
        if order.first() == Some(&id) {
            order.remove(0);
        }
        order
    }

    fn post_order(&self, id: PointId, visited: &mut [bool], out: &mut Vec<PointId>) {
        if visited[id.0] {
            return;
        }
        visited[id.0] = true;
        for &child in &self.point(id).children {
            self.post_order(child, visited, out);
        }
        out.push(id);
    }
}

fn build_point(
    points: &mut IndexMap<SetExpr, MergePoint>,
    sexpr: &SetExpr,
    body: &IndexStmt,
    formats: &FormatMap,
) -> LowerResult<PointId> {
    if let Some(index) = points.get_index_of(sexpr) {
        trace!(space = %sexpr, "reusing merge point");
        return Ok(PointId(index));
    }

    let Split {
        mut iterators,
        mut locators,
    } = split_iterators_locators(sexpr, formats)?;
    // A fully dense space still needs something to drive the loop.
    if iterators.is_empty() {
        if locators.is_empty() {
            return Err(LowerError::EmptySpace);
        }
        iterators.push(locators.remove(0));
    }

    let mut children = Vec::new();
    for iterator in &iterators {
        let child = match simplify(sexpr, iterator) {
            Simplified::Node(child) => child,
            Simplified::Empty | Simplified::Universal => continue,
        };
        let child_body = project_stmt(body, &child)?;
        let id = build_point(points, &child, &child_body, formats)?;
        if !children.contains(&id) {
            children.push(id);
        }
    }

    debug!(
        space = %sexpr,
        iterators = ?iterators.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
        locators = ?locators.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
        children = children.len(),
        "new merge point"
    );

    let point = MergePoint {
        sexpr: sexpr.clone(),
        iterators,
        locators,
        children,
        body: body.clone(),
    };
    let (index, _) = points.insert_full(sexpr.clone(), point);
    Ok(PointId(index))
}
