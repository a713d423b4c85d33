//! Unit tests for merge lattice construction

use coiter::{Access, Expr, Format, FormatMap, IndexStmt, MergeLattice, SetExpr};

fn formats(dense: &[&str]) -> FormatMap {
    ["A", "B", "C", "D", "E", "F", "G", "H"]
        .into_iter()
        .map(|n| {
            let format = if dense.contains(&n) {
                Format::Dense
            } else {
                Format::Compressed
            };
            (n, format)
        })
        .collect()
}

fn build(rhs: Expr, formats: &FormatMap) -> MergeLattice {
    let sexpr = SetExpr::of_expr(&rhs);
    MergeLattice::build(&sexpr, &IndexStmt::assign(Access::new("C"), rhs), formats).unwrap()
}

fn names(levels: &[coiter::ArrayLevel]) -> Vec<&str> {
    levels.iter().map(|l| l.name.as_str()).collect()
}

fn read(name: &str) -> Expr {
    Expr::read(name)
}

#[test]
fn test_sum_with_product() {
    let lattice = build(read("A") + read("A") * read("B"), &formats(&[]));
    assert_eq!(lattice.len(), 2);

    let root = lattice.root();
    assert_eq!(names(&root.iterators), vec!["A", "B"]);
    assert!(root.locators.is_empty());

    // Exhausting A leaves nothing; exhausting B leaves the A term.
    let a = lattice.id_of(&SetExpr::dim("A")).expect("A point");
    assert_eq!(root.children, vec![a]);
    assert_eq!(
        lattice.point(a).body,
        IndexStmt::assign(Access::new("C"), read("A"))
    );
}

#[test]
fn test_dense_factor_in_sparse_sum() {
    let lattice = build(read("A") * read("D") + read("B"), &formats(&["D"]));
    assert_eq!(lattice.len(), 3);

    let root = lattice.root();
    assert_eq!(names(&root.iterators), vec!["A", "B"]);
    assert_eq!(names(&root.locators), vec!["D"]);

    let product = SetExpr::dim("A") & SetExpr::dim("D");
    let point = lattice.get(&product).expect("A ∩ D point");
    assert_eq!(names(&point.iterators), vec!["A"]);
    assert_eq!(names(&point.locators), vec!["D"]);
    assert_eq!(
        point.body,
        IndexStmt::assign(Access::new("C"), read("A") * read("D"))
    );

    let b = lattice.get(&SetExpr::dim("B")).expect("B point");
    assert_eq!(b.body, IndexStmt::assign(Access::new("C"), read("B")));
}

#[test]
fn test_dense_union_promotes_first_locator() {
    let lattice = build(read("D") + read("E"), &formats(&["D", "E"]));
    let root = lattice.root();
    assert_eq!(names(&root.iterators), vec!["D"]);
    assert_eq!(names(&root.locators), vec!["E"]);
    // Exhausting a dense driver leaves the whole range visited.
    assert!(root.children.is_empty());
    assert_eq!(lattice.len(), 1);
}

#[test]
fn test_shared_point_has_several_parents() {
    let lattice = build(read("A") + read("B") + read("D"), &formats(&[]));
    let d = lattice.id_of(&SetExpr::dim("D")).expect("D point");
    let parents = lattice
        .iter()
        .filter(|(_, p)| p.children.contains(&d))
        .count();
    assert_eq!(parents, 2);
}

#[test]
fn test_points_follow_their_children() {
    let lattice = build(read("A") + read("B") * read("D") + read("E"), &formats(&["E"]));
    for (id, point) in lattice.iter() {
        assert_eq!(lattice.id_of(&point.sexpr), Some(id));
        for child in &point.children {
            assert!(child.index() < id.index());
        }
    }
    assert_eq!(lattice.root_id().index(), lattice.len() - 1);
}

#[test]
fn test_sub_points_of_inner_point() {
    let lattice = build(read("A") + read("B") + read("D"), &formats(&[]));
    let ab = lattice
        .id_of(&(SetExpr::dim("A") | SetExpr::dim("B")))
        .expect("A ∪ B point");
    let subs: Vec<&SetExpr> = lattice
        .sub_points(ab)
        .into_iter()
        .map(|id| &lattice.point(id).sexpr)
        .collect();
    assert_eq!(subs, vec![&SetExpr::dim("A"), &SetExpr::dim("B")]);
}

#[test]
fn test_child_can_gain_iterators() {
    // Exhausting A collapses both dense sums, so D and F stop being located
    // and start driving the loop next to B and G.
    let rhs = (read("D") + read("A") * read("E") + read("B"))
        + (read("F") + read("A") * read("H") + read("G"));
    let lattice = build(rhs, &formats(&["D", "E", "F", "H"]));

    let root = lattice.root();
    assert_eq!(names(&root.iterators), vec!["A", "B", "G"]);
    assert_eq!(names(&root.locators), vec!["D", "E", "F", "H"]);

    let without_a = (SetExpr::dim("D") | SetExpr::dim("B")) | (SetExpr::dim("F") | SetExpr::dim("G"));
    let child = lattice.get(&without_a).expect("point without A");
    assert_eq!(names(&child.iterators), vec!["D", "B", "F", "G"]);
    assert!(child.locators.is_empty());
}
