//! Building diagrams from explicit assignments.

use log::debug;

use crate::error::CountError;
use crate::view::DiagramBuilder;

/// Builds the cube satisfied by exactly one assignment: `x_i` if `assignment[i]`, `!x_i` otherwise.
///
/// Literals are conjoined in increasing index order. The empty assignment gives the constant one.
///
/// ```
/// use bdd_count::bdd::Bdd;
/// use bdd_count::cube::build_cube;
///
/// let bdd = Bdd::default();
/// let cube = build_cube(&bdd, &[true, false, true]);
/// assert!(bdd.eval(cube, &[true, false, true]));
/// assert!(!bdd.eval(cube, &[true, true, true]));
/// ```
pub fn build_cube<B: DiagramBuilder>(builder: &B, assignment: &[bool]) -> B::Node {
    let mut f = builder.one();
    for (v, &value) in assignment.iter().enumerate() {
        let var = builder.mk_var(v as u32);
        let literal = if value { var } else { builder.apply_not(var) };
        f = builder.apply_and(literal, f);
    }
    debug!("build_cube({:?}) -> {}", assignment, f);
    f
}

/// Builds the disjunction of the cubes of `assignments`, i.e. the function whose models are
/// exactly the given assignments.
///
/// All assignments must have the same length. No assignments give the constant zero.
pub fn build_models<B, A>(builder: &B, assignments: &[A]) -> Result<B::Node, CountError>
where
    B: DiagramBuilder,
    A: AsRef<[bool]>,
{
    let mut f = builder.zero();
    let mut width = None;
    for (i, assignment) in assignments.iter().enumerate() {
        let assignment = assignment.as_ref();
        match width {
            None => width = Some(assignment.len()),
            Some(w) if w != assignment.len() => {
                return Err(CountError::InvalidAssignment(format!(
                    "assignment {} has {} values, expected {}",
                    i,
                    assignment.len(),
                    w
                )));
            }
            Some(_) => {}
        }
        let cube = build_cube(builder, assignment);
        f = builder.apply_or(f, cube);
    }
    Ok(f)
}
