//! End-to-end model builds: indexed ranges, batch constraints, and solver
//! handoff.

#![allow(clippy::float_cmp)]

use opal_expr::{sum, ComparisonSense, LinearExpr, VariableId};
use opal_model::{Model, VariableParams};
use opal_solver::ModelSink;

#[derive(Default)]
struct RecordingSink {
    columns: Vec<(f64, f64, f64, bool)>,
    rows: Vec<(ComparisonSense, f64, Vec<u32>, Vec<f64>)>,
    objective: Option<(Vec<u32>, Vec<f64>, f64)>,
}

impl ModelSink for RecordingSink {
    fn append_column(&mut self, obj_coef: f64, lower: f64, upper: f64, integer: bool) {
        self.columns.push((obj_coef, lower, upper, integer));
    }

    fn append_row(&mut self, sense: ComparisonSense, rhs: f64, indices: &[u32], coefs: &[f64]) {
        self.rows
            .push((sense, rhs, indices.to_vec(), coefs.to_vec()));
    }

    fn set_objective(&mut self, indices: &[u32], coefs: &[f64], offset: f64) {
        self.objective = Some((indices.to_vec(), coefs.to_vec(), offset));
    }
}

#[test]
fn duplicate_terms_assemble_to_the_same_row() {
    let mut model = Model::new();
    let vars = model.add_variables(3, VariableParams::default()).unwrap();
    let (x1, x2, x3) = (vars.get(0), vars.get(1), vars.get(2));

    let verbose = model.add_constraint(
        (LinearExpr::term(x1, 3.0) - LinearExpr::var(x1)
            + LinearExpr::term(x2, 3.0)
            + LinearExpr::var(x3))
        .le_scalar(5.0),
    );
    let direct = model.add_constraint(
        (LinearExpr::term(x1, 2.0) + LinearExpr::term(x2, 3.0) + LinearExpr::var(x3))
            .le_scalar(5.0),
    );

    let a = model.row(verbose);
    let b = model.row(direct);
    assert_eq!(a.vars, b.vars);
    assert_eq!(a.coefs, b.coefs);
    assert_eq!(a.rhs, b.rhs);
}

#[test]
fn sudoku_cell_variables_flatten_correctly() {
    let mut model = Model::new();
    // one binary per (row, col, value) with value in 1..=9
    let cells = model
        .add_variables_indexed(
            9 * 9 * 9,
            VariableParams::binary(),
            |&(i, j, v): &(usize, usize, usize)| 81 * i + 9 * j + (v - 1),
        )
        .unwrap();

    assert_eq!(cells.key(&(0, 0, 1)).inner(), 0);
    assert_eq!(cells.key(&(0, 0, 9)).inner(), 8);
    assert_eq!(cells.key(&(8, 8, 9)).inner(), 728);
    assert!(cells.try_key(&(9, 0, 1)).is_err());

    // each cell holds exactly one value
    let range = model.add_constraint_range(81, |cell| {
        let (i, j) = (cell / 9, cell % 9);
        sum((1..=9).map(|v| LinearExpr::var(cells.key(&(i, j, v))))).eq_scalar(1.0)
    });
    assert_eq!(model.num_constraints(), 81);
    let row = model.row(range.get(0));
    assert_eq!(row.vars, (0..9).collect::<Vec<u32>>().as_slice());
    assert_eq!(row.sense, ComparisonSense::Equal);
}

#[test]
fn batch_build_prefers_the_given_rows() {
    let mut model = Model::new();
    let vars = model
        .add_variables_indexed(9, VariableParams::binary(), |&k: &usize| k)
        .unwrap();

    // fixed cells pin their variable, everything else gets the generic row
    let givens = [(2usize, 1.0), (5, 0.0)];
    let pinned = |key: &usize| {
        givens
            .iter()
            .find(|(k, _)| k == key)
            .map(|(k, value)| LinearExpr::var(vars.key(k)).eq_scalar(*value))
    };
    let generic = |key: &usize| Some(LinearExpr::var(vars.key(key)).le_scalar(1.0));

    let built = model.add_constraints(0..9, &[&pinned, &generic]).unwrap();
    assert_eq!(built.len(), 9);
    assert_eq!(model.row(built.key(&2)).sense, ComparisonSense::Equal);
    assert_eq!(model.row(built.key(&2)).rhs, 1.0);
    assert_eq!(model.row(built.key(&5)).rhs, 0.0);
    assert_eq!(model.row(built.key(&7)).sense, ComparisonSense::LessEqual);
}

#[test]
fn assembly_cache_survives_variable_growth() {
    // rows built before and after a large allocation must not interfere
    let mut model = Model::new();
    let early = model.add_variables(2, VariableParams::default()).unwrap();
    let a = model.add_constraint(
        (LinearExpr::var(early.get(0)) + LinearExpr::var(early.get(0))).le_scalar(1.0),
    );
    assert_eq!(model.row(a).coefs, &[2.0]);

    let late = model.add_variables(1000, VariableParams::default()).unwrap();
    let b = model.add_constraint(
        (LinearExpr::var(late.get(999)) + LinearExpr::var(early.get(0))).le_scalar(1.0),
    );
    let row = model.row(b);
    assert_eq!(row.vars, &[0, 1001]);
    assert_eq!(row.coefs, &[1.0, 1.0]);

    // reusing an early column after the growth still coalesces
    let c = model.add_constraint(
        (LinearExpr::term(early.get(0), 4.0) + LinearExpr::term(early.get(0), -4.0)
            + LinearExpr::var(late.get(0)))
        .ge_scalar(0.0),
    );
    assert_eq!(model.row(c).vars, &[2]);
}

#[test]
fn submit_streams_the_whole_model() {
    let mut model = Model::maximize();
    let x = model
        .add_variable(VariableParams::default().with_upper_bound(4.0))
        .unwrap();
    let y = model.add_variable(VariableParams::integer()).unwrap();
    model.set_objective(LinearExpr::term(x, 3.0) + LinearExpr::term(y, 2.0) + 1.5);
    model.add_constraint((LinearExpr::var(x) + LinearExpr::var(y)).le_scalar(6.0));
    model.add_constraint(LinearExpr::term(y, 2.0).ge_scalar(1.0));

    let mut sink = RecordingSink::default();
    model.submit(&mut sink);

    assert_eq!(sink.columns.len(), 2);
    assert_eq!(sink.columns[0], (3.0, 0.0, 4.0, false));
    assert!(sink.columns[1].3);

    assert_eq!(sink.rows.len(), 2);
    assert_eq!(sink.rows[0].2, vec![0, 1]);
    assert_eq!(sink.rows[1].0, ComparisonSense::GreaterEqual);
    assert_eq!(sink.rows[1].3, vec![2.0]);

    let (obj_vars, obj_coefs, offset) = sink.objective.unwrap();
    assert_eq!(obj_vars, vec![0, 1]);
    assert_eq!(obj_coefs, vec![3.0, 2.0]);
    assert_eq!(offset, 1.5);
}

#[test]
fn expressions_replay_for_printing_and_assembly() {
    let mut model = Model::new();
    let vars = model.add_variables(2, VariableParams::default()).unwrap();
    let expr = || (LinearExpr::var(vars.get(0)) + LinearExpr::term(vars.get(1), 2.0)) * 3.0;

    // same expression used twice yields identical rows
    let first = model.add_constraint(expr().le_scalar(9.0));
    let second = model.add_constraint(expr().le_scalar(9.0));
    assert_eq!(model.row(first).coefs, model.row(second).coefs);

    let rendered = model.to_string();
    assert!(rendered.contains("R0: 3 x0 + 6 x1 <= 9"));
    assert!(rendered.contains("R1: 3 x0 + 6 x1 <= 9"));
}

#[test]
fn range_total_builds_cardinality_rows() {
    let mut model = Model::new();
    let vars = model.add_variables(5, VariableParams::binary()).unwrap();
    let id = model.add_constraint(vars.total().eq_scalar(2.0));
    let row = model.row(id);
    assert_eq!(row.vars, &[0, 1, 2, 3, 4]);
    assert!(row.coefs.iter().all(|c| *c == 1.0));
    assert_eq!(row.rhs, 2.0);
}

#[test]
fn unused_variable_id_is_flagged() {
    let mut model = Model::new();
    let vars = model.add_variables(3, VariableParams::default()).unwrap();
    let err = vars.try_get(3).unwrap_err();
    assert_eq!(err.code(), "RANGE_INDEX_OUT_OF_BOUNDS");
    assert_eq!(
        err.to_string(),
        "[RANGE_INDEX_OUT_OF_BOUNDS] Range index 3 out of bounds for 3 entities"
    );
    // ids below the bound still resolve
    assert_eq!(vars.get(2), VariableId::new(2));
}

#[test]
fn ranged_rows_flow_through_submission_and_checks() {
    let mut model = Model::new();
    let vars = model.add_variables(2, VariableParams::default()).unwrap();
    let demand = || LinearExpr::var(vars.get(0)) + LinearExpr::term(vars.get(1), 2.0);

    // 2 <= x0 + 2 x1 + 1 <= 8 lands as a >=/<= row pair
    let (lo, hi) = model.add_ranged_constraint((demand() + 1.0).between(2.0, 8.0));
    assert_eq!(model.row(lo).rhs, 1.0);
    assert_eq!(model.row(hi).rhs, 7.0);

    let mut sink = RecordingSink::default();
    model.submit(&mut sink);
    assert_eq!(sink.rows.len(), 2);
    assert_eq!(sink.rows[0].0, ComparisonSense::GreaterEqual);
    assert_eq!(sink.rows[1].0, ComparisonSense::LessEqual);
    assert_eq!(sink.rows[0].2, sink.rows[1].2);

    // a candidate point checks against the same normalized bounds
    let ranged = (demand() + 1.0).between(2.0, 8.0);
    assert!(ranged.satisfied(&[1.0, 3.0]));
    assert!(!ranged.satisfied(&[1.0, 4.0]));
}
