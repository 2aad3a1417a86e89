//! LP-format rendering of a model.
//!
//! `Display` writes the classic LP file layout: objective, `Subject To`
//! rows, `General`/`Binary` variable sections, nontrivial `Bounds`, `End`.
//! Rows render straight from the CSR storage, so printing never re-flattens
//! an expression. Named entities render with their names, everything else
//! falls back to `x{col}` / `R{row}`.

use std::fmt;

use opal_expr::{ConstraintId, VariableId};

use crate::model::Model;
use crate::types::{ObjSense, VarKind};

impl Model {
    fn var_label(&self, col: u32) -> String {
        match self.variable_name(VariableId::new(col)) {
            Some(name) => name.to_string(),
            None => format!("x{col}"),
        }
    }

    fn row_label(&self, row: usize) -> String {
        match self.constraint_name(ConstraintId::new(row as u32)) {
            Some(name) => name.to_string(),
            None => format!("R{row}"),
        }
    }

    fn write_terms(&self, f: &mut fmt::Formatter<'_>, vars: &[u32], coefs: &[f64]) -> fmt::Result {
        let mut first = true;
        for (var, coef) in vars.iter().zip(coefs) {
            if *coef == 0.0 {
                continue;
            }
            if first {
                if *coef < 0.0 {
                    write!(f, "-")?;
                }
                first = false;
            } else if *coef < 0.0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            let magnitude = coef.abs();
            if magnitude != 1.0 {
                write!(f, "{magnitude} ")?;
            }
            write!(f, "{}", self.var_label(*var))?;
        }
        Ok(())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.obj_sense {
            ObjSense::Minimize => writeln!(f, "Minimize")?,
            ObjSense::Maximize => writeln!(f, "Maximize")?,
        }

        let obj_vars: Vec<u32> = (0..self.num_variables() as u32)
            .filter(|col| self.obj_coefs[*col as usize] != 0.0)
            .collect();
        let obj_coefs: Vec<f64> = obj_vars
            .iter()
            .map(|col| self.obj_coefs[*col as usize])
            .collect();
        write!(f, " obj: ")?;
        if obj_vars.is_empty() {
            // keep the line parseable when every coefficient is zero
            write!(f, "{}", self.obj_offset)?;
        } else {
            self.write_terms(f, &obj_vars, &obj_coefs)?;
            if self.obj_offset != 0.0 {
                if self.obj_offset < 0.0 {
                    write!(f, " - {}", -self.obj_offset)?;
                } else {
                    write!(f, " + {}", self.obj_offset)?;
                }
            }
        }
        writeln!(f)?;

        writeln!(f, "Subject To")?;
        for (index, row) in self.rows().enumerate() {
            write!(f, " {}: ", self.row_label(index))?;
            self.write_terms(f, row.vars, row.coefs)?;
            writeln!(f, " {} {}", row.sense.symbol(), row.rhs)?;
        }

        let general: Vec<u32> = (0..self.num_variables() as u32)
            .filter(|col| self.col_kind[*col as usize] == VarKind::Integer)
            .collect();
        if !general.is_empty() {
            writeln!(f, "General")?;
            for col in general {
                write!(f, " {}", self.var_label(col))?;
            }
            writeln!(f)?;
        }

        let binary: Vec<u32> = (0..self.num_variables() as u32)
            .filter(|col| self.col_kind[*col as usize] == VarKind::Binary)
            .collect();
        if !binary.is_empty() {
            writeln!(f, "Binary")?;
            for col in binary {
                write!(f, " {}", self.var_label(col))?;
            }
            writeln!(f)?;
        }

        // binary bounds are implied by the section above
        let nontrivial: Vec<u32> = (0..self.num_variables() as u32)
            .filter(|col| {
                let col = *col as usize;
                self.col_kind[col] != VarKind::Binary
                    && (self.col_lower[col] != 0.0 || self.col_upper[col] != f64::INFINITY)
            })
            .collect();
        if !nontrivial.is_empty() {
            writeln!(f, "Bounds")?;
            for col in nontrivial {
                let lower = self.col_lower[col as usize];
                let upper = self.col_upper[col as usize];
                let label = self.var_label(col);
                if lower == upper {
                    writeln!(f, " {label} = {upper}")?;
                    continue;
                }
                write!(f, " ")?;
                if lower != 0.0 {
                    if lower == f64::NEG_INFINITY {
                        write!(f, "-Inf <= ")?;
                    } else {
                        write!(f, "{lower} <= ")?;
                    }
                }
                write!(f, "{label}")?;
                if upper != f64::INFINITY {
                    write!(f, " <= {upper}")?;
                }
                writeln!(f)?;
            }
        }

        writeln!(f, "End")
    }
}
