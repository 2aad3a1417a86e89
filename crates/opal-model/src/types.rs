//! Shared model-level value types.

/// Optimization sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjSense {
    #[default]
    Minimize,
    Maximize,
}

impl ObjSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjSense::Minimize => "minimize",
            ObjSense::Maximize => "maximize",
        }
    }
}

/// Variable domain kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarKind {
    #[default]
    Continuous,
    Integer,
    /// Integer restricted to {0, 1}; declared bounds are ignored.
    Binary,
}

/// Declaration parameters shared by every variable of a range.
///
/// `None` bounds mean unbounded in that direction. The default is the usual
/// LP convention: continuous, nonnegative, zero objective coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableParams {
    pub obj_coef: f64,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub kind: VarKind,
}

impl Default for VariableParams {
    fn default() -> Self {
        Self {
            obj_coef: 0.0,
            lower_bound: Some(0.0),
            upper_bound: None,
            kind: VarKind::Continuous,
        }
    }
}

impl VariableParams {
    pub fn continuous() -> Self {
        Self::default()
    }

    pub fn integer() -> Self {
        Self {
            kind: VarKind::Integer,
            ..Self::default()
        }
    }

    pub fn binary() -> Self {
        Self {
            kind: VarKind::Binary,
            ..Self::default()
        }
    }

    pub fn with_obj_coef(mut self, coef: f64) -> Self {
        self.obj_coef = coef;
        self
    }

    pub fn with_lower_bound(mut self, lower: f64) -> Self {
        self.lower_bound = Some(lower);
        self
    }

    pub fn with_upper_bound(mut self, upper: f64) -> Self {
        self.upper_bound = Some(upper);
        self
    }

    pub fn free(mut self) -> Self {
        self.lower_bound = None;
        self.upper_bound = None;
        self
    }

    /// Bounds resolved to concrete column bounds. Binary variables pin to
    /// [0, 1] regardless of the declared bounds.
    pub fn resolved_bounds(&self) -> (f64, f64) {
        match self.kind {
            VarKind::Binary => (0.0, 1.0),
            _ => (
                self.lower_bound.unwrap_or(f64::NEG_INFINITY),
                self.upper_bound.unwrap_or(f64::INFINITY),
            ),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.kind, VarKind::Integer | VarKind::Binary)
    }
}
