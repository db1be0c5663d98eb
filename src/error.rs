use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FontMathError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Contours are not compatible: {reason}")]
    IncompatibleContours { reason: String },

    #[error("Bad contour: a curve needs one or two off-curve points")]
    BadContour,

    #[error("Kerning conflicts still present after {iterations} passes: {remaining} left")]
    UnresolvedKerningConflicts { iterations: usize, remaining: usize },
}
