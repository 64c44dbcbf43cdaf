//! Puzzle Kit - small helpers for text-heavy puzzle inputs
//!
//! The centerpiece is a line template parser that turns semi-structured text
//! into typed records. Integer points and a sparse grid cover the usual 2D
//! puzzle maps.
//!
//! # Example
//!
//! ```rust
//! use puzzle_kit::{compile, Value};
//!
//! let template = compile(
//!     "Button A: X+{ax|double}, Y+{ay|long}\n\
//!      Prize: X={rx|string}, Y={ry|string}",
//! )
//! .unwrap();
//!
//! let records = template
//!     .parse("Button A: X+94.5, Y+34\nPrize: X=Reward, Y=ContactUs")
//!     .unwrap();
//!
//! assert_eq!(records[0].get("ax"), Some(&Value::Double(94.5)));
//! assert_eq!(records[0].get("ry"), Some(&Value::Text("ContactUs".to_string())));
//! ```

pub mod error;
pub mod geometry;
pub mod template;

pub use error::TemplateError;
pub use geometry::{Grid, Point};
pub use template::{
    coerce, compile, ErrorPolicy, FieldKind, FieldSpec, ParseConfig, Record, Template,
    TemplateSet, TemplateSetError, Value,
};
