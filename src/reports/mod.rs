pub mod formatters;

pub use formatters::{DotFormatter, NodeOrder, ReportFormatter};
