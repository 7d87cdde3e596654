// Submodules for separation of concerns
mod cursor;
mod eval;
mod types;

pub use cursor::Cursor;
pub use eval::{compare_bson, eval_filter};
pub use types::{CmpOp, DeleteReport, Filter, FindOptions};
