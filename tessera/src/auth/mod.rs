mod checker;
pub mod evaluator;

pub use checker::PermissionsChecker;
pub use evaluator::{has_role, roles_of};
