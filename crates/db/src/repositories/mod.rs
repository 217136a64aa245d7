//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod answer_repo;
pub mod blog_repo;
pub mod category_repo;
pub mod survey_repo;
pub mod task_repo;
pub mod user_repo;
pub mod verification_code_repo;

pub use answer_repo::AnswerRepo;
pub use blog_repo::BlogRepo;
pub use category_repo::CategoryRepo;
pub use survey_repo::SurveyRepo;
pub use task_repo::TaskRepo;
pub use user_repo::{LoginOutcome, UserRepo};
pub use verification_code_repo::VerificationCodeRepo;
