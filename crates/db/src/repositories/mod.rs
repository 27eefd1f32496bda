//! Repository layer for database access.
//!
//! One repository per aggregate. The enrollment and referral repositories
//! own their transactional invariants; everything else is plain CRUD.

pub mod content;
pub mod course;
pub mod enrollment;
pub mod referral;
pub mod user;

pub use content::ContentRepository;
pub use course::{CourseFilter, CourseRepository};
pub use enrollment::{Admission, EnrollError, EnrollOutcome, EnrollmentRepository, VisitError};
pub use referral::{ReferralOutcome, ReferralRepository};
pub use user::UserRepository;
