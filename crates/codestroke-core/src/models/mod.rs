pub mod eligibility;
pub mod encounter;
pub mod imaging;
pub mod onset;
