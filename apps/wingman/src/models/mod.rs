pub mod company;
pub mod evaluation;
pub mod review;
