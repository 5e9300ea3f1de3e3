pub mod driver;

pub use driver::{Matcher, NORMAL_QUEUE, TEAM_QUEUE};
