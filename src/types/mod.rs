pub mod question;
pub mod report;
pub mod search;

pub use question::{ClarificationQuestion, FollowUpQuestions};
pub use report::{DeliveryReceipt, Report};
pub use search::{SearchDigest, SearchDirective, WebSearchPlan};
