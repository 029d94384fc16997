mod kind;
mod log;

pub use kind::{classify, classify_hour, Language, MealType};
pub use log::{MealLog, MealRecord};
