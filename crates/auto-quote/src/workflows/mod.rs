pub mod financing;
pub mod matching;
