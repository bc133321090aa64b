pub mod generate;
pub mod magnetization;
pub mod tensor;
