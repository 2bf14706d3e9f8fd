//! # Sequence 模块
//!
//! 编排序列：命令格式与执行器。

mod command;
mod runner;

pub use command::{ScreenEffect, Sequence, SequenceCommand};
pub use runner::{RunnerId, RunnerState, RunnerWait, SequenceAction, SequenceRunner, Suspension};
