//! simulated board for the mulcheck harness
//! 
//! a clock-driven model of the board the harness runs on: an rtc paces
//! the driver, reports travel over a serial line through a usart with
//! dma, an led blinks per test case, and a register-level reference
//! target stands in for the routines under test.

pub mod board;
pub mod fmt;
pub mod peripheral;
pub mod reference;
pub mod regs;
pub mod sim;

pub use board::Board;
pub use reference::{Faults, ReferenceTarget};
