//! peripheral module
//! 
//! the board peripherals the harness touches: the rtc that paces the
//! driver, the usart dma that carries reports, and the status led

pub mod gpio;
pub mod rtc;
pub mod usart;

pub use gpio::Led;
pub use rtc::Rtc;
pub use usart::{SerialSink, Usart};
