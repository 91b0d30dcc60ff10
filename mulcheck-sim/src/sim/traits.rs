//! sim traits
//! 
//! defines the traits simulated board components implement

use crate::sim;

/// simulation trait
/// 
/// a simulation owns its components and drives them forward
pub trait Simulation {

    /// run the simulation until an error occurs
    fn run(
        &mut self,
    ) -> Result<(), sim::Error>;
}

/// clocked trait
/// 
/// implementation implies that actions must be taken
/// at each step of the simulation clock
pub trait Clocked {
    
    /// invoked once per simulation clock cycle
    fn step(&mut self) -> Result<(), sim::Error> {
        Ok(())
    }
}

/// timed trait
/// 
/// implementation implies that action must be taken once a certain
/// time has elapsed.
/// 
/// at the beginning of every simulation cycle `timed_out` is checked
/// and, if it returns true, `timeout_handler` is called.
/// at the end of every cycle `countdown` is called.
pub trait Timed {
    /// called after every simulation cycle to decrement the internal countdown
    fn countdown(&mut self);
    /// called before every simulation cycle to check for timeout
    fn timed_out(&self) -> bool;
    /// called if `timed_out` returned true
    fn timeout_handler(&mut self) -> Result<(), sim::Error>;
}
