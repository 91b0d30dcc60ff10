//! simulated board
//! 
//! wires the verification driver to a clock, an rtc, a usart with dma
//! transmit and a status led. every driver step waits until the rtc has
//! expired and the previous report has left the usart, the same way the
//! firmware paces its test cases.

use std::sync::Arc;

use mulcheck_core::config::{BoardConfig, HarnessConfig};
use mulcheck_core::driver::{Driver, DriverState, Tick};
use mulcheck_core::routine::Target;

use crate::peripheral::{Led, Rtc, SerialSink, Usart};
use crate::sim;
use crate::sim::channel::{serial, ChannelLogger, Digital};
use crate::sim::traits::{Clocked, Simulation, Timed};
use crate::sim::Clock;

pub struct Board<T> {
    config: BoardConfig,
    clock: Arc<Clock>,
    rtc: Rtc,
    usart: Usart,
    sink: SerialSink,
    led: Led,
    terminal: ChannelLogger<serial::Event>,
    transcript: String,
    driver: Driver<T>,
    ticks: u64,
    idle_cadence: bool,
}

impl<T: Target> Board<T> {
    pub fn new(target: T, config: &HarnessConfig) -> Result<Self, sim::Error> {
        Self::with_driver(Driver::new(target, config), config)
    }

    /// build a board around an already configured driver
    pub fn with_driver(driver: Driver<T>, config: &HarnessConfig) -> Result<Self, sim::Error> {
        let board = config.board;
        let clock = Arc::new(Clock::from_hz(board.clock_hz)?);

        let mut usart = Usart::new_with(clock.clone(), &board);
        let terminal = usart
            .connect()
            .map(ChannelLogger::new_with)
            .ok_or(sim::channel::Error::Full("serial"))?;
        let sink = usart.sink();

        Ok(Self {
            config: board,
            clock: clock.clone(),
            rtc: Rtc::new(board.run_period),
            usart,
            sink,
            led: Led::new_with(clock),
            terminal,
            transcript: String::new(),
            driver,
            ticks: 0,
            idle_cadence: false,
        })
    }

    pub fn driver(&self) -> &Driver<T> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut Driver<T> {
        &mut self.driver
    }

    pub fn clock(&self) -> &Clock {
        self.clock.as_ref()
    }

    pub fn rtc(&self) -> &Rtc {
        &self.rtc
    }

    pub fn usart(&self) -> &Usart {
        &self.usart
    }

    pub fn usart_mut(&mut self) -> &mut Usart {
        &mut self.usart
    }

    pub fn led(&self) -> &Led {
        &self.led
    }

    /// attach a logger to the status led
    pub fn led_logger(&mut self) -> ChannelLogger<Digital> {
        self.led.get_logger()
    }

    /// driver steps taken so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// one clock cycle: timeouts, then clocked components, then countdown
    fn cycle(&mut self) -> Result<(), sim::Error> {
        if self.rtc.timed_out() {
            self.rtc.timeout_handler()?;
        }
        self.usart.step()?;
        self.rtc.countdown();
        self.clock.tick();
        Ok(())
    }

    /// run clock cycles until the rtc has expired and transmission is done
    /// 
    /// errors once the rtc has expired while a transfer is stuck behind a
    /// disconnected line. the expiry is kept, so the wait can be retried
    /// after reconnecting.
    pub fn wait_for_tick(&mut self) -> Result<(), sim::Error> {
        while !(self.rtc.is_expired() && self.sink.is_complete()) {
            if self.rtc.is_expired() && !self.usart.is_connected() {
                return Err(sim::Error::Stalled(self.clock.ticks_elapsed()));
            }
            self.cycle()?;
        }
        self.rtc.clear();
        Ok(())
    }

    /// wait for the next tick and advance the driver by one state
    pub fn step(&mut self) -> Result<DriverState, sim::Error> {
        self.wait_for_tick()?;

        let tick = Tick(self.ticks + 1);
        let state = self.driver
            .advance(tick, &mut self.sink)
            .map_err(|err| sim::Error::Driver(err, self.clock.ticks_elapsed()))?;
        self.ticks = tick.0;

        match state {
            DriverState::PerVectorSetup => self.led.toggle()?,
            DriverState::RunComplete => {
                self.led.toggle()?;
                if !self.idle_cadence {
                    self.rtc.set_compare(self.config.idle_period);
                    self.idle_cadence = true;
                    log::info!(
                        "first pass complete at {:.3}s, rtc period now {} ticks",
                        self.clock.elapsed_seconds(),
                        self.config.idle_period,
                    );
                }
            }
            _ => (),
        }
        Ok(state)
    }

    /// take `steps` driver steps
    pub fn run_for(&mut self, steps: usize) -> Result<(), sim::Error> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// step until `passes` passes over the vector table have completed
    /// and the last summary has been transmitted
    pub fn run_passes(&mut self, passes: u32) -> Result<(), sim::Error> {
        while self.driver.stats().passes() < passes {
            self.step()?;
        }
        while !self.sink.is_complete() {
            self.cycle()?;
        }
        Ok(())
    }

    /// everything received on the terminal so far
    pub fn transcript(&mut self) -> &str {
        let received = serial::text(self.terminal.collect_pending());
        self.transcript.push_str(&received);
        &self.transcript
    }
}

impl<T: Target> Simulation for Board<T> {
    fn run(&mut self) -> Result<(), sim::Error> {
        loop {
            self.step()?;
        }
    }
}
