//! Trace output for `--trace` and `--step`.
//!
//! The machine's observer hooks land here: after every executed
//! instruction the full architectural state is printed, and in step
//! mode the simulator then blocks until a line arrives on stdin.
//! The blocking wait lives only in this binary; the simulation core
//! never reads input.

use std::io::Write;

use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::{event, Level};

use base::prelude::Word;
use cpu::{MachineSnapshot, Observer};

pub(crate) struct TraceWriter {
    stream: StandardStream,
    step: bool,
}

impl TraceWriter {
    pub(crate) fn new(step: bool) -> TraceWriter {
        TraceWriter {
            stream: StandardStream::stdout(ColorChoice::Auto),
            step,
        }
    }

    fn emit(&mut self, snapshot: &MachineSnapshot) -> Result<(), std::io::Error> {
        let mut heading = ColorSpec::new();
        heading.set_bold(true);
        self.stream.set_color(&heading)?;
        match snapshot.executed {
            Some(opcode) => writeln!(self.stream, "executed {opcode}")?,
            None => writeln!(self.stream, "machine state")?,
        }
        self.stream.reset()?;
        for reg in &snapshot.registers {
            writeln!(self.stream, "  {:<6} {}", reg.name, reg.value)?;
        }
        writeln!(
            self.stream,
            "  flags  zero={} negative={} nonzero={}",
            snapshot.flags.zero, snapshot.flags.negative, snapshot.flags.nonzero
        )?;
        writeln!(
            self.stream,
            "  buses  ext={} int1={} int2={}",
            snapshot.ext_bus, snapshot.int1_bus, snapshot.int2_bus
        )?;
        self.stream.flush()
    }

    fn pause(&mut self) {
        let mut line = String::new();
        if let Err(e) = std::io::stdin().read_line(&mut line) {
            event!(Level::ERROR, "failed to read step confirmation: {e}");
        }
    }
}

impl Observer for TraceWriter {
    fn instruction_fetched(&mut self, pc: Word, ir: Word) {
        if let Err(e) = writeln!(self.stream, "fetched {ir} from address {pc}") {
            event!(Level::ERROR, "failed to write trace output: {e}");
        }
    }

    fn instruction_executed(&mut self, snapshot: &MachineSnapshot) {
        if let Err(e) = self.emit(snapshot) {
            event!(Level::ERROR, "failed to write trace output: {e}");
        }
        if self.step {
            self.pause();
        }
    }
}
