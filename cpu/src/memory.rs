//! The memory unit.
//!
//! Memory is wired only to the external bus and resolves both
//! addresses and data strictly through bus transactions: `read`
//! treats the bus value as an address and overwrites the bus with
//! the cell's content; `store` is a two-phase protocol in which the
//! first call latches the bus value as the target address and the
//! second writes the bus value into the latched cell.  Addresses
//! outside the configured size are alarms, never wrapped or clamped.

use tracing::{Level, event};

use base::prelude::{DEFAULT_MEMORY_SIZE, IMAGE_SENTINEL, ObjectImage, Word};

use crate::alarm::BadMemOp;
use crate::bus::Buses;

#[derive(Debug, Clone)]
pub struct MemoryConfiguration {
    pub size: usize,
}

impl Default for MemoryConfiguration {
    fn default() -> MemoryConfiguration {
        MemoryConfiguration {
            size: DEFAULT_MEMORY_SIZE,
        }
    }
}

/// Where the two-phase store protocol currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreCycle {
    AwaitingAddress,
    AwaitingData(usize),
}

#[derive(Debug)]
pub struct MemoryUnit {
    cells: Vec<Word>,
    store_cycle: StoreCycle,
    reads: u64,
    writes: u64,
}

impl MemoryUnit {
    pub fn new(config: &MemoryConfiguration) -> MemoryUnit {
        MemoryUnit {
            cells: vec![0; config.size],
            store_cycle: StoreCycle::AwaitingAddress,
            reads: 0,
            writes: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    fn address(&self, value: Word) -> Option<usize> {
        usize::try_from(value)
            .ok()
            .filter(|a| *a < self.cells.len())
    }

    /// Treat the external bus value as an address and overwrite the
    /// bus with the addressed cell's content.
    pub fn read(&mut self, buses: &mut Buses) -> Result<(), BadMemOp> {
        let wanted = buses.ext.get();
        match self.address(wanted) {
            Some(addr) => {
                self.reads += 1;
                buses.ext.put(self.cells[addr]);
                Ok(())
            }
            None => Err(BadMemOp::Read(wanted)),
        }
    }

    /// One step of the two-phase store: latch the address, or (on
    /// the following call) write the bus value to the latched cell.
    pub fn store(&mut self, buses: &Buses) -> Result<(), BadMemOp> {
        match self.store_cycle {
            StoreCycle::AwaitingAddress => {
                let wanted = buses.ext.get();
                match self.address(wanted) {
                    Some(addr) => {
                        self.store_cycle = StoreCycle::AwaitingData(addr);
                        Ok(())
                    }
                    None => Err(BadMemOp::Write(wanted)),
                }
            }
            StoreCycle::AwaitingData(addr) => {
                self.cells[addr] = buses.ext.get();
                self.writes += 1;
                self.store_cycle = StoreCycle::AwaitingAddress;
                Ok(())
            }
        }
    }

    /// Observe a cell without a bus transaction (tracing and tests).
    pub fn get(&self, addr: usize) -> Option<Word> {
        self.cells.get(addr).copied()
    }

    /// Number of completed bus read transactions.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Number of completed cell writes (latch calls not counted).
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl MemoryUnit {
    /// Load an object image into consecutive cells from address 0,
    /// through the ordinary two-phase store protocol, and write the
    /// sentinel into the following cell so that falling off the end
    /// of the program halts the machine.  An image which does not
    /// fit (sentinel included) is a memory fault.
    pub fn load(&mut self, buses: &mut Buses, image: &ObjectImage) -> Result<(), BadMemOp> {
        for (addr, word) in image
            .words()
            .iter()
            .chain(std::iter::once(&IMAGE_SENTINEL))
            .enumerate()
        {
            buses.ext.put(addr as Word);
            self.store(buses)?;
            buses.ext.put(*word);
            self.store(buses)?;
        }
        event!(
            Level::INFO,
            "loaded {} program cells (plus sentinel) into a {}-cell memory",
            image.len(),
            self.size()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryConfiguration, MemoryUnit};
    use crate::alarm::BadMemOp;
    use crate::bus::Buses;
    use base::prelude::ObjectImage;

    fn tiny() -> MemoryUnit {
        MemoryUnit::new(&MemoryConfiguration { size: 8 })
    }

    #[test]
    fn two_phase_store_then_read_round_trips() {
        let mut buses = Buses::default();
        let mut mem = tiny();
        buses.ext.put(3);
        mem.store(&buses).expect("latch in range");
        buses.ext.put(99);
        mem.store(&buses).expect("write");
        buses.ext.put(3);
        mem.read(&mut buses).expect("read in range");
        assert_eq!(buses.ext.get(), 99);
        assert_eq!(mem.writes(), 1);
        assert_eq!(mem.reads(), 1);
    }

    #[test]
    fn out_of_range_read_is_a_fault() {
        let mut buses = Buses::default();
        let mut mem = tiny();
        buses.ext.put(8);
        assert_eq!(mem.read(&mut buses), Err(BadMemOp::Read(8)));
        buses.ext.put(-1);
        assert_eq!(mem.read(&mut buses), Err(BadMemOp::Read(-1)));
    }

    #[test]
    fn out_of_range_latch_is_a_fault() {
        let mut buses = Buses::default();
        let mut mem = tiny();
        buses.ext.put(100);
        assert_eq!(mem.store(&buses), Err(BadMemOp::Write(100)));
    }

    #[test]
    fn load_places_program_and_sentinel() {
        let mut buses = Buses::default();
        let mut mem = tiny();
        let image = ObjectImage::new(vec![24, 0, 5]);
        mem.load(&mut buses, &image).expect("image fits");
        assert_eq!(mem.get(0), Some(24));
        assert_eq!(mem.get(1), Some(0));
        assert_eq!(mem.get(2), Some(5));
        assert_eq!(mem.get(3), Some(-1));
    }

    #[test]
    fn load_of_oversized_image_is_a_fault() {
        let mut buses = Buses::default();
        let mut mem = tiny();
        // Eight words fill memory; the sentinel has nowhere to go.
        let image = ObjectImage::new(vec![0; 8]);
        assert_eq!(mem.load(&mut buses, &image), Err(BadMemOp::Write(8)));
    }
}
