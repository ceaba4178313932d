use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex};

use log::debug;

use crate::instruction::Instruction;
use crate::memory::Memory;
use crate::registers::Registers;

/// The gate the engine calls at the start of every clock
///
/// "No debugger" is a no-op gate rather than an `Option` check inside the
/// cycle; [`Debugger`] is the other implementation.
pub(crate) trait ClockGate: Send + Sync {
    /// May block the engine thread until execution is resumed
    fn on_clock(&self, pc: u16);
}

/// The gate used while no debugger is attached
pub(crate) struct NoDebugger;

impl ClockGate for NoDebugger {
    fn on_clock(&self, _pc: u16) {}
}

struct Control {
    /// Addresses that trigger a pause when the program counter reaches them
    breakpoints: HashSet<u16>,
    /// One-shot: pause at the next gate check no matter where it is
    break_next: bool,
    paused: bool,
    detached: bool,
}

/// Breakpoint and single-step control over a running engine
///
/// The engine thread calls the gate once per clock with the current program
/// counter and blocks there while paused; `step`, `resume`, and
/// `toggle_breakpoint` are called from a separate control thread. The
/// debugger also holds shared handles to the register file and memory so a
/// paused machine can be inspected and edited; edits made while paused are
/// guaranteed visible to the next fetch, edits while running race with the
/// in-flight cycle and get no such guarantee.
pub struct Debugger {
    ctl: Mutex<Control>,
    resumed: Condvar,
    registers: Arc<Mutex<Registers>>,
    memory: Arc<Mutex<Memory>>,
}

impl Debugger {
    pub(crate) fn new(
        registers: Arc<Mutex<Registers>>,
        memory: Arc<Mutex<Memory>>,
        break_next: bool,
    ) -> Self {
        Debugger {
            ctl: Mutex::new(Control {
                breakpoints: HashSet::new(),
                break_next,
                paused: false,
                detached: false,
            }),
            resumed: Condvar::new(),
            registers,
            memory,
        }
    }

    /// Add or remove a breakpoint; effective from the next gate check
    pub fn toggle_breakpoint(&self, addr: u16) {
        let mut ctl = self.ctl.lock().unwrap();
        if !ctl.breakpoints.insert(addr) {
            ctl.breakpoints.remove(&addr);
            debug!("removed breakpoint at {:03X}", addr);
        } else {
            debug!("set breakpoint at {:03X}", addr);
        }
    }

    pub fn has_breakpoint(&self, addr: u16) -> bool {
        self.ctl.lock().unwrap().breakpoints.contains(&addr)
    }

    /// Resume a paused engine
    pub fn resume(&self) {
        let mut ctl = self.ctl.lock().unwrap();
        ctl.paused = false;
        self.resumed.notify_all();
    }

    /// Execute exactly one instruction, then pause again at the next gate
    pub fn step(&self) {
        let mut ctl = self.ctl.lock().unwrap();
        ctl.break_next = true;
        ctl.paused = false;
        self.resumed.notify_all();
    }

    pub fn is_paused(&self) -> bool {
        self.ctl.lock().unwrap().paused
    }

    /// Permanently disable the gate and release the engine if it is paused
    pub fn detach(&self) {
        let mut ctl = self.ctl.lock().unwrap();
        ctl.detached = true;
        ctl.paused = false;
        self.resumed.notify_all();
        debug!("debugger detached");
    }

    /// Read access to the machine state, intended for use while paused
    pub fn inspect<R>(&self, f: impl FnOnce(&Registers, &Memory) -> R) -> R {
        let registers = self.registers.lock().unwrap();
        let memory = self.memory.lock().unwrap();
        f(&registers, &memory)
    }

    /// Live-edit the machine state; edits made while paused are visible
    /// before the next instruction executes
    pub fn edit<R>(&self, f: impl FnOnce(&mut Registers, &mut Memory) -> R) -> R {
        let mut registers = self.registers.lock().unwrap();
        let mut memory = self.memory.lock().unwrap();
        f(&mut registers, &mut memory)
    }

    /// Disassemble `count` instruction slots starting at `start`
    ///
    /// A pure rendering of the decoder over memory; words that match no
    /// opcode pattern render as `????`. Slots past the end of memory are
    /// omitted.
    pub fn disassemble(&self, start: u16, count: usize) -> Vec<(u16, String)> {
        let memory = self.memory.lock().unwrap();
        (start..=u16::MAX)
            .step_by(2)
            .map_while(|addr| {
                let word = memory.read_word(addr).ok()?;
                let text = match Instruction::decode(word) {
                    Some(instruction) => instruction.to_string(),
                    None => String::from("????"),
                };
                Some((addr, text))
            })
            .take(count)
            .collect()
    }
}

impl ClockGate for Debugger {
    fn on_clock(&self, pc: u16) {
        let mut ctl = self.ctl.lock().unwrap();
        if ctl.detached {
            return;
        }
        if ctl.break_next || ctl.breakpoints.contains(&pc) {
            debug!("paused at {:03X}", pc);
            ctl.break_next = false;
            ctl.paused = true;
            while ctl.paused {
                ctl = self.resumed.wait(ctl).unwrap();
            }
            debug!("resumed from {:03X}", pc);
        }
    }
}
