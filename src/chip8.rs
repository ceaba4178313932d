use std::sync::{Arc, Mutex};

use log::trace;

use crate::constants::{CLOCKS_PER_TIMER_TICK, GLYPH_SIZE};
use crate::debugger::{ClockGate, Debugger, NoDebugger};
use crate::display::Display;
use crate::error::Error;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::registers::Registers;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns the register file, memory, and return address stack, and drives the
/// fetch-decode-execute-timer cycle through [`Chip8::clock`], which an
/// external driver invokes at a fixed cadence. The display and keypad are
/// shared with the presentation thread, and the register file and memory are
/// shared with an optionally attached [`Debugger`]; the engine itself is the
/// only thread that ever mutates registers or memory while running.
///
/// The cycle keeps the reference program counter convention: `clock` adds 2
/// unconditionally after executing, so jump targets are stored pre-adjusted
/// (`JP` stores `nnn - 2`) and skip instructions add an extra 2 up front.
pub struct Chip8 {
    registers: Arc<Mutex<Registers>>,
    memory: Arc<Mutex<Memory>>,
    stack: Vec<u16>,
    display: Arc<Display>,
    keypad: Arc<Keypad>,
    gate: Arc<dyn ClockGate>,
    clocks_since_timer_tick: u8,
}

impl Chip8 {
    pub fn new(display: Arc<Display>, keypad: Arc<Keypad>) -> Self {
        Chip8 {
            registers: Arc::new(Mutex::new(Registers::new())),
            memory: Arc::new(Mutex::new(Memory::new())),
            stack: Vec::new(),
            display,
            keypad,
            gate: Arc::new(NoDebugger),
            clocks_since_timer_tick: 0,
        }
    }

    /// Copy a program into memory starting at 0x200
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        self.memory.lock().unwrap().load_program(program)
    }

    /// Attach a debugger and return the handle used to control it
    ///
    /// With `break_next` set the engine pauses at the very first gate check,
    /// before any instruction has executed. The debugger shares the register
    /// file and memory for inspection and live editing while paused.
    pub fn attach_debugger(&mut self, break_next: bool) -> Arc<Debugger> {
        let debugger = Arc::new(Debugger::new(
            Arc::clone(&self.registers),
            Arc::clone(&self.memory),
            break_next,
        ));
        self.gate = Arc::clone(&debugger) as Arc<dyn ClockGate>;
        debugger
    }

    /// Swap the gate back to the transparent no-op implementation
    pub fn detach_debugger(&mut self) {
        self.gate = Arc::new(NoDebugger);
    }

    /// Execute a single clock of the Chip 8
    ///
    /// In order: the debugger gate (which may block until resumed), the
    /// timer tick, then one fetch-decode-execute, then the unconditional
    /// `pc += 2`. Any returned fault is fatal and the driving loop should
    /// stop; `Error::Interrupted` means a shutdown cancelled a key wait.
    pub fn clock(&mut self) -> Result<(), Error> {
        let pc = self.registers.lock().unwrap().pc;
        self.gate.on_clock(pc);

        self.tick_timers();

        // Reread the program counter: the debugger may have edited it while
        // the gate was paused
        let pc = self.registers.lock().unwrap().pc;
        let opcode = self.memory.lock().unwrap().read_word(pc)?;
        let instruction =
            Instruction::decode(opcode).ok_or(Error::UnknownOpcode { opcode, addr: pc })?;
        trace!("{:03X}: {}", pc, instruction);
        self.execute(instruction)?;

        let mut registers = self.registers.lock().unwrap();
        registers.pc = registers.pc.wrapping_add(2);
        Ok(())
    }

    /// Decrement the timers once every CLOCKS_PER_TIMER_TICK clocks
    fn tick_timers(&mut self) {
        self.clocks_since_timer_tick += 1;
        if self.clocks_since_timer_tick == CLOCKS_PER_TIMER_TICK {
            self.clocks_since_timer_tick = 0;
            let mut registers = self.registers.lock().unwrap();
            if registers.delay_timer > 0 {
                registers.delay_timer -= 1;
            }
            if registers.sound_timer > 0 {
                registers.sound_timer -= 1;
            }
        }
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), Error> {
        if let Instruction::LdKey(x) = instruction {
            // The wait must hold no engine lock or the presentation and
            // debugger threads would stall behind a blocked Fx0A
            let key = self.keypad.wait_key()?;
            self.registers.lock().unwrap().v[usize::from(x)] = key;
            return Ok(());
        }

        let mut regs = self.registers.lock().unwrap();
        let mut memory = self.memory.lock().unwrap();
        match instruction {
            Instruction::Cls => self.display.clear(),
            Instruction::Ret => {
                regs.pc = self
                    .stack
                    .pop()
                    .ok_or(Error::StackUnderflow { addr: regs.pc })?;
            }
            Instruction::Jp(addr) => regs.pc = addr.wrapping_sub(2),
            Instruction::Call(addr) => {
                self.stack.push(regs.pc);
                regs.pc = addr;
            }
            Instruction::SeByte(x, kk) => {
                if regs.v[usize::from(x)] == kk {
                    regs.pc += 2;
                }
            }
            Instruction::SneByte(x, kk) => {
                if regs.v[usize::from(x)] != kk {
                    regs.pc += 2;
                }
            }
            Instruction::SeReg(x, y) => {
                if regs.v[usize::from(x)] == regs.v[usize::from(y)] {
                    regs.pc += 2;
                }
            }
            Instruction::LdByte(x, kk) => regs.v[usize::from(x)] = kk,
            Instruction::AddByte(x, kk) => {
                let x = usize::from(x);
                regs.v[x] = regs.v[x].wrapping_add(kk);
            }
            Instruction::LdReg(x, y) => regs.v[usize::from(x)] = regs.v[usize::from(y)],
            Instruction::Or(x, y) => regs.v[usize::from(x)] |= regs.v[usize::from(y)],
            Instruction::And(x, y) => regs.v[usize::from(x)] &= regs.v[usize::from(y)],
            Instruction::Xor(x, y) => regs.v[usize::from(x)] ^= regs.v[usize::from(y)],
            Instruction::AddReg(x, y) => {
                let (res, carry) = regs.v[usize::from(x)].overflowing_add(regs.v[usize::from(y)]);
                regs.v[0xF] = u8::from(carry);
                regs.v[usize::from(x)] = res;
            }
            Instruction::Sub(x, y) => {
                let (res, borrow) = regs.v[usize::from(x)].overflowing_sub(regs.v[usize::from(y)]);
                regs.v[0xF] = u8::from(!borrow);
                regs.v[usize::from(x)] = res;
            }
            Instruction::Shr(x, y) => {
                let vy = regs.v[usize::from(y)];
                regs.v[0xF] = vy & 0x1;
                regs.v[usize::from(x)] = vy >> 1;
            }
            Instruction::Subn(x, y) => {
                let (res, borrow) = regs.v[usize::from(y)].overflowing_sub(regs.v[usize::from(x)]);
                regs.v[0xF] = u8::from(!borrow);
                regs.v[usize::from(x)] = res;
            }
            Instruction::Shl(x, y) => {
                let vy = regs.v[usize::from(y)];
                regs.v[0xF] = vy >> 7;
                regs.v[usize::from(x)] = vy << 1;
            }
            Instruction::SneReg(x, y) => {
                if regs.v[usize::from(x)] != regs.v[usize::from(y)] {
                    regs.pc += 2;
                }
            }
            Instruction::LdI(addr) => regs.i = addr,
            Instruction::JpV0(addr) => {
                regs.pc = addr.wrapping_add(u16::from(regs.v[0x0])).wrapping_sub(2);
            }
            Instruction::Rnd(x, kk) => regs.v[usize::from(x)] = rand::random::<u8>() & kk,
            Instruction::Drw(x, y, n) => {
                let sprite = memory.slice(regs.i, usize::from(n))?;
                let collision =
                    self.display
                        .draw(regs.v[usize::from(x)], regs.v[usize::from(y)], sprite);
                regs.v[0xF] = u8::from(collision);
            }
            Instruction::Skp(x) => {
                if self.keypad.is_key_down(regs.v[usize::from(x)]) {
                    regs.pc += 2;
                }
            }
            Instruction::Sknp(x) => {
                if !self.keypad.is_key_down(regs.v[usize::from(x)]) {
                    regs.pc += 2;
                }
            }
            Instruction::LdVxDt(x) => regs.v[usize::from(x)] = regs.delay_timer,
            // Handled before the locks are taken
            Instruction::LdKey(_) => unreachable!(),
            Instruction::LdDtVx(x) => regs.delay_timer = regs.v[usize::from(x)],
            Instruction::LdStVx(x) => regs.sound_timer = regs.v[usize::from(x)],
            Instruction::AddI(x) => regs.i = regs.i.wrapping_add(u16::from(regs.v[usize::from(x)])),
            Instruction::LdFont(x) => regs.i = u16::from(regs.v[usize::from(x)]) * GLYPH_SIZE,
            Instruction::LdBcd(x) => {
                let value = regs.v[usize::from(x)];
                let digits = [value / 100, value / 10 % 10, value % 10];
                memory.slice_mut(regs.i, 3)?.copy_from_slice(&digits);
            }
            Instruction::LdMemVx(x) => {
                let len = usize::from(x) + 1;
                memory.slice_mut(regs.i, len)?.copy_from_slice(&regs.v[..len]);
                regs.i = regs.i.wrapping_add(len as u16);
            }
            Instruction::LdVxMem(x) => {
                let len = usize::from(x) + 1;
                let i = regs.i;
                regs.v[..len].copy_from_slice(memory.slice(i, len)?);
                regs.i = regs.i.wrapping_add(len as u16);
            }
        }
        Ok(())
    }
}
